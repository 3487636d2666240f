//! Input model for the clipping pipeline.
//!
//! A brush is a convex solid described as the intersection of half-spaces,
//! one per [`BrushPlane`]. Each plane carries the texture attributes of the
//! face it will produce: which texture to draw, the two world-space axes the
//! texture is projected along, and the offset/scale applied to the projected
//! coordinates.

use glam::{Vec2, Vec3};

/// Opaque texture identifier.
///
/// The pipeline never interprets the id; it only groups output meshes by it.
/// Hosts typically intern texture names and hand the interned index in here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// An oriented plane `n · p = c`.
///
/// The normal points away from the solid's interior; the half-space kept by
/// clipping is the negative side, `n · p − c ≤ 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal pointing toward the discarded region.
    pub normal: Vec3,
    /// Signed distance from the origin to the plane along the normal.
    pub offset: f32,
}

impl Plane {
    /// Create a plane, normalizing the input normal vector.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    #[must_use]
    pub fn new(normal: Vec3, offset: f32) -> Self {
        let len = normal.length();
        assert!(len > f32::EPSILON, "Normal vector must be non-zero");
        Self {
            normal: normal / len,
            offset: offset / len,
        }
    }

    /// Create a plane from three points, as brush faces are stored in `.map`
    /// sources.
    ///
    /// The normal is `(p0 − p1) × (p0 − p2)`, normalized; map-format faces
    /// wind so that this points out of the solid.
    ///
    /// # Panics
    /// Panics if the points are collinear.
    #[must_use]
    pub fn from_points(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        let normal = (p0 - p1).cross(p0 - p2);
        let len = normal.length();
        assert!(len > f32::EPSILON, "Plane points must not be collinear");
        let normal = normal / len;
        Self {
            normal,
            offset: normal.dot(p0),
        }
    }

    /// Signed distance: negative = inside the solid, zero = on the plane,
    /// positive = outside.
    #[inline]
    #[must_use]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.offset
    }
}

/// Texture attributes carried from a source plane onto the face it produces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceMaterial {
    /// Texture drawn on the face.
    pub texture: TextureId,
    /// World-space axis the texture's U coordinate runs along.
    pub u_axis: Vec3,
    /// World-space axis the texture's V coordinate runs along.
    pub v_axis: Vec3,
    /// Offset added after projection, in texture coordinates.
    pub uv_offset: Vec2,
    /// Multiplier applied to the projected coordinates. Callers converting
    /// from `.map` texel scales pass the reciprocal of the stored scale.
    pub uv_scale: Vec2,
}

/// One half-space constraint of a brush, with its texture attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushPlane {
    pub plane: Plane,
    pub material: FaceMaterial,
}

/// A convex solid: the intersection of the half-spaces of its planes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Brush {
    pub planes: Vec<BrushPlane>,
}

// Tests
