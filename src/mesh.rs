//! Triangle-mesh emission: per-texture batches built from compacted
//! geometry, and the brush→model pipeline driver.
//!
//! Every face of every compacted brush contributes one triangle fan to the
//! batch keyed by its texture, so an entity made of many brushes still
//! produces exactly one mesh per distinct texture. Batches keep first-seen
//! order; the only hashing involved is the texture lookup.

use rustc_hash::FxHashMap;

use crate::brush::{Brush, FaceMaterial, TextureId};
use crate::clip::{ClipMesh, ClipResult, DEFAULT_EPSILON, DEFAULT_HALF_EXTENT, FaceIdx};
use crate::geometry::{FaceLoop, Geometry, GeometryFace};

/// Numeric configuration of the pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildConfig {
    /// Half-width of the on-plane band for vertex classification, in world
    /// units. Smaller values split more edges; larger values merge more
    /// near-plane vertices.
    pub epsilon: f32,

    /// Half-extent of the seed cube. Must exceed the extent of every brush
    /// so that all brush planes cut strictly inside it.
    pub seed_half_extent: f32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            seed_half_extent: DEFAULT_HALF_EXTENT,
        }
    }
}

/// One renderable mesh: every triangle of the model that shares a texture.
///
/// The four attribute streams run parallel: per vertex, 3 position floats,
/// 3 normal floats, 4 tangent floats (the tangent is the face's U axis with
/// a trailing 0), and 2 UV floats. Indices are 16-bit; keeping a batch
/// under 65 535 vertices is the caller's responsibility.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub texture: TextureId,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub tangents: Vec<f32>,
    pub uvs: Vec<f32>,
    pub vertex_count: u32,
    pub indices: Vec<u16>,
}

impl Mesh {
    fn new(texture: TextureId) -> Self {
        Self {
            texture,
            ..Self::default()
        }
    }

    /// Number of triangles in the index stream.
    #[inline]
    #[must_use]
    pub const fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// The renderable output of one entity: one [`Mesh`] per texture seen,
/// in first-seen order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub meshes: Vec<Mesh>,
}

/// Clip a single brush out of a fresh seed cube and compact the result.
///
/// A brush whose planes describe an empty solid produces the empty
/// geometry (and a `log` warning); this is not an error.
#[must_use]
pub fn build_geometry(brush: &Brush, config: &BuildConfig) -> Geometry {
    let mut mesh = ClipMesh::with_epsilon(config.epsilon);
    mesh.reset(config.seed_half_extent);
    clip_brush(&mut mesh, brush)
}

/// Tessellate compacted brush geometries into per-texture meshes.
///
/// Pure function of its inputs: identical geometries produce bit-identical
/// attribute and index streams.
#[must_use]
pub fn build_meshes(geometries: &[Geometry]) -> Model {
    let mut meshes: Vec<Mesh> = Vec::new();
    let mut by_texture: FxHashMap<TextureId, usize> = FxHashMap::default();

    // Scratch map from a brush's local vertex indices to batch indices,
    // re-sized per geometry and re-filled per face.
    let mut vertex_map: Vec<u16> = Vec::new();

    for geometry in geometries {
        vertex_map.clear();
        vertex_map.resize(geometry.vertices.len(), 0);

        for face_index in 0..geometry.faces.len() {
            let face = &geometry.faces[face_index];
            let Some(material) = face.material else {
                // Surviving seed faces have no texture and emit nothing.
                continue;
            };

            let mesh_index = *by_texture.entry(material.texture).or_insert_with(|| {
                meshes.push(Mesh::new(material.texture));
                meshes.len() - 1
            });

            let face_loop = geometry.face_loop(FaceIdx(face_index));
            emit_face(
                &mut meshes[mesh_index],
                geometry,
                face,
                &face_loop,
                &material,
                &mut vertex_map,
            );
        }
    }

    Model { meshes }
}

/// Build the combined model of one entity's brushes.
///
/// All brushes share the same per-texture batching, so the output holds one
/// mesh per texture across the whole list. The clipping scratch is reused
/// from brush to brush and released on return.
#[must_use]
pub fn build_model(brushes: &[Brush], config: &BuildConfig) -> Model {
    let mut clip_mesh = ClipMesh::with_epsilon(config.epsilon);
    let mut geometries = Vec::with_capacity(brushes.len());

    for brush in brushes {
        clip_mesh.reset(config.seed_half_extent);
        geometries.push(clip_brush(&mut clip_mesh, brush));
    }

    let model = build_meshes(&geometries);
    log::trace!(
        "built {} meshes from {} brushes",
        model.meshes.len(),
        brushes.len()
    );
    model
}

fn clip_brush(mesh: &mut ClipMesh, brush: &Brush) -> Geometry {
    for brush_plane in &brush.planes {
        match mesh.clip(&brush_plane.plane, Some(brush_plane.material)) {
            ClipResult::Emptied => {
                log::warn!("brush planes describe an empty solid; emitting no geometry");
                return Geometry::default();
            }
            ClipResult::Unchanged | ClipResult::Clipped => {}
        }
    }

    Geometry::compact(mesh)
}

/// Append one face's fan to its batch.
///
/// Positions are snapped to the integer grid so that shared edges across
/// brushes land on identical coordinates (no T-junction shimmer); the UV
/// projection reads the exact pre-snap position.
#[expect(
    clippy::cast_possible_truncation,
    reason = "batches beyond u16::MAX vertices are the caller's responsibility"
)]
fn emit_face(
    mesh: &mut Mesh,
    geometry: &Geometry,
    face: &GeometryFace,
    face_loop: &FaceLoop,
    material: &FaceMaterial,
    vertex_map: &mut [u16],
) {
    debug_assert!(u16::try_from(mesh.vertex_count).is_ok());

    // Every loop entry except the closing repeat becomes a batch vertex.
    for &vertex_idx in &face_loop.vertices[..face_loop.vertices.len() - 1] {
        let position = geometry.vertices[vertex_idx.0].position;

        let u = position.dot(material.u_axis) * material.uv_scale.x + material.uv_offset.x;
        let v = position.dot(material.v_axis) * material.uv_scale.y + material.uv_offset.y;

        vertex_map[vertex_idx.0] = mesh.vertex_count as u16;

        mesh.positions
            .extend([position.x.round(), position.y.round(), position.z.round()]);
        mesh.normals
            .extend([face.normal.x, face.normal.y, face.normal.z]);
        mesh.tangents.extend([
            material.u_axis.x,
            material.u_axis.y,
            material.u_axis.z,
            0.0,
        ]);
        mesh.uvs.extend([u, v]);
        mesh.vertex_count += 1;
    }

    // Triangle fan from the first loop vertex, swapped when the walk order
    // disagrees with the face normal.
    let count = face_loop.vertices.len();
    for i in 1..count - 2 {
        let v0 = vertex_map[face_loop.vertices[0].0];
        let va = vertex_map[face_loop.vertices[i].0];
        let vb = vertex_map[face_loop.vertices[i + 1].0];

        if face_loop.reversed {
            mesh.indices.extend([v0, vb, va]);
        } else {
            mesh.indices.extend([v0, va, vb]);
        }
    }
}

// Tests
