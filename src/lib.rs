//! # `brushmesh`
//!
//! Convex brush clipping and per-texture triangle mesh generation for
//! brush-based levels.
//!
//! ## What is this?
//!
//! Brush-based level formats (Quake `.map` and its descendants) describe a
//! level as entities owning **brushes**: convex solids defined as the
//! intersection of half-spaces, one per textured plane. This crate turns
//! those brushes into renderable geometry in two stages:
//!
//! 1. **Clipping**: a large seed cube is sliced by every brush plane in
//!    turn, maintaining a full boundary representation (vertices, edges,
//!    faces with adjacency) through each cut.
//! 2. **Tessellation**: each surviving face's boundary loop is
//!    reconstructed from its unordered edge set, fanned into triangles, and
//!    batched into one mesh per texture, with positions, normals, tangents
//!    and projected UVs.
//!
//! Parsing `.map` text and uploading the results to a GPU are left to the
//! host; the input here is already-split planes with texture attributes,
//! and the output is plain vertex/index streams.
//!
//! ## Quick Start
//!
//! ```rust
//! use brushmesh::math::{Vec2, Vec3};
//! use brushmesh::{Brush, BrushPlane, BuildConfig, FaceMaterial, Plane, TextureId, build_model};
//!
//! // A unit cube centered at the origin, textured on all six sides.
//! let axes = [
//!     (Vec3::X, Vec3::Z, Vec3::Y),
//!     (Vec3::NEG_X, Vec3::Z, Vec3::Y),
//!     (Vec3::Y, Vec3::X, Vec3::Z),
//!     (Vec3::NEG_Y, Vec3::X, Vec3::Z),
//!     (Vec3::Z, Vec3::X, Vec3::Y),
//!     (Vec3::NEG_Z, Vec3::X, Vec3::Y),
//! ];
//! let brush = Brush {
//!     planes: axes
//!         .into_iter()
//!         .map(|(normal, u_axis, v_axis)| BrushPlane {
//!             plane: Plane::new(normal, 0.5),
//!             material: FaceMaterial {
//!                 texture: TextureId(0),
//!                 u_axis,
//!                 v_axis,
//!                 uv_offset: Vec2::ZERO,
//!                 uv_scale: Vec2::ONE,
//!             },
//!         })
//!         .collect(),
//! };
//!
//! let model = build_model(std::slice::from_ref(&brush), &BuildConfig::default());
//!
//! assert_eq!(model.meshes.len(), 1); // one texture → one mesh
//! assert_eq!(model.meshes[0].vertex_count, 24); // 6 quads × 4 corners
//! assert_eq!(model.meshes[0].indices.len(), 36); // 6 quads × 2 triangles
//! ```
//!
//! ## Key Features
//!
//! - **Index-linked B-rep**: vertex/edge/face adjacency as three parallel
//!   arrays, mutated in place through every cut. No pointer graph, no
//!   mid-clip invalidation of surviving indices.
//! - **Robust near the plane**: vertices within ε of a clipping plane snap
//!   onto it instead of spawning sliver geometry (ε defaults to 0.01 world
//!   units and is configurable).
//! - **Loop reconstruction**: face boundaries are rebuilt from unordered
//!   edge sets, with winding inferred from the face normal.
//! - **Texture batching**: models spanning many brushes come out as exactly
//!   one mesh per texture, deterministic across runs.
//!
//! ## When NOT to Use
//!
//! - Non-convex solids or cross-brush CSG (union/difference): every brush
//!   here is an independent convex cell.
//! - Exact arithmetic: clipping classifies against an ε tolerance in f32.

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod brush;
mod clip;
mod geometry;
mod mesh;

pub use brush::{Brush, BrushPlane, FaceMaterial, Plane, TextureId};
pub use clip::{ClipMesh, ClipResult, EdgeIdx, FaceIdx, TopologyError, VertexIdx};
pub use geometry::{FaceLoop, Geometry, GeometryEdge, GeometryFace, GeometryVertex};
pub use mesh::{BuildConfig, Mesh, Model, build_geometry, build_meshes, build_model};

/// Re-export glam types for convenience
pub mod math {
    pub use glam::{Vec2, Vec3};
}
