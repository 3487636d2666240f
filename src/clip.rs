//! Mutable boundary representation and the plane clipper.
//!
//! The clipper starts from a large seed cube and slices it by one brush
//! plane at a time. Removing entities from the arrays mid-clip would
//! invalidate every stored index, so clipped vertices, edges, and faces are
//! instead flagged invisible and skipped. The sparse
//! result is densely rewritten once per brush by
//! [`Geometry::compact`](crate::Geometry::compact).
//!
//! ## Connectivity
//!
//! The graph is held as three parallel arrays linked purely by indices:
//! every edge knows its two endpoint vertices and the two faces it borders,
//! and every face owns a growable, unordered set of edge indices. There are
//! no back-pointers, so the cyclic adjacency never becomes a lifetime cycle.

use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::brush::{FaceMaterial, Plane};

/// Default classification tolerance, in world units.
pub(crate) const DEFAULT_EPSILON: f32 = 0.01;

/// Default half-extent of the seed cube, in world units.
pub(crate) const DEFAULT_HALF_EXTENT: f32 = 10_000.0;

// TYPE-SAFE INDICES - Prevent mixing up different index types at compile time

/// Index into the vertex array. Using a newtype prevents accidentally
/// passing an edge index where a vertex index is expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexIdx(pub usize);

/// Index into the edge array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIdx(pub usize);

/// Index into the face array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceIdx(pub usize);

// CORE ENTITIES

/// A corner of the solid under construction.
///
/// `distance` and `occurs` are scratch values meaningful only inside a
/// single [`ClipMesh::clip`] call: the signed distance to the active plane,
/// and the loop-closure occurrence counter.
#[derive(Clone, Debug)]
pub(crate) struct ClipVertex {
    pub(crate) position: Vec3,
    pub(crate) distance: f32,
    pub(crate) occurs: u32,
    pub(crate) visible: bool,
}

/// An edge joining two vertices, shared by exactly two faces.
#[derive(Clone, Debug)]
pub(crate) struct ClipEdge {
    pub(crate) vertices: [VertexIdx; 2],
    pub(crate) faces: [FaceIdx; 2],
    pub(crate) visible: bool,
}

/// A flat face bounded by an unordered set of edges.
///
/// Faces created by clipping carry the material of the brush plane that cut
/// them; the six seed faces carry `None` (and never survive a well-formed
/// brush anyway).
#[derive(Clone, Debug)]
pub(crate) struct ClipFace {
    pub(crate) edges: Vec<EdgeIdx>,
    pub(crate) normal: Vec3,
    pub(crate) material: Option<FaceMaterial>,
    pub(crate) visible: bool,
}

/// Outcome of clipping the B-rep by one plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipResult {
    /// Every vertex was already on the kept side; the mesh is untouched.
    Unchanged,

    /// The plane crossed the solid: vertices were discarded, crossing edges
    /// split, and a cap face added to close the hole.
    Clipped,

    /// Every vertex was discarded; the brush describes an empty solid. The
    /// mesh must be [`reset`](ClipMesh::reset) before further use.
    Emptied,
}

/// Topology validation errors.
///
/// These indicate inconsistencies in the connectivity graph that can only
/// result from bugs or badly conditioned input, never from well-formed
/// convex brushes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopologyError {
    /// A visible edge references a clipped (invisible) vertex.
    DanglingEdgeVertex { edge: EdgeIdx, vertex: VertexIdx },

    /// An edge connects a vertex to itself, or borders the same face twice.
    DegenerateEdge { edge: EdgeIdx },

    /// A visible edge's face is invisible or does not list the edge back.
    EdgeFaceMismatch { edge: EdgeIdx, face: FaceIdx },

    /// A face lists the same edge more than once.
    DuplicateFaceEdge { face: FaceIdx, edge: EdgeIdx },

    /// A face's edge set is not a single closed cycle: some vertex occurs in
    /// a number of its edges other than two.
    OpenFaceLoop {
        face: FaceIdx,
        vertex: VertexIdx,
        occurrences: u32,
    },
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingEdgeVertex { edge, vertex } => {
                write!(f, "Edge {edge:?} references clipped vertex {vertex:?}")
            }
            Self::DegenerateEdge { edge } => {
                write!(f, "Edge {edge:?} has duplicate vertex or face indices")
            }
            Self::EdgeFaceMismatch { edge, face } => {
                write!(f, "Edge {edge:?} and face {face:?} disagree about adjacency")
            }
            Self::DuplicateFaceEdge { face, edge } => {
                write!(f, "Face {face:?} lists edge {edge:?} more than once")
            }
            Self::OpenFaceLoop {
                face,
                vertex,
                occurrences,
            } => {
                write!(
                    f,
                    "Face {face:?} is not a closed loop: vertex {vertex:?} occurs in {occurrences} of its edges (expected 2)"
                )
            }
        }
    }
}

impl std::error::Error for TopologyError {}

// SEED CUBE WIRING - fixed tables for the initial 8/12/6 axis-aligned cube

/// Seed edges as (vertex pair, face pair), in the fixed order
/// front-bottom, front-top, front-left, front-right, back-bottom, back-top,
/// back-left, back-right, then the four connecting sides.
const SEED_EDGES: [([usize; 2], [usize; 2]); 12] = [
    ([0, 3], [0, 5]),  // front-bottom
    ([1, 2], [0, 4]),  // front-top
    ([0, 1], [0, 2]),  // front-left
    ([2, 3], [0, 3]),  // front-right
    ([4, 7], [1, 5]),  // back-bottom
    ([5, 6], [1, 4]),  // back-top
    ([4, 5], [1, 2]),  // back-left
    ([6, 7], [1, 3]),  // back-right
    ([0, 4], [5, 2]),  // side-bottom-left
    ([1, 5], [4, 2]),  // side-top-left
    ([3, 7], [5, 3]),  // side-bottom-right
    ([2, 6], [4, 3]),  // side-top-right
];

/// Seed faces as (edge set, outward normal).
const SEED_FACES: [([usize; 4], Vec3); 6] = [
    ([0, 1, 2, 3], Vec3::NEG_Z),   // front
    ([4, 5, 6, 7], Vec3::Z),       // back
    ([2, 6, 8, 9], Vec3::NEG_X),   // left
    ([3, 7, 10, 11], Vec3::X),     // right
    ([1, 5, 9, 11], Vec3::Y),      // top
    ([0, 4, 8, 10], Vec3::NEG_Y),  // bottom
];

// MAIN STRUCTURE - The mutable B-rep

/// The mutable boundary representation one brush is carved from.
///
/// Create one per brush (or reuse one across brushes via
/// [`reset`](ClipMesh::reset), which keeps the allocations), clip it by each
/// brush plane in turn, then hand it to
/// [`Geometry::compact`](crate::Geometry::compact).
#[derive(Clone, Debug)]
pub struct ClipMesh {
    pub(crate) vertices: Vec<ClipVertex>,
    pub(crate) edges: Vec<ClipEdge>,
    pub(crate) faces: Vec<ClipFace>,

    // Live visible-entity counts, maintained through every mutation so the
    // early-out checks and compaction sizing never rescan the arrays.
    visible_vertices: usize,
    visible_edges: usize,
    visible_faces: usize,

    epsilon: f32,
}

impl ClipMesh {
    // CONSTRUCTION & BASIC QUERIES

    /// Create an empty mesh with the default tolerance.
    #[must_use]
    pub fn new() -> Self {
        Self::with_epsilon(DEFAULT_EPSILON)
    }

    /// Create an empty mesh with a custom classification tolerance.
    ///
    /// The tolerance is the half-width of the on-plane band: vertices within
    /// `epsilon` of a clipping plane are snapped onto it rather than split
    /// against it.
    #[must_use]
    pub fn with_epsilon(epsilon: f32) -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            visible_vertices: 0,
            visible_edges: 0,
            visible_faces: 0,
            epsilon,
        }
    }

    /// Create a mesh already seeded with the axis-aligned cube.
    #[must_use]
    pub fn seed(half_extent: f32) -> Self {
        let mut mesh = Self::new();
        mesh.reset(half_extent);
        mesh
    }

    /// Discard all geometry and re-emit the seed cube, reusing the existing
    /// allocations. `half_extent` must exceed the extent of every brush
    /// plane so that each clip lands strictly inside the cube.
    ///
    /// Vertex order is fixed: front-bottom-left, front-top-left,
    /// front-top-right, front-bottom-right, then the back four in the same
    /// planar order.
    pub fn reset(&mut self, half_extent: f32) {
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();

        let min = Vec3::splat(-half_extent);
        let max = Vec3::splat(half_extent);

        let corners = [
            Vec3::new(min.x, min.y, min.z), // front bottom left
            Vec3::new(min.x, max.y, min.z), // front top left
            Vec3::new(max.x, max.y, min.z), // front top right
            Vec3::new(max.x, min.y, min.z), // front bottom right
            Vec3::new(min.x, min.y, max.z), // back bottom left
            Vec3::new(min.x, max.y, max.z), // back top left
            Vec3::new(max.x, max.y, max.z), // back top right
            Vec3::new(max.x, min.y, max.z), // back bottom right
        ];

        for position in corners {
            self.vertices.push(ClipVertex {
                position,
                distance: 0.0,
                occurs: 0,
                visible: true,
            });
        }

        for (vertices, faces) in SEED_EDGES {
            self.edges.push(ClipEdge {
                vertices: [VertexIdx(vertices[0]), VertexIdx(vertices[1])],
                faces: [FaceIdx(faces[0]), FaceIdx(faces[1])],
                visible: true,
            });
        }

        for (edges, normal) in SEED_FACES {
            self.faces.push(ClipFace {
                edges: edges.iter().map(|&e| EdgeIdx(e)).collect(),
                normal,
                material: None,
                visible: true,
            });
        }

        self.visible_vertices = self.vertices.len();
        self.visible_edges = self.edges.len();
        self.visible_faces = self.faces.len();
    }

    /// Classification tolerance in use.
    #[inline]
    #[must_use]
    pub const fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Number of visible vertices.
    #[inline]
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.visible_vertices
    }

    /// Number of visible edges.
    #[inline]
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.visible_edges
    }

    /// Number of visible faces.
    #[inline]
    #[must_use]
    pub const fn face_count(&self) -> usize {
        self.visible_faces
    }

    /// Iterates over the positions of all visible vertices.
    pub fn vertex_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().filter(|v| v.visible).map(|v| v.position)
    }

    // INTERNAL MUTATION

    fn add_vertex(&mut self, position: Vec3) -> VertexIdx {
        let index = VertexIdx(self.vertices.len());
        self.vertices.push(ClipVertex {
            position,
            distance: 0.0,
            occurs: 0,
            visible: true,
        });
        self.visible_vertices += 1;
        index
    }

    fn add_edge(&mut self, v0: VertexIdx, v1: VertexIdx, f0: FaceIdx, f1: FaceIdx) -> EdgeIdx {
        let index = EdgeIdx(self.edges.len());
        self.edges.push(ClipEdge {
            vertices: [v0, v1],
            faces: [f0, f1],
            visible: true,
        });
        self.visible_edges += 1;
        index
    }

    /// Remove `edge` from `face`'s edge set. The set is unordered, so a
    /// swap-remove is fine. A face whose last edge is removed goes invisible.
    fn remove_face_edge(&mut self, face: FaceIdx, edge: EdgeIdx) {
        let f = &mut self.faces[face.0];

        if let Some(slot) = f.edges.iter().position(|&e| e == edge) {
            f.edges.swap_remove(slot);
        }

        if f.edges.is_empty() && f.visible {
            f.visible = false;
            self.visible_faces -= 1;
        }
    }

    // CLIP - The main operation

    /// Slice the solid by one plane, discarding everything on the positive
    /// side.
    ///
    /// `material` is carried onto the cap face that closes the cut; pass the
    /// brush plane's material so the face renders with its texture.
    ///
    /// # Algorithm
    ///
    /// ```text
    /// 1. Classify every visible vertex by signed distance. Distances inside
    ///    the ε band snap to 0; distances past +ε clip the vertex.
    /// 2. Edges with both endpoints clipped vanish (and leave their faces);
    ///    edges crossing the plane are split at t = d0 / (d0 − d1).
    /// 3. Each surviving face whose loop was opened gets one closing edge,
    ///    shared with the new cap face. The cap face is appended last.
    /// ```
    ///
    /// Phase 3 relies on the loop-closure property: in a closed edge cycle
    /// every vertex occurs in exactly two edges, so a face broken by a
    /// single plane exposes exactly two vertices that occur once.
    pub fn clip(&mut self, plane: &Plane, material: Option<FaceMaterial>) -> ClipResult {
        // Phase 1: classify vertices.
        let mut clipped = 0_usize;
        let mut total = 0_usize;

        for vertex in &mut self.vertices {
            if !vertex.visible {
                continue;
            }

            total += 1;
            vertex.distance = plane.signed_distance(vertex.position);

            if vertex.distance >= self.epsilon {
                clipped += 1;
                vertex.visible = false;
            } else if vertex.distance >= -self.epsilon {
                vertex.distance = 0.0;
            }
        }

        if clipped == 0 {
            return ClipResult::Unchanged;
        }

        self.visible_vertices -= clipped;

        if clipped == total {
            return ClipResult::Emptied;
        }

        // Phase 2: cull or split edges. New vertices appended here start on
        // the plane (distance 0) and are picked up by phase 3.
        for edge_index in 0..self.edges.len() {
            if !self.edges[edge_index].visible {
                continue;
            }

            let [ev0, ev1] = self.edges[edge_index].vertices;
            let v0_visible = self.vertices[ev0.0].visible;
            let v1_visible = self.vertices[ev1.0].visible;

            if !v0_visible && !v1_visible {
                // The edge lost both endpoints: cull it and detach it from
                // its two faces.
                self.edges[edge_index].visible = false;
                self.visible_edges -= 1;

                let [f0, f1] = self.edges[edge_index].faces;
                self.remove_face_edge(f0, EdgeIdx(edge_index));
                self.remove_face_edge(f1, EdgeIdx(edge_index));
            } else if v0_visible && v1_visible {
                // Fully on the kept side.
            } else {
                // The edge crosses the plane: split it.
                //
                //        v0 = = = = | = = = = v1
                //        |----[d0]--|
                //                   |--[d1]----|
                //        |-------[d0-d1]-------|
                //
                // The endpoint signs are opposite, so the denominator is
                // nonzero away from ε and carries the correct sign.
                let d0 = self.vertices[ev0.0].distance;
                let d1 = self.vertices[ev1.0].distance;
                let t = d0 / (d0 - d1);
                let midpoint = self.vertices[ev0.0]
                    .position
                    .lerp(self.vertices[ev1.0].position, t);

                let new_vertex = self.add_vertex(midpoint);

                // Replace whichever endpoint was clipped. Face adjacency is
                // untouched; the loop repair happens in phase 3.
                let slot = usize::from(v0_visible);
                self.edges[edge_index].vertices[slot] = new_vertex;
            }
        }

        // Phase 3: close each opened face loop and collect the closing edges
        // into the new cap face.
        let cap_index = FaceIdx(self.faces.len());
        let mut cap_edges: Vec<EdgeIdx> = Vec::new();

        for face_index in 0..self.faces.len() {
            if !self.faces[face_index].visible {
                continue;
            }

            // Count how many of this face's edges each vertex occurs in. A
            // closed loop gives every vertex a count of exactly 2; the two
            // loose ends of a broken loop count 1.
            for i in 0..self.faces[face_index].edges.len() {
                let edge = self.faces[face_index].edges[i];
                let [a, b] = self.edges[edge.0].vertices;
                self.vertices[a.0].occurs = 0;
                self.vertices[b.0].occurs = 0;
            }

            for i in 0..self.faces[face_index].edges.len() {
                let edge = self.faces[face_index].edges[i];
                let [a, b] = self.edges[edge.0].vertices;
                self.vertices[a.0].occurs += 1;
                self.vertices[b.0].occurs += 1;
            }

            let mut endpoints: [Option<VertexIdx>; 2] = [None, None];

            for i in 0..self.faces[face_index].edges.len() {
                let edge = self.faces[face_index].edges[i];

                for vertex in self.edges[edge.0].vertices {
                    if self.vertices[vertex.0].occurs != 1 {
                        continue;
                    }

                    // Claim the vertex so it cannot be taken twice.
                    self.vertices[vertex.0].occurs += 1;

                    if endpoints[0].is_none() {
                        endpoints[0] = Some(vertex);
                    } else if endpoints[1].is_none() {
                        endpoints[1] = Some(vertex);
                    } else {
                        // A single plane can open a convex face's loop in at
                        // most one place. A third loose end means the input
                        // was non-convex or badly conditioned.
                        debug_assert!(
                            false,
                            "face {face_index} has more than two open endpoints"
                        );
                    }
                }
            }

            if let (Some(start), Some(end)) = (endpoints[0], endpoints[1]) {
                let new_edge = self.add_edge(start, end, FaceIdx(face_index), cap_index);
                self.faces[face_index].edges.push(new_edge);
                cap_edges.push(new_edge);
            }
        }

        // The closing edges of all repaired faces form the cap's loop.
        self.faces.push(ClipFace {
            edges: cap_edges,
            normal: plane.normal,
            material,
            visible: true,
        });
        self.visible_faces += 1;

        ClipResult::Clipped
    }

    // VALIDATION

    /// Check the connectivity invariants over the visible subgraph.
    ///
    /// Verifies that every visible edge joins two visible, distinct vertices
    /// and two distinct faces that both list it back, and that every visible
    /// face's edge set closes into a cycle with no duplicate edges. Intended
    /// for tests and debugging; the clipper maintains these invariants
    /// itself.
    ///
    /// # Errors
    ///
    /// Returns the first [`TopologyError`] found.
    pub fn validate(&self) -> Result<(), TopologyError> {
        for (index, edge) in self.edges.iter().enumerate() {
            if !edge.visible {
                continue;
            }
            let edge_idx = EdgeIdx(index);

            let [v0, v1] = edge.vertices;
            if v0 == v1 {
                return Err(TopologyError::DegenerateEdge { edge: edge_idx });
            }
            for vertex in [v0, v1] {
                if !self.vertices[vertex.0].visible {
                    return Err(TopologyError::DanglingEdgeVertex {
                        edge: edge_idx,
                        vertex,
                    });
                }
            }

            let [f0, f1] = edge.faces;
            if f0 == f1 {
                return Err(TopologyError::DegenerateEdge { edge: edge_idx });
            }
            for face in [f0, f1] {
                let f = &self.faces[face.0];
                if !f.visible || !f.edges.contains(&edge_idx) {
                    return Err(TopologyError::EdgeFaceMismatch {
                        edge: edge_idx,
                        face,
                    });
                }
            }
        }

        let mut occurrences: FxHashMap<VertexIdx, u32> = FxHashMap::default();
        let mut seen_edges: FxHashSet<EdgeIdx> = FxHashSet::default();

        for (index, face) in self.faces.iter().enumerate() {
            if !face.visible {
                continue;
            }
            let face_idx = FaceIdx(index);

            occurrences.clear();
            seen_edges.clear();

            for &edge_idx in &face.edges {
                if !seen_edges.insert(edge_idx) {
                    return Err(TopologyError::DuplicateFaceEdge {
                        face: face_idx,
                        edge: edge_idx,
                    });
                }
                for vertex in self.edges[edge_idx.0].vertices {
                    *occurrences.entry(vertex).or_insert(0) += 1;
                }
            }

            for (&vertex, &count) in &occurrences {
                if count != 2 {
                    return Err(TopologyError::OpenFaceLoop {
                        face: face_idx,
                        vertex,
                        occurrences: count,
                    });
                }
            }
        }

        Ok(())
    }
}

impl Default for ClipMesh {
    fn default() -> Self {
        Self::new()
    }
}

// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_seed_counts() {
        let mesh = ClipMesh::seed(DEFAULT_HALF_EXTENT);

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.edge_count(), 12);
        assert_eq!(mesh.face_count(), 6);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_single_plane_cut() {
        let mut mesh = ClipMesh::seed(DEFAULT_HALF_EXTENT);

        // Keep the negative-x half.
        let result = mesh.clip(&Plane::new(Vec3::X, 0.0), None);

        assert_eq!(result, ClipResult::Clipped);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.edge_count(), 12);
        assert_eq!(mesh.face_count(), 6);
        assert!(mesh.validate().is_ok());

        // The four -x corners survive untouched; the four new vertices sit
        // on the plane with the seed's y/z extents.
        let mut kept = 0;
        let mut split = 0;
        for position in mesh.vertex_positions() {
            assert!((position.y.abs() - DEFAULT_HALF_EXTENT).abs() < 1e-3);
            assert!((position.z.abs() - DEFAULT_HALF_EXTENT).abs() < 1e-3);
            if (position.x + DEFAULT_HALF_EXTENT).abs() < 1e-3 {
                kept += 1;
            } else if position.x.abs() < 1e-3 {
                split += 1;
            }
        }
        assert_eq!(kept, 4);
        assert_eq!(split, 4);
    }

    #[test]
    fn test_redundant_plane_unchanged() {
        let mut mesh = ClipMesh::seed(DEFAULT_HALF_EXTENT);

        // A plane entirely outside the seed clips nothing and must leave the
        // topology untouched: no cap face, no new edges.
        let result = mesh.clip(&Plane::new(Vec3::X, 2.0 * DEFAULT_HALF_EXTENT), None);

        assert_eq!(result, ClipResult::Unchanged);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.edge_count(), 12);
        assert_eq!(mesh.face_count(), 6);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_all_clipped_empties() {
        let mut mesh = ClipMesh::seed(DEFAULT_HALF_EXTENT);

        let result = mesh.clip(&Plane::new(Vec3::X, -2.0 * DEFAULT_HALF_EXTENT), None);

        assert_eq!(result, ClipResult::Emptied);
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_epsilon_snaps_near_plane() {
        let mut mesh = ClipMesh::seed(DEFAULT_HALF_EXTENT);

        // The +x corners sit 0.005 past this plane, inside the ε band, so
        // they snap onto it instead of being clipped.
        let result = mesh.clip(&Plane::new(Vec3::X, DEFAULT_HALF_EXTENT - 0.005), None);
        assert_eq!(result, ClipResult::Unchanged);

        // 1.0 past the plane is well outside the band.
        let result = mesh.clip(&Plane::new(Vec3::X, DEFAULT_HALF_EXTENT - 1.0), None);
        assert_eq!(result, ClipResult::Clipped);
    }

    #[test]
    fn test_reset_reuses_mesh() {
        let mut mesh = ClipMesh::seed(DEFAULT_HALF_EXTENT);
        mesh.clip(&Plane::new(Vec3::X, 0.0), None);
        mesh.clip(&Plane::new(Vec3::Y, 0.0), None);

        mesh.reset(DEFAULT_HALF_EXTENT);

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.edge_count(), 12);
        assert_eq!(mesh.face_count(), 6);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_invariants_hold_after_every_clip() {
        let cube = [
            Plane::new(Vec3::X, 0.5),
            Plane::new(Vec3::NEG_X, 0.5),
            Plane::new(Vec3::Y, 0.5),
            Plane::new(Vec3::NEG_Y, 0.5),
            Plane::new(Vec3::Z, 0.5),
            Plane::new(Vec3::NEG_Z, 0.5),
        ];

        let mut mesh = ClipMesh::seed(DEFAULT_HALF_EXTENT);
        for plane in &cube {
            assert_eq!(mesh.clip(plane, None), ClipResult::Clipped);
            assert!(mesh.validate().is_ok());
        }

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.edge_count(), 12);
        assert_eq!(mesh.face_count(), 6);

        // Every surviving vertex lies at a corner of the half-unit cube.
        for position in mesh.vertex_positions() {
            assert!((position.x.abs() - 0.5).abs() < DEFAULT_EPSILON);
            assert!((position.y.abs() - 0.5).abs() < DEFAULT_EPSILON);
            assert!((position.z.abs() - 0.5).abs() < DEFAULT_EPSILON);
        }
    }

    #[test]
    fn test_tetrahedron_counts() {
        // Unit tetrahedron with corners at the origin and the three axis
        // unit points.
        let s = 1.0 / 3.0_f32.sqrt();
        let planes = [
            Plane::new(Vec3::NEG_X, 0.0),
            Plane::new(Vec3::NEG_Y, 0.0),
            Plane::new(Vec3::NEG_Z, 0.0),
            Plane::new(Vec3::splat(s), s),
        ];

        let mut mesh = ClipMesh::seed(DEFAULT_HALF_EXTENT);
        for plane in &planes {
            assert_eq!(mesh.clip(plane, None), ClipResult::Clipped);
            assert!(mesh.validate().is_ok());
        }

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.edge_count(), 6);
        assert_eq!(mesh.face_count(), 4);
    }

    #[test]
    fn test_random_planes_containment() {
        // Fixed-seed random convex solids: the invariants hold after every
        // cut, and every surviving vertex stays inside every applied
        // half-space (within ε).
        let mut rng = StdRng::seed_from_u64(0x00b5_e55e);

        for _ in 0..8 {
            let mut mesh = ClipMesh::seed(10.0);
            let mut applied: Vec<Plane> = Vec::new();

            for _ in 0..20 {
                let normal = Vec3::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                );
                if normal.length() < 0.1 {
                    continue;
                }
                let plane = Plane::new(normal, rng.random_range(1.0..3.0));

                if mesh.clip(&plane, None) == ClipResult::Emptied {
                    panic!("planes through the 1-ball cannot empty the solid");
                }
                applied.push(plane);

                assert!(mesh.validate().is_ok());
                for position in mesh.vertex_positions() {
                    for plane in &applied {
                        assert!(plane.signed_distance(position) <= mesh.epsilon() + 1e-4);
                    }
                }
            }
        }
    }
}
