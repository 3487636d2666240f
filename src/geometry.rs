//! Densely indexed geometry compacted from a clipped B-rep, plus face loop
//! extraction.
//!
//! After a brush's planes have all been applied, the [`ClipMesh`] arrays
//! are sparse: clipped entities still occupy slots so that stored indices
//! stay valid. [`Geometry::compact`] pays the O(n) rewrite once, producing
//! arrays that hold only surviving entities with every cross-reference
//! remapped. Output order follows source order, so identical input yields
//! identical geometry.

use glam::Vec3;
use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::brush::FaceMaterial;
use crate::clip::{ClipMesh, EdgeIdx, FaceIdx, TopologyError, VertexIdx};

/// A vertex of the compacted solid.
#[derive(Clone, Copy, Debug)]
pub struct GeometryVertex {
    pub position: Vec3,
}

/// An edge of the compacted solid, joining two vertices and two faces.
#[derive(Clone, Copy, Debug)]
pub struct GeometryEdge {
    pub vertices: [VertexIdx; 2],
    pub faces: [FaceIdx; 2],
}

/// A face of the compacted solid.
///
/// The edge set is unordered; [`Geometry::face_loop`] reconstructs the
/// boundary cycle on demand. Faces cut by brush planes carry that plane's
/// material; `None` marks a surviving seed face, which emits no triangles.
#[derive(Clone, Debug)]
pub struct GeometryFace {
    pub edges: Vec<EdgeIdx>,
    pub normal: Vec3,
    pub material: Option<FaceMaterial>,
}

/// An immutable, densely indexed boundary representation of one brush.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub vertices: Vec<GeometryVertex>,
    pub edges: Vec<GeometryEdge>,
    pub faces: Vec<GeometryFace>,
}

/// The ordered boundary of one face.
///
/// `vertices` walks the loop with the first vertex repeated at the end.
/// `reversed` reports whether the walk order disagrees with the face
/// normal: the emission convention is that a triangle `(a, b, c)` taken
/// from the loop must satisfy `((b − a) × (c − a)) · n ≤ 0`, so consumers
/// swap the last two fan indices when `reversed` is set.
#[derive(Clone, Debug)]
pub struct FaceLoop {
    pub vertices: Vec<VertexIdx>,
    pub reversed: bool,
}

impl Geometry {
    /// Copy every visible entity of a clipped mesh into dense arrays,
    /// remapping all cross-references.
    ///
    /// Vertices are placed first, then edges (endpoint indices rewritten
    /// inline), then faces (edge indices rewritten inline); edge→face
    /// references are rewritten last, once every face has its dense slot.
    /// A mesh whose vertices were all clipped away compacts to the empty
    /// geometry.
    #[must_use]
    pub fn compact(mesh: &ClipMesh) -> Self {
        if mesh.vertex_count() == 0 {
            return Self::default();
        }

        let mut vertex_map = vec![usize::MAX; mesh.vertices.len()];
        let mut vertices = Vec::with_capacity(mesh.vertex_count());

        for (index, vertex) in mesh.vertices.iter().enumerate() {
            if !vertex.visible {
                continue;
            }
            vertex_map[index] = vertices.len();
            vertices.push(GeometryVertex {
                position: vertex.position,
            });
        }

        let mut edge_map = vec![usize::MAX; mesh.edges.len()];
        let mut edges = Vec::with_capacity(mesh.edge_count());

        for (index, edge) in mesh.edges.iter().enumerate() {
            if !edge.visible {
                continue;
            }
            edge_map[index] = edges.len();
            edges.push(GeometryEdge {
                vertices: [
                    VertexIdx(vertex_map[edge.vertices[0].0]),
                    VertexIdx(vertex_map[edge.vertices[1].0]),
                ],
                // Rewritten below, once faces have dense slots.
                faces: edge.faces,
            });
        }

        let mut face_map = vec![usize::MAX; mesh.faces.len()];
        let mut faces = Vec::with_capacity(mesh.face_count());

        for (index, face) in mesh.faces.iter().enumerate() {
            if !face.visible {
                continue;
            }
            face_map[index] = faces.len();
            faces.push(GeometryFace {
                edges: face.edges.iter().map(|&e| EdgeIdx(edge_map[e.0])).collect(),
                normal: face.normal,
                material: face.material,
            });
        }

        for edge in &mut edges {
            edge.faces = [
                FaceIdx(face_map[edge.faces[0].0]),
                FaceIdx(face_map[edge.faces[1].0]),
            ];
        }

        Self {
            vertices,
            edges,
            faces,
        }
    }

    /// Reconstruct the ordered boundary cycle of a face from its unordered
    /// edge set, and decide its winding against the face normal.
    ///
    /// # Algorithm
    ///
    /// ```text
    /// 1. Start from the first edge's first vertex.
    /// 2. Repeatedly consume an unprocessed edge incident to the current
    ///    head and append its other endpoint.
    /// 3. Close the loop by repeating the starting vertex.
    /// 4. Accumulate Σ pᵢ × pᵢ₊₁ over consecutive positions; a positive
    ///    dot with the face normal marks the loop as reversed.
    /// ```
    #[must_use]
    pub fn face_loop(&self, face_idx: FaceIdx) -> FaceLoop {
        let face = &self.faces[face_idx.0];
        let initial = &self.edges[face.edges[0].0];

        let mut ordered: Vec<VertexIdx> = Vec::with_capacity(face.edges.len() + 1);
        ordered.push(initial.vertices[0]);

        let mut remaining: Vec<EdgeIdx> = face.edges[1..].to_vec();

        while !remaining.is_empty() {
            let head = *ordered.last().unwrap();

            let found = remaining.iter().position(|&edge_idx| {
                let [a, b] = self.edges[edge_idx.0].vertices;
                a == head || b == head
            });

            let Some(slot) = found else {
                debug_assert!(false, "face {face_idx:?} boundary does not close");
                break;
            };

            let edge_idx = remaining.swap_remove(slot);
            let [a, b] = self.edges[edge_idx.0].vertices;
            ordered.push(if a == head { b } else { a });
        }

        ordered.push(ordered[0]);

        // Winding: the accumulated cross products of consecutive positions
        // give twice the area vector of the loop, oriented by traversal
        // order (translation independent over a closed cycle).
        let accumulator: Vec3 = ordered
            .iter()
            .map(|&v| self.vertices[v.0].position)
            .tuple_windows()
            .map(|(a, b)| a.cross(b))
            .sum();
        let accumulator = accumulator.normalize_or_zero();

        let reversed = accumulator.dot(face.normal) > 0.0;

        FaceLoop {
            vertices: ordered,
            reversed,
        }
    }

    /// Check the connectivity invariants on the dense arrays.
    ///
    /// The same checks as [`ClipMesh::validate`], applied after compaction:
    /// every index must land in range, edges must join distinct vertices and
    /// distinct faces that list them back, and every face must close into a
    /// single cycle.
    ///
    /// # Errors
    ///
    /// Returns the first [`TopologyError`] found.
    pub fn validate(&self) -> Result<(), TopologyError> {
        for (index, edge) in self.edges.iter().enumerate() {
            let edge_idx = EdgeIdx(index);

            let [v0, v1] = edge.vertices;
            if v0 == v1 {
                return Err(TopologyError::DegenerateEdge { edge: edge_idx });
            }
            for vertex in [v0, v1] {
                if vertex.0 >= self.vertices.len() {
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
                if face.0 >= self.faces.len() || !self.faces[face.0].edges.contains(&edge_idx) {
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

// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::Plane;
    use crate::clip::ClipResult;

    fn unit_cube_mesh() -> ClipMesh {
        let planes = [
            Plane::new(Vec3::X, 0.5),
            Plane::new(Vec3::NEG_X, 0.5),
            Plane::new(Vec3::Y, 0.5),
            Plane::new(Vec3::NEG_Y, 0.5),
            Plane::new(Vec3::Z, 0.5),
            Plane::new(Vec3::NEG_Z, 0.5),
        ];

        let mut mesh = ClipMesh::seed(10_000.0);
        for plane in &planes {
            assert_eq!(mesh.clip(plane, None), ClipResult::Clipped);
        }
        mesh
    }

    #[test]
    fn test_compact_seed_only() {
        let mesh = ClipMesh::seed(10_000.0);
        let geometry = Geometry::compact(&mesh);

        assert_eq!(geometry.vertices.len(), 8);
        assert_eq!(geometry.edges.len(), 12);
        assert_eq!(geometry.faces.len(), 6);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_compact_after_cut() {
        let mut mesh = ClipMesh::seed(10_000.0);
        mesh.clip(&Plane::new(Vec3::X, 0.0), None);

        let geometry = Geometry::compact(&mesh);

        assert_eq!(geometry.vertices.len(), 8);
        assert_eq!(geometry.edges.len(), 12);
        assert_eq!(geometry.faces.len(), 6);
        assert!(geometry.validate().is_ok());

        // Dense indices must stay within the compacted arrays.
        for edge in &geometry.edges {
            assert!(edge.vertices.iter().all(|v| v.0 < geometry.vertices.len()));
            assert!(edge.faces.iter().all(|f| f.0 < geometry.faces.len()));
        }
    }

    #[test]
    fn test_compact_emptied_mesh() {
        let mut mesh = ClipMesh::seed(10_000.0);
        assert_eq!(
            mesh.clip(&Plane::new(Vec3::X, -30_000.0), None),
            ClipResult::Emptied
        );

        let geometry = Geometry::compact(&mesh);

        assert!(geometry.vertices.is_empty());
        assert!(geometry.edges.is_empty());
        assert!(geometry.faces.is_empty());
    }

    #[test]
    fn test_face_loop_closes() {
        let geometry = Geometry::compact(&unit_cube_mesh());

        for face_index in 0..geometry.faces.len() {
            let face = &geometry.faces[face_index];
            let face_loop = geometry.face_loop(FaceIdx(face_index));

            // A quad loop: four corners plus the closing repeat.
            assert_eq!(face_loop.vertices.len(), face.edges.len() + 1);
            assert_eq!(face_loop.vertices[0], *face_loop.vertices.last().unwrap());

            // Each consecutive pair is one of the face's edges.
            for (&a, &b) in face_loop.vertices.iter().tuple_windows() {
                let connected = face.edges.iter().any(|&e| {
                    let pair = geometry.edges[e.0].vertices;
                    pair == [a, b] || pair == [b, a]
                });
                assert!(connected, "loop step {a:?} → {b:?} is not an edge");
            }
        }
    }

    #[test]
    fn test_face_loop_winding_convention() {
        let geometry = Geometry::compact(&unit_cube_mesh());

        for face_index in 0..geometry.faces.len() {
            let face = &geometry.faces[face_index];
            let face_loop = geometry.face_loop(FaceIdx(face_index));

            let position = |i: usize| geometry.vertices[face_loop.vertices[i].0].position;

            // Emit the fan the way the mesh builder does and confirm the
            // pinned orientation rule: (b − a) × (c − a) · n ≤ 0.
            for i in 1..face_loop.vertices.len() - 2 {
                let (a, b, c) = if face_loop.reversed {
                    (position(0), position(i + 1), position(i))
                } else {
                    (position(0), position(i), position(i + 1))
                };

                let winding = (b - a).cross(c - a).dot(face.normal);
                assert!(winding <= 1e-3, "fan triangle winds against the face normal");
            }
        }
    }

    #[test]
    fn test_compact_is_deterministic() {
        let build = || {
            let mut mesh = ClipMesh::seed(10_000.0);
            mesh.clip(&Plane::new(Vec3::new(1.0, 1.0, 0.3), 4.0), None);
            mesh.clip(&Plane::new(Vec3::new(-0.2, 1.0, 1.0), 3.0), None);
            Geometry::compact(&mesh)
        };

        let first = build();
        let second = build();

        assert_eq!(first.vertices.len(), second.vertices.len());
        for (a, b) in first.vertices.iter().zip(&second.vertices) {
            assert_eq!(a.position, b.position);
        }
        for (a, b) in first.edges.iter().zip(&second.edges) {
            assert_eq!(a.vertices, b.vertices);
            assert_eq!(a.faces, b.faces);
        }
        for (a, b) in first.faces.iter().zip(&second.faces) {
            assert_eq!(a.edges, b.edges);
        }
    }
}
