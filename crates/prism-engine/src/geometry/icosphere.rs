//! Base icosahedron with a compressed equirectangular UV projection.
//!
//! No subdivision is applied: the mesh is exactly 12 vertices / 20 faces.
//! The faceted look is part of the intended output.

use std::f64::consts::PI;

use super::mesh::{Mesh, MeshVertex};

/// Golden ratio.
const PHI: f64 = 1.618_033_988_749_895;

/// Icosahedron corners as three orthogonal 2 × 2φ rectangles
/// (in the XY, YZ and ZX planes).
const RAW_VERTICES: [[f64; 3]; 12] = [
    [-1.0, PHI, 0.0],
    [1.0, PHI, 0.0],
    [-1.0, -PHI, 0.0],
    [1.0, -PHI, 0.0],
    [0.0, -1.0, PHI],
    [0.0, 1.0, PHI],
    [0.0, -1.0, -PHI],
    [0.0, 1.0, -PHI],
    [PHI, 0.0, -1.0],
    [PHI, 0.0, 1.0],
    [-PHI, 0.0, -1.0],
    [-PHI, 0.0, 1.0],
];

/// Face list, counter-clockwise when seen from outside.
#[rustfmt::skip]
pub const ICOSAHEDRON_INDICES: [u16; 60] = [
    0, 11, 5,   0, 5, 1,    0, 1, 7,    0, 7, 10,   0, 10, 11,
    1, 5, 9,    5, 11, 4,   11, 10, 2,  10, 7, 6,   7, 1, 8,
    3, 9, 4,    3, 4, 2,    3, 2, 6,    3, 6, 8,    3, 8, 9,
    4, 9, 5,    2, 4, 11,   6, 2, 10,   8, 6, 7,    9, 8, 1,
];

const _: () = assert!(indices_in_bounds(&ICOSAHEDRON_INDICES, RAW_VERTICES.len()));

const fn indices_in_bounds(indices: &[u16], vertex_count: usize) -> bool {
    let mut i = 0;
    while i < indices.len() {
        if indices[i] as usize >= vertex_count {
            return false;
        }
        i += 1;
    }
    indices.len() % 3 == 0
}

/// Maps a unit direction to texture coordinates.
///
/// Longitude/latitude are projected equirectangularly, then squeezed into
/// `[0.25, 0.75]` on both axes so only the central quadrant of the texture
/// is sampled.
pub fn icosphere_uv(direction: [f64; 3]) -> [f32; 2] {
    let [x, y, z] = direction;
    let u = 0.5 + z.atan2(x) / (2.0 * PI);
    let v = y.clamp(-1.0, 1.0).acos() / PI;
    [(0.25 + u / 2.0) as f32, (0.25 + v / 2.0) as f32]
}

fn project(raw: [f64; 3]) -> MeshVertex {
    let len = (raw[0] * raw[0] + raw[1] * raw[1] + raw[2] * raw[2]).sqrt();
    let dir = [raw[0] / len, raw[1] / len, raw[2] / len];
    MeshVertex::new(
        [dir[0] as f32, dir[1] as f32, dir[2] as f32],
        icosphere_uv(dir),
    )
}

/// Builds the radius-1 icosahedron.
///
/// Pure and deterministic: every call returns bit-identical buffers.
pub fn build_icosphere() -> Mesh {
    let vertices: Vec<MeshVertex> = RAW_VERTICES.iter().copied().map(project).collect();

    Mesh::from_checked_parts(vertices, ICOSAHEDRON_INDICES.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_mesh_passes_checked_constructor() {
        let mesh = build_icosphere();
        let checked = Mesh::new(mesh.vertices().to_vec(), mesh.indices().to_vec());
        assert_eq!(checked.as_ref(), Some(&mesh));
    }

    #[test]
    fn index_bound_check_rejects_out_of_range_faces() {
        assert!(indices_in_bounds(&ICOSAHEDRON_INDICES, 12));
        assert!(!indices_in_bounds(&ICOSAHEDRON_INDICES, 11));
        assert!(!indices_in_bounds(&[0, 1], 12));
    }

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[test]
    fn phi_matches_definition() {
        assert!((PHI - (1.0 + 5f64.sqrt()) / 2.0).abs() < 1e-15);
    }

    #[test]
    fn counts() {
        let mesh = build_icosphere();
        assert_eq!(mesh.vertices().len(), 12);
        assert_eq!(mesh.index_count(), 60);
        assert_eq!(mesh.indices().iter().copied().max(), Some(11));
    }

    #[test]
    fn deterministic() {
        let a = build_icosphere();
        let b = build_icosphere();
        assert_eq!(a.vertex_bytes(), b.vertex_bytes());
        assert_eq!(a.index_bytes(), b.index_bytes());
    }

    #[test]
    fn vertices_lie_on_unit_sphere() {
        for v in build_icosphere().vertices() {
            let len = dot(v.position, v.position).sqrt();
            assert!((len - 1.0).abs() < 1e-6, "length {len}");
        }
    }

    #[test]
    fn uvs_stay_in_central_quadrant() {
        for v in build_icosphere().vertices() {
            for c in v.uv {
                assert!((0.25..=0.75).contains(&c), "uv {:?}", v.uv);
            }
        }
    }

    #[test]
    fn uv_known_points() {
        // +X on the equator: u = 0.5 -> 0.5, v = 0.5 -> 0.5.
        let [u, v] = icosphere_uv([1.0, 0.0, 0.0]);
        assert!((u - 0.5).abs() < 1e-7 && (v - 0.5).abs() < 1e-7);
        // North pole: v = 0 -> 0.25.
        assert_eq!(icosphere_uv([0.0, 1.0, 0.0])[1], 0.25);
        // South pole: v = 1 -> 0.75.
        assert_eq!(icosphere_uv([0.0, -1.0, 0.0])[1], 0.75);
        // -X seam: atan2(0, -1) = pi -> u = 1 -> 0.75.
        assert_eq!(icosphere_uv([-1.0, 0.0, 0.0])[0], 0.75);
    }

    #[test]
    fn first_vertex_uv() {
        let mesh = build_icosphere();
        let uv = mesh.vertices()[0].uv;
        assert!((uv[0] - 0.75).abs() < 1e-6);
        assert!((uv[1] - 0.338_1).abs() < 1e-3);
    }

    #[test]
    fn faces_wind_outward() {
        let mesh = build_icosphere();
        let verts = mesh.vertices();
        for [a, b, c] in mesh.triangles() {
            let (a, b, c) = (
                verts[a as usize].position,
                verts[b as usize].position,
                verts[c as usize].position,
            );
            let normal = cross(sub(b, a), sub(c, a));
            let centroid = [a[0] + b[0] + c[0], a[1] + b[1] + c[1], a[2] + b[2] + c[2]];
            assert!(dot(normal, centroid) > 0.0);
        }
    }

    #[test]
    fn closed_surface_every_edge_shared_twice() {
        let mesh = build_icosphere();
        let mut directed = std::collections::HashSet::new();
        for [a, b, c] in mesh.triangles() {
            for (p, q) in [(a, b), (b, c), (c, a)] {
                assert!(directed.insert((p, q)), "edge {p}->{q} repeated");
            }
        }
        // Each directed edge has its reverse: closed and consistently oriented.
        for &(p, q) in &directed {
            assert!(directed.contains(&(q, p)), "edge {p}->{q} has no twin");
        }
        assert_eq!(directed.len(), 60);
    }
}
