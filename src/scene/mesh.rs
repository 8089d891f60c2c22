//! Static geometry: the unit cube and the ground quad.

use glam::Vec3;

/// Position + normal vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space unit normal.
    pub normal: [f32; 3],
}

const MESH_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

/// Vertex layout for slot 0 of the mesh pipelines.
pub fn mesh_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<MeshVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &MESH_ATTRIBUTES,
    }
}

/// Append a quad with outward normal `normal`, spanned by `u` and `v`
/// (`u x v = normal`), as two counter-clockwise triangles.
fn push_face(out: &mut Vec<MeshVertex>, center: Vec3, normal: Vec3, u: Vec3, v: Vec3) {
    let corners = [
        center - u - v,
        center + u - v,
        center + u + v,
        center - u + v,
    ];
    for i in [0, 1, 2, 0, 2, 3] {
        out.push(MeshVertex {
            position: corners[i].to_array(),
            normal: normal.to_array(),
        });
    }
}

/// Cube spanning `[-1, 1]^3`: 36 vertices, counter-clockwise outward.
pub fn cube_vertices() -> Vec<MeshVertex> {
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];
    let mut out = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        push_face(&mut out, normal, normal, u, v);
    }
    out
}

/// Upward-facing ground square of half-extent `half_size` at y = 0.
pub fn ground_vertices(half_size: f32) -> Vec<MeshVertex> {
    let mut out = Vec::with_capacity(6);
    push_face(
        &mut out,
        Vec3::ZERO,
        Vec3::Y,
        Vec3::Z * half_size,
        Vec3::X * half_size,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangles(vertices: &[MeshVertex]) -> impl Iterator<Item = (Vec3, Vec3, Vec3, Vec3)> + '_ {
        vertices.chunks(3).map(|t| {
            (
                Vec3::from_array(t[0].position),
                Vec3::from_array(t[1].position),
                Vec3::from_array(t[2].position),
                Vec3::from_array(t[0].normal),
            )
        })
    }

    #[test]
    fn cube_has_twelve_outward_ccw_triangles() {
        let cube = cube_vertices();
        assert_eq!(cube.len(), 36);
        for (a, b, c, n) in triangles(&cube) {
            let winding = (b - a).cross(c - a);
            assert!(winding.dot(n) > 0.0);
            // Every vertex lies on the face plane.
            assert!((a.dot(n) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn cube_spans_unit_extent() {
        for v in cube_vertices() {
            for c in v.position {
                assert_eq!(c.abs(), 1.0);
            }
        }
    }

    #[test]
    fn ground_faces_up_and_is_flat() {
        let ground = ground_vertices(100.0);
        assert_eq!(ground.len(), 6);
        for (a, b, c, n) in triangles(&ground) {
            assert_eq!(n, Vec3::Y);
            assert!((b - a).cross(c - a).dot(Vec3::Y) > 0.0);
            assert_eq!(a.y, 0.0);
        }
        let max_x = ground.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert_eq!(max_x, 100.0);
    }
}
