//! Proxy meshes the impostors and labels are drawn on.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;

/// Proxy mesh vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal.
    pub normal: [f32; 3],
    /// Texture coordinate, (0, 0) at the top-left.
    pub texcoord: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
    ];

    /// Per-vertex buffer layout (locations 0-2).
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle list on the CPU.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertices.
    pub vertices: Vec<Vertex>,
    /// Counter-clockwise triangles.
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Cube spanning `[-1, 1]^3` with outward-facing, counter-clockwise
    /// faces. Bounds a unit sphere, or a unit-radius cylinder of half
    /// height 1 along Z.
    #[must_use]
    pub fn cube() -> Self {
        // (normal, u, v) with u x v = normal.
        let faces = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y, Vec3::X),
        ];
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = vertices.len() as u16;
            for (su, sv) in corners {
                vertices.push(Vertex {
                    position: (normal + u * su + v * sv).to_array(),
                    normal: normal.to_array(),
                    texcoord: [(su + 1.0) * 0.5, (1.0 - sv) * 0.5],
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self { vertices, indices }
    }

    /// Quad spanning `[-1, 1]^2` in the XY plane, facing +Z.
    #[must_use]
    pub fn quad() -> Self {
        let vertex = |x: f32, y: f32| Vertex {
            position: [x, y, 0.0],
            normal: [0.0, 0.0, 1.0],
            texcoord: [(x + 1.0) * 0.5, (1.0 - y) * 0.5],
        };
        Self {
            vertices: vec![
                vertex(-1.0, -1.0),
                vertex(1.0, -1.0),
                vertex(1.0, 1.0),
                vertex(-1.0, 1.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }
}

/// A [`Mesh`] uploaded to vertex and index buffers.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    /// Upload `mesh`.
    pub fn new(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertices")),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Indices")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    /// Bind vertex slot 0 and the index buffer.
    pub fn bind<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
    }

    /// Number of indices.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward_ccw(mesh: &Mesh) {
        for tri in mesh.indices.chunks(3) {
            let p = |i: u16| Vec3::from_array(mesh.vertices[i as usize].position);
            let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
            let n = Vec3::from_array(mesh.vertices[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0, "triangle {tri:?} winds inward");
        }
    }

    #[test]
    fn cube_faces_wind_outward() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_outward_ccw(&cube);
    }

    #[test]
    fn cube_bounds_unit_sphere() {
        for v in Mesh::cube().vertices {
            for c in v.position {
                assert_eq!(c.abs(), 1.0);
            }
        }
    }

    #[test]
    fn quad_faces_viewer() {
        let quad = Mesh::quad();
        assert_outward_ccw(&quad);
        assert_eq!(quad.vertices[3].texcoord, [0.0, 0.0]);
        assert_eq!(quad.vertices[1].texcoord, [1.0, 1.0]);
    }
}
