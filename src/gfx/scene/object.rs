//! Displayable objects: CPU mesh data, GPU resources and draw plumbing.

use std::ops::Range;

use cgmath::Matrix4;
use wgpu::util::DeviceExt;
use wgpu::Device;

use crate::gfx::geometry::GeometryData;
use crate::gfx::texture::{TextureImage, TextureResource};

use super::vertex::Vertex3D;

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
    pub vertex_count: u32,
}

impl Mesh {
    /// Builds a mesh from flat position/normal/uv streams, the layout both
    /// the OBJ importer and the geometry generators produce. An empty or
    /// short UV stream falls back to (0, 0) per vertex.
    pub fn new(positions: &[f32], normals: &[f32], tex_coords: &[f32], indices: Vec<u32>) -> Self {
        let count = positions.len() / 3;
        let mut vertices = Vec::with_capacity(count);
        for i in 0..count {
            let uv = if tex_coords.len() >= (i + 1) * 2 {
                [tex_coords[i * 2], tex_coords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };
            vertices.push(Vertex3D {
                position: [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]],
                normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
                tex_coords: uv,
            });
        }

        Self {
            index_count: indices.len() as u32,
            vertex_count: count as u32,
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    pub fn from_geometry(data: &GeometryData) -> Self {
        let vertices: Vec<Vertex3D> = data
            .vertices
            .iter()
            .zip(data.normals.iter())
            .zip(data.tex_coords.iter())
            .map(|((p, n), uv)| Vertex3D {
                position: *p,
                normal: *n,
                tex_coords: *uv,
            })
            .collect();

        Self {
            index_count: data.indices.len() as u32,
            vertex_count: vertices.len() as u32,
            vertices,
            indices: data.indices.clone(),
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    /// Axis-aligned bounds of the CPU vertex data; `None` for empty meshes.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = self.vertices.first()?;
        let mut min = first.position;
        let mut max = first.position;
        for v in &self.vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(v.position[axis]);
                max[axis] = max[axis].max(v.position[axis]);
            }
        }
        Some((min, max))
    }

    /// Averaged face normals for OBJ files that ship without them.
    pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
        let vertex_count = positions.len() / 3;
        let mut normals = vec![0.0f32; positions.len()];

        for triangle in indices.chunks(3) {
            if triangle.len() < 3 {
                continue;
            }
            let [i0, i1, i2] = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            let p = |i: usize| [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]];
            let (v0, v1, v2) = (p(i0), p(i1), p(i2));

            let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
            let face = [
                edge1[1] * edge2[2] - edge1[2] * edge2[1],
                edge1[2] * edge2[0] - edge1[0] * edge2[2],
                edge1[0] * edge2[1] - edge1[1] * edge2[0],
            ];

            for &idx in &[i0, i1, i2] {
                normals[idx * 3] += face[0];
                normals[idx * 3 + 1] += face[1];
                normals[idx * 3 + 2] += face[2];
            }
        }

        for i in 0..vertex_count {
            let length = (normals[i * 3].powi(2)
                + normals[i * 3 + 1].powi(2)
                + normals[i * 3 + 2].powi(2))
            .sqrt();
            if length > 0.0 {
                normals[i * 3] /= length;
                normals[i * 3 + 1] /= length;
                normals[i * 3 + 2] /= length;
            }
        }

        normals
    }

    fn init_gpu_buffers(&mut self, device: &Device) {
        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.index_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

/// Surface appearance uploaded per object. Matches `MaterialUniform` in
/// `shader.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub roughness: f32,
    pub metalness: f32,
    pub _padding: [f32; 2],
}

impl Default for MaterialUniform {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            roughness: 0.8,
            metalness: 0.0,
            _padding: [0.0; 2],
        }
    }
}

pub struct ObjectGpuResources {
    pub transform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    _material_buffer: wgpu::Buffer,
    _texture: TextureResource,
}

/// One displayable node of the current content: meshes, appearance, an
/// optional per-object spin channel (the cloud layer), and lazily created
/// GPU resources.
pub struct Object {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub material: MaterialUniform,
    /// CPU-side texture image, uploaded on GPU init. `None` renders with
    /// the plain material color.
    pub image: Option<TextureImage>,
    /// Transparent objects draw after opaque ones, without depth writes.
    pub transparent: bool,
    /// Continuous yaw advance per render tick, decoupled from gestures.
    pub spin_rate: f32,
    spin_angle: f32,
    gpu_resources: Option<ObjectGpuResources>,
}

impl Object {
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.into(),
            meshes,
            material: MaterialUniform::default(),
            image: None,
            transparent: false,
            spin_rate: 0.0,
            spin_angle: 0.0,
            gpu_resources: None,
        }
    }

    pub fn with_image(mut self, image: TextureImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_material(mut self, material: MaterialUniform) -> Self {
        self.material = material;
        self
    }

    /// Advances the object's own spin channel by one tick.
    pub fn advance_spin(&mut self) {
        self.spin_angle += self.spin_rate;
    }

    pub fn spin_angle(&self) -> f32 {
        self.spin_angle
    }

    /// Union of all mesh bounds; `None` when every mesh is empty.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut combined: Option<([f32; 3], [f32; 3])> = None;
        for mesh in &self.meshes {
            let Some((min, max)) = mesh.bounds() else {
                continue;
            };
            combined = Some(match combined {
                None => (min, max),
                Some((mut cmin, mut cmax)) => {
                    for axis in 0..3 {
                        cmin[axis] = cmin[axis].min(min[axis]);
                        cmax[axis] = cmax[axis].max(max[axis]);
                    }
                    (cmin, cmax)
                }
            });
        }
        combined
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu_resources.is_some()
    }

    /// Creates vertex/index buffers, uniform buffers and the per-object
    /// bind group. `layout` comes from the render engine's pipeline.
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) {
        for mesh in self.meshes.iter_mut() {
            mesh.init_gpu_buffers(device);
        }

        let identity: Matrix4<f32> = cgmath::SquareMatrix::identity();
        let transform_data: &[f32; 16] = identity.as_ref();
        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Transform Uniform Buffer"),
            contents: bytemuck::cast_slice(transform_data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let material_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material Uniform Buffer"),
            contents: bytemuck::bytes_of(&self.material),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let fallback = TextureImage::solid(1, 1, [255, 255, 255, 255]);
        let image = self.image.as_ref().unwrap_or(&fallback);
        let texture = TextureResource::from_image(device, queue, image, &self.name);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: transform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: material_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        self.gpu_resources = Some(ObjectGpuResources {
            transform_buffer,
            bind_group,
            _material_buffer: material_buffer,
            _texture: texture,
        });
    }

    /// Writes this frame's model matrix to the GPU.
    pub fn update_transform(&self, queue: &wgpu::Queue, model: Matrix4<f32>) {
        if let Some(gpu) = &self.gpu_resources {
            let data: &[f32; 16] = model.as_ref();
            queue.write_buffer(&gpu.transform_buffer, 0, bytemuck::cast_slice(data));
        }
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources.as_ref().map(|gpu| &gpu.bind_group)
    }

    /// Releases every GPU resource this object owns: mesh buffers, uniform
    /// buffers and the texture. Called when content is swapped out so the
    /// replaced object cannot leak GPU memory.
    pub fn release_gpu_resources(&mut self) {
        for mesh in self.meshes.iter_mut() {
            if let Some(buffer) = mesh.vertex_buffer.take() {
                buffer.destroy();
            }
            if let Some(buffer) = mesh.index_buffer.take() {
                buffer.destroy();
            }
        }
        if let Some(gpu) = self.gpu_resources.take() {
            gpu.transform_buffer.destroy();
            gpu._material_buffer.destroy();
            gpu._texture.texture.destroy();
        }
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
    fn draw_object(&mut self, object: &'a Object);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let Some(vertex_buffer) = &mesh.vertex_buffer else {
            return; // not uploaded yet
        };
        let Some(index_buffer) = &mesh.index_buffer else {
            return;
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }

    fn draw_object(&mut self, object: &'b Object) {
        let Some(bind_group) = object.bind_group() else {
            return;
        };
        self.set_bind_group(1, bind_group, &[]);
        for mesh in &object.meshes {
            self.draw_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_bounds_cover_all_vertices() {
        let positions = [-1.0, 0.0, 0.0, 2.0, 3.0, -4.0, 0.5, -0.5, 0.5];
        let normals = [0.0f32; 9];
        let mesh = Mesh::new(&positions, &normals, &[], vec![0, 1, 2]);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, [-1.0, -0.5, -4.0]);
        assert_eq!(max, [2.0, 3.0, 0.5]);
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        let mesh = Mesh::new(&[], &[], &[], vec![]);
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn object_bounds_merge_meshes() {
        let normals = [0.0f32; 3];
        let a = Mesh::new(&[-1.0, 0.0, 0.0], &normals, &[], vec![]);
        let b = Mesh::new(&[0.0, 5.0, 0.0], &normals, &[], vec![]);
        let object = Object::new("pair", vec![a, b]);
        let (min, max) = object.bounds().unwrap();
        assert_eq!(min, [-1.0, 0.0, 0.0]);
        assert_eq!(max, [0.0, 5.0, 0.0]);
    }

    #[test]
    fn face_normals_are_unit_length() {
        // Single triangle in the XY plane, normal should be +Z
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals = Mesh::calculate_face_normals(&positions, &[0, 1, 2]);
        for i in 0..3 {
            assert!((normals[i * 3 + 2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn spin_channel_accumulates() {
        let mut object = Object::new("clouds", vec![]);
        object.spin_rate = 0.0006;
        for _ in 0..10 {
            object.advance_spin();
        }
        assert!((object.spin_angle() - 0.006).abs() < 1e-6);
    }
}
