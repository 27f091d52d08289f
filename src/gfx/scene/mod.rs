//! Scene graph: a pivot driven by the live transform, exactly one content
//! group under it, and the content loader that swaps groups safely.

pub mod object;
pub mod vertex;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use cgmath::{Matrix4, Rad, Vector3};
use log::info;

use crate::gesture::LiveTransform;
use crate::gfx::camera::ViewerCamera;

pub use object::{Mesh, Object};

/// Largest bounding-box dimension of installed content, in world units.
pub const CONTENT_TARGET_SIZE: f32 = 1.4;

/// GPU handles the scene needs to upload content created after startup.
pub struct SceneGpu {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub object_layout: wgpu::BindGroupLayout,
}

pub struct Scene {
    pub camera: ViewerCamera,
    content: Vec<Object>,
    /// Bounding-box center of the installed content, subtracted to recenter
    /// it at the origin.
    content_center: Vector3<f32>,
    /// Uniform scale normalizing the content to [`CONTENT_TARGET_SIZE`].
    content_scale: f32,
    objects_disposed: usize,
    gpu: Option<SceneGpu>,
}

impl Scene {
    pub fn new(camera: ViewerCamera) -> Self {
        Self {
            camera,
            content: Vec::new(),
            content_center: Vector3::new(0.0, 0.0, 0.0),
            content_scale: 1.0,
            objects_disposed: 0,
            gpu: None,
        }
    }

    /// Hooks up GPU handles once the render engine exists and uploads any
    /// content installed before that.
    pub fn attach_gpu(&mut self, gpu: SceneGpu) {
        for object in self.content.iter_mut() {
            object.init_gpu_resources(&gpu.device, &gpu.queue, &gpu.object_layout);
        }
        self.gpu = Some(gpu);
    }

    /// Swaps the displayed content group.
    ///
    /// The previous group's GPU resources are released (exactly once per
    /// object) before the new group is installed. The new group is
    /// recentered on its bounding-box center and uniformly scaled so its
    /// largest dimension spans [`CONTENT_TARGET_SIZE`]; degenerate bounds
    /// keep scale 1 so nothing divides by zero.
    pub fn set_content(&mut self, mut objects: Vec<Object>) {
        for mut old in self.content.drain(..) {
            old.release_gpu_resources();
            self.objects_disposed += 1;
        }

        let (center, scale) = normalize_bounds(&objects);
        self.content_center = center;
        self.content_scale = scale;

        if let Some(gpu) = &self.gpu {
            for object in objects.iter_mut() {
                object.init_gpu_resources(&gpu.device, &gpu.queue, &gpu.object_layout);
            }
        }
        self.content = objects;
    }

    /// Per-tick bookkeeping: camera uniform refresh and overlay spins. The
    /// overlay spin is deliberately independent of gesture state.
    pub fn update(&mut self) {
        self.camera.update_view_proj();
        for object in self.content.iter_mut() {
            object.advance_spin();
        }
    }

    /// Writes each content object's model matrix for the given pivot pose.
    pub fn update_transforms(&self, queue: &wgpu::Queue, live: &LiveTransform) {
        let pivot = Matrix4::from_angle_x(Rad(live.pitch))
            * Matrix4::from_angle_y(Rad(live.yaw))
            * Matrix4::from_scale(live.scale);
        let normalize =
            Matrix4::from_scale(self.content_scale) * Matrix4::from_translation(-self.content_center);

        for object in &self.content {
            let model = pivot * normalize * Matrix4::from_angle_y(Rad(object.spin_angle()));
            object.update_transform(queue, model);
        }
    }

    pub fn content(&self) -> &[Object] {
        &self.content
    }

    pub fn content_scale(&self) -> f32 {
        self.content_scale
    }

    pub fn content_center(&self) -> Vector3<f32> {
        self.content_center
    }

    pub fn statistics(&self) -> SceneStatistics {
        let total_triangles = self
            .content
            .iter()
            .map(|obj| obj.meshes.iter().map(|m| m.index_count / 3).sum::<u32>())
            .sum();
        let total_vertices = self
            .content
            .iter()
            .map(|obj| obj.meshes.iter().map(|m| m.vertex_count).sum::<u32>())
            .sum();

        SceneStatistics {
            object_count: self.content.len(),
            objects_disposed: self.objects_disposed,
            total_triangles,
            total_vertices,
        }
    }
}

/// Bounding-box center and normalization scale for a content group.
fn normalize_bounds(objects: &[Object]) -> (Vector3<f32>, f32) {
    let mut combined: Option<([f32; 3], [f32; 3])> = None;
    for object in objects {
        let Some((min, max)) = object.bounds() else {
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

    let Some((min, max)) = combined else {
        return (Vector3::new(0.0, 0.0, 0.0), 1.0);
    };

    let center = Vector3::new(
        (min[0] + max[0]) * 0.5,
        (min[1] + max[1]) * 0.5,
        (min[2] + max[2]) * 0.5,
    );
    let max_dim = (max[0] - min[0]).max(max[1] - min[1]).max(max[2] - min[2]);
    let scale = if max_dim > 0.0 {
        CONTENT_TARGET_SIZE / max_dim
    } else {
        1.0
    };
    (center, scale)
}

/// Imports an OBJ file (with MTL materials where present) as a content
/// group. Fails without side effects, so a broken file never replaces what
/// is on screen.
pub fn load_obj_content(path: impl AsRef<Path>) -> anyhow::Result<Vec<Object>> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("failed to load model {}", path.display()))?;

    let materials = materials.unwrap_or_default();

    let mut objects = Vec::with_capacity(models.len());
    for (i, model) in models.iter().enumerate() {
        let mesh = &model.mesh;
        if mesh.positions.is_empty() {
            continue;
        }

        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals.clone()
        } else {
            Mesh::calculate_face_normals(&mesh.positions, &mesh.indices)
        };

        let name = if model.name.is_empty() {
            format!("model_{i}")
        } else {
            model.name.clone()
        };

        let mut object = Object::new(
            name,
            vec![Mesh::new(
                &mesh.positions,
                &normals,
                &mesh.texcoords,
                mesh.indices.clone(),
            )],
        );

        if let Some(mtl) = mesh.material_id.and_then(|id| materials.get(id)) {
            let diffuse = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);
            let alpha = mtl.dissolve.unwrap_or(1.0);
            object.material.base_color = [diffuse[0], diffuse[1], diffuse[2], alpha];
            // MTL shininess maps inversely onto roughness
            object.material.roughness =
                1.0 - (mtl.shininess.unwrap_or(32.0) / 128.0).clamp(0.0, 1.0);
            object.transparent = alpha < 1.0;
        }

        objects.push(object);
    }

    info!(
        "imported {} object(s) from {}",
        objects.len(),
        path.display()
    );
    Ok(objects)
}

/// Scene statistics for the UI and tests.
#[derive(Debug)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub objects_disposed: usize,
    pub total_triangles: u32,
    pub total_vertices: u32,
}
