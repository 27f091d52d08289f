//! Fixed viewer camera and its GPU uniform.
//!
//! The camera never moves; all interaction happens on the content pivot.

use cgmath::{Deg, Matrix4, Point3, SquareMatrix, Vector3};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

pub struct ViewerCamera {
    pub position: Point3<f32>,
    pub aspect: f32,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl ViewerCamera {
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            position: Point3::new(0.0, 0.0, 3.2),
            aspect,
            fovy: Deg(45.0),
            znear: 0.1,
            zfar: 100.0,
            uniform: CameraUniform::new(),
        };
        camera.update_view_proj();
        camera
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(
            self.position,
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        let proj = cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar);
        OPENGL_TO_WGPU_MATRIX * proj * view
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.position.x, self.position.y, self.position.z, 1.0];
        self.uniform.view_proj = self.build_view_projection_matrix().into();
    }

    /// Keeps the projection in step with the window. Zero-sized dimensions
    /// (minimized window) are ignored.
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        self.update_view_proj();
    }
}

/// Camera data as uploaded to the global uniform buffer. The eye position is
/// homogenous to satisfy the 16 byte alignment requirement.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_tracks_camera_position() {
        let camera = ViewerCamera::new(16.0 / 9.0);
        assert_eq!(camera.uniform.view_position, [0.0, 0.0, 3.2, 1.0]);
    }

    #[test]
    fn resize_ignores_zero_dimensions() {
        let mut camera = ViewerCamera::new(2.0);
        camera.resize_projection(0, 600);
        assert_eq!(camera.aspect, 2.0);
        camera.resize_projection(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }
}
