//! Rendering layer: camera, geometry, textures, the scene graph and the
//! wgpu render engine.

pub mod camera;
pub mod geometry;
pub mod planet;
pub mod render_engine;
pub mod scene;
pub mod texture;

pub use camera::{CameraUniform, ViewerCamera};
pub use render_engine::RenderEngine;
pub use scene::{load_obj_content, Scene, SceneGpu};
