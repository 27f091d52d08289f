//! Gesture Globe
//!
//! A gesture-controlled 3D viewer built on wgpu and winit. A procedurally
//! textured planet (or a user-loaded OBJ model) rotates and scales with hand
//! landmarks fed in through a pluggable camera/detector backend, and drifts
//! in a slow idle spin when no hand is present.

pub mod app;
pub mod gesture;
pub mod gfx;
pub mod tracking;
pub mod ui;

pub use app::GlobeApp;

/// Creates a default viewer application instance
pub fn default() -> GlobeApp {
    pollster::block_on(GlobeApp::new())
}
