//! ImGui overlay: manager plumbing and the viewer control panel.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{viewer_panel, PanelActions, PanelState};
