//! The viewer control panel.
//!
//! The panel only reads state and reports what the user clicked; the app
//! applies the resulting actions after the frame so UI code never mutates
//! the session or scene mid-draw.

use crate::gesture::GestureContext;
use crate::gfx::scene::SceneStatistics;
use crate::tracking::CameraSession;

/// Panel-owned state that persists across frames.
#[derive(Default)]
pub struct PanelState {
    pub model_path: String,
    pub loader_status: String,
}

/// What the user asked for this frame.
#[derive(Default)]
pub struct PanelActions {
    pub toggle_camera: bool,
    pub load_model: Option<String>,
    pub reset_planet: bool,
}

pub fn viewer_panel(
    ui: &imgui::Ui,
    session: &CameraSession,
    ctx: &GestureContext,
    stats: &SceneStatistics,
    state: &mut PanelState,
) -> PanelActions {
    let mut actions = PanelActions::default();

    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return actions;
    }

    ui.window("Gesture Globe")
        .size([320.0, 380.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            render_camera_section(ui, session, &mut actions);
            ui.separator();
            render_gesture_section(ui, ctx);
            ui.separator();
            render_model_section(ui, state, &mut actions);
            ui.separator();
            render_scene_info(ui, stats);
        });

    actions
}

fn render_camera_section(ui: &imgui::Ui, session: &CameraSession, actions: &mut PanelActions) {
    ui.text("Hand Tracking");
    ui.spacing();

    let label = if session.is_running() {
        "Stop Camera"
    } else {
        "Start Camera"
    };
    if ui.button(label) {
        actions.toggle_camera = true;
    }

    ui.same_line();
    ui.text(session.status());
}

fn render_gesture_section(ui: &imgui::Ui, ctx: &GestureContext) {
    ui.text("Gesture");
    ui.spacing();

    ui.columns(2, "gesture_stats", false);
    ui.text("Hand detected:");
    ui.next_column();
    ui.text(if ctx.hand_detected() { "Yes" } else { "No" });
    ui.next_column();

    ui.text("Pinch:");
    ui.next_column();
    match ctx.pinch_readout() {
        Some(pinch) => ui.text(format!("{pinch:.3}")),
        None => ui.text("--"),
    }
    ui.next_column();

    let live = ctx.live();
    ui.text("Yaw / Pitch:");
    ui.next_column();
    ui.text(format!("{:.2} / {:.2}", live.yaw, live.pitch));
    ui.next_column();

    ui.text("Scale:");
    ui.next_column();
    ui.text(format!("{:.2}", live.scale));
    ui.columns(1, "", false);
}

fn render_model_section(ui: &imgui::Ui, state: &mut PanelState, actions: &mut PanelActions) {
    ui.text("Model");
    ui.spacing();

    ui.set_next_item_width(-1.0);
    ui.input_text("##model_path", &mut state.model_path)
        .hint("path/to/model.obj")
        .build();

    if ui.button("Load") && !state.model_path.trim().is_empty() {
        actions.load_model = Some(state.model_path.trim().to_string());
    }

    ui.same_line();
    if ui.button("Reset Planet") {
        actions.reset_planet = true;
    }

    if !state.loader_status.is_empty() {
        ui.spacing();
        ui.text_wrapped(&state.loader_status);
    }
}

fn render_scene_info(ui: &imgui::Ui, stats: &SceneStatistics) {
    ui.text("Scene");
    ui.spacing();

    ui.columns(2, "scene_stats", false);
    ui.text("Objects:");
    ui.next_column();
    ui.text(format!("{}", stats.object_count));
    ui.next_column();
    ui.text("Triangles:");
    ui.next_column();
    ui.text(format!("{}", stats.total_triangles));
    ui.next_column();
    ui.text("Vertices:");
    ui.next_column();
    ui.text(format!("{}", stats.total_vertices));
    ui.columns(1, "", false);
}
