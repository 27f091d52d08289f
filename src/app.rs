//! Application shell: window, event loop and the per-frame pipeline.
//!
//! Each redraw runs the same sequence: pump the camera session, tick the
//! gesture context, update the scene, upload transforms and draw with the
//! control panel on top. Panel actions are collected during the draw and
//! applied afterwards, so the UI never mutates the session or scene while
//! a frame is in flight.

use std::sync::Arc;

use log::warn;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::gesture::GestureContext;
use crate::gfx::{load_obj_content, planet, RenderEngine, Scene, ViewerCamera};
use crate::tracking::{CameraSession, FrameSource, HandDetector, NullDetector, UnsupportedCamera};
use crate::ui::{viewer_panel, PanelActions, PanelState, UiManager};

pub struct GlobeApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    session: CameraSession,
    ctx: GestureContext,
    panel_state: PanelState,
}

impl GlobeApp {
    pub async fn new() -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        let scene = Scene::new(ViewerCamera::new(1200.0 / 800.0));
        let session = CameraSession::new(
            Box::new(UnsupportedCamera),
            Box::new(NullDetector),
        );

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                session,
                ctx: GestureContext::new(),
                panel_state: PanelState::default(),
            },
        }
    }

    /// Plugs in a real capture and detection backend. Without this the
    /// session reports "Camera not supported" and the planet idles.
    pub fn set_camera_backend(
        &mut self,
        source: Box<dyn FrameSource>,
        detector: Box<dyn HandDetector>,
    ) {
        self.app_state.session = CameraSession::new(source, detector);
    }

    /// Consumes self and runs the event loop until exit.
    pub fn run(mut self) {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .expect("Failed to run event loop");
    }
}

impl AppState {
    fn apply_panel_actions(&mut self, actions: PanelActions) {
        if actions.toggle_camera {
            if self.session.is_running() {
                self.session.stop(&mut self.ctx);
            } else {
                self.session.start();
            }
        }

        if let Some(path) = actions.load_model {
            match load_obj_content(&path) {
                Ok(objects) => {
                    self.scene.set_content(objects);
                    self.panel_state.loader_status = format!("Loaded {path}");
                }
                Err(err) => {
                    warn!("model load failed: {err:#}");
                    self.panel_state.loader_status = "Failed to load model".to_string();
                }
            }
        }

        if actions.reset_planet {
            self.scene.set_content(planet::create_earth());
            self.panel_state.loader_status.clear();
        }
    }

    fn redraw(&mut self) {
        self.session.poll(&mut self.ctx);
        self.ctx.tick();
        self.scene.update();

        let Some(window) = self.window.as_ref() else {
            return;
        };
        let (Some(render_engine), Some(ui_manager)) =
            (self.render_engine.as_mut(), self.ui_manager.as_mut())
        else {
            return;
        };

        self.scene
            .update_transforms(render_engine.queue(), self.ctx.live());
        render_engine.update(self.scene.camera.uniform);

        let scene = &self.scene;
        let session = &self.session;
        let ctx = &self.ctx;
        let panel_state = &mut self.panel_state;
        let stats = scene.statistics();
        let window_clone = window.clone();
        let mut actions = PanelActions::default();

        render_engine.render_frame_with_ui(scene, |device, queue, encoder, color_attachment| {
            ui_manager.draw(
                device,
                queue,
                encoder,
                &window_clone,
                color_attachment,
                |ui| {
                    actions = viewer_panel(ui, session, ctx, &stats, panel_state);
                },
            );
        });

        self.apply_panel_actions(actions);
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_title("Gesture Globe")
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();
            self.scene.camera.resize_projection(width, height);

            let window_clone = window_handle.clone();
            let render_engine = pollster::block_on(async move {
                RenderEngine::new(window_clone, width, height).await
            });

            self.scene.attach_gpu(render_engine.scene_gpu());
            self.scene.set_content(planet::create_earth());

            let mut ui_manager = UiManager::new(
                render_engine.device(),
                render_engine.queue(),
                render_engine.surface_format(),
                &window_handle,
            );
            ui_manager.update_display_size(width, height);

            self.ui_manager = Some(ui_manager);
            self.render_engine = Some(render_engine);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene.camera.resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
