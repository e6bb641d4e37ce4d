//! glyphgrid desktop: live SDF text editing in a native window.
//!
//! Uses `winit` 0.30 for windowing and input and `glyphgrid-render` for
//! GPU rendering. Type to edit, arrows/Home/End move the caret, Tab cycles
//! the font family, PageUp/PageDown resize the text, the wheel zooms and a
//! left-drag pans.

mod input;
mod state;

use log::{error, info};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition},
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use glyphgrid_render::{GpuContext, RenderError};
use input::{key_action, wheel_pixels, Action};
use state::{AppError, AppState};

/// Winit 0.30 application handler.
struct App {
    window: Option<Arc<Window>>,
    state: Option<AppState>,
    // Left-drag pan tracking.
    dragging: bool,
    last_mouse: (f64, f64),
    shift: bool,
    frame_count: u64,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            state: None,
            dragging: false,
            last_mouse: (0.0, 0.0),
            shift: false,
            frame_count: 0,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn std::error::Error>> {
        let attrs = WindowAttributes::default()
            .with_title("glyphgrid")
            .with_inner_size(LogicalSize::new(1280, 800))
            .with_min_inner_size(LogicalSize::new(400, 300));

        let window = Arc::new(event_loop.create_window(attrs)?);
        let size = window.inner_size();

        let gpu = pollster::block_on(GpuContext::new_with_surface(
            window.clone(),
            size.width.max(1),
            size.height.max(1),
        ))
        .map_err(AppError::from)?;

        let app_state = AppState::new(gpu)?;
        info!(
            "glyphgrid initialized: {}×{}, GPU: {:?}, font: {}",
            size.width,
            size.height,
            app_state.gpu.adapter.get_info().name,
            app_state.session.family()
        );

        window.set_title(&window_title(&app_state));
        window.request_redraw();
        self.state = Some(app_state);
        self.window = Some(window);
        Ok(())
    }
}

fn window_title(state: &AppState) -> String {
    format!(
        "glyphgrid: {} {}px",
        state.session.family(),
        state.session.font_size()
    )
}

fn apply_action(state: &mut AppState, action: Action) {
    match action {
        Action::Edit(event) => state.session.edit(event),
        Action::CycleFamily(step) => {
            if let Err(e) = state.session.cycle_family(step) {
                error!("Font switch failed: {e}");
            }
        }
        Action::FontSize(delta) => state.session.adjust_font_size(delta),
        Action::ResetView => state.session.reset_view(),
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized.
        }
        if let Err(e) = self.init(event_loop) {
            error!("Startup failed: {e}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let (Some(window), Some(state)) = (self.window.as_ref(), self.state.as_mut()) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!(
                    "Window closed after {} frames, final text {:?}",
                    self.frame_count,
                    state.session.editor().text()
                );
                event_loop.exit();
            }

            // ── Keyboard ────────────────────────────────────────
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift = modifiers.state().shift_key();
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                if let Some(action) = key_action(&event.logical_key, event.text.as_deref(), self.shift) {
                    apply_action(state, action);
                    window.set_title(&window_title(state));
                    window.request_redraw();
                }
            }

            // ── Resize ──────────────────────────────────────────
            WindowEvent::Resized(new_size) => {
                state.resize(new_size.width, new_size.height);
                window.request_redraw();
            }

            // ── Left-drag → pan ─────────────────────────────────
            WindowEvent::CursorMoved {
                position: PhysicalPosition { x, y },
                ..
            } => {
                if self.dragging {
                    let dx = x - self.last_mouse.0;
                    let dy = y - self.last_mouse.1;
                    state.session.pan(dx as f32, dy as f32);
                    window.request_redraw();
                }
                self.last_mouse = (x, y);
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = button_state == ElementState::Pressed;
            }

            // ── Wheel → zoom ────────────────────────────────────
            WindowEvent::MouseWheel { delta, .. } => {
                state.session.zoom(wheel_pixels(delta));
                window.request_redraw();
            }

            // ── Redraw ──────────────────────────────────────────
            WindowEvent::RedrawRequested => match state.render_frame() {
                Ok(stats) => {
                    self.frame_count += 1;
                    log::trace!(
                        "Frame {}: {} quads, {} draw call(s)",
                        self.frame_count,
                        stats.quad_count(),
                        stats.draw_calls
                    );
                }
                Err(AppError::Render(RenderError::Surface(
                    wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                ))) => {
                    // Reconfigure surface on lost/outdated.
                    let size = window.inner_size();
                    state.resize(size.width, size.height);
                    window.request_redraw();
                }
                Err(e) => {
                    error!("Render error: {e}");
                }
            },

            _ => {}
        }
    }
}

fn main() -> Result<(), winit::error::EventLoopError> {
    env_logger::init();

    info!("Starting glyphgrid...");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new();
    event_loop.run_app(&mut app)
}
