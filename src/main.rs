use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

// Import from the library crate
use objwalk::{
    config, logging, ui,
    controller, model, view,
    SceneAssets,
};

use config::{LaunchOptions, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
use controller::input::native;
use controller::{FrameLoop, InputEvent};
use model::KeyResponse;
use objwalk::error::ViewerError;
use ui::{Overlay, OverlayStats};
use view::{GpuContext, Renderer};

/// Everything that needs a live window
struct Viewer {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: Renderer,
    overlay: Overlay,
}

struct App {
    assets: SceneAssets,
    frame_loop: FrameLoop,
    viewer: Option<Viewer>,
    fatal: Option<ViewerError>,
}

impl App {
    fn new(assets: SceneAssets) -> Self {
        Self {
            assets,
            frame_loop: FrameLoop::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            viewer: None,
            fatal: None,
        }
    }

    fn create_viewer(&self, event_loop: &ActiveEventLoop) -> Result<Viewer, ViewerError> {
        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attributes)?);

        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;
        let renderer = Renderer::new(&gpu, &self.assets.mesh, &self.assets.texture);
        let overlay = Overlay::new(&gpu, &window);

        grab_cursor(&window);
        info!(
            width = gpu.config.width,
            height = gpu.config.height,
            textured = self.assets.textured,
            "Viewer window ready"
        );
        Ok(Viewer { window, gpu, renderer, overlay })
    }

    fn handle_input(&mut self, event_loop: &ActiveEventLoop, event: InputEvent) {
        if self.frame_loop.handle_event(&event) == KeyResponse::Exit {
            event_loop.exit();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(viewer) = self.viewer.as_mut() else { return };

        let frame = self.frame_loop.tick();

        let output = match viewer.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                viewer.gpu.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, shutting down");
                event_loop.exit();
                return;
            }
            Err(e) => {
                warn!("Skipping frame: {e:?}");
                return;
            }
        };
        let target = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = viewer.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        viewer.renderer.encode_frame(&viewer.gpu.queue, &mut encoder, &target, &frame);

        let fl = &self.frame_loop;
        if fl.overlay_visible() {
            let stats = OverlayStats {
                fps: fl.timing.fps(),
                eye: fl.pose.eye,
                position: fl.pose.position,
                azimuth: fl.camera.azimuth,
                polar: fl.camera.polar,
                object_scale: fl.toggles.object_scale,
                wireframe: fl.toggles.wireframe,
                wireframe_supported: viewer.gpu.supports_wireframe(),
                triangles: self.assets.mesh.triangle_count(),
            };
            viewer.overlay.paint(&viewer.gpu, &viewer.window, &mut encoder, &target, &stats);
        }

        viewer.gpu.queue.submit(std::iter::once(encoder.finish()));
        viewer.window.pre_present_notify();
        output.present();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }
        match self.create_viewer(event_loop) {
            Ok(viewer) => {
                self.viewer = Some(viewer);
                // Startup time is not part of the first frame
                self.frame_loop.timing.reset();
            }
            Err(e) => {
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(viewer) = self.viewer.as_mut() else { return };
        if window_id != viewer.window.id() {
            return;
        }
        // egui input is only drained while the overlay is painted
        if self.frame_loop.overlay_visible() && viewer.overlay.on_window_event(&viewer.window, &event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                viewer.gpu.resize(size.width, size.height);
                viewer.renderer.resize(&viewer.gpu.device, size.width, size.height);
            }
            WindowEvent::Focused(false) => self.handle_input(event_loop, InputEvent::FocusLost),
            WindowEvent::Focused(true) => grab_cursor(&viewer.window),
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(input) = native::keyboard_event_to_input(&event) {
                    self.handle_input(event_loop, input);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.handle_input(event_loop, native::mouse_motion_to_input(delta));
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(viewer) = &self.viewer {
            viewer.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Release GPU resources before the window goes away
        if let Some(viewer) = self.viewer.take() {
            drop(viewer.overlay);
            drop(viewer.renderer);
            drop(viewer.gpu);
            drop(viewer.window);
        }
        info!("Viewer shut down");
    }
}

/// Hide the cursor and keep it in the window for mouse-look
fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(e) = grabbed {
        warn!("Could not grab cursor: {e}");
    }
    window.set_cursor_visible(false);
}

fn run() -> Result<(), ViewerError> {
    let options = LaunchOptions::parse();
    let config = options.resolve(&mut io::stdin().lock(), &mut io::stdout())?;
    let assets = SceneAssets::load(&config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(assets);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("objwalk: {e}");
            ExitCode::FAILURE
        }
    }
}
