use egui::Context;
use glam::Vec3;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::view::GpuContext;

/// Numbers shown in the debug window
#[derive(Debug, Clone, Copy)]
pub struct OverlayStats {
    pub fps: f32,
    pub eye: Vec3,
    pub position: Vec3,
    pub azimuth: f32,
    pub polar: f32,
    pub object_scale: f32,
    pub wireframe: bool,
    pub wireframe_supported: bool,
    pub triangles: usize,
}

/// egui overlay drawn on top of the scene
pub struct Overlay {
    egui_ctx: Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Overlay {
    pub fn new(gpu: &GpuContext, window: &Window) -> Self {
        let egui_ctx = Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.format,
            egui_wgpu::RendererOptions::default(),
        );
        Self { egui_ctx, egui_state, egui_renderer }
    }

    /// Let egui see the event; true when egui wants it for itself
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    /// Build the UI and record its render pass into `encoder`
    pub fn paint(
        &mut self,
        gpu: &GpuContext,
        window: &Window,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        stats: &OverlayStats,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);
        let output = self.egui_ctx.run(raw_input, |ctx| {
            draw_crosshair(ctx);
            draw_debug_window(ctx, stats);
        });
        self.egui_state.handle_platform_output(window, output.platform_output);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        let primitives = self.egui_ctx.tessellate(output.shapes, output.pixels_per_point);

        // Upload egui textures
        for (id, image_delta) in &output.textures_delta.set {
            self.egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(&gpu.device, &gpu.queue, encoder, &primitives, &screen_descriptor);

        {
            let egui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer.render(&mut egui_pass.forget_lifetime(), &primitives, &screen_descriptor);
        }

        // Cleanup egui textures
        for id in &output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn draw_crosshair(ctx: &Context) {
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::TOP, egui::Id::new("crosshair")));
    let center = ctx.available_rect().center();
    let size = 10.0;
    let stroke = egui::Stroke::new(1.0, egui::Color32::DARK_GRAY);
    painter.line_segment(
        [egui::Pos2::new(center.x - size, center.y), egui::Pos2::new(center.x + size, center.y)],
        stroke,
    );
    painter.line_segment(
        [egui::Pos2::new(center.x, center.y - size), egui::Pos2::new(center.x, center.y + size)],
        stroke,
    );
}

fn draw_debug_window(ctx: &Context, stats: &OverlayStats) {
    let small = |text: String| egui::RichText::new(text).small();

    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .default_size([180.0, 120.0])
        .show(ctx, |ui| {
            ui.label(small(format!("FPS: {:.0}", stats.fps)));
            ui.label(small(format!("Eye: {:.2}, {:.2}, {:.2}", stats.eye.x, stats.eye.y, stats.eye.z)));
            ui.label(small(format!(
                "Position: {:.2}, {:.2}, {:.2}",
                stats.position.x, stats.position.y, stats.position.z
            )));
            ui.label(small(format!(
                "Azimuth: {:.1}° Polar: {:.1}°",
                stats.azimuth.to_degrees(),
                stats.polar.to_degrees()
            )));
            ui.label(small(format!("Scale: {:.2}", stats.object_scale)));
            let mode = match (stats.wireframe, stats.wireframe_supported) {
                (false, _) => "fill",
                (true, true) => "wireframe",
                (true, false) => "wireframe (unsupported, fill)",
            };
            ui.label(small(format!("Mode: {mode}")));
            ui.label(small(format!("Triangles: {}", stats.triangles)));
            ui.separator();
            ui.label(small("Controls:".to_string()));
            ui.label(small("Mouse - Look".to_string()));
            ui.label(small("W/S - Forward/Back, A/D - Strafe".to_string()));
            ui.label(small("Q - Rise".to_string()));
            ui.label(small("Space - Wireframe".to_string()));
            ui.label(small("O/P - Shrink/Grow".to_string()));
            ui.label(small("F1 - Hide this window".to_string()));
            ui.label(small("Esc - Quit".to_string()));
        });
}
