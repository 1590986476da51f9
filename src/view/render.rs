use tracing::warn;
use wgpu::*;

use crate::config::CLEAR_COLOR;
use crate::utils::{Mesh, MeshBuffer, Vertex};
use crate::view::frame::{LightingUniform, RenderFrame, TransformUniform};
use crate::view::gpu_init::GpuContext;
use crate::view::texture::{create_texture_bind_group_layout, upload_texture, TextureImage, TextureResources};

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

// Transform and lighting uniforms, bind group 0
pub struct UniformResources {
    pub transform_buffer: wgpu::Buffer,
    pub lighting_buffer: wgpu::Buffer,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
}

pub struct PipelineResources {
    pub pipeline: wgpu::RenderPipeline,
    pub wireframe_pipeline: Option<wgpu::RenderPipeline>,
}

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

pub fn create_uniform_resources(device: &wgpu::Device) -> UniformResources {
    let transform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("transform_buffer"),
        size: std::mem::size_of::<TransformUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let lighting_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("lighting_buffer"),
        size: std::mem::size_of::<LightingUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    // Lighting is evaluated per vertex, so both buffers only reach the vertex stage
    let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };
    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("uniform_bind_group_layout"),
        entries: &[uniform_entry(0), uniform_entry(1)],
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("uniform_bind_group"),
        layout: &bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry { binding: 0, resource: transform_buffer.as_entire_binding() },
            wgpu::BindGroupEntry { binding: 1, resource: lighting_buffer.as_entire_binding() },
        ],
    });

    UniformResources { transform_buffer, lighting_buffer, bind_group_layout, bind_group }
}

fn create_mesh_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    polygon_mode: wgpu::PolygonMode,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState { format, blend: Some(wgpu::BlendState::REPLACE), write_mask: wgpu::ColorWrites::ALL })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Negative object scales mirror the mesh and flip its winding
            cull_mode: None,
            polygon_mode,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

pub fn create_mesh_pipelines(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    uniform_layout: &wgpu::BindGroupLayout,
    texture_layout: &wgpu::BindGroupLayout,
) -> PipelineResources {
    let shader_src = include_str!("shaders/gouraud.wgsl");
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("gouraud_shader"),
        source: wgpu::ShaderSource::Wgsl(shader_src.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pipeline_layout"),
        bind_group_layouts: &[uniform_layout, texture_layout],
        push_constant_ranges: &[],
    });

    let pipeline = create_mesh_pipeline(device, &pipeline_layout, &shader, format, PolygonMode::Fill, "fill_pipeline");

    let wireframe_pipeline = if device.features().contains(wgpu::Features::POLYGON_MODE_LINE) {
        Some(create_mesh_pipeline(device, &pipeline_layout, &shader, format, PolygonMode::Line, "wireframe_pipeline"))
    } else {
        None
    };

    PipelineResources { pipeline, wireframe_pipeline }
}

///////////////////////////////////////////////////////////////////////////////

/// Owns every GPU resource the scene pass needs
pub struct Renderer {
    pipelines: PipelineResources,
    uniforms: UniformResources,
    texture: TextureResources,
    mesh: MeshBuffer,
    depth_view: wgpu::TextureView,
    warned_no_wireframe: bool,
}

impl Renderer {
    pub fn new(gpu: &GpuContext, mesh: &Mesh, image: &TextureImage) -> Self {
        let device = gpu.device.as_ref();
        let uniforms = create_uniform_resources(device);
        let texture_layout = create_texture_bind_group_layout(device);
        let texture = upload_texture(device, &gpu.queue, &texture_layout, image);
        let pipelines = create_mesh_pipelines(device, gpu.format, &uniforms.bind_group_layout, &texture_layout);
        let (_, depth_view) = create_depth_texture(device, gpu.config.width, gpu.config.height);

        Self {
            pipelines,
            uniforms,
            texture,
            mesh: mesh.upload(device),
            depth_view,
            warned_no_wireframe: false,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width > 0 && height > 0 {
            let (_, depth_view) = create_depth_texture(device, width, height);
            self.depth_view = depth_view;
        }
    }

    /// Upload this frame's uniforms and record the mesh draw into `encoder`
    pub fn encode_frame(
        &mut self,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        target: &TextureView,
        frame: &RenderFrame,
    ) {
        queue.write_buffer(&self.uniforms.transform_buffer, 0, bytemuck::bytes_of(&frame.transform_uniform()));
        queue.write_buffer(&self.uniforms.lighting_buffer, 0, bytemuck::bytes_of(&frame.lighting_uniform()));

        let active_pipeline = match (&self.pipelines.wireframe_pipeline, frame.wireframe) {
            (Some(wf), true) => wf,
            (None, true) => {
                if !self.warned_no_wireframe {
                    warn!("Wireframe requested but line polygon mode is unavailable");
                    self.warned_no_wireframe = true;
                }
                &self.pipelines.pipeline
            }
            _ => &self.pipelines.pipeline,
        };

        let [r, g, b, a] = CLEAR_COLOR;
        let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("render_pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(Color { r, g, b, a }),
                    store: StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(Operations {
                    load: LoadOp::Clear(1.0),
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        rp.set_pipeline(active_pipeline);
        rp.set_bind_group(0, &self.uniforms.bind_group, &[]);
        rp.set_bind_group(1, &self.texture.bind_group, &[]);
        rp.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
        rp.set_index_buffer(self.mesh.index_buffer.slice(..), IndexFormat::Uint32);
        rp.draw_indexed(0..self.mesh.index_count, 0, 0..1);
    }
}
