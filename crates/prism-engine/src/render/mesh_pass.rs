use wgpu::util::DeviceExt;

use crate::geometry::{Mesh, MeshVertex};
use crate::render::RenderCtx;
use crate::transform::MvpUniform;

use super::texture::TextureImage;

/// Background behind the mesh.
pub const MESH_CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

/// Draws one immutable textured mesh.
///
/// CPU data (mesh, texture pixels) is handed over at construction; GPU
/// resources are created by [`prepare`](Self::prepare), or lazily on the first
/// [`draw`](Self::draw), and reused after. The pipeline is rebuilt only if the
/// surface format changes.
pub struct MeshPass {
    mesh: Mesh,
    image: TextureImage,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    bind_group: Option<wgpu::BindGroup>,
    uniform_buffer: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,
    texture_view: Option<wgpu::TextureView>,

    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
}

impl MeshPass {
    pub fn new(mesh: Mesh, image: TextureImage) -> Self {
        Self {
            mesh,
            image,
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            uniform_buffer: None,
            sampler: None,
            texture_view: None,
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    /// Creates every GPU resource up front.
    ///
    /// Fails if the texture does not fit the device; call during setup so the
    /// failure surfaces before any frame is drawn.
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>) -> anyhow::Result<()> {
        self.image.check_fits(&ctx.device.limits())?;

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        Ok(())
    }

    /// Uploads `uniform`, then records a pass that clears `view` and draws the
    /// whole index buffer.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        uniform: &MvpUniform,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);

        let Some(uniform_buffer) = self.uniform_buffer.as_ref() else { return };
        ctx.queue.write_buffer(uniform_buffer, 0, bytemuck::bytes_of(uniform));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(vertex_buffer) = self.vertex_buffer.as_ref() else { return };
        let Some(index_buffer) = self.index_buffer.as_ref() else { return };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("prism mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(MESH_CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vertex_buffer.slice(..));
        rpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..self.mesh.index_count(), 0, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("prism texmesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/texmesh.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("prism texmesh bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: wgpu::BufferSize::new(MvpUniform::SIZE),
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                    ],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("prism texmesh pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("prism texmesh pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[MeshVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Closed convex mesh: back-face culling alone resolves visibility,
            // so there is no depth attachment.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        // Texture format follows the surface format.
        self.bind_group = None;
        self.texture_view = None;
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.vertex_buffer.is_some() && self.index_buffer.is_some() {
            return;
        }

        self.vertex_buffer = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("prism icosphere vbo"),
            contents: self.mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.index_buffer = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("prism icosphere ibo"),
            contents: &self.mesh.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let uniform_buffer = self.uniform_buffer.get_or_insert_with(|| {
            ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("prism mvp ubo"),
                size: MvpUniform::SIZE,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        let sampler = self.sampler.get_or_insert_with(|| {
            ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("prism mesh sampler"),
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            })
        });

        let image = &self.image;
        if self.texture_view.is_none() {
            if let Err(err) = image.check_fits(&ctx.device.limits()) {
                log::error!("mesh texture not uploaded: {err:#}");
                return;
            }
        }
        let texture_view = self.texture_view.get_or_insert_with(|| {
            image
                .upload(ctx.device, ctx.queue, ctx.surface_format)
                .create_view(&wgpu::TextureViewDescriptor::default())
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("prism texmesh bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(texture_view),
                },
            ],
        });

        self.bind_group = Some(bind_group);
    }
}
