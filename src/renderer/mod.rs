//! The lit model pass.
//!
//! [`ModelRenderer`] owns the pipelines, the camera and lighting uniforms,
//! the depth attachment and one vertex/index/material triple per uploaded
//! mesh. Each frame clears the surface (to transparent by default) and draws
//! every mesh with one directional light plus ambient. Blended meshes are
//! drawn last without depth writes.

pub(crate) mod pipeline_util;

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::camera::{Camera, CameraUniform};
use crate::gpu::lighting::Lighting;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::{DepthTexture, ImageTexture};
use crate::model::{AlphaMode, Material, Model, ModelVertex, WrapMode};
use crate::options::{DisplayOptions, Options};

/// Material parameters as laid out in `model.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct MaterialUniform {
    base_color: [f32; 4],
    alpha_cutoff: f32,
    /// 0 opaque, 1 mask, 2 blend.
    alpha_mode: u32,
    _pad: [u32; 2],
}

impl MaterialUniform {
    fn new(material: &Material) -> Self {
        Self {
            base_color: material.base_color,
            alpha_cutoff: material.alpha_cutoff,
            alpha_mode: match material.alpha_mode {
                AlphaMode::Opaque => 0,
                AlphaMode::Mask => 1,
                AlphaMode::Blend => 2,
            },
            _pad: [0; 2],
        }
    }
}

/// GPU buffers for one uploaded mesh.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    material: wgpu::BindGroup,
    blend: bool,
}

/// Draws a loaded [`Model`] into the window surface.
pub struct ModelRenderer {
    pipeline: wgpu::RenderPipeline,
    blend_pipeline: wgpu::RenderPipeline,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    lighting: Lighting,
    material_layout: wgpu::BindGroupLayout,
    depth: DepthTexture,
    meshes: Vec<GpuMesh>,
    clear_color: wgpu::Color,
}

impl ModelRenderer {
    /// Build the pipeline and uniforms for `context`'s surface format.
    #[must_use]
    pub fn new(context: &RenderContext, options: &Options) -> Self {
        let device = &context.device;

        let camera_uniform = CameraUniform::new();
        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let camera_layout = pipeline_util::uniform_layout(
            device,
            "Camera Bind Group Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );
        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
                label: Some("Camera Bind Group"),
            });

        let lighting = Lighting::new(context, &options.lighting);
        let material_layout = pipeline_util::material_layout(device);

        let layouts = [&camera_layout, &lighting.layout, &material_layout];
        let pipeline = create_model_pipeline(context, &layouts, true);
        let blend_pipeline = create_model_pipeline(context, &layouts, false);

        let (width, height) = context.size();
        Self {
            pipeline,
            blend_pipeline,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            lighting,
            material_layout,
            depth: DepthTexture::new(device, width, height),
            meshes: Vec::new(),
            clear_color: clear_color(&options.display),
        }
    }

    /// Replace the drawn model. Meshes without indices are skipped.
    ///
    /// Each image is uploaded once and shared by the meshes that sample
    /// it. Untextured meshes sample a white texel.
    pub fn upload_model(&mut self, context: &RenderContext, model: &Model) {
        let device = &context.device;
        let textures: Vec<ImageTexture> = model
            .images
            .iter()
            .map(|image| ImageTexture::upload(device, &context.queue, image))
            .collect();
        let white = ImageTexture::white(device, &context.queue);
        let mut samplers = HashMap::new();

        let mut meshes = Vec::with_capacity(model.meshes.len());
        for mesh in model.meshes.iter().filter(|m| !m.indices.is_empty()) {
            let texture = mesh.material.base_color_texture;
            let view = texture
                .and_then(|t| textures.get(t.image))
                .map_or(&white.view, |t| &t.view);
            let wrap =
                texture.map(|t| (t.wrap_u, t.wrap_v)).unwrap_or_default();
            let sampler = samplers
                .entry(wrap)
                .or_insert_with(|| create_sampler(device, wrap));
            meshes.push(GpuMesh {
                vertex_buffer: device.create_buffer_init(
                    &wgpu::util::BufferInitDescriptor {
                        label: Some("Model Vertex Buffer"),
                        contents: bytemuck::cast_slice(&mesh.vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    },
                ),
                index_buffer: device.create_buffer_init(
                    &wgpu::util::BufferInitDescriptor {
                        label: Some("Model Index Buffer"),
                        contents: bytemuck::cast_slice(&mesh.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    },
                ),
                index_count: mesh.indices.len() as u32,
                material: self.material_bind_group(
                    device,
                    &mesh.material,
                    view,
                    sampler,
                ),
                blend: mesh.material.alpha_mode == AlphaMode::Blend,
            });
        }
        meshes.sort_by_key(|mesh| mesh.blend);
        self.meshes = meshes;
        log::debug!(
            "uploaded {} meshes, {} textures, {} samplers",
            self.meshes.len(),
            textures.len(),
            samplers.len()
        );
    }

    /// Match the depth attachment to the surface size.
    pub fn resize(&mut self, context: &RenderContext) {
        let size = context.size();
        if self.depth.size() != size {
            self.depth = DepthTexture::new(&context.device, size.0, size.1);
        }
    }

    /// Upload the camera's view-projection.
    pub fn update_camera(&mut self, queue: &wgpu::Queue, camera: &Camera) {
        self.camera_uniform.update_view_proj(camera);
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
    }

    /// Clear and draw one frame.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if no surface texture can be acquired.
    pub fn render(
        &self,
        context: &RenderContext,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Model Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            depth_slice: None,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(self.clear_color),
                                store: wgpu::StoreOp::Store,
                            },
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_bind_group(1, &self.lighting.bind_group, &[]);
            let mut blending = false;
            for mesh in &self.meshes {
                if mesh.blend && !blending {
                    pass.set_pipeline(&self.blend_pipeline);
                    blending = true;
                }
                pass.set_bind_group(2, &mesh.material, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(
                    mesh.index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
        context.submit(encoder);
        frame.present();
        Ok(())
    }

    fn material_bind_group(
        &self,
        device: &wgpu::Device,
        material: &Material,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Material Buffer"),
                contents: bytemuck::cast_slice(&[MaterialUniform::new(
                    material,
                )]),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some("Material Bind Group"),
        })
    }
}

fn address_mode(mode: WrapMode) -> wgpu::AddressMode {
    match mode {
        WrapMode::Repeat => wgpu::AddressMode::Repeat,
        WrapMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
        WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
    }
}

fn create_sampler(
    device: &wgpu::Device,
    (wrap_u, wrap_v): (WrapMode, WrapMode),
) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Model Sampler"),
        address_mode_u: address_mode(wrap_u),
        address_mode_v: address_mode(wrap_v),
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

fn clear_color(display: &DisplayOptions) -> wgpu::Color {
    if display.transparent_background {
        return wgpu::Color::TRANSPARENT;
    }
    let [r, g, b, a] = display.clear_color.map(f64::from);
    wgpu::Color { r, g, b, a }
}

fn create_model_pipeline(
    context: &RenderContext,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    depth_write: bool,
) -> wgpu::RenderPipeline {
    let shader = context.device.create_shader_module(wgpu::include_wgsl!(
        "../../assets/shaders/model.wgsl"
    ));

    let pipeline_layout = context.device.create_pipeline_layout(
        &wgpu::PipelineLayoutDescriptor {
            label: Some("Model Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        },
    );

    context
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(if depth_write {
                "Model Pipeline"
            } else {
                "Model Blend Pipeline"
            }),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[ModelVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &pipeline_util::surface_fragment_targets(
                    context.format(),
                ),
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(pipeline_util::depth_stencil_state(
                depth_write,
            )),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
}
