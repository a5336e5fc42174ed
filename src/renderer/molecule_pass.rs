//! Pipelines, uniforms and instance buffers for the molecule geometry.
//!
//! One shader (`molecule.wgsl`) serves four pipelines: opaque impostors,
//! alpha-blended labels, WBOIT accumulation and identity-color picking.

use wgpu::util::DeviceExt;

use super::instance::InstanceRecord;
use super::lighting::LightingUniform;
use super::mesh::{GpuMesh, Mesh, Vertex};
use super::picking::{Picking, PICKING_FORMAT};
use super::wboit::WboitPass;
use crate::camera::core::FrameUniform;
use crate::error::MolvisError;
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::font_atlas::{atlas_bind_group_layout, AtlasTexture};
use crate::gpu::pipeline_helpers::{depth_stencil_state, uniform_buffer};
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::RenderTarget;
use crate::options::LightingOptions;
use crate::scene::instances::InstanceBatches;
use crate::scene::labels::FontAtlas;

const INITIAL_INSTANCES: usize = 64;

/// Per-pipeline fixed-function choices.
struct PipelineSpec<'a> {
    label: &'a str,
    fragment_entry: &'a str,
    targets: &'a [Option<wgpu::ColorTargetState>],
    cull_mode: Option<wgpu::Face>,
    depth_write: bool,
}

/// GPU state for drawing atoms, bonds, halos and labels.
pub struct MoleculePass {
    frame_buffer: wgpu::Buffer,
    picking_frame_buffer: wgpu::Buffer,
    lighting_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    picking_bind_group: wgpu::BindGroup,

    atlas_layout: wgpu::BindGroupLayout,
    atlas: AtlasTexture,

    opaque_pipeline: wgpu::RenderPipeline,
    label_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    picking_pipeline: wgpu::RenderPipeline,

    cube: GpuMesh,
    quad: GpuMesh,

    opaque: TypedBuffer<InstanceRecord>,
    transparent: TypedBuffer<InstanceRecord>,
    labels: TypedBuffer<InstanceRecord>,
    picking: TypedBuffer<InstanceRecord>,

    depth: RenderTarget,
}

impl MoleculePass {
    /// Build every pipeline against `surface_format`.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::Shader`] if the molecule shader fails to
    /// compose.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        composer: &mut ShaderComposer,
        surface_format: wgpu::TextureFormat,
        size: (u32, u32),
    ) -> Result<Self, MolvisError> {
        let stages = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Layout"),
            entries: &[uniform_buffer(0, stages), uniform_buffer(1, stages)],
        });
        let atlas_layout = atlas_bind_group_layout(device);

        let frame_buffer = create_uniform(device, "Frame Uniform", &FrameUniform::default());
        let picking_frame_buffer =
            create_uniform(device, "Picking Frame Uniform", &FrameUniform::default());
        let lighting_buffer = create_uniform(
            device,
            "Lighting Uniform",
            &LightingUniform::from(&LightingOptions::default()),
        );
        let frame_bind_group =
            create_frame_bind_group(device, &frame_layout, &frame_buffer, &lighting_buffer);
        let picking_bind_group = create_frame_bind_group(
            device,
            &frame_layout,
            &picking_frame_buffer,
            &lighting_buffer,
        );

        let shader = composer.compose(device, Shader::Molecule)?;
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Molecule Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &atlas_layout],
            push_constant_ranges: &[],
        });

        let opaque_pipeline = create_pipeline(
            device,
            &layout,
            &shader,
            &PipelineSpec {
                label: "Molecule Opaque",
                fragment_entry: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                cull_mode: Some(wgpu::Face::Front),
                depth_write: true,
            },
        );
        let label_pipeline = create_pipeline(
            device,
            &layout,
            &shader,
            &PipelineSpec {
                label: "Molecule Labels",
                fragment_entry: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                cull_mode: None,
                depth_write: false,
            },
        );
        let transparent_pipeline = create_pipeline(
            device,
            &layout,
            &shader,
            &PipelineSpec {
                label: "Molecule Transparent",
                fragment_entry: "fs_transparent",
                targets: &WboitPass::accumulation_targets(),
                cull_mode: Some(wgpu::Face::Front),
                depth_write: false,
            },
        );
        let picking_pipeline = create_pipeline(
            device,
            &layout,
            &shader,
            &PipelineSpec {
                label: "Molecule Picking",
                fragment_entry: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: PICKING_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                cull_mode: Some(wgpu::Face::Front),
                depth_write: true,
            },
        );

        let instances = |label| {
            TypedBuffer::with_capacity(
                device,
                label,
                INITIAL_INSTANCES,
                wgpu::BufferUsages::VERTEX,
            )
        };

        Ok(Self {
            frame_buffer,
            picking_frame_buffer,
            lighting_buffer,
            frame_bind_group,
            picking_bind_group,
            atlas: AtlasTexture::new(device, queue, &atlas_layout, None),
            atlas_layout,
            opaque_pipeline,
            label_pipeline,
            transparent_pipeline,
            picking_pipeline,
            cube: GpuMesh::new(device, "Impostor Cube", &Mesh::cube()),
            quad: GpuMesh::new(device, "Label Quad", &Mesh::quad()),
            opaque: instances("Opaque Instances"),
            transparent: instances("Transparent Instances"),
            labels: instances("Label Instances"),
            picking: instances("Picking Instances"),
            depth: RenderTarget::depth(device, "Scene Depth", size),
        })
    }

    /// Recreate the depth target.
    pub fn resize(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        self.depth = RenderTarget::depth(device, "Scene Depth", size);
    }

    /// Depth target size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.depth.size()
    }

    /// Upload the frame uniforms for the visible and picking passes.
    pub fn write_frame(&self, queue: &wgpu::Queue, normal: &FrameUniform, picking: &FrameUniform) {
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(normal));
        queue.write_buffer(&self.picking_frame_buffer, 0, bytemuck::bytes_of(picking));
    }

    /// Upload the lighting uniform.
    pub fn write_lighting(&self, queue: &wgpu::Queue, lighting: &LightingUniform) {
        queue.write_buffer(&self.lighting_buffer, 0, bytemuck::bytes_of(lighting));
    }

    /// Upload all instance batches.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, batches: &InstanceBatches) {
        let _ = self.opaque.write(device, queue, &batches.opaque);
        let _ = self.transparent.write(device, queue, &batches.transparent);
        let _ = self.labels.write(device, queue, &batches.labels);
        let _ = self.picking.write(device, queue, &batches.picking);
        log::debug!(
            "instances uploaded: {} opaque, {} transparent, {} labels",
            batches.opaque.len(),
            batches.transparent.len(),
            batches.labels.len()
        );
    }

    /// Replace the glyph atlas (or restore the placeholder).
    pub fn set_atlas(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, atlas: Option<&FontAtlas>) {
        self.atlas = AtlasTexture::new(device, queue, &self.atlas_layout, atlas);
    }

    /// Whether a host atlas is bound.
    pub fn has_atlas(&self) -> bool {
        self.atlas.is_loaded()
    }

    /// Whether the accumulation and composite passes have work.
    pub fn has_transparent(&self) -> bool {
        !self.transparent.is_empty()
    }

    /// Clear `target` to `background` and draw opaque impostors, then labels.
    pub fn draw_opaque(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        background: wgpu::Color,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Opaque Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(background),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(depth_attachment(
                &self.depth.view,
                wgpu::LoadOp::Clear(1.0),
            )),
            ..Default::default()
        });
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        pass.set_bind_group(1, self.atlas.bind_group(), &[]);

        if !self.opaque.is_empty() {
            pass.set_pipeline(&self.opaque_pipeline);
            draw_instances(&mut pass, &self.cube, &self.opaque);
        }
        if !self.labels.is_empty() && self.atlas.is_loaded() {
            pass.set_pipeline(&self.label_pipeline);
            draw_instances(&mut pass, &self.quad, &self.labels);
        }
    }

    /// Accumulate transparent instances into the WBOIT targets, testing
    /// against the opaque depth.
    pub fn draw_transparent(&self, encoder: &mut wgpu::CommandEncoder, wboit: &WboitPass) {
        let color_attachments = wboit.accumulation_attachments();
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Transparent Pass"),
            color_attachments: &color_attachments,
            depth_stencil_attachment: Some(depth_attachment(&self.depth.view, wgpu::LoadOp::Load)),
            ..Default::default()
        });
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        pass.set_bind_group(1, self.atlas.bind_group(), &[]);
        pass.set_pipeline(&self.transparent_pipeline);
        draw_instances(&mut pass, &self.cube, &self.transparent);
    }

    /// Render identity colors of every pickable atom.
    pub fn draw_picking(&self, encoder: &mut wgpu::CommandEncoder, picking: &Picking) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Picking Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: picking.color_view(),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(depth_attachment(
                picking.depth_view(),
                wgpu::LoadOp::Clear(1.0),
            )),
            ..Default::default()
        });
        if self.picking.is_empty() {
            return;
        }
        pass.set_bind_group(0, &self.picking_bind_group, &[]);
        pass.set_bind_group(1, self.atlas.bind_group(), &[]);
        pass.set_pipeline(&self.picking_pipeline);
        draw_instances(&mut pass, &self.cube, &self.picking);
    }
}

fn draw_instances<'a>(
    pass: &mut wgpu::RenderPass<'a>,
    mesh: &'a GpuMesh,
    instances: &'a TypedBuffer<InstanceRecord>,
) {
    mesh.bind(pass);
    pass.set_vertex_buffer(1, instances.slice());
    pass.draw_indexed(0..mesh.index_count(), 0, 0..instances.count() as u32);
}

fn depth_attachment(
    view: &wgpu::TextureView,
    load: wgpu::LoadOp<f32>,
) -> wgpu::RenderPassDepthStencilAttachment<'_> {
    wgpu::RenderPassDepthStencilAttachment {
        view,
        depth_ops: Some(wgpu::Operations {
            load,
            store: wgpu::StoreOp::Store,
        }),
        stencil_ops: None,
    }
}

fn create_uniform<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, value: &T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(value),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn create_frame_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    frame: &wgpu::Buffer,
    lighting: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Frame Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: frame.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: lighting.as_entire_binding(),
            },
        ],
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    spec: &PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", spec.label)),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout(), InstanceRecord::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(spec.fragment_entry),
            targets: spec.targets,
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: spec.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(depth_stencil_state(spec.depth_write)),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
