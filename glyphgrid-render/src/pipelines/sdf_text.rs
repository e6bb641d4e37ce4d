//! SDF text render pipeline: one triangle list for every glyph and the
//! caret, sampled from a single-channel mip-mapped atlas.

use log::debug;
use wgpu::{
    AddressMode, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource, BindingType, BlendState,
    Buffer, BufferBindingType, BufferDescriptor, BufferUsages, ColorTargetState, ColorWrites,
    Device, Extent3d, FilterMode, FragmentState, FrontFace, MultisampleState,
    PipelineCompilationOptions, PipelineLayoutDescriptor, PolygonMode, PrimitiveState,
    PrimitiveTopology, Queue, RenderPass, RenderPipeline, RenderPipelineDescriptor, Sampler,
    SamplerBindingType, SamplerDescriptor, ShaderModuleDescriptor, ShaderStages, Texture,
    TextureDescriptor, TextureDimension, TextureFormat, TextureSampleType, TextureUsages,
    TextureViewDimension, VertexState,
};

use crate::texture::AtlasTexture;
use crate::vertex::{CameraUniform, GlyphVertex, SdfUniform};

/// Initial vertex capacity: 256 quads.
const INITIAL_VERTEX_CAPACITY: usize = 256 * 6;

/// Owns the wgpu pipeline, buffers, atlas texture and bind groups.
pub struct SdfTextPipeline {
    pipeline: RenderPipeline,

    // Geometry.
    vertex_buffer: Buffer,
    vertex_capacity: usize,
    vertex_count: u32,

    // Uniforms (group 0).
    camera_buffer: Buffer,
    sdf_buffer: Buffer,
    uniform_bind_group: BindGroup,

    // Atlas (group 1).
    atlas_bgl: BindGroupLayout,
    atlas_sampler: Sampler,
    atlas_texture: Texture,
    atlas_bind_group: BindGroup,
}

fn create_vertex_buffer(device: &Device, capacity: usize) -> Buffer {
    device.create_buffer(&BufferDescriptor {
        label: Some("sdf_text_vertices"),
        size: (capacity * std::mem::size_of::<GlyphVertex>()) as u64,
        usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_atlas(
    device: &Device,
    layout: &BindGroupLayout,
    sampler: &Sampler,
    size: u32,
    mip_level_count: u32,
) -> (Texture, BindGroup) {
    let texture = device.create_texture(&TextureDescriptor {
        label: Some("sdf_atlas"),
        size: Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        mip_level_count,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: TextureFormat::R8Unorm,
        usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        view_formats: &[],
    });

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: Some("sdf_atlas_bg"),
        layout,
        entries: &[
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::TextureView(&view),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::Sampler(sampler),
            },
        ],
    });

    (texture, bind_group)
}

impl SdfTextPipeline {
    /// Create the pipeline with a blank `atlas_size` atlas (one mip level).
    pub fn new(device: &Device, surface_format: TextureFormat, atlas_size: u32) -> Self {
        // ── Shader ──────────────────────────────────────────────
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("sdf_text_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/sdf_text.wgsl").into()),
        });

        // ── Uniform bind group layout (group 0) ─────────────────
        let uniform_entry = |binding, visibility| BindGroupLayoutEntry {
            binding,
            visibility,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let uniform_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("sdf_text_uniform_bgl"),
            entries: &[
                uniform_entry(0, ShaderStages::VERTEX),
                uniform_entry(1, ShaderStages::FRAGMENT),
            ],
        });

        // ── Atlas bind group layout (group 1) ───────────────────
        let atlas_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("sdf_text_atlas_bgl"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // ── Pipeline ────────────────────────────────────────────
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("sdf_text_pipeline_layout"),
            bind_group_layouts: &[&uniform_bgl, &atlas_bgl],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("sdf_text_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                buffers: &[GlyphVertex::layout()],
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                targets: &[Some(ColorTargetState {
                    format: surface_format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // ── Buffers ─────────────────────────────────────────────
        let vertex_buffer = create_vertex_buffer(device, INITIAL_VERTEX_CAPACITY);

        let camera_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("sdf_text_camera_ub"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sdf_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("sdf_text_params_ub"),
            size: std::mem::size_of::<SdfUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("sdf_text_uniform_bg"),
            layout: &uniform_bgl,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: sdf_buffer.as_entire_binding(),
                },
            ],
        });

        // ── Atlas texture (initially blank) ─────────────────────
        let atlas_sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("sdf_atlas_sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mipmap_filter: FilterMode::Linear,
            ..Default::default()
        });
        let (atlas_texture, atlas_bind_group) =
            create_atlas(device, &atlas_bgl, &atlas_sampler, atlas_size.max(1), 1);

        Self {
            pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            vertex_count: 0,
            camera_buffer,
            sdf_buffer,
            uniform_bind_group,
            atlas_bgl,
            atlas_sampler,
            atlas_texture,
            atlas_bind_group,
        }
    }

    // ───────────────────── Upload ─────────────────────────────────

    /// Upload this frame's vertices, growing the buffer when needed.
    pub fn upload_vertices(&mut self, device: &Device, queue: &Queue, vertices: &[GlyphVertex]) -> u32 {
        if vertices.is_empty() {
            self.vertex_count = 0;
            return 0;
        }

        if vertices.len() > self.vertex_capacity {
            let capacity = vertices.len().next_power_of_two();
            debug!("growing sdf vertex buffer {} -> {capacity}", self.vertex_capacity);
            self.vertex_buffer = create_vertex_buffer(device, capacity);
            self.vertex_capacity = capacity;
        }

        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        self.vertex_count = vertices.len() as u32;
        self.vertex_count
    }

    pub fn upload_camera(&self, queue: &Queue, camera: &CameraUniform) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(camera));
    }

    pub fn upload_sdf(&self, queue: &Queue, params: &SdfUniform) {
        queue.write_buffer(&self.sdf_buffer, 0, bytemuck::bytes_of(params));
    }

    /// Upload every mip level of `atlas`, recreating the texture when its
    /// size or level count changed.
    pub fn upload_atlas(&mut self, device: &Device, queue: &Queue, atlas: &AtlasTexture) {
        let size = atlas.size();
        let mips = atlas.mip_level_count();
        if size != self.atlas_texture.width() || mips != self.atlas_texture.mip_level_count() {
            debug!("recreating sdf atlas texture: {size}x{size}, {mips} mip level(s)");
            let (texture, bind_group) =
                create_atlas(device, &self.atlas_bgl, &self.atlas_sampler, size, mips);
            self.atlas_texture = texture;
            self.atlas_bind_group = bind_group;
        }

        for (level, side, data) in atlas.levels() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &self.atlas_texture,
                    mip_level: level,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                data,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(side), // R8 = 1 byte per pixel
                    rows_per_image: Some(side),
                },
                Extent3d {
                    width: side,
                    height: side,
                    depth_or_array_layers: 1,
                },
            );
        }
    }

    // ───────────────────── Draw ───────────────────────────────────

    /// Record the single draw call for all uploaded vertices.
    pub fn draw<'a>(&'a self, pass: &mut RenderPass<'a>) {
        if self.vertex_count == 0 {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_bind_group(1, &self.atlas_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn vertex_capacity(&self) -> usize {
        self.vertex_capacity
    }

    /// Side length of the bound atlas texture.
    pub fn atlas_size(&self) -> u32 {
        self.atlas_texture.width()
    }

    pub fn atlas_mip_levels(&self) -> u32 {
        self.atlas_texture.mip_level_count()
    }
}
