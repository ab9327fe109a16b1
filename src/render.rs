use anyhow::Result;
use web_sys as web;

use super::worker::SortedBuffers;

// ===================== WebGPU state =====================

/// Per-frame uniforms consumed by the splat pipeline. Layout mirrors the
/// WGSL uniform block (16-byte alignment).
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SplatUniforms {
    pub view: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub box_min: [f32; 3],
    pub viewport_w: f32,
    pub box_max: [f32; 3],
    pub viewport_h: f32,
    pub focal: [f32; 2],
    pub tan_fov: [f32; 2],
    pub scale_modifier: f32,
    pub _pad: [f32; 3],
}

const SPLAT_WGSL: &str = r#"
struct Uniforms {
  view: mat4x4<f32>,
  view_proj: mat4x4<f32>,
  box_min: vec3<f32>,
  viewport_w: f32,
  box_max: vec3<f32>,
  viewport_h: f32,
  focal: vec2<f32>,
  tan_fov: vec2<f32>,
  scale_modifier: f32,
};
@group(0) @binding(0) var<uniform> u: Uniforms;

struct VsOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) color: vec4<f32>,
  @location(1) local: vec2<f32>,
};

@vertex
fn vs_main(
  @location(0) corner: vec2<f32>,
  @location(1) center: vec3<f32>,
  @location(2) color: vec3<f32>,
  @location(3) opacity: f32,
  @location(4) cov_a: vec3<f32>,
  @location(5) cov_b: vec3<f32>,
) -> VsOut {
  var out: VsOut;

  let p_hom = u.view_proj * vec4<f32>(center, 1.0);
  if (p_hom.w <= 0.0) {
    out.pos = vec4<f32>(0.0, 0.0, 2.0, 1.0); // behind the camera: clip away
    return out;
  }
  let p_ndc = p_hom.xyz / p_hom.w;

  // 3D covariance (symmetric, packed in two vec3s), scaled
  let s = u.scale_modifier * u.scale_modifier;
  let vrk = mat3x3<f32>(
    cov_a.x, cov_a.y, cov_a.z,
    cov_a.y, cov_b.x, cov_b.y,
    cov_a.z, cov_b.y, cov_b.z,
  ) * s;

  // EWA projection of the covariance to screen space
  var t = (u.view * vec4<f32>(center, 1.0)).xyz;
  let limx = 1.3 * u.tan_fov.x;
  let limy = 1.3 * u.tan_fov.y;
  t.x = clamp(t.x / t.z, -limx, limx) * t.z;
  t.y = clamp(t.y / t.z, -limy, limy) * t.z;

  let j = mat3x3<f32>(
    u.focal.x / t.z, 0.0, -(u.focal.x * t.x) / (t.z * t.z),
    0.0, u.focal.y / t.z, -(u.focal.y * t.y) / (t.z * t.z),
    0.0, 0.0, 0.0,
  );
  let w = transpose(mat3x3<f32>(u.view[0].xyz, u.view[1].xyz, u.view[2].xyz));
  let tm = w * j;
  var cov2d = transpose(tm) * transpose(vrk) * tm;
  cov2d[0][0] += 0.3;
  cov2d[1][1] += 0.3;

  // Eigen-decomposition of the 2x2 covariance for the quad axes
  let mid = 0.5 * (cov2d[0][0] + cov2d[1][1]);
  let rad = sqrt(max(0.1, mid * mid - (cov2d[0][0] * cov2d[1][1] - cov2d[0][1] * cov2d[0][1])));
  let lambda1 = mid + rad;
  let lambda2 = mid - rad;
  let diag = normalize(vec2<f32>(cov2d[0][1], lambda1 - cov2d[0][0]));
  let major = min(sqrt(2.0 * lambda1), 1024.0) * diag;
  let minor = min(sqrt(2.0 * lambda2), 1024.0) * vec2<f32>(diag.y, -diag.x);

  let viewport = vec2<f32>(u.viewport_w, u.viewport_h);
  let offset = (corner.x * major + corner.y * minor) * 2.0 / viewport;
  out.pos = vec4<f32>(p_ndc.xy + offset, p_ndc.z, 1.0);
  out.color = vec4<f32>(color, opacity);
  out.local = corner * 2.0;
  return out;
}

@fragment
fn fs_main(inf: VsOut) -> @location(0) vec4<f32> {
  let a = -dot(inf.local, inf.local);
  if (a < -4.0) {
    discard;
  }
  let alpha = inf.color.a * exp(a);
  return vec4<f32>(inf.color.rgb * alpha, alpha);
}
"#;

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
    center_vb: wgpu::Buffer,
    color_vb: wgpu::Buffer,
    opacity_vb: wgpu::Buffer,
    cov_a_vb: wgpu::Buffer,
    cov_b_vb: wgpu::Buffer,
    capacity: usize,
    splat_count: usize,
    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement, initial_capacity: usize) -> Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits keep older WebGPU implementations happy
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("splat shader"),
            source: wgpu::ShaderSource::Wgsl(SPLAT_WGSL.into()),
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<SplatUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Quad corners for a 4-vertex triangle strip
        let quad_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quad_vb"),
            size: (std::mem::size_of::<f32>() * 8) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let corners: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];
        queue.write_buffer(&quad_vb, 0, bytemuck::cast_slice(&corners));

        let capacity = initial_capacity.max(1);
        let make_instance_buffer = |label: &str, floats_per_splat: usize| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: (std::mem::size_of::<f32>() * floats_per_splat * capacity) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let center_vb = make_instance_buffer("center_vb", 3);
        let color_vb = make_instance_buffer("color_vb", 3);
        let opacity_vb = make_instance_buffer("opacity_vb", 1);
        let cov_a_vb = make_instance_buffer("cov_a_vb", 3);
        let cov_b_vb = make_instance_buffer("cov_b_vb", 3);

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let corner_attrs = wgpu::vertex_attr_array![0 => Float32x2];
        let center_attrs = wgpu::vertex_attr_array![1 => Float32x3];
        let color_attrs = wgpu::vertex_attr_array![2 => Float32x3];
        let opacity_attrs = wgpu::vertex_attr_array![3 => Float32];
        let cov_a_attrs = wgpu::vertex_attr_array![4 => Float32x3];
        let cov_b_attrs = wgpu::vertex_attr_array![5 => Float32x3];
        let vec3_stride = (std::mem::size_of::<f32>() * 3) as u64;
        let vertex_buffers = [
            // slot 0: quad corners, per-vertex; the rest step per instance
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &corner_attrs,
            },
            wgpu::VertexBufferLayout {
                array_stride: vec3_stride,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &center_attrs,
            },
            wgpu::VertexBufferLayout {
                array_stride: vec3_stride,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &color_attrs,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<f32>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &opacity_attrs,
            },
            wgpu::VertexBufferLayout {
                array_stride: vec3_stride,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &cov_a_attrs,
            },
            wgpu::VertexBufferLayout {
                array_stride: vec3_stride,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &cov_b_attrs,
            },
        ];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("splat pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            // Draw order comes from the worker's depth sort; no depth buffer
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            bind_group,
            quad_vb,
            center_vb,
            color_vb,
            opacity_vb,
            cov_a_vb,
            cov_b_vb,
            capacity,
            splat_count: 0,
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Replace the instance buffers with a freshly sorted set, growing them
    /// when the cloud outgrew the current capacity.
    pub fn upload_sorted(&mut self, buffers: &SortedBuffers) {
        let count = buffers.positions.len() / 3;
        if count > self.capacity {
            self.capacity = count;
            let grow = |label: &str, floats_per_splat: usize| {
                self.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(label),
                    size: (std::mem::size_of::<f32>() * floats_per_splat * count) as u64,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            };
            self.center_vb = grow("center_vb", 3);
            self.color_vb = grow("color_vb", 3);
            self.opacity_vb = grow("opacity_vb", 1);
            self.cov_a_vb = grow("cov_a_vb", 3);
            self.cov_b_vb = grow("cov_b_vb", 3);
        }
        self.queue
            .write_buffer(&self.center_vb, 0, bytemuck::cast_slice(&buffers.positions));
        self.queue
            .write_buffer(&self.color_vb, 0, bytemuck::cast_slice(&buffers.colors));
        self.queue.write_buffer(
            &self.opacity_vb,
            0,
            bytemuck::cast_slice(&buffers.opacities),
        );
        self.queue
            .write_buffer(&self.cov_a_vb, 0, bytemuck::cast_slice(&buffers.cov3da));
        self.queue
            .write_buffer(&self.cov_b_vb, 0, bytemuck::cast_slice(&buffers.cov3db));
        self.splat_count = count;
    }

    pub fn render(
        &mut self,
        uniforms: &SplatUniforms,
        draw_count: usize,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("splat pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        let count = draw_count.min(self.splat_count) as u32;
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_vertex_buffer(1, self.center_vb.slice(..));
        rpass.set_vertex_buffer(2, self.color_vb.slice(..));
        rpass.set_vertex_buffer(3, self.opacity_vb.slice(..));
        rpass.set_vertex_buffer(4, self.cov_a_vb.slice(..));
        rpass.set_vertex_buffer(5, self.cov_b_vb.slice(..));
        rpass.draw(0..4, 0..count);
        drop(rpass);
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
