use crate::camera::ViewCamera;
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use mediawall_common::{Color, ItemId, PANEL_DEPTH, PANEL_HEIGHT, PANEL_WIDTH};
use mediawall_kernel::{FrameSnapshot, PanelFrame};
use mediawall_layout::WallLayout;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Scene clear colour, #191920.
const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.098,
    g: 0.098,
    b: 0.125,
    a: 1.0,
};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GridVertex {
    position: [f32; 3],
    color: [f32; 4],
}

/// One box to draw: a unit cube transformed by `model`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelBox {
    pub model: Mat4,
    pub color: [f32; 4],
    pub unlit: bool,
}

impl From<&PanelBox> for InstanceData {
    fn from(b: &PanelBox) -> Self {
        let cols = b.model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: b.color,
            params: [if b.unlit { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

/// Unit box centred on the origin, one quad per face.
fn box_mesh() -> (Vec<Vertex>, Vec<u16>) {
    // (normal, u, v) with u x v == normal, so corners below wind counter-clockwise.
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u16;
        for (su, sv) in [(-1.0_f32, -1.0_f32), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = (normal + u * su + v * sv) * 0.5;
            vertices.push(Vertex {
                position: corner.to_array(),
                normal: normal.to_array(),
            });
        }
        indices.extend([0, 1, 2, 2, 3, 0].map(|i| base + i));
    }
    (vertices, indices)
}

/// Placeholder tint for an image plate, stable per item.
fn image_tint(id: ItemId, zoom: f32) -> Color {
    let bytes = id.0.as_bytes();
    let channel = |b: u8| 0.35 + 0.5 * (b as f32 / 255.0);
    // Zoom drifts between 1.5 and 2.5; show it as a slow brightness swell.
    let swell = 0.85 + 0.15 * (zoom - 2.0).clamp(-0.5, 0.5) * 2.0;
    Color(Vec3::new(channel(bytes[0]), channel(bytes[1]), channel(bytes[2])) * swell)
}

fn panel_boxes(frame_model: Mat4, panel: &PanelFrame, out: &mut Vec<PanelBox>) {
    out.push(PanelBox {
        model: frame_model,
        color: Color::FRAME.to_array(1.0),
        unlit: false,
    });
    // Children are placed in the frame's scaled space.
    let border = frame_model
        * Mat4::from_scale_rotation_translation(
            Vec3::new(0.9, 0.93, 0.9),
            Quat::IDENTITY,
            Vec3::new(0.0, 0.0, 0.2),
        );
    out.push(PanelBox {
        model: border,
        color: panel.border.to_array(1.0),
        unlit: true,
    });
    let image = frame_model
        * Mat4::from_scale_rotation_translation(
            Vec3::new(panel.image_scale.x, panel.image_scale.y, 0.05),
            Quat::IDENTITY,
            Vec3::new(0.0, 0.0, 0.7),
        );
    out.push(PanelBox {
        model: image,
        color: image_tint(panel.id, panel.zoom).to_array(1.0),
        unlit: true,
    });
}

/// Boxes for every panel in `frame`, three per panel: frame, border, image.
pub fn panel_instances(frame: &FrameSnapshot, layout: &WallLayout) -> Vec<PanelBox> {
    let mut out = Vec::with_capacity(frame.panels.len() * 3);
    for panel in &frame.panels {
        let Some(pose) = layout.item_pose(panel.index) else {
            continue;
        };
        let frame_model = Mat4::from_rotation_translation(pose.rotation, pose.position)
            * Mat4::from_scale_rotation_translation(
                Vec3::new(PANEL_WIDTH, PANEL_HEIGHT, PANEL_DEPTH),
                Quat::IDENTITY,
                Vec3::new(0.0, PANEL_HEIGHT * 0.5, 0.0),
            );
        panel_boxes(frame_model, panel, &mut out);
    }
    out
}

/// Floor grid lines at height `y`.
fn grid_mesh(half_extent: i32, spacing: f32, y: f32) -> Vec<GridVertex> {
    let mut verts = Vec::new();
    let color = [0.22, 0.22, 0.26, 1.0];
    let extent = half_extent as f32 * spacing;

    for i in -half_extent..=half_extent {
        let offset = i as f32 * spacing;
        verts.push(GridVertex {
            position: [-extent, y, offset],
            color,
        });
        verts.push(GridVertex {
            position: [extent, y, offset],
            color,
        });
        verts.push(GridVertex {
            position: [offset, y, -extent],
            color,
        });
        verts.push(GridVertex {
            position: [offset, y, extent],
            color,
        });
    }
    verts
}

/// Shared pieces of both wall pipelines.
struct Stage<'a> {
    device: &'a wgpu::Device,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    format: wgpu::TextureFormat,
}

impl Stage<'_> {
    fn pipeline(
        &self,
        label: &str,
        (vs, fs): (&str, &str),
        buffers: &[wgpu::VertexBufferLayout<'_>],
        primitive: wgpu::PrimitiveState,
    ) -> wgpu::RenderPipeline {
        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(self.layout),
                vertex: wgpu::VertexState {
                    module: self.shader,
                    entry_point: Some(vs),
                    compilation_options: Default::default(),
                    buffers,
                },
                fragment: Some(wgpu::FragmentState {
                    module: self.shader,
                    entry_point: Some(fs),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive,
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
    }
}

/// wgpu renderer for wall frames.
pub struct WgpuRenderer {
    panel_pipeline: wgpu::RenderPipeline,
    grid_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    box_vertex_buffer: wgpu::Buffer,
    box_index_buffer: wgpu::Buffer,
    box_index_count: u32,
    grid_vertex_buffer: wgpu::Buffer,
    grid_vertex_count: u32,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    /// `floor_y` places the grid, normally the wall origin's height.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        floor_y: f32,
    ) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::bytes_of(&CameraUniform {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("wall_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("wall_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::WALL_SHADER.into()),
        });
        let stage = Stage {
            device,
            layout: &pipeline_layout,
            shader: &shader,
            format: surface_format,
        };

        let panel_pipeline = stage.pipeline(
            "panel_pipeline",
            ("vs_panel", "fs_panel"),
            &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<InstanceData>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4,
                        6 => Float32x4, 7 => Float32x4,
                    ],
                },
            ],
            wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
        );

        let grid_pipeline = stage.pipeline(
            "grid_pipeline",
            ("vs_grid", "fs_grid"),
            &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<GridVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4],
            }],
            wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
        );

        let (box_verts, box_indices) = box_mesh();
        let box_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("box_vertex_buffer"),
            contents: bytemuck::cast_slice(&box_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let box_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("box_index_buffer"),
            contents: bytemuck::cast_slice(&box_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let box_index_count = box_indices.len() as u32;

        let grid_verts = grid_mesh(20, 1.0, floor_y);
        let grid_vertex_count = grid_verts.len() as u32;
        let grid_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grid_vertex_buffer"),
            contents: bytemuck::cast_slice(&grid_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let max_instances = 3 * 1024u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            panel_pipeline,
            grid_pipeline,
            camera_buffer,
            camera_bind_group,
            box_vertex_buffer,
            box_index_buffer,
            box_index_count,
            grid_vertex_buffer,
            grid_vertex_count,
            instance_buffer,
            max_instances,
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Draw one wall frame into `view`.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &ViewCamera,
        frame: &FrameSnapshot,
        layout: &WallLayout,
    ) {
        let vp = camera.view_projection(&frame.camera);
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform {
                view_proj: vp.to_cols_array_2d(),
            }),
        );

        let boxes = panel_instances(frame, layout);
        if boxes.len() > self.max_instances as usize {
            tracing::warn!(
                boxes = boxes.len(),
                max = self.max_instances,
                "instance buffer full; extra panels skipped"
            );
        }
        let instances: Vec<InstanceData> = boxes
            .iter()
            .take(self.max_instances as usize)
            .map(InstanceData::from)
            .collect();

        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("wall_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("wall_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.grid_pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_vertex_buffer(0, self.grid_vertex_buffer.slice(..));
            pass.draw(0..self.grid_vertex_count, 0..1);

            if !instances.is_empty() {
                pass.set_pipeline(&self.panel_pipeline);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_vertex_buffer(0, self.box_vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                pass.set_index_buffer(self.box_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..self.box_index_count, 0, 0..instances.len() as u32);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediawall_kernel::{MemoryRouter, Wall, WallConfig};

    #[test]
    fn three_boxes_per_panel() {
        let mut wall = Wall::new(WallLayout::demo(), WallConfig::default(), MemoryRouter::new());
        let frame = wall.step(0.016);
        let boxes = panel_instances(&frame, wall.layout());
        assert_eq!(boxes.len(), 27);
        assert!(!boxes[0].unlit);
        assert!(boxes[1].unlit && boxes[2].unlit);
    }

    #[test]
    fn frame_box_stands_on_item_origin() {
        let mut wall = Wall::new(WallLayout::demo(), WallConfig::default(), MemoryRouter::new());
        let frame = wall.step(0.0);
        let boxes = panel_instances(&frame, wall.layout());
        let pose = wall.layout().item_pose(0).unwrap();
        let bottom = boxes[0].model.transform_point3(Vec3::new(0.0, -0.5, 0.0));
        assert!(bottom.distance(pose.position) < 1e-5);
        let top = boxes[0].model.transform_point3(Vec3::new(0.0, 0.5, 0.0));
        assert!((top.y - pose.position.y - PANEL_HEIGHT).abs() < 1e-5);
    }

    #[test]
    fn image_plate_sits_in_front_of_border() {
        let mut wall = Wall::new(WallLayout::demo(), WallConfig::default(), MemoryRouter::new());
        let frame = wall.step(0.0);
        let boxes = panel_instances(&frame, wall.layout());
        let border_z = boxes[1].model.transform_point3(Vec3::ZERO).z;
        let image_z = boxes[2].model.transform_point3(Vec3::ZERO).z;
        assert!(image_z > border_z);
    }

    #[test]
    fn border_colour_follows_snapshot() {
        let mut wall = Wall::new(WallLayout::demo(), WallConfig::default(), MemoryRouter::new());
        let mut frame = wall.step(0.0);
        frame.panels[4].border = Color::ORANGE;
        let boxes = panel_instances(&frame, wall.layout());
        assert_eq!(boxes[4 * 3 + 1].color, Color::ORANGE.to_array(1.0));
    }

    #[test]
    fn tint_is_stable_per_item() {
        let layout = WallLayout::demo();
        let id = layout.items()[3].id;
        assert_eq!(image_tint(id, 2.0), image_tint(id, 2.0));
        assert_ne!(image_tint(id, 1.5), image_tint(id, 2.5));
    }

    #[test]
    fn box_faces_point_outward() {
        let (vertices, indices) = box_mesh();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        for tri in indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(vertices[i as usize].position));
            let n = Vec3::from(vertices[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
            assert!(a.abs().max_element() <= 0.5 + 1e-6);
        }
    }
}
