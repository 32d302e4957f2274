use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use mediawall_common::ItemId;
use mediawall_input::{HoverTracker, PointerEvent, pick};
use mediawall_kernel::{CursorHint, FrameSnapshot, MemoryRouter, Wall, WallConfig};
use mediawall_layout::WallLayout;
use mediawall_render::{FrameHost, RenderLoop, ScheduleError};
use mediawall_render_wgpu::{ViewCamera, WgpuRenderer};
use mediawall_tools::WallInspector;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "mediawall-desktop", about = "Media wall desktop viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Wall descriptor (JSON or YAML); the built-in demo wall when omitted
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Wall configuration (JSON or YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial route, e.g. `/item/<id>`
    #[arg(long, default_value = "/")]
    route: String,
}

/// Frame scheduling through the window's redraw requests.
#[derive(Default)]
struct WindowHost {
    window: Option<Arc<Window>>,
}

impl FrameHost for WindowHost {
    fn request_frame(&mut self) -> Result<(), ScheduleError> {
        match &self.window {
            Some(window) => {
                window.request_redraw();
                Ok(())
            }
            None => Err(ScheduleError::SurfaceGone),
        }
    }
}

/// Application state.
struct AppState {
    wall: Wall,
    camera: ViewCamera,
    tracker: HoverTracker,
    /// Cursor in physical pixels, `None` while outside the window.
    cursor: Option<Vec2>,
    viewport: Vec2,
    modifiers: ModifiersState,
    route_input: String,
    show_inspector: bool,
}

impl AppState {
    fn new(wall: Wall) -> Self {
        let route_input = wall.navigator().path();
        Self {
            wall,
            camera: ViewCamera::default(),
            tracker: HoverTracker::new(),
            cursor: None,
            viewport: Vec2::new(1280.0, 720.0),
            modifiers: ModifiersState::default(),
            route_input,
            show_inspector: true,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width as f32, height as f32);
        self.camera.set_viewport(width, height);
    }

    fn item_under_cursor(&self) -> Option<ItemId> {
        let cursor = self.cursor?;
        let ray = self
            .camera
            .screen_ray(&self.wall.camera().pose(), cursor, self.viewport)?;
        pick(self.wall.layout(), ray).map(|hit| hit.id)
    }

    /// Re-pick under the cursor. The camera moves between frames, so this
    /// runs every frame, not only on cursor motion.
    fn update_hover(&mut self) {
        let under = self.item_under_cursor();
        for event in self.tracker.update(under) {
            self.wall.handle(event);
        }
    }

    fn click(&mut self) {
        let event = match self.item_under_cursor() {
            Some(id) => PointerEvent::click(id),
            None => PointerEvent::miss(),
        };
        self.wall.handle(event);
    }

    fn back(&mut self) {
        if self.wall.navigator_mut().back() {
            tracing::debug!(route = %self.wall.navigator().path(), "history back");
        }
    }

    fn forward(&mut self) {
        if self.wall.navigator_mut().forward() {
            tracing::debug!(route = %self.wall.navigator().path(), "history forward");
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Escape => self.wall.handle(PointerEvent::miss()),
            KeyCode::ArrowLeft if self.modifiers.alt_key() => self.back(),
            KeyCode::ArrowRight if self.modifiers.alt_key() => self.forward(),
            KeyCode::BrowserBack => self.back(),
            KeyCode::BrowserForward => self.forward(),
            KeyCode::Home => self.wall.navigator_mut().push_path("/"),
            KeyCode::F1 => self.show_inspector = !self.show_inspector,
            _ => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext, frame: &FrameSnapshot) {
        if frame.cursor == CursorHint::Pointer && !ctx.is_pointer_over_area() {
            ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        if !self.show_inspector {
            return;
        }

        let summary = WallInspector::summary(&self.wall);
        let path = self.wall.navigator().path();
        if !ctx.wants_keyboard_input() {
            self.route_input.clone_from(&path);
        }

        egui::SidePanel::left("inspector")
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Media Wall");
                ui.separator();
                ui.label(format!("Frame: {}  t={:.1}s", summary.frame, summary.elapsed));
                ui.label(format!(
                    "Camera: ({:.2}, {:.2}, {:.2})",
                    summary.camera_position.x, summary.camera_position.y, summary.camera_position.z
                ));
                ui.label(format!(
                    "To target: {:.3} m / {:.1} deg",
                    summary.distance_to_target,
                    summary.angle_to_target.to_degrees()
                ));
                ui.separator();

                ui.heading("Route");
                ui.horizontal(|ui| {
                    let field = ui.text_edit_singleline(&mut self.route_input);
                    let submitted =
                        field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Go").clicked() || submitted {
                        let target = self.route_input.trim().to_string();
                        self.wall.navigator_mut().push_path(&target);
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("Back").clicked() {
                        self.back();
                    }
                    if ui.button("Forward").clicked() {
                        self.forward();
                    }
                    if ui.button("Overview").clicked() {
                        self.wall.navigator_mut().push_path("/");
                    }
                });
                ui.small(format!("history: {} entries", self.wall.navigator().history_len()));

                ui.separator();
                ui.heading("Items");
                let items: Vec<(usize, ItemId)> = self
                    .wall
                    .layout()
                    .items()
                    .iter()
                    .map(|item| (item.index, item.id))
                    .collect();
                for (index, id) in items {
                    let is_selected = summary.selected == Some(id);
                    let label = format!("[{index}] {}", id.caption());
                    if ui.selectable_label(is_selected, label).clicked() {
                        self.wall.handle(PointerEvent::click(id));
                    }
                }

                if let Some(info) = summary
                    .selected
                    .and_then(|id| WallInspector::inspect_item(&self.wall, id))
                {
                    ui.separator();
                    ui.heading("Focused");
                    ui.label(info.caption.clone());
                    ui.label(format!("image: {}", info.image_ref));
                    ui.label(format!("zoom: {:.3}", info.zoom));
                }

                ui.separator();
                ui.small("F1: Toggle panel | Click: focus | Esc: overview | Alt+Arrows: history");
            });
    }
}

/// Device objects created once the window exists.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext, floor_y: f32) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Media Wall")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("mediawall_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer =
            WgpuRenderer::new(&device, surface_format, config.width, config.height, floor_y);
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    /// Draw the wall, then the egui overlay, and present.
    fn draw(&mut self, state: &mut AppState, egui_ctx: &EguiContext, frame: &FrameSnapshot) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            &state.camera,
            frame,
            state.wall.layout(),
        );

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx, frame);
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct GpuApp {
    state: AppState,
    render_loop: RenderLoop<WindowHost>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    started: Instant,
}

impl GpuApp {
    fn new(wall: Wall) -> Self {
        Self {
            state: AppState::new(wall),
            render_loop: RenderLoop::new(WindowHost::default()),
            gpu: None,
            egui_ctx: EguiContext::default(),
            started: Instant::now(),
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        let floor_y = self.state.wall.layout().origin().y;
        let gpu = match Gpu::new(event_loop, &self.egui_ctx, floor_y) {
            Ok(gpu) => gpu,
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
                return;
            }
        };
        self.state.resize(gpu.config.width, gpu.config.height);
        self.render_loop.host_mut().window = Some(gpu.window.clone());
        self.gpu = Some(gpu);

        if let Err(e) = self.render_loop.start() {
            tracing::error!("render loop did not start: {e}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.render_loop.stop();
                self.render_loop.host_mut().window = None;
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    self.state.resize(gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.state.modifiers = modifiers.state();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.cursor = Some(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.cursor = None;
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => match button {
                MouseButton::Left => self.state.click(),
                MouseButton::Back => self.state.back(),
                MouseButton::Forward => self.state.forward(),
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                self.state.update_hover();
                let Some(frame) = self
                    .render_loop
                    .advance(self.started.elapsed(), &mut self.state.wall)
                else {
                    return;
                };
                for event in self.state.wall.drain_events() {
                    tracing::info!(?event, route = %self.state.wall.navigator().path(), "selection");
                }
                if let Some(gpu) = &mut self.gpu {
                    gpu.draw(&mut self.state, &self.egui_ctx, &frame);
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("mediawall-desktop starting");

    let layout = match &cli.layout {
        Some(path) => {
            WallLayout::load(path).with_context(|| format!("loading layout {}", path.display()))?
        }
        None => WallLayout::demo(),
    };
    let config = match &cli.config {
        Some(path) => {
            WallConfig::load(path).with_context(|| format!("loading config {}", path.display()))?
        }
        None => WallConfig::default(),
    };
    let wall = Wall::new(layout, config, MemoryRouter::with_path(&cli.route));

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(wall);
    event_loop.run_app(&mut app)?;

    let stats = app.render_loop.stats();
    tracing::info!(
        frames = stats.frames,
        avg_ms = stats.average_dt.as_secs_f64() * 1000.0,
        "mediawall-desktop exiting"
    );
    Ok(())
}
