//! Native host: one window, one active scene.
//!
//! The window plays the role of the scene's container. Its surface is owned
//! by a [`SceneManager`] so it is released when the window closes, and every
//! `RedrawRequested` is one tick of the [`FrameDriver`].

use std::sync::Arc;

use glam::{Mat4, Vec2};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::annihilation::Annihilation;
use crate::camera::{screen_projection, sprite_scale, Camera};
use crate::config::Config;
use crate::draw::Projection;
use crate::driver::{Control, DriverState, FrameDriver, Scene};
use crate::error::AppError;
use crate::field::ParticleField;
use crate::gpu::GpuProvider;
use crate::input::{Command, Input};
use crate::ring::AcceleratorRing;
use crate::species::Species;
use crate::viewport::{Listener, SceneManager, Viewport};

/// The scenes the host can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SceneKind {
    #[default]
    Ring,
    Annihilation,
    Field,
}

impl SceneKind {
    pub fn next(self) -> Self {
        match self {
            SceneKind::Ring => SceneKind::Annihilation,
            SceneKind::Annihilation => SceneKind::Field,
            SceneKind::Field => SceneKind::Ring,
        }
    }

    /// Whether the scene starts playing as soon as it is shown.
    pub fn autoplay(self) -> bool {
        !matches!(self, SceneKind::Annihilation)
    }

    pub fn build(self, config: &Config, seed: Option<u64>) -> Box<dyn Scene> {
        match (self, seed) {
            (SceneKind::Ring, Some(seed)) => {
                Box::new(AcceleratorRing::with_seed(config.ring.clone(), seed))
            }
            (SceneKind::Ring, None) => Box::new(AcceleratorRing::new(config.ring.clone())),
            (SceneKind::Annihilation, Some(seed)) => Box::new(Annihilation::with_seed(
                config.annihilation.clone(),
                seed,
            )),
            (SceneKind::Annihilation, None) => {
                Box::new(Annihilation::new(config.annihilation.clone()))
            }
            (SceneKind::Field, Some(seed)) => {
                Box::new(ParticleField::with_seed(config.field.clone(), seed))
            }
            (SceneKind::Field, None) => Box::new(ParticleField::new(config.field.clone())),
        }
    }
}

pub struct App {
    config: Config,
    kind: SceneKind,
    seed: Option<u64>,
    species: Species,
    window: Option<Arc<Window>>,
    manager: Option<SceneManager<GpuProvider>>,
    driver: FrameDriver<Box<dyn Scene>>,
    camera: Camera,
    input: Input,
    title: String,
    error: Option<AppError>,
}

impl App {
    /// The ring's configured species is the one every scene starts with.
    pub fn new(config: Config, kind: SceneKind, seed: Option<u64>) -> Self {
        let species = config.ring.species;
        let mut driver = FrameDriver::new(kind.build(&config, seed));
        driver.apply(Control::SelectSpecies(species));
        Self {
            species,
            camera: Camera::new(&config.ring.camera),
            config,
            kind,
            seed,
            window: None,
            manager: None,
            driver,
            input: Input::new(),
            title: String::new(),
            error: None,
        }
    }

    /// The error that ended the event loop, if any.
    pub fn take_error(&mut self) -> Option<AppError> {
        self.error.take()
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn show(&mut self, kind: SceneKind) {
        self.driver.stop();
        self.kind = kind;
        self.driver = FrameDriver::new(kind.build(&self.config, self.seed));
        if let Some(viewport) = self.manager.as_ref().and_then(|m| m.viewport()) {
            self.driver
                .resize(viewport.width as f32, viewport.height as f32);
        }
        self.driver.apply(Control::SelectSpecies(self.species));
        if kind.autoplay() {
            self.driver.start();
        }
        log::info!("Showing {}", self.driver.scene().name());
    }

    fn run_command(&mut self, command: Command, event_loop: &ActiveEventLoop) {
        match command {
            Command::TogglePlay => self.driver.toggle(),
            Command::SetTimeScale(preset) => self.driver.set_time_scale(preset),
            Command::ToggleHeatmap => {
                self.driver.apply(Control::ToggleHeatmap);
            }
            Command::ZoomIn => self.camera.zoom_in(),
            Command::ZoomOut => self.camera.zoom_out(),
            Command::CycleSpecies => {
                self.species = self.species.next();
                self.driver.apply(Control::SelectSpecies(self.species));
                log::info!("Species: {}", self.species.name());
            }
            Command::Reset => self.driver.reset(),
            Command::NextScene => self.show(self.kind.next()),
            Command::Quit => event_loop.exit(),
        }
        self.request_redraw();
    }

    fn handle_input(&mut self, event: &WindowEvent, event_loop: &ActiveEventLoop) {
        let listener = match event {
            WindowEvent::KeyboardInput { .. } => Listener::Keyboard,
            WindowEvent::MouseInput { .. }
            | WindowEvent::CursorMoved { .. }
            | WindowEvent::CursorLeft { .. }
            | WindowEvent::MouseWheel { .. } => Listener::Pointer,
            _ => return,
        };
        if !self.manager.as_ref().is_some_and(|m| m.listens(listener)) {
            return;
        }

        let command = self.input.handle_event(event);

        let drag = self.input.take_drag();
        if drag != Vec2::ZERO && self.driver.frame().projection == Projection::Orbit {
            self.camera.orbit(drag);
            self.request_redraw();
        }
        let scroll = self.input.take_scroll();
        if scroll > 0.0 {
            self.camera.zoom_in();
            self.request_redraw();
        } else if scroll < 0.0 {
            self.camera.zoom_out();
            self.request_redraw();
        }
        if matches!(
            event,
            WindowEvent::CursorMoved { .. } | WindowEvent::CursorLeft { .. }
        ) {
            self.driver.apply(Control::Pointer(self.input.pointer()));
        }

        if let Some(command) = command {
            self.run_command(command, event_loop);
        }
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        self.driver.tick();

        let frame = self.driver.frame();
        let (view_proj, scale) = match frame.projection {
            Projection::Orbit => (self.camera.view_proj(), self.camera.sprite_scale()),
            Projection::Screen { width, height } => {
                let proj: Mat4 = screen_projection(width, height);
                (proj, sprite_scale(&proj))
            }
        };

        let Some(gpu) = self.manager.as_mut().and_then(|m| m.surface_mut()) else {
            return;
        };
        match gpu.render(frame, view_proj, scale) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        self.update_title();
        if self.driver.is_scheduled() {
            self.request_redraw();
        }
    }

    fn update_title(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let state = match self.driver.state() {
            DriverState::Idle => "press space",
            DriverState::Running => "running",
            DriverState::Paused => "paused",
        };
        let mut title = format!(
            "{} - {} ({})",
            self.config.window.title,
            self.driver.scene().name(),
            state
        );
        if let Some(ledger) = self.driver.scene().ledger() {
            title.push_str(&format!(
                " | {:.3} MeV ({:.3e} J) | {} particles | {} collisions",
                ledger.energy_mev(),
                ledger.energy_joules(),
                ledger.particles(),
                ledger.collisions()
            ));
        }
        let fps = self.driver.time().fps();
        if self.driver.state() == DriverState::Running && fps > 0.0 {
            title.push_str(&format!(" | {:.0} fps", fps));
        }
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.window.title)
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let mut manager = SceneManager::new(GpuProvider::new(window.clone()));
        if manager
            .activate(Some(Viewport::new(size.width, size.height)))
            .is_none()
        {
            log::error!("No drawing surface available, exiting");
            event_loop.exit();
            return;
        }

        self.camera.set_aspect(size.width, size.height);
        self.driver.resize(size.width as f32, size.height as f32);
        self.window = Some(window);
        self.manager = Some(manager);

        if self.kind.autoplay() {
            self.driver.start();
        }
        log::info!("Showing {}", self.driver.scene().name());
        self.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let resized = self
                    .manager
                    .as_mut()
                    .is_some_and(|m| m.resize(size.width, size.height));
                if resized {
                    self.camera.set_aspect(size.width, size.height);
                    self.driver.resize(size.width as f32, size.height as f32);
                    self.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.render(event_loop),
            other => self.handle_input(&other, event_loop),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.driver.stop();
        if let Some(mut manager) = self.manager.take() {
            if let Some(handle) = manager.handle() {
                manager.deactivate(handle);
            }
        }
    }
}
