//! Activation and teardown of a scene's drawing surface.
//!
//! [`SceneManager`] owns at most one live surface at a time together with
//! the input listeners attached for it. Everything it allocates on
//! [`activate`](SceneManager::activate) is handed back to the provider on
//! [`deactivate`](SceneManager::deactivate), so no surface outlives its
//! activation. A missing container is not an error: activation simply does
//! nothing.

use crate::error::GpuError;

/// Size of a drawing surface in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Input routed to the active scene while it is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    Resize,
    Pointer,
    Keyboard,
}

/// Identifies one activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(u64);

/// Allocates and releases the graphics resources behind a surface.
pub trait SurfaceProvider {
    type Surface;

    fn allocate(&mut self, viewport: Viewport) -> Result<Self::Surface, GpuError>;

    fn resize(&mut self, surface: &mut Self::Surface, viewport: Viewport);

    /// Free every resource owned by `surface`.
    fn release(&mut self, surface: Self::Surface);
}

struct Active<S> {
    handle: SurfaceHandle,
    surface: S,
    viewport: Viewport,
    listeners: Vec<Listener>,
}

pub struct SceneManager<P: SurfaceProvider> {
    provider: P,
    active: Option<Active<P::Surface>>,
    next_handle: u64,
}

impl<P: SurfaceProvider> SceneManager<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            active: None,
            next_handle: 0,
        }
    }

    /// Allocate a surface sized to `container` and attach input listeners.
    ///
    /// Returns `None` without side effects when there is no container, when
    /// it has no area, or when the provider cannot allocate a surface. An
    /// already active manager returns its existing handle.
    pub fn activate(&mut self, container: Option<Viewport>) -> Option<SurfaceHandle> {
        if let Some(active) = &self.active {
            return Some(active.handle);
        }
        let viewport = match container {
            Some(v) if !v.is_empty() => v,
            _ => {
                log::debug!("No container to activate into, skipping");
                return None;
            }
        };
        let surface = match self.provider.allocate(viewport) {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("Drawing surface unavailable: {}", e);
                return None;
            }
        };

        let handle = SurfaceHandle(self.next_handle);
        self.next_handle += 1;
        self.active = Some(Active {
            handle,
            surface,
            viewport,
            listeners: vec![Listener::Resize, Listener::Pointer, Listener::Keyboard],
        });
        log::info!("Activated {}x{} surface", viewport.width, viewport.height);
        Some(handle)
    }

    /// Resize the live surface. Zero-sized or inactive resizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let viewport = Viewport::new(width, height);
        if viewport.is_empty() {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if !active.listeners.contains(&Listener::Resize) {
            return false;
        }
        self.provider.resize(&mut active.surface, viewport);
        active.viewport = viewport;
        log::debug!("Resized surface to {}x{}", width, height);
        true
    }

    /// Release the surface behind `handle` and detach its listeners.
    ///
    /// Stale or repeated handles are ignored.
    pub fn deactivate(&mut self, handle: SurfaceHandle) -> bool {
        if self.active.as_ref().map(|a| a.handle) != Some(handle) {
            return false;
        }
        let Some(active) = self.active.take() else {
            return false;
        };
        self.provider.release(active.surface);
        log::info!("Deactivated surface, {} listeners detached", active.listeners.len());
        true
    }

    pub fn handle(&self) -> Option<SurfaceHandle> {
        self.active.as_ref().map(|a| a.handle)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.active.as_ref().map(|a| a.viewport)
    }

    /// Whether events of `listener` should reach the scene.
    pub fn listens(&self, listener: Listener) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.listeners.contains(&listener))
    }

    pub fn surface_mut(&mut self) -> Option<&mut P::Surface> {
        self.active.as_mut().map(|a| &mut a.surface)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: SurfaceProvider> Drop for SceneManager<P> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle() {
            self.deactivate(handle);
        }
    }
}
