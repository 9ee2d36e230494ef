use crate::map_data::GeoPoint;
use crate::renderer::{self, MapRenderer, SurfaceOptions};
use crate::viewport::Viewport;
use crate::viewport_fitter::CameraUpdate;

/// Owns the base map viewport and the renderer it draws through. When no
/// renderer backend is available the surface is inert: every operation is a
/// no-op and the host sees an empty container instead of an error.
pub struct MapSurface {
    renderer: Option<Box<dyn MapRenderer>>,
}

impl MapSurface {
    /// Creates a surface through the process-wide renderer factory. Requires
    /// `renderer::loader::init` to have run; otherwise (or when loading
    /// failed) the surface comes up inert.
    pub fn new(options: &SurfaceOptions) -> Self {
        let renderer = match renderer::loader::factory() {
            None => {
                warn!("no renderer factory, map surface is inert");
                None
            }
            Some(factory) => match factory.create_surface(options) {
                Ok(renderer) => Some(renderer),
                Err(e) => {
                    warn!("failed to create rendering surface: {e}");
                    None
                }
            },
        };
        MapSurface { renderer }
    }

    /// Creates a surface over an explicitly injected renderer, bypassing the
    /// process-wide loader. This is also the seam tests use.
    pub fn with_renderer(renderer: Box<dyn MapRenderer>) -> Self {
        MapSurface {
            renderer: Some(renderer),
        }
    }

    pub fn is_inert(&self) -> bool {
        self.renderer.is_none()
    }

    pub fn renderer_mut(&mut self) -> Option<&mut (dyn MapRenderer + 'static)> {
        self.renderer.as_deref_mut()
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.renderer.as_deref().map(|r| r.viewport())
    }

    pub fn set_view(&mut self, center: GeoPoint, zoom: f64, animate: bool) {
        if let Some(renderer) = self.renderer.as_deref_mut() {
            renderer.set_view(center, zoom, animate);
        }
    }

    pub fn apply(&mut self, update: &CameraUpdate) {
        match update {
            CameraUpdate::SetView {
                center,
                zoom,
                animate,
            } => self.set_view(*center, *zoom, *animate),
            CameraUpdate::Pan { center } => {
                if let Some(renderer) = self.renderer.as_deref_mut() {
                    renderer.pan_to(*center, true);
                }
            }
        }
    }
}
