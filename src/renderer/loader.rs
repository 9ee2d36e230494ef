use std::sync::OnceLock;

use anyhow::Result;

use super::{MapRenderer, SurfaceOptions};

/// Creates rendering surfaces for a backend. Registered once per process.
pub trait RendererFactory: Send + Sync {
    fn create_surface(&self, options: &SurfaceOptions) -> Result<Box<dyn MapRenderer>>;
}

static FACTORY: OnceLock<Option<Box<dyn RendererFactory>>> = OnceLock::new();

/// Runs `load` exactly once process-wide and memoizes the outcome. A load
/// failure is memoized too: the map then degrades to an inert container
/// instead of retrying or surfacing an error. Returns whether this call did
/// the initialization.
pub fn init<F>(load: F) -> bool
where
    F: FnOnce() -> Result<Box<dyn RendererFactory>>,
{
    let mut first = false;
    FACTORY.get_or_init(|| {
        first = true;
        match load() {
            Ok(factory) => Some(factory),
            Err(e) => {
                warn!("renderer backend unavailable, map will be inert: {e}");
                None
            }
        }
    });
    if !first {
        warn!("renderer loader `init` called multiple times");
    }
    first
}

/// The registered factory, if loading has happened and succeeded.
pub fn factory() -> Option<&'static dyn RendererFactory> {
    FACTORY.get().and_then(|f| f.as_deref())
}
