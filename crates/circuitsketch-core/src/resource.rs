//! Deferred resource loading for images and vector glyphs.

use crate::error::ResourceError;
use crate::schedule::RenderScheduler;
use crate::shapes::ShapeId;

/// Load state of a shape backed by an external resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Waiting for the host to decode the resource.
    #[default]
    Pending,
    Loaded,
    /// Decoding failed; the shape stays unloaded for good.
    Failed,
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded)
    }
}

/// What a shape needs decoded before it can be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRequest {
    /// Raster image by URL or data URI.
    Image { source: String },
    /// Inline vector markup.
    Svg { markup: String },
}

/// Natural size of a decoded resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadedResource {
    pub width: f64,
    pub height: f64,
}

/// Decodes resources on behalf of the scene.
pub trait ResourceLoader {
    fn load(&self, request: &ResourceRequest) -> Result<LoadedResource, ResourceError>;
}

/// A request paired with the shape waiting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingResource {
    pub shape: ShapeId,
    pub request: ResourceRequest,
}

/// Load bookkeeping embedded in resource-backed shapes.
///
/// Completing a load asks the attached scheduler for a repaint.
#[derive(Debug, Clone, Default)]
pub struct ResourceSlot {
    state: LoadState,
    natural: Option<LoadedResource>,
    scheduler: Option<RenderScheduler>,
}

impl ResourceSlot {
    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }

    pub fn is_pending(&self) -> bool {
        self.state == LoadState::Pending
    }

    /// Natural size reported by the last successful load.
    pub fn natural_size(&self) -> Option<LoadedResource> {
        self.natural
    }

    /// Forget the loaded data after the source changed.
    pub fn reset(&mut self) {
        self.state = LoadState::Pending;
        self.natural = None;
    }

    /// Attach a scheduler unless one is already present.
    pub fn attach(&mut self, scheduler: &RenderScheduler) {
        if self.scheduler.is_none() {
            self.scheduler = Some(scheduler.clone());
        }
    }

    pub fn scheduler(&self) -> Option<&RenderScheduler> {
        self.scheduler.as_ref()
    }

    /// Record a load outcome and request a repaint. Returns the decoded
    /// size on success.
    pub fn complete(
        &mut self,
        result: Result<LoadedResource, ResourceError>,
        what: &str,
    ) -> Option<LoadedResource> {
        let loaded = match result {
            Ok(resource) => {
                log::debug!("{what} loaded ({}x{})", resource.width, resource.height);
                self.state = LoadState::Loaded;
                self.natural = Some(resource);
                Some(resource)
            }
            Err(err) => {
                log::error!("{what} failed to load: {err}");
                self.state = LoadState::Failed;
                None
            }
        };
        if let Some(scheduler) = &self.scheduler {
            scheduler.request_render();
        }
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_completion_requests_render() {
        let scheduler = RenderScheduler::new();
        let mut slot = ResourceSlot::default();
        slot.attach(&scheduler);
        assert!(slot.is_pending());
        let size = slot.complete(Ok(LoadedResource { width: 4.0, height: 2.0 }), "image");
        assert_eq!(size, Some(LoadedResource { width: 4.0, height: 2.0 }));
        assert!(slot.is_loaded());
        assert!(scheduler.is_dirty());
    }

    #[test]
    fn test_slot_failure_is_terminal_until_reset() {
        let capture = crate::test_log::capture();
        let mut slot = ResourceSlot::default();
        assert!(slot.complete(Err(ResourceError::Decode("bad".into())), "image").is_none());
        assert_eq!(slot.state(), LoadState::Failed);
        assert_eq!(capture.errors().len(), 1);
        assert!(!slot.is_pending());
        slot.reset();
        assert!(slot.is_pending());
    }

    #[test]
    fn test_attach_keeps_existing_scheduler() {
        let first = RenderScheduler::new();
        let mut slot = ResourceSlot::default();
        slot.attach(&first);
        slot.attach(&RenderScheduler::new());
        assert!(slot.scheduler().is_some_and(|s| s.same_as(&first)));
    }
}
