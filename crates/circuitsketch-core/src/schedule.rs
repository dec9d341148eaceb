//! Render coalescing.
//!
//! Any number of `request_render` calls between two frames collapse into a
//! single paint. The scheduler is a cheap, single-threaded handle: clones
//! share the same flags, so shapes waiting on resources can hold one and
//! ask for a repaint when their data arrives.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

#[derive(Default)]
struct SchedulerState {
    dirty: Cell<bool>,
    scheduled: Cell<bool>,
    frames_requested: Cell<u64>,
    hook: RefCell<Option<Box<dyn Fn()>>>,
}

/// Dirty-flag render scheduler shared between the scene and its host.
#[derive(Clone, Default)]
pub struct RenderScheduler {
    state: Rc<SchedulerState>,
}

impl fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("dirty", &self.state.dirty.get())
            .field("scheduled", &self.state.scheduled.get())
            .finish()
    }
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the host callback invoked when a frame needs scheduling
    /// (for example a window's redraw request).
    pub fn set_frame_hook(&self, hook: impl Fn() + 'static) {
        *self.state.hook.borrow_mut() = Some(Box::new(hook));
    }

    /// Mark the scene dirty; schedules at most one frame.
    pub fn request_render(&self) {
        self.state.dirty.set(true);
        if self.state.scheduled.replace(true) {
            return;
        }
        self.state
            .frames_requested
            .set(self.state.frames_requested.get() + 1);
        // The hook runs detached so it may reinstall itself or replace the
        // hook; a replacement installed during the call wins.
        let hook = self.state.hook.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
            let mut slot = self.state.hook.borrow_mut();
            if slot.is_none() {
                *slot = Some(hook);
            }
        }
    }

    /// Called by the host when the frame fires. Returns whether a paint is
    /// due and clears both flags.
    pub fn begin_frame(&self) -> bool {
        self.state.scheduled.set(false);
        self.state.dirty.replace(false)
    }

    pub fn is_dirty(&self) -> bool {
        self.state.dirty.get()
    }

    pub fn is_scheduled(&self) -> bool {
        self.state.scheduled.get()
    }

    /// Number of frames scheduled so far.
    pub fn frames_requested(&self) -> u64 {
        self.state.frames_requested.get()
    }

    /// Whether two handles share the same flags.
    pub fn same_as(&self, other: &RenderScheduler) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_coalesce() {
        let scheduler = RenderScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        scheduler.set_frame_hook(move || counter.set(counter.get() + 1));

        scheduler.request_render();
        scheduler.request_render();
        scheduler.request_render();
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.frames_requested(), 1);

        assert!(scheduler.begin_frame());
        assert!(!scheduler.begin_frame());

        scheduler.request_render();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_clones_share_state() {
        let a = RenderScheduler::new();
        let b = a.clone();
        b.request_render();
        assert!(a.is_dirty());
        assert!(a.same_as(&b));
        assert!(!a.same_as(&RenderScheduler::new()));
    }

    #[test]
    fn test_hook_may_replace_itself() {
        let scheduler = RenderScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let handle = scheduler.clone();
        let counter = hits.clone();
        scheduler.set_frame_hook(move || {
            let counter = counter.clone();
            handle.set_frame_hook(move || counter.set(counter.get() + 10));
        });

        scheduler.request_render();
        assert_eq!(hits.get(), 0);
        assert!(scheduler.begin_frame());
        scheduler.request_render();
        assert_eq!(hits.get(), 10);
        assert!(scheduler.begin_frame());
        scheduler.request_render();
        assert_eq!(hits.get(), 20);
    }
}
