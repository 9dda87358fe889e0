//! Cooperative per-frame loop with explicit mount and teardown.

use std::collections::VecDeque;

use log::{debug, warn};

use super::{Renderer, Surface};
use crate::anim::Point;
use crate::theme::Theme;

/// Identifies one requested frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// In-process scheduler: a FIFO of pending frame requests.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: VecDeque<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the oldest pending request.
    pub fn pop_due(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.pending.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|pending| *pending != handle);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoopState {
    /// No drawing context; nothing is ever scheduled.
    Inert,
    Running { pending: FrameHandle },
    Stopped,
}

/// Owns a renderer, its surface and its scheduler for the lifetime of a mount.
pub struct PortraitLoop<S: Surface, C: FrameScheduler> {
    renderer: Renderer,
    surface: S,
    scheduler: C,
    state: LoopState,
    frames: u64,
}

impl<S: Surface, C: FrameScheduler> PortraitLoop<S, C> {
    /// Acquires the surface, paints the first frame and schedules the next one.
    pub fn mount(renderer: Renderer, surface: S, scheduler: C) -> Self {
        let mut this = Self { renderer, surface, scheduler, state: LoopState::Inert, frames: 0 };
        if !this.surface.acquire(this.renderer.surface_spec()) {
            warn!("drawing surface unavailable, portrait will not render");
            return this;
        }

        this.paint();
        let pending = this.scheduler.request_frame();
        this.state = LoopState::Running { pending };
        debug!("portrait mounted");
        this
    }

    /// Runs a scheduled frame. Stale handles and frames after teardown are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        match self.state {
            LoopState::Running { pending } if pending == handle => {
                self.paint();
                let pending = self.scheduler.request_frame();
                self.state = LoopState::Running { pending };
                true
            },
            _ => false,
        }
    }

    /// Stops the loop and cancels the outstanding frame request.
    pub fn teardown(&mut self) {
        if let LoopState::Running { pending } = self.state {
            self.scheduler.cancel_frame(pending);
            debug!("portrait torn down after {} frame(s)", self.frames);
        }
        self.state = LoopState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn pointer_enter(&mut self) {
        self.renderer.state_mut().enter();
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.renderer.state_mut().move_to(Point::new(x, y));
    }

    pub fn pointer_leave(&mut self) {
        self.renderer.state_mut().leave();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.renderer.set_theme(theme);
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler(&self) -> &C {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut C {
        &mut self.scheduler
    }

    fn paint(&mut self) {
        self.renderer.draw(&mut self.surface);
        self.renderer.advance();
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::grid::{Cell, CharGrid};
    use crate::config::DisplayConfig;
    use crate::render::tests::RecordingSurface;

    fn renderer() -> Renderer {
        let grid = CharGrid::from_rows(vec![vec![Cell::new('@', 0), Cell::background()]]).unwrap();
        Renderer::new(grid, &DisplayConfig::default())
    }

    #[test]
    fn queue_cancels_by_handle() {
        let mut queue = FrameQueue::new();
        let first = queue.request_frame();
        let second = queue.request_frame();
        assert_ne!(first, second);
        queue.cancel_frame(first);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.pop_due(), Some(second));
        assert_eq!(queue.pop_due(), None);
    }

    #[test]
    fn mount_paints_immediately_and_schedules_one_frame() {
        let portrait =
            PortraitLoop::mount(renderer(), RecordingSurface::default(), FrameQueue::new());
        assert!(portrait.is_running());
        assert_eq!(portrait.surface().acquired.as_ref().map(|spec| spec.width), Some(14.0));
        assert_eq!(portrait.frames(), 1);
        assert_eq!(portrait.surface().paints.len(), 1);
        assert_eq!(portrait.scheduler().pending(), 1);
        assert!((portrait.renderer().state().time - 0.025).abs() < 1e-12);
    }

    #[test]
    fn each_frame_reschedules_exactly_once() {
        let mut portrait =
            PortraitLoop::mount(renderer(), RecordingSurface::default(), FrameQueue::new());
        for _ in 0..10 {
            let handle = portrait.scheduler_mut().pop_due().unwrap();
            assert!(portrait.on_frame(handle));
            assert_eq!(portrait.scheduler().pending(), 1);
        }
        assert_eq!(portrait.frames(), 11);
        assert_eq!(portrait.surface().clears, 11);
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut portrait =
            PortraitLoop::mount(renderer(), RecordingSurface::default(), FrameQueue::new());
        let handle = portrait.scheduler_mut().pop_due().unwrap();
        assert!(portrait.on_frame(handle));
        assert!(!portrait.on_frame(handle));
        assert_eq!(portrait.frames(), 2);
    }

    #[test]
    fn unavailable_surface_is_a_silent_no_op() {
        let surface = RecordingSurface { refuse: true, ..RecordingSurface::default() };
        let mut portrait = PortraitLoop::mount(renderer(), surface, FrameQueue::new());
        assert!(!portrait.is_running());
        assert_eq!(portrait.scheduler().pending(), 0);
        assert_eq!(portrait.surface().clears, 0);
        assert!(portrait.surface().paints.is_empty());
        portrait.teardown();
        assert_eq!(portrait.frames(), 0);
    }
}
