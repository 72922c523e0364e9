//! Frame-deferred work scheduler driven by host ticks

/// Work the host must perform on the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAction {
    /// Tear down and rebuild the flows from the document.
    Rebuild,
    /// Redistribute the flows over pages.
    Paginate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Rebuild { frames_left: u8 },
    Paginate { frames_left: u8 },
}

/// Defers layout work by whole display frames so the host can settle the
/// DOM in between. A rebuild fires after one frame and then schedules
/// pagination, which itself waits two frames; geometry queried earlier
/// would still reflect the old structure. New requests replace pending
/// ones: only the latest matters.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Option<Pending>,
}

const REBUILD_DELAY: u8 = 1;
const PAGINATE_DELAY: u8 = 2;

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a structural rebuild; supersedes anything pending.
    pub fn request_rebuild(&mut self) {
        self.pending = Some(Pending::Rebuild {
            frames_left: REBUILD_DELAY,
        });
    }

    /// Schedule a pagination pass. A pending rebuild keeps priority since
    /// it paginates afterwards anyway.
    pub fn request_paginate(&mut self) {
        if matches!(self.pending, Some(Pending::Rebuild { .. })) {
            return;
        }
        self.pending = Some(Pending::Paginate {
            frames_left: PAGINATE_DELAY,
        });
    }

    /// Drop any pending work (component teardown).
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// Advance one display frame; returns the action due this frame, if any.
    pub fn tick(&mut self) -> Option<FrameAction> {
        match self.pending? {
            Pending::Rebuild { frames_left } => {
                if frames_left > 1 {
                    self.pending = Some(Pending::Rebuild {
                        frames_left: frames_left - 1,
                    });
                    None
                } else {
                    // Structure lands this frame; geometry two frames later.
                    self.pending = Some(Pending::Paginate {
                        frames_left: PAGINATE_DELAY,
                    });
                    Some(FrameAction::Rebuild)
                }
            }
            Pending::Paginate { frames_left } => {
                if frames_left > 1 {
                    self.pending = Some(Pending::Paginate {
                        frames_left: frames_left - 1,
                    });
                    None
                } else {
                    self.pending = None;
                    Some(FrameAction::Paginate)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut FrameScheduler, max_frames: usize) -> Vec<FrameAction> {
        let mut actions = Vec::new();
        for _ in 0..max_frames {
            if let Some(action) = scheduler.tick() {
                actions.push(action);
            }
            if scheduler.is_idle() {
                break;
            }
        }
        actions
    }

    #[test]
    fn test_idle_ticks_do_nothing() {
        let mut scheduler = FrameScheduler::new();
        assert_eq!(scheduler.tick(), None);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_rebuild_then_paginate() {
        let mut scheduler = FrameScheduler::new();
        scheduler.request_rebuild();
        let actions = drain(&mut scheduler, 10);
        assert_eq!(actions, vec![FrameAction::Rebuild, FrameAction::Paginate]);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_paginate_waits_two_frames() {
        let mut scheduler = FrameScheduler::new();
        scheduler.request_paginate();
        assert_eq!(scheduler.tick(), None);
        assert_eq!(scheduler.tick(), Some(FrameAction::Paginate));
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_new_request_replaces_pending() {
        let mut scheduler = FrameScheduler::new();
        scheduler.request_paginate();
        scheduler.tick();
        // Re-request: the countdown restarts instead of queueing.
        scheduler.request_paginate();
        assert_eq!(scheduler.tick(), None);
        assert_eq!(scheduler.tick(), Some(FrameAction::Paginate));
        assert_eq!(scheduler.tick(), None);
    }

    #[test]
    fn test_rebuild_supersedes_paginate() {
        let mut scheduler = FrameScheduler::new();
        scheduler.request_paginate();
        scheduler.request_rebuild();
        let actions = drain(&mut scheduler, 10);
        assert_eq!(actions, vec![FrameAction::Rebuild, FrameAction::Paginate]);
    }

    #[test]
    fn test_paginate_does_not_displace_rebuild() {
        let mut scheduler = FrameScheduler::new();
        scheduler.request_rebuild();
        scheduler.request_paginate();
        let actions = drain(&mut scheduler, 10);
        assert_eq!(actions, vec![FrameAction::Rebuild, FrameAction::Paginate]);
    }

    #[test]
    fn test_cancel_clears_pending() {
        let mut scheduler = FrameScheduler::new();
        scheduler.request_rebuild();
        scheduler.cancel();
        assert_eq!(scheduler.tick(), None);
        assert!(scheduler.is_idle());
    }
}
