//! Frame scheduling.
//!
//! A frame is requested, not run: [`FrameScheduler::request_frame`] hands back
//! a handle that the host later reports as due. Cancelling a handle removes it
//! from the pending set, so a frame that was scheduled but has not yet run can
//! never be delivered afterwards.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Identifies one pending frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

pub trait FrameScheduler {
    /// Schedule a callback before the next repaint
    fn request_frame(&mut self) -> FrameHandle;

    /// Revoke a pending frame. Unknown or already-delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// How often the measured frame rate is refreshed
const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Paces frames to a fixed refresh interval on the host's event loop
#[derive(Debug)]
pub struct FrameClock {
    interval: Duration,
    next_id: u64,
    pending: BTreeMap<FrameHandle, Instant>,
    last_tick: Option<Instant>,
    window_start: Instant,
    window_frames: u32,
    fps: f32,
}

impl FrameClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_id: 0,
            pending: BTreeMap::new(),
            last_tick: None,
            window_start: Instant::now(),
            window_frames: 0,
            fps: 0.0,
        }
    }

    /// Clock targeting a frames-per-second rate
    pub fn with_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / fps.max(1) as f64))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Remove and return every frame whose deadline has passed, oldest first
    pub fn due_frames(&mut self, now: Instant) -> Vec<FrameHandle> {
        let due: Vec<FrameHandle> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(handle, _)| *handle)
            .collect();
        for handle in &due {
            self.pending.remove(handle);
        }
        if !due.is_empty() {
            self.record_tick(now);
        }
        due
    }

    /// How long the host may block before the next frame is due
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.pending
            .values()
            .min()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    #[cfg(test)]
    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    #[cfg(test)]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Measured frames per second over the last window
    pub fn fps(&self) -> f32 {
        self.fps
    }

    fn record_tick(&mut self, now: Instant) {
        self.last_tick = Some(now);
        self.window_frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= FPS_WINDOW {
            self.fps = self.window_frames as f32 / elapsed.as_secs_f32();
            self.window_frames = 0;
            self.window_start = now;
        }
    }
}

impl FrameScheduler for FrameClock {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        // One interval after the last delivered frame, never in the past
        let base = self.last_tick.unwrap_or_else(Instant::now);
        let deadline = (base + self.interval).max(Instant::now());
        self.pending.insert(handle, deadline);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_frame_becomes_due() {
        let mut clock = FrameClock::new(Duration::from_millis(16));
        let handle = clock.request_frame();
        assert!(clock.is_pending(handle));

        let later = Instant::now() + Duration::from_millis(50);
        assert_eq!(clock.due_frames(later), vec![handle]);
        assert!(!clock.is_pending(handle));
        assert!(clock.due_frames(later).is_empty());
    }

    #[test]
    fn test_frame_not_due_before_interval() {
        let mut clock = FrameClock::new(Duration::from_secs(60));
        clock.request_frame();
        assert!(clock.due_frames(Instant::now()).is_empty());
        assert!(clock.time_until_next(Instant::now()).unwrap() > Duration::from_secs(1));
    }

    #[test]
    fn test_cancelled_frame_never_delivered() {
        let mut clock = FrameClock::new(Duration::from_millis(1));
        let handle = clock.request_frame();
        clock.cancel_frame(handle);

        let later = Instant::now() + Duration::from_secs(1);
        assert!(clock.due_frames(later).is_empty());
        assert_eq!(clock.time_until_next(later), None);
    }

    #[test]
    fn test_cancel_unknown_handle_is_noop() {
        let mut clock = FrameClock::new(Duration::from_millis(1));
        let handle = clock.request_frame();
        clock.cancel_frame(handle);
        clock.cancel_frame(handle);
        clock.cancel_frame(FrameHandle(999));
        assert_eq!(clock.pending_count(), 0);
    }

    #[test]
    fn test_handles_are_unique() {
        let mut clock = FrameClock::with_fps(60);
        let a = clock.request_frame();
        let b = clock.request_frame();
        assert_ne!(a, b);
        assert_eq!(clock.pending_count(), 2);
    }
}
