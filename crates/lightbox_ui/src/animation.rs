//! Frame and timer scheduling with cooperative cancellation.
//!
//! Nothing here reads the clock: callers pass `now` into every method, and
//! the host drives [`FrameScheduler::tick`] from its animation-frame loop.
//! Each scheduled entry carries the [`Generation`] it was created under; the
//! owner compares it with its current generation when the entry fires and
//! discards it on mismatch.

use std::time::Duration;
use web_time::Instant;

/// Monotonic cancellation token.
///
/// Starting an animation bumps the generation; callbacks scheduled under an
/// older generation are stale and must be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn new() -> Self {
        Self(0)
    }

    /// Advance to the next generation and return it.
    pub fn bump(&mut self) -> Generation {
        self.0 = self.0.wrapping_add(1);
        *self
    }

    /// Raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Easing curves for time-based transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Decelerating curve used for slide commits and snaps
    #[default]
    EaseOutCubic,
    /// Symmetric curve used for zoom snaps
    EaseInOutCubic,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 };
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// A scalar transition between two values over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub started: Instant,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, started: Instant, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            started,
            duration,
            easing,
        }
    }

    /// Eased progress in `[0, 1]` at `now`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        self.easing
            .apply(elapsed.as_secs_f32() / self.duration.as_secs_f32())
    }

    /// Interpolated value at `now`.
    pub fn value(&self, now: Instant) -> f32 {
        self.from + (self.to - self.from) * self.progress(now)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    /// `None` means "next animation frame"
    due: Option<Instant>,
    generation: Generation,
    task: T,
}

/// Queue of pending animation-frame callbacks and delayed timers.
#[derive(Debug, Clone)]
pub struct FrameScheduler<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` on the next tick.
    pub fn request_frame(&mut self, generation: Generation, task: T) {
        self.entries.push(Entry {
            due: None,
            generation,
            task,
        });
    }

    /// Run `task` on the first tick at or after `now + delay`.
    pub fn schedule_after(&mut self, now: Instant, delay: Duration, generation: Generation, task: T) {
        self.entries.push(Entry {
            due: Some(now + delay),
            generation,
            task,
        });
    }

    /// Remove and return every entry due at `now`.
    ///
    /// Frame requests come first (in request order), followed by timers in
    /// due order. Entries scheduled by the caller while handling the result
    /// are not part of this batch.
    pub fn tick(&mut self, now: Instant) -> Vec<(Generation, T)> {
        let (mut due, pending): (Vec<Entry<T>>, Vec<Entry<T>>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.due.is_none_or(|at| at <= now));
        self.entries = pending;
        // Stable sort: frames (None) before timers, timers by deadline.
        due.sort_by_key(|entry| entry.due);
        due.into_iter()
            .map(|entry| (entry.generation, entry.task))
            .collect()
    }

    /// Drop every entry matching `predicate`.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) {
        self.entries.retain(|entry| !predicate(&entry.task));
    }

    /// Drop all pending entries.
    pub fn cancel_all(&mut self) {
        if !self.entries.is_empty() {
            log::trace!("Cancelling {} scheduled callbacks", self.entries.len());
        }
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any pending entry matches `predicate`.
    pub fn has(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.entries.iter().any(|entry| predicate(&entry.task))
    }
}
