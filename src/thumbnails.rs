//! Thumbnail strip synchronisation.
//!
//! Keeps the active thumbnail centred in a horizontally scrollable strip of
//! uniformly sized items.

use crate::config::ThumbnailConfig;
use lightbox_ui::{Easing, ScrollState, Tween};
use std::ops::Range;
use web_time::Instant;

/// Offsets closer than this snap instead of animating.
const SNAP_DISTANCE_PX: f32 = 0.5;

#[derive(Debug)]
pub struct ThumbnailSynchronizer {
    config: ThumbnailConfig,
    count: usize,
    active: usize,
    strip_width: f32,
    /// Settled offset; the smooth scroll heads here
    scroll: ScrollState,
    animation: Option<Tween>,
}

impl ThumbnailSynchronizer {
    pub fn new(config: ThumbnailConfig, count: usize, active: usize) -> Self {
        let mut sync = Self {
            config,
            count,
            active: active.min(count.saturating_sub(1)),
            strip_width: 0.0,
            scroll: ScrollState::new(),
            animation: None,
        };
        sync.recenter();
        sync
    }

    fn pitch(&self) -> f32 {
        self.config.item_width + self.config.gap
    }

    /// Total width of the strip content including padding.
    pub fn content_width(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        2.0 * self.config.padding + self.count as f32 * self.pitch() - self.config.gap
    }

    /// Horizontal center of thumbnail `index` in content coordinates.
    pub fn item_center(&self, index: usize) -> f32 {
        self.config.padding + index as f32 * self.pitch() + self.config.item_width / 2.0
    }

    /// Offset that centres `index` in the strip viewport, clamped to the
    /// scrollable range.
    pub fn centered_offset(&self, index: usize) -> f32 {
        self.scroll
            .clamp(self.item_center(index) - self.strip_width / 2.0)
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Scroll offset to draw at `now`.
    pub fn offset(&self, now: Instant) -> f32 {
        match &self.animation {
            Some(tween) => tween.value(now),
            None => self.scroll.offset,
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.animation.is_some()
    }

    /// Smooth-scroll to the newly active thumbnail.
    pub fn observe_active(&mut self, index: usize, now: Instant) {
        if index >= self.count {
            log::debug!("Ignoring thumbnail index {} (count {})", index, self.count);
            return;
        }
        self.active = index;
        let from = self.offset(now);
        let target = self.centered_offset(index);
        self.scroll.scroll_to(target);
        self.animation = if (target - from).abs() < SNAP_DISTANCE_PX {
            None
        } else {
            log::trace!("Thumbnail strip scrolling {:.1} -> {:.1}", from, target);
            Some(Tween::new(
                from,
                target,
                now,
                self.config.scroll_duration(),
                Easing::EaseOutCubic,
            ))
        };
    }

    /// Centre `index` without animation.
    pub fn jump_to(&mut self, index: usize) {
        if index >= self.count {
            log::debug!("Ignoring thumbnail index {} (count {})", index, self.count);
            return;
        }
        self.active = index;
        self.recenter();
    }

    /// Resize the strip viewport; recentres without animation.
    pub fn set_strip_width(&mut self, width: f32) {
        if !width.is_finite() || width < 0.0 {
            log::trace!("Ignoring strip width {}", width);
            return;
        }
        self.strip_width = width;
        self.recenter();
    }

    fn recenter(&mut self) {
        self.animation = None;
        self.scroll.set_extent(self.content_width(), self.strip_width);
        self.scroll.scroll_to(self.centered_offset(self.active));
    }

    /// Finish the smooth scroll once its duration has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if self.animation.is_some_and(|tween| tween.is_finished(now)) {
            self.animation = None;
        }
    }

    /// Thumbnail under strip-local `x` at `now`, if any.
    pub fn thumbnail_at(&self, x: f32, now: Instant) -> Option<usize> {
        if !x.is_finite() {
            return None;
        }
        let content_x = x + self.offset(now) - self.config.padding;
        if content_x < 0.0 {
            return None;
        }
        let index = (content_x / self.pitch()).floor() as usize;
        let within = content_x - index as f32 * self.pitch();
        (index < self.count && within <= self.config.item_width).then_some(index)
    }

    /// Indices of thumbnails intersecting the strip viewport at `now`.
    pub fn visible_range(&self, now: Instant) -> Range<usize> {
        if self.count == 0 || self.pitch() <= 0.0 {
            return 0..0;
        }
        let offset = self.offset(now);
        let padding = self.config.padding;
        let first = ((offset - padding - self.config.item_width) / self.pitch()).floor() + 1.0;
        let end = ((offset + self.strip_width - padding) / self.pitch()).ceil();
        let first = (first.max(0.0) as usize).min(self.count);
        let end = (end.max(0.0) as usize).min(self.count);
        first..end.max(first)
    }

    pub fn teardown(&mut self) {
        self.animation = None;
    }
}
