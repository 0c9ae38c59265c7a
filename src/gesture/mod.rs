//! Gesture transform engine.
//!
//! Owns the transform of the active image and turns wheel, drag, double-tap
//! and multi-touch input into a clamped, anchor-preserving transform.
//!
//! Positions passed to the engine are stage coordinates: origin at the top
//! left of the viewport, in logical pixels.
//!
//! Two animation drivers exist and never overlap:
//! - the wheel blend, advanced one step per animation frame, and
//! - eased snaps (double-tap zoom, reset), interpolated by [`presented`].
//!
//! Starting either bumps the engine's [`Generation`], so callbacks queued by
//! the other become no-ops.
//!
//! [`presented`]: GestureTransformEngine::presented

mod pinch;

#[cfg(test)]
mod tests;

use crate::config::GestureConfig;
use crate::constants::{SCALE_EPSILON, WHEEL_BLEND_FACTOR, WHEEL_POSITION_TOLERANCE, WHEEL_SCALE_TOLERANCE};
use crate::zoom_math::{self, FitMode, TransformState};
use lightbox_ui::{DragState, Easing, FrameScheduler, Generation, Point, Size, Touch, TouchId, Tween, Vector};
use pinch::PinchTracker;
use std::time::Duration;
use web_time::Instant;

/// Work the engine schedules on its own frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineTask {
    /// Advance the wheel blend by one step
    WheelFrame,
    /// No wheel input for the settle delay
    WheelSettled,
    /// Elastic reset after a pan or pinch ended
    ElasticReset,
    /// An eased snap reached its target
    EaseFinished,
}

/// Running animation, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Animation {
    Idle,
    /// Frame-by-frame blend of the presented transform towards `target`
    Wheel { target: TransformState },
    /// Eased transition; `progress` runs from 0 to 1
    Eased {
        from: TransformState,
        to: TransformState,
        progress: Tween,
    },
}

/// The interaction currently driving the transform.
#[derive(Debug, Clone, PartialEq)]
enum Session {
    None,
    Pan {
        drag: DragState,
        /// Touch driving the pan, `None` for the mouse
        touch: Option<TouchId>,
    },
    Pinch(PinchTracker),
}

/// Pan/zoom/rotate state machine for a single image.
#[derive(Debug)]
pub struct GestureTransformEngine {
    config: GestureConfig,
    viewport: Size,
    natural: Option<Size>,
    /// Settled transform; mid-blend for the wheel, the target for eased snaps
    current: TransformState,
    animation: Animation,
    generation: Generation,
    scheduler: FrameScheduler<EngineTask>,
    session: Session,
    zooming_until: Option<Instant>,
    torn_down: bool,
}

impl GestureTransformEngine {
    pub fn new(config: GestureConfig, viewport: Size) -> Self {
        Self {
            config,
            viewport,
            natural: None,
            current: TransformState::identity(),
            animation: Animation::Idle,
            generation: Generation::new(),
            scheduler: FrameScheduler::new(),
            session: Session::None,
            zooming_until: None,
            torn_down: false,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Transform the engine is heading to once running animations settle.
    pub fn transform(&self) -> TransformState {
        match self.animation {
            Animation::Wheel { target } => target,
            _ => self.current,
        }
    }

    /// Transform to draw at `now`.
    pub fn presented(&self, now: Instant) -> TransformState {
        match self.animation {
            Animation::Eased { from, to, progress } => from.lerp(&to, progress.value(now)),
            _ => self.current,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn fit_mode(&self) -> FitMode {
        self.current.fit_mode
    }

    /// Whether the wheel blend loop is running.
    pub fn is_wheeling(&self) -> bool {
        matches!(self.animation, Animation::Wheel { .. })
    }

    /// Whether a zoom snap or reset is still inside its transition window.
    pub fn is_zooming(&self, now: Instant) -> bool {
        self.zooming_until.is_some_and(|until| now < until)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.session, Session::Pan { .. })
    }

    pub fn is_pinching(&self) -> bool {
        matches!(self.session, Session::Pinch(_))
    }

    /// Whether the target scale is the minimum scale.
    pub fn is_at_rest(&self) -> bool {
        self.transform().scale <= self.config.min_scale + SCALE_EPSILON
    }

    /// Whether a single pointer should pan the image.
    pub fn can_pan(&self) -> bool {
        !self.is_at_rest() || self.config.pan_at_rest
    }

    /// Whether the host must keep calling [`tick`](Self::tick).
    pub fn has_pending_work(&self) -> bool {
        !self.scheduler.is_empty()
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    fn center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    fn display_size(&self) -> Size {
        zoom_math::display_size(self.natural, self.viewport)
    }

    /// Width- or height-constrained fit for the loaded image.
    pub fn compute_fit_mode(&self) -> FitMode {
        match self.natural {
            Some(natural) => zoom_math::compute_fit_mode(natural, self.viewport),
            None => FitMode::default(),
        }
    }

    /// Bound `candidate` so the rotated image box respects the viewport.
    pub fn clamp_position(&self, candidate: Vector, scale: f32, rotation_deg: f32) -> Vector {
        if !self.config.pan_at_rest && scale <= self.config.min_scale + SCALE_EPSILON {
            return Vector::ZERO;
        }
        zoom_math::clamp_translation(
            candidate,
            scale,
            rotation_deg,
            self.display_size(),
            self.viewport,
        )
    }

    fn clamped(&self, state: TransformState) -> TransformState {
        TransformState {
            translation: self.clamp_position(state.translation, state.scale, state.rotation_deg),
            ..state
        }
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.config.min_scale, self.config.max_scale)
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        if viewport == self.viewport {
            return;
        }
        log::debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
        self.refit();
    }

    pub fn set_natural_size(&mut self, natural: Size) {
        if !natural.is_usable() {
            log::trace!("Ignoring unusable natural size {:?}", natural);
            return;
        }
        self.natural = Some(natural);
        self.refit();
    }

    /// Recompute the fit mode and pull every live transform back in bounds.
    fn refit(&mut self) {
        let fit_mode = self.compute_fit_mode();
        let refit = |state: TransformState| TransformState { fit_mode, ..state };
        self.current = self.clamped(refit(self.current));
        self.animation = match self.animation {
            Animation::Wheel { target } => Animation::Wheel {
                target: self.clamped(refit(target)),
            },
            Animation::Eased { from, to, progress } => Animation::Eased {
                from: refit(from),
                to: self.clamped(refit(to)),
                progress,
            },
            Animation::Idle => Animation::Idle,
        };
    }

    // =========================================================================
    // Animation control
    // =========================================================================

    /// Freeze whatever is running at its presented state and invalidate
    /// every queued callback.
    fn interrupt(&mut self, now: Instant) {
        if let Animation::Eased { .. } = self.animation {
            self.current = self.presented(now);
        }
        self.animation = Animation::Idle;
        self.zooming_until = None;
        self.generation.bump();
        self.scheduler.cancel_all();
    }

    fn start_eased(&mut self, target: TransformState, duration: Duration, now: Instant) {
        let from = self.presented(now);
        self.interrupt(now);
        let target = self.clamped(target);
        self.current = target;
        if duration.is_zero() {
            return;
        }
        self.animation = Animation::Eased {
            from,
            to: target,
            progress: Tween::new(0.0, 1.0, now, duration, Easing::EaseOutCubic),
        };
        self.zooming_until = Some(now + duration);
        self.scheduler
            .schedule_after(now, duration, self.generation, EngineTask::EaseFinished);
    }

    fn schedule_elastic_reset(&mut self, now: Instant) {
        if !self.config.elastic {
            return;
        }
        self.scheduler
            .cancel_where(|task| *task == EngineTask::ElasticReset);
        self.scheduler.schedule_after(
            now,
            self.config.elastic_delay(),
            self.generation,
            EngineTask::ElasticReset,
        );
    }

    /// Run every due callback. Stale generations are skipped.
    pub fn tick(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        for (generation, task) in self.scheduler.tick(now) {
            if generation != self.generation {
                log::trace!("Dropping stale {:?} (generation {})", task, generation.value());
                continue;
            }
            match task {
                EngineTask::WheelFrame => self.step_wheel(),
                EngineTask::WheelSettled | EngineTask::ElasticReset => {
                    if matches!(self.session, Session::None) && !self.is_at_rest() {
                        log::debug!("Elastic reset after {:?}", task);
                        self.reset_transform(now);
                    }
                }
                EngineTask::EaseFinished => {
                    if let Animation::Eased { to, .. } = self.animation {
                        self.current = to;
                        self.animation = Animation::Idle;
                    }
                }
            }
        }
    }

    // =========================================================================
    // Wheel zoom
    // =========================================================================

    /// Zoom by a vertical wheel delta (px) about `anchor`.
    ///
    /// Successive events accumulate on the blend target, so a fast wheel
    /// spin zooms as far as the sum of its deltas.
    pub fn wheel(&mut self, delta_y: f32, anchor: Point, now: Instant) {
        if self.torn_down {
            return;
        }
        if !delta_y.is_finite() || !anchor.is_finite() {
            log::trace!("Ignoring non-finite wheel input");
            return;
        }
        if !matches!(self.session, Session::None) {
            return;
        }

        if let Animation::Eased { .. } = self.animation {
            self.interrupt(now);
        }
        let base = self.transform();
        let scale = self.clamp_scale(base.scale - delta_y * self.config.wheel_sensitivity);
        if (scale - base.scale).abs() < SCALE_EPSILON {
            return;
        }

        let anchor = anchor - self.center();
        let target = self.clamped(TransformState {
            scale,
            translation: base.zoom_about(anchor, scale, base.rotation_deg),
            ..base
        });
        log::trace!("Wheel zoom {:.3} -> {:.3}", base.scale, scale);

        if !self.is_wheeling() {
            self.generation.bump();
            self.scheduler.cancel_all();
            self.scheduler
                .request_frame(self.generation, EngineTask::WheelFrame);
        }
        self.animation = Animation::Wheel { target };

        if self.config.elastic {
            self.scheduler
                .cancel_where(|task| *task == EngineTask::WheelSettled);
            self.scheduler.schedule_after(
                now,
                self.config.wheel_settle(),
                self.generation,
                EngineTask::WheelSettled,
            );
        }
    }

    fn step_wheel(&mut self) {
        let Animation::Wheel { target } = self.animation else {
            return;
        };
        let blended = self.current.lerp(&target, WHEEL_BLEND_FACTOR);
        let settled = (target.scale - blended.scale).abs() < WHEEL_SCALE_TOLERANCE
            && (target.translation - blended.translation).length() < WHEEL_POSITION_TOLERANCE;
        if settled {
            self.current = target;
            self.animation = Animation::Idle;
        } else {
            self.current = blended;
            self.scheduler
                .request_frame(self.generation, EngineTask::WheelFrame);
        }
    }

    // =========================================================================
    // Pan
    // =========================================================================

    /// Start a single-pointer pan. Returns `false` when panning is not
    /// available at the current scale.
    pub fn begin_pan(&mut self, position: Point, now: Instant) -> bool {
        self.begin_pan_with(position, None, now)
    }

    fn begin_pan_with(&mut self, position: Point, touch: Option<TouchId>, now: Instant) -> bool {
        if self.torn_down || !position.is_finite() || !self.can_pan() {
            return false;
        }
        self.interrupt(now);
        let mut drag = DragState::default();
        drag.start_drag(position, self.current.translation);
        self.session = Session::Pan { drag, touch };
        true
    }

    pub fn pan_to(&mut self, position: Point) {
        if !position.is_finite() {
            log::trace!("Ignoring non-finite pan position");
            return;
        }
        let Session::Pan { drag, .. } = &self.session else {
            return;
        };
        if let Some(offset) = drag.offset_for(position) {
            self.current.translation =
                self.clamp_position(offset, self.current.scale, self.current.rotation_deg);
        }
    }

    pub fn end_pan(&mut self, now: Instant) {
        if self.is_panning() {
            self.session = Session::None;
            self.schedule_elastic_reset(now);
        }
    }

    // =========================================================================
    // Multi-touch
    // =========================================================================

    /// Feed the touches currently in contact. Behaviour depends only on
    /// their count.
    pub fn update_touches(&mut self, touches: &[Touch], now: Instant) {
        if self.torn_down {
            return;
        }
        match touches {
            [] => self.end_touches(now),
            [touch] => self.single_touch(*touch, now),
            [a, b, ..] => self.pinch(*a, *b, now),
        }
    }

    fn end_touches(&mut self, now: Instant) {
        if !matches!(self.session, Session::None) {
            self.session = Session::None;
            self.schedule_elastic_reset(now);
        }
    }

    fn single_touch(&mut self, touch: Touch, now: Instant) {
        let same_pan = matches!(
            self.session,
            Session::Pan { touch: Some(id), .. } if id == touch.id
        );
        if same_pan {
            self.pan_to(touch.position);
        } else if self.is_pinching() {
            // Hand off without interrupting: the pan starts from wherever
            // the pinch left the image.
            self.session = Session::None;
            if self.can_pan() && touch.position.is_finite() {
                let mut drag = DragState::default();
                drag.start_drag(touch.position, self.current.translation);
                self.session = Session::Pan {
                    drag,
                    touch: Some(touch.id),
                };
            }
        } else {
            self.begin_pan_with(touch.position, Some(touch.id), now);
        }
    }

    fn pinch(&mut self, a: Touch, b: Touch, now: Instant) {
        let center = self.center();
        let tracked = matches!(&self.session, Session::Pinch(tracker) if tracker.tracks(&a, &b));
        if !tracked {
            if !a.position.is_finite() || !b.position.is_finite() {
                return;
            }
            self.interrupt(now);
            log::trace!("Pinch started with touches {} and {}", a.id, b.id);
            self.session = Session::Pinch(PinchTracker::new(a, b, center, self.current));
            return;
        }

        let Session::Pinch(tracker) = &mut self.session else {
            return;
        };
        if let Some(state) = tracker.update(a, b, center, &self.config) {
            self.current = self.clamped(state);
        }
    }

    // =========================================================================
    // Snaps and resets
    // =========================================================================

    /// Double-click/double-tap: zoom in about `point`, or back to identity
    /// when already zoomed.
    pub fn toggle_zoom_at(&mut self, point: Point, now: Instant) {
        if self.torn_down || !point.is_finite() {
            return;
        }
        self.session = Session::None;
        let base = self.transform();
        let target = if self.is_at_rest() {
            let scale = self.clamp_scale(self.config.double_tap_scale);
            TransformState {
                scale,
                translation: base.zoom_about(point - self.center(), scale, base.rotation_deg),
                ..base
            }
        } else {
            TransformState::identity_with_fit(base.fit_mode)
        };
        log::debug!("Double-tap zoom {:.2} -> {:.2}", base.scale, target.scale);
        self.start_eased(target, self.config.double_tap_duration(), now);
    }

    /// Animate back to identity.
    pub fn reset_transform(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        self.session = Session::None;
        let target = TransformState::identity_with_fit(self.current.fit_mode);
        self.start_eased(target, self.config.reset_duration(), now);
    }

    /// Jump to identity for a newly activated image.
    ///
    /// The previous image's natural size no longer applies; the host reports
    /// the new one with [`set_natural_size`](Self::set_natural_size).
    pub fn reset_for_image(&mut self) {
        self.generation.bump();
        self.scheduler.cancel_all();
        self.animation = Animation::Idle;
        self.session = Session::None;
        self.zooming_until = None;
        self.natural = None;
        self.current = TransformState::identity();
    }

    /// Drop the running gesture (window blur, cancelled touches).
    pub fn cancel_gesture(&mut self) {
        if !matches!(self.session, Session::None) {
            log::debug!("Gesture cancelled");
            self.session = Session::None;
        }
    }

    /// Cancel everything; later calls are no-ops.
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.generation.bump();
        if let Animation::Wheel { target } | Animation::Eased { to: target, .. } = self.animation {
            self.current = target;
        }
        self.animation = Animation::Idle;
        self.session = Session::None;
        self.zooming_until = None;
        self.torn_down = true;
    }
}
