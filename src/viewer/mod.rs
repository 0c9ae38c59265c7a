//! Viewer controller.
//!
//! Single entry point for every input event. Decides whether a pointer is a
//! tap, a swipe or a pan, routes multi-touch and wheel input to the
//! [`GestureTransformEngine`], animates slides between images and keeps the
//! [`ThumbnailSynchronizer`] on the active index.

mod frame;
mod navigation;
mod tap;

#[cfg(test)]
mod properties;

pub use frame::ViewerFrame;
pub use navigation::{NavState, SlideDirection, SlideTransition};

use crate::config::{NavigationConfig, ViewerConfig};
use crate::error::ViewerError;
use crate::gesture::GestureTransformEngine;
use crate::model::{ImageRef, ImageSet};
use crate::thumbnails::ThumbnailSynchronizer;
use lightbox_ui::{
    Easing, Event, FrameScheduler, Generation, HitTarget, KeyCode, MouseButton, Point, Size,
    Touch, Tween,
};
use navigation::bounded_offset;
use tap::{PointerSession, PointerSource};
use web_time::Instant;

/// Track moves shorter than this finish without animating.
const MIN_TRACK_DISTANCE_PX: f32 = 0.5;

/// Delayed work owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewerTask {
    /// Single tap confirmed: no second tap arrived in time
    ToggleChrome,
    /// A slide transition reached its end
    TransitionDone,
    /// Close animation finished; notify the host
    CloseNotify,
}

/// Host callback fired once when the viewer has closed.
pub type CloseCallback = Box<dyn FnMut()>;

/// Full-screen image viewer state machine.
pub struct ViewerController {
    images: ImageSet,
    active: usize,
    config: NavigationConfig,
    engine: GestureTransformEngine,
    thumbnails: ThumbnailSynchronizer,
    state: NavState,
    pointer: Option<PointerSession>,
    /// The current touch sequence began on chrome; ignored until all fingers lift
    touch_on_chrome: bool,
    chrome_visible: bool,
    closing: bool,
    on_close: Option<CloseCallback>,
    /// Cancels a pending chrome toggle
    tap_generation: Generation,
    /// Cancels pending transition and close callbacks
    nav_generation: Generation,
    scheduler: FrameScheduler<ViewerTask>,
    torn_down: bool,
}

impl ViewerController {
    /// Open a viewer on `images` at `initial_index`.
    ///
    /// An out-of-range index is clamped to the last image.
    pub fn new(
        images: ImageSet,
        initial_index: usize,
        config: &ViewerConfig,
        viewport: Size,
    ) -> Result<Self, ViewerError> {
        let last = images.last_index().ok_or(ViewerError::EmptyImageSet)?;
        let active = if initial_index > last {
            log::warn!(
                "Initial index {} out of range for {} images, clamping to {}",
                initial_index,
                images.len(),
                last
            );
            last
        } else {
            initial_index
        };

        let mut thumbnails = ThumbnailSynchronizer::new(config.thumbnails.clone(), images.len(), active);
        thumbnails.set_strip_width(viewport.width);

        log::debug!("Viewer opened at {} of {}", active, images.len());
        Ok(Self {
            images,
            active,
            config: config.navigation.clone(),
            engine: GestureTransformEngine::new(config.gestures.clone(), viewport),
            thumbnails,
            state: NavState::Idle,
            pointer: None,
            touch_on_chrome: false,
            chrome_visible: true,
            closing: false,
            on_close: None,
            tap_generation: Generation::new(),
            nav_generation: Generation::new(),
            scheduler: FrameScheduler::new(),
            torn_down: false,
        })
    }

    /// Register the host's close notification.
    pub fn with_on_close(mut self, on_close: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(on_close));
        self
    }

    pub fn set_on_close(&mut self, on_close: impl FnMut() + 'static) {
        self.on_close = Some(Box::new(on_close));
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn images(&self) -> &ImageSet {
        &self.images
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn engine(&self) -> &GestureTransformEngine {
        &self.engine
    }

    pub fn thumbnails(&self) -> &ThumbnailSynchronizer {
        &self.thumbnails
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, NavState::AnimatingTransition(_))
    }

    pub fn chrome_visible(&self) -> bool {
        self.chrome_visible
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Whether the viewer no longer reacts to anything.
    pub fn is_closed(&self) -> bool {
        self.torn_down
    }

    /// Whether the host must keep driving [`tick`](Self::tick).
    pub fn needs_tick(&self) -> bool {
        !self.torn_down
            && (!self.scheduler.is_empty()
                || self.engine.has_pending_work()
                || self.thumbnails.is_scrolling())
    }

    fn width(&self) -> f32 {
        let width = self.engine.viewport().width;
        if width.is_finite() { width.max(0.0) } else { 0.0 }
    }

    fn last_index(&self) -> usize {
        self.images.len() - 1
    }

    fn set_state(&mut self, state: NavState) {
        if self.state.name() != state.name() {
            log::debug!("Navigation {} -> {}", self.state.name(), state.name());
        }
        self.state = state;
    }

    // =========================================================================
    // Event dispatch
    // =========================================================================

    pub fn handle_event(&mut self, event: &Event, now: Instant) {
        if self.torn_down {
            return;
        }
        if self.closing {
            // Only the close animation is left to play
            return;
        }
        match event {
            Event::MousePressed {
                button: MouseButton::Left,
                position,
                target,
            } => {
                if target.is_chrome() {
                    return;
                }
                self.pointer_down(PointerSource::Mouse, *position, now);
            }
            Event::MouseMoved { position } => {
                if self.pointer_source() == Some(PointerSource::Mouse) {
                    self.pointer_move(*position, None, now);
                }
            }
            Event::MouseReleased {
                button: MouseButton::Left,
                position,
            } => {
                if self.pointer_source() == Some(PointerSource::Mouse) {
                    self.release(Some(*position), true, now);
                }
            }
            Event::MousePressed { .. } | Event::MouseReleased { .. } => {}
            Event::TouchStart { touches, target } => {
                self.touches_changed(touches, Some(*target), now)
            }
            Event::TouchMove { touches } | Event::TouchEnd { touches } => {
                self.touches_changed(touches, None, now)
            }
            Event::TouchCancel | Event::WindowBlur => self.cancel_interaction(now),
            Event::GlobalPointerUp => {
                if self.pointer.is_some() {
                    log::trace!("Pointer released outside the stage");
                    self.engine.update_touches(&[], now);
                    self.release(None, false, now);
                }
            }
            Event::Wheel { delta, position } => {
                if matches!(self.state, NavState::Idle | NavState::PinchActive) {
                    self.engine.wheel(delta.vertical_pixels(), *position, now);
                }
            }
            Event::KeyPressed { key } => match key {
                KeyCode::Escape => self.close(now),
                KeyCode::Left => self.previous(now),
                KeyCode::Right => self.next(now),
                _ => {}
            },
            Event::Resized { viewport } => self.set_viewport(*viewport, now),
            Event::ImageLoaded { natural } => self.engine.set_natural_size(*natural),
        }
    }

    fn pointer_source(&self) -> Option<PointerSource> {
        self.pointer.as_ref().map(|session| session.source)
    }

    // =========================================================================
    // Pointer handling
    // =========================================================================

    fn pointer_down(&mut self, source: PointerSource, position: Point, now: Instant) {
        if self.is_animating() {
            log::trace!("Ignoring press during slide transition");
            return;
        }
        if !position.is_finite() {
            return;
        }
        let mut session = PointerSession::new(source, position, now);
        if self.engine.can_pan() {
            session.panning = match source {
                PointerSource::Mouse => self.engine.begin_pan(position, now),
                PointerSource::Touch(id) => {
                    self.engine.update_touches(&[Touch::new(id, position)], now);
                    self.engine.is_panning()
                }
            };
        }
        self.pointer = Some(session);
    }

    fn pointer_move(&mut self, position: Point, touch: Option<Touch>, now: Instant) {
        if !position.is_finite() {
            log::trace!("Ignoring non-finite pointer position");
            return;
        }
        let slop = self.config.tap_max_movement_px;
        let Some(session) = self.pointer.as_mut() else {
            return;
        };
        let delta = session.move_to(position, slop);
        if session.panning {
            match touch {
                Some(touch) => self.engine.update_touches(&[touch], now),
                None => self.engine.pan_to(position),
            }
            return;
        }
        if session.multi_touch {
            return;
        }

        let (active, last) = (self.active, self.last_index());
        match self.state {
            NavState::Idle => {
                let armed = delta.x.abs() > self.config.swipe_activation_px
                    && self.engine.is_at_rest()
                    && !self.engine.is_pinching();
                if armed {
                    self.set_state(NavState::SwipeArmed {
                        offset: bounded_offset(delta.x, active, last),
                    });
                }
            }
            NavState::SwipeArmed { .. } => {
                self.state = NavState::SwipeArmed {
                    offset: bounded_offset(delta.x, active, last),
                };
            }
            NavState::PinchActive | NavState::AnimatingTransition(_) => {}
        }
    }

    /// End the pointer session. Taps are only recognised from real releases.
    fn release(&mut self, position: Option<Point>, detect_taps: bool, now: Instant) {
        let Some(mut session) = self.pointer.take() else {
            return;
        };
        if let Some(position) = position.filter(|p| p.is_finite()) {
            session.move_to(position, self.config.tap_max_movement_px);
        }
        if session.panning && session.source == PointerSource::Mouse {
            self.engine.end_pan(now);
        }

        match self.state {
            NavState::SwipeArmed { offset } => self.release_swipe(offset, now),
            NavState::PinchActive => self.set_state(NavState::Idle),
            NavState::Idle => {
                if detect_taps && session.is_tap(now, &self.config) {
                    self.register_tap(session.last, now);
                }
            }
            NavState::AnimatingTransition(_) => {}
        }
    }

    /// `pressed_on` is the hit target of a `TouchStart`; moves and lifts
    /// carry none and never open a new session.
    fn touches_changed(&mut self, touches: &[Touch], pressed_on: Option<HitTarget>, now: Instant) {
        if self.touch_on_chrome {
            if touches.is_empty() {
                log::trace!("Chrome touch sequence ended");
                self.touch_on_chrome = false;
            }
            return;
        }
        let on_chrome = pressed_on.is_some_and(|target| target.is_chrome());
        if on_chrome && self.pointer.is_none() && !touches.is_empty() {
            log::trace!("Touch sequence started on chrome");
            self.touch_on_chrome = true;
            return;
        }
        match touches {
            [] => {
                self.engine.update_touches(&[], now);
                if self.pointer.is_some() {
                    let last = self.pointer.as_ref().map(|session| session.last);
                    self.release(last, true, now);
                } else if self.state == NavState::PinchActive {
                    self.set_state(NavState::Idle);
                }
            }
            [touch] => self.single_touch(*touch, pressed_on, now),
            [..] => self.multi_touch(touches, now),
        }
    }

    fn single_touch(&mut self, touch: Touch, pressed_on: Option<HitTarget>, now: Instant) {
        if self.engine.is_pinching() {
            // One finger lifted: the engine hands off to a pan
            self.engine.update_touches(&[touch], now);
            let panning = self.engine.is_panning();
            if let Some(session) = self.pointer.as_mut() {
                session.source = PointerSource::Touch(touch.id);
                session.last = touch.position;
                session.panning = panning;
            }
            if self.state == NavState::PinchActive {
                self.set_state(NavState::Idle);
            }
            return;
        }

        match self.pointer_source() {
            None => {
                if pressed_on == Some(HitTarget::Stage) {
                    self.pointer_down(PointerSource::Touch(touch.id), touch.position, now);
                } else {
                    log::trace!("Ignoring touch {} without a stage press", touch.id);
                }
            }
            Some(PointerSource::Touch(id)) if id == touch.id => {
                self.pointer_move(touch.position, Some(touch), now)
            }
            Some(_) => {
                if let Some(session) = self.pointer.as_mut() {
                    session.source = PointerSource::Touch(touch.id);
                    session.last = touch.position;
                }
            }
        }
    }

    fn multi_touch(&mut self, touches: &[Touch], now: Instant) {
        if self.is_animating() {
            return;
        }
        match self.pointer.as_mut() {
            Some(session) => {
                session.multi_touch = true;
                session.panning = false;
            }
            None => {
                let first = touches[0];
                let mut session = PointerSession::new(PointerSource::Touch(first.id), first.position, now);
                session.multi_touch = true;
                self.pointer = Some(session);
            }
        }
        if self.state != NavState::PinchActive {
            self.set_state(NavState::PinchActive);
        }
        self.engine.update_touches(touches, now);
    }

    /// Window blur or cancelled touches: drop the gesture, snap back a swipe.
    fn cancel_interaction(&mut self, now: Instant) {
        self.pointer = None;
        self.touch_on_chrome = false;
        self.engine.cancel_gesture();
        match self.state {
            NavState::SwipeArmed { offset } => self.start_transition(offset, 0.0, None, now),
            NavState::PinchActive => self.set_state(NavState::Idle),
            NavState::Idle | NavState::AnimatingTransition(_) => {}
        }
    }

    // =========================================================================
    // Taps
    // =========================================================================

    fn register_tap(&mut self, position: Point, now: Instant) {
        let pending = self.scheduler.has(|task| *task == ViewerTask::ToggleChrome);
        self.tap_generation.bump();
        if pending {
            self.scheduler.cancel_where(|task| *task == ViewerTask::ToggleChrome);
            log::debug!("Double tap at ({:.0}, {:.0})", position.x, position.y);
            self.engine.toggle_zoom_at(position, now);
        } else {
            self.scheduler.schedule_after(
                now,
                self.config.chrome_toggle_delay(),
                self.tap_generation,
                ViewerTask::ToggleChrome,
            );
        }
    }

    // =========================================================================
    // Slide transitions
    // =========================================================================

    fn release_swipe(&mut self, offset: f32, now: Instant) {
        let width = self.width();
        let target = if offset.abs() > self.config.commit_threshold_px {
            if offset < 0.0 {
                Some(self.active + 1).filter(|index| *index <= self.last_index())
            } else {
                self.active.checked_sub(1)
            }
        } else {
            None
        };
        match target {
            Some(index) => {
                let to = if offset < 0.0 { -width } else { width };
                log::debug!("Swipe commits {} -> {}", self.active, index);
                self.start_transition(offset, to, Some(index), now);
            }
            None => self.start_transition(offset, 0.0, None, now),
        }
    }

    fn start_transition(&mut self, from: f32, to: f32, target: Option<usize>, now: Instant) {
        self.nav_generation.bump();
        self.scheduler.cancel_where(|task| *task == ViewerTask::TransitionDone);

        let distance = (to - from).abs();
        if !distance.is_finite() || distance < MIN_TRACK_DISTANCE_PX {
            self.finish_transition(target, now);
            return;
        }
        let duration = self.config.transition_duration(distance, self.width());
        self.set_state(NavState::AnimatingTransition(SlideTransition {
            direction: SlideDirection::of_move(from, to),
            target_index: target,
            track: Tween::new(from, to, now, duration, Easing::EaseOutCubic),
        }));
        self.scheduler
            .schedule_after(now, duration, self.nav_generation, ViewerTask::TransitionDone);
    }

    fn finish_transition(&mut self, target: Option<usize>, now: Instant) {
        self.set_state(NavState::Idle);
        if let Some(index) = target.filter(|index| *index != self.active) {
            log::debug!("Active image {} -> {}", self.active, index);
            self.active = index;
            self.engine.reset_for_image();
            self.thumbnails.observe_active(index, now);
        }
    }

    /// Move straight to `index` with a single width-long slide.
    pub fn slide_to(&mut self, index: usize, now: Instant) {
        if self.torn_down || self.closing {
            return;
        }
        if index >= self.images.len() {
            log::debug!("Ignoring slide to {} (count {})", index, self.images.len());
            return;
        }
        if index == self.active || self.is_animating() {
            return;
        }
        // An armed swipe hands its current offset to the slide
        let from = self.state.track_offset(now);
        if self.pointer.take().is_some() {
            self.engine.cancel_gesture();
        }
        let width = self.width();
        let to = if index > self.active { -width } else { width };
        self.start_transition(from, to, Some(index), now);
    }

    /// Advance to the next image, if any.
    pub fn next(&mut self, now: Instant) {
        if self.active < self.last_index() {
            self.slide_to(self.active + 1, now);
        } else {
            log::debug!("Already at the last image");
        }
    }

    /// Go back to the previous image, if any.
    pub fn previous(&mut self, now: Instant) {
        match self.active.checked_sub(1) {
            Some(index) => self.slide_to(index, now),
            None => log::debug!("Already at the first image"),
        }
    }

    /// Re-target the viewer at `index` without animation.
    pub fn open_at(&mut self, index: usize) {
        if self.torn_down || self.closing {
            return;
        }
        if index >= self.images.len() {
            log::debug!("Ignoring open at {} (count {})", index, self.images.len());
            return;
        }
        self.nav_generation.bump();
        self.scheduler.cancel_where(|task| *task == ViewerTask::TransitionDone);
        self.pointer = None;
        self.set_state(NavState::Idle);
        self.active = index;
        self.engine.reset_for_image();
        self.thumbnails.jump_to(index);
        log::debug!("Viewer re-opened at {}", index);
    }

    /// Thumbnail `index` was clicked.
    pub fn thumbnail_clicked(&mut self, index: usize, now: Instant) {
        self.slide_to(index, now);
    }

    /// The thumbnail strip was clicked at strip-local `x`.
    pub fn thumbnail_strip_clicked(&mut self, x: f32, now: Instant) {
        if let Some(index) = self.thumbnails.thumbnail_at(x, now) {
            self.slide_to(index, now);
        }
    }

    fn set_viewport(&mut self, viewport: Size, now: Instant) {
        if let NavState::AnimatingTransition(transition) = self.state {
            // Track offsets are in old pixels; land immediately
            self.nav_generation.bump();
            self.scheduler.cancel_where(|task| *task == ViewerTask::TransitionDone);
            self.finish_transition(transition.target_index, now);
        }
        self.engine.set_viewport(viewport);
        self.thumbnails.set_strip_width(viewport.width);
    }

    // =========================================================================
    // Close and teardown
    // =========================================================================

    /// Play the close animation, then notify the host.
    pub fn close(&mut self, now: Instant) {
        if self.torn_down || self.closing {
            return;
        }
        log::debug!("Closing viewer");
        self.closing = true;
        self.pointer = None;
        self.engine.cancel_gesture();
        self.set_state(NavState::Idle);
        self.scheduler.cancel_all();
        self.nav_generation.bump();
        self.scheduler.schedule_after(
            now,
            self.config.close_animation(),
            self.nav_generation,
            ViewerTask::CloseNotify,
        );
    }

    fn notify_close(&mut self) {
        let callback = self.on_close.take();
        self.teardown();
        if let Some(mut callback) = callback {
            callback();
        }
    }

    /// Run every due callback and advance the engine and thumbnail strip.
    pub fn tick(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        self.engine.tick(now);
        self.thumbnails.tick(now);
        for (generation, task) in self.scheduler.tick(now) {
            match task {
                ViewerTask::ToggleChrome if generation == self.tap_generation => {
                    self.chrome_visible = !self.chrome_visible;
                    log::debug!("Chrome visible: {}", self.chrome_visible);
                }
                ViewerTask::TransitionDone if generation == self.nav_generation => {
                    if let NavState::AnimatingTransition(transition) = self.state {
                        self.finish_transition(transition.target_index, now);
                    }
                }
                ViewerTask::CloseNotify if generation == self.nav_generation => {
                    self.notify_close();
                    return;
                }
                _ => log::trace!("Dropping stale {:?}", task),
            }
        }
    }

    /// Cancel every pending callback; later calls are no-ops and the close
    /// notification never fires.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.scheduler.cancel_all();
        self.tap_generation.bump();
        self.nav_generation.bump();
        self.engine.teardown();
        self.thumbnails.teardown();
        self.pointer = None;
        self.state = NavState::Idle;
        self.on_close = None;
        self.torn_down = true;
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Snapshot of everything to draw at `now`.
    pub fn frame(&self, now: Instant) -> ViewerFrame {
        let (previous_panel, next_panel) = self.side_panels();
        ViewerFrame {
            active_index: self.active,
            active_image: self.images[self.active].clone(),
            transform: self.engine.presented(now),
            track_offset: self.state.track_offset(now),
            previous_panel,
            next_panel,
            chrome_visible: self.chrome_visible,
            closing: self.closing,
            transition_active: self.is_animating(),
            wheeling: self.engine.is_wheeling(),
            zooming: self.engine.is_zooming(now),
            thumbnail_offset: self.thumbnails.offset(now),
            visible_thumbnails: self.thumbnails.visible_range(now),
        }
    }

    /// Images to draw beside the active one. Only the side being revealed is
    /// populated, and only while the track is moving.
    ///
    /// A jump to a higher index slides the track left, so its destination is
    /// drawn in the right-hand `next_panel` where the track uncovers it, not
    /// on the left.
    fn side_panels(&self) -> (Option<ImageRef>, Option<ImageRef>) {
        let reveal_next = match self.state {
            NavState::SwipeArmed { offset } if offset < 0.0 => true,
            NavState::SwipeArmed { offset } if offset > 0.0 => false,
            NavState::AnimatingTransition(transition) => match transition.target_index {
                Some(index) => index > self.active,
                None => transition.track.from < 0.0,
            },
            _ => return (None, None),
        };
        let target = match self.state {
            NavState::AnimatingTransition(transition) => transition.target_index,
            _ => None,
        };
        let index = match target {
            Some(index) => Some(index),
            None if reveal_next => Some(self.active + 1),
            None => self.active.checked_sub(1),
        };
        let image = index.and_then(|index| self.images.get(index)).cloned();
        if reveal_next {
            (None, image)
        } else {
            (image, None)
        }
    }
}

impl Drop for ViewerController {
    fn drop(&mut self) {
        self.teardown();
    }
}
