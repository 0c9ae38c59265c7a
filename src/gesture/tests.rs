use super::*;

const EPSILON: f32 = 0.01;
const FRAME: Duration = Duration::from_millis(16);

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn viewport() -> Size {
    Size::new(800.0, 600.0)
}

fn engine() -> GestureTransformEngine {
    GestureTransformEngine::new(GestureConfig::default(), viewport())
}

/// Tick at frame cadence until nothing is scheduled.
fn settle(engine: &mut GestureTransformEngine, start: Instant) -> Instant {
    let mut now = start;
    for _ in 0..500 {
        if !engine.has_pending_work() {
            break;
        }
        now += FRAME;
        engine.tick(now);
    }
    now
}

fn zoomed_in(engine: &mut GestureTransformEngine, start: Instant) -> Instant {
    engine.toggle_zoom_at(Point::new(400.0, 300.0), start);
    settle(engine, start)
}

#[test]
fn wheel_zoom_blends_to_target() {
    let mut engine = engine();
    let start = Instant::now();
    engine.wheel(-400.0, Point::new(400.0, 300.0), start);

    assert!(engine.is_wheeling());
    assert!(approx_eq(engine.transform().scale, 1.6));
    // Nothing moves until the first frame
    assert!(approx_eq(engine.presented(start).scale, 1.0));

    engine.tick(start + FRAME);
    let first = engine.presented(start + FRAME).scale;
    assert!(first > 1.0 && first < 1.6);

    let end = settle(&mut engine, start + FRAME);
    assert!(!engine.is_wheeling());
    assert!(approx_eq(engine.presented(end).scale, 1.6));
}

#[test]
fn wheel_zoom_keeps_anchor_fixed() {
    let mut engine = engine();
    let start = Instant::now();
    let anchor = Point::new(600.0, 200.0);
    let center = Point::new(400.0, 300.0);
    let local = engine.presented(start).to_local(anchor - center);

    engine.wheel(-400.0, anchor, start);
    let end = settle(&mut engine, start);

    let screen = center + engine.presented(end).to_relative(local);
    assert!(screen.distance(anchor) < 1.0);
}

#[test]
fn wheel_events_accumulate_on_target() {
    let mut engine = engine();
    let start = Instant::now();
    engine.wheel(-200.0, Point::new(400.0, 300.0), start);
    engine.tick(start + FRAME);
    engine.wheel(-200.0, Point::new(400.0, 300.0), start + FRAME);
    assert!(approx_eq(engine.transform().scale, 1.6));
}

#[test]
fn wheel_beyond_limits_is_noop() {
    let mut engine = engine();
    let start = Instant::now();
    engine.wheel(500.0, Point::new(400.0, 300.0), start);
    assert!(!engine.is_wheeling());
    assert!(!engine.has_pending_work());

    engine.wheel(-10_000.0, Point::new(400.0, 300.0), start);
    let end = settle(&mut engine, start);
    assert!(approx_eq(engine.transform().scale, 4.0));

    engine.wheel(-100.0, Point::new(400.0, 300.0), end);
    assert!(!engine.is_wheeling());
}

#[test]
fn wheel_ignores_non_finite_input() {
    let mut engine = engine();
    let start = Instant::now();
    engine.wheel(f32::NAN, Point::new(400.0, 300.0), start);
    engine.wheel(-100.0, Point::new(f32::INFINITY, 0.0), start);
    assert!(!engine.has_pending_work());
    assert!(engine.transform().is_identity(EPSILON));
}

#[test]
fn double_tap_toggles_between_rest_and_zoom() {
    let mut engine = engine();
    let start = Instant::now();

    engine.toggle_zoom_at(Point::new(500.0, 350.0), start);
    assert!(engine.is_zooming(start + Duration::from_millis(100)));
    let end = settle(&mut engine, start);
    let zoomed = engine.presented(end);
    assert!(approx_eq(zoomed.scale, 2.0));
    assert!(approx_eq(zoomed.translation.x, -100.0));
    assert!(approx_eq(zoomed.translation.y, -50.0));
    assert!(!engine.is_zooming(end));

    engine.toggle_zoom_at(Point::new(200.0, 100.0), end);
    let end = settle(&mut engine, end);
    let rest = engine.presented(end);
    assert!(approx_eq(rest.scale, 1.0));
    assert_eq!(rest.translation, Vector::ZERO);
}

#[test]
fn eased_snap_interpolates() {
    let mut engine = engine();
    let start = Instant::now();
    engine.toggle_zoom_at(Point::new(400.0, 300.0), start);

    let halfway = engine.presented(start + Duration::from_millis(140)).scale;
    assert!(halfway > 1.0 && halfway < 2.0);
    assert!(approx_eq(engine.transform().scale, 2.0));
}

#[test]
fn double_tap_cancels_wheel_blend() {
    let mut engine = engine();
    let start = Instant::now();
    engine.wheel(-1000.0, Point::new(400.0, 300.0), start);
    engine.tick(start + FRAME);
    engine.toggle_zoom_at(Point::new(400.0, 300.0), start + FRAME);

    assert!(!engine.is_wheeling());
    let end = settle(&mut engine, start + FRAME);
    // The wheel target is past rest, so the toggle zooms out
    assert!(approx_eq(engine.presented(end).scale, 1.0));
}

#[test]
fn pan_requires_zoom() {
    let mut engine = engine();
    let start = Instant::now();
    assert!(!engine.begin_pan(Point::new(100.0, 100.0), start));
    assert!(!engine.is_panning());
}

#[test]
fn pan_at_rest_when_enabled() {
    let config = GestureConfig {
        pan_at_rest: true,
        ..GestureConfig::default()
    };
    let mut engine = GestureTransformEngine::new(config, viewport());
    engine.set_natural_size(Size::new(1600.0, 400.0));
    let start = Instant::now();
    assert!(engine.begin_pan(Point::new(100.0, 100.0), start));
    engine.pan_to(Point::new(100.0, 150.0));
    // 200px tall image in a 600px frame: 200px of vertical slack
    assert!(approx_eq(engine.transform().translation.y, 50.0));
}

#[test]
fn pan_follows_pointer_and_clamps() {
    let mut engine = engine();
    let now = zoomed_in(&mut engine, Instant::now());

    assert!(engine.begin_pan(Point::new(100.0, 100.0), now));
    engine.pan_to(Point::new(150.0, 120.0));
    let t = engine.transform().translation;
    assert!(approx_eq(t.x, 50.0));
    assert!(approx_eq(t.y, 20.0));

    engine.pan_to(Point::new(2000.0, -2000.0));
    let t = engine.transform().translation;
    assert!(approx_eq(t.x, 400.0));
    assert!(approx_eq(t.y, -300.0));

    engine.end_pan(now);
    assert!(!engine.is_panning());
    assert!(!engine.has_pending_work());
}

#[test]
fn pinch_doubles_scale_and_hands_off_to_pan() {
    let mut engine = engine();
    let now = Instant::now();

    engine.update_touches(
        &[
            Touch::new(1, Point::new(350.0, 300.0)),
            Touch::new(2, Point::new(450.0, 300.0)),
        ],
        now,
    );
    assert!(engine.is_pinching());

    engine.update_touches(
        &[
            Touch::new(1, Point::new(300.0, 300.0)),
            Touch::new(2, Point::new(500.0, 300.0)),
        ],
        now,
    );
    assert!(approx_eq(engine.transform().scale, 2.0));

    // Lift the second finger: the first keeps panning from here
    engine.update_touches(&[Touch::new(1, Point::new(300.0, 300.0))], now);
    assert!(engine.is_panning());
    assert!(approx_eq(engine.transform().scale, 2.0));
    assert!(approx_eq(engine.transform().translation.x, 0.0));

    engine.update_touches(&[Touch::new(1, Point::new(320.0, 310.0))], now);
    assert!(approx_eq(engine.transform().translation.x, 20.0));
    assert!(approx_eq(engine.transform().translation.y, 10.0));

    engine.update_touches(&[], now);
    assert!(!engine.is_panning());
    assert!(!engine.is_pinching());
}

#[test]
fn pinch_restarts_when_touches_change() {
    let mut engine = engine();
    let now = Instant::now();
    engine.update_touches(
        &[
            Touch::new(1, Point::new(350.0, 300.0)),
            Touch::new(2, Point::new(450.0, 300.0)),
        ],
        now,
    );
    // A different second finger: new baseline, no jump
    engine.update_touches(
        &[
            Touch::new(1, Point::new(350.0, 300.0)),
            Touch::new(3, Point::new(550.0, 300.0)),
        ],
        now,
    );
    assert!(approx_eq(engine.transform().scale, 1.0));
}

#[test]
fn pinch_cancels_running_snap() {
    let mut engine = engine();
    let start = Instant::now();
    engine.toggle_zoom_at(Point::new(400.0, 300.0), start);
    let mid = start + Duration::from_millis(100);
    let presented = engine.presented(mid).scale;

    engine.update_touches(
        &[
            Touch::new(1, Point::new(350.0, 300.0)),
            Touch::new(2, Point::new(450.0, 300.0)),
        ],
        mid,
    );
    assert!(!engine.has_pending_work());
    assert!(approx_eq(engine.transform().scale, presented));
}

#[test]
fn reset_flags_zooming_for_transition_window() {
    let mut engine = engine();
    let now = zoomed_in(&mut engine, Instant::now());

    engine.reset_transform(now);
    assert!(engine.is_zooming(now + Duration::from_millis(200)));
    assert!(!engine.is_zooming(now + Duration::from_millis(220)));

    let end = settle(&mut engine, now);
    assert!(engine.presented(end).is_identity(EPSILON));
}

#[test]
fn elastic_mode_resets_after_pan() {
    let config = GestureConfig {
        elastic: true,
        ..GestureConfig::default()
    };
    let mut engine = GestureTransformEngine::new(config, viewport());
    let now = zoomed_in(&mut engine, Instant::now());

    engine.begin_pan(Point::new(100.0, 100.0), now);
    engine.pan_to(Point::new(150.0, 100.0));
    engine.end_pan(now);

    engine.tick(now + Duration::from_millis(100));
    assert!(approx_eq(engine.transform().scale, 2.0));

    engine.tick(now + Duration::from_millis(150));
    assert!(engine.is_zooming(now + Duration::from_millis(160)));
    let end = settle(&mut engine, now + Duration::from_millis(150));
    assert!(engine.presented(end).is_identity(EPSILON));
}

#[test]
fn elastic_mode_resets_after_wheel_settles() {
    let config = GestureConfig {
        elastic: true,
        ..GestureConfig::default()
    };
    let mut engine = GestureTransformEngine::new(config, viewport());
    let start = Instant::now();
    engine.wheel(-400.0, Point::new(400.0, 300.0), start);
    let end = settle(&mut engine, start);
    assert!(engine.presented(end).is_identity(EPSILON));
}

#[test]
fn natural_size_sets_fit_mode() {
    let mut engine = engine();
    assert_eq!(engine.compute_fit_mode(), FitMode::FitWidth);
    engine.set_natural_size(Size::new(600.0, 900.0));
    assert_eq!(engine.fit_mode(), FitMode::FitHeight);
    engine.set_natural_size(Size::new(f32::NAN, 10.0));
    assert_eq!(engine.fit_mode(), FitMode::FitHeight);
}

#[test]
fn resize_reclamps_translation() {
    let mut engine = engine();
    let now = zoomed_in(&mut engine, Instant::now());
    engine.begin_pan(Point::new(0.0, 0.0), now);
    engine.pan_to(Point::new(1000.0, 0.0));
    engine.end_pan(now);
    assert!(approx_eq(engine.transform().translation.x, 400.0));

    engine.set_viewport(Size::new(400.0, 300.0));
    assert!(approx_eq(engine.transform().translation.x, 200.0));
}

#[test]
fn reset_for_image_is_immediate() {
    let mut engine = engine();
    let now = zoomed_in(&mut engine, Instant::now());
    engine.set_natural_size(Size::new(600.0, 900.0));
    engine.reset_for_image();
    assert!(engine.presented(now).is_identity(EPSILON));
    assert_eq!(engine.fit_mode(), FitMode::FitWidth);
    assert!(!engine.has_pending_work());
}

#[test]
fn cancel_gesture_clears_session() {
    let mut engine = engine();
    let now = zoomed_in(&mut engine, Instant::now());
    engine.begin_pan(Point::new(0.0, 0.0), now);
    engine.cancel_gesture();
    assert!(!engine.is_panning());
    engine.pan_to(Point::new(50.0, 0.0));
    assert!(approx_eq(engine.transform().translation.x, 0.0));
}

#[test]
fn teardown_stops_everything() {
    let mut engine = engine();
    let start = Instant::now();
    engine.wheel(-400.0, Point::new(400.0, 300.0), start);
    engine.teardown();
    assert!(!engine.has_pending_work());

    let settled = engine.transform();
    engine.tick(start + Duration::from_secs(1));
    engine.wheel(-400.0, Point::new(400.0, 300.0), start);
    engine.toggle_zoom_at(Point::new(400.0, 300.0), start);
    assert_eq!(engine.transform(), settled);
}
