//! End-to-end behaviour of the viewer driven through host events.

use crate::zoom_math::{clamp_translation, rotated_half_extents};
use crate::{GestureConfig, ImageSet, NavState, ViewerConfig, ViewerController};
use lightbox_ui::{Event, HitTarget, MouseButton, Point, Size, Touch, Vector, WheelDelta};
use std::time::Duration;
use web_time::Instant;

const FRAME: Duration = Duration::from_millis(16);
const VIEWPORT: Size = Size {
    width: 800.0,
    height: 600.0,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn open(count: usize, index: usize, config: &ViewerConfig) -> ViewerController {
    init_logging();
    let images = ImageSet::from_urls((0..count).map(|i| format!("https://example.com/{i}.jpg")));
    ViewerController::new(images, index, config, VIEWPORT).unwrap()
}

fn mouse(viewer: &mut ViewerController, event: &str, x: f32, y: f32, now: Instant) {
    let position = Point::new(x, y);
    let event = match event {
        "down" => Event::MousePressed {
            button: MouseButton::Left,
            position,
            target: HitTarget::Stage,
        },
        "move" => Event::MouseMoved { position },
        _ => Event::MouseReleased {
            button: MouseButton::Left,
            position,
        },
    };
    viewer.handle_event(&event, now);
}

fn touches(viewer: &mut ViewerController, points: &[(f32, f32)], now: Instant) {
    let touches: Vec<Touch> = points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| Touch::new(i as u64, Point::new(x, y)))
        .collect();
    viewer.handle_event(&Event::TouchMove { touches }, now);
}

/// Tick at frame cadence until the viewer is idle. Returns the last tick time.
fn settle(viewer: &mut ViewerController, start: Instant) -> Instant {
    let mut now = start;
    for _ in 0..200 {
        if !viewer.needs_tick() {
            break;
        }
        now += FRAME;
        viewer.tick(now);
    }
    now
}

#[test]
fn clamped_translation_keeps_rotated_box_in_frame() {
    let display = Size::new(800.0, 450.0);
    for scale in [1.0, 1.25, 2.0, 3.5, 4.0] {
        for rotation in [0.0, 30.0, 90.0, 180.0, 270.0, -45.0] {
            let half = rotated_half_extents(display, scale, rotation);
            for candidate in [
                Vector::new(-5000.0, 5000.0),
                Vector::new(123.0, -77.0),
                Vector::new(0.0, 0.0),
            ] {
                let t = clamp_translation(candidate, scale, rotation, display, VIEWPORT);
                for (offset, half_extent, half_view) in [
                    (t.x, half.x, VIEWPORT.width / 2.0),
                    (t.y, half.y, VIEWPORT.height / 2.0),
                ] {
                    let (low, high) = (offset - half_extent, offset + half_extent);
                    if half_extent >= half_view {
                        assert!(low <= -half_view + 0.01 && high >= half_view - 0.01);
                    } else {
                        assert!(low >= -half_view - 0.01 && high <= half_view + 0.01);
                    }
                }
            }
        }
    }
}

#[test]
fn wheel_zoom_keeps_focus_point_under_cursor() {
    let mut viewer = open(3, 0, &ViewerConfig::default());
    let start = Instant::now();
    let focus = Point::new(250.0, 420.0);
    let center = Point::new(400.0, 300.0);
    let local = viewer.engine().presented(start).to_local(focus - center);

    for step in 0..3 {
        viewer.handle_event(
            &Event::Wheel {
                delta: WheelDelta::Lines { x: 0.0, y: -5.0 },
                position: focus,
            },
            start + FRAME * step,
        );
    }
    let end = settle(&mut viewer, start);

    let after = viewer.engine().presented(end);
    assert!(after.scale > 1.3);
    let screen = center + after.to_relative(local);
    assert!(screen.distance(focus) < 1.0);
}

#[test]
fn pinch_to_double_distance_doubles_scale() {
    let mut viewer = open(3, 0, &ViewerConfig::default());
    let now = Instant::now();
    viewer.handle_event(
        &Event::TouchStart {
            touches: vec![
                Touch::new(0, Point::new(360.0, 300.0)),
                Touch::new(1, Point::new(440.0, 300.0)),
            ],
            target: HitTarget::Stage,
        },
        now,
    );
    touches(&mut viewer, &[(320.0, 300.0), (480.0, 300.0)], now + FRAME);
    assert!((viewer.engine().transform().scale - 2.0).abs() < 0.01);

    // Far beyond the limit
    touches(&mut viewer, &[(0.0, 300.0), (800.0, 300.0)], now + FRAME * 2);
    assert!((viewer.engine().transform().scale - 4.0).abs() < 0.01);
}

#[test]
fn double_tap_toggles_zoom_in_and_out() {
    let mut viewer = open(3, 0, &ViewerConfig::default());
    let mut now = Instant::now();

    for expected in [2.0, 1.0] {
        mouse(&mut viewer, "down", 420.0, 280.0, now);
        mouse(&mut viewer, "up", 420.0, 280.0, now + Duration::from_millis(40));
        mouse(&mut viewer, "down", 420.0, 280.0, now + Duration::from_millis(120));
        mouse(&mut viewer, "up", 420.0, 280.0, now + Duration::from_millis(160));
        now = settle(&mut viewer, now + Duration::from_millis(160));
        let state = viewer.engine().presented(now);
        assert!((state.scale - expected).abs() < 0.01);
    }
    assert_eq!(viewer.engine().presented(now).translation, Vector::ZERO);
    assert!(viewer.chrome_visible());
}

#[test]
fn swipe_past_threshold_commits_to_neighbour() {
    let mut viewer = open(3, 0, &ViewerConfig::default());
    let now = Instant::now();
    mouse(&mut viewer, "down", 500.0, 300.0, now);
    mouse(&mut viewer, "move", 450.0, 300.0, now + FRAME);
    mouse(&mut viewer, "move", 410.0, 300.0, now + FRAME * 2);
    assert_eq!(*viewer.state(), NavState::SwipeArmed { offset: -90.0 });
    mouse(&mut viewer, "up", 410.0, 300.0, now + FRAME * 3);

    assert!(viewer.is_animating());
    settle(&mut viewer, now + FRAME * 3);
    assert_eq!(viewer.active_index(), 1);
    assert_eq!(*viewer.state(), NavState::Idle);
}

#[test]
fn swipe_at_last_image_snaps_back() {
    let mut viewer = open(3, 2, &ViewerConfig::default());
    let now = Instant::now();
    mouse(&mut viewer, "down", 500.0, 300.0, now);
    mouse(&mut viewer, "move", 410.0, 300.0, now + FRAME);
    mouse(&mut viewer, "up", 410.0, 300.0, now + FRAME * 2);

    let end = settle(&mut viewer, now + FRAME * 2);
    assert_eq!(viewer.active_index(), 2);
    assert_eq!(viewer.frame(end).track_offset, 0.0);
}

#[test]
fn thumbnail_jump_skips_intermediate_images() {
    let mut viewer = open(3, 0, &ViewerConfig::default());
    let start = Instant::now();
    viewer.thumbnail_clicked(2, start);

    let mut now = start;
    let mut frames = 0;
    while viewer.is_animating() {
        now += FRAME;
        viewer.tick(now);
        frames += 1;
        assert_ne!(viewer.active_index(), 1);
        let frame = viewer.frame(now);
        assert!(frame.track_offset.abs() <= VIEWPORT.width + 0.01);
        if frame.transition_active {
            assert_eq!(
                frame.next_panel.map(|image| image.url),
                Some("https://example.com/2.jpg".to_string())
            );
        }
        assert!(frames < 100);
    }
    assert_eq!(viewer.active_index(), 2);
    // One full-width slide at the longest duration
    assert!(now.duration_since(start) >= Duration::from_millis(360));
    assert!(now.duration_since(start) < Duration::from_millis(360) + FRAME);
}

#[test]
fn incremental_pinch_rotation_accumulates() {
    let config = ViewerConfig {
        gestures: GestureConfig {
            enable_rotation: true,
            ..GestureConfig::default()
        },
        ..ViewerConfig::default()
    };
    let mut viewer = open(3, 0, &config);
    let now = Instant::now();
    let center = Point::new(400.0, 300.0);
    let finger_pair = |angle: f32| {
        let arm = Vector::new(100.0, 0.0).rotated(angle.to_radians());
        [
            ((center - arm).x, (center - arm).y),
            ((center + arm).x, (center + arm).y),
        ]
    };

    viewer.handle_event(
        &Event::TouchStart {
            touches: vec![
                Touch::new(0, Point::new(300.0, 300.0)),
                Touch::new(1, Point::new(500.0, 300.0)),
            ],
            target: HitTarget::Stage,
        },
        now,
    );
    // Eight 50 degree turns: 400 degrees, wrapping the raw finger angle
    for step in 1..=8 {
        touches(&mut viewer, &finger_pair(50.0 * step as f32), now + FRAME * step);
    }
    let rotation = viewer.engine().transform().rotation_deg;
    assert!((rotation - 400.0).abs() < 0.1);
}

#[test]
fn tap_toggles_chrome_exactly_once() {
    let mut viewer = open(3, 0, &ViewerConfig::default());
    let now = Instant::now();
    mouse(&mut viewer, "down", 400.0, 300.0, now);
    mouse(&mut viewer, "move", 403.0, 302.0, now + Duration::from_millis(30));
    mouse(&mut viewer, "up", 403.0, 302.0, now + Duration::from_millis(90));

    viewer.tick(now + Duration::from_millis(200));
    assert!(viewer.chrome_visible());
    settle(&mut viewer, now + Duration::from_millis(90));
    assert!(!viewer.chrome_visible());
    viewer.tick(now + Duration::from_secs(2));
    assert!(!viewer.chrome_visible());
}

#[test]
fn drag_never_toggles_chrome() {
    let mut viewer = open(3, 1, &ViewerConfig::default());
    let now = Instant::now();
    mouse(&mut viewer, "down", 400.0, 300.0, now);
    mouse(&mut viewer, "move", 400.0, 312.0, now + Duration::from_millis(20));
    mouse(&mut viewer, "move", 400.0, 300.0, now + Duration::from_millis(40));
    mouse(&mut viewer, "up", 400.0, 300.0, now + Duration::from_millis(60));

    settle(&mut viewer, now + Duration::from_millis(60));
    viewer.tick(now + Duration::from_secs(1));
    assert!(viewer.chrome_visible());
    assert_eq!(viewer.active_index(), 1);
}
