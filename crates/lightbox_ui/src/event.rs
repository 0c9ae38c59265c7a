use crate::{Point, Size};

/// Identifier of a single touch contact, stable for the lifetime of the contact.
pub type TouchId = u64;

/// A touch contact as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub id: TouchId,
    pub position: Point,
}

impl Touch {
    pub fn new(id: TouchId, position: Point) -> Self {
        Self { id, position }
    }
}

/// Events that the viewer responds to.
///
/// Touch events carry the touches still in contact *after* the change,
/// mirroring the DOM `TouchEvent.touches` list.
#[derive(Debug, Clone)]
pub enum Event {
    /// Mouse button pressed.
    MousePressed {
        button: MouseButton,
        position: Point,
        target: HitTarget,
    },
    /// Mouse moved.
    MouseMoved { position: Point },
    /// Mouse button released.
    MouseReleased {
        button: MouseButton,
        position: Point,
    },
    /// One or more fingers touched down.
    TouchStart {
        touches: Vec<Touch>,
        target: HitTarget,
    },
    /// One or more fingers moved.
    TouchMove { touches: Vec<Touch> },
    /// One or more fingers lifted.
    TouchEnd { touches: Vec<Touch> },
    /// The platform cancelled the touch sequence.
    TouchCancel,
    /// Mouse wheel scrolled.
    Wheel { delta: WheelDelta, position: Point },
    /// Keyboard key pressed.
    KeyPressed { key: KeyCode },
    /// The window lost focus.
    WindowBlur,
    /// A pointer or mouse button was released anywhere in the window.
    GlobalPointerUp,
    /// The viewer surface changed size.
    Resized { viewport: Size },
    /// The active image finished decoding with the given natural size.
    ImageLoaded { natural: Size },
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Wheel delta, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelDelta {
    /// Delta in pixels (`deltaMode == 0`).
    Pixels { x: f32, y: f32 },
    /// Delta in lines (`deltaMode == 1`).
    Lines { x: f32, y: f32 },
}

impl WheelDelta {
    /// Vertical delta converted to pixels.
    pub fn vertical_pixels(&self) -> f32 {
        match *self {
            WheelDelta::Pixels { y, .. } => y,
            WheelDelta::Lines { y, .. } => y * crate::constants::WHEEL_LINE_HEIGHT,
        }
    }
}

/// Keyboard keys (simplified set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Escape,
    Left,
    Right,
    Up,
    Down,
    Enter,
    Space,
    Char(char),
}

/// Where a press landed, as resolved by the host's hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitTarget {
    /// The image stage (anything that is not chrome).
    #[default]
    Stage,
    /// A chrome control overlaying the stage.
    Chrome(ChromeElement),
}

impl HitTarget {
    pub fn is_chrome(&self) -> bool {
        matches!(self, HitTarget::Chrome(_))
    }
}

/// Chrome controls that must never start a swipe or a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeElement {
    Close,
    Previous,
    Next,
    ThumbnailStrip,
}
