//! Input events delivered by the windowing layer
//!
//! Pointer coordinates are window pixels with the origin in the top-left corner.
//! Events are serde-serializable so input sessions can be recorded and
//! replayed.

use crate::foundation::math::Point2;
use serde::{Deserialize, Serialize};

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Primary (left) button
    Left,
    /// Secondary (right) button
    Right,
    /// Middle button
    Middle,
}

bitflags::bitflags! {
    /// Set of buttons held during a pointer move
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MouseButtons: u8 {
        /// Primary (left) button
        const LEFT = 1 << 0;
        /// Secondary (right) button
        const RIGHT = 1 << 1;
        /// Middle button
        const MIDDLE = 1 << 2;
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Right => Self::RIGHT,
            MouseButton::Middle => Self::MIDDLE,
        }
    }
}

impl MouseButtons {
    /// Whether the primary button is held
    pub const fn primary(self) -> bool {
        self.contains(Self::LEFT)
    }
}

impl MouseButton {
    /// Whether this is the primary button
    pub const fn is_primary(self) -> bool {
        matches!(self, Self::Left)
    }
}

/// Event from the windowing/input layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// A button went down
    PointerPressed {
        /// Button pressed
        button: MouseButton,
        /// Pointer x in pixels
        x: f32,
        /// Pointer y in pixels
        y: f32,
    },
    /// The pointer moved
    PointerMoved {
        /// Buttons held during the move
        buttons: MouseButtons,
        /// Pointer x in pixels
        x: f32,
        /// Pointer y in pixels
        y: f32,
    },
    /// A button went up
    PointerReleased {
        /// Button released
        button: MouseButton,
        /// Pointer x in pixels
        x: f32,
        /// Pointer y in pixels
        y: f32,
    },
    /// The framebuffer was resized
    Resized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// Redraw tick
    Redraw,
}

impl InputEvent {
    /// Press at `(x, y)`
    pub fn press(button: MouseButton, x: f32, y: f32) -> Self {
        Self::PointerPressed { button, x, y }
    }

    /// Move to `(x, y)` with `buttons` held
    pub fn drag(buttons: MouseButtons, x: f32, y: f32) -> Self {
        Self::PointerMoved { buttons, x, y }
    }

    /// Pointer position for pointer events
    pub fn position(&self) -> Option<Point2> {
        match *self {
            Self::PointerPressed { x, y, .. }
            | Self::PointerMoved { x, y, .. }
            | Self::PointerReleased { x, y, .. } => Some(Point2::new(x, y)),
            Self::Resized { .. } | Self::Redraw => None,
        }
    }

    /// Release at `(x, y)`
    pub fn release(button: MouseButton, x: f32, y: f32) -> Self {
        Self::PointerReleased { button, x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_sets() {
        let held = MouseButtons::from(MouseButton::Left) | MouseButtons::RIGHT;
        assert!(held.primary());
        assert!(!MouseButtons::from(MouseButton::Middle).primary());
        assert!(MouseButton::Left.is_primary());
        assert!(!MouseButton::Right.is_primary());
    }

    #[test]
    fn test_session_parses_from_ron() {
        let text = r#"[
            PointerPressed(button: Left, x: 100.0, y: 100.0),
            PointerMoved(buttons: MouseButtons("LEFT"), x: 110.0, y: 100.0),
            PointerReleased(button: Left, x: 110.0, y: 100.0),
            Resized(width: 1024, height: 768),
            Redraw,
        ]"#;
        let events: Vec<InputEvent> = ron::from_str(text).unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0], InputEvent::press(MouseButton::Left, 100.0, 100.0));
        assert_eq!(events[1], InputEvent::drag(MouseButtons::LEFT, 110.0, 100.0));
        assert_eq!(events[4], InputEvent::Redraw);
        assert_eq!(events[2].position(), Some(Point2::new(110.0, 100.0)));
        assert_eq!(events[3].position(), None);
    }

    #[test]
    fn test_button_sets_parse_from_ron() {
        let held: MouseButtons = ron::from_str(r#"MouseButtons("LEFT | MIDDLE")"#).unwrap();
        assert_eq!(held, MouseButtons::LEFT | MouseButtons::MIDDLE);

        let none: MouseButtons = ron::from_str(r#"MouseButtons("")"#).unwrap();
        assert!(none.is_empty());
        assert!(!none.primary());
    }
}
