//! Host event kinds.
//!
//! [`EventType`] is a transparent newtype rather than a Rust `enum` so that
//! any raw value a caller supplies is forwarded to the handler untouched;
//! the named constants are the kinds host handlers commonly switch on.

use serde::Serialize;

/// Event kind passed as the second argument of `ReceiveEvent`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EventType(pub u8);

impl EventType {
    pub const MOUSE_DOWN: Self = Self(3);
    pub const MOUSE_UP: Self = Self(4);
    pub const MOUSE_MOVE: Self = Self(5);
    pub const MOUSE_OVER: Self = Self(6);
    pub const MOUSE_OUT: Self = Self(7);
    pub const MOUSE_CLICK: Self = Self(9);
    pub const INPUT_RECEIVED: Self = Self(12);
    pub const FOCUS_START: Self = Self(18);
    pub const FOCUS_STOP: Self = Self(19);
    pub const BUTTON_PRESS: Self = Self(23);
    pub const BUTTON_RELEASE: Self = Self(24);
    pub const BUTTON_CLICK: Self = Self(25);
    pub const LIST_ITEM_ROLL_OVER: Self = Self(33);
    pub const LIST_ITEM_ROLL_OUT: Self = Self(34);
    pub const LIST_ITEM_TOGGLE: Self = Self(35);

    /// Every named kind, in ascending order.
    pub const KNOWN: [Self; 15] = [
        Self::MOUSE_DOWN,
        Self::MOUSE_UP,
        Self::MOUSE_MOVE,
        Self::MOUSE_OVER,
        Self::MOUSE_OUT,
        Self::MOUSE_CLICK,
        Self::INPUT_RECEIVED,
        Self::FOCUS_START,
        Self::FOCUS_STOP,
        Self::BUTTON_PRESS,
        Self::BUTTON_RELEASE,
        Self::BUTTON_CLICK,
        Self::LIST_ITEM_ROLL_OVER,
        Self::LIST_ITEM_ROLL_OUT,
        Self::LIST_ITEM_TOGGLE,
    ];

    /// Name of a known kind, for diagnostics.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::MOUSE_DOWN => "MouseDown",
            Self::MOUSE_UP => "MouseUp",
            Self::MOUSE_MOVE => "MouseMove",
            Self::MOUSE_OVER => "MouseOver",
            Self::MOUSE_OUT => "MouseOut",
            Self::MOUSE_CLICK => "MouseClick",
            Self::INPUT_RECEIVED => "InputReceived",
            Self::FOCUS_START => "FocusStart",
            Self::FOCUS_STOP => "FocusStop",
            Self::BUTTON_PRESS => "ButtonPress",
            Self::BUTTON_RELEASE => "ButtonRelease",
            Self::BUTTON_CLICK => "ButtonClick",
            Self::LIST_ITEM_ROLL_OVER => "ListItemRollOver",
            Self::LIST_ITEM_ROLL_OUT => "ListItemRollOut",
            Self::LIST_ITEM_TOGGLE => "ListItemToggle",
            _ => return None,
        };
        Some(name)
    }
}

impl From<u8> for EventType {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}({})", self.0),
            None => write!(f, "EventType({})", self.0),
        }
    }
}
