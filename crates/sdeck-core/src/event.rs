#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! Hosts translate their native notifications into these values and push them
//! into the runtime. All events derive `Clone`, `PartialEq`, and `Eq` for use
//! in tests and pattern matching.
//!
//! # Design Notes
//!
//! - Activation events carry the raw target node; resolving the logical target
//!   (anchor, step, or root) is the router's job, not the host's.
//! - `KeyEventKind` defaults to `Press` when the host cannot tell.
//! - Fragment changes carry the raw fragment including any leading `#`.

use bitflags::bitflags;

use crate::node::NodeId;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A click or other activation on a document node.
    Activate(ActivateEvent),

    /// The location fragment changed (back/forward, manual edit, link).
    FragmentChange(String),
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this event should trigger actions (press or auto-repeat).
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !matches!(self.kind, KeyEventKind::Release)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key. Space is `Char(' ')`.
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Backspace key.
    Backspace,

    /// Tab key.
    Tab,

    /// Home key.
    Home,

    /// End key.
    End,

    /// Page Up key.
    PageUp,

    /// Page Down key.
    PageDown,

    /// Up arrow key.
    Up,

    /// Down arrow key.
    Down,

    /// Left arrow key.
    Left,

    /// Right arrow key.
    Right,
}

impl KeyCode {
    /// Map a legacy DOM `KeyboardEvent.keyCode` value.
    ///
    /// Only the keys the engine cares about plus printable ASCII letters and
    /// digits are recognized.
    #[must_use]
    pub fn from_dom_key_code(code: u32) -> Option<Self> {
        match code {
            8 => Some(Self::Backspace),
            9 => Some(Self::Tab),
            13 => Some(Self::Enter),
            27 => Some(Self::Escape),
            32 => Some(Self::Char(' ')),
            33 => Some(Self::PageUp),
            34 => Some(Self::PageDown),
            35 => Some(Self::End),
            36 => Some(Self::Home),
            37 => Some(Self::Left),
            38 => Some(Self::Up),
            39 => Some(Self::Right),
            40 => Some(Self::Down),
            48..=57 | 65..=90 => char::from_u32(code).map(|c| Self::Char(c.to_ascii_lowercase())),
            _ => None,
        }
    }
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

/// Which pointer button produced an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// Primary (usually left) button, or a keyboard activation.
    #[default]
    Primary,
    /// Middle button.
    Middle,
    /// Secondary (usually right) button.
    Secondary,
}

/// Click/activation on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivateEvent {
    /// The innermost node that received the activation.
    pub target: NodeId,
    /// Button that triggered it.
    pub button: PointerButton,
}

impl ActivateEvent {
    /// Primary-button activation of `target`.
    #[must_use]
    pub const fn new(target: NodeId) -> Self {
        Self {
            target,
            button: PointerButton::Primary,
        }
    }

    /// Override the button.
    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_event_defaults_to_press() {
        let ev = KeyEvent::new(KeyCode::Right);
        assert_eq!(ev.kind, KeyEventKind::Press);
        assert_eq!(ev.modifiers, Modifiers::NONE);
        assert!(ev.is_actionable());
    }

    #[test]
    fn release_is_not_actionable() {
        let ev = KeyEvent::new(KeyCode::Right).with_kind(KeyEventKind::Release);
        assert!(!ev.is_actionable());
        let ev = KeyEvent::new(KeyCode::Right).with_kind(KeyEventKind::Repeat);
        assert!(ev.is_actionable());
    }

    #[test]
    fn dom_key_codes_for_navigation_keys() {
        assert_eq!(KeyCode::from_dom_key_code(9), Some(KeyCode::Tab));
        assert_eq!(KeyCode::from_dom_key_code(27), Some(KeyCode::Escape));
        assert_eq!(KeyCode::from_dom_key_code(32), Some(KeyCode::Char(' ')));
        assert_eq!(KeyCode::from_dom_key_code(33), Some(KeyCode::PageUp));
        assert_eq!(KeyCode::from_dom_key_code(34), Some(KeyCode::PageDown));
        assert_eq!(KeyCode::from_dom_key_code(37), Some(KeyCode::Left));
        assert_eq!(KeyCode::from_dom_key_code(38), Some(KeyCode::Up));
        assert_eq!(KeyCode::from_dom_key_code(39), Some(KeyCode::Right));
        assert_eq!(KeyCode::from_dom_key_code(40), Some(KeyCode::Down));
    }

    #[test]
    fn dom_key_codes_for_letters_are_lowercase() {
        assert_eq!(KeyCode::from_dom_key_code(65), Some(KeyCode::Char('a')));
        assert_eq!(KeyCode::from_dom_key_code(48), Some(KeyCode::Char('0')));
        assert_eq!(KeyCode::from_dom_key_code(1000), None);
    }

    #[test]
    fn activate_event_builder() {
        let ev = ActivateEvent::new(NodeId::new(4)).with_button(PointerButton::Middle);
        assert_eq!(ev.target, NodeId::new(4));
        assert_eq!(ev.button, PointerButton::Middle);
    }
}
