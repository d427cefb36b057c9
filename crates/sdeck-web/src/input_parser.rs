#![forbid(unsafe_code)]

//! JSON input parser for converting host-encoded browser events to
//! [`sdeck_core::event::Event`] values.
//!
//! The embedding page serializes the few DOM events the engine listens to:
//!
//! ```json
//! {"kind":"key","phase":"down","key":"ArrowRight"}
//! {"kind":"key","keyCode":39}
//! {"kind":"click","target":12,"button":0}
//! {"kind":"hashchange","hash":"#/step-2"}
//! ```
//!
//! Kinds the engine does not handle, and keys with no [`KeyCode`], return
//! `Ok(None)`.
//!
//! # Design
//!
//! This parser lives here (not in the wasm runner) so native tests can drive
//! the engine with recorded input. It uses `serde_json` and is feature-gated
//! behind `input-parser`.

use sdeck_core::event::{
    ActivateEvent, Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerButton,
};
use sdeck_core::node::NodeId;
use serde::Deserialize;

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// Unknown key phase value.
    UnknownPhase(String),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::UnknownPhase(phase) => write!(f, "unknown phase: {phase}"),
        }
    }
}

impl std::error::Error for InputParseError {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInput {
    kind: String,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    key_code: Option<u32>,
    #[serde(default)]
    mods: Option<i32>,
    #[serde(default)]
    repeat: Option<bool>,
    #[serde(default)]
    target: Option<u32>,
    #[serde(default)]
    button: Option<i32>,
    #[serde(default)]
    hash: Option<String>,
}

/// Parse one JSON-encoded host event into an [`Event`].
///
/// Returns `Err` for malformed JSON, missing required fields, or an unknown
/// key phase.
pub fn parse_encoded_input_to_event(json: &str) -> Result<Option<Event>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    match raw.kind.as_str() {
        "key" | "keydown" | "keyup" => parse_key_event(&raw),
        "click" => parse_click_event(&raw).map(Some),
        "hashchange" => parse_hash_event(&raw).map(Some),
        _ => Ok(None),
    }
}

fn parse_modifiers(mods: Option<i32>) -> Modifiers {
    let bits = mods.unwrap_or(0).clamp(0, i32::from(u8::MAX)) as u8;
    Modifiers::from_bits_truncate(bits)
}

/// Map a DOM `KeyboardEvent.key` value.
fn parse_key_name(key: &str) -> Option<KeyCode> {
    match key {
        "Enter" => Some(KeyCode::Enter),
        "Escape" | "Esc" => Some(KeyCode::Escape),
        "Backspace" => Some(KeyCode::Backspace),
        "Tab" => Some(KeyCode::Tab),
        "Home" => Some(KeyCode::Home),
        "End" => Some(KeyCode::End),
        "PageUp" => Some(KeyCode::PageUp),
        "PageDown" => Some(KeyCode::PageDown),
        "Up" | "ArrowUp" => Some(KeyCode::Up),
        "Down" | "ArrowDown" => Some(KeyCode::Down),
        "Left" | "ArrowLeft" => Some(KeyCode::Left),
        "Right" | "ArrowRight" => Some(KeyCode::Right),
        " " | "Space" | "Spacebar" => Some(KeyCode::Char(' ')),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
    }
}

fn parse_key_event(raw: &RawInput) -> Result<Option<Event>, InputParseError> {
    let default_phase = if raw.kind == "keyup" { "up" } else { "down" };
    let kind = match raw.phase.as_deref().unwrap_or(default_phase) {
        "down" => KeyEventKind::Press,
        "up" => KeyEventKind::Release,
        other => return Err(InputParseError::UnknownPhase(other.to_string())),
    };
    let kind = if raw.repeat.unwrap_or(false) && kind == KeyEventKind::Press {
        KeyEventKind::Repeat
    } else {
        kind
    };

    let key = raw.key.as_deref().filter(|s| !s.is_empty());
    if key.is_none() && raw.key_code.is_none() {
        return Err(InputParseError::MissingField("key"));
    }

    // Prefer the logical key; fall back to the legacy numeric code.
    let code = key
        .and_then(parse_key_name)
        .or_else(|| raw.key_code.and_then(KeyCode::from_dom_key_code));

    Ok(code.map(|code| {
        Event::Key(
            KeyEvent::new(code)
                .with_modifiers(parse_modifiers(raw.mods))
                .with_kind(kind),
        )
    }))
}

fn parse_pointer_button(button: Option<i32>) -> PointerButton {
    match button {
        Some(1) => PointerButton::Middle,
        Some(2) => PointerButton::Secondary,
        _ => PointerButton::Primary,
    }
}

fn parse_click_event(raw: &RawInput) -> Result<Event, InputParseError> {
    let target = raw.target.ok_or(InputParseError::MissingField("target"))?;
    Ok(Event::Activate(
        ActivateEvent::new(NodeId::new(target)).with_button(parse_pointer_button(raw.button)),
    ))
}

fn parse_hash_event(raw: &RawInput) -> Result<Event, InputParseError> {
    let hash = raw
        .hash
        .as_deref()
        .ok_or(InputParseError::MissingField("hash"))?;
    Ok(Event::FragmentChange(hash.to_string()))
}
