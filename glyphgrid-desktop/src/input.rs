//! Keyboard / wheel → application action mapping.
//!
//! Kept free of window state so the bindings can be tested directly.

use glyphgrid_text::EditEvent;
use winit::event::MouseScrollDelta;
use winit::keyboard::{Key, NamedKey};

/// Font-size change per PageUp / PageDown press.
pub const FONT_SIZE_STEP: f32 = 4.0;
/// Browser-style pixels per wheel line.
const PIXELS_PER_LINE: f32 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Edit(EditEvent),
    /// Step through the font family list.
    CycleFamily(isize),
    /// Add to the display font size.
    FontSize(f32),
    ResetView,
}

/// Map a key press to an action. `text` is the character text the key
/// produced, if any.
pub fn key_action(key: &Key, text: Option<&str>, shift: bool) -> Option<Action> {
    let action = match key {
        Key::Named(NamedKey::ArrowLeft) => Action::Edit(EditEvent::MoveLeft),
        Key::Named(NamedKey::ArrowRight) => Action::Edit(EditEvent::MoveRight),
        Key::Named(NamedKey::Home) => Action::Edit(EditEvent::Home),
        Key::Named(NamedKey::End) => Action::Edit(EditEvent::End),
        Key::Named(NamedKey::Backspace) => Action::Edit(EditEvent::Backspace),
        Key::Named(NamedKey::Delete) => Action::Edit(EditEvent::Delete),
        Key::Named(NamedKey::Tab) => Action::CycleFamily(if shift { -1 } else { 1 }),
        Key::Named(NamedKey::PageUp) => Action::FontSize(FONT_SIZE_STEP),
        Key::Named(NamedKey::PageDown) => Action::FontSize(-FONT_SIZE_STEP),
        Key::Named(NamedKey::Escape) => Action::ResetView,
        _ => {
            let text = text.filter(|t| !t.is_empty() && !t.chars().any(char::is_control))?;
            Action::Edit(EditEvent::Insert(text.to_owned()))
        }
    };
    Some(action)
}

/// Wheel delta in browser-style pixels, positive when scrolling down.
pub fn wheel_pixels(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_LINE,
        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
    }
}

// ===================================================================
// Tests
// ===================================================================
