use iced::keyboard::key::Named;
use iced::keyboard::{Key, Modifiers};

use crate::state::command::Command;

/// Keyboard shortcut for each command:
/// - PageDown / PageUp: next / previous image
/// - Ctrl+S: save all captions
/// - Ctrl+Delete: delete the current image
/// - Ctrl+Shift+V / Ctrl+Shift+C: paste / copy the image
///   (plain Ctrl+V / Ctrl+C stay with the caption editor)
pub fn command_for(key: &Key, modifiers: Modifiers) -> Option<Command> {
    match key {
        Key::Named(Named::PageDown) => Some(Command::Next),
        Key::Named(Named::PageUp) => Some(Command::Previous),
        Key::Named(Named::Delete) if modifiers.command() => Some(Command::Delete),
        Key::Character(c) if modifiers.command() => {
            match (c.to_lowercase().as_str(), modifiers.shift()) {
                ("s", false) => Some(Command::Save),
                ("v", true) => Some(Command::Paste),
                ("c", true) => Some(Command::Copy),
                _ => None,
            }
        }
        _ => None,
    }
}
