/// UI helpers that don't need the application state
///
/// - Keyboard shortcuts (shortcuts.rs)
/// - Image widget handles (preview.rs)

pub mod preview;
pub mod shortcuts;
