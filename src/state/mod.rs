/// State management module
///
/// This module handles all application state, including:
/// - The loaded folder, its captions and the cursor (session.rs)
/// - Shared data structures (data.rs)
/// - User commands and their dispatch (command.rs)
/// - Persisted user settings (settings.rs)
/// - Error type shared by all of the above (error.rs)

pub mod command;
pub mod data;
pub mod error;
pub mod session;
pub mod settings;
