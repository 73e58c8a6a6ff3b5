/// User commands and their dispatch onto a session
///
/// Buttons and keyboard shortcuts both end up here, so every way of
/// triggering an action behaves the same. Loading a folder is not a
/// command: it runs in the background and replaces the session as a whole.

use std::path::PathBuf;

use super::error::SessionError;
use super::session::Session;
use crate::media::clipboard::ImageClipboard;
use crate::media::recycle::Trash;

/// Actions on the loaded session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Save,
    Delete,
    Paste,
    Copy,
}

/// What a command did, for the status line and the caption box
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The cursor changed; the caption box must be refreshed
    Moved,
    /// Nothing to do (end of list, empty session)
    Unchanged,
    Saved(usize),
    Deleted(PathBuf),
    Pasted,
    Copied,
    NothingOnClipboard,
}

/// Desktop services a command may need
pub struct Services<'a> {
    pub clipboard: &'a mut dyn ImageClipboard,
    pub trash: &'a mut dyn Trash,
}

/// Run `command` against `session`.
///
/// `caption_box` is the text currently in the caption editor; it is
/// committed to the current image before anything else happens, so edits
/// are never lost by navigating, saving or deleting.
pub fn dispatch(
    session: &mut Session,
    services: Services<'_>,
    caption_box: &str,
    command: Command,
) -> Result<Outcome, SessionError> {
    session.commit_current_caption(caption_box);

    match command {
        Command::Next => Ok(moved(session.next())),
        Command::Previous => Ok(moved(session.previous())),
        Command::Save => {
            if session.is_empty() {
                return Ok(Outcome::Unchanged);
            }
            session.save_all().map(Outcome::Saved)
        }
        Command::Delete => Ok(session
            .delete_current(services.trash)
            .map(Outcome::Deleted)
            .unwrap_or(Outcome::Unchanged)),
        Command::Paste => {
            if session.is_empty() {
                return Ok(Outcome::Unchanged);
            }
            match services.clipboard.paste_image()? {
                Some(image) => {
                    session.paste_replacement(image)?;
                    Ok(Outcome::Pasted)
                }
                None => Ok(Outcome::NothingOnClipboard),
            }
        }
        Command::Copy => {
            if session.is_empty() {
                return Ok(Outcome::Unchanged);
            }
            let image = session.current_image()?.to_rgba8();
            services.clipboard.copy_image(&image)?;
            Ok(Outcome::Copied)
        }
    }
}

fn moved(changed: bool) -> Outcome {
    if changed {
        Outcome::Moved
    } else {
        Outcome::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::clipboard::ClipboardError;
    use crate::media::recycle::testing::RecordingTrash;
    use crate::state::data::ImageEntry;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeClipboard {
        held: Option<RgbaImage>,
        broken: bool,
    }

    impl ImageClipboard for FakeClipboard {
        fn copy_image(&mut self, image: &RgbaImage) -> Result<(), ClipboardError> {
            if self.broken {
                return Err(ClipboardError::Unavailable("no display".into()));
            }
            self.held = Some(image.clone());
            Ok(())
        }

        fn paste_image(&mut self) -> Result<Option<RgbaImage>, ClipboardError> {
            if self.broken {
                return Err(ClipboardError::Unavailable("no display".into()));
            }
            Ok(self.held.clone())
        }
    }

    fn session_in(dir: &TempDir, names: &[&str]) -> Session {
        let entries = names
            .iter()
            .map(|n| {
                let path = dir.path().join(n);
                RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255])).save(&path).unwrap();
                ImageEntry::new(path, format!("{} caption", n))
            })
            .collect();
        Session::from_entries(dir.path().to_path_buf(), entries)
    }

    fn run(
        session: &mut Session,
        clipboard: &mut FakeClipboard,
        caption_box: &str,
        command: Command,
    ) -> Result<Outcome, SessionError> {
        let mut trash = RecordingTrash::default();
        let services = Services {
            clipboard,
            trash: &mut trash,
        };
        dispatch(session, services, caption_box, command)
    }

    #[test]
    fn test_navigation_commits_caption_box() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, &["a.png", "b.png"]);
        let mut clipboard = FakeClipboard::default();

        let outcome = run(&mut session, &mut clipboard, "a typed", Command::Next).unwrap();
        assert_eq!(outcome, Outcome::Moved);
        assert_eq!(session.entries()[0].caption, "a typed");

        let outcome = run(&mut session, &mut clipboard, "b typed", Command::Next).unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(session.entries()[1].caption, "b typed");

        run(&mut session, &mut clipboard, "b typed", Command::Previous).unwrap();
        assert_eq!(session.current_caption(), Some("a typed"));
    }

    #[test]
    fn test_save_writes_caption_box() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, &["a.png"]);
        let outcome = run(&mut session, &mut FakeClipboard::default(), "final", Command::Save).unwrap();
        assert_eq!(outcome, Outcome::Saved(1));
        assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "final");
    }

    #[test]
    fn test_delete_reports_path() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, &["a.png", "b.png"]);
        let outcome = run(&mut session, &mut FakeClipboard::default(), "", Command::Delete).unwrap();
        assert_eq!(outcome, Outcome::Deleted(dir.path().join("a.png")));
        assert_eq!(session.current_caption(), Some("b.png caption"));
    }

    #[test]
    fn test_copy_then_paste_roundtrips_through_clipboard() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, &["a.png", "b.png"]);
        let mut clipboard = FakeClipboard::default();

        let caption = session.current_caption().unwrap().to_string();
        assert_eq!(run(&mut session, &mut clipboard, &caption, Command::Copy).unwrap(), Outcome::Copied);
        assert!(clipboard.held.is_some());

        run(&mut session, &mut clipboard, &caption, Command::Next).unwrap();
        let caption = session.current_caption().unwrap().to_string();
        assert_eq!(run(&mut session, &mut clipboard, &caption, Command::Paste).unwrap(), Outcome::Pasted);
        assert_eq!(session.current_replacement(), clipboard.held.as_ref());
    }

    #[test]
    fn test_paste_with_empty_clipboard() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, &["a.png"]);
        let outcome = run(&mut session, &mut FakeClipboard::default(), "x", Command::Paste).unwrap();
        assert_eq!(outcome, Outcome::NothingOnClipboard);
        assert!(session.current_replacement().is_none());
    }

    #[test]
    fn test_clipboard_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, &["a.png"]);
        let mut clipboard = FakeClipboard { broken: true, ..Default::default() };
        let result = run(&mut session, &mut clipboard, "x", Command::Copy);
        assert!(matches!(
            result,
            Err(SessionError::Clipboard(ClipboardError::Unavailable(_)))
        ));
    }

    #[test]
    fn test_commands_on_empty_session_do_nothing() {
        let mut session = Session::new();
        let mut clipboard = FakeClipboard::default();
        for command in [
            Command::Next,
            Command::Previous,
            Command::Save,
            Command::Delete,
            Command::Paste,
            Command::Copy,
        ] {
            let outcome = run(&mut session, &mut clipboard, "", command).unwrap();
            assert_eq!(outcome, Outcome::Unchanged);
        }
    }
}
