use iced::widget::image::Handle;

use crate::state::session::Session;

/// Handle for the image the session is showing.
///
/// Built once per image change and kept by the app: a handle created from
/// pixels gets a new id each time, and iced would upload it again on every
/// frame if it were rebuilt in `view`.
pub fn current_handle(session: &Session) -> Option<Handle> {
    let entry = session.current()?;
    Some(match session.current_replacement() {
        Some(pasted) => Handle::from_rgba(pasted.width(), pasted.height(), pasted.as_raw().clone()),
        None => Handle::from_path(&entry.path),
    })
}
