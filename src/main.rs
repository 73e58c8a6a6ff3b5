use iced::futures::{SinkExt, StreamExt};
use iced::widget::{button, column, container, image, progress_bar, row, text, text_editor};
use iced::{keyboard, Alignment, ContentFit, Element, Length, Size, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;

mod caption;
mod media;
mod sidecar;
mod state;
mod ui;

use caption::Captioner;
use media::clipboard::SystemClipboard;
use media::recycle::SystemTrash;
use state::command::{dispatch, Command, Outcome, Services};
use state::data::Phase;
use state::session::Session;
use state::settings::{Settings, SettingsOrigin};

/// Main application state
struct CaptionEditor {
    /// Persisted user settings
    settings: Settings,
    /// Whether the settings file may be written back
    settings_origin: SettingsOrigin,
    /// Model used for images without a caption file
    captioner: Arc<dyn Captioner>,
    /// The loaded folder
    session: Session,
    /// Text of the caption box (committed into the session on every command)
    caption: text_editor::Content,
    /// Image widget handle for the current image
    preview: Option<image::Handle>,
    clipboard: SystemClipboard,
    trash: SystemTrash,
    /// A folder is being loaded in the background
    loading: bool,
    /// Images captioned so far / total, for the progress bar
    progress: (usize, usize),
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Load Folder" button
    LoadFolder,
    /// One more image of the folder has its caption
    LoadProgress(usize, usize),
    /// Background load finished
    FolderLoaded(Result<Session, String>),
    /// Typing in the caption box
    CaptionEdited(text_editor::Action),
    /// Button or shortcut acting on the session
    Command(Command),
}

impl CaptionEditor {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let (settings, settings_origin) = Settings::load();
        let captioner = caption::from_command(settings.captioner_command.as_deref());
        log::info!(
            "Caption editor started (persist policy: {:?})",
            settings.persist_policy
        );

        (
            CaptionEditor {
                settings,
                settings_origin,
                captioner,
                session: Session::new(),
                caption: text_editor::Content::new(),
                preview: None,
                clipboard: SystemClipboard::default(),
                trash: SystemTrash,
                loading: false,
                progress: (0, 0),
                status: "Load a folder of images to start.".to_string(),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::LoadFolder => {
                if self.loading {
                    return Task::none();
                }

                let mut dialog = FileDialog::new().set_title("Select Directory");
                if let Some(last) = &self.settings.last_folder {
                    dialog = dialog.set_directory(last);
                }

                if let Some(folder) = dialog.pick_folder() {
                    self.loading = true;
                    self.progress = (0, 0);
                    self.status = format!("Loading {}...", folder.display());
                    return self.load_folder(folder);
                }

                Task::none()
            }
            Message::LoadProgress(done, total) => {
                self.progress = (done, total);
                self.status = format!("Captioning images... {} / {}", done, total);
                Task::none()
            }
            Message::FolderLoaded(result) => {
                self.loading = false;
                match result {
                    Ok(session) => self.session_loaded(session),
                    Err(e) => {
                        log::error!("Folder load failed: {}", e);
                        self.status = format!("Load failed: {}", e);
                    }
                }
                Task::none()
            }
            Message::CaptionEdited(action) => {
                self.caption.perform(action);
                Task::none()
            }
            Message::Command(command) => {
                if self.loading {
                    return Task::none();
                }

                let caption_box = editor_text(&self.caption, self.session.current_caption());
                let services = Services {
                    clipboard: &mut self.clipboard,
                    trash: &mut self.trash,
                };
                match dispatch(&mut self.session, services, &caption_box, command) {
                    Ok(outcome) => self.apply(outcome),
                    Err(e) => {
                        log::error!("{:?} failed: {}", command, e);
                        self.status = format!("Error: {}", e);
                    }
                }
                Task::none()
            }
        }
    }

    /// Build the folder on a blocking worker, streaming progress back
    fn load_folder(&self, folder: PathBuf) -> Task<Message> {
        let captioner = Arc::clone(&self.captioner);
        let extensions = self.settings.extensions.clone();
        let policy = self.settings.persist_policy;

        let stream = iced::stream::channel(64, move |mut output| async move {
            let (progress_tx, mut progress_rx) = iced::futures::channel::mpsc::unbounded();

            // Captioning is CPU/GPU bound and blocking
            let worker = tokio::task::spawn_blocking(move || {
                Session::load_folder(&folder, &extensions, captioner.as_ref(), policy, |done, total| {
                    let _ = progress_tx.unbounded_send((done, total));
                })
            });

            while let Some((done, total)) = progress_rx.next().await {
                let _ = output.send(Message::LoadProgress(done, total)).await;
            }

            let result = match worker.await {
                Ok(loaded) => loaded.map_err(|e| e.to_string()),
                Err(e) => Err(format!("Load task failed: {}", e)),
            };
            let _ = output.send(Message::FolderLoaded(result)).await;
        });

        Task::run(stream, |message| message)
    }

    fn session_loaded(&mut self, session: Session) {
        self.session = session;

        if let Some(folder) = self.session.folder() {
            self.status = match self.session.phase() {
                Phase::Active => format!(
                    "Loaded {} images from {}",
                    self.session.len(),
                    folder.display()
                ),
                Phase::Empty => format!("No images found in {}", folder.display()),
            };

            if let Err(e) = self.settings.remember_folder(folder, self.settings_origin) {
                log::warn!("Could not save settings: {}", e);
            }
        }

        self.refresh_current();
    }

    /// Reflect a command's outcome in the caption box, image and status line
    fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Moved => self.refresh_current(),
            Outcome::Unchanged => {}
            Outcome::Saved(count) => {
                self.status = format!("Saved {} captions.", count);
                self.preview = ui::preview::current_handle(&self.session);
            }
            Outcome::Deleted(path) => {
                self.status = format!("Moved {} to trash.", path.display());
                self.refresh_current();
            }
            Outcome::Pasted => {
                self.status = "Pasted image replaces the file on save.".to_string();
                self.preview = ui::preview::current_handle(&self.session);
            }
            Outcome::Copied => self.status = "Image copied to clipboard.".to_string(),
            Outcome::NothingOnClipboard => {
                self.status = "The clipboard holds no image.".to_string()
            }
        }
    }

    /// Show the caption and image under the cursor
    fn refresh_current(&mut self) {
        let caption = self.session.current_caption().unwrap_or_default();
        self.caption = text_editor::Content::with_text(caption);
        self.preview = ui::preview::current_handle(&self.session);
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let active = self.session.phase() == Phase::Active && !self.loading;
        let on = |command: Command| active.then_some(Message::Command(command));

        let image_area: Element<Message> = match &self.preview {
            Some(handle) => image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => container(text(if self.loading {
                "Captioning images..."
            } else {
                "No image loaded"
            }))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
        };

        let mut caption_box = text_editor(&self.caption)
            .placeholder("Caption")
            .height(Length::Fixed(100.0));
        if active {
            caption_box = caption_box.on_action(Message::CaptionEdited);
        }

        let (done, total) = self.progress;
        let progress = progress_bar(0.0..=total.max(1) as f32, done as f32).height(Length::Fixed(12.0));

        let current_name = self
            .session
            .current()
            .map(|entry| entry.filename())
            .unwrap_or_default();
        let status_row = row![
            text(&self.status).size(14).width(Length::Fill),
            text(current_name).size(14),
            text(self.session.position_label()).size(14),
        ]
        .spacing(20);

        let buttons = row![
            button("Load Folder")
                .on_press_maybe((!self.loading).then_some(Message::LoadFolder))
                .padding(10),
            button("Previous Image").on_press_maybe(on(Command::Previous)).padding(10),
            button("Next Image").on_press_maybe(on(Command::Next)).padding(10),
            button("Save All Captions").on_press_maybe(on(Command::Save)).padding(10),
            button("Delete").on_press_maybe(on(Command::Delete)).padding(10),
            button("Paste").on_press_maybe(on(Command::Paste)).padding(10),
            button("Copy").on_press_maybe(on(Command::Copy)).padding(10),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        column![image_area, caption_box, progress, status_row, buttons]
            .spacing(10)
            .padding(20)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, modifiers| {
            ui::shortcuts::command_for(&key, modifiers).map(Message::Command)
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Caption box contents as they should be committed.
///
/// An untouched box gives back `shown` exactly, so a caption ending in a
/// newline survives being viewed. Otherwise the newline the editor keeps at
/// the end of its text is dropped.
fn editor_text(content: &text_editor::Content, shown: Option<&str>) -> String {
    let text = content.text();
    if let Some(shown) = shown {
        if text == text_editor::Content::<iced::Renderer>::with_text(shown).text() {
            return shown.to_string();
        }
    }

    let mut text = text;
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application(
        "Image Caption Editor",
        CaptionEditor::update,
        CaptionEditor::view,
    )
    .theme(CaptionEditor::theme)
    .subscription(CaptionEditor::subscription)
    .window_size(Size::new(1000.0, 800.0))
    .centered()
    .run_with(CaptionEditor::new)
}
