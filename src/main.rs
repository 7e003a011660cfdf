use iced::keyboard::{self, Key, Modifiers};
use iced::time::Instant;
use iced::widget::image::Handle;
use iced::widget::{column, container, stack, text};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::time::Duration;

// Declare the application modules
mod batch;
mod meta;
mod naming;
mod state;
mod ui;

use state::editor::{self, Editor, Signal};
use state::session::{self, Session};

/// Interval of the control-loop tick that drives key auto-repeat.
const TICK_INTERVAL: Duration = Duration::from_millis(30);

/// Main application state
struct PhotoRenamer {
    /// The session: image list, current index, change ledger
    session: Option<Session>,
    /// The annotation editor for the image being visited
    editor: Option<Editor>,
    /// Decoded preview of the current image
    preview: Option<Handle>,
    /// Status message to display to the user
    status: String,
    /// Set once the batch script has been emitted
    finished: bool,
    /// Previous control-loop tick, for the elapsed-time accumulator
    last_tick: Option<Instant>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// A key event mapped to a domain-level editor input
    Editor(editor::Input),
    /// Control-loop tick while a delete key is held
    Tick(Instant),
    /// Background preview decode finished for the named image
    PreviewLoaded(String, Result<Handle, String>),
    /// Background EXIF/geocode lookup finished for the named image
    MetadataLoaded(String, meta::ImageMetadata),
}

impl PhotoRenamer {
    /// Create a new instance of the application for one folder.
    fn new(folder: PathBuf) -> (Self, Task<Message>) {
        let mut app = PhotoRenamer {
            session: None,
            editor: None,
            preview: None,
            status: String::new(),
            finished: false,
            last_tick: None,
        };

        match session::discover(&folder) {
            Ok(images) => {
                println!("📷 Found {} images in {}", images.len(), folder.display());
                app.status = format!(
                    "{} images. Annotate, then press Esc to finish.",
                    images.len()
                );
                app.session = Some(Session::new(folder, images));
                let task = app.visit_current();
                (app, task)
            }
            Err(err) => {
                eprintln!("❌ {}", err);
                app.status = err.to_string();
                (app, Task::none())
            }
        }
    }

    /// Window title: current image and position in the set
    fn title(&self) -> String {
        match &self.session {
            Some(session) if !self.finished => format!(
                "{} ({}/{}) - Photo Renamer",
                session.current_name(),
                session.index() + 1,
                session.image_count()
            ),
            _ => String::from("Photo Renamer"),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Editor(input) => {
                // A fresh key press must not inherit a stale tick origin.
                if input == editor::Input::DeletePressed {
                    self.last_tick = None;
                }
                self.handle_input(input)
            }
            Message::Tick(now) => {
                let elapsed = match self.last_tick {
                    Some(last) => now - last,
                    None => Duration::ZERO,
                };
                self.last_tick = Some(now);

                if let Some(editor) = self.editor.as_mut() {
                    editor.tick(elapsed);
                }
                Task::none()
            }
            Message::PreviewLoaded(name, result) => {
                // A slow decode may land after the user moved on.
                if self.current_name() == Some(name.as_str()) {
                    match result {
                        Ok(handle) => self.preview = Some(handle),
                        Err(err) => {
                            eprintln!("⚠️  {}", err);
                            self.status = format!("Preview unavailable for {}", name);
                        }
                    }
                }
                Task::none()
            }
            Message::MetadataLoaded(name, metadata) => {
                if self.current_name() == Some(name.as_str()) {
                    let visited = self
                        .session
                        .as_ref()
                        .and_then(|s| s.ledger().by_original(&name))
                        .map(|entry| entry.visited)
                        .unwrap_or(false);

                    if let Some(editor) = self.editor.as_mut() {
                        if visited {
                            // Already-confirmed fields win; keep the lookup
                            // around for an explicit reload only.
                            editor.set_external(metadata.date, metadata.city);
                        } else {
                            editor.absorb_lookup(metadata.date, metadata.city);
                        }
                    }
                }
                Task::none()
            }
        }
    }

    /// Apply one editor input and act on the resulting signal.
    fn handle_input(&mut self, input: editor::Input) -> Task<Message> {
        enum Outcome {
            Stay,
            Visit,
            Finish,
        }

        let outcome = {
            let (Some(session), Some(editor)) = (self.session.as_mut(), self.editor.as_mut())
            else {
                return Task::none();
            };

            match editor.apply(input) {
                None => Outcome::Stay,
                Some(Signal::Undelete) => {
                    session.undelete_current();
                    Outcome::Stay
                }
                Some(Signal::Commit(direction)) => {
                    session.commit(editor, direction);
                    Outcome::Visit
                }
                Some(Signal::EndSession) => {
                    session.finish(editor);
                    Outcome::Finish
                }
            }
        };

        match outcome {
            Outcome::Stay => Task::none(),
            Outcome::Visit => self.visit_current(),
            Outcome::Finish => self.finish_session(),
        }
    }

    /// Start visiting the current image: build its editor and launch the
    /// preview decode and metadata lookup in the background.
    fn visit_current(&mut self) -> Task<Message> {
        let Some(session) = self.session.as_mut() else {
            return Task::none();
        };

        self.editor = Some(session.begin_visit());
        self.preview = None;

        let path = session.current_path();
        let preview_name = session.current_name().to_string();
        let metadata_name = preview_name.clone();

        Task::batch([
            Task::perform(ui::viewer::load_preview(path.clone()), move |result| {
                Message::PreviewLoaded(preview_name.clone(), result)
            }),
            Task::perform(meta::load(path), move |metadata| {
                Message::MetadataLoaded(metadata_name.clone(), metadata)
            }),
        ])
    }

    /// Emit the batch script and switch to the summary screen.
    fn finish_session(&mut self) -> Task<Message> {
        self.editor = None;
        self.finished = true;

        let Some(session) = self.session.as_ref() else {
            return Task::none();
        };

        let dialect = batch::ScriptDialect::for_host();
        match batch::emit_script(session.ledger(), session.folder(), dialect) {
            Ok(Some(path)) => {
                println!(
                    "✅ Batch script written: {} ({} renames, {} deletions)",
                    path.display(),
                    session.ledger().rename_count(),
                    session.ledger().delete_count()
                );
                self.status = format!(
                    "Script written to {}. Review it, then run it to apply the changes.",
                    path.display()
                );
            }
            Ok(None) => {
                println!("📋 No changes recorded, no script written");
                self.status = String::from("No changes recorded. Nothing to apply.");
            }
            Err(err) => {
                eprintln!("❌ {}", err);
                self.status = format!("Failed to write the script: {}", err);
            }
        }

        Task::none()
    }

    fn current_name(&self) -> Option<&str> {
        self.session.as_ref().map(Session::current_name)
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let Some(session) = self.session.as_ref() else {
            return centered_message(&self.status);
        };

        if self.finished {
            let ledger = session.ledger();
            let content = column![
                text("Session complete").size(40),
                text(format!(
                    "{} renames and {} deletions planned across {} images.",
                    ledger.rename_count(),
                    ledger.delete_count(),
                    ledger.len()
                ))
                .size(18),
                text(self.status.clone()).size(16),
            ]
            .spacing(20)
            .align_x(Alignment::Center);

            return container(content)
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        }

        let preview: Element<Message> = match &self.preview {
            Some(handle) => iced::widget::image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => container(text("Loading preview...").size(24))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        let overlay_visible = self
            .editor
            .as_ref()
            .map(|editor| editor.overlay_visible)
            .unwrap_or(false);

        match (self.editor.as_ref(), session.ledger().entry(session.index())) {
            (Some(editor), Some(entry)) if overlay_visible => {
                let overlay = ui::overlay::view(
                    editor,
                    entry,
                    session.index(),
                    session.image_count(),
                    &self.status,
                );
                stack![preview, overlay].into()
            }
            _ => preview,
        }
    }

    /// Keyboard input and (while a delete key is held) the repeat tick
    fn subscription(&self) -> Subscription<Message> {
        if self.finished {
            return Subscription::none();
        }

        let mut subscriptions = vec![
            keyboard::on_key_press(map_key_press),
            keyboard::on_key_release(map_key_release),
        ];

        if self.editor.as_ref().is_some_and(Editor::is_repeating) {
            subscriptions.push(iced::time::every(TICK_INTERVAL).map(Message::Tick));
        }

        Subscription::batch(subscriptions)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Map a raw key press to a domain-level editor input.
fn map_key_press(key: Key, modifiers: Modifiers) -> Option<Message> {
    use editor::Input;
    use keyboard::key::Named;

    let input = match key.as_ref() {
        Key::Named(Named::Tab) if modifiers.shift() => Input::FocusPrevious,
        Key::Named(Named::Tab) => Input::FocusNext,
        Key::Named(Named::ArrowDown) => Input::FocusNext,
        Key::Named(Named::ArrowUp) => Input::FocusPrevious,
        Key::Named(Named::F1) => Input::ToggleLocation,
        Key::Named(Named::F2) => Input::TogglePrefix,
        Key::Named(Named::F3) => Input::ToggleDate,
        Key::Named(Named::F4) => Input::ToggleOverlay,
        Key::Named(Named::Delete) => Input::ToggleDelete,
        Key::Named(Named::Backspace) => Input::DeletePressed,
        Key::Named(Named::Enter) => Input::CommitForward,
        Key::Named(Named::ArrowRight) => Input::CommitForward,
        Key::Named(Named::ArrowLeft) => Input::CommitBackward,
        Key::Named(Named::Escape) => Input::EndSession,
        Key::Named(Named::Space) => Input::Character(' '),
        Key::Character("r") if modifiers.control() => Input::ReloadField,
        Key::Character(c) if !modifiers.control() && !modifiers.command() => {
            let c = c.chars().next()?;
            if c.is_control() {
                return None;
            }
            Input::Character(c)
        }
        _ => return None,
    };

    Some(Message::Editor(input))
}

/// Map a key release; only the delete key's release matters.
fn map_key_release(key: Key, _modifiers: Modifiers) -> Option<Message> {
    use keyboard::key::Named;

    match key.as_ref() {
        Key::Named(Named::Backspace) => Some(Message::Editor(editor::Input::DeleteReleased)),
        _ => None,
    }
}

fn centered_message(message: &str) -> Element<'static, Message> {
    container(text(message.to_string()).size(20))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn main() -> iced::Result {
    // The folder comes from the command line, or a native picker.
    let folder = std::env::args().nth(1).map(PathBuf::from).or_else(|| {
        FileDialog::new()
            .set_title("Select Folder with Photos")
            .pick_folder()
    });

    let Some(folder) = folder else {
        eprintln!("No folder selected, nothing to do.");
        return Ok(());
    };

    iced::application(
        PhotoRenamer::title,
        PhotoRenamer::update,
        PhotoRenamer::view,
    )
    .subscription(PhotoRenamer::subscription)
    .theme(PhotoRenamer::theme)
    .centered()
    .run_with(move || PhotoRenamer::new(folder))
}
