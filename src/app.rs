use std::path::{Path, PathBuf};

use eframe::egui;

use crate::canvas::Anchor;
use crate::config::PaintConfig;
use crate::error::{CanvasError, CanvasResult};
use crate::file_handler::{DroppedImage, FileHandler, SaveFormat, OPEN_EXTENSIONS};
use crate::input::InputHandler;
use crate::panels::{central_panel, dialogs, menu_bar, status_bar, tools_panel};
use crate::renderer::Renderer;
use crate::session::EditorSession;
use crate::tools::ToolSettings;

/// Storage key for the persisted tool settings
const SETTINGS_KEY: &str = "tool_settings";

/// Something that throws away unsaved work and needs confirming first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    New,
    Open,
    Quit,
}

impl PendingAction {
    pub fn verb(self) -> &'static str {
        match self {
            PendingAction::New => "starting a new canvas",
            PendingAction::Open => "opening another image",
            PendingAction::Quit => "quitting",
        }
    }
}

/// The modal window currently shown over the canvas
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    Resize {
        width: u32,
        height: u32,
        anchor: Anchor,
    },
    ConfirmDiscard(PendingAction),
}

pub struct PaintApp {
    pub(crate) session: EditorSession,
    pub(crate) renderer: Renderer,
    pub(crate) input_handler: InputHandler,
    pub(crate) file_handler: FileHandler,
    pub(crate) dialog: Option<Dialog>,
    /// Error message shown until dismissed
    pub(crate) notification: Option<String>,
    /// Where the canvas was last opened from or saved to
    pub(crate) current_path: Option<PathBuf>,
    /// Session revision at the last open, new or save
    saved_revision: u64,
    /// Set once the user agreed to quit, so the next close request goes through
    allow_close: bool,
    view_initialized: bool,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: PaintConfig) -> CanvasResult<Self> {
        configure_context(&cc.egui_ctx);
        let mut session = EditorSession::new(config)?;

        if let Some(storage) = cc.storage {
            if let Some(settings) = eframe::get_value::<ToolSettings>(storage, SETTINGS_KEY) {
                log::debug!("Restored tool settings: {:?}", settings.tool());
                session.set_settings(settings);
            }
        }

        Ok(Self::with_session(session))
    }

    pub fn with_session(session: EditorSession) -> Self {
        Self {
            saved_revision: session.revision(),
            session,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            file_handler: FileHandler::new(),
            dialog: None,
            notification: None,
            current_path: None,
            allow_close: false,
            view_initialized: false,
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditorSession {
        &mut self.session
    }

    /// True when the canvas changed since it was last opened or saved
    pub fn has_unsaved_changes(&self) -> bool {
        self.session.revision() != self.saved_revision
    }

    fn mark_saved(&mut self) {
        self.saved_revision = self.session.revision();
    }

    pub(crate) fn notify_error(&mut self, context: &str, err: &CanvasError) {
        log::error!("{}: {}", context, err);
        self.notification = Some(format!("{context}: {err}"));
    }

    /// Center the canvas once the viewport size is known
    pub(crate) fn ensure_view_initialized(&mut self) {
        if !self.view_initialized {
            self.session.center_view();
            self.view_initialized = true;
        }
    }

    /// Run `action` now, or ask first when there are unsaved changes
    pub(crate) fn request(&mut self, ctx: &egui::Context, action: PendingAction) {
        if self.has_unsaved_changes() {
            log::debug!("Asking before {}", action.verb());
            self.dialog = Some(Dialog::ConfirmDiscard(action));
        } else {
            self.perform(ctx, action);
        }
    }

    /// Run `action` without asking
    pub(crate) fn perform(&mut self, ctx: &egui::Context, action: PendingAction) {
        match action {
            PendingAction::New => self.new_canvas(),
            PendingAction::Open => self.open_with_dialog(),
            PendingAction::Quit => {
                self.allow_close = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    fn new_canvas(&mut self) {
        let (width, height) = {
            let config = self.session.config();
            (config.default_width, config.default_height)
        };
        match self.session.new_canvas(width, height) {
            Ok(()) => {
                log::info!("Started a new {}x{} canvas", width, height);
                self.current_path = None;
                self.mark_saved();
            }
            Err(err) => self.notify_error("Could not create canvas", &err),
        }
    }

    pub(crate) fn open_with_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", OPEN_EXTENSIONS)
            .pick_file()
        else {
            log::debug!("Open cancelled");
            return;
        };
        self.open_path(&path);
    }

    pub fn open_path(&mut self, path: &Path) {
        match self.session.open_file(path) {
            Ok(()) => {
                self.current_path = Some(path.to_path_buf());
                self.mark_saved();
            }
            Err(err) => self.notify_error(&format!("Could not open {}", path.display()), &err),
        }
    }

    /// Save to the current path, or ask for one
    pub(crate) fn save(&mut self) {
        match self.current_path.clone() {
            Some(path) if SaveFormat::from_path(&path).is_ok() => self.save_to(&path),
            _ => self.save_with_dialog(),
        }
    }

    pub(crate) fn save_with_dialog(&mut self) {
        let file_name = self
            .current_path
            .as_ref()
            .and_then(|path| path.file_stem())
            .map(|stem| format!("{}.png", stem.to_string_lossy()))
            .unwrap_or_else(|| "untitled.png".to_owned());

        let mut dialog = rfd::FileDialog::new().set_file_name(file_name);
        for format in SaveFormat::ALL {
            dialog = dialog.add_filter(format.name(), format.extensions());
        }
        let Some(path) = dialog.save_file() else {
            log::debug!("Save cancelled");
            return;
        };
        self.save_to(&path);
    }

    pub fn save_to(&mut self, path: &Path) {
        match self.session.save_file(path) {
            Ok(_) => {
                self.current_path = Some(path.to_path_buf());
                self.mark_saved();
            }
            Err(err) => self.notify_error(&format!("Could not save {}", path.display()), &err),
        }
    }

    pub(crate) fn open_resize_dialog(&mut self) {
        let canvas = self.session.canvas();
        self.dialog = Some(Dialog::Resize {
            width: canvas.width(),
            height: canvas.height(),
            anchor: Anchor::default(),
        });
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        if !self.file_handler.check_for_dropped_files(ctx) {
            return;
        }
        if let Some(dropped) = self.file_handler.take_dropped_image() {
            self.load_dropped(dropped);
        }
    }

    fn load_dropped(&mut self, dropped: DroppedImage) {
        match dropped.result {
            Ok(canvas) => {
                self.session.load_canvas(canvas);
                // Without a real path, Save has to ask where to write
                self.current_path = dropped.path;
                self.mark_saved();
            }
            Err(err) => self.notify_error(&format!("Could not open {}", dropped.name), &err),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        use egui::{Key, KeyboardShortcut, Modifiers};

        const NEW: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::N);
        const OPEN: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::O);
        // Checked before SAVE, which would also match Ctrl+Shift+S
        const SAVE_AS: KeyboardShortcut =
            KeyboardShortcut::new(Modifiers::COMMAND.plus(Modifiers::SHIFT), Key::S);
        const SAVE: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::S);
        const QUIT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Q);

        if ctx.input_mut(|i| i.consume_shortcut(&NEW)) {
            self.request(ctx, PendingAction::New);
        } else if ctx.input_mut(|i| i.consume_shortcut(&OPEN)) {
            self.request(ctx, PendingAction::Open);
        } else if ctx.input_mut(|i| i.consume_shortcut(&SAVE_AS)) {
            self.save_with_dialog();
        } else if ctx.input_mut(|i| i.consume_shortcut(&SAVE)) {
            self.save();
        } else if ctx.input_mut(|i| i.consume_shortcut(&QUIT)) {
            self.request(ctx, PendingAction::Quit);
        }
    }

    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if !ctx.input(|i| i.viewport().close_requested()) {
            return;
        }
        if self.allow_close || !self.has_unsaved_changes() {
            log::info!("Closing");
            return;
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        self.dialog = Some(Dialog::ConfirmDiscard(PendingAction::Quit));
    }
}

/// egui's own Ctrl+Plus/Minus/0 would scale the whole UI; the canvas zoom owns those keys
pub(crate) fn configure_context(ctx: &egui::Context) {
    ctx.options_mut(|options| options.zoom_with_keyboard = false);
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, SETTINGS_KEY, self.session.settings());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_close_request(ctx);

        if self.dialog.is_none() {
            self.handle_dropped_files(ctx);
            self.handle_shortcuts(ctx);
        }

        menu_bar(self, ctx);
        tools_panel(self, ctx);
        status_bar(self, ctx);
        central_panel(self, ctx);
        dialogs(self, ctx);

        self.file_handler.preview_files_being_dropped(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_app() -> PaintApp {
        let config = PaintConfig {
            default_width: 8,
            default_height: 8,
            ..PaintConfig::default()
        };
        PaintApp::with_session(EditorSession::new(config).unwrap())
    }

    #[test]
    fn test_fresh_app_has_no_unsaved_changes() {
        let app = small_app();
        assert!(!app.has_unsaved_changes());
    }

    #[test]
    fn test_request_asks_when_modified() {
        let ctx = egui::Context::default();
        let mut app = small_app();
        app.session_mut().clear();
        assert!(app.has_unsaved_changes());

        app.request(&ctx, PendingAction::New);
        assert_eq!(app.dialog, Some(Dialog::ConfirmDiscard(PendingAction::New)));
        assert!(app.session().history().can_undo());
    }

    #[test]
    fn test_new_without_changes_runs_immediately() {
        let ctx = egui::Context::default();
        let mut app = small_app();
        app.request(&ctx, PendingAction::New);
        assert!(app.dialog.is_none());
        assert!(!app.has_unsaved_changes());
    }

    #[test]
    fn test_ctrl_plus_does_not_scale_the_ui() {
        let ctx = egui::Context::default();
        configure_context(&ctx);

        let ctrl_plus = egui::RawInput {
            modifiers: egui::Modifiers::COMMAND,
            events: vec![egui::Event::Key {
                key: egui::Key::Plus,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::COMMAND,
            }],
            ..Default::default()
        };
        let _ = ctx.run(ctrl_plus, |_| {});
        let _ = ctx.run(egui::RawInput::default(), |_| {});
        assert_eq!(ctx.zoom_factor(), 1.0);
    }

    #[test]
    fn test_dropped_bytes_leave_no_save_path() {
        let mut app = small_app();
        app.session_mut().clear();
        app.load_dropped(DroppedImage {
            name: "picture.png".to_owned(),
            path: None,
            result: crate::CanvasBuffer::new(3, 3),
        });
        assert_eq!(app.session().canvas().width(), 3);
        assert!(app.current_path.is_none());
        assert!(!app.has_unsaved_changes());

        app.load_dropped(DroppedImage {
            name: "/tmp/other.png".to_owned(),
            path: Some(PathBuf::from("/tmp/other.png")),
            result: crate::CanvasBuffer::new(5, 5),
        });
        assert_eq!(app.current_path, Some(PathBuf::from("/tmp/other.png")));
    }

    #[test]
    fn test_failed_open_sets_notification() {
        let mut app = small_app();
        app.open_path(Path::new("/definitely/not/here.png"));
        assert!(app.notification.is_some());
        assert!(app.current_path.is_none());
        assert_eq!(app.session().canvas().width(), 8);
    }
}
