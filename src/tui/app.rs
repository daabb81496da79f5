//! Window state and event loop

use crate::error::{Error, Result};
use crate::output::render_error;
use crate::stash::QrStash;
use crate::storage::{FileSystem, OsFileSystem};
use crate::tui::inputs::{Action, map_event};
use crate::tui::views;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::PathBuf;

/// Which control receives Enter and typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The multi-line text field
    Input,
    /// "Generate QR Code"
    GenerateButton,
    /// "Clear Input"
    ClearButton,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Input => Focus::GenerateButton,
            Focus::GenerateButton => Focus::ClearButton,
            Focus::ClearButton => Focus::Input,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Input => Focus::ClearButton,
            Focus::GenerateButton => Focus::Input,
            Focus::ClearButton => Focus::GenerateButton,
        }
    }
}

/// The last saved code, shown in the image region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// File the code was written to
    pub path: PathBuf,
    /// Half-block rendering of the code
    pub art: String,
}

/// Tone of a modal dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// Success message
    Info,
    /// Failure message
    Error,
}

/// Modal message box; any key dismisses it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    /// Success or failure
    pub kind: DialogKind,
    /// Box title
    pub title: String,
    /// Body text
    pub message: String,
}

/// All state of the window; event handlers are methods on it
pub struct TuiApp<F = OsFileSystem> {
    stash: QrStash<F>,
    input: String,
    focus: Focus,
    preview: Option<Preview>,
    dialog: Option<Dialog>,
    should_quit: bool,
}

impl<F: FileSystem> TuiApp<F> {
    /// Fresh window state saving through `stash`
    pub fn new(stash: QrStash<F>) -> Self {
        Self {
            stash,
            input: String::new(),
            focus: Focus::Input,
            preview: None,
            dialog: None,
            should_quit: false,
        }
    }

    /// Current text field contents
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Focused control
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Image region contents
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Open dialog, if any
    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    /// Whether the loop should exit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Folder images are saved into
    pub fn output_folder(&self) -> PathBuf {
        self.stash.location().folder_path()
    }

    /// Apply one user action
    pub fn handle(&mut self, action: Action) {
        if self.dialog.is_some() {
            match action {
                Action::None => {}
                _ => self.dialog = None,
            }
            return;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::Char(c) => {
                if self.focus == Focus::Input {
                    self.input.push(c);
                }
            }
            Action::Paste(text) => {
                self.input.push_str(&text.replace("\r\n", "\n"));
                self.focus = Focus::Input;
            }
            Action::Backspace => {
                if self.focus == Focus::Input {
                    self.input.pop();
                }
            }
            Action::Enter => match self.focus {
                Focus::Input => self.input.push('\n'),
                Focus::GenerateButton => self.generate(),
                Focus::ClearButton => self.clear(),
            },
            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.prev(),
            Action::Generate => self.generate(),
            Action::Clear => self.clear(),
            Action::None => {}
        }
    }

    /// Save the current text and show the result
    pub fn generate(&mut self) {
        match self.stash.save_and_open(&self.input) {
            Ok(outcome) => {
                let mut message = format!(
                    "QR Code saved successfully at:\n{}",
                    outcome.saved.path.display()
                );
                if let Some(warning) = outcome.open_warning {
                    message.push_str(&format!("\n\nCould not open the folder: {warning}"));
                }
                self.preview = Some(Preview {
                    path: outcome.saved.path,
                    art: outcome.saved.preview,
                });
                self.dialog = Some(Dialog {
                    kind: DialogKind::Info,
                    title: "Saved".to_string(),
                    message,
                });
            }
            Err(Error::EmptyPayload) => {
                self.dialog = Some(Dialog {
                    kind: DialogKind::Error,
                    title: "Empty input".to_string(),
                    message: "Please enter some text to generate a QR code.".to_string(),
                });
            }
            Err(err) => {
                tracing::error!("QR generation failed: {err}");
                self.dialog = Some(Dialog {
                    kind: DialogKind::Error,
                    title: "Error".to_string(),
                    message: render_error(&err).human.join("\n"),
                });
            }
        }
    }

    /// Reset the text field and image region; saved files are untouched
    pub fn clear(&mut self) {
        self.input.clear();
        self.preview = None;
        self.focus = Focus::Input;
    }

    async fn mainloop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut events = EventStream::new();

        while !self.should_quit {
            terminal.draw(|f| views::draw(f, self))?;

            match events.next().await {
                Some(Ok(event)) => self.handle(map_event(&event)),
                Some(Err(err)) => return Err(Error::Io(err)),
                None => break,
            }
        }

        Ok(())
    }
}

/// Run the window until the user quits
pub async fn run_tui(stash: QrStash) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = TuiApp::new(stash);
    let res = app.mainloop(&mut terminal).await;

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )
    .ok();
    terminal.show_cursor().ok();

    res
}
