//! Story viewer hosted in a terminal.
//!
//! crossterm supplies keys, mouse tracks, resizes and focus changes;
//! ratatui draws each [`ViewFrame`]. The terminal also
//! plays the host pager: page requests are answered immediately with the
//! visibility reports a settled scroll would produce.

use std::{
    collections::VecDeque,
    io::{self, Stdout, stdout},
    time::Instant,
};

use crossterm::{
    ExecutableCommand,
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        EventStream, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
    },
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::{FutureExt, StreamExt};
use ratatui::{Terminal, backend::CrosstermBackend};
use storyline_app::{Driver, ViewFrame, ViewerEvent};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    input::{InputState, KeyInput, MouseInput},
    ui,
};

/// Failure to drive the terminal.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// Raw mode, screen switching, drawing or event reading failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// [`Driver`] backed by the controlling terminal.
///
/// Keys and mouse reports go through [`InputState`] and come out as viewer
/// events, buffered until the runtime polls for them.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    input: InputState,
    /// Events translated but not yet delivered
    pending: VecDeque<ViewerEvent>,
}

impl TerminalDriver {
    /// Take over the terminal for a pager of `page_count` pages opened on
    /// `initial_page`.
    pub fn new(page_count: usize, initial_page: usize) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout()
            .execute(EnterAlternateScreen)?
            .execute(EnableMouseCapture)?
            .execute(EnableFocusChange)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        let mut input = InputState::new(page_count, initial_page);
        let (cols, rows) = terminal::size()?;
        let pending = VecDeque::from([input.resize(cols, rows)]);

        Ok(Self { terminal, event_stream, input, pending })
    }

    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::PageUp => Some(KeyInput::PageUp),
            KeyCode::PageDown => Some(KeyInput::PageDown),
            _ => None,
        }
    }

    /// Only the left button draws pointer tracks.
    fn convert_mouse(kind: MouseEventKind) -> Option<MouseInput> {
        match kind {
            MouseEventKind::Down(MouseButton::Left) => Some(MouseInput::Press),
            MouseEventKind::Drag(MouseButton::Left) => Some(MouseInput::Drag),
            MouseEventKind::Up(MouseButton::Left) => Some(MouseInput::Release),
            _ => None,
        }
    }

    fn translate(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
                {
                    self.pending.push_back(ViewerEvent::Dismiss);
                } else if let Some(key_input) = Self::convert_key(key.code) {
                    self.pending.extend(self.input.handle_key(key_input));
                }
            },
            Event::Mouse(mouse) => {
                if let Some(mouse_input) = Self::convert_mouse(mouse.kind) {
                    self.pending.push_back(self.input.handle_mouse(
                        mouse_input,
                        mouse.column,
                        mouse.row,
                    ));
                }
            },
            Event::Resize(cols, rows) => self.pending.push_back(self.input.resize(cols, rows)),
            Event::FocusLost => self.pending.push_back(ViewerEvent::Hidden),
            Event::FocusGained => self.pending.extend(self.input.refocus()),
            _ => {},
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;
    type Instant = Instant;

    async fn poll_event(&mut self) -> Result<Option<ViewerEvent>, Self::Error> {
        while self.pending.is_empty() {
            // Only take what the stream already has; the runtime paces frames
            let Some(next) = self.event_stream.next().now_or_never() else {
                break;
            };
            match next {
                Some(Ok(event)) => self.translate(event),
                Some(Err(e)) => return Err(TerminalError::Io(e)),
                None => break,
            }
        }

        Ok(self.pending.pop_front())
    }

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn render(&mut self, frame: &ViewFrame<'_>) -> Result<(), Self::Error> {
        self.terminal.draw(|f| ui::render(f, frame))?;
        Ok(())
    }

    fn request_page_change(&mut self, target: usize) -> Result<(), Self::Error> {
        debug!(target, "pager scrolling");
        self.pending.extend(self.input.page_requested(target));
        Ok(())
    }

    fn item_started(&mut self, page: usize, item: usize) {
        debug!(page, item, "item started");
    }

    fn close(&mut self) {
        info!(page = self.input.visible_page(), "viewer closed");
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        let _ = stdout().execute(DisableFocusChange);
        let _ = stdout().execute(DisableMouseCapture);
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
