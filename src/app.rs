use crate::event::AppEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tokio::sync::mpsc;
use wallet_challenge_lib::form::FormField;
use wallet_challenge_lib::sdk::ModalEvent;
use wallet_challenge_lib::session::{Session, SubmitOutcome};

/// Focusable rows of the form, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Endpoint,
    AppId,
    UserToken,
    SecretKey,
    ChallengeId,
    Execute,
}

impl Focus {
    pub const ORDER: [Focus; 6] = [
        Focus::Endpoint,
        Focus::AppId,
        Focus::UserToken,
        Focus::SecretKey,
        Focus::ChallengeId,
        Focus::Execute,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// Form field behind this row, if it is one of the challenge inputs
    pub fn form_field(self) -> Option<FormField> {
        match self {
            Focus::UserToken => Some(FormField::UserToken),
            Focus::SecretKey => Some(FormField::SecretKey),
            Focus::ChallengeId => Some(FormField::ChallengeId),
            _ => None,
        }
    }
}

/// Main application state
pub struct App {
    /// Configuration, form values, toast and execute state
    pub session: Session,
    /// Focused row
    pub focus: Focus,
    /// Title of the modal the SDK currently has up
    pub modal: Option<String>,
    /// Should the app quit
    pub should_quit: bool,
    /// Loop-back for SDK completions
    event_sender: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(session: Session, event_sender: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            session,
            focus: Focus::UserToken,
            modal: None,
            should_quit: false,
            event_sender,
        }
    }

    /// Handle incoming events
    pub fn handle_event(&mut self, event: AppEvent) {
        let now = Instant::now();
        match event {
            AppEvent::Key(key) => self.handle_key(key, now),
            AppEvent::Paste(text) => self.handle_paste(&text, now),
            AppEvent::Tick => {
                self.session.tick(now);
            }
            AppEvent::ChallengeCompleted(result) => {
                let state = self.session.complete(result, now);
                tracing::debug!("Challenge completion handled: {:?}", state);
            }
            AppEvent::Modal(ModalEvent::Presented(title)) => self.modal = Some(title),
            AppEvent::Modal(ModalEvent::Dismissed) => self.modal = None,
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        // Global shortcuts
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('e') => {
                    self.submit(now);
                    return;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Esc => self.session.feedback_mut().dismiss(),

            KeyCode::Enter if self.focus == Focus::Execute => self.submit(now),
            KeyCode::Enter => self.focus = self.focus.next(),

            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if self.focus == Focus::Endpoint => {
                let endpoint = self.session.endpoint().toggled();
                self.session.set_endpoint(endpoint, now);
            }

            KeyCode::Backspace => self.edit_focused(now, |value| {
                value.pop();
            }),
            KeyCode::Char(c) => self.edit_focused(now, |value| value.push(c)),

            _ => {}
        }
    }

    /// Paste into the focused text field (first line only)
    fn handle_paste(&mut self, text: &str, now: Instant) {
        let line = text.lines().next().unwrap_or("").trim_end();
        if line.is_empty() {
            return;
        }
        self.edit_focused(now, |value| value.push_str(line));
    }

    /// Apply `edit` to the focused text field. App ID edits go through the
    /// session so every change re-registers with the SDK.
    fn edit_focused(&mut self, now: Instant, edit: impl FnOnce(&mut String)) {
        if self.focus == Focus::AppId {
            let mut app_id = self.session.app_id().to_string();
            edit(&mut app_id);
            if app_id != self.session.app_id() {
                self.session.set_app_id(app_id, now);
            }
        } else if let Some(field) = self.focus.form_field() {
            let mut value = self.session.form().field(field).to_string();
            edit(&mut value);
            self.session.set_field(field, value);
        }
    }

    /// Execute button
    fn submit(&mut self, now: Instant) {
        let sender = self.event_sender.clone();
        let outcome = self.session.submit(now, move |result| {
            // Back onto the event loop
            let _ = sender.send(AppEvent::ChallengeCompleted(result));
        });

        if let SubmitOutcome::Rejected(e) = outcome {
            // Jump to the field that needs filling
            self.focus = match e.0 {
                FormField::UserToken => Focus::UserToken,
                FormField::SecretKey => Focus::SecretKey,
                FormField::ChallengeId => Focus::ChallengeId,
            };
        }
    }
}
