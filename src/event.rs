use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use wallet_challenge_lib::sdk::{ExecutionResult, ModalEvent};

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// Keyboard input event
    Key(KeyEvent),
    /// Paste event (bracketed paste or Ctrl+V)
    Paste(String),
    /// Periodic tick for toast expiry
    Tick,
    /// SDK finished a challenge
    ChallengeCompleted(ExecutionResult),
    /// SDK put up or took down its modal
    Modal(ModalEvent),
}

/// Event handler for the TUI application
pub struct EventHandler {
    sender: mpsc::UnboundedSender<AppEvent>,
    receiver: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// Get a clone of the sender for other components
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.sender.clone()
    }

    /// Receive the next event (blocking)
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.receiver.recv().await
    }

    /// Forward terminal input to the event channel until either side closes
    pub fn spawn_input_listener(&self) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            while let Some(read) = reader.next().await {
                let input = match read {
                    Ok(input) => input,
                    Err(e) => {
                        tracing::warn!("Terminal input error: {}", e);
                        continue;
                    }
                };
                let Some(app_event) = translate(input, clipboard_text) else {
                    continue;
                };
                if sender.send(app_event).is_err() {
                    break;
                }
            }
            tracing::debug!("Input listener stopped");
        });
    }

    /// Spawn the tick timer task that drives toast expiry
    pub fn spawn_tick_timer(&self, tick_rate: Duration) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if sender.send(AppEvent::Tick).is_err() {
                    break; // Channel closed, stop timer
                }
            }
        });
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Map one terminal event to an app event. Releases, mouse and resize are
/// dropped. Ctrl+V pastes whatever `clipboard` yields and falls back to the
/// plain key when the clipboard is empty or unavailable.
fn translate(input: CrosstermEvent, clipboard: impl FnOnce() -> Option<String>) -> Option<AppEvent> {
    match input {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Release => None,
        CrosstermEvent::Key(key) if is_paste_shortcut(&key) => Some(clipboard().map_or(AppEvent::Key(key), AppEvent::Paste)),
        CrosstermEvent::Key(key) => Some(AppEvent::Key(key)),
        CrosstermEvent::Paste(text) => Some(AppEvent::Paste(text)),
        _ => None,
    }
}

fn is_paste_shortcut(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('v') | KeyCode::Char('V'))
}

fn clipboard_text() -> Option<String> {
    arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn no_clipboard() -> Option<String> {
        None
    }

    #[test]
    fn test_release_is_dropped() {
        let release = key(KeyCode::Char('a'), KeyModifiers::NONE, KeyEventKind::Release);
        assert!(translate(release, no_clipboard).is_none());

        let repeat = key(KeyCode::Char('a'), KeyModifiers::NONE, KeyEventKind::Repeat);
        assert!(matches!(translate(repeat, no_clipboard), Some(AppEvent::Key(k)) if k.code == KeyCode::Char('a')));
    }

    #[test]
    fn test_ctrl_v_pastes_clipboard() {
        let ctrl_v = key(KeyCode::Char('v'), KeyModifiers::CONTROL, KeyEventKind::Press);

        let event = translate(ctrl_v, || Some("challenge-42".to_string()));

        assert!(matches!(event, Some(AppEvent::Paste(text)) if text == "challenge-42"));
    }

    #[test]
    fn test_ctrl_v_without_clipboard_is_plain_key() {
        let ctrl_v = key(KeyCode::Char('v'), KeyModifiers::CONTROL, KeyEventKind::Press);

        let event = translate(ctrl_v, no_clipboard);

        assert!(matches!(event, Some(AppEvent::Key(k)) if k.code == KeyCode::Char('v')));
    }

    #[test]
    fn test_plain_v_never_reads_clipboard() {
        let v = key(KeyCode::Char('v'), KeyModifiers::NONE, KeyEventKind::Press);

        let event = translate(v, || panic!("clipboard read for a plain key"));

        assert!(matches!(event, Some(AppEvent::Key(_))));
    }

    #[test]
    fn test_bracketed_paste_and_resize() {
        let pasted = translate(CrosstermEvent::Paste("token".to_string()), no_clipboard);
        assert!(matches!(pasted, Some(AppEvent::Paste(text)) if text == "token"));

        assert!(translate(CrosstermEvent::Resize(80, 24), no_clipboard).is_none());
        assert!(translate(CrosstermEvent::FocusGained, no_clipboard).is_none());
    }
}
