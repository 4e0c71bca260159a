//! Raw-mode terminal session and keyboard input.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use tokio::sync::mpsc;

use wordslide_core::engine::{RatingInput, SlideInput};
use wordslide_core::model::{Slider, SLIDER_STEP};
use wordslide_core::reveal::is_start_key;
use wordslide_core::sequencer::NavAction;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Coarse and fine slider steps for arrow keys.
pub const COARSE_STEP: f64 = 0.05;
pub const FINE_STEP: f64 = SLIDER_STEP;

/// Raw mode on the alternate screen; restored on drop.
pub struct TerminalSession;

impl TerminalSession {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)
            .context("failed to prepare terminal")?;
        Ok(Self)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = io::stdout().flush();
    }
}

/// Forward key presses to `tx` until the receiving screen goes away.
///
/// The listener lives exactly as long as the screen that owns the receiver.
pub fn spawn_key_listener<T, F>(tx: mpsc::Sender<T>, mut map: F) -> thread::JoinHandle<()>
where
    T: Send + 'static,
    F: FnMut(&KeyEvent) -> Option<T> + Send + 'static,
{
    thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::error!("terminal input failed: {e}");
                    break;
                }
            }
            let key = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
                Ok(_) => continue,
                Err(e) => {
                    tracing::error!("terminal input failed: {e}");
                    break;
                }
            };
            if let Some(input) = map(&key) {
                if tx.blocking_send(input).is_err() {
                    break;
                }
            }
        }
    })
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Navigation buttons currently on screen, shared between view and keys.
pub type Buttons = Arc<Mutex<Vec<NavAction>>>;

/// Map a key on the slide screen. Digits press the numbered buttons.
pub fn slide_key(key: &KeyEvent, buttons: &Buttons) -> Option<SlideInput> {
    if is_quit(key) {
        return Some(SlideInput::Quit);
    }
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    if is_start_key(c) {
        return Some(SlideInput::Start);
    }
    let n = c.to_digit(10)? as usize;
    let buttons = buttons.lock().ok()?;
    let action = n.checked_sub(1).and_then(|i| buttons.get(i)).cloned();
    action.map(SlideInput::Choose)
}

/// Key mapping for the rating screen; tracks which slider has focus.
pub struct RatingKeys {
    focus: Arc<Mutex<Slider>>,
}

impl RatingKeys {
    pub fn new(focus: Arc<Mutex<Slider>>) -> Self {
        Self { focus }
    }

    fn focused(&self) -> Slider {
        self.focus
            .lock()
            .map(|f| *f)
            .unwrap_or(Slider::NegativePositive)
    }

    fn move_focus(&self, step: fn(Slider) -> Slider) -> Option<RatingInput> {
        let mut focus = self.focus.lock().ok()?;
        *focus = step(*focus);
        Some(RatingInput::Redraw)
    }

    pub fn map(&mut self, key: &KeyEvent) -> Option<RatingInput> {
        if is_quit(key) {
            return Some(RatingInput::Quit);
        }
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            FINE_STEP
        } else {
            COARSE_STEP
        };
        match key.code {
            KeyCode::Up | KeyCode::BackTab => self.move_focus(Slider::prev),
            KeyCode::Down | KeyCode::Tab => self.move_focus(Slider::next),
            KeyCode::Left => Some(RatingInput::Nudge(self.focused(), -step)),
            KeyCode::Right => Some(RatingInput::Nudge(self.focused(), step)),
            KeyCode::Char('0') => Some(RatingInput::Set(self.focused(), 0.0)),
            KeyCode::Home => {
                let slider = self.focused();
                Some(RatingInput::Set(slider, *slider.range().start()))
            }
            KeyCode::End => {
                let slider = self.focused();
                Some(RatingInput::Set(slider, *slider.range().end()))
            }
            KeyCode::Enter | KeyCode::Char(' ') => Some(RatingInput::Submit),
            _ => None,
        }
    }
}
