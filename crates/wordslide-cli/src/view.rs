//! Terminal rendering for the slide and rating screens.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};

use wordslide_core::engine::{RatingView, SlideView};
use wordslide_core::model::Slider;
use wordslide_core::rating::RatingSession;
use wordslide_core::reveal::DisplayPair;
use wordslide_core::sequencer::NavAction;

use crate::terminal::Buttons;

const BAR_WIDTH: usize = 41;

/// Draw a horizontal slider with a marker at `value`.
pub fn slider_bar(slider: Slider, value: f64, width: usize) -> String {
    let range = slider.range();
    let (lo, hi) = (*range.start(), *range.end());
    let width = width.max(2);
    let pos = ((value - lo) / (hi - lo) * (width - 1) as f64).round() as usize;
    let pos = pos.min(width - 1);
    (0..width)
        .map(|i| if i == pos { '|' } else { '-' })
        .collect::<String>()
}

fn begin_frame(out: &mut impl Write) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))
}

fn line(out: &mut impl Write, row: u16, text: &str) -> io::Result<()> {
    queue!(out, cursor::MoveTo(2, row), Print(text))
}

/// Slide screen: fixation cross, then previous and current word side by side.
pub struct TerminalSlideView<W: Write + Send> {
    out: W,
    buttons: Buttons,
}

impl<W: Write + Send> TerminalSlideView<W> {
    pub fn new(out: W, buttons: Buttons) -> Self {
        Self { out, buttons }
    }

    fn draw_placeholder(&mut self) -> io::Result<()> {
        begin_frame(&mut self.out)?;
        line(&mut self.out, 4, "                +")?;
        line(&mut self.out, 8, "press s to start, q to quit")?;
        self.out.flush()
    }

    fn draw(&mut self, pair: &DisplayPair, actions: &[NavAction]) -> io::Result<()> {
        begin_frame(&mut self.out)?;
        queue!(
            self.out,
            cursor::MoveTo(2, 4),
            SetForegroundColor(Color::DarkGrey),
            Print(pair.prev.as_deref().unwrap_or("")),
            ResetColor,
            cursor::MoveTo(30, 4),
            SetAttribute(Attribute::Bold),
            Print(pair.curr.as_deref().unwrap_or("")),
            SetAttribute(Attribute::Reset),
        )?;
        for (i, action) in actions.iter().enumerate() {
            line(
                &mut self.out,
                8 + i as u16,
                &format!("[{}] {}", i + 1, action.label()),
            )?;
        }
        self.out.flush()
    }

    fn publish_buttons(&self, actions: &[NavAction]) {
        if let Ok(mut buttons) = self.buttons.lock() {
            *buttons = actions.to_vec();
        }
    }
}

impl<W: Write + Send> SlideView for TerminalSlideView<W> {
    fn placeholder(&mut self) {
        self.publish_buttons(&[]);
        if let Err(e) = self.draw_placeholder() {
            tracing::warn!("failed to draw slide: {e}");
        }
    }

    fn show(&mut self, pair: &DisplayPair, actions: &[NavAction]) {
        self.publish_buttons(actions);
        if let Err(e) = self.draw(pair, actions) {
            tracing::warn!("failed to draw slide: {e}");
        }
    }
}

/// Rating screen: word pair, three sliders and the submit button.
pub struct TerminalRatingView<W: Write + Send> {
    out: W,
    focus: Arc<Mutex<Slider>>,
    notices: Vec<String>,
}

impl<W: Write + Send> TerminalRatingView<W> {
    pub fn new(out: W, focus: Arc<Mutex<Slider>>) -> Self {
        Self {
            out,
            focus,
            notices: Vec::new(),
        }
    }

    /// Notices shown during the session, for repeating after the screen closes.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    fn draw(&mut self, session: &RatingSession) -> io::Result<()> {
        let focus = self.focus.lock().map(|f| *f).unwrap_or(Slider::NegativePositive);
        begin_frame(&mut self.out)?;
        queue!(
            self.out,
            cursor::MoveTo(2, 1),
            SetForegroundColor(Color::DarkGrey),
            Print(session.prev_word()),
            ResetColor,
            cursor::MoveTo(30, 1),
            SetAttribute(Attribute::Bold),
            Print(session.current().map(|w| w.word.as_str()).unwrap_or("")),
            SetAttribute(Attribute::Reset),
        )?;
        if !session.is_empty() {
            line(
                &mut self.out,
                2,
                &format!(
                    "{}: word {} of {}",
                    session.experiment_id(),
                    session.index() + 1,
                    session.len()
                ),
            )?;
        }

        let mut row = 4;
        for slider in Slider::ALL {
            let value = session.sliders().get(slider);
            let marker = if slider == focus { ">" } else { " " };
            line(&mut self.out, row, &format!("{marker} {}", slider.prompt()))?;
            line(
                &mut self.out,
                row + 1,
                &format!(
                    "  [{}] {value:+.3}",
                    slider_bar(slider, value, BAR_WIDTH)
                ),
            )?;
            line(
                &mut self.out,
                row + 2,
                &format!("   {}", slider.anchors().join("  ...  ")),
            )?;
            row += 4;
        }

        let button = if session.is_pending() { "Saving..." } else { "[Enter] Next" };
        line(&mut self.out, row, button)?;
        line(
            &mut self.out,
            row + 1,
            "up/down: choose slider  left/right: adjust (shift: fine)  q: quit",
        )?;
        self.out.flush()
    }
}

impl<W: Write + Send> RatingView for TerminalRatingView<W> {
    fn show(&mut self, session: &RatingSession) {
        if let Err(e) = self.draw(session) {
            tracing::warn!("failed to draw rating screen: {e}");
        }
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
        let drawn = begin_frame(&mut self.out)
            .and_then(|()| line(&mut self.out, 4, message))
            .and_then(|()| self.out.flush());
        if let Err(e) = drawn {
            tracing::warn!("failed to draw notice: {e}");
        }
    }
}
