mod render;
mod screen;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::browse::{Frontend, PageView, UserInput};

use self::render::draw_page;
use self::screen::Screen;

/// Crossterm/ratatui frontend for the browser: one line of input per
/// interaction, with arrow keys acting immediately.
pub(crate) struct TerminalFrontend {
    screen: Screen,
    buffer: String,
}

impl TerminalFrontend {
    pub(crate) fn enter() -> Result<Self> {
        Ok(Self {
            screen: Screen::open()?,
            buffer: String::new(),
        })
    }
}

impl Frontend for TerminalFrontend {
    fn interact(&mut self, view: &PageView<'_>) -> Result<UserInput> {
        loop {
            let buffer = &self.buffer;
            self.screen.draw(|frame| draw_page(frame, view, buffer))?;

            let Event::Key(key) = event::read().context("failed to read terminal event")? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_interrupt(&key) {
                self.buffer.clear();
                return Ok(UserInput::Interrupt);
            }
            if view.notice.is_some() {
                return Ok(UserInput::Line(String::new()));
            }

            match key.code {
                KeyCode::Enter => return Ok(UserInput::Line(std::mem::take(&mut self.buffer))),
                KeyCode::Right => return Ok(UserInput::NextPage),
                KeyCode::Left => return Ok(UserInput::PreviousPage),
                KeyCode::Up => return Ok(UserInput::CursorUp),
                KeyCode::Down => return Ok(UserInput::CursorDown),
                KeyCode::Backspace => {
                    self.buffer.pop();
                }
                KeyCode::Esc => self.buffer.clear(),
                KeyCode::Char(ch) => self.buffer.push(ch),
                _ => {}
            }
        }
    }

    fn suspend(&mut self) -> Result<()> {
        self.screen.release()
    }

    fn resume(&mut self) -> Result<()> {
        self.screen.reclaim()
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
}
