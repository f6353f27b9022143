use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

/// The ratatui terminal plus the raw-mode/alternate-screen state it needs.
///
/// `release` hands the tty back (cursor shown, cooked mode) so a player or
/// preview can use it; `reclaim` takes it again. Dropping a held screen
/// releases it.
pub(super) struct Screen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    held: bool,
}

impl Screen {
    pub(super) fn open() -> Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
            .context("failed to initialize terminal backend")?;
        let mut screen = Self {
            terminal,
            held: false,
        };
        screen.reclaim()?;
        Ok(screen)
    }

    pub(super) fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render).context("failed to draw page")?;
        Ok(())
    }

    pub(super) fn release(&mut self) -> Result<()> {
        if !self.held {
            return Ok(());
        }
        self.held = false;
        self.terminal.show_cursor().context("failed to show cursor")?;
        disable_raw_mode().context("failed to disable raw mode")?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .context("failed to leave alternate screen")?;
        Ok(())
    }

    pub(super) fn reclaim(&mut self) -> Result<()> {
        if self.held {
            return Ok(());
        }
        enable_raw_mode().context("failed to enable raw mode")?;
        // Held from here on so a failure below still gets undone on drop.
        self.held = true;
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)
            .context("failed to enter alternate screen")?;
        self.terminal.hide_cursor().context("failed to hide cursor")?;
        self.terminal.clear().context("failed to clear screen")?;
        Ok(())
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        if self.held {
            let _ = self.terminal.show_cursor();
            let _ = disable_raw_mode();
            let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        }
    }
}
