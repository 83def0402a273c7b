use std::io;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// Terminal the board is drawn on.
pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Holds stdout in board mode until dropped: raw key input, the alternate
/// screen and mouse reports for the on-screen direction pad.
///
/// Mouse capture stays on for the whole session; pad clicks depend on it.
pub struct TerminalSession {
    terminal: AppTerminal,
}

impl TerminalSession {
    /// Switches stdout into board mode and clears it for the first frame.
    ///
    /// A failure part way through undoes whatever was already switched on.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide) {
            let _ = restore_terminal();
            return Err(error);
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout)).inspect_err(|_| {
            let _ = restore_terminal();
        })?;

        // From here on, Drop does the cleanup.
        let mut session = Self { terminal };
        session.terminal.clear()?;
        tracing::debug!("terminal switched to board mode");
        Ok(session)
    }

    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(error) = restore_terminal() {
            tracing::warn!(%error, "failed to restore the terminal");
        }
    }
}

/// Hands the terminal back to the shell.
///
/// Runs from both `Drop` and the panic hook, so a second call is a no-op in
/// effect.
pub fn restore_terminal() -> io::Result<()> {
    let _ = disable_raw_mode();
    execute!(io::stdout(), Show, DisableMouseCapture, LeaveAlternateScreen)
}
