//! Interactive mode: raw terminal input fed into the shell.

use std::io::{self, Stdout, Write};
use std::panic;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event as CtEvent, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers,
};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{cursor, execute, queue};

use crate::error::ShellError;
use crate::shell::Shell;
use crate::text;

/// Raw mode, alternate screen and mouse capture, restored on drop or panic.
pub struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        Ok(Self { stdout })
    }

    /// Redraw the whole screen from the shell's text lines.
    pub fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        queue!(self.stdout, Clear(ClearType::All))?;
        for (row, line) in lines.iter().take(usize::from(height)).enumerate() {
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            queue!(
                self.stdout,
                cursor::MoveTo(0, row),
                Print(text::truncate_to_width(line, usize::from(width)))
            )?;
        }
        self.stdout.flush()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        cursor::Show,
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    Ok(())
}

/// Ctrl+C and Ctrl+Q leave interactive mode.
pub fn is_quit(event: &CtEvent) -> bool {
    matches!(
        event,
        CtEvent::Key(KeyEvent {
            code: KeyCode::Char('c' | 'q'),
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) if modifiers.contains(KeyModifiers::CONTROL)
    )
}

/// Drive the shell from terminal input until the user quits.
pub fn run_interactive(shell: &mut Shell) -> Result<(), ShellError> {
    let mut guard = TerminalGuard::new()?;
    let (width, height) = terminal::size()?;
    shell.resize(i32::from(width), i32::from(height));
    guard.draw(&shell.screen())?;
    log::info!("[terminal] interactive session started at {}x{}", width, height);

    loop {
        let event = event::read()?;
        if is_quit(&event) {
            break;
        }
        if shell.handle_terminal_event(&event).is_some() {
            guard.draw(&shell.screen())?;
        }
    }
    log::info!("[terminal] interactive session ended");
    Ok(())
}
