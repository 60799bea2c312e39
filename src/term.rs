use crate::{TermInt, Coords};
use crate::render::FrameSink;
use std::io::{self, Stdout, Write, stdout};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use crossterm::{cursor, execute, terminal};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

static TERMINATE: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK: Once = Once::new();

/// Owns the terminal while the game runs: alternate screen, raw mode and a
/// hidden cursor are set up on creation and undone on drop.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    active: bool,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let (width, height) = check_size(width, height)?;
        let mut term = TermManager { width, height, stdout: stdout(), active: true };

        install_signal_handlers();
        install_panic_hook();

        // `term` already owns the cleanup if any of this fails halfway
        term.setup()?;
        Ok(term)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Waits up to `timeout` for input, then drains whatever else is already queued.
    pub fn read_key_events(&self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        if !poll(timeout).context("Error polling input")? {
            return Ok(events);
        }

        loop {
            if let Event::Key(ev) = read().context("Error reading input")? {
                events.push(ev);
            }

            if !poll(Duration::ZERO).context("Error polling input")? {
                break;
            }
        }

        Ok(events)
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let raw = terminal::disable_raw_mode();
        let screen = execute!(
            self.stdout,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        );
        raw.and(screen)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Error hiding cursor")?;
        Ok(())
    }
}

impl FrameSink for TermManager {
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        self.stdout.write_all(frame)?;
        self.stdout.flush()
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::warn!("failed to restore terminal: {}", e);
        }
    }
}

// A pty whose window size was never set reports 0x0
fn check_size(width: TermInt, height: TermInt) -> Result<Coords> {
    ensure!(width > 0 && height > 0, "terminal reports an empty {}x{} window", width, height);
    Ok((width, height))
}

/// Set once SIGTERM, SIGINT, SIGQUIT or SIGHUP arrives; the game loop checks
/// it between polls.
pub fn termination_requested() -> bool {
    TERMINATE.load(Ordering::Relaxed)
}

// The panic message would otherwise land on the alternate screen and vanish
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let _ = terminal::disable_raw_mode();
            let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
            previous(info);
        }));
    });
}

#[cfg(unix)]
fn install_signal_handlers() {
    // Only an atomic store happens in the handler, which is async-signal-safe
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = on_terminate as extern "C" fn(libc::c_int) as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&mut sa.sa_mask);
        for sig in [libc::SIGTERM, libc::SIGINT, libc::SIGQUIT, libc::SIGHUP] {
            libc::sigaction(sig, &sa, std::ptr::null_mut());
        }
    }
}

#[cfg(unix)]
extern "C" fn on_terminate(_sig: libc::c_int) {
    TERMINATE.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_signal_handlers() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_is_rejected() {
        assert!(check_size(0, 24).is_err());
        assert!(check_size(80, 0).is_err());
        assert!(check_size(0, 0).is_err());
        assert_eq!(check_size(1, 1).unwrap(), (1, 1));
        assert_eq!(check_size(80, 24).unwrap(), (80, 24));
    }

    // One test for every signal, since they all share the flag
    #[cfg(unix)]
    #[test]
    fn termination_signals_set_the_flag() {
        install_signal_handlers();

        for sig in [libc::SIGTERM, libc::SIGINT, libc::SIGQUIT, libc::SIGHUP] {
            let mut current: libc::sigaction = unsafe { std::mem::zeroed() };
            unsafe {
                libc::sigaction(sig, std::ptr::null(), &mut current);
            }
            assert_ne!(current.sa_sigaction, libc::SIG_DFL, "signal {}", sig);

            TERMINATE.store(false, Ordering::Relaxed);
            unsafe {
                libc::raise(sig);
            }
            assert!(termination_requested(), "signal {}", sig);
        }

        TERMINATE.store(false, Ordering::Relaxed);
    }
}
