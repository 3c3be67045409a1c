use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

/// What the game loop needs from the console.
pub trait Screen {
    /// Clears the screen and draws `frame`.
    fn show(&mut self, frame: &str) -> Result<()>;

    fn clear(&mut self) -> Result<()>;

    fn pause(&mut self, duration: Duration);

    /// Prints `prompt` and reads one line. `None` on end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// The real terminal on stdout/stdin.
pub struct Terminal<W: Write, R: BufRead> {
    out: W,
    input: R,
}

impl Terminal<io::Stdout, io::StdinLock<'static>> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stdin().lock())
    }
}

impl<W: Write, R: BufRead> Terminal<W, R> {
    pub fn new(out: W, input: R) -> Self {
        Self { out, input }
    }
}

impl<W: Write, R: BufRead> Screen for Terminal<W, R> {
    fn show(&mut self, frame: &str) -> Result<()> {
        self.clear()?;
        writeln!(self.out, "{frame}").context("Failed to draw frame")?;
        self.out.flush().context("Failed to flush terminal")
    }

    fn clear(&mut self) -> Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0)).context("Failed to clear terminal")
    }

    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        writeln!(self.out, "{prompt}").context("Failed to write prompt")?;
        write!(self.out, "> ").context("Failed to write prompt")?;
        self.out.flush().context("Failed to flush terminal")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}
