//! Frame output.
use std::io::Write;

use quote_common::Result;

use crate::view::BoardView;

/// Clear the screen and move the cursor home.
const CLEAR: &str = "\x1B[2J\x1B[H";

/// Writes board frames to a terminal or any other sink.
pub struct Screen<W: Write> {
    out: W,
    clear: bool,
}

impl<W: Write> Screen<W> {
    /// When `clear` is set every frame replaces the previous one; otherwise
    /// frames are appended, separated by a blank line.
    pub fn new(out: W, clear: bool) -> Self {
        Self { out, clear }
    }

    /// Write one frame and flush.
    pub fn draw(&mut self, view: &BoardView) -> Result<()> {
        if self.clear {
            write!(self.out, "{}", CLEAR)?;
        }
        write!(self.out, "{}", view)?;
        if !self.clear {
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
