//! The `Responder` trait -- the I/O seam between the disclosure state
//! machines and whoever is answering.
//!
//! The trait is object-safe so sessions can run against `&mut dyn Responder`.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Errors surfaced while running a disclosure session.
#[derive(Debug, Error)]
pub enum DisclosureError {
    #[error("responder channel failed: {0}")]
    Channel(#[from] io::Error),
}

/// Output sink and answer source for a disclosure session.
pub trait Responder {
    /// Write text to the user.
    fn show(&mut self, text: &str) -> io::Result<()>;

    /// Ask a question and block until a reply arrives.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;
}

// Compile-time assertion: Responder must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Responder) {}
};

/// Line-oriented responder over any reader/writer pair.
///
/// End of input reads as an empty reply, which classifies as "no".
pub struct StdioResponder<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> StdioResponder<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> Responder for StdioResponder<R, W> {
    fn show(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{text}")?;
        self.writer.flush()
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.writer, "\n{prompt}")?;
        self.writer.flush()?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            tracing::debug!("responder input closed, treating as empty reply");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn ask_reads_one_line_per_prompt() {
        let input = Cursor::new("yes\nno\n");
        let mut responder = StdioResponder::new(input, Vec::new());

        assert_eq!(responder.ask("first? ").unwrap(), "yes");
        assert_eq!(responder.ask("second? ").unwrap(), "no");

        let (_, out) = responder.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, "\nfirst? \nsecond? ");
    }

    #[test]
    fn ask_at_eof_returns_empty_reply() {
        let mut responder = StdioResponder::new(Cursor::new(""), Vec::new());
        assert_eq!(responder.ask("anything? ").unwrap(), "");
    }

    #[test]
    fn ask_strips_crlf() {
        let mut responder = StdioResponder::new(Cursor::new("YES\r\n"), Vec::new());
        assert_eq!(responder.ask("q").unwrap(), "YES");
    }

    #[test]
    fn show_writes_a_line() {
        let mut responder = StdioResponder::new(Cursor::new(""), Vec::new());
        responder.show("hello").unwrap();
        let (_, out) = responder.into_inner();
        assert_eq!(out, b"hello\n");
    }

    #[test]
    fn responder_is_object_safe() {
        let mut responder = StdioResponder::new(Cursor::new("x\n"), Vec::new());
        let dynamic: &mut dyn Responder = &mut responder;
        assert_eq!(dynamic.ask("q").unwrap(), "x");
    }
}
