//! Line-based console I/O
//!
//! Prompts go to one stream (stderr in the binary) and results to another
//! (stdout), so output can be piped while words are still typed in.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use zeroize::Zeroizing;

pub struct Console<'a> {
    input: &'a mut dyn BufRead,
    prompts: &'a mut dyn Write,
    pub out: &'a mut dyn Write,
}

impl<'a> Console<'a> {
    pub fn new(
        input: &'a mut dyn BufRead,
        prompts: &'a mut dyn Write,
        out: &'a mut dyn Write,
    ) -> Self {
        Self {
            input,
            prompts,
            out,
        }
    }

    /// Print `prompt` and read one line without its line ending.
    ///
    /// End of input yields an empty line.
    pub fn ask(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        write!(self.prompts, "{}", prompt).context("Failed to write prompt")?;
        self.prompts.flush().context("Failed to flush prompt")?;

        let mut line = Zeroizing::new(String::new());
        self.input
            .read_line(&mut line)
            .context("Failed to read from stdin")?;

        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_ask_reads_lines_in_order() {
        let mut input = Cursor::new(b"first line\r\n  spaced passphrase  \n".to_vec());
        let mut prompts = Vec::new();
        let mut out = Vec::new();
        let mut console = Console::new(&mut input, &mut prompts, &mut out);

        assert_eq!(console.ask("one: ").unwrap().as_str(), "first line");
        // Inner and surrounding spaces are part of a passphrase
        assert_eq!(
            console.ask("two: ").unwrap().as_str(),
            "  spaced passphrase  "
        );
        assert_eq!(console.ask("three: ").unwrap().as_str(), "");

        assert_eq!(String::from_utf8(prompts).unwrap(), "one: two: three: ");
        assert!(out.is_empty());
    }
}
