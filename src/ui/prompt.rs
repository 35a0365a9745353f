use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Errors that end an interactive session
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Input closed")]
    Eof,

    #[error("Console I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Line-oriented console prompts over any reader/writer pair
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Print a line
    pub fn say(&mut self, line: impl Display) -> Result<(), PromptError> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Print a prompt and read one line, without its line terminator
    pub fn text(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Eof);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Prompt until the input parses as `T`
    pub fn number<T: FromStr>(&mut self, prompt: &str) -> Result<T, PromptError> {
        self.number_where(prompt, |_| true)
    }

    /// Prompt until the input parses as `T` and passes `valid`
    ///
    /// Bad input is reported and re-prompted; only end of input or a console
    /// failure is returned as an error.
    pub fn number_where<T: FromStr>(
        &mut self,
        prompt: &str,
        valid: impl Fn(&T) -> bool,
    ) -> Result<T, PromptError> {
        loop {
            let answer = self.text(prompt)?;
            match answer.trim().parse::<T>() {
                Ok(value) if valid(&value) => return Ok(value),
                _ => {
                    log::debug!("Rejected numeric input {:?}", answer);
                    self.say("Invalid input. Please enter a number.")?;
                }
            }
        }
    }

    /// Yes/no question; only `y` (any case) counts as yes
    pub fn confirm(&mut self, prompt: &str) -> Result<bool, PromptError> {
        Ok(self.text(prompt)?.trim().eq_ignore_ascii_case("y"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_strips_line_ending() {
        let mut output = Vec::new();
        let mut prompter = Prompter::new(&b"Elm St\r\n"[..], &mut output);

        assert_eq!(prompter.text("Location: ").unwrap(), "Elm St");
        assert_eq!(String::from_utf8(output).unwrap(), "Location: ");
    }

    #[test]
    fn test_number_retries_until_valid() {
        let mut output = Vec::new();
        let mut prompter = Prompter::new(&b"abc\n\n 3 \n"[..], &mut output);

        let bedrooms: u32 = prompter.number("Bedrooms: ").unwrap();
        assert_eq!(bedrooms, 3);

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches("Invalid input").count(), 2);
        assert_eq!(printed.matches("Bedrooms: ").count(), 3);
    }

    #[test]
    fn test_number_where_applies_filter() {
        let mut output = Vec::new();
        let mut prompter = Prompter::new(&b"inf\n-5\n12.5\n"[..], &mut output);

        let price: f64 = prompter
            .number_where("Price: ", |p: &f64| p.is_finite() && *p >= 0.0)
            .unwrap();
        assert_eq!(price, 12.5);
    }

    #[test]
    fn test_number_at_eof() {
        let mut output = Vec::new();
        let mut prompter = Prompter::new(&b"oops\n"[..], &mut output);

        assert!(matches!(prompter.number::<f64>("Price: "), Err(PromptError::Eof)));
    }

    #[test]
    fn test_confirm() {
        let mut output = Vec::new();
        let mut prompter = Prompter::new(&b"Y\nno\n"[..], &mut output);

        assert!(prompter.confirm("Descending? (y/n): ").unwrap());
        assert!(!prompter.confirm("Descending? (y/n): ").unwrap());
    }
}
