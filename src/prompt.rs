use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};
use dialoguer::Input;

/// Yes/no decision from the operator.
pub trait Confirm {
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Free-text answer on stdin; only `y` (any case) counts as yes.
///
/// Interactive terminals get a dialoguer prompt, piped input is read as a
/// plain line.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> Result<bool> {
        let prompt = format!("{} (y/n)", question);

        if io::stdin().is_terminal() {
            let answer = Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()?;
            return Ok(is_yes(&answer));
        }

        print!("{}: ", prompt);
        io::stdout().flush()?;
        read_answer(&mut io::stdin().lock())
    }
}

/// One line from `input`; end of input counts as no.
pub fn read_answer(input: &mut impl BufRead) -> Result<bool> {
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read answer")?;
    Ok(is_yes(&line))
}

/// Answers yes without asking, for `--yes`.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _question: &str) -> Result<bool> {
        Ok(true)
    }
}

pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Whether a scrape into `output` should go ahead. Only asks when the file
/// is already there.
pub fn should_scrape(output: &Path, confirm: &dyn Confirm) -> Result<bool> {
    if !output.exists() {
        return Ok(true);
    }
    println!("Found existing data file: {}", output.display());
    confirm.confirm("Scrape again?")
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::fs;

    use super::*;

    struct Canned {
        answer: bool,
        asked: Cell<bool>,
    }

    impl Confirm for Canned {
        fn confirm(&self, _question: &str) -> Result<bool> {
            self.asked.set(true);
            Ok(self.answer)
        }
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes("Y"));
        assert!(is_yes(" y\n"));
        assert!(!is_yes("yes"));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
    }

    #[test]
    fn test_read_answer_from_piped_input() {
        assert!(read_answer(&mut io::Cursor::new("y\n")).unwrap());
        assert!(read_answer(&mut io::Cursor::new("Y\r\nignored\n")).unwrap());
        assert!(!read_answer(&mut io::Cursor::new("n\ny\n")).unwrap());
        assert!(!read_answer(&mut io::Cursor::new("yes\n")).unwrap());
        assert!(!read_answer(&mut io::Cursor::new("")).unwrap());
    }

    #[test]
    fn test_missing_file_does_not_ask() {
        let dir = tempfile::tempdir().unwrap();
        let confirm = Canned { answer: false, asked: Cell::new(false) };

        assert!(should_scrape(&dir.path().join("none.csv"), &confirm).unwrap());
        assert!(!confirm.asked.get());
    }

    #[test]
    fn test_existing_file_asks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sanya_2012_weather.csv");
        fs::write(&path, "old").unwrap();

        let decline = Canned { answer: false, asked: Cell::new(false) };
        assert!(!should_scrape(&path, &decline).unwrap());
        assert!(decline.asked.get());

        assert!(should_scrape(&path, &AssumeYes).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
    }
}
