/// Prompt Module
///
/// The interaction layer between the action flows and the terminal: three
/// validated prompt kinds (non-empty text, non-negative number, single
/// select) plus table and message output.
///
/// Line input is abstracted behind `LineSource` so the same prompts run on
/// an interactive line editor, on piped stdin, or on a scripted source in
/// tests.
use crate::core::{EmptrackError, Result};
use crate::results_grid::{OutputFormat, ResultsGrid};
use reedline::{Prompt, PromptEditMode, PromptHistorySearch, Reedline, Signal};
use std::borrow::Cow;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::debug;

/// A source of answers to prompts.
pub trait LineSource {
    /// Shows `prompt` and reads one line, without its line terminator.
    ///
    /// # Errors
    ///
    /// `EmptrackError::InputClosed` at end of input and
    /// `EmptrackError::Cancelled` when the user interrupts.
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Reads answers line by line from any buffered reader, echoing prompts to
/// a writer. Used for piped stdin.
pub struct ReaderSource<R, W> {
    reader: R,
    echo: W,
}

impl<R: BufRead, W: Write> ReaderSource<R, W> {
    pub fn new(reader: R, echo: W) -> Self {
        ReaderSource { reader, echo }
    }
}

impl<R: BufRead, W: Write> LineSource for ReaderSource<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.echo, "{}", prompt)?;
        self.echo.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(EmptrackError::InputClosed);
        }
        Ok(line.trim_end_matches(|c| c == '\n' || c == '\r').to_string())
    }
}

/// Interactive line editor for a terminal stdin.
pub struct ReedlineSource {
    editor: Reedline,
}

impl ReedlineSource {
    pub fn new() -> Self {
        ReedlineSource {
            editor: Reedline::create(),
        }
    }
}

impl Default for ReedlineSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for ReedlineSource {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        match self.editor.read_line(&QuestionPrompt(prompt))? {
            Signal::Success(line) => Ok(line),
            Signal::CtrlD => Err(EmptrackError::InputClosed),
            _ => Err(EmptrackError::Cancelled),
        }
    }
}

/// Renders the question itself as the left prompt, with no indicator.
struct QuestionPrompt<'a>(&'a str);

impl Prompt for QuestionPrompt<'_> {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.0)
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        Cow::Borrowed("(search) ")
    }
}

/// One entry of a single-select prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice<T> {
    pub label: String,
    pub value: T,
}

impl<T> Choice<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Choice {
            label: label.into(),
            value,
        }
    }
}

/// Prompts, tables and messages for one terminal session.
pub struct Console {
    input: Box<dyn LineSource>,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    format: OutputFormat,
}

impl Console {
    pub fn new(
        input: Box<dyn LineSource>,
        out: Box<dyn Write>,
        err: Box<dyn Write>,
        format: OutputFormat,
    ) -> Self {
        Console {
            input,
            out,
            err,
            format,
        }
    }

    /// A console on the process's stdio. A terminal stdin gets the line
    /// editor; anything else is read line by line.
    pub fn stdio(format: OutputFormat) -> Self {
        let input: Box<dyn LineSource> = if io::stdin().is_terminal() {
            debug!("stdin is a terminal, using line editor");
            Box::new(ReedlineSource::new())
        } else {
            debug!("stdin is not a terminal, reading plain lines");
            Box::new(ReaderSource::new(io::stdin().lock(), io::stdout()))
        };
        Console::new(input, Box::new(io::stdout()), Box::new(io::stderr()), format)
    }

    /// Asks until the trimmed answer is non-empty.
    pub fn text(&mut self, message: &str) -> Result<String> {
        loop {
            let answer = self.input.read_line(&format!("{} ", message))?;
            let answer = answer.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
            self.say("Please enter a value.")?;
        }
    }

    /// Asks until the answer is a finite, non-negative number.
    pub fn number(&mut self, message: &str) -> Result<f64> {
        loop {
            let answer = self.input.read_line(&format!("{} ", message))?;
            match parse_amount(&answer) {
                Some(value) => return Ok(value),
                None => self.say("Please enter a non-negative number.")?,
            }
        }
    }

    /// Lists the choices numbered from 1 and asks until the answer is a
    /// valid number or matches a label (ignoring case).
    ///
    /// # Errors
    ///
    /// `EmptrackError::NoChoices` when the list is empty.
    pub fn select<T: Clone>(&mut self, message: &str, choices: &[Choice<T>]) -> Result<T> {
        if choices.is_empty() {
            return Err(EmptrackError::NoChoices);
        }

        writeln!(self.out, "{}", message)?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(self.out, "  {:>2}) {}", i + 1, choice.label)?;
        }
        self.out.flush()?;

        let question = format!("Choose 1-{}: ", choices.len());
        loop {
            let answer = self.input.read_line(&question)?;
            if let Some(index) = resolve_choice(answer.trim(), choices) {
                return Ok(choices[index].value.clone());
            }
            self.say(&format!(
                "Please choose a number between 1 and {}.",
                choices.len()
            ))?;
        }
    }

    /// Prints one line to the output stream.
    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{}", message)?;
        self.out.flush()?;
        Ok(())
    }

    /// Prints one line to the error stream.
    pub fn report_error(&mut self, message: &str) -> Result<()> {
        writeln!(self.err, "{}", message)?;
        self.err.flush()?;
        Ok(())
    }

    /// Prints a grid in the session's output format.
    pub fn show(&mut self, grid: &ResultsGrid) -> Result<()> {
        let rendered = grid.render_as(self.format)?;
        write!(self.out, "\n{}\n", rendered)?;
        self.out.flush()?;
        Ok(())
    }
}

fn parse_amount(answer: &str) -> Option<f64> {
    answer
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

fn resolve_choice<T>(answer: &str, choices: &[Choice<T>]) -> Option<usize> {
    if let Ok(number) = answer.parse::<usize>() {
        if (1..=choices.len()).contains(&number) {
            return Some(number - 1);
        }
    }
    choices
        .iter()
        .position(|choice| choice.label.eq_ignore_ascii_case(answer))
}
