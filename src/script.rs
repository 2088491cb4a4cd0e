//! Command scripts: one edit or query per line, applied to a single sheet.
//!
//! ```text
//! # comment
//! A1: 5
//! B1: =A1+1
//! value B1
//! print texts
//! ```

use gridcalc_core::{Position, Sheet};
use regex::Regex;
use std::io::Write;
use std::sync::OnceLock;

use crate::config::{Config, OutputMode};
use crate::error::{GridcalcError, Result};

/// A parsed script line.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Set { pos: Position, text: String },
    Clear(Position),
    Value(Position),
    Text(Position),
    Refs(Position),
    Size,
    /// `None` uses the configured output mode.
    Print(Option<OutputMode>),
}

fn set_re() -> &'static Regex {
    static SET_RE: OnceLock<Regex> = OnceLock::new();
    SET_RE.get_or_init(|| {
        Regex::new(r"^(?<cell>[A-Z]+[0-9]+)\s*:(?<text>.*)$").expect("set command regex must compile")
    })
}

fn cell_command_re() -> &'static Regex {
    static CELL_COMMAND_RE: OnceLock<Regex> = OnceLock::new();
    CELL_COMMAND_RE.get_or_init(|| {
        Regex::new(r"^(?<cmd>clear|value|text|refs)\s+(?<cell>\S+)$")
            .expect("cell command regex must compile")
    })
}

fn print_re() -> &'static Regex {
    static PRINT_RE: OnceLock<Regex> = OnceLock::new();
    PRINT_RE.get_or_init(|| {
        Regex::new(r"^print(?:\s+(?<mode>values|texts))?$").expect("print command regex must compile")
    })
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str, line_num: usize) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    if let Some(caps) = set_re().captures(line) {
        return Ok(Some(Command::Set {
            pos: Position::from_str(&caps["cell"]),
            text: caps["text"].trim().to_string(),
        }));
    }

    if let Some(caps) = cell_command_re().captures(line) {
        let pos = Position::from_str(&caps["cell"]);
        let command = match &caps["cmd"] {
            "clear" => Command::Clear(pos),
            "value" => Command::Value(pos),
            "text" => Command::Text(pos),
            _ => Command::Refs(pos),
        };
        return Ok(Some(command));
    }

    if line == "size" {
        return Ok(Some(Command::Size));
    }

    if let Some(caps) = print_re().captures(line) {
        let mode = caps.name("mode").map(|m| match m.as_str() {
            "texts" => OutputMode::Texts,
            _ => OutputMode::Values,
        });
        return Ok(Some(Command::Print(mode)));
    }

    Err(GridcalcError::Parse {
        line: line_num,
        message: format!("Unknown command: {}", line),
    })
}

/// Applies commands to a sheet, writing results to `out` and failures to `err`.
pub struct Runner<W: Write, E: Write> {
    sheet: Sheet,
    config: Config,
    out: W,
    err: E,
}

impl<W: Write, E: Write> Runner<W, E> {
    pub fn new(config: Config, out: W, err: E) -> Self {
        Runner {
            sheet: Sheet::new(),
            config,
            out,
            err,
        }
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Run every line of `content`. Returns the number of failed commands.
    ///
    /// Failures are reported and skipped unless `stop_on_error` is set, in
    /// which case the first one is returned. I/O errors always abort.
    pub fn run_script(&mut self, content: &str) -> Result<usize> {
        let mut failures = 0;
        for (idx, line) in content.lines().enumerate() {
            match self.run_line(line, idx + 1) {
                Ok(()) => {}
                Err(GridcalcError::Io(e)) => return Err(GridcalcError::Io(e)),
                Err(e) if self.config.stop_on_error => return Err(e),
                Err(e) => {
                    log::debug!("Skipping failed command: {:?}", line);
                    writeln!(self.err, "{}", e)?;
                    failures += 1;
                }
            }
        }
        self.out.flush()?;
        Ok(failures)
    }

    pub fn run_line(&mut self, line: &str, line_num: usize) -> Result<()> {
        match parse_command(line, line_num)? {
            Some(command) => self.execute(command, line_num),
            None => Ok(()),
        }
    }

    fn execute(&mut self, command: Command, line_num: usize) -> Result<()> {
        let sheet_err = |source| GridcalcError::Sheet {
            line: line_num,
            source,
        };

        match command {
            Command::Set { pos, text } => self.sheet.set_cell(pos, text).map_err(sheet_err)?,
            Command::Clear(pos) => self.sheet.clear_cell(pos).map_err(sheet_err)?,
            Command::Value(pos) => {
                let cell = self.sheet.get_cell(pos).map_err(sheet_err)?;
                let value = cell.map(|c| c.value().to_string()).unwrap_or_default();
                writeln!(self.out, "{}", value)?;
            }
            Command::Text(pos) => {
                let cell = self.sheet.get_cell(pos).map_err(sheet_err)?;
                let text = cell.map(|c| c.text()).unwrap_or_default();
                writeln!(self.out, "{}", text)?;
            }
            Command::Refs(pos) => {
                let cell = self.sheet.get_cell(pos).map_err(sheet_err)?;
                let refs = cell
                    .map(|c| c.referenced_cells())
                    .unwrap_or_default()
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                writeln!(self.out, "{}", refs)?;
            }
            Command::Size => writeln!(self.out, "{}", self.sheet.printable_size())?,
            Command::Print(mode) => match mode.unwrap_or(self.config.output_mode) {
                OutputMode::Values => self
                    .sheet
                    .print_values_with_delimiter(&mut self.out, &self.config.delimiter)?,
                OutputMode::Texts => self
                    .sheet
                    .print_texts_with_delimiter(&mut self.out, &self.config.delimiter)?,
            },
        }
        Ok(())
    }
}
