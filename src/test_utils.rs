/// # Test Utilities Module
///
/// Shared fixtures for emptrack unit and integration tests:
/// - an in-memory database pre-populated with a small organization
/// - a scripted line source and captured output streams, so a `Console`
///   (and the whole dispatcher) can run without a terminal

use crate::core::db::{Gateway, Queries};
use crate::core::model::{NewEmployee, NewRole};
use crate::core::{EmptrackError, Result};
use crate::prompt::{Console, LineSource};
use crate::results_grid::OutputFormat;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::rc::Rc;

/// Ids of the records created by `DatabaseFixture::with_sample_data`.
#[derive(Debug, Clone, Copy)]
pub struct SampleIds {
    pub engineering: i64,
    pub legal: i64,
    pub empty: i64,
    pub junior: i64,
    pub senior: i64,
    pub lawyer: i64,
    pub ann: i64,
    pub bob: i64,
    pub cat: i64,
}

/// Isolated in-memory database fixture
pub struct DatabaseFixture {
    pub gateway: Gateway,
}

impl DatabaseFixture {
    /// An empty database with the schema applied
    pub fn new() -> Result<Self> {
        Ok(DatabaseFixture {
            gateway: Gateway::open_in_memory()?,
        })
    }

    /// Engineering (Junior 50000, Senior 70000; Ann is Senior and manages
    /// Bob, a Junior), Legal (Lawyer 190000; Cat) and Empty (no roles).
    pub fn with_sample_data() -> Result<(Self, SampleIds)> {
        let fixture = Self::new()?;
        let ids = {
            let q = fixture.queries()?;
            let engineering = q.insert_department("Engineering")?.id;
            let legal = q.insert_department("Legal")?.id;
            let empty = q.insert_department("Empty")?.id;

            let role = |title: &str, salary: f64, department_id: i64| {
                q.insert_role(&NewRole {
                    title: title.to_string(),
                    salary,
                    department_id,
                })
                .map(|r| r.id)
            };
            let junior = role("Junior", 50000.0, engineering)?;
            let senior = role("Senior", 70000.0, engineering)?;
            let lawyer = role("Lawyer", 190000.0, legal)?;

            let hire = |first: &str, last: &str, role_id: i64, manager_id: Option<i64>| {
                q.insert_employee(&NewEmployee {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    role_id: Some(role_id),
                    manager_id,
                })
                .map(|e| e.id)
            };
            let ann = hire("Ann", "Archer", senior, None)?;
            let bob = hire("Bob", "Baker", junior, Some(ann))?;
            let cat = hire("Cat", "Cole", lawyer, None)?;

            SampleIds {
                engineering,
                legal,
                empty,
                junior,
                senior,
                lawyer,
                ann,
                bob,
                cat,
            }
        };
        Ok((fixture, ids))
    }

    pub fn queries(&self) -> Result<Queries<'_>> {
        Ok(Queries::new(self.gateway.connection()?))
    }
}

/// A cloneable in-memory writer whose contents stay readable after a
/// `Console` takes ownership of a clone.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).to_string()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Answers prompts from a fixed script and records every prompt shown.
/// A scripted `Err` is returned as-is, e.g. `Cancelled` for a Ctrl-C.
/// Running out of lines behaves like a closed stdin.
pub struct ScriptedLines {
    lines: Rc<RefCell<VecDeque<Result<String>>>>,
    prompts: Rc<RefCell<Vec<String>>>,
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.lines
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(EmptrackError::InputClosed))
    }
}

/// The observable side of a scripted console.
pub struct ConsoleCapture {
    lines: Rc<RefCell<VecDeque<Result<String>>>>,
    prompts: Rc<RefCell<Vec<String>>>,
    out: SharedBuffer,
    err: SharedBuffer,
}

impl ConsoleCapture {
    pub fn new(lines: &[&str]) -> Self {
        Self::with_script(lines.iter().map(|l| Ok(l.to_string())).collect())
    }

    /// A capture whose script may also fail individual reads.
    pub fn with_script(script: Vec<Result<String>>) -> Self {
        ConsoleCapture {
            lines: Rc::new(RefCell::new(script.into())),
            prompts: Rc::new(RefCell::new(Vec::new())),
            out: SharedBuffer::default(),
            err: SharedBuffer::default(),
        }
    }

    /// A console reading from this script and writing into this capture.
    pub fn console(&self, format: OutputFormat) -> Console {
        let input = ScriptedLines {
            lines: Rc::clone(&self.lines),
            prompts: Rc::clone(&self.prompts),
        };
        Console::new(
            Box::new(input),
            Box::new(self.out.clone()),
            Box::new(self.err.clone()),
            format,
        )
    }

    pub fn stdout(&self) -> String {
        self.out.contents()
    }

    pub fn stderr(&self) -> String {
        self.err.contents()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    /// Script lines not consumed yet.
    pub fn remaining(&self) -> usize {
        self.lines.borrow().len()
    }
}

/// A table-format console over `lines`, plus its capture.
pub fn scripted_console(lines: &[&str]) -> (Console, ConsoleCapture) {
    let capture = ConsoleCapture::new(lines);
    let console = capture.console(OutputFormat::Table);
    (console, capture)
}

/// Like `scripted_console`, with reads that can fail.
pub fn scripted_console_with(script: Vec<Result<String>>) -> (Console, ConsoleCapture) {
    let capture = ConsoleCapture::with_script(script);
    let console = capture.console(OutputFormat::Table);
    (console, capture)
}

/// A successful scripted answer.
pub fn answer(line: &str) -> Result<String> {
    Ok(line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_fixture_shape() {
        let (fixture, ids) = DatabaseFixture::with_sample_data().unwrap();
        let q = fixture.queries().unwrap();

        assert_eq!(q.all_departments().unwrap().len(), 3);
        assert_eq!(q.all_roles().unwrap().len(), 3);
        assert_eq!(q.all_employees().unwrap().len(), 3);

        let bob = q.employee(ids.bob).unwrap().unwrap();
        assert_eq!(bob.manager_id, Some(ids.ann));
    }

    #[test]
    fn test_scripted_lines_run_out_like_closed_stdin() {
        let capture = ConsoleCapture::new(&["only"]);
        let mut console = capture.console(OutputFormat::Table);

        assert_eq!(console.text("One?").unwrap(), "only");
        assert!(matches!(console.text("Two?"), Err(EmptrackError::InputClosed)));
        assert_eq!(capture.prompts(), vec!["One? ", "Two? "]);
    }

    #[test]
    fn test_scripted_error_is_returned_once() {
        let (mut console, capture) =
            scripted_console_with(vec![Err(EmptrackError::Cancelled), answer("after")]);

        assert!(matches!(console.text("First?"), Err(EmptrackError::Cancelled)));
        assert_eq!(console.text("Second?").unwrap(), "after");
        assert_eq!(capture.remaining(), 0);
    }
}
