//! Interactive command loop.
//!
//! [`Repl`] reads commands from any [`BufRead`] and answers on any [`Write`],
//! so the binary drives it with the terminal and tests with in-memory
//! buffers. Commands are case-insensitive:
//!
//! ```text
//! LOAD <file>              replace the buffer with a file
//! LIST                     show the buffer, one page at a time
//! INS <line> <instruction> insert or replace a line
//! DEL <line>               delete one line
//! DEL <start> <end>        delete every line in the range
//! SAVE                     write the buffer back to its file
//! RUN                      execute the program
//! DEBUG                    step through the program (NEXT, STACK, STOP)
//! EXIT                     leave, offering to save pending edits
//! ```

use crate::config::Config;
use crate::interpreter::debugger::DebugSession;
use crate::interpreter::errors::RuntimeFault;
use crate::interpreter::loader;
use crate::interpreter::program::Program;
use crate::interpreter::state::ExecutionState;
use crate::interpreter::vm::{self, StepOutcome};
use crate::source::SourceBuffer;
use crate::{debug, info};
use std::io::{self, BufRead, Write};
use std::path::Path;

const BANNER: &str = "MEPA interpreter";
const HELP: &str = "Commands: LOAD <file> | LIST | INS | DEL | SAVE | RUN | DEBUG | EXIT\n\
                    Numeric jump targets (DSVS 3) are instruction indices counted from 0, \
                    not line numbers; use labels to jump to a line.";

/// Whether the command loop keeps going after a command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Top-level commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Load,
    List,
    Ins,
    Del,
    Save,
    Run,
    Debug,
    Exit,
}

impl Command {
    pub fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_uppercase().as_str() {
            "LOAD" => Some(Command::Load),
            "LIST" => Some(Command::List),
            "INS" => Some(Command::Ins),
            "DEL" => Some(Command::Del),
            "SAVE" => Some(Command::Save),
            "RUN" => Some(Command::Run),
            "DEBUG" => Some(Command::Debug),
            "EXIT" => Some(Command::Exit),
            _ => None,
        }
    }
}

/// Reads one line without its terminator, `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

/// Renders a runtime fault with the source line it happened on, when known.
fn describe_fault(program: &Program, fault: &RuntimeFault) -> String {
    match program.line_of(fault.pc) {
        Some(line) => format!("Error at line {line}: {}", fault.kind),
        None => format!("Error: {fault}"),
    }
}

pub struct Repl<R, W> {
    input: R,
    output: W,
    config: Config,
    buffer: SourceBuffer,
    /// Last resolved program and the buffer revision it was built from.
    cache: Option<(u64, Program)>,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(input: R, output: W, config: Config) -> Self {
        Self {
            input,
            output,
            config,
            buffer: SourceBuffer::new(),
            cache: None,
        }
    }

    pub fn buffer(&self) -> &SourceBuffer {
        &self.buffer
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the command loop until `EXIT` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "{BANNER}")?;
        writeln!(self.output, "{HELP}")?;

        if let Some(path) = self.config.file.clone() {
            self.load(&path)?;
        }

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(line) = read_line(&mut self.input)? else {
                writeln!(self.output)?;
                writeln!(self.output, "Bye.")?;
                return Ok(());
            };
            if self.execute(&line)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Executes one command line.
    pub fn execute(&mut self, line: &str) -> io::Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let Some(command) = Command::parse(word) else {
            writeln!(self.output, "Error: unknown command '{word}'")?;
            return Ok(Flow::Continue);
        };

        match command {
            Command::Load => self.cmd_load(rest)?,
            Command::List => self.cmd_list()?,
            Command::Ins => self.cmd_ins(rest)?,
            Command::Del => self.cmd_del(rest)?,
            Command::Save => self.cmd_save()?,
            Command::Run => self.cmd_run()?,
            Command::Debug => self.cmd_debug()?,
            Command::Exit => return self.cmd_exit(),
        }
        Ok(Flow::Continue)
    }

    /// Asks a question and returns the trimmed answer.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        Ok(read_line(&mut self.input)?.map(|answer| answer.trim().to_string()))
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self
            .ask(question)?
            .is_some_and(|answer| answer.eq_ignore_ascii_case("y")))
    }

    /// Saves to the current file, reporting the result. Returns whether it worked.
    fn save_current(&mut self, path: Option<&Path>) -> io::Result<bool> {
        match self.buffer.save_file(path) {
            Ok(()) => {
                let name = self
                    .buffer
                    .filename()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                info!("saved {} line(s) to {name}", self.buffer.len());
                writeln!(self.output, "File '{name}' saved.")?;
                Ok(true)
            }
            Err(err) => {
                writeln!(self.output, "Error: {err}")?;
                Ok(false)
            }
        }
    }

    fn load(&mut self, path: &Path) -> io::Result<()> {
        match self.buffer.load_file(path) {
            Ok(()) => {
                info!("loaded {} line(s) from {}", self.buffer.len(), path.display());
                writeln!(self.output, "File '{}' loaded.", path.display())?;
            }
            Err(err) => writeln!(self.output, "Error: {err}")?,
        }
        Ok(())
    }

    fn cmd_load(&mut self, arg: &str) -> io::Result<()> {
        if arg.is_empty() {
            writeln!(self.output, "Usage: LOAD <file>")?;
            return Ok(());
        }

        if self.buffer.is_modified()
            && let Some(current) = self.buffer.filename()
        {
            let question = format!(
                "File '{}' has unsaved changes.\nSave (Y/N)? ",
                current.display()
            );
            if self.confirm(&question)? && !self.save_current(None)? {
                return Ok(());
            }
        }

        self.load(Path::new(arg))
    }

    fn cmd_list(&mut self) -> io::Result<()> {
        let listing = self.buffer.listing();
        if listing.is_empty() {
            writeln!(self.output, "No program loaded.")?;
            return Ok(());
        }

        let mut pages = listing.chunks(self.config.page_size.max(1)).peekable();
        while let Some(page) = pages.next() {
            for entry in page {
                writeln!(self.output, "{entry}")?;
            }
            if pages.peek().is_some() && self.ask("Press Enter to continue...")?.is_none() {
                writeln!(self.output)?;
                break;
            }
        }
        Ok(())
    }

    fn cmd_ins(&mut self, arg: &str) -> io::Result<()> {
        if arg.is_empty() {
            writeln!(self.output, "Usage: INS <line> <instruction>")?;
            return Ok(());
        }
        let (number, text) = match arg.split_once(char::is_whitespace) {
            Some((number, text)) => (number, text.trim()),
            None => (arg, ""),
        };
        let Ok(number) = number.parse::<u32>() else {
            writeln!(self.output, "Error: invalid line number '{number}'")?;
            return Ok(());
        };

        match self.buffer.insert(number, text) {
            None => {
                writeln!(self.output, "Line inserted:")?;
                writeln!(self.output, "{number} {text}")?;
            }
            Some(old) => {
                writeln!(self.output, "Line replaced:")?;
                writeln!(self.output, "From")?;
                writeln!(self.output, "{number} {old}")?;
                writeln!(self.output, "To")?;
                writeln!(self.output, "{number} {text}")?;
            }
        }
        Ok(())
    }

    fn cmd_del(&mut self, arg: &str) -> io::Result<()> {
        let numbers: Result<Vec<u32>, _> = arg.split_whitespace().map(str::parse).collect();
        let Ok(numbers) = numbers else {
            writeln!(self.output, "Error: invalid line number in '{arg}'")?;
            return Ok(());
        };

        match numbers[..] {
            [number] => match self.buffer.delete(number) {
                Ok(text) => {
                    writeln!(self.output, "Line removed:")?;
                    writeln!(self.output, "{number} {text}")?;
                }
                Err(err) => writeln!(self.output, "Error: {err}")?,
            },
            [start, end] => match self.buffer.delete_range(start, end) {
                Ok(removed) if removed.is_empty() => {
                    writeln!(self.output, "No lines in range.")?;
                }
                Ok(removed) => {
                    writeln!(self.output, "Lines removed:")?;
                    for (number, text) in removed {
                        writeln!(self.output, "{number} {text}")?;
                    }
                }
                Err(err) => writeln!(self.output, "Error: {err}")?,
            },
            _ => writeln!(self.output, "Usage: DEL <line> | DEL <start> <end>")?,
        }
        Ok(())
    }

    fn cmd_save(&mut self) -> io::Result<()> {
        if self.buffer.filename().is_some() {
            self.save_current(None)?;
            return Ok(());
        }
        match self.ask("File name: ")? {
            Some(name) if !name.is_empty() => {
                self.save_current(Some(Path::new(&name)))?;
            }
            _ => writeln!(self.output, "Save cancelled.")?,
        }
        Ok(())
    }

    fn cmd_exit(&mut self) -> io::Result<Flow> {
        if self.buffer.is_modified() {
            match self.buffer.filename().map(|p| p.display().to_string()) {
                Some(current) => {
                    let question = format!("File '{current}' has unsaved changes.\nSave (Y/N)? ");
                    if self.confirm(&question)? && !self.save_current(None)? {
                        return Ok(Flow::Continue);
                    }
                }
                None => {
                    if self.confirm("There are unsaved changes. Save (Y/N)? ")? {
                        let name = self.ask("File name: ")?.unwrap_or_default();
                        if !name.is_empty() && !self.save_current(Some(Path::new(&name)))? {
                            return Ok(Flow::Continue);
                        }
                    }
                }
            }
        }
        writeln!(self.output, "Bye.")?;
        Ok(Flow::Exit)
    }

    /// Makes sure `cache` holds the program for the current buffer revision.
    ///
    /// Load faults are reported and leave the cache empty.
    fn resolve(&mut self) -> io::Result<bool> {
        if self.buffer.is_empty() {
            writeln!(self.output, "No program loaded.")?;
            return Ok(false);
        }

        let revision = self.buffer.revision();
        if matches!(&self.cache, Some((cached, _)) if *cached == revision) {
            return Ok(true);
        }

        match loader::load(self.buffer.lines()) {
            Ok(program) => {
                debug!(
                    "resolved revision {revision}: {} instruction(s)",
                    program.len()
                );
                self.cache = Some((revision, program));
                Ok(true)
            }
            Err(err) => {
                self.cache = None;
                writeln!(self.output, "Error: {err}")?;
                Ok(false)
            }
        }
    }

    fn cmd_run(&mut self) -> io::Result<()> {
        if !self.resolve()? {
            return Ok(());
        }
        let Some((_, program)) = &self.cache else {
            return Ok(());
        };

        let output = &mut self.output;
        let mut write_error = None;
        let mut observer = |value: i64| {
            if write_error.is_none()
                && let Err(err) = writeln!(output, "{value}")
            {
                write_error = Some(err);
            }
        };
        let mut state = ExecutionState::new();
        let result = vm::run(program, &mut state, &mut observer, self.config.step_limit);
        if let Some(err) = write_error {
            return Err(err);
        }

        match result {
            Ok(steps) => {
                debug!("run finished after {steps} step(s)");
                writeln!(self.output, "Execution finished.")?;
            }
            Err(fault) => writeln!(self.output, "{}", describe_fault(program, &fault))?,
        }
        Ok(())
    }

    fn cmd_debug(&mut self) -> io::Result<()> {
        if !self.resolve()? {
            return Ok(());
        }
        let Some((_, program)) = &self.cache else {
            return Ok(());
        };

        let mut session = DebugSession::new(program);
        writeln!(self.output, "Debug mode. Commands: NEXT | STACK | STOP")?;

        loop {
            write!(self.output, "debug> ")?;
            self.output.flush()?;
            let Some(line) = read_line(&mut self.input)? else {
                writeln!(self.output)?;
                return Ok(());
            };
            let word = line.trim().to_ascii_uppercase();

            match word.as_str() {
                "" => {}
                "NEXT" => {
                    match session.current() {
                        Some((line, instr)) => writeln!(self.output, "{line} {instr}")?,
                        None => writeln!(self.output, "<end of program>")?,
                    }
                    match session.step() {
                        StepOutcome::Continued => {}
                        StepOutcome::Produced(value) => writeln!(self.output, "{value}")?,
                        StepOutcome::Halted => {
                            writeln!(self.output, "Program finished.")?;
                            return Ok(());
                        }
                        StepOutcome::Faulted(fault) => {
                            writeln!(self.output, "{}", describe_fault(program, &fault))?;
                            return Ok(());
                        }
                    }
                }
                "STACK" => {
                    writeln!(self.output, "Next instruction: {}", session.state().pc())?;
                    let stack = session.stack();
                    if stack.is_empty() {
                        writeln!(self.output, "Stack: (empty)")?;
                    } else {
                        writeln!(self.output, "Stack (bottom to top):")?;
                        for (i, value) in stack.iter().enumerate() {
                            writeln!(self.output, "{i}: {value}")?;
                        }
                    }
                }
                "STOP" => {
                    writeln!(self.output, "Debug mode finished.")?;
                    return Ok(());
                }
                other => {
                    let first = other.split_whitespace().next().unwrap_or(other);
                    if Command::parse(first).is_some() {
                        writeln!(self.output, "Command '{first}' ends debug mode.")?;
                        return Ok(());
                    }
                    writeln!(self.output, "Invalid command in debug mode. Use NEXT, STACK or STOP.")?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::source_file;
    use std::fs;
    use std::io::Cursor;

    fn repl(input: &str) -> Repl<Cursor<Vec<u8>>, Vec<u8>> {
        Repl::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            Config::default(),
        )
    }

    fn transcript(repl: Repl<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(repl.into_output()).unwrap()
    }

    /// Runs a whole session and returns everything written.
    fn session(input: &str) -> String {
        let mut r = repl(input);
        r.run().unwrap();
        transcript(r)
    }

    fn ins(lines: &[&str]) -> String {
        lines.iter().map(|l| format!("INS {l}\n")).collect()
    }

    #[test]
    fn command_parse_is_case_insensitive() {
        assert_eq!(Command::parse("run"), Some(Command::Run));
        assert_eq!(Command::parse("Debug"), Some(Command::Debug));
        assert_eq!(Command::parse("RUNX"), None);
    }

    #[test]
    fn run_prints_values_then_completion() {
        let input = ins(&[
            "10 INPP",
            "20 AMEM 1",
            "30 CRCT 5",
            "40 ARMZ 0",
            "50 CRVL 0",
            "60 IMPR",
            "70 PARA",
        ]) + "RUN\nEXIT\nN\n";
        let out = session(&input);
        assert!(out.contains("> 5\nExecution finished.\n"), "{out}");
        assert!(out.ends_with("Bye.\n"));
    }

    #[test]
    fn run_reports_fault_with_source_line() {
        let out = session(&(ins(&["10 INPP", "20 IMPR", "30 PARA"]) + "RUN\n"));
        assert!(
            out.contains("Error at line 20: stack underflow"),
            "{out}"
        );
    }

    #[test]
    fn run_reports_load_errors() {
        let out = session(&(ins(&["10 CRCT", "20 PARA"]) + "RUN\n"));
        assert!(out.contains("Error: syntax error:"), "{out}");
        assert!(!out.contains("Execution finished."));
    }

    #[test]
    fn run_without_program() {
        assert!(session("RUN\n").contains("No program loaded."));
    }

    #[test]
    fn edits_invalidate_cached_program() {
        let mut r = repl("");
        r.execute("INS 10 CRCT 1").unwrap();
        r.execute("INS 20 IMPR").unwrap();
        r.execute("INS 30 PARA").unwrap();
        r.execute("RUN").unwrap();
        r.execute("INS 10 CRCT 2").unwrap();
        r.execute("RUN").unwrap();
        let out = transcript(r);
        assert!(out.contains("1\nExecution finished.\n"), "{out}");
        assert!(out.contains("2\nExecution finished.\n"), "{out}");
    }

    #[test]
    fn step_limit_stops_runaway_program() {
        let mut r = Repl::new(
            Cursor::new(Vec::new()),
            Vec::new(),
            Config {
                step_limit: Some(10),
                ..Config::default()
            },
        );
        r.execute("INS 10 L: DSVS L").unwrap();
        r.execute("RUN").unwrap();
        let out = transcript(r);
        assert!(out.contains("step limit of 10 exceeded"), "{out}");
    }

    #[test]
    fn ins_reports_replacement() {
        let out = session("INS 10 INPP\nINS 10 NADA\n");
        assert!(out.contains("Line inserted:\n10 INPP\n"));
        assert!(out.contains("Line replaced:\nFrom\n10 INPP\nTo\n10 NADA\n"));
    }

    #[test]
    fn ins_rejects_bad_line_number() {
        let mut r = repl("");
        r.execute("INS ten INPP").unwrap();
        assert!(r.buffer().is_empty());
        assert!(transcript(r).contains("invalid line number 'ten'"));
    }

    #[test]
    fn del_single_and_range() {
        let mut r = repl("");
        for line in ["INS 10 INPP", "INS 20 NADA", "INS 30 NADA", "INS 40 PARA"] {
            r.execute(line).unwrap();
        }
        r.execute("DEL 10").unwrap();
        r.execute("DEL 20 30").unwrap();
        r.execute("DEL 50 60").unwrap();
        r.execute("DEL 99").unwrap();
        r.execute("DEL 30 20").unwrap();
        assert_eq!(r.buffer().listing(), vec!["40 PARA"]);
        let out = transcript(r);
        assert!(out.contains("Line removed:\n10 INPP\n"));
        assert!(out.contains("Lines removed:\n20 NADA\n30 NADA\n"));
        assert!(out.contains("No lines in range."));
        assert!(out.contains("Error: line 99 does not exist"));
        assert!(out.contains("Error: invalid range: 30 is after 20"));
    }

    #[test]
    fn list_pages_wait_for_enter() {
        let mut r = Repl::new(
            Cursor::new(b"\n".to_vec()),
            Vec::new(),
            Config {
                page_size: 2,
                ..Config::default()
            },
        );
        for line in ["INS 10 INPP", "INS 20 NADA", "INS 30 PARA"] {
            r.execute(line).unwrap();
        }
        r.execute("LIST").unwrap();
        let out = transcript(r);
        assert!(
            out.contains("10 INPP\n20 NADA\nPress Enter to continue...30 PARA\n"),
            "{out}"
        );
    }

    #[test]
    fn load_list_and_save() {
        let file = source_file("20 PARA\n10 INPP\n");
        let path = file.path().display().to_string();
        let input = format!("LOAD {path}\nLIST\nINS 15 NADA\nSAVE\nEXIT\n");
        let out = session(&input);
        assert!(out.contains(&format!("File '{path}' loaded.")));
        assert!(out.contains("10 INPP\n20 PARA\n"));
        assert!(out.contains(&format!("File '{path}' saved.")));
        assert_eq!(
            fs::read_to_string(file.path()).unwrap(),
            "10 INPP\n15 NADA\n20 PARA\n"
        );
    }

    #[test]
    fn load_asks_before_discarding_edits() {
        let first = source_file("10 INPP\n");
        let second = source_file("10 PARA\n");
        let input = format!(
            "LOAD {}\nINS 20 PARA\nLOAD {}\nY\n",
            first.path().display(),
            second.path().display()
        );
        let out = session(&input);
        assert!(out.contains("has unsaved changes.\nSave (Y/N)? "));
        assert_eq!(
            fs::read_to_string(first.path()).unwrap(),
            "10 INPP\n20 PARA\n"
        );
    }

    #[test]
    fn save_asks_for_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.mepa");
        let input = format!("INS 10 PARA\nSAVE\n{}\n", path.display());
        let out = session(&input);
        assert!(out.contains("File name: "));
        assert_eq!(fs::read_to_string(&path).unwrap(), "10 PARA\n");

        let out = session("INS 10 PARA\nSAVE\n\n");
        assert!(out.contains("Save cancelled."));
    }

    #[test]
    fn exit_offers_to_save_unnamed_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exit.mepa");
        let input = format!("INS 10 PARA\nEXIT\ny\n{}\n", path.display());
        let out = session(&input);
        assert!(out.contains("There are unsaved changes. Save (Y/N)? "));
        assert!(out.ends_with("Bye.\n"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "10 PARA\n");
    }

    #[test]
    fn startup_file_is_loaded() {
        let file = source_file("10 CRCT 3\n20 IMPR\n30 PARA\n");
        let mut r = Repl::new(
            Cursor::new(b"RUN\n".to_vec()),
            Vec::new(),
            Config {
                file: Some(file.path().to_path_buf()),
                ..Config::default()
            },
        );
        r.run().unwrap();
        let out = transcript(r);
        assert!(out.contains("loaded."));
        assert!(out.contains("3\nExecution finished.\n"), "{out}");
    }

    #[test]
    fn demo_programs_run() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
        for (name, expected) in [("factorial.mepa", "120\n"), ("countdown.mepa", "3\n2\n1\n")] {
            let mut r = repl("");
            r.execute(&format!("LOAD {}", demos.join(name).display()))
                .unwrap();
            r.execute("RUN").unwrap();
            let out = transcript(r);
            assert!(
                out.contains(&format!("{expected}Execution finished.\n")),
                "{name}: {out}"
            );
        }
    }

    #[test]
    fn banner_explains_numeric_jump_targets() {
        let out = session("");
        assert!(out.contains("instruction indices counted from 0"), "{out}");
        assert!(out.contains("not line numbers"));
    }

    #[test]
    fn unknown_command() {
        assert!(session("FROB\n").contains("Error: unknown command 'FROB'"));
    }

    #[test]
    fn debug_steps_and_shows_stack() {
        let input = ins(&["10 INPP", "20 CRCT 4", "30 CRCT 6", "40 SOMA", "50 IMPR", "60 PARA"])
            + "DEBUG\nNEXT\nNEXT\nNEXT\nSTACK\nNEXT\nNEXT\nSTACK\nNEXT\n";
        let out = session(&input);
        assert!(out.contains("debug> 10 INPP\n"));
        assert!(out.contains("debug> 30 CRCT 6\n"));
        assert!(
            out.contains("Next instruction: 3\nStack (bottom to top):\n0: 4\n1: 6\n"),
            "{out}"
        );
        assert!(out.contains("debug> 50 IMPR\n10\n"), "{out}");
        assert!(out.contains("Next instruction: 5\nStack: (empty)"));
        assert!(out.contains("debug> 60 PARA\nProgram finished.\n"), "{out}");
    }

    #[test]
    fn debug_reports_fault_and_leaves() {
        let input = ins(&["10 CRCT 1", "20 CRCT 0", "30 DIVI", "40 PARA"])
            + "DEBUG\nNEXT\nNEXT\nNEXT\nNEXT\n";
        let out = session(&input);
        assert!(out.contains("Error at line 30: division by zero"), "{out}");
        // The fourth NEXT reaches the top-level loop.
        assert!(out.contains("Error: unknown command 'NEXT'"));
    }

    #[test]
    fn debug_stop_and_top_level_commands() {
        let program = ins(&["10 INPP", "20 PARA"]);
        let out = session(&(program.clone() + "DEBUG\nSTOP\n"));
        assert!(out.contains("Debug mode finished."));

        let out = session(&(program.clone() + "DEBUG\nrun\n"));
        assert!(out.contains("Command 'RUN' ends debug mode."));

        let out = session(&(program + "DEBUG\nPEEK\nSTOP\n"));
        assert!(out.contains("Invalid command in debug mode."));
    }

    #[test]
    fn debug_runs_off_the_end() {
        let out = session(&(ins(&["10 INPP"]) + "DEBUG\nNEXT\nNEXT\n"));
        assert!(out.contains("debug> <end of program>\nError: "), "{out}");
    }
}
