//! Interactive read-eval console.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use rustyline::{error::ReadlineError, DefaultEditor};

use crate::diagnostics::Result;
use crate::runtime::Runtime;
use crate::units::UnitLedger;

/// Unit label given to everything parsed from console input.
pub const CONSOLE_UNIT_NAME: &str = "__console.ol";

/// Reserved line that ends the session.
const QUIT_COMMAND: &str = "quit";

/// Width of the separator line when the terminal width cannot be queried.
const FALLBACK_WIDTH: usize = 80;

/// One line-oriented input source for the console.
///
/// Abstracted so the session can run on a line editor, on piped standard
/// input, or on scripted lines in tests. `Ok(None)` signals the end of
/// input.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Line input through a rustyline editor; used when standard input is a
/// terminal.
pub struct ReadlineSource {
    editor: DefaultEditor,
}

impl ReadlineSource {
    pub fn new() -> io::Result<Self> {
        let editor = DefaultEditor::new()
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        Ok(Self { editor })
    }
}

impl LineSource for ReadlineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                self.editor.add_history_entry(line.as_str()).ok();
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(io::Error::new(io::ErrorKind::Other, err)),
        }
    }
}

/// Line input from any buffered reader; used when standard input is piped.
pub struct PipedSource<R> {
    input: R,
}

impl<R: BufRead> PipedSource<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> LineSource for PipedSource<R> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
        }
        if line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

/// State of one interactive console session.
#[derive(Debug, Default)]
pub struct ConsoleSession {
    pub quit_requested: bool,
    pub line_counter: u32,
    pub automated: bool,
    pub verbose: bool,
    pub debug_symbols: bool,
    pub suppress_welcome: bool,
}

impl ConsoleSession {
    /// Runs the read-eval loop until the operator quits or the input ends.
    ///
    /// Automated sessions perform no interactive work and return at once.
    /// Each accumulated unit is parsed under [`CONSOLE_UNIT_NAME`]; parse
    /// failures reprompt, execution failures are non-fatal, and every unit
    /// that parsed is released before the next prompt.
    pub fn run<R: Runtime>(
        &mut self,
        runtime: &mut R,
        ledger: &mut UnitLedger,
        lines: &mut dyn LineSource,
    ) -> Result<()> {
        if self.automated {
            return Ok(());
        }
        while !self.quit_requested {
            if !self.suppress_welcome {
                println!("You can disable this message with `--no-welcome`.");
                println!("Please enter your Oleander code.");
                println!("To run the code, press [ENTER] twice.");
                println!("To exit, write `{QUIT_COMMAND}` in a single line.");
            }

            let Some(text) = self.read_unit(lines)? else {
                break;
            };

            if self.verbose {
                println!("Parsing of input started.");
            }
            let start = Instant::now();
            let Some(unit) =
                ledger.acquire_text(runtime, &text, self.debug_symbols, CONSOLE_UNIT_NAME)
            else {
                continue;
            };
            if self.verbose {
                println!("Parsing of input ended after {}ms", start.elapsed().as_millis());
            }

            if cfg!(debug_assertions) {
                if let Some(rendered) = runtime.dump(unit.unit()) {
                    println!("{rendered}");
                }
            }

            if self.verbose {
                println!("Execution of input started.");
            }
            let start = Instant::now();
            let succeeded = runtime.execute(unit.unit());
            if self.verbose {
                if succeeded {
                    print!(
                        "Execution of input ended after {}ms. ",
                        start.elapsed().as_millis()
                    );
                } else {
                    print!(
                        "Execution of input failed after {}ms. ",
                        start.elapsed().as_millis()
                    );
                }
            }
            ledger.release(runtime, unit);
            if self.verbose {
                println!("With cleanup, after {}ms", start.elapsed().as_millis());
            }

            println!("{}", "-".repeat(console_width()));
        }
        Ok(())
    }

    /// Accumulates operator lines into one unit of source text.
    ///
    /// Returns `None` when the operator asked to quit or the input ended;
    /// otherwise the accumulated lines, each terminated by `\n`, with the
    /// terminating empty line excluded.
    fn read_unit(&mut self, lines: &mut dyn LineSource) -> io::Result<Option<String>> {
        let mut buffer = String::new();
        self.line_counter = 0;
        loop {
            let prompt = format!("{:05}| ", self.line_counter);
            self.line_counter += 1;
            match lines.read_line(&prompt)? {
                None => {
                    self.quit_requested = true;
                    return Ok(None);
                }
                Some(line) if line == QUIT_COMMAND => {
                    self.quit_requested = true;
                    return Ok(None);
                }
                Some(line) if line.is_empty() => return Ok(Some(buffer)),
                Some(line) => {
                    buffer.push_str(&line);
                    buffer.push('\n');
                }
            }
        }
    }
}

/// Current terminal width in columns, or [`FALLBACK_WIDTH`] when the query
/// fails.
fn console_width() -> usize {
    match crossterm::terminal::size() {
        Ok((columns, _)) => columns as usize,
        Err(_) => FALLBACK_WIDTH,
    }
}
