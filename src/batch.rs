//! Two-phase batch execution of pre-supplied source files.

use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use crate::runtime::Runtime;
use crate::units::UnitLedger;

/// Flags threaded into a batch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub debug_symbols: bool,
    pub automated: bool,
    pub verbose: bool,
}

/// How a batch run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every unit parsed and executed.
    Completed,
    /// At least one input failed to parse; nothing was executed.
    ParseFailed,
    /// Execution failed part-way and the batch stopped early.
    ExecutionStopped,
}

/// Parses every input in order, then executes the compiled units in order.
///
/// The parse phase keeps going past failures so that every parse error is
/// discoverable in a single run, but a single failure suppresses the whole
/// execute phase. Units are released as part of the iteration that executed
/// them, before any stop condition is evaluated; units never reached by an
/// early stop are drained and released before returning. A failed execution
/// stops the batch unless the automated flag is set and the operator
/// confirms continuation on `confirm_input`.
pub fn run_batch<R: Runtime>(
    runtime: &mut R,
    ledger: &mut UnitLedger,
    inputs: &[PathBuf],
    options: BatchOptions,
    confirm_input: &mut impl Read,
) -> BatchOutcome {
    let mut parse_failed = false;
    let mut units = Vec::new();
    for path in inputs {
        if options.verbose {
            println!("Parsing '{}' started.", path.display());
        }
        let start = Instant::now();
        match ledger.acquire_file(runtime, path, options.debug_symbols) {
            Some(unit) => units.push((path, unit)),
            None => parse_failed = true,
        }
        if options.verbose {
            println!(
                "Parsing '{}' ended after {}ms",
                path.display(),
                start.elapsed().as_millis()
            );
        }
    }

    if parse_failed {
        for (_, unit) in units {
            ledger.release(runtime, unit);
        }
        return BatchOutcome::ParseFailed;
    }

    let mut stopped = false;
    let mut pending = units.into_iter();
    while let Some((path, unit)) = pending.next() {
        if options.verbose {
            println!("Executing '{}' started.", path.display());
        }
        let start = Instant::now();
        let succeeded = runtime.execute(unit.unit());
        if options.verbose {
            if succeeded {
                print!(
                    "Executing '{}' ended after {}ms. ",
                    path.display(),
                    start.elapsed().as_millis()
                );
            } else {
                print!(
                    "Executing '{}' failed after {}ms. ",
                    path.display(),
                    start.elapsed().as_millis()
                );
            }
        }
        ledger.release(runtime, unit);
        if options.verbose {
            println!("With cleanup, after {}ms", start.elapsed().as_millis());
        }
        if !succeeded && (!options.automated || !confirm_continue("continue?", confirm_input)) {
            stopped = true;
            break;
        }
    }
    for (_, unit) in pending {
        ledger.release(runtime, unit);
    }

    if stopped {
        BatchOutcome::ExecutionStopped
    } else {
        BatchOutcome::Completed
    }
}

/// Asks the operator a yes/no question, consuming bytes from `input` until a
/// `y` or `n` shows up. The end of the input stream counts as a denial.
pub fn confirm_continue(question: &str, input: &mut impl Read) -> bool {
    println!("{question} ([y] = yes, [n] = no)");
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(0) => return false,
            Ok(_) => match byte[0] {
                b'y' => return true,
                b'n' => return false,
                _ => {}
            },
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
            Err(_) => return false,
        }
    }
}
