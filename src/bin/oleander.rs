use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::Parser;

use oleander::{
    run_batch, BatchOptions, BatchOutcome, ConsoleSession, Interpreter, OleanderError,
    PipedSource, ReadlineSource, UnitLedger,
};

#[derive(Parser)]
#[command(author, version, about = "Interactive console for Oleander code execution")]
struct Args {
    /// Loads the given Oleander file from disk; executed before actual input
    #[arg(short, long, value_name = "PATH")]
    input: Vec<PathBuf>,
    /// Suppresses confirmation prompts
    #[arg(short, long)]
    automated: bool,
    /// Disables the welcome print
    #[arg(long)]
    no_welcome: bool,
    /// Enables debug symbols in compiled units
    #[arg(short, long)]
    debug_symbols: bool,
    /// Enables additional output of the CLI
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), OleanderError> {
    let args = Args::parse();

    let mut runtime = Interpreter::new();
    let mut ledger = UnitLedger::new();

    let options = BatchOptions {
        debug_symbols: args.debug_symbols,
        automated: args.automated,
        verbose: args.verbose,
    };
    let outcome = run_batch(
        &mut runtime,
        &mut ledger,
        &args.input,
        options,
        &mut io::stdin().lock(),
    );
    match outcome {
        BatchOutcome::ParseFailed => return Err(OleanderError::BatchParseFailed),
        BatchOutcome::ExecutionStopped if args.automated => {
            return Err(OleanderError::BatchExecutionFailed);
        }
        _ => {}
    }

    let mut session = ConsoleSession {
        automated: args.automated,
        verbose: args.verbose,
        debug_symbols: args.debug_symbols,
        suppress_welcome: args.no_welcome,
        ..ConsoleSession::default()
    };

    let stdin = io::stdin();
    if stdin.is_terminal() {
        let mut lines = ReadlineSource::new()?;
        session.run(&mut runtime, &mut ledger, &mut lines)?;
    } else {
        let mut lines = PipedSource::new(stdin.lock());
        session.run(&mut runtime, &mut ledger, &mut lines)?;
    }

    Ok(())
}
