//! Console driver for the Oleander scripting runtime: encoding-aware source
//! loading, batch execution of pre-supplied files, and an interactive
//! read-eval console, all generic over the runtime capability.

pub mod batch;
pub mod console;
pub mod diagnostics;
pub mod interp;
pub mod loader;
pub mod runtime;
pub mod signature;
pub mod units;

pub use batch::{run_batch, BatchOptions, BatchOutcome};
pub use console::{ConsoleSession, LineSource, PipedSource, ReadlineSource};
pub use diagnostics::{LoadError, OleanderError};
pub use interp::Interpreter;
pub use loader::{load_source, RawSource};
pub use runtime::Runtime;
pub use units::{Tracked, UnitLedger};
