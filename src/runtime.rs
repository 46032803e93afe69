//! The capability surface of the scripting runtime the console drives.

use std::path::Path;

use crate::loader::{load_source, RawSource};

/// A scripting runtime as seen by the console driver.
///
/// One value of the implementing type is one session: construction creates
/// the session, dropping it destroys the session. Compiled units are opaque
/// to the driver; it only acquires, executes, optionally dumps, and releases
/// them. Parse failures are reported by the runtime itself and surface here
/// as an absent unit.
pub trait Runtime {
    /// Opaque compiled representation of one source unit.
    type Unit;

    /// Compiles an owned source buffer, consuming it. `label` names the
    /// unit in diagnostics.
    fn parse_source(
        &mut self,
        source: RawSource,
        debug_symbols: bool,
        label: &str,
    ) -> Option<Self::Unit>;

    /// Loads and compiles a file, labelled by its path. Load failures are
    /// reported to standard error and yield an absent unit.
    fn parse_file(&mut self, path: &Path, debug_symbols: bool) -> Option<Self::Unit> {
        let source = match load_source(path) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("error: {}: {err}", path.display());
                return None;
            }
        };
        let label = path.to_string_lossy();
        self.parse_source(source, debug_symbols, label.as_ref())
    }

    /// Compiles in-memory text under the given unit label.
    fn parse_text(&mut self, text: &str, debug_symbols: bool, label: &str) -> Option<Self::Unit> {
        self.parse_source(RawSource::from_text(text), debug_symbols, label)
    }

    /// Runs a compiled unit in this session. Returns `false` when execution
    /// reported a failure; the unit stays valid either way until released.
    fn execute(&mut self, unit: &Self::Unit) -> bool;

    /// Frees a compiled unit, internal buffer first, then the unit itself.
    fn release(&mut self, unit: Self::Unit);

    /// Human-readable structural rendering of a compiled unit, when the
    /// runtime offers one. Diagnostic only.
    fn dump(&self, _unit: &Self::Unit) -> Option<String> {
        None
    }
}
