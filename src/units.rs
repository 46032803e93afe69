//! Ownership tracking for compiled units handed out by the runtime.

use std::path::Path;

use crate::runtime::Runtime;

/// A compiled unit owned by the driver.
///
/// Handles are move-only and can only be produced by [`UnitLedger`]
/// acquisition; consumers borrow the unit for execution and hand the handle
/// back to [`UnitLedger::release`], which consumes it. Releasing twice or
/// using a unit after release is unrepresentable.
#[must_use]
pub struct Tracked<U> {
    unit: U,
}

impl<U> Tracked<U> {
    pub fn unit(&self) -> &U {
        &self.unit
    }
}

/// Books every unit acquisition and release.
///
/// Acquisition delegates to the runtime's parse capabilities, release to the
/// runtime's release. The counters exist so callers can assert the
/// exactly-once discipline: a finished driver must satisfy
/// `acquired() == released()`.
#[derive(Debug, Default)]
pub struct UnitLedger {
    acquired: u64,
    released: u64,
}

impl UnitLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads, parses, and tracks a unit from a file on disk.
    pub fn acquire_file<R: Runtime>(
        &mut self,
        runtime: &mut R,
        path: &Path,
        debug_symbols: bool,
    ) -> Option<Tracked<R::Unit>> {
        let unit = runtime.parse_file(path, debug_symbols)?;
        self.acquired += 1;
        Some(Tracked { unit })
    }

    /// Parses and tracks a unit from in-memory text.
    pub fn acquire_text<R: Runtime>(
        &mut self,
        runtime: &mut R,
        text: &str,
        debug_symbols: bool,
        label: &str,
    ) -> Option<Tracked<R::Unit>> {
        let unit = runtime.parse_text(text, debug_symbols, label)?;
        self.acquired += 1;
        Some(Tracked { unit })
    }

    /// Returns a unit to the runtime. Consumes the handle.
    pub fn release<R: Runtime>(&mut self, runtime: &mut R, tracked: Tracked<R::Unit>) {
        runtime.release(tracked.unit);
        self.released += 1;
    }

    pub fn acquired(&self) -> u64 {
        self.acquired
    }

    pub fn released(&self) -> u64 {
        self.released
    }

    /// True when every acquired unit has been released.
    pub fn balanced(&self) -> bool {
        self.acquired == self.released
    }
}
