//! Encoding-aware loading of raw source files.

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::diagnostics::LoadError;
use crate::signature::signature_length;

/// How many leading bytes are inspected for an encoding signature.
const SIGNATURE_WINDOW: usize = 5;

/// An owned, NUL-terminated source buffer.
///
/// `bytes().len()` is always `len() + 1` and the final byte is always 0.
/// When a signature was stripped during loading, `len()` still reports the
/// on-disk file size: the content sits shifted to the front and the tail of
/// the buffer stays zeroed. Logical text therefore ends at the first NUL
/// byte, which is where [`RawSource::text`] stops.
#[derive(Debug, Clone)]
pub struct RawSource {
    length: usize,
    bytes: Vec<u8>,
}

impl RawSource {
    /// Wraps in-memory text, e.g. a unit typed at the interactive console.
    pub fn from_text(text: &str) -> Self {
        let mut bytes = Vec::with_capacity(text.len() + 1);
        bytes.extend_from_slice(text.as_bytes());
        bytes.push(0);
        Self {
            length: text.len(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The full backing buffer, terminator included.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The logical text: everything up to the first NUL byte, decoded
    /// lossily.
    pub fn text(&self) -> Cow<'_, str> {
        let end = self
            .bytes
            .iter()
            .position(|&byte| byte == 0)
            .unwrap_or(self.length);
        String::from_utf8_lossy(&self.bytes[..end])
    }

    /// Consumes the source, yielding the backing buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Reads `path` into a [`RawSource`], stripping a recognized encoding
/// signature from files larger than the signature window.
///
/// Files of [`SIGNATURE_WINDOW`] bytes or fewer are read verbatim and never
/// have a signature stripped. For larger files the stripped content shifts
/// left while the reported length keeps the on-disk size; see [`RawSource`].
pub fn load_source(path: &Path) -> Result<RawSource, LoadError> {
    let mut file = File::open(path).map_err(LoadError::Open)?;
    let size = file.metadata().map_err(LoadError::Open)?.len() as usize;

    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(size + 1)
        .map_err(|_| LoadError::Allocation { bytes: size + 1 })?;
    bytes.resize(size + 1, 0);

    if size > SIGNATURE_WINDOW {
        file.read_exact(&mut bytes[..SIGNATURE_WINDOW])
            .map_err(LoadError::Read)?;
        let skip = signature_length(&bytes[..SIGNATURE_WINDOW]);
        bytes.copy_within(skip..SIGNATURE_WINDOW, 0);
        file.read_exact(&mut bytes[SIGNATURE_WINDOW - skip..size - skip])
            .map_err(LoadError::Read)?;
    } else {
        file.read_exact(&mut bytes[..size]).map_err(LoadError::Read)?;
    }

    Ok(RawSource {
        length: size,
        bytes,
    })
}
