//! Line acquisition for the interactive loop.
//!
//! Reads one byte at a time from an arbitrary [`Read`] source so the caller
//! never depends on the source being seekable or line-buffered. The buffer
//! grows by a fixed increment rather than a multiplicative factor; if an
//! allocation fails the runtime aborts the process, which is the intended
//! fail-fast behavior for out-of-memory here.

use std::io::{self, Read};

/// Initial line buffer capacity, also the fixed growth increment.
pub(crate) const LINE_BUFSIZE: usize = 1024;

/// Read one line from `input`, excluding the trailing newline.
///
/// Returns `Ok(None)` only when end-of-input is reached before any byte was
/// read — the caller's signal that the stream is closed. End-of-input after
/// at least one byte yields the partial line as `Ok(Some(..))`, which a
/// caller must treat exactly like a typed line.
pub fn read_line(input: &mut dyn Read) -> io::Result<Option<String>> {
    let mut buffer: Vec<u8> = Vec::with_capacity(LINE_BUFSIZE);
    let mut byte = [0u8; 1];

    loop {
        let n = input.read(&mut byte)?;
        if n == 0 {
            if buffer.is_empty() {
                return Ok(None);
            }
            break;
        }
        if byte[0] == b'\n' {
            break;
        }
        if buffer.len() == buffer.capacity() {
            buffer.reserve(LINE_BUFSIZE);
        }
        buffer.push(byte[0]);
    }

    Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
}
