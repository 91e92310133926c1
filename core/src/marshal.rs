//! Text marshalling across the engine's linear memory.
//!
//! Both functions take the memory slice freshly borrowed from the engine for
//! this call only. Engine memory can grow between calls, so nothing here keeps
//! a slice, pointer or length around.

use crate::error::{Error, Result};
use tracing::trace;

/// Bytes reserved after the payload for the NUL terminator.
pub const TERMINATOR_MARGIN: usize = 1;

/// Write `text` as UTF-8 into the scratch region at `offset`, followed by a
/// NUL terminator.
///
/// `capacity` is the size of the engine's scratch area. Returns the payload
/// length in bytes, excluding the terminator, as the engine's `insert` takes it.
pub fn write_text(memory: &mut [u8], offset: u32, capacity: usize, text: &str) -> Result<u32> {
    let bytes = text.as_bytes();
    let needed = bytes.len().saturating_add(TERMINATOR_MARGIN);
    if needed > capacity {
        return Err(Error::BufferOverrun { needed, capacity });
    }
    let len = payload_len(bytes.len(), capacity)?;

    let region = region_mut(memory, offset, needed)?;
    let (payload, terminator) = region.split_at_mut(bytes.len());
    payload.copy_from_slice(bytes);
    terminator.fill(0);

    trace!(offset, len, "wrote scratch text");
    Ok(len)
}

fn payload_len(len: usize, capacity: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::BufferOverrun {
        needed: len.saturating_add(TERMINATOR_MARGIN),
        capacity,
    })
}

/// Copy `len` bytes at `pointer` out of engine memory and decode them.
pub fn read_text(memory: &[u8], pointer: u32, len: usize) -> Result<String> {
    if len == 0 {
        return Ok(String::new());
    }
    let bytes = region(memory, pointer, len)?;
    let text = std::str::from_utf8(bytes)?;
    trace!(pointer, len, "read engine text");
    Ok(text.to_owned())
}

fn bounds(memory_len: usize, pointer: u32, len: usize) -> Result<std::ops::Range<usize>> {
    let start = pointer as usize;
    start
        .checked_add(len)
        .filter(|end| *end <= memory_len)
        .map(|end| start..end)
        .ok_or(Error::OutOfBounds {
            pointer,
            len,
            memory_len,
        })
}

fn region(memory: &[u8], pointer: u32, len: usize) -> Result<&[u8]> {
    let range = bounds(memory.len(), pointer, len)?;
    Ok(&memory[range])
}

fn region_mut(memory: &mut [u8], pointer: u32, len: usize) -> Result<&mut [u8]> {
    let range = bounds(memory.len(), pointer, len)?;
    Ok(&mut memory[range])
}
