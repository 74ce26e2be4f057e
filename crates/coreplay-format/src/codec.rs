//! Binary encode/decode for the recording format.
//!
//! All integers are little-endian. Names are fixed 64-byte ASCII fields,
//! NUL-padded, truncated to 63 bytes on write so a terminator always
//! survives. Decoding works on fixed-size byte arrays: the reader is
//! responsible for collecting exactly [`HEADER_SIZE`] or [`EVENT_SIZE`]
//! bytes first.

use std::io::{Read, Write};

use crate::error::FormatError;
use crate::types::{RawEvent, RecordHeader};
use crate::{EVENT_SIZE, HEADER_SIZE, NAME_SIZE};

// ── Primitive helpers ───────────────────────────────────────────

fn u16_at(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn u32_at(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// Decode a NUL-padded name field. Stops at the first NUL; non-ASCII
/// bytes are replaced rather than rejected.
fn decode_name(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

fn encode_name(name: &str) -> [u8; NAME_SIZE] {
    let mut field = [0u8; NAME_SIZE];
    let bytes = name.as_bytes();
    let len = bytes.len().min(NAME_SIZE - 1);
    field[..len].copy_from_slice(&bytes[..len]);
    field
}

/// Read until `buf` is full or the source is exhausted.
///
/// Returns the number of bytes filled. Unlike `read_exact`, a short
/// source is not an error: the caller decides what a partial fill means.
pub fn read_full(r: &mut dyn Read, buf: &mut [u8]) -> Result<usize, FormatError> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(FormatError::Io(e)),
        }
    }
    Ok(filled)
}

// ── Header encode/decode ────────────────────────────────────────

/// Decode a header. Never fails: magic and version are checked by the
/// reader, which turns problems into warnings.
pub fn decode_header(buf: &[u8; HEADER_SIZE]) -> RecordHeader {
    let mut magic = [0u8; 8];
    magic.copy_from_slice(&buf[0..8]);
    RecordHeader {
        magic,
        version: u32_at(buf, 8),
        core_size: u32_at(buf, 12),
        total_cycles: u32_at(buf, 16),
        total_events: u32_at(buf, 20),
        warrior1_name: decode_name(&buf[24..88]),
        warrior2_name: decode_name(&buf[88..152]),
        warrior1_start: u32_at(buf, 152),
        warrior2_start: u32_at(buf, 156),
    }
}

/// Encode a header into its fixed 168-byte form. Reserved bytes are zero.
pub fn header_bytes(header: &RecordHeader) -> [u8; HEADER_SIZE] {
    let mut buf = [0u8; HEADER_SIZE];
    buf[0..8].copy_from_slice(&header.magic);
    buf[8..12].copy_from_slice(&header.version.to_le_bytes());
    buf[12..16].copy_from_slice(&header.core_size.to_le_bytes());
    buf[16..20].copy_from_slice(&header.total_cycles.to_le_bytes());
    buf[20..24].copy_from_slice(&header.total_events.to_le_bytes());
    buf[24..88].copy_from_slice(&encode_name(&header.warrior1_name));
    buf[88..152].copy_from_slice(&encode_name(&header.warrior2_name));
    buf[152..156].copy_from_slice(&header.warrior1_start.to_le_bytes());
    buf[156..160].copy_from_slice(&header.warrior2_start.to_le_bytes());
    buf
}

/// Write an encoded header.
pub fn encode_header(w: &mut dyn Write, header: &RecordHeader) -> Result<(), FormatError> {
    w.write_all(&header_bytes(header))?;
    Ok(())
}

// ── Event encode/decode ─────────────────────────────────────────

/// Decode one event record. The three padding bytes are ignored.
pub fn decode_event(buf: &[u8; EVENT_SIZE]) -> RawEvent {
    RawEvent {
        cycle: u32_at(buf, 0),
        address: u16_at(buf, 4),
        kind: u16_at(buf, 6),
        warrior: buf[8],
        data: u32_at(buf, 12),
    }
}

/// Encode one event record with zeroed padding.
pub fn event_bytes(event: &RawEvent) -> [u8; EVENT_SIZE] {
    let mut buf = [0u8; EVENT_SIZE];
    buf[0..4].copy_from_slice(&event.cycle.to_le_bytes());
    buf[4..6].copy_from_slice(&event.address.to_le_bytes());
    buf[6..8].copy_from_slice(&event.kind.to_le_bytes());
    buf[8] = event.warrior;
    buf[12..16].copy_from_slice(&event.data.to_le_bytes());
    buf
}

/// Write an encoded event record.
pub fn encode_event(w: &mut dyn Write, event: &RawEvent) -> Result<(), FormatError> {
    w.write_all(&event_bytes(event))?;
    Ok(())
}
