//! Canonical row encoding used as leaf hash input.
//!
//! Each value is written as a one-byte type tag followed by a type-specific
//! payload, in list order, with no separators:
//!
//! | Type      | Tag | Payload                                      |
//! |-----------|-----|----------------------------------------------|
//! | null      | 0   | none                                         |
//! | text      | 1   | u32 length + UTF-8 bytes                     |
//! | integer   | 2   | i64                                          |
//! | float     | 3   | IEEE-754 double bit pattern as u64           |
//! | bool      | 4   | one byte, 0 or 1                             |
//! | bytes     | 5   | u32 length + raw bytes                       |
//! | timestamp | 6   | i64 nanoseconds since the Unix epoch         |
//! | other     | 1   | same as text, holding the display rendering  |
//!
//! Lengths are taken modulo 2^32, so payloads of 4 GiB or more wrap.
//! Every multi-byte field is big-endian on every platform. The encoding is a
//! pure function of the value list; the reusable buffer in [`Serializer`]
//! never leaks state between calls.

use crate::value::Value;
use chrono::{DateTime, Utc};

pub const TAG_NULL: u8 = 0;
pub const TAG_TEXT: u8 = 1;
pub const TAG_INT: u8 = 2;
pub const TAG_FLOAT: u8 = 3;
pub const TAG_BOOL: u8 = 4;
pub const TAG_BYTES: u8 = 5;
pub const TAG_TIMESTAMP: u8 = 6;

/// Encoder with a reusable scratch buffer
#[derive(Debug, Default)]
pub struct Serializer {
    buf: Vec<u8>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `values` into the internal buffer and borrow the result.
    ///
    /// The slice is valid until the next call.
    pub fn encode(&mut self, values: &[Value]) -> &[u8] {
        self.buf.clear();
        for value in values {
            write_value(&mut self.buf, value);
        }
        &self.buf
    }

    /// Encode `values` into a freshly owned byte string
    pub fn serialize_row(&mut self, values: &[Value]) -> Vec<u8> {
        self.encode(values).to_vec()
    }
}

/// Encode one row's values with a throwaway buffer
pub fn serialize(values: &[Value]) -> Vec<u8> {
    Serializer::new().serialize_row(values)
}

fn write_value(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => buf.push(TAG_NULL),
        Value::Text(s) | Value::Other(s) => {
            buf.push(TAG_TEXT);
            write_len_prefixed(buf, s.as_bytes());
        }
        Value::Int(i) => {
            buf.push(TAG_INT);
            buf.extend_from_slice(&i.to_be_bytes());
        }
        Value::Float(x) => {
            buf.push(TAG_FLOAT);
            buf.extend_from_slice(&x.to_bits().to_be_bytes());
        }
        Value::Bool(b) => {
            buf.push(TAG_BOOL);
            buf.push(u8::from(*b));
        }
        Value::Bytes(b) => {
            buf.push(TAG_BYTES);
            write_len_prefixed(buf, b);
        }
        Value::Timestamp(t) => {
            buf.push(TAG_TIMESTAMP);
            buf.extend_from_slice(&unix_nanos(t).to_be_bytes());
        }
    }
}

fn write_len_prefixed(buf: &mut Vec<u8>, data: &[u8]) {
    buf.extend_from_slice(&len_prefix(data.len()));
    buf.extend_from_slice(data);
}

/// Big-endian u32 length, keeping the low 32 bits of lengths past 4 GiB
fn len_prefix(len: usize) -> [u8; 4] {
    (len as u32).to_be_bytes()
}

/// Nanoseconds since the epoch, saturating outside the i64 range (years 1677..2262)
fn unix_nanos(t: &DateTime<Utc>) -> i64 {
    t.timestamp_nanos_opt().unwrap_or(if t.timestamp() < 0 {
        i64::MIN
    } else {
        i64::MAX
    })
}
