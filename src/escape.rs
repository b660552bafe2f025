//! Escaping for leaf payloads.
//!
//! The wire format is line oriented, so no leaf may span a physical line.
//! Strings escape backslashes, line breaks, tabs, and remaining C0 controls;
//! everything else (including non-ASCII UTF-8) passes through untouched.
//! Byte payloads escape to printable ASCII, with non-printable bytes written
//! as `\xNN`.

use crate::errors::{Error, ErrorKind};

pub(crate) fn escape_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\x7f' => {
                out.push_str(&format!("\\x{:02x}", c as u32))
            }
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn unescape_str(s: &str) -> Result<String, Error> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('x') => out.push(char::from(hex_pair(&mut chars, s)?)),
            _ => return Err(invalid(s)),
        }
    }
    Ok(out)
}

pub(crate) fn escape_bytes(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    for &b in data {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(char::from(b)),
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out
}

pub(crate) fn unescape_bytes(s: &str) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            if !c.is_ascii() {
                return Err(invalid(s));
            }
            out.push(c as u8);
            continue;
        }

        match chars.next() {
            Some('\\') => out.push(b'\\'),
            Some('n') => out.push(b'\n'),
            Some('r') => out.push(b'\r'),
            Some('t') => out.push(b'\t'),
            Some('x') => out.push(hex_pair(&mut chars, s)?),
            _ => return Err(invalid(s)),
        }
    }
    Ok(out)
}

fn hex_pair(chars: &mut std::str::Chars, original: &str) -> Result<u8, Error> {
    let hi = chars.next().and_then(|c| c.to_digit(16));
    let lo = chars.next().and_then(|c| c.to_digit(16));
    match (hi, lo) {
        (Some(hi), Some(lo)) => Ok((hi * 16 + lo) as u8),
        _ => Err(invalid(original)),
    }
}

fn invalid(value: &str) -> Error {
    Error::new(ErrorKind::InvalidEscape {
        value: value.to_string(),
    })
}
