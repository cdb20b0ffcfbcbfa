//! Low-level I/O primitives shared by the decompressor and chunk handlers.
//!
//! Each function reads exactly the bytes it promises or returns an error.
//! A short read surfaces as [`Error::UnexpectedEof`], never as a zero value.
//! Everything in a savegame body is big-endian.

use std::io::{Read, Seek, SeekFrom};

use crate::{Error, Result};

/// Read one byte.
#[inline]
pub(crate) fn u8<R: Read + ?Sized>(r: &mut R) -> Result<u8> {
    let mut b = [0u8; 1];
    r.read_exact(&mut b)?;
    Ok(b[0])
}

/// Read a big-endian `u16`.
#[inline]
pub(crate) fn be_u16<R: Read + ?Sized>(r: &mut R) -> Result<u16> {
    Ok(u16::from_be_bytes(bytesa(r)?))
}

/// Read a big-endian `u32`.
#[inline]
pub(crate) fn be_u32<R: Read + ?Sized>(r: &mut R) -> Result<u32> {
    Ok(u32::from_be_bytes(bytesa(r)?))
}

/// Read a big-endian `i32`.
#[inline]
pub(crate) fn be_i32<R: Read + ?Sized>(r: &mut R) -> Result<i32> {
    Ok(i32::from_be_bytes(bytesa(r)?))
}

/// Read a big-endian `i64`.
#[inline]
pub(crate) fn be_i64<R: Read + ?Sized>(r: &mut R) -> Result<i64> {
    Ok(i64::from_be_bytes(bytesa(r)?))
}

/// Read a signed value stored as `i64` when `wide`, else as `i32`.
#[inline]
pub(crate) fn be_i64_or_i32<R: Read + ?Sized>(r: &mut R, wide: bool) -> Result<i64> {
    if wide {
        be_i64(r)
    } else {
        be_i32(r).map(i64::from)
    }
}

/// Read exactly `N` bytes into a fixed-size array.
#[inline]
pub(crate) fn bytesa<const N: usize, R: Read + ?Sized>(r: &mut R) -> Result<[u8; N]> {
    let mut b = [0u8; N];
    r.read_exact(&mut b)?;
    Ok(b)
}

/// Read exactly `len` bytes into a `Vec`.
///
/// The buffer is reserved fallibly since `len` comes straight from the file.
#[inline]
pub(crate) fn bytesv<R: Read + ?Sized>(r: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut b = Vec::new();
    b.try_reserve_exact(len)?;
    b.resize(len, 0);
    r.read_exact(&mut b)?;
    Ok(b)
}

/// Seek forward `len` bytes from the current position.
#[inline]
pub(crate) fn skip<R: Seek + ?Sized>(r: &mut R, len: u64) -> Result<()> {
    let len = i64::try_from(len).map_err(|_| Error::Parse("skip length out of range"))?;
    r.seek(SeekFrom::Current(len))?;
    Ok(())
}

/// Read a compact ("simple gamma") integer.
///
/// ```text
/// 0xxxxxxx
/// 10xxxxxx xxxxxxxx
/// 110xxxxx xxxxxxxx xxxxxxxx
/// 1110xxxx xxxxxxxx xxxxxxxx xxxxxxxx
/// 11110--- xxxxxxxx xxxxxxxx xxxxxxxx xxxxxxxx
/// ```
///
/// The payload bits of the first byte are the most significant ones.
pub(crate) fn gamma<R: Read + ?Sized>(r: &mut R) -> Result<u32> {
    let first = u8(r)?;
    let (mut value, extra) = match first.leading_ones() {
        0 => (first as u32, 0),
        1 => ((first & 0x3F) as u32, 1),
        2 => ((first & 0x1F) as u32, 2),
        3 => ((first & 0x0F) as u32, 3),
        4 => (0, 4),
        _ => return Err(Error::Parse("unsupported compact integer prefix")),
    };
    for _ in 0..extra {
        value = (value << 8) | u8(r)? as u32;
    }
    Ok(value)
}

/// Number of bytes [`gamma`] consumes to encode `value`.
pub(crate) fn gamma_len(value: u32) -> u64 {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0x0FFF_FFFF => 4,
        _ => 5,
    }
}

/// Read the 4-byte header of a length-prefixed chunk.
///
/// Returns the chunk-kind nibble (the low half of the first byte) and the
/// body length. The low 24 bits of the word are the length; the high
/// nibble of the first byte extends it to 28 bits.
pub(crate) fn riff_header<R: Read + ?Sized>(r: &mut R) -> Result<(u8, u32)> {
    let word = be_u32(r)?;
    let kind = (word >> 24) as u8 & 0x0F;
    let len = (word & 0x00FF_FFFF) | ((word >> 28) << 24);
    Ok((kind, len))
}

/// Read a compact-integer length-prefixed string.
///
/// A zero length means the string is absent and nothing is allocated.
/// Invalid UTF-8 is replaced rather than rejected.
pub(crate) fn string<R: Read + ?Sized>(r: &mut R) -> Result<Option<String>> {
    let len = gamma(r)?;
    if len == 0 {
        return Ok(None);
    }
    let bytes = bytesv(r, len as usize)?;
    Ok(Some(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }))
}
