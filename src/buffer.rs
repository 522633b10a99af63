//! A growable byte buffer with a movable cursor.
//!
//! [`ByteCursor`] is the byte-level primitive the codec is written against. Writes
//! past the end grow the buffer, and the furthest position ever reached (the
//! high-water mark) defines [`ByteCursor::len`]. Reads never go past that mark.
//!
//! # Example
//!
//! ```
//! use byteorder::{BigEndian, LittleEndian};
//! use datapack::buffer::ByteCursor;
//!
//! let mut buf = ByteCursor::new();
//! buf.put_varint(300);
//! buf.put_u16::<LittleEndian>(0xBEEF);
//! buf.put_string("hi");
//!
//! // rewind and read it all back
//! buf.start();
//! assert_eq!(buf.get_varint().unwrap(), 300);
//! assert_eq!(buf.get_u16::<LittleEndian>().unwrap(), 0xBEEF);
//! assert_eq!(buf.get_string().unwrap(), "hi");
//!
//! // the length prefix of a string is a big-endian u32
//! buf.set_cursor(4);
//! assert_eq!(buf.get_u32::<BigEndian>().unwrap(), 2);
//! ```

use crate::errors::PackError;
use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use failure::Error;
use num_bigint::BigUint;
use smallvec::SmallVec;

/// Default initial capacity of a scratch buffer, 1 MiB.
pub const BUFFER_SIZE: usize = 1024 * 1024;

/// Base of the digits used by varints and LEB128.
const GROUP_RADIX: u32 = 128;
const GROUP_MASK: u8 = 0b0111_1111;
const CONTINUE_BIT: u8 = 0b1000_0000;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// A byte buffer with a read/write cursor and a high-water mark.
pub struct ByteCursor {
    mem: Vec<u8>,
    cursor: usize,
    end: usize,
}

macro_rules! fixed_width {
    ($get:ident, $put:ident, $t:ty, $len:expr, $read:ident, $write:ident) => {
        #[doc = concat!("Reads a `", stringify!($t), "` at the cursor in byte order `E`.")]
        pub fn $get<E: ByteOrder>(&mut self) -> Result<$t, Error> {
            let bs = self.read($len)?;
            Ok(E::$read(bs))
        }

        #[doc = concat!("Writes a `", stringify!($t), "` at the cursor in byte order `E`.")]
        pub fn $put<E: ByteOrder>(&mut self, n: $t) {
            let start = self.claim($len);
            E::$write(&mut self.mem[start..start + $len], n);
        }
    };
}

impl ByteCursor {
    /// Creates an empty buffer.
    pub fn new() -> Self { Self::default() }

    /// Creates an empty buffer that can take `cap` bytes before reallocating.
    pub fn with_capacity(cap: usize) -> Self {
        ByteCursor {
            mem: Vec::with_capacity(cap),
            cursor: 0,
            end: 0,
        }
    }

    /// Creates a buffer holding a copy of `bytes`, with the cursor at the start.
    pub fn from_slice(bytes: &[u8]) -> Self {
        ByteCursor {
            mem: bytes.to_vec(),
            cursor: 0,
            end: bytes.len(),
        }
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize { self.cursor }

    /// Moves the cursor. Moving it past the high-water mark raises the mark, and the
    /// gap reads as zeroes.
    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos;
        if pos > self.end {
            // bytes past the mark are stale
            self.mem.truncate(self.end);
            self.mem.resize(pos, 0);
            self.end = pos;
        }
    }

    /// Length up to the high-water mark.
    pub fn len(&self) -> usize { self.end }

    /// Indicates whether nothing has been written.
    pub fn is_empty(&self) -> bool { self.end == 0 }

    /// Bytes between the cursor and the high-water mark.
    pub fn remaining(&self) -> usize { self.end.saturating_sub(self.cursor) }

    /// Rewinds the cursor, keeping the contents.
    pub fn start(&mut self) { self.cursor = 0; }

    /// Rewinds the cursor and forgets the contents. The allocation is kept.
    pub fn reset(&mut self) {
        self.start();
        self.end = 0;
    }

    /// The bytes up to the high-water mark.
    pub fn as_slice(&self) -> &[u8] { &self.mem[..self.end] }

    /// Copies the bytes up to the high-water mark into a [`Bytes`].
    pub fn to_bytes(&self) -> Bytes { Bytes::copy_from_slice(self.as_slice()) }

    /// Reserves `len` bytes at the cursor for writing and returns where they start.
    fn claim(&mut self, len: usize) -> usize {
        let start = self.cursor;
        self.set_cursor(start + len);
        start
    }

    /// Reads `len` bytes at the cursor.
    ///
    /// # Errors
    ///
    /// Fails with [`PackError::Truncated`] if fewer than `len` bytes remain.
    pub fn read(&mut self, len: usize) -> Result<&[u8], Error> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(PackError::Truncated {
                needed: len,
                remaining,
            }
            .into());
        }
        let start = self.cursor;
        self.cursor += len;
        Ok(&self.mem[start..self.cursor])
    }

    /// Moves the cursor to `pos`, then reads `len` bytes.
    pub fn read_at(&mut self, pos: usize, len: usize) -> Result<&[u8], Error> {
        if pos > self.end {
            return Err(PackError::Truncated {
                needed: len,
                remaining: 0,
            }
            .into());
        }
        self.cursor = pos;
        self.read(len)
    }

    /// Reads everything between the cursor and the high-water mark.
    pub fn read_to_end(&mut self) -> &[u8] {
        let start = self.cursor.min(self.end);
        self.cursor = self.end;
        &self.mem[start..self.end]
    }

    /// Writes `bytes` at the cursor.
    pub fn write(&mut self, bytes: &[u8]) {
        let start = self.claim(bytes.len());
        self.mem[start..start + bytes.len()].copy_from_slice(bytes);
    }

    /// Moves the cursor to `pos`, then writes `bytes`.
    pub fn write_at(&mut self, pos: usize, bytes: &[u8]) {
        self.set_cursor(pos);
        self.write(bytes);
    }

    /// Reads a `u8`.
    pub fn get_u8(&mut self) -> Result<u8, Error> { Ok(self.read(1)?[0]) }

    /// Writes a `u8`.
    pub fn put_u8(&mut self, n: u8) {
        let start = self.claim(1);
        self.mem[start] = n;
    }

    /// Reads an `i8`.
    pub fn get_i8(&mut self) -> Result<i8, Error> { Ok(self.get_u8()? as i8) }

    /// Writes an `i8`.
    pub fn put_i8(&mut self, n: i8) { self.put_u8(n as u8) }

    fixed_width!(get_u16, put_u16, u16, 2, read_u16, write_u16);
    fixed_width!(get_i16, put_i16, i16, 2, read_i16, write_i16);
    fixed_width!(get_u32, put_u32, u32, 4, read_u32, write_u32);
    fixed_width!(get_i32, put_i32, i32, 4, read_i32, write_i32);
    fixed_width!(get_u64, put_u64, u64, 8, read_u64, write_u64);
    fixed_width!(get_i64, put_i64, i64, 8, read_i64, write_i64);
    fixed_width!(get_f32, put_f32, f32, 4, read_f32, write_f32);
    fixed_width!(get_f64, put_f64, f64, 8, read_f64, write_f64);

    /// Writes `n` as 7-bit groups, least significant first, with the high bit set on
    /// every group but the last.
    ///
    /// # Example
    ///
    /// ```
    /// use datapack::buffer::ByteCursor;
    ///
    /// let mut buf = ByteCursor::new();
    /// buf.put_varint(16384);
    /// assert_eq!(buf.as_slice(), [0x80, 0x80, 0x01]);
    /// ```
    pub fn put_varint(&mut self, mut n: u64) {
        let mut digs: SmallVec<[u8; 10]> = SmallVec::new();
        while n > GROUP_MASK as u64 {
            digs.push((n as u8 & GROUP_MASK) | CONTINUE_BIT);
            n >>= 7;
        }
        digs.push(n as u8);
        self.write(&digs);
    }

    /// Reads a varint written by [`ByteCursor::put_varint`].
    ///
    /// # Errors
    ///
    /// Fails with [`PackError::VarintOverflow`] if the groups do not fit in a `u64`,
    /// and with [`PackError::Truncated`] if the buffer ends mid-varint.
    pub fn get_varint(&mut self) -> Result<u64, Error> {
        let mut result = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = self.get_u8()?;
            let payload = byte & GROUP_MASK;
            if shift >= 64 || (shift == 63 && payload > 1) {
                return Err(PackError::VarintOverflow.into());
            }
            result |= (payload as u64) << shift;
            if byte & CONTINUE_BIT == 0 {
                return Ok(result);
            }
            shift += 7;
        }
    }

    /// Writes `n` as unsigned LEB128.
    ///
    /// # Example
    ///
    /// ```
    /// use datapack::{buffer::ByteCursor, prelude::BigUint};
    ///
    /// let mut buf = ByteCursor::new();
    /// buf.put_leb128(&BigUint::from(624_485u32));
    /// assert_eq!(buf.as_slice(), [0xE5, 0x8E, 0x26]);
    /// ```
    pub fn put_leb128(&mut self, n: &BigUint) {
        let mut digs = n.to_radix_le(GROUP_RADIX);
        let last = digs.len() - 1;
        for dig in digs[..last].iter_mut() {
            *dig |= CONTINUE_BIT;
        }
        self.write(&digs);
    }

    /// Reads an unsigned LEB128 number of any width.
    pub fn get_leb128(&mut self) -> Result<BigUint, Error> {
        let mut digs: SmallVec<[u8; 16]> = SmallVec::new();
        loop {
            let byte = self.get_u8()?;
            digs.push(byte & GROUP_MASK);
            if byte & CONTINUE_BIT == 0 {
                break;
            }
        }
        // every digit is below the radix, so this cannot fail
        Ok(BigUint::from_radix_le(&digs, GROUP_RADIX).unwrap_or_default())
    }

    /// Writes `s` as a big-endian `u32` byte length followed by its UTF-8 bytes.
    pub fn put_string(&mut self, s: &str) {
        self.put_u32::<BigEndian>(s.len() as u32);
        self.write(s.as_bytes());
    }

    /// Reads a string written by [`ByteCursor::put_string`].
    pub fn get_string(&mut self) -> Result<String, Error> {
        let len = self.get_u32::<BigEndian>()? as usize;
        let bytes = self.read(len)?.to_vec();
        String::from_utf8(bytes).map_err(|e| PackError::InvalidString(e.to_string()).into())
    }
}

impl From<&[u8]> for ByteCursor {
    fn from(bytes: &[u8]) -> Self { ByteCursor::from_slice(bytes) }
}
