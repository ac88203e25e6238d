use super::types::{CesrError, Cold};

/// `Stream` is an appendable buffer of incoming bytes. Parsers read it through a
/// [`Cursor`] and only drop bytes from the front once a frame has been recognized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stream {
    buf: Vec<u8>,
}

impl Stream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf)
    }

    /// `consume` drops `size` bytes from the front of the buffer, returning them
    pub fn consume(&mut self, size: usize) -> Vec<u8> {
        let size = size.min(self.buf.len());
        self.buf.drain(..size).collect()
    }
}

impl From<Vec<u8>> for Stream {
    fn from(buf: Vec<u8>) -> Self {
        Self { buf }
    }
}

impl From<&[u8]> for Stream {
    fn from(buf: &[u8]) -> Self {
        Self { buf: buf.to_vec() }
    }
}

/// `Cursor` is a read position over an immutable byte slice
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.offset..]
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    pub fn peek(&self, size: usize) -> Result<&'a [u8], CesrError> {
        let rest = self.remaining();
        if rest.len() < size {
            return Err(CesrError::short(size, rest.len()));
        }

        Ok(&rest[..size])
    }

    pub fn take(&mut self, size: usize) -> Result<&'a [u8], CesrError> {
        let taken = self.peek(size)?;
        self.offset += size;
        Ok(taken)
    }

    pub(crate) fn advance(&mut self, size: usize) {
        self.offset = (self.offset + size).min(self.bytes.len());
    }
}

/// `sniff` classifies the stream by the top three bits of its first byte
/// without consuming anything
pub fn sniff(bytes: &[u8]) -> Result<Cold, CesrError> {
    let first = bytes.first().ok_or(CesrError::short(1, 0))?;

    match first >> 5 {
        0o3..=0o6 => Ok(Cold::Msg),
        0o1 | 0o2 => Ok(Cold::Txt),
        0o7 => Ok(Cold::Bny),
        tritet => Err(CesrError::ColdStart(format!(
            "unexpected tritet {:#o} at stream start",
            tritet
        ))),
    }
}
