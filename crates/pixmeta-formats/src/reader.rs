use pixmeta_common::DecodeError;

/// Byte order of a multi-byte field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// Bounds-checked, read-only view over a header buffer.
///
/// Every read is addressed by absolute offset. A read that would run past
/// the end of the buffer fails with [`DecodeError::TruncatedBuffer`] at that
/// offset instead of wrapping or panicking.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `width` bytes starting at `offset` are inside the buffer
    pub fn has(&self, offset: usize, width: usize) -> bool {
        offset
            .checked_add(width)
            .is_some_and(|end| end <= self.data.len())
    }

    /// Borrow `width` bytes at `offset`
    pub fn slice(&self, offset: usize, width: usize) -> Result<&'a [u8], DecodeError> {
        if !self.has(offset, width) {
            return Err(DecodeError::TruncatedBuffer {
                offset,
                needed: width,
                len: self.data.len(),
            });
        }
        Ok(&self.data[offset..offset + width])
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice(offset, N)?);
        Ok(out)
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        Ok(self.array::<1>(offset)?[0])
    }

    pub fn read_u16(&self, offset: usize, endian: Endian) -> Result<u16, DecodeError> {
        let bytes = self.array(offset)?;
        Ok(match endian {
            Endian::Big => u16::from_be_bytes(bytes),
            Endian::Little => u16::from_le_bytes(bytes),
        })
    }

    pub fn read_u32(&self, offset: usize, endian: Endian) -> Result<u32, DecodeError> {
        let bytes = self.array(offset)?;
        Ok(match endian {
            Endian::Big => u32::from_be_bytes(bytes),
            Endian::Little => u32::from_le_bytes(bytes),
        })
    }

    pub fn read_i16(&self, offset: usize, endian: Endian) -> Result<i16, DecodeError> {
        let bytes = self.array(offset)?;
        Ok(match endian {
            Endian::Big => i16::from_be_bytes(bytes),
            Endian::Little => i16::from_le_bytes(bytes),
        })
    }

    pub fn read_i32(&self, offset: usize, endian: Endian) -> Result<i32, DecodeError> {
        let bytes = self.array(offset)?;
        Ok(match endian {
            Endian::Big => i32::from_be_bytes(bytes),
            Endian::Little => i32::from_le_bytes(bytes),
        })
    }

    /// Compare the bytes at `offset` against a magic number.
    ///
    /// `expected` names the signature in the resulting error.
    pub fn expect_signature(
        &self,
        offset: usize,
        signature: &[u8],
        expected: &'static str,
    ) -> Result<(), DecodeError> {
        if self.slice(offset, signature.len())? != signature {
            return Err(DecodeError::SignatureMismatch { offset, expected });
        }
        Ok(())
    }
}
