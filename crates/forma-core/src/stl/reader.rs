//! Bounds-checked little-endian reads over an STL buffer

use crate::{Error, Result};
use glam::Vec3;

/// Sequential cursor over a borrowed byte buffer
///
/// Every read checks the remaining length first, so a buffer that is shorter
/// than its header claims produces `CorruptData` instead of a panic.
pub(crate) struct RecordReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> RecordReader<'a> {
    pub fn at(bytes: &'a [u8], offset: usize) -> Self {
        Self { bytes, offset }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self
            .offset
            .checked_add(N)
            .ok_or_else(|| Error::corrupt("record offset overflow"))?;
        let chunk = self.bytes.get(self.offset..end).ok_or_else(|| {
            Error::corrupt(format!(
                "unexpected end of data: needed {} bytes at offset {}, buffer holds {}",
                N,
                self.offset,
                self.bytes.len()
            ))
        })?;
        self.offset = end;
        // Length is exactly N by construction of the range above
        let mut out = [0u8; N];
        out.copy_from_slice(chunk);
        Ok(out)
    }

    pub fn skip<const N: usize>(&mut self) -> Result<()> {
        self.take::<N>().map(|_| ())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.take::<4>().map(u32::from_le_bytes)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.take::<4>().map(f32::from_le_bytes)
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&7u32.to_le_bytes());
        bytes.extend_from_slice(&1.5f32.to_le_bytes());
        bytes.extend_from_slice(&(-2.0f32).to_le_bytes());
        bytes.extend_from_slice(&0.25f32.to_le_bytes());

        let mut reader = RecordReader::at(&bytes, 0);
        assert_eq!(reader.read_u32().unwrap(), 7);
        assert_eq!(reader.read_vec3().unwrap(), Vec3::new(1.5, -2.0, 0.25));
        assert_eq!(reader.offset(), 16);
    }

    #[test]
    fn test_short_read_is_corrupt_data() {
        let bytes = [0u8; 6];
        let mut reader = RecordReader::at(&bytes, 4);
        let err = reader.read_f32().unwrap_err();
        assert!(matches!(err, Error::CorruptData(_)));
        // A failed read leaves the cursor where it was
        assert_eq!(reader.offset(), 4);
    }

    #[test]
    fn test_offset_past_end() {
        let bytes = [0u8; 2];
        let mut reader = RecordReader::at(&bytes, 10);
        assert!(matches!(reader.skip::<1>(), Err(Error::CorruptData(_))));
    }
}
