use crate::storage::error::{StorageError, StorageResult};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

/// Length prefix: key length and value length, u32 each
pub const RECORD_HEADER_SIZE: usize = 8;

/// A key-value pair as stored in one page slot.
///
/// ```text
/// | key_len: u32 | value_len: u32 | key bytes | value bytes |
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub value: String,
}

impl Record {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn encoded_len(&self) -> usize {
        RECORD_HEADER_SIZE + self.key.len() + self.value.len()
    }

    pub fn encode(&self) -> StorageResult<Vec<u8>> {
        let key_len = u32::try_from(self.key.len()).map_err(|_| self.too_large())?;
        let value_len = u32::try_from(self.value.len()).map_err(|_| self.too_large())?;

        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.write_u32::<LittleEndian>(key_len)?;
        buf.write_u32::<LittleEndian>(value_len)?;
        buf.extend_from_slice(self.key.as_bytes());
        buf.extend_from_slice(self.value.as_bytes());
        Ok(buf)
    }

    /// Decode a record from the start of `bytes`. Trailing bytes are ignored.
    pub fn decode(bytes: &[u8]) -> StorageResult<Self> {
        let mut cursor = Cursor::new(bytes);
        let (key_len, value_len) = match (
            cursor.read_u32::<LittleEndian>(),
            cursor.read_u32::<LittleEndian>(),
        ) {
            (Ok(key_len), Ok(value_len)) => (key_len as usize, value_len as usize),
            _ => {
                return Err(StorageError::Decode(format!(
                    "need {} header bytes, got {}",
                    RECORD_HEADER_SIZE,
                    bytes.len()
                )))
            }
        };

        let body = &bytes[RECORD_HEADER_SIZE..];
        let required = key_len
            .checked_add(value_len)
            .filter(|&required| required <= body.len())
            .ok_or_else(|| {
                StorageError::Decode(format!(
                    "lengths {} + {} exceed {} payload bytes",
                    key_len,
                    value_len,
                    body.len()
                ))
            })?;

        let key = std::str::from_utf8(&body[..key_len])
            .map_err(|e| StorageError::Decode(format!("key is not UTF-8: {}", e)))?;
        let value = std::str::from_utf8(&body[key_len..required])
            .map_err(|e| StorageError::Decode(format!("value is not UTF-8: {}", e)))?;

        Ok(Self::new(key, value))
    }

    fn too_large(&self) -> StorageError {
        StorageError::RecordTooLarge {
            size: self.encoded_len(),
            max: u32::MAX as usize,
        }
    }
}
