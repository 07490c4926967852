//! Minimal canonical byte codec shared by the registry record and signed
//! operation messages. Integers are little-endian, collections are
//! length-prefixed with a `u32` count.

use crate::error::CoreError;
use crate::types::ID_LEN;

/// Append a collection length prefix.
pub fn put_len(out: &mut Vec<u8>, len: usize) {
    // Collections on the ledger are bounded far below u32::MAX.
    out.extend_from_slice(&(len as u32).to_le_bytes());
}

/// Cursor over canonical bytes.
pub struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CoreError> {
        if self.bytes.len() < n {
            return Err(CoreError::Decoding(format!(
                "unexpected end of input: need {} bytes, have {}",
                n,
                self.bytes.len()
            )));
        }
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        Ok(head)
    }

    pub fn read_u8(&mut self) -> Result<u8, CoreError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u32(&mut self) -> Result<u32, CoreError> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(buf))
    }

    pub fn read_bool(&mut self) -> Result<bool, CoreError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CoreError::Decoding(format!("invalid bool byte {}", other))),
        }
    }

    pub fn read_id(&mut self) -> Result<[u8; ID_LEN], CoreError> {
        let mut buf = [0u8; ID_LEN];
        buf.copy_from_slice(self.take(ID_LEN)?);
        Ok(buf)
    }

    /// Fail unless every byte has been consumed.
    pub fn finish(self) -> Result<(), CoreError> {
        if self.bytes.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Decoding(format!("{} trailing bytes", self.bytes.len())))
        }
    }
}
