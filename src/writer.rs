//! Serialization of descriptors.
//!
//! Every writer emits, optionally, the byte order mark of the string's
//! encoding followed by exactly [`byte_len`](UnicodeString::byte_len) content
//! bytes. The terminator is never written.

#[cfg(feature = "std")]
use std::{fs::File, io, path::Path};

use crate::string::UnicodeString;

impl UnicodeString {
    /// Number of bytes a writer emits.
    #[inline]
    pub fn encoded_len(&self, with_bom: bool) -> usize {
        let bom = if with_bom {
            self.encoding().bom().len()
        } else {
            0
        };
        bom + self.byte_len()
    }

    /// Write into `dest`, returning the number of bytes written.
    ///
    /// Returns 0 and writes nothing if `dest` is shorter than
    /// [`encoded_len`](Self::encoded_len).
    ///
    /// ```
    /// use reencoder::{Encoding, UnicodeString};
    ///
    /// let s = UnicodeString::from_utf16_units(&[0x0041], Encoding::Utf16Le)?;
    /// let mut buf = [0u8; 8];
    /// assert_eq!(s.write_to_slice(&mut buf, true), 4);
    /// assert_eq!(&buf[..4], &[0xFF, 0xFE, 0x41, 0x00]);
    /// assert_eq!(s.write_to_slice(&mut buf[..3], true), 0);
    /// # Ok::<(), reencoder::Error>(())
    /// ```
    pub fn write_to_slice(&self, dest: &mut [u8], with_bom: bool) -> usize {
        let total = self.encoded_len(with_bom);
        if dest.len() < total {
            return 0;
        }

        let bom_len = total - self.byte_len();
        dest[..bom_len].copy_from_slice(&self.encoding().bom()[..bom_len]);
        dest[bom_len..total].copy_from_slice(self.as_bytes());
        total
    }

    /// Write to `sink`, returning the number of bytes written.
    ///
    /// A sink that stops accepting bytes is an error; nothing counts as a
    /// partial success.
    #[cfg(feature = "std")]
    pub fn write_to<W: io::Write>(&self, mut sink: W, with_bom: bool) -> io::Result<usize> {
        if with_bom {
            sink.write_all(self.encoding().bom())?;
        }
        sink.write_all(self.as_bytes())?;
        sink.flush()?;
        Ok(self.encoded_len(with_bom))
    }

    /// Create (or truncate) the file at `path` and write to it.
    #[cfg(feature = "std")]
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P, with_bom: bool) -> io::Result<usize> {
        let file = File::create(path)?;
        let written = self.write_to(io::BufWriter::new(file), with_bom)?;
        log::debug!("wrote {} bytes of {}", written, self.encoding());
        Ok(written)
    }
}
