//! The byte source the payload extractor reads from.
use std::io::{self, Read, Seek, SeekFrom};

/// Capability for fetching bytes from whatever medium holds the wav file.
pub trait ByteSource {
    /// Moves the read position to an absolute byte offset.
    fn seek_to(&mut self, offset: u64) -> io::Result<()>;

    /// Fills `buf` from the current position and returns how many bytes were placed in it.
    ///
    /// A count smaller than `buf.len()` without an error means the medium ran out of bytes.
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Adapts any `Read + Seek` value (files, buffered readers, cursors) into a [`ByteSource`].
#[derive(Debug)]
pub struct ReaderSource<R: ReadSeek> {
    reader: R,
}

impl<R: ReadSeek> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource { reader }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: ReadSeek> ByteSource for ReaderSource<R> {
    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            match self.reader.read(&mut buf[n..]) {
                Ok(0) => break,
                Ok(progress) => n += progress,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(n)
    }
}
