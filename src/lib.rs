//! # wave_reader
//!
//! wave_reader decodes the canonical 44-byte header of PCM wav files and extracts the
//! 16-bit sample payload that follows it.
//!
//! ## Core Features
//!
//! - **Header decoding**: the fixed 44-byte RIFF/WAVE prefix is read field by field from
//!   its offset table, and every field is validated before a [`WaveHeader`] is handed out.
//! - **Payload extraction**: a caller-chosen span of the payload is read through a
//!   [`ByteSource`] and decoded as little-endian `i16` samples.
//! - **Bounded reads**: every extraction is clamped to the declared payload size and a
//!   caller-supplied ceiling, so a crafted header cannot force a huge allocation.
//!
//! - **Optional Features**:
//!   - `colored`: Coloured `Display` output for headers and samples
//!   - `logging`: Debug logging of file-level reads through the `log` facade
//!   - `cli`: The `wave-reader` binary
//!
//! ## Quick Examples
//!
//! ### Reading a file
//!
//! ```no_run
//! use wave_reader::{read_pcm16, DEFAULT_MAX_BYTES};
//!
//! let (header, samples) = read_pcm16("sine1.wav", DEFAULT_MAX_BYTES)?;
//! println!("{}", header);
//! for frame in samples.frames(header.n_channels() as usize) {
//!     // hand the frame to a sink...
//! }
//! ```
//!
//! ### Decoding from any byte source
//!
//! ```no_run
//! use std::io::Cursor;
//! use wave_reader::{decode, extract, ReaderSource, HEADER_SIZE};
//!
//! let bytes: Vec<u8> = std::fs::read("sine1.wav")?;
//! let header = decode(&bytes[..HEADER_SIZE])?;
//! let mut source = ReaderSource::new(Cursor::new(bytes));
//! let samples = extract(&header, &mut source, 1024, 1024)?;
//! ```
//!
//! ## Error Handling
//!
//! Header failures are reported as [`HeaderError`], payload failures as [`PayloadError`].
//! The file-level functions wrap both in `WaveResult<T>`:
//!
//! ```no_run
//! pub type WaveResult<T> = Result<T, WaveError>;
//! ```
//!
//! Nothing in the crate retries, logs errors or aborts; the caller decides what a failure means.
//!

pub mod error;
pub mod header;
pub mod payload;
pub mod samples;
pub mod source;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use crate::error::{HeaderError, PayloadError, WaveError, WaveResult};
pub use crate::header::{
    decode, ChunkId, HeaderField, WaveHeader, DATA, FMT, HEADER_SIZE, RIFF, WAVE,
};
pub use crate::payload::{effective_len, extract, DEFAULT_MAX_BYTES};
pub use crate::samples::Samples;
pub use crate::source::{ByteSource, ReadSeek, ReaderSource};

/// A macro for logging messages if the logging feature is enabled.
#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)+) => {
        #[cfg(feature = "logging")]
        log::log!($level, $($arg)+);
    };
}

/// Reads and decodes the header of a wav file.
///
/// A file shorter than the header fails with [`HeaderError::TruncatedInput`].
pub fn read_header<P: AsRef<Path>>(path: P) -> WaveResult<WaveHeader> {
    let mut source = open_source(&path)?;
    let header = read_header_from(&mut source)?;
    log!(
        log::Level::Debug,
        "Read wav header from {}",
        path.as_ref().display()
    );
    Ok(header)
}

/// Reads the header of a wav file and up to `max_bytes` of its 16-bit payload.
///
/// # Examples
///
/// ```no_run
/// use wave_reader::{read_pcm16, Samples, WaveHeader};
///
/// fn main() {
///     let fp = "path/to/wav.wav";
///     let (header, samples): (WaveHeader, Samples) = read_pcm16(fp, 15360).unwrap();
///     assert_eq!(header.bits_per_sample(), 16);
/// }
/// ```
pub fn read_pcm16<P: AsRef<Path>>(path: P, max_bytes: usize) -> WaveResult<(WaveHeader, Samples)> {
    let mut source = open_source(&path)?;
    let header = read_header_from(&mut source)?;
    let samples = extract(&header, &mut source, header.payload_len(), max_bytes)?;
    log!(
        log::Level::Debug,
        "Read {} samples from {}",
        samples.len(),
        path.as_ref().display()
    );
    Ok((header, samples))
}

/// Seeks to the start of `source` and decodes the header found there.
pub fn read_header_from<S: ByteSource + ?Sized>(source: &mut S) -> WaveResult<WaveHeader> {
    source.seek_to(0)?;
    let mut buf = [0; HEADER_SIZE];
    let n_read = source.read_exact(&mut buf)?;
    // a source may over-report, never slice past the buffer
    Ok(decode(&buf[..n_read.min(HEADER_SIZE)])?)
}

fn open_source<P: AsRef<Path>>(path: P) -> WaveResult<ReaderSource<BufReader<File>>> {
    let f = File::open(path)?;
    Ok(ReaderSource::new(BufReader::new(f)))
}
