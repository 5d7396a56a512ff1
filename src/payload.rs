/// Module containing the extractor for the 16-bit PCM payload following the header.
use bytemuck::cast_slice_mut;

use crate::error::PayloadError;
use crate::header::WaveHeader;
use crate::samples::Samples;
use crate::source::ByteSource;

/// Payload ceiling for callers without a limit of their own.
pub const DEFAULT_MAX_BYTES: usize = 15360;

const SUPPORTED_BITS_PER_SAMPLE: i16 = 16;
const BYTES_PER_SAMPLE: usize = std::mem::size_of::<i16>();

/// Number of payload bytes [`extract`] will read: the request, clamped to the
/// declared payload size and to `max_bytes`.
#[inline(always)]
pub fn effective_len(header: &WaveHeader, requested_bytes: usize, max_bytes: usize) -> usize {
    requested_bytes.min(header.payload_len()).min(max_bytes)
}

/// Reads up to `requested_bytes` of payload from `source` and decodes it as little-endian `i16` samples.
///
/// The read starts at the absolute offset right after the header. Samples of multi-channel
/// payloads stay interleaved. Nothing is read from `source` unless the effective length is a
/// non-zero whole number of samples, and no samples are returned unless all of them were read.
pub fn extract<S>(
    header: &WaveHeader,
    source: &mut S,
    requested_bytes: usize,
    max_bytes: usize,
) -> Result<Samples, PayloadError>
where
    S: ByteSource + ?Sized,
{
    if header.bits_per_sample() != SUPPORTED_BITS_PER_SAMPLE {
        return Err(PayloadError::UnsupportedBitDepth(header.bits_per_sample()));
    }

    let n_bytes = effective_len(header, requested_bytes, max_bytes);
    if n_bytes == 0 {
        return Ok(Samples::empty());
    }
    if n_bytes % BYTES_PER_SAMPLE != 0 {
        return Err(PayloadError::OddByteCount(n_bytes));
    }

    source.seek_to(header.data_offset())?;

    let mut samples: Box<[i16]> = vec![0; n_bytes / BYTES_PER_SAMPLE].into_boxed_slice();
    let n_read = source.read_exact(cast_slice_mut::<i16, u8>(&mut samples))?;
    if n_read != n_bytes {
        return Err(PayloadError::ShortRead {
            expected: n_bytes,
            actual: n_read,
        });
    }

    // the buffer holds file bytes, fix up the byte order on big-endian targets
    for sample in samples.iter_mut() {
        *sample = i16::from_le(*sample);
    }
    Ok(Samples::new(samples))
}

#[cfg(test)]
mod payload_tests {
    use super::*;
    use crate::source::ReaderSource;
    use std::io::{self, Cursor};

    const PAYLOAD: [u8; 8] = [0x01, 0x00, 0x02, 0x00, 0xFF, 0xFF, 0x00, 0x80];

    fn wav_bytes(header: &WaveHeader, payload: &[u8]) -> Vec<u8> {
        let mut bytes = header.as_bytes().to_vec();
        bytes.extend_from_slice(payload);
        bytes
    }

    fn cursor_source(header: &WaveHeader, payload: &[u8]) -> ReaderSource<Cursor<Vec<u8>>> {
        ReaderSource::new(Cursor::new(wav_bytes(header, payload)))
    }

    /// Records every call and fails the ones it is told to.
    #[derive(Default)]
    struct RecordingSource {
        bytes: Vec<u8>,
        position: usize,
        seeks: Vec<u64>,
        reads: usize,
        fail_seek: bool,
        fail_read: bool,
    }

    impl ByteSource for RecordingSource {
        fn seek_to(&mut self, offset: u64) -> io::Result<()> {
            self.seeks.push(offset);
            if self.fail_seek {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no medium"));
            }
            self.position = offset as usize;
            Ok(())
        }

        fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            if self.fail_read {
                return Err(io::Error::new(io::ErrorKind::Other, "read failed"));
            }
            let available = &self.bytes[self.position.min(self.bytes.len())..];
            let n = available.len().min(buf.len());
            buf[..n].copy_from_slice(&available[..n]);
            self.position += n;
            Ok(n)
        }
    }

    #[test]
    fn decodes_little_endian_samples() {
        let header = WaveHeader::new(8000, 1, 16, 8);
        let mut source = cursor_source(&header, &PAYLOAD);
        let samples = extract(&header, &mut source, 8, DEFAULT_MAX_BYTES).unwrap();
        assert_eq!(&*samples, &[1, 2, -1, -32768]);
    }

    #[test]
    fn empty_payload_returns_no_samples() {
        let header = WaveHeader::new(8000, 1, 16, 0);
        for requested in [0, 1, 8, usize::MAX] {
            let mut source = RecordingSource::default();
            let samples = extract(&header, &mut source, requested, DEFAULT_MAX_BYTES).unwrap();
            assert!(samples.is_empty());
            assert!(source.seeks.is_empty());
            assert_eq!(source.reads, 0);
        }
    }

    #[test]
    fn request_is_clamped_to_declared_payload() {
        // trailing bytes after the declared payload must never be decoded
        let header = WaveHeader::new(8000, 1, 16, 4);
        let mut source = cursor_source(&header, &PAYLOAD);
        let samples = extract(&header, &mut source, 1000, DEFAULT_MAX_BYTES).unwrap();
        assert_eq!(&*samples, &[1, 2]);
        assert_eq!(source.into_inner().position(), 48);
    }

    #[test]
    fn request_is_clamped_to_max_bytes() {
        let header = WaveHeader::new(8000, 1, 16, 8);
        let mut source = cursor_source(&header, &PAYLOAD);
        let samples = extract(&header, &mut source, 8, 6).unwrap();
        assert_eq!(&*samples, &[1, 2, -1]);
        assert_eq!(effective_len(&header, 8, 6), 6);
        assert_eq!(effective_len(&header, 2, 6), 2);
    }

    #[test]
    fn odd_length_fails_without_touching_the_source() {
        let header = WaveHeader::new(8000, 1, 16, 8);
        let mut source = RecordingSource {
            bytes: wav_bytes(&header, &PAYLOAD),
            ..Default::default()
        };
        let err = extract(&header, &mut source, 7, DEFAULT_MAX_BYTES).unwrap_err();
        assert!(matches!(err, PayloadError::OddByteCount(7)));
        assert!(source.seeks.is_empty());
        assert_eq!(source.reads, 0);
    }

    #[test]
    fn other_bit_depths_are_unsupported() {
        let header = WaveHeader::new(8000, 1, 24, 9);
        let mut source = cursor_source(&header, &[0; 9]);
        let err = extract(&header, &mut source, 9, DEFAULT_MAX_BYTES).unwrap_err();
        assert!(matches!(err, PayloadError::UnsupportedBitDepth(24)));

        let header = WaveHeader::new(8000, 1, 8, 8);
        let err = extract(&header, &mut source, 8, DEFAULT_MAX_BYTES).unwrap_err();
        assert!(matches!(err, PayloadError::UnsupportedBitDepth(8)));
    }

    #[test]
    fn seeks_past_the_header_once() {
        let header = WaveHeader::new(8000, 2, 16, 8);
        let mut source = RecordingSource {
            bytes: wav_bytes(&header, &PAYLOAD),
            ..Default::default()
        };
        let samples = extract(&header, &mut source, 8, DEFAULT_MAX_BYTES).unwrap();
        assert_eq!(source.seeks, vec![44]);
        assert_eq!(source.reads, 1);
        let frames: Vec<&[i16]> = samples.frames(header.n_channels() as usize).collect();
        assert_eq!(frames, vec![&[1, 2][..], &[-1, -32768][..]]);
    }

    #[test]
    fn truncated_source_is_a_short_read() {
        let header = WaveHeader::new(8000, 1, 16, 8);
        let mut source = cursor_source(&header, &PAYLOAD[..5]);
        let err = extract(&header, &mut source, 8, DEFAULT_MAX_BYTES).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::ShortRead {
                expected: 8,
                actual: 5
            }
        ));
    }

    #[test]
    fn source_failures_are_propagated() {
        let header = WaveHeader::new(8000, 1, 16, 8);

        let mut source = RecordingSource {
            fail_seek: true,
            ..Default::default()
        };
        let err = extract(&header, &mut source, 8, DEFAULT_MAX_BYTES).unwrap_err();
        assert!(matches!(err, PayloadError::SourceError(ref e) if e.kind() == io::ErrorKind::NotFound));
        assert_eq!(source.reads, 0);

        let mut source = RecordingSource {
            bytes: wav_bytes(&header, &PAYLOAD),
            fail_read: true,
            ..Default::default()
        };
        let err = extract(&header, &mut source, 8, DEFAULT_MAX_BYTES).unwrap_err();
        assert!(matches!(err, PayloadError::SourceError(ref e) if e.kind() == io::ErrorKind::Other));
    }

    #[test]
    fn works_through_a_trait_object() {
        let header = WaveHeader::new(8000, 1, 16, 8);
        let mut source = cursor_source(&header, &PAYLOAD);
        let dyn_source: &mut dyn ByteSource = &mut source;
        let samples = extract(&header, dyn_source, 4, DEFAULT_MAX_BYTES).unwrap();
        assert_eq!(&*samples, &[1, 2]);
    }

    #[test]
    fn agrees_with_hound() {
        let header = WaveHeader::new(22050, 2, 16, 400);
        let payload: Vec<u8> = (0..400u32).map(|i| (i * 37 % 251) as u8).collect();
        let bytes = wav_bytes(&header, &payload);

        let mut reader = hound::WavReader::new(Cursor::new(bytes.clone())).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels as i16, header.n_channels());
        assert_eq!(spec.sample_rate as i32, header.sample_rate());
        let expected: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

        let mut source = ReaderSource::new(Cursor::new(bytes));
        let samples = extract(&header, &mut source, 400, DEFAULT_MAX_BYTES).unwrap();
        assert_eq!(&*samples, expected.as_slice());
    }
}
