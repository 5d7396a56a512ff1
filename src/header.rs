///
/// Module containing the decoder for the canonical 44-byte PCM wav header.
///
use std::fmt::{Display, Formatter};
use std::ops::Range;

#[cfg(feature = "colored")]
use colored::Colorize;

use num_traits::{FromBytes, ToBytes};

use crate::error::HeaderError;

/// Size of the canonical PCM header. The data chunk starts right after it.
pub const HEADER_SIZE: usize = 44;

pub const RIFF: [u8; 4] = *b"RIFF";
pub const WAVE: [u8; 4] = *b"WAVE";
pub const FMT: [u8; 4] = *b"fmt ";
pub const DATA: [u8; 4] = *b"data";

pub const PCM_FORMAT: i16 = 1;
pub const FMT_CHUNK_SIZE: i32 = 16;
/// Smallest legal RIFF chunk size: the 36 header bytes following the size field.
pub const MIN_CHUNK_SIZE: i32 = 36;
pub const SUPPORTED_BIT_DEPTHS: [i16; 4] = [8, 16, 24, 32];

/// The fields of the canonical header, in file order.
/// Each variant knows its byte offset and width within the 44-byte prefix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HeaderField {
    ChunkId,
    ChunkSize,
    Format,
    SubChunk1Id,
    SubChunk1Size,
    AudioFormat,
    NumChannels,
    SampleRate,
    ByteRate,
    BlockAlign,
    BitsPerSample,
    SubChunk2Id,
    SubChunk2Size,
}

impl HeaderField {
    pub const ALL: [HeaderField; 13] = [
        HeaderField::ChunkId,
        HeaderField::ChunkSize,
        HeaderField::Format,
        HeaderField::SubChunk1Id,
        HeaderField::SubChunk1Size,
        HeaderField::AudioFormat,
        HeaderField::NumChannels,
        HeaderField::SampleRate,
        HeaderField::ByteRate,
        HeaderField::BlockAlign,
        HeaderField::BitsPerSample,
        HeaderField::SubChunk2Id,
        HeaderField::SubChunk2Size,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            HeaderField::ChunkId => "ChunkID",
            HeaderField::ChunkSize => "ChunkSize",
            HeaderField::Format => "Format",
            HeaderField::SubChunk1Id => "SubChunk1ID",
            HeaderField::SubChunk1Size => "SubChunk1Size",
            HeaderField::AudioFormat => "AudioFormat",
            HeaderField::NumChannels => "NumChannels",
            HeaderField::SampleRate => "SampleRate",
            HeaderField::ByteRate => "ByteRate",
            HeaderField::BlockAlign => "BlockAlign",
            HeaderField::BitsPerSample => "BitsPerSamples",
            HeaderField::SubChunk2Id => "SubChunk2ID",
            HeaderField::SubChunk2Size => "SubChunk2Size",
        }
    }

    pub const fn offset(self) -> usize {
        match self {
            HeaderField::ChunkId => 0,
            HeaderField::ChunkSize => 4,
            HeaderField::Format => 8,
            HeaderField::SubChunk1Id => 12,
            HeaderField::SubChunk1Size => 16,
            HeaderField::AudioFormat => 20,
            HeaderField::NumChannels => 22,
            HeaderField::SampleRate => 24,
            HeaderField::ByteRate => 28,
            HeaderField::BlockAlign => 32,
            HeaderField::BitsPerSample => 34,
            HeaderField::SubChunk2Id => 36,
            HeaderField::SubChunk2Size => 40,
        }
    }

    pub const fn width(self) -> usize {
        match self {
            HeaderField::AudioFormat
            | HeaderField::NumChannels
            | HeaderField::BlockAlign
            | HeaderField::BitsPerSample => 2,
            _ => 4,
        }
    }

    fn range(self) -> Range<usize> {
        self.offset()..self.offset() + self.width()
    }
}

impl Display for HeaderField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Wrapper around a 4 byte tag. Used for storing and displaying/debugging the chunk identifiers of the header.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ChunkId {
    identifier: [u8; 4],
}

impl ChunkId {
    pub const fn new(identifier: [u8; 4]) -> Self {
        ChunkId { identifier }
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.identifier
    }
}

impl From<[u8; 4]> for ChunkId {
    fn from(identifier: [u8; 4]) -> Self {
        ChunkId { identifier }
    }
}

impl From<&[u8; 4]> for ChunkId {
    fn from(identifier: &[u8; 4]) -> Self {
        ChunkId {
            identifier: *identifier,
        }
    }
}

impl Display for ChunkId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier.escape_ascii())
    }
}

/// The decoded canonical PCM wav header.
///
/// Fields are private: a `WaveHeader` is either the validated result of [`decode`],
/// or built by [`WaveHeader::new`] from a stream description.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WaveHeader {
    chunk_id: ChunkId,
    chunk_size: i32,
    format: ChunkId,
    sub_chunk1_id: ChunkId,
    sub_chunk1_size: i32,
    audio_format: i16,
    n_channels: i16,
    sample_rate: i32,
    byte_rate: i32,
    block_align: i16,
    bits_per_sample: i16,
    sub_chunk2_id: ChunkId,
    sub_chunk2_size: i32,
}

/// Decodes and validates a 44-byte header buffer.
///
/// Validation stops at the first violation, in this order: the four tags, the audio format,
/// the fmt chunk size, the range checks and finally the derived `ByteRate`/`BlockAlign` values.
pub fn decode(bytes: &[u8]) -> Result<WaveHeader, HeaderError> {
    let bytes: &[u8; HEADER_SIZE] = bytes
        .try_into()
        .map_err(|_| HeaderError::TruncatedInput {
            actual: bytes.len(),
        })?;

    let header = WaveHeader {
        chunk_id: read_tag(bytes, HeaderField::ChunkId),
        chunk_size: read_le(bytes, HeaderField::ChunkSize),
        format: read_tag(bytes, HeaderField::Format),
        sub_chunk1_id: read_tag(bytes, HeaderField::SubChunk1Id),
        sub_chunk1_size: read_le(bytes, HeaderField::SubChunk1Size),
        audio_format: read_le(bytes, HeaderField::AudioFormat),
        n_channels: read_le(bytes, HeaderField::NumChannels),
        sample_rate: read_le(bytes, HeaderField::SampleRate),
        byte_rate: read_le(bytes, HeaderField::ByteRate),
        block_align: read_le(bytes, HeaderField::BlockAlign),
        bits_per_sample: read_le(bytes, HeaderField::BitsPerSample),
        sub_chunk2_id: read_tag(bytes, HeaderField::SubChunk2Id),
        sub_chunk2_size: read_le(bytes, HeaderField::SubChunk2Size),
    };
    header.validate()?;
    Ok(header)
}

impl WaveHeader {
    /// Constructs a PCM header for the given stream description.
    /// `ByteRate`, `BlockAlign` and `ChunkSize` are derived from the arguments.
    ///
    /// Derived values saturate at the bounds of their field width. A description whose
    /// derived values do not fit is still built, and [`decode`] rejects its bytes.
    pub fn new(sample_rate: i32, n_channels: i16, bits_per_sample: i16, data_size: i32) -> Self {
        let frame_bytes = i32::from(n_channels) * i32::from(bits_per_sample) / 8;
        let block_align = frame_bytes.clamp(i16::MIN.into(), i16::MAX.into()) as i16;
        let byte_rate = (i64::from(sample_rate) * i64::from(frame_bytes))
            .clamp(i32::MIN.into(), i32::MAX.into()) as i32;
        WaveHeader {
            chunk_id: RIFF.into(),
            chunk_size: MIN_CHUNK_SIZE.saturating_add(data_size),
            format: WAVE.into(),
            sub_chunk1_id: FMT.into(),
            sub_chunk1_size: FMT_CHUNK_SIZE,
            audio_format: PCM_FORMAT,
            n_channels,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample,
            sub_chunk2_id: DATA.into(),
            sub_chunk2_size: data_size,
        }
    }

    /// Converts the header back into its 44-byte on-disk representation.
    pub fn as_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0; HEADER_SIZE];
        write_tag(&mut bytes, HeaderField::ChunkId, self.chunk_id);
        write_le(&mut bytes, HeaderField::ChunkSize, self.chunk_size);
        write_tag(&mut bytes, HeaderField::Format, self.format);
        write_tag(&mut bytes, HeaderField::SubChunk1Id, self.sub_chunk1_id);
        write_le(&mut bytes, HeaderField::SubChunk1Size, self.sub_chunk1_size);
        write_le(&mut bytes, HeaderField::AudioFormat, self.audio_format);
        write_le(&mut bytes, HeaderField::NumChannels, self.n_channels);
        write_le(&mut bytes, HeaderField::SampleRate, self.sample_rate);
        write_le(&mut bytes, HeaderField::ByteRate, self.byte_rate);
        write_le(&mut bytes, HeaderField::BlockAlign, self.block_align);
        write_le(&mut bytes, HeaderField::BitsPerSample, self.bits_per_sample);
        write_tag(&mut bytes, HeaderField::SubChunk2Id, self.sub_chunk2_id);
        write_le(&mut bytes, HeaderField::SubChunk2Size, self.sub_chunk2_size);
        bytes
    }

    fn validate(&self) -> Result<(), HeaderError> {
        expect_tag(HeaderField::ChunkId, self.chunk_id, RIFF)?;
        expect_tag(HeaderField::Format, self.format, WAVE)?;
        expect_tag(HeaderField::SubChunk1Id, self.sub_chunk1_id, FMT)?;
        expect_tag(HeaderField::SubChunk2Id, self.sub_chunk2_id, DATA)?;

        if self.audio_format != PCM_FORMAT {
            return Err(HeaderError::invalid(
                HeaderField::AudioFormat,
                PCM_FORMAT,
                self.audio_format,
            ));
        }
        if self.sub_chunk1_size != FMT_CHUNK_SIZE {
            return Err(HeaderError::invalid(
                HeaderField::SubChunk1Size,
                FMT_CHUNK_SIZE,
                self.sub_chunk1_size,
            ));
        }

        if self.chunk_size < MIN_CHUNK_SIZE {
            return Err(HeaderError::invalid(
                HeaderField::ChunkSize,
                format!(">= {}", MIN_CHUNK_SIZE),
                self.chunk_size,
            ));
        }
        if self.n_channels < 1 {
            return Err(HeaderError::invalid(
                HeaderField::NumChannels,
                ">= 1",
                self.n_channels,
            ));
        }
        if self.sample_rate <= 0 {
            return Err(HeaderError::invalid(
                HeaderField::SampleRate,
                "> 0",
                self.sample_rate,
            ));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bits_per_sample) {
            return Err(HeaderError::invalid(
                HeaderField::BitsPerSample,
                "one of 8, 16, 24, 32",
                self.bits_per_sample,
            ));
        }
        if self.sub_chunk2_size < 0 {
            return Err(HeaderError::invalid(
                HeaderField::SubChunk2Size,
                ">= 0",
                self.sub_chunk2_size,
            ));
        }

        // i64 so a hostile sample rate cannot overflow the products
        let frame_bytes = i64::from(self.n_channels) * i64::from(self.bits_per_sample) / 8;
        let expected_byte_rate = i64::from(self.sample_rate) * frame_bytes;
        if i64::from(self.byte_rate) != expected_byte_rate {
            return Err(HeaderError::invalid(
                HeaderField::ByteRate,
                expected_byte_rate,
                self.byte_rate,
            ));
        }
        if i64::from(self.block_align) != frame_bytes {
            return Err(HeaderError::invalid(
                HeaderField::BlockAlign,
                frame_bytes,
                self.block_align,
            ));
        }
        Ok(())
    }

    pub fn chunk_id(&self) -> ChunkId {
        self.chunk_id
    }

    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    pub fn format(&self) -> ChunkId {
        self.format
    }

    pub fn sub_chunk1_id(&self) -> ChunkId {
        self.sub_chunk1_id
    }

    pub fn sub_chunk1_size(&self) -> i32 {
        self.sub_chunk1_size
    }

    pub fn audio_format(&self) -> i16 {
        self.audio_format
    }

    pub fn n_channels(&self) -> i16 {
        self.n_channels
    }

    pub fn sample_rate(&self) -> i32 {
        self.sample_rate
    }

    pub fn byte_rate(&self) -> i32 {
        self.byte_rate
    }

    pub fn block_align(&self) -> i16 {
        self.block_align
    }

    pub fn bits_per_sample(&self) -> i16 {
        self.bits_per_sample
    }

    pub fn sub_chunk2_id(&self) -> ChunkId {
        self.sub_chunk2_id
    }

    /// Size of the sample payload in bytes.
    pub fn sub_chunk2_size(&self) -> i32 {
        self.sub_chunk2_size
    }

    /// Absolute offset of the first payload byte.
    pub const fn data_offset(&self) -> u64 {
        HEADER_SIZE as u64
    }

    /// Number of individual samples (across all channels) in the payload.
    pub fn n_samples(&self) -> usize {
        let bytes_per_sample = (self.bits_per_sample / 8).max(1) as usize;
        self.payload_len() / bytes_per_sample
    }

    /// Number of complete sample frames in the payload.
    pub fn n_frames(&self) -> usize {
        self.payload_len() / (self.block_align.max(1) as usize)
    }

    /// Duration of the payload in seconds.
    pub fn duration(&self) -> f64 {
        if self.byte_rate <= 0 {
            return 0.0;
        }
        f64::from(self.sub_chunk2_size.max(0)) / f64::from(self.byte_rate)
    }

    pub(crate) fn payload_len(&self) -> usize {
        usize::try_from(self.sub_chunk2_size).unwrap_or(0)
    }
}

impl TryFrom<&[u8]> for WaveHeader {
    type Error = HeaderError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        decode(bytes)
    }
}

impl From<WaveHeader> for [u8; HEADER_SIZE] {
    fn from(header: WaveHeader) -> Self {
        header.as_bytes()
    }
}

#[cfg(feature = "colored")]
impl Display for WaveHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", "WaveHeader:".white().bold().underline())?;
        for (field, value) in self.field_values() {
            writeln!(
                f,
                "\t{} {}",
                format!("{}:", field).green().bold(),
                value.white()
            )?;
        }
        Ok(())
    }
}

#[cfg(not(feature = "colored"))]
impl Display for WaveHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (field, value) in self.field_values() {
            writeln!(f, "{}: {}", field, value)?;
        }
        Ok(())
    }
}

impl WaveHeader {
    fn field_values(&self) -> [(HeaderField, String); 13] {
        HeaderField::ALL.map(|field| {
            let value = match field {
                HeaderField::ChunkId => self.chunk_id.to_string(),
                HeaderField::ChunkSize => self.chunk_size.to_string(),
                HeaderField::Format => self.format.to_string(),
                HeaderField::SubChunk1Id => self.sub_chunk1_id.to_string(),
                HeaderField::SubChunk1Size => self.sub_chunk1_size.to_string(),
                HeaderField::AudioFormat => self.audio_format.to_string(),
                HeaderField::NumChannels => self.n_channels.to_string(),
                HeaderField::SampleRate => self.sample_rate.to_string(),
                HeaderField::ByteRate => self.byte_rate.to_string(),
                HeaderField::BlockAlign => self.block_align.to_string(),
                HeaderField::BitsPerSample => self.bits_per_sample.to_string(),
                HeaderField::SubChunk2Id => self.sub_chunk2_id.to_string(),
                HeaderField::SubChunk2Size => self.sub_chunk2_size.to_string(),
            };
            (field, value)
        })
    }
}

#[inline(always)]
fn read_tag(bytes: &[u8; HEADER_SIZE], field: HeaderField) -> ChunkId {
    let mut tag = [0; 4];
    tag.copy_from_slice(&bytes[field.range()]);
    ChunkId::new(tag)
}

#[inline(always)]
fn read_le<T, const N: usize>(bytes: &[u8; HEADER_SIZE], field: HeaderField) -> T
where
    T: FromBytes<Bytes = [u8; N]>,
{
    debug_assert_eq!(N, field.width());
    let mut buf = [0; N];
    buf.copy_from_slice(&bytes[field.range()]);
    T::from_le_bytes(&buf)
}

#[inline(always)]
fn write_tag(bytes: &mut [u8; HEADER_SIZE], field: HeaderField, tag: ChunkId) {
    bytes[field.range()].copy_from_slice(tag.as_bytes());
}

#[inline(always)]
fn write_le<T: ToBytes>(bytes: &mut [u8; HEADER_SIZE], field: HeaderField, value: T) {
    bytes[field.range()].copy_from_slice(value.to_le_bytes().as_ref());
}

fn expect_tag(field: HeaderField, actual: ChunkId, expected: [u8; 4]) -> Result<(), HeaderError> {
    match actual.as_bytes() == &expected {
        true => Ok(()),
        false => Err(HeaderError::invalid(field, ChunkId::new(expected), actual)),
    }
}
