/// Module containing ``Samples``, the owned sequence of decoded 16-bit PCM samples.
use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};
use std::slice::ChunksExact;

#[cfg(feature = "colored")]
use colored::Colorize;

use bytemuck::cast_slice;

/// Wrapper struct around a boxed slice of samples.
/// Multi-channel payloads stay interleaved, see [`Samples::frames`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Samples {
    pub(crate) samples: Box<[i16]>,
}

impl Samples {
    /// Construct a new Samples struct from a boxed slice of samples.
    pub fn new(samples: Box<[i16]>) -> Self {
        Self { samples }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Views the samples as raw bytes in native byte order.
    /// On little-endian targets this is the exact byte image of the payload.
    pub fn as_bytes(&self) -> &[u8] {
        cast_slice::<i16, u8>(&self.samples)
    }

    /// Iterates over complete interleaved frames of `n_channels` samples.
    /// A trailing partial frame is not yielded.
    ///
    /// # Panics
    ///
    /// Panics if `n_channels` is 0.
    pub fn frames(&self, n_channels: usize) -> ChunksExact<'_, i16> {
        self.samples.chunks_exact(n_channels)
    }

    pub fn into_inner(self) -> Box<[i16]> {
        self.samples
    }
}

impl AsRef<[i16]> for Samples {
    fn as_ref(&self) -> &[i16] {
        &self.samples
    }
}

impl AsMut<[i16]> for Samples {
    fn as_mut(&mut self) -> &mut [i16] {
        &mut self.samples
    }
}

impl Deref for Samples {
    type Target = [i16];

    fn deref(&self) -> &Self::Target {
        &self.samples
    }
}

impl DerefMut for Samples {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.samples
    }
}

// From Vec
impl From<Vec<i16>> for Samples {
    fn from(samples: Vec<i16>) -> Self {
        Samples {
            samples: samples.into_boxed_slice(),
        }
    }
}

// From Slice
impl From<&[i16]> for Samples {
    fn from(samples: &[i16]) -> Self {
        Samples {
            samples: Box::from(samples),
        }
    }
}

// From boxed slice
impl From<Box<[i16]>> for Samples {
    fn from(samples: Box<[i16]>) -> Self {
        Samples { samples }
    }
}

#[cfg(feature = "colored")]
impl Display for Samples {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (idx, sample) in self.samples.iter().enumerate() {
            writeln!(
                f,
                "{} {}",
                format!("data {}:", idx).green().bold(),
                sample.to_string().white()
            )?;
        }
        Ok(())
    }
}

#[cfg(not(feature = "colored"))]
impl Display for Samples {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (idx, sample) in self.samples.iter().enumerate() {
            writeln!(f, "data {}: {}", idx, sample)?;
        }
        Ok(())
    }
}
