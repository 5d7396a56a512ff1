use std::io::Cursor;

use wave_reader::WaveHeader;

#[derive(Debug, Clone, Copy)]
pub struct PayloadBenchConfig {
    pub sample_rate: i32,
    pub n_channels: i16,
    pub n_frames: usize,
}

impl PayloadBenchConfig {
    pub fn n_bytes(&self) -> usize {
        self.n_frames * self.n_channels as usize * 2
    }
}

pub fn generate_bench_configs() -> Vec<PayloadBenchConfig> {
    let mut configs = Vec::new();
    for &n_channels in &[1, 2] {
        for &n_frames in &[1_000, 16_000, 160_000] {
            configs.push(PayloadBenchConfig {
                sample_rate: 16000,
                n_channels,
                n_frames,
            });
        }
    }
    configs
}

/// In-memory wav file holding a 440 Hz sine wave.
pub fn generate_test_wav(config: &PayloadBenchConfig) -> (WaveHeader, Cursor<Vec<u8>>) {
    let n_bytes = config.n_bytes();
    let header = WaveHeader::new(config.sample_rate, config.n_channels, 16, n_bytes as i32);
    let mut bytes = header.as_bytes().to_vec();
    bytes.reserve(n_bytes);
    for i in 0..config.n_frames {
        let t = i as f32 / config.sample_rate as f32;
        let sample = ((t * 440.0 * 2.0 * std::f32::consts::PI).sin() * i16::MAX as f32) as i16;
        for _ in 0..config.n_channels {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
    }
    (header, Cursor::new(bytes))
}
