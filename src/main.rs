//! wave-reader - prints the header and samples of a 16-bit PCM wav file
//!
//! # Usage
//!
//! ```bash
//! # Header followed by every sample of the first 15360 payload bytes
//! wave-reader sine1.wav
//!
//! # Read at most 4096 bytes of payload
//! wave-reader --max-bytes 4096 sine1.wav
//!
//! # Header only
//! wave-reader --header-only sine1.wav
//! ```

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;

use clap::Parser;
use log::{debug, info};
use wave_reader::{extract, read_header_from, ReaderSource, WaveResult, DEFAULT_MAX_BYTES};

#[derive(Parser, Debug)]
#[command(name = "wave-reader")]
#[command(about = "Print the header and samples of a 16-bit PCM wav file", long_about = None)]
struct Args {
    /// Wav file to read
    #[arg(value_name = "FILE")]
    file: String,

    /// Maximum number of payload bytes to read
    #[arg(short, long, default_value_t = DEFAULT_MAX_BYTES)]
    max_bytes: usize,

    /// Only print the header
    #[arg(long)]
    header_only: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    info!("Reading {}", args.file);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run(&args, &mut out) {
        eprintln!("Error: failed to read '{}': {}", args.file, e);
        process::exit(1);
    }
}

/// Prints the header as soon as it is decoded, then the samples.
/// A payload failure is reported after the header has been written.
fn run<W: Write>(args: &Args, out: &mut W) -> WaveResult<()> {
    let f = File::open(&args.file)?;
    let mut source = ReaderSource::new(BufReader::new(f));

    let header = read_header_from(&mut source)?;
    write!(out, "{}", header)?;
    out.flush()?;
    if args.header_only {
        return Ok(());
    }

    let declared = usize::try_from(header.sub_chunk2_size()).unwrap_or(0);
    let samples = extract(&header, &mut source, declared, args.max_bytes)?;
    debug!(
        "Payload holds {} bytes, {} read",
        header.sub_chunk2_size(),
        samples.len() * 2
    );
    write!(out, "{}", samples)?;
    writeln!(
        out,
        "Read {} samples ({} channel(s), {} Hz) from {}",
        samples.len(),
        header.n_channels(),
        header.sample_rate(),
        args.file
    )?;
    Ok(())
}
