//! Generate command implementation
//!
//! Prints points from any of the workspace's sequences.

use std::io::Write;
use std::path::{Path, PathBuf};

use qrng_core::prng::{MersenneTwister32, MersenneTwister64};
use qrng_core::traits::PointSequence;
use qrng_core::transform::{
    DoubleSequence32, DoubleSequence64, Interval, PointsFromDoubles, Resolution,
};
use qrng_quasi::halton::HaltonSequence;
use qrng_quasi::sobol::{PackedDirectionNumbers, SobolSequence};
use serde::Serialize;
use tracing::info;

use crate::config::OutputFormat;
use crate::error::require_file;
use crate::{CliError, Result};

/// Sequence families available to `qrng generate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SequenceKind {
    /// Sobol with Joe & Kuo direction numbers
    Sobol,
    /// Halton over the first primes
    Halton,
    /// 32-bit Mersenne Twister at 53-bit double resolution
    Mt32,
    /// 64-bit Mersenne Twister
    Mt64,
}

/// Options for one `generate` run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub sequence: SequenceKind,
    pub dimensions: usize,
    pub count: usize,
    /// RR2 scrambling; Halton only
    pub scramble: bool,
    /// Halton skip
    pub skip: u32,
    /// Halton leap
    pub leap: u32,
    /// Mersenne Twister seed
    pub seed: u64,
    /// Packed direction table; Sobol only
    pub table: Option<PathBuf>,
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct PointRecord<'a> {
    index: usize,
    point: &'a [f64],
}

/// Run the generate command, printing to stdout
pub fn run(options: &GenerateOptions) -> Result<()> {
    info!("Generating points...");
    info!("  Sequence: {:?}", options.sequence);
    info!("  Dimensions: {}", options.dimensions);
    info!("  Count: {}", options.count);
    info!("  Output format: {:?}", options.format);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    generate(options, &mut out)
}

/// Builds the requested sequence and writes `count` points to `out`
pub fn generate<W: Write>(options: &GenerateOptions, out: &mut W) -> Result<()> {
    let mut sequence = build_sequence(options)?;
    let mut point = vec![0.0; options.dimensions];

    match options.format {
        OutputFormat::Table => {
            write!(out, "{:>8}", "index")?;
            for d in 1..=options.dimensions {
                write!(out, " {:>12}", format!("x{}", d))?;
            }
            writeln!(out)?;
            for index in 0..options.count {
                sequence.fill_point(&mut point);
                write!(out, "{:>8}", index)?;
                for x in &point {
                    write!(out, " {:>12.10}", x)?;
                }
                writeln!(out)?;
            }
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            let mut header = vec!["index".to_string()];
            header.extend((1..=options.dimensions).map(|d| format!("x{}", d)));
            writer.write_record(&header)?;
            for index in 0..options.count {
                sequence.fill_point(&mut point);
                let mut record = vec![index.to_string()];
                record.extend(point.iter().map(f64::to_string));
                writer.write_record(&record)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            let mut records = Vec::with_capacity(options.count);
            for _ in 0..options.count {
                sequence.fill_point(&mut point);
                records.push(point.clone());
            }
            let records: Vec<PointRecord<'_>> = records
                .iter()
                .enumerate()
                .map(|(index, point)| PointRecord { index, point })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &records)?;
            writeln!(out)?;
        }
    }

    info!(points = options.count, "Generation complete");
    Ok(())
}

fn build_sequence(options: &GenerateOptions) -> Result<Box<dyn PointSequence>> {
    if options.scramble && options.sequence != SequenceKind::Halton {
        return Err(CliError::InvalidArgument(
            "--scramble applies to the halton sequence only".to_string(),
        ));
    }
    if options.table.is_some() && options.sequence != SequenceKind::Sobol {
        return Err(CliError::InvalidArgument(
            "a direction table applies to the sobol sequence only".to_string(),
        ));
    }

    let dims = options.dimensions;
    let sequence: Box<dyn PointSequence> = match options.sequence {
        SequenceKind::Sobol => match &options.table {
            Some(path) => Box::new(sobol_from_file(path, dims)?),
            None => Box::new(SobolSequence::with_default_table(dims)?),
        },
        SequenceKind::Halton => Box::new(
            HaltonSequence::builder(dims)
                .scrambled(options.scramble)
                .skip(options.skip)
                .leap(options.leap)
                .build()?,
        ),
        SequenceKind::Mt32 => {
            check_dimensions(dims)?;
            // MT19937 seeds are 32-bit; the upper half of `seed` is ignored.
            let twister = MersenneTwister32::new(options.seed as u32);
            let doubles =
                DoubleSequence32::new(Interval::ZeroClosedOneOpen, Resolution::Bits53, twister);
            Box::new(PointsFromDoubles::new(doubles, dims))
        }
        SequenceKind::Mt64 => {
            check_dimensions(dims)?;
            let twister = MersenneTwister64::new(options.seed);
            let doubles = DoubleSequence64::new(Interval::ZeroClosedOneOpen, twister);
            Box::new(PointsFromDoubles::new(doubles, dims))
        }
    };
    Ok(sequence)
}

fn sobol_from_file(path: &Path, dims: usize) -> Result<SobolSequence> {
    require_file(path)?;
    info!("  Direction table: {}", path.display());
    let table = PackedDirectionNumbers::from_path(path, dims)?;
    Ok(SobolSequence::new(&table, dims)?)
}

fn check_dimensions(dims: usize) -> Result<()> {
    if dims == 0 {
        return Err(qrng_core::SequenceError::out_of_range(
            "dimensions",
            dims,
            "must be at least 1",
        )
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn options(sequence: SequenceKind, format: OutputFormat) -> GenerateOptions {
        GenerateOptions {
            sequence,
            dimensions: 3,
            count: 4,
            scramble: false,
            skip: 0,
            leap: 1,
            seed: 5489,
            table: None,
            format,
        }
    }

    fn render(options: &GenerateOptions) -> String {
        let mut out = Vec::new();
        generate(options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_sobol_csv() {
        let text = render(&options(SequenceKind::Sobol, OutputFormat::Csv));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "index,x1,x2,x3");
        assert_eq!(lines[1], "0,0,0,0");
        assert_eq!(lines[2], "1,0.5,0.5,0.5");
        assert_eq!(lines[3], "2,0.75,0.25,0.25");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_halton_json() {
        let text = render(&options(SequenceKind::Halton, OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let points = value.as_array().unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[1]["index"], 1);
        let second: Vec<f64> = points[1]["point"]
            .as_array()
            .unwrap()
            .iter()
            .map(|x| x.as_f64().unwrap())
            .collect();
        assert_abs_diff_eq!(second[0], 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(second[1], 1.0 / 3.0, epsilon = 1e-15);
        assert_abs_diff_eq!(second[2], 0.2, epsilon = 1e-15);
    }

    #[test]
    fn test_twisters_table() {
        for kind in [SequenceKind::Mt32, SequenceKind::Mt64] {
            let text = render(&options(kind, OutputFormat::Table));
            let lines: Vec<&str> = text.lines().collect();
            assert_eq!(lines.len(), 5);
            assert!(lines[0].trim_start().starts_with("index"));
            for line in &lines[1..] {
                let fields: Vec<f64> = line
                    .split_whitespace()
                    .skip(1)
                    .map(|f| f.parse().unwrap())
                    .collect();
                assert_eq!(fields.len(), 3);
                assert!(fields.iter().all(|x| (0.0..1.0).contains(x)));
            }
        }
    }

    #[test]
    fn test_scramble_rejected_outside_halton() {
        let mut opts = options(SequenceKind::Sobol, OutputFormat::Csv);
        opts.scramble = true;
        assert!(matches!(
            generate(&opts, &mut Vec::new()),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_dimensions() {
        let kinds = [
            SequenceKind::Sobol,
            SequenceKind::Halton,
            SequenceKind::Mt32,
            SequenceKind::Mt64,
        ];
        for kind in kinds {
            let mut opts = options(kind, OutputFormat::Csv);
            opts.dimensions = 0;
            let err = generate(&opts, &mut Vec::new()).unwrap_err();
            assert!(matches!(err, CliError::Sequence(ref e) if e.is_out_of_range()), "{:?}", kind);
        }
    }

    #[test]
    fn test_sobol_beyond_bundled_table() {
        let mut opts = options(SequenceKind::Sobol, OutputFormat::Csv);
        opts.dimensions = qrng_quasi::sobol::BUNDLED_MAX_DIMENSION + 1;
        let err = generate(&opts, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::Sequence(ref e) if e.is_invalid_state()));
    }

    #[test]
    fn test_sobol_from_table_file() {
        let path = std::env::temp_dir().join(format!("qrng-generate-{}.bin", std::process::id()));
        std::fs::write(&path, qrng_quasi::sobol::BUNDLED_TABLE).unwrap();

        let mut opts = options(SequenceKind::Sobol, OutputFormat::Csv);
        opts.table = Some(path.clone());
        let from_file = render(&opts);
        std::fs::remove_file(&path).unwrap();

        opts.table = None;
        assert_eq!(from_file, render(&opts));
    }
}
