use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;

use ssim_compare_core::comparison::domain::record_sink::RecordSink;
use ssim_compare_core::comparison::infrastructure::json_lines_record_sink::JsonLinesRecordSink;
use ssim_compare_core::comparison::infrastructure::ssim_comparator::SsimComparator;
use ssim_compare_core::comparison::infrastructure::text_record_sink::TextRecordSink;
use ssim_compare_core::pipeline::compare_streams_use_case::{
    CompareStreamsUseCase, LengthMismatchPolicy,
};
use ssim_compare_core::pipeline::comparison_logger::StdoutComparisonLogger;
use ssim_compare_core::shared::constants::DEFAULT_PROGRESS_EVERY;
use ssim_compare_core::video::domain::frame_reader::DrainPolicy;
use ssim_compare_core::video::infrastructure::ffmpeg_stream::open_stream;

/// Per-frame SSIM between an original video and a transcoded version of it.
///
/// Prints `<index> <keyframe position> <ssim>` for every frame pair, where the
/// keyframe position is the byte offset of the latest keyframe in the
/// transformed file.
#[derive(Parser, Debug)]
#[command(name = "ssim-compare", version)]
struct Cli {
    /// Original (reference) video file.
    reference: PathBuf,

    /// Transformed video file to score against the reference.
    transformed: PathBuf,

    /// End-of-stream drain: single or full.
    #[arg(long, default_value = "full")]
    drain: String,

    /// When one stream has fewer frames: fail or truncate.
    #[arg(long, default_value = "fail")]
    on_length_mismatch: String,

    /// Output format: text or jsonl.
    #[arg(long, default_value = "text")]
    format: String,

    /// Log progress every N frame pairs.
    #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
    progress_every: usize,
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(parse_error_exit_code(&e));
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Help and version requests exit cleanly; any other parse failure is a
/// usage error.
fn parse_error_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    validate(&cli)?;

    let drain = parse_drain(&cli.drain);
    let (reference, reference_meta) = open_stream(&cli.reference, drain)?;
    let (transformed, transformed_meta) = open_stream(&cli.transformed, drain)?;
    log::info!("Reference:   {} ({reference_meta})", cli.reference.display());
    log::info!("Transformed: {} ({transformed_meta})", cli.transformed.display());

    let stdout = BufWriter::new(io::stdout());
    let sink: Box<dyn RecordSink> = if cli.format == "jsonl" {
        Box::new(JsonLinesRecordSink::new(stdout))
    } else {
        Box::new(TextRecordSink::new(stdout))
    };

    let mut use_case = CompareStreamsUseCase::new(
        reference,
        transformed,
        Box::new(SsimComparator::default()),
        sink,
    )
    .with_mismatch_policy(parse_mismatch_policy(&cli.on_length_mismatch))
    .with_logger(Box::new(StdoutComparisonLogger::new(cli.progress_every)))
    .with_total_frames(reference_meta.total_frames);

    use_case.execute()?;
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    for path in [&cli.reference, &cli.transformed] {
        if !path.exists() {
            return Err(format!("Input file not found: {}", path.display()).into());
        }
    }
    if cli.drain != "single" && cli.drain != "full" {
        return Err(format!("Drain must be 'single' or 'full', got '{}'", cli.drain).into());
    }
    if cli.on_length_mismatch != "fail" && cli.on_length_mismatch != "truncate" {
        return Err(format!(
            "Length mismatch policy must be 'fail' or 'truncate', got '{}'",
            cli.on_length_mismatch
        )
        .into());
    }
    if cli.format != "text" && cli.format != "jsonl" {
        return Err(format!("Format must be 'text' or 'jsonl', got '{}'", cli.format).into());
    }
    if cli.progress_every == 0 {
        return Err("Progress interval must be at least 1".into());
    }
    Ok(())
}

fn parse_drain(drain: &str) -> DrainPolicy {
    if drain == "single" {
        DrainPolicy::Single
    } else {
        DrainPolicy::Full
    }
}

fn parse_mismatch_policy(policy: &str) -> LengthMismatchPolicy {
    if policy == "truncate" {
        LengthMismatchPolicy::Truncate
    } else {
        LengthMismatchPolicy::Fail
    }
}
