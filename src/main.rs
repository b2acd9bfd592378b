use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use icd_extract::utils::logging::console::print_report;
use icd_extract::utils::logging::{
    create_main_progress_bar, create_spinner, finish_progress_bar, log_operation_complete,
    log_operation_start,
};
use icd_extract::{
    ExtractionConfig, InputSource, TextConfig, run_fixed_width_pipeline, run_text_document,
    sink_for_path,
};

#[derive(Parser, Debug)]
#[command(name = "icd-extract", version, about = "Extract and decompose ICD-10-CM codes")]
struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Hide progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract code records from extracted page text (pages separated by form feed)
    Text {
        /// Text file produced by a PDF-to-text converter
        #[arg(short, long)]
        input: PathBuf,
        /// Output file (.csv, or .parquet)
        #[arg(short, long)]
        output: PathBuf,
        /// Process pages in parallel
        #[arg(long)]
        parallel: bool,
        /// Worker threads for parallel processing (implies --parallel)
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Decode a fixed-width order file and decompose its codes
    FixedWidth {
        /// Fixed-width input file
        #[arg(short, long)]
        input: PathBuf,
        /// Output file (.csv, or .parquet)
        #[arg(short, long)]
        output: PathBuf,
        /// Keep only the layout columns
        #[arg(long)]
        no_decompose: bool,
        /// Decode lines in parallel
        #[arg(long)]
        parallel: bool,
    },
}

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ExtractionConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ExtractionConfig::default(),
    };

    match cli.command {
        Command::Text {
            input,
            output,
            parallel,
            threads,
        } => {
            apply_text_flags(&mut config.text, parallel, threads);
            config.validate()?;

            log_operation_start("Extracting code records from", &input);
            let mut sink = sink_for_path(&output)
                .with_context(|| format!("Failed to create output {}", output.display()))?;

            let progress = (!cli.quiet).then(|| create_main_progress_bar(0, Some("pages")));
            let report = run_text_document(
                &InputSource::File(input.clone()),
                &config.text,
                sink.as_mut(),
                progress.as_ref(),
            )
            .with_context(|| format!("Text extraction failed for {}", input.display()))?;
            if let Some(pb) = &progress {
                finish_progress_bar(pb, Some("done"));
            }

            log_operation_complete("extracted", &input, report.records, report.elapsed);
            info!("Saved code records to {}", output.display());
            print_report(&report);
        }
        Command::FixedWidth {
            input,
            output,
            no_decompose,
            parallel,
        } => {
            config.fixed_width.parallel |= parallel;
            if no_decompose {
                config.fixed_width.decompose = false;
            }
            config.validate()?;

            log_operation_start("Decoding fixed-width file", &input);
            let mut sink = sink_for_path(&output)
                .with_context(|| format!("Failed to create output {}", output.display()))?;

            let spinner = (!cli.quiet).then(|| create_spinner(Some("decoding")));
            let report = run_fixed_width_pipeline(
                &InputSource::File(input.clone()),
                &config.fixed_width,
                sink.as_mut(),
            )
            .with_context(|| format!("Fixed-width decoding failed for {}", input.display()))?;
            if let Some(pb) = &spinner {
                finish_progress_bar(pb, Some("done"));
            }

            log_operation_complete("decoded", &input, report.records, report.elapsed);
            info!("Saved decoded records to {}", output.display());
            print_report(&report);
        }
    }

    Ok(())
}

/// Merge `text` command flags into the loaded configuration
///
/// A thread count only matters on the rayon pool, so giving one turns
/// parallel processing on.
fn apply_text_flags(config: &mut TextConfig, parallel: bool, threads: Option<usize>) {
    if threads.is_some() {
        config.threads = threads;
    }
    config.parallel |= parallel || threads.is_some();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_flags(args: &[&str]) -> (bool, Option<usize>) {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Text { parallel, threads, .. } => (parallel, threads),
            Command::FixedWidth { .. } => panic!("expected the text command"),
        }
    }

    #[test]
    fn test_threads_flag_enables_parallel() {
        let (parallel, threads) =
            text_flags(&["icd-extract", "text", "-i", "in.txt", "-o", "out.csv", "--threads", "4"]);
        let mut config = TextConfig::default();
        apply_text_flags(&mut config, parallel, threads);
        assert!(config.parallel);
        assert_eq!(config.threads, Some(4));
    }

    #[test]
    fn test_flags_keep_configured_values() {
        let (parallel, threads) = text_flags(&["icd-extract", "text", "-i", "in.txt", "-o", "out.csv"]);
        let mut config = TextConfig {
            parallel: true,
            threads: Some(3),
            ..TextConfig::default()
        };
        apply_text_flags(&mut config, parallel, threads);
        assert!(config.parallel);
        assert_eq!(config.threads, Some(3));

        let mut sequential = TextConfig::default();
        apply_text_flags(&mut sequential, parallel, threads);
        assert!(!sequential.parallel);
        assert_eq!(sequential.threads, None);
    }
}
