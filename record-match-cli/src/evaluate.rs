use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use record_match::dataset;
use record_match::evaluate::{self, ConfusionMatrix};

#[derive(Parser, Debug)]
#[clap(
    name = "evaluate",
    about = "A program to evaluate validated match decisions."
)]
struct Args {
    /// File path to a result table whose TRUE_MATCH column has been filled in.
    /// Rows without TRUE_MATCH or BEST_MATCH_BINARY are skipped.
    #[clap(short = 'i', long)]
    input_path: PathBuf,

    /// File path to write the metrics. If None, the metrics are written to stdout.
    #[clap(short = 'o', long)]
    output_path: Option<PathBuf>,

    /// File path to write the confusion matrix.
    #[clap(long)]
    confusion_path: Option<PathBuf>,

    /// Field delimiter of the input and output tables.
    #[clap(short = 'd', long, default_value = ",")]
    delimiter: char,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let delimiter = dataset::delimiter_byte(args.delimiter)?;

    let file = File::open(&args.input_path)
        .with_context(|| format!("Could not open {}", args.input_path.display()))?;
    let labels = evaluate::read_labels(BufReader::new(file), delimiter)
        .with_context(|| format!("Could not read {}", args.input_path.display()))?;

    let matrix = ConfusionMatrix::from_pairs(labels.iter().copied());
    info!(
        "Evaluated {} of {} rows: tp={}, fp={}, tn={}, fn={}",
        matrix.total(),
        labels.len(),
        matrix.true_positive,
        matrix.false_positive,
        matrix.true_negative,
        matrix.false_negative
    );
    let metrics = matrix.metrics();
    if metrics.roc_auc.is_none() {
        info!("ROC-AUC is undefined since only one class is present");
    }

    if let Some(path) = &args.confusion_path {
        let file =
            File::create(path).with_context(|| format!("Could not create {}", path.display()))?;
        let mut wtr = BufWriter::new(file);
        evaluate::write_confusion_matrix(&matrix, &mut wtr, delimiter)?;
        wtr.flush()?;
        info!("Wrote the confusion matrix to {}", path.display());
    }

    match &args.output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Could not create {}", path.display()))?;
            let mut wtr = BufWriter::new(file);
            evaluate::write_metrics(&metrics, &mut wtr, delimiter)?;
            wtr.flush()?;
        }
        None => evaluate::write_metrics(&metrics, io::stdout().lock(), delimiter)?,
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
