use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use record_match::dataset::{self, ColumnSpec};
use record_match::export;
use record_match::tfidf::{IdfWeights, TfWeights};
use record_match::{MatchConfig, MatchResult, Matcher, Normalizer, Record, SimilarityBackend};

#[derive(Parser, Debug)]
#[clap(
    name = "best-match",
    about = "A program to find the best match of every query record in a corpus."
)]
struct Args {
    /// File path to a CSV file of canonical records, with a header row.
    #[clap(short = 'c', long)]
    corpus_path: PathBuf,

    /// File path to a CSV file of query records, with a header row.
    #[clap(short = 'q', long)]
    query_path: PathBuf,

    /// Similarity backend.
    /// "levenshtein" is the normalized edit distance.
    /// "dice" is the Dice coefficient of character bigrams.
    /// "jaccard" is the Jaccard similarity of words.
    /// "ngram" is the Jaccard similarity of character-bigram counts.
    /// "tfidf" is the cosine similarity of TF-IDF vectors.
    /// "substring" tests containment in either direction.
    #[clap(short = 'a', long)]
    algorithm: Option<SimilarityBackend>,

    /// Cutoff of the binary decision. Defaults to the one of the backend.
    #[clap(short = 't', long)]
    threshold: Option<f64>,

    /// Column of the corpus file. Several columns are joined with '+', e.g. STREET_NAME+STREET_NO.
    #[clap(long)]
    corpus_column: Option<ColumnSpec>,

    /// Column of the query file, in the same form as --corpus-column.
    #[clap(long)]
    query_column: Option<ColumnSpec>,

    /// Field delimiter of the input files and the result table.
    #[clap(short = 'd', long)]
    delimiter: Option<char>,

    /// Number of worker threads (must be more than 0).
    #[clap(short = 'j', long)]
    num_workers: Option<usize>,

    /// Weighting variant of term frequency for "tfidf": "binary", "standard", or "sublinear".
    #[clap(short = 'T', long)]
    tf: Option<TfWeights>,

    /// Weighting variant of inverse document frequency for "tfidf": "unary", "standard", or "smooth".
    #[clap(short = 'I', long)]
    idf: Option<IdfWeights>,

    /// TOML file of default settings. Flags take precedence over it.
    #[clap(long)]
    config: Option<PathBuf>,

    /// File path to write the result table. If None, the table is written to stdout.
    #[clap(short = 'o', long)]
    output_path: Option<PathBuf>,

    /// Logs the progress of long batches.
    #[clap(short = 'p', long)]
    progress: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(num_workers) = args.num_workers {
        config.num_workers = Some(num_workers);
    }
    if let Some(tf) = args.tf {
        config.tf = tf;
    }
    if let Some(idf) = args.idf {
        config.idf = idf;
    }
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    config.shows_progress |= args.progress;
    let delimiter = config.delimiter_byte()?;

    let corpus_column = match args.corpus_column {
        Some(spec) => spec,
        None => config.corpus_column.parse()?,
    };
    let query_column = match args.query_column {
        Some(spec) => spec,
        None => config.query_column.parse()?,
    };

    let mut matcher = Matcher::from_config(&config)?;
    if let Some(threshold) = args.threshold {
        matcher = matcher.threshold(threshold);
    }

    let normalizer = Normalizer::new();
    let corpus = load(&args.corpus_path, &corpus_column, &normalizer, delimiter)?;
    let queries = load(&args.query_path, &query_column, &normalizer, delimiter)?;

    let outcome = matcher.run(&corpus, &queries)?;
    for failure in &outcome.failures {
        info!(
            "Skipped query {} ({:?}): {}",
            failure.query_index, failure.query, failure.reason
        );
    }

    let start = Instant::now();
    match &args.output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Could not create {}", path.display()))?;
            write_table(&outcome.results, BufWriter::new(file), delimiter)?;
        }
        None => write_table(&outcome.results, io::stdout().lock(), delimiter)?,
    }
    info!(
        "Wrote {} rows in {} sec",
        outcome.results.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

fn load(
    path: &Path,
    spec: &ColumnSpec,
    normalizer: &Normalizer,
    delimiter: u8,
) -> Result<Vec<Record>> {
    info!("Loading {}...", path.display());
    let start = Instant::now();
    let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
    let records = dataset::load_records(BufReader::new(file), spec, normalizer, delimiter)
        .with_context(|| format!("Could not load {}", path.display()))?;
    info!(
        "Produced {} records in {} sec",
        records.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(records)
}

fn write_table<W>(results: &[MatchResult], mut wtr: W, delimiter: u8) -> Result<()>
where
    W: Write,
{
    export::write_csv(results, &mut wtr, delimiter)?;
    wtr.flush()?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
