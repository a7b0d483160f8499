//! Command implementations and argument parsing for the `knng` CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use knng_core::{
    Knn, KnnBuilder, KnnError, KnnParams, KnnResult, SimilarityComputer, TerminationFlag,
    VectorMetric, define_error_codes,
};
use knng_providers_dense::{DenseProviderError, DenseSimilarity, DenseVectors};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "knng",
    about = "Build an approximate k-nearest-neighbour graph with NN-Descent."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build the graph for a vector source and print its edges.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Engine parameters.
    #[command(flatten)]
    pub params: ParamArgs,

    /// Similarity metric applied to vector pairs.
    #[arg(long, value_enum, default_value_t = MetricArg::Euclidean)]
    pub metric: MetricArg,

    /// Abort when a row has no vector instead of leaving it unconnected.
    #[arg(long)]
    pub require_vectors: bool,

    /// Vector source.
    #[command(subcommand)]
    pub source: RunSource,
}

/// NN-Descent parameters, mapped one-to-one onto [`KnnBuilder`].
#[derive(Debug, Args, Clone)]
pub struct ParamArgs {
    /// Neighbours kept per node.
    #[arg(short = 'k', long, default_value_t = 10)]
    pub top_k: usize,

    /// Upper bound on refinement iterations.
    #[arg(long, default_value_t = 100)]
    pub max_iterations: usize,

    /// Fraction of each list sampled per iteration, in `(0, 1]`.
    #[arg(long, default_value_t = 0.5)]
    pub sample_rate: f64,

    /// Early termination threshold, in `[0, 1]`.
    #[arg(long, default_value_t = 0.001)]
    pub delta_threshold: f64,

    /// Random candidates offered to every node per iteration.
    #[arg(long, default_value_t = 10)]
    pub random_joins: usize,

    /// Worker threads.
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Seed for reproducible runs; entropy-seeded when absent.
    #[arg(long)]
    pub random_seed: Option<u64>,

    /// Similarities below this value are never kept.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub similarity_cutoff: f64,

    /// Probability that a tied candidate replaces the weakest neighbour.
    #[arg(long, default_value_t = 0.0)]
    pub perturbation_rate: f64,
}

impl ParamArgs {
    fn to_builder(&self) -> KnnBuilder {
        let builder = KnnBuilder::new()
            .with_top_k(self.top_k)
            .with_max_iterations(self.max_iterations)
            .with_sample_rate(self.sample_rate)
            .with_delta_threshold(self.delta_threshold)
            .with_random_joins(self.random_joins)
            .with_concurrency(self.concurrency)
            .with_similarity_cutoff(self.similarity_cutoff)
            .with_perturbation_rate(self.perturbation_rate);
        match self.random_seed {
            Some(seed) => builder.with_random_seed(seed),
            None => builder,
        }
    }
}

impl Default for ParamArgs {
    fn default() -> Self {
        let defaults = KnnParams::default();
        Self {
            top_k: defaults.top_k(),
            max_iterations: defaults.max_iterations(),
            sample_rate: defaults.sample_rate(),
            delta_threshold: defaults.delta_threshold(),
            random_joins: defaults.random_joins(),
            concurrency: defaults.concurrency(),
            random_seed: defaults.random_seed(),
            similarity_cutoff: defaults.similarity_cutoff(),
            perturbation_rate: defaults.perturbation_rate(),
        }
    }
}

/// Vector metrics selectable on the command line.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum MetricArg {
    /// Cosine of the angle between vectors.
    Cosine,
    /// `1 / (1 + euclidean distance)`.
    Euclidean,
    /// Pearson correlation.
    Pearson,
}

impl From<MetricArg> for VectorMetric {
    fn from(metric: MetricArg) -> Self {
        match metric {
            MetricArg::Cosine => Self::Cosine,
            MetricArg::Euclidean => Self::Euclidean,
            MetricArg::Pearson => Self::Pearson,
        }
    }
}

/// Input sources for the `run` command.
#[derive(Debug, Subcommand, Clone)]
pub enum RunSource {
    /// Read a Parquet file containing a `FixedSizeList<Float32, D>` column.
    Parquet(ParquetArgs),
    /// Read one comma- or whitespace-separated vector per line.
    Text(TextArgs),
}

/// Parquet ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct ParquetArgs {
    /// Path to the Parquet file.
    pub path: PathBuf,

    /// Column containing `FixedSizeList<Float32, D>` rows.
    #[arg(long)]
    pub column: String,

    /// Override name for the source (defaults to the file stem).
    #[arg(long)]
    pub name: Option<String>,
}

/// Text ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct TextArgs {
    /// Path to the text file. Blank lines are rows without a vector.
    pub path: PathBuf,

    /// Override name for the source (defaults to the file stem).
    #[arg(long)]
    pub name: Option<String>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Opening an input file failed.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Vector ingestion failed.
    #[error(transparent)]
    Dense(#[from] DenseProviderError),
    /// Configuring or running the engine failed.
    #[error(transparent)]
    Core(#[from] KnnError),
}

define_error_codes! {
    /// Stable codes describing [`CliError`] variants.
    enum CliErrorCode for CliError {
        /// Opening an input file failed.
        Io => Io { .. } => "CLI_IO",
        /// Vector ingestion failed.
        Dense => Dense { .. } => "CLI_DENSE",
        /// The engine failed.
        Core => Core { .. } => "CLI_CORE",
    }
}

impl CliError {
    /// Returns the code of the wrapped library error, if any.
    #[must_use]
    pub fn source_code(&self) -> Option<&'static str> {
        match self {
            Self::Io { .. } => None,
            Self::Dense(err) => Some(err.code().as_str()),
            Self::Core(err) => Some(err.code().as_str()),
        }
    }
}

/// Outcome of a `run` command.
#[derive(Debug)]
pub struct ExecutionSummary {
    /// Name of the vector source.
    pub data_source: String,
    /// Metric used for scoring.
    pub metric: VectorMetric,
    /// Rows without a vector.
    pub missing_rows: usize,
    /// Graph produced by the engine.
    pub result: KnnResult,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the source or running the engine fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use knng_cli::cli::{Cli, Command, MetricArg, ParamArgs, RunCommand, RunSource, TextArgs, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0,0\n1,0\n5,0\n")?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         params: ParamArgs {
///             top_k: 1,
///             concurrency: 1,
///             random_joins: 30,
///             random_seed: Some(1),
///             ..ParamArgs::default()
///         },
///         metric: MetricArg::Euclidean,
///         require_vectors: false,
///         source: RunSource::Text(TextArgs { path: file.path().to_path_buf(), name: None }),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.result.neighbours_of(2).collect::<Vec<_>>(), vec![1]);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(top_k = field::Empty, metric = field::Empty, source = field::Empty),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let RunCommand {
        params,
        metric,
        require_vectors,
        source,
    } = command;
    let knn = params.to_builder().build()?;
    let metric = VectorMetric::from(metric);

    let span = Span::current();
    span.record("top_k", params.top_k);
    span.record("metric", field::display(metric));

    let vectors = match source {
        RunSource::Parquet(args) => {
            span.record("source", field::display("parquet"));
            load_parquet(args)?
        }
        RunSource::Text(args) => {
            span.record("source", field::display("text"));
            load_text(args)?
        }
    };
    let missing_rows = vectors.missing_rows();
    let mut computer = vectors.with_metric(metric);
    if require_vectors {
        computer = computer.require_vectors();
    }

    let summary = execute(&knn, &computer, missing_rows)?;
    info!(
        data_source = summary.data_source.as_str(),
        nodes = summary.result.node_count(),
        edges = summary.result.total_pair_count(),
        "command completed"
    );
    Ok(summary)
}

fn execute(
    knn: &Knn,
    computer: &DenseSimilarity,
    missing_rows: usize,
) -> Result<ExecutionSummary, CliError> {
    let result = knn.run(computer, &TerminationFlag::new())?;
    Ok(ExecutionSummary {
        data_source: computer.name().to_owned(),
        metric: computer.metric(),
        missing_rows,
        result,
    })
}

#[instrument(
    name = "cli.load_parquet",
    err,
    skip(args),
    fields(path = field::Empty, column = field::Empty, override_name = field::Empty),
)]
pub(super) fn load_parquet(args: ParquetArgs) -> Result<DenseVectors, CliError> {
    let ParquetArgs { path, column, name } = args;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    span.record("column", field::display(&column));
    span.record(
        "override_name",
        field::display(name.as_deref().unwrap_or("<derived>")),
    );
    let chosen_name = derive_data_source_name(&path, name.as_deref());
    let file = open_file(&path)?;
    Ok(DenseVectors::try_from_parquet_reader(
        chosen_name,
        file,
        &column,
    )?)
}

#[instrument(
    name = "cli.load_text",
    err,
    skip(args),
    fields(path = field::Empty, override_name = field::Empty),
)]
pub(super) fn load_text(args: TextArgs) -> Result<DenseVectors, CliError> {
    let TextArgs { path, name } = args;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    span.record(
        "override_name",
        field::display(name.as_deref().unwrap_or("<derived>")),
    );
    let chosen_name = derive_data_source_name(&path, name.as_deref());
    let reader = BufReader::new(open_file(&path)?);
    Ok(DenseVectors::try_from_text_reader(chosen_name, reader)?)
}

#[instrument(name = "cli.open_file", err, skip(path), fields(path = field::Empty))]
pub(super) fn open_file(path: &Path) -> Result<File, CliError> {
    Span::current().record("path", field::display(path.display()));
    File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "data_source".to_owned(), ToOwned::to_owned)
}

/// Renders `summary` as a metadata header followed by tab-separated
/// `source target similarity` rows.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use knng_cli::cli::{ExecutionSummary, render_summary};
/// # use knng_core::{KnnResult, VectorMetric};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     data_source: "demo".into(),
///     metric: VectorMetric::Cosine,
///     missing_rows: 0,
///     result: KnnResult::empty(2),
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.starts_with("data source: demo\n"));
/// assert!(text.contains("edges: 0\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let result = &summary.result;
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "metric: {}", summary.metric)?;
    writeln!(writer, "nodes: {}", result.node_count())?;
    writeln!(writer, "missing rows: {}", summary.missing_rows)?;
    writeln!(writer, "iterations: {}", result.ran_iterations())?;
    writeln!(writer, "converged: {}", result.did_converge())?;
    writeln!(writer, "node pairs considered: {}", result.node_pairs_considered())?;
    writeln!(writer, "edges: {}", result.total_pair_count())?;
    for pair in result.similarity_pairs() {
        writeln!(writer, "{}\t{}\t{}", pair.source, pair.target, pair.similarity)?;
    }
    Ok(())
}
