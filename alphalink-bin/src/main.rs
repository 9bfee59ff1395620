mod batch;

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use alphalink::{hamming_cost, majority_cost, Metric, Mode};
use clap::{Parser, ValueEnum};

use crate::batch::{run_batch, BatchConfig};

/// Sweep a parametric linkage interpolation over a labeled dataset and
/// report how well each resulting dendrogram recovers the ground-truth
/// labels at a fixed cluster count.
#[derive(Parser, Debug)]
#[command(name = "alphalink", max_term_width = 100)]
struct Args {
    /// CSV file of labeled points: one `label,feature_1,feature_2,...`
    /// row per point. Required unless --input-dir is given.
    input: Option<PathBuf>,

    /// Evaluate every CSV file in this directory instead of a single
    /// input file.
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Which pair of linkage rules to interpolate between.
    #[arg(long, value_enum, default_value = "sc")]
    mode: ModeArg,

    /// Which distance function seeds the dissimilarity matrix.
    #[arg(long, value_enum, default_value = "euclidean")]
    metric: MetricArg,

    /// Scale the seeded dissimilarity matrix so its largest entry is 1.
    #[arg(long)]
    normalize: bool,

    /// Which cost function scores a pruned dendrogram against ground
    /// truth.
    #[arg(long, value_enum, default_value = "majority")]
    cost: CostArg,

    /// The number of clusters to prune each dendrogram down to.
    #[arg(short = 'k', long, default_value_t = 2)]
    clusters: usize,

    /// Restrict the dataset to this comma-separated subset of labels.
    #[arg(long, value_delimiter = ',')]
    labels: Option<Vec<usize>>,

    /// Cap the number of points kept per label (earliest rows win).
    #[arg(long)]
    points_per_label: Option<usize>,

    /// Which disjoint window of `points_per_label` points to keep per
    /// label, counting from 0. Ignored unless --points-per-label is set.
    #[arg(long, default_value_t = 0)]
    batch_id: usize,

    /// In --input-dir mode, average costs across files into one summary
    /// row per interval region instead of one row per file per interval.
    #[arg(long)]
    average: bool,

    /// Print phase timings to stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Write output here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeArg {
    /// Single linkage at alpha=0, complete linkage at alpha=1.
    Sc,
    /// Single linkage at alpha=0, average linkage at alpha=1.
    Sa,
    /// Average linkage at alpha=0, complete linkage at alpha=1.
    Ac,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Mode {
        match arg {
            ModeArg::Sc => Mode::SingleComplete,
            ModeArg::Sa => Mode::SingleAverage,
            ModeArg::Ac => Mode::AverageComplete,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum MetricArg {
    Euclidean,
    Cosine,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Metric {
        match arg {
            MetricArg::Euclidean => Metric::Euclidean,
            MetricArg::Cosine => Metric::Cosine,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CostArg {
    Majority,
    Hamming,
}

/// A single row of output: the cost of pruning the dendrogram that holds
/// over `[alpha_min, alpha_max)` down to the requested number of
/// clusters.
#[derive(Debug, serde::Serialize)]
pub(crate) struct IntervalCost {
    pub(crate) alpha_min: f64,
    pub(crate) alpha_max: f64,
    pub(crate) cost: f64,
}

fn cost_fn(arg: CostArg) -> fn(&alphalink::Node, usize) -> alphalink::Result<f64> {
    match arg {
        CostArg::Majority => majority_cost,
        CostArg::Hamming => hamming_cost,
    }
}

fn run(args: Args) -> io::Result<()> {
    let cost = cost_fn(args.cost);
    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    let mut csvwtr = csv::Writer::from_writer(&mut writer);

    if let Some(dir) = &args.input_dir {
        let config = BatchConfig {
            mode: args.mode.into(),
            metric: args.metric.into(),
            normalize: args.normalize,
            clusters: args.clusters,
            labels: args.labels.clone(),
            points_per_label: args.points_per_label,
            batch_id: args.batch_id,
            average: args.average,
        };
        let start = Instant::now();
        let rows = run_batch(dir, &config, cost)?;
        if args.verbose {
            eprintln!("batch evaluation took: {:?}", start.elapsed());
        }
        for row in rows {
            csvwtr.serialize(row)?;
        }
    } else {
        let input = args.input.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "an input file or --input-dir is required",
            )
        })?;
        let points = batch::load_points(
            &input,
            args.labels.as_deref(),
            args.points_per_label,
            args.batch_id,
        )?;

        let start = Instant::now();
        let rows = batch::evaluate(
            &points,
            args.mode.into(),
            args.metric.into(),
            args.normalize,
            args.clusters,
            cost,
        )?;
        if args.verbose {
            eprintln!("enumeration took: {:?}", start.elapsed());
        }
        for row in rows {
            csvwtr.serialize(row)?;
        }
    }

    csvwtr.flush()?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("{}", err);
        process::exit(1);
    }
}
