use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use faceverify_core::{
    Comparator, ComparatorError, Cosine, Feature, Gallery, MeanOverTemplates, NegatedEuclidean,
    PartitionError, Probe, ScoreSet,
};
use faceverify_core::simulate::gaussian;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod config;
mod dataset;
mod report;

use config::{Config, Metric};
use report::Summary;

#[derive(Parser)]
#[command(name = "faceverify", about = "Face verification error-rate evaluation")]
struct Cli {
    /// TOML config file (defaults to $FACEVERIFY_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report EER, FAR and FRR for a JSON score set
    Eer {
        /// JSON file with `genuine` and `impostor` score arrays
        #[arg(short, long)]
        scores: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Score enrolled models against probes, then report EER, FAR and FRR
    Verify {
        /// JSON file with `models` and `probes` feature vectors
        #[arg(short, long)]
        dataset: PathBuf,
        /// Scoring function (overrides config)
        #[arg(short, long, value_enum)]
        metric: Option<Metric>,
        /// Write the computed scores as JSON
        #[arg(long)]
        save_scores: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Draw Gaussian genuine/impostor scores and report on them
    Simulate {
        /// Scores per population
        #[arg(short = 'n', long, default_value_t = 100)]
        count: usize,
        #[arg(long, default_value_t = 1.0)]
        genuine_mean: f64,
        #[arg(long, default_value_t = 0.0)]
        impostor_mean: f64,
        /// Standard deviation of both populations
        #[arg(long, default_value_t = 0.1)]
        sigma: f64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Write the generated scores as JSON
        #[arg(long)]
        save_scores: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Write the ROC curve as CSV (threshold,far,car)
    #[arg(long)]
    roc: Option<PathBuf>,
    /// Thresholds in the ROC sweep (overrides config)
    #[arg(long)]
    points: Option<usize>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!(?config, "effective config");

    match cli.command {
        Commands::Eer { scores, output } => {
            let scores = dataset::load_scores(&scores)?;
            report(&scores, &output, &config)
        }
        Commands::Verify { dataset, metric, save_scores, output } => {
            let metric = metric.unwrap_or(config.metric);
            let (gallery, probes) = dataset::Dataset::load(&dataset)?.into_parts()?;
            let scores = match metric {
                Metric::Euclidean => {
                    score(&gallery, &probes, &MeanOverTemplates::new(NegatedEuclidean), config.parallel)
                }
                Metric::Cosine => score(&gallery, &probes, &MeanOverTemplates::new(Cosine), config.parallel),
            }
            .context("scoring dataset")?;
            if let Some(path) = save_scores {
                dataset::save_scores(&path, &scores)?;
            }
            report(&scores, &output, &config)
        }
        Commands::Simulate {
            count,
            genuine_mean,
            impostor_mean,
            sigma,
            seed,
            save_scores,
            output,
        } => {
            anyhow::ensure!(sigma >= 0.0, "sigma must be non-negative, got {sigma}");
            let mut rng = StdRng::seed_from_u64(seed);
            let genuine = gaussian(&mut rng, genuine_mean, sigma, count);
            let impostor = gaussian(&mut rng, impostor_mean, sigma, count);
            tracing::info!(count, genuine_mean, impostor_mean, sigma, seed, "simulated scores");
            let scores = ScoreSet::new(genuine, impostor);
            if let Some(path) = save_scores {
                dataset::save_scores(&path, &scores)?;
            }
            report(&scores, &output, &config)
        }
    }
}

fn score<C>(
    gallery: &Gallery<String, Vec<Feature>>,
    probes: &[Probe<String, Feature>],
    comparator: &C,
    parallel: bool,
) -> Result<ScoreSet, PartitionError<ComparatorError>>
where
    C: Comparator<Vec<Feature>, Feature, Error = ComparatorError> + Sync,
{
    #[cfg(feature = "parallel")]
    if parallel {
        return faceverify_core::partition_par(gallery, probes, comparator);
    }
    #[cfg(not(feature = "parallel"))]
    if parallel {
        tracing::warn!("built without the `parallel` feature; scoring sequentially");
    }
    faceverify_core::partition(gallery, probes, comparator)
}

fn report(scores: &ScoreSet, output: &OutputArgs, config: &Config) -> Result<()> {
    let eer = scores.eer_report().context("solving EER threshold")?;

    let roc = match &output.roc {
        Some(path) => {
            let curve = scores
                .roc_curve(output.points.unwrap_or(config.roc_points))
                .context("computing ROC curve")?;
            report::save_roc_csv(path, &curve)?;
            Some(curve)
        }
        None => None,
    };

    let summary = Summary::new(eer, roc.as_ref());
    if output.json {
        println!("{}", summary.to_json()?);
    } else {
        println!("{}", summary.to_text(config.precision));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_verify_with_metric() {
        let cli = Cli::try_parse_from(["faceverify", "verify", "-d", "f.json", "--metric", "cosine", "--json"])
            .unwrap();
        match cli.command {
            Commands::Verify { metric, output, .. } => {
                assert_eq!(metric, Some(Metric::Cosine));
                assert!(output.json);
            }
            _ => panic!("expected verify"),
        }
    }

    #[test]
    fn test_score_sequential_and_parallel_agree() {
        let gallery = Gallery::from_entries([
            ("s1".to_string(), vec![Feature::new(vec![0.0, 0.0])]),
            ("s2".to_string(), vec![Feature::new(vec![5.0, 5.0])]),
        ])
        .unwrap();
        let probes = vec![
            Probe::new("s1/1", "s1".to_string(), Feature::new(vec![0.1, 0.0])),
            Probe::new("s2/1", "s2".to_string(), Feature::new(vec![5.0, 4.9])),
        ];
        let cmp = MeanOverTemplates::new(NegatedEuclidean);
        let mut a = score(&gallery, &probes, &cmp, false).unwrap();
        let mut b = score(&gallery, &probes, &cmp, true).unwrap();
        for set in [&mut a, &mut b] {
            set.genuine.sort_by(|x, y| x.total_cmp(y));
            set.impostor.sort_by(|x, y| x.total_cmp(y));
        }
        assert_eq!(a, b);
        assert_eq!(a.eer_report().unwrap().eer, 0.0);
    }
}
