//! Ranks the pages of an HTML corpus by sampling and by iteration.

use anyhow::{Context, Result};
use clap::Parser;
use link_rank::{
    page_rank::{iterated, sampled, IteratedPageRank, PageRank, SampledPageRank},
    Distribution, DEFAULT_DAMPING,
};
use rand::{rngs::SmallRng, SeedableRng};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "link-rank", version, about = "Rank HTML pages by their links")]
struct Cli {
    /// Directory holding the `.html` pages
    corpus: PathBuf,

    /// Probability of following a link rather than jumping to a random page
    #[arg(long, env = "LINK_RANK_DAMPING", default_value_t = DEFAULT_DAMPING)]
    damping: f64,

    /// Number of random surfer steps
    #[arg(long, env = "LINK_RANK_SAMPLES", default_value_t = sampled::Config::default().samples)]
    samples: usize,

    /// Seed for a reproducible random walk
    #[arg(long, env = "LINK_RANK_SEED")]
    seed: Option<u64>,

    /// Largest per-page change at which iteration stops
    #[arg(long, env = "LINK_RANK_THRESHOLD", default_value_t = iterated::Config::default().epsilon)]
    threshold: f64,

    /// Give up iterating after this many sweeps
    #[arg(long, env = "LINK_RANK_MAX_ITERATIONS", default_value_t = iterated::Config::default().max_iterations)]
    max_iterations: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let corpus = link_rank::crawl(&cli.corpus)
        .with_context(|| format!("failed to read corpus {}", cli.corpus.display()))?;

    let config = sampled::Config {
        damping: cli.damping,
        samples: cli.samples,
    };
    let ranks = match cli.seed {
        Some(seed) => {
            SampledPageRank::new(&corpus, &config, SmallRng::seed_from_u64(seed))?.calc()?
        }
        None => SampledPageRank::new(&corpus, &config, rand::rng())?.calc()?,
    };
    print_ranks(
        &format!("PageRank Results from Sampling (n = {})", cli.samples),
        &ranks.page_rank,
    );

    let config = iterated::Config {
        damping: cli.damping,
        epsilon: cli.threshold,
        max_iterations: cli.max_iterations,
        ..iterated::Config::default()
    };
    let ranks = IteratedPageRank::new(&corpus, &config)?.calc()?;
    print_ranks("PageRank Results from Iteration", &ranks.page_rank);
    Ok(())
}

fn print_ranks(title: &str, ranks: &Distribution<String>) {
    let mut pages: Vec<_> = ranks.iter().collect();
    pages.sort_by(|a, b| a.0.cmp(b.0));
    println!("{title}");
    for (page, rank) in pages {
        println!("  {page}: {rank:.4}");
    }
}
