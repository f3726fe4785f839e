mod report;

use careerguess::game::core::matcher::{self, MatchParams};
use careerguess::game::{Catalog, Embedder, TrigramEmbedder};
use clap::Parser;
use report::CatalogReport;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "catalog-check", about = "Inspect a player catalog and probe guess matching")]
struct Args {
    /// Path to the player CSV (Name, Country, Position, CareerPath, Nickname, BirthYear)
    #[arg(short, long, env = "CATALOG_PATH")]
    catalog: PathBuf,

    /// Guess text to evaluate
    #[arg(short, long)]
    guess: Option<String>,

    /// Target player name the guess is checked against
    #[arg(short, long, requires = "guess")]
    target: Option<String>,

    /// Number of ranked players to print for the guess
    #[arg(long, default_value_t = 5)]
    show: usize,

    /// Similarity a correct guess must reach
    #[arg(long, default_value_t = matcher::DEFAULT_MATCH_THRESHOLD)]
    threshold: f32,

    /// How many top-ranked players are checked for the target
    #[arg(long, default_value_t = matcher::DEFAULT_TOP_K)]
    top_k: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let embedder = TrigramEmbedder::default();

    println!("Loading catalog: {:?}", args.catalog);
    let catalog = Catalog::load(&args.catalog, &embedder).await?;

    let report = CatalogReport::from_catalog(&catalog);
    println!();
    println!("{report}");

    let Some(guess) = args.guess else {
        return Ok(());
    };

    let query = embedder.embed(&guess.trim().to_lowercase()).await?;
    println!();
    println!("Closest players to {guess:?}:");
    for (rank, candidate) in matcher::rank(&catalog, &query).iter().take(args.show).enumerate() {
        println!(
            "  {:>2}. {:<30} {:.3}",
            rank + 1,
            candidate.record.name,
            candidate.similarity
        );
    }

    if let Some(target) = args.target {
        let params = MatchParams {
            threshold: args.threshold,
            top_k: args.top_k,
        };
        let result = matcher::match_guess(&guess, &target, &catalog, &embedder, params).await?;
        println!();
        println!("Against target {target:?}:");
        println!("  correct:      {}", result.correct);
        println!("  score:        {:.3}", result.score);
        println!("  matched name: {}", result.matched_name);
    }

    Ok(())
}
