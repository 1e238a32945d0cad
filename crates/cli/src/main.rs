use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use catalog_store::{CatalogEntry, CatalogStore, EntryField, RecordStore};
use enrichment::{CatalogOrchestrator, EntryOutcome, SyncReport};
use api_client::{FetchConfig, PosterFetcher};
use pipeline::FilterPipeline;
use pipeline::filters::MinimumImdbRatingFilter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// ReelFetch - Movie catalog enrichment
#[derive(Parser, Debug)]
#[command(name = "reel-fetch")]
#[command(about = "Pull trailers and ratings into a local movie catalog", long_about = None)]
struct Cli {
    /// Path to the catalog store file
    #[arg(short, long, default_value = "data/catalog.json")]
    store: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    /// Ratings (OMDb) API key
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true, default_value = "")]
    omdb_api_key: String,

    /// Catalog (TMDB) API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true, default_value = "")]
    tmdb_api_key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Enrich every entry of a type and prune poorly rated ones
    Sync {
        /// Entry type to sync (e.g. "popular")
        #[arg(long)]
        kind: String,

        /// Also prune entries rated below this on IMDb
        #[arg(long)]
        min_imdb_rating: Option<f32>,

        /// Do not write the store back to disk
        #[arg(long)]
        dry_run: bool,
    },

    /// List stored entries of a type
    List {
        #[arg(long)]
        kind: String,
    },

    /// Download a poster image
    Poster {
        /// Poster path as stored on the entry (e.g. "/abc.jpg")
        #[arg(long)]
        path: String,

        /// File to write the image to
        #[arg(long)]
        output: PathBuf,
    },
}

impl Cli {
    fn fetch_config(&self) -> FetchConfig {
        FetchConfig::new(self.omdb_api_key.clone(), self.tmdb_api_key.clone())
            .with_request_timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.fetch_config();

    match cli.command {
        Commands::Sync {
            kind,
            min_imdb_rating,
            dry_run,
        } => handle_sync(&cli.store, &config, &kind, min_imdb_rating, dry_run).await?,
        Commands::List { kind } => handle_list(&cli.store, &kind)?,
        Commands::Poster { path, output } => handle_poster(&config, &path, &output).await?,
    }

    Ok(())
}

/// Handle the 'sync' command
async fn handle_sync(
    store_path: &Path,
    config: &FetchConfig,
    kind: &str,
    min_imdb_rating: Option<f32>,
    dry_run: bool,
) -> Result<()> {
    println!("Loading catalog from {}...", store_path.display());
    let store = Arc::new(
        CatalogStore::load_from_file(store_path).context("Failed to load catalog store")?,
    );
    println!("{} Loaded {} entries", "✓".green(), store.len());

    let mut extra = FilterPipeline::new();
    if let Some(min) = min_imdb_rating {
        extra = extra.add_filter(MinimumImdbRatingFilter::new(min));
    }
    let orchestrator =
        CatalogOrchestrator::from_config(store.clone(), config)?.with_extra_filters(extra);

    let start = Instant::now();
    let report = orchestrator.fetch_movie_data_with_report(kind).await?;
    println!("{} Synced {:?} in {:?}", "✓".green(), kind, start.elapsed());

    print_report(&report);

    if dry_run {
        println!("{}", "Dry run: store not written".yellow());
    } else {
        store
            .save_to_file(store_path)
            .context("Failed to save catalog store")?;
        println!("{} Saved {}", "✓".green(), store_path.display());
    }
    Ok(())
}

/// Handle the 'list' command
fn handle_list(store_path: &Path, kind: &str) -> Result<()> {
    let store = CatalogStore::load_or_default(store_path).context("Failed to load catalog store")?;
    let entries = store.get_all_where(EntryField::Type, kind)?;

    if entries.is_empty() {
        return Err(anyhow!("No entries of type {:?} in {}", kind, store_path.display()));
    }

    println!("{}", format!("{} entries of type {:?}:", entries.len(), kind).bold().blue());
    for entry in &entries {
        print_entry(entry);
    }
    Ok(())
}

/// Handle the 'poster' command
async fn handle_poster(config: &FetchConfig, path: &str, output: &Path) -> Result<()> {
    let fetcher = PosterFetcher::new(config);
    let poster_path = path.to_string();
    let bytes = tokio::task::spawn_blocking(move || fetcher.fetch_poster(&poster_path))
        .await
        .context("Poster task panicked")?
        .ok_or_else(|| anyhow!("Poster {} could not be downloaded", path))?;

    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "{} Wrote {} bytes to {}",
        "✓".green(),
        bytes.len(),
        output.display()
    );
    Ok(())
}

/// Helper function to print one entry
fn print_entry(entry: &CatalogEntry) {
    let title = entry.title.as_deref().unwrap_or("(untitled)");
    let ratings = match &entry.ratings {
        Some(r) => format!(
            "IMDb {} | RT {}",
            r.imdb_rating().unwrap_or("-"),
            r.rotten_tomatoes_score().unwrap_or("-")
        ),
        None => "unrated".dimmed().to_string(),
    };
    println!("{} {} [{}]", entry.id.to_string().green(), title, ratings);

    if let Some(url) = entry.trailer.as_ref().and_then(|t| t.watch_url()) {
        println!("   Trailer: {}", url);
    }
}

/// Outcome counts in display order
fn summary_rows(report: &SyncReport) -> Vec<(&'static str, usize)> {
    [
        ("Retained", EntryOutcome::Retained),
        ("Pruned", EntryOutcome::Pruned),
        ("Unrated", EntryOutcome::Unrated),
        ("No identifier", EntryOutcome::NoIdentifier),
        ("Skipped", EntryOutcome::Skipped),
        ("Missing", EntryOutcome::Missing),
        ("Not deleted", EntryOutcome::DeleteFailed),
    ]
    .into_iter()
    .map(|(label, outcome)| (label, report.count(outcome)))
    .collect()
}

/// Helper function to summarise a sync
fn print_report(report: &SyncReport) {
    print!("{}", "Sync summary:\n".bold().blue());
    for (label, count) in summary_rows(report) {
        println!("{}{}: {}", "• ".cyan(), label, count);
    }
    println!("{}Trailers attached: {}", "• ".cyan(), report.trailers_attached);

    if !report.pruned_ids().is_empty() {
        println!("Pruned: {}", report.pruned_ids().join(", ").red());
    }

    for entry in &report.entries {
        print_entry(entry);
    }
}
