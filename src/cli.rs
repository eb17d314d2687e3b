use clap::Parser;

/// Crawl news sources, extract articles, and upsert them into the
/// article store.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Sources to run (repeatable; default: all registered sources)
    #[arg(short, long)]
    pub source: Vec<String>,

    /// Connection string for the article store (defaults to DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Worker-pool width for section (listing) pages
    #[arg(long, default_value_t = 3)]
    pub crawl_concurrency: usize,

    /// Worker-pool width for article pages
    #[arg(long, default_value_t = 5)]
    pub fetch_concurrency: usize,

    /// Run against an in-memory store; nothing is persisted
    #[arg(long)]
    pub dry_run: bool,
}
