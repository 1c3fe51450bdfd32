//! Prediction Market Resolver
//!
//! Resolves one market from the hardcoded table:
//! - Fetches data from the proxy mirror, falling back to the vendor API
//! - Applies the market's decision rule
//! - Prints `recommendation: pN` on stdout (logs go to stderr)

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use market_resolver::config::{find_market, get_hardcoded_markets};
use market_resolver::{emitter, Resolver, ResolverConfig, Verdict};

#[derive(Parser)]
#[command(name = "market-resolver")]
#[command(about = "Resolve a prediction market from public data APIs")]
#[command(version)]
struct Cli {
    /// Market id from the built-in table
    #[arg(required_unless_present = "list")]
    market_id: Option<String>,

    /// List known markets and exit
    #[arg(long)]
    list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables once, before anything reads them
    dotenvy::dotenv().ok();

    let directive = if cli.verbose {
        "market_resolver=debug"
    } else {
        "market_resolver=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().context("Invalid log directive")?),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.list {
        for market in get_hardcoded_markets() {
            println!("{:<32} {}", market.id, market.description);
        }
        return Ok(());
    }

    let market_id = cli.market_id.context("Missing market id")?;
    let market =
        find_market(&market_id).with_context(|| format!("Unknown market: {}", market_id))?;
    info!("[RESOLVE] {} | {}", market.id, market.description);

    let verdict = match Resolver::new(ResolverConfig::from_env()) {
        Ok(resolver) => resolver.resolve_or_degrade(&market.query).await,
        Err(e) => {
            error!("[RESOLVE] Resolver setup failed: {}", e);
            Verdict::Insufficient
        }
    };

    let label = market.labels.label(verdict);
    info!("[RESOLVE] Verdict: {} -> {}", verdict, label);
    emitter::emit(label);

    Ok(())
}
