use anyhow::Context;
use clap::Parser;

use snippet_catalog::infra::logging::init_logging;
use snippet_catalog::{AppConfig, FixtureStore, PostgresSnippetStore};

/// Checks that the snippet store is reachable and ready to serve reads.
#[derive(Parser)]
#[command(name = "preflight")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Apply the embedded schema migrations before checking the table
    #[arg(long)]
    migrate: bool,

    /// Insert the built-in fixture snippets if the table is empty
    #[arg(long)]
    seed_fixtures: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config = AppConfig::from_env();
    if config.database_url.is_none() {
        return Err(anyhow::anyhow!(
            "DATABASE_URL must be set for preflight (the API itself would serve fixtures)"
        ));
    }

    println!("> Preflight:");
    println!("  BIND_ADDRESS={}", config.bind_address);
    println!("  STORE_MAX_CONNECTIONS={}", config.store_max_connections);
    println!("  STORE_CONNECT_TIMEOUT_SECS={}", config.store_connect_timeout.as_secs());
    println!("  FIXTURE_FALLBACK={}", config.fixture_fallback);

    let store = PostgresSnippetStore::from_config(&config);

    // Basic connectivity
    let version = store
        .server_version()
        .await
        .context("connect to the snippet store")?;
    println!("  Postgres: {}", version);

    if args.migrate {
        store.migrate().await.context("apply migrations")?;
        println!("  Migrations applied.");
    }

    let count = store
        .count()
        .await
        .context("count snippets (re-run with --migrate if the table is missing)")?;
    println!("  snippets table holds {} rows", count);

    if args.seed_fixtures {
        if count > 0 {
            println!("  Table is not empty, skipping fixture seeding.");
        } else {
            let drafts = FixtureStore::drafts();
            let total = drafts.len();
            for draft in drafts {
                let title = draft.title.clone();
                let stored = store
                    .insert(draft)
                    .await
                    .with_context(|| format!("insert fixture '{}'", title))?;
                println!("  + {} ({})", stored.title, stored.id);
            }
            println!("  Seeded {} fixture snippets.", total);
        }
    }

    println!("> Preflight OK.");
    Ok(())
}
