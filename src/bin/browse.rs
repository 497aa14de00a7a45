//! Terminal front end for the snippet API.

use clap::Parser;
use snippet_catalog::infra::config;
use snippet_catalog::{Snippet, SnippetClient, SnippetQuery};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "browse")]
#[command(about = "Browse the snippet catalog from the terminal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// API base URL (defaults to SNIPPET_API_URL or http://localhost:3000)
    #[arg(long)]
    api_url: Option<String>,

    /// Show one snippet, including its write-up when it has one
    #[arg(long, conflicts_with_all = ["categories", "languages"])]
    id: Option<String>,

    /// List every category instead of snippets
    #[arg(long, conflicts_with = "languages")]
    categories: bool,

    /// List every language instead of snippets
    #[arg(long)]
    languages: bool,

    /// Text matched against title, code, category and language
    #[arg(short, long)]
    search: Option<String>,

    #[arg(short, long)]
    category: Option<String>,

    #[arg(short, long)]
    language: Option<String>,

    /// Maximum number of snippets to list
    #[arg(short = 'n', long)]
    limit: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    // Quiet by default; the client logs its own failures at error level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let api_url = args.api_url.unwrap_or_else(config::api_url);
    let client = SnippetClient::new(&api_url)?;

    if let Some(id) = args.id {
        match client.fetch_snippet_by_id(&id).await {
            Some(snippet) => print_detail(&snippet),
            None => println!("Snippet '{}' not found.", id),
        }
    } else if args.categories {
        print_tags("categories", client.fetch_categories().await);
    } else if args.languages {
        print_tags("languages", client.fetch_languages().await);
    } else {
        let query = SnippetQuery {
            search: args.search,
            category: args.category,
            language: args.language,
            limit: args.limit,
        };
        let snippets = client.fetch_snippets(&query).await;
        if snippets.is_empty() {
            println!("No snippets found.");
        }
        for snippet in &snippets {
            print_summary(snippet);
        }
    }

    Ok(())
}

fn print_summary(snippet: &Snippet) {
    let more = if snippet.has_details() { "  [read more]" } else { "" };
    println!(
        "{:>36}  {}  ({} / {}){}",
        snippet.id, snippet.title, snippet.language, snippet.category, more
    );
}

fn print_detail(snippet: &Snippet) {
    println!("{}", snippet.title);
    println!("language: {}  category: {}", snippet.language, snippet.category);
    if let Some(link) = &snippet.github_link {
        println!("source:   {}", link);
    }
    println!();
    println!("{}", snippet.code);
    if let Some(markdown) = snippet.markdown_content.as_deref().filter(|_| snippet.has_details()) {
        println!();
        println!("{}", markdown);
    }
}

fn print_tags(kind: &str, tags: Vec<String>) {
    if tags.is_empty() {
        println!("No {} found.", kind);
    }
    for tag in tags {
        println!("{}", tag);
    }
}
