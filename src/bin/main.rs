//! Bibliographic Resolver CLI
//!
//! Command-line tool for resolving identifiers, rendering records and
//! searching the national bibliography store.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use biblio_resolve::render::{search_html, search_rss};
use biblio_resolve::{
    build_query, classify, from_path, negotiate, to_path, Format, HttpStore, ResolveError,
    Resolver, ResolverOptions, DEFAULT_ENDPOINT, DEFAULT_WORK,
};

#[derive(Parser)]
#[command(name = "biblio-resolve")]
#[command(about = "Resolve bibliographic identifiers against a SPARQL store")]
#[command(version)]
struct Cli {
    /// SPARQL endpoint URL
    #[arg(long, global = true, env = "BIBLIO_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Preferred language tag for display names
    #[arg(long, global = true, default_value = "en")]
    lang: String,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an identifier (or served path) and render the record
    Show(ShowArgs),
    /// Free-text search; every word must match
    Search(SearchArgs),
    /// Print the kind and served path of an identifier
    Classify {
        /// Identifier to classify
        identifier: String,
    },
    /// Print the query that would fetch an identifier, without running it
    Query {
        /// Identifier to build the query for
        identifier: String,
    },
}

#[derive(Args)]
struct ShowArgs {
    /// Identifier or served path such as /bib/me/W00009584100
    identifier: Option<String>,

    /// Output format: rdf, ttl, nt, json or html
    #[arg(short, long, conflicts_with = "accept")]
    format: Option<String>,

    /// Choose the format from an Accept header value instead
    #[arg(long)]
    accept: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct SearchArgs {
    /// Search words
    #[arg(required = true)]
    text: Vec<String>,

    /// Maximum number of results
    #[arg(short, long)]
    limit: Option<usize>,

    /// Emit an RSS feed instead of HTML
    #[arg(long)]
    rss: bool,

    /// Base URL for feed item links
    #[arg(long, default_value = "http://data.nationallibrary.fi")]
    base_url: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Write output to file or stdout
fn write_output(content: &str, output: Option<&PathBuf>) -> Result<(), ResolveError> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

/// Accept either a full identifier or a served path
fn identifier_from_arg(arg: &str) -> String {
    if arg.starts_with('/') {
        from_path(arg).unwrap_or_else(|| arg.to_string())
    } else {
        arg.to_string()
    }
}

fn run_show(resolver: &Resolver<HttpStore>, args: ShowArgs) -> Result<(), ResolveError> {
    let format = match (&args.format, &args.accept) {
        (Some(token), _) => Format::from_token(token)?,
        (None, accept) => negotiate(accept.as_deref()),
    };

    let identifier = args
        .identifier
        .as_deref()
        .map(identifier_from_arg)
        .unwrap_or_else(|| DEFAULT_WORK.to_string());

    let resource = resolver.resolve(&identifier)?;
    tracing::info!(
        identifier = %identifier,
        kind = %resource.kind(),
        format = %format,
        "resolved"
    );

    let output = resource.serialize(format)?;
    write_output(&output, args.output.as_ref())
}

fn run_search(resolver: &Resolver<HttpStore>, args: SearchArgs) -> Result<(), ResolveError> {
    let text = args.text.join(" ");
    let results = resolver.search(&text, args.limit)?;
    tracing::info!(hits = results.total_results(), "search finished");

    let output = if args.rss {
        search_rss(&results, &args.base_url)
    } else {
        search_html(&results)
    };
    write_output(&output, args.output.as_ref())
}

fn run(cli: Cli) -> Result<(), ResolveError> {
    let options = ResolverOptions {
        endpoint: cli.endpoint,
        language: cli.lang,
        timeout: cli.timeout.map(Duration::from_secs),
        ..ResolverOptions::default()
    };

    match cli.command {
        Commands::Classify { identifier } => {
            let identifier = identifier_from_arg(&identifier);
            let path = to_path(&identifier).unwrap_or_else(|| "-".to_string());
            println!("{}\t{}", classify(&identifier), path);
            Ok(())
        }
        Commands::Query { identifier } => {
            let identifier = identifier_from_arg(&identifier);
            println!("{}", build_query(classify(&identifier), &identifier));
            Ok(())
        }
        Commands::Show(args) => run_show(&Resolver::connect(options)?, args),
        Commands::Search(args) => run_search(&Resolver::connect(options)?, args),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        let code = match e {
            ResolveError::NotFound(_) => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}
