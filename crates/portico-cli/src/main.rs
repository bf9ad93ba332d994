//! portico CLI
//!
//! Command-line tool for checking route manifests and trying requests
//! against the compiled table.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use portico_router::{Manifest, Method, RouteTable};

/// Compile route manifests and resolve requests against them.
#[derive(Parser)]
#[command(name = "portico")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Route manifest (JSON).
    #[arg(short, long, env = "PORTICO_MANIFEST", default_value = "routes.json")]
    manifest: PathBuf,

    /// Extra known suffix, tried after the manifest's own (repeatable).
    #[arg(short, long = "suffix")]
    suffixes: Vec<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the manifest and report conflicts.
    Check,

    /// List compiled routes.
    Routes,

    /// Resolve a request and print the bound route as JSON.
    Match {
        /// Request verb.
        verb: String,

        /// Request path.
        path: String,
    },

    /// Resolve an alias, optionally building its URL.
    Alias {
        /// Alias name.
        name: String,

        /// Parameter values as key=value.
        params: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let json = std::fs::read_to_string(&cli.manifest)
        .with_context(|| format!("reading manifest {}", cli.manifest.display()))?;
    let mut manifest = Manifest::from_json(&json)?;
    manifest.matcher.suffixes.extend(cli.suffixes);
    manifest.matcher = manifest.matcher.normalized();

    let table = manifest.compile()?;

    match cli.command {
        Commands::Check => {
            info!(
                routes = table.len(),
                aliases = table.aliases().len(),
                "manifest OK"
            );
        }

        Commands::Routes => print_routes(&table),

        Commands::Match { verb, path } => {
            let verb = Method::parse(&verb);
            match table.find_with(&manifest.matcher, &path, &verb) {
                Some(matched) => println!("{}", serde_json::to_string_pretty(&matched)?),
                None => bail!("no route matched: {verb} {path}"),
            }
        }

        Commands::Alias { name, params } => {
            let Some(key) = table.aliases().resolve(&name) else {
                bail!("alias not found: {name}");
            };
            println!("{} {}", key.verb, key.pattern);

            if !params.is_empty() {
                let params = parse_params(&params)?;
                match table.url_for(&name, &params) {
                    Some(url) => println!("{url}"),
                    None => bail!("missing parameters for alias {name}"),
                }
            }
        }
    }

    Ok(())
}

fn print_routes(table: &RouteTable) {
    for entry in table.routes() {
        let alias = entry
            .alias
            .as_deref()
            .map(|a| format!(" [{a}]"))
            .unwrap_or_default();
        println!(
            "{:<7} {} -> {}{alias}",
            entry.verb.as_str(),
            entry.pattern,
            entry.handler
        );
    }
}

fn parse_params(pairs: &[String]) -> anyhow::Result<HashMap<String, String>> {
    pairs
        .iter()
        .map(|pair| -> anyhow::Result<(String, String)> {
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("expected key=value, got '{pair}'"))?;
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_params() {
        let params = parse_params(&["id=42".to_string(), "q=a=b".to_string()]).unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert_eq!(params.get("q").map(String::as_str), Some("a=b"));
        assert!(parse_params(&["oops".to_string()]).is_err());
    }

    #[test]
    fn test_cli_parses_match() {
        let cli = Cli::try_parse_from([
            "portico", "-m", "r.json", "-s", "json", "match", "GET", "/users/1",
        ])
        .unwrap();
        assert_eq!(cli.suffixes, vec!["json"]);
        assert!(matches!(cli.command, Commands::Match { ref path, .. } if path == "/users/1"));
    }
}
