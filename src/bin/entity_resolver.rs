//! Entity Resolver CLI
//!
//! Operator tool for checking how free-text names resolve against the
//! current roster and alias table.
//!
//! # Usage
//!
//! ```bash
//! # Resolve a supplier name
//! entity_resolver resolve verisur
//!
//! # "Did you mean" list for an employee
//! entity_resolver suggest sufjan --kind employee --limit 3
//!
//! # Find mentions in a message
//! entity_resolver mentions "how much did we pay verisur in march" --kind supplier
//!
//! # Snapshot statistics
//! entity_resolver stats
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use entity_resolver::entity_linking::{MentionExtractor, MentionSpan, ScoredEntity};
use entity_resolver::{EntityKind, EntityStore, ResolverSettings};

#[derive(Parser)]
#[command(name = "entity_resolver")]
#[command(version = "0.1.0")]
#[command(about = "Resolve supplier and employee names against the roster")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to $ENTITY_RESOLVER_CONFIG or config/resolver.yaml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Supplier,
    Employee,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Supplier => EntityKind::Supplier,
            KindArg::Employee => EntityKind::Employee,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one name to its canonical entity
    Resolve {
        query: String,

        #[arg(long, short, default_value = "supplier", value_enum)]
        kind: KindArg,
    },

    /// Ranked "did you mean" list
    Suggest {
        query: String,

        #[arg(long, short, default_value = "employee", value_enum)]
        kind: KindArg,

        #[arg(long, short, default_value_t = 5)]
        limit: usize,
    },

    /// Find entity mentions inside a message
    Mentions {
        text: String,

        #[arg(long, short, default_value = "supplier", value_enum)]
        kind: KindArg,
    },

    /// Show snapshot statistics
    Stats,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "entity_resolver=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = match &cli.config {
        Some(path) => ResolverSettings::from_file(path),
        None => ResolverSettings::from_env(),
    }
    .context("loading resolver settings")?;

    let store = EntityStore::from_settings(&settings).context("loading entities")?;
    let snapshot = store.snapshot()?;

    match cli.command {
        Commands::Resolve { query, kind } => {
            let kind = EntityKind::from(kind);
            let resolver = settings.resolver(kind)?;
            let result = resolver.resolve(&query, snapshot.entities(kind))?;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Pretty => match &result.matched {
                    Some(winner) => {
                        print_candidate(winner, true);
                        if !result.alternates.is_empty() {
                            println!("{}", "Did you mean:".yellow());
                            for alternate in &result.alternates {
                                print_candidate(alternate, false);
                            }
                        }
                    }
                    None => println!(
                        "{} no {} within distance {} of \"{}\"",
                        "✗".red(),
                        kind,
                        result.threshold,
                        result.query
                    ),
                },
            }

            Ok(if result.is_match() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }

        Commands::Suggest { query, kind, limit } => {
            let kind = EntityKind::from(kind);
            let resolver = settings.resolver(kind)?;
            let suggestions = resolver.suggest(&query, snapshot.entities(kind), limit)?;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&suggestions)?),
                OutputFormat::Pretty => {
                    if suggestions.is_empty() {
                        println!("{} no suggestions", "✗".red());
                    }
                    for (i, suggestion) in suggestions.iter().enumerate() {
                        print_candidate(suggestion, i == 0);
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Mentions { text, kind } => {
            let kind = EntityKind::from(kind);
            let entities = snapshot.entities(kind);
            let mentions = MentionExtractor::default().extract(&text, entities);

            for mention in &mentions {
                let names: Vec<&str> = mention
                    .candidate_ids
                    .iter()
                    .filter_map(|id| snapshot.get(kind, *id))
                    .map(|e| e.canonical_name.as_str())
                    .collect();

                match cli.format {
                    OutputFormat::Json => println!(
                        "{}",
                        serde_json::to_string(&MentionOutput {
                            mention,
                            candidates: &names,
                        })?
                    ),
                    OutputFormat::Pretty => println!(
                        "{} [{}..{}] \"{}\" → {} ({:.2})",
                        "•".cyan(),
                        mention.start,
                        mention.end,
                        mention.text,
                        names.join(", ").bold(),
                        mention.score
                    ),
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Stats => {
            let stats = snapshot.stats();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Pretty => print!("{stats}"),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// JSON line for one mention, with the candidates' canonical names
#[derive(Serialize)]
struct MentionOutput<'a> {
    #[serde(flatten)]
    mention: &'a MentionSpan,
    candidates: &'a [&'a str],
}

fn print_candidate(candidate: &ScoredEntity<'_>, primary: bool) {
    let name = if primary {
        candidate.entity.canonical_name.green().bold()
    } else {
        candidate.entity.canonical_name.normal()
    };
    println!(
        "  {} (id {}, distance {}, {:?})",
        name, candidate.entity.id, candidate.distance, candidate.rule
    );
}
