//! Socnet CLI: query a social graph loaded from a JSON seed file

mod seed;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use seed::Seed;
use socnet::graph::{GraphStore, MemoryGraph, MemoryTransaction};
use socnet::social::{Person, PersonRepository, StatusUpdate};
use socnet::SocialConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "socnet", version, about = "Socnet social graph CLI")]
struct Cli {
    /// JSON seed file with persons, friendships and statuses
    #[arg(long, global = true, env = "SOCNET_SEED")]
    seed: Option<PathBuf>,

    /// YAML engine configuration
    #[arg(long, global = true, env = "SOCNET_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List every person
    Persons,
    /// List a person's direct friends
    Friends { name: String },
    /// List a person's friends of friends
    Fof { name: String },
    /// Show a person's own status updates, newest first
    Status { name: String },
    /// Show the merged status updates of a person's friends
    Feed { name: String },
    /// Find the shortest friendship path between two people
    Path {
        from: String,
        to: String,
        /// Maximum number of hops (defaults to the configured depth)
        #[arg(long)]
        depth: Option<usize>,
    },
    /// Recommend new friends by shared friends
    Recommend {
        name: String,
        /// Maximum number of recommendations (defaults to the configured limit)
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SocialConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => SocialConfig::default(),
    };

    let graph = MemoryGraph::new();
    let mut tx = graph.begin()?;
    let repo = PersonRepository::open(&mut tx, config)?;
    socnet::commit(tx)?;

    if let Some(path) = &cli.seed {
        Seed::from_file(path)?.load_into(&graph, &repo)?;
    }

    let tx = graph.begin()?;
    let format = &cli.format;

    match cli.command {
        Commands::Persons => {
            let people: Vec<Person> = repo.get_all_persons(&tx)?.collect();
            print_people(&tx, &people, format)
        }
        Commands::Friends { name } => {
            let person = repo.get_person_by_name(&tx, &name)?;
            let friends: Vec<Person> = person.get_friends(&tx)?.collect();
            print_people(&tx, &friends, format)
        }
        Commands::Fof { name } => {
            let person = repo.get_person_by_name(&tx, &name)?;
            print_people(&tx, &person.friends_of_friends(&tx)?, format)
        }
        Commands::Status { name } => {
            let person = repo.get_person_by_name(&tx, &name)?;
            let updates = person.get_status(&tx)?.collect::<Result<Vec<_>, _>>()?;
            print_updates(&tx, &updates, format)
        }
        Commands::Feed { name } => {
            let person = repo.get_person_by_name(&tx, &name)?;
            let updates = person.friend_statuses(&tx)?.collect::<Result<Vec<_>, _>>()?;
            print_updates(&tx, &updates, format)
        }
        Commands::Path { from, to, depth } => {
            let from = repo.get_person_by_name(&tx, &from)?;
            let to = repo.get_person_by_name(&tx, &to)?;
            let depth = depth.unwrap_or(repo.config().max_path_depth);
            let path = from.shortest_path_to(&tx, &to, depth)?;
            print_people(&tx, &path, format)
        }
        Commands::Recommend { name, limit } => {
            let person = repo.get_person_by_name(&tx, &name)?;
            let recommendations = match limit {
                Some(limit) => socnet::social::recommend(&tx, person, limit)?,
                None => repo.recommendation_engine().recommend(&tx, person)?,
            };

            match format {
                OutputFormat::Json => {
                    let rows = recommendations
                        .iter()
                        .map(|r| -> Result<serde_json::Value> {
                            Ok(serde_json::json!({
                                "name": r.person.name(&tx)?,
                                "score": r.score,
                            }))
                        })
                        .collect::<Result<Vec<_>>>()?;
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                }
                OutputFormat::Table => {
                    let mut table = new_table(&["Name", "Shared friends"]);
                    for r in &recommendations {
                        table.add_row(vec![r.person.name(&tx)?, r.score.to_string()]);
                    }
                    println!("{}", table);
                    println!("{} row(s)", recommendations.len());
                }
            }
            Ok(())
        }
    }
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn print_people(tx: &MemoryTransaction, people: &[Person], format: &OutputFormat) -> Result<()> {
    let names = people
        .iter()
        .map(|p| p.name(tx))
        .collect::<Result<Vec<_>, _>>()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&names)?);
        }
        OutputFormat::Table => {
            if names.is_empty() {
                println!("(no results)");
                return Ok(());
            }
            let mut table = new_table(&["Name"]);
            for name in &names {
                table.add_row(vec![name.clone()]);
            }
            println!("{}", table);
            println!("{} row(s)", names.len());
        }
    }
    Ok(())
}

fn print_updates(tx: &MemoryTransaction, updates: &[StatusUpdate], format: &OutputFormat) -> Result<()> {
    let authors = updates
        .iter()
        .map(|u| u.person(tx).and_then(|p| p.name(tx)))
        .collect::<Result<Vec<_>, _>>()?;

    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = updates
                .iter()
                .zip(&authors)
                .map(|(u, author)| {
                    serde_json::json!({
                        "person": author,
                        "text": u.text(),
                        "date": u.date().to_rfc3339(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Table => {
            if updates.is_empty() {
                println!("(no results)");
                return Ok(());
            }
            let mut table = new_table(&["Date", "Person", "Text"]);
            for (u, author) in updates.iter().zip(&authors) {
                table.add_row(vec![
                    u.date().format("%Y-%m-%d %H:%M:%S").to_string(),
                    author.clone(),
                    u.text().to_string(),
                ]);
            }
            println!("{}", table);
            println!("{} row(s)", updates.len());
        }
    }
    Ok(())
}
