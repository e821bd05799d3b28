use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rust_schemascan::commands::{CommandChain, ListCommand};
use rust_schemascan::crawl::{CrawlOverrides, DatabaseSpecificOptions};
use rust_schemascan::filter::{self, FilterOptions, InclusionRule};
use rust_schemascan::output::{OutputFormat, OutputOptions, OutputResource};
use rust_schemascan::snapshot::{self, SnapshotSource};

#[derive(Parser)]
#[command(name = "rust-schemascan")]
#[command(author, version, about = "Fast crawler for relational database schema metadata")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline against a saved catalog snapshot, without a live connection
    Offline {
        /// Path to the snapshot archive
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Regex of schemas to include (whole-name match)
        #[arg(long)]
        schemas: Option<String>,

        /// Regex of tables to include (whole-name match)
        #[arg(long)]
        tables: Option<String>,

        /// Output file (defaults to the console)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Re-save the reduced catalog to a new snapshot
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Offline {
            snapshot,
            schemas,
            tables,
            output,
            format,
            save,
        } => {
            let rules = FilterOptions {
                schemas: rule_from(schemas.as_deref())?,
                tables: rule_from(tables.as_deref())?,
                ..FilterOptions::default()
            };

            let source = SnapshotSource::open(&snapshot)?;
            let mut catalog = source.catalog().clone();
            filter::reduce_all(&mut catalog, &rules);

            let overrides = CrawlOverrides::new();
            let database_options = DatabaseSpecificOptions::resolve(&source, &overrides);

            let output_options = OutputOptions::default()
                .with_output_format(OutputFormat::from_value(&format))
                .with_output_resource(match &output {
                    Some(path) => OutputResource::File(path.clone()),
                    None => OutputResource::Console,
                });

            let mut chain = CommandChain::new();
            chain.add_next(Box::new(ListCommand::new(output_options)));
            chain.set_database_options(database_options);
            chain.execute_chain(&catalog, &source)?;

            if let Some(save_path) = save {
                snapshot::save_catalog(&catalog, &save_path)?;
            }
        }
    }

    Ok(())
}

fn rule_from(pattern: Option<&str>) -> Result<InclusionRule> {
    match pattern {
        Some(pattern) => Ok(InclusionRule::pattern(pattern, None)?),
        None => Ok(InclusionRule::IncludeAll),
    }
}
