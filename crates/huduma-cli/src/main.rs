//! Huduma CLI: command-line client for the Huduma API.
//!
//! Set HUDUMA_API_URL to point at a server (default http://localhost:3000).

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use futures::future::join_all;
use huduma_cli::api_client::ApiClient;
use huduma_cli::{display_file_size, filter_by_service, init_tracing, truncate_string};
use huduma_core::filter_by_file_name;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "huduma", about = "Huduma document library CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload documents; each file is sent as its own request, concurrently
    Upload {
        /// Files to upload (PDF, Word, or text)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Government service the documents belong to (e.g. KRA, NHIF)
        #[arg(long)]
        service: String,
    },
    /// List the document library
    List {
        /// Case-insensitive substring match on file name
        #[arg(long)]
        search: Option<String>,
        /// Only documents for this service
        #[arg(long)]
        service: Option<String>,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Send a chat message
    Chat {
        message: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = ApiClient::from_env().context("Failed to create API client")?;

    match cli.command {
        Commands::Upload { files, service } => {
            let uploads = files.iter().map(|path| {
                let client = &client;
                let service = service.as_str();
                async move { (path, client.upload_document(path, service).await) }
            });

            let mut failures = 0;
            for (path, result) in join_all(uploads).await {
                match result {
                    Ok(record) => println!(
                        "uploaded {} -> {} ({})",
                        path.display(),
                        record.file_path,
                        display_file_size(&record)
                    ),
                    Err(e) => {
                        failures += 1;
                        eprintln!("failed {}: {:#}", path.display(), e);
                    }
                }
            }

            if failures > 0 {
                anyhow::bail!("{} of {} uploads failed", failures, files.len());
            }
        }
        Commands::List {
            search,
            service,
            format,
        } => {
            let records = client.list_documents().await?;
            let mut matches = filter_by_file_name(&records, search.as_deref().unwrap_or(""));
            if let Some(service) = service.as_deref() {
                matches = filter_by_service(matches, service);
            }

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&matches)?);
                }
                OutputFormat::Table => {
                    println!(
                        "{:<40} {:<15} {:>10} {:<20}",
                        "NAME", "SERVICE", "SIZE", "UPLOADED"
                    );
                    for record in &matches {
                        println!(
                            "{:<40} {:<15} {:>10} {:<20}",
                            truncate_string(&record.file_name, 40),
                            truncate_string(&record.service, 15),
                            display_file_size(record),
                            record.created_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                    println!("{} of {} documents", matches.len(), records.len());
                }
            }
        }
        Commands::Chat { message } => {
            let reply = client.chat(&message).await?;
            println!("{}", reply);
        }
    }

    Ok(())
}
