#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use contact_book::config::AppConfig;
use contact_book::logging::init_logging;
use contact_book::models::render_contacts;
use contact_book::{BackendKind, ContactRecord, ContactService};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage backend, overriding the configured one
    #[arg(short, long, value_enum, global = true)]
    backend: Option<BackendKind>,

    /// Extra configuration file layered over the default ones
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new contact
    Add(ContactArgs),
    /// View all contacts
    List,
    /// Show the contact with the given email
    Show {
        /// Email of the contact
        #[arg(short, long)]
        email: String,
    },
    /// Delete the contact with the given email
    Delete {
        /// Email of the contact
        #[arg(short, long)]
        email: String,
    },
    /// Export all contacts to a JSON file
    Export {
        /// Output file (defaults to export.json_path)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// Import contacts from a JSON file
    Import {
        /// Input file (defaults to export.json_path)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

/// The ten form fields of a contact
#[derive(Args)]
struct ContactArgs {
    /// First name
    #[arg(long, default_value = "")]
    first_name: String,
    /// Last name
    #[arg(long, default_value = "")]
    last_name: String,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    date_of_birth: String,
    /// Street address
    #[arg(long, default_value = "")]
    street_address: String,
    /// Postal code
    #[arg(long, default_value = "")]
    postal_code: String,
    /// State or province
    #[arg(long, default_value = "")]
    state_or_province: String,
    /// Country
    #[arg(long, default_value = "")]
    country: String,
    /// Email
    #[arg(long)]
    email: String,
    /// Phone number ((---)--- ----)
    #[arg(long)]
    phone_number: String,
    /// Notes, may span several lines
    #[arg(long, default_value = "")]
    notes: String,
}

impl From<ContactArgs> for ContactRecord {
    fn from(args: ContactArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            date_of_birth: args.date_of_birth,
            street_address: args.street_address,
            postal_code: args.postal_code,
            state_or_province: args.state_or_province,
            country: args.country,
            email: args.email,
            phone_number: args.phone_number,
            notes: args.notes.trim().to_string(),
        }
    }
}

/// What a successful action shows the user
enum Output {
    /// One-line success notification
    Success(String),
    /// Listing shown as-is
    Plain(String),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(Output::Success(message)) => {
            println!("Success: {message}");
            ExitCode::SUCCESS
        }
        Ok(Output::Plain(text)) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Output> {
    // Load configuration
    let mut config = AppConfig::load_from(cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        config.storage.backend = backend;
    }

    // Initialize logging
    let _guard = init_logging(
        Some(config.logging.level.as_str()),
        config.logging.file_path.as_deref(),
        config.logging.format == "json",
    )?;
    info!(backend = %config.storage.backend, "Starting contact-book");

    if matches!(cli.command, Commands::Config) {
        return Ok(Output::Plain(config.to_yaml()?));
    }

    let service = ContactService::open(&config.storage).context("Failed to open contact store")?;
    let output = dispatch(&service, &config, cli.command);
    service.close()?;
    output
}

fn dispatch(service: &ContactService, config: &AppConfig, command: Commands) -> Result<Output> {
    let default_path = || config.export.json_path.clone();

    let output = match command {
        Commands::Add(args) => {
            let record = ContactRecord::from(args);
            let stored = service.add_contact(&record)?;
            Output::Success(format!(
                "Added new contact: {} {} <{}> (id {})",
                stored.record.first_name, stored.record.last_name, stored.record.email, stored.id
            ))
        }
        Commands::List => {
            let contacts = service.list_contacts()?;
            debug!(count = contacts.len(), "Listing contacts");
            Output::Plain(render_contacts(&contacts))
        }
        Commands::Show { email } => Output::Plain(service.find_contact(&email)?.to_string()),
        Commands::Delete { email } => {
            service.delete_contact(&email)?;
            Output::Success(format!("Deleted contact with email: {email}"))
        }
        Commands::Export { path } => {
            let path = path.unwrap_or_else(default_path);
            let written = service.export_json(&path)?;
            Output::Success(format!("Exported {written} contacts to {}", path.display()))
        }
        Commands::Import { path } => {
            let path = path.unwrap_or_else(default_path);
            let summary = service.import_json(&path)?;
            Output::Success(format!(
                "Imported contacts from {}: {} added, {} skipped ({} duplicates, {} invalid, {} failed)",
                path.display(),
                summary.imported,
                summary.skipped(),
                summary.duplicates,
                summary.invalid,
                summary.failed
            ))
        }
        Commands::Config => Output::Plain(config.to_yaml()?),
    };

    Ok(output)
}
