mod commands;
mod output;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fleetflow_lib::Config;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "fleetflow")]
#[command(about = "FleetFlow back-office client: customers, fleet, invoices and documents")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// API base URL, overriding fleetflow.toml and FLEETFLOW_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login(commands::auth::LoginArgs),
    /// Forget the stored session token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Change the signed-in user's profile or password
    Account(commands::account::AccountArgs),
    /// Show fleet, customer, driver and expense totals
    Dashboard,
    /// List records of a resource
    List(commands::list::ListArgs),
    /// Show a single record
    Show(commands::show::ShowArgs),
    /// Create a record
    Create(commands::mutate::CreateArgs),
    /// Update a record
    Update(commands::mutate::UpdateArgs),
    /// Delete a record
    Delete(commands::mutate::DeleteArgs),
    /// Search interactively, one term per stdin line
    Search(commands::search::SearchArgs),
    /// Print an invoice or credit note page by page
    Print(commands::print::PrintArgs),
    /// Attach a document to a driver, vehicle, expense or payment
    Upload(commands::upload::UploadArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fleetflow=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output)?;

    let mut config = Config::load()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    let client = Arc::new(config.build_client()?);

    match &cli.command {
        Commands::Login(args) => commands::auth::login(args, client, &format).await?,
        Commands::Logout => commands::auth::logout(client)?,
        Commands::Whoami => commands::auth::whoami(client, &format).await?,
        Commands::Account(args) => commands::account::run(args, client, &format).await?,
        Commands::Dashboard => commands::dashboard::run(client, &format).await?,
        Commands::List(args) => commands::list::run(args, client, &format).await?,
        Commands::Show(args) => commands::show::run(args, client, &format).await?,
        Commands::Create(args) => commands::mutate::create(args, client, &format).await?,
        Commands::Update(args) => commands::mutate::update(args, client, &format).await?,
        Commands::Delete(args) => commands::mutate::delete(args, client, &format).await?,
        Commands::Search(args) => {
            commands::search::run(args, client, &format, config.search_debounce()).await?
        }
        Commands::Print(args) => {
            commands::print::run(args, client, &format, config.print_page_size).await?
        }
        Commands::Upload(args) => commands::upload::run(args, client, &format).await?,
    }

    Ok(())
}
