//! Manna CLI - admin companion for the devotional content store
//!
//! Lists, publishes, edits, and deletes devotions against the same
//! Supabase project the website reads from.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;

use cli::{Cli, Commands};
use commands::{add, delete, edit, list, show};
use error::CliError;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("manna=warn".parse().expect("valid directive")),
        )
        .init();

    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.command {
        Commands::List { limit, page, json } => list::run_list(limit, page, json).await,
        Commands::Show { id, json } => show::run_show(&id, json).await,
        Commands::Add {
            title,
            reference,
            text,
            date,
            content,
        } => {
            add::run_add(
                &title,
                &reference,
                &text,
                date.as_deref(),
                content.as_deref(),
            )
            .await
        }
        Commands::Edit {
            id,
            title,
            reference,
            text,
            date,
            content,
        } => {
            edit::run_edit(
                &id,
                title.as_deref(),
                reference.as_deref(),
                text.as_deref(),
                date.as_deref(),
                content.as_deref(),
            )
            .await
        }
        Commands::Delete { id } => delete::run_delete(&id).await,
    }
}
