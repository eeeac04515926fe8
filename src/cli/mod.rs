use std::io::BufRead;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use secrecy::ExposeSecret;
use serde_json::json;

use crate::auth::PasswordHasher;
use crate::config::AppConfig;
use crate::database::models::UserInput;
use crate::database::{DatabaseManager, PgStore, UserStore};

#[derive(Parser)]
#[command(name = "courses")]
#[command(about = "Courses API administration")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Print an Argon2 digest for a password read from stdin")]
    HashPassword,

    #[command(about = "Create a user directly in the configured database (password read from stdin)")]
    CreateUser {
        #[arg(long, help = "First name")]
        first_name: String,
        #[arg(long, help = "Last name")]
        last_name: String,
        #[arg(long, help = "Email address, used as the Basic auth user name")]
        email: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env();
    let hasher = PasswordHasher::new(config.security.password.into())
        .context("invalid password hashing parameters")?;

    match cli.command {
        Commands::HashPassword => {
            let password = read_password()?;
            let digest = hasher.hash(&password)?;
            match output_format {
                OutputFormat::Json => println!("{}", json!({ "digest": digest })),
                OutputFormat::Text => println!("{}", digest),
            }
            Ok(())
        }
        Commands::CreateUser {
            first_name,
            last_name,
            email,
        } => {
            let input = UserInput {
                first_name: Some(first_name),
                last_name: Some(last_name),
                email_address: Some(email),
                password: Some(read_password()?),
            };
            let valid = match input.validate() {
                Ok(valid) => valid,
                Err(errors) => bail!("invalid user: {}", errors.join("; ")),
            };

            let digest = hasher.hash(valid.password.expose_secret())?;

            let pool = DatabaseManager::connect(&config.database).await?;
            if config.database.ensure_schema {
                DatabaseManager::ensure_schema(&pool).await?;
            }
            let user = PgStore::new(pool).create_user(valid.with_hash(digest)).await?;

            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    json!({ "id": user.id, "emailAddress": user.email_address })
                ),
                OutputFormat::Text => {
                    println!("Created user {} ({})", user.id, user.email_address)
                }
            }
            Ok(())
        }
    }
}

/// First line of stdin, without the trailing newline
fn read_password() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("password must not be empty");
    }
    Ok(password)
}
