//! CLI administration tool for user-accounts.
//!
//! Inspects accounts, maintains the token blacklist and performs database
//! checks without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List the newest accounts
//! cargo run --bin admin -- user list --limit 20
//!
//! # Show one account
//! cargo run --bin admin -- user show ada@example.com
//!
//! # Show recent revocations
//! cargo run --bin admin -- token list
//!
//! # Delete blacklist entries for tokens that have expired anyway
//! cargo run --bin admin -- token purge
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use user_accounts::domain::entities::{User, normalize_email};
use user_accounts::domain::repositories::{RevokedTokenRepository, UserRepository};
use user_accounts::infrastructure::persistence::{PgRevokedTokenRepository, PgUserRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing user-accounts.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Maintain the revoked token list
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List accounts, newest first
    List {
        #[arg(short, long, default_value_t = 50)]
        limit: i64,

        #[arg(short, long, default_value_t = 0)]
        offset: i64,
    },

    /// Show a single account by email
    Show { email: String },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Show the most recent revocations
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },

    /// Delete revocation records whose token has already expired
    Purge {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::List { limit, offset } => list_users(&repo, limit, offset).await,
        UserAction::Show { email } => show_user(&repo, &email).await,
    }
}

/// Prints a table of accounts.
///
/// ```text
/// Users
///
///   ID    Email                          Name                      Registered
///   ───────────────────────────────────────────────────────────────────────────
///   2     ada@example.com                Ada Lovelace              2025-01-16 14:20
/// ```
async fn list_users(repo: &PgUserRepository, limit: i64, offset: i64) -> Result<()> {
    println!("{}", "Users".bright_blue().bold());
    println!();

    let users = repo
        .list(limit.max(1), offset.max(0))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<25} {:<16}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Name".bright_white().bold(),
        "Registered".bright_white().bold()
    );
    println!("  {}", "─".repeat(79).bright_black());

    for user in &users {
        println!(
            "  {:<5} {:<30} {:<25} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            display_name(user),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Shown: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn show_user(repo: &PgUserRepository, email: &str) -> Result<()> {
    let user = repo
        .find_by_email(&normalize_email(email))
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    println!("{}", "User".bright_blue().bold());
    println!();
    println!("  ID:         {}", user.id.to_string().bright_white());
    println!("  Email:      {}", user.email.cyan());
    println!("  Name:       {}", display_name(&user));
    println!(
        "  Registered: {}",
        user.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  Updated:    {}",
        user.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    Ok(())
}

fn display_name(user: &User) -> String {
    match &user.full_name.last_name {
        Some(last) => format!("{} {}", user.full_name.first_name, last),
        None => user.full_name.first_name.clone(),
    }
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = PgRevokedTokenRepository::new(Arc::new(pool.clone()));

    match action {
        TokenAction::List { limit } => list_revoked(&repo, limit).await,
        TokenAction::Purge { yes } => purge_tokens(&repo, yes).await,
    }
}

/// Prints recent revocations. Fingerprints are shortened to 16 hex chars.
async fn list_revoked(repo: &PgRevokedTokenRepository, limit: i64) -> Result<()> {
    println!("{}", "Revoked tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_recent(limit.max(1))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list revoked tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No revoked tokens".yellow());
        return Ok(());
    }

    println!(
        "  {:<18} {:<18} {:<18} {:<8}",
        "Fingerprint".bright_white().bold(),
        "Revoked".bright_white().bold(),
        "Expires".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(66).bright_black());

    let mut expired = 0;
    for token in &tokens {
        let status = if token.is_expired() {
            expired += 1;
            "EXPIRED".bright_black()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<18} {:<18} {:<18} {}",
            token.token_hash.chars().take(16).collect::<String>().cyan(),
            token.revoked_at.format("%Y-%m-%d %H:%M").to_string(),
            token.expires_at.format("%Y-%m-%d %H:%M").to_string(),
            status
        );
    }

    println!();
    if expired > 0 {
        println!(
            "  {} expired record(s) can be removed with {}",
            expired.to_string().bright_white().bold(),
            "admin token purge".bright_cyan()
        );
        println!();
    }

    Ok(())
}

/// Removes blacklist rows that can no longer match a valid token.
async fn purge_tokens(repo: &PgRevokedTokenRepository, skip_confirm: bool) -> Result<()> {
    println!("{}", "Purge revoked tokens".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete all expired revocation records?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .purge_expired()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge tokens: {}", e))?;

    println!(
        "{} {}",
        "Deleted records:".green().bold(),
        deleted.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(pool)
                .await?;

            let revoked: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM revoked_tokens WHERE expires_at > NOW()")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL:     {}", version.bright_white());
            println!("  Users:          {}", users.to_string().bright_green().bold());
            println!(
                "  Revoked tokens: {}",
                revoked.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
