//! Operator CLI for shortlinks.
//!
//! Talks to PostgreSQL directly; the HTTP server does not need to be running.
//!
//! ```bash
//! admin owner create "Jane Doe"
//! admin token create --owner 1 --name ci
//! admin token list
//! admin token revoke ci
//! admin stats
//! admin db check
//! ```
//!
//! Reads the same environment as the server. `TOKEN_SIGNING_SECRET` has to
//! be identical on both sides or issued tokens will never resolve.

use shortlinks::application::services::hash_token;
use shortlinks::config;
use shortlinks::domain::repositories::{ApiToken, TokenRepository};
use shortlinks::infrastructure::persistence::PgTokenRepository;
use shortlinks::server;
use shortlinks::utils::key_generator::KEY_ALPHABET;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use rand::Rng;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

const GENERATED_TOKEN_LEN: usize = 48;

#[derive(Parser)]
#[command(name = "admin", author, version, about = "Manage shortlinks owners, tokens and data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Owners that authenticated links are attributed to
    #[command(subcommand)]
    Owner(OwnerCommand),

    /// Bearer tokens for the HTTP API
    #[command(subcommand)]
    Token(TokenCommand),

    /// Link, click and token counters
    Stats,

    /// Connectivity and schema
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Subcommand)]
enum OwnerCommand {
    /// Register an owner and print its id
    Create {
        /// Prompted for when omitted
        name: Option<String>,
    },
}

#[derive(Subcommand)]
enum TokenCommand {
    /// Issue a token; the raw value is shown exactly once
    Create(CreateTokenArgs),

    /// Show every token, revoked ones included
    List,

    /// Revoke the active token with this name
    Revoke {
        name: String,

        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Args)]
struct CreateTokenArgs {
    /// Id printed by `owner create`
    #[arg(short, long)]
    owner: i64,

    /// Unique label, prompted for when omitted
    #[arg(short, long)]
    name: Option<String>,

    /// Use this value instead of a random one
    #[arg(short, long)]
    token: Option<String>,

    #[arg(short = 'y', long)]
    yes: bool,
}

#[derive(Subcommand)]
enum DbCommand {
    /// Ping the database and apply pending migrations
    Check,
}

#[derive(FromRow)]
struct LinkCounters {
    total: i64,
    public: i64,
    expired: i64,
    clicks: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;
    let pool = server::connect_pool(&config).await?;
    let tokens = PgTokenRepository::new(Arc::new(pool.clone()));

    match cli.command {
        Command::Owner(OwnerCommand::Create { name }) => create_owner(&tokens, name).await,
        Command::Token(TokenCommand::Create(args)) => {
            create_token(&tokens, &config.token_signing_secret, args).await
        }
        Command::Token(TokenCommand::List) => list_tokens(&tokens).await,
        Command::Token(TokenCommand::Revoke { name, yes }) => {
            revoke_token(&tokens, &name, yes).await
        }
        Command::Stats => show_stats(&pool).await,
        Command::Db(DbCommand::Check) => check_db(&pool).await,
    }
}

fn confirm(prompt: impl Into<String>, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

async fn create_owner(repo: &PgTokenRepository, name: Option<String>) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Owner name").interact_text()?,
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Owner name cannot be blank"));
    }

    let owner = repo
        .create_owner(name)
        .await
        .map_err(|e| anyhow!("Could not create owner: {e}"))?;

    println!(
        "{} {} {}",
        "✓".green().bold(),
        owner.name.cyan(),
        format!("(id {})", owner.id).bright_black()
    );
    Ok(())
}

async fn create_token(repo: &PgTokenRepository, secret: &str, args: CreateTokenArgs) -> Result<()> {
    let name = match args.name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("ci")
            .interact_text()?,
    };
    let value = args.token.unwrap_or_else(random_token);

    println!("{}", "New API token".bright_blue().bold());
    println!("  owner  {}", args.owner.to_string().cyan());
    println!("  name   {}", name.cyan());
    println!("  value  {}", value.bright_yellow().bold());
    println!(
        "{}",
        "Copy the value now. Only its hash is stored.".red().bold()
    );

    if !args.yes && !confirm("Store this token?", true)? {
        println!("{}", "Nothing stored".yellow());
        return Ok(());
    }

    repo.create_token(args.owner, &name, &hash_token(secret, &value))
        .await
        .map_err(|e| anyhow!("Could not store token: {e}"))?;

    println!("{} token '{}' stored", "✓".green().bold(), name);
    println!(
        "  try: curl -H 'Authorization: Bearer {value}' -H 'Content-Type: application/json' \\\n         -d '{{\"targetUrl\":\"example.com\"}}' http://localhost:3000/api/short-urls"
    );
    Ok(())
}

fn print_token(token: &ApiToken) {
    let status = if token.is_revoked() {
        "revoked".red()
    } else {
        "active".green()
    };
    let last_used = token
        .last_used_at
        .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());

    println!(
        "{:>5}  {:>6}  {:<24}  {:<16}  {:<16}  {}",
        token.id,
        token.owner_id,
        token.name.cyan(),
        token.created_at.format("%Y-%m-%d %H:%M"),
        last_used,
        status
    );
}

async fn list_tokens(repo: &PgTokenRepository) -> Result<()> {
    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow!("Could not list tokens: {e}"))?;

    if tokens.is_empty() {
        println!("{}", "No tokens issued yet".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "{:>5}  {:>6}  {:<24}  {:<16}  {:<16}  {}",
            "id", "owner", "name", "created", "last used", "status"
        )
        .bright_white()
        .bold()
    );
    tokens.iter().for_each(print_token);
    println!("{} token(s)", tokens.len());
    Ok(())
}

async fn revoke_token(repo: &PgTokenRepository, name: &str, yes: bool) -> Result<()> {
    if !yes && !confirm(format!("Revoke '{name}'? Clients using it will turn anonymous"), false)? {
        println!("{}", "Left untouched".yellow());
        return Ok(());
    }

    let revoked = repo
        .revoke_token(name)
        .await
        .map_err(|e| anyhow!("Could not revoke token: {e}"))?;

    if revoked {
        println!("{} '{}' revoked", "✓".green().bold(), name);
    } else {
        println!("{}", format!("No active token named '{name}'").yellow());
    }
    Ok(())
}

async fn show_stats(pool: &PgPool) -> Result<()> {
    let links: LinkCounters = sqlx::query_as(
        r#"
        SELECT
            COUNT(*)                                            AS total,
            COUNT(*) FILTER (WHERE NOT is_private)              AS public,
            COUNT(*) FILTER (WHERE expires_at < NOW())          AS expired,
            COALESCE(SUM(click_count), 0)::BIGINT               AS clicks
        FROM short_links
        "#,
    )
    .fetch_one(pool)
    .await
    .context("Could not count links")?;

    let active_tokens: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await
            .context("Could not count tokens")?;

    let rows = [
        ("links", links.total),
        ("  public", links.public),
        ("  private", links.total - links.public),
        ("  expired", links.expired),
        ("clicks", links.clicks),
        ("active tokens", active_tokens),
    ];
    for (label, value) in rows {
        println!("{label:<14} {}", value.to_string().bright_green().bold());
    }
    Ok(())
}

async fn check_db(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("Database did not answer")?;
    println!("{} database reachable", "✓".green().bold());

    server::migrate(pool).await?;
    println!("{} schema up to date", "✓".green().bold());
    Ok(())
}

fn random_token() -> String {
    let mut rng = rand::rng();
    (0..GENERATED_TOKEN_LEN)
        .map(|_| KEY_ALPHABET[rng.random_range(0..KEY_ALPHABET.len())] as char)
        .collect()
}
