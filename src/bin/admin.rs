//! CLI administration tool for woonmarkt.
//!
//! Manages users and sessions and checks the database without going through
//! the HTTP API. `session issue` is the hook an external login provider
//! calls after it has verified a user.
//!
//! # Usage
//!
//! ```bash
//! # Create a user
//! cargo run --bin admin -- user create --email jan@example.nl --name "Jan de Vries"
//!
//! # List users
//! cargo run --bin admin -- user list
//!
//! # Issue an access/refresh token pair
//! cargo run --bin admin -- session issue jan@example.nl
//!
//! # Revoke every session of a user
//! cargo run --bin admin -- session revoke jan@example.nl
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! The same variables as the server; `DATABASE_URL` and
//! `SESSION_SIGNING_SECRET` are required.

use woonmarkt::application::services::AuthService;
use woonmarkt::config::{self, Config};
use woonmarkt::domain::entities::{NewUser, Role, User};
use woonmarkt::domain::repositories::UserRepository;
use woonmarkt::infrastructure::persistence::{PgSessionRepository, PgUserRepository};
use woonmarkt::server::connect_database;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing woonmarkt.
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
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    User,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::User => Role::User,
            RoleArg::Admin => Role::Admin,
        }
    }
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user
    Create {
        #[arg(short, long)]
        email: Option<String>,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long, value_enum, default_value = "user")]
        role: RoleArg,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all users
    List,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Issue an access/refresh token pair for a user
    Issue {
        /// User email
        email: String,
    },

    /// Revoke every session of a user
    Revoke {
        /// User email
        email: String,

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

    /// Show database info and row counts
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = connect_database(&config).await?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Session { action } => handle_session_action(action, &pool, &config).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn user_repository(pool: &PgPool) -> PgUserRepository {
    PgUserRepository::new(Arc::new(pool.clone()))
}

async fn find_user(repo: &PgUserRepository, email: &str) -> Result<User> {
    repo.find_by_email(email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("No user with email {email}"))
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = user_repository(pool);

    match action {
        UserAction::Create {
            email,
            name,
            role,
            yes,
        } => create_user(&repo, email, name, role.into(), yes).await,
        UserAction::List => list_users(&repo).await,
    }
}

/// Creates a user with interactive prompts for missing fields.
async fn create_user(
    repo: &PgUserRepository,
    email: Option<String>,
    name: Option<String>,
    role: Role,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Create user".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let email = email.trim().to_lowercase();
    if !email.contains('@') {
        bail!("'{email}' is not an email address");
    }

    let display_name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Display name").interact_text()?,
    };

    println!("  Email: {}", email.cyan());
    println!("  Name:  {}", display_name.cyan());
    println!("  Role:  {}", role.as_str().cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let user = repo
        .create(NewUser {
            email,
            display_name,
            role,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!(
        "{} {}",
        "User created with id".green().bold(),
        user.id.to_string().bright_white().bold()
    );

    Ok(())
}

async fn list_users(repo: &PgUserRepository) -> Result<()> {
    println!("{}", "Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<35} {:<25} {:<6} {:<16}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Name".bright_white().bold(),
        "Role".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "-".repeat(90).bright_black());

    for user in &users {
        let role = match user.role {
            Role::Admin => "admin".magenta(),
            Role::User => "user".normal(),
        };

        println!(
            "  {:<5} {:<35} {:<25} {:<6} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.display_name,
            role,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_session_action(action: SessionAction, pool: &PgPool, config: &Config) -> Result<()> {
    let users = user_repository(pool);
    let auth = AuthService::new(
        Arc::new(PgSessionRepository::new(Arc::new(pool.clone()))),
        config.session_signing_secret.clone(),
        config.access_token_ttl_seconds,
    );

    match action {
        SessionAction::Issue { email } => {
            let user = find_user(&users, &email).await?;
            let tokens = auth
                .issue_tokens(user.id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to issue tokens: {}", e))?;

            println!("{}", "Session issued".green().bold());
            println!();
            println!("  User:          {} ({})", user.email.cyan(), user.id);
            println!("  Access token:  {}", tokens.access_token.bright_yellow());
            println!("  Refresh token: {}", tokens.refresh_token.bright_yellow());
            println!("  Expires in:    {}s", tokens.access_expires_in);
            println!();
            println!(
                "{}",
                "Tokens are shown once; only their hashes are stored."
                    .red()
                    .bold()
            );
        }
        SessionAction::Revoke { email, yes } => {
            let user = find_user(&users, &email).await?;

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Revoke all sessions of {}?", user.email))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "Cancelled".red());
                    return Ok(());
                }
            }

            let revoked = auth
                .revoke_all(user.id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to revoke sessions: {}", e))?;

            println!(
                "{} {}",
                "Sessions revoked:".green().bold(),
                revoked.to_string().bright_white().bold()
            );
        }
    }

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
            println!("{}", "Database information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            println!("  PostgreSQL: {}", version.bright_white());
            println!();

            for table in ["users", "properties", "energy_projects", "valuations"] {
                let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                    .fetch_one(pool)
                    .await?;
                println!("  {:<16} {}", table, count.to_string().bright_green().bold());
            }

            let active_sessions: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sessions WHERE revoked_at IS NULL AND expires_at > NOW()",
            )
            .fetch_one(pool)
            .await?;
            println!(
                "  {:<16} {}",
                "active sessions",
                active_sessions.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
