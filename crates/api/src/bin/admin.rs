//! Operator tool for the Scriptorium database.
//!
//! Users and pages are never created through the web interface; this binary
//! does it instead.
//!
//! ```bash
//! scriptorium-admin create-user --username ada --email ada@example.org --password s3cret-pw
//! scriptorium-admin import-pages pages.json
//! scriptorium-admin progress
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use scriptorium_api::admin::{self, NewAccount};
use scriptorium_db::repositories::PageRepo;
use scriptorium_db::DbPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "scriptorium-admin")]
#[command(about = "Manage users and pages of a Scriptorium database")]
struct Args {
    /// SQLite connection URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://ocr.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a user account
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Grant administrator rights
        #[arg(long)]
        admin: bool,
    },
    /// Import scanned pages and their OCR lines from a JSON file
    ImportPages {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print how many pages are finished
    Progress,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "scriptorium_admin=info,scriptorium_api=info,scriptorium_db=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let pool = scriptorium_db::create_pool(&args.database_url)
        .await
        .with_context(|| format!("opening database {}", args.database_url))?;
    scriptorium_db::run_migrations(&pool)
        .await
        .context("running migrations")?;

    match args.command {
        Command::CreateUser {
            username,
            email,
            password,
            admin: is_admin,
        } => {
            let user = admin::create_user(
                &pool,
                NewAccount {
                    username,
                    email,
                    password,
                    is_admin,
                },
            )
            .await
            .context("creating user")?;
            println!("Created user {} (id {})", user.username, user.id);
        }
        Command::ImportPages { file } => import_pages(&pool, &file).await?,
        Command::Progress => {
            let progress = PageRepo::progress(&pool).await?;
            println!("{}", admin::describe_progress(&progress));
        }
    }

    pool.close().await;
    Ok(())
}

async fn import_pages(pool: &DbPool, file: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let pages = admin::parse_import(&raw).with_context(|| format!("parsing {}", file.display()))?;

    let summary = admin::import_pages(pool, &pages)
        .await
        .with_context(|| format!("importing {}; nothing was written", file.display()))?;

    println!(
        "Imported {} pages with {} lines",
        summary.pages, summary.lines
    );
    Ok(())
}
