//! Maintenance CLI for a Taskdeck database.
//!
//! Every subcommand opens (and migrates) the database, runs one core
//! operation and prints a single JSON document to stdout.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use serde_json::json;
use taskdeck_core::db::migrations::current_user_version;
use taskdeck_core::{
    core_version, init_logging, open_db, NewTodo, ProjectService, SqliteProjectRepository,
    SqliteTodoRepository, TodoService, TodoStatus,
};

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Taskdeck database maintenance", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database file
    #[arg(long, env = "TASKDECK_DB_PATH", default_value = "taskdeck.sqlite3")]
    db: PathBuf,

    /// trace|debug|info|warn|error, written to stderr
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core and schema versions
    Info,
    /// Insert sample todos into an empty database
    Seed,
    /// Permanently remove soft-deleted todos
    PurgeDeleted,
    /// Permanently remove archived projects
    PurgeArchived,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, None).map_err(anyhow::Error::msg)?;

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;

    let output = match cli.command {
        Commands::Info => json!({
            "coreVersion": core_version(),
            "schemaVersion": current_user_version(&conn)?,
        }),
        Commands::Seed => {
            let todos = TodoService::new(SqliteTodoRepository::try_new(&conn)?);
            if todos.count_todos()? > 0 {
                info!("event=seed module=cli status=skipped reason=not_empty");
                json!({ "inserted": 0 })
            } else {
                let samples = sample_todos();
                let inserted = samples.len();
                for sample in samples {
                    todos.create_todo(sample)?;
                }
                info!("event=seed module=cli status=ok inserted={inserted}");
                json!({ "inserted": inserted })
            }
        }
        Commands::PurgeDeleted => {
            let todos = TodoService::new(SqliteTodoRepository::try_new(&conn)?);
            serde_json::to_value(todos.purge_deleted()?)?
        }
        Commands::PurgeArchived => {
            let projects = ProjectService::new(SqliteProjectRepository::try_new(&conn)?);
            serde_json::to_value(projects.purge_archived()?)?
        }
    };

    println!("{output}");
    Ok(())
}

fn sample_todos() -> Vec<NewTodo> {
    vec![
        NewTodo::new("Buy milk"),
        NewTodo {
            description: Some("Landing hero + form".to_string()),
            ..NewTodo::new("Finish layout")
        },
        NewTodo {
            status: Some(TodoStatus::Done),
            ..NewTodo::new("Call client")
        },
    ]
}
