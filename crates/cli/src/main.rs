//! PASS CLI - advising dashboards from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password may also come from PASS_PASSWORD)
//! pass login -e advisor@example.edu --password secret
//!
//! # Open any client route through the guard
//! pass open /student/study-plan?exam_id=2
//!
//! # Advisor dashboard
//! pass advisor students
//! pass advisor student 42
//! pass advisor note 42 "Discussed attendance"
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` - Start or end the session
//! - `status` / `whoami` - Inspect the session
//! - `open` - Navigate to a route and print the landed page
//! - `advisor` - At-risk list, student detail, risk scoring, interventions
//! - `student` - Progress, study plan, study plan feedback

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;

use clap::{Parser, Subcommand};
use pass_core::{ExamId, StudentId};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "pass")]
#[command(author, version, about = "PASS advising client")]
struct Cli {
    /// Backend API base URL (overrides `PASS_API_BASE`)
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and open the dashboard
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(long, env = "PASS_PASSWORD", hide_env_values = true)]
        password: String,

        /// Route to open after signing in, instead of the dashboard
        #[arg(long)]
        next: Option<String>,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show configuration and session state
    Status,
    /// Show the signed-in user
    Whoami,
    /// Open a route (e.g. `/advisor`, `/student/study-plan?exam_id=2`)
    Open {
        /// Route path, optionally with a query string
        path: String,
    },
    /// Advisor dashboard
    Advisor {
        #[command(subcommand)]
        action: AdvisorAction,
    },
    /// Student dashboard
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },
}

#[derive(Subcommand)]
enum AdvisorAction {
    /// List students by risk
    Students,
    /// Show one student's risk explanation and interventions
    Student {
        /// Student ID
        id: StudentId,
    },
    /// Run risk scoring for all students
    Predict,
    /// Log an intervention note
    Note {
        /// Student ID
        id: StudentId,
        /// Note text
        text: String,
    },
}

#[derive(Subcommand)]
enum StudentAction {
    /// Show weekly progress
    Progress,
    /// Show the diagnostic study plan
    Plan {
        /// Exam to diagnose (defaults to exam 1)
        #[arg(long)]
        exam_id: Option<ExamId>,
    },
    /// Rate a study plan
    Feedback {
        /// Exam the plan was for (defaults to exam 1)
        #[arg(long)]
        exam_id: Option<ExamId>,

        /// Whether the plan was helpful (`true` or `false`)
        #[arg(long, action = clap::ArgAction::Set)]
        helpful: bool,

        /// Optional comment
        #[arg(short, long)]
        comment: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before reading logging variables
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing on stderr, as JSON when `PASS_LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pass_client=info,pass_cli=info"));
    let json = std::env::var("PASS_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let mut out = io::stdout();
    let mut app = commands::connect(cli.api_base.as_deref())?;

    match cli.command {
        Commands::Login {
            email,
            password,
            next,
        } => {
            commands::account::login(&mut app, &mut out, &email, password, next.as_deref()).await?;
        }
        Commands::Logout => commands::account::logout(&mut app, &mut out)?,
        Commands::Status => commands::account::status(&mut app, &mut out).await?,
        Commands::Whoami => commands::account::whoami(&mut app, &mut out).await?,
        Commands::Open { path } => commands::open(&mut app, &mut out, &path).await?,
        Commands::Advisor { action } => match action {
            AdvisorAction::Students => commands::open(&mut app, &mut out, "/advisor").await?,
            AdvisorAction::Student { id } => {
                commands::advisor::student(&mut app, &mut out, id).await?;
            }
            AdvisorAction::Predict => commands::advisor::predict(&mut app, &mut out).await?,
            AdvisorAction::Note { id, text } => {
                commands::advisor::note(&mut app, &mut out, id, &text).await?;
            }
        },
        Commands::Student { action } => match action {
            StudentAction::Progress => commands::open(&mut app, &mut out, "/student").await?,
            StudentAction::Plan { exam_id } => {
                commands::student::plan(&mut app, &mut out, exam_id).await?;
            }
            StudentAction::Feedback {
                exam_id,
                helpful,
                comment,
            } => {
                commands::student::feedback(&mut app, &mut out, exam_id, helpful, comment).await?;
            }
        },
    }
    Ok(())
}
