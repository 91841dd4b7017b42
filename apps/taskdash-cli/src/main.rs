mod error;
mod telemetry;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use taskdash::config::api::profile_dir_from_env;
use taskdash::{
    ApiConfig, ConfigSource, FileTokenStore, HttpTransport, IdentityClient, Session,
    SessionManager, TaskApiClient, TaskCreate, TaskStatus, TaskUpdate,
};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "taskdash")]
#[command(about = "Sign in to the task dashboard and manage tasks")]
struct Args {
    /// Directory holding the stored session (default: $TASKDASH_PROFILE_DIR or ~/.taskdash)
    #[arg(long, global = true)]
    profile_dir: Option<PathBuf>,

    /// Emit JSON log lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with email and password
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TASKDASH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Register a new account
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TASKDASH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Confirm a registration with the emailed code
    Confirm {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
    /// Revoke the session remotely (best effort) and forget it locally
    SignOut,
    /// Show the signed-in identity
    Whoami,
    /// Print a fresh access credential, refreshing if needed
    Token,
    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        command: TasksCommand,
    },
}

#[derive(Subcommand)]
enum TasksCommand {
    List,
    Stats,
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Mark a task completed
    Done { id: String },
    /// Delete a task
    Rm { id: String },
}

#[tokio::main]
async fn main() {
    let args = Args::try_parse().unwrap_or_else(|e| e.exit());
    telemetry::init_tracing(args.json_logs);

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let profile_dir = args.profile_dir.unwrap_or_else(profile_dir_from_env);
    let store = Arc::new(FileTokenStore::new(&profile_dir));
    let client = IdentityClient::new(Arc::new(HttpTransport::new()), ConfigSource::Environment);
    let session = Arc::new(SessionManager::new(client, store));

    match args.command {
        Command::SignIn { email, password } => {
            let claims = session.sign_in(&email, &password).await?;
            println!("Signed in as {}", claims.username);
        }
        Command::SignUp { email, password } => {
            let result = session.sign_up(&email, &password).await?;
            if result.needs_confirmation {
                println!("Account created. Check {email} for a code, then run `taskdash confirm`.");
            } else {
                println!("Account created and confirmed.");
            }
        }
        Command::Confirm { email, code } => {
            session.confirm_sign_up(&email, &code).await?;
            println!("Account confirmed. You can now sign in.");
        }
        Command::SignOut => {
            session.sign_out().await;
            println!("Signed out.");
        }
        Command::Whoami => match session.session() {
            Session::Authenticated(claims) => {
                println!("username: {}", claims.username);
                println!("subject:  {}", claims.subject_id);
                if let Some(email) = &claims.email {
                    println!("email:    {email}");
                }
            }
            Session::Unauthenticated => return Err(CliError::NotSignedIn),
        },
        Command::Token => {
            let token = session.access_token().await.ok_or(CliError::NotSignedIn)?;
            println!("{token}");
        }
        Command::Tasks { command } => {
            let tasks = TaskApiClient::new(ApiConfig::from_env(), session);
            run_tasks(&tasks, command).await?;
        }
    }
    Ok(())
}

async fn run_tasks(tasks: &TaskApiClient, command: TasksCommand) -> Result<(), CliError> {
    match command {
        TasksCommand::List => {
            let list = tasks.list_tasks().await?;
            if list.is_empty() {
                println!("No tasks.");
            }
            for task in list {
                println!("{}  [{}]  {}", task.id, task.status, task.title);
            }
        }
        TasksCommand::Stats => {
            let stats = tasks.task_stats().await?;
            println!(
                "total {}  pending {}  in progress {}  completed {}  ({:.1}% done)",
                stats.total, stats.pending, stats.in_progress, stats.completed, stats.completion_rate
            );
        }
        TasksCommand::Add {
            title,
            description,
            status,
        } => {
            let task = tasks
                .create_task(&TaskCreate {
                    title,
                    description,
                    status,
                })
                .await?;
            println!("Created {}", task.id);
        }
        TasksCommand::Done { id } => {
            let task = tasks
                .update_task(&id, &TaskUpdate::status(TaskStatus::Completed))
                .await?;
            println!("Completed {}", task.id);
        }
        TasksCommand::Rm { id } => {
            tasks.delete_task(&id).await?;
            println!("Deleted {id}");
        }
    }
    Ok(())
}
