mod args;
mod render;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use diary_core::{
    Action, ApiStatus, DiaryConfig, DiaryModel, PreferenceStore, TravelClient, UreqTransport,
};
use directories::ProjectDirs;
use tracing_subscriber::{fmt, EnvFilter};

use args::{Cli, Commands};

type Model = Arc<DiaryModel<UreqTransport>>;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    let store = PreferenceStore::open(&data_dir)
        .with_context(|| format!("opening preferences in {}", data_dir.display()))?;

    match cli.command {
        Commands::Login {
            name,
            email,
            photo_url,
        } => {
            store.save(&diary_core::Identity {
                name,
                email,
                photo_url,
            })?;
            render::identity(&mut io::stdout(), &store.identity())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Logout => {
            store.clear()?;
            println!("Signed out.");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Whoami => {
            render::identity(&mut io::stdout(), &store.identity())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Delete { id, yes: false } if !confirm_delete(id)? => {
            println!("Kept entry {id}.");
            Ok(ExitCode::SUCCESS)
        }
        command => {
            let config = load_config(&data_dir, cli.base_url, cli.timeout_secs)?;
            let model = build_model(&config)?;
            let user_id = store.identity().email;
            if let Commands::Show { id } = command {
                return show(&model, user_id, id).await;
            }
            let action = to_action(command, user_id.clone())?;
            run(&model, &user_id, action).await
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    if let Err(e) = fmt().with_env_filter(filter).with_writer(io::stderr).try_init() {
        eprintln!("tracing init failed: {e}");
    }
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    let dirs = ProjectDirs::from("com", "traveldiary", "diary")
        .context("could not determine a data directory; pass --data-dir")?;
    Ok(dirs.data_dir().to_path_buf())
}

/// `config.json`, then `--base-url` / `--timeout-secs` (or their env vars).
fn load_config(data_dir: &Path, base_url: Option<String>, timeout_secs: Option<u64>) -> Result<DiaryConfig> {
    let mut config = DiaryConfig::load(data_dir)
        .with_context(|| format!("reading config in {}", data_dir.display()))?;
    if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
        config.base_url = url;
    }
    if let Some(secs) = timeout_secs {
        config.timeout_secs = secs;
    }
    tracing::debug!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "config loaded");
    Ok(config)
}

fn build_model(config: &DiaryConfig) -> Result<Model> {
    let client = TravelClient::new(&config.base_url)?;
    let transport = UreqTransport::new(config.timeout());
    Ok(Arc::new(DiaryModel::new(client, transport)))
}

fn read_image(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading image {}", path.display()))
}

fn to_action(command: Commands, user_id: String) -> Result<Action> {
    let action = match command {
        Commands::List => Action::Retrieve { user_id },
        Commands::Add {
            title,
            description,
            image,
        } => Action::Create {
            user_id,
            title,
            description,
            image: read_image(&image)?,
        },
        Commands::Edit {
            id,
            title,
            description,
            image,
        } => Action::Update {
            user_id,
            id,
            title,
            description,
            image: read_image(&image)?,
        },
        Commands::Delete { id, .. } => Action::Delete { user_id, id },
        Commands::Login { .. } | Commands::Logout | Commands::Whoami | Commands::Show { .. } => {
            anyhow::bail!("not a diary action")
        }
    };
    Ok(action)
}

fn confirm_delete(id: i64) -> Result<bool> {
    print!("Delete entry {id}? [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Load the list the way the main screen does before any other action.
async fn load(model: &Model, user_id: &str) -> Result<()> {
    model
        .launch(Action::Retrieve {
            user_id: user_id.to_string(),
        })
        .await
        .context("diary task panicked")
}

/// Run one action on top of a loaded list, show its message once, then
/// render the list. Mutations never move the status, so a rejected change
/// still prints the current entries.
async fn run(model: &Model, user_id: &str, action: Action) -> Result<ExitCode> {
    if !matches!(action, Action::Retrieve { .. }) {
        load(model, user_id).await?;
        if model.state().status == ApiStatus::Failed {
            return report(model);
        }
    }
    model.launch(action).await.context("diary task panicked")?;
    report(model)
}

async fn show(model: &Model, user_id: String, id: i64) -> Result<ExitCode> {
    load(model, &user_id).await?;
    let state = model.state();
    if state.status == ApiStatus::Failed {
        return report(model);
    }
    match state.travels.iter().find(|t| t.id == id) {
        Some(travel) => {
            render::travel(&mut io::stdout(), travel, model.client())?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No travel entry with id {id}.");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn report(model: &Model) -> Result<ExitCode> {
    let state = model.state();
    let failed = state.error_message.is_some();
    if let Some(message) = &state.error_message {
        eprintln!("{message}");
        model.clear_message();
    }
    render::state(&mut io::stdout(), &state, model.client())?;
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
