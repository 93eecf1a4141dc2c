//! Resell decision engine CLI.
//!
//! `resell replay` runs one full session against a recorded recognition
//! script and prints what the session saw and decided. `resell check-config`
//! validates a configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;

use resell::core::params::{SessionParams, parse_minimum_profit};
use resell::error::ConfigError;
use resell::exit_codes;
use resell::io::config::{DEFAULT_CONFIG_FILE, load_config};
use resell::io::device::{Device, Host, NoDelay, Pacer, ThreadPacer};
use resell::io::replay::{
    InputEvent, OverrideCall, RecordingInput, RecordingMessages, RecordingTasks,
    ReplayRecognizer, ReplayScreen, load_script,
};
use resell::logging;
use resell::session::{DEFAULT_CURRENT_TASK, ScanSession, SessionRequest, run_session};

#[derive(Parser)]
#[command(
    name = "resell",
    version,
    about = "Grid-scanning resell decision engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one session against a recorded recognition script.
    Replay {
        /// TOML script with per-region recognition responses.
        #[arg(short, long)]
        script: PathBuf,
        /// Config file (defaults apply when missing).
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Minimum profit required to buy.
        #[arg(long, conflicts_with = "params", allow_hyphen_values = true)]
        minimum_profit: Option<String>,
        /// Scheduler action parameters, e.g. `{"MinimumProfit": 300}`.
        #[arg(long)]
        params: Option<String>,
        /// Scheduler task whose successor gets overridden.
        #[arg(long, default_value = DEFAULT_CURRENT_TASK)]
        current_task: String,
        /// Honor settle delays instead of skipping them.
        #[arg(long)]
        realtime: bool,
    },
    /// Validate a config file and print the effective configuration.
    CheckConfig {
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

/// Everything a replayed session produced, printed as JSON.
#[derive(Serialize)]
struct SessionReport {
    session: ScanSession,
    messages: Vec<String>,
    overrides: Vec<OverrideCall>,
    inputs: Vec<InputEvent>,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Replay {
            script,
            config,
            minimum_profit,
            params,
            current_task,
            realtime,
        } => {
            let params = session_params(minimum_profit.as_deref(), params.as_deref())?;
            cmd_replay(&script, &config, params, current_task, realtime)
        }
        Command::CheckConfig { config } => cmd_check_config(&config),
    }
}

fn session_params(minimum_profit: Option<&str>, params: Option<&str>) -> Result<SessionParams> {
    match (minimum_profit, params) {
        (Some(raw), _) => Ok(SessionParams {
            minimum_profit: parse_minimum_profit(raw)?,
        }),
        (None, Some(json)) => Ok(SessionParams::from_json(json)?),
        (None, None) => {
            bail!(ConfigError::MinimumProfit(
                "pass --minimum-profit or --params".to_string()
            ))
        }
    }
}

fn cmd_replay(
    script_path: &Path,
    config_path: &Path,
    params: SessionParams,
    current_task: String,
    realtime: bool,
) -> Result<()> {
    let cfg = load_config(config_path)?;
    let script = load_script(script_path)?;

    let screen = ReplayScreen::default();
    let recognizer = ReplayRecognizer::from_script(script);
    let input = RecordingInput::default();
    let tasks = RecordingTasks::default();
    let messages = RecordingMessages::default();
    let pacer: &dyn Pacer = if realtime { &ThreadPacer } else { &NoDelay };

    let session = run_session(
        Device {
            screen: &screen,
            recognizer: &recognizer,
            input: &input,
            pacer,
        },
        Host {
            tasks: &tasks,
            messages: &messages,
        },
        &cfg,
        &SessionRequest {
            current_task,
            params,
        },
    )
    .with_context(|| format!("replay {}", script_path.display()))?;

    let report = SessionReport {
        session,
        messages: messages.messages(),
        overrides: tasks.calls(),
        inputs: input.events(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize session report")?
    );
    Ok(())
}

fn cmd_check_config(config_path: &Path) -> Result<()> {
    let cfg = load_config(config_path)?;
    print!("{}", cfg.to_toml()?);
    Ok(())
}
