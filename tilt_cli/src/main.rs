#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod check;
mod cli;
mod error_fmt;
mod logging;
mod run;

use clap::Parser;
use eyre::WrapErr;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tilt_config::Config;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{CONFIG_CONTEXT, exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

/// Load the config file; a missing file means built-in defaults.
fn load_config(path: &Path) -> eyre::Result<(Config, bool)> {
    if !path.exists() {
        return Ok((Config::default(), false));
    }
    let cfg = tilt_config::load_file(path).wrap_err(CONFIG_CONTEXT)?;
    Ok((cfg, true))
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    color_eyre::install()?;

    let (cfg, from_file) = load_config(&cli.config)?;
    logging::init(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
    if from_file {
        tracing::info!(path = %cli.config.display(), "config loaded");
    } else {
        tracing::info!(path = %cli.config.display(), "config file not found; using built-in defaults");
    }

    match cli.cmd {
        Commands::Run {
            port,
            sim,
            max_run_ms,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = shutdown.clone();
            if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                tracing::warn!(error = %e, "could not install Ctrl-C handler");
            }
            run::run(
                &cfg,
                run::RunOpts {
                    port,
                    sim,
                    max_run_ms,
                },
                shutdown,
            )
        }
        Commands::SelfCheck => {
            check::self_check(&cfg, cli.json);
            Ok(())
        }
        Commands::PrintConfig => {
            let text = if cli.json {
                serde_json::to_string_pretty(&cfg)?
            } else {
                toml::to_string_pretty(&cfg)?
            };
            println!("{text}");
            Ok(())
        }
    }
}
