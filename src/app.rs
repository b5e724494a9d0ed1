//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the signal handler, validates
//! both roots, runs the merge and turns its report into an exit status.

use anyhow::{Context, Result, anyhow};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};

use merge_move::cli::Args;
use merge_move::output as out;
use merge_move::progress::print_final_stats;
use merge_move::{
    CONFIG_ENV, MergeMoveError, Merger, default_config_path, load_config, shutdown, validate_roots,
};

use crate::logging::init_tracing;

fn print_config_location() {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        out::print_info(&format!(
            "Using {CONFIG_ENV} (explicit):\n  {}\n",
            std::path::Path::new(&explicit).display()
        ));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default merge_move config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info("No config file exists there; built-in defaults apply.");
            }
        }
        None => out::print_error("Could not determine a default config path"),
    }
}

fn log_failure(e: &MergeMoveError) {
    let code = e.code();
    match e {
        MergeMoveError::InvalidSource { path, problem }
        | MergeMoveError::InvalidTarget { path, problem } => {
            error!(
                code,
                kind = e.kind(),
                path = %path.display(),
                %problem,
                "root validation failed"
            )
        }
        MergeMoveError::CompletedWithErrors(n) => {
            warn!(code, kind = e.kind(), errors = *n, "merge completed with errors")
        }
        MergeMoveError::Interrupted => warn!(code, kind = e.kind(), "merge interrupted by user"),
        MergeMoveError::WorkerSpawn(err) => {
            error!(code, kind = e.kind(), error = %err, "merge could not start")
        }
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    let (mut cfg, cfg_path) = load_config().inspect_err(|e| {
        out::print_error(&format!("Failed to load config: {e:#}"));
    })?;
    args.apply_overrides(&mut cfg);

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt =
        init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).inspect_err(|e| {
            out::print_error(&format!("Failed to initialize logging: {e}"));
        })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        if let Err(e) = ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; finishing in-flight entries...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take(); // drop guard here to flush tracing_appender
            }
        }) {
            warn!(
                error = %e,
                "failed to install signal handler; Ctrl-C will terminate immediately"
            );
        }
    }

    debug!(config = ?cfg, config_path = ?cfg_path, "effective configuration");

    let result = (|| -> Result<()> {
        let source = args.source.as_deref().ok_or_else(|| anyhow!("missing SOURCE argument"))?;
        let target = args.target.as_deref().ok_or_else(|| anyhow!("missing TARGET argument"))?;

        let (source, target) = validate_roots(source, target).inspect_err(|e| {
            log_failure(e);
            out::print_error(&e.to_string());
        })?;

        let options = cfg.options();
        let report = Merger::new(options)
            .run(source, target)
            .inspect_err(|e| {
                log_failure(e);
                out::print_error(&e.to_string());
            })
            .context("merge run failed")?;

        if cfg.stats {
            print_final_stats(&report.stats, report.elapsed);
        }

        report.into_result().map(|_| ()).map_err(|e| {
            log_failure(&e);
            out::print_error(&e.to_string());
            e.into()
        })
    })();

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}
