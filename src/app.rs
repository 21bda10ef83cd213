//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the ctrl-c handler,
//! validates roots, runs the transfer engine and prints the report.

use anyhow::Result;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

use copyutil::cli::Args;
use copyutil::output as out;
use copyutil::prompt::stdin_prompt;
use copyutil::{
    CONFIG_ENV, CancelToken, Config, CopyUtilError, RunReport, TransferEngine,
    create_template_config, default_config_path, load_config_from_xml, validate_and_normalize,
};

use crate::logging::init_tracing;

/// Run the CLI application. Returns false when any file failed or the run was interrupted.
pub fn run(args: Args) -> Result<bool> {
    if args.print_config {
        print_config_location();
        return Ok(true);
    }
    if args.init_config {
        let Some(path) = default_config_path() else {
            out::print_error("Could not determine a config location; set COPYUTIL_CONFIG");
            return Ok(false);
        };
        create_template_config(&path)?;
        out::print_success(&format!("A template config was written to: {}", path.display()));
        out::print_info("Edit it to set `source_path` and `destination_path`, then re-run.");
        return Ok(true);
    }

    // XML first, CLI flags on top
    let mut cfg = load_config_from_xml()?.unwrap_or_default();
    args.apply_overrides(&mut cfg);

    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    // dropping the guard on ctrl-c flushes the file appender
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    let cancel = CancelToken::new();
    {
        let guard_slot = Arc::clone(&guard_slot);
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            if cancel.is_cancelled() {
                if let Ok(mut g) = guard_slot.lock() {
                    let _ = g.take();
                }
                std::process::exit(130);
            }
            cancel.cancel();
            out::print_warn("Received interrupt; finishing the current file (press again to abort)...");
        })
        .expect("failed to install signal handler");
    }

    debug!("Starting copyutil: {:?}", args);

    let result = execute(&cfg, cancel);

    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    let report = result?;
    out::print_report(&report);
    Ok(report.is_clean())
}

fn execute(cfg: &Config, cancel: CancelToken) -> Result<RunReport> {
    let (run_cfg, exclusion) = validate_and_normalize(cfg)?;
    let engine = TransferEngine::new(run_cfg, exclusion)
        .map_err(anyhow::Error::from)
        .inspect_err(log_startup_error)?
        .with_prompt(stdin_prompt())
        .with_cancel(cancel);
    let report = engine.run();
    if report.interrupted {
        let e = CopyUtilError::Interrupted;
        warn!(code = e.code(), kind = "interrupted", "{e}");
    }
    info!(
        succeeded = report.succeeded_count,
        failed = report.failed_count,
        interrupted = report.interrupted,
        "{}",
        report.summary_line()
    );
    Ok(report)
}

fn log_startup_error(e: &anyhow::Error) {
    match e.downcast_ref::<CopyUtilError>() {
        Some(err) => error!(code = err.code(), kind = "config", "{err}"),
        None => error!(error = %format!("{e:#}"), "Startup failed"),
    }
}

fn print_config_location() {
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {explicit}\n"));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default copyutil config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run with --init-config to create a template.");
            }
        }
        None => out::print_error("Could not determine a default config path"),
    }
}
