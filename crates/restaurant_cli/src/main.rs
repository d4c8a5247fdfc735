//! Extent snapshot round-trip tool.
//!
//! # Responsibility
//! - Load every extent from a data directory, report counts, save them back.
//! - Exit non-zero when any kind fails to load or save.
//!
//! Usage: `restaurant_cli [DATA_DIR]` (defaults to the current directory).

use log::error;
use restaurant_core::{
    core_version, default_log_level, init_logging, ExtentService, ExtentStore, LoadStatus,
    Registry, SaveStatus, StoreConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let data_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let data_dir = match std::path::absolute(&data_dir) {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("cannot resolve data dir `{}`: {err}", data_dir.display());
            return ExitCode::FAILURE;
        }
    };

    let log_dir = data_dir.join("logs");
    if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        eprintln!("logging disabled: {err}");
    }

    println!("restaurant_core version={}", core_version());
    let config = StoreConfig {
        data_dir,
        generated_by: format!("restaurant_cli {}", env!("CARGO_PKG_VERSION")),
        ..StoreConfig::default()
    };
    let service = ExtentService::new(ExtentStore::new(config));

    let mut registry = Registry::new();
    let loaded = service.load_all(&mut registry);
    for report in &loaded.kinds {
        match &report.status {
            LoadStatus::Loaded { count } => println!("{:<12} loaded={count}", report.kind),
            LoadStatus::Missing => println!("{:<12} missing", report.kind),
            LoadStatus::Recovered { reason } => {
                println!("{:<12} recovered_empty reason={reason}", report.kind)
            }
        }
    }
    for violation in &loaded.violations {
        println!("integrity: {violation}");
    }

    let saved = service.save_all(&registry);
    for report in &saved.kinds {
        if let SaveStatus::Failed { reason } = &report.status {
            error!(
                "event=cli_save module=cli status=error kind={} reason={}",
                report.kind, reason
            );
            println!("{:<12} save_failed reason={reason}", report.kind);
        }
    }

    if loaded.recovered() > 0 || saved.failed() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
