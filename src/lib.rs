// src/lib.rs

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod sensor;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_and_validate, ConfigFile};
use crate::dispatch::{IdempotentSink, JsonLinesSink};
use crate::engine::{
    spawn_ticker, PollReason, Runtime, RuntimeEvent, RuntimeOptions, SensorCore,
};
use crate::fs::{FileSystem, RealFileSystem};
use crate::sensor::{CursorStore, FileCursorStore, MemoryCursorStore, PollOptions};
use crate::types::CursorStorageMode;

/// Run the binary: load the config, then poll until Ctrl-C (or once with
/// `--once`), writing run requests to stdout as JSON lines.
///
/// Wakeups come from the interval ticker and, with `watch = true`, from the
/// directory watcher. Both feed the same channel as the Ctrl-C task.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let cfg = load_and_validate(&config_path)?;
    let root_dir = config_root_dir(&config_path);

    if args.dry_run {
        print_dry_run(&cfg, &root_dir);
        return Ok(());
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let mut core = build_sensor_core(&cfg, &root_dir, fs)?;
    if args.reset_cursor {
        core.reset()?;
    }

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);

    let _watcher_handle = if args.once {
        rt_tx
            .send(RuntimeEvent::PollRequested {
                reason: PollReason::Interval,
            })
            .await?;
        None
    } else {
        spawn_ticker(cfg.poll_interval(), rt_tx.clone());
        if cfg.sensor.watch {
            let options = PollOptions::from_config(&cfg)?;
            Some(crate::watch::spawn_watcher(
                core.source_dir(),
                options.pattern,
                rt_tx.clone(),
            )?)
        } else {
            None
        }
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "cannot listen for Ctrl-C; stop the process another way");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let sink = IdempotentSink::new(JsonLinesSink::stdout(
        cfg.job.name.clone(),
        cfg.job.op.clone(),
    ));
    let options = RuntimeOptions { once: args.once };

    let runtime = Runtime::new(core, rt_rx, sink, options);
    runtime.run().await?;
    Ok(())
}

/// Build the sensor core described by `cfg`.
///
/// `root` is the directory relative paths in the config resolve against; it
/// also hosts the `.watchpoll/` state directory for file-backed cursors.
pub fn build_sensor_core(
    cfg: &ConfigFile,
    root: &Path,
    fs: Arc<dyn FileSystem>,
) -> Result<SensorCore> {
    let options = PollOptions::from_config(cfg)?;
    let source_dir = resolve_source_dir(root, &cfg.sensor.directory);

    let store: Box<dyn CursorStore> = match cfg.sensor.cursor_storage {
        CursorStorageMode::File => Box::new(FileCursorStore::new(
            root,
            &cfg.sensor.name,
            Arc::clone(&fs),
        )),
        CursorStorageMode::Memory => Box::new(MemoryCursorStore::new()),
    };

    debug!(
        sensor = %cfg.sensor.name,
        dir = ?source_dir,
        storage = ?cfg.sensor.cursor_storage,
        "built sensor core"
    );

    Ok(SensorCore::new(
        cfg.sensor.name.clone(),
        source_dir,
        options,
        fs,
        store,
    ))
}

/// Directory relative config paths resolve against: the config file's parent,
/// or the working directory for a bare file name.
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn resolve_source_dir(root: &Path, directory: &str) -> PathBuf {
    let dir = Path::new(directory);
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}

/// `--dry-run`: print the effective sensor setup.
fn print_dry_run(cfg: &ConfigFile, root: &Path) {
    println!("watchpoll dry-run");
    println!("sensor: {}", cfg.sensor.name);
    println!(
        "  directory = {:?}",
        resolve_source_dir(root, &cfg.sensor.directory)
    );
    println!("  pattern = {}", cfg.sensor.pattern);
    println!("  fingerprint = {}", cfg.sensor.fingerprint);
    println!("  interval = {:?}", cfg.poll_interval());
    println!("  watch = {}", cfg.sensor.watch);
    println!("  cursor_storage = {:?}", cfg.sensor.cursor_storage);
    println!("  name_key = {}", cfg.sensor.name_key);
    println!();
    println!("job: {}", cfg.job.name);
    if let Some(op) = cfg.job.op.as_deref() {
        println!("  op = {op}");
    }
    println!("  key_prefix = {}", cfg.key_prefix());

    info!("dry-run complete (no polling)");
}
