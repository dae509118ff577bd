//! Snipline - screen capture and annotation

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod ui;

use crate::ui::{ExportShared, SniplineApp};
use crossbeam_channel::{bounded, Receiver, Sender};
use export::{save_to_path, CompressionEffort, ExportFormat};
use parking_lot::Mutex;
use raster::Frame;
use session::{Session, Settings};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Export worker commands
pub enum ExportCommand {
    Save {
        frame: Frame,
        path: PathBuf,
        format: ExportFormat,
    },
    Shutdown,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load();
    let session = Session::new(settings.drop_shadow);

    // Encoding and file writes run off the UI thread; committed frames are
    // immutable, so handing the worker a clone is safe.
    let shared = Arc::new(Mutex::new(ExportShared::default()));
    let (cmd_tx, cmd_rx): (Sender<ExportCommand>, Receiver<ExportCommand>) = bounded(4);

    let worker_shared = shared.clone();
    let export_handle = thread::spawn(move || {
        export_worker(cmd_rx, worker_shared);
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([593.0, 160.0])
            .with_title("Snipline"),
        ..Default::default()
    };

    let app_cmd_tx = cmd_tx.clone();
    let result = eframe::run_native(
        "Snipline",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(SniplineApp::new(
                cc,
                session,
                settings,
                app_cmd_tx,
                shared,
            )))
        }),
    );

    let _ = cmd_tx.send(ExportCommand::Shutdown);
    let _ = export_handle.join();

    result.map_err(|e| anyhow::anyhow!("ui error: {e}"))
}

fn export_worker(cmd_rx: Receiver<ExportCommand>, shared: Arc<Mutex<ExportShared>>) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            ExportCommand::Save { frame, path, format } => {
                let outcome = save_to_path(&frame, &path, format, CompressionEffort::default());
                let mut state = shared.lock();
                state.in_flight = false;
                match outcome {
                    Ok(()) => {
                        info!(path = %path.display(), "snip saved");
                        state.status = Some(format!("Saved {}", path.display()));
                    }
                    Err(e) => {
                        error!(path = %path.display(), error = %e, "save failed");
                        state.status = Some(format!("Save failed: {e}"));
                    }
                }
            }
            ExportCommand::Shutdown => break,
        }
    }
}
