mod backend_bridge;
mod clipboard;
mod config;
mod controller;
mod document;
mod ui;
mod view;

use anyhow::anyhow;
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::config::{read_non_empty_env_var, Args, BACKEND_URL_ENV};
use crate::controller::UiEvent;
use crate::ui::ConsultantApp;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let startup = config::resolve(&args, read_non_empty_env_var(BACKEND_URL_ENV))?;
    info!(backend_url = %startup.backend_url(), "starting legal consultant");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, startup.transport.clone())?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Legal AI Consultant")
            .with_inner_size([960.0, 760.0])
            .with_min_inner_size([640.0, 520.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Legal AI Consultant",
        options,
        Box::new(move |_cc| Ok(Box::new(ConsultantApp::new(cmd_tx, ui_rx, startup)))),
    )
    .map_err(|err| anyhow!("ui event loop failed: {err}"))
}
