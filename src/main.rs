mod app;
mod bindings;
mod color;
mod config;
mod context;
mod data;
mod figure;
mod layout;
mod state;
mod ui;

use std::path::Path;

use anyhow::Context;
use app::AttritionDashApp;
use config::{DashboardConfig, CONFIG_FILE};
use context::DashboardContext;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::load(Path::new(CONFIG_FILE)).context("loading settings")?;

    let table = data::loader::load_table(&config.dataset_path)
        .inspect_err(|e| log::error!("Failed to load dataset: {e}"))
        .with_context(|| format!("loading {}", config.dataset_path.display()))?;
    log::info!(
        "Loaded {} employees from {}",
        table.len(),
        config.dataset_path.display()
    );
    let context = DashboardContext::new(table);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Employee Attrition Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(AttritionDashApp::new(context, &config)))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}
