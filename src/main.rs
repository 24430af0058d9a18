mod calculator;
mod classify;
mod config;
mod error;
mod feed;
mod fetch;
mod filter;
mod model;
mod normalize;
mod reveal;
mod summary;
mod ui;

use config::Config;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ui::CalculatorApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skin_calculator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "falling back to default settings");
        Config::default()
    });
    tracing::info!(
        app_id = config.app_id,
        currency = %config.currency,
        snapshot = ?config.snapshot_db,
        "starting calculator"
    );
    let feed = config.price_feed();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Skin Resale Calculator",
        options,
        Box::new(move |cc| {
            ui::set_custom_style(&cc.egui_ctx);
            Ok(Box::new(CalculatorApp::new(config, feed)))
        }),
    )
}
