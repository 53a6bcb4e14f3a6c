use eframe::egui;
use std::sync::mpsc;
use studio::app::StudioApp;
use studio::config;
use studio::generation::SimulatedDispatcher;
use studio::picker::RfdFilePicker;
use studio::workspace::controller::WorkspaceController;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config::config_path();
    let (config, config_warning) = config::load(&config_path);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_target(false)
        .init();

    if let Some(warning) = &config_warning {
        tracing::warn!(path = %config_path.display(), %warning, "config ignored, using defaults");
    }

    let (tx, rx) = mpsc::channel();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("studio-runtime")
        .build()?;

    let dispatcher =
        SimulatedDispatcher::new(tx.clone(), runtime.handle().clone(), config.generation_delay());
    let picker = RfdFilePicker::new(tx, runtime.handle().clone());
    let controller = WorkspaceController::new(Box::new(dispatcher))
        .with_highlight_duration(config.highlight_duration())
        .with_known_api_keys(config.api_keys.clone());

    let app = StudioApp::new(
        rx,
        controller,
        Box::new(picker),
        config_warning.into_iter().collect(),
    );
    let _runtime = runtime;

    tracing::info!(
        delay_ms = config.generation_delay_ms,
        known_keys = config.api_keys.len(),
        "studio starting"
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width as f32, config.window_height as f32])
            .with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Studio",
        native_options,
        Box::new(move |creation_context| {
            app.install_theme(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}
