//! RTSP Recorder: records an RTSP camera stream to disk on demand over HTTP.

mod app;
mod config;
mod error;
mod http;
mod logging;

pub(crate) use {
    app::App,
    error::{AppError, Result as AppResult},
};

use crate::config::Config;

use tracing::error;

/// Application entry point.
fn main() {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    // Dropping the guard flushes buffered log lines.
    let log_guard = match logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    let exit_code = run(config);

    drop(log_guard);
    std::process::exit(exit_code);
}

fn run(config: Config) -> i32 {
    if let Err(e) = config.validate() {
        error!("Config validation failed: {:?}", e);
        return 1;
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            return 1;
        }
    };

    let app = App { config };
    match rt.block_on(app.run()) {
        Ok(()) => 0,
        Err(e) => {
            error!(error = ?e, "App error");
            1
        }
    }
}
