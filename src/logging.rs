use std::env;
use logdel::RunMode;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "./logs/logdel.log";

/// Stdout plus a non-blocking file layer. Keep the returned guard alive
/// until exit or buffered lines in the file layer are lost.
pub fn init_logger(mode: RunMode) -> impl Drop {
    let filter = env::var("TRACING_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter_layer = EnvFilter::new(filter);

    let log_file_path = log_file_path();
    let file_appender = tracing_appender::rolling::never("./", &log_file_path);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_file(false)
                .with_target(false)
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter_layer)
        .init();

    info!(
        "logdel {} run, logging to stdout and {}",
        mode_label(mode),
        log_file_path
    );

    guard
}

fn log_file_path() -> String {
    env::var("LOG_FILE_PATH")
        .ok()
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
}

fn mode_label(mode: RunMode) -> &'static str {
    match mode {
        RunMode::Preview => "dry",
        RunMode::Delete => "deleting",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_label_names_run_mode() {
        assert_eq!(mode_label(RunMode::from_dry_run(true)), "dry");
        assert_eq!(mode_label(RunMode::from_dry_run(false)), "deleting");
    }
}
