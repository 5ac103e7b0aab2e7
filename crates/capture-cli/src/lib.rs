use std::path::PathBuf;

use capture_core::LogFormat;

/// Initialize tracing for the CLI binary.
pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

/// Parse a `PATH[@MIME]` argument; the MIME falls back to `default_mime`.
pub fn parse_file_arg(arg: &str, default_mime: Option<&str>) -> (PathBuf, Option<String>) {
    match arg.rsplit_once('@') {
        Some((path, mime)) if !path.is_empty() && mime.contains('/') => {
            (PathBuf::from(path), Some(mime.to_string()))
        }
        _ => (PathBuf::from(arg), default_mime.map(str::to_string)),
    }
}
