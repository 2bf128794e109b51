use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Keeps the background writer alive so buffered lines reach the log file.
static FILE_GUARD: OnceCell<Mutex<WorkerGuard>> = OnceCell::new();

/// Initialise logging. The default level is `info`; `debug` can be enabled via
/// the settings file, in which case `RUST_LOG` may override it.
///
/// With `log_file` set, output is written to that file instead of stderr.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    // When debug logging is disabled we force `info` level regardless of the
    // `RUST_LOG` environment variable.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if let Some(path) = log_file {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "fav_files.log".into());
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("failed to create log directory {}: {e}", dir.display());
        }
        let appender = tracing_appender::rolling::never(dir, name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        if builder
            .with_writer(writer)
            .with_ansi(false)
            .try_init()
            .is_ok()
        {
            let _ = FILE_GUARD.set(Mutex::new(guard));
        }
    } else {
        let _ = builder.try_init();
    }
}
