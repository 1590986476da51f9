use std::env;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Keeps the background log writer alive for the whole process
static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

pub const LOG_FILE_ENV: &str = "OBJWALK_LOG_FILE";
pub const DEFAULT_LOG_FILE: &str = "logs/objwalk.log";

/// Where the rolling log file goes: `$OBJWALK_LOG_FILE` or the default
pub fn log_file_path() -> PathBuf {
    env::var_os(LOG_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Install stderr + daily-rolling file logging and the panic hook.
/// Only the first call has any effect.
pub fn init() {
    let log_path = log_file_path();
    let (nb_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(
        log_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new(".")),
        log_path.file_name().unwrap_or(OsStr::new("objwalk.log")),
    ));
    if FILE_GUARD.set(guard).is_err() {
        return;
    }

    // RUST_LOG wins; info otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(nb_writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    install_panic_hook();
}

/// Route panics through tracing, with a backtrace, so they land in the log file too
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "<unknown>".to_string());
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string panic>");
        let bt = std::backtrace::Backtrace::force_capture();
        tracing::error!("panic at {location}: {payload}\nBacktrace:\n{bt:?}");
    }));
}
