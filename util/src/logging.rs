//! Process-wide tracing setup shared by the server and the CLI.

use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config;

const LOG_DIR: &str = "logs";

/// Library crates that log at the same level as the binary. Everything else
/// (hyper, reqwest, tower) stays at `warn`.
const PROTOCOL_CRATES: &[&str] = &["attendance", "util"];

/// Turns `LOG_LEVEL` into `EnvFilter` directives for `component`.
///
/// A bare level such as `debug` applies to `component` and the protocol crates.
/// A value containing `=` or `,` is used verbatim.
pub fn filter_directives(component: &str, log_level: &str) -> String {
    let level = log_level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_owned();
    }
    let level = if level.is_empty() { "info" } else { level };

    let mut directives = vec!["warn".to_owned()];
    directives.extend(
        std::iter::once(component)
            .chain(PROTOCOL_CRATES.iter().copied())
            .map(|target| format!("{target}={level}")),
    );
    directives.join(",")
}

/// Installs the global tracing subscriber for `component` (the binary's crate name).
///
/// Events go to a daily-rolling `LOG_FILE` under `logs/` and, when
/// `LOG_TO_STDOUT=true`, to stdout as well. An unparsable `LOG_LEVEL` falls
/// back to `info`.
///
/// Keep the returned guard alive for the lifetime of the process, otherwise
/// buffered lines are lost.
pub fn init_logging(component: &str) -> WorkerGuard {
    fs::create_dir_all(LOG_DIR).ok();

    let (file_writer, guard) =
        tracing_appender::non_blocking(rolling::daily(LOG_DIR, config::log_file()));

    let directives = filter_directives(component, &config::log_level());
    let env_filter = EnvFilter::try_new(&directives)
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(component, "info")));

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);

    // The CLI shares stdout with its own output, so keep these lines short.
    let stdout_layer = config::log_to_stdout().then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .compact()
    });

    // `try_init` so a second call (tests, embedding) is harmless.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init();

    tracing::info!(component, env = %config::env(), filter = %directives, "Logging initialised");
    guard
}
