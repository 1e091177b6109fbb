use std::{env, io, time::Duration};

use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "STORYBLOCKS_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(env::var(LOG_ENV).ok()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

pub fn emit_success(op: &str, key: Option<&str>, elapsed: Duration) {
    info!(
        target: "storyblocks::telemetry",
        op,
        key = key.unwrap_or("-"),
        status = "ok",
        duration_ms = elapsed.as_millis() as u64,
        "operation finished"
    );
}

pub fn emit_failure(op: &str, key: Option<&str>, elapsed: Duration, error: &str) {
    info!(
        target: "storyblocks::telemetry",
        op,
        key = key.unwrap_or("-"),
        status = "error",
        duration_ms = elapsed.as_millis() as u64,
        error,
        "operation failed"
    );
}

fn build_filter(value: Option<String>) -> EnvFilter {
    value
        .as_deref()
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}
