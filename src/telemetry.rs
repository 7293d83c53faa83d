use anyhow::Context;
use prometheus::{register_counter, register_counter_vec, Counter, CounterVec};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUIZ_QUESTIONS_SERVED: CounterVec = register_counter_vec!(
        "trivia_quiz_questions_served_total",
        "Number of quiz questions handed out",
        &["category"]
    )
    .unwrap();
    pub static ref QUESTIONS_CREATED: Counter = register_counter!(
        "trivia_questions_created_total",
        "Number of questions created"
    )
    .unwrap();
    pub static ref QUESTIONS_DELETED: Counter = register_counter!(
        "trivia_questions_deleted_total",
        "Number of questions deleted"
    )
    .unwrap();
}

/// Default directives for the HTTP server.
pub const SERVER_LOG_DIRECTIVES: &str = "info,sqlx=warn,tower_http=debug";
/// Default directives for `trivia-cli`, which only reports its own progress.
pub const CLI_LOG_DIRECTIVES: &str = "warn,trivia_api=info";

/// Installs the global subscriber. `LOG_LEVEL` overrides `default_directives`;
/// `INCLUDE_SPAN_EVENTS=true` also logs span enter and exit.
pub fn init_tracing(default_directives: &str) -> anyhow::Result<()> {
    let level = std::env::var("LOG_LEVEL").ok();
    let (filter, rejected) = env_filter(level.as_deref(), default_directives);

    let span_events = if flag_enabled(std::env::var("INCLUDE_SPAN_EVENTS").ok().as_deref()) {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    };
    let fmt_layer = fmt::layer().with_target(true).with_span_events(span_events);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(directives) = rejected {
        tracing::warn!(%directives, fallback = default_directives, "Ignoring invalid LOG_LEVEL");
    }
    Ok(())
}

/// Filter from `LOG_LEVEL` when it parses, otherwise from `default_directives`.
/// The second value carries directives that were set but rejected.
fn env_filter(level: Option<&str>, default_directives: &str) -> (EnvFilter, Option<String>) {
    match level.map(str::trim).filter(|level| !level.is_empty()) {
        Some(level) => match EnvFilter::try_new(level) {
            Ok(filter) => (filter, None),
            Err(_) => (EnvFilter::new(default_directives), Some(level.to_string())),
        },
        None => (EnvFilter::new(default_directives), None),
    }
}

fn flag_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|value| {
        let value = value.trim();
        value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
    })
}
