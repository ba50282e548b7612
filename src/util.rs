use super::diagnostics::{Diagnostics, FieldWarning};
use slog::{Drain, Level, Logger};

/// Replaces newlines with spaces, trims, and collapses interior whitespace runs.
/// Lowercases unless `preserve_case` is set.
pub fn normalize_string(input: &str, preserve_case: bool) -> String {
    let mut text = input.replace('\n', " ").trim().to_string();

    while text.contains("  ") {
        text = text.replace("  ", " ");
    }

    if preserve_case {
        text
    } else {
        text.to_lowercase()
    }
}

/// Normalizes and parses a float, falling back to zero with a warning.
pub fn normalize_float(input: &str, diagnostics: &mut Diagnostics) -> f32 {
    let normalized = normalize_string(input, false);

    match normalized.parse() {
        Ok(value) => value,
        Err(_) => {
            diagnostics.warn(FieldWarning::NumberFormat(normalized));
            0.0
        }
    }
}

/// Takes a timezone abbreviation and translates it to a fixed UTC offset
/// (hours west of UTC), defaulting to UTC.
pub fn tz_to_offset(timezone: &str, diagnostics: &mut Diagnostics) -> &'static str {
    match timezone.trim().to_lowercase().as_ref() {
        "hst" => "1000",
        "hdt" => "0900",
        "akst" => "0900",
        "akdt" => "0800",
        "pst" => "0800",
        "pdt" => "0700",
        "mst" => "0700",
        "mdt" => "0600",
        "cst" => "0600",
        "cdt" => "0500",
        "est" => "0500",
        "edt" => "0400",
        _ => {
            diagnostics.warn(FieldWarning::UnknownTimezone(timezone.to_string()));
            "0000"
        }
    }
}

/// Returns the character columns `start..end` of a fixed-width line, clamped to
/// the line's length. `None` reads to the end of the line.
pub fn columns(line: &str, start: usize, end: Option<usize>) -> &str {
    let byte_at = |column: usize| {
        line.char_indices()
            .nth(column)
            .map(|(i, _)| i)
            .unwrap_or_else(|| line.len())
    };
    let start = byte_at(start);
    let end = end.map(byte_at).unwrap_or_else(|| line.len()).max(start);

    &line[start..end]
}

pub fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_ref() {
        "critical" => Level::Critical,
        "error" => Level::Error,
        "warn" | "warning" => Level::Warning,
        "debug" => Level::Debug,
        "trace" => Level::Trace,
        _ => Level::Info,
    }
}

pub fn root_logger(level: Level) -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = drain.filter_level(level).fuse();

    Logger::root(drain, o!("app" => env!("CARGO_PKG_NAME")))
}
