use tracing::level_filters::LevelFilter;

/// Maps a configured verbosity name to a tracing level. Unknown or blank
/// values fall back to `INFO`.
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    let Some(value) = value else {
        return LevelFilter::INFO;
    };
    match value.trim().to_ascii_uppercase().as_str() {
        "TRACE" | "FINEST" => LevelFilter::TRACE,
        "DEBUG" | "FINE" => LevelFilter::DEBUG,
        "INFO" | "INFORMATION" => LevelFilter::INFO,
        "WARN" | "WARNING" => LevelFilter::WARN,
        "ERROR" | "SEVERE" | "CRITICAL" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

/// Installs the global fmt subscriber. `RUST_LOG` takes precedence over
/// `level` when set.
pub fn init_tracing(level: LevelFilter) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_names() {
        assert_eq!(parse_level(Some("TRACE")), LevelFilter::TRACE);
        assert_eq!(parse_level(Some("debug")), LevelFilter::DEBUG);
        assert_eq!(parse_level(Some("Info")), LevelFilter::INFO);
        assert_eq!(parse_level(Some("warn")), LevelFilter::WARN);
        assert_eq!(parse_level(Some("ERROR")), LevelFilter::ERROR);
    }

    #[test]
    fn parses_synonyms() {
        assert_eq!(parse_level(Some("finest")), LevelFilter::TRACE);
        assert_eq!(parse_level(Some("FINE")), LevelFilter::DEBUG);
        assert_eq!(parse_level(Some("information")), LevelFilter::INFO);
        assert_eq!(parse_level(Some(" Warning ")), LevelFilter::WARN);
        assert_eq!(parse_level(Some("severe")), LevelFilter::ERROR);
        assert_eq!(parse_level(Some("critical")), LevelFilter::ERROR);
    }

    #[test]
    fn unknown_or_missing_defaults_to_info() {
        assert_eq!(parse_level(None), LevelFilter::INFO);
        assert_eq!(parse_level(Some("")), LevelFilter::INFO);
        assert_eq!(parse_level(Some("loud")), LevelFilter::INFO);
    }
}
