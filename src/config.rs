use crate::engine::types::PieceKind;

/// How the replay binary prints the final position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Runtime configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `tracing` filter directive.
    pub log_filter: String,
    /// Output format for the final position.
    pub output: OutputFormat,
    /// Promotion piece used when a replayed move reaches the last rank
    /// without naming one.
    pub default_promotion: PieceKind,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from any variable lookup. Unset or unparsable values
    /// fall back to the defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = AppConfig::default();
        AppConfig {
            log_filter: var("CHESS_LOG").unwrap_or(defaults.log_filter),
            output: var("CHESS_OUTPUT")
                .and_then(|v| match v.trim().to_ascii_lowercase().as_str() {
                    "text" => Some(OutputFormat::Text),
                    "json" => Some(OutputFormat::Json),
                    _ => None,
                })
                .unwrap_or(defaults.output),
            default_promotion: var("CHESS_DEFAULT_PROMOTION")
                .and_then(|v| {
                    let mut chars = v.trim().chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => PieceKind::from_char(c),
                        _ => None,
                    }
                })
                .map(|(_, kind)| kind)
                .filter(|kind| kind.is_promotion_target())
                .unwrap_or(defaults.default_promotion),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_filter: "chess_rules=info".to_string(),
            output: OutputFormat::Text,
            default_promotion: PieceKind::Queen,
        }
    }
}
