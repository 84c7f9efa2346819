//! # Server Settings
//!
//! Runtime switches read from the environment at startup.

/// Settings that change handler behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerSettings {
    /// Allow employees to sign themselves up through `/api/mobile/register`
    pub mobile_self_registration: bool,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins:             Vec<String>,
}

impl ServerSettings {
    /// Reads `EXPO_MOBILE_SELF_REGISTRATION` and `EXPO_CORS_ORIGINS`.
    pub fn from_env() -> Self {
        Self {
            mobile_self_registration: env_flag("EXPO_MOBILE_SELF_REGISTRATION"),
            cors_origins:             std::env::var("EXPO_CORS_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
        }
    }
}

/// True for `1`, `true`, `yes` or `on`, case-insensitively.
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| parse_flag(&value))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("enabled"));
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("https://admin.expo.test, http://localhost:5173,,"),
            vec!["https://admin.expo.test", "http://localhost:5173"]
        );
        assert!(parse_origins("  ").is_empty());
    }
}
