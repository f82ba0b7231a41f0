//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Default maximum size of an import request body (32 MiB).
pub const DEFAULT_IMPORT_BODY_LIMIT: usize = 32 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// API tokens accepted by the bearer authenticator.
    pub api_tokens: Vec<ApiTokenConfig>,

    /// Maximum dashboards per organization; negative means unlimited (default: -1).
    pub dashboard_quota: i64,

    /// Whether the schema defaults normalizer is enabled (default: false).
    pub schema_defaults_enabled: bool,

    /// Path to plugins directory holding plugin dashboards (default: ./plugins).
    pub plugins_dir: PathBuf,

    /// Maximum import request body size in bytes (default: 32 MiB).
    pub import_body_limit: usize,
}

/// A single configured API token.
///
/// Parsed from `user_id:org_id:login:token` entries of `API_TOKENS`.
#[derive(Clone)]
pub struct ApiTokenConfig {
    pub user_id: i64,
    pub org_id: i64,
    pub login: String,
    pub token: String,
}

// Keep raw tokens out of debug output and logs.
impl std::fmt::Debug for ApiTokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiTokenConfig")
            .field("user_id", &self.user_id)
            .field("org_id", &self.org_id)
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let api_tokens = match env::var("API_TOKENS") {
            Ok(v) => parse_api_tokens(&v).context("API_TOKENS is malformed")?,
            Err(_) => Vec::new(),
        };

        let dashboard_quota = env::var("DASHBOARD_QUOTA")
            .unwrap_or_else(|_| "-1".to_string())
            .parse()
            .context("DASHBOARD_QUOTA must be a valid i64")?;

        let schema_defaults_enabled = env::var("SCHEMA_DEFAULTS_ENABLED")
            .map(|v| parse_bool_flag(&v).unwrap_or(false))
            .unwrap_or(false);

        let plugins_dir = env::var("PLUGINS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./plugins"));

        let import_body_limit = match env::var("IMPORT_BODY_LIMIT") {
            Ok(v) => v
                .parse()
                .context("IMPORT_BODY_LIMIT must be a byte count")?,
            Err(_) => DEFAULT_IMPORT_BODY_LIMIT,
        };

        Ok(Self {
            port,
            cors_allowed_origins,
            api_tokens,
            dashboard_quota,
            schema_defaults_enabled,
            plugins_dir,
            import_body_limit,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_allowed_origins: vec!["*".to_string()],
            api_tokens: Vec::new(),
            dashboard_quota: -1,
            schema_defaults_enabled: false,
            plugins_dir: PathBuf::from("./plugins"),
            import_body_limit: DEFAULT_IMPORT_BODY_LIMIT,
        }
    }
}

/// Parse a boolean-like string.
///
/// Accepts `1`, `t`, `T`, `true`, `TRUE`, `True` and their false counterparts.
/// Returns `None` for anything else.
pub fn parse_bool_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Parse the comma-separated `API_TOKENS` value.
fn parse_api_tokens(value: &str) -> Result<Vec<ApiTokenConfig>> {
    let mut tokens = Vec::new();

    for entry in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let mut parts = entry.splitn(4, ':');
        let (Some(user_id), Some(org_id), Some(login), Some(token)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            bail!("expected user_id:org_id:login:token");
        };

        let user_id: i64 = user_id
            .parse()
            .with_context(|| format!("invalid user id {user_id:?}"))?;
        let org_id: i64 = org_id
            .parse()
            .with_context(|| format!("invalid org id {org_id:?}"))?;

        if token.is_empty() {
            bail!("empty token for user {user_id}");
        }

        tokens.push(ApiTokenConfig {
            user_id,
            org_id,
            login: login.to_string(),
            token: token.to_string(),
        });
    }

    Ok(tokens)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_flag() {
        for v in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(parse_bool_flag(v), Some(true), "{v}");
        }
        for v in ["0", "f", "F", "false", "FALSE", "False"] {
            assert_eq!(parse_bool_flag(v), Some(false), "{v}");
        }
        assert_eq!(parse_bool_flag("yes"), None);
        assert_eq!(parse_bool_flag(""), None);
    }

    #[test]
    fn test_parse_api_tokens() {
        let tokens = parse_api_tokens("1:1:admin:s3cret, 7:2:editor:a:b").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].user_id, 1);
        assert_eq!(tokens[0].login, "admin");
        assert_eq!(tokens[0].token, "s3cret");
        // Token may itself contain colons
        assert_eq!(tokens[1].org_id, 2);
        assert_eq!(tokens[1].token, "a:b");
    }

    #[test]
    fn test_parse_api_tokens_rejects_bad_entries() {
        assert!(parse_api_tokens("1:1:admin").is_err());
        assert!(parse_api_tokens("x:1:admin:tok").is_err());
        assert!(parse_api_tokens("1:1:admin:").is_err());
        assert!(parse_api_tokens("").unwrap().is_empty());
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = ApiTokenConfig {
            user_id: 1,
            org_id: 1,
            login: "admin".to_string(),
            token: "s3cret".to_string(),
        };
        assert!(!format!("{token:?}").contains("s3cret"));
    }
}
