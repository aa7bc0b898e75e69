use std::env;
use std::path::PathBuf;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Where the collection store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    /// SQLite database at the given path.
    Durable(PathBuf),
    /// Process-local map, lost on restart.
    Memory,
}

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageMode,
    pub migrations_path: PathBuf,
    pub cors_origins: CorsOrigins,
    /// Model credential. `None` keeps the advisor on the template path.
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Upper bound on the summary JSON embedded in a model prompt.
    pub prompt_summary_limit: usize,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let storage = match env::var("MINTAI_STORAGE") {
            Ok(v) if v.eq_ignore_ascii_case("memory") => StorageMode::Memory,
            Ok(v) if !v.is_empty() => StorageMode::Durable(PathBuf::from(
                v.strip_prefix("sqlite://")
                    .or_else(|| v.strip_prefix("sqlite:"))
                    .unwrap_or(&v),
            )),
            _ => StorageMode::Durable(PathBuf::from("data/mintai.db")),
        };

        Self {
            host: env::var("MINTAI_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8787),
            storage,
            migrations_path: env::var("MINTAI_MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("migrations")),
            cors_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| CorsOrigins::parse(&v))
                .unwrap_or(CorsOrigins::Any),
            google_api_key: env::var("GOOGLE_API_KEY")
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.into()),
            prompt_summary_limit: env::var("MINTAI_PROMPT_SUMMARY_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(16 * 1024),
        }
    }

    /// Configuration for an isolated instance: in-memory store, no credential.
    pub fn local() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            storage: StorageMode::Memory,
            migrations_path: PathBuf::from("migrations"),
            cors_origins: CorsOrigins::Any,
            google_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.into(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.into(),
            prompt_summary_limit: 16 * 1024,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn has_model_credential(&self) -> bool {
        self.google_api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_wildcard_and_empty_mean_any() {
        assert_eq!(CorsOrigins::parse("*"), CorsOrigins::Any);
        assert_eq!(CorsOrigins::parse(" , "), CorsOrigins::Any);
        assert_eq!(
            CorsOrigins::parse("http://localhost:5173, https://app.example.com"),
            CorsOrigins::List(vec![
                "http://localhost:5173".into(),
                "https://app.example.com".into()
            ])
        );
    }
}
