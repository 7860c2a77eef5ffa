use anyhow::{Context, Result};
use serde::Deserialize;
use anyhow::anyhow;
use tracing::warn;

/// Used when neither `auth.jwt_secret` nor `JWT_SECRET` is set.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            worker_threads: Some(4),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".into(), "http://localhost:3001".into()]
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Bearer token verification settings.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
}

/// Where uploaded files end up.
///
/// `upload_dir` always backs the local disk store (video thumbnails, and
/// everything else when no `s3` section is present).
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    #[serde(default)]
    pub s3: Option<S3Config>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { upload_dir: default_upload_dir(), public_base_url: default_public_base_url(), s3: None }
    }
}

fn default_upload_dir() -> String { ".".into() }
fn default_public_base_url() -> String { "".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// `Ok(None)` when `path` does not exist. Unreadable or malformed files are errors.
pub fn load_optional(path: &str) -> Result<Option<AppConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("failed to read {path}")),
    };
    let cfg: AppConfig = toml::from_str(&content).with_context(|| format!("failed to parse {path}"))?;
    Ok(Some(cfg))
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`) if present, otherwise start from
    /// defaults, then apply environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path())
    }

    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        let mut cfg = load_optional(path)?.unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        self.storage.normalize_from_env();
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if let Ok(p) = std::env::var("PORT") {
            self.port = p.parse::<u16>().map_err(|_| anyhow!("PORT must be an integer in 1..=65535"))?;
        }
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if !self.jwt_secret.is_empty() {
            return;
        }
        match std::env::var("JWT_SECRET") {
            Ok(secret) => self.jwt_secret = secret,
            Err(_) => {
                warn!(event = "jwt_secret_fallback", "JWT_SECRET is not set; using the development secret");
                self.jwt_secret = DEV_JWT_SECRET.to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret must not be blank"));
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(dir) = std::env::var("UPLOAD_DIR") {
            self.upload_dir = dir;
        }
        if self.s3.is_none() {
            if let (Ok(bucket), Ok(region)) = (std::env::var("AWS_S3_BUCKET_NAME"), std::env::var("AWS_REGION")) {
                self.s3 = Some(S3Config { bucket, region, endpoint_url: std::env::var("AWS_ENDPOINT_URL").ok() });
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.upload_dir.trim().is_empty() {
            return Err(anyhow!("storage.upload_dir must not be empty"));
        }
        if let Some(s3) = &self.s3 {
            if s3.bucket.trim().is_empty() || s3.region.trim().is_empty() {
                return Err(anyhow!("storage.s3 requires both bucket and region"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [database]
            url = "postgres://u:p@localhost/cms"

            [auth]
            jwt_secret = "s3cret"

            [storage]
            upload_dir = "/var/lib/cms"
            [storage.s3]
            bucket = "assets"
            region = "ap-south-1"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.cors_origins.len(), 2);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.auth.jwt_secret, "s3cret");
        let s3 = cfg.storage.s3.unwrap();
        assert_eq!(s3.bucket, "assets");
        assert!(s3.endpoint_url.is_none());
    }

    #[test]
    fn database_validation_rejects_bad_urls_and_pools() {
        let mut db = DatabaseConfig { url: "mysql://x".into(), ..Default::default() };
        assert!(db.validate().is_err());
        db.url = "sqlite::memory:".into();
        assert!(db.validate().is_ok());
        db.max_connections = 1;
        assert!(db.validate().is_err());
    }

    fn temp_config(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("cms-config-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_file_is_none() {
        let path = std::env::temp_dir().join(format!("cms-config-{}-absent.toml", std::process::id()));
        assert!(load_optional(path.to_str().unwrap()).unwrap().is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_config("malformed", "[server\nport = \"eighty\"");
        let err = AppConfig::load_and_validate_from(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse"), "{err}");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn present_file_is_loaded() {
        let path = temp_config("present", "[server]\nhost = \"127.0.0.1\"\nport = 8081\n");
        let cfg = load_optional(path.to_str().unwrap()).unwrap().unwrap();
        assert_eq!(cfg.server.port, 8081);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn blank_jwt_secret_is_rejected() {
        let mut auth = AuthConfig { jwt_secret: "   ".into() };
        auth.normalize_from_env();
        assert!(auth.validate().is_err());
        assert!(AuthConfig { jwt_secret: "s3cret".into() }.validate().is_ok());
        assert!(AuthConfig { jwt_secret: DEV_JWT_SECRET.into() }.validate().is_ok());
    }

    #[test]
    fn storage_requires_bucket_and_region() {
        let st = StorageConfig {
            s3: Some(S3Config { bucket: "".into(), region: "eu-west-1".into(), endpoint_url: None }),
            ..Default::default()
        };
        assert!(st.validate().is_err());
        assert!(StorageConfig::default().validate().is_ok());
    }
}
