use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

pub const DEFAULT_SQLITE_URL: &str = "sqlite://data/renovation.sqlite?mode=rwc";

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

/// Filesystem media store and the public prefix media references resolve against.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_root")]
    pub root: String,
    #[serde(default = "default_media_base_url")]
    pub base_url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self { root: default_media_root(), base_url: default_media_base_url() }
    }
}

fn default_media_root() -> String { "media".into() }
fn default_media_base_url() -> String { "http://127.0.0.1:8080/media/".into() }

/// Contact-form notification. Without `owner_email` nothing is sent.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// HTTP mail relay receiving `{from, to, subject, text}` as JSON.
    #[serde(default)]
    pub relay_url: Option<String>,
    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            owner_email: None,
            from_email: default_from_email(),
            relay_url: None,
            timeout_secs: default_notify_timeout(),
        }
    }
}

fn default_from_email() -> String { "noreply@localhost".into() }
fn default_notify_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarginMatch {
    /// Margin only if close to every reference color.
    #[default]
    All,
    /// Margin if close to any reference color.
    Any,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    #[serde(default = "default_manifest")]
    pub manifest: String,
    #[serde(default)]
    pub margin_match: MarginMatch,
    #[serde(default = "default_margin_tolerance")]
    pub margin_tolerance: f32,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            manifest: default_manifest(),
            margin_match: MarginMatch::default(),
            margin_tolerance: default_margin_tolerance(),
        }
    }
}

fn default_source_dir() -> String { "media_to_import".into() }
fn default_manifest() -> String { "import.toml".into() }
fn default_margin_tolerance() -> f32 { 15.0 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Like [`AppConfig::load_and_validate`], but a missing config file falls back to
    /// defaults plus environment variables. A file that exists but fails to parse is an error.
    pub fn load_or_env() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            let mut cfg = AppConfig::default();
            cfg.server.apply_env();
            cfg
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        // 归一化 database（支持从环境变量填充 URL）
        self.database.normalize_from_env();
        self.database.validate()?;
        self.media.validate()?;
        self.notify.normalize();
        self.import.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
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
        // 若 TOML 中未提供 URL，则尝试从环境变量填充，最后回落到本地 SQLite 文件
        if self.url.trim().is_empty() {
            self.url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_SQLITE_URL.to_string());
        }
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.to_lowercase().starts_with("sqlite:")
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url 为空；请在 config.toml 或环境变量 DATABASE_URL 中提供"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url 必须以 postgresql://、postgres:// 或 sqlite: 开头"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections 必须 >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections 必须 >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database 超时配置必须为正整数秒"));
        }
        Ok(())
    }
}

impl MediaConfig {
    fn validate(&self) -> Result<()> {
        if self.root.trim().is_empty() {
            return Err(anyhow!("media.root 不能为空"));
        }
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with('/')) {
            return Err(anyhow!("media.base_url 必须是 http(s):// 地址或以 / 开头的路径"));
        }
        Ok(())
    }
}

impl NotifyConfig {
    fn normalize(&mut self) {
        if self.owner_email.as_deref().is_some_and(|e| e.trim().is_empty()) {
            self.owner_email = None;
        }
        if self.relay_url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            self.relay_url = None;
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = default_notify_timeout();
        }
    }
}

impl ImportConfig {
    fn validate(&self) -> Result<()> {
        if !(self.margin_tolerance.is_finite() && self.margin_tolerance >= 0.0) {
            return Err(anyhow!("import.margin_tolerance 必须是非负数"));
        }
        Ok(())
    }
}
