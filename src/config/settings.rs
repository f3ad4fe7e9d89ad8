//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// JSON-document store backend
    pub store: StoreSettings,

    /// JWT authentication settings
    pub jwt: JwtSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Email provider settings
    pub email: EmailSettings,

    /// Photo upload storage
    pub uploads: UploadSettings,

    /// Shop identity printed on invoices and used for share links
    pub shop: ShopSettings,

    /// Default (protected) user accounts
    pub users: UserSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// Which document store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// External JSON-document server over HTTP
    Http,
    /// In-process store, for local development and tests
    Memory,
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub kind: StoreKind,

    /// Base URL of the document server (e.g., "http://localhost:3001")
    pub url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// JWT authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens
    pub secret: String,

    /// Token lifetime in minutes
    pub expiry_minutes: i64,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// Email provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailSettings {
    /// Provider endpoint accepting `{from, to, subject, html}`
    pub api_url: String,

    /// Provider API key; without one, emails are only logged
    pub api_key: Option<String>,

    /// Sender address
    pub from: String,

    /// Email clients when their order changes state
    pub notify_state_changes: bool,
}

/// Photo upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// Directory files are written to
    pub dir: String,

    /// URL prefix the directory is served under
    pub public_path: String,

    /// Maximum accepted file size in bytes
    pub max_bytes: usize,
}

/// Shop identity.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopSettings {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,

    /// Public base URL of the web app, used to build shareable links
    pub public_url: String,
}

/// Default accounts that can't be deleted or have credentials overwritten.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSettings {
    pub protected_ids: Vec<String>,
    pub protected_emails: Vec<String>,
}

impl UserSettings {
    /// Whether a user id or email belongs to a default account.
    pub fn is_protected(&self, id: Option<&str>, email: Option<&str>) -> bool {
        let by_id = id.is_some_and(|id| self.protected_ids.iter().any(|p| p == id));
        let by_email = email.is_some_and(|email| {
            self.protected_emails
                .iter()
                .any(|p| p.eq_ignore_ascii_case(email.trim()))
        });
        by_id || by_email
    }
}

/// Prefixes already routed by the application
const RESERVED_PATHS: &[&str] = &["/api", "/health", "/metrics"];

/// Minimum required length for JWT secret (256 bits = 32 bytes)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if JWT secret is too short.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("store.kind", "http")?
            .set_default("store.url", "http://localhost:3001")?
            .set_default("store.timeout_secs", 10)?
            .set_default("jwt.expiry_minutes", 480)?
            .set_default("cors.allowed_origins", vec!["http://localhost:5173"])?
            .set_default("email.api_url", "https://api.resend.com/emails")?
            .set_default("email.from", "Garage Manager <no-reply@garage.local>")?
            .set_default("email.notify_state_changes", true)?
            .set_default("uploads.dir", "uploads")?
            .set_default("uploads.public_path", "/uploads")?
            .set_default("uploads.max_bytes", 5 * 1024 * 1024_i64)?
            .set_default("shop.name", "Garage Manager")?
            .set_default("shop.address", "")?
            .set_default("shop.phone", "")?
            .set_default("shop.email", "")?
            .set_default("shop.public_url", "http://localhost:5173")?
            .set_default("users.protected_ids", vec!["1", "2", "3", "4"])?
            .set_default(
                "users.protected_emails",
                vec![
                    "admin@garage.local",
                    "client@garage.local",
                    "technician@garage.local",
                    "quality@garage.local",
                ],
            )?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("store.url", std::env::var("DOCUMENT_STORE_URL").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("email.api_key", std::env::var("EMAIL_API_KEY").ok())?
            .set_override_option("shop.public_url", std::env::var("PUBLIC_URL").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                settings.validate()?;
                Ok(settings)
            })
    }

    /// Sanity checks that deserialization can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "JWT secret must be at least {} characters for security. Current length: {}",
                MIN_JWT_SECRET_LENGTH,
                self.jwt.secret.len()
            )));
        }
        let public_path = &self.uploads.public_path;
        if !public_path.starts_with('/') {
            return Err(ConfigError::Message(
                "uploads.public_path must start with '/'".into(),
            ));
        }
        // The router can't mount files at the root or over its own routes.
        let mount = public_path.trim_end_matches('/');
        if mount.is_empty() {
            return Err(ConfigError::Message(
                "uploads.public_path must not be the root path".into(),
            ));
        }
        if let Some(reserved) = RESERVED_PATHS
            .iter()
            .find(|reserved| mount == **reserved || mount.starts_with(&format!("{}/", reserved)))
        {
            return Err(ConfigError::Message(format!(
                "uploads.public_path must not be under {}",
                reserved
            )));
        }
        Ok(())
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// In-memory store, log-only mailer and the stock default accounts.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Settings {
            server: ServerSettings {
                host: "127.0.0.1".into(),
                port: 0,
            },
            store: StoreSettings {
                kind: StoreKind::Memory,
                url: "http://localhost:3001".into(),
                timeout_secs: 5,
            },
            jwt: JwtSettings {
                secret: "test-secret-key-that-is-at-least-32-chars".into(),
                expiry_minutes: 60,
            },
            cors: CorsSettings {
                allowed_origins: vec![],
            },
            email: EmailSettings {
                api_url: "http://localhost:9/emails".into(),
                api_key: None,
                from: "Taller <no-reply@garage.local>".into(),
                notify_state_changes: true,
            },
            uploads: UploadSettings {
                dir: std::env::temp_dir().join("garage-manager-tests").to_string_lossy().into_owned(),
                public_path: "/uploads".into(),
                max_bytes: 1024 * 1024,
            },
            shop: ShopSettings {
                name: "Taller Central".into(),
                address: "Calle 10 #20-30".into(),
                phone: "+57 300 000 0000".into(),
                email: "hola@taller.test".into(),
                public_url: "https://taller.test/".into(),
            },
            users: UserSettings {
                protected_ids: vec!["1".into(), "2".into(), "3".into(), "4".into()],
                protected_emails: vec![
                    "admin@garage.local".into(),
                    "client@garage.local".into(),
                    "technician@garage.local".into(),
                    "quality@garage.local".into(),
                ],
            },
            environment: "test".into(),
        }
    }
}
