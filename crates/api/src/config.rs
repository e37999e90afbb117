use crate::auth::jwt::JwtConfig;
use crate::auth::password::{hash_password, is_valid_hash};
use crate::media::cloudinary::CloudinaryConfig;

/// Default request body cap for image uploads (10 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted upload request body in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// PostgreSQL connection string. `None` runs on the in-memory store.
    pub database_url: Option<String>,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// The single admin credential.
    pub admin: AdminConfig,
    /// Cloudinary credentials; `None` disables the upload routes.
    pub cloudinary: Option<CloudinaryConfig>,
}

/// Admin login credential, always held as an Argon2id PHC hash.
#[derive(Clone)]
pub struct AdminConfig {
    pub password_hash: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

impl AdminConfig {
    /// Load the admin credential.
    ///
    /// `ADMIN_PASSWORD_HASH` wins when set; otherwise `ADMIN_PASSWORD` is
    /// hashed once here so the plaintext is not kept in memory.
    ///
    /// # Panics
    ///
    /// Panics if neither variable is set, if the hash is not a valid PHC
    /// string, or if the plaintext is empty.
    pub fn from_env() -> Self {
        if let Ok(hash) = std::env::var("ADMIN_PASSWORD_HASH") {
            assert!(
                is_valid_hash(&hash),
                "ADMIN_PASSWORD_HASH must be an Argon2 PHC string"
            );
            return Self {
                password_hash: hash,
            };
        }

        let password = std::env::var("ADMIN_PASSWORD")
            .expect("ADMIN_PASSWORD_HASH or ADMIN_PASSWORD must be set in the environment");
        assert!(!password.is_empty(), "ADMIN_PASSWORD must not be empty");

        Self {
            password_hash: hash_password(&password).expect("Failed to hash ADMIN_PASSWORD"),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `MAX_UPLOAD_BYTES`      | `10485760`                 |
    /// | `DATABASE_URL`          | unset (in-memory store)    |
    ///
    /// See [`JwtConfig::from_env`], [`AdminConfig::from_env`] and
    /// [`CloudinaryConfig::from_env`] for the remaining variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            database_url,
            jwt: JwtConfig::from_env(),
            admin: AdminConfig::from_env(),
            cloudinary: CloudinaryConfig::from_env(),
        }
    }
}

/// Whether `LOG_FORMAT=json` asks for JSON log lines.
///
/// Read before [`ServerConfig::from_env`] so the subscriber is installed
/// while configuration loads.
pub fn log_json_from_env() -> bool {
    std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"))
}
