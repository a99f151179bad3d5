use std::path::PathBuf;
use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Per-call database timeout in milliseconds (default: `3000`).
    pub db_query_timeout_ms: u64,
    /// Time allowed for draining the mail queue on shutdown (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// Bounded mail queue size (default: `100`).
    pub mail_queue_capacity: usize,
    /// Sender address on every notification.
    pub mail_from: String,
    /// Recipient of new-reservation notifications.
    pub owner_email: String,
    /// Directory holding HTML mail templates.
    pub email_templates_dir: PathBuf,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Mark the session cookie `Secure` (enable behind HTTPS).
    pub session_secure_cookie: bool,
    /// Session inactivity expiry in hours (default: `24`).
    pub session_lifetime_hours: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                     |
    /// |--------------------------|-----------------------------|
    /// | `HOST`                   | `0.0.0.0`                   |
    /// | `PORT`                   | `8080`                      |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                        |
    /// | `DB_QUERY_TIMEOUT_MS`    | `3000`                      |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `10`                        |
    /// | `MAIL_QUEUE_CAPACITY`    | `100`                       |
    /// | `MAIL_FROM`              | `bookings@fortsmythe.local` |
    /// | `OWNER_EMAIL`            | `owner@fortsmythe.local`    |
    /// | `EMAIL_TEMPLATES_DIR`    | `./email-templates`         |
    /// | `STATIC_DIR`             | `./static`                  |
    /// | `SESSION_SECURE_COOKIE`  | `false`                     |
    /// | `SESSION_LIFETIME_HOURS` | `24`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let db_query_timeout_ms: u64 = std::env::var("DB_QUERY_TIMEOUT_MS")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("DB_QUERY_TIMEOUT_MS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let mail_queue_capacity: usize = std::env::var("MAIL_QUEUE_CAPACITY")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("MAIL_QUEUE_CAPACITY must be a valid usize");

        let mail_from =
            std::env::var("MAIL_FROM").unwrap_or_else(|_| "bookings@fortsmythe.local".into());

        let owner_email =
            std::env::var("OWNER_EMAIL").unwrap_or_else(|_| "owner@fortsmythe.local".into());

        let email_templates_dir = std::env::var("EMAIL_TEMPLATES_DIR")
            .unwrap_or_else(|_| "./email-templates".into())
            .into();

        let static_dir = std::env::var("STATIC_DIR")
            .unwrap_or_else(|_| "./static".into())
            .into();

        let session_secure_cookie: bool = std::env::var("SESSION_SECURE_COOKIE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SESSION_SECURE_COOKIE must be true or false");

        let session_lifetime_hours: i64 = std::env::var("SESSION_LIFETIME_HOURS")
            .unwrap_or_else(|_| "24".into())
            .parse()
            .expect("SESSION_LIFETIME_HOURS must be a valid i64");

        Self {
            host,
            port,
            request_timeout_secs,
            db_query_timeout_ms,
            shutdown_timeout_secs,
            mail_queue_capacity,
            mail_from,
            owner_email,
            email_templates_dir,
            static_dir,
            session_secure_cookie,
            session_lifetime_hours,
        }
    }

    pub fn db_query_timeout(&self) -> Duration {
        Duration::from_millis(self.db_query_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
