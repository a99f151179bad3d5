//! Create the site owner's admin account.
//!
//! Reads `ADMIN_EMAIL`, `ADMIN_PASSWORD`, `ADMIN_FIRST_NAME`, and
//! `ADMIN_LAST_NAME` (plus `DATABASE_URL`) from the environment or `.env`.

use anyhow::{bail, Context, Result};
use bookings_core::access::ACCESS_LEVEL_ADMIN;
use bookings_db::models::user::CreateUser;
use bookings_db::repositories::UserRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use validator::ValidateEmail;

use bookings_api::auth::password::{hash_password, validate_password_strength};

fn required(name: &str) -> Result<String> {
    let value = std::env::var(name).with_context(|| format!("{name} must be set"))?;
    if value.trim().is_empty() {
        bail!("{name} must not be empty");
    }
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "create_admin=info,bookings_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let email = required("ADMIN_EMAIL")?;
    let password = required("ADMIN_PASSWORD")?;
    let first_name = std::env::var("ADMIN_FIRST_NAME").unwrap_or_else(|_| "Admin".into());
    let last_name = std::env::var("ADMIN_LAST_NAME").unwrap_or_else(|_| "User".into());

    if !email.validate_email() {
        bail!("ADMIN_EMAIL '{email}' is not a valid email address");
    }
    if let Err(msg) = validate_password_strength(&password) {
        bail!(msg);
    }

    let database_url = required("DATABASE_URL")?;
    let pool = bookings_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    bookings_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    let user = UserRepo::create(
        &pool,
        &CreateUser {
            first_name,
            last_name,
            email,
            password_hash,
            access_level: ACCESS_LEVEL_ADMIN,
        },
    )
    .await
    .context("Failed to create admin user (does the email already exist?)")?;

    tracing::info!(user_id = user.id, email = %user.email, "Admin user created");
    Ok(())
}
