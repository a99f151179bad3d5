//! Shared response types for handlers.
//!
//! Server-rendered pages are returned as a [`Page`]: the template name plus
//! the data maps a renderer fills it with.

use std::collections::BTreeMap;

use axum::Json;
use bookings_core::guest::FieldErrors;
use serde::Serialize;
use serde_json::Value;
use tower_sessions::Session;

use crate::error::{AppError, AppResult};
use crate::session::{self, USER_ID_KEY};

/// A named template and everything needed to render it.
#[derive(Debug, Default, Serialize)]
pub struct Page {
    pub template: &'static str,
    pub string_map: BTreeMap<String, String>,
    pub int_map: BTreeMap<String, i64>,
    pub data: BTreeMap<String, Value>,
    /// Per-field messages when a submitted form is re-displayed.
    pub form_errors: FieldErrors,
    pub flash: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub is_authenticated: bool,
}

impl Page {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            ..Default::default()
        }
    }

    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.string_map.insert(key.into(), value.into());
        self
    }

    pub fn with_int(mut self, key: impl Into<String>, value: i64) -> Self {
        self.int_map.insert(key.into(), value);
        self
    }

    pub fn with_data<T: Serialize>(mut self, key: impl Into<String>, value: &T) -> AppResult<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| AppError::InternalError(format!("Failed to serialize page data: {e}")))?;
        self.data.insert(key.into(), value);
        Ok(self)
    }

    pub fn with_form_errors(mut self, errors: FieldErrors) -> Self {
        self.form_errors = errors;
        self
    }

    /// Attach the one-shot session messages and the login state, consuming
    /// the messages.
    pub async fn render(mut self, session: &Session) -> AppResult<Json<Self>> {
        let messages = session::pop_messages(session).await?;
        self.flash = messages.flash;
        self.warning = messages.warning;
        self.error = messages.error;
        self.is_authenticated = session.get_value(USER_ID_KEY).await?.is_some();
        Ok(Json(self))
    }
}
