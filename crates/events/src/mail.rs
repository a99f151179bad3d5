//! The outgoing message envelope.

use serde::{Deserialize, Serialize};

/// A single notification email.
///
/// `content` is HTML. When `template` is set, the delivery channel wraps the
/// content in that template file by replacing its `[%body%]` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailData {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub content: String,
    pub template: Option<String>,
}

impl MailData {
    pub fn new(
        to: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            subject: subject.into(),
            content: content.into(),
            template: None,
        }
    }

    /// Render the body through the named template file.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }
}
