use serde::Serialize;

use super::DirectoryUser;
use super::SubscriberEmail;

/// Email format marker understood by the mailing-list service.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailFormat {
    Html,
    Text,
}

/// One entry of a batch-subscribe request. The upper-case field names are the
/// mailing-list API's merge-field convention.
#[derive(Debug, Serialize)]
pub struct SubscribeRecord {
    #[serde(rename = "EMAIL")]
    pub email: SubscriberEmail,
    #[serde(rename = "EMAIL_TYPE")]
    pub email_format: EmailFormat,
    #[serde(rename = "FNAME")]
    pub first_name: String,
    #[serde(rename = "LNAME")]
    pub last_name: String,
}

impl SubscribeRecord {
    /// Stage a record for a directory user, in `html` format. Names are
    /// passed through as-is; `email` has already been resolved and validated
    /// by the caller.
    pub fn for_user(
        user: &DirectoryUser,
        email: SubscriberEmail,
    ) -> Self {
        Self {
            email,
            email_format: EmailFormat::Html,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}
