use serde::Deserialize;

use super::SubscriberEmail;

/// One user profile as returned by the directory's paginated listing.
///
/// `emails` is ordered; the first entry is the user's primary address. Many
/// profiles never filled in their name fields, so those default to empty
/// instead of failing deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    pub owner_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub emails: Vec<String>,
}

/// Why a profile yielded no usable email. One failed profile is skipped and
/// logged; it never aborts the page it arrived on.
#[derive(thiserror::Error, Debug)]
pub enum EmailExtractError {
    #[error("profile has no email addresses")]
    NoEmails,
    #[error("{0}")]
    Invalid(String),
}

impl DirectoryUser {
    /// Resolve the primary email (the first entry of `emails`).
    pub fn primary_email(&self) -> Result<SubscriberEmail, EmailExtractError> {
        let raw = self.emails.first().ok_or(EmailExtractError::NoEmails)?;
        SubscriberEmail::parse(raw.clone()).map_err(EmailExtractError::Invalid)
    }
}
