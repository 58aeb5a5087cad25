use std::time::Duration;

use reqwest::Client;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::DirectoryUser;

/// Client for the user-directory API.
///
/// `login` establishes a session; the cookie it sets is held in the client's
/// cookie store and replayed on every subsequent call, so the same instance
/// must be used for the whole run.
pub struct DirectoryClient {
    http_client: Client,
    base_url: String,
}

/// One page of the user listing, plus the directory's total user count at the
/// time of the call.
#[derive(Debug, Deserialize)]
pub struct UserPage {
    pub results: Vec<DirectoryUser>,
    #[serde(rename = "totalNumberOfResults")]
    pub total: u64,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

impl DirectoryClient {
    pub fn new(
        base_url: String,
        timeout: Duration,
    ) -> Self {
        let http_client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .unwrap();
        Self {
            http_client,
            base_url,
        }
    }

    /// Open an authenticated session. Anything but a 2xx (bad credentials
    /// included) is an error.
    #[tracing::instrument(name = "Logging in to directory", skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &Secret<String>,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/session", self.base_url);
        self.http_client
            .post(&url)
            .json(&LoginRequest {
                username,
                password: password.expose_secret(),
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Fetch one page of users. The `total` of the returned page is
    /// authoritative for the whole collection at the time of the call.
    #[tracing::instrument(name = "Fetching directory users", skip(self))]
    pub async fn get_users(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<UserPage, reqwest::Error> {
        let url = format!("{}/users", self.base_url);
        self.http_client
            .get(&url)
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await?
            .error_for_status()?
            .json::<UserPage>()
            .await
    }
}
