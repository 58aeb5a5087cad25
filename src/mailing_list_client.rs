use std::time::Duration;

use reqwest::Client;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::SubscribeRecord;

/// Membership status categories tracked by the mailing-list service. For
/// reconciliation purposes both count as "already present": a previously
/// unsubscribed user must never be re-subscribed.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Subscribed,
    Unsubscribed,
}

/// Client for the mailing-list API. The key travels in every request body,
/// per that API's convention, so it is kept concealed here.
pub struct MailingListClient {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
}

/// One page of a member listing for a single status.
#[derive(Debug, Deserialize)]
pub struct MemberPage {
    pub total: u64,
    pub data: Vec<MemberInfo>,
}

/// Abridged member record; only the email matters here. Defaults to empty
/// when the service omits the field.
#[derive(Debug, Deserialize)]
pub struct MemberInfo {
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
struct ListMembersRequest<'a> {
    apikey: &'a str,
    id: &'a str,
    status: MemberStatus,
    start: u64,
    limit: u64,
}

#[derive(Serialize)]
struct BatchSubscribeRequest<'a> {
    apikey: &'a str,
    id: &'a str,
    double_optin: bool,
    update_existing: bool,
    batch: &'a [SubscribeRecord],
}

impl MailingListClient {
    pub fn new(
        base_url: String,
        api_key: Secret<String>,
        timeout: Duration,
    ) -> Self {
        let http_client = Client::builder().timeout(timeout).build().unwrap();
        Self {
            http_client,
            base_url,
            api_key,
        }
    }

    /// Fetch one page of members with the given status, starting at `start`.
    #[tracing::instrument(name = "Listing members", skip(self, list_id))]
    pub async fn list_members(
        &self,
        list_id: &str,
        status: MemberStatus,
        start: u64,
        limit: u64,
    ) -> Result<MemberPage, reqwest::Error> {
        let url = format!("{}/listMembers", self.base_url);
        self.http_client
            .post(&url)
            .json(&ListMembersRequest {
                apikey: self.api_key.expose_secret(),
                id: list_id,
                status,
                start,
                limit,
            })
            .send()
            .await?
            .error_for_status()?
            .json::<MemberPage>()
            .await
    }

    /// Submit one batch of new subscribers. Double opt-in is disabled, and
    /// records that turn out to exist remotely after all are left untouched
    /// (`update_existing: false`). Callers skip the call for empty batches.
    #[tracing::instrument(
        name = "Batch-subscribing",
        skip(self, list_id, batch),
        fields(batch_size = batch.len())
    )]
    pub async fn batch_subscribe(
        &self,
        list_id: &str,
        batch: &[SubscribeRecord],
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/listBatchSubscribe", self.base_url);
        self.http_client
            .post(&url)
            .json(&BatchSubscribeRequest {
                apikey: self.api_key.expose_secret(),
                id: list_id,
                double_optin: false,
                update_existing: false,
                batch,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
