use std::collections::HashSet;

use anyhow::Context;

use crate::configuration::SyncSettings;
use crate::directory_client::DirectoryClient;
use crate::domain::SubscribeRecord;
use crate::mailing_list_client::MailingListClient;
use crate::mailing_list_client::MemberStatus;

/// Placeholder for the directory's size until the first page has reported
/// the real count.
const TOTAL_UNKNOWN: u64 = u64::MAX;

/// Collect every email already on the list, across both membership statuses,
/// into one set. Members without an email are skipped silently; the service
/// does hold such records.
#[tracing::instrument(name = "Collecting member emails", skip_all)]
pub async fn collect_member_emails(
    client: &MailingListClient,
    cfg: &SyncSettings,
) -> Result<HashSet<String>, anyhow::Error> {
    let mut emails = HashSet::new();

    for status in [MemberStatus::Subscribed, MemberStatus::Unsubscribed] {
        let limit = cfg.member_page_size;
        let mut start = 0;
        loop {
            let page = client
                .list_members(&cfg.list_id, status, start, limit)
                .await
                .with_context(|| format!("failed to list {status:?} members at offset {start}"))?;

            for member in page.data {
                if !member.email.is_empty() {
                    emails.insert(member.email);
                }
            }

            start += limit;
            if page.total <= start {
                break;
            }
        }
    }

    Ok(emails)
}

/// Reconcile the directory against the mailing list: page through all
/// directory users and batch-subscribe every primary email that is not
/// already on the list, one batch call per page. Returns the number of
/// staged emails.
///
/// Any page-fetch or batch-subscribe failure aborts the run as-is; there is
/// no checkpoint and no resume. The next run reconciles whatever remains.
#[tracing::instrument(name = "Syncing directory users to mailing list", skip_all)]
pub async fn run(
    directory: &DirectoryClient,
    mailing_list: &MailingListClient,
    cfg: &SyncSettings,
) -> Result<u64, anyhow::Error> {
    let member_emails = collect_member_emails(mailing_list, cfg).await?;

    // the membership set stays fixed for the rest of the run: an email that
    // first appears on two different directory pages would be staged twice,
    // bounded remotely by `update_existing: false`
    let mut added: u64 = 0;
    let mut offset: u64 = 0;
    let mut total = TOTAL_UNKNOWN;
    let limit = cfg.user_page_size;

    while offset < total {
        let page = directory
            .get_users(offset, limit)
            .await
            .with_context(|| format!("failed to fetch directory users at offset {offset}"))?;

        // the first page replaces the sentinel; re-reading on later pages
        // keeps the bound current if the directory grows or shrinks mid-run
        total = page.total;

        let mut batch = Vec::new();
        for user in &page.results {
            match user.primary_email() {
                Ok(email) if member_emails.contains(email.as_ref()) => {}
                Ok(email) => batch.push(SubscribeRecord::for_user(user, email)),
                // one bad profile is logged and skipped, never aborting the
                // page it arrived on
                Err(e) => tracing::error!(
                    owner_id = %user.owner_id,
                    error = %e,
                    "could not resolve a usable email; skipping user"
                ),
            }
        }

        if !batch.is_empty() {
            mailing_list
                .batch_subscribe(&cfg.list_id, &batch)
                .await
                .with_context(|| format!("batch-subscribe failed for page at offset {offset}"))?;
            added += batch.len() as u64;
        }

        offset += limit;
    }

    tracing::info!(added, "new emails added");
    Ok(added)
}
