use anyhow::Context;
use secrecy::ExposeSecret;

use crate::configuration::Settings;
use crate::directory_client::DirectoryClient;
use crate::mailing_list_client::MailingListClient;
use crate::sync;

/// Raised by `SyncJob::build`, strictly before any network activity.
#[derive(thiserror::Error, Debug)]
pub enum JobBuildError {
    #[error("missing required credential: {0}")]
    MissingCredential(&'static str),
    #[error("page sizes must be greater than zero")]
    InvalidPageSize,
}

/// One fully-constructed synchronization job: both API clients plus the
/// settings that drive the reconciliation.
pub struct SyncJob {
    directory: DirectoryClient,
    mailing_list: MailingListClient,
    cfg: Settings,
}

impl SyncJob {
    /// Validate credentials and construct both API clients. No network I/O
    /// happens here; the directory login is deferred to
    /// `run_until_completion`.
    pub fn build(cfg: Settings) -> Result<Self, JobBuildError> {
        if cfg.mailing_list.api_key.expose_secret().is_empty() {
            return Err(JobBuildError::MissingCredential("mailing_list.api_key"));
        }
        if cfg.directory.username.is_empty() {
            return Err(JobBuildError::MissingCredential("directory.username"));
        }
        if cfg.directory.password.expose_secret().is_empty() {
            return Err(JobBuildError::MissingCredential("directory.password"));
        }
        // a zero page size would make the pagination loops spin forever
        if cfg.sync.user_page_size == 0 || cfg.sync.member_page_size == 0 {
            return Err(JobBuildError::InvalidPageSize);
        }

        let directory = DirectoryClient::new(cfg.directory.base_url.clone(), cfg.directory.timeout());
        let mailing_list = MailingListClient::new(
            cfg.mailing_list.base_url.clone(),
            cfg.mailing_list.api_key.clone(),
            cfg.mailing_list.timeout(),
        );

        Ok(Self {
            directory,
            mailing_list,
            cfg,
        })
    }

    /// Log in to the directory, then run the reconciliation. Because this
    /// consumes `self`, it is the final call on the job. Returns the number
    /// of new emails added to the list.
    pub async fn run_until_completion(self) -> Result<u64, anyhow::Error> {
        self.directory
            .login(&self.cfg.directory.username, &self.cfg.directory.password)
            .await
            .context("directory login failed")?;

        sync::run(&self.directory, &self.mailing_list, &self.cfg.sync).await
    }
}
