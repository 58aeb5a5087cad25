use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

/// Global configuration, loaded from the `configuration` directory. See
/// `get_configuration`.
#[derive(Deserialize, Clone)]
pub struct Settings {
    pub directory: DirectorySettings,
    pub mailing_list: MailingListSettings,
    pub sync: SyncSettings,
}

/// The user-directory API and the credentials used to open a session on it.
#[derive(Deserialize, Clone)]
pub struct DirectorySettings {
    pub base_url: String,

    /// Login name; empty by default, expected from `APP_DIRECTORY__USERNAME`
    pub username: String,

    /// Login password; empty by default, expected from
    /// `APP_DIRECTORY__PASSWORD`
    pub password: Secret<String>,

    /// Per-request timeout (seconds), the only bound on a hung remote
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_seconds: u64,
}

impl DirectorySettings {
    pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_seconds) }
}

/// The mailing-list API and its key.
#[derive(Deserialize, Clone)]
pub struct MailingListSettings {
    pub base_url: String,

    /// Empty by default, expected from `APP_MAILING_LIST__API_KEY`
    pub api_key: Secret<String>,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_seconds: u64,
}

impl MailingListSettings {
    pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_seconds) }
}

/// Knobs of the reconciliation itself. These were compiled-in constants once;
/// keeping them here makes the job reproducible without code changes.
#[derive(Deserialize, Clone)]
pub struct SyncSettings {
    /// Identifier of the master list all directory users are subscribed to
    pub list_id: String,

    /// How many directory users to fetch per page (default 250)
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub user_page_size: u64,

    /// How many list members to fetch per page (default 14999); member
    /// listings tolerate much larger pages than the directory
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub member_page_size: u64,
}

pub enum Environment {
    Local,
    Production,
}

impl Display for Environment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        )
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!("{e} is not a supported environment; use local or production")),
        }
    }
}

/// Load yaml configuration files at `<project_root>/configuration`: base.yaml
/// first, then the `APP_ENVIRONMENT`-specific file, then `APP_`-prefixed env
/// vars (e.g. `APP_SYNC__LIST_ID` -> `Settings.sync.list_id`).
///
/// All fields must be present in these layers, otherwise initialisation fails
/// immediately and the job does not start. Whether credentials are non-empty
/// is checked later, by `startup::SyncJob::build`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .expect("could not get current dir")
        .join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or("local".to_string())
        .try_into()
        .expect("could not initiate Environment struct");

    let settings = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        .add_source(
            // env vars are always parsed as String; `serde-aux` handles the
            // numeric fields
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
