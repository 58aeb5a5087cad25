use mail_sync::configuration::get_configuration;
use mail_sync::configuration::Settings;
use mail_sync::startup::SyncJob;
use mail_sync::telemetry::get_subscriber;
use mail_sync::telemetry::init_subscriber;
use once_cell::sync::Lazy;
use secrecy::Secret;
use serde_json::json;
use wiremock::matchers::body_partial_json;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Init a static subscriber once for the whole binary. To opt in to verbose
/// logging, use the env var `TEST_LOG`:
///
/// ```sh
///      TEST_LOG=true cargo test [test_name] | bunyan
/// ```
static TRACING: Lazy<()> = Lazy::new(|| {
    // the two sink closures have different types, hence the unwieldy match
    // arms instead of assigning the sink to one variable
    match std::env::var("TEST_LOG") {
        Ok(_) => {
            let subscriber = get_subscriber("test", "debug", std::io::stdout);
            init_subscriber(subscriber);
        }
        Err(_) => {
            let subscriber = get_subscriber("test", "debug", std::io::sink);
            init_subscriber(subscriber);
        }
    };
});

/// One sync job under test, wired to a mock directory and a mock
/// mailing-list service.
pub struct TestJob {
    pub directory_server: MockServer,
    pub list_server: MockServer,
    pub cfg: Settings,
}

/// Stand up both mock servers and point a default configuration at them.
/// Credentials are filled in so `SyncJob::build` passes its fail-fast checks.
pub async fn spawn_job() -> TestJob {
    // init the tracing subscriber once only
    Lazy::force(&TRACING);

    let directory_server = MockServer::start().await;
    let list_server = MockServer::start().await;

    let cfg = {
        let mut cfg = get_configuration().unwrap();
        cfg.directory.base_url = directory_server.uri();
        cfg.mailing_list.base_url = list_server.uri();
        cfg.directory.username = "job-runner".to_string();
        cfg.directory.password = Secret::new("hunter2".to_string());
        cfg.mailing_list.api_key = Secret::new("test-api-key".to_string());
        cfg
    };

    TestJob {
        directory_server,
        list_server,
        cfg,
    }
}

impl TestJob {
    /// Build and run the job against the mock servers.
    pub async fn run(&self) -> Result<u64, anyhow::Error> {
        SyncJob::build(self.cfg.clone())
            .expect("failed to build sync job")
            .run_until_completion()
            .await
    }

    /// Accept any login attempt on the mock directory.
    pub async fn mount_login(&self) {
        Mock::given(method("POST"))
            .and(path("/session"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&self.directory_server)
            .await;
    }

    /// Serve one page of the user listing at the given offset. Every mounted
    /// page is expected to be fetched exactly once.
    pub async fn mount_user_page(
        &self,
        offset: u64,
        total: u64,
        users: Vec<serde_json::Value>,
    ) {
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("offset", offset.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": users,
                "totalNumberOfResults": total,
            })))
            .expect(1)
            .mount(&self.directory_server)
            .await;
    }

    /// Serve a whole status category of the member listing in a single page
    /// (the default member page size far exceeds these fixtures).
    pub async fn mount_members(
        &self,
        status: &str,
        emails: &[&str],
    ) {
        Mock::given(method("POST"))
            .and(path("/listMembers"))
            .and(body_partial_json(json!({ "status": status })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": emails.len(),
                "data": emails.iter().map(|e| json!({ "email": e })).collect::<Vec<_>>(),
            })))
            .expect(1)
            .mount(&self.list_server)
            .await;
    }

    /// Accept batch-subscribe calls, asserting (on drop) how many arrive.
    pub async fn mount_batch_subscribe(
        &self,
        expected_calls: u64,
    ) {
        Mock::given(method("POST"))
            .and(path("/listBatchSubscribe"))
            .respond_with(ResponseTemplate::new(200))
            .expect(expected_calls)
            .mount(&self.list_server)
            .await;
    }
}

/// A directory profile fixture in the wire format of the user listing.
pub fn user(
    owner_id: &str,
    first_name: &str,
    last_name: &str,
    emails: &[&str],
) -> serde_json::Value {
    json!({
        "ownerId": owner_id,
        "firstName": first_name,
        "lastName": last_name,
        "emails": emails,
    })
}

/// Matches a batch-subscribe request whose `batch` array has exactly the
/// given number of records.
pub struct BatchOfSize(pub usize);

impl wiremock::Match for BatchOfSize {
    fn matches(
        &self,
        request: &wiremock::Request,
    ) -> bool {
        serde_json::from_slice::<serde_json::Value>(&request.body)
            .ok()
            .and_then(|body| Some(body.get("batch")?.as_array()?.len() == self.0))
            .unwrap_or(false)
    }
}
