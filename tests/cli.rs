use std::fs::write;
use std::sync::{Arc, Mutex};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn upload_without_api_key_fails_before_running() {
    let dir = tempdir().unwrap();
    let doc = dir.path().join("entry.md");
    write(&doc, "---\ntime-spent: 1m\n---\n").unwrap();

    let mut cmd = Command::cargo_bin("devjourney").expect("Binary exists");
    cmd.arg("upload").arg(&doc);

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("--api-key"))
        .stdout(predicate::str::contains("Processing file").not());
}

#[test]
fn api_key_is_accepted_before_the_subcommand() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("devjourney").expect("Binary exists");
    cmd.arg("--api-key")
        .arg("k")
        .arg("upload")
        .arg(dir.path().join("absent.md"))
        .arg("--api-root")
        .arg("http://127.0.0.1:9");

    // Parsing succeeds; the run then fails on the missing document.
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("file does not exist"));
}

#[tokio::test]
async fn run_without_api_key_fails_before_touching_the_document() {
    use devjourney::cli::{run, Cli, Commands};

    let dir = tempdir().unwrap();
    let doc = dir.path().join("entry.md");
    write(&doc, "---\ntime-spent: 1m\n---\n").unwrap();

    let cli = Cli {
        api_key: None,
        command: Commands::Upload {
            file: doc,
            api_root: Some("http://127.0.0.1:9".into()),
            require_project: false,
        },
    };

    let err = run(cli).await.unwrap_err();
    assert!(err.to_string().contains("--api-key"), "got: {err}");
}

#[test]
fn upload_of_missing_file_exits_with_code_one() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("devjourney").expect("Binary exists");
    cmd.arg("upload")
        .arg(dir.path().join("absent.md"))
        .arg("--api-key")
        .arg("k")
        .arg("--api-root")
        .arg("http://127.0.0.1:9");

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("file does not exist"));
}

/// Full run against a stub backend: one image uploaded, entry created.
#[tokio::test(flavor = "multi_thread")]
async fn upload_happy_flow_prints_entry_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "Uri": "https://cdn/abc" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "dev",
            "displayName": "Dev",
            "projects": [{ "id": "project-uuid-1", "name": "P1", "slug": "p1", "description": "" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/entries"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": "entry-42" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write(dir.path().join("img.png"), b"png").unwrap();
    let doc = dir.path().join("entry.md");
    write(
        &doc,
        "---\ndate: 2024-01-01\nproject: p1\ntitle: T\nmood: ok\ntime-spent: 45m\n---\n\n![alt](./img.png)\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("devjourney").expect("Binary exists");
    cmd.arg("upload")
        .arg(&doc)
        .arg("--api-key")
        .arg("test-key")
        .arg("--api-root")
        .arg(server.uri());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Entry created successfully with ID: entry-42"));

    let requests = server.received_requests().await.unwrap();
    let entry = requests
        .iter()
        .find(|r| r.url.path() == "/entries")
        .expect("entry request sent");
    let body: serde_json::Value = serde_json::from_slice(&entry.body).unwrap();
    assert_eq!(body["minutesSpent"], 45);
    assert_eq!(body["projectId"], "project-uuid-1");
    assert!(body["content"].as_str().unwrap().contains("https://cdn/abc"));
}

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{:?}", event));
    }
}

#[tokio::test]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use devjourney::cli::{run, Cli, Commands};

    let cli = Cli {
        api_key: Some("k".into()),
        command: Commands::Upload {
            file: std::path::PathBuf::from("does-not-exist.md"),
            api_root: None,
            require_project: false,
        },
    };

    let result = run(cli).await;
    assert!(result.is_err(), "missing document must fail");

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}
