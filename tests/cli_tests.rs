mod common;

use common::{run_minutesmaster, TestEnv};

#[test]
fn help_shows_usage() {
    let output = run_minutesmaster(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "--help should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("profile"));
}

#[test]
fn version_shows_version() {
    let output = run_minutesmaster(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("minutesmaster "));
}

#[test]
fn completions_bash_outputs_script() {
    let output = run_minutesmaster(&["completions", "bash"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "completions bash should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    assert!(
        stdout.contains("minutesmaster"),
        "expected completion output to reference command name\nstdout:\n{}",
        stdout
    );
}

#[test]
fn config_show_prints_defaults() {
    let output = run_minutesmaster(&["config", "show"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "config show should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    assert!(stdout.contains("[general]"));
    assert!(stdout.contains("[api]"));
    assert!(stdout.contains("provider = \"openrouter\""));
    assert!(stdout.contains("timeout_secs = 120"));
}

#[test]
fn config_show_masks_api_key() {
    let env = TestEnv::new();
    env.write_config("[api]\napi_key = \"sk-live-secret\"\n");

    let output = env.run(&["config", "show"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(!stdout.contains("sk-live-secret"));
    assert!(stdout.contains("********"));
}

#[test]
fn config_init_refuses_to_overwrite_without_force() {
    let env = TestEnv::new();

    let first = env.run(&["config", "init"]);
    assert!(first.status.success());
    assert!(env.config_path().exists());

    let second = env.run(&["config", "init"]);
    let stderr = String::from_utf8_lossy(&second.stderr);
    assert!(!second.status.success());
    assert!(stderr.contains("--force"), "stderr:\n{}", stderr);

    let forced = env.run(&["config", "init", "--force"]);
    assert!(forced.status.success());
}

#[test]
fn generate_rejects_empty_transcript() {
    let env = TestEnv::new();
    env.write_config("[api]\napi_key = \"test-key\"\n");
    let transcript = env.write_file("empty.txt", "   \n");

    let output = env.run(&["generate", transcript.to_str().expect("utf-8 path")]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(
        stderr.contains("Transcript cannot be empty"),
        "stderr:\n{}",
        stderr
    );
}

#[test]
fn generate_requires_api_key() {
    let env = TestEnv::new();
    let transcript = env.write_file("meeting.txt", "John: hello\nSarah: hi");

    let output = env.run(&["generate", transcript.to_str().expect("utf-8 path")]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("API key is required"), "stderr:\n{}", stderr);
}

#[test]
fn generate_rejects_unknown_format() {
    let env = TestEnv::new();
    let transcript = env.write_file("meeting.txt", "John: hello");

    let output = env.run(&[
        "generate",
        transcript.to_str().expect("utf-8 path"),
        "--format",
        "pdf",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Unsupported format: pdf"), "stderr:\n{}", stderr);
}

#[test]
fn export_renders_saved_minutes_as_text() {
    let env = TestEnv::new();
    let minutes = env.write_file(
        "minutes.json",
        r#"{
            "title": "Portal Launch",
            "date": "2025-01-11",
            "attendees": ["John", "Sarah"],
            "agenda": ["Launch"],
            "keyDecisions": ["Launch next week"],
            "actionItems": [{"task": "Run tests", "assignee": "Sarah", "dueDate": "Friday"}],
            "nextSteps": [],
            "summary": "Launch agreed."
        }"#,
    );

    let output = env.run(&[
        "export",
        minutes.to_str().expect("utf-8 path"),
        "--format",
        "txt",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "export should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    assert!(stdout.starts_with("Portal Launch\n"));
    assert!(stdout.contains("  - Run tests (owner: Sarah, due: Friday)"));
}

#[test]
fn test_connection_without_key_fails() {
    let output = run_minutesmaster(&["test-connection"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("API key is required"), "stderr:\n{}", stderr);
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_basic_sends_required_fields_contract() {
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    let content = json!({
        "title": "Portal Launch",
        "date": "2025-01-11",
        "attendees": ["John", "Sarah"],
        "agenda": ["Launch"],
        "keyDecisions": ["Launch next week"],
        "actionItems": [{"task": "Run tests", "assignee": "Sarah", "dueDate": "Friday"}],
        "nextSteps": []
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new();
    env.write_config(&format!(
        "[api]\nprovider = \"custom\"\napi_key = \"sk-cli\"\nbase_url = \"{}/v1\"\n",
        server.uri()
    ));
    let transcript = env.write_file("meeting.txt", "John: launch next week\nSarah: I'll test");
    let transcript = transcript.to_str().expect("utf-8 path").to_string();

    let output = tokio::task::spawn_blocking(move || {
        env.run(&["generate", &transcript, "--basic", "--format", "json"])
    })
    .await
    .expect("join cli run");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "generate should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    let minutes: Value = serde_json::from_str(&stdout).expect("json minutes");
    assert_eq!(minutes["title"], "Portal Launch");
    assert_eq!(minutes["actionItems"][0]["dueDate"], "Friday");

    let received = server.received_requests().await.expect("recording enabled");
    let body: Value = serde_json::from_slice(&received[0].body).expect("request body");
    let prompt = body["messages"][1]["content"].as_str().expect("user prompt");
    assert!(prompt.contains("\"nextSteps\""));
    assert!(!prompt.contains("\"summary\""));
    assert!(!prompt.contains("\"duration\""));
}
