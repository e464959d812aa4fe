use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct TasksResponse {
    date: String,
    tasks: Vec<String>,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct ExecutionItem {
    task: String,
    done: bool,
    time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExecutionResponse {
    planned: usize,
    executed: usize,
    items: Vec<ExecutionItem>,
}

#[derive(Debug, Deserialize)]
struct RevisionEntry {
    topic: String,
    date: String,
}

#[derive(Debug, Deserialize)]
struct RevisionsResponse {
    total: usize,
    recent: Vec<RevisionEntry>,
}

#[derive(Debug, Deserialize)]
struct MockRecord {
    score: String,
    accuracy: String,
    mistakes: String,
    fixes: String,
    date: String,
}

#[derive(Debug, Deserialize)]
struct MockResponse {
    record: Option<MockRecord>,
    stale: bool,
}

#[derive(Debug, Deserialize)]
struct MistakesResponse {
    mistakes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WeakTopicView {
    text: String,
    age_days: i64,
    status: String,
}

#[derive(Debug, Deserialize)]
struct WeakResponse {
    days_passed: i64,
    days_remaining: i64,
    topics: Vec<WeakTopicView>,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct ThemeResponse {
    mode: String,
    effective: String,
}

#[derive(Debug, Deserialize)]
struct CountdownResponse {
    total_days: i64,
    passed_days: i64,
    days_left: i64,
    progress_percent: i64,
}

#[derive(Debug, Deserialize)]
struct LastVideoResponse {
    chapter: String,
    video_id: Option<String>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("study_dash_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/countdown")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_study_dash"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

#[tokio::test]
async fn http_task_planning_and_execution() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for task in ["revise laplace", "solve networks set", "watch control lecture"] {
        let response = client
            .post(format!("{}/api/tasks", server.base_url))
            .json(&serde_json::json!({ "task": task }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let tasks: TasksResponse = client
        .get(format!("{}/api/tasks", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tasks.limit, 3);
    assert_eq!(tasks.tasks.len(), 3);
    assert!(!tasks.date.is_empty());

    // The cap leaves the set unchanged.
    let overflow = client
        .post(format!("{}/api/tasks", server.base_url))
        .json(&serde_json::json!({ "task": "a fourth task" }))
        .send()
        .await
        .unwrap();
    assert_eq!(overflow.status(), 400);

    let after: TasksResponse = client
        .get(format!("{}/api/tasks", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after.tasks, tasks.tasks);

    // Toggle the first task done, then undone again.
    let done: ExecutionResponse = client
        .post(format!("{}/api/execution", server.base_url))
        .json(&serde_json::json!({ "task": "revise laplace", "done": true }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(done.planned, 3);
    assert_eq!(done.executed, 1);
    let item = done
        .items
        .iter()
        .find(|item| item.task == "revise laplace")
        .expect("missing planned task");
    assert!(item.done);
    assert!(item.time.is_some());

    let undone: ExecutionResponse = client
        .post(format!("{}/api/execution", server.base_url))
        .json(&serde_json::json!({ "task": "revise laplace", "done": false }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(undone.executed, 0);
    assert!(undone.items.iter().all(|item| !item.done));

    // Unplanned tasks cannot be marked done.
    let unknown = client
        .post(format!("{}/api/execution", server.base_url))
        .json(&serde_json::json!({ "task": "never planned", "done": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), 400);
}

#[tokio::test]
async fn http_weak_areas_cap_and_classify() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for i in 1..=5 {
        let response = client
            .post(format!("{}/api/weak", server.base_url))
            .json(&serde_json::json!({ "topic": format!("weak topic {i}") }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let overflow = client
        .post(format!("{}/api/weak", server.base_url))
        .json(&serde_json::json!({ "topic": "a sixth topic" }))
        .send()
        .await
        .unwrap();
    assert_eq!(overflow.status(), 400);

    let weak: WeakResponse = client
        .get(format!("{}/api/weak", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(weak.limit, 5);
    assert_eq!(weak.topics.len(), 5);
    assert_eq!(weak.days_passed + weak.days_remaining, 7);
    let first = &weak.topics[0];
    assert_eq!(first.text, "weak topic 1");
    assert_eq!(first.age_days, 0);
    assert_eq!(first.status, "fresh");
}

#[tokio::test]
async fn http_revision_log_recent_and_clear() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for i in 1..=6 {
        let response = client
            .post(format!("{}/api/revisions", server.base_url))
            .json(&serde_json::json!({ "topic": format!("revision {i}") }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let revisions: RevisionsResponse = client
        .get(format!("{}/api/revisions", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(revisions.total, 6);
    assert_eq!(revisions.recent.len(), 5);
    assert_eq!(revisions.recent[0].topic, "revision 6");
    assert_eq!(revisions.recent[4].topic, "revision 2");
    assert!(!revisions.recent[0].date.is_empty());

    let cleared: RevisionsResponse = client
        .post(format!("{}/api/revisions/clear", server.base_url))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cleared.total, 0);
    assert!(cleared.recent.is_empty());
}

#[tokio::test]
async fn http_mock_analysis_validation_and_save() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let missing = client
        .post(format!("{}/api/mock", server.base_url))
        .json(&serde_json::json!({ "score": "62", "accuracy": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 400);

    let saved: MockResponse = client
        .post(format!("{}/api/mock", server.base_url))
        .json(&serde_json::json!({
            "score": "62",
            "accuracy": "78",
            "mistakes": "silly sign errors",
            "fixes": "slow down on statics"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!saved.stale);
    let record = saved.record.expect("record should be present after save");
    assert_eq!(record.score, "62");
    assert_eq!(record.accuracy, "78");
    assert_eq!(record.mistakes, "silly sign errors");
    assert_eq!(record.fixes, "slow down on statics");
    assert!(!record.date.is_empty());

    let loaded: MockResponse = client
        .get(format!("{}/api/mock", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(loaded.record.unwrap().score, "62");
}

#[tokio::test]
async fn http_mistake_log_appends() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response: MistakesResponse = client
        .post(format!("{}/api/mistakes", server.base_url))
        .json(&serde_json::json!({ "text": "forgot to check units" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(response
        .mistakes
        .contains(&"forgot to check units".to_string()));

    let listed: MistakesResponse = client
        .get(format!("{}/api/mistakes", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.mistakes, response.mistakes);
}

#[tokio::test]
async fn http_theme_defaults_and_overrides() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let theme: ThemeResponse = client
        .get(format!("{}/api/theme", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(theme.mode, "auto");
    assert!(theme.effective == "light" || theme.effective == "dark");

    let dark: ThemeResponse = client
        .post(format!("{}/api/theme", server.base_url))
        .json(&serde_json::json!({ "mode": "dark" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(dark.mode, "dark");
    assert_eq!(dark.effective, "dark");

    let invalid = client
        .post(format!("{}/api/theme", server.base_url))
        .json(&serde_json::json!({ "mode": "sepia" }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), 400);
}

#[tokio::test]
async fn http_countdown_is_consistent() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let countdown: CountdownResponse = client
        .get(format!("{}/api/countdown", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(countdown.total_days, 739);
    assert_eq!(
        countdown.passed_days + countdown.days_left,
        countdown.total_days
    );
    assert!((0..=100).contains(&countdown.progress_percent));
}

#[tokio::test]
async fn http_last_video_round_trip() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let absent: LastVideoResponse = client
        .get(format!(
            "{}/api/lectures/network-theory/last-video",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(absent.chapter, "network-theory");
    assert!(absent.video_id.is_none());

    let set: LastVideoResponse = client
        .post(format!(
            "{}/api/lectures/network-theory/last-video",
            server.base_url
        ))
        .json(&serde_json::json!({ "video_id": "dQw4w9WgXcQ" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(set.video_id.as_deref(), Some("dQw4w9WgXcQ"));

    let loaded: LastVideoResponse = client
        .get(format!(
            "{}/api/lectures/network-theory/last-video",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(loaded.video_id.as_deref(), Some("dQw4w9WgXcQ"));
}
