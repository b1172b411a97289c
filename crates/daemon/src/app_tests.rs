use super::*;
use af_adapters::FakeSessionAdapter;
use af_core::{ConnectorInstance, ConnectorKind, Credentials, DefaultsConfig, ProjectConfig, ServerConfig};
use indexmap::IndexMap;
use std::process::Command as StdCommand;
use tempfile::TempDir;

fn init_git_repo(dir: &std::path::Path) {
    let run = |args: &[&str]| {
        let status = StdCommand::new("git")
            .arg("-C")
            .arg(dir)
            .args(args)
            .status()
            .expect("git available");
        assert!(status.success());
    };
    run(&["init", "-q", "-b", "main"]);
    run(&["config", "user.email", "test@example.com"]);
    run(&["config", "user.name", "test"]);
    std::fs::write(dir.join("README.md"), "hello").expect("write readme");
    run(&["add", "."]);
    run(&["commit", "-q", "-m", "init"]);
}

fn config_with_project(repo_path: &std::path::Path) -> Config {
    let mut projects = IndexMap::new();
    projects.insert(
        "demo".to_string(),
        ProjectConfig {
            path: repo_path.to_path_buf(),
            default_branch: "main".to_string(),
            max_agents: 5,
            description: String::new(),
            agent_instructions: String::new(),
            context_files: Vec::new(),
            sandbox: None,
            channels: Vec::new(),
        },
    );

    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            secret_key: "test".to_string(),
        },
        defaults: DefaultsConfig {
            max_agents_per_project: 5,
            sandbox: false,
            claude_command: "echo agent".to_string(),
            claude_env: IndexMap::new(),
            poll_interval_seconds: 1,
            agent_instructions: "Be careful.".to_string(),
        },
        profiles: IndexMap::new(),
        projects,
        connectors: IndexMap::new(),
    }
}

struct Fixture {
    _dir: TempDir,
    app: App<FakeSessionAdapter>,
}

async fn setup() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    init_git_repo(dir.path());
    let config = config_with_project(dir.path());
    let store = Arc::new(Store::open_in_memory().expect("open store"));
    let app = App::start(
        FakeSessionAdapter::new(),
        config,
        store,
        "http://127.0.0.1:8080/api/hooks/event",
    )
    .await;
    Fixture { _dir: dir, app }
}

#[tokio::test]
async fn start_brings_up_every_subsystem_with_no_agents_yet() {
    let f = setup().await;
    assert!(f.app.manager.list().is_empty());
    assert_eq!(f.app.hub.subscriber_count(), 0);
}

#[tokio::test]
async fn a_subagent_start_hook_increments_the_agents_counter_and_publishes_an_update() {
    let f = setup().await;
    let agent = f.app.manager.spawn("demo", "build a thing", "agent", None).await.expect("spawn");
    let subscription = f.app.hub.subscribe();

    f.app.handle_hook_event(agent.id.as_str(), HookEvent::SubagentStart);

    let updated = f.app.manager.get(&agent.id).expect("agent still tracked");
    assert_eq!(updated.sub_agent_count, 1);

    let message = subscription.recv().await;
    assert!(matches!(message, UpdateMessage::AgentUpdate { agent } if agent.sub_agent_count == 1));
}

#[tokio::test]
async fn a_hook_event_for_an_unknown_agent_is_dropped_without_panicking() {
    let f = setup().await;
    f.app.handle_hook_event("does-not-exist", HookEvent::SubagentStart);
}

#[tokio::test]
async fn reload_config_rejects_an_invalid_config_and_leaves_the_live_one_untouched() {
    let f = setup().await;
    let mut bad = f.app.config.read().clone();
    bad.projects.get_mut("demo").expect("project present").path =
        std::path::PathBuf::from("/does/not/exist");

    let result = f.app.reload_config(bad).await;

    assert!(result.is_err());
    assert_eq!(
        f.app.config.read().projects.get("demo").expect("project present").path,
        f._dir.path().to_path_buf()
    );
}

#[tokio::test]
async fn reload_config_starts_a_newly_added_connector() {
    let f = setup().await;
    let mut next = f.app.config.read().clone();
    let mut creds = IndexMap::new();
    creds.insert("token".to_string(), "tok".to_string());
    next.connectors.insert(
        "tg-1".to_string(),
        ConnectorInstance {
            id: "tg-1".to_string(),
            kind: ConnectorKind::TelegramLike,
            enabled: true,
            credentials: Credentials(creds),
            settings: IndexMap::new(),
        },
    );

    f.app.reload_config(next).await.expect("valid config reloads");

    assert!(f.app.connectors.connector("tg-1").is_some());
}

#[tokio::test]
async fn shutdown_stops_every_tracked_connector() {
    let f = setup().await;
    let mut next = f.app.config.read().clone();
    let mut creds = IndexMap::new();
    creds.insert("token".to_string(), "tok".to_string());
    next.connectors.insert(
        "tg-1".to_string(),
        ConnectorInstance {
            id: "tg-1".to_string(),
            kind: ConnectorKind::TelegramLike,
            enabled: true,
            credentials: Credentials(creds),
            settings: IndexMap::new(),
        },
    );
    f.app.reload_config(next).await.expect("valid config reloads");
    let connectors = f.app.connectors.clone();

    f.app.shutdown().await;

    assert!(connectors.connector("tg-1").is_none());
}
