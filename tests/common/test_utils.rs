use super::mocks::MockLlmClient;
use attendance_ai::{
    Result,
    catalog::{AttendanceStore, InMemoryStore},
    config::{Config, LlmConfig, LogsConfig, SchoolConfig, ServerConfig, SimulationConfig},
    flows::{ClassSummaryRequest, FaceMatchRequest},
    server::{handlers::AppState, router},
};
use axum::Router;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs;

/// 1x1 transparent PNG.
pub const PIXEL_PNG_DATA_URI: &str = "data:image/png;base64,\
    iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub const ALL_STUDENTS: [&str; 12] = [
    "Alice Johnson",
    "Bob Williams",
    "Charlie Brown",
    "Diana Miller",
    "Ethan Davis",
    "Fiona Garcia",
    "George Rodriguez",
    "Hannah Martinez",
    "Ian Hernandez",
    "Julia Lopez",
    "Kevin Gonzalez",
    "Laura Wilson",
];

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        llm: LlmConfig {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: "test-api-key".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: Some(0.2),
        },
        school: SchoolConfig {
            teacher_name: "Mr. Davison".to_string(),
        },
        simulation: SimulationConfig {
            presence_probability: 0.85,
        },
    }
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}

/// Router over the seeded store, talking to the given mock model.
pub fn create_test_app(llm: Arc<MockLlmClient>, presence_probability: f64) -> Router {
    let store: Arc<dyn AttendanceStore> = Arc::new(InMemoryStore::seeded());
    router(AppState {
        llm,
        store,
        teacher_name: "Mr. Davison".to_string(),
        presence_probability,
    })
}

pub fn face_match_request(candidates: &[&str]) -> FaceMatchRequest {
    FaceMatchRequest {
        photo_data_uri: PIXEL_PNG_DATA_URI.to_string(),
        possible_matches: candidates.iter().map(|c| c.to_string()).collect(),
        class_roster: ALL_STUDENTS.join(", "),
    }
}

pub fn summary_request(present: &[&str], absent: &[&str], total: u32) -> ClassSummaryRequest {
    ClassSummaryRequest {
        class_id: "math101".to_string(),
        date: "2024-05-20".to_string(),
        present_students: present.iter().map(|s| s.to_string()).collect(),
        absent_students: absent.iter().map(|s| s.to_string()).collect(),
        total_students: total,
    }
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 9090
  logs:
    level: "debug"

llm:
  provider: "openai"
  base_url: "http://localhost:11434/v1"
  api_key: "test-api-key"
  model: "llava"
  temperature: 0.2

school:
  teacher_name: "Ms. Okafor"

simulation:
  presence_probability: 0.5
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"

llm:
  provider: "openai"
  # missing model
"#;
