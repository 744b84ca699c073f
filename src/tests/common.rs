use std::{path::Path, sync::Arc};

use serde_json::Map;
use tracing::level_filters::LevelFilter;

use crate::{
    config::config::{
        AdminConfig, AppConfig, LocalConfig, QuizConfig, ServerConfig, SessionConfig,
        StorageConfig,
    },
    question::models::{Answer, Question, QuestionType},
    server::app_state::AppState,
};

pub const ADMIN_CODE: &str = "secret-code";

pub fn setup_logging() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn test_config(dir: &Path) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            address: "127.0.0.1".into(),
            port: 0,
        },
        admin: AdminConfig {
            code: ADMIN_CODE.into(),
        },
        quiz: QuizConfig {
            questions_per_game: 15,
            positive_from: 61,
        },
        storage: StorageConfig {
            url: String::new(),
            service_key: String::new(),
            bucket: String::new(),
            questions_object: "data/questions.json".into(),
            sign_ttl_secs: 300,
            cache_ttl_secs: 120,
        },
        local: LocalConfig {
            questions_path: dir.join("data/questions.json").to_string_lossy().into_owned(),
            media_dir: dir.join("media").to_string_lossy().into_owned(),
        },
        session: SessionConfig {
            idle_ttl_secs: 3600,
            sweep_interval_secs: 300,
        },
    }
}

pub fn test_state(dir: &Path) -> Arc<AppState> {
    AppState::from_config(&test_config(dir)).expect("Failed to build app state")
}

/// Text question whose answers are `<id>-0` .. `<id>-3`.
pub fn text_question(id: &str, correct: usize) -> Question {
    Question {
        id: id.to_string(),
        kind: QuestionType::Text,
        content_url: String::new(),
        question: format!("Question {}", id),
        answers: (0..4)
            .map(|i| Answer::new(format!("{}-{}", id, i), i == correct))
            .collect(),
        category: "general".into(),
        difficulty: 2,
        created_at: "2024-01-01T00:00:00.000000".into(),
        extra: Map::new(),
    }
}

pub fn question_bank(count: usize) -> Vec<Question> {
    (0..count)
        .map(|i| text_question(&format!("q{}", i), i % 4))
        .collect()
}

pub fn correct_text(question: &Question) -> String {
    question
        .correct_answer()
        .map(|a| a.text.clone())
        .expect("Fixture question has a correct answer")
}
