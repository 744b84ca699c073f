use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ANSWER_COUNT: usize = 4;
pub const DEFAULT_DIFFICULTY: u8 = 2;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Image,
    Video,
    Audio,
    #[default]
    Text,
}

impl QuestionType {
    pub fn needs_media(&self) -> bool {
        !matches!(self, QuestionType::Text)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl Answer {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

fn default_difficulty() -> u8 {
    DEFAULT_DIFFICULTY
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Question {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionType,
    #[serde(default)]
    pub content_url: String,
    pub question: String,
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    #[serde(default)]
    pub created_at: String,

    // Keys this service does not know about survive a rewrite.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Question {
    /// Ground truth is the first answer flagged correct.
    pub fn correct_answer(&self) -> Option<&Answer> {
        self.answers.iter().find(|a| a.is_correct)
    }

    pub fn has_answer(&self, text: &str) -> bool {
        self.answers.iter().any(|a| a.text == text)
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }
}

/// Fresh record id: 32 lowercase hex characters.
pub fn new_question_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn created_at_now() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Shape check applied to every stored record before it is deserialized.
pub fn is_well_formed(value: &Value) -> bool {
    let Some(record) = value.as_object() else {
        return false;
    };

    let has_question = record.contains_key("question");
    let has_answers = record
        .get("answers")
        .and_then(|a| a.as_array())
        .is_some_and(|a| a.len() == ANSWER_COUNT);

    has_question && has_answers
}

/// Question as shown to a player, without correctness flags.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuestionView {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub media_url: Option<String>,
    pub question: String,
    pub answers: Vec<String>,
    pub category: String,
    pub difficulty: u8,
}

impl QuestionView {
    pub fn from_question(question: &Question, media_url: Option<String>) -> Self {
        Self {
            id: question.id.clone(),
            kind: question.kind,
            media_url,
            question: question.question.clone(),
            answers: question.answers.iter().map(|a| a.text.clone()).collect(),
            category: question.category.clone(),
            difficulty: question.difficulty,
        }
    }
}
