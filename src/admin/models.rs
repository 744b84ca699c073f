use serde::{Deserialize, Serialize};

use crate::{
    admin::session::AdminSession,
    question::models::{Question, QuestionType},
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum AdminScreen {
    Login,
    Menu,
    EditList,
    EditDetail { question_id: String, editing: bool },
    DeleteList,
    AddForm,
}

impl AdminScreen {
    pub fn name(&self) -> &'static str {
        match self {
            AdminScreen::Login => "login",
            AdminScreen::Menu => "menu",
            AdminScreen::EditList => "edit_list",
            AdminScreen::EditDetail { .. } => "edit_detail",
            AdminScreen::DeleteList => "delete_list",
            AdminScreen::AddForm => "add_form",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AdminAction {
    Enter,
    Exit,
    Login { code: String },
    Menu,
    EditList,
    Open { question_id: String },
    BeginEdit,
    DeleteList,
    AddForm,
    Back,
}

impl AdminAction {
    pub fn name(&self) -> &'static str {
        match self {
            AdminAction::Enter => "enter",
            AdminAction::Exit => "exit",
            AdminAction::Login { .. } => "login",
            AdminAction::Menu => "menu",
            AdminAction::EditList => "edit_list",
            AdminAction::Open { .. } => "open",
            AdminAction::BeginEdit => "begin_edit",
            AdminAction::DeleteList => "delete_list",
            AdminAction::AddForm => "add_form",
            AdminAction::Back => "back",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AdminError {
    #[error("Wrong admin code")]
    WrongCode,

    #[error("Admin login required")]
    NotLoggedIn,

    #[error("The admin console is not open")]
    NotAdminMode,

    #[error("The admin console can only be opened from the welcome screen")]
    GameInProgress,

    #[error("Action {action} is not available on the {screen} screen")]
    InvalidTransition {
        action: &'static str,
        screen: &'static str,
    },

    #[error("{0}")]
    Validation(String),
}

/// Fields submitted by the add and edit screens. Omitted optional fields keep
/// the stored value on edit and fall back to defaults on add.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuestionForm {
    #[serde(rename = "type", default)]
    pub kind: Option<QuestionType>,
    #[serde(default)]
    pub content_url: Option<String>,
    pub question: String,
    pub answers: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteQuestionsRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteQuestionsResponse {
    pub removed: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub reference: String,
    pub preview_url: Option<String>,
}

/// One line of the edit and delete lists.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub id: String,
    pub question: String,
    pub category: String,
    pub difficulty: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionDetail {
    pub question: Question,
    pub media_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminView {
    pub admin_mode: bool,
    pub admin: Option<AdminSession>,
}

impl AdminView {
    pub fn from_admin(admin: Option<&AdminSession>) -> Self {
        Self {
            admin_mode: admin.is_some(),
            admin: admin.cloned(),
        }
    }
}
