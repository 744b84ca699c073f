use serde::Serialize;
use serde_json::Map;

use crate::{
    admin::models::{AdminAction, AdminError, AdminScreen, QuestionForm},
    question::models::{
        ANSWER_COUNT, Answer, DEFAULT_DIFFICULTY, Question, created_at_now, new_question_id,
    },
};

/// Admin console state for one tab.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSession {
    screen: AdminScreen,
    authenticated: bool,
    pending_media: Option<String>,
}

impl Default for AdminSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminSession {
    pub fn new() -> Self {
        Self {
            screen: AdminScreen::Login,
            authenticated: false,
            pending_media: None,
        }
    }

    pub fn screen(&self) -> &AdminScreen {
        &self.screen
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn pending_media(&self) -> Option<&str> {
        self.pending_media.as_deref()
    }

    /// Screen navigation. `Enter` and `Exit` belong to the owning tab session.
    pub fn apply(&mut self, action: AdminAction, admin_code: &str) -> Result<(), AdminError> {
        if let AdminAction::Login { code } = &action {
            if self.screen != AdminScreen::Login {
                return Err(self.invalid(&action));
            }
            if code != admin_code {
                return Err(AdminError::WrongCode);
            }

            self.authenticated = true;
            self.screen = AdminScreen::Menu;
            return Ok(());
        }

        self.require_login()?;

        let next = match (&self.screen, &action) {
            (_, AdminAction::Menu) => AdminScreen::Menu,
            (AdminScreen::Menu, AdminAction::EditList) => AdminScreen::EditList,
            (AdminScreen::Menu, AdminAction::DeleteList) => AdminScreen::DeleteList,
            (AdminScreen::Menu, AdminAction::AddForm) => AdminScreen::AddForm,
            (AdminScreen::EditList, AdminAction::Open { question_id }) => AdminScreen::EditDetail {
                question_id: question_id.clone(),
                editing: false,
            },
            (AdminScreen::EditDetail { question_id, .. }, AdminAction::BeginEdit) => {
                AdminScreen::EditDetail {
                    question_id: question_id.clone(),
                    editing: true,
                }
            }
            (AdminScreen::EditDetail { .. }, AdminAction::Back) => AdminScreen::EditList,
            (
                AdminScreen::EditList | AdminScreen::DeleteList | AdminScreen::AddForm,
                AdminAction::Back,
            ) => AdminScreen::Menu,
            _ => return Err(self.invalid(&action)),
        };

        // Begin edit keeps an upload made while viewing the question.
        if !matches!(action, AdminAction::BeginEdit) {
            self.pending_media = None;
        }
        self.screen = next;
        Ok(())
    }

    pub fn require_login(&self) -> Result<(), AdminError> {
        if !self.authenticated {
            return Err(AdminError::NotLoggedIn);
        }
        Ok(())
    }

    pub fn require_add_form(&self) -> Result<(), AdminError> {
        self.require_login()?;
        match self.screen {
            AdminScreen::AddForm => Ok(()),
            _ => Err(self.invalid_named("add")),
        }
    }

    pub fn require_editing(&self, id: &str) -> Result<(), AdminError> {
        self.require_login()?;
        match &self.screen {
            AdminScreen::EditDetail {
                question_id,
                editing: true,
            } if question_id == id => Ok(()),
            _ => Err(self.invalid_named("save")),
        }
    }

    pub fn require_delete_list(&self) -> Result<(), AdminError> {
        self.require_login()?;
        match self.screen {
            AdminScreen::DeleteList => Ok(()),
            _ => Err(self.invalid_named("delete")),
        }
    }

    pub fn require_upload(&self) -> Result<(), AdminError> {
        self.require_login()?;
        match self.screen {
            AdminScreen::AddForm | AdminScreen::EditDetail { editing: true, .. } => Ok(()),
            _ => Err(self.invalid_named("upload")),
        }
    }

    pub fn remember_upload(&mut self, reference: String) {
        self.pending_media = Some(reference);
    }

    pub fn question_added(&mut self) {
        self.pending_media = None;
        self.screen = AdminScreen::Menu;
    }

    pub fn question_saved(&mut self) {
        self.pending_media = None;
        if let AdminScreen::EditDetail { editing, .. } = &mut self.screen {
            *editing = false;
        }
    }

    pub fn questions_deleted(&mut self) {
        self.screen = AdminScreen::Menu;
    }

    fn invalid(&self, action: &AdminAction) -> AdminError {
        self.invalid_named(action.name())
    }

    fn invalid_named(&self, action: &'static str) -> AdminError {
        AdminError::InvalidTransition {
            action,
            screen: self.screen.name(),
        }
    }
}

/// Validates a submitted form and builds the record to store. `existing` is
/// the record being edited, whose id, creation time and extra keys are kept.
pub fn build_question(
    form: QuestionForm,
    pending_media: Option<&str>,
    existing: Option<&Question>,
) -> Result<Question, AdminError> {
    let text = form.question.trim();
    if text.is_empty() || form.answers.iter().any(|a| a.trim().is_empty()) {
        return Err(AdminError::Validation(
            "A question and 4 answers are required".into(),
        ));
    }

    if form.answers.len() != ANSWER_COUNT {
        return Err(AdminError::Validation(format!(
            "Exactly {} answers are required",
            ANSWER_COUNT
        )));
    }

    if form.correct_index >= ANSWER_COUNT {
        return Err(AdminError::Validation(format!(
            "Correct answer index must be between 0 and {}",
            ANSWER_COUNT - 1
        )));
    }

    let kind = form.kind.or(existing.map(|q| q.kind)).unwrap_or_default();
    let difficulty = form
        .difficulty
        .or(existing.map(|q| q.difficulty))
        .unwrap_or(DEFAULT_DIFFICULTY);
    let category = form
        .category
        .or_else(|| existing.map(|q| q.category.clone()))
        .unwrap_or_default();

    if !(1..=5).contains(&difficulty) {
        return Err(AdminError::Validation(
            "Difficulty must be between 1 and 5".into(),
        ));
    }

    // Form url, then a pending upload, then whatever the record already had.
    let media = form
        .content_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .or(pending_media)
        .or(existing.map(|q| q.content_url.as_str()))
        .unwrap_or_default();

    if kind.needs_media() && media.is_empty() {
        return Err(AdminError::Validation(
            "A media question needs an uploaded file or a URL".into(),
        ));
    }

    let content_url = match kind.needs_media() {
        true => media.to_string(),
        false => String::new(),
    };

    let answers = form
        .answers
        .iter()
        .enumerate()
        .map(|(idx, text)| Answer::new(text.trim(), idx == form.correct_index))
        .collect();

    let (id, created_at, extra) = match existing {
        Some(question) => (
            question.id.clone(),
            question.created_at.clone(),
            question.extra.clone(),
        ),
        None => (new_question_id(), created_at_now(), Map::new()),
    };

    Ok(Question {
        id,
        kind,
        content_url,
        question: text.to_string(),
        answers,
        category: category.trim().to_string(),
        difficulty,
        created_at,
        extra,
    })
}
