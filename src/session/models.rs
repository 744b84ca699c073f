use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    admin::{
        models::{AdminAction, AdminError},
        session::AdminSession,
    },
    question::models::Question,
    quiz::{
        models::{Phase, QuizAction, QuizError},
        session::QuizSession,
    },
};

/// Everything one browser tab holds: its game and, while open, the admin console.
#[derive(Debug, Clone)]
pub struct TabSession {
    pub id: Uuid,
    pub quiz: QuizSession,
    pub admin: Option<AdminSession>,
    last_seen: Instant,
}

impl TabSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            quiz: QuizSession::new(),
            admin: None,
            last_seen: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn last_seen(&self) -> Instant {
        self.last_seen
    }

    pub fn is_admin_mode(&self) -> bool {
        self.admin.is_some()
    }

    /// The game is suspended while the admin console is open.
    pub fn apply_quiz(
        &mut self,
        action: QuizAction,
        pool: &[Question],
        n: usize,
    ) -> Result<(), QuizError> {
        if self.is_admin_mode() {
            return Err(QuizError::Suspended);
        }

        self.quiz.apply(action, pool, n)
    }

    pub fn apply_admin(&mut self, action: AdminAction, admin_code: &str) -> Result<(), AdminError> {
        match action {
            AdminAction::Enter => {
                if self.admin.is_some() {
                    return Ok(());
                }
                if self.quiz.phase() != Phase::Welcome {
                    return Err(AdminError::GameInProgress);
                }

                self.admin = Some(AdminSession::new());
                Ok(())
            }
            AdminAction::Exit => {
                self.admin = None;
                Ok(())
            }
            action => self
                .admin
                .as_mut()
                .ok_or(AdminError::NotAdminMode)?
                .apply(action, admin_code),
        }
    }

    pub fn admin(&self) -> Result<&AdminSession, AdminError> {
        self.admin.as_ref().ok_or(AdminError::NotAdminMode)
    }

    pub fn admin_mut(&mut self) -> Result<&mut AdminSession, AdminError> {
        self.admin.as_mut().ok_or(AdminError::NotAdminMode)
    }
}

impl Default for TabSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

/// Marker inserted by the session middleware once the header checked out.
#[derive(Debug, Clone, Copy)]
pub struct SessionId(pub Uuid);
