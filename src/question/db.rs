use std::collections::HashSet;

use tracing::info;

use crate::question::{
    models::Question,
    store::{QuestionStore, StoreError},
};

pub async fn get_question_by_id(
    store: &QuestionStore,
    question_id: &str,
) -> Result<Option<Question>, StoreError> {
    let question = store
        .get_all()
        .await?
        .into_iter()
        .find(|q| q.id == question_id);

    Ok(question)
}

pub async fn insert_question(store: &QuestionStore, question: Question) -> Result<(), StoreError> {
    let mut all = store.get_all().await?;
    info!("Inserting question {}", question.id);
    all.push(question);
    store.replace_all(&all).await
}

/// Replaces the record with the same id. Returns false when no such record exists.
pub async fn update_question(
    store: &QuestionStore,
    question: Question,
) -> Result<bool, StoreError> {
    let mut all = store.get_all().await?;
    let Some(slot) = all.iter_mut().find(|q| q.id == question.id) else {
        return Ok(false);
    };

    info!("Updating question {}", question.id);
    *slot = question;
    store.replace_all(&all).await?;
    Ok(true)
}

/// Removes every record whose id is in `ids` and returns how many were removed.
pub async fn delete_questions(
    store: &QuestionStore,
    ids: &HashSet<String>,
) -> Result<usize, StoreError> {
    let all = store.get_all().await?;
    let before = all.len();
    let kept: Vec<Question> = all.into_iter().filter(|q| !ids.contains(&q.id)).collect();
    let removed = before - kept.len();

    if removed > 0 {
        info!("Deleting {} questions", removed);
        store.replace_all(&kept).await?;
    }

    Ok(removed)
}
