#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use futures::future::join_all;
    use serde_json::{Value, json};
    use tempfile::tempdir;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        mw::session_mw::SESSION_HEADER,
        question::models::Question,
        server::router::app_router,
        tests::common::{ADMIN_CODE, correct_text, question_bank, setup_logging, test_state},
    };

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        session: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = session {
            builder = builder.header(SESSION_HEADER, id.to_string());
        }

        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn new_session(app: &Router) -> Uuid {
        let (status, body) = send(app, Method::POST, "/session", None, None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().parse().unwrap()
    }

    async fn quiz_action(app: &Router, session: Uuid, action: Value) -> (StatusCode, Value) {
        send(app, Method::POST, "/quiz/action", Some(session), Some(action)).await
    }

    async fn admin_action(app: &Router, session: Uuid, action: Value) -> (StatusCode, Value) {
        send(app, Method::POST, "/admin/action", Some(session), Some(action)).await
    }

    async fn logged_in_admin(app: &Router) -> Uuid {
        let session = new_session(app).await;
        let (status, _) = admin_action(app, session, json!({"action": "enter"})).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) =
            admin_action(app, session, json!({"action": "login", "code": ADMIN_CODE})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["admin"]["screen"]["screen"], "menu");
        session
    }

    fn stored(dir: &std::path::Path) -> Vec<Question> {
        let bytes = std::fs::read(dir.join("data/questions.json")).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn seed(dir: &std::path::Path, questions: &[Question]) {
        std::fs::create_dir_all(dir.join("data")).unwrap();
        std::fs::write(
            dir.join("data/questions.json"),
            serde_json::to_vec(questions).unwrap(),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn health_answers() {
        setup_logging();
        let dir = tempdir().unwrap();
        let app = app_router(test_state(dir.path()));

        let (status, _) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::GET, "/health/detailed", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["store"], true);
        assert_eq!(body["questions"], 0);
        assert_eq!(body["remote_storage"], false);
    }

    #[tokio::test]
    async fn health_check_leaves_the_store_alone() {
        let dir = tempdir().unwrap();
        let app = app_router(test_state(dir.path()));

        send(&app, Method::GET, "/health/detailed", None, None).await;
        assert!(!dir.path().join("data/questions.json").exists());

        seed(dir.path(), &question_bank(2));
        let (_, body) = send(&app, Method::GET, "/health/detailed", None, None).await;
        assert_eq!(body["questions"], 2);
    }

    #[tokio::test]
    async fn health_reports_a_corrupt_store() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/questions.json"), b"not json").unwrap();
        let app = app_router(test_state(dir.path()));

        let (status, body) = send(&app, Method::GET, "/health/detailed", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["store"], false);
        assert_eq!(
            std::fs::read(dir.path().join("data/questions.json")).unwrap(),
            b"not json"
        );
    }

    #[tokio::test]
    async fn quiz_needs_a_known_session() {
        let dir = tempdir().unwrap();
        let app = app_router(test_state(dir.path()));

        let (status, _) = send(&app, Method::GET, "/quiz", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::GET, "/quiz", Some(Uuid::new_v4()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .uri("/quiz")
            .header(SESSION_HEADER, "not-a-uuid")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn start_on_empty_store_stays_on_welcome() {
        let dir = tempdir().unwrap();
        let app = app_router(test_state(dir.path()));
        let session = new_session(&app).await;

        let (status, body) = quiz_action(&app, session, json!({"action": "start"})).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].is_string());

        let (status, body) = send(&app, Method::GET, "/quiz", Some(session), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "welcome");
        assert_eq!(stored(dir.path()), Vec::<Question>::new());
    }

    #[tokio::test]
    async fn perfect_game_over_http() {
        let dir = tempdir().unwrap();
        let bank = question_bank(3);
        seed(dir.path(), &bank);
        let app = app_router(test_state(dir.path()));
        let session = new_session(&app).await;

        let (status, mut view) = quiz_action(&app, session, json!({"action": "start"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["phase"], "quiz");
        assert_eq!(view["total"], 3);

        for _ in 0..3 {
            let id = view["question"]["id"].as_str().unwrap().to_string();
            let question = bank.iter().find(|q| q.id == id).unwrap();

            let (status, _) = quiz_action(
                &app,
                session,
                json!({"action": "select", "answer": correct_text(question)}),
            )
            .await;
            assert_eq!(status, StatusCode::OK);

            let (status, next) = quiz_action(&app, session, json!({"action": "next"})).await;
            assert_eq!(status, StatusCode::OK);
            view = next;
        }
        assert_eq!(view["phase"], "review");
        assert_eq!(view["answered"], 3);

        let (status, result) = quiz_action(&app, session, json!({"action": "check"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["phase"], "result");
        assert_eq!(result["score"], 3);
        assert_eq!(result["percent"], 100);
        assert_eq!(result["feedback"], "perfect");
    }

    #[tokio::test]
    async fn bad_quiz_actions_are_rejected() {
        let dir = tempdir().unwrap();
        seed(dir.path(), &question_bank(3));
        let app = app_router(test_state(dir.path()));
        let session = new_session(&app).await;

        let (status, _) = quiz_action(&app, session, json!({"action": "next"})).await;
        assert_eq!(status, StatusCode::CONFLICT);

        quiz_action(&app, session, json!({"action": "start"})).await;
        let (status, _) =
            quiz_action(&app, session, json!({"action": "select", "answer": "nope"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = quiz_action(&app, session, json!({"action": "next"})).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn admin_data_needs_login() {
        let dir = tempdir().unwrap();
        let app = app_router(test_state(dir.path()));
        let session = new_session(&app).await;

        let (status, _) = send(&app, Method::GET, "/admin/questions", Some(session), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        admin_action(&app, session, json!({"action": "enter"})).await;
        let (status, _) = send(&app, Method::GET, "/admin/questions", Some(session), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) =
            admin_action(&app, session, json!({"action": "login", "code": "wrong"})).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn add_then_delete_question() {
        let dir = tempdir().unwrap();
        let existing = question_bank(2);
        seed(dir.path(), &existing);
        let app = app_router(test_state(dir.path()));
        let session = logged_in_admin(&app).await;

        admin_action(&app, session, json!({"action": "add_form"})).await;
        let form = json!({
            "type": "text",
            "question": "2 + 2?",
            "answers": ["3", "4", "5", "22"],
            "correct_index": 1,
            "category": "math",
            "difficulty": 1
        });
        let (status, added) =
            send(&app, Method::POST, "/admin/questions", Some(session), Some(form)).await;
        assert_eq!(status, StatusCode::CREATED);

        let id = added["id"].as_str().unwrap().to_string();
        assert_eq!(id.len(), 32);
        let records = stored(dir.path());
        assert_eq!(records.len(), 3);
        let record = records.iter().find(|q| q.id == id).unwrap();
        assert_eq!(record.correct_answer().unwrap().text, "4");
        assert_eq!(record.correct_count(), 1);

        let (status, list) = send(&app, Method::GET, "/admin/questions", Some(session), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 3);

        let uri = format!("/admin/questions/{}", id);
        let (status, detail) = send(&app, Method::GET, &uri, Some(session), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["question"]["question"], "2 + 2?");
        assert_eq!(detail["media_url"], Value::Null);

        admin_action(&app, session, json!({"action": "delete_list"})).await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/admin/questions/delete",
            Some(session),
            Some(json!({"ids": [id]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["removed"], 1);
        assert_eq!(stored(dir.path()), existing);
    }

    #[tokio::test]
    async fn edit_replaces_the_correct_answer() {
        let dir = tempdir().unwrap();
        let bank = question_bank(2);
        seed(dir.path(), &bank);
        let app = app_router(test_state(dir.path()));
        let session = logged_in_admin(&app).await;

        admin_action(&app, session, json!({"action": "edit_list"})).await;
        let (status, _) = admin_action(
            &app,
            session,
            json!({"action": "open", "question_id": "missing"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        admin_action(&app, session, json!({"action": "open", "question_id": "q0"})).await;
        let form = json!({
            "type": "text",
            "question": "Edited?",
            "answers": ["q0-0", "q0-1", "q0-2", "q0-3"],
            "correct_index": 2,
            "category": "general",
            "difficulty": 2
        });

        let (status, _) = send(
            &app,
            Method::PUT,
            "/admin/questions/q0",
            Some(session),
            Some(form.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT, "Saving needs begin_edit first");

        admin_action(&app, session, json!({"action": "begin_edit"})).await;
        let (status, _) =
            send(&app, Method::PUT, "/admin/questions/q0", Some(session), Some(form)).await;
        assert_eq!(status, StatusCode::OK);

        let records = stored(dir.path());
        let edited = records.iter().find(|q| q.id == "q0").unwrap();
        let flags: Vec<bool> = edited.answers.iter().map(|a| a.is_correct).collect();
        assert_eq!(flags, vec![false, false, true, false]);
        assert_eq!(edited.created_at, bank[0].created_at);
        assert_eq!(records[1], bank[1]);
    }

    #[tokio::test]
    async fn upload_then_add_media_question() {
        let dir = tempdir().unwrap();
        let app = app_router(test_state(dir.path()));
        let session = logged_in_admin(&app).await;
        admin_action(&app, session, json!({"action": "add_form"})).await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/admin/media?filename=cat.png")
            .header(SESSION_HEADER, session.to_string())
            .body(Body::from("png bytes"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let upload: Value = serde_json::from_slice(&bytes).unwrap();
        let reference = upload["reference"].as_str().unwrap().to_string();
        assert_eq!(upload["preview_url"], reference.as_str());

        let form = json!({
            "type": "image",
            "question": "Which animal?",
            "answers": ["Cat", "Dog", "Cow", "Owl"],
            "correct_index": 0
        });
        let (status, added) =
            send(&app, Method::POST, "/admin/questions", Some(session), Some(form)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(added["content_url"], reference.as_str());
        assert_eq!(added["difficulty"], 2);
    }

    #[tokio::test]
    async fn admin_mode_suspends_the_game() {
        let dir = tempdir().unwrap();
        seed(dir.path(), &question_bank(3));
        let app = app_router(test_state(dir.path()));
        let session = new_session(&app).await;

        admin_action(&app, session, json!({"action": "enter"})).await;
        let (status, _) = quiz_action(&app, session, json!({"action": "start"})).await;
        assert_eq!(status, StatusCode::CONFLICT);

        admin_action(&app, session, json!({"action": "exit"})).await;
        let (status, body) = quiz_action(&app, session, json!({"action": "start"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "quiz");

        let (status, _) = admin_action(&app, session, json!({"action": "enter"})).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let dir = tempdir().unwrap();
        seed(dir.path(), &question_bank(5));
        let app = app_router(test_state(dir.path()));

        let sessions: Vec<Uuid> = join_all((0..16).map(|_| new_session(&app))).await;
        let unique: HashSet<&Uuid> = sessions.iter().collect();
        assert_eq!(unique.len(), sessions.len());

        quiz_action(&app, sessions[0], json!({"action": "start"})).await;

        let views = join_all(
            sessions
                .iter()
                .map(|id| send(&app, Method::GET, "/quiz", Some(*id), None)),
        )
        .await;
        assert_eq!(views[0].1["phase"], "quiz");
        assert!(views[1..].iter().all(|(_, view)| view["phase"] == "welcome"));
    }
}
