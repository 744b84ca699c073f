use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::Client;
use tracing::{debug, info};

use crate::{
    config::config::AppConfig,
    question::store::QuestionStore,
    quiz::scorer::FeedbackPolicy,
    server::error::ServerError,
    session::store::SessionStore,
    storage::{client::StorageClient, media::MediaService},
};

pub struct AppState {
    client: Client,
    store: QuestionStore,
    media: MediaService,
    sessions: SessionStore,
    admin_code: String,
    questions_per_game: usize,
    feedback: FeedbackPolicy,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Arc<Self>, ServerError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let remote = config.storage.is_remote().then(|| {
            StorageClient::new(
                &config.storage.url,
                &config.storage.service_key,
                &config.storage.bucket,
            )
        });

        let store = match &remote {
            Some(storage) => QuestionStore::remote(
                client.clone(),
                storage.clone(),
                &config.storage.questions_object,
            ),
            None => QuestionStore::local(&config.local.questions_path),
        };
        info!("Question store: {}", store.describe());

        let media = MediaService::new(
            remote,
            &config.local.media_dir,
            Duration::from_secs(config.storage.sign_ttl_secs),
            Duration::from_secs(config.storage.cache_ttl_secs),
        );

        let sessions = SessionStore::new(Duration::from_secs(config.session.idle_ttl_secs));

        let state = Arc::new(Self {
            client,
            store,
            media,
            sessions,
            admin_code: config.admin.code.clone(),
            questions_per_game: config.quiz.questions_per_game,
            feedback: FeedbackPolicy::new(config.quiz.positive_from),
        });

        Ok(state)
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }

    pub fn get_store(&self) -> &QuestionStore {
        &self.store
    }

    pub fn get_media(&self) -> &MediaService {
        &self.media
    }

    pub fn get_sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn get_admin_code(&self) -> &str {
        &self.admin_code
    }

    pub fn get_questions_per_game(&self) -> usize {
        self.questions_per_game
    }

    pub fn get_feedback_policy(&self) -> &FeedbackPolicy {
        &self.feedback
    }

    /// Evicts idle sessions and expired signed urls.
    pub fn sweep(&self, now: Instant) {
        let sessions = self.sessions.evict_idle(now);
        let urls = self.media.evict_expired_urls(now);
        if sessions > 0 || urls > 0 {
            debug!(
                "Cleanup evicted {} idle sessions and {} signed urls",
                sessions, urls
            );
        }
    }

    pub fn spawn_cleanup(self: &Arc<Self>, every: Duration) {
        let state = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                state.sweep(Instant::now());
            }
        });
    }
}
