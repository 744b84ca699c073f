#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use uuid::Uuid;

    use tempfile::tempdir;

    use crate::{session::store::SessionStore, tests::common::test_state};

    #[test]
    fn sessions_are_created_and_found() {
        let store = SessionStore::new(Duration::from_secs(60));

        let id = store.create();

        assert!(store.contains(&id));
        assert!(!store.contains(&Uuid::new_v4()));
        assert_eq!(store.snapshot(&id).map(|s| s.id), Some(id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_on_unknown_session_is_none() {
        let store = SessionStore::new(Duration::from_secs(60));

        assert!(store.update(&Uuid::new_v4(), |_| ()).is_none());
    }

    #[test]
    fn idle_sessions_are_evicted() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.create();

        assert_eq!(store.evict_idle(Instant::now()), 0);
        assert!(store.contains(&id));

        let later = Instant::now() + Duration::from_secs(61);
        assert_eq!(store.evict_idle(later), 1);
        assert!(!store.contains(&id));
    }

    #[tokio::test]
    async fn state_sweep_evicts_idle_sessions() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());
        let id = state.get_sessions().create();

        state.sweep(Instant::now());
        assert!(state.get_sessions().contains(&id));

        state.sweep(Instant::now() + Duration::from_secs(3601));
        assert!(!state.get_sessions().contains(&id));
    }
}
