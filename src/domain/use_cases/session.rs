use crate::{
    constants::{CURRENT_USER_KEY, REMEMBER_ME_KEY, SESSION_ACTIVE_KEY},
    entities::{session::SessionState, user::{PublicUser, User}},
    infrastructure::storage::StorageFacade,
};

/// Client-side session over two stores.
///
/// The durable store outlives the browser (snapshot and remember flag). The tab
/// store lives as long as one tab and holds the marker that keeps a non-remembered
/// session valid. A reload is a new tab store over the same durable store.
#[derive(Clone)]
pub struct SessionManager {
    durable: StorageFacade,
    tab: StorageFacade,
}

impl SessionManager {
    pub fn new(durable: StorageFacade, tab: StorageFacade) -> Self {
        SessionManager { durable, tab }
    }

    /// Same durable store, fresh tab store: what a page reload or a new tab sees.
    pub fn reload(&self) -> Self {
        SessionManager::new(self.durable.clone(), StorageFacade::in_memory())
    }

    pub fn start(&self, user: &PublicUser, remember: bool) {
        let snapshot_saved = self.durable.set(CURRENT_USER_KEY, user);
        let flag_saved = self.durable.set(REMEMBER_ME_KEY, &remember);
        let marker_saved = self.tab.set(SESSION_ACTIVE_KEY, &true);

        if snapshot_saved && flag_saved && marker_saved {
            tracing::info!(user_id = %user.id, remember, "Session started");
        } else {
            tracing::warn!(user_id = %user.id, "Session could not be fully persisted");
        }
    }

    pub fn end(&self) {
        self.durable.remove(CURRENT_USER_KEY);
        self.durable.remove(REMEMBER_ME_KEY);
        self.tab.remove(SESSION_ACTIVE_KEY);
        tracing::info!("Session ended");
    }

    /// Resolves the session. A non-remembered snapshot without the tab marker is
    /// stale: it is dropped and the session is anonymous.
    pub fn state(&self) -> SessionState {
        let Some(user) = self.durable.get::<PublicUser>(CURRENT_USER_KEY) else {
            return SessionState::Anonymous;
        };

        if self.durable.get::<bool>(REMEMBER_ME_KEY).unwrap_or(false) {
            return SessionState::Remembered(user);
        }

        if self.tab.contains(SESSION_ACTIVE_KEY) {
            SessionState::Ephemeral(user)
        } else {
            tracing::debug!(user_id = %user.id, "Discarding session snapshot from another tab");
            self.durable.remove(CURRENT_USER_KEY);
            self.durable.remove(REMEMBER_ME_KEY);
            SessionState::Anonymous
        }
    }

    pub fn current_user(&self) -> Option<PublicUser> {
        self.state().user().cloned()
    }

    /// Refreshes the snapshot when `user` owns the session; other users are ignored.
    pub fn sync_user(&self, user: &User) -> bool {
        match self.durable.get::<PublicUser>(CURRENT_USER_KEY) {
            Some(snapshot) if snapshot.id == user.id => {
                self.durable.set(CURRENT_USER_KEY, &PublicUser::from(user))
            }
            _ => false,
        }
    }
}
