//! App-wide yewdux store slices.
//!
//! # Design
//! - Keep shared UI state in one store to avoid ad-hoc contexts.
//! - Creation cards live in a single id-keyed map inside the listings
//!   slice, so every view of the same item reads one source of truth.

use crate::core::auth::SessionState;
use crate::features::generate::state::GenerateState;
use crate::features::listings::state::ListingsState;
use yewdux::store::Store;

/// Global application store for shared state.
#[derive(Clone, Debug, PartialEq, Store, Default)]
pub struct AppStore {
    /// Session identity and login flow state.
    pub session: SessionSlice,
    /// Feed / my-page / picked listings plus the shared card map.
    pub listings: ListingsState,
    /// Generation task monitor state.
    pub generate: GenerateState,
}

/// Shared session state for the UI.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SessionSlice {
    /// Resolved identity.
    pub state: SessionState,
    /// Login request in flight.
    pub busy: bool,
    /// Last login error message.
    pub error: Option<String>,
}

impl SessionSlice {
    /// Record a resolved identity and clear transient login state.
    pub fn resolve(&mut self, state: SessionState) {
        self.state = state;
        self.busy = false;
        self.error = None;
    }

    /// Drop the identity after logout or a cleared credential.
    pub fn sign_out(&mut self) {
        self.state = SessionState::Guest;
        self.busy = false;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotd_api_models::{CurrentUser, UserRole};

    #[test]
    fn resolve_clears_login_error_and_busy() {
        let mut slice = SessionSlice {
            busy: true,
            error: Some("bad password".to_string()),
            ..Default::default()
        };
        slice.resolve(SessionState::SignedIn(CurrentUser {
            id: "U1".to_string(),
            name: "Mina".to_string(),
            email: None,
            avatar: None,
            role: UserRole::User,
            daily_generations_used: 1,
            max_daily_generations: 5,
        }));
        assert!(slice.state.is_signed_in());
        assert!(!slice.busy);
        assert!(slice.error.is_none());
    }

    #[test]
    fn sign_out_degrades_to_guest() {
        let mut slice = SessionSlice::default();
        slice.sign_out();
        assert_eq!(slice.state, SessionState::Guest);
    }
}
