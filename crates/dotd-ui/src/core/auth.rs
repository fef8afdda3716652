//! Session identity and action authorization shared across the UI.
//!
//! # Design
//! - Keep session state as plain data; the who-am-I endpoint is the only
//!   source of truth for identity and role.
//! - Authorization failures never reach the network: callers run
//!   [`authorize`] first and block or redirect locally.

use dotd_api_models::{CurrentUser, UserRole};

/// Login state for the current browser session.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Identity not yet resolved (initial who-am-I query in flight).
    #[default]
    Unknown,
    /// No usable credential; browsing as a guest.
    Guest,
    /// Authenticated account.
    SignedIn(CurrentUser),
}

impl SessionState {
    /// The signed-in account, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::Unknown | Self::Guest => None,
        }
    }

    /// Whether a signed-in account is present.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }

    /// Whether the signed-in account holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|user| user.role == UserRole::Admin)
    }
}

/// Requirement an action places on the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessRule<'a> {
    /// Any signed-in account may perform the action.
    SignedIn,
    /// Only administrators may perform the action.
    Admin,
    /// Administrators, or the owner of the target item.
    AdminOrOwner {
        /// Identifier of the item's owning user.
        owner_id: &'a str,
    },
}

/// Local verdict for an attempted action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionGate {
    /// Proceed with the local mutation and remote call.
    Allowed,
    /// No credential; prompt for login instead of mutating anything.
    NeedsLogin,
    /// Signed in but lacking the required role; no state change.
    Forbidden,
}

/// Check an access rule against the session without side effects.
#[must_use]
pub fn authorize(session: &SessionState, rule: AccessRule<'_>) -> ActionGate {
    let Some(user) = session.user() else {
        return ActionGate::NeedsLogin;
    };
    match rule {
        AccessRule::SignedIn => ActionGate::Allowed,
        AccessRule::Admin => {
            if user.role == UserRole::Admin {
                ActionGate::Allowed
            } else {
                ActionGate::Forbidden
            }
        }
        AccessRule::AdminOrOwner { owner_id } => {
            if user.role == UserRole::Admin || user.id == owner_id {
                ActionGate::Allowed
            } else {
                ActionGate::Forbidden
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str, role: UserRole) -> SessionState {
        SessionState::SignedIn(CurrentUser {
            id: id.to_string(),
            name: "Mina".to_string(),
            email: None,
            avatar: None,
            role,
            daily_generations_used: 0,
            max_daily_generations: 5,
        })
    }

    #[test]
    fn guests_are_sent_to_login() {
        assert_eq!(
            authorize(&SessionState::Guest, AccessRule::SignedIn),
            ActionGate::NeedsLogin
        );
        assert_eq!(
            authorize(&SessionState::Unknown, AccessRule::Admin),
            ActionGate::NeedsLogin
        );
    }

    #[test]
    fn admin_rule_blocks_regular_accounts() {
        assert_eq!(
            authorize(&account("U1", UserRole::User), AccessRule::Admin),
            ActionGate::Forbidden
        );
        assert_eq!(
            authorize(&account("A1", UserRole::Admin), AccessRule::Admin),
            ActionGate::Allowed
        );
    }

    #[test]
    fn owner_rule_admits_owner_and_admin_only() {
        let rule = AccessRule::AdminOrOwner { owner_id: "U1" };
        assert_eq!(
            authorize(&account("U1", UserRole::User), rule),
            ActionGate::Allowed
        );
        assert_eq!(
            authorize(&account("U2", UserRole::User), rule),
            ActionGate::Forbidden
        );
        assert_eq!(
            authorize(&account("A1", UserRole::Admin), rule),
            ActionGate::Allowed
        );
    }

    #[test]
    fn admin_flag_reads_role() {
        assert!(account("A1", UserRole::Admin).is_admin());
        assert!(!account("U1", UserRole::User).is_admin());
        assert!(!SessionState::Guest.is_admin());
    }
}
