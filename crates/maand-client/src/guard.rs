//! Route guarding: may the current session enter a view?

use maand_auth::Role;
use std::sync::Arc;

use crate::session::SessionStore;

/// Verdict for a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Let the navigation through.
    Admitted,
    /// No session: send the visitor to the sign-in view.
    RedirectToSignIn,
    /// Signed in but with the wrong role: send them home.
    RedirectToHome,
}

/// Decides route access from the stored session.
///
/// Stateless apart from the session store; one guard serves every route.
pub struct RouteGuard {
    session: Arc<dyn SessionStore>,
}

impl RouteGuard {
    /// Guard routes against the given session store.
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self { session }
    }

    /// Check whether the current session may enter a route.
    ///
    /// `required_role` of `None` means any signed-in user is admitted.
    /// Anonymous visitors are always redirected to sign-in, regardless of
    /// the role requirement.
    pub fn check(&self, required_role: Option<Role>) -> Access {
        let session = match self.session.get() {
            Some(session) => session,
            None => return Access::RedirectToSignIn,
        };

        match required_role {
            Some(required) if session.role != required => Access::RedirectToHome,
            _ => Access::Admitted,
        }
    }
}
