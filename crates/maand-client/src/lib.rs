//! Client library for the Maand API.
//!
//! Three pieces, each independently usable:
//!
//! - [`SessionStore`]: where the signed-in identity lives ([`MemorySessionStore`]
//!   for tests, [`FileSessionStore`] for a persistent CLI session).
//! - [`Gateway`]: an HTTP client that attaches the bearer token from the
//!   session store to every request and normalizes errors.
//! - [`RouteGuard`]: decides whether the current session may enter a view.

mod error;
mod gateway;
mod guard;
mod session;

pub use error::ClientError;
pub use gateway::{Acknowledgement, Gateway, Identity};
pub use guard::{Access, RouteGuard};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
