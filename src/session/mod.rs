//! Session bootstrap: credential verification, profile hydration, and the
//! reactive current-user cell.
//!
//! SYSTEM CONTEXT
//! ==============
//! `verifier` and `hydrator` are single remote calls with no storage side
//! effects. `bootstrap` composes them with the credential store and the
//! session `store`, and is the only place that decides when a credential is
//! cleared.

pub mod bootstrap;
pub mod hydrator;
pub mod store;
pub mod verifier;

pub use bootstrap::{AnonymousReason, BootstrapOutcome, BootstrapState, SessionBootstrap};
pub use store::{NavigationId, SessionStore};
