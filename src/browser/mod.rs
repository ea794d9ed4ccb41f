//! Browser infrastructure.
//!
//! Owns the scarce resource (a Chromium instance + page) and exposes only
//! the capabilities the pipeline needs: navigate, read the current
//! document, trigger a reveal, wait for an element, click. Workers never
//! share a session; each one gets its own from a [`SessionFactory`].

pub mod session;

pub use session::{HeadlessFactory, Session, SessionFactory};
