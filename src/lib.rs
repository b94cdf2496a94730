//! chatdeck - in-memory chat shell
//!
//! Conversations, messages and feedback live in an explicit [`store::Store`];
//! the chat view is a pure state machine ([`session`]) driven by a
//! [`runtime::ChatRuntime`] that talks to a [`simulator::ResponseSimulator`].
//! Rated conversations are browsed through [`overview::Overview`].

pub mod config;
pub mod overview;
pub mod runtime;
pub mod session;
pub mod simulator;
pub mod store;
