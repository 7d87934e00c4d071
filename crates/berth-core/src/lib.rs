//! Berth Core - Session lifecycle orchestration for embedding hosts
//!
//! This crate provides the machinery that docks lifetime-scoped extension
//! sessions into a host application's workload lifecycle:
//!
//! - `WorkloadSignals`: the two lifecycle signals a host raises
//! - `SessionLifecycle`: builds and tears down sessions, owns the factory
//!   registry, broadcasts session events
//! - `Session`: the per-workload aggregate of extension managers
//! - `Manager`: the extension unit trait with attach/detach hooks
//!
//! # Architecture
//!
//! ```text
//! host ──notify_loaded──▶ WorkloadSignals ──▶ SessionLifecycle
//!                                              │ factories build managers
//!                                              ▼
//!        session_loaded ◀── Session { M1, M2, ... } (attached in add order)
//! ```
//!
//! # Example Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use berth_core::{SessionLifecycle, WorkloadSignals, ManagerFactory};
//!
//! let signals = Arc::new(WorkloadSignals::new());
//! let lifecycle = SessionLifecycle::new();
//! lifecycle.attach(&signals);
//!
//! let factory: ManagerFactory = Arc::new(|session| {
//!     Ok(Some(Box::new(ChatManager::for_session(session))))
//! });
//! lifecycle.add_factory(factory);
//!
//! lifecycle.session_loaded().subscribe(|session| {
//!     println!("session {} is up", session.name());
//!     Ok(())
//! });
//!
//! // The host drives the lifecycle:
//! signals.notify_loaded(&workload)?;
//! signals.notify_unloaded()?;
//! ```

pub mod error;
pub mod factory;
pub mod lifecycle;
pub mod manager;
pub mod session;
pub mod signal;
pub mod workload;

pub use error::{Error, Result};
pub use factory::{FactoryRegistry, ManagerFactory};
pub use lifecycle::SessionLifecycle;
pub use manager::{Manager, ManagerRegistry};
pub use session::{Session, SessionId, SessionState};
pub use signal::{Signal, SubscriptionId};
pub use workload::{Workload, WorkloadSignals};
