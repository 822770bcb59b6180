//! Runtime orchestration for the deterministic combat engine.
//!
//! This crate wires together the oracle adapters, snapshot repositories, and
//! worker tasks into a cohesive runtime API. Consumers embed [`Runtime`] to
//! host a combat session, subscribe to events, and drive turns through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus for flexible routing
//! - [`workers`] keeps background tasks internal to the crate
//! - [`oracle`] and [`repository`] provide data adapters for the engine
//! - [`config`] and [`telemetry`] cover host bootstrap concerns
pub mod api;
pub mod config;
pub mod events;
pub mod notify;
pub mod oracle;
pub mod repository;
pub mod runtime;
pub mod telemetry;

mod workers;

pub use api::{PersistenceError, Result, RuntimeError, RuntimeHandle};
pub use config::RuntimeConfig;
pub use events::{CombatEvent, EventBus, Topic};
pub use notify::{ChannelSink, InitiativeRollNote, NotificationSink, TracingSink};
pub use oracle::{
    CharacterProfile, CreatureDirectory, EffectTracker, OracleManager, OverTimeEffect,
    OverTimeProcessor, RegenProvider, TrackedEffect, VitalsEntry,
};
pub use repository::{FileStateRepository, InMemoryStateRepository, StateRepository};
pub use runtime::{Runtime, RuntimeBuilder};
pub use telemetry::init_telemetry;
