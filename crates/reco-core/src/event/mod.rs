//! Log de eventos de ejecución (append-only).

pub mod store;
pub mod types;

pub use store::{EventStore, InMemoryEventStore};
pub use types::{RunEvent, RunEventKind};
