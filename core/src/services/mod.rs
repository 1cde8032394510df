// piped_mediator/src/services/mod.rs

//! A minimal, type-keyed service registry with transient, scoped and singleton
//! lifetimes. The mediator and the pipeline builder resolve through it.

pub mod collection;
pub mod lifetime;
pub mod provider;

pub use collection::ServiceCollection;
pub use lifetime::Lifetime;
pub use provider::{ServiceProvider, WeakServiceProvider};
