//! Placeholder engine: parsing, element identification, materialization,
//! accent propagation and resolution.
//!
//! Everything in here is synchronous and free of I/O. Handlers await their
//! collaborators first and then call into the engine.

pub mod accent;
pub mod dom;
pub mod identify;
pub mod materialize;
pub mod paths;
pub mod resolve;

pub use materialize::{inspect, Materialized, MaterializeOptions, Materializer};
pub use resolve::Resolver;
