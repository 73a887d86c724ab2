//! Reference host model for the attrguard validation engine.
//!
//! [`Model`] is an in-memory attribute store that runs the engine on every
//! validated assignment, tracks what changed, and reports to registered
//! listeners. [`ModelConfig`] describes a model declaratively and loads
//! from TOML or JSON.

mod config;
mod error;
mod events;
mod model;

pub use config::ModelConfig;
pub use error::{ConfigError, ConfigResult};
pub use events::ModelEvent;
pub use model::{Listener, Model, SetOptions};
