//! # Schema Registry
//!
//! Declares which sections and keys a task document may carry, their types,
//! defaults, plausible ranges and, for vectors, their expected length in
//! terms of the robot being controlled.
//!
//! ```rust
//! use gymcfg_core::schema::{KeySpec, SchemaRegistryBuilder, SectionSpec, VectorLen};
//!
//! # fn example() -> Result<(), gymcfg_core::schema::SchemaError> {
//! let mut builder = SchemaRegistryBuilder::new();
//! builder.register(
//!     "rl",
//!     SectionSpec::new()
//!         .key(KeySpec::new("max_episode_length").integer().required().min(1.0))
//!         .key(KeySpec::new("pos_action_scale").vector(VectorLen::Fixed(3))),
//! )?;
//! let registry = builder.build();
//! assert!(registry.lookup("rl").is_ok());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod factory;
pub mod registry;
pub mod types;

pub use errors::SchemaError;
pub use registry::{SchemaRegistry, SchemaRegistryBuilder, TASK_SECTION, builtin_registry};
pub use types::{KeySchema, KeySpec, RobotModel, SectionSchema, SectionSpec, ValueType, VectorLen};
