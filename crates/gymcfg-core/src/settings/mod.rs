//! # Tool Settings
//!
//! Where to look for task documents, which robot the controller gains are
//! sized for, and how strict validation is.

pub mod defaults;
pub mod loading;
pub mod types;

pub use loading::{load_from_paths, load_hierarchy, merge_settings};
pub use types::{GymcfgSettings, RobotSettings, SearchSettings, ValidationSettings};
