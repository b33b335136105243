//! Typed views over a resolved task config.
//!
//! Consumers read these instead of walking the tree by string path.

pub mod controller;
pub mod params;
pub mod types;

pub use controller::ControllerSettings;
pub use params::{EnvParams, RandomizeParams, RlParams, TaskParams};
pub use types::{ControllerType, ForceCtrlMethod, GainSpace, IkMethod, JacobianType, MotorCtrlMode};
