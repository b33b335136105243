use serde::{Deserialize, Serialize};

use crate::resolve::{AccessError, ResolvedConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvParams {
    #[serde(rename = "numEnvs")]
    pub num_envs: u32,
    #[serde(rename = "numObservations")]
    pub num_observations: u32,
    #[serde(rename = "numActions")]
    pub num_actions: u32,
    pub env_spacing: f64,
    pub franka_depth: f64,
    pub table_height: f64,
    pub franka_friction: f64,
    pub table_friction: f64,
    pub close_and_lift: bool,
    pub num_gripper_move_sim_steps: u32,
    pub num_gripper_close_sim_steps: u32,
    pub num_gripper_lift_sim_steps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RlParams {
    pub pos_action_scale: [f64; 3],
    pub rot_action_scale: [f64; 3],
    pub force_action_scale: [f64; 3],
    pub torque_action_scale: [f64; 3],
    pub clamp_rot: bool,
    pub clamp_rot_thresh: f64,
    pub num_keypoints: u32,
    pub keypoint_scale: f64,
    pub keypoint_reward_scale: f64,
    pub action_penalty_scale: f64,
    pub max_episode_length: u32,
    pub success_bonus: f64,
}

/// Initial-state randomization. Arm length depends on the robot model, so
/// the arm pose stays a `Vec`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomizeParams {
    pub franka_arm_initial_dof_pos: Vec<f64>,
    pub fingertip_midpoint_pos_initial: [f64; 3],
    pub fingertip_midpoint_pos_noise: [f64; 3],
    pub fingertip_midpoint_rot_initial: [f64; 3],
    pub fingertip_midpoint_rot_noise: [f64; 3],
    pub nut_pos_xy_initial: [f64; 2],
    pub nut_pos_xy_initial_noise: [f64; 2],
    pub bolt_pos_xy_initial: [f64; 2],
    pub bolt_pos_xy_noise: [f64; 2],
}

/// The task-level sections a consumer reads at environment construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskParams {
    pub name: String,
    pub physics_engine: String,
    pub env: EnvParams,
    pub rl: RlParams,
    pub randomize: RandomizeParams,
}

impl TaskParams {
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, AccessError> {
        Ok(Self {
            name: config.get_str("name")?.to_string(),
            physics_engine: config.get_str("physics_engine")?.to_string(),
            env: config.extract("env")?,
            rl: config.extract("rl")?,
            randomize: config.extract("randomize")?,
        })
    }
}
