//! Built-in schema for the factory nut/bolt task family.
//!
//! Key names follow the task documents exactly, including the camelCase
//! `env` keys read by the vectorized environment wrapper.

use crate::schema::errors::SchemaError;
use crate::schema::registry::{SchemaRegistry, SchemaRegistryBuilder, TASK_SECTION};
use crate::schema::types::{KeySpec, SectionSpec, VectorLen};
use crate::task::{ControllerType, IkMethod, JacobianType};

pub const PHYSICS_ENGINES: &[&str] = &["physx", "flex"];
const UP_AXES: &[&str] = &["y", "z"];

pub(crate) fn build_registry() -> Result<SchemaRegistry, SchemaError> {
    let mut builder = SchemaRegistryBuilder::new();
    builder
        .register(TASK_SECTION, task_section())?
        .register("mode", mode_section())?
        .register("sim", sim_section())?
        .register("env", env_section())?
        .register("randomize", randomize_section())?
        .register("rl", rl_section())?
        .register("ctrl", ctrl_section())?;
    Ok(builder.build())
}

fn task_section() -> SectionSpec {
    SectionSpec::new()
        .key(KeySpec::new("name").string().required().doc("Task identifier"))
        .key(
            KeySpec::new("physics_engine")
                .one_of(PHYSICS_ENGINES)
                .default_value("physx"),
        )
}

fn mode_section() -> SectionSpec {
    SectionSpec::new()
        .key(KeySpec::new("export_scene").bool().default_value(false))
        .key(KeySpec::new("export_states").bool().default_value(false))
}

fn sim_section() -> SectionSpec {
    SectionSpec::new()
        .key(
            KeySpec::new("dt")
                .float()
                .default_value(0.016667)
                .min(0.0)
                .max(1.0)
                .doc("Physics step in seconds"),
        )
        .key(KeySpec::new("substeps").integer().default_value(2).min(1.0))
        .key(KeySpec::new("up_axis").one_of(UP_AXES).default_value("z"))
        .key(KeySpec::new("use_gpu_pipeline").bool().default_value(true))
        .key(
            KeySpec::new("gravity")
                .vector(VectorLen::Fixed(3))
                .default_value(vec![0.0, 0.0, -9.81]),
        )
        .key(KeySpec::new("add_damping").bool().default_value(true))
        .key(KeySpec::new("disable_gravity").bool().default_value(false))
        // solver parameters go straight to the engine
        .section("physx", SectionSpec::new().open())
}

fn env_section() -> SectionSpec {
    SectionSpec::new()
        .key(KeySpec::new("numEnvs").integer().required().min(1.0))
        .key(KeySpec::new("numObservations").integer().required().min(1.0))
        .key(
            KeySpec::new("numActions")
                .integer()
                .required()
                .min(1.0)
                .doc("Action width across both arms"),
        )
        .key(KeySpec::new("env_spacing").float().default_value(0.5).non_negative())
        .key(KeySpec::new("franka_depth").float().default_value(0.5))
        .key(KeySpec::new("table_height").float().default_value(0.4))
        .key(KeySpec::new("franka_friction").float().default_value(1.0).non_negative())
        .key(KeySpec::new("table_friction").float().default_value(0.3).non_negative())
        .key(KeySpec::new("close_and_lift").bool().default_value(true))
        .key(
            KeySpec::new("num_gripper_move_sim_steps")
                .integer()
                .default_value(20)
                .non_negative(),
        )
        .key(
            KeySpec::new("num_gripper_close_sim_steps")
                .integer()
                .default_value(25)
                .non_negative(),
        )
        .key(
            KeySpec::new("num_gripper_lift_sim_steps")
                .integer()
                .default_value(25)
                .non_negative(),
        )
}

fn randomize_section() -> SectionSpec {
    SectionSpec::new()
        .key(
            KeySpec::new("franka_arm_initial_dof_pos")
                .vector(VectorLen::ArmDofs)
                .required(),
        )
        .key(
            KeySpec::new("fingertip_midpoint_pos_initial")
                .vector(VectorLen::Fixed(3))
                .required(),
        )
        .key(
            KeySpec::new("fingertip_midpoint_pos_noise")
                .vector(VectorLen::Fixed(3))
                .required()
                .non_negative(),
        )
        .key(
            KeySpec::new("fingertip_midpoint_rot_initial")
                .vector(VectorLen::Fixed(3))
                .required(),
        )
        .key(
            KeySpec::new("fingertip_midpoint_rot_noise")
                .vector(VectorLen::Fixed(3))
                .required()
                .non_negative(),
        )
        .key(
            KeySpec::new("nut_pos_xy_initial")
                .vector(VectorLen::Fixed(2))
                .required(),
        )
        .key(
            KeySpec::new("nut_pos_xy_initial_noise")
                .vector(VectorLen::Fixed(2))
                .required()
                .non_negative(),
        )
        .key(
            KeySpec::new("bolt_pos_xy_initial")
                .vector(VectorLen::Fixed(2))
                .required(),
        )
        .key(
            KeySpec::new("bolt_pos_xy_noise")
                .vector(VectorLen::Fixed(2))
                .required()
                .non_negative(),
        )
}

fn rl_section() -> SectionSpec {
    let action_scale = |name: &str| {
        KeySpec::new(name)
            .vector(VectorLen::Fixed(3))
            .required()
            .non_negative()
    };
    SectionSpec::new()
        .key(action_scale("pos_action_scale"))
        .key(action_scale("rot_action_scale"))
        .key(action_scale("force_action_scale"))
        .key(action_scale("torque_action_scale"))
        .key(KeySpec::new("clamp_rot").bool().default_value(true))
        .key(
            KeySpec::new("clamp_rot_thresh")
                .float()
                .default_value(1.0e-6)
                .non_negative(),
        )
        .key(KeySpec::new("num_keypoints").integer().default_value(4).min(1.0))
        .key(KeySpec::new("keypoint_scale").float().default_value(0.5).non_negative())
        .key(
            KeySpec::new("keypoint_reward_scale")
                .float()
                .default_value(1.0)
                .non_negative(),
        )
        .key(
            KeySpec::new("action_penalty_scale")
                .float()
                .default_value(0.0)
                .non_negative(),
        )
        .key(KeySpec::new("max_episode_length").integer().required().min(1.0))
        .key(KeySpec::new("success_bonus").float().default_value(0.0).non_negative())
}

fn gains(name: &str, length: VectorLen) -> KeySpec {
    KeySpec::new(name).vector(length).required().non_negative()
}

fn axes(name: &str) -> KeySpec {
    KeySpec::new(name)
        .vector(VectorLen::TaskSpace)
        .required()
        .min(0.0)
        .max(1.0)
}

fn ik_method() -> KeySpec {
    KeySpec::new("ik_method").one_of(IkMethod::names()).required()
}

fn joint_space_branch() -> SectionSpec {
    SectionSpec::new()
        .key(ik_method())
        .key(gains("joint_prop_gains", VectorLen::ArmDofs))
        .key(gains("joint_deriv_gains", VectorLen::ArmDofs))
}

fn motion_branch() -> SectionSpec {
    SectionSpec::new()
        .key(axes("motion_ctrl_axes"))
        .key(gains("task_prop_gains", VectorLen::TaskSpace))
        .key(gains("task_deriv_gains", VectorLen::TaskSpace))
}

fn ctrl_section() -> SectionSpec {
    SectionSpec::new()
        .key(
            KeySpec::new("ctrl_type")
                .one_of(ControllerType::names())
                .required()
                .doc("Selects the control-law branch below"),
        )
        .section(
            "all",
            SectionSpec::new()
                .key(
                    KeySpec::new("jacobian_type")
                        .one_of(JacobianType::names())
                        .default_value(JacobianType::Geometric.as_str()),
                )
                .key(gains("gripper_prop_gains", VectorLen::GripperDofs))
                .key(gains("gripper_deriv_gains", VectorLen::GripperDofs)),
        )
        .section(
            ControllerType::GymDefault.as_str(),
            joint_space_branch()
                .key(gains("gripper_prop_gains", VectorLen::GripperDofs))
                .key(gains("gripper_deriv_gains", VectorLen::GripperDofs)),
        )
        .section(ControllerType::JointSpaceIk.as_str(), joint_space_branch())
        .section(ControllerType::JointSpaceId.as_str(), joint_space_branch())
        .section(ControllerType::TaskSpaceImpedance.as_str(), motion_branch())
        .section(ControllerType::OperationalSpaceMotion.as_str(), motion_branch())
        .section(
            ControllerType::OpenLoopForce.as_str(),
            SectionSpec::new().key(axes("force_ctrl_axes")),
        )
        .section(
            ControllerType::ClosedLoopForce.as_str(),
            SectionSpec::new()
                .key(axes("force_ctrl_axes"))
                .key(gains("wrench_prop_gains", VectorLen::TaskSpace)),
        )
        .section(
            ControllerType::HybridForceMotion.as_str(),
            motion_branch()
                .key(axes("force_ctrl_axes"))
                .key(gains("wrench_prop_gains", VectorLen::TaskSpace)),
        )
        .selected_by("ctrl_type")
}
