use serde::Serialize;

use crate::resolve::{AccessError, ResolvedConfig};
use crate::task::types::{
    ControllerType, ForceCtrlMethod, GainSpace, IkMethod, JacobianType, MotorCtrlMode,
};

/// Control-law settings derived from the `ctrl` section.
///
/// Only the fields the selected law uses are populated; the rest stay `None`
/// (or `false` for the on/off switches).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerSettings {
    pub num_envs: i64,
    pub ctrl_type: ControllerType,
    pub motor_ctrl_mode: MotorCtrlMode,
    pub gain_space: GainSpace,
    pub jacobian_type: JacobianType,
    pub gripper_prop_gains: Vec<f64>,
    pub gripper_deriv_gains: Vec<f64>,
    pub ik_method: Option<IkMethod>,
    pub joint_prop_gains: Option<Vec<f64>>,
    pub joint_deriv_gains: Option<Vec<f64>>,
    pub do_inertial_comp: bool,
    pub do_motion_ctrl: bool,
    pub task_prop_gains: Option<Vec<f64>>,
    pub task_deriv_gains: Option<Vec<f64>>,
    pub motion_ctrl_axes: Option<Vec<f64>>,
    pub do_force_ctrl: bool,
    pub force_ctrl_method: Option<ForceCtrlMethod>,
    pub wrench_prop_gains: Option<Vec<f64>>,
    pub force_ctrl_axes: Option<Vec<f64>>,
}

impl ControllerSettings {
    /// Read `ctrl.ctrl_type` and pull the selected branch's gains.
    ///
    /// Expects a validated config; a missing or mistyped key still comes back
    /// as an [`AccessError`] rather than a panic.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, AccessError> {
        let ctrl_type = choice(config, "ctrl.ctrl_type", ControllerType::parse, ControllerType::names())?;
        let jacobian_type = choice(
            config,
            "ctrl.all.jacobian_type",
            JacobianType::parse,
            JacobianType::names(),
        )?;
        let branch = Branch {
            config,
            prefix: format!("ctrl.{}", ctrl_type),
        };

        let mut settings = ControllerSettings {
            num_envs: config.get_i64("env.numEnvs")?,
            ctrl_type,
            motor_ctrl_mode: MotorCtrlMode::Manual,
            gain_space: if ctrl_type.is_joint_space() {
                GainSpace::Joint
            } else {
                GainSpace::Task
            },
            jacobian_type,
            gripper_prop_gains: config.get_vector("ctrl.all.gripper_prop_gains")?.to_vec(),
            gripper_deriv_gains: config.get_vector("ctrl.all.gripper_deriv_gains")?.to_vec(),
            ik_method: None,
            joint_prop_gains: None,
            joint_deriv_gains: None,
            do_inertial_comp: false,
            do_motion_ctrl: false,
            task_prop_gains: None,
            task_deriv_gains: None,
            motion_ctrl_axes: None,
            do_force_ctrl: false,
            force_ctrl_method: None,
            wrench_prop_gains: None,
            force_ctrl_axes: None,
        };

        if ctrl_type.is_joint_space() {
            settings.ik_method = Some(choice(
                config,
                &branch.path("ik_method"),
                IkMethod::parse,
                IkMethod::names(),
            )?);
            settings.joint_prop_gains = Some(branch.vector("joint_prop_gains")?);
            settings.joint_deriv_gains = Some(branch.vector("joint_deriv_gains")?);
        }

        match ctrl_type {
            ControllerType::GymDefault => {
                settings.motor_ctrl_mode = MotorCtrlMode::Gym;
                settings.gripper_prop_gains = branch.vector("gripper_prop_gains")?;
                settings.gripper_deriv_gains = branch.vector("gripper_deriv_gains")?;
            }
            ControllerType::JointSpaceIk => {}
            ControllerType::JointSpaceId => settings.do_inertial_comp = true,
            ControllerType::TaskSpaceImpedance | ControllerType::OperationalSpaceMotion => {
                settings.do_inertial_comp = ctrl_type == ControllerType::OperationalSpaceMotion;
                branch.motion(&mut settings)?;
            }
            ControllerType::OpenLoopForce => {
                settings.do_force_ctrl = true;
                settings.force_ctrl_method = Some(ForceCtrlMethod::Open);
                settings.force_ctrl_axes = Some(branch.vector("force_ctrl_axes")?);
            }
            ControllerType::ClosedLoopForce => branch.closed_loop_force(&mut settings)?,
            ControllerType::HybridForceMotion => {
                settings.do_inertial_comp = true;
                branch.motion(&mut settings)?;
                branch.closed_loop_force(&mut settings)?;
            }
        }

        Ok(settings)
    }

    /// Arm and gripper gains concatenated, as handed to the simulator's PD
    /// drive when it owns the motors.
    pub fn drive_gains(&self) -> Option<(Vec<f64>, Vec<f64>)> {
        if self.motor_ctrl_mode != MotorCtrlMode::Gym {
            return None;
        }
        let joint_prop = self.joint_prop_gains.as_ref()?;
        let joint_deriv = self.joint_deriv_gains.as_ref()?;
        let prop = joint_prop.iter().chain(&self.gripper_prop_gains).copied().collect();
        let deriv = joint_deriv.iter().chain(&self.gripper_deriv_gains).copied().collect();
        Some((prop, deriv))
    }
}

struct Branch<'a> {
    config: &'a ResolvedConfig,
    prefix: String,
}

impl Branch<'_> {
    fn path(&self, key: &str) -> String {
        format!("{}.{}", self.prefix, key)
    }

    fn vector(&self, key: &str) -> Result<Vec<f64>, AccessError> {
        Ok(self.config.get_vector(&self.path(key))?.to_vec())
    }

    fn motion(&self, settings: &mut ControllerSettings) -> Result<(), AccessError> {
        settings.do_motion_ctrl = true;
        settings.task_prop_gains = Some(self.vector("task_prop_gains")?);
        settings.task_deriv_gains = Some(self.vector("task_deriv_gains")?);
        settings.motion_ctrl_axes = Some(self.vector("motion_ctrl_axes")?);
        Ok(())
    }

    fn closed_loop_force(&self, settings: &mut ControllerSettings) -> Result<(), AccessError> {
        settings.do_force_ctrl = true;
        settings.force_ctrl_method = Some(ForceCtrlMethod::Closed);
        settings.wrench_prop_gains = Some(self.vector("wrench_prop_gains")?);
        settings.force_ctrl_axes = Some(self.vector("force_ctrl_axes")?);
        Ok(())
    }
}

fn choice<T>(
    config: &ResolvedConfig,
    path: &str,
    parse: fn(&str) -> Option<T>,
    allowed: &[&str],
) -> Result<T, AccessError> {
    let value = config.get_str(path)?;
    parse(value).ok_or_else(|| AccessError::InvalidChoice {
        path: path.to_string(),
        value: value.to_string(),
        allowed: allowed.join(", "),
    })
}
