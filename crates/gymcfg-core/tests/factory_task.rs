//! End-to-end loading of the bundled factory task documents.

use gymcfg_core::document::Value;
use gymcfg_core::pipeline::{DirectorySource, LoadRequest, assignments_mapping, load_task};
use gymcfg_core::task::{ControllerType, GainSpace, IkMethod, MotorCtrlMode};
use gymcfg_core::{FindingKind, PipelineError};

const TASK: &str = "FactoryTaskNutBoltPick_MARL2";

fn source() -> DirectorySource {
    DirectorySource::new(vec![
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../configs/task").into(),
    ])
}

fn request(scope: &[&str]) -> LoadRequest {
    LoadRequest::new(TASK).with_scope(assignments_mapping(scope).unwrap())
}

fn validation_findings(err: PipelineError) -> Vec<gymcfg_core::Finding> {
    match err {
        PipelineError::Validation(v) => v.report().findings.clone(),
        other => panic!("expected validation failure, got {other}"),
    }
}

#[test]
fn loads_with_builtin_defaults() {
    let loaded = load_task(&request(&["physics_engine=physx"]), &source()).unwrap();

    assert_eq!(loaded.layers, vec!["FactoryBase", TASK]);
    assert!(!loaded.report.has_fatal(), "{}", loaded.report);
    assert_eq!(loaded.config.name(), Some(TASK));
    assert_eq!(loaded.config.get_i64("env.numEnvs").unwrap(), 128);
    assert_eq!(loaded.config.get_i64("env.numObservations").unwrap(), 40);
    // the commented-out value above it in the document has no effect
    assert_eq!(loaded.config.get_i64("env.numActions").unwrap(), 24);
    assert_eq!(loaded.config.get_str("physics_engine").unwrap(), "physx");
}

#[test]
fn base_values_survive_under_task_values() {
    let loaded = load_task(&request(&["physics_engine=physx"]), &source()).unwrap();

    assert_eq!(loaded.config.get_f64("env.table_height").unwrap(), 0.4);
    assert_eq!(loaded.config.get_i64("sim.substeps").unwrap(), 2);
    assert!(!loaded.config.get_bool("sim.disable_gravity").unwrap());
    assert_eq!(loaded.config.get_vector("sim.gravity").unwrap(), &[0.0, 0.0, -9.81]);
    assert_eq!(loaded.config.get_i64("sim.physx.num_threads").unwrap(), 4);
}

#[test]
fn launcher_scope_sets_env_count() {
    let loaded = load_task(&request(&["physics_engine=physx", "num_envs=64"]), &source()).unwrap();
    assert_eq!(loaded.config.get_i64("env.numEnvs").unwrap(), 64);

    let controller = loaded.controller().unwrap();
    assert_eq!(controller.num_envs, 64);
}

#[test]
fn launcher_scope_sets_physx_threads() {
    let loaded = load_task(&request(&["physics_engine=physx", "num_threads=8"]), &source()).unwrap();
    assert_eq!(loaded.config.get_i64("sim.physx.num_threads").unwrap(), 8);
}

#[test]
fn override_beats_every_document() {
    let req = request(&["physics_engine=physx"])
        .with_overrides(vec!["env.numActions=20".to_string(), "rl.max_episode_length=200".to_string()]);
    let loaded = load_task(&req, &source()).unwrap();

    assert_eq!(loaded.layers.last().map(String::as_str), Some("overrides"));
    assert_eq!(loaded.config.get_i64("env.numActions").unwrap(), 20);
    assert_eq!(loaded.config.get_i64("rl.max_episode_length").unwrap(), 200);
}

#[test]
fn short_gain_vector_is_rejected() {
    let req = request(&["physics_engine=physx"])
        .with_overrides(vec!["ctrl.joint_space_id.joint_prop_gains=[40, 40, 40, 40, 40, 40]".to_string()]);
    let findings = validation_findings(load_task(&req, &source()).unwrap_err());

    let finding = findings
        .iter()
        .find(|f| f.path == "ctrl.joint_space_id.joint_prop_gains")
        .unwrap();
    assert_eq!(
        finding.kind,
        FindingKind::LengthMismatch {
            expected: 7,
            actual: 6
        }
    );
}

#[test]
fn unknown_controller_type_is_rejected() {
    let req = request(&["physics_engine=physx"]).with_overrides(vec!["ctrl.ctrl_type=not_a_real_type".to_string()]);
    let findings = validation_findings(load_task(&req, &source()).unwrap_err());

    let finding = findings.iter().find(|f| f.path == "ctrl.ctrl_type").unwrap();
    match &finding.kind {
        FindingKind::InvalidEnum { value, allowed } => {
            assert_eq!(value, "not_a_real_type");
            assert!(allowed.iter().any(|a| a == "joint_space_id"));
        }
        other => panic!("expected invalid enum, got {other:?}"),
    }
}

#[test]
fn missing_physics_engine_scope_fails_resolution() {
    let err = load_task(&LoadRequest::new(TASK), &source()).unwrap_err();
    assert!(matches!(err, PipelineError::Resolution(_)), "got {err}");
}

#[test]
fn unknown_task_is_not_found() {
    let err = load_task(&LoadRequest::new("FactoryTaskMissing"), &source()).unwrap_err();
    assert!(matches!(err, PipelineError::Load(_)), "got {err}");
    assert!(err.to_string().contains("FactoryTaskMissing"));
}

#[test]
fn joint_space_controller_settings() {
    let loaded = load_task(&request(&["physics_engine=physx"]), &source()).unwrap();
    let controller = loaded.controller().unwrap();

    assert_eq!(controller.ctrl_type, ControllerType::JointSpaceId);
    assert_eq!(controller.motor_ctrl_mode, MotorCtrlMode::Manual);
    assert_eq!(controller.gain_space, GainSpace::Joint);
    assert_eq!(controller.ik_method, Some(IkMethod::Dls));
    assert!(controller.do_inertial_comp);
    assert_eq!(controller.joint_prop_gains.as_deref(), Some(&[40.0; 7][..]));
    assert_eq!(controller.gripper_prop_gains, vec![100.0, 100.0]);
}

#[test]
fn gym_default_controller_uses_its_own_gripper_gains() {
    let req = request(&["physics_engine=physx"]).with_overrides(vec!["ctrl.ctrl_type=gym_default".to_string()]);
    let loaded = load_task(&req, &source()).unwrap();
    let controller = loaded.controller().unwrap();

    assert_eq!(controller.motor_ctrl_mode, MotorCtrlMode::Gym);
    assert_eq!(controller.gripper_prop_gains, vec![500.0, 500.0]);
}

#[test]
fn task_params_view() {
    let loaded = load_task(&request(&["physics_engine=physx"]), &source()).unwrap();
    let params = loaded.params().unwrap();

    assert_eq!(params.name, TASK);
    assert_eq!(params.env.num_envs, 128);
    assert_eq!(params.env.num_actions, 24);
    assert!(params.env.close_and_lift);
    assert_eq!(params.rl.pos_action_scale, [0.1, 0.1, 0.1]);
    assert_eq!(params.randomize.franka_arm_initial_dof_pos.len(), 7);
    assert_eq!(params.randomize.bolt_pos_xy_noise, [0.1, 0.1]);
}

#[test]
fn resolved_tree_has_no_references_left() {
    fn check(value: &Value) {
        match value {
            Value::Reference(r) => panic!("unresolved reference {r}"),
            Value::Mapping(m) => m.values().for_each(check),
            _ => {}
        }
    }
    let loaded = load_task(&request(&["physics_engine=physx"]), &source()).unwrap();
    loaded.config.tree().values().for_each(check);
}
