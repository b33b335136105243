//! Settings hierarchy.
//!
//! Later sources override earlier ones:
//! 1. Hardcoded defaults
//! 2. User settings, `~/.gymcfg/config.toml`
//! 3. Project settings, `./.gymcfg/config.toml`
//! 4. CLI flags (applied by the caller)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::SettingsError;
use crate::settings::defaults::{SETTINGS_DIR, SETTINGS_FILE};
use crate::settings::types::{GymcfgSettings, RobotSettings, SearchSettings, ValidationSettings};

/// Load user then project settings. Missing files are skipped.
pub fn load_hierarchy() -> Result<GymcfgSettings, SettingsError> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(SETTINGS_DIR).join(SETTINGS_FILE));
    }
    paths.push(std::env::current_dir()?.join(SETTINGS_DIR).join(SETTINGS_FILE));
    load_from_paths(&paths)
}

/// Merge settings files in order. Missing files are skipped, unreadable or
/// malformed files fail.
pub fn load_from_paths(paths: &[PathBuf]) -> Result<GymcfgSettings, SettingsError> {
    let mut settings = GymcfgSettings::default();
    for path in paths {
        match load_settings_file(path) {
            Ok(layer) => {
                debug!(event = "core.settings.file_loaded", path = %path.display());
                settings = merge_settings(settings, layer);
            }
            Err(SettingsError::IoError { source }) if source.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    validate_settings(&settings)?;
    info!(
        event = "core.settings.load_completed",
        search_paths = settings.search_paths().len(),
        arm_dofs = settings.robot_model().arm_dofs,
    );
    Ok(settings)
}

fn load_settings_file(path: &Path) -> Result<GymcfgSettings, SettingsError> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| SettingsError::ParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Merge two settings layers; fields set in `over` win.
pub fn merge_settings(base: GymcfgSettings, over: GymcfgSettings) -> GymcfgSettings {
    GymcfgSettings {
        search: SearchSettings {
            paths: over.search.paths.or(base.search.paths),
        },
        robot: RobotSettings {
            arm_dofs: over.robot.arm_dofs.or(base.robot.arm_dofs),
            gripper_dofs: over.robot.gripper_dofs.or(base.robot.gripper_dofs),
        },
        validation: ValidationSettings {
            warnings_as_errors: over
                .validation
                .warnings_as_errors
                .or(base.validation.warnings_as_errors),
        },
    }
}

fn validate_settings(settings: &GymcfgSettings) -> Result<(), SettingsError> {
    let robot = settings.robot_model();
    if robot.arm_dofs == 0 {
        return Err(SettingsError::InvalidSettings {
            message: "robot.arm_dofs must be at least 1".to_string(),
        });
    }
    if robot.gripper_dofs == 0 {
        return Err(SettingsError::InvalidSettings {
            message: "robot.gripper_dofs must be at least 1".to_string(),
        });
    }
    if settings.search.paths.as_ref().is_some_and(Vec::is_empty) {
        return Err(SettingsError::InvalidSettings {
            message: "search.paths must name at least one directory".to_string(),
        });
    }
    Ok(())
}
