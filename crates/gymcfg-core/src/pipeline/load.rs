use tracing::{debug, error, info, warn};

use crate::document::Mapping;
use crate::pipeline::compose::{Layer, compose};
use crate::pipeline::errors::PipelineError;
use crate::pipeline::overrides::overrides_document;
use crate::pipeline::source::DocumentSource;
use crate::resolve::{AccessError, DEFAULT_MOUNT, ResolvedConfig, Resolver};
use crate::schema::{RobotModel, SchemaRegistry, builtin_registry};
use crate::settings::GymcfgSettings;
use crate::task::{ControllerSettings, TaskParams};
use crate::validate::{ValidationError, ValidationReport, validate};

/// Name given to the command-line override layer.
pub const OVERRIDES_LAYER: &str = "overrides";

/// Everything needed to turn a task name into a validated config.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub task: String,
    /// `key.path=value` assignments applied as the final layer.
    pub overrides: Vec<String>,
    /// Launcher-level values that relative references may climb into.
    pub scope: Mapping,
    pub mount: String,
    pub robot: RobotModel,
    pub warnings_as_errors: bool,
}

impl LoadRequest {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            overrides: Vec::new(),
            scope: Mapping::new(),
            mount: DEFAULT_MOUNT.to_string(),
            robot: RobotModel::franka(),
            warnings_as_errors: false,
        }
    }

    /// Take robot dimensions and strictness from tool settings.
    pub fn from_settings(task: impl Into<String>, settings: &GymcfgSettings) -> Self {
        Self::new(task)
            .with_robot(settings.robot_model())
            .with_warnings_as_errors(settings.warnings_as_errors())
    }

    pub fn with_overrides(mut self, overrides: Vec<String>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_scope(mut self, scope: Mapping) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_robot(mut self, robot: RobotModel) -> Self {
        self.robot = robot;
        self
    }

    pub fn with_warnings_as_errors(mut self, strict: bool) -> Self {
        self.warnings_as_errors = strict;
        self
    }
}

/// A validated task config together with how it was produced.
#[derive(Debug, Clone)]
pub struct LoadedTask {
    pub config: ResolvedConfig,
    /// Non-fatal findings; empty when the config is clean.
    pub report: ValidationReport,
    /// Layer names in merge order.
    pub layers: Vec<String>,
}

impl LoadedTask {
    pub fn controller(&self) -> Result<ControllerSettings, AccessError> {
        ControllerSettings::from_config(&self.config)
    }

    pub fn params(&self) -> Result<TaskParams, AccessError> {
        TaskParams::from_config(&self.config)
    }
}

/// Compose, resolve and fill defaults, without validating.
pub fn resolve_task(
    request: &LoadRequest,
    source: &dyn DocumentSource,
) -> Result<(ResolvedConfig, Vec<String>), PipelineError> {
    resolve_with(request, source, builtin_registry()?)
}

fn resolve_with(
    request: &LoadRequest,
    source: &dyn DocumentSource,
    registry: &SchemaRegistry,
) -> Result<(ResolvedConfig, Vec<String>), PipelineError> {
    let mut layers = compose(&request.task, source)?;
    if !request.overrides.is_empty() {
        layers.push(Layer {
            name: OVERRIDES_LAYER.to_string(),
            document: overrides_document(&request.overrides)?,
        });
    }
    let names: Vec<String> = layers.iter().map(|l| l.name.clone()).collect();
    debug!(
        event = "core.pipeline.compose_completed",
        task = %request.task,
        layers = %names.join(", "),
    );

    let resolved = Resolver::new()
        .with_scope(request.scope.clone())
        .with_mount(request.mount.as_str())
        .resolve_layers(layers.iter().map(|l| &l.document))?;
    Ok((registry.apply_defaults(&resolved), names))
}

/// Load a task: compose → resolve → apply defaults → validate.
///
/// No partial config is ever returned. Warnings are logged and kept in the
/// returned report, or turned into a failure when the request is strict.
pub fn load_task(request: &LoadRequest, source: &dyn DocumentSource) -> Result<LoadedTask, PipelineError> {
    load_task_with(request, source, builtin_registry()?)
}

/// [`load_task`] against a caller-supplied registry.
pub fn load_task_with(
    request: &LoadRequest,
    source: &dyn DocumentSource,
    registry: &SchemaRegistry,
) -> Result<LoadedTask, PipelineError> {
    info!(event = "core.pipeline.load_started", task = %request.task);

    let result = run(request, source, registry);
    match &result {
        Ok(loaded) => info!(
            event = "core.pipeline.load_completed",
            task = %request.task,
            layers = loaded.layers.len(),
            warnings = loaded.report.warnings().count(),
        ),
        Err(e) => error!(
            event = "core.pipeline.load_failed",
            task = %request.task,
            error = %e,
        ),
    }
    result
}

fn run(
    request: &LoadRequest,
    source: &dyn DocumentSource,
    registry: &SchemaRegistry,
) -> Result<LoadedTask, PipelineError> {
    let (config, layers) = resolve_with(request, source, registry)?;
    let report = validate(&config, registry, &request.robot)?;

    for finding in report.warnings() {
        warn!(
            event = "core.pipeline.validation_warning",
            task = %request.task,
            path = %finding.path,
            finding = %finding,
        );
    }
    if request.warnings_as_errors && !report.is_clean() {
        return Err(ValidationError::Failed { report }.into());
    }

    Ok(LoadedTask {
        config,
        report,
        layers,
    })
}
