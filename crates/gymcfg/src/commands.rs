use std::path::PathBuf;

use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, info, warn};

use gymcfg_core::GymcfgSettings;
use gymcfg_core::events;
use gymcfg_core::pipeline::{
    DirectorySource, LoadRequest, assignments_mapping, load_task, resolve_task,
};
use gymcfg_core::schema::builtin_registry;
use gymcfg_core::settings;

/// Load settings, falling back to defaults with a warning if they are broken.
fn load_settings_with_warning() -> GymcfgSettings {
    match settings::load_hierarchy() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!(
                "Warning: Could not load settings: {}. Using defaults.\n\
                 Tip: Check ~/.gymcfg/config.toml and ./.gymcfg/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.settings.load_failed",
                error = %e,
                "Settings load failed, using defaults"
            );
            GymcfgSettings::default()
        }
    }
}

/// Search directories: `--config-dir` flags win over settings.
fn document_source(matches: &ArgMatches, settings: &GymcfgSettings) -> DirectorySource {
    let dirs: Vec<PathBuf> = matches
        .get_many::<String>("config-dir")
        .map(|dirs| dirs.map(PathBuf::from).collect())
        .unwrap_or_else(|| settings.search_paths());
    DirectorySource::new(dirs)
}

fn strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn build_request(
    matches: &ArgMatches,
    settings: &GymcfgSettings,
) -> Result<LoadRequest, Box<dyn std::error::Error>> {
    let task = matches
        .get_one::<String>("task")
        .ok_or("Task name is required")?;
    let scope = assignments_mapping(&strings(matches, "scope"))?;
    Ok(LoadRequest::from_settings(task.as_str(), settings)
        .with_overrides(strings(matches, "set"))
        .with_scope(scope))
}

fn render<T: Serialize>(value: &T, format: &str) -> Result<String, Box<dyn std::error::Error>> {
    match format {
        "json" => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
        _ => Ok(serde_yaml::to_string(value)?),
    }
}

fn output_format(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("yaml")
}

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("resolve", sub_matches)) => handle_resolve_command(sub_matches),
        Some(("validate", sub_matches)) => handle_validate_command(sub_matches),
        Some(("controller", sub_matches)) => handle_controller_command(sub_matches),
        Some(("schema", sub_matches)) => handle_schema_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

fn handle_resolve_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings_with_warning();
    let request = build_request(matches, &settings)?;
    let source = document_source(matches, &settings);
    let skip_validation = matches.get_flag("no-validate");

    info!(
        event = "cli.resolve_started",
        task = %request.task,
        overrides = request.overrides.len(),
        skip_validation = skip_validation
    );

    let result = if skip_validation {
        resolve_task(&request, &source).map(|(config, _)| config)
    } else {
        load_task(&request, &source).map(|loaded| {
            for finding in loaded.report.warnings() {
                eprintln!("Warning: {}", finding);
            }
            loaded.config
        })
    };

    match result {
        Ok(config) => {
            print!("{}", render(&config, output_format(matches))?);
            info!(event = "cli.resolve_completed", task = %request.task);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to resolve '{}': {}", request.task, e);
            error!(event = "cli.resolve_failed", task = %request.task, error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn handle_validate_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings_with_warning();
    let mut request = build_request(matches, &settings)?;
    if matches.get_flag("strict") {
        request = request.with_warnings_as_errors(true);
    }
    let source = document_source(matches, &settings);
    let json_output = matches.get_flag("json");

    info!(
        event = "cli.validate_started",
        task = %request.task,
        strict = request.warnings_as_errors
    );

    match load_task(&request, &source) {
        Ok(loaded) => {
            if json_output {
                #[derive(Serialize)]
                struct ValidateOutput<'a> {
                    task: &'a str,
                    valid: bool,
                    layers: &'a [String],
                    findings: &'a [gymcfg_core::Finding],
                }
                let output = ValidateOutput {
                    task: &request.task,
                    valid: true,
                    layers: &loaded.layers,
                    findings: &loaded.report.findings,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!(
                    "✅ Task '{}' is valid ({} layer(s), {} warning(s))",
                    request.task,
                    loaded.layers.len(),
                    loaded.report.warnings().count()
                );
                print!("{}", loaded.report);
            }
            info!(event = "cli.validate_completed", task = %request.task);
            Ok(())
        }
        Err(e) => {
            if let gymcfg_core::PipelineError::Validation(validation) = &e {
                if json_output {
                    let output = serde_json::json!({
                        "task": request.task,
                        "valid": false,
                        "findings": validation.report().findings,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                } else {
                    eprint!("{}", validation.report());
                }
            }
            eprintln!("❌ Failed to validate '{}': {}", request.task, e);
            error!(event = "cli.validate_failed", task = %request.task, error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn handle_controller_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings_with_warning();
    let request = build_request(matches, &settings)?;
    let source = document_source(matches, &settings);

    info!(event = "cli.controller_started", task = %request.task);

    let loaded = load_task(&request, &source).inspect_err(|e| {
        eprintln!("❌ Failed to load '{}': {}", request.task, e);
        error!(event = "cli.controller_failed", task = %request.task, error = %e);
    })?;
    let controller = loaded.controller().inspect_err(|e| {
        eprintln!("❌ Failed to derive controller settings: {}", e);
        error!(event = "cli.controller_failed", task = %request.task, error = %e);
    })?;

    print!("{}", render(&controller, output_format(matches))?);
    info!(
        event = "cli.controller_completed",
        task = %request.task,
        ctrl_type = %controller.ctrl_type
    );
    Ok(())
}

fn handle_schema_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let registry = builtin_registry()?;
    let format = output_format(matches);

    match matches.get_one::<String>("section") {
        Some(name) => match registry.lookup(name) {
            Ok(section) => print!("{}", render(section, format)?),
            Err(e) => {
                eprintln!("❌ {}", e);
                error!(event = "cli.schema_failed", section = %name, error = %e);
                return Err(e.into());
            }
        },
        None => print!("{}", render(&registry.sections(), format)?),
    }

    info!(event = "cli.schema_completed");
    Ok(())
}
