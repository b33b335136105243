use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("gymcfg")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve and validate layered task configurations")
        .long_about("gymcfg composes a task from its defaults list, applies command-line overrides, substitutes ${...} references against the launcher scope and validates the result against the built-in schema before anything consumes it.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .short('C')
                .help("Directory to search for task documents (repeatable, overrides settings)")
                .action(ArgAction::Append)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            task_args(Command::new("resolve").about("Print the fully resolved task config"))
                .arg(format_arg())
                .arg(
                    Arg::new("no-validate")
                        .long("no-validate")
                        .help("Print the resolved config even if it would fail validation")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            task_args(Command::new("validate").about("Validate a task and report every finding"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output the report in JSON format")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Treat warnings as errors (overrides settings)")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            task_args(
                Command::new("controller")
                    .about("Show the controller settings derived from the ctrl section"),
            )
            .arg(format_arg()),
        )
        .subcommand(
            Command::new("schema")
                .about("Show the built-in schema")
                .arg(
                    Arg::new("section")
                        .help("Only show this top-level section")
                        .index(1),
                )
                .arg(format_arg()),
        )
}

/// Arguments shared by every command that loads a task.
fn task_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("task")
                .help("Task document name, e.g. FactoryTaskNutBoltPick_MARL2")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .short('s')
                .value_name("KEY=VALUE")
                .help("Override a value, e.g. --set env.numActions=24 (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("scope")
                .long("scope")
                .value_name("KEY=VALUE")
                .help("Launcher-level value visible to relative references, e.g. --scope num_envs=64 (repeatable)")
                .action(ArgAction::Append),
        )
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format")
        .value_parser(["yaml", "json"])
        .default_value("yaml")
}
