use gymcfg_core::init_logging;

mod app;
mod commands;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = app::build_cli();
    let matches = app.get_matches();

    // stdout carries the config; logs stay on stderr and are errors-only unless -v
    let verbose = matches.get_flag("verbose");
    init_logging(!verbose);

    commands::run_command(&matches)?;

    Ok(())
}
