/// Searched when no `[search] paths` is configured, relative to the
/// working directory.
pub const DEFAULT_SEARCH_PATH: &str = "configs/task";

/// Directory holding `config.toml`, under the home and project directories.
pub const SETTINGS_DIR: &str = ".gymcfg";

pub const SETTINGS_FILE: &str = "config.toml";
