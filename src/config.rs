use std::path::PathBuf;

pub const DATA_ENV_VAR: &str = "RIZE_ALIGN_DATA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    File(PathBuf),
    /// The roster compiled into the binary.
    Bundled,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: RosterSource,
}

impl Config {
    /// `--data` wins, then `RIZE_ALIGN_DATA`, then the bundled roster.
    pub fn resolve(data_flag: Option<PathBuf>) -> Self {
        Self::resolve_with(data_flag, std::env::var_os(DATA_ENV_VAR).map(PathBuf::from))
    }

    fn resolve_with(data_flag: Option<PathBuf>, env_path: Option<PathBuf>) -> Self {
        let source = match data_flag.or(env_path.filter(|p| !p.as_os_str().is_empty())) {
            Some(path) => RosterSource::File(path),
            None => RosterSource::Bundled,
        };
        Self { source }
    }
}
