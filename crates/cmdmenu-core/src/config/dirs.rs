use crate::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Application directories following the XDG base directory layout
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/cmdmenu)
    pub config: PathBuf,

    /// Plugin config file path
    pub config_file: PathBuf,

    /// Host source descriptors (collections and globals)
    pub source_file: PathBuf,
}

impl Directories {
    /// Create a new `Directories` instance with standard XDG paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the system's project directories cannot be determined.
    pub fn new() -> Result<Self> {
        let project = ProjectDirs::from("", "", "cmdmenu").ok_or_else(|| {
            Error::Config("Failed to determine project directories".to_string())
        })?;

        Ok(Self::with_base(project.config_dir().to_path_buf()))
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.json"),
            source_file: base.join("source.json"),
            config: base,
        }
    }
}
