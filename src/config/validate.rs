// src/config/validate.rs

use crate::config::model::{ConfigFile, ExecConfig, RawConfigFile, TempConfig};
use crate::errors::{HarnessError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = HarnessError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_exec(&raw.exec)?;
        validate_temp(&raw.temp)?;
        Ok(ConfigFile::new_unchecked(raw.exec, raw.temp))
    }
}

fn validate_exec(cfg: &ExecConfig) -> Result<()> {
    if cfg.buffer_size == 0 {
        return Err(HarnessError::Config(
            "[exec].buffer_size must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_temp(cfg: &TempConfig) -> Result<()> {
    if let Some(root) = &cfg.root {
        if !root.is_dir() {
            return Err(HarnessError::Config(format!(
                "[temp].root {:?} is not an existing directory",
                root
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn zero_buffer_is_rejected() {
        let raw = RawConfigFile {
            exec: ExecConfig {
                buffer_size: 0,
                announce: true,
            },
            temp: TempConfig::default(),
        };

        match ConfigFile::try_from(raw) {
            Err(HarnessError::Config(msg)) => assert!(msg.contains("buffer_size")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn missing_temp_root_is_rejected() {
        let raw = RawConfigFile {
            exec: ExecConfig::default(),
            temp: TempConfig {
                root: Some(PathBuf::from("/definitely/not/here")),
            },
        };

        assert!(matches!(
            ConfigFile::try_from(raw),
            Err(HarnessError::Config(_))
        ));
    }
}
