//! Optional TOML settings file layered under the command-line flags.

use anyhow::{Context, Result};
use sanctuary_core::EncounterConfig;
use serde::Deserialize;
use std::{fs, path::Path};

/// Contents of a settings file; every section and field is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) encounter: EncounterConfig,
    pub(crate) display: DisplaySettings,
}

/// Window options for interactive runs.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct DisplaySettings {
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
    pub(crate) window_width: i32,
    pub(crate) window_height: i32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            vsync: true,
            show_fps: false,
            window_width: 1280,
            window_height: 720,
        }
    }
}

impl Settings {
    /// Reads and validates the settings file, or returns defaults without one.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid settings file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(contents).context("failed to parse settings toml contents")?;
        settings
            .encounter
            .validate()
            .context("encounter tuning rejected")?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanctuary_core::EncounterVariant;

    #[test]
    fn missing_file_yields_defaults() {
        let settings = Settings::load(None).expect("defaults");
        assert_eq!(settings, Settings::default());
        assert!(settings.display.vsync);
    }

    #[test]
    fn partial_sections_override_only_listed_fields() {
        let settings = Settings::parse(
            r#"
            [encounter]
            variant = "gauntlet"
            survival_goal = 45.0

            [encounter.player]
            speed = 420.0

            [display]
            show_fps = true
            "#,
        )
        .expect("valid settings");

        assert_eq!(settings.encounter.variant, EncounterVariant::Gauntlet);
        assert_eq!(settings.encounter.survival_goal, 45.0);
        assert_eq!(settings.encounter.player.speed, 420.0);
        assert_eq!(settings.encounter.player.radius, 15.0);
        assert!(settings.display.show_fps);
        assert!(settings.display.vsync);
    }

    #[test]
    fn invalid_tuning_is_reported_with_context() {
        let error = Settings::parse(
            r#"
            [encounter.arena]
            width = 0.0
            "#,
        )
        .expect_err("zero width must be rejected");

        assert!(format!("{error:#}").contains("encounter tuning rejected"));
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(Settings::parse("[audio]\nvolume = 3\n").is_err());
    }

    #[test]
    fn unreadable_files_name_the_path() {
        let error = Settings::load(Some(Path::new("/nonexistent/sanctuary.toml")))
            .expect_err("missing file");
        assert!(format!("{error:#}").contains("/nonexistent/sanctuary.toml"));
    }
}
