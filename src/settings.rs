//! Settings of the tool itself, as opposed to the documents it edits.
//!
//! Loaded through [confique](https://docs.rs/confique): environment variables
//! first, then an optional TOML file, then the compiled defaults.

use std::path::Path;

use confique::Config;

use crate::error::DosconfError;
use crate::style::{Newline, Style};

#[derive(Config, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Application name used to locate the platform config directory.
    #[config(env = "DOSCONF_APP_NAME", default = "dosbox")]
    pub app_name: String,

    /// Name of the configuration file looked up in each search directory.
    #[config(env = "DOSCONF_FILE_NAME", default = "dosbox.conf")]
    pub file_name: String,

    /// Pad entry names in new files so the `=` signs line up.
    #[config(default = false)]
    pub pad_names: bool,

    /// Leave a blank line between a section's comments and its entries in
    /// new files.
    #[config(default = false)]
    pub blank_after_comments: bool,

    /// Line endings of new files: "unix" or "windows".
    #[config(default = "unix")]
    pub newline: Newline,
}

impl Settings {
    /// Load from the environment and, when given, a TOML file. A missing
    /// file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Settings, DosconfError> {
        let mut builder = Settings::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    /// A commented TOML file listing every setting with its default.
    pub fn template() -> String {
        confique::toml::template::<Settings>(confique::toml::FormatOptions::default())
    }

    /// Dialect applied to documents created from scratch.
    pub fn style(&self) -> Style {
        let mut style = Style::NONE;
        style.set(Style::PAD_NAMES, self.pad_names);
        style.set(Style::BLANK_AFTER_COMMENTS, self.blank_after_comments);
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let settings = Settings::builder().load().unwrap();
        assert_eq!(settings.file_name, "dosbox.conf");
        assert_eq!(settings.app_name, "dosbox");
        assert_eq!(settings.newline, Newline::Unix);
        assert_eq!(settings.style(), Style::NONE);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dosconf.toml");
        fs::write(
            &path,
            "file_name = \"game.conf\"\npad_names = true\nnewline = \"windows\"\n",
        )
        .unwrap();

        let settings = Settings::builder().file(&path).load().unwrap();
        assert_eq!(settings.file_name, "game.conf");
        assert_eq!(settings.newline, Newline::Windows);
        assert_eq!(settings.style(), Style::PAD_NAMES);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::builder()
            .file(dir.path().join("absent.toml"))
            .load()
            .unwrap();
        assert!(!settings.pad_names);
    }

    #[test]
    fn bad_value_is_settings_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dosconf.toml");
        fs::write(&path, "newline = \"mac\"\n").unwrap();
        assert!(matches!(
            Settings::load(Some(path.as_path())),
            Err(DosconfError::SettingsError(_))
        ));
    }

    #[test]
    fn template_mentions_every_setting() {
        let template = Settings::template();
        for key in [
            "app_name",
            "file_name",
            "pad_names",
            "blank_after_comments",
            "newline",
        ] {
            assert!(template.contains(key), "template is missing {key}");
        }
    }
}
