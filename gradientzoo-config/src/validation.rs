//! Non-fatal configuration checks.

use crate::models::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint(
        &mut self,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.items.iter().any(|w| w.message.contains(needle))
    }
}

/// Checks the filesystem side of a composed config. Missing assets do not
/// stop the server: `/static` answers 404 and the shell handler reports the
/// missing file per request.
pub fn apply_guard_rails(config: &Config) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    if !config.static_dir().is_dir() {
        warnings.push_with_hint(
            format!(
                "static asset directory {} does not exist",
                config.static_dir().display()
            ),
            "Build the client bundle or set STATIC_DIR",
        );
    }

    if !config.index_file().is_file() {
        warnings.push_with_hint(
            format!(
                "application shell {} does not exist",
                config.index_file().display()
            ),
            "Set INDEX_FILE to the built index.html",
        );
    }

    warnings
}
