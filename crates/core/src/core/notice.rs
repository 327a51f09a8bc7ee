//! User-facing notifications (toasts in the browser, log lines in the terminal).

use serde::Serialize;

use crate::form::FormError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Danger,
    Info,
}

impl Level {
    /// CSS classes for the toast container.
    pub fn toast_classes(self) -> &'static str {
        match self {
            Level::Danger => "toast bg-danger text-white",
            Level::Success | Level::Info => "toast bg-dark text-light",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub level: Level,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>, level: Level) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level,
        }
    }

    pub fn saved() -> Self {
        Self::new("Success", "Configuration saved successfully!", Level::Success)
    }

    /// The backend answered but refused the request.
    pub fn rejected(error: Option<&str>) -> Self {
        Self::new(
            "Error",
            error.unwrap_or("The server rejected the configuration"),
            Level::Danger,
        )
    }

    pub fn save_failed() -> Self {
        Self::new("Error", "Failed to save configuration", Level::Danger)
    }

    pub fn running() -> Self {
        Self::new("Simulation", "Running simulation...", Level::Info)
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Danger
    }
}

impl From<&FormError> for Notice {
    fn from(err: &FormError) -> Self {
        Notice::new("Error", err.to_string(), Level::Danger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_become_danger_toasts() {
        let n = Notice::from(&FormError::MissingName);
        assert_eq!(n.message, "Please provide a configuration name");
        assert!(n.is_error());
        assert_eq!(n.level.toast_classes(), "toast bg-danger text-white");

        let n = Notice::from(&FormError::TooFewAgents { total: 1 });
        assert_eq!(n.message, "At least 2 agents are required for the simulation");
    }

    #[test]
    fn rejection_prefers_the_backend_message() {
        assert_eq!(Notice::rejected(Some("Name taken")).message, "Name taken");
        assert!(!Notice::rejected(None).message.is_empty());
        assert!(!Notice::saved().is_error());
    }
}
