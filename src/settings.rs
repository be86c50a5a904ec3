//! User settings stored as settings.json in the app data directory

use crate::constants::DEFAULT_SERVER_URL;
use crate::types::Screen;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Wallet server
    pub server_url: String,
    pub session_id: Option<String>,

    // Onboarding
    pub consensus_builder: bool,
    pub start_screen: Screen,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            server_url: DEFAULT_SERVER_URL.to_string(),
            session_id: None,
            consensus_builder: true,
            start_screen: Screen::Bootstrapper,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    /// Screen shown after `form` is submitted from the current page.
    pub fn screen_after(&self, form: &str, current: Option<Screen>) -> Screen {
        use crate::constants::*;

        let last_page = match current {
            Some(Screen::Wallet { last_page }) => last_page,
            _ => true,
        };
        match form {
            FORM_REFRESH_BOOTSTRAPPER if self.consensus_builder => Screen::ConsensusBuilder,
            _ => Screen::Wallet { last_page },
        }
    }
}
