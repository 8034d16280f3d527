//! Presentation settings mirrored to display screens

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    pub show_progress_bar: bool,
    pub show_seconds: bool,
    pub show_clock: bool,
    pub theme: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_progress_bar: true,
            show_seconds: true,
            show_clock: false,
            theme: "dark".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SoundSettings {
    pub enabled: bool,
    pub warning_sound: bool,
    pub end_sound: bool,
    pub volume: u8,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            warning_sound: true,
            end_sound: true,
            volume: 80,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineSettings {
    pub show_timeline: bool,
    pub current_item: Option<String>,
    pub next_item: Option<String>,
}

/// Everything a display needs to render the clock besides the time itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub display: DisplaySettings,
    pub sound: SoundSettings,
    pub timeline: TimelineSettings,
}

/// Partial settings change; absent sections are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub warning_threshold: Option<i64>,
    pub display: Option<DisplaySettings>,
    pub sound: Option<SoundSettings>,
    pub timeline: Option<TimelineSettings>,
}

impl Settings {
    /// Apply the section replacements of an update
    pub fn merge(&mut self, update: SettingsUpdate) {
        if let Some(display) = update.display {
            self.display = display;
        }
        if let Some(sound) = update.sound {
            self.sound = sound;
        }
        if let Some(timeline) = update.timeline {
            self.timeline = timeline;
        }
    }
}

/// Read-only mirror of a second countdown (e.g. a breakout room clock)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryTimer {
    pub label: String,
    pub time_left: i64,
    pub is_running: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_replaces_only_given_sections() {
        let mut settings = Settings::default();
        settings.merge(SettingsUpdate {
            sound: Some(SoundSettings {
                enabled: true,
                ..SoundSettings::default()
            }),
            ..SettingsUpdate::default()
        });

        assert!(settings.sound.enabled);
        assert_eq!(settings.display, DisplaySettings::default());
        assert_eq!(settings.timeline, TimelineSettings::default());
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let update: SettingsUpdate =
            serde_json::from_str(r#"{"display": {"theme": "light"}}"#).unwrap();
        let display = update.display.unwrap();
        assert_eq!(display.theme, "light");
        assert!(display.show_progress_bar);
        assert!(update.warning_threshold.is_none());
    }
}
