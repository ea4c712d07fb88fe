use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{DEFAULT_MAX_EXPORT_SCALE, MAX_EXPORT_SCALE_RANGE};
use crate::i18n::{Language, Locale, Text, tr};
use crate::model::{EndpointStyle, LengthUnit};
use crate::ui::Notify;

/// System set for settings loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

fn default_max_export_scale() -> f32 {
    DEFAULT_MAX_EXPORT_SCALE
}

fn default_true() -> bool {
    true
}

/// User settings persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsData {
    /// Glyph drawn at both ends of every line
    #[serde(default)]
    pub endpoint_style: EndpointStyle,

    #[serde(default)]
    pub language: Language,

    /// Upper bound for the export scale factor
    #[serde(default = "default_max_export_scale")]
    pub max_export_scale: f32,

    /// Unit given to newly added lines
    #[serde(default)]
    pub default_unit: LengthUnit,

    /// Show `(#n)` list numbers in on-screen labels
    #[serde(default = "default_true")]
    pub show_ids: bool,

    /// Font file for exported labels, discovered automatically when unset
    #[serde(default)]
    pub label_font: Option<PathBuf>,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            endpoint_style: EndpointStyle::default(),
            language: Language::default(),
            max_export_scale: DEFAULT_MAX_EXPORT_SCALE,
            default_unit: LengthUnit::default(),
            show_ids: true,
            label_font: None,
        }
    }
}

impl SettingsData {
    /// Bring hand-edited values back into their valid ranges
    pub fn sanitized(mut self) -> Self {
        let (min, max) = MAX_EXPORT_SCALE_RANGE;
        self.max_export_scale = if self.max_export_scale.is_finite() {
            self.max_export_scale.clamp(min, max)
        } else {
            DEFAULT_MAX_EXPORT_SCALE
        };
        self
    }
}

/// Runtime settings resource
#[derive(Resource)]
pub struct AppSettings {
    /// The persisted settings data
    pub data: SettingsData,
    /// Path to the settings file
    pub settings_path: PathBuf,
    /// Whether settings need to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data: SettingsData::default(),
            settings_path: crate::paths::settings_file(),
            dirty: false,
        }
    }
}

impl AppSettings {
    /// Language strings are shown in right now
    pub fn locale(&self) -> Locale {
        self.data.language.resolve()
    }
}

/// Resource to notify user when settings were reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger settings save
#[derive(Message)]
pub struct SaveSettingsRequest;

/// Message to replace all settings at once (from the settings dialog)
#[derive(Message)]
pub struct UpdateSettingsRequest {
    pub data: SettingsData,
}

/// Result of loading settings from disk
struct LoadSettingsResult {
    data: SettingsData,
    /// Error message if settings were reset to defaults due to an error
    reset_reason: Option<String>,
}

/// Parse settings JSON, falling back to defaults with a reason on failure
fn parse_settings(json: &str) -> LoadSettingsResult {
    match serde_json::from_str::<SettingsData>(json) {
        Ok(data) => LoadSettingsResult {
            data: data.sanitized(),
            reset_reason: None,
        },
        Err(e) => {
            warn!("Failed to parse settings file: {}", e);
            LoadSettingsResult {
                data: SettingsData::default(),
                reset_reason: Some(format!("Settings file was corrupted: {}", e)),
            }
        }
    }
}

/// Load settings from disk
fn load_settings(path: &std::path::Path) -> LoadSettingsResult {
    if !path.exists() {
        info!("No settings file found, using defaults");
        return LoadSettingsResult {
            data: SettingsData::default(),
            reset_reason: None,
        };
    }

    match std::fs::read_to_string(path) {
        Ok(json) => {
            let result = parse_settings(&json);
            if result.reset_reason.is_none() {
                info!("Loaded settings from {:?}", path);
            }
            result
        }
        Err(e) => {
            warn!("Failed to read settings file: {}", e);
            LoadSettingsResult {
                data: SettingsData::default(),
                reset_reason: Some(format!("Could not read settings file: {}", e)),
            }
        }
    }
}

/// Settings persistence errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Save settings to disk
fn save_settings(settings: &AppSettings) -> Result<(), SettingsError> {
    let json = serde_json::to_string_pretty(&settings.data)?;
    std::fs::write(&settings.settings_path, json).map_err(|source| SettingsError::Write {
        path: settings.settings_path.clone(),
        source,
    })?;
    info!("Settings saved to {:?}", settings.settings_path);
    Ok(())
}

/// Startup system to load settings from disk into the existing resource
fn load_settings_system(
    mut settings: ResMut<AppSettings>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let result = load_settings(&settings.settings_path);
    settings.data = result.data;
    settings.dirty = false;

    // Set notification if settings were reset due to an error
    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save settings when requested
fn save_settings_system(
    mut events: MessageReader<SaveSettingsRequest>,
    mut settings: ResMut<AppSettings>,
    mut notify: MessageWriter<Notify>,
) {
    for _ in events.read() {
        if !settings.dirty {
            continue;
        }
        match save_settings(&settings) {
            Ok(()) => settings.dirty = false,
            Err(e) => {
                error!("{}", e);
                notify.write(Notify::error(format!(
                    "{}: {}",
                    tr(settings.locale(), Text::SettingsSaveFailed),
                    e
                )));
            }
        }
    }
}

/// System to apply settings edited in the settings dialog
fn update_settings_system(
    mut events: MessageReader<UpdateSettingsRequest>,
    mut settings: ResMut<AppSettings>,
    mut save_events: MessageWriter<SaveSettingsRequest>,
) {
    for event in events.read() {
        let data = event.data.clone().sanitized();
        if data == settings.data {
            continue;
        }
        debug!("Settings changed: {:?}", data);
        settings.data = data;
        settings.dirty = true;
        save_events.write(SaveSettingsRequest);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppSettings>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveSettingsRequest>()
            .add_message::<UpdateSettingsRequest>()
            .add_systems(Startup, load_settings_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                (
                    update_settings_system.run_if(on_message::<UpdateSettingsRequest>),
                    save_settings_system.run_if(on_message::<SaveSettingsRequest>),
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_data_default() {
        let data = SettingsData::default();
        assert_eq!(data.endpoint_style, EndpointStyle::Arrow);
        assert_eq!(data.language, Language::Auto);
        assert_eq!(data.max_export_scale, 2.0);
        assert_eq!(data.default_unit, LengthUnit::Centimeter);
        assert!(data.show_ids);
        assert!(data.label_font.is_none());
    }

    #[test]
    fn test_settings_data_serialization() {
        let data = SettingsData {
            endpoint_style: EndpointStyle::Dot,
            language: Language::Chinese,
            max_export_scale: 3.0,
            default_unit: LengthUnit::Millimeter,
            show_ids: false,
            label_font: Some(PathBuf::from("/fonts/label.ttf")),
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: SettingsData = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, data);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let result = parse_settings(r#"{ "endpoint_style": "t_shape" }"#);
        assert!(result.reset_reason.is_none());
        assert_eq!(result.data.endpoint_style, EndpointStyle::TShape);
        assert_eq!(result.data.max_export_scale, 2.0);
        assert!(result.data.show_ids);
    }

    #[test]
    fn test_corrupt_settings_reset_with_reason() {
        let result = parse_settings("{ not json");
        assert!(result.reset_reason.is_some());
        assert_eq!(result.data, SettingsData::default());
    }

    #[test]
    fn test_export_scale_is_clamped() {
        let result = parse_settings(r#"{ "max_export_scale": 9.0 }"#);
        assert_eq!(result.data.max_export_scale, 4.0);
        let result = parse_settings(r#"{ "max_export_scale": 0.1 }"#);
        assert_eq!(result.data.max_export_scale, 1.0);
    }

    #[test]
    fn test_save_reports_unwritable_path() {
        let settings = AppSettings {
            data: SettingsData::default(),
            settings_path: std::env::temp_dir()
                .join("dimensioncam_no_such_dir")
                .join("nested")
                .join("settings.json"),
            dirty: true,
        };
        let err = save_settings(&settings).unwrap_err();
        assert!(matches!(err, SettingsError::Write { .. }));
    }

    #[test]
    fn test_save_writes_readable_settings() {
        let path = std::env::temp_dir().join(format!("dimensioncam_settings_{}.json", std::process::id()));
        let settings = AppSettings {
            data: SettingsData {
                show_ids: false,
                ..SettingsData::default()
            },
            settings_path: path.clone(),
            dirty: true,
        };
        save_settings(&settings).unwrap();
        let loaded = load_settings(&path);
        assert!(loaded.reset_reason.is_none());
        assert_eq!(loaded.data, settings.data);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_config_reset_notification_default() {
        let notification = ConfigResetNotification::default();
        assert!(!notification.show);
        assert!(notification.reason.is_none());
    }
}
