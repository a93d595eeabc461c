//! Editor settings: theme, grid, machine mode and drag damping.

use crate::shapes::MAX_DEPTH_MM;
use serde::{Deserialize, Serialize};

/// Default drag damping factor.
pub const DEFAULT_DRAG_SENSITIVITY: f64 = 0.35;
/// Allowed drag damping range.
pub const DRAG_SENSITIVITY_RANGE: (f64, f64) = (0.05, 1.0);

/// Theme preference as chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow the host's color-scheme preference.
    #[default]
    System,
    Dark,
    Light,
}

/// Theme after resolving `System`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedTheme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn resolve(self, system_prefers_dark: bool) -> ResolvedTheme {
        match self {
            Theme::Dark => ResolvedTheme::Dark,
            Theme::Light => ResolvedTheme::Light,
            Theme::System if system_prefers_dark => ResolvedTheme::Dark,
            Theme::System => ResolvedTheme::Light,
        }
    }
}

/// Which machine the layout targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    #[default]
    Laser,
    /// Renders depth as opacity.
    Cnc,
}

/// Grid visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridVisibility {
    #[default]
    On,
    Off,
}

/// Physical stock dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkArea {
    pub w: f64,
    pub h: f64,
    /// Material thickness.
    pub t: f64,
}

impl Default for WorkArea {
    fn default() -> Self {
        Self {
            w: 300.0,
            h: 200.0,
            t: MAX_DEPTH_MM,
        }
    }
}

/// User-facing editor settings, persisted with the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    pub grid: GridVisibility,
    pub mode: EditorMode,
    pub drag_sensitivity: f64,
    /// Host snapping preference. Persisted with the project; the core does
    /// not snap.
    pub snap: bool,
    /// Stock size, persisted for the host and shown by `kerf info`.
    pub work_area: WorkArea,
    /// Host color-scheme preference; not persisted.
    #[serde(skip)]
    pub system_prefers_dark: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            grid: GridVisibility::On,
            mode: EditorMode::Laser,
            drag_sensitivity: DEFAULT_DRAG_SENSITIVITY,
            snap: true,
            work_area: WorkArea::default(),
            system_prefers_dark: true,
        }
    }
}

impl Settings {
    pub fn resolved_theme(&self) -> ResolvedTheme {
        self.theme.resolve(self.system_prefers_dark)
    }

    pub fn grid_visible(&self) -> bool {
        self.grid == GridVisibility::On
    }

    pub fn toggle_grid(&mut self) {
        self.grid = match self.grid {
            GridVisibility::On => GridVisibility::Off,
            GridVisibility::Off => GridVisibility::On,
        };
    }

    /// Set the drag damping factor, clamped to the allowed range.
    pub fn set_drag_sensitivity(&mut self, value: f64) {
        let (min, max) = DRAG_SENSITIVITY_RANGE;
        self.drag_sensitivity = if value.is_finite() {
            value.clamp(min, max)
        } else {
            DEFAULT_DRAG_SENSITIVITY
        };
    }

    /// Paint opacity for an object at `depth_mm`, or 1.0 outside CNC mode.
    pub fn object_opacity(&self, depth_mm: f64) -> f64 {
        match self.mode {
            EditorMode::Cnc => depth_opacity(depth_mm),
            EditorMode::Laser => 1.0,
        }
    }
}

/// CNC depth-to-opacity rule: 0 mm maps to 15%, full thickness to 100%.
pub fn depth_opacity(depth_mm: f64) -> f64 {
    let depth = depth_mm.clamp(0.0, MAX_DEPTH_MM);
    0.15 + 0.85 * depth / MAX_DEPTH_MM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_resolution() {
        assert_eq!(Theme::System.resolve(true), ResolvedTheme::Dark);
        assert_eq!(Theme::System.resolve(false), ResolvedTheme::Light);
        assert_eq!(Theme::Light.resolve(true), ResolvedTheme::Light);
        assert_eq!(Theme::Dark.resolve(false), ResolvedTheme::Dark);
    }

    #[test]
    fn test_depth_opacity() {
        assert!((depth_opacity(0.0) - 0.15).abs() < 1e-9);
        assert!((depth_opacity(20.0) - 1.0).abs() < 1e-9);
        assert!((depth_opacity(10.0) - 0.575).abs() < 1e-9);
        assert!((depth_opacity(-3.0) - 0.15).abs() < 1e-9);
        assert!((depth_opacity(99.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_laser_mode_is_opaque() {
        let mut settings = Settings::default();
        assert!((settings.object_opacity(0.0) - 1.0).abs() < f64::EPSILON);
        settings.mode = EditorMode::Cnc;
        assert!((settings.object_opacity(0.0) - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_drag_sensitivity_clamped() {
        let mut settings = Settings::default();
        settings.set_drag_sensitivity(5.0);
        assert!((settings.drag_sensitivity - 1.0).abs() < f64::EPSILON);
        settings.set_drag_sensitivity(0.0);
        assert!((settings.drag_sensitivity - 0.05).abs() < f64::EPSILON);
        settings.set_drag_sensitivity(f64::NAN);
        assert!((settings.drag_sensitivity - DEFAULT_DRAG_SENSITIVITY).abs() < f64::EPSILON);
    }

    #[test]
    fn test_settings_json_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme":"light","mode":"cnc"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.mode, EditorMode::Cnc);
        assert!(settings.grid_visible());
        assert!((settings.drag_sensitivity - 0.35).abs() < f64::EPSILON);
        assert!(settings.snap);
        assert_eq!(settings.work_area, WorkArea::default());
    }

    #[test]
    fn test_host_settings_round_trip() {
        let json = r#"{"snap":false,"workArea":{"w":600.0,"h":400.0,"t":6.0}}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert!(!settings.snap);
        assert_eq!(settings.work_area, WorkArea { w: 600.0, h: 400.0, t: 6.0 });

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["snap"], false);
        assert_eq!(value["workArea"]["t"], 6.0);
        assert!(value.get("systemPrefersDark").is_none());
    }
}
