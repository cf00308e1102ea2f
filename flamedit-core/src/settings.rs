//! Editor session settings
//!
//! Everything the editor persists between sessions. Passed to
//! [`FigureEditor::new`](crate::editor::FigureEditor::new) and read back
//! with [`FigureEditor::settings`](crate::editor::FigureEditor::settings).

use crate::basis::DEFAULT_BASIS;
use crate::selection::SelectionType;
use serde::{Deserialize, Serialize};

/// Point about which interactive rotate/scale edits happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PivotMode {
    /// Origin node of the edited triangle
    #[default]
    Origin,
    /// Centroid of the edited triangle
    Center,
    /// The coordinate mark
    Mark,
    /// Origin of the basis
    BasisOrigin,
}

/// Persistent editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Abstract → scene basis coefficients
    pub basis: [f64; 6],
    pub grid_visible: bool,
    /// Grid colour as `#rrggbb`
    pub grid_color: String,
    /// Background colour as `#rrggbb`
    pub bg_color: String,
    /// Keep the view centred on the transform pivot while scaling
    pub centered_scaling: bool,
    /// Default selection type
    pub selection_type: SelectionType,
    pub pivot_mode: PivotMode,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            basis: DEFAULT_BASIS,
            grid_visible: false,
            grid_color: "#999999".to_string(),
            bg_color: "#000000".to_string(),
            centered_scaling: false,
            selection_type: SelectionType::Triangles,
            pivot_mode: PivotMode::Origin,
        }
    }
}

impl EditorSettings {
    /// Replace unusable values with their defaults
    ///
    /// Colours must be `#rrggbb` and the basis must be invertible.
    pub fn validate(&mut self) {
        let defaults = Self::default();
        if !is_hex_color(&self.grid_color) {
            log::warn!("Invalid grid colour {:?}, using {}", self.grid_color, defaults.grid_color);
            self.grid_color = defaults.grid_color;
        }
        if !is_hex_color(&self.bg_color) {
            log::warn!("Invalid background colour {:?}, using {}", self.bg_color, defaults.bg_color);
            self.bg_color = defaults.bg_color;
        }
        let [a, b, c, d, _, _] = self.basis;
        let det = a * d - b * c;
        if !det.is_finite() || det == 0.0 || self.basis.iter().any(|v| !v.is_finite()) {
            log::warn!("Degenerate basis {:?}, using the default", self.basis);
            self.basis = defaults.basis;
        }
    }
}

/// Whether a string is a `#rrggbb` colour
pub fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: EditorSettings =
            serde_json::from_str(r#"{ "grid_visible": true }"#).unwrap();
        assert!(settings.grid_visible);
        assert_eq!(settings.basis, DEFAULT_BASIS);
        assert_eq!(settings.grid_color, "#999999");
    }

    #[test]
    fn test_round_trip() {
        let settings = EditorSettings {
            selection_type: SelectionType::Nodes,
            pivot_mode: PivotMode::Mark,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: EditorSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#99aaFF"));
        assert!(!is_hex_color("999999"));
        assert!(!is_hex_color("#99aaFG"));
    }

    #[test]
    fn test_validate_replaces_bad_values() {
        let mut settings = EditorSettings {
            grid_color: "grey".to_string(),
            bg_color: "#102030".to_string(),
            basis: [1.0, 2.0, 2.0, 4.0, 0.0, 0.0],
            grid_visible: true,
            ..Default::default()
        };
        settings.validate();
        assert_eq!(settings.grid_color, "#999999");
        assert_eq!(settings.bg_color, "#102030");
        assert_eq!(settings.basis, DEFAULT_BASIS);
        assert!(settings.grid_visible);

        let mut good = EditorSettings::default();
        good.validate();
        assert_eq!(good, EditorSettings::default());
    }
}
