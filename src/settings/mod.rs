//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! using the watcher utilities in `crate::watch`.
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::locomotion::{ConfigError, LocomotionConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsSettings {
    #[serde(default = "GraphicsSettings::default_vsync")]
    pub vsync: bool, // Enable vertical sync to cap FPS to the display refresh rate.
}

impl GraphicsSettings {
    fn default_vsync() -> bool { true }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self { vsync: Self::default_vsync() }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default)]
    pub invert_y: bool, // Invert mouse Y axis
    #[serde(default)]
    pub invert_x: bool, // Invert mouse X axis
    #[serde(default = "ControlsSettings::default_sensitivity")]
    pub mouse_sensitivity: f32, // Degrees of look rotation per mouse count
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers (editable by user)
}

impl ControlsSettings {
    fn default_sensitivity() -> f32 { 0.12 }

    fn default_keybinds() -> HashMap<String, String> {
        [
            ("forward", "W"),
            ("back", "S"),
            ("left", "A"),
            ("right", "D"),
            ("jump", "Space"),
            ("sprint", "LShift"),
            ("crouch", "C"),
            ("pickup", "E"),
            ("pause", "Escape"),
            ("toggle_debug", "F1"),
            ("reload_settings", "F5"),
        ]
        .into_iter()
        .map(|(action, key)| (action.to_string(), key.to_string()))
        .collect()
    }

    /// Resolve the key bound to `action`, falling back to `default` when the
    /// binding is missing or names an unknown key.
    #[must_use]
    pub fn key(&self, action: &str, default: KeyCode) -> KeyCode {
        self.keybinds
            .get(action)
            .and_then(|s| Settings::keycode_from_str(s))
            .unwrap_or(default)
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            invert_y: false,
            invert_x: false,
            mouse_sensitivity: Self::default_sensitivity(),
            keybinds: Self::default_keybinds(),
        }
    }
}

/// First-person camera settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default = "CameraSettings::default_max_pitch_deg")]
    pub max_pitch_deg: f32, // Look up/down limit in degrees.
    #[serde(default = "CameraSettings::default_smooth_time")]
    pub smooth_time: f32, // Seconds for the view to catch up with the mouse (0 = raw).
    #[serde(default = "CameraSettings::default_eye_height")]
    pub eye_height: f32, // Camera offset above the body centre at standing height.
}

impl CameraSettings {
    fn default_max_pitch_deg() -> f32 { 90.0 }
    fn default_smooth_time() -> f32 { 0.05 }
    fn default_eye_height() -> f32 { 0.6 }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            max_pitch_deg: Self::default_max_pitch_deg(),
            smooth_time: Self::default_smooth_time(),
            eye_height: Self::default_eye_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrosshairSettings {
    #[serde(default = "CrosshairSettings::default_show")]
    pub show: bool,
    #[serde(default = "CrosshairSettings::default_size")]
    pub size: f32, // Side of the centre dot in pixels.
    #[serde(default = "CrosshairSettings::default_color")]
    pub color: [f32; 3], // sRGB, 0..1 per channel.
}

impl CrosshairSettings {
    fn default_show() -> bool { true }
    fn default_size() -> f32 { 4.0 }
    fn default_color() -> [f32; 3] { [1.0, 1.0, 1.0] }
}

impl Default for CrosshairSettings {
    fn default() -> Self {
        Self {
            show: Self::default_show(),
            size: Self::default_size(),
            color: Self::default_color(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionSettings {
    #[serde(default = "InteractionSettings::default_pickup_range")]
    pub pickup_range: f32, // How far from the camera an object can be grabbed.
}

impl InteractionSettings {
    fn default_pickup_range() -> f32 { 3.0 }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self { pickup_range: Self::default_pickup_range() }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub graphics: GraphicsSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub movement: LocomotionConfig,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub crosshair: CrosshairSettings,
    #[serde(default)]
    pub interaction: InteractionSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Reject settings the game cannot run with.
    ///
    /// # Errors
    /// Returns the movement section's `ConfigError`, if any.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.movement.validate()
    }

    /// Convert a string key identifier (e.g., from `controls.keybinds`) into a `KeyCode` that
    /// can be used with Bevy's input system.
    ///
    /// # Arguments
    /// * `name` - The string key identifier to convert (e.g., "W", "Space", "F1").
    ///
    /// # Returns
    /// An `Option<KeyCode>` corresponding to the provided string, or `None` if the string
    /// does not match any known key.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
            KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
            KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
            KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
            KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
            KeyCode::KeyZ,
        ];
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
            KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
        ];
        const FUNCTION: [KeyCode; 12] = [
            KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
            KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
        ];

        let s = name.trim().to_ascii_uppercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                return Some(LETTERS[(c as u8 - b'A') as usize]);
            }
            if c.is_ascii_digit() {
                return Some(DIGITS[(c as u8 - b'0') as usize]);
            }
        }

        if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<usize>().ok())
            && (1..=FUNCTION.len()).contains(&n)
        {
            return Some(FUNCTION[n - 1]);
        }

        Some(match s.as_str() {
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "BACKSPACE" => KeyCode::Backspace,

            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,

            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,
            "CAPSLOCK" => KeyCode::CapsLock,

            _ => return None,
        })
    }
}

pub mod loader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_letters_digits_and_named_keys() {
        assert_eq!(Settings::keycode_from_str("w"), Some(KeyCode::KeyW));
        assert_eq!(Settings::keycode_from_str("7"), Some(KeyCode::Digit7));
        assert_eq!(Settings::keycode_from_str("F1"), Some(KeyCode::F1));
        assert_eq!(Settings::keycode_from_str("f12"), Some(KeyCode::F12));
        assert_eq!(Settings::keycode_from_str("LShift"), Some(KeyCode::ShiftLeft));
        assert_eq!(Settings::keycode_from_str("space"), Some(KeyCode::Space));
    }

    #[test]
    fn unknown_keys_are_none() {
        assert_eq!(Settings::keycode_from_str("F13"), None);
        assert_eq!(Settings::keycode_from_str("Hyper"), None);
        assert_eq!(Settings::keycode_from_str(""), None);
    }

    #[test]
    fn default_keybinds_cover_every_action() {
        let controls = ControlsSettings::default();
        for action in ["forward", "back", "left", "right", "jump", "sprint", "crouch", "pickup", "pause"] {
            let key = controls.keybinds.get(action).expect(action);
            assert!(Settings::keycode_from_str(key).is_some(), "{action} -> {key}");
        }
    }

    #[test]
    fn missing_binding_falls_back() {
        let controls = ControlsSettings { keybinds: HashMap::new(), ..Default::default() };
        assert_eq!(controls.key("jump", KeyCode::Space), KeyCode::Space);
    }

    #[test]
    fn sections_default_when_absent() {
        let s: Settings = ron::from_str("(movement: (walk_speed: 6.0))").unwrap();
        assert_eq!(s.movement.walk_speed, 6.0);
        assert_eq!(s.camera.max_pitch_deg, 90.0);
        assert!(s.crosshair.show);
        assert_eq!(s.controls.keybinds.get("crouch").map(String::as_str), Some("C"));
        assert_eq!(s.validate(), Ok(()));
    }
}
