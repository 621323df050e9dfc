//! Page wiring configuration.

use serde::{Deserialize, Serialize};

/// Selectors, element ids and class names the browser shell binds to.
///
/// Every field has a default, so a JSON override only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Selector of the carousel container.
    pub carousel_selector: String,
    pub next_button_selector: String,
    pub prev_button_selector: String,
    /// Class every box element carries.
    pub box_class: String,
    /// Class marking the selected box.
    pub active_class: String,
    /// Container of the control panel. Clicks inside it do not clear the
    /// selection.
    pub control_panel_id: String,
    pub text_input_id: String,
    pub font_size_input_id: String,
    pub font_color_input_id: String,
    pub font_family_input_id: String,
    pub add_text_button_id: String,
    pub apply_button_id: String,
    pub deselect_button_id: String,
    /// Id of an optional `<script type="application/json">` holding overrides.
    pub config_script_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            carousel_selector: ".mySwiper".to_string(),
            next_button_selector: ".swiper-button-next".to_string(),
            prev_button_selector: ".swiper-button-prev".to_string(),
            box_class: "draggable-text".to_string(),
            active_class: "active".to_string(),
            control_panel_id: "controls".to_string(),
            text_input_id: "textInput".to_string(),
            font_size_input_id: "fontSize".to_string(),
            font_color_input_id: "fontColor".to_string(),
            font_family_input_id: "fontFamily".to_string(),
            add_text_button_id: "addTextBtn".to_string(),
            apply_button_id: "applyBtn".to_string(),
            deselect_button_id: "deselectBtn".to_string(),
            config_script_id: "slidetext-config".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse overrides from JSON, keeping defaults for missing keys.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Selector matching box elements.
    pub fn box_selector(&self) -> String {
        format!(".{}", self.box_class)
    }

    /// Selector matching the control panel and each of its controls.
    pub fn control_selector(&self) -> String {
        [
            &self.control_panel_id,
            &self.text_input_id,
            &self.font_size_input_id,
            &self.font_color_input_id,
            &self.font_family_input_id,
            &self.add_text_button_id,
            &self.apply_button_id,
            &self.deselect_button_id,
        ]
        .iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ")
    }
}
