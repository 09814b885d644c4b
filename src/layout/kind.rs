use serde::Serialize;

/// Closed set of rendering behaviours an element type maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Filled and/or stroked rounded rectangle. Also the fallback for unknown types.
    Border,
    /// Free-standing text block.
    Text,
    /// Input control: a panel with text drawn onto the same raster.
    Control,
    /// Bitmap or SVG image stretched to its frame.
    Image,
}

impl ElementKind {
    /// Map a layout `type` string (case-insensitive) onto a kind.
    pub fn from_type(type_name: &str) -> Self {
        match type_name.trim().to_ascii_lowercase().as_str() {
            "text" | "textblock" | "richtextblock" => Self::Text,
            "button" | "editabletextbox" | "textbox" | "input" | "textfield" | "textarea" => {
                Self::Control
            }
            "image" | "texture" | "brush" => Self::Image,
            _ => Self::Border,
        }
    }

    /// Whether missing sizes are inferred from the text content.
    pub fn is_text_like(self) -> bool {
        matches!(self, Self::Text | Self::Control)
    }

    /// Whether missing sizes fall back to a preferred size.
    pub fn is_image_like(self) -> bool {
        matches!(self, Self::Image)
    }

    /// Default font size for text drawn by this kind.
    pub fn default_font_size(self) -> f64 {
        match self {
            Self::Control => 14.0,
            _ => 16.0,
        }
    }

    /// Default text alignment for this kind, before any declared alignment applies.
    pub fn default_text_align(self) -> &'static str {
        match self {
            Self::Control => "center",
            _ => "left",
        }
    }

    /// Stable lower-case name, used in manifests and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Border => "border",
            Self::Text => "text",
            Self::Control => "control",
            Self::Image => "image",
        }
    }
}

/// Whether `type_name` asks for asset resolution (strictly `image`, case-insensitive).
///
/// `texture` and `brush` render like images but never receive placeholders.
pub fn wants_placeholder(type_name: &str) -> bool {
    type_name.trim().eq_ignore_ascii_case("image")
}

#[cfg(test)]
#[path = "../../tests/unit/layout/kind.rs"]
mod tests;
