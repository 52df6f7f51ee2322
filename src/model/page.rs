//! Page-level types.

use super::{GraphicObject, Rect};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Layer type (`CT_Layer/@Type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayerType {
    #[default]
    Body,
    Background,
    Foreground,
    Custom,
}

impl LayerType {
    pub fn parse(s: &str) -> Self {
        match s {
            "Background" => LayerType::Background,
            "Foreground" => LayerType::Foreground,
            "Custom" => LayerType::Custom,
            _ => LayerType::Body,
        }
    }
}

/// A content layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub layer_type: LayerType,
    /// DrawParam applied to objects without their own
    pub draw_param: Option<String>,
    pub objects: Vec<GraphicObject>,
}

impl Layer {
    pub fn new(layer_type: LayerType) -> Self {
        Self {
            layer_type,
            ..Default::default()
        }
    }
}

/// Which side of the page content a template is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZOrder {
    #[default]
    Background,
    Foreground,
}

impl ZOrder {
    pub fn parse(s: &str) -> Self {
        match s {
            "Foreground" => ZOrder::Foreground,
            _ => ZOrder::Background,
        }
    }
}

/// A template page reference on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRef {
    pub id: String,
    pub z_order: ZOrder,
}

/// A template page declared in CommonData.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: Option<String>,
    /// Default z-order when the page reference does not set one
    pub z_order: ZOrder,
    pub layers: Vec<Layer>,
}

/// A page annotation with its appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: Option<String>,
    /// Annotation type (Link, Path, Highlight, Stamp, Watermark)
    pub annot_type: String,
    pub subtype: Option<String>,
    pub visible: bool,
    /// Appearance box in page space
    pub boundary: Rect,
    /// Appearance objects, relative to `boundary`
    pub objects: Vec<GraphicObject>,
}

/// A single page in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// OFD page ID
    pub id: String,

    /// Physical box in millimetres
    pub area: Rect,

    /// Templates referenced by this page
    pub templates: Vec<TemplateRef>,

    /// Content layers in drawing order
    pub layers: Vec<Layer>,

    /// Annotations drawn after content
    pub annotations: Vec<Annotation>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32, id: impl Into<String>, area: Rect) -> Self {
        Self {
            number,
            id: id.into(),
            area,
            templates: Vec::new(),
            layers: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Check if the page has no content objects.
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(|l| l.objects.is_empty())
    }

    /// Visit every object on the page layers, including nested blocks.
    pub fn walk_objects<'a>(&'a self, f: &mut dyn FnMut(&'a GraphicObject)) {
        for layer in &self.layers {
            for object in &layer.objects {
                object.walk(f);
            }
        }
    }

    /// Text of the page: one line per visible text object, NFC normalised.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        self.walk_objects(&mut |object| {
            if let GraphicObject::Text(text) = object {
                if text.unit.visible {
                    let line: String = text.text().nfc().collect();
                    if !line.trim().is_empty() {
                        lines.push(line);
                    }
                }
            }
        });
        lines.join("\n")
    }
}
