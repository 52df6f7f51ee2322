//! Document resources: fonts, color spaces, draw parameters, multimedia and
//! composite graphic units.

use super::{Color, ColorSpace, GraphicObject, LineCap, LineJoin};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default stroke width in millimetres.
pub const DEFAULT_LINE_WIDTH: f64 = 0.353;

/// Default miter limit.
pub const DEFAULT_MITER_LIMIT: f64 = 3.528;

/// A font declaration (`CT_Font`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Font {
    pub id: String,
    pub name: String,
    pub family: Option<String>,
    pub charset: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub serif: bool,
    pub fixed_width: bool,
    /// Container path of the embedded font program, if any
    pub font_file: Option<String>,
}

impl Font {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Reusable drawing parameters (`CT_DrawParam`).
///
/// Unset fields fall back to the `Relative` parent, then to the defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawParam {
    pub id: String,
    pub relative: Option<String>,
    pub line_width: Option<f64>,
    pub join: Option<LineJoin>,
    pub cap: Option<LineCap>,
    pub dash_offset: Option<f64>,
    pub dash_pattern: Option<Vec<f64>>,
    pub miter_limit: Option<f64>,
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
}

impl DrawParam {
    /// Fill unset fields from `parent`.
    pub(crate) fn inherit(&mut self, parent: &DrawParam) {
        self.line_width = self.line_width.or(parent.line_width);
        self.join = self.join.or(parent.join);
        self.cap = self.cap.or(parent.cap);
        self.dash_offset = self.dash_offset.or(parent.dash_offset);
        if self.dash_pattern.is_none() {
            self.dash_pattern = parent.dash_pattern.clone();
        }
        self.miter_limit = self.miter_limit.or(parent.miter_limit);
        if self.fill_color.is_none() {
            self.fill_color = parent.fill_color.clone();
        }
        if self.stroke_color.is_none() {
            self.stroke_color = parent.stroke_color.clone();
        }
    }
}

/// Kind of a multimedia resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MediaType {
    #[default]
    Image,
    Audio,
    Video,
}

impl MediaType {
    pub fn parse(s: &str) -> Self {
        match s {
            "Audio" => MediaType::Audio,
            "Video" => MediaType::Video,
            _ => MediaType::Image,
        }
    }
}

/// A multimedia resource (`CT_MultiMedia`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiMedia {
    pub id: String,
    pub media_type: MediaType,
    /// Declared format (e.g. "PNG", "JPEG", "GBIG2")
    pub format: Option<String>,
    /// Resolved container path of the media file
    pub path: String,
    /// Raw file contents
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl MultiMedia {
    /// Size of the media data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_image(&self) -> bool {
        matches!(self.media_type, MediaType::Image)
    }
}

/// A reusable vector graphic (`CT_VectorG`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeUnit {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub objects: Vec<GraphicObject>,
}

/// All resources visible to the document, keyed by resource ID.
///
/// OFD resource IDs are unique across the whole document, so public,
/// document and page resources share one namespace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resources {
    pub fonts: BTreeMap<String, Font>,
    pub color_spaces: BTreeMap<String, ColorSpace>,
    pub draw_params: BTreeMap<String, DrawParam>,
    pub media: BTreeMap<String, MultiMedia>,
    pub composites: BTreeMap<String, CompositeUnit>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another resource set; existing IDs are kept.
    pub fn merge(&mut self, other: Resources) {
        fn absorb<V>(into: &mut BTreeMap<String, V>, from: BTreeMap<String, V>) {
            for (id, value) in from {
                if into.contains_key(&id) {
                    log::debug!("duplicate resource ID {}, keeping the first", id);
                } else {
                    into.insert(id, value);
                }
            }
        }
        absorb(&mut self.fonts, other.fonts);
        absorb(&mut self.color_spaces, other.color_spaces);
        absorb(&mut self.draw_params, other.draw_params);
        absorb(&mut self.media, other.media);
        absorb(&mut self.composites, other.composites);
    }

    pub fn font(&self, id: &str) -> Option<&Font> {
        self.fonts.get(id)
    }

    pub fn color_space(&self, id: &str) -> Option<&ColorSpace> {
        self.color_spaces.get(id)
    }

    pub fn media(&self, id: &str) -> Option<&MultiMedia> {
        self.media.get(id)
    }

    pub fn composite(&self, id: &str) -> Option<&CompositeUnit> {
        self.composites.get(id)
    }

    /// Resolve a DrawParam with its `Relative` chain merged in.
    ///
    /// Returns `None` for unknown IDs. Cycles in the chain are cut.
    pub fn resolve_draw_param(&self, id: &str) -> Option<DrawParam> {
        let mut resolved = self.draw_params.get(id)?.clone();
        let mut seen = vec![id.to_string()];
        let mut next = resolved.relative.clone();

        while let Some(parent_id) = next {
            if seen.contains(&parent_id) {
                log::warn!("DrawParam {} has a cyclic Relative chain", id);
                break;
            }
            match self.draw_params.get(&parent_id) {
                Some(parent) => {
                    resolved.inherit(parent);
                    next = parent.relative.clone();
                }
                None => break,
            }
            seen.push(parent_id);
        }

        Some(resolved)
    }

    /// Total number of resources.
    pub fn len(&self) -> usize {
        self.fonts.len()
            + self.color_spaces.len()
            + self.draw_params.len()
            + self.media.len()
            + self.composites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
