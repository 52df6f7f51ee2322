//! Graphic objects placed on page layers.

use super::{Color, Matrix, PathCommand, Rect, TextCode};
use serde::{Deserialize, Serialize};

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Butt" => Some(LineCap::Butt),
            "Round" => Some(LineCap::Round),
            "Square" => Some(LineCap::Square),
            _ => None,
        }
    }

    /// PDF `J` operand.
    pub fn pdf_value(&self) -> i64 {
        *self as i64
    }
}

/// Line join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Miter" => Some(LineJoin::Miter),
            "Round" => Some(LineJoin::Round),
            "Bevel" => Some(LineJoin::Bevel),
            _ => None,
        }
    }

    /// PDF `j` operand.
    pub fn pdf_value(&self) -> i64 {
        *self as i64
    }
}

/// Path fill rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    pub fn parse(s: &str) -> Self {
        match s {
            "Even-Odd" | "EvenOdd" => FillRule::EvenOdd,
            _ => FillRule::NonZero,
        }
    }
}

/// Attributes shared by every graphic unit (`CT_GraphicUnit`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphicUnit {
    pub id: Option<String>,
    /// Outer bounding box in the parent coordinate space
    pub boundary: Rect,
    /// Transform from object space into the boundary space
    pub ctm: Option<Matrix>,
    /// Referenced DrawParam
    pub draw_param: Option<String>,
    pub line_width: Option<f64>,
    pub cap: Option<LineCap>,
    pub join: Option<LineJoin>,
    pub miter_limit: Option<f64>,
    pub dash_offset: Option<f64>,
    pub dash_pattern: Option<Vec<f64>>,
    /// Opacity, 0 to 255
    pub alpha: Option<u8>,
    pub visible: bool,
}

impl GraphicUnit {
    pub fn new(boundary: Rect) -> Self {
        Self {
            id: None,
            boundary,
            ctm: None,
            draw_param: None,
            line_width: None,
            cap: None,
            join: None,
            miter_limit: None,
            dash_offset: None,
            dash_pattern: None,
            alpha: None,
            visible: true,
        }
    }
}

impl Default for GraphicUnit {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

/// A text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObject {
    pub unit: GraphicUnit,
    /// Font resource ID
    pub font: String,
    /// Font size in millimetres
    pub size: f64,
    pub fill: bool,
    pub stroke: bool,
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
    /// Horizontal glyph scale
    pub hscale: f64,
    /// Font weight, 100 to 900
    pub weight: u32,
    pub italic: bool,
    pub codes: Vec<TextCode>,
}

impl TextObject {
    pub fn new(font: impl Into<String>, size: f64) -> Self {
        Self {
            unit: GraphicUnit::default(),
            font: font.into(),
            size,
            fill: true,
            stroke: false,
            fill_color: None,
            stroke_color: None,
            hscale: 1.0,
            weight: 400,
            italic: false,
            codes: Vec::new(),
        }
    }

    /// Concatenated text of all codes.
    pub fn text(&self) -> String {
        self.codes.iter().map(|c| c.text.as_str()).collect()
    }
}

/// A vector path object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathObject {
    pub unit: GraphicUnit,
    pub stroke: bool,
    pub fill: bool,
    pub rule: FillRule,
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
    pub commands: Vec<PathCommand>,
}

impl PathObject {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self {
            unit: GraphicUnit::default(),
            stroke: true,
            fill: false,
            rule: FillRule::NonZero,
            fill_color: None,
            stroke_color: None,
            commands,
        }
    }
}

/// An image object referencing a MultiMedia resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObject {
    pub unit: GraphicUnit,
    pub resource_id: String,
}

/// A composite object referencing a CompositeGraphicUnit resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeObject {
    pub unit: GraphicUnit,
    pub resource_id: String,
}

/// Any drawable object, in drawing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GraphicObject {
    Text(TextObject),
    Path(PathObject),
    Image(ImageObject),
    Composite(CompositeObject),
    /// A `PageBlock` grouping nested objects
    Block { objects: Vec<GraphicObject> },
}

impl GraphicObject {
    /// Common attributes, if the object is a graphic unit.
    pub fn unit(&self) -> Option<&GraphicUnit> {
        match self {
            GraphicObject::Text(t) => Some(&t.unit),
            GraphicObject::Path(p) => Some(&p.unit),
            GraphicObject::Image(i) => Some(&i.unit),
            GraphicObject::Composite(c) => Some(&c.unit),
            GraphicObject::Block { .. } => None,
        }
    }

    /// Check if the object should be drawn.
    pub fn is_visible(&self) -> bool {
        self.unit().map(|u| u.visible).unwrap_or(true)
    }

    /// Visit this object and every nested object depth-first.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a GraphicObject)) {
        f(self);
        if let GraphicObject::Block { objects } = self {
            for child in objects {
                child.walk(f);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let path = PathObject::new(Vec::new());
        assert!(path.stroke);
        assert!(!path.fill);
        assert_eq!(path.rule, FillRule::NonZero);

        let text = TextObject::new("3", 3.5);
        assert!(text.fill);
        assert!(!text.stroke);
        assert_eq!(text.hscale, 1.0);
    }

    #[test]
    fn test_parse_styles() {
        assert_eq!(LineCap::parse("Round"), Some(LineCap::Round));
        assert_eq!(LineJoin::parse("Bevel").map(|j| j.pdf_value()), Some(2));
        assert_eq!(FillRule::parse("Even-Odd"), FillRule::EvenOdd);
        assert_eq!(FillRule::parse("anything"), FillRule::NonZero);
    }

    #[test]
    fn test_walk_nested_blocks() {
        let mut text = TextObject::new("1", 3.0);
        text.codes.push(TextCode::new(0.0, 0.0, "hi"));
        let block = GraphicObject::Block {
            objects: vec![
                GraphicObject::Text(text),
                GraphicObject::Block {
                    objects: vec![GraphicObject::Path(PathObject::new(Vec::new()))],
                },
            ],
        };

        let mut count = 0;
        block.walk(&mut |_| count += 1);
        assert_eq!(count, 4);
        assert!(block.is_visible());
    }
}
