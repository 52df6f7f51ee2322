//! Document model types for OFD content representation.
//!
//! This module defines the intermediate representation (IR) that bridges
//! OFD parsing and export. Coordinates stay in OFD page space: millimetres,
//! origin at the top-left corner, y axis pointing down.

mod color;
mod document;
mod geometry;
mod object;
mod page;
pub mod path;
mod resource;
mod seal;
pub mod text;

pub use color::{Color, ColorSpace, ColorSpaceKind};
pub use document::{Attachment, Document, Metadata, Outline, OutlineItem};
pub use geometry::{Matrix, Rect, PT_PER_MM};
pub use object::{
    CompositeObject, FillRule, GraphicObject, GraphicUnit, ImageObject, LineCap, LineJoin,
    PathObject, TextObject,
};
pub use page::{Annotation, Layer, LayerType, Page, Template, TemplateRef, ZOrder};
pub use path::PathCommand;
pub use resource::{
    CompositeUnit, DrawParam, Font, MediaType, MultiMedia, Resources, DEFAULT_LINE_WIDTH,
    DEFAULT_MITER_LIMIT,
};
pub use seal::{Seal, SealAppearance, StampAnnot};
pub use text::TextCode;
