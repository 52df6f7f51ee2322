//! Page content streams.
//!
//! OFD coordinates are millimetres with the y axis pointing down. The page
//! matrix maps them into PDF points once; every object then nests its own
//! boundary translation and CTM inside a `q`/`Q` pair.

use lopdf::content::{Content, Operation};
use lopdf::{Document as PdfDocument, Object};

use super::font::{FontFace, ITALIC_SHEAR};
use super::resources::{PageResources, SharedResources};
use crate::error::Result;
use crate::model::text::place_glyphs;
use crate::model::{
    path::{arc_to_cubics, quad_to_cubic},
    Color, CompositeObject, Document, DrawParam, FillRule, GraphicObject, GraphicUnit,
    ImageObject, Layer, Matrix, MultiMedia, Page, PathCommand, PathObject, Rect, SealAppearance,
    TextObject, ZOrder, DEFAULT_LINE_WIDTH, PT_PER_MM,
};

/// Nesting limit for composite objects referencing composites.
const MAX_COMPOSITE_DEPTH: usize = 16;

/// Stroke width of synthesised bold, relative to the font size.
const BOLD_STROKE: f64 = 0.03;

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

fn op(operator: &str, operands: Vec<Object>) -> Operation {
    Operation::new(operator, operands)
}

/// Draws one page into a content stream.
pub(crate) struct Painter<'a> {
    doc: &'a Document,
    /// Image cache scope of `doc`; seal documents get their own
    scope: &'a str,
    pdf: &'a mut PdfDocument,
    shared: &'a mut SharedResources,
    used: PageResources,
    ops: Vec<Operation>,
    depth: usize,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(
        doc: &'a Document,
        pdf: &'a mut PdfDocument,
        shared: &'a mut SharedResources,
    ) -> Self {
        Self {
            doc,
            scope: "",
            pdf,
            shared,
            used: PageResources::default(),
            ops: Vec::new(),
            depth: 0,
        }
    }

    /// Paint a page: background templates, page layers, foreground
    /// templates, seal stamps, then annotation appearances.
    pub(crate) fn paint(
        mut self,
        page: &Page,
        annotations: bool,
        seals: bool,
    ) -> (Content, PageResources) {
        self.push("cm", page_matrix(&page.area).to_array().map(real).to_vec());

        self.paint_templates(page, ZOrder::Background);
        self.paint_layers(&page.layers);
        self.paint_templates(page, ZOrder::Foreground);

        if seals {
            self.paint_seals(page);
        }

        if annotations {
            for annot in page.annotations.iter().filter(|a| a.visible) {
                self.push("q", vec![]);
                self.translate(&annot.boundary);
                self.clip(&annot.boundary);
                self.paint_objects(&annot.objects, None);
                self.push("Q", vec![]);
            }
        }

        (
            Content {
                operations: self.ops,
            },
            self.used,
        )
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(op(operator, operands));
    }

    fn paint_templates(&mut self, page: &Page, z_order: ZOrder) {
        let doc = self.doc;
        for tref in page.templates.iter().filter(|t| t.z_order == z_order) {
            if let Some(template) = doc.templates.get(&tref.id) {
                self.paint_layers(&template.layers);
            }
        }
    }

    fn paint_seals(&mut self, page: &Page) {
        let doc = self.doc;
        for seal in &doc.seals {
            for stamp in seal.stamps_on(&page.id) {
                self.push("q", vec![]);
                self.translate(&stamp.boundary);
                match &stamp.clip {
                    Some(clip) => self.clip_to(clip),
                    None => self.clip(&stamp.boundary),
                }
                match &seal.appearance {
                    SealAppearance::Image(media) => {
                        self.paint_seal_image(&seal.signature_id, media, &stamp.boundary)
                    }
                    SealAppearance::Ofd(seal_doc) => {
                        self.paint_seal_document(&seal.signature_id, seal_doc)
                    }
                }
                self.push("Q", vec![]);
            }
        }
    }

    /// A seal image stretched over the stamp boundary.
    fn paint_seal_image(&mut self, scope: &str, media: &MultiMedia, boundary: &Rect) {
        let Some((name, id)) = self.shared.image(self.pdf, scope, media) else {
            return;
        };
        self.used.images.insert(name.clone(), id);
        self.push(
            "cm",
            Matrix::scale(boundary.width, boundary.height)
                .to_array()
                .map(real)
                .to_vec(),
        );
        self.push("cm", [1.0, 0.0, 0.0, -1.0, 0.0, 1.0].map(real).to_vec());
        self.push("Do", vec![Object::Name(name.into_bytes())]);
    }

    /// Every page of a seal document, drawn from the stamp origin with the
    /// seal's own resources.
    fn paint_seal_document(&mut self, scope: &'a str, seal_doc: &'a Document) {
        let (doc, outer_scope) = (self.doc, self.scope);
        self.doc = seal_doc;
        self.scope = scope;
        for page in &seal_doc.pages {
            self.paint_templates(page, ZOrder::Background);
            self.paint_layers(&page.layers);
            self.paint_templates(page, ZOrder::Foreground);
        }
        self.doc = doc;
        self.scope = outer_scope;
    }

    fn paint_layers(&mut self, layers: &[Layer]) {
        let doc = self.doc;
        for layer in layers {
            let param = layer
                .draw_param
                .as_deref()
                .and_then(|id| doc.resources.resolve_draw_param(id));
            self.paint_objects(&layer.objects, param.as_ref());
        }
    }

    fn paint_objects(&mut self, objects: &[GraphicObject], inherited: Option<&DrawParam>) {
        for object in objects.iter().filter(|o| o.is_visible()) {
            match object {
                GraphicObject::Text(text) => self.paint_text(text, inherited),
                GraphicObject::Path(path) => self.paint_path(path, inherited),
                GraphicObject::Image(image) => self.paint_image(image),
                GraphicObject::Composite(composite) => self.paint_composite(composite, inherited),
                GraphicObject::Block { objects } => self.paint_objects(objects, inherited),
            }
        }
    }

    /// Object DrawParam, completed from the enclosing layer's.
    fn draw_param(&self, unit: &GraphicUnit, inherited: Option<&DrawParam>) -> DrawParam {
        let mut param = unit
            .draw_param
            .as_deref()
            .and_then(|id| self.doc.resources.resolve_draw_param(id))
            .unwrap_or_default();
        if let Some(parent) = inherited {
            param.inherit(parent);
        }
        param
    }

    /// Enter the object's coordinate space.
    fn enter(&mut self, unit: &GraphicUnit, clip: bool) {
        self.push("q", vec![]);
        self.translate(&unit.boundary);
        if clip {
            self.clip(&unit.boundary);
        }
        if let Some(ctm) = unit.ctm.filter(|m| !m.is_identity()) {
            self.push("cm", ctm.to_array().map(real).to_vec());
        }
    }

    fn translate(&mut self, boundary: &Rect) {
        if boundary.x != 0.0 || boundary.y != 0.0 {
            self.push(
                "cm",
                Matrix::translate(boundary.x, boundary.y)
                    .to_array()
                    .map(real)
                    .to_vec(),
            );
        }
    }

    /// Clip to the boundary size; degenerate boxes (hairlines) are not clipped.
    fn clip(&mut self, boundary: &Rect) {
        self.clip_to(&Rect::new(0.0, 0.0, boundary.width, boundary.height));
    }

    fn clip_to(&mut self, area: &Rect) {
        if area.width > 0.0 && area.height > 0.0 {
            self.push(
                "re",
                vec![real(area.x), real(area.y), real(area.width), real(area.height)],
            );
            self.push("W", vec![]);
            self.push("n", vec![]);
        }
    }

    fn set_alpha(&mut self, stroke: u8, fill: u8) {
        if stroke == u8::MAX && fill == u8::MAX {
            return;
        }
        let (name, id) = self.shared.alpha_state(self.pdf, stroke, fill);
        self.push("gs", vec![Object::Name(name.as_bytes().to_vec())]);
        self.used.states.insert(name, id);
    }

    fn rgb(&self, color: &Color) -> Vec<Object> {
        let space = color
            .color_space
            .as_deref()
            .or(self.doc.default_color_space.as_deref())
            .and_then(|id| self.doc.resources.color_space(id));
        color.to_rgb(space).map(real).to_vec()
    }

    fn set_colors(&mut self, fill: Option<&Color>, stroke: Option<&Color>) {
        if let Some(color) = fill {
            let operands = self.rgb(color);
            self.push("rg", operands);
        }
        if let Some(color) = stroke {
            let operands = self.rgb(color);
            self.push("RG", operands);
        }
    }

    /// Line width in object space.
    ///
    /// An explicit object width lives in object space and is scaled by the
    /// CTM. Inherited and default widths are page-space widths.
    fn line_width(unit: &GraphicUnit, param: &DrawParam) -> f64 {
        if let Some(width) = unit.line_width {
            return width;
        }
        let width = param.line_width.unwrap_or(DEFAULT_LINE_WIDTH);
        match unit.ctm.map(|m| m.x_scale().abs()) {
            Some(scale) if scale > f64::EPSILON => width / scale,
            _ => width,
        }
    }

    fn set_stroke_style(&mut self, unit: &GraphicUnit, param: &DrawParam) {
        self.push("w", vec![real(Self::line_width(unit, param))]);

        if let Some(cap) = unit.cap.or(param.cap) {
            self.push("J", vec![cap.pdf_value().into()]);
        }
        if let Some(join) = unit.join.or(param.join) {
            self.push("j", vec![join.pdf_value().into()]);
        }
        if let Some(limit) = unit.miter_limit.or(param.miter_limit) {
            self.push("M", vec![real(limit)]);
        }

        let pattern = unit.dash_pattern.as_ref().or(param.dash_pattern.as_ref());
        if let Some(pattern) = pattern.filter(|p| !p.is_empty() && p.iter().any(|v| *v > 0.0)) {
            let offset = unit.dash_offset.or(param.dash_offset).unwrap_or(0.0);
            let array = pattern.iter().map(|v| real(*v)).collect::<Vec<_>>();
            self.push("d", vec![Object::Array(array), real(offset)]);
        }
    }

    fn paint_path(&mut self, path: &PathObject, inherited: Option<&DrawParam>) {
        if path.commands.is_empty() {
            return;
        }
        let param = self.draw_param(&path.unit, inherited);
        let black = Color::black();
        let fill = path.fill_color.as_ref().or(param.fill_color.as_ref()).unwrap_or(&black);
        let stroke = path
            .stroke_color
            .as_ref()
            .or(param.stroke_color.as_ref())
            .unwrap_or(&black);

        self.enter(&path.unit, true);
        self.set_stroke_style(&path.unit, &param);
        self.set_colors(path.fill.then_some(fill), path.stroke.then_some(stroke));
        let unit_alpha = path.unit.alpha.unwrap_or(u8::MAX);
        self.set_alpha(
            combine_alpha(unit_alpha, path.stroke.then_some(stroke)),
            combine_alpha(unit_alpha, path.fill.then_some(fill)),
        );

        self.push_path(&path.commands);

        let even_odd = path.rule == FillRule::EvenOdd;
        let paint = match (path.fill, path.stroke) {
            (true, true) if even_odd => "B*",
            (true, true) => "B",
            (true, false) if even_odd => "f*",
            (true, false) => "f",
            (false, true) => "S",
            (false, false) => "n",
        };
        self.push(paint, vec![]);
        self.push("Q", vec![]);
    }

    fn push_path(&mut self, commands: &[PathCommand]) {
        let mut current: Option<(f64, f64)> = None;
        let mut start = (0.0, 0.0);

        for command in commands {
            if current.is_none() && !matches!(command, PathCommand::MoveTo { .. }) {
                self.push("m", vec![real(0.0), real(0.0)]);
                current = Some((0.0, 0.0));
            }
            let (cx, cy) = current.unwrap_or((0.0, 0.0));

            match *command {
                PathCommand::MoveTo { x, y } => {
                    self.push("m", vec![real(x), real(y)]);
                    start = (x, y);
                }
                PathCommand::LineTo { x, y } => self.push("l", vec![real(x), real(y)]),
                PathCommand::QuadTo { x1, y1, x, y } => {
                    let points = quad_to_cubic(cx, cy, x1, y1, x, y);
                    self.push("c", points.map(real).to_vec());
                }
                PathCommand::CubicTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => self.push("c", [x1, y1, x2, y2, x, y].map(real).to_vec()),
                PathCommand::Arc {
                    rx,
                    ry,
                    angle,
                    large_arc,
                    sweep,
                    x,
                    y,
                } => {
                    for segment in arc_to_cubics(cx, cy, rx, ry, angle, large_arc, sweep, x, y) {
                        self.push("c", segment.map(real).to_vec());
                    }
                }
                PathCommand::Close => {
                    self.push("h", vec![]);
                    current = Some(start);
                    continue;
                }
            }
            current = command.end_point().or(current);
        }
    }

    fn paint_text(&mut self, text: &TextObject, inherited: Option<&DrawParam>) {
        let glyphs = place_glyphs(&text.codes);
        if glyphs.iter().all(|g| g.ch.is_control()) || text.size <= 0.0 {
            return;
        }

        let doc = self.doc;
        let font = doc.resources.font(&text.font);
        if font.is_none() {
            log::debug!("text object references unknown font {}", text.font);
        }
        let bold = text.weight >= 700 || font.map(|f| f.bold).unwrap_or(false);
        let italic = text.italic || font.map(|f| f.italic).unwrap_or(false);
        let content: String = glyphs.iter().map(|g| g.ch).collect();
        let face = FontFace::select(font, &content, bold, italic);
        let (name, id) = self.shared.font(self.pdf, face);
        self.used.fonts.insert(name.clone(), id);

        let param = self.draw_param(&text.unit, inherited);
        let black = Color::black();
        let fill = text.fill_color.as_ref().or(param.fill_color.as_ref()).unwrap_or(&black);
        let stroke = text
            .stroke_color
            .as_ref()
            .or(param.stroke_color.as_ref())
            .unwrap_or(&black);

        let fake_bold = bold && face.synthesizes_style() && text.fill && !text.stroke;
        let shear = if italic && face.synthesizes_style() {
            ITALIC_SHEAR
        } else {
            0.0
        };
        let mode: i64 = match (text.fill, text.stroke || fake_bold) {
            (true, true) => 2,
            (false, true) => 1,
            (true, false) => 0,
            (false, false) => 3,
        };

        // Text is not clipped to its boundary
        self.enter(&text.unit, false);
        self.set_colors(
            text.fill.then_some(fill),
            if fake_bold {
                Some(fill)
            } else {
                text.stroke.then_some(stroke)
            },
        );
        if fake_bold {
            self.push("w", vec![real(text.size * BOLD_STROKE)]);
        } else if text.stroke {
            self.set_stroke_style(&text.unit, &param);
        }
        let unit_alpha = text.unit.alpha.unwrap_or(u8::MAX);
        self.set_alpha(
            combine_alpha(unit_alpha, text.stroke.then_some(stroke)),
            combine_alpha(unit_alpha, text.fill.then_some(fill)),
        );

        self.push("BT", vec![]);
        self.push("Tf", vec![Object::Name(name.into_bytes()), 1.into()]);
        if mode != 0 {
            self.push("Tr", vec![mode.into()]);
        }
        let size = text.size;
        for glyph in glyphs.iter().filter(|g| !g.ch.is_control()) {
            self.push(
                "Tm",
                vec![
                    real(size * text.hscale),
                    real(0.0),
                    real(size * shear),
                    real(-size),
                    real(glyph.x),
                    real(glyph.y),
                ],
            );
            self.push("Tj", vec![face.encode(glyph.ch)]);
        }
        self.push("ET", vec![]);
        self.push("Q", vec![]);
    }

    fn paint_image(&mut self, image: &ImageObject) {
        let doc = self.doc;
        let Some(media) = doc.resources.media(&image.resource_id) else {
            log::warn!("image object references unknown resource {}", image.resource_id);
            return;
        };
        let Some((name, id)) = self.shared.image(self.pdf, self.scope, media) else {
            return;
        };
        self.used.images.insert(name.clone(), id);

        let unit = &image.unit;
        self.enter(unit, true);
        if unit.ctm.is_none() {
            // Without a CTM the image fills its boundary
            self.push(
                "cm",
                Matrix::scale(unit.boundary.width, unit.boundary.height)
                    .to_array()
                    .map(real)
                    .to_vec(),
            );
        }
        let alpha = unit.alpha.unwrap_or(u8::MAX);
        self.set_alpha(alpha, alpha);
        // Image space has y up; the unit square is flipped into OFD space
        self.push("cm", [1.0, 0.0, 0.0, -1.0, 0.0, 1.0].map(real).to_vec());
        self.push("Do", vec![Object::Name(name.into_bytes())]);
        self.push("Q", vec![]);
    }

    fn paint_composite(&mut self, composite: &CompositeObject, inherited: Option<&DrawParam>) {
        let doc = self.doc;
        let Some(unit) = doc.resources.composite(&composite.resource_id) else {
            log::warn!(
                "composite object references unknown resource {}",
                composite.resource_id
            );
            return;
        };
        if self.depth >= MAX_COMPOSITE_DEPTH {
            log::warn!("composite {} nests too deeply, skipped", unit.id);
            return;
        }

        self.enter(&composite.unit, true);
        let alpha = composite.unit.alpha.unwrap_or(u8::MAX);
        self.set_alpha(alpha, alpha);
        let param = self.draw_param(&composite.unit, inherited);
        self.depth += 1;
        self.paint_objects(&unit.objects, Some(&param));
        self.depth -= 1;
        self.push("Q", vec![]);
    }
}

/// Map OFD page space (mm, y down) onto PDF page space (pt, y up).
pub(crate) fn page_matrix(area: &Rect) -> Matrix {
    let s = PT_PER_MM;
    Matrix::new(s, 0.0, 0.0, -s, -area.x * s, area.height_pt() + area.y * s)
}

/// Effective alpha of an object/color pair, 0 to 255.
fn combine_alpha(unit: u8, color: Option<&Color>) -> u8 {
    let color = color.map(|c| c.alpha).unwrap_or(u8::MAX);
    ((unit as u32 * color as u32 + 127) / 255) as u8
}

/// Build a content stream for a page.
pub(crate) fn page_content(
    doc: &Document,
    page: &Page,
    annotations: bool,
    seals: bool,
    pdf: &mut PdfDocument,
    shared: &mut SharedResources,
) -> Result<(Vec<u8>, PageResources)> {
    let (content, resources) = Painter::new(doc, pdf, shared).paint(page, annotations, seals);
    Ok((content.encode()?, resources))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Annotation, ColorSpace, ColorSpaceKind, Layer, LayerType, Seal, StampAnnot, TextCode,
    };

    fn operators(doc: &Document, page: &Page) -> Vec<String> {
        let mut pdf = PdfDocument::with_version("1.7");
        let mut shared = SharedResources::default();
        let (content, _) = Painter::new(doc, &mut pdf, &mut shared).paint(page, true, true);
        content
            .operations
            .into_iter()
            .map(|op| op.operator)
            .collect()
    }

    fn page_with(objects: Vec<GraphicObject>) -> Page {
        let mut page = Page::new(1, "1", Rect::new(0.0, 0.0, 210.0, 297.0));
        let mut layer = Layer::new(LayerType::Body);
        layer.objects = objects;
        page.layers.push(layer);
        page
    }

    #[test]
    fn test_page_matrix() {
        let m = page_matrix(&Rect::new(0.0, 0.0, 210.0, 297.0));
        let (x, y) = m.apply(0.0, 0.0);
        assert!(x.abs() < 1e-9);
        assert!((y - 297.0 * PT_PER_MM).abs() < 1e-9);
        let (_, y) = m.apply(0.0, 297.0);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_path_operators() {
        let mut path = PathObject::new(vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 10.0, y: 0.0 },
            PathCommand::QuadTo {
                x1: 10.0,
                y1: 5.0,
                x: 5.0,
                y: 5.0,
            },
            PathCommand::Close,
        ]);
        path.unit.boundary = Rect::new(10.0, 10.0, 20.0, 20.0);
        path.fill = true;
        path.rule = FillRule::EvenOdd;

        let ops = operators(&Document::new(), &page_with(vec![GraphicObject::Path(path)]));
        let expected = [
            "cm", "q", "cm", "re", "W", "n", "w", "rg", "RG", "m", "l", "c", "h", "B*", "Q",
        ];
        assert_eq!(ops, expected);
    }

    #[test]
    fn test_path_without_move_gets_origin() {
        let path = PathObject::new(vec![PathCommand::LineTo { x: 1.0, y: 1.0 }]);
        let ops = operators(&Document::new(), &page_with(vec![GraphicObject::Path(path)]));
        let m = ops.iter().position(|o| o == "m").unwrap();
        assert_eq!(ops[m + 1], "l");
    }

    #[test]
    fn test_text_operators() {
        let mut text = TextObject::new("missing", 4.0);
        text.unit.boundary = Rect::new(20.0, 30.0, 50.0, 10.0);
        text.codes.push(TextCode::new(0.0, 4.0, "Hi"));

        let ops = operators(&Document::new(), &page_with(vec![GraphicObject::Text(text)]));
        assert!(!ops.contains(&"re".to_string()));
        assert_eq!(ops.iter().filter(|o| *o == "Tj").count(), 2);
        assert_eq!(ops.iter().filter(|o| *o == "Tm").count(), 2);
        assert!(ops.contains(&"BT".to_string()));
    }

    #[test]
    fn test_hidden_and_annotations() {
        let mut hidden = PathObject::new(vec![PathCommand::MoveTo { x: 0.0, y: 0.0 }]);
        hidden.unit.visible = false;
        let mut page = page_with(vec![GraphicObject::Path(hidden)]);
        assert_eq!(operators(&Document::new(), &page), ["cm"]);

        page.annotations.push(Annotation {
            id: None,
            annot_type: "Stamp".into(),
            subtype: None,
            visible: true,
            boundary: Rect::new(5.0, 5.0, 10.0, 10.0),
            objects: vec![GraphicObject::Path(PathObject::new(vec![
                PathCommand::MoveTo { x: 0.0, y: 0.0 },
                PathCommand::LineTo { x: 10.0, y: 10.0 },
            ]))],
        });
        let ops = operators(&Document::new(), &page);
        assert!(ops.contains(&"S".to_string()));
    }

    #[test]
    fn test_missing_image_is_skipped() {
        let image = ImageObject {
            unit: GraphicUnit::new(Rect::new(0.0, 0.0, 10.0, 10.0)),
            resource_id: "404".into(),
        };
        let ops = operators(&Document::new(), &page_with(vec![GraphicObject::Image(image)]));
        assert!(!ops.contains(&"Do".to_string()));
    }

    #[test]
    fn test_line_width_rules() {
        let param = DrawParam::default();
        let mut unit = GraphicUnit::default();
        assert_eq!(Painter::line_width(&unit, &param), DEFAULT_LINE_WIDTH);

        unit.ctm = Some(Matrix::scale(2.0, 2.0));
        assert!((Painter::line_width(&unit, &param) - DEFAULT_LINE_WIDTH / 2.0).abs() < 1e-12);

        unit.line_width = Some(1.0);
        assert_eq!(Painter::line_width(&unit, &param), 1.0);
    }

    #[test]
    fn test_default_color_space_palette() {
        let mut doc = Document::new();
        let mut space = ColorSpace::new("7", ColorSpaceKind::Rgb);
        space.palette = vec![vec![255.0, 0.0, 0.0], vec![0.0, 0.0, 255.0]];
        doc.resources.color_spaces.insert("7".into(), space);
        doc.default_color_space = Some("7".into());

        let mut path = PathObject::new(vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 5.0, y: 5.0 },
        ]);
        path.fill = true;
        path.stroke = false;
        path.fill_color = Some(Color {
            value: Vec::new(),
            color_space: None,
            index: Some(1),
            alpha: 255,
        });
        let page = page_with(vec![GraphicObject::Path(path)]);

        let mut pdf = PdfDocument::with_version("1.7");
        let mut shared = SharedResources::default();
        let (content, _) = Painter::new(&doc, &mut pdf, &mut shared).paint(&page, false, false);
        let fill = content
            .operations
            .iter()
            .find(|op| op.operator == "rg")
            .unwrap();
        assert_eq!(fill.operands, vec![real(0.0), real(0.0), real(1.0)]);
    }

    fn sealed(appearance: SealAppearance) -> Document {
        let mut doc = Document::new();
        doc.seals.push(Seal {
            signature_id: "1".into(),
            stamps: vec![StampAnnot {
                id: Some("1".into()),
                page_id: "1".into(),
                boundary: Rect::new(100.0, 200.0, 40.0, 40.0),
                clip: Some(Rect::new(0.0, 0.0, 40.0, 20.0)),
            }],
            appearance,
        });
        doc
    }

    #[test]
    fn test_image_seal_is_stamped() {
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::new_rgb8(2, 2)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        let doc = sealed(SealAppearance::Image(MultiMedia {
            id: "1".into(),
            media_type: Default::default(),
            format: Some("PNG".into()),
            path: "Doc_0/Signs/Sign_0/SignedValue.dat".into(),
            data: out.into_inner(),
        }));

        let page = page_with(Vec::new());
        let mut pdf = PdfDocument::with_version("1.7");
        let mut shared = SharedResources::default();
        let (content, used) = Painter::new(&doc, &mut pdf, &mut shared).paint(&page, false, true);
        let ops: Vec<&str> = content.operations.iter().map(|o| o.operator.as_str()).collect();
        assert_eq!(ops, ["cm", "q", "cm", "re", "W", "n", "cm", "cm", "Do", "Q"]);
        assert_eq!(used.images.len(), 1);

        // Clip rectangle comes from the stamp, relative to its boundary
        let clip = content.operations.iter().find(|o| o.operator == "re").unwrap();
        assert_eq!(
            clip.operands,
            vec![real(0.0), real(0.0), real(40.0), real(20.0)]
        );

        assert_eq!(operators(&doc, &page_with(Vec::new())).last().unwrap(), "Q");
        let mut other = page_with(Vec::new());
        other.id = "2".into();
        assert_eq!(operators(&doc, &other), ["cm"]);

        let mut pdf = PdfDocument::with_version("1.7");
        let (content, _) = Painter::new(&doc, &mut pdf, &mut shared).paint(&page, true, false);
        assert_eq!(content.operations.len(), 1);
    }

    #[test]
    fn test_document_seal_uses_its_own_resources() {
        let mut seal_doc = Document::new();
        let mut space = ColorSpace::new("1", ColorSpaceKind::Rgb);
        space.palette = vec![vec![0.0, 255.0, 0.0]];
        seal_doc.resources.color_spaces.insert("1".into(), space);
        seal_doc.default_color_space = Some("1".into());

        let mut path = PathObject::new(vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 40.0, y: 40.0 },
        ]);
        path.stroke_color = Some(Color {
            value: Vec::new(),
            color_space: None,
            index: Some(0),
            alpha: 255,
        });
        seal_doc.add_page(page_with(vec![GraphicObject::Path(path)]));
        let doc = sealed(SealAppearance::Ofd(Box::new(seal_doc)));

        let page = page_with(Vec::new());
        let mut pdf = PdfDocument::with_version("1.7");
        let mut shared = SharedResources::default();
        let (content, _) = Painter::new(&doc, &mut pdf, &mut shared).paint(&page, false, true);

        let stroke = content
            .operations
            .iter()
            .find(|o| o.operator == "RG")
            .unwrap();
        assert_eq!(stroke.operands, vec![real(0.0), real(1.0), real(0.0)]);
        assert!(content.operations.iter().any(|o| o.operator == "S"));
    }

    #[test]
    fn test_combine_alpha() {
        assert_eq!(combine_alpha(255, None), 255);
        assert_eq!(combine_alpha(128, None), 128);
        let mut color = Color::black();
        color.alpha = 128;
        assert_eq!(combine_alpha(255, Some(&color)), 128);
        assert_eq!(combine_alpha(128, Some(&color)), 64);
    }
}
