//! Content stream interpreter
//!
//! Walks a page's operators tracking the graphics and text state, and
//! records what the checks care about: text runs with their rendered size
//! and fill colour, words, image placements and filled path areas.

use std::collections::HashMap;
use std::rc::Rc;

use a11y_types::Rect;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, warn};

use crate::error::PdfError;
use crate::fonts::FontInfo;
use crate::model::{FillRect, ImageRef, PageContent, Rgb, TextRun, Word};
use crate::objects::{as_dict, get_dict, get_int, get_name, inherited, number, resolve};

const MAX_FORM_DEPTH: usize = 8;
/// `TJ` adjustments below this (thousandths of an em) read as a word gap.
const WORD_GAP_ADJUSTMENT: f64 = -100.0;
const ASCENT: f64 = 0.75;
const DESCENT: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Matrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn new(v: [f64; 6]) -> Self {
        Self {
            a: v[0],
            b: v[1],
            c: v[2],
            d: v[3],
            e: v[4],
            f: v[5],
        }
    }

    fn translate(tx: f64, ty: f64) -> Self {
        Self::new([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// `self` applied first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    /// Bounding box of a transformed rectangle.
    fn transform_rect(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        let corners = [
            self.apply(x0, y0),
            self.apply(x1, y0),
            self.apply(x0, y1),
            self.apply(x1, y1),
        ];
        let (mut min_x, mut min_y) = corners[0];
        let (mut max_x, mut max_y) = corners[0];
        for &(x, y) in &corners[1..] {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Rect::new(min_x, min_y, max_x, max_y)
    }

    fn vertical_scale(&self) -> f64 {
        self.c.hypot(self.d)
    }
}

#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    fill: Rgb,
    font: Option<Rc<FontInfo>>,
    font_size: f64,
    char_spacing: f64,
    word_spacing: f64,
    horizontal_scale: f64,
    leading: f64,
    rise: f64,
    render_mode: i64,
}

impl GraphicsState {
    fn new(ctm: Matrix) -> Self {
        Self {
            ctm,
            fill: Rgb::BLACK,
            font: None,
            font_size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
            render_mode: 0,
        }
    }
}

/// State local to one content stream (page or form XObject).
struct Frame<'a> {
    resources: Option<&'a Dictionary>,
    gs: GraphicsState,
    saved: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    path: Option<Rect>,
    marked: Vec<Option<i64>>,
}

impl Frame<'_> {
    fn current_mcid(&self) -> Option<i64> {
        self.marked.iter().rev().find_map(|m| *m)
    }

    fn add_point(&mut self, x: f64, y: f64) {
        let (x, y) = self.gs.ctm.apply(x, y);
        let point = Rect::new(x, y, x, y);
        self.path = Some(match self.path {
            Some(path) => path.union(&point),
            None => point,
        });
    }
}

enum TextPiece<'o> {
    Bytes(&'o [u8]),
    Adjust(f64),
}

/// Interpret one page's content.
pub(crate) fn interpret_page(doc: &Document, page_id: ObjectId) -> Result<PageContent, PdfError> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| PdfError::Malformed(format!("page object {page_id:?}: {e}")))?;
    let resources = inherited(doc, page, b"Resources").and_then(as_dict);
    let data = doc
        .get_page_content(page_id)
        .map_err(|e| PdfError::ParseError(format!("page content: {e}")))?;
    let content =
        Content::decode(&data).map_err(|e| PdfError::ParseError(format!("content stream: {e}")))?;

    let mut interpreter = Interpreter {
        doc,
        fonts: HashMap::new(),
        out: PageContent::default(),
    };
    interpreter.run(
        &content.operations,
        resources,
        GraphicsState::new(Matrix::IDENTITY),
        None,
        0,
    );
    Ok(interpreter.out)
}

struct Interpreter<'a> {
    doc: &'a Document,
    fonts: HashMap<ObjectId, Rc<FontInfo>>,
    out: PageContent,
}

impl<'a> Interpreter<'a> {
    fn run(
        &mut self,
        operations: &[Operation],
        resources: Option<&'a Dictionary>,
        gs: GraphicsState,
        inherited_mcid: Option<i64>,
        depth: usize,
    ) {
        let mut frame = Frame {
            resources,
            gs,
            saved: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            path: None,
            marked: vec![inherited_mcid],
        };

        for op in operations {
            let operands = &op.operands;
            let nums: Vec<f64> = operands.iter().filter_map(number).collect();
            match op.operator.as_str() {
                // Graphics state
                "q" => frame.saved.push(frame.gs.clone()),
                "Q" => match frame.saved.pop() {
                    Some(gs) => frame.gs = gs,
                    None => debug!("unbalanced Q operator"),
                },
                "cm" => {
                    if let [a, b, c, d, e, f] = nums[..] {
                        frame.gs.ctm = Matrix::new([a, b, c, d, e, f]).then(&frame.gs.ctm);
                    }
                }

                // Fill colour
                "g" => {
                    if let [gray] = nums[..] {
                        frame.gs.fill = Rgb::from_gray(gray);
                    }
                }
                "rg" => {
                    if let [r, g, b] = nums[..] {
                        frame.gs.fill = Rgb::from_unit(r, g, b);
                    }
                }
                "k" => {
                    if let [c, m, y, k] = nums[..] {
                        frame.gs.fill = Rgb::from_cmyk(c, m, y, k);
                    }
                }
                "sc" | "scn" => match nums[..] {
                    [gray] => frame.gs.fill = Rgb::from_gray(gray),
                    [r, g, b] => frame.gs.fill = Rgb::from_unit(r, g, b),
                    [c, m, y, k] => frame.gs.fill = Rgb::from_cmyk(c, m, y, k),
                    _ => {}
                },
                "cs" => frame.gs.fill = Rgb::BLACK,

                // Text objects and state
                "BT" => {
                    frame.text_matrix = Matrix::IDENTITY;
                    frame.line_matrix = Matrix::IDENTITY;
                }
                "ET" => {}
                "Tc" => {
                    if let [v] = nums[..] {
                        frame.gs.char_spacing = v;
                    }
                }
                "Tw" => {
                    if let [v] = nums[..] {
                        frame.gs.word_spacing = v;
                    }
                }
                "Tz" => {
                    if let [v] = nums[..] {
                        frame.gs.horizontal_scale = v / 100.0;
                    }
                }
                "TL" => {
                    if let [v] = nums[..] {
                        frame.gs.leading = v;
                    }
                }
                "Ts" => {
                    if let [v] = nums[..] {
                        frame.gs.rise = v;
                    }
                }
                "Tr" => {
                    if let [v] = nums[..] {
                        frame.gs.render_mode = v as i64;
                    }
                }
                "Tf" => {
                    let name = operands.first().and_then(|o| o.as_name().ok());
                    if let Some(size) = operands.get(1).and_then(number) {
                        frame.gs.font_size = size;
                    }
                    frame.gs.font = name.and_then(|n| self.load_font(frame.resources, n));
                }
                "Td" => {
                    if let [tx, ty] = nums[..] {
                        move_line(&mut frame, tx, ty);
                    }
                }
                "TD" => {
                    if let [tx, ty] = nums[..] {
                        frame.gs.leading = -ty;
                        move_line(&mut frame, tx, ty);
                    }
                }
                "Tm" => {
                    if let [a, b, c, d, e, f] = nums[..] {
                        frame.text_matrix = Matrix::new([a, b, c, d, e, f]);
                        frame.line_matrix = frame.text_matrix;
                    }
                }
                "T*" => {
                    let leading = frame.gs.leading;
                    move_line(&mut frame, 0.0, -leading);
                }

                // Text showing
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = operands.first() {
                        self.show_text(&mut frame, &[TextPiece::Bytes(bytes)]);
                    }
                }
                "'" => {
                    let leading = frame.gs.leading;
                    move_line(&mut frame, 0.0, -leading);
                    if let Some(Object::String(bytes, _)) = operands.first() {
                        self.show_text(&mut frame, &[TextPiece::Bytes(bytes)]);
                    }
                }
                "\"" => {
                    if let [aw, ac, ..] = nums[..] {
                        frame.gs.word_spacing = aw;
                        frame.gs.char_spacing = ac;
                    }
                    let leading = frame.gs.leading;
                    move_line(&mut frame, 0.0, -leading);
                    if let Some(Object::String(bytes, _)) = operands.get(2) {
                        self.show_text(&mut frame, &[TextPiece::Bytes(bytes)]);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        let pieces: Vec<TextPiece> = items
                            .iter()
                            .filter_map(|item| match item {
                                Object::String(bytes, _) => Some(TextPiece::Bytes(bytes)),
                                other => number(other).map(TextPiece::Adjust),
                            })
                            .collect();
                        self.show_text(&mut frame, &pieces);
                    }
                }

                // Path construction
                "m" | "l" => {
                    if let [x, y] = nums[..] {
                        frame.add_point(x, y);
                    }
                }
                "c" => {
                    if let [x1, y1, x2, y2, x3, y3] = nums[..] {
                        frame.add_point(x1, y1);
                        frame.add_point(x2, y2);
                        frame.add_point(x3, y3);
                    }
                }
                "v" | "y" => {
                    if let [x1, y1, x2, y2] = nums[..] {
                        frame.add_point(x1, y1);
                        frame.add_point(x2, y2);
                    }
                }
                "re" => {
                    if let [x, y, w, h] = nums[..] {
                        frame.add_point(x, y);
                        frame.add_point(x + w, y + h);
                        frame.add_point(x + w, y);
                        frame.add_point(x, y + h);
                    }
                }
                "h" | "W" | "W*" => {}

                // Path painting
                "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" => {
                    if let Some(rect) = frame.path.take() {
                        self.out.fills.push(FillRect {
                            rect,
                            color: frame.gs.fill,
                        });
                    }
                }
                "S" | "s" | "n" => frame.path = None,

                // Marked content
                "BMC" => frame.marked.push(None),
                "BDC" => {
                    let mcid = operands
                        .get(1)
                        .and_then(|props| self.marked_content_id(frame.resources, props));
                    frame.marked.push(mcid);
                }
                "EMC" => {
                    // The first entry is inherited from the invoking stream.
                    if frame.marked.len() > 1 {
                        frame.marked.pop();
                    }
                }

                // XObjects
                "Do" => {
                    if let Some(name) = operands.first().and_then(|o| o.as_name().ok()) {
                        self.paint_xobject(&mut frame, name, depth);
                    }
                }

                _ => {}
            }
        }
    }

    fn load_font(&mut self, resources: Option<&'a Dictionary>, name: &[u8]) -> Option<Rc<FontInfo>> {
        let fonts = get_dict(self.doc, resources?, b"Font")?;
        let entry = fonts.get(name).ok()?;
        if let Object::Reference(id) = entry {
            if let Some(cached) = self.fonts.get(id) {
                return Some(Rc::clone(cached));
            }
            let info = Rc::new(FontInfo::from_dict(
                self.doc,
                resolve(self.doc, entry).and_then(as_dict)?,
            ));
            self.fonts.insert(*id, Rc::clone(&info));
            return Some(info);
        }
        let dict = resolve(self.doc, entry).and_then(as_dict)?;
        Some(Rc::new(FontInfo::from_dict(self.doc, dict)))
    }

    fn marked_content_id(&self, resources: Option<&'a Dictionary>, props: &Object) -> Option<i64> {
        let dict = match props {
            Object::Dictionary(dict) => dict,
            Object::Name(name) => {
                let properties = get_dict(self.doc, resources?, b"Properties")?;
                resolve(self.doc, properties.get(name).ok()?).and_then(as_dict)?
            }
            _ => return None,
        };
        get_int(self.doc, dict, b"MCID")
    }

    fn show_text(&mut self, frame: &mut Frame<'a>, pieces: &[TextPiece]) {
        let fallback;
        let font: &FontInfo = match &frame.gs.font {
            Some(font) => font,
            None => {
                fallback = FontInfo::fallback();
                &fallback
            }
        };
        let gs = &frame.gs;
        let size = gs.font_size;
        let scale = gs.horizontal_scale;

        let mut text = String::new();
        let mut words: Vec<(String, f64, f64)> = Vec::new();
        let mut current: Option<(String, f64, f64)> = None;
        let mut x = 0.0;

        for piece in pieces {
            match piece {
                TextPiece::Bytes(bytes) => {
                    for glyph in font.decode(bytes) {
                        let glyph_end = x + glyph.width * size * scale;
                        let spacing = gs.char_spacing
                            + if glyph.is_space_code {
                                gs.word_spacing
                            } else {
                                0.0
                            };
                        text.push_str(&glyph.text);
                        if glyph.text.chars().all(char::is_whitespace) {
                            if !glyph.text.is_empty() {
                                words.extend(current.take());
                            }
                        } else {
                            match current.as_mut() {
                                Some(word) => {
                                    word.0.push_str(&glyph.text);
                                    word.2 = glyph_end;
                                }
                                None => current = Some((glyph.text.clone(), x, glyph_end)),
                            }
                        }
                        x += (glyph.width * size + spacing) * scale;
                    }
                }
                TextPiece::Adjust(amount) => {
                    x -= amount / 1000.0 * size * scale;
                    if *amount < WORD_GAP_ADJUSTMENT {
                        if !text.is_empty() && !text.ends_with(' ') {
                            text.push(' ');
                        }
                        words.extend(current.take());
                    }
                }
            }
        }
        words.extend(current);

        let start = frame.text_matrix;
        frame.text_matrix = Matrix::translate(x, 0.0).then(&start);

        if text.is_empty() {
            return;
        }
        let render = start.then(&gs.ctm);
        let y0 = gs.rise - DESCENT * size;
        let y1 = gs.rise + ASCENT * size;
        let run_end = x.max(0.0);

        self.out.runs.push(TextRun {
            text: text.trim_end().to_string(),
            bbox: render.transform_rect(0.0, y0, run_end, y1),
            font_size: size * render.vertical_scale(),
            font_name: font.name.clone(),
            bold: font.bold,
            color: gs.fill,
            invisible: gs.render_mode == 3 || gs.render_mode == 7,
        });
        self.out
            .words
            .extend(words.into_iter().map(|(text, start_x, end_x)| Word {
                text,
                bbox: render.transform_rect(start_x, y0, end_x, y1),
            }));
    }

    fn paint_xobject(&mut self, frame: &mut Frame<'a>, name: &[u8], depth: usize) {
        let Some(xobjects) = frame
            .resources
            .and_then(|r| get_dict(self.doc, r, b"XObject"))
        else {
            return;
        };
        let Ok(entry) = xobjects.get(name) else {
            debug!(name = %String::from_utf8_lossy(name), "XObject not found");
            return;
        };
        let object_number = match entry {
            Object::Reference(id) => id.0,
            _ => 0,
        };
        let Some(Object::Stream(stream)) = resolve(self.doc, entry) else {
            return;
        };

        match get_name(self.doc, &stream.dict, b"Subtype").as_deref() {
            Some("Image") => {
                let dim = |key: &[u8]| {
                    get_int(self.doc, &stream.dict, key)
                        .unwrap_or(0)
                        .clamp(0, i64::from(u32::MAX)) as u32
                };
                let (width, height) = (dim(b"Width"), dim(b"Height"));
                // First placement wins for images drawn more than once.
                if object_number != 0
                    && self
                        .out
                        .images
                        .iter()
                        .any(|i| i.object_number == object_number)
                {
                    return;
                }
                self.out.images.push(ImageRef {
                    object_number,
                    width,
                    height,
                    rect: frame.gs.ctm.transform_rect(0.0, 0.0, 1.0, 1.0),
                    mcid: frame.current_mcid(),
                });
            }
            Some("Form") => {
                if depth >= MAX_FORM_DEPTH {
                    warn!(depth, "form XObject nesting too deep, skipping");
                    return;
                }
                let data = stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone());
                let content = match Content::decode(&data) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!(error = %e, "could not decode form XObject");
                        return;
                    }
                };
                let matrix = self.form_matrix(&stream.dict).unwrap_or(Matrix::IDENTITY);
                let mut gs = frame.gs.clone();
                gs.ctm = matrix.then(&frame.gs.ctm);
                let resources = get_dict(self.doc, &stream.dict, b"Resources").or(frame.resources);
                self.run(
                    &content.operations,
                    resources,
                    gs,
                    frame.current_mcid(),
                    depth + 1,
                );
            }
            _ => {}
        }
    }

    fn form_matrix(&self, dict: &Dictionary) -> Option<Matrix> {
        let Object::Array(items) = resolve(self.doc, dict.get(b"Matrix").ok()?)? else {
            return None;
        };
        let values: Vec<f64> = items.iter().filter_map(number).collect();
        match values[..] {
            [a, b, c, d, e, f] => Some(Matrix::new([a, b, c, d, e, f])),
            _ => None,
        }
    }
}

fn move_line(frame: &mut Frame<'_>, tx: f64, ty: f64) {
    frame.line_matrix = Matrix::translate(tx, ty).then(&frame.line_matrix);
    frame.text_matrix = frame.line_matrix;
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};
    use pretty_assertions::assert_eq;

    fn page_with(content: &str, resources: Dictionary) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.7");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.as_bytes().to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        });
        if let Ok(Object::Dictionary(page)) = doc.get_object_mut(page_id) {
            page.set("Parent", pages_id);
        }
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);
        (doc, page_id)
    }

    fn helvetica() -> Dictionary {
        dictionary! {
            "Font" => dictionary! {
                "F1" => dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                },
                "F2" => dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica-Bold",
                },
            },
        }
    }

    #[test]
    fn text_run_position_size_and_color() {
        let (doc, page) = page_with(
            "BT /F1 12 Tf 0.85 0.85 0.85 rg 72 700 Td (Hello world) Tj ET",
            helvetica(),
        );
        let content = interpret_page(&doc, page).unwrap();
        assert_eq!(content.runs.len(), 1);
        let run = &content.runs[0];
        assert_eq!(run.text, "Hello world");
        assert_eq!(run.font_size, 12.0);
        assert_eq!(run.color, Rgb::new(217, 217, 217));
        assert!(!run.bold);
        assert_eq!(run.bbox.x0, 72.0);
        assert_eq!(run.bbox.y0, 697.0);
        assert_eq!(run.bbox.y1, 709.0);
        assert_eq!(run.bbox.x1, 72.0 + 11.0 * 6.0);

        let words: Vec<&str> = content.words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(words, vec!["Hello", "world"]);
        assert_eq!(content.words[1].bbox.x0, 72.0 + 6.0 * 6.0);
    }

    #[test]
    fn matrices_scale_font_size() {
        let (doc, page) = page_with(
            "q 2 0 0 2 0 0 cm BT /F2 10 Tf 1 0 0 1 10 10 Tm (Big) Tj ET Q",
            helvetica(),
        );
        let content = interpret_page(&doc, page).unwrap();
        let run = &content.runs[0];
        assert_eq!(run.font_size, 20.0);
        assert!(run.bold);
        assert_eq!(run.bbox.x0, 20.0);
    }

    #[test]
    fn tj_array_gap_splits_words() {
        let (doc, page) = page_with("BT /F1 10 Tf 0 0 Td [(read)-300(more)] TJ ET", helvetica());
        let content = interpret_page(&doc, page).unwrap();
        assert_eq!(content.runs[0].text, "read more");
        assert_eq!(content.words.len(), 2);
    }

    #[test]
    fn fills_and_q_restores_color() {
        let (doc, page) = page_with(
            "q 0 0 1 rg 10 20 100 50 re f Q 50 50 m 60 60 l S BT /F1 12 Tf 0 0 Td (x) Tj ET",
            helvetica(),
        );
        let content = interpret_page(&doc, page).unwrap();
        assert_eq!(content.fills.len(), 1);
        assert_eq!(content.fills[0].rect, Rect::new(10.0, 20.0, 110.0, 70.0));
        assert_eq!(content.fills[0].color, Rgb::new(0, 0, 255));
        assert_eq!(content.runs[0].color, Rgb::BLACK);
    }

    #[test]
    fn images_record_first_placement_and_mcid() {
        let mut doc_resources = helvetica();
        let mut doc = Document::with_version("1.7");
        let image = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 40,
                "Height" => 30,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0; 1200],
        ));
        doc_resources.set("XObject", dictionary! { "Im1" => image });
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            b"/Figure <</MCID 3>> BDC q 80 0 0 60 100 200 cm /Im1 Do Q EMC q 8 0 0 8 0 0 cm /Im1 Do Q"
                .to_vec(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Contents" => content_id,
            "Resources" => doc_resources,
        });

        let content = interpret_page(&doc, page_id).unwrap();
        assert_eq!(content.images.len(), 1);
        let first = &content.images[0];
        assert_eq!(first.object_number, image.0);
        assert_eq!((first.width, first.height), (40, 30));
        assert_eq!(first.rect, Rect::new(100.0, 200.0, 180.0, 260.0));
        assert_eq!(first.mcid, Some(3));
    }

    #[test]
    fn invisible_render_mode_is_flagged() {
        let (doc, page) = page_with("BT /F1 12 Tf 3 Tr 72 72 Td (hidden) Tj ET", helvetica());
        let content = interpret_page(&doc, page).unwrap();
        assert!(content.runs[0].invisible);
    }

    #[test]
    fn missing_font_uses_fallback_metrics() {
        let (doc, page) = page_with("BT /F9 10 Tf 0 0 Td (abc) Tj ET", Dictionary::new());
        let content = interpret_page(&doc, page).unwrap();
        assert_eq!(content.runs[0].font_name, "Unknown");
        assert_eq!(content.runs[0].bbox.x1, 15.0);
    }
}
