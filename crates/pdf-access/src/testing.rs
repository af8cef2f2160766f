//! Synthetic PDFs for tests
//!
//! Builds small documents with lopdf covering the features the checks look
//! at. Every page gets a line of dark sample text unless disabled.

use std::path::Path;

use a11y_types::Rect;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::model::Rgb;
use crate::objects::real;
use crate::text::{encode_text_string, encode_win_ansi};

#[derive(Debug, Clone)]
struct FixtureText {
    page: usize,
    x: f64,
    y: f64,
    size: f64,
    text: String,
    color: Rgb,
    bold: bool,
}

#[derive(Debug, Clone)]
struct FixtureImage {
    page: usize,
    width: u32,
    height: u32,
    rect: Rect,
    alt: Option<String>,
}

#[derive(Debug, Clone)]
struct FixtureWidget {
    page: usize,
    rect: Rect,
    name: Option<String>,
    label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FixtureBuilder {
    pages: usize,
    page_size: (f64, f64),
    sample_text: bool,
    title: Option<String>,
    language: Option<String>,
    tagged: bool,
    texts: Vec<FixtureText>,
    images: Vec<FixtureImage>,
    fills: Vec<(usize, Rect, Rgb)>,
    links: Vec<(usize, Rect, String)>,
    widgets: Vec<FixtureWidget>,
    /// (role written to /S, standard role it maps to through /RoleMap)
    headings: Vec<(String, Option<String>)>,
    tabs: Option<String>,
    bookmarks: Vec<String>,
}

impl Default for FixtureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureBuilder {
    pub fn new() -> Self {
        Self {
            pages: 1,
            page_size: (612.0, 792.0),
            sample_text: true,
            title: None,
            language: None,
            tagged: false,
            texts: Vec::new(),
            images: Vec::new(),
            fills: Vec::new(),
            links: Vec::new(),
            widgets: Vec::new(),
            headings: Vec::new(),
            tabs: None,
            bookmarks: Vec::new(),
        }
    }

    pub fn pages(mut self, count: usize) -> Self {
        self.pages = count.max(1);
        self
    }

    pub fn page_size(mut self, width: f64, height: f64) -> Self {
        self.page_size = (width, height);
        self
    }

    pub fn without_sample_text(mut self) -> Self {
        self.sample_text = false;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    /// Add a structure tree and `/MarkInfo`.
    pub fn tagged(mut self) -> Self {
        self.tagged = true;
        self
    }

    /// Black Helvetica text with its baseline at (x, y).
    pub fn text(self, page: usize, x: f64, y: f64, size: f64, text: &str) -> Self {
        self.styled_text(page, x, y, size, text, Rgb::BLACK, false)
    }

    pub fn styled_text(
        mut self,
        page: usize,
        x: f64,
        y: f64,
        size: f64,
        text: &str,
        color: Rgb,
        bold: bool,
    ) -> Self {
        self.texts.push(FixtureText {
            page,
            x,
            y,
            size,
            text: text.to_string(),
            color,
            bold,
        });
        self
    }

    /// A filled rectangle, painted before any text on the page.
    pub fn fill(mut self, page: usize, rect: Rect, color: Rgb) -> Self {
        self.fills.push((page, rect, color));
        self
    }

    pub fn image(mut self, page: usize, width: u32, height: u32, rect: Rect) -> Self {
        self.images.push(FixtureImage {
            page,
            width,
            height,
            rect,
            alt: None,
        });
        self
    }

    /// An image tagged as a Figure carrying `/Alt`. Implies `tagged()`.
    pub fn image_with_alt(mut self, page: usize, width: u32, height: u32, rect: Rect, alt: &str) -> Self {
        self.tagged = true;
        self.images.push(FixtureImage {
            page,
            width,
            height,
            rect,
            alt: Some(alt.to_string()),
        });
        self
    }

    pub fn link(mut self, page: usize, rect: Rect, uri: &str) -> Self {
        self.links.push((page, rect, uri.to_string()));
        self
    }

    /// A text-field widget with optional `/T` and `/TU`.
    pub fn widget(mut self, page: usize, rect: Rect, name: Option<&str>, label: Option<&str>) -> Self {
        self.widgets.push(FixtureWidget {
            page,
            rect,
            name: name.map(str::to_string),
            label: label.map(str::to_string),
        });
        self
    }

    /// A heading structure element such as `H1`. Implies `tagged()`.
    pub fn heading(mut self, role: &str) -> Self {
        self.tagged = true;
        self.headings.push((role.to_string(), None));
        self
    }

    /// A structure element with a custom role mapped to a standard one.
    pub fn heading_with_role(mut self, custom: &str, standard: &str) -> Self {
        self.tagged = true;
        self.headings
            .push((custom.to_string(), Some(standard.to_string())));
        self
    }

    /// Set `/Tabs` on every page.
    pub fn tabs(mut self, order: &str) -> Self {
        self.tabs = Some(order.to_string());
        self
    }

    pub fn bookmark(mut self, title: &str) -> Self {
        self.bookmarks.push(title.to_string());
        self
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.build())
    }

    pub fn build(&self) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let catalog_id = doc.new_object_id();
        let page_ids: Vec<ObjectId> = (0..self.pages).map(|_| doc.new_object_id()).collect();
        let struct_root_id = doc.new_object_id();
        let document_elem_id = doc.new_object_id();

        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut struct_kids: Vec<Object> = Vec::new();
        let mut field_refs: Vec<Object> = Vec::new();

        for (index, &page_id) in page_ids.iter().enumerate() {
            let mut ops = Vec::new();
            let mut xobjects = Dictionary::new();
            let mut annots: Vec<Object> = Vec::new();
            let mut next_mcid = 0i64;

            for (_, rect, color) in self.fills.iter().filter(|f| f.0 == index) {
                ops.push(Operation::new("q", vec![]));
                ops.push(color_op(*color));
                ops.push(Operation::new(
                    "re",
                    vec![
                        real(rect.x0),
                        real(rect.y0),
                        real(rect.width()),
                        real(rect.height()),
                    ],
                ));
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }

            if self.sample_text {
                let sample = FixtureText {
                    page: index,
                    x: 72.0,
                    y: 720.0,
                    size: 12.0,
                    text: format!("Sample text on page {}.", index + 1),
                    color: Rgb::BLACK,
                    bold: false,
                };
                push_text(&mut ops, &sample);
            }
            for text in self.texts.iter().filter(|t| t.page == index) {
                push_text(&mut ops, text);
            }

            for (n, image) in self.images.iter().filter(|i| i.page == index).enumerate() {
                let name = format!("Im{}", n + 1);
                let image_id = doc.add_object(Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => i64::from(image.width),
                        "Height" => i64::from(image.height),
                        "ColorSpace" => "DeviceGray",
                        "BitsPerComponent" => 8,
                    },
                    vec![0x80; (image.width as usize) * (image.height as usize)],
                ));
                xobjects.set(name.clone(), Object::Reference(image_id));

                let mcid = self.tagged.then(|| {
                    let mcid = next_mcid;
                    next_mcid += 1;
                    mcid
                });
                if let Some(mcid) = mcid {
                    ops.push(Operation::new(
                        "BDC",
                        vec![
                            Object::Name(b"Figure".to_vec()),
                            Object::Dictionary(dictionary! { "MCID" => mcid }),
                        ],
                    ));
                    let mut figure = dictionary! {
                        "Type" => "StructElem",
                        "S" => "Figure",
                        "P" => document_elem_id,
                        "Pg" => page_id,
                        "K" => mcid,
                    };
                    if let Some(alt) = &image.alt {
                        figure.set("Alt", encode_text_string(alt));
                    }
                    struct_kids.push(Object::Reference(doc.add_object(figure)));
                }
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        real(image.rect.width()),
                        0.into(),
                        0.into(),
                        real(image.rect.height()),
                        real(image.rect.x0),
                        real(image.rect.y0),
                    ],
                ));
                ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
                ops.push(Operation::new("Q", vec![]));
                if mcid.is_some() {
                    ops.push(Operation::new("EMC", vec![]));
                }
            }

            for (_, rect, uri) in self.links.iter().filter(|l| l.0 == index) {
                annots.push(Object::Reference(doc.add_object(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Link",
                    "Rect" => rect_object(rect),
                    "Border" => vec![0.into(), 0.into(), 0.into()],
                    "A" => dictionary! {
                        "S" => "URI",
                        "URI" => Object::string_literal(uri.as_str()),
                    },
                })));
            }

            for widget in self.widgets.iter().filter(|w| w.page == index) {
                let mut annot = dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Widget",
                    "FT" => "Tx",
                    "F" => 4,
                    "Rect" => rect_object(&widget.rect),
                    "P" => page_id,
                };
                if let Some(name) = &widget.name {
                    annot.set("T", encode_text_string(name));
                }
                if let Some(label) = &widget.label {
                    annot.set("TU", encode_text_string(label));
                }
                let id = doc.add_object(annot);
                annots.push(Object::Reference(id));
                field_refs.push(Object::Reference(id));
            }

            let content = Content { operations: ops }.encode().unwrap_or_default();
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), real(self.page_size.0), real(self.page_size.1)],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => regular, "F2" => bold },
                    "XObject" => xobjects,
                },
            };
            if !annots.is_empty() {
                page.set("Annots", annots);
            }
            if let Some(tabs) = &self.tabs {
                page.set("Tabs", Object::Name(tabs.clone().into_bytes()));
            }
            doc.objects.insert(page_id, Object::Dictionary(page));
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
                "Count" => page_ids.len() as i64,
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };

        if let Some(language) = &self.language {
            catalog.set("Lang", encode_text_string(language));
        }

        if self.tagged {
            let mut role_map = Dictionary::new();
            for (role, standard) in &self.headings {
                if let Some(standard) = standard {
                    role_map.set(role.clone(), Object::Name(standard.clone().into_bytes()));
                }
                struct_kids.push(Object::Reference(doc.add_object(dictionary! {
                    "Type" => "StructElem",
                    "S" => Object::Name(role.clone().into_bytes()),
                    "P" => document_elem_id,
                    "K" => Vec::<Object>::new(),
                })));
            }
            doc.objects.insert(
                document_elem_id,
                Object::Dictionary(dictionary! {
                    "Type" => "StructElem",
                    "S" => "Document",
                    "P" => struct_root_id,
                    "K" => struct_kids,
                }),
            );
            let mut root = dictionary! {
                "Type" => "StructTreeRoot",
                "K" => document_elem_id,
            };
            if !role_map.is_empty() {
                root.set("RoleMap", role_map);
            }
            doc.objects.insert(struct_root_id, Object::Dictionary(root));
            catalog.set("StructTreeRoot", struct_root_id);
            catalog.set("MarkInfo", dictionary! { "Marked" => true });
        }

        if !field_refs.is_empty() {
            catalog.set("AcroForm", dictionary! { "Fields" => field_refs });
        }

        if !self.bookmarks.is_empty() {
            let outlines_id = doc.new_object_id();
            let item_ids: Vec<ObjectId> = self.bookmarks.iter().map(|_| doc.new_object_id()).collect();
            for (i, (title, id)) in self.bookmarks.iter().zip(&item_ids).enumerate() {
                let target = page_ids[i % page_ids.len()];
                let mut item = dictionary! {
                    "Title" => encode_text_string(title),
                    "Parent" => outlines_id,
                    "Dest" => vec![Object::Reference(target), "Fit".into()],
                };
                if i > 0 {
                    item.set("Prev", item_ids[i - 1]);
                }
                if let Some(next) = item_ids.get(i + 1) {
                    item.set("Next", *next);
                }
                doc.objects.insert(*id, Object::Dictionary(item));
            }
            doc.objects.insert(
                outlines_id,
                Object::Dictionary(dictionary! {
                    "Type" => "Outlines",
                    "First" => item_ids[0],
                    "Last" => item_ids[item_ids.len() - 1],
                    "Count" => item_ids.len() as i64,
                }),
            );
            catalog.set("Outlines", outlines_id);
        }

        doc.objects.insert(catalog_id, Object::Dictionary(catalog));
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = &self.title {
            let info_id = doc.add_object(dictionary! { "Title" => encode_text_string(title) });
            doc.trailer.set("Info", info_id);
        }

        let mut buffer = Vec::new();
        // Writing to a Vec cannot fail for a document built in memory.
        let _ = doc.save_to(&mut buffer);
        buffer
    }
}

fn color_op(color: Rgb) -> Operation {
    let (r, g, b) = color.to_unit();
    Operation::new("rg", vec![real(r), real(g), real(b)])
}

fn push_text(ops: &mut Vec<Operation>, text: &FixtureText) {
    let font = if text.bold { "F2" } else { "F1" };
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), real(text.size)],
    ));
    ops.push(color_op(text.color));
    ops.push(Operation::new("Td", vec![real(text.x), real(text.y)]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(encode_win_ansi(&text.text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn rect_object(rect: &Rect) -> Object {
    Object::Array(rect.to_array().iter().map(|v| real(*v)).collect())
}
