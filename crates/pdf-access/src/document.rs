//! lopdf-backed document accessor

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, warn};

use crate::accessor::DocumentAccessor;
use crate::error::PdfError;
use crate::interpreter::interpret_page;
use crate::model::{
    ContentItem, DocumentMetadata, FillRect, ImageRef, LinkAnnotation, LinkTarget, Lookup,
    PageContent, StructElement, TextRun, Widget, Word,
};
use crate::objects::{
    as_dict, get, get_array, get_dict, get_name, get_text, inherited, lookup, name_of, rect_of,
    resolve,
};
use crate::text::decode_text_string;

const DEFAULT_PAGE_SIZE: (f64, f64) = (612.0, 792.0);
const MAX_OUTLINE_DEPTH: usize = 64;
const MAX_FIELD_DEPTH: usize = 32;
const MAX_ROLE_HOPS: usize = 8;

/// An opened PDF.
///
/// Page content is interpreted once, on first access, and cached until a
/// write changes it.
pub struct PdfDocument {
    pub(crate) doc: Document,
    path: Option<PathBuf>,
    pages: Vec<ObjectId>,
    content: OnceCell<Vec<PageContent>>,
}

impl PdfDocument {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PdfError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| PdfError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut document = Self::load_mem(&bytes)?;
        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    pub fn load_mem(bytes: &[u8]) -> Result<Self, PdfError> {
        let doc = Document::load_mem(bytes).map_err(|e| PdfError::ParseError(e.to_string()))?;
        Self::from_document(doc)
    }

    pub fn from_document(doc: Document) -> Result<Self, PdfError> {
        if doc.trailer.has(b"Encrypt") {
            return Err(PdfError::Encrypted);
        }
        if doc.trailer.get(b"Root").is_err() {
            return Err(PdfError::Malformed("trailer has no /Root".to_string()));
        }
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        debug!(pages = pages.len(), "loaded PDF");
        Ok(Self {
            doc,
            path: None,
            pages,
            content: OnceCell::new(),
        })
    }

    /// Where the document was opened from, if it came from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Interpreted content of a page.
    pub fn page_content(&self, page: usize) -> Option<&PageContent> {
        self.content
            .get_or_init(|| {
                self.pages
                    .iter()
                    .enumerate()
                    .map(|(index, id)| {
                        interpret_page(&self.doc, *id).unwrap_or_else(|e| {
                            warn!(page = index + 1, error = %e, "could not interpret page content");
                            PageContent::default()
                        })
                    })
                    .collect()
            })
            .get(page)
    }

    pub(crate) fn invalidate_content(&mut self) {
        self.content = OnceCell::new();
    }

    pub(crate) fn page_id(&self, page: usize) -> Result<ObjectId, PdfError> {
        self.pages
            .get(page)
            .copied()
            .ok_or(PdfError::PageOutOfRange {
                page,
                count: self.pages.len(),
            })
    }

    pub(crate) fn catalog_id(&self) -> Result<ObjectId, PdfError> {
        self.doc
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .map_err(|_| PdfError::Malformed("catalog is not an indirect object".to_string()))
    }

    fn catalog(&self) -> Option<&Dictionary> {
        self.doc
            .trailer
            .get(b"Root")
            .ok()
            .and_then(|root| resolve(&self.doc, root))
            .and_then(as_dict)
    }

    fn page_dict(&self, page: usize) -> Option<&Dictionary> {
        let id = self.pages.get(page)?;
        self.doc.get_dictionary(*id).ok()
    }

    fn page_index_of(&self, id: ObjectId) -> Option<usize> {
        self.pages.iter().position(|p| *p == id)
    }

    fn annotations(&self, page: usize) -> Vec<&Dictionary> {
        let Some(page) = self.page_dict(page) else {
            return Vec::new();
        };
        get_array(&self.doc, page, b"Annots")
            .map(|annots| {
                annots
                    .iter()
                    .filter_map(|a| resolve(&self.doc, a).and_then(as_dict))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn link_target(&self, annot: &Dictionary) -> Option<LinkTarget> {
        if let Some(action) = get_dict(&self.doc, annot, b"A") {
            match get_name(&self.doc, action, b"S").as_deref() {
                Some("URI") => return get_text(&self.doc, action, b"URI").map(LinkTarget::Uri),
                Some("GoTo") => {
                    return action.get(b"D").ok().and_then(|d| self.destination(d));
                }
                Some("GoToR") | Some("Launch") => {
                    return Some(LinkTarget::Remote(
                        self.file_spec(action).unwrap_or_else(|| "external file".to_string()),
                    ));
                }
                other => debug!(action = ?other, "unsupported link action"),
            }
        }
        annot.get(b"Dest").ok().and_then(|d| self.destination(d))
    }

    fn destination(&self, dest: &Object) -> Option<LinkTarget> {
        match resolve(&self.doc, dest)? {
            Object::Array(items) => match items.first()? {
                Object::Reference(id) => self.page_index_of(*id).map(LinkTarget::Page),
                Object::Integer(n) => usize::try_from(*n).ok().map(LinkTarget::Page),
                _ => None,
            },
            Object::Name(name) => Some(LinkTarget::Named(
                String::from_utf8_lossy(name).into_owned(),
            )),
            Object::String(bytes, _) => Some(LinkTarget::Named(decode_text_string(bytes))),
            Object::Dictionary(dict) => dict.get(b"D").ok().and_then(|d| self.destination(d)),
            _ => None,
        }
    }

    fn file_spec(&self, action: &Dictionary) -> Option<String> {
        match get(&self.doc, action, b"F")? {
            Object::String(bytes, _) => Some(decode_text_string(bytes)),
            Object::Dictionary(spec) => get_text(&self.doc, spec, b"UF")
                .or_else(|| get_text(&self.doc, spec, b"F")),
            _ => None,
        }
    }

    /// A field attribute looked up on the widget and then its parent fields.
    fn field_attribute<'a>(&'a self, widget: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        let mut current = widget;
        for _ in 0..MAX_FIELD_DEPTH {
            if let Some(value) = get(&self.doc, current, key) {
                return Some(value);
            }
            current = get_dict(&self.doc, current, b"Parent")?;
        }
        None
    }

    fn qualified_name(&self, widget: &Dictionary) -> Option<String> {
        let mut parts = Vec::new();
        let mut current = Some(widget);
        for _ in 0..MAX_FIELD_DEPTH {
            let Some(dict) = current else { break };
            if let Some(partial) = get_text(&self.doc, dict, b"T") {
                parts.push(partial);
            }
            current = get_dict(&self.doc, dict, b"Parent");
        }
        if parts.is_empty() {
            return None;
        }
        parts.reverse();
        Some(parts.join("."))
    }

    fn role_map(&self) -> HashMap<String, String> {
        let Some(tree) = self
            .catalog()
            .and_then(|c| get_dict(&self.doc, c, b"StructTreeRoot"))
        else {
            return HashMap::new();
        };
        let Some(map) = get_dict(&self.doc, tree, b"RoleMap") else {
            return HashMap::new();
        };
        map.iter()
            .filter_map(|(key, value)| {
                let target = name_of(resolve(&self.doc, value)?)?;
                Some((String::from_utf8_lossy(key).into_owned(), target))
            })
            .collect()
    }

    fn struct_content(&self, elem: &Dictionary) -> (Vec<ContentItem>, bool) {
        let page = elem
            .get(b"Pg")
            .ok()
            .and_then(|pg| pg.as_reference().ok())
            .and_then(|id| self.page_index_of(id));
        let Ok(kids) = elem.get(b"K") else {
            return (Vec::new(), false);
        };
        let mut items = Vec::new();
        let has_kids = match kids {
            Object::Null => false,
            Object::Array(list) => {
                for kid in list {
                    self.push_kid(kid, page, &mut items);
                }
                !list.is_empty()
            }
            other => {
                self.push_kid(other, page, &mut items);
                true
            }
        };
        (items, has_kids)
    }

    fn push_kid(&self, kid: &Object, page: Option<usize>, items: &mut Vec<ContentItem>) {
        match kid {
            Object::Integer(mcid) => items.push(ContentItem::MarkedContent { page, mcid: *mcid }),
            Object::Reference(id) => match self.doc.get_object(*id) {
                Ok(Object::Dictionary(dict)) => {
                    match get_name(&self.doc, dict, b"Type").as_deref() {
                        Some("MCR") | Some("OBJR") => self.push_kid_dict(dict, page, items),
                        _ => items.push(ContentItem::Element(id.0)),
                    }
                }
                _ => debug!(object = id.0, "structure kid is not a dictionary"),
            },
            Object::Dictionary(dict) => self.push_kid_dict(dict, page, items),
            _ => {}
        }
    }

    fn push_kid_dict(&self, dict: &Dictionary, page: Option<usize>, items: &mut Vec<ContentItem>) {
        let page = dict
            .get(b"Pg")
            .ok()
            .and_then(|pg| pg.as_reference().ok())
            .and_then(|id| self.page_index_of(id))
            .or(page);
        match get_name(&self.doc, dict, b"Type").as_deref() {
            Some("MCR") => {
                if let Some(Object::Integer(mcid)) = get(&self.doc, dict, b"MCID") {
                    items.push(ContentItem::MarkedContent { page, mcid: *mcid });
                }
            }
            Some("OBJR") => {
                if let Ok(Object::Reference(id)) = dict.get(b"Obj") {
                    items.push(ContentItem::Object(id.0));
                }
            }
            _ => {}
        }
    }
}

fn count_outline_items(
    doc: &Document,
    first: Option<&Object>,
    visited: &mut HashSet<ObjectId>,
    depth: usize,
) -> usize {
    if depth > MAX_OUTLINE_DEPTH {
        return 0;
    }
    let mut count = 0;
    let mut next = first.and_then(|o| o.as_reference().ok());
    while let Some(id) = next {
        if !visited.insert(id) {
            break;
        }
        let Ok(item) = doc.get_dictionary(id) else {
            break;
        };
        count += 1;
        count += count_outline_items(doc, item.get(b"First").ok(), visited, depth + 1);
        next = item.get(b"Next").ok().and_then(|o| o.as_reference().ok());
    }
    count
}

impl DocumentAccessor for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, page: usize) -> (f64, f64) {
        self.page_dict(page)
            .and_then(|dict| inherited(&self.doc, dict, b"MediaBox"))
            .and_then(|media| rect_of(&self.doc, media))
            .map(|rect| (rect.width(), rect.height()))
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    fn text_runs(&self, page: usize) -> &[TextRun] {
        self.page_content(page)
            .map(|c| c.runs.as_slice())
            .unwrap_or_default()
    }

    fn words(&self, page: usize) -> &[Word] {
        self.page_content(page)
            .map(|c| c.words.as_slice())
            .unwrap_or_default()
    }

    fn images(&self, page: usize) -> &[ImageRef] {
        self.page_content(page)
            .map(|c| c.images.as_slice())
            .unwrap_or_default()
    }

    fn fills(&self, page: usize) -> &[FillRect] {
        self.page_content(page)
            .map(|c| c.fills.as_slice())
            .unwrap_or_default()
    }

    fn links(&self, page: usize) -> Vec<LinkAnnotation> {
        self.annotations(page)
            .into_iter()
            .filter(|annot| get_name(&self.doc, annot, b"Subtype").as_deref() == Some("Link"))
            .filter_map(|annot| {
                let rect = annot.get(b"Rect").ok().and_then(|r| rect_of(&self.doc, r))?;
                let target = self.link_target(annot)?;
                Some(LinkAnnotation { rect, target })
            })
            .collect()
    }

    fn widgets(&self, page: usize) -> Vec<Widget> {
        self.annotations(page)
            .into_iter()
            .filter(|annot| get_name(&self.doc, annot, b"Subtype").as_deref() == Some("Widget"))
            .filter_map(|annot| {
                let rect = annot.get(b"Rect").ok().and_then(|r| rect_of(&self.doc, r))?;
                let text_of = |obj: &Object| match obj {
                    Object::String(bytes, _) => Some(decode_text_string(bytes)),
                    _ => None,
                };
                Some(Widget {
                    name: self.qualified_name(annot),
                    label: self.field_attribute(annot, b"TU").and_then(text_of),
                    tooltip: get_text(&self.doc, annot, b"Contents"),
                    field_type: self
                        .field_attribute(annot, b"FT")
                        .and_then(name_of),
                    rect,
                })
            })
            .collect()
    }

    fn metadata(&self) -> DocumentMetadata {
        let Some(info) = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|i| resolve(&self.doc, i))
            .and_then(as_dict)
        else {
            return DocumentMetadata::default();
        };
        let text = |key: &[u8]| get_text(&self.doc, info, key);
        DocumentMetadata {
            title: text(b"Title"),
            author: text(b"Author"),
            subject: text(b"Subject"),
            keywords: text(b"Keywords"),
            creator: text(b"Creator"),
            producer: text(b"Producer"),
        }
    }

    fn catalog_value(&self, key: &str) -> Lookup {
        match self.catalog() {
            Some(catalog) => lookup(&self.doc, catalog, key.as_bytes()),
            None => Lookup::Malformed("document catalog is unreadable".to_string()),
        }
    }

    fn page_value(&self, page: usize, key: &str) -> Lookup {
        match self.page_dict(page) {
            Some(dict) => lookup(&self.doc, dict, key.as_bytes()),
            None => Lookup::Absent,
        }
    }

    fn outline_count(&self) -> usize {
        let Some(outlines) = self
            .catalog()
            .and_then(|c| get_dict(&self.doc, c, b"Outlines"))
        else {
            return 0;
        };
        let mut visited = HashSet::new();
        count_outline_items(&self.doc, outlines.get(b"First").ok(), &mut visited, 0)
    }

    fn struct_elements(&self) -> Vec<StructElement> {
        let roles = self.role_map();
        let mut elements = Vec::new();
        for (id, object) in &self.doc.objects {
            let Object::Dictionary(dict) = object else {
                continue;
            };
            if !matches!(
                get_name(&self.doc, dict, b"Type").as_deref(),
                None | Some("StructElem")
            ) {
                continue;
            }
            let Some(raw_role) = get_name(&self.doc, dict, b"S") else {
                continue;
            };
            let mut role = raw_role;
            for _ in 0..MAX_ROLE_HOPS {
                match roles.get(&role) {
                    Some(mapped) if *mapped != role => role = mapped.clone(),
                    _ => break,
                }
            }
            let (content, has_kids) = self.struct_content(dict);
            elements.push(StructElement {
                object_number: id.0,
                role,
                alt: get_text(&self.doc, dict, b"Alt"),
                content,
                has_kids,
            });
        }
        elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixtureBuilder;
    use a11y_types::Rect;
    use pretty_assertions::assert_eq;

    #[test]
    fn garbage_bytes_fail_to_load() {
        let result = PdfDocument::load_mem(b"not a pdf at all");
        assert!(matches!(result, Err(PdfError::ParseError(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = PdfDocument::open("/nonexistent/definitely/missing.pdf");
        assert!(matches!(result, Err(PdfError::Io { .. })));
    }

    #[test]
    fn reads_metadata_and_catalog_keys() {
        let bytes = FixtureBuilder::new()
            .title("Quarterly Report")
            .language("en-US")
            .build();
        let doc = PdfDocument::load_mem(&bytes).unwrap();
        assert_eq!(doc.metadata().title.as_deref(), Some("Quarterly Report"));
        assert_eq!(doc.catalog_value("Lang"), Lookup::Found("en-US".into()));
        assert_eq!(doc.catalog_value("StructTreeRoot"), Lookup::Absent);
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.page_size(0), (612.0, 792.0));
    }

    #[test]
    fn sample_text_is_interpreted() {
        let bytes = FixtureBuilder::new().pages(2).build();
        let doc = PdfDocument::load_mem(&bytes).unwrap();
        assert_eq!(doc.text_runs(1).len(), 1);
        assert!(doc.text_runs(1)[0].text.contains("page 2"));
        assert!(doc.text_runs(7).is_empty());
    }

    #[test]
    fn links_and_widgets_are_read() {
        let link_rect = Rect::new(72.0, 390.0, 160.0, 410.0);
        let bytes = FixtureBuilder::new()
            .link(0, link_rect, "https://example.com/a")
            .widget(0, Rect::new(72.0, 300.0, 200.0, 320.0), Some("email"), None)
            .widget(0, Rect::new(72.0, 250.0, 200.0, 270.0), None, Some("Phone number"))
            .build();
        let doc = PdfDocument::load_mem(&bytes).unwrap();

        let links = doc.links(0);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].rect, link_rect);
        assert_eq!(links[0].target, LinkTarget::Uri("https://example.com/a".into()));

        let widgets = doc.widgets(0);
        assert_eq!(widgets.len(), 2);
        assert_eq!(widgets[0].name.as_deref(), Some("email"));
        assert_eq!(widgets[0].field_type.as_deref(), Some("Tx"));
        assert_eq!(widgets[1].name, None);
        assert_eq!(widgets[1].label.as_deref(), Some("Phone number"));
        assert_eq!(widgets[1].tooltip, None);
    }

    #[test]
    fn outline_entries_are_counted() {
        let bytes = FixtureBuilder::new()
            .pages(3)
            .bookmark("Introduction")
            .bookmark("Results")
            .build();
        let doc = PdfDocument::load_mem(&bytes).unwrap();
        assert_eq!(doc.outline_count(), 2);
    }

    #[test]
    fn figure_elements_expose_alt_and_mcid() {
        let bytes = FixtureBuilder::new()
            .tagged()
            .image_with_alt(0, 100, 80, Rect::new(100.0, 500.0, 200.0, 580.0), "Sales chart")
            .build();
        let doc = PdfDocument::load_mem(&bytes).unwrap();
        let figures: Vec<StructElement> = doc
            .struct_elements()
            .into_iter()
            .filter(|e| e.role == "Figure")
            .collect();
        assert_eq!(figures.len(), 1);
        assert_eq!(figures[0].alt.as_deref(), Some("Sales chart"));
        assert!(figures[0].has_kids);
        assert_eq!(
            figures[0].content,
            vec![ContentItem::MarkedContent {
                page: Some(0),
                mcid: 0
            }]
        );
        assert_eq!(doc.images(0)[0].mcid, Some(0));
        assert!(doc.catalog_value("StructTreeRoot").present().is_some());
    }

    #[test]
    fn role_map_resolves_custom_headings() {
        let bytes = FixtureBuilder::new()
            .tagged()
            .heading_with_role("Heading1", "H1")
            .build();
        let doc = PdfDocument::load_mem(&bytes).unwrap();
        let roles: Vec<String> = doc.struct_elements().into_iter().map(|e| e.role).collect();
        assert!(roles.contains(&"H1".to_string()), "roles: {roles:?}");
        assert!(!roles.contains(&"Heading1".to_string()));
    }
}
