//! Document writes used by remediation

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::accessor::DocumentAccessor;
use crate::document::PdfDocument;
use crate::error::PdfError;
use crate::objects::{as_dict, get_dict, inherited, real};
use crate::text::{encode_text_string, encode_win_ansi};

/// Placement of an invisible text layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayout {
    pub margin: f64,
    pub font_size: f64,
    pub leading: f64,
}

impl Default for OverlayLayout {
    fn default() -> Self {
        Self {
            margin: 72.0,
            font_size: 12.0,
            leading: 14.0,
        }
    }
}

impl PdfDocument {
    fn dict_mut(&mut self, id: ObjectId) -> Result<&mut Dictionary, PdfError> {
        self.doc
            .get_object_mut(id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| PdfError::Malformed(format!("object {} {} R: {e}", id.0, id.1)))
    }

    /// Set `/Title` in the document information dictionary.
    pub fn set_title(&mut self, title: &str) -> Result<(), PdfError> {
        let existing = self.doc.trailer.get(b"Info").ok().cloned();
        let info_id = match existing {
            Some(Object::Reference(id)) if self.doc.get_dictionary(id).is_ok() => id,
            Some(Object::Dictionary(inline)) => self.doc.add_object(inline),
            _ => self.doc.add_object(Dictionary::new()),
        };
        self.doc.trailer.set("Info", Object::Reference(info_id));
        self.dict_mut(info_id)?
            .set("Title", encode_text_string(title));
        debug!(title, "set document title");
        Ok(())
    }

    /// Ask viewers to show the title instead of the file name.
    pub fn set_display_doc_title(&mut self) -> Result<(), PdfError> {
        let catalog_id = self.catalog_id()?;
        let existing = self
            .dict_mut(catalog_id)?
            .get(b"ViewerPreferences")
            .ok()
            .cloned();
        match existing {
            Some(Object::Reference(id)) => {
                self.dict_mut(id)?.set("DisplayDocTitle", true);
            }
            Some(Object::Dictionary(mut prefs)) => {
                prefs.set("DisplayDocTitle", true);
                self.dict_mut(catalog_id)?.set("ViewerPreferences", prefs);
            }
            _ => {
                self.dict_mut(catalog_id)?.set(
                    "ViewerPreferences",
                    dictionary! { "DisplayDocTitle" => true },
                );
            }
        }
        Ok(())
    }

    /// Set the catalog `/Lang` entry.
    pub fn set_language(&mut self, language: &str) -> Result<(), PdfError> {
        let catalog_id = self.catalog_id()?;
        self.dict_mut(catalog_id)?
            .set("Lang", encode_text_string(language));
        debug!(language, "set document language");
        Ok(())
    }

    /// Append lines of render-mode-3 text to a page, top to bottom.
    ///
    /// Returns how many lines fit; the rest are dropped at the bottom margin.
    pub fn append_invisible_text(
        &mut self,
        page: usize,
        lines: &[String],
        layout: OverlayLayout,
    ) -> Result<usize, PdfError> {
        let page_id = self.page_id(page)?;
        let (_, height) = self.page_size(page);

        let font_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let font_name = self.install_font(page_id, font_id)?;

        let mut operations = vec![
            Operation::new("q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(font_name.into_bytes()), real(layout.font_size)],
            ),
            Operation::new("Tr", vec![3.into()]),
        ];
        let mut y = height - layout.margin - layout.font_size;
        let mut written = 0;
        for line in lines {
            if y < layout.margin {
                break;
            }
            operations.push(Operation::new(
                "Tm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    real(layout.margin),
                    real(y),
                ],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(line), StringFormat::Literal)],
            ));
            y -= layout.leading;
            written += 1;
        }
        operations.push(Operation::new("ET", vec![]));
        operations.push(Operation::new("Q", vec![]));
        if written < lines.len() {
            debug!(page, written, total = lines.len(), "text layer truncated at page bottom");
        }

        let encoded = Content { operations }
            .encode()
            .map_err(|e| PdfError::SaveError(format!("encode text layer: {e}")))?;
        self.append_content(page_id, encoded)?;
        self.invalidate_content();
        Ok(written)
    }

    /// Copy the page's effective resources onto the page and add a font.
    fn install_font(&mut self, page_id: ObjectId, font_id: ObjectId) -> Result<String, PdfError> {
        let page = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| PdfError::Malformed(format!("page dictionary: {e}")))?;
        let mut resources = inherited(&self.doc, page, b"Resources")
            .and_then(as_dict)
            .cloned()
            .unwrap_or_default();
        let mut fonts = get_dict(&self.doc, &resources, b"Font")
            .cloned()
            .unwrap_or_default();

        let mut name = "FOcr".to_string();
        let mut suffix = 1;
        while fonts.has(name.as_bytes()) {
            name = format!("FOcr{suffix}");
            suffix += 1;
        }
        fonts.set(name.clone(), Object::Reference(font_id));
        resources.set("Font", fonts);
        self.dict_mut(page_id)?.set("Resources", resources);
        Ok(name)
    }

    /// Add a content stream after the existing ones, isolating prior state.
    fn append_content(&mut self, page_id: ObjectId, data: Vec<u8>) -> Result<(), PdfError> {
        let existing = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| PdfError::Malformed(format!("page dictionary: {e}")))?
            .get(b"Contents")
            .ok()
            .cloned();
        let mut streams: Vec<Object> = match existing {
            Some(Object::Reference(id)) => match self.doc.get_object(id) {
                Ok(Object::Array(items)) => items.clone(),
                _ => vec![Object::Reference(id)],
            },
            Some(Object::Array(items)) => items,
            _ => Vec::new(),
        };

        let overlay = if streams.is_empty() {
            data
        } else {
            let save_id = self
                .doc
                .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
            streams.insert(0, Object::Reference(save_id));
            let mut wrapped = b"\nQ\n".to_vec();
            wrapped.extend(data);
            wrapped
        };
        let overlay_id = self.doc.add_object(Stream::new(Dictionary::new(), overlay));
        streams.push(Object::Reference(overlay_id));
        self.dict_mut(page_id)?.set("Contents", streams);
        Ok(())
    }

    /// Serialize the document.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, PdfError> {
        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }

    /// Write to `path` through a temporary file in the same directory, so
    /// the target is either fully replaced or left untouched.
    pub fn save_atomic(&mut self, path: &Path) -> Result<(), PdfError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| PdfError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        self.doc
            .save_to(&mut tmp)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        tmp.persist(path)
            .map_err(|e| PdfError::SaveError(format!("{}: {}", path.display(), e.error)))?;
        debug!(path = %path.display(), "saved PDF");
        Ok(())
    }
}
