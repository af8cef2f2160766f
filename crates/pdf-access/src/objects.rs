//! Small helpers over lopdf objects: reference resolution, typed reads and
//! inherited page attributes.

use a11y_types::Rect;
use lopdf::{Dictionary, Document, Object};

use crate::model::Lookup;
use crate::text::decode_text_string;

const MAX_REF_CHAIN: usize = 32;
const MAX_PARENT_DEPTH: usize = 32;

/// Follow references until a direct object is reached.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    let mut current = obj;
    for _ in 0..MAX_REF_CHAIN {
        match current {
            Object::Reference(id) => current = doc.get_object(*id).ok()?,
            other => return Some(other),
        }
    }
    None
}

pub(crate) fn as_dict(obj: &Object) -> Option<&Dictionary> {
    match obj {
        Object::Dictionary(dict) => Some(dict),
        Object::Stream(stream) => Some(&stream.dict),
        _ => None,
    }
}

pub(crate) fn get<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    dict.get(key).ok().and_then(|obj| resolve(doc, obj))
}

pub(crate) fn get_dict<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Dictionary> {
    get(doc, dict, key).and_then(as_dict)
}

pub(crate) fn get_array<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Vec<Object>> {
    match get(doc, dict, key)? {
        Object::Array(items) => Some(items),
        _ => None,
    }
}

pub(crate) fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

pub(crate) fn get_number(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<f64> {
    get(doc, dict, key).and_then(number)
}

pub(crate) fn get_int(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<i64> {
    match get(doc, dict, key)? {
        Object::Integer(i) => Some(*i),
        Object::Real(r) => Some(*r as i64),
        _ => None,
    }
}

pub(crate) fn name_of(obj: &Object) -> Option<String> {
    match obj {
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

pub(crate) fn get_name(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    get(doc, dict, key).and_then(name_of)
}

/// Text value of a key; accepts strings and names.
pub(crate) fn get_text(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    match get(doc, dict, key)? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

pub(crate) fn rect_of(doc: &Document, obj: &Object) -> Option<Rect> {
    let Object::Array(items) = resolve(doc, obj)? else {
        return None;
    };
    let values: Vec<f64> = items
        .iter()
        .filter_map(|item| resolve(doc, item).and_then(number))
        .collect();
    match values[..] {
        [a, b, c, d] => Some(Rect::from_corners(a, b, c, d)),
        _ => None,
    }
}

/// Look up a page attribute that may be inherited from the page tree.
pub(crate) fn inherited<'a>(
    doc: &'a Document,
    page: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = page;
    for _ in 0..MAX_PARENT_DEPTH {
        if let Some(value) = get(doc, current, key) {
            return Some(value);
        }
        current = get_dict(doc, current, b"Parent")?;
    }
    None
}

/// Read a raw key for the catalog/page lookups.
pub(crate) fn lookup(doc: &Document, dict: &Dictionary, key: &[u8]) -> Lookup {
    let Ok(raw) = dict.get(key) else {
        return Lookup::Absent;
    };
    match raw {
        Object::Null => Lookup::Absent,
        Object::Reference(id) => match resolve(doc, raw) {
            Some(Object::Null) => Lookup::Absent,
            // Indirect scalars (`/Tabs 12 0 R`) read as their value
            Some(
                value @ (Object::Name(_)
                | Object::String(..)
                | Object::Integer(_)
                | Object::Real(_)
                | Object::Boolean(_)),
            ) => Lookup::Found(render(value)),
            Some(_) => Lookup::Found(format!("{} {} R", id.0, id.1)),
            None => Lookup::Malformed(format!("dangling reference {} {} R", id.0, id.1)),
        },
        other => Lookup::Found(render(other)),
    }
}

/// Render an object roughly as PDF syntax; strings are decoded.
pub(crate) fn render(obj: &Object) -> String {
    match obj {
        Object::Null => "null".to_string(),
        Object::Boolean(b) => b.to_string(),
        Object::Integer(i) => i.to_string(),
        Object::Real(r) => r.to_string(),
        Object::Name(name) => format!("/{}", String::from_utf8_lossy(name)),
        Object::String(bytes, _) => decode_text_string(bytes),
        Object::Array(items) => {
            let inner: Vec<String> = items.iter().map(render).collect();
            format!("[{}]", inner.join(" "))
        }
        Object::Dictionary(dict) => render_dict(dict),
        Object::Stream(stream) => format!("{} stream", render_dict(&stream.dict)),
        Object::Reference(id) => format!("{} {} R", id.0, id.1),
    }
}

fn render_dict(dict: &Dictionary) -> String {
    if dict.is_empty() {
        return "<<>>".to_string();
    }
    let entries: Vec<String> = dict
        .iter()
        .map(|(key, value)| format!("/{} {}", String::from_utf8_lossy(key), render(value)))
        .collect();
    format!("<< {} >>", entries.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_renders_names_and_dicts() {
        let doc = Document::with_version("1.7");
        let dict = dictionary! {
            "Tabs" => "S",
            "MarkInfo" => dictionary! { "Marked" => true },
            "Lang" => Object::string_literal("en-GB"),
            "Empty" => Object::Null,
        };
        assert_eq!(lookup(&doc, &dict, b"Tabs"), Lookup::Found("/S".into()));
        assert_eq!(
            lookup(&doc, &dict, b"MarkInfo"),
            Lookup::Found("<< /Marked true >>".into())
        );
        assert_eq!(lookup(&doc, &dict, b"Lang"), Lookup::Found("en-GB".into()));
        assert_eq!(lookup(&doc, &dict, b"Empty"), Lookup::Absent);
        assert_eq!(lookup(&doc, &dict, b"Missing"), Lookup::Absent);
    }

    #[test]
    fn dangling_reference_is_malformed() {
        let doc = Document::with_version("1.7");
        let dict = dictionary! { "StructTreeRoot" => Object::Reference((99, 0)) };
        assert!(lookup(&doc, &dict, b"StructTreeRoot").is_malformed());
    }

    #[test]
    fn indirect_names_read_as_their_value() {
        let mut doc = Document::with_version("1.7");
        let tabs = doc.add_object(Object::Name(b"S".to_vec()));
        let lang = doc.add_object(Object::string_literal("fr-CA"));
        let root = doc.add_object(dictionary! { "Type" => "StructTreeRoot" });
        let dict = dictionary! { "Tabs" => tabs, "Lang" => lang, "StructTreeRoot" => root };
        assert_eq!(lookup(&doc, &dict, b"Tabs"), Lookup::Found("/S".into()));
        assert_eq!(lookup(&doc, &dict, b"Lang"), Lookup::Found("fr-CA".into()));
        assert_eq!(
            lookup(&doc, &dict, b"StructTreeRoot"),
            Lookup::Found(format!("{} {} R", root.0, root.1))
        );
    }

    #[test]
    fn inherited_walks_parents() {
        let mut doc = Document::with_version("1.7");
        let parent = doc.add_object(dictionary! {
            "Type" => "Pages",
            "MediaBox" => vec![0.into(), 0.into(), 300.into(), 400.into()],
        });
        let page = dictionary! { "Type" => "Page", "Parent" => parent };
        let media = inherited(&doc, &page, b"MediaBox").and_then(|o| rect_of(&doc, o));
        assert_eq!(media, Some(Rect::new(0.0, 0.0, 300.0, 400.0)));
        assert!(inherited(&doc, &page, b"Rotate").is_none());
    }
}
