//! Low-level page utilities for drawing on top of existing PDF pages.
//!
//! This crate provides page manipulation using lopdf:
//! - Inherited page attribute lookup (`MediaBox`, `Rotate`, `Resources`)
//! - Content overlaying with graphics-state isolation
//! - Merging new named resources into a page's resource dictionary

mod error;

pub use error::ComposerError;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::collections::{BTreeMap, BTreeSet};

/// Page trees deeper than this are treated as malformed.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Looks up a page attribute, walking `/Parent` links for inheritable keys.
///
/// References are not resolved; the returned object is exactly what the
/// nearest dictionary carrying `key` holds.
pub fn find_inherited(
    doc: &Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<Object>, ComposerError> {
    let mut current = Some(page_id);
    let mut depth = 0;

    while let Some(id) = current {
        let dict = doc.get_dictionary(id)?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value.clone()));
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();

        depth += 1;
        if depth > MAX_INHERITANCE_DEPTH {
            log::warn!("Page tree above {:?} exceeds {} levels", page_id, MAX_INHERITANCE_DEPTH);
            break;
        }
    }

    Ok(None)
}

/// Follows a single indirect reference.
pub fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, ComposerError> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

fn resolve_dict(doc: &Document, key: &str, obj: &Object) -> Result<Dictionary, ComposerError> {
    match resolve(doc, obj)? {
        Object::Dictionary(dict) => Ok(dict.clone()),
        other => Err(ComposerError::UnexpectedType {
            key: key.to_string(),
            found: kind_of(other).to_string(),
        }),
    }
}

fn kind_of(obj: &Object) -> &'static str {
    match obj {
        Object::Null => "null",
        Object::Boolean(_) => "boolean",
        Object::Integer(_) => "integer",
        Object::Real(_) => "real",
        Object::Name(_) => "name",
        Object::String(..) => "string",
        Object::Array(_) => "array",
        Object::Dictionary(_) => "dictionary",
        Object::Stream(_) => "stream",
        Object::Reference(_) => "reference",
    }
}

/// The resource dictionary in effect for a page, with inheritance applied.
///
/// A page with no resources anywhere in its ancestry gets an empty dictionary.
pub fn effective_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary, ComposerError> {
    match find_inherited(doc, page_id, b"Resources")? {
        Some(obj) => resolve_dict(doc, "Resources", &obj),
        None => Ok(Dictionary::new()),
    }
}

/// Every resource name in effect on a page, across all categories.
pub fn used_resource_names(doc: &Document, page_id: ObjectId) -> Result<BTreeSet<String>, ComposerError> {
    let resources = effective_resources(doc, page_id)?;
    let mut names = BTreeSet::new();
    for (category, obj) in resources.iter() {
        let Ok(Object::Dictionary(entries)) = resolve(doc, obj) else {
            continue;
        };
        log::trace!("{} name(s) under /{}", entries.len(), String::from_utf8_lossy(category));
        names.extend(entries.iter().map(|(name, _)| String::from_utf8_lossy(name).into_owned()));
    }
    Ok(names)
}

/// Named resources to add to a page, grouped by category (`Font`, `XObject`,
/// `ExtGState`, ...).
#[derive(Debug, Default, Clone)]
pub struct PageResources {
    categories: BTreeMap<String, Vec<(String, Object)>>,
}

impl PageResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, category: &str, name: impl Into<String>, value: impl Into<Object>) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .push((name.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

/// Merges `additions` into the page's resources.
///
/// The effective (possibly inherited or shared) dictionary is copied onto the
/// page as a direct object first, so pages that shared it are left untouched.
/// Re-adding an entry that points at the same object is a no-op; a name
/// already bound to a different object is a [`ComposerError::NameConflict`]
/// and nothing is written.
pub fn merge_page_resources(
    doc: &mut Document,
    page_id: ObjectId,
    additions: &PageResources,
) -> Result<(), ComposerError> {
    if additions.is_empty() {
        return Ok(());
    }

    let mut resources = effective_resources(doc, page_id)?;

    for (category, entries) in &additions.categories {
        let mut sub = match resources.get(category.as_bytes()) {
            Ok(obj) => resolve_dict(doc, category, obj)?,
            Err(_) => Dictionary::new(),
        };
        for (name, value) in entries {
            if let Ok(existing) = sub.get(name.as_bytes()) {
                let same = matches!(
                    (existing.as_reference(), value.as_reference()),
                    (Ok(a), Ok(b)) if a == b
                );
                if !same {
                    return Err(ComposerError::NameConflict {
                        category: category.clone(),
                        name: name.clone(),
                    });
                }
            }
            sub.set(name.as_bytes().to_vec(), value.clone());
        }
        resources.set(category.as_bytes().to_vec(), Object::Dictionary(sub));
    }

    page_dict_mut(doc, page_id)?.set("Resources", Object::Dictionary(resources));
    Ok(())
}

fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary, ComposerError> {
    doc.get_object_mut(page_id)?
        .as_dict_mut()
        .map_err(|_| ComposerError::NotAPage(page_id))
}

/// The page's content streams as a flat list of objects, in paint order.
fn existing_contents(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>, ComposerError> {
    let page = doc.get_dictionary(page_id)?;
    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match contents {
        Object::Array(arr) => Ok(arr.clone()),
        Object::Reference(id) => match doc.get_object(*id)? {
            // An indirect array of streams.
            Object::Array(arr) => Ok(arr.clone()),
            _ => Ok(vec![contents.clone()]),
        },
        other => Ok(vec![other.clone()]),
    }
}

/// Adds a new content stream on top of an existing page.
///
/// The existing content is wrapped in `q`/`Q` so any graphics state it
/// leaves behind (transforms, colors, clipping) cannot leak into the
/// overlay. The overlay itself is appended last so it paints above.
///
/// # Arguments
/// * `doc` - The document containing the page to modify.
/// * `page_id` - The `ObjectId` of the page to add the overlay to.
/// * `content_stream` - The raw bytes of the new content stream.
pub fn overlay_content(
    doc: &mut Document,
    page_id: ObjectId,
    content_stream: Vec<u8>,
) -> Result<(), ComposerError> {
    let existing = existing_contents(doc, page_id)?;

    let mut new_contents = Vec::with_capacity(existing.len() + 3);
    if !existing.is_empty() {
        let save_id = doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
        let restore_id = doc.add_object(Stream::new(dictionary! {}, b"\nQ\n".to_vec()));
        new_contents.push(Object::Reference(save_id));
        new_contents.extend(existing);
        new_contents.push(Object::Reference(restore_id));
    }

    let overlay_id = doc.add_object(Stream::new(dictionary! {}, content_stream));
    new_contents.push(Object::Reference(overlay_id));

    page_dict_mut(doc, page_id)?.set("Contents", Object::Array(new_contents));
    Ok(())
}
