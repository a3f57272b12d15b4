#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

fn page_id(doc: &LopdfDocument, page_number: u32) -> ObjectId {
    *doc.get_pages()
        .get(&page_number)
        .unwrap_or_else(|| panic!("page {} missing", page_number))
}

fn resolve_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok().and_then(|o| o.as_dict().ok()),
        other => other.as_dict().ok(),
    }
}

/// Decodes the concatenated content streams of a page.
pub fn page_operations(doc: &LopdfDocument, page_number: u32) -> Vec<Operation> {
    let bytes = doc.get_page_content(page_id(doc, page_number)).unwrap();
    Content::decode(&bytes).unwrap().operations
}

pub fn page_operators(doc: &LopdfDocument, page_number: u32) -> Vec<String> {
    page_operations(doc, page_number)
        .into_iter()
        .map(|op| op.operator)
        .collect()
}

pub fn count_operator(doc: &LopdfDocument, page_number: u32, operator: &str) -> usize {
    page_operators(doc, page_number)
        .iter()
        .filter(|op| op.as_str() == operator)
        .count()
}

/// Every string shown with `Tj` on a page, in paint order.
pub fn shown_text(doc: &LopdfDocument, page_number: u32) -> Vec<String> {
    page_operations(doc, page_number)
        .into_iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        })
        .collect()
}

/// Operands of each `re` operator on a page, in paint order.
pub fn rectangles(doc: &LopdfDocument, page_number: u32) -> Vec<[f32; 4]> {
    page_operations(doc, page_number)
        .into_iter()
        .filter(|op| op.operator == "re")
        .map(|op| {
            let mut values = [0.0; 4];
            for (slot, operand) in values.iter_mut().zip(&op.operands) {
                *slot = operand.as_float().unwrap();
            }
            values
        })
        .collect()
}

/// Names in one resource category (`Font`, `XObject`, `ExtGState`) of a page.
pub fn resource_names(doc: &LopdfDocument, page_number: u32, category: &str) -> Vec<String> {
    let page = doc.get_dictionary(page_id(doc, page_number)).unwrap();
    let Some(resources) = page.get(b"Resources").ok().and_then(|r| resolve_dict(doc, r)) else {
        return Vec::new();
    };
    let Some(entries) = resources.get(category.as_bytes()).ok().and_then(|c| resolve_dict(doc, c)) else {
        return Vec::new();
    };
    entries
        .iter()
        .map(|(name, _)| String::from_utf8_lossy(name).into_owned())
        .collect()
}

/// Number of image XObjects anywhere in the file, soft masks included.
pub fn image_object_count(doc: &LopdfDocument) -> usize {
    doc.objects
        .values()
        .filter(|obj| match obj {
            Object::Stream(stream) => stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .is_ok_and(|name| name == b"Image"),
            _ => false,
        })
        .count()
}

pub fn assert_operator_order(doc: &LopdfDocument, page_number: u32, expected: &[&str]) {
    let operators = page_operators(doc, page_number);
    let mut cursor = 0;
    for want in expected {
        match operators[cursor..].iter().position(|op| op == want) {
            Some(offset) => cursor += offset + 1,
            None => panic!("operator '{}' not found in order within {:?}", want, operators),
        }
    }
}

/// `(name, fill alpha)` for each graphics state on a page, sorted by name.
pub fn ext_g_state_alphas(doc: &LopdfDocument, page_number: u32) -> Vec<(String, f32)> {
    let page = doc.get_dictionary(page_id(doc, page_number)).unwrap();
    let Some(resources) = page.get(b"Resources").ok().and_then(|r| resolve_dict(doc, r)) else {
        return Vec::new();
    };
    let Some(states) = resources.get(b"ExtGState").ok().and_then(|c| resolve_dict(doc, c)) else {
        return Vec::new();
    };
    let mut alphas: Vec<(String, f32)> = states
        .iter()
        .map(|(name, state)| {
            let alpha = resolve_dict(doc, state)
                .and_then(|d| d.get(b"ca").ok())
                .and_then(|a| a.as_float().ok())
                .unwrap_or(1.0);
            (String::from_utf8_lossy(name).into_owned(), alpha)
        })
        .collect();
    alphas.sort_by(|a, b| a.0.cmp(&b.0));
    alphas
}
