//! Page-order merge of fetched PDF segments
//!
//! Every page of every segment is deep-copied into one new document. Segment
//! order and page order inside a segment are both preserved.

use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{BTreeMap, HashMap};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Page tree depth after which inheritance lookup gives up
const MAX_TREE_DEPTH: usize = 32;

/// Parse each fetched segment and merge them in the given order
pub fn merge_pdfs(segments: &[Vec<u8>]) -> Result<Document> {
    let documents = segments
        .iter()
        .enumerate()
        .map(|(i, bytes)| {
            Document::load_mem(bytes).map_err(|e| ExportError::Merge {
                index: i + 1,
                message: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    merge_documents(&documents)
}

/// Append every page of every document, in order, to a new document
pub fn merge_documents(documents: &[Document]) -> Result<Document> {
    if documents.is_empty() {
        return Err(ExportError::NoSegments);
    }

    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();
    let mut page_refs = Vec::new();

    for (i, source) in documents.iter().enumerate() {
        let pages = source.get_pages();
        if pages.is_empty() {
            return Err(ExportError::Merge {
                index: i + 1,
                message: "document has no pages".to_string(),
            });
        }

        // Object ids are only meaningful within one source document
        let mut cache = reserve_page_ids(&mut output, source, &pages, pages_tree_id);
        for page_id in pages.into_values() {
            let new_id = copy_page(&mut output, source, page_id, pages_tree_id, &mut cache)?;
            page_refs.push(Object::Reference(new_id));
        }
    }

    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));
    output.trailer.set("Root", catalog_id);

    log::info!(
        "Merged {} segments into {} pages",
        documents.len(),
        count
    );
    Ok(output)
}

/// Serialize a document
pub fn document_to_bytes(mut doc: Document) -> Result<Vec<u8>> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

/// Copy one page under `parent`, resolving inherited attributes
fn copy_page(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    parent: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;
    let new_id = match cache.get(&page_id) {
        Some(&id) => id,
        None => {
            let id = output.new_object_id();
            cache.insert(page_id, id);
            id
        }
    };

    let mut new_dict = Dictionary::new();
    for (key, value) in page_dict.iter() {
        if key.as_slice() == b"Parent" {
            continue;
        }
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }

    for key in INHERITABLE {
        if new_dict.has(key) {
            continue;
        }
        if let Some(value) = inherited_attribute(source, page_dict, key) {
            new_dict.set(key.to_vec(), copy_object_deep(output, source, &value, cache)?);
        }
    }

    new_dict.set("Parent", Object::Reference(parent));
    output.objects.insert(new_id, Object::Dictionary(new_dict));
    Ok(new_id)
}

/// Map every page of `source` to a fresh id and every page tree node to `pages_tree_id`.
///
/// References to a page that is copied later resolve to that same copy.
fn reserve_page_ids(
    output: &mut Document,
    source: &Document,
    pages: &BTreeMap<u32, ObjectId>,
    pages_tree_id: ObjectId,
) -> HashMap<ObjectId, ObjectId> {
    let mut cache = HashMap::new();
    for &page_id in pages.values() {
        cache.insert(page_id, output.new_object_id());

        let mut parent_id = source
            .get_dictionary(page_id)
            .ok()
            .and_then(|page| page.get(b"Parent").and_then(Object::as_reference).ok());
        for _ in 0..MAX_TREE_DEPTH {
            let Some(id) = parent_id else { break };
            cache.entry(id).or_insert(pages_tree_id);
            parent_id = source
                .get_dictionary(id)
                .ok()
                .and_then(|node| node.get(b"Parent").and_then(Object::as_reference).ok());
        }
    }
    cache
}

/// Look an attribute up through the page's ancestors
fn inherited_attribute(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent_id = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(parent_id?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent_id = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// Deep copy an object from source to output document, following references.
///
/// Ids are reserved before the referenced object is copied, so reference
/// cycles terminate.
fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let copied = match source.get_object(*id) {
                Ok(referenced) => copy_object_deep(output, source, referenced, cache)?,
                // Dangling references read as null
                Err(_) => Object::Null,
            };
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}
