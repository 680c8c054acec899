//! Page-level PDF merging.
//!
//! Pages of every following document are deep copied into the first one:
//! each referenced object gets a fresh id in the target, and the copied pages
//! are appended to the target's root page tree.

use crate::error::ServiceError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"Resources", b"CropBox", b"Rotate"];

/// Malformed page trees can loop through `Parent`.
const MAX_TREE_DEPTH: usize = 64;

/// Copies objects from one document into another, each at most once.
struct ObjectCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document, target: &'a mut Document) -> Self {
        ObjectCopier {
            source,
            target,
            id_map: HashMap::new(),
        }
    }

    fn copy_object(&mut self, source_id: ObjectId) -> Result<ObjectId, lopdf::Error> {
        if let Some(&target_id) = self.id_map.get(&source_id) {
            return Ok(target_id);
        }
        let object = self.source.get_object(source_id)?.clone();
        self.copy_as(source_id, object)
    }

    /// Copies `object` as the replacement for `source_id`.
    fn copy_as(&mut self, source_id: ObjectId, object: Object) -> Result<ObjectId, lopdf::Error> {
        // registered before recursing so reference cycles resolve to this id
        let new_id = self.target.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);

        let remapped = self.remap_references(object)?;
        self.target.objects.insert(new_id, remapped);
        Ok(new_id)
    }

    fn remap_references(&mut self, object: Object) -> Result<Object, lopdf::Error> {
        match object {
            Object::Reference(id) => Ok(Object::Reference(self.copy_object(id)?)),
            Object::Array(items) => {
                let items = items
                    .into_iter()
                    .map(|item| self.remap_references(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Object::Array(items))
            }
            Object::Dictionary(mut dict) => {
                for (_, value) in dict.iter_mut() {
                    *value = self.remap_references(value.clone())?;
                }
                Ok(Object::Dictionary(dict))
            }
            Object::Stream(mut stream) => {
                for (_, value) in stream.dict.iter_mut() {
                    *value = self.remap_references(value.clone())?;
                }
                Ok(Object::Stream(stream))
            }
            other => Ok(other),
        }
    }
}

/// Merges `documents` in order and serializes the result.
pub fn merge(documents: Vec<Document>) -> Result<Vec<u8>, ServiceError> {
    let mut documents = documents.into_iter();
    let mut target = documents
        .next()
        .ok_or_else(|| ServiceError::BadRequest("No PDF documents to merge".to_string()))?;

    for source in documents {
        append_pages(&mut target, &source)?;
    }

    let mut out = Vec::new();
    target.save_to(&mut out)?;
    Ok(out)
}

fn append_pages(target: &mut Document, source: &Document) -> Result<(), lopdf::Error> {
    let root_id = target.trailer.get(b"Root")?.as_reference()?;
    let pages_id = target.get_object(root_id)?.as_dict()?.get(b"Pages")?.as_reference()?;

    let mut copied = Vec::new();
    {
        let mut copier = ObjectCopier::new(source, target);
        // get_pages is keyed by page number, so values come out in page order
        for page_id in source.get_pages().into_values() {
            let page = detached_page(source, page_id)?;
            copied.push(copier.copy_as(page_id, Object::Dictionary(page))?);
        }
    }
    if copied.is_empty() {
        return Ok(());
    }

    for &page_id in &copied {
        target
            .get_object_mut(page_id)?
            .as_dict_mut()?
            .set("Parent", Object::Reference(pages_id));
    }

    let pages = target.get_object_mut(pages_id)?.as_dict_mut()?;
    let count = pages.get(b"Count")?.as_i64()?;
    let mut kids = pages.get(b"Kids")?.as_array()?.clone();
    kids.extend(copied.iter().map(|&id| Object::Reference(id)));
    pages.set("Kids", Object::Array(kids));
    pages.set("Count", count + copied.len() as i64);
    Ok(())
}

/// The page dictionary with its inherited attributes made explicit and its
/// `Parent` link dropped, so copying it does not drag the source page tree
/// along.
fn detached_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary, lopdf::Error> {
    let mut page = doc.get_object(page_id)?.as_dict()?.clone();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let Some(node_id) = parent else { break };
        let node = doc.get_object(node_id)?.as_dict()?;
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key, value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    page.remove(b"Parent");
    Ok(page)
}
