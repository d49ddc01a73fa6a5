use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::error::ResolveError;

/// Key under which a node points at another node of the same document.
pub const REF_KEY: &str = "$ref";

/// Resolves local `$ref` pointers in a document tree, producing a new tree.
///
/// The source document is only borrowed, so node identity is the address of
/// the borrowed `Value`. Nodes currently being expanded are tracked to cut
/// cycles: a reference back into one of them is left as-is. Subtrees that
/// expanded without hitting a cut are memoized and reused when the same node
/// is reached again through another reference.
pub struct RefResolver<'a> {
    document: &'a Value,
    expanding: HashSet<*const Value>,
    memo: HashMap<*const Value, Value>,
    cuts: usize,
}

impl<'a> RefResolver<'a> {
    pub fn new(document: &'a Value) -> Self {
        Self {
            document,
            expanding: HashSet::new(),
            memo: HashMap::new(),
            cuts: 0,
        }
    }

    /// Resolve every reference under `node`.
    pub fn resolve(&mut self, node: &'a Value) -> Result<Value, ResolveError> {
        if !matches!(node, Value::Array(_) | Value::Object(_)) {
            return Ok(node.clone());
        }

        let id = node as *const Value;
        if let Some(done) = self.memo.get(&id) {
            return Ok(done.clone());
        }

        let cuts_before = self.cuts;
        self.expanding.insert(id);
        let result = match node {
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(fields) => match fields.get(REF_KEY) {
                Some(Value::String(reference)) => self.resolve_reference(node, reference, fields),
                _ => self.resolve_fields(fields).map(Value::Object),
            },
            _ => unreachable!("scalars return early"),
        };
        self.expanding.remove(&id);

        let resolved = result?;
        if self.cuts == cuts_before {
            self.memo.insert(id, resolved.clone());
        }
        Ok(resolved)
    }

    fn resolve_fields(
        &mut self,
        fields: &'a Map<String, Value>,
    ) -> Result<Map<String, Value>, ResolveError> {
        let mut resolved = Map::with_capacity(fields.len());
        for (key, value) in fields {
            resolved.insert(key.clone(), self.resolve(value)?);
        }
        Ok(resolved)
    }

    fn resolve_reference(
        &mut self,
        node: &'a Value,
        reference: &str,
        fields: &'a Map<String, Value>,
    ) -> Result<Value, ResolveError> {
        let target = resolve_ref(reference, self.document)?;
        if self.expanding.contains(&(target as *const Value)) {
            log::debug!("cycle through {reference}, keeping reference");
            self.cuts += 1;
            return Ok(node.clone());
        }
        log::trace!("following {reference}");

        let mut merged = match self.resolve(target)? {
            Value::Object(target_fields) => target_fields,
            other => {
                if fields.len() > 1 {
                    log::debug!("{reference} does not point at an object, dropping sibling fields");
                }
                return Ok(other);
            }
        };

        // Sibling fields of the referencing node win over the target's.
        for (key, value) in fields {
            if key == REF_KEY {
                continue;
            }
            merged.insert(key.clone(), self.resolve(value)?);
        }
        Ok(Value::Object(merged))
    }
}

/// Resolve every reference in `node` against `document`.
pub fn resolve_refs(node: &Value, document: &Value) -> Result<Value, ResolveError> {
    RefResolver::new(document).resolve(node)
}

/// Look up a local pointer like `#/definitions/Pet` in `document`.
///
/// Segments are plain keys; a numeric segment also indexes into a sequence.
/// The returned value is borrowed from the document, not copied.
pub fn resolve_ref<'a>(reference: &str, document: &'a Value) -> Result<&'a Value, ResolveError> {
    let mut segments = reference.split('/');
    if segments.next() != Some("#") {
        return Err(ResolveError::InvalidReferenceFormat(reference.to_string()));
    }

    let mut current = document;
    for segment in segments {
        let next = match current {
            Value::Object(fields) => fields.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        current = match next {
            Some(Value::Null) | None => {
                return Err(ResolveError::InvalidReference(reference.to_string()));
            }
            Some(value) => value,
        };
    }
    Ok(current)
}
