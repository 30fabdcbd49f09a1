use common::ObjectId;
use serde_json::Value;

/// A stored document: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, Value>;

/// Field under which the store keeps a document's identifier.
pub const ID_FIELD: &str = "_id";

/// Counts reported by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// Documents that matched the identifier.
    pub matched: u64,

    /// Documents whose contents actually changed.
    pub modified: u64,
}

impl UpdateOutcome {
    /// Outcome for an identifier that matched nothing.
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Returns true if a document matched.
    pub fn is_matched(&self) -> bool {
        self.matched > 0
    }

    /// Returns true if a document changed.
    pub fn is_modified(&self) -> bool {
        self.modified > 0
    }
}

/// Returns a copy of `document` carrying `id` under [`ID_FIELD`].
pub fn with_id(id: ObjectId, mut document: Document) -> Document {
    document.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
    document
}

/// Reads the identifier stored under [`ID_FIELD`].
pub fn document_id(document: &Document) -> Option<ObjectId> {
    document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .and_then(|raw| ObjectId::parse_str(raw).ok())
}

/// Overwrites the top-level keys of `target` with those of `fields`.
///
/// Keys absent from `fields` are left alone and `_id` is never touched.
/// Returns true if anything changed.
pub fn apply_set(target: &mut Document, fields: &Document) -> bool {
    let mut changed = false;
    for (key, value) in fields {
        if key == ID_FIELD {
            continue;
        }
        if target.get(key) != Some(value) {
            target.insert(key.clone(), value.clone());
            changed = true;
        }
    }
    changed
}
