//! Resolution of `{type, id}` relationship stubs against a match document.

use crate::models::match_document::{
    AssetRecord, MatchDocument, ParticipantRecord, Relationship, Relationships, Resource,
    ResourceKind, ResourceRef, RosterRecord,
};
use std::collections::HashMap;

/// Lookup table over a document's `included` bag, built once per document.
///
/// When `included` repeats a `(type, id)` pair the first record wins.
pub struct RecordIndex<'a> {
    document: &'a MatchDocument,
    records: HashMap<(ResourceKind, &'a str), &'a Resource>,
}

impl<'a> RecordIndex<'a> {
    pub fn build(document: &'a MatchDocument) -> Self {
        let mut records = HashMap::with_capacity(document.included.len());
        for resource in &document.included {
            if let Some(key) = resource.key() {
                records.entry(key).or_insert(resource);
            }
        }
        RecordIndex { document, records }
    }

    pub fn resolve(&self, kind: &str, id: &str) -> Option<&'a Resource> {
        let kind = ResourceKind::parse(kind)?;
        self.records.get(&(kind, id)).copied()
    }

    pub fn resolve_ref(&self, stub: &ResourceRef) -> Option<&'a Resource> {
        self.resolve(&stub.kind, &stub.id)
    }

    /// Records behind the `name` relationship, in relationship order.
    /// Stubs that point at nothing are skipped.
    pub fn related(&self, relationships: &Relationships, name: &str) -> Vec<&'a Resource> {
        relationships
            .get(name)
            .map(Relationship::refs)
            .unwrap_or_default()
            .iter()
            .filter_map(|stub| self.resolve_ref(stub))
            .collect()
    }

    /// Rosters listed on the match itself.
    pub fn rosters(&self) -> Vec<&'a RosterRecord> {
        self.related(&self.document.data.relationships, "rosters")
            .into_iter()
            .filter_map(|resource| match resource {
                Resource::Roster(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    pub fn assets(&self) -> Vec<&'a AssetRecord> {
        self.related(&self.document.data.relationships, "assets")
            .into_iter()
            .filter_map(|resource| match resource {
                Resource::Asset(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    pub fn participants_of(&self, roster: &RosterRecord) -> Vec<&'a ParticipantRecord> {
        self.related(&roster.relationships, "participants")
            .into_iter()
            .filter_map(|resource| match resource {
                Resource::Participant(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl MatchDocument {
    pub fn index(&self) -> RecordIndex<'_> {
        RecordIndex::build(self)
    }
}
