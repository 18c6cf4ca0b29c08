//! In-memory document registry
//!
//! Holds indexed documents for the lifetime of the process, bounded by LRU
//! eviction. Documents are Arc-shared: an in-flight extraction keeps its
//! document alive even if a concurrent upload evicts the registry entry.

use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lru::LruCache;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::pdf::TokenMap;

/// One indexed document, immutable once registered.
#[derive(Debug)]
pub struct IndexedDocument {
    pub file_id: Uuid,
    pub token_map: TokenMap,
    /// Newline-joined block texts, page order; the completion call's input
    pub full_text: String,
    /// SHA-256 of the uploaded bytes
    pub checksum: String,
    pub page_count: u32,
    pub indexed_at: DateTime<Utc>,
}

/// Registry of indexed documents keyed by file id.
pub struct DocumentStore {
    documents: RwLock<LruCache<Uuid, Arc<IndexedDocument>>>,
}

impl DocumentStore {
    /// Create a registry holding at most `capacity` documents.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least 1");
        Self {
            documents: RwLock::new(LruCache::new(capacity)),
        }
    }

    /// Register an indexed document and return the shared record.
    pub fn insert(
        &self,
        raw_bytes: &[u8],
        page_count: u32,
        token_map: TokenMap,
    ) -> Arc<IndexedDocument> {
        let full_text = token_map
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let document = Arc::new(IndexedDocument {
            file_id: Uuid::new_v4(),
            token_map,
            full_text,
            checksum: hex::encode(Sha256::digest(raw_bytes)),
            page_count,
            indexed_at: Utc::now(),
        });

        self.documents
            .write()
            .put(document.file_id, Arc::clone(&document));
        document
    }

    /// Fetch a document, refreshing its LRU position.
    pub fn get(&self, file_id: &Uuid) -> Option<Arc<IndexedDocument>> {
        self.documents.write().get(file_id).cloned()
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::TextBlock;

    fn block(text: &str) -> TextBlock {
        TextBlock {
            page: 1,
            x0: 0.0,
            y0: 0.0,
            x1: 100.0,
            y1: 12.0,
            text: text.to_string(),
            block_index: 0,
        }
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let store = DocumentStore::new(4);
        let document = store.insert(b"raw pdf bytes", 2, vec![block("alpha"), block("beta")]);

        let fetched = store.get(&document.file_id).expect("document registered");
        assert_eq!(fetched.file_id, document.file_id);
        assert_eq!(fetched.full_text, "alpha\nbeta");
        assert_eq!(fetched.page_count, 2);
        assert_eq!(fetched.checksum.len(), 64);
    }

    #[test]
    fn test_unknown_id_is_none() {
        let store = DocumentStore::new(4);
        assert!(store.get(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_lru_eviction_beyond_capacity() {
        let store = DocumentStore::new(2);
        let first = store.insert(b"one", 1, vec![block("one")]);
        let second = store.insert(b"two", 1, vec![block("two")]);
        let third = store.insert(b"three", 1, vec![block("three")]);

        assert_eq!(store.len(), 2);
        assert!(store.get(&first.file_id).is_none());
        assert!(store.get(&second.file_id).is_some());
        assert!(store.get(&third.file_id).is_some());
    }

    #[test]
    fn test_evicted_documents_stay_alive_through_arc() {
        let store = DocumentStore::new(1);
        let first = store.insert(b"one", 1, vec![block("one")]);
        store.insert(b"two", 1, vec![block("two")]);

        // Registry entry is gone, but the record itself is still usable.
        assert!(store.get(&first.file_id).is_none());
        assert_eq!(first.full_text, "one");
    }
}
