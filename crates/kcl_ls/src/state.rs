use dashmap::DashMap;
use tower_lsp::lsp_types::Url;

use crate::document::DocumentState;

/// Global server state: the open-document table, shared across all
/// requests. Mutations (`open`/`change`/`close`) are totally ordered by the
/// arrival of the owning JSON-RPC message; `DashMap` gives lock-free reads
/// for everything else.
pub struct ServerState {
    pub documents: DashMap<Url, DocumentState>,
}

impl ServerState {
    pub fn new() -> Self {
        ServerState { documents: DashMap::new() }
    }

    pub fn open_document(&self, uri: Url, source: String, version: i32) {
        self.documents.insert(uri, DocumentState::new(source, version));
    }

    pub fn change_document(&self, uri: &Url, source: String, version: i32) {
        if let Some(mut doc) = self.documents.get_mut(uri) {
            doc.update(source, version);
        }
    }

    pub fn close_document(&self, uri: &Url) {
        self.documents.remove(uri);
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
