//! Per-view media lists shared between the grids and the viewer launcher.

use api_client::MediaRecord;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Logical view whose media list is tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaContext {
    Browse,
    Search,
}

impl MediaContext {
    pub const ALL: [MediaContext; 2] = [MediaContext::Browse, MediaContext::Search];
}

impl std::fmt::Display for MediaContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MediaContext::Browse => "browse",
            MediaContext::Search => "search",
        };
        write!(f, "{}", s)
    }
}

/// Cloneable handle to the context → list map.
///
/// Lists are stored as immutable slices and swapped wholesale on `put`, so a
/// reader holding the result of `get` is never affected by later updates.
#[derive(Debug, Clone, Default)]
pub struct MediaListRegistry {
    lists: Arc<RwLock<HashMap<MediaContext, Arc<[MediaRecord]>>>>,
}

impl MediaListRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, context: MediaContext, list: Vec<MediaRecord>) {
        tracing::debug!("Registry: {} now holds {} item(s)", context, list.len());
        let list: Arc<[MediaRecord]> = list.into();
        let mut lists = self.lists.write().unwrap_or_else(|e| e.into_inner());
        lists.insert(context, list);
    }

    /// Current list for `context`, empty if nothing was stored yet.
    pub fn get(&self, context: MediaContext) -> Arc<[MediaRecord]> {
        let lists = self.lists.read().unwrap_or_else(|e| e.into_inner());
        lists
            .get(&context)
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    pub fn len(&self, context: MediaContext) -> usize {
        self.get(context).len()
    }
}
