//! Turns "the user tapped this item" into a positioned viewer session.

use api_client::MediaRecord;
use tokio::sync::mpsc;

use crate::registry::{MediaContext, MediaListRegistry};
use crate::session::{ViewerConfig, ViewerSession};
use crate::timer::HideElapsed;

/// Where the candidate list of a launch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    Explicit,
    Registry(MediaContext),
    Singleton,
}

/// Outcome of resolving a tap against the available lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Never empty.
    pub list: Vec<MediaRecord>,
    pub index: usize,
    pub source: CandidateSource,
    /// The tapped item was not found and the index defaulted to 0.
    pub index_fallback: bool,
}

/// Resolve the candidate list and position for a tapped item.
///
/// The explicit list wins when non-empty, then the registry entry for
/// `context`, then a list holding only the tapped item. A miss is not an
/// error: thumbnails may not have round-tripped yet, so the viewer opens on
/// the first item instead.
pub fn resolve(
    registry: &MediaListRegistry,
    context: Option<MediaContext>,
    clicked: &MediaRecord,
    explicit: Option<&[MediaRecord]>,
) -> Resolution {
    let (list, source) = match explicit.filter(|l| !l.is_empty()) {
        Some(list) => (list.to_vec(), CandidateSource::Explicit),
        None => {
            let stored = context.map(|ctx| (registry.get(ctx), ctx));
            match stored {
                Some((list, ctx)) if !list.is_empty() => {
                    (list.to_vec(), CandidateSource::Registry(ctx))
                }
                _ => (vec![clicked.clone()], CandidateSource::Singleton),
            }
        }
    };

    let found = list.iter().position(|m| m.same_item(clicked));
    Resolution {
        index: found.unwrap_or(0),
        index_fallback: found.is_none(),
        list,
        source,
    }
}

/// Opens viewer sessions and owns the channel their hide timers report on.
#[derive(Debug)]
pub struct ViewerLauncher {
    registry: MediaListRegistry,
    config: ViewerConfig,
    timer_events: mpsc::UnboundedSender<HideElapsed>,
    next_session: u64,
}

impl ViewerLauncher {
    /// The receiver yields hide timer events of every session this launcher
    /// opens; the host feeds them back to the current session.
    pub fn new(
        registry: MediaListRegistry,
        config: ViewerConfig,
    ) -> (Self, mpsc::UnboundedReceiver<HideElapsed>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let launcher = Self {
            registry,
            config,
            timer_events: tx,
            next_session: 1,
        };
        (launcher, rx)
    }

    pub fn registry(&self) -> &MediaListRegistry {
        &self.registry
    }

    pub fn config(&self) -> ViewerConfig {
        self.config
    }

    /// Open a viewer on `clicked`. Never fails; at worst the session shows
    /// only the tapped item.
    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self, clicked, explicit)))]
    pub fn open(
        &mut self,
        context: Option<MediaContext>,
        clicked: &MediaRecord,
        explicit: Option<&[MediaRecord]>,
    ) -> ViewerSession {
        let resolution = resolve(&self.registry, context, clicked, explicit);
        if resolution.index_fallback {
            tracing::warn!(
                "Tapped item {:?} not found in {:?} list, opening at first item",
                clicked.locator,
                resolution.source
            );
        }
        let id = self.next_session;
        self.next_session += 1;
        ViewerSession::start(
            id,
            resolution.list,
            resolution.index,
            self.config,
            self.timer_events.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::MediaKind;

    fn rec(loc: &str) -> MediaRecord {
        MediaRecord::new(loc, MediaKind::Image)
    }

    fn registry_with(ctx: MediaContext, locs: &[&str]) -> MediaListRegistry {
        let registry = MediaListRegistry::new();
        registry.put(ctx, locs.iter().map(|l| rec(l)).collect());
        registry
    }

    #[test]
    fn test_resolve_index_in_registry_list() {
        let registry = registry_with(MediaContext::Browse, &["p1", "p2", "p3"]);
        let r = resolve(&registry, Some(MediaContext::Browse), &rec("p2"), None);
        assert_eq!(r.index, 1);
        assert_eq!(r.source, CandidateSource::Registry(MediaContext::Browse));
        assert!(!r.index_fallback);
    }

    #[test]
    fn test_resolve_miss_falls_back_to_first() {
        let registry = registry_with(MediaContext::Browse, &["p1", "p2", "p3"]);
        let r = resolve(&registry, Some(MediaContext::Browse), &rec("p9"), None);
        assert_eq!(r.index, 0);
        assert!(r.index_fallback);
        assert_eq!(r.list.len(), 3);
    }

    #[test]
    fn test_resolve_singleton_when_nothing_stored() {
        let registry = MediaListRegistry::new();
        let r = resolve(&registry, Some(MediaContext::Search), &rec("x"), None);
        assert_eq!(r.list, vec![rec("x")]);
        assert_eq!(r.index, 0);
        assert_eq!(r.source, CandidateSource::Singleton);
        assert!(!r.index_fallback);
    }

    #[test]
    fn test_resolve_explicit_list_wins() {
        let registry = registry_with(MediaContext::Search, &["p1", "p2"]);
        let explicit = vec![rec("a"), rec("b"), rec("c")];
        let r = resolve(&registry, Some(MediaContext::Search), &rec("c"), Some(&explicit));
        assert_eq!(r.source, CandidateSource::Explicit);
        assert_eq!(r.index, 2);
    }

    #[test]
    fn test_resolve_empty_explicit_uses_registry() {
        let registry = registry_with(MediaContext::Search, &["p1", "p2"]);
        let r = resolve(&registry, Some(MediaContext::Search), &rec("p2"), Some(&[]));
        assert_eq!(r.source, CandidateSource::Registry(MediaContext::Search));
        assert_eq!(r.index, 1);
    }

    #[test]
    fn test_resolve_without_context_ignores_registry() {
        let registry = registry_with(MediaContext::Browse, &["p1", "p2"]);
        let r = resolve(&registry, None, &rec("p2"), None);
        assert_eq!(r.source, CandidateSource::Singleton);
    }

    #[test]
    fn test_resolve_matches_pending_upload_by_preview() {
        let registry = MediaListRegistry::new();
        registry.put(
            MediaContext::Browse,
            vec![rec("p1").with_preview("t1"), rec("p2").with_preview("t2")],
        );
        let pending = MediaRecord {
            preview_ref: Some("t2".into()),
            ..MediaRecord::default()
        };
        let r = resolve(&registry, Some(MediaContext::Browse), &pending, None);
        assert_eq!(r.index, 1);
    }

    #[test]
    fn test_open_from_sync_code() {
        let registry = registry_with(MediaContext::Browse, &["p1", "p2", "p3"]);
        let (mut launcher, _events) = ViewerLauncher::new(registry, ViewerConfig::default());
        let session = launcher.open(Some(MediaContext::Browse), &rec("p3"), None);
        assert!(session.is_open());
        assert_eq!(session.current_index(), 2);
        assert!(session.ui_visible());
        assert!(!session.has_pending_hide());
    }
}
