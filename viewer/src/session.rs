//! State machine of one open full-screen viewer.

use api_client::MediaRecord;
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::actions::{ActionRequest, ViewerAction};
use crate::gesture::{GestureTracker, SwipeIntent, SWIPE_THRESHOLD};
use crate::timer::{HideElapsed, HideTimer};

pub const HIDE_AFTER: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerConfig {
    pub hide_after: Duration,
    pub swipe_threshold: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            hide_after: HIDE_AFTER,
            swipe_threshold: SWIPE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// What the host should draw on top of the current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub show_close: bool,
    /// 1-based position and total, when the indicator is shown.
    pub position: Option<(usize, usize)>,
    pub can_previous: bool,
    pub can_next: bool,
    /// Navigation buttons stay clickable but are drawn transparent.
    pub nav_dimmed: bool,
    pub show_actions: bool,
}

/// A full-screen viewer over a snapshot of a media list.
///
/// Every operation is a silent no-op once the session is closed. Whenever
/// the overlay becomes visible the previous hide timer is dropped and a new
/// one is started, so at most one timer is outstanding. Timers are tokio
/// tasks; outside a runtime no timer runs and the overlay only hides on
/// request.
#[derive(Debug)]
pub struct ViewerSession {
    id: u64,
    active_list: Vec<MediaRecord>,
    current_index: usize,
    ui_visible: bool,
    state: SessionState,
    gesture: GestureTracker,
    hide_timer: Option<HideTimer>,
    generation: u64,
    config: ViewerConfig,
    timer_events: mpsc::UnboundedSender<HideElapsed>,
}

impl ViewerSession {
    /// Open a session on `list` at `index` (clamped into range). Returns
    /// `None` for an empty list.
    pub fn open(
        id: u64,
        list: Vec<MediaRecord>,
        index: usize,
        config: ViewerConfig,
        timer_events: mpsc::UnboundedSender<HideElapsed>,
    ) -> Option<Self> {
        if list.is_empty() {
            return None;
        }
        Some(Self::start(id, list, index, config, timer_events))
    }

    /// `open` without the emptiness check, for callers that guarantee a
    /// non-empty list.
    pub(crate) fn start(
        id: u64,
        list: Vec<MediaRecord>,
        index: usize,
        config: ViewerConfig,
        timer_events: mpsc::UnboundedSender<HideElapsed>,
    ) -> Self {
        let current_index = index.min(list.len().saturating_sub(1));
        let mut session = Self {
            id,
            active_list: list,
            current_index,
            ui_visible: false,
            state: SessionState::Open,
            gesture: GestureTracker::default(),
            hide_timer: None,
            generation: 0,
            config,
            timer_events,
        };
        tracing::debug!(
            "Viewer {} opened at {}/{}",
            id,
            current_index + 1,
            session.active_list.len()
        );
        session.show_ui();
        session
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.active_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_list.is_empty()
    }

    pub fn active_list(&self) -> &[MediaRecord] {
        &self.active_list
    }

    pub fn current(&self) -> &MediaRecord {
        &self.active_list[self.current_index]
    }

    pub fn ui_visible(&self) -> bool {
        self.ui_visible
    }

    pub fn has_pending_hide(&self) -> bool {
        self.hide_timer.is_some()
    }

    pub fn config(&self) -> ViewerConfig {
        self.config
    }

    fn cancel_hide(&mut self) {
        if self.hide_timer.take().is_some() {
            tracing::trace!("Viewer {}: hide timer cancelled", self.id);
        }
    }

    fn show_ui(&mut self) {
        self.cancel_hide();
        self.ui_visible = true;
        self.generation += 1;
        self.hide_timer = HideTimer::start(
            self.config.hide_after,
            self.id,
            self.generation,
            self.timer_events.clone(),
        );
    }

    fn hide_ui(&mut self) {
        self.cancel_hide();
        self.ui_visible = false;
    }

    /// Returns `false` if the session was already closed.
    pub fn close(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.cancel_hide();
        self.gesture = GestureTracker::default();
        self.state = SessionState::Closed;
        tracing::debug!("Viewer {} closed", self.id);
        true
    }

    /// Returns whether the index moved.
    pub fn next(&mut self) -> bool {
        if !self.is_open() || self.current_index + 1 >= self.active_list.len() {
            return false;
        }
        self.current_index += 1;
        self.show_ui();
        true
    }

    /// Returns whether the index moved.
    pub fn previous(&mut self) -> bool {
        if !self.is_open() || self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        self.show_ui();
        true
    }

    /// Tap on the media surface.
    pub fn toggle_ui_visible(&mut self) {
        if !self.is_open() {
            return;
        }
        if self.ui_visible {
            self.hide_ui();
        } else {
            self.show_ui();
        }
    }

    pub fn on_gesture_start(&mut self, x: f32) {
        if !self.is_open() {
            return;
        }
        self.gesture.begin(x);
        self.show_ui();
    }

    pub fn on_gesture_move(&mut self, x: f32) {
        if !self.is_open() {
            return;
        }
        self.gesture.update(x);
    }

    /// Navigate according to the finished swipe. Navigation past either end
    /// is ignored, the interpreted intent is still returned.
    pub fn on_gesture_end(&mut self) -> SwipeIntent {
        if !self.is_open() {
            return SwipeIntent::None;
        }
        let intent = self.gesture.finish(self.config.swipe_threshold);
        match intent {
            SwipeIntent::Next => {
                self.next();
            }
            SwipeIntent::Previous => {
                self.previous();
            }
            SwipeIntent::None => {}
        }
        intent
    }

    pub fn on_playback_started(&mut self) {
        if self.is_open() {
            self.hide_ui();
        }
    }

    pub fn on_playback_paused(&mut self) {
        if self.is_open() {
            self.show_ui();
        }
    }

    /// Apply a timer event. Events for another session or for a superseded
    /// timer are ignored. Returns whether the overlay was hidden.
    pub fn on_hide_elapsed(&mut self, event: HideElapsed) -> bool {
        if !self.is_open() || event.session != self.id {
            return false;
        }
        match &self.hide_timer {
            Some(timer) if timer.generation() == event.generation => {
                self.hide_timer = None;
                self.ui_visible = false;
                tracing::trace!("Viewer {}: overlay hidden after idle", self.id);
                true
            }
            _ => false,
        }
    }

    pub fn affordances(&self) -> Affordances {
        let open = self.is_open();
        let visible = open && self.ui_visible;
        let multiple = self.active_list.len() > 1;
        Affordances {
            show_close: visible,
            position: (visible && multiple)
                .then(|| (self.current_index + 1, self.active_list.len())),
            can_previous: open && multiple && self.current_index > 0,
            can_next: open && multiple && self.current_index + 1 < self.active_list.len(),
            nav_dimmed: !visible,
            show_actions: visible,
        }
    }

    /// Press an action bar button. Keeps the overlay up.
    pub fn trigger_action(&mut self, action: ViewerAction) -> Option<ActionRequest> {
        if !self.is_open() {
            return None;
        }
        let request = ActionRequest::for_record(action, self.current());
        self.show_ui();
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::MediaKind;

    fn list(n: usize) -> Vec<MediaRecord> {
        (0..n)
            .map(|i| MediaRecord::new(format!("p{}", i + 1), MediaKind::Image))
            .collect()
    }

    fn session(n: usize, index: usize) -> (ViewerSession, mpsc::UnboundedReceiver<HideElapsed>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = ViewerSession::open(1, list(n), index, ViewerConfig::default(), tx).unwrap();
        (session, rx)
    }

    #[tokio::test]
    async fn test_open_empty_list_is_none() {
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(ViewerSession::open(1, Vec::new(), 0, ViewerConfig::default(), tx).is_none());
    }

    #[tokio::test]
    async fn test_open_clamps_index_and_shows_ui() {
        let (s, _rx) = session(3, 10);
        assert_eq!(s.current_index(), 2);
        assert!(s.ui_visible());
        assert!(s.has_pending_hide());
        assert_eq!(s.current().locator.as_deref(), Some("p3"));
    }

    #[tokio::test]
    async fn test_navigation_stays_in_bounds() {
        let (mut s, _rx) = session(3, 0);
        assert!(!s.previous());
        assert!(s.next());
        assert!(s.next());
        assert!(!s.next());
        assert_eq!(s.current_index(), 2);
        assert!(s.is_open());
    }

    #[tokio::test]
    async fn test_walk_forward_then_back_returns_to_start() {
        for len in 1..6 {
            for start in 0..len {
                let (mut s, _rx) = session(len, start);
                for _ in 0..(len - 1 - start) {
                    s.next();
                    assert!(s.current_index() < len);
                }
                for _ in 0..(len - 1) {
                    s.previous();
                }
                assert_eq!(s.current_index(), 0);
            }
        }
    }

    #[tokio::test]
    async fn test_toggle_cancels_and_restarts_timer() {
        let (mut s, _rx) = session(2, 0);
        s.toggle_ui_visible();
        assert!(!s.ui_visible());
        assert!(!s.has_pending_hide());
        s.toggle_ui_visible();
        assert!(s.ui_visible());
        assert!(s.has_pending_hide());
    }

    #[tokio::test]
    async fn test_swipes() {
        let (mut s, _rx) = session(3, 1);
        s.on_gesture_start(200.0);
        s.on_gesture_move(100.0);
        assert_eq!(s.on_gesture_end(), SwipeIntent::Next);
        assert_eq!(s.current_index(), 2);

        s.on_gesture_start(100.0);
        s.on_gesture_move(200.0);
        assert_eq!(s.on_gesture_end(), SwipeIntent::Previous);
        assert_eq!(s.current_index(), 1);

        s.on_gesture_start(120.0);
        s.on_gesture_move(100.0);
        assert_eq!(s.on_gesture_end(), SwipeIntent::None);
        assert_eq!(s.current_index(), 1);
    }

    #[tokio::test]
    async fn test_gesture_end_without_move_does_nothing() {
        let (mut s, _rx) = session(3, 1);
        s.on_gesture_move(400.0);
        s.on_gesture_start(200.0);
        assert_eq!(s.on_gesture_end(), SwipeIntent::None);
        assert_eq!(s.current_index(), 1);
    }

    #[tokio::test]
    async fn test_single_item_session() {
        let (mut s, _rx) = session(1, 0);
        s.on_gesture_start(300.0);
        s.on_gesture_move(0.0);
        assert_eq!(s.on_gesture_end(), SwipeIntent::Next);
        assert_eq!(s.current_index(), 0);
        s.toggle_ui_visible();
        assert!(!s.ui_visible());
        let a = s.affordances();
        assert!(!a.can_next && !a.can_previous);
        assert!(a.position.is_none());
        assert!(s.close());
    }

    #[tokio::test]
    async fn test_playback_controls_visibility() {
        let (mut s, _rx) = session(2, 0);
        s.on_playback_started();
        assert!(!s.ui_visible());
        assert!(!s.has_pending_hide());
        s.on_playback_paused();
        assert!(s.ui_visible());
        assert!(s.has_pending_hide());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (mut s, _rx) = session(2, 0);
        assert!(s.close());
        assert!(!s.has_pending_hide());
        assert!(!s.close());
        assert_eq!(s.state(), SessionState::Closed);
        assert!(!s.next());
        s.toggle_ui_visible();
        assert!(s.trigger_action(ViewerAction::Share).is_none());
    }

    #[tokio::test]
    async fn test_affordances_follow_visibility() {
        let (mut s, _rx) = session(3, 0);
        let a = s.affordances();
        assert!(a.show_close && a.show_actions);
        assert_eq!(a.position, Some((1, 3)));
        assert!(!a.can_previous && a.can_next);
        assert!(!a.nav_dimmed);

        s.toggle_ui_visible();
        let a = s.affordances();
        assert!(!a.show_close && !a.show_actions);
        assert!(a.position.is_none());
        assert!(a.can_next && a.nav_dimmed);
    }

    #[tokio::test]
    async fn test_action_keeps_overlay_visible() {
        let (mut s, _rx) = session(2, 1);
        s.toggle_ui_visible();
        let request = s.trigger_action(ViewerAction::Download).unwrap();
        assert_eq!(request.target, "p2");
        assert!(s.ui_visible());
    }

    #[test]
    fn test_open_without_runtime_skips_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut s = ViewerSession::open(7, list(3), 1, ViewerConfig::default(), tx).unwrap();
        assert!(s.is_open());
        assert!(s.ui_visible());
        assert!(!s.has_pending_hide());

        assert!(s.next());
        assert_eq!(s.current_index(), 2);
        s.toggle_ui_visible();
        assert!(!s.ui_visible());
        s.toggle_ui_visible();
        assert!(s.ui_visible());
        assert!(!s.has_pending_hide());

        assert!(s.close());
        assert!(rx.try_recv().is_err());
    }
}
