//! Headless application model for MediaLens.
//!
//! `MediaApp` holds the state of every tab plus the open viewer, and is
//! driven the Elm way: the host feeds `Message`s into `update` and runs the
//! returned `Command`s, feeding their outputs back in. `render` turns the
//! current state into text for terminal hosts.

mod command;
pub mod render;

pub use command::Command;

use api_client::{ApiClient, SearchOptions, UploadSummary, DEFAULT_INITIAL_LIMIT};
use std::path::PathBuf;
use tokio::time::{sleep, Duration};
use viewer::{
    ActionRequest, HideElapsed, MediaContext, MediaListRegistry, MediaRecord, ViewerAction,
    ViewerLauncher, ViewerSession,
};

const STATUS_DISPLAY_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    Search,
    Analyse,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Search, Tab::Analyse, Tab::Settings];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Search => "Search",
            Tab::Analyse => "Analyse",
            Tab::Settings => "Settings",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(name.trim()))
    }

    /// The registry slot whose grid this tab shows, if it shows one.
    pub fn context(&self) -> Option<MediaContext> {
        match self {
            Tab::Home => Some(MediaContext::Browse),
            Tab::Search => Some(MediaContext::Search),
            Tab::Analyse | Tab::Settings => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    LoadMedia,
    MediaLoaded(Vec<MediaRecord>),
    TabSelected(Tab),
    SearchInputChanged(String),
    PerformSearch,
    SearchSubmitted(String),
    SearchCompleted {
        query: String,
        results: Vec<MediaRecord>,
    },
    /// A grid cell was tapped. `list` is the grid's own list, when the host
    /// has one at hand.
    MediaClicked {
        item: MediaRecord,
        list: Option<Vec<MediaRecord>>,
    },
    CloseViewer,
    NextMedia,
    PreviousMedia,
    ToggleViewerUi,
    GestureStarted(f32),
    GestureMoved(f32),
    GestureEnded,
    PlaybackStarted,
    PlaybackPaused,
    ViewerActionPressed(ViewerAction),
    HideElapsed(HideElapsed),
    UploadFiles(Vec<PathBuf>),
    UploadFinished(Result<UploadSummary, String>),
    Analyse,
    AnalyseFinished(Result<String, String>),
    ToggleDarkMode,
    DismissStatus(usize),
    ClearStatus,
    EscapePressed,
}

pub struct AppFlags {
    pub client: ApiClient,
    pub launcher: ViewerLauncher,
    pub initial_limit: usize,
    pub search_options: SearchOptions,
    pub dark_mode: bool,
}

impl AppFlags {
    pub fn new(client: ApiClient, launcher: ViewerLauncher) -> Self {
        Self {
            client,
            launcher,
            initial_limit: DEFAULT_INITIAL_LIMIT,
            search_options: SearchOptions::default(),
            dark_mode: false,
        }
    }
}

pub struct MediaApp {
    client: ApiClient,
    launcher: ViewerLauncher,
    registry: MediaListRegistry,
    active_tab: Tab,
    browse: Vec<MediaRecord>,
    loading: bool,
    search_query: String,
    search_results: Vec<MediaRecord>,
    /// Query text of the search in flight.
    pending_search: Option<String>,
    has_searched: bool,
    viewer: Option<ViewerSession>,
    last_action: Option<ActionRequest>,
    uploading: bool,
    analysing: bool,
    status: Vec<String>,
    dark_mode: bool,
    initial_limit: usize,
    search_options: SearchOptions,
}

impl MediaApp {
    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(flags)))]
    pub fn new(flags: AppFlags) -> (Self, Command<Message>) {
        let registry = flags.launcher.registry().clone();
        let app = Self {
            client: flags.client,
            launcher: flags.launcher,
            registry,
            active_tab: Tab::Home,
            browse: Vec::new(),
            loading: false,
            search_query: String::new(),
            search_results: Vec::new(),
            pending_search: None,
            has_searched: false,
            viewer: None,
            last_action: None,
            uploading: false,
            analysing: false,
            status: Vec::new(),
            dark_mode: flags.dark_mode,
            initial_limit: flags.initial_limit,
            search_options: flags.search_options,
        };
        (app, Command::perform(async {}, |_| Message::LoadMedia))
    }

    pub fn title(&self) -> String {
        String::from("MediaLens")
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn browse_items(&self) -> &[MediaRecord] {
        &self.browse
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_results(&self) -> &[MediaRecord] {
        &self.search_results
    }

    pub fn is_searching(&self) -> bool {
        self.pending_search.is_some()
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    pub fn viewer(&self) -> Option<&ViewerSession> {
        self.viewer.as_ref()
    }

    pub fn last_action(&self) -> Option<&ActionRequest> {
        self.last_action.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn is_analysing(&self) -> bool {
        self.analysing
    }

    pub fn status_messages(&self) -> &[String] {
        &self.status
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn registry(&self) -> &MediaListRegistry {
        &self.registry
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The grid shown by the active tab, if any.
    pub fn visible_grid(&self) -> Option<&[MediaRecord]> {
        match self.active_tab {
            Tab::Home => Some(&self.browse),
            Tab::Search => Some(&self.search_results),
            Tab::Analyse | Tab::Settings => None,
        }
    }

    fn status_timeout() -> Command<Message> {
        Command::perform(
            async {
                sleep(STATUS_DISPLAY_DURATION).await;
            },
            |_| Message::ClearStatus,
        )
    }

    fn push_status(&mut self, msg: String) -> Command<Message> {
        self.status.push(msg);
        MediaApp::status_timeout()
    }

    fn run_search(&mut self) -> Command<Message> {
        let query = self.search_query.trim().to_string();
        if query.is_empty() {
            self.search_results.clear();
            self.registry.put(MediaContext::Search, Vec::new());
            self.pending_search = None;
            self.has_searched = false;
            return Command::none();
        }
        self.has_searched = true;
        let client = self.client.clone();
        let options = self.search_options.clone();
        let tag = self.search_query.clone();
        self.pending_search = Some(tag.clone());
        Command::perform(
            async move { client.search_media(&query, &options).await },
            move |results| Message::SearchCompleted {
                query: tag,
                results,
            },
        )
    }

    fn with_viewer(&mut self, f: impl FnOnce(&mut ViewerSession)) {
        if let Some(session) = self.viewer.as_mut() {
            f(session);
        }
    }

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::LoadMedia => {
                self.loading = true;
                let client = self.client.clone();
                let limit = self.initial_limit;
                return Command::perform(
                    async move { client.fetch_initial_media(limit).await },
                    Message::MediaLoaded,
                );
            }
            Message::MediaLoaded(items) => {
                self.loading = false;
                tracing::info!("Loaded {} media items", items.len());
                self.registry.put(MediaContext::Browse, items.clone());
                self.browse = items;
            }
            Message::TabSelected(tab) => {
                self.active_tab = tab;
                match tab {
                    Tab::Home => return Command::perform(async {}, |_| Message::LoadMedia),
                    Tab::Search => {
                        self.search_query.clear();
                        self.search_results.clear();
                        self.pending_search = None;
                        self.has_searched = false;
                    }
                    Tab::Analyse | Tab::Settings => {}
                }
            }
            Message::SearchInputChanged(query) => {
                self.search_query = query;
            }
            Message::PerformSearch => {
                return self.run_search();
            }
            Message::SearchSubmitted(query) => {
                self.active_tab = Tab::Search;
                self.search_query = query;
                return self.run_search();
            }
            Message::SearchCompleted { query, results } => {
                if self.pending_search.as_deref() == Some(query.as_str()) {
                    self.pending_search = None;
                }
                if query != self.search_query {
                    tracing::debug!("Discarding results for outdated query {:?}", query);
                    return Command::none();
                }
                tracing::info!("Search {:?} returned {} results", query, results.len());
                self.registry.put(MediaContext::Search, results.clone());
                self.search_results = results;
            }
            Message::MediaClicked { item, list } => {
                if let Some(mut previous) = self.viewer.take() {
                    previous.close();
                }
                let session =
                    self.launcher
                        .open(self.active_tab.context(), &item, list.as_deref());
                self.last_action = None;
                self.viewer = Some(session);
            }
            Message::CloseViewer | Message::EscapePressed => {
                if let Some(mut session) = self.viewer.take() {
                    session.close();
                }
            }
            Message::NextMedia => self.with_viewer(|v| {
                v.next();
            }),
            Message::PreviousMedia => self.with_viewer(|v| {
                v.previous();
            }),
            Message::ToggleViewerUi => self.with_viewer(|v| v.toggle_ui_visible()),
            Message::GestureStarted(x) => self.with_viewer(|v| v.on_gesture_start(x)),
            Message::GestureMoved(x) => self.with_viewer(|v| v.on_gesture_move(x)),
            Message::GestureEnded => self.with_viewer(|v| {
                v.on_gesture_end();
            }),
            Message::PlaybackStarted => self.with_viewer(|v| v.on_playback_started()),
            Message::PlaybackPaused => self.with_viewer(|v| v.on_playback_paused()),
            Message::HideElapsed(event) => self.with_viewer(|v| {
                v.on_hide_elapsed(event);
            }),
            Message::ViewerActionPressed(action) => {
                let request = self.viewer.as_mut().and_then(|v| v.trigger_action(action));
                let Some(request) = request else {
                    return Command::none();
                };
                tracing::info!("{} requested for {:?}", request.action, request.target);
                self.last_action = Some(request);
                if action == ViewerAction::Enhance {
                    return self.push_status("Enhancement is not available yet".into());
                }
            }
            Message::UploadFiles(paths) => {
                if paths.is_empty() {
                    return Command::none();
                }
                self.uploading = true;
                let client = self.client.clone();
                return Command::perform(
                    async move { client.upload_media(&paths).await },
                    |res| Message::UploadFinished(res.map_err(|e| e.to_string())),
                );
            }
            Message::UploadFinished(result) => {
                self.uploading = false;
                match result {
                    Ok(summary) => {
                        let mut commands = vec![
                            self.push_status(format!("Uploaded {} file(s)", summary.uploaded)),
                            Command::perform(async {}, |_| Message::LoadMedia),
                        ];
                        for err in summary.errors.unwrap_or_default() {
                            tracing::warn!("Upload: {}", err);
                            commands.push(self.push_status(err));
                        }
                        return Command::batch(commands);
                    }
                    Err(e) => {
                        tracing::error!("Upload failed: {}", e);
                        return self.push_status(format!("Upload failed: {}", e));
                    }
                }
            }
            Message::Analyse => {
                if self.analysing {
                    return Command::none();
                }
                self.analysing = true;
                let client = self.client.clone();
                return Command::perform(
                    async move { client.analyse().await },
                    |res| {
                        Message::AnalyseFinished(
                            res.map(|s| s.message.unwrap_or(s.status))
                                .map_err(|e| e.to_string()),
                        )
                    },
                );
            }
            Message::AnalyseFinished(result) => {
                self.analysing = false;
                let msg = match result {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::error!("Analysis failed: {}", e);
                        format!("Analysis failed: {}", e)
                    }
                };
                return self.push_status(msg);
            }
            Message::ToggleDarkMode => {
                self.dark_mode = !self.dark_mode;
            }
            Message::DismissStatus(index) => {
                if index < self.status.len() {
                    self.status.remove(index);
                }
            }
            Message::ClearStatus => {
                self.status.clear();
            }
        }
        Command::none()
    }
}
