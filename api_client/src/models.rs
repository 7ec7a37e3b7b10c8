//! Media records as consumed by the views and the viewer.

use serde::{Deserialize, Serialize};

use crate::urls;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One displayable media item.
///
/// Lists of records are positional: the viewer navigates them in the order
/// they were received and never re-sorts by `relevance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub locator: Option<String>,
    pub kind: MediaKind,
    pub caption: Option<String>,
    pub preview_ref: Option<String>,
    pub relevance: f32,
}

impl MediaRecord {
    pub fn new(locator: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            locator: Some(locator.into()),
            kind,
            ..Self::default()
        }
    }

    pub fn with_preview(mut self, preview_ref: impl Into<String>) -> Self {
        self.preview_ref = Some(preview_ref.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    /// Whether `other` refers to the same underlying item.
    ///
    /// Locators are compared when both records carry one. Freshly uploaded
    /// items may not have a locator yet, so in that case the preview
    /// reference is used instead. Two records with neither key set are never
    /// the same item.
    pub fn same_item(&self, other: &MediaRecord) -> bool {
        match (non_empty(&self.locator), non_empty(&other.locator)) {
            (Some(a), Some(b)) => a == b,
            _ => match (non_empty(&self.preview_ref), non_empty(&other.preview_ref)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Reference the host should render: the preview, or the locator itself.
    pub fn display_ref(&self) -> Option<&str> {
        non_empty(&self.preview_ref).or_else(|| non_empty(&self.locator))
    }

    /// Normalize a backend item. `api_base` is used to build the preview URL.
    pub fn from_backend(item: BackendMedia, api_base: &str) -> Self {
        let locator = non_empty(&item.file_path)
            .or_else(|| non_empty(&item.path))
            .map(str::to_string);
        let is_video = item.media_type.as_deref() == Some("video")
            || item.kind.as_deref() == Some("video");
        let kind = if is_video { MediaKind::Video } else { MediaKind::Image };
        let preview_ref = locator
            .as_deref()
            .map(|loc| urls::thumbnail_url(api_base, loc, kind));

        Self {
            locator,
            kind,
            caption: non_empty(&item.caption).map(str::to_string),
            preview_ref,
            relevance: item.score.unwrap_or(0.0),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Item shape returned by the analysis backend. Initial listings use
/// `file_path`/`media_type`, search results use `path`/`type`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendMedia {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub score: Option<f32>,
}
