//! Action bar of the full-screen viewer.

use api_client::MediaRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    Share,
    Print,
    Enhance,
    Download,
}

impl ViewerAction {
    /// Order in which the action bar lays the buttons out.
    pub const ALL: [ViewerAction; 4] = [
        ViewerAction::Share,
        ViewerAction::Print,
        ViewerAction::Enhance,
        ViewerAction::Download,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ViewerAction::Share => "Share",
            ViewerAction::Print => "Print",
            ViewerAction::Enhance => "Enhance",
            ViewerAction::Download => "Download",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.label().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for ViewerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What the host has to carry out for a pressed action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub action: ViewerAction,
    pub target: String,
    pub title: String,
}

impl ActionRequest {
    /// `None` when the record has nothing to point at yet.
    pub fn for_record(action: ViewerAction, record: &MediaRecord) -> Option<Self> {
        let target = record.display_ref()?.to_string();
        let fallback = match action {
            ViewerAction::Download => "photo.jpg",
            _ => "Photo",
        };
        let title = record
            .caption
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        Some(Self { action, target, title })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::MediaKind;

    #[test]
    fn test_request_prefers_preview() {
        let record = MediaRecord::new("data/a.jpg", MediaKind::Image).with_preview("thumb/a");
        let req = ActionRequest::for_record(ViewerAction::Share, &record).unwrap();
        assert_eq!(req.target, "thumb/a");
        assert_eq!(req.title, "Photo");
    }

    #[test]
    fn test_download_title_defaults_to_file_name() {
        let record = MediaRecord::new("data/a.jpg", MediaKind::Image);
        let req = ActionRequest::for_record(ViewerAction::Download, &record).unwrap();
        assert_eq!(req.target, "data/a.jpg");
        assert_eq!(req.title, "photo.jpg");

        let captioned = record.with_caption("beach");
        let req = ActionRequest::for_record(ViewerAction::Download, &captioned).unwrap();
        assert_eq!(req.title, "beach");
    }

    #[test]
    fn test_no_request_without_reference() {
        assert!(ActionRequest::for_record(ViewerAction::Print, &MediaRecord::default()).is_none());
    }

    #[test]
    fn test_action_from_name() {
        assert_eq!(ViewerAction::from_name("download"), Some(ViewerAction::Download));
        assert_eq!(ViewerAction::from_name("nope"), None);
    }
}
