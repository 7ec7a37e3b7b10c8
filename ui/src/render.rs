//! Plain-text rendering of the application state.

use std::fmt::Write;

use api_client::ApiClient;
use viewer::{MediaRecord, ViewerAction, ViewerSession};

use crate::{MediaApp, Tab};

fn item_line(index: usize, item: &MediaRecord) -> String {
    let name = item
        .caption
        .as_deref()
        .or(item.locator.as_deref())
        .unwrap_or("(pending upload)");
    let mut line = format!("{:>3}. [{}] {}", index + 1, item.kind, name);
    if item.relevance > 0.0 {
        let _ = write!(line, "  ({:.2})", item.relevance);
    }
    line
}

/// What the viewer shows for `item`: videos stream the original file,
/// images use the preview.
pub fn viewer_source(client: &ApiClient, item: &MediaRecord) -> Option<String> {
    match item.locator.as_deref().filter(|l| !l.is_empty()) {
        Some(loc) if item.is_video() => Some(client.media_file_url(loc)),
        _ => item.display_ref().map(str::to_string),
    }
}

pub fn grid(items: &[MediaRecord]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| item_line(i, item))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn viewer_overlay(client: &ApiClient, session: &ViewerSession) -> String {
    let aff = session.affordances();
    let mut out = String::new();

    let mut header = Vec::new();
    if aff.show_close {
        header.push("[x] close".to_string());
    }
    if let Some((pos, total)) = aff.position {
        header.push(format!("{} / {}", pos, total));
    }
    let _ = writeln!(out, "== viewer == {}", header.join("   "));

    let item = session.current();
    let _ = writeln!(
        out,
        "{} {}",
        if item.is_video() { "video" } else { "image" },
        viewer_source(client, item).unwrap_or_else(|| "(no source)".into())
    );
    if let Some(caption) = item.caption.as_deref().filter(|c| !c.is_empty()) {
        let _ = writeln!(out, "\"{}\"", caption);
    }

    let nav = |label: &str, enabled: bool| match (enabled, aff.nav_dimmed) {
        (false, _) => None,
        (true, true) => Some(format!("({})", label)),
        (true, false) => Some(label.to_string()),
    };
    let buttons: Vec<String> = [nav("< prev", aff.can_previous), nav("next >", aff.can_next)]
        .into_iter()
        .flatten()
        .collect();
    if !buttons.is_empty() {
        let _ = writeln!(out, "{}", buttons.join("   "));
    }

    if aff.show_actions {
        let labels: Vec<&str> = ViewerAction::ALL.iter().map(|a| a.label()).collect();
        let _ = writeln!(out, "| {} |", labels.join(" | "));
    }
    out
}

pub fn render(app: &MediaApp) -> String {
    let mut out = String::new();

    let tabs: Vec<String> = Tab::ALL
        .iter()
        .map(|t| {
            if *t == app.active_tab() {
                format!("[{}]", t.label())
            } else {
                t.label().to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "{}  {}", app.title(), tabs.join(" "));

    for (i, msg) in app.status_messages().iter().enumerate() {
        let _ = writeln!(out, "! {} (dismiss {})", msg, i);
    }

    match app.active_tab() {
        Tab::Home => {
            if app.is_loading() {
                let _ = writeln!(out, "Loading media...");
            } else if app.browse_items().is_empty() {
                let _ = writeln!(out, "No media yet. Upload some files to get started.");
            } else {
                let _ = writeln!(out, "{}", grid(app.browse_items()));
            }
            if app.is_uploading() {
                let _ = writeln!(out, "Uploading...");
            }
        }
        Tab::Search => {
            let _ = writeln!(out, "Search: {}", app.search_query());
            if app.is_searching() {
                let _ = writeln!(out, "Searching...");
            } else if !app.has_searched() {
                let _ = writeln!(out, "Describe what you are looking for.");
            } else if app.search_results().is_empty() {
                let _ = writeln!(out, "No results found.");
            } else {
                let _ = writeln!(out, "{} result(s)", app.search_results().len());
                let _ = writeln!(out, "{}", grid(app.search_results()));
            }
        }
        Tab::Analyse => {
            if app.is_analysing() {
                let _ = writeln!(out, "Analysing media folder...");
            } else {
                let _ = writeln!(out, "Run an analysis to index new media.");
            }
        }
        Tab::Settings => {
            let _ = writeln!(out, "Backend: {}", app.client().base_url());
            let _ = writeln!(
                out,
                "Dark mode: {}",
                if app.dark_mode() { "on" } else { "off" }
            );
        }
    }

    if let Some(session) = app.viewer() {
        out.push_str(&viewer_overlay(app.client(), session));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewer::MediaKind;

    #[test]
    fn test_grid_lines() {
        let items = vec![
            MediaRecord::new("data/a.jpg", MediaKind::Image).with_caption("A beach"),
            MediaRecord {
                preview_ref: Some("blob:1".into()),
                ..MediaRecord::default()
            },
        ];
        let text = grid(&items);
        assert_eq!(text, "  1. [image] A beach\n  2. [image] (pending upload)");
    }

    #[test]
    fn test_viewer_source_streams_videos() {
        let client = ApiClient::new("http://host:5001/api".into());
        let clip = MediaRecord::new("v/clip.mp4", MediaKind::Video).with_preview("thumb");
        let src = viewer_source(&client, &clip).unwrap();
        assert!(src.starts_with("http://host:5001/api/media/file?path="));

        let photo = MediaRecord::new("a.jpg", MediaKind::Image).with_preview("thumb");
        assert_eq!(viewer_source(&client, &photo).as_deref(), Some("thumb"));
    }
}
