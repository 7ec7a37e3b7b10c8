//! Line commands of the interactive `view` host.

use std::path::PathBuf;
use ui::{MediaApp, Message, Tab};
use viewer::ViewerAction;

pub const HELP: &str = "\
commands:
  open N            open item N of the current grid in the viewer
  next | prev       navigate the open viewer
  tap               toggle the viewer overlay
  swipe X0 X1       horizontal swipe from X0 to X1
  play | pause      report video playback
  action NAME       share, print, enhance or download
  close             close the viewer
  search QUERY      run a search
  tab NAME          home, search, analyse or settings
  upload PATH..     upload local files
  analyse           index the backend media folder
  dark              toggle dark mode
  dismiss N         dismiss status message N
  quit";

#[derive(Debug)]
pub enum Input {
    Quit,
    Help,
    Send(Vec<Message>),
}

fn number<T: std::str::FromStr>(arg: Option<&str>, what: &str) -> Result<T, String> {
    arg.ok_or_else(|| format!("missing {}", what))?
        .parse()
        .map_err(|_| format!("invalid {}", what))
}

pub fn parse(line: &str, app: &MediaApp) -> Result<Input, String> {
    let line = line.trim();
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let mut args = rest.split_whitespace();

    let msg = match cmd.to_ascii_lowercase().as_str() {
        "" => return Ok(Input::Send(Vec::new())),
        "quit" | "exit" | "q" => return Ok(Input::Quit),
        "help" | "?" => return Ok(Input::Help),
        "open" => {
            let n: usize = number(args.next(), "item number")?;
            let grid = app
                .visible_grid()
                .ok_or_else(|| "nothing to open on this tab".to_string())?;
            let item = n
                .checked_sub(1)
                .and_then(|i| grid.get(i))
                .ok_or_else(|| format!("no item {}", n))?;
            Message::MediaClicked {
                item: item.clone(),
                list: None,
            }
        }
        "next" => Message::NextMedia,
        "prev" | "previous" => Message::PreviousMedia,
        "tap" => Message::ToggleViewerUi,
        "swipe" => {
            let start: f32 = number(args.next(), "start position")?;
            let end: f32 = number(args.next(), "end position")?;
            return Ok(Input::Send(vec![
                Message::GestureStarted(start),
                Message::GestureMoved(end),
                Message::GestureEnded,
            ]));
        }
        "play" => Message::PlaybackStarted,
        "pause" => Message::PlaybackPaused,
        "action" => {
            let name = args.next().ok_or_else(|| "missing action".to_string())?;
            let action =
                ViewerAction::from_name(name).ok_or_else(|| format!("unknown action {}", name))?;
            Message::ViewerActionPressed(action)
        }
        "close" => Message::CloseViewer,
        "search" => Message::SearchSubmitted(rest.to_string()),
        "tab" => {
            let name = args.next().ok_or_else(|| "missing tab".to_string())?;
            Message::TabSelected(Tab::from_name(name).ok_or_else(|| format!("unknown tab {}", name))?)
        }
        "upload" => {
            let paths: Vec<PathBuf> = args.map(PathBuf::from).collect();
            if paths.is_empty() {
                return Err("missing files".into());
            }
            Message::UploadFiles(paths)
        }
        "analyse" | "analyze" => Message::Analyse,
        "dark" => Message::ToggleDarkMode,
        "dismiss" => Message::DismissStatus(number(args.next(), "message number")?),
        other => return Err(format!("unknown command {} (try help)", other)),
    };
    Ok(Input::Send(vec![msg]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::ApiClient;
    use ui::AppFlags;
    use viewer::{MediaKind, MediaListRegistry, MediaRecord, ViewerConfig, ViewerLauncher};

    fn app() -> MediaApp {
        let (launcher, _events) =
            ViewerLauncher::new(MediaListRegistry::new(), ViewerConfig::default());
        let (mut app, _) = MediaApp::new(AppFlags::new(
            ApiClient::new("http://127.0.0.1:9/api".into()),
            launcher,
        ));
        let _ = app.update(Message::MediaLoaded(vec![
            MediaRecord::new("a.jpg", MediaKind::Image),
            MediaRecord::new("b.jpg", MediaKind::Image),
        ]));
        app
    }

    #[test]
    fn test_open_uses_one_based_numbers() {
        let app = app();
        match parse("open 2", &app) {
            Ok(Input::Send(msgs)) => match &msgs[..] {
                [Message::MediaClicked { item, list: None }] => {
                    assert_eq!(item.locator.as_deref(), Some("b.jpg"))
                }
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse("open 0", &app).is_err());
        assert!(parse("open 3", &app).is_err());
        assert!(parse("open x", &app).is_err());
    }

    #[test]
    fn test_swipe_expands_to_gesture() {
        let app = app();
        match parse("swipe 200 100", &app) {
            Ok(Input::Send(msgs)) => {
                assert_eq!(msgs.len(), 3);
                assert!(matches!(msgs[0], Message::GestureStarted(x) if x == 200.0));
                assert!(matches!(msgs[2], Message::GestureEnded));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse("swipe 200", &app).is_err());
    }

    #[test]
    fn test_search_keeps_whole_query() {
        let app = app();
        match parse("search dogs on a beach", &app) {
            Ok(Input::Send(msgs)) => {
                assert!(matches!(&msgs[0], Message::SearchSubmitted(q) if q == "dogs on a beach"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_misc_commands() {
        let app = app();
        assert!(matches!(parse("quit", &app), Ok(Input::Quit)));
        assert!(matches!(parse("  ", &app), Ok(Input::Send(m)) if m.is_empty()));
        assert!(parse("action Email", &app).is_err());
        assert!(parse("tab albums", &app).is_err());
        assert!(parse("upload", &app).is_err());
        assert!(parse("frobnicate", &app).is_err());
        assert!(matches!(
            parse("action DOWNLOAD", &app),
            Ok(Input::Send(m)) if matches!(m[0], Message::ViewerActionPressed(ViewerAction::Download))
        ));
    }

    #[test]
    fn test_open_on_settings_tab_fails() {
        let mut app = app();
        let _ = app.update(Message::TabSelected(Tab::Settings));
        assert!(parse("open 1", &app).is_err());
    }
}
