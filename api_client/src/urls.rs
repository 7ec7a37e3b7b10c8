//! URL construction for thumbnails and raw media files.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::MediaKind;

/// Characters left as-is in a URI component, as browsers do.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn origin(api_base: &str) -> &str {
    let trimmed = api_base.trim_end_matches('/');
    trimmed.strip_suffix("/api").unwrap_or(trimmed)
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Thumbnail endpoint for a file locator. Video thumbnails are extracted frames.
pub fn thumbnail_url(api_base: &str, locator: &str, kind: MediaKind) -> String {
    format!(
        "{}/api/thumbnail?path={}&type={}",
        origin(api_base),
        encode(locator),
        kind.as_str()
    )
}

/// Raw media file endpoint, used for video playback.
pub fn media_file_url(api_base: &str, locator: &str) -> String {
    format!("{}/api/media/file?path={}", origin(api_base), encode(locator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_url_strips_api_suffix() {
        let url = thumbnail_url("http://localhost:5001/api", "data/a.jpg", MediaKind::Image);
        assert_eq!(
            url,
            "http://localhost:5001/api/thumbnail?path=data%2Fa.jpg&type=image"
        );
    }

    #[test]
    fn thumbnail_url_for_video() {
        let url = thumbnail_url("http://host/api/", "clip.mp4", MediaKind::Video);
        assert_eq!(url, "http://host/api/thumbnail?path=clip.mp4&type=video");
    }

    #[test]
    fn media_file_url_encodes_spaces() {
        let url = media_file_url("http://host", "my clip.mp4");
        assert_eq!(url, "http://host/api/media/file?path=my%20clip.mp4");
    }

    #[test]
    fn encodes_like_a_uri_component() {
        let url = media_file_url("http://host/api", "a/b c+d&e=(1)~f's*.jpg");
        assert_eq!(
            url,
            "http://host/api/media/file?path=a%2Fb%20c%2Bd%26e%3D(1)~f's*.jpg"
        );
    }
}
