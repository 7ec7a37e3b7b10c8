use httptest::{matchers::*, responders::*, Expectation, Server};
use serde_json::{json, Value};

pub use httptest;

/// Start an empty mock analysis backend.
pub fn backend_server() -> Server {
    Server::run()
}

/// API base URL (`.../api`) for the given server.
pub fn api_url(server: &Server) -> String {
    server.url_str("/api")
}

/// Backend listing entry as served by `/api/media/initial`.
pub fn initial_item(file_path: &str, media_type: &str, caption: &str) -> Value {
    json!({
        "file_path": file_path,
        "media_type": media_type,
        "caption": caption,
    })
}

/// Backend search hit as served by `/api/search`.
pub fn search_hit(path: &str, kind: &str, caption: &str, score: f64) -> Value {
    json!({
        "path": path,
        "type": kind,
        "caption": caption,
        "score": score,
    })
}

pub fn sample_library() -> Vec<Value> {
    vec![
        initial_item("data/beach.jpg", "image", "a sunny beach"),
        initial_item("data/dog.jpg", "image", "a dog on grass"),
        initial_item("data/party.mp4", "video", "birthday party"),
    ]
}

/// Expect a GET on `/api/media/initial` with the given `limit`.
pub fn expect_initial(server: &Server, limit: usize, items: Vec<Value>) {
    let count = items.len();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/api/media/initial"),
            request::query(eq(format!("limit={}", limit))),
        ])
        .respond_with(json_encoded(json!({ "media": items, "count": count }))),
    );
}

/// Expect a POST on `/api/search` for `query` (plain words only, it is
/// matched as a regex against the JSON body).
pub fn expect_search(server: &Server, query: &str, results: Vec<Value>) {
    let count = results.len();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/api/search"),
            request::body(matches(format!(r#""query":"{}""#, query))),
        ])
        .respond_with(json_encoded(json!({ "results": results, "count": count }))),
    );
}

/// Expect a multipart POST on `/api/upload` and acknowledge `files`.
pub fn expect_upload(server: &Server, files: &[&str]) {
    server.expect(
        Expectation::matching(request::method_path("POST", "/api/upload")).respond_with(
            json_encoded(json!({
                "status": "success",
                "uploaded": files.len(),
                "files": files,
                "errors": null,
            })),
        ),
    );
}

/// Expect a POST on `/api/upload` that the backend refuses.
pub fn expect_upload_failure(server: &Server, error: &str) {
    server.expect(
        Expectation::matching(request::method_path("POST", "/api/upload")).respond_with(
            status_code(400).body(json!({ "error": error }).to_string()),
        ),
    );
}

pub fn expect_health(server: &Server, media_count: usize) {
    server.expect(
        Expectation::matching(request::method_path("GET", "/api/health")).respond_with(
            json_encoded(json!({
                "status": "ok",
                "index_loaded": true,
                "media_count": media_count,
            })),
        ),
    );
}

pub fn expect_analyse(server: &Server) {
    server.expect(
        Expectation::matching(request::method_path("POST", "/api/analyse")).respond_with(
            json_encoded(json!({
                "status": "success",
                "message": "Analysis started",
            })),
        ),
    );
}

/// Any request to `path` fails with a server error.
pub fn expect_server_error(server: &Server, method: &'static str, path: &'static str) {
    server.expect(
        Expectation::matching(request::method_path(method, path))
            .respond_with(status_code(500).body(r#"{"error": "index unavailable"}"#)),
    );
}
