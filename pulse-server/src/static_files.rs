//! Static serving for the built dashboard frontend.
//!
//! GET/HEAD only; hashed assets under `/static/` get a one-year immutable
//! cache header; unknown paths that accept HTML fall back to the root
//! document so client-side routes resolve. Compression is handled by the
//! `CompressionLayer` applied in `main`.

use std::path::{Component, Path, PathBuf};

use axum::{
    body::Body,
    extract::Extension,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

/// Root directory of the built frontend, injected as an extension.
#[derive(Clone)]
pub struct AssetDir(pub PathBuf);

pub async fn serve(
    Extension(AssetDir(root)): Extension<AssetDir>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
            "Method Not Allowed",
        )
            .into_response();
    }

    let request_path = uri.path();
    let lookup = if request_path == "/" {
        "/index.html"
    } else {
        request_path
    };

    let Some(resolved) = resolve_path(&root, lookup) else {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };

    if is_file(&resolved).await {
        return send_file(&resolved, request_path, &method).await;
    }

    // Directory request: try its index.html
    let dir_index = resolved.join("index.html");
    if is_file(&dir_index).await {
        return send_file(&dir_index, request_path, &method).await;
    }

    // SPA fallback for client-routed paths, only when the client accepts HTML
    let accepts_html = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_lowercase().contains("text/html"))
        .unwrap_or(false);
    if accepts_html {
        let index = root.join("index.html");
        if is_file(&index).await {
            return send_file(&index, "/index.html", &method).await;
        }
    }

    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

/// Join a request path onto the asset root, rejecting traversal segments.
fn resolve_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    let mut resolved = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(resolved)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

async fn send_file(path: &Path, request_path: &str, method: &Method) -> Response {
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) => {
            tracing::error!("Failed to read static file {}: {}", path.display(), e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };

    let content_type = content_type_for(path);
    let cache = cache_control(request_path, content_type);

    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, cache)
        .header(header::CONTENT_LENGTH, data.len())
        .header("X-Content-Type-Options", "nosniff");

    let body = if method == Method::HEAD {
        Body::empty()
    } else {
        Body::from(data)
    };

    builder.body(body).unwrap_or_else(|_| {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    })
}

/// Cache policy: hashed assets under /static/ are immutable for a year,
/// images and fonts for 30 days, everything else revalidates.
fn cache_control(request_path: &str, content_type: &str) -> &'static str {
    if request_path.starts_with("/static/") {
        "public, max-age=31536000, immutable"
    } else if content_type.starts_with("image/") || content_type.starts_with("font/") {
        "public, max-age=2592000"
    } else {
        "no-cache"
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" => "application/json; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "txt" => "text/plain; charset=utf-8",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_policy_by_prefix_and_type() {
        assert_eq!(
            cache_control("/static/js/main.abc123.js", "application/javascript; charset=utf-8"),
            "public, max-age=31536000, immutable"
        );
        assert_eq!(
            cache_control("/logo.png", "image/png"),
            "public, max-age=2592000"
        );
        assert_eq!(
            cache_control("/index.html", "text/html; charset=utf-8"),
            "no-cache"
        );
    }

    #[test]
    fn traversal_segments_are_rejected() {
        let root = Path::new("/srv/build");
        assert!(resolve_path(root, "/../etc/passwd").is_none());
        assert!(resolve_path(root, "/static/../../secret").is_none());
        assert_eq!(
            resolve_path(root, "/static/js/main.js"),
            Some(PathBuf::from("/srv/build/static/js/main.js"))
        );
    }

    #[test]
    fn content_types_cover_build_output() {
        assert_eq!(
            content_type_for(Path::new("index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("a.woff2")), "font/woff2");
        assert_eq!(
            content_type_for(Path::new("unknown.bin")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn non_get_requests_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let response = serve(
            Extension(AssetDir(dir.path().to_path_buf())),
            Method::POST,
            Uri::from_static("/index.html"),
            HeaderMap::new(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, HEAD");
    }

    #[tokio::test]
    async fn spa_fallback_requires_html_accept() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("index.html"), "<html></html>").expect("write index");

        let mut html_headers = HeaderMap::new();
        html_headers.insert(header::ACCEPT, "text/html,*/*".parse().unwrap());
        let response = serve(
            Extension(AssetDir(dir.path().to_path_buf())),
            Method::GET,
            Uri::from_static("/dashboard/overview"),
            html_headers,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let mut json_headers = HeaderMap::new();
        json_headers.insert(header::ACCEPT, "application/json".parse().unwrap());
        let response = serve(
            Extension(AssetDir(dir.path().to_path_buf())),
            Method::GET,
            Uri::from_static("/dashboard/overview"),
            json_headers,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serves_existing_files_with_headers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let static_dir = dir.path().join("static");
        std::fs::create_dir_all(&static_dir).expect("mkdir");
        std::fs::write(static_dir.join("main.js"), "console.log(1)").expect("write js");

        let response = serve(
            Extension(AssetDir(dir.path().to_path_buf())),
            Method::GET,
            Uri::from_static("/static/main.js"),
            HeaderMap::new(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=31536000, immutable"
        );
        assert_eq!(response.headers()["X-Content-Type-Options"], "nosniff");
    }
}
