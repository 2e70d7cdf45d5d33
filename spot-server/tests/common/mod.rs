#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use spot_server::auth::JwtConfig;
use spot_server::services::build_app;
use spot_server::{Config, ServerState};
use tempfile::TempDir;
use tower::ServiceExt;

pub const MODERATOR: (&str, &str) = ("moderator", "moderator-pass-1");
pub const BOUNDARY: &str = "spot-test-boundary";

pub struct TestApp {
    pub state: ServerState,
    pub app: Router,
    _dir: TempDir,
}

/// Fresh server on a temp RocksDB with a bootstrapped moderator
pub async fn spawn() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    config.jwt = JwtConfig {
        secret: "integration-test-secret-0123456789abcdef".to_string(),
        expiration_minutes: 60,
        issuer: "spot-server".to_string(),
        audience: "study-spots-web".to_string(),
    };
    config.max_upload_bytes = 1024 * 1024;
    config.moderator = Some((MODERATOR.0.to_string(), MODERATOR.1.to_string()));

    let state = ServerState::initialize(&config)
        .await
        .expect("Failed to initialize state");
    let app = build_app(state.clone());
    TestApp {
        state,
        app,
        _dir: dir,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: http::HeaderMap,
    pub body: Value,
    pub raw: Vec<u8>,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let raw = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes()
            .to_vec();
        let body = serde_json::from_slice(&raw).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
            raw,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        let mut builder = Request::get(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// urlencoded POST; `fields` values must already be url-safe
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)], token: Option<&str>) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let mut builder = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    pub async fn post_multipart(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &[u8])>,
        token: Option<&str>,
    ) -> TestResponse {
        let body = multipart_body(fields, file);
        let mut builder = Request::post(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    /// Sign up a user and return its token
    pub async fn signup(&self, username: &str) -> String {
        let res = self
            .post_form("/signup", &[("username", username), ("password", "correct-horse")], None)
            .await;
        assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
        res.body["data"]["token"].as_str().expect("token").to_string()
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.post_form("/login", &[("username", username), ("password", password)], None)
            .await
    }

    pub async fn moderator_token(&self) -> String {
        let res = self.login(MODERATOR.0, MODERATOR.1).await;
        assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
        res.body["data"]["token"].as_str().expect("token").to_string()
    }

    /// Create a valid spot and return its id
    pub async fn create_spot(&self, token: &str, name: &str, spot_type: &str) -> String {
        let res = self
            .post_multipart("/create", &spot_fields(name, spot_type), None, Some(token))
            .await;
        assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
        res.body["data"]["id"].as_str().expect("spot id").to_string()
    }
}

pub fn spot_fields<'a>(name: &'a str, spot_type: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("name", name),
        ("address", "70 Washington Sq S"),
        ("location", "On campus"),
        ("spot_type", spot_type),
        ("purchase_required", "No"),
        ("noise_level", "Quiet"),
        ("description", "Plenty of outlets"),
    ]
}

pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Minimal percent-encoding for form values
pub fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => (b as char).to_string(),
            b' ' => "+".to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(3, 3, image::Rgb([20, 120, 220]));
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode png");
    buf
}
