//! HTTP API server.
//!
//! Exposes language detection, canned messages, the translation and image
//! analysis proxies, and chat orchestration as JSON endpoints.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use grizzly_core::{
    config::ServerConfig,
    detect_language, i18n,
    languages::{self, COMMON_LANGUAGES},
    message::{
        extract_and_translate_prompt, ChatMessage, TranslationOptions, ANALYZE_IMAGE_PROMPT,
    },
    traits::{ImageAnnotator, LanguageModel},
    SupportedLanguage,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::chat::{data_url, ChatService};

type ApiError = (StatusCode, Json<Value>);

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    model: Arc<dyn LanguageModel>,
    vision: Arc<dyn ImageAnnotator>,
    chat: Arc<ChatService>,
    api_key: Option<String>,
    uptime: Instant,
    max_upload_bytes: usize,
}

impl ApiState {
    pub fn new(
        config: &ServerConfig,
        model: Arc<dyn LanguageModel>,
        vision: Arc<dyn ImageAnnotator>,
    ) -> Self {
        let api_key = if config.api_key.is_empty() {
            None
        } else {
            Some(config.api_key.clone())
        };
        Self {
            chat: Arc::new(ChatService::new(Arc::clone(&model), Arc::clone(&vision))),
            model,
            vision,
            api_key,
            uptime: Instant::now(),
            max_upload_bytes: config.max_upload_mb.saturating_mul(1024 * 1024),
        }
    }
}

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({"error": message.into()})))
}

/// Constant-time string comparison to prevent timing attacks on API token validation.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Check bearer token auth. No key configured allows all requests.
fn check_auth(headers: &HeaderMap, api_key: &Option<String>) -> Result<(), ApiError> {
    let Some(key) = api_key else {
        return Ok(());
    };

    let value = headers
        .get("authorization")
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "missing Authorization header"))?
        .to_str()
        .map_err(|_| api_error(StatusCode::UNAUTHORIZED, "invalid Authorization header"))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if constant_time_eq(token, key) => Ok(()),
        _ => Err(api_error(StatusCode::UNAUTHORIZED, "invalid token")),
    }
}

fn parse_language(value: Option<&str>) -> Result<SupportedLanguage, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(SupportedLanguage::default()),
        Some(v) => v
            .parse()
            .map_err(|e: grizzly_core::error::GrizzlyError| {
                api_error(StatusCode::BAD_REQUEST, e.to_string())
            }),
    }
}

/// An image file pulled out of a multipart body.
struct ImageUpload {
    bytes: Vec<u8>,
    mime: String,
    file_name: String,
}

/// Split a multipart body into the `image` file and the remaining text fields.
async fn read_upload(
    mut multipart: Multipart,
) -> Result<(Option<ImageUpload>, HashMap<String, String>), ApiError> {
    let bad = |e: axum::extract::multipart::MultipartError| {
        api_error(StatusCode::BAD_REQUEST, format!("invalid multipart body: {e}"))
    };

    let mut image = None;
    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await.map_err(bad)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let mime = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let file_name = field.file_name().unwrap_or("image").to_string();
            let bytes = field.bytes().await.map_err(bad)?;
            if !bytes.is_empty() {
                image = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    mime,
                    file_name,
                });
            }
        } else {
            let value = field.text().await.map_err(bad)?;
            fields.insert(name, value);
        }
    }
    Ok((image, fields))
}

/// `GET /api/health`: Health check with uptime and provider names.
async fn health(
    headers: HeaderMap,
    State(state): State<ApiState>,
) -> Result<Json<Value>, ApiError> {
    check_auth(&headers, &state.api_key)?;

    Ok(Json(json!({
        "status": "ok",
        "uptime_secs": state.uptime.elapsed().as_secs(),
        "translator": state.model.name(),
        "translator_configured": state.model.is_configured(),
        "vision": state.vision.name(),
        "vision_configured": state.vision.is_configured(),
    })))
}

#[derive(Debug, Deserialize)]
struct LanguageQuery {
    language: Option<String>,
}

/// `GET /api/welcome?language=es`: Welcome message.
async fn welcome(
    headers: HeaderMap,
    State(state): State<ApiState>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<Value>, ApiError> {
    check_auth(&headers, &state.api_key)?;
    let lang = parse_language(query.language.as_deref())?;
    let reply = state.chat.welcome(lang);

    Ok(Json(json!({
        "language": lang,
        "message": reply.message.content,
    })))
}

/// `GET /api/languages`: Language picker options.
async fn language_list(
    headers: HeaderMap,
    State(state): State<ApiState>,
) -> Result<Json<Value>, ApiError> {
    check_auth(&headers, &state.api_key)?;

    Ok(Json(json!({
        "common": COMMON_LANGUAGES,
        "all": languages::language_options(),
    })))
}

#[derive(Debug, Deserialize)]
struct TextRequest {
    #[serde(default)]
    text: String,
}

/// `POST /api/detect`: Classify the language of a text.
async fn detect(
    headers: HeaderMap,
    State(state): State<ApiState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<Value>, ApiError> {
    check_auth(&headers, &state.api_key)?;
    let lang = detect_language(&request.text);

    Ok(Json(json!({
        "language": lang,
        "code": lang.code(),
    })))
}

/// `POST /api/chat`: Reply to a user message.
async fn chat(
    headers: HeaderMap,
    State(state): State<ApiState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<Value>, ApiError> {
    check_auth(&headers, &state.api_key)?;
    if request.text.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing required fields"));
    }

    let reply = state.chat.reply_to_text(&request.text).await;
    Ok(Json(json!({
        "id": reply.message.id.to_string(),
        "language": reply.language,
        "code": reply.language.code(),
        "reply": reply.message.content,
        "fallback": reply.fallback,
    })))
}

/// `POST /api/chat/image`: Reply to an uploaded image (multipart: `image`, `language`).
async fn chat_image(
    headers: HeaderMap,
    State(state): State<ApiState>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    check_auth(&headers, &state.api_key)?;
    let (image, fields) = read_upload(multipart).await?;
    let lang = parse_language(fields.get("language").map(String::as_str))?;
    let image = image.ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "No image file provided"))?;
    let upload = ChatMessage::user(i18n::image_label(lang, &image.file_name));

    let reply = state
        .chat
        .reply_to_image(&image.bytes, &image.mime, lang)
        .await;
    Ok(Json(json!({
        "id": reply.message.id.to_string(),
        "language": lang,
        "label": upload.content,
        "userMessage": upload,
        "reply": reply.message.content,
        "fallback": reply.fallback,
    })))
}

#[derive(Debug, Deserialize)]
struct DocumentRequest {
    #[serde(default)]
    name: String,
    language: Option<String>,
}

/// `POST /api/chat/document`: Acknowledge an uploaded document.
async fn chat_document(
    headers: HeaderMap,
    State(state): State<ApiState>,
    Json(request): Json<DocumentRequest>,
) -> Result<Json<Value>, ApiError> {
    check_auth(&headers, &state.api_key)?;
    let lang = parse_language(request.language.as_deref())?;
    let upload = ChatMessage::user(i18n::document_label(lang, &request.name));
    let reply = state.chat.reply_to_document(lang);

    Ok(Json(json!({
        "id": reply.message.id.to_string(),
        "language": lang,
        "label": upload.content,
        "userMessage": upload,
        "reply": reply.message.content,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest {
    text: Option<String>,
    source_language: Option<String>,
    target_language: Option<String>,
}

/// `POST /api/translate`: Translate text with the language model.
async fn translate(
    headers: HeaderMap,
    State(state): State<ApiState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<Value>, ApiError> {
    check_auth(&headers, &state.api_key)?;

    let text = request.text.unwrap_or_default();
    let target = request.target_language.unwrap_or_default();
    if text.trim().is_empty() || target.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing required fields"));
    }

    let options = TranslationOptions::new(
        request.source_language.as_deref().map(languages::display_name),
        languages::display_name(&target),
    );
    let translated = state.model.translate(&text, &options).await.map_err(|e| {
        error!("translate: {e}");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to translate text")
    })?;

    Ok(Json(json!({
        "translatedText": translated,
        "sourceLanguage": request.source_language,
        "targetLanguage": target,
    })))
}

/// `POST /api/analyze-image`: Vision analysis, OCR, or image text translation.
///
/// Multipart fields: `image` (required), `action` (`analyze` | `translate` |
/// `extract`, default `analyze`), `targetLanguage` (default `en`).
async fn analyze_image(
    headers: HeaderMap,
    State(state): State<ApiState>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    check_auth(&headers, &state.api_key)?;
    let (image, fields) = read_upload(multipart).await?;
    let image = image.ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "No image file provided"))?;

    let target = fields
        .get("targetLanguage")
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| "en".to_string());
    let action = fields
        .get("action")
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| "analyze".to_string());

    let failed = |e: grizzly_core::error::GrizzlyError| {
        error!("analyze-image ({action}): {e}");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process image")
    };

    info!(
        "analyze-image: action={action} type={} bytes={}",
        image.mime,
        image.bytes.len()
    );

    match action.as_str() {
        "analyze" => {
            let url = data_url(&image.mime, &image.bytes);
            let (analysis, description) = tokio::join!(
                state.vision.analyze(&image.bytes),
                state.model.analyze_image(&url, ANALYZE_IMAGE_PROMPT),
            );
            Ok(Json(json!({
                "googleVision": analysis.map_err(failed)?,
                "phi4Analysis": description.map_err(failed)?,
            })))
        }
        "translate" => {
            let url = data_url(&image.mime, &image.bytes);
            let prompt = extract_and_translate_prompt(&languages::display_name(&target));
            let translated = state
                .model
                .analyze_image(&url, &prompt)
                .await
                .map_err(failed)?;
            Ok(Json(json!({
                "translatedText": translated,
                "targetLanguage": target,
            })))
        }
        "extract" => {
            let text = state
                .vision
                .detect_text(&image.bytes)
                .await
                .map_err(failed)?;
            Ok(Json(json!({ "extractedText": text })))
        }
        other => Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("invalid action '{other}', expected 'analyze', 'translate' or 'extract'"),
        )),
    }
}

fn build_router(state: ApiState) -> Router {
    let limit = state.max_upload_bytes;
    Router::new()
        .route("/api/health", get(health))
        .route("/api/welcome", get(welcome))
        .route("/api/languages", get(language_list))
        .route("/api/detect", post(detect))
        .route("/api/chat", post(chat))
        .route("/api/chat/image", post(chat_image))
        .route("/api/chat/document", post(chat_document))
        .route("/api/translate", post(translate))
        .route("/api/analyze-image", post(analyze_image))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

/// Bind and serve until the process stops.
pub async fn serve(config: &ServerConfig, state: ApiState) -> anyhow::Result<()> {
    let app = build_router(state);
    let addr = format!("{}:{}", config.host, config.port);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        error!("API server failed to bind to {addr}: {e}");
        anyhow::anyhow!("failed to bind {addr}: {e}")
    })?;

    info!("API server listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockModel, MockVision};
    use axum::body::Body;
    use axum::http::Request;
    use grizzly_core::message::VisionAnalysis;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const BOUNDARY: &str = "grizzly-test-boundary";

    // -----------------------------------------------------------------------
    // Test helpers
    // -----------------------------------------------------------------------

    fn test_router_with(api_key: &str, model: MockModel, vision: MockVision) -> Router {
        let config = ServerConfig {
            api_key: api_key.to_string(),
            ..Default::default()
        };
        build_router(ApiState::new(&config, Arc::new(model), Arc::new(vision)))
    }

    fn test_router(model: MockModel, vision: MockVision) -> Router {
        test_router_with("", model, vision)
    }

    fn offline_router() -> Router {
        test_router(MockModel::failing(), MockVision::failing())
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Build a multipart body with an optional `image` part plus text fields.
    fn multipart_request(uri: &str, image: Option<&[u8]>, fields: &[(&str, &str)]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(bytes) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"bear.png\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::post(uri)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    /// Parse response body as JSON.
    async fn body_json(resp: axum::http::Response<Body>) -> Value {
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    // -----------------------------------------------------------------------
    // Auth and health
    // -----------------------------------------------------------------------

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("secret", "secret"));
        assert!(!constant_time_eq("secret", "secreT"));
        assert!(!constant_time_eq("secret", "secret2"));
    }

    #[tokio::test]
    async fn test_health_no_auth() {
        let app = offline_router();
        let req = Request::get("/api/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["translator"], "mock-model");
        assert_eq!(json["vision"], "mock-vision");
    }

    #[tokio::test]
    async fn test_health_valid_auth() {
        let app = test_router_with("secret", MockModel::failing(), MockVision::failing());
        let req = Request::get("/api/health")
            .header("Authorization", "Bearer secret")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_bad_auth_rejected() {
        let app = test_router_with("secret", MockModel::failing(), MockVision::failing());
        let req = Request::get("/api/health")
            .header("Authorization", "Bearer wrong")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_missing_auth_rejected() {
        let app = test_router_with("secret", MockModel::failing(), MockVision::failing());
        let resp = app
            .oneshot(json_request("/api/detect", r#"{"text":"hola"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    // -----------------------------------------------------------------------
    // Language endpoints
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_welcome_defaults_to_english() {
        let app = offline_router();
        let req = Request::get("/api/welcome").body(Body::empty()).unwrap();
        let json = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(json["language"], "english");
        assert_eq!(
            json["message"],
            "Hello! I'm Grizzly, your AI assistant. How can I help you today?"
        );
    }

    #[tokio::test]
    async fn test_welcome_spanish_by_code() {
        let app = offline_router();
        let req = Request::get("/api/welcome?language=es")
            .body(Body::empty())
            .unwrap();
        let json = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(json["language"], "spanish");
    }

    #[tokio::test]
    async fn test_welcome_unknown_language() {
        let app = offline_router();
        let req = Request::get("/api/welcome?language=klingon")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_detect() {
        let app = offline_router();
        let resp = app
            .clone()
            .oneshot(json_request("/api/detect", r#"{"text":"Hola, ¿cómo estás?"}"#))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["language"], "spanish");
        assert_eq!(json["code"], "es");

        let resp = app
            .oneshot(json_request("/api/detect", r#"{"text":""}"#))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["language"], "english");
    }

    #[tokio::test]
    async fn test_languages() {
        let app = offline_router();
        let req = Request::get("/api/languages").body(Body::empty()).unwrap();
        let json = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(json["common"][1], json!({"label": "Spanish", "value": "es"}));
        assert!(json["all"].as_array().unwrap().len() > 100);
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_chat_translates() {
        let app = test_router(MockModel::answering("Hello friend"), MockVision::failing());
        let resp = app
            .oneshot(json_request("/api/chat", r#"{"text":"Hola amigo"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["language"], "spanish");
        assert_eq!(json["reply"], "Hello friend");
        assert_eq!(json["fallback"], false);
    }

    #[tokio::test]
    async fn test_chat_provider_failure_still_replies() {
        let app = offline_router();
        let resp = app
            .oneshot(json_request("/api/chat", r#"{"text":"Hello there"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["fallback"], true);
        let reply = json["reply"].as_str().unwrap();
        assert!(i18n::variants(SupportedLanguage::English).any(|v| v == reply));
    }

    #[tokio::test]
    async fn test_chat_empty_text_rejected() {
        let app = offline_router();
        let resp = app
            .oneshot(json_request("/api/chat", r#"{"text":"  "}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_document() {
        let app = offline_router();
        let resp = app
            .oneshot(json_request(
                "/api/chat/document",
                r#"{"name":"informe.pdf","language":"spanish"}"#,
            ))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["label"], "[Documento: informe.pdf]");
        assert_eq!(json["userMessage"]["role"], "user");
        assert_eq!(json["userMessage"]["content"], "[Documento: informe.pdf]");
        assert_ne!(json["userMessage"]["id"], json["id"]);
        assert_eq!(
            json["reply"],
            "He recibido tu documento. Déjame procesarlo y extraer la información..."
        );
    }

    #[tokio::test]
    async fn test_chat_image_summary_fallback() {
        let app = test_router(MockModel::failing(), MockVision::with_labels(&["Bear", "Forest"]));
        let req = multipart_request("/api/chat/image", Some(b"\x89PNG"), &[("language", "en")]);
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["label"], "[Image: bear.png]");
        assert_eq!(json["userMessage"]["role"], "user");
        assert_eq!(json["userMessage"]["content"], "[Image: bear.png]");
        assert_eq!(
            json["reply"],
            "I see the following in your image: Bear, Forest."
        );
    }

    #[tokio::test]
    async fn test_chat_image_missing_file() {
        let app = offline_router();
        let req = multipart_request("/api/chat/image", None, &[("language", "es")]);
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    // -----------------------------------------------------------------------
    // Translate proxy
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_translate_ok() {
        let model = MockModel::answering("Buenos días");
        let calls = model.calls();
        let app = test_router(model, MockVision::failing());
        let resp = app
            .oneshot(json_request(
                "/api/translate",
                r#"{"text":"Good morning","sourceLanguage":"en","targetLanguage":"es"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["translatedText"], "Buenos días");
        assert_eq!(json["sourceLanguage"], "en");
        assert_eq!(json["targetLanguage"], "es");
        assert!(calls.lock().unwrap()[0].contains("from English to Spanish"));
    }

    #[tokio::test]
    async fn test_translate_missing_fields() {
        let app = offline_router();
        let resp = app
            .oneshot(json_request("/api/translate", r#"{"text":"Hello"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Missing required fields");
    }

    #[tokio::test]
    async fn test_translate_provider_failure() {
        let app = offline_router();
        let resp = app
            .oneshot(json_request(
                "/api/translate",
                r#"{"text":"Hello","targetLanguage":"es"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Failed to translate text");
    }

    // -----------------------------------------------------------------------
    // Analyze-image proxy
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_analyze_image_missing_file() {
        let app = offline_router();
        let req = multipart_request("/api/analyze-image", None, &[("action", "analyze")]);
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "No image file provided");
    }

    #[tokio::test]
    async fn test_analyze_image_default_action() {
        let vision = MockVision::returning(VisionAnalysis {
            text: "HELLO".into(),
            ..MockVision::analysis(&["Sign"])
        });
        let app = test_router(MockModel::answering("A sign saying hello."), vision);
        let req = multipart_request("/api/analyze-image", Some(b"img"), &[]);
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["phi4Analysis"], "A sign saying hello.");
        assert_eq!(json["googleVision"]["labels"][0]["description"], "Sign");
        assert_eq!(json["googleVision"]["text"], "HELLO");
    }

    #[tokio::test]
    async fn test_analyze_image_translate_action() {
        let model = MockModel::answering("Hola");
        let calls = model.calls();
        let app = test_router(model, MockVision::failing());
        let req = multipart_request(
            "/api/analyze-image",
            Some(b"img"),
            &[("action", "translate"), ("targetLanguage", "es")],
        );
        let json = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(json["translatedText"], "Hola");
        assert_eq!(json["targetLanguage"], "es");
        assert!(calls.lock().unwrap()[0].contains("translate it to Spanish"));
    }

    #[tokio::test]
    async fn test_analyze_image_extract_action() {
        let vision = MockVision::returning(VisionAnalysis {
            text: "EXIT".into(),
            ..Default::default()
        });
        let app = test_router(MockModel::failing(), vision);
        let req = multipart_request("/api/analyze-image", Some(b"img"), &[("action", "extract")]);
        let json = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(json, json!({"extractedText": "EXIT"}));
    }

    #[tokio::test]
    async fn test_analyze_image_provider_failure() {
        let app = test_router(MockModel::answering("ok"), MockVision::failing());
        let req = multipart_request("/api/analyze-image", Some(b"img"), &[]);
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Failed to process image");
    }

    #[tokio::test]
    async fn test_analyze_image_unknown_action() {
        let app = offline_router();
        let req = multipart_request("/api/analyze-image", Some(b"img"), &[("action", "paint")]);
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
