use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use synapse::{
    catalog::GEMINI_PRO,
    gemini::GeminiClient,
    yt::{
        fetch_first_available, transcript::YoutubeTranscripts, TranscriptFetcher,
        DEFAULT_TRANSCRIPT_LANGUAGES,
    },
    Error, FetchError, ModelInvoker,
};
use tokio::net::TcpListener;

/// (route or model call, recorded header, request body or query)
type Recorded = Arc<Mutex<Vec<(String, String, Value)>>>;

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    (listener, base)
}

fn serve(listener: TcpListener, app: Router) {
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
}

fn gemini_stub(status: StatusCode, reply: Value, recorded: Recorded) -> Router {
    Router::new()
        .route(
            "/v1beta/models/:call",
            post(
                move |State(recorded): State<Recorded>,
                      Path(call): Path<String>,
                      headers: HeaderMap,
                      Json(body): Json<Value>| async move {
                    let key = headers
                        .get("x-goog-api-key")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    recorded.lock().unwrap().push((call, key, body));
                    (status, Json(reply))
                },
            ),
        )
        .with_state(recorded)
}

// ─── Gemini ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_gemini_request_shape_and_reply() {
    let recorded = Recorded::default();
    let (listener, base) = bind().await;
    serve(
        listener,
        gemini_stub(
            StatusCode::OK,
            json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Summary."}]},
                    "finishReason": "STOP"
                }]
            }),
            recorded.clone(),
        ),
    );

    let client =
        GeminiClient::new(Some("test-key".into())).with_base_url(format!("{base}/v1beta/"));
    let text = client.invoke("Summarize: Hello world", &GEMINI_PRO).await.unwrap();

    assert_eq!(text, "Summary.");

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    let (call, key, body) = &recorded[0];
    assert_eq!(call, "gemini-1.5-pro-latest:generateContent");
    assert_eq!(key, "test-key");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "Summarize: Hello world");
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
}

#[tokio::test]
async fn test_gemini_error_status_becomes_model_error() {
    let (listener, base) = bind().await;
    serve(
        listener,
        gemini_stub(
            StatusCode::TOO_MANY_REQUESTS,
            json!({
                "error": {
                    "code": 429,
                    "message": "Resource has been exhausted",
                    "status": "RESOURCE_EXHAUSTED"
                }
            }),
            Recorded::default(),
        ),
    );

    let client =
        GeminiClient::new(Some("test-key".into())).with_base_url(format!("{base}/v1beta"));
    let err = client.invoke("prompt", &GEMINI_PRO).await.unwrap_err();

    match err {
        Error::Model { message, details } => {
            assert_eq!(message, "API error: 429 - Resource has been exhausted");
            assert_eq!(details.as_deref(), Some("HTTP status 429"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ─── YouTube ────────────────────────────────────────────────────────────────

fn watch_page(base: &str) -> String {
    format!(
        r#"<html><body><script>var ytInitialPlayerResponse = {{"playabilityStatus":{{"status":"OK"}},"captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":[{{"baseUrl":"{base}/timedtext?v=dQw4w9WgXcQ&lang=vi","languageCode":"vi"}}]}}}},"videoDetails":{{"videoId":"dQw4w9WgXcQ"}}}};</script></body></html>"#
    )
}

const TIMED_TEXT: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="2">xin chào</text><text start="2.5" dur="1">các bạn &amp;amp; bè</text></transcript>"#;

async fn youtube_stub() -> (String, Recorded) {
    let recorded = Recorded::default();
    let (listener, base) = bind().await;
    let page = watch_page(&base);

    let record = |recorded: &Recorded, route: &str, query: HashMap<String, String>, headers: &HeaderMap| {
        let language = headers
            .get("accept-language")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        recorded
            .lock()
            .unwrap()
            .push((route.to_string(), language, json!(query)));
    };

    let app = Router::new()
        .route(
            "/watch",
            get(
                move |State(recorded): State<Recorded>,
                      Query(query): Query<HashMap<String, String>>,
                      headers: HeaderMap| async move {
                    record(&recorded, "watch", query, &headers);
                    page.into_response()
                },
            ),
        )
        .route(
            "/timedtext",
            get(
                move |State(recorded): State<Recorded>,
                      Query(query): Query<HashMap<String, String>>,
                      headers: HeaderMap| async move {
                    record(&recorded, "timedtext", query, &headers);
                    TIMED_TEXT
                },
            ),
        )
        .with_state(recorded.clone());

    serve(listener, app);
    (base, recorded)
}

#[tokio::test]
async fn test_watch_page_leads_to_timedtext_fetch() {
    let (base, recorded) = youtube_stub().await;
    let transcripts = YoutubeTranscripts::new(reqwest::Client::new())
        .with_watch_url(format!("{base}/watch"));

    let segments = transcripts
        .fetch_transcript("https://youtu.be/dQw4w9WgXcQ", "vi")
        .await
        .unwrap();

    let texts = segments.iter().map(|s| s.text.as_str()).collect::<Vec<_>>();
    assert_eq!(texts, vec!["xin chào", "các bạn & bè"]);
    assert_eq!(segments[1].offset, 2.5);

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].0, "watch");
    assert_eq!(recorded[0].1, "vi");
    assert_eq!(recorded[0].2["v"], "dQw4w9WgXcQ");
    assert_eq!(recorded[1].0, "timedtext");
    assert_eq!(recorded[1].2["lang"], "vi");
}

#[tokio::test]
async fn test_missing_track_does_not_fetch_timedtext() {
    let (base, recorded) = youtube_stub().await;
    let transcripts = YoutubeTranscripts::new(reqwest::Client::new())
        .with_watch_url(format!("{base}/watch"));

    let err = transcripts
        .fetch_transcript("dQw4w9WgXcQ", "ja")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchError::LanguageUnavailable { ref available, .. } if available == &vec!["vi".to_string()]
    ));
    assert!(recorded.lock().unwrap().iter().all(|(route, ..)| route == "watch"));
}

#[tokio::test]
async fn test_language_fallback_over_http() {
    let (base, recorded) = youtube_stub().await;
    let transcripts = YoutubeTranscripts::new(reqwest::Client::new())
        .with_watch_url(format!("{base}/watch"));

    let text = fetch_first_available(&transcripts, "dQw4w9WgXcQ", DEFAULT_TRANSCRIPT_LANGUAGES)
        .await
        .unwrap();

    assert_eq!(text, "xin chào các bạn & bè");

    let languages = recorded
        .lock()
        .unwrap()
        .iter()
        .filter(|(route, ..)| route == "watch")
        .map(|(_, language, _)| language.clone())
        .collect::<Vec<_>>();
    assert_eq!(languages, vec!["en", "en-US", "en-GB", "vi"]);
}
