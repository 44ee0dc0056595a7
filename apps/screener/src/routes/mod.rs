pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_sessions::cookie::{time::Duration, SameSite};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::api::handlers as api;
use crate::screens::{files, handlers as screens};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let idle_secs = i64::try_from(state.config.session_idle.as_secs()).unwrap_or(i64::MAX);
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(idle_secs)))
        .with_same_site(SameSite::Lax)
        .with_http_only(true);

    // Screens carry per-visitor state through the cookie session
    let screen_routes = Router::new()
        .route("/", get(screens::handle_home))
        .route("/start", post(screens::handle_start))
        .route(
            "/upload-jd",
            get(screens::handle_upload_jd_form).post(screens::handle_upload_jd),
        )
        .route(
            "/upload-resumes",
            get(screens::handle_upload_resumes_form).post(screens::handle_upload_resumes),
        )
        .route("/results", get(screens::handle_results))
        .layer(session_layer);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/files/:link_id", get(files::handle_file))
        .route("/api/v1/rankings", post(api::handle_rank))
        .merge(screen_routes)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::Config;

    const BOUNDARY: &str = "screener-test-boundary";

    fn app() -> (Router, AppState) {
        let state = AppState::new(Config::default());
        (build_router(state.clone()), state)
    }

    fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Body {
        let mut body = Vec::new();
        for (field, file_name, content) in parts {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Body::from(body)
    }

    fn upload(uri: &str, cookie: Option<&str>, parts: &[(&str, &str, &[u8])]) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(multipart_body(parts)).unwrap()
    }

    fn get_req(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_empty(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn session_cookie(response: &Response) -> String {
        let raw = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("session cookie set")
            .to_str()
            .unwrap();
        raw.split(';').next().unwrap().to_string()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Every `/files/<id>` href in a results page, in table order (view link first).
    fn file_links(html: &str) -> Vec<String> {
        html.match_indices("href=\"/files/")
            .map(|(i, m)| {
                let start = i + m.len();
                html[start..start + 36].to_string()
            })
            .collect()
    }

    /// Starts a flow and uploads the job description; returns the session cookie.
    async fn flow_with_jd(app: &Router, jd_name: &str) -> String {
        let response = app.clone().oneshot(post_empty("/start", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/upload-jd");
        let cookie = session_cookie(&response);

        let response = app
            .clone()
            .oneshot(upload(
                "/upload-jd",
                Some(&cookie),
                &[("job_description", jd_name, b"%PDF-jd")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/upload-resumes");
        cookie
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let response = app.oneshot(get_req("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["service"], "resume-screener");
    }

    #[tokio::test]
    async fn test_home_page() {
        let (app, _) = app();
        let response = app.oneshot(get_req("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Welcome to Our Resume Screening App"));
        assert!(html.contains("Get Started"));
    }

    #[tokio::test]
    async fn test_full_flow_ranks_and_serves_links() {
        let (app, state) = app();
        let cookie = flow_with_jd(&app, "backend-engineer.pdf").await;

        let html = body_text(
            app.clone()
                .oneshot(get_req("/upload-jd", Some(&cookie)))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("Uploaded: backend-engineer.pdf"));

        let response = app
            .clone()
            .oneshot(upload(
                "/upload-resumes",
                Some(&cookie),
                &[
                    ("resumes", "random_cv.pdf", b"random bytes"),
                    ("resumes", "backend_engineer_resume.pdf", b"backend bytes"),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/results");

        let html = body_text(
            app.clone()
                .oneshot(get_req("/upload-resumes", Some(&cookie)))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("2 files uploaded"));

        let response = app
            .clone()
            .oneshot(get_req("/results", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Resume Rankings"));
        assert!(html.contains("<table>"));
        let first = html.find("backend_engineer_resume.pdf").unwrap();
        let second = html.find("random_cv.pdf").unwrap();
        assert!(first < second, "higher score must be listed first");
        assert!(html.contains("<td>70</td>"));
        assert!(html.contains("Good match. Add more relevant keywords."));
        assert!(html.contains("<td>50</td>"));
        assert!(html.contains("medal gold"));
        assert!(html.contains("medal silver"));

        let links = file_links(&html);
        assert_eq!(links.len(), 4); // view + download per row
        assert_eq!(state.flows.links().len(), 2);

        let response = app
            .clone()
            .oneshot(get_req(&format!("/files/{}", links[0]), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "inline; filename=\"backend_engineer_resume.pdf\"; filename*=UTF-8''backend_engineer_resume.pdf"
        );
        assert_eq!(body_text(response).await, "backend bytes");

        let response = app
            .clone()
            .oneshot(get_req(&format!("/files/{}?download=true", links[0]), None))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"backend_engineer_resume.pdf\"; filename*=UTF-8''backend_engineer_resume.pdf"
        );
    }

    #[tokio::test]
    async fn test_new_resumes_revoke_previous_links() {
        let (app, state) = app();
        let cookie = flow_with_jd(&app, "backend-engineer.pdf").await;
        app.clone()
            .oneshot(upload(
                "/upload-resumes",
                Some(&cookie),
                &[("resumes", "first.pdf", b"one")],
            ))
            .await
            .unwrap();
        let html = body_text(
            app.clone()
                .oneshot(get_req("/results", Some(&cookie)))
                .await
                .unwrap(),
        )
        .await;
        let old_link = file_links(&html)[0].clone();

        app.clone()
            .oneshot(upload(
                "/upload-resumes",
                Some(&cookie),
                &[("resumes", "second.pdf", b"two")],
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(get_req(&format!("/files/{old_link}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(state.flows.links().is_empty());
    }

    #[tokio::test]
    async fn test_equal_scores_keep_upload_order_on_screen() {
        let (app, _) = app();
        let cookie = flow_with_jd(&app, "backend-engineer.pdf").await;
        app.clone()
            .oneshot(upload(
                "/upload-resumes",
                Some(&cookie),
                &[
                    ("resumes", "r1-backend-engineer.pdf", b"1"),
                    ("resumes", "r2-backend-engineer.pdf", b"2"),
                ],
            ))
            .await
            .unwrap();
        let html = body_text(
            app.clone()
                .oneshot(get_req("/results", Some(&cookie)))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.find("r1-backend-engineer.pdf").unwrap() < html.find("r2-backend-engineer.pdf").unwrap());
    }

    #[tokio::test]
    async fn test_missing_job_description_is_prompted() {
        let (app, _) = app();
        let response = app
            .oneshot(upload("/upload-jd", None, &[("job_description", "", b"")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(html.contains("Please upload a Job Description first!"));
        assert!(html.contains("Upload Job Description"));
    }

    #[tokio::test]
    async fn test_resumes_without_job_description_are_prompted() {
        let (app, state) = app();
        let response = app
            .oneshot(upload("/upload-resumes", None, &[("resumes", "cv.pdf", b"cv")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(html.contains("Please upload resumes and a job description!"));
        assert!(state.flows.is_empty());
    }

    #[tokio::test]
    async fn test_new_job_description_empties_resume_screen() {
        let (app, _) = app();
        let cookie = flow_with_jd(&app, "backend-engineer.pdf").await;
        app.clone()
            .oneshot(upload(
                "/upload-resumes",
                Some(&cookie),
                &[("resumes", "backend.pdf", b"b")],
            ))
            .await
            .unwrap();

        app.clone()
            .oneshot(upload(
                "/upload-jd",
                Some(&cookie),
                &[("job_description", "data-analyst.pdf", b"jd")],
            ))
            .await
            .unwrap();

        let html = body_text(
            app.clone()
                .oneshot(get_req("/upload-resumes", Some(&cookie)))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("0 files uploaded"));
        assert!(!html.contains("backend.pdf"));
    }

    #[tokio::test]
    async fn test_malformed_multipart_is_invalid_upload() {
        let (app, _) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/rankings")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from("this is not a multipart body"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(value["error"]["code"], "INVALID_UPLOAD");
    }

    #[tokio::test]
    async fn test_upload_over_body_limit_is_rejected() {
        let config = Config {
            max_upload_bytes: 1024,
            ..Config::default()
        };
        let app = build_router(AppState::new(config));
        let big = vec![b'x'; 4096];
        let response = app
            .oneshot(upload(
                "/api/v1/rankings",
                None,
                &[
                    ("job_description", "jd.pdf", b"jd"),
                    ("resumes", "big.pdf", big.as_slice()),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(value["error"]["code"], "INVALID_UPLOAD");
    }

    #[tokio::test]
    async fn test_no_resumes_selected_is_prompted() {
        let (app, _) = app();
        let cookie = flow_with_jd(&app, "jd.pdf").await;
        let response = app
            .oneshot(upload("/upload-resumes", Some(&cookie), &[("resumes", "", b"")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response)
            .await
            .contains("Please upload resumes and a job description!"));
    }

    #[tokio::test]
    async fn test_results_without_resumes_show_empty_state() {
        let (app, _) = app();
        let response = app.oneshot(get_req("/results", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("No resumes uploaded. Please go back and upload resumes."));
        assert!(!html.contains("<table>"));
    }

    #[tokio::test]
    async fn test_start_again_discards_previous_flow() {
        let (app, state) = app();
        let cookie = flow_with_jd(&app, "backend-engineer.pdf").await;
        app.clone()
            .oneshot(upload(
                "/upload-resumes",
                Some(&cookie),
                &[("resumes", "backend.pdf", b"b")],
            ))
            .await
            .unwrap();
        app.clone()
            .oneshot(get_req("/results", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(state.flows.links().len(), 1);

        let response = app
            .clone()
            .oneshot(post_empty("/start", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(state.flows.links().is_empty());

        let html = body_text(
            app.clone()
                .oneshot(get_req("/results", Some(&cookie)))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("No resumes uploaded."));
    }

    #[tokio::test]
    async fn test_unknown_file_link_is_not_found() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(get_req("/files/not-a-link", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(get_req(
                "/files/6f1c5d2e-8a4b-4c1f-9e3a-2b7d9c0e1f23",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_ranks_without_session() {
        let (app, state) = app();
        let response = app
            .oneshot(upload(
                "/api/v1/rankings",
                None,
                &[
                    ("job_description", "backend-engineer.pdf", b"jd"),
                    ("resumes", "random_cv.pdf", b"a"),
                    ("resumes", "backend_engineer_resume.pdf", b"b"),
                    ("resumes", "engineer.pdf", b"c"),
                    ("resumes", "intern.pdf", b"d"),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = serde_json::from_str(&body_text(response).await).unwrap();

        assert_eq!(value["scorer"], "filename-overlap");
        assert_eq!(value["job_description"]["tokens"], serde_json::json!(["backend", "engineer"]));

        let results = value["results"].as_array().unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0]["name"], "backend_engineer_resume.pdf");
        assert_eq!(results[0]["score"], 70);
        assert_eq!(results[0]["medal"], "gold");
        assert_eq!(results[0]["tier"], "good");
        assert_eq!(results[0]["matched_keywords"], 2);
        assert_eq!(results[1]["name"], "engineer.pdf");
        assert_eq!(results[1]["score"], 60);
        assert_eq!(results[2]["name"], "random_cv.pdf");
        assert_eq!(results[2]["medal"], "bronze");
        assert_eq!(results[3]["name"], "intern.pdf");
        assert_eq!(results[3]["rank"], 4);
        assert!(results[3]["medal"].is_null());
        assert_eq!(
            results[3]["suggestion"],
            "Consider tailoring your resume to the job title."
        );
        assert!(state.flows.links().is_empty());
    }

    #[tokio::test]
    async fn test_api_requires_both_inputs() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(upload(
                "/api/v1/rankings",
                None,
                &[("resumes", "cv.pdf", b"a")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(value["error"]["code"], "MISSING_INPUT");
        assert_eq!(
            value["error"]["message"],
            "Please upload a Job Description first!"
        );

        let response = app
            .oneshot(upload(
                "/api/v1/rankings",
                None,
                &[("job_description", "jd.pdf", b"jd")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(
            value["error"]["message"],
            "Please upload resumes and a job description!"
        );
    }
}
