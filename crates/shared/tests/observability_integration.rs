//! 可观测性模块集成测试
//!
//! 测试 metrics 记录函数和 HTTP 中间件的核心行为。

// ============================================================================
// 指标记录测试
// ============================================================================

mod metrics_tests {
    use event_shared::observability::metrics::{
        record_http_request, record_rate_limit_decision, record_rate_limit_sweep,
        record_request_timeout, set_rate_limit_tracked_clients,
    };

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/api/rate-limit", 200, 0.05);
        record_http_request("GET", "/health", 200, 0.001);
        record_http_request("GET", "/api/rate-limit", 429, 0.0002);
        record_http_request("GET", "/api/slow", 408, 30.0);
    }

    #[test]
    fn test_record_rate_limit_metrics() {
        record_rate_limit_decision(true);
        record_rate_limit_decision(false);
        set_rate_limit_tracked_clients(0);
        set_rate_limit_tracked_clients(10_000);
        record_rate_limit_sweep(0);
        record_rate_limit_sweep(42);
        record_request_timeout("POST", "/api/upload");
    }

    #[test]
    fn test_metrics_with_edge_cases() {
        // 空字符串
        record_http_request("", "", 0, 0.0);

        // 超长路径
        let long_path = "/api/".to_string() + &"x".repeat(1000);
        record_http_request("GET", &long_path, 200, 0.01);

        // 特殊字符
        record_http_request("GET", "/api/events?id=123&name=test", 200, 0.01);
    }
}

// ============================================================================
// 中间件测试
// ============================================================================

mod middleware_tests {
    use axum::{
        Extension, Router,
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use event_shared::observability::middleware::{
        REQUEST_ID_HEADER, RequestId, UNMATCHED_PATH_LABEL, http_tracing, metrics_path_label,
        request_id,
    };
    use tower::ServiceExt;

    async fn echo_request_id(Extension(id): Extension<RequestId>) -> String {
        id.as_str().to_string()
    }

    fn create_test_app() -> Router {
        Router::new()
            .route("/echo", get(echo_request_id))
            .layer(middleware::from_fn(http_tracing))
            .layer(middleware::from_fn(request_id))
    }

    #[tokio::test]
    async fn test_request_id_generated_when_missing() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let header = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(uuid::Uuid::parse_str(&header).is_ok());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, header.as_bytes());
    }

    #[tokio::test]
    async fn test_request_id_propagated() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/echo")
                    .header(REQUEST_ID_HEADER, "upstream-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).unwrap(),
            "upstream-42"
        );
    }

    #[tokio::test]
    async fn test_tracing_passes_status_through() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    // ------------------------------------------------------------------------
    // 指标 path 标签
    // ------------------------------------------------------------------------

    const PATH_LABEL_HEADER: &str = "x-test-path-label";

    async fn expose_path_label(
        request: axum::extract::Request,
        next: axum::middleware::Next,
    ) -> axum::response::Response {
        let label = metrics_path_label(&request);
        let mut response = next.run(request).await;
        response
            .headers_mut()
            .insert(PATH_LABEL_HEADER, label.parse().unwrap());
        response
    }

    fn create_label_app() -> Router {
        Router::new()
            .nest(
                "/api",
                Router::new().route("/items/{id}", get(|| async { "item" })),
            )
            .layer(middleware::from_fn(expose_path_label))
    }

    async fn path_label_for(uri: &str) -> String {
        let response = create_label_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        response
            .headers()
            .get(PATH_LABEL_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_path_label_uses_route_template() {
        assert_eq!(path_label_for("/api/items/42").await, "/api/items/{id}");
        assert_eq!(path_label_for("/api/items/43").await, "/api/items/{id}");
    }

    #[tokio::test]
    async fn test_path_label_collapses_unknown_routes() {
        for uri in ["/random-1", "/random-2", "/api/items/1/extra"] {
            assert_eq!(path_label_for(uri).await, UNMATCHED_PATH_LABEL);
        }
    }
}
