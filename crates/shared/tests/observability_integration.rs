//! 可观测性模块集成测试
//!
//! 测试 metrics、middleware 和配置的核心功能。

// ============================================================================
// 指标记录测试
// ============================================================================

mod metrics_tests {
    use advancement_shared::observability::metrics::{
        record_cache_lookup, record_conversion_failure, record_http_request,
        record_identity_lookup,
    };

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/api/v1/healthcheck", 200, 0.001);
        record_http_request("GET", "/api/v1/players", 200, 0.35);
        record_http_request("GET", "/api/v1/advancement/not-a-uuid", 400, 0.002);
        record_http_request("GET", "/api/v1/advancement/unknown", 404, 0.004);
        record_http_request("OPTIONS", "/api/v1/players", 200, 0.0);
    }

    #[test]
    fn test_record_collector_metrics() {
        record_cache_lookup(true);
        record_cache_lookup(false);
        record_conversion_failure();
        for outcome in ["cached", "resolved", "failed"] {
            record_identity_lookup(outcome);
        }
    }

    #[test]
    fn test_metrics_with_edge_cases() {
        record_http_request("", "", 0, 0.0);

        let long_path = "/api/v1/advancement/".to_string() + &"x".repeat(1000);
        record_http_request("GET", &long_path, 200, 0.01);

        record_http_request("GET", "/api/v1/advancement/id?condition=done", 200, 999.99);
    }
}

// ============================================================================
// 中间件测试
// ============================================================================

mod middleware_tests {
    use advancement_shared::observability::middleware::{
        REQUEST_ID_HEADER, RequestId, http_tracing, request_id,
    };
    use axum::{
        Extension, Router,
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    #[test]
    fn test_request_id_wrapper() {
        let id = RequestId("test-id-123".to_string());
        assert_eq!(id.as_str(), "test-id-123");
        assert!(format!("{:?}", id.clone()).contains("test-id-123"));
    }

    #[tokio::test]
    async fn test_request_id_visible_to_handler() {
        let app = Router::new()
            .route(
                "/echo",
                get(|Extension(id): Extension<RequestId>| async move { id.0 }),
            )
            .layer(middleware::from_fn(http_tracing))
            .layer(middleware::from_fn(request_id));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/echo")
                    .header(REQUEST_ID_HEADER, "abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"abc");
    }

    #[tokio::test]
    async fn test_tracing_passes_through_errors() {
        let app = Router::new()
            .route("/fail", get(|| async { StatusCode::NOT_FOUND }))
            .layer(middleware::from_fn(http_tracing));

        let response = app
            .oneshot(Request::builder().uri("/fail").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// `http_requests_total` 在渲染结果中的序列行
    fn request_series(rendered: &str) -> Vec<&str> {
        rendered
            .lines()
            .filter(|line| line.starts_with("http_requests_total{"))
            .collect()
    }

    #[tokio::test]
    async fn test_path_parameters_share_one_series() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let app = Router::new()
            .route("/advancement/{id}", get(|| async { StatusCode::NOT_FOUND }))
            .layer(middleware::from_fn(http_tracing));

        for i in 0..20 {
            let uri = format!("/advancement/player-{i}");
            app.clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
        }

        let rendered = handle.render();
        let series = request_series(&rendered);
        assert_eq!(series.len(), 1, "{rendered}");
        assert!(series[0].contains(r#"path="/advancement/{id}""#));
        assert!(series[0].ends_with(" 20"));
    }

    #[tokio::test]
    async fn test_unrouted_requests_share_one_series() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn(http_tracing));

        for uri in ["/random/a", "/random/b", "/other"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        let rendered = handle.render();
        let series = request_series(&rendered);
        assert_eq!(series.len(), 1, "{rendered}");
        assert!(series[0].contains(r#"path="unmatched""#));
    }
}

// ============================================================================
// 配置测试
// ============================================================================

mod config_tests {
    use advancement_shared::observability::ObservabilityConfig;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.service_name, "unknown-service");
        assert_eq!(config.metrics_port, 9090);
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
        assert!(!config.metrics_enabled);
    }

    #[test]
    fn test_custom_config() {
        let config = ObservabilityConfig {
            service_name: "my-service".to_string(),
            log_level: "debug".to_string(),
            json_logs: true,
            metrics_enabled: true,
            metrics_port: 9091,
        };

        assert_eq!(config.metrics_port, 9091);
        assert!(config.json_logs);
        assert!(config.metrics_enabled);
    }
}

// ============================================================================
// Guard 测试
// ============================================================================

mod guard_tests {
    use advancement_shared::observability::ObservabilityGuard;

    #[test]
    fn test_empty_guard() {
        let guard = ObservabilityGuard::empty();
        drop(guard);
    }

    #[test]
    fn test_guard_drop() {
        for _ in 0..10 {
            let guard = ObservabilityGuard::empty();
            drop(guard);
        }
    }
}
