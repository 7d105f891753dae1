//! Loader Module Tests
//!
//! ## Test Scopes
//! - **Envelope**: Lenient parsing of `{ ok, rows }` and row normalization.
//! - **Registry**: Register-before-send, exactly-once invocation, cleanup.
//! - **Fallback policy**: Which transport runs when, using fake transports.
//! - **Transports**: Both strategies against an in-process HTTP endpoint.

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::error::DirectoryError;
    use crate::loader::registry::CallbackRegistry;
    use crate::loader::service::{Loader, records_from_envelope};
    use crate::loader::transport::{
        CallbackTransport, DirectTransport, Transport, TransportFuture, listing_url,
    };
    use crate::loader::types::ListingEnvelope;
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn sample_envelope(ok: bool) -> serde_json::Value {
        json!({
            "ok": ok,
            "rows": [
                {
                    "name": "健康食品A社",
                    "message": "毎日の食育をサポート",
                    "category": "健康・医療",
                    "url": "https://a.example.com"
                },
                {
                    "name": "クラウド工房",
                    "message": "中小企業のIT導入支援",
                    "category": "IT",
                    "url": "https://b.example.com",
                    "styleClass": "featured"
                }
            ]
        })
    }

    async fn spawn_endpoint(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/exec", addr)
    }

    /// How the fake endpoint answers plain and callback-style requests.
    #[derive(Clone, Copy)]
    enum Mode {
        /// Plain requests succeed.
        DirectOk,
        /// Plain requests get `{ok:false}`, callback requests succeed.
        DirectNotOk,
        /// Plain requests get a 500, callback requests succeed.
        DirectError,
        /// Plain requests fail and the script cannot be loaded.
        Broken,
        /// Plain requests fail and the script calls a different function.
        WrongCallback,
    }

    #[derive(Clone)]
    struct Endpoint {
        mode: Mode,
        direct_hits: Arc<AtomicUsize>,
        callback_hits: Arc<AtomicUsize>,
    }

    async fn listing(
        State(endpoint): State<Endpoint>,
        Query(params): Query<HashMap<String, String>>,
    ) -> (StatusCode, String) {
        assert_eq!(params.get("activeOnly").map(String::as_str), Some("true"));

        match params.get("callback") {
            None => {
                endpoint.direct_hits.fetch_add(1, Ordering::SeqCst);
                match endpoint.mode {
                    Mode::DirectOk => (StatusCode::OK, sample_envelope(true).to_string()),
                    Mode::DirectNotOk => (StatusCode::OK, json!({"ok": false}).to_string()),
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
                }
            }
            Some(callback) => {
                endpoint.callback_hits.fetch_add(1, Ordering::SeqCst);
                assert!(params.contains_key("t"), "Callback requests carry a timestamp");
                match endpoint.mode {
                    Mode::Broken => (StatusCode::NOT_FOUND, String::new()),
                    Mode::WrongCallback => (
                        StatusCode::OK,
                        format!("someoneElse({});", sample_envelope(true)),
                    ),
                    _ => (
                        StatusCode::OK,
                        format!("{}({});", callback, sample_envelope(true)),
                    ),
                }
            }
        }
    }

    async fn spawn_listing(mode: Mode) -> (String, Endpoint) {
        let endpoint = Endpoint {
            mode,
            direct_hits: Arc::new(AtomicUsize::new(0)),
            callback_hits: Arc::new(AtomicUsize::new(0)),
        };
        let app = Router::new()
            .route("/exec", get(listing))
            .with_state(endpoint.clone());
        (spawn_endpoint(app).await, endpoint)
    }

    fn http_loader(url: &str, registry: Arc<CallbackRegistry>, timeout: Option<Duration>) -> Loader {
        let client = reqwest::Client::new();
        Loader::new(
            Some(url.to_string()),
            Box::new(DirectTransport::new(client.clone())),
            Box::new(CallbackTransport::new(client, registry, timeout)),
        )
    }

    // ============================================================
    // ENVELOPE TESTS
    // ============================================================

    #[test]
    fn test_envelope_rows_are_normalized() {
        let envelope = ListingEnvelope::from_value(sample_envelope(true)).unwrap();
        let records = records_from_envelope(&envelope);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, "健康", "Legacy category mapped");
        assert_eq!(records[0].style_class, "health", "Style class derived");
        assert_eq!(records[1].category, "IT");
        assert_eq!(records[1].style_class, "featured", "Explicit style class kept");
    }

    #[test]
    fn test_non_array_rows_become_empty() {
        let envelope = ListingEnvelope::from_value(json!({"ok": true, "rows": "nope"})).unwrap();
        assert!(records_from_envelope(&envelope).is_empty());

        let envelope = ListingEnvelope::from_value(json!({"ok": true})).unwrap();
        assert!(records_from_envelope(&envelope).is_empty());
    }

    #[test]
    fn test_missing_fields_default_and_bad_rows_are_skipped() {
        let envelope = ListingEnvelope::from_value(json!({
            "ok": true,
            "rows": [{"name": "名前だけ"}, 42, {"name": "二社目", "category": "未知"}]
        }))
        .unwrap();
        let records = records_from_envelope(&envelope);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "");
        assert_eq!(records[0].style_class, "others");
        assert_eq!(records[1].category, "未知");
    }

    #[test]
    fn test_null_and_numeric_cells_are_coerced() {
        let envelope = ListingEnvelope::from_value(json!({
            "ok": true,
            "rows": [
                {"name": "A社", "message": null, "category": "健康", "url": "https://a.example.com", "styleClass": null},
                {"name": 123, "message": 4.5, "category": "IT", "url": true}
            ]
        }))
        .unwrap();
        let records = records_from_envelope(&envelope);

        assert_eq!(records.len(), 2, "No row is dropped for cell types");
        assert_eq!(records[0].message, "");
        assert_eq!(records[0].style_class, "health", "Null style class falls back");
        assert_eq!(records[1].name, "123");
        assert_eq!(records[1].message, "4.5");
        assert_eq!(records[1].url, "true");
    }

    #[test]
    fn test_nested_cell_values_skip_the_row() {
        let envelope = ListingEnvelope::from_value(json!({
            "ok": true,
            "rows": [{"name": ["A", "B"]}, {"name": "B社"}]
        }))
        .unwrap();
        let records = records_from_envelope(&envelope);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "B社");
    }

    #[test]
    fn test_envelope_requires_explicit_ok() {
        assert!(ListingEnvelope::from_body(r#"{"ok": true, "rows": []}"#).unwrap().ensure_ok().is_ok());

        let not_ok = ListingEnvelope::from_body(r#"{"ok": false, "rows": []}"#).unwrap();
        assert!(matches!(not_ok.ensure_ok(), Err(DirectoryError::InvalidEnvelope(_))));

        let missing = ListingEnvelope::from_body(r#"{"rows": []}"#).unwrap();
        assert!(missing.ensure_ok().is_err());
    }

    #[test]
    fn test_malformed_body_is_invalid_envelope() {
        let result = ListingEnvelope::from_body("<html>not json</html>");
        assert!(matches!(result, Err(DirectoryError::InvalidEnvelope(_))));
    }

    #[test]
    fn test_listing_url() {
        assert_eq!(
            listing_url("https://script.example.com/exec"),
            "https://script.example.com/exec?activeOnly=true"
        );
        assert_eq!(
            listing_url("https://script.example.com/exec?sheet=1"),
            "https://script.example.com/exec?sheet=1&activeOnly=true"
        );
    }

    // ============================================================
    // REGISTRY TESTS
    // ============================================================

    #[tokio::test]
    async fn test_registry_invokes_exactly_once() {
        let registry = CallbackRegistry::new();
        let pending = registry.register();
        let name = pending.name().to_string();

        assert!(registry.is_registered(&name));
        assert!(registry.invoke(&name, json!({"n": 1})));
        assert!(!registry.invoke(&name, json!({"n": 2})), "Second invocation is ignored");
        assert!(!registry.is_registered(&name));

        let payload = pending.wait(None).await.unwrap();
        assert_eq!(payload, json!({"n": 1}));
    }

    #[tokio::test]
    async fn test_registry_names_are_unique() {
        let registry = CallbackRegistry::new();
        let a = registry.register();
        let b = registry.register();

        assert_ne!(a.name(), b.name());
        assert_eq!(registry.pending_count(), 2);
    }

    #[tokio::test]
    async fn test_dropping_pending_callback_unregisters() {
        let registry = CallbackRegistry::new();
        let pending = registry.register();
        let name = pending.name().to_string();

        drop(pending);

        assert!(!registry.is_registered(&name));
        assert_eq!(registry.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_script_variants() {
        let registry = CallbackRegistry::new();

        let pending = registry.register();
        let script = format!("{}({{\"ok\": true}});", pending.name());
        assert!(registry.dispatch_script(&script).unwrap());
        assert_eq!(pending.wait(None).await.unwrap(), json!({"ok": true}));

        let pending = registry.register();
        let script = format!("/**/ {} ( {{\"ok\": true, \"rows\": []}} )\n", pending.name());
        assert!(registry.dispatch_script(&script).unwrap());
        drop(pending);

        // Well-formed call to a function nobody registered
        assert!(!registry.dispatch_script("unknownCallback({})").unwrap());
    }

    #[tokio::test]
    async fn test_dispatch_script_rejects_non_calls() {
        let registry = CallbackRegistry::new();

        assert!(matches!(
            registry.dispatch_script("alert('hi')"),
            Err(DirectoryError::InvalidEnvelope(_))
        ));
        assert!(matches!(
            registry.dispatch_script("<html></html>"),
            Err(DirectoryError::InvalidEnvelope(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out_and_unregisters() {
        let registry = CallbackRegistry::new();
        let pending = registry.register();
        let name = pending.name().to_string();

        let result = pending.wait(Some(Duration::from_secs(15))).await;

        assert!(matches!(result, Err(DirectoryError::CallbackTimeout(_))));
        assert!(!registry.is_registered(&name));
    }

    #[tokio::test]
    async fn test_removed_callback_is_abandoned() {
        let registry = CallbackRegistry::new();
        let pending = registry.register();
        registry.remove(pending.name());

        let result = pending.wait(None).await;
        assert!(matches!(result, Err(DirectoryError::CallbackAbandoned(_))));
    }

    // ============================================================
    // FALLBACK POLICY TESTS (fake transports)
    // ============================================================

    struct FakeTransport {
        name: &'static str,
        ok: bool,
        calls: Arc<AtomicUsize>,
    }

    impl FakeTransport {
        fn new(name: &'static str, ok: bool) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    ok,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl Transport for FakeTransport {
        fn name(&self) -> &'static str {
            self.name
        }

        fn fetch<'a>(&'a self, _endpoint: &'a str) -> TransportFuture<'a> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if self.ok {
                    ListingEnvelope::from_value(sample_envelope(true))
                } else {
                    Err(DirectoryError::Transport(format!("{} failed", self.name)))
                }
            })
        }
    }

    #[tokio::test]
    async fn test_unconfigured_endpoint_does_no_io() {
        let (primary, primary_calls) = FakeTransport::new("primary", true);
        let (fallback, fallback_calls) = FakeTransport::new("fallback", true);
        let loader = Loader::new(None, Box::new(primary), Box::new(fallback));

        let result = loader.load_companies().await;

        assert!(matches!(result, Err(DirectoryError::Configuration)));
        assert_eq!(primary_calls.load(Ordering::SeqCst), 0);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let (primary, primary_calls) = FakeTransport::new("primary", true);
        let (fallback, fallback_calls) = FakeTransport::new("fallback", true);
        let loader = Loader::new(Some("x".to_string()), Box::new(primary), Box::new(fallback));

        let records = loader.load_companies().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_uses_fallback() {
        let (primary, _) = FakeTransport::new("primary", false);
        let (fallback, fallback_calls) = FakeTransport::new("fallback", true);
        let loader = Loader::new(Some("x".to_string()), Box::new(primary), Box::new(fallback));

        let records = loader.load_companies().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_failing_is_final() {
        let (primary, primary_calls) = FakeTransport::new("primary", false);
        let (fallback, fallback_calls) = FakeTransport::new("fallback", false);
        let loader = Loader::new(Some("x".to_string()), Box::new(primary), Box::new(fallback));

        let result = loader.load_companies().await;

        assert!(matches!(result, Err(DirectoryError::Transport(_))));
        // No retry beyond the single fallback
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    // ============================================================
    // TRANSPORT TESTS (in-process endpoint)
    // ============================================================

    #[tokio::test]
    async fn test_direct_transport_reads_envelope() {
        let (url, endpoint) = spawn_listing(Mode::DirectOk).await;
        let registry = CallbackRegistry::new();
        let loader = http_loader(&url, registry, Some(Duration::from_secs(5)));

        let records = loader.load_companies().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(endpoint.direct_hits.load(Ordering::SeqCst), 1);
        assert_eq!(endpoint.callback_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ok_false_falls_back_to_callback() {
        let (url, endpoint) = spawn_listing(Mode::DirectNotOk).await;
        let registry = CallbackRegistry::new();
        let loader = http_loader(&url, registry.clone(), Some(Duration::from_secs(5)));

        let records = loader.load_companies().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, "健康");
        assert_eq!(endpoint.direct_hits.load(Ordering::SeqCst), 1);
        assert_eq!(endpoint.callback_hits.load(Ordering::SeqCst), 1);
        assert_eq!(registry.pending_count(), 0, "Callback cleaned up");
    }

    #[tokio::test]
    async fn test_http_error_falls_back_to_callback() {
        let (url, _) = spawn_listing(Mode::DirectError).await;
        let registry = CallbackRegistry::new();
        let loader = http_loader(&url, registry.clone(), Some(Duration::from_secs(5)));

        let records = loader.load_companies().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(registry.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_script_load_error_is_final() {
        let (url, endpoint) = spawn_listing(Mode::Broken).await;
        let registry = CallbackRegistry::new();
        let loader = http_loader(&url, registry.clone(), Some(Duration::from_secs(5)));

        let result = loader.load_companies().await;

        assert!(matches!(result, Err(DirectoryError::Transport(_))));
        assert_eq!(endpoint.callback_hits.load(Ordering::SeqCst), 1, "No retry");
        assert_eq!(registry.pending_count(), 0, "Callback removed on load error");
    }

    #[tokio::test]
    async fn test_uninvoked_callback_times_out() {
        let (url, _) = spawn_listing(Mode::WrongCallback).await;
        let registry = CallbackRegistry::new();
        let loader = http_loader(&url, registry.clone(), Some(Duration::from_millis(200)));

        let result = loader.load_companies().await;

        assert!(matches!(result, Err(DirectoryError::CallbackTimeout(_))));
        assert_eq!(registry.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_loader_from_config() {
        let (url, _) = spawn_listing(Mode::DirectNotOk).await;
        let config = Config {
            endpoint: Some(url),
            ..Config::default()
        };
        let loader = Loader::from_config(&config, reqwest::Client::new());

        let records = loader.load_companies().await.unwrap();
        assert_eq!(records.len(), 2);
    }
}
