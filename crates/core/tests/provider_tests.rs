// ═══════════════════════════════════════════════════════════════════
// Provider Tests — brapi URL building and response parsing
// ═══════════════════════════════════════════════════════════════════

use dividend_tracker_core::errors::CoreError;
use dividend_tracker_core::models::asset::AssetClass;
use dividend_tracker_core::models::quote::UNCLASSIFIED_SECTOR;
use dividend_tracker_core::models::settings::Settings;
use dividend_tracker_core::providers::brapi::BrapiProvider;
use dividend_tracker_core::providers::traits::QuoteProvider;

fn provider_with_base(base: &str) -> BrapiProvider {
    BrapiProvider::new(&Settings {
        quote_base_url: base.to_string(),
        ..Settings::default()
    })
}

// ═══════════════════════════════════════════════════════════════════
// BrapiProvider — URL
// ═══════════════════════════════════════════════════════════════════

mod quote_url {
    use super::*;

    #[test]
    fn default_settings() {
        let provider = BrapiProvider::new(&Settings::default());
        let url = provider.quote_url("PETR4").unwrap();
        assert_eq!(url.as_str(), "https://brapi.dev/api/quote/PETR4?token=demo");
    }

    #[test]
    fn trailing_slash_in_base_is_tolerated() {
        let provider = provider_with_base("https://brapi.dev/api/");
        let url = provider.quote_url("VALE3").unwrap();
        assert_eq!(url.path(), "/api/quote/VALE3");
    }

    #[test]
    fn ticker_is_encoded_as_one_segment() {
        let provider = provider_with_base("https://brapi.dev/api");
        let url = provider.quote_url("AB/CD").unwrap();
        assert_eq!(url.path(), "/api/quote/AB%2FCD");
    }

    #[test]
    fn token_is_query_encoded() {
        let provider = BrapiProvider::new(&Settings {
            quote_token: "a b&c".into(),
            ..Settings::default()
        });
        let url = provider.quote_url("PETR4").unwrap();
        let token: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(token, vec![("token".to_string(), "a b&c".to_string())]);
    }

    #[test]
    fn invalid_base_is_config_error() {
        let provider = provider_with_base("not a url");
        let err = provider.quote_url("PETR4").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn base_without_path_support_is_config_error() {
        let provider = provider_with_base("mailto:someone@example.com");
        let err = provider.quote_url("PETR4").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn name() {
        let provider = BrapiProvider::new(&Settings::default());
        assert_eq!(provider.name(), "brapi");
    }
}

// ═══════════════════════════════════════════════════════════════════
// BrapiProvider — response parsing
// ═══════════════════════════════════════════════════════════════════

mod parse_body {
    use super::*;

    #[test]
    fn full_record() {
        let body = r#"{
            "results": [{
                "symbol": "PETR4",
                "shortName": "PETROBRAS   PN",
                "longName": "Petróleo Brasileiro S.A. - Petrobras",
                "sector": "Energy Minerals",
                "regularMarketPrice": 38.27,
                "currency": "BRL"
            }],
            "requestedAt": "2025-03-10T12:00:00.000Z",
            "took": "0ms"
        }"#;
        let q = BrapiProvider::parse_quote_body(body).unwrap().unwrap();
        assert_eq!(q.ticker, "PETR4");
        assert_eq!(q.display_name, "Petróleo Brasileiro S.A. - Petrobras");
        assert_eq!(q.sector, "Energy Minerals");
        assert_eq!(q.current_price, 38.27);
        assert_eq!(q.asset_class, AssetClass::Equity);
    }

    #[test]
    fn fund_with_short_name_only() {
        let body = r#"{"results":[{"symbol":"MXRF11","shortName":"FII MAXI REN","regularMarketPrice":9.61}]}"#;
        let q = BrapiProvider::parse_quote_body(body).unwrap().unwrap();
        assert_eq!(q.display_name, "FII MAXI REN");
        assert_eq!(q.asset_class, AssetClass::RealEstateFund);
        assert_eq!(q.sector, UNCLASSIFIED_SECTOR);
    }

    #[test]
    fn null_fields_use_defaults() {
        let body = r#"{"results":[{"symbol":"ABCD3","longName":null,"shortName":null,"sector":null,"regularMarketPrice":null}]}"#;
        let q = BrapiProvider::parse_quote_body(body).unwrap().unwrap();
        assert_eq!(q.display_name, "ABCD3");
        assert_eq!(q.sector, UNCLASSIFIED_SECTOR);
        assert_eq!(q.current_price, 0.0);
    }

    #[test]
    fn only_first_result_is_used() {
        let body = r#"{"results":[{"symbol":"PETR4"},{"symbol":"VALE3"}]}"#;
        let q = BrapiProvider::parse_quote_body(body).unwrap().unwrap();
        assert_eq!(q.ticker, "PETR4");
    }

    #[test]
    fn empty_results_is_not_found() {
        let q = BrapiProvider::parse_quote_body(r#"{"results":[]}"#).unwrap();
        assert!(q.is_none());
    }

    #[test]
    fn error_body_is_not_found() {
        let body = r#"{"error":true,"message":"Não encontramos a ação XXXX4"}"#;
        assert!(BrapiProvider::parse_quote_body(body).unwrap().is_none());
    }

    #[test]
    fn results_of_wrong_type_is_not_found() {
        assert!(BrapiProvider::parse_quote_body(r#"{"results":"PETR4"}"#).unwrap().is_none());
        assert!(BrapiProvider::parse_quote_body(r#"[1,2,3]"#).unwrap().is_none());
        assert!(BrapiProvider::parse_quote_body("null").unwrap().is_none());
    }

    #[test]
    fn record_without_symbol_is_not_found() {
        let body = r#"{"results":[{"longName":"Nameless"}]}"#;
        assert!(BrapiProvider::parse_quote_body(body).unwrap().is_none());
    }

    #[test]
    fn record_with_mistyped_field_is_not_found() {
        let body = r#"{"results":[{"symbol":"PETR4","regularMarketPrice":"cheap"}]}"#;
        assert!(BrapiProvider::parse_quote_body(body).unwrap().is_none());
    }

    #[test]
    fn non_json_is_error() {
        let err = BrapiProvider::parse_quote_body("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn empty_body_is_error() {
        assert!(BrapiProvider::parse_quote_body("").is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// BrapiProvider — transport
// ═══════════════════════════════════════════════════════════════════

mod transport {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a random local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}/api")
    }

    fn provider_for(base: String) -> BrapiProvider {
        BrapiProvider::new(&Settings {
            quote_base_url: base,
            quote_token: "secret-token".into(),
            request_timeout_secs: 5,
        })
    }

    #[tokio::test]
    async fn ok_response_is_parsed() {
        let base = serve_once(
            "200 OK",
            r#"{"results":[{"symbol":"VALE3","longName":"Vale S.A.","regularMarketPrice":61.5}]}"#,
        )
        .await;
        let q = provider_for(base).fetch_quote("VALE3").await.unwrap().unwrap();
        assert_eq!(q.ticker, "VALE3");
        assert_eq!(q.current_price, 61.5);
    }

    #[tokio::test]
    async fn not_found_status_with_error_body_is_not_found() {
        let base = serve_once(
            "404 Not Found",
            r#"{"error":true,"message":"Ticker XXXX4 not found"}"#,
        )
        .await;
        let q = provider_for(base).fetch_quote("XXXX4").await.unwrap();
        assert!(q.is_none());
    }

    #[tokio::test]
    async fn gateway_error_page_is_api_error() {
        let base = serve_once("502 Bad Gateway", "<html>bad gateway</html>").await;
        let err = provider_for(base).fetch_quote("PETR4").await.unwrap_err();
        match err {
            CoreError::Api { provider, message } => {
                assert_eq!(provider, "brapi");
                assert!(message.contains("502"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        // Port 9 (discard) on localhost is closed on any sane test host.
        let provider = BrapiProvider::new(&Settings {
            quote_base_url: "http://127.0.0.1:9/api".into(),
            quote_token: "secret-token".into(),
            request_timeout_secs: 2,
        });
        let err = provider.fetch_quote("PETR4").await.unwrap_err();
        assert!(matches!(err, CoreError::Network(_)));
        assert!(!err.to_string().contains("secret-token"));
    }
}
