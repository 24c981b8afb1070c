mod arguments;
mod handlers;

pub use arguments::create_asset_arguments;

use axum::{
    routing::{get, post},
    Router,
};
use std::{
    net::{SocketAddr, TcpListener},
    sync::Arc,
};
use tokio::signal;
use tracing::{error, info};

use crate::{config::Config, ledger::Ledger, RestApiError};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn Ledger>,
}

/// Routes of the REST surface.
pub fn router(ledger: Arc<dyn Ledger>) -> Router {
    Router::new()
        .route(
            "/assets",
            post(handlers::create_asset).get(handlers::get_all_assets),
        )
        .route("/assets/:asset_id", get(handlers::read_asset))
        .route("/invoices", post(handlers::create_invoice))
        .route("/health", get(handlers::health))
        .with_state(AppState { ledger })
}

/// Starts the REST server based on the given config, forwarding requests to
/// `ledger`.
pub async fn start_rest_server(
    config: &Config,
    ledger: Arc<dyn Ledger>,
) -> Result<(), RestApiError> {
    info!("Starting REST server");
    let listener = TcpListener::bind(SocketAddr::new(config.address, config.port))?;
    info!("REST server listening on {}", listener.local_addr()?);

    // Wait for the server to finish
    tokio::select! {
        _ = signal::ctrl_c() => info!("Terminated by user"),
        result = serve(listener, ledger) => {
            if let Err(e) = result {
                error!("Error: {}", e);
            }
        },
    }
    Ok(())
}

/// Serves the REST routes on `listener` until the task is dropped.
pub async fn serve(listener: TcpListener, ledger: Arc<dyn Ledger>) -> Result<(), RestApiError> {
    listener.set_nonblocking(true)?;
    axum::Server::from_tcp(listener)?
        .serve(router(ledger).into_make_service())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use booking_ledger::types::TransactionName;
    use booking_ledger_client::LedgerClientError;
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Records every call and answers with canned payloads.
    #[derive(Default)]
    struct MockLedger {
        calls: Mutex<Vec<(TransactionName, Vec<String>)>>,
        fail_with: Option<String>,
    }

    impl MockLedger {
        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Default::default()
            }
        }

        fn record(
            &self,
            transaction: TransactionName,
            args: &[String],
        ) -> Result<(), LedgerClientError> {
            self.calls.lock().unwrap().push((transaction, args.to_vec()));
            match &self.fail_with {
                Some(message) => Err(LedgerClientError::Contract(message.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl Ledger for MockLedger {
        async fn evaluate_transaction(
            &self,
            transaction: TransactionName,
            args: &[String],
        ) -> Result<Vec<u8>, LedgerClientError> {
            self.record(transaction, args)?;
            let payload = match transaction {
                TransactionName::GetAllAssets => json!([{ "bookingID": "asset1" }]),
                _ => json!({ "bookingID": args[0] }),
            };
            Ok(payload.to_string().into_bytes())
        }

        async fn submit_transaction(
            &self,
            transaction: TransactionName,
            args: &[String],
        ) -> Result<Vec<u8>, LedgerClientError> {
            self.record(transaction, args)?;
            Ok(Vec::new())
        }

        async fn health(&self) -> Result<(), LedgerClientError> {
            Ok(())
        }
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(ledger: Arc<MockLedger>, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(ledger).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn asset_body() -> Value {
        let mut body = serde_json::Map::new();
        for name in booking_ledger::types::CREATE_ASSET_ARGUMENTS {
            let _ = body.insert(name.to_string(), json!(format!("{name}-value")));
        }
        let _ = body.insert("phoneNumber".to_string(), json!(9087654321u64));
        let _ = body.insert("isPartialLoadAllowed".to_string(), json!(true));
        Value::Object(body)
    }

    #[tokio::test]
    async fn create_asset_submits_positional_arguments() {
        let ledger = Arc::new(MockLedger::default());
        let request = json_request(Method::POST, "/assets", &asset_body().to_string());

        let (status, body) = send(ledger.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result": "Transaction committed successfully" }));

        let calls = ledger.calls.lock().unwrap();
        let (transaction, args) = &calls[0];
        assert_eq!(*transaction, TransactionName::CreateAsset);
        assert_eq!(args.len(), 23);
        assert_eq!(args[0], "bookingID-value");
        assert_eq!(args[3], "9087654321");
        assert_eq!(args[14], "true");
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let ledger = Arc::new(MockLedger::default());

        for body in ["not json", "[1, 2, 3]"] {
            let request = json_request(Method::POST, "/assets", body);
            let (status, response) = send(ledger.clone(), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response, json!({ "error": "Invalid request format" }));
        }
        assert!(ledger.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_argument_is_rejected() {
        let ledger = Arc::new(MockLedger::default());
        let mut body = asset_body();
        let _ = body.as_object_mut().unwrap().remove("bookingID");

        let request = json_request(Method::POST, "/assets", &body.to_string());
        let (status, response) = send(ledger.clone(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({ "error": "missing argument: bookingID" }));
        assert!(ledger.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_invoice_submits_the_document() {
        let ledger = Arc::new(MockLedger::default());
        let document = json!({ "bookingid": "invoice1", "vesselName": "Ever Given" });
        let request = json_request(Method::POST, "/invoices", &document.to_string());

        let (status, _) = send(ledger.clone(), request).await;
        assert_eq!(status, StatusCode::OK);

        let calls = ledger.calls.lock().unwrap();
        let (transaction, args) = &calls[0];
        assert_eq!(*transaction, TransactionName::CreateInvoice);
        let submitted: Value = serde_json::from_str(&args[0]).unwrap();
        assert_eq!(submitted, document);
    }

    #[tokio::test]
    async fn invoice_body_is_forwarded_unchanged() {
        let ledger = Arc::new(MockLedger::default());
        let document = r#"{ "vesselName": "Ever Given",  "bookingid": "invoice1" }"#;
        let request = json_request(Method::POST, "/invoices", document);

        let (status, _) = send(ledger.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ledger.calls.lock().unwrap()[0].1, vec![document.to_string()]);

        for body in ["not json", r#"["bookingid"]"#] {
            let request = json_request(Method::POST, "/invoices", body);
            let (status, response) = send(ledger.clone(), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response, json!({ "error": "Invalid request format" }));
        }
        assert_eq!(ledger.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reads_wrap_the_contract_payload() {
        let ledger = Arc::new(MockLedger::default());

        let (status, body) = send(ledger.clone(), get("/assets/asset7")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result": { "bookingID": "asset7" } }));

        let (status, body) = send(ledger.clone(), get("/assets")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result": [{ "bookingID": "asset1" }] }));

        let calls = ledger.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                (TransactionName::ReadAsset, vec!["asset7".to_string()]),
                (TransactionName::GetAllAssets, vec![]),
            ]
        );
    }

    #[tokio::test]
    async fn ledger_failures_are_server_errors() {
        let ledger = Arc::new(MockLedger::failing("the asset with ID asset7 does not exist"));

        let (status, body) = send(ledger.clone(), get("/assets/asset7")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "error": "Error reading asset: failed to evaluate transaction: the asset with ID asset7 does not exist"
            })
        );

        let request = json_request(Method::POST, "/assets", &asset_body().to_string());
        let (status, body) = send(ledger, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Error creating asset: failed to submit transaction:"));
    }

    #[tokio::test]
    async fn health_reports_the_peer() {
        let ledger = Arc::new(MockLedger::default());
        let (status, body) = send(ledger, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result": "healthy" }));
    }
}
