use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use booking_ledger::types::CREATE_ASSET_ARGUMENTS;
use booking_ledger_rest::server::router;
use booking_ledger_tests::{
    utils::{invoice_document, tagged},
    Org, TestPeer,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn rest_app(peer: &TestPeer) -> anyhow::Result<Router> {
    let contract = peer.contract(Org::Org1)?;
    Ok(router(Arc::new(contract)))
}

async fn send(app: &Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

fn post(uri: &str, body: &Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?)
}

fn get(uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder().uri(uri).body(Body::empty())?)
}

/// A `POST /assets` body in the shape sent by the booking front end.
fn asset_body(booking_id: &str) -> Value {
    let mut body = Map::new();
    for name in CREATE_ASSET_ARGUMENTS {
        let _ = body.insert(name.to_string(), json!(format!("{name}-value")));
    }
    let _ = body.insert("bookingID".to_string(), json!(booking_id));
    let _ = body.insert("phoneNumber".to_string(), json!(9087654321u64));
    for flag in [
        "isPartialLoadAllowed",
        "isExportDeclarationRequired",
        "isImportLicenseRequired",
        "isEquipmentSubstitutionAllowed",
    ] {
        let _ = body.insert(flag.to_string(), json!(true));
    }
    Value::Object(body)
}

#[tokio::test]
async fn assets_are_created_and_read_over_rest() -> anyhow::Result<()> {
    let peer = TestPeer::start().await?;
    let app = rest_app(&peer)?;
    let id = tagged("asset");

    let (status, body) = send(&app, post("/assets", &asset_body(&id))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "result": "Transaction committed successfully" }));

    let (status, body) = send(&app, get(&format!("/assets/{id}"))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["bookingID"], json!(id));
    assert_eq!(body["result"]["phoneNumber"], json!(9087654321u64));
    assert_eq!(body["result"]["isImportLicenseRequired"], json!(true));

    let (status, body) = send(&app, get("/assets")?).await?;
    assert_eq!(status, StatusCode::OK);
    let listed = body["result"]
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("expected a list of assets"))?;
    assert_eq!(listed.len(), 1);
    Ok(())
}

#[tokio::test]
async fn empty_ledger_lists_no_assets() -> anyhow::Result<()> {
    let peer = TestPeer::start().await?;
    let app = rest_app(&peer)?;

    let (status, body) = send(&app, get("/assets")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "result": [] }));
    Ok(())
}

#[tokio::test]
async fn invoices_are_created_over_rest() -> anyhow::Result<()> {
    let peer = TestPeer::start().await?;
    let app = rest_app(&peer)?;
    let id = tagged("invoice");

    let (status, _) = send(&app, post("/invoices", &invoice_document(&id))?).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get(&format!("/assets/{id}"))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["vesselName"], json!("Ever Given"));
    assert_eq!(
        body["result"]["invoicePayableAt"]["UNLocationCode"],
        json!("NLRTM")
    );
    Ok(())
}

#[tokio::test]
async fn contract_errors_are_reported() -> anyhow::Result<()> {
    let peer = TestPeer::start().await?;
    let app = rest_app(&peer)?;
    let id = tagged("asset");

    let (status, _) = send(&app, post("/assets", &asset_body(&id))?).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, post("/assets", &asset_body(&id))?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "error": format!(
                "Error creating asset: failed to submit transaction: \
                 the asset with ID {id} already exists"
            )
        })
    );

    let (status, body) = send(&app, get("/assets/missing")?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "error": "Error reading asset: failed to evaluate transaction: \
                      the asset with ID missing does not exist"
        })
    );

    let (status, body) = send(&app, post("/invoices", &json!({ "name": "tom" }))?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "error": "Error creating invoice: failed to submit transaction: \
                      booking ID must not be empty"
        })
    );
    Ok(())
}

#[tokio::test]
async fn health_reaches_the_peer() -> anyhow::Result<()> {
    let peer = TestPeer::start().await?;
    let app = rest_app(&peer)?;

    let (status, body) = send(&app, get("/health")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "result": "healthy" }));
    Ok(())
}
