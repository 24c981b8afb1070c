use booking_ledger::types::CREATE_ASSET_ARGUMENTS;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use serde_json::{json, Value};

/// Append a random suffix so that tests sharing a peer never collide.
pub fn tagged(text: impl AsRef<str>) -> String {
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("{}_{}", text.as_ref(), suffix)
}

/// Positional `CreateAsset` arguments for a booking with the given ID.
pub fn asset_args(booking_id: &str) -> Vec<String> {
    CREATE_ASSET_ARGUMENTS
        .iter()
        .map(|name| match *name {
            "bookingID" => booking_id.to_string(),
            "phoneNumber" => "9087654321".to_string(),
            "isPartialLoadAllowed" | "isImportLicenseRequired" => "true".to_string(),
            "isExportDeclarationRequired" | "isEquipmentSubstitutionAllowed" => "F".to_string(),
            other => format!("{other}-value"),
        })
        .collect()
}

/// A booking document as accepted by `CreateInvoice`, keyed by the lowercase
/// `bookingid` field.
pub fn invoice_document(booking_id: &str) -> Value {
    json!({
        "bookingid": booking_id,
        "name": "tom",
        "vesselName": "Ever Given",
        "declaredValue": 1250.5,
        "declaredValueCurrency": "EUR",
        "invoicePayableAt": { "locationName": "Rotterdam", "UNLocationCode": "NLRTM" },
        "commodities": [{
            "commodityType": "Furniture",
            "HSCode": "9403",
            "cargoGrossWeight": 1200.0,
            "cargoGrossWeightUnit": "KGM",
            "numberOfPackages": 40
        }],
        "shipmentLocations": [{
            "location": { "locationName": "Hamburg", "UNLocationCode": "DEHAM" },
            "shipmentLocationTypeCode": "POL",
            "eventDateTime": "2022-11-01T10:00:00Z"
        }]
    })
}
