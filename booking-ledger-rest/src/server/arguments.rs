use booking_ledger::types::{ArgumentError, CREATE_ASSET_ARGUMENTS};
use serde_json::{Map, Value};

/// Map a JSON object onto the positional `CreateAsset` arguments. Values are
/// looked up by field name in argument order. Strings pass through as-is;
/// numbers and booleans are stringified. Extra fields are ignored.
pub fn create_asset_arguments(body: &Map<String, Value>) -> Result<Vec<String>, ArgumentError> {
    CREATE_ASSET_ARGUMENTS
        .iter()
        .map(|&name| match body.get(name) {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(Value::Number(value)) => Ok(value.to_string()),
            Some(Value::Bool(value)) => Ok(value.to_string()),
            Some(Value::Null | Value::Array(_) | Value::Object(_)) => {
                Err(ArgumentError::UnsupportedValue(name))
            }
            None => Err(ArgumentError::MissingArgument(name)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn asset_body() -> Map<String, Value> {
        let body = json!({
            "bookingID": "asset11",
            "name": "tom",
            "address": "hyderabad",
            "phoneNumber": 9087654321u64,
            "receiptTypeAtOrigin": "CY",
            "deliveryTypeAtDestination": "delivered",
            "cargoMovementTypeAtOrigin": "cargomovement",
            "serviceContractReference": "servicereference",
            "carrierServiceName": "servicename",
            "carrierServiceCode": "servicecode",
            "universalServiceReference": "servicereference",
            "carrierExportVoyageNumber": "exportvoyagenumber",
            "universalExportVoyageReference": "voyagereference",
            "declaredValueCurrency": "currency",
            "isPartialLoadAllowed": true,
            "isExportDeclarationRequired": "true",
            "exportDeclarationReference": "declarationreference",
            "isImportLicenseRequired": false,
            "importLicenseReference": "licensereference",
            "contractQuotationReference": "quotationreference",
            "bookingChannelReference": "channelreference",
            "incoTerms": "terms",
            "isEquipmentSubstitutionAllowed": true,
            "comment": "ignored",
        });
        match body {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn arguments_follow_schema_order() {
        let args = create_asset_arguments(&asset_body()).unwrap();
        assert_eq!(args.len(), CREATE_ASSET_ARGUMENTS.len());
        assert_eq!(args[0], "asset11");
        assert_eq!(args[1], "tom");
        assert_eq!(args[3], "9087654321");
        assert_eq!(args[14], "true");
        assert_eq!(args[15], "true");
        assert_eq!(args[17], "false");
        assert_eq!(args[22], "true");
    }

    #[test]
    fn missing_argument_is_named() {
        let mut body = asset_body();
        let _ = body.remove("incoTerms");
        assert_eq!(
            create_asset_arguments(&body),
            Err(ArgumentError::MissingArgument("incoTerms"))
        );
    }

    #[test]
    fn nested_values_are_rejected() {
        let mut body = asset_body();
        let _ = body.insert("name".to_string(), json!({ "first": "tom" }));
        assert_eq!(
            create_asset_arguments(&body),
            Err(ArgumentError::UnsupportedValue("name"))
        );
    }
}
