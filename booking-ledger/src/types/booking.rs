//! The booking record stored on the ledger.
//!
//! A [`Booking`] carries the shipper contact fields together with the DCSA
//! booking document: scalars describing the shipment plus nested locations,
//! parties, commodities and equipment. Every field except the booking ID
//! falls back to its default when absent from the JSON document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Positional arguments of the `CreateAsset` transaction, in order.
pub const CREATE_ASSET_ARGUMENTS: [&str; 23] = [
    "bookingID",
    "name",
    "address",
    "phoneNumber",
    "receiptTypeAtOrigin",
    "deliveryTypeAtDestination",
    "cargoMovementTypeAtOrigin",
    "serviceContractReference",
    "carrierServiceName",
    "carrierServiceCode",
    "universalServiceReference",
    "carrierExportVoyageNumber",
    "universalExportVoyageReference",
    "declaredValueCurrency",
    "isPartialLoadAllowed",
    "isExportDeclarationRequired",
    "exportDeclarationReference",
    "isImportLicenseRequired",
    "importLicenseReference",
    "contractQuotationReference",
    "bookingChannelReference",
    "incoTerms",
    "isEquipmentSubstitutionAllowed",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("incorrect number of arguments. expecting {expected}, got {actual}")]
    WrongArgumentCount { expected: usize, actual: usize },
    #[error("argument {name} must be an integer, got {value:?}")]
    NotAnInteger { name: &'static str, value: String },
    #[error("argument {name} must be a boolean, got {value:?}")]
    NotABoolean { name: &'static str, value: String },
    #[error("booking ID must not be empty")]
    EmptyBookingId,
    #[error("booking ID must be given as either bookingID or bookingid, not both")]
    ConflictingBookingId,
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("argument {0} must be a string, number or boolean")]
    UnsupportedValue(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "bookingID", alias = "bookingid")]
    pub booking_id: String,
    pub name: String,
    pub address: String,
    pub phone_number: i64,
    pub receipt_type_at_origin: String,
    pub delivery_type_at_destination: String,
    pub cargo_movement_type_at_origin: String,
    pub cargo_movement_type_at_destination: String,
    pub service_contract_reference: String,
    pub vessel_name: String,
    pub carrier_service_name: String,
    pub carrier_service_code: String,
    pub universal_service_reference: String,
    pub carrier_export_voyage_number: String,
    pub universal_export_voyage_reference: String,
    pub declared_value: f64,
    pub declared_value_currency: String,
    pub payment_term_code: String,
    pub is_partial_load_allowed: bool,
    pub is_export_declaration_required: bool,
    pub export_declaration_reference: String,
    pub is_import_license_required: bool,
    pub import_license_reference: String,
    pub is_customs_filing_submission_by_shipper: bool,
    pub contract_quotation_reference: String,
    pub expected_departure_date: String,
    pub expected_arrival_at_place_of_delivery_start_date: String,
    pub expected_arrival_at_place_of_delivery_end_date: String,
    pub transport_document_type_code: String,
    pub transport_document_reference: String,
    pub booking_channel_reference: String,
    pub inco_terms: String,
    pub communication_channel_code: String,
    pub is_equipment_substitution_allowed: bool,
    #[serde(rename = "vesselIMONumber")]
    pub vessel_imo_number: String,
    pub pre_carriage_mode_of_transport_code: String,
    pub invoice_payable_at: Location,
    #[serde(rename = "placeOfBLIssue")]
    pub place_of_bl_issue: Location,
    pub commodities: Vec<Commodity>,
    pub value_added_services: Vec<ValueAddedService>,
    pub references: Vec<Reference>,
    pub requested_equipments: Vec<RequestedEquipment>,
    pub document_parties: Vec<DocumentParty>,
    pub shipment_locations: Vec<ShipmentLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    pub location_name: String,
    #[serde(rename = "UNLocationCode")]
    pub un_location_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub facility_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub facility_code_list_provider: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartyContactDetails {
    pub name: String,
    pub phone: i64,
    pub email: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    pub name: String,
    pub street: String,
    pub street_number: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub floor: String,
    pub post_code: i64,
    pub city: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state_region: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdentifyingCode {
    #[serde(rename = "DCSAResponsibleAgencyCode")]
    pub dcsa_responsible_agency_code: String,
    pub party_code: String,
    pub code_list_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Party {
    pub party_name: String,
    pub tax_reference1: String,
    pub tax_reference2: String,
    pub public_key: String,
    pub address: Address,
    pub party_contact_details: Vec<PartyContactDetails>,
    pub identifying_codes: Vec<IdentifyingCode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentParty {
    pub party: Party,
    pub party_function: String,
    pub displayed_address: Vec<String>,
    pub is_to_be_notified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    #[serde(rename = "type")]
    pub reference_type: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestedEquipment {
    #[serde(rename = "ISOEquipmentCode")]
    pub iso_equipment_code: String,
    pub tare_weight: f64,
    pub tare_weight_unit: String,
    pub units: i64,
    pub equipment_references: Vec<String>,
    pub is_shipper_owned: bool,
    pub commodity_requested_equipment_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShipmentLocation {
    pub location: Location,
    pub shipment_location_type_code: String,
    pub event_date_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Commodity {
    pub commodity_type: String,
    #[serde(rename = "HSCode")]
    pub hs_code: String,
    pub cargo_gross_weight: f64,
    pub cargo_gross_weight_unit: String,
    pub cargo_gross_volume: f64,
    pub cargo_gross_volume_unit: String,
    pub number_of_packages: i64,
    pub export_license_issue_date: String,
    pub export_license_expiry_date: String,
    pub commodity_requested_equipment_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValueAddedService {
    pub value_added_service_code: String,
}

impl Booking {
    /// Build a booking from the positional arguments of `CreateAsset`, in the
    /// order of [`CREATE_ASSET_ARGUMENTS`]. Fields that `CreateAsset` does not
    /// carry keep their defaults.
    pub fn from_positional_args(args: &[String]) -> Result<Self, ArgumentError> {
        let args: &[String; 23] = args
            .try_into()
            .map_err(|_| ArgumentError::WrongArgumentCount {
                expected: CREATE_ASSET_ARGUMENTS.len(),
                actual: args.len(),
            })?;

        let [
            booking_id,
            name,
            address,
            phone_number,
            receipt_type_at_origin,
            delivery_type_at_destination,
            cargo_movement_type_at_origin,
            service_contract_reference,
            carrier_service_name,
            carrier_service_code,
            universal_service_reference,
            carrier_export_voyage_number,
            universal_export_voyage_reference,
            declared_value_currency,
            is_partial_load_allowed,
            is_export_declaration_required,
            export_declaration_reference,
            is_import_license_required,
            import_license_reference,
            contract_quotation_reference,
            booking_channel_reference,
            inco_terms,
            is_equipment_substitution_allowed,
        ] = args;

        if booking_id.is_empty() {
            return Err(ArgumentError::EmptyBookingId);
        }

        Ok(Self {
            booking_id: booking_id.clone(),
            name: name.clone(),
            address: address.clone(),
            phone_number: parse_integer("phoneNumber", phone_number)?,
            receipt_type_at_origin: receipt_type_at_origin.clone(),
            delivery_type_at_destination: delivery_type_at_destination.clone(),
            cargo_movement_type_at_origin: cargo_movement_type_at_origin.clone(),
            service_contract_reference: service_contract_reference.clone(),
            carrier_service_name: carrier_service_name.clone(),
            carrier_service_code: carrier_service_code.clone(),
            universal_service_reference: universal_service_reference.clone(),
            carrier_export_voyage_number: carrier_export_voyage_number.clone(),
            universal_export_voyage_reference: universal_export_voyage_reference.clone(),
            declared_value_currency: declared_value_currency.clone(),
            is_partial_load_allowed: parse_bool("isPartialLoadAllowed", is_partial_load_allowed)?,
            is_export_declaration_required: parse_bool(
                "isExportDeclarationRequired",
                is_export_declaration_required,
            )?,
            export_declaration_reference: export_declaration_reference.clone(),
            is_import_license_required: parse_bool(
                "isImportLicenseRequired",
                is_import_license_required,
            )?,
            import_license_reference: import_license_reference.clone(),
            contract_quotation_reference: contract_quotation_reference.clone(),
            booking_channel_reference: booking_channel_reference.clone(),
            inco_terms: inco_terms.clone(),
            is_equipment_substitution_allowed: parse_bool(
                "isEquipmentSubstitutionAllowed",
                is_equipment_substitution_allowed,
            )?,
            ..Default::default()
        })
    }
}

fn parse_integer(name: &'static str, value: &str) -> Result<i64, ArgumentError> {
    value.parse().map_err(|_| ArgumentError::NotAnInteger {
        name,
        value: value.to_string(),
    })
}

/// Accepts the spellings `1, t, T, TRUE, true, True` and
/// `0, f, F, FALSE, false, False`.
fn parse_bool(name: &'static str, value: &str) -> Result<bool, ArgumentError> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ArgumentError::NotABoolean {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_asset_args() -> Vec<String> {
        [
            "asset11",
            "tom",
            "hyderabad",
            "9087654321",
            "CY",
            "delivered",
            "cargomovement",
            "servicereference",
            "servicename",
            "servicecode",
            "servicereference",
            "exportvoyagenumber",
            "voyagereference",
            "currency",
            "true",
            "T",
            "declarationreference",
            "0",
            "licencereference",
            "quotationreference",
            "channelreference",
            "terms",
            "False",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn positional_args_fill_booking_fields() -> anyhow::Result<()> {
        let booking = Booking::from_positional_args(&create_asset_args())?;

        assert_eq!(booking.booking_id, "asset11");
        assert_eq!(booking.name, "tom");
        assert_eq!(booking.phone_number, 9087654321);
        assert_eq!(booking.universal_export_voyage_reference, "voyagereference");
        assert!(booking.is_partial_load_allowed);
        assert!(booking.is_export_declaration_required);
        assert!(!booking.is_import_license_required);
        assert_eq!(booking.import_license_reference, "licencereference");
        assert_eq!(booking.inco_terms, "terms");
        assert!(!booking.is_equipment_substitution_allowed);
        // Fields outside of `CreateAsset` keep their defaults
        assert_eq!(booking.vessel_name, "");
        assert!(booking.commodities.is_empty());
        Ok(())
    }

    #[test]
    fn wrong_argument_count_is_rejected() {
        let mut args = create_asset_args();
        let _ = args.pop();

        let result = Booking::from_positional_args(&args);
        assert_eq!(
            result,
            Err(ArgumentError::WrongArgumentCount {
                expected: 23,
                actual: 22
            })
        );
    }

    #[test]
    fn malformed_scalars_are_rejected() {
        let mut args = create_asset_args();
        args[3] = "not a number".to_string();
        assert!(matches!(
            Booking::from_positional_args(&args),
            Err(ArgumentError::NotAnInteger {
                name: "phoneNumber",
                ..
            })
        ));

        let mut args = create_asset_args();
        args[14] = "yes".to_string();
        assert!(matches!(
            Booking::from_positional_args(&args),
            Err(ArgumentError::NotABoolean {
                name: "isPartialLoadAllowed",
                ..
            })
        ));
    }

    #[test]
    fn empty_booking_id_is_rejected() {
        let mut args = create_asset_args();
        args[0] = String::new();
        assert_eq!(
            Booking::from_positional_args(&args),
            Err(ArgumentError::EmptyBookingId)
        );
    }

    #[test]
    fn json_uses_document_field_names() -> anyhow::Result<()> {
        let booking = Booking {
            booking_id: "BKG-1".to_string(),
            vessel_imo_number: "9321483".to_string(),
            place_of_bl_issue: Location {
                location_name: "Hamburg".to_string(),
                un_location_code: "DEHAM".to_string(),
                ..Default::default()
            },
            commodities: vec![Commodity {
                hs_code: "720711".to_string(),
                ..Default::default()
            }],
            references: vec![Reference {
                reference_type: "FF".to_string(),
                value: "ref-1".to_string(),
            }],
            ..Default::default()
        };

        let value = serde_json::to_value(&booking)?;
        assert_eq!(value["bookingID"], "BKG-1");
        assert_eq!(value["vesselIMONumber"], "9321483");
        assert_eq!(value["placeOfBLIssue"]["UNLocationCode"], "DEHAM");
        assert_eq!(value["commodities"][0]["HSCode"], "720711");
        assert_eq!(value["references"][0]["type"], "FF");
        // Empty optional location codes are left out
        assert!(value["placeOfBLIssue"].get("facilityCode").is_none());
        Ok(())
    }

    #[test]
    fn invoice_documents_parse_with_lowercase_id() -> anyhow::Result<()> {
        let document = json!({
            "bookingid": "INV-7",
            "declaredValue": 1250.5,
            "invoicePayableAt": { "locationName": "Rotterdam", "UNLocationCode": "NLRTM" },
            "requestedEquipments": [{ "ISOEquipmentCode": "22GP", "units": 2, "tareWeight": 2200.0 }],
            "documentParties": [{
                "party": {
                    "partyName": "Shipper Co",
                    "address": { "streetNumber": 12, "postCode": 20457, "city": "Hamburg" },
                    "identifyingCodes": [{ "DCSAResponsibleAgencyCode": "SMDG", "partyCode": "1" }]
                },
                "partyFunction": "OS",
                "isToBeNotified": true
            }]
        });

        let booking: Booking = serde_json::from_value(document)?;
        assert_eq!(booking.booking_id, "INV-7");
        assert_eq!(booking.declared_value, 1250.5);
        assert_eq!(booking.invoice_payable_at.un_location_code, "NLRTM");
        assert_eq!(booking.requested_equipments[0].units, 2);
        let party = &booking.document_parties[0].party;
        assert_eq!(party.address.post_code, 20457);
        assert_eq!(
            party.identifying_codes[0].dcsa_responsible_agency_code,
            "SMDG"
        );
        assert!(booking.document_parties[0].is_to_be_notified);
        Ok(())
    }
}
