use async_trait::async_trait;
use booking_ledger::types::{ArgumentError, Booking, TransactionName};
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::chaincode::{Chaincode, ChaincodeError, TransactionContext};

/// Stores booking records keyed by their booking ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingContract;

#[async_trait]
impl Chaincode for BookingContract {
    fn name(&self) -> &'static str {
        "BookingContract"
    }

    #[instrument(skip(self, ctx, args), err(Debug))]
    async fn invoke(
        &self,
        ctx: &mut TransactionContext,
        transaction: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError> {
        let name = TransactionName::from_str(transaction).map_err(|_| {
            ChaincodeError::UnknownTransaction {
                transaction: transaction.to_string(),
                contract: self.name(),
            }
        })?;

        match name {
            TransactionName::CreateAsset => {
                create_asset(ctx, args).await?;
                Ok(Vec::new())
            }
            TransactionName::CreateInvoice => {
                let [document] = expect_args::<1>(args)?;
                create_invoice(ctx, document).await?;
                Ok(Vec::new())
            }
            TransactionName::ReadAsset => {
                let [booking_id] = expect_args::<1>(args)?;
                let booking = read_asset(ctx, booking_id).await?;
                serde_json::to_vec(&booking).map_err(ChaincodeError::Serialization)
            }
            TransactionName::GetAllAssets => {
                let [] = expect_args::<0>(args)?;
                let bookings = get_all_assets(ctx).await?;
                serde_json::to_vec(&bookings).map_err(ChaincodeError::Serialization)
            }
            TransactionName::AssetExists => {
                let [booking_id] = expect_args::<1>(args)?;
                let exists = asset_exists(ctx, booking_id).await?;
                serde_json::to_vec(&exists).map_err(ChaincodeError::Serialization)
            }
        }
    }
}

fn expect_args<const N: usize>(args: &[String]) -> Result<&[String; N], ArgumentError> {
    args.try_into().map_err(|_| ArgumentError::WrongArgumentCount {
        expected: N,
        actual: args.len(),
    })
}

/// Create a booking from the 23 positional `CreateAsset` arguments.
async fn create_asset(
    ctx: &mut TransactionContext,
    args: &[String],
) -> Result<(), ChaincodeError> {
    let booking = Booking::from_positional_args(args)?;

    if asset_exists(ctx, &booking.booking_id).await? {
        return Err(ChaincodeError::AssetExists(booking.booking_id));
    }

    let record = serde_json::to_vec(&booking).map_err(ChaincodeError::Serialization)?;
    ctx.put_state(&booking.booking_id, record)?;
    debug!("Stored booking {}", booking.booking_id);

    Ok(())
}

/// Create a booking from a full booking document. The document is stored as
/// submitted, under its booking ID.
async fn create_invoice(
    ctx: &mut TransactionContext,
    document: &str,
) -> Result<(), ChaincodeError> {
    let fields: Map<String, Value> =
        serde_json::from_str(document).map_err(ChaincodeError::InvalidDocument)?;
    if fields.contains_key("bookingID") && fields.contains_key("bookingid") {
        return Err(ArgumentError::ConflictingBookingId.into());
    }
    let booking: Booking =
        serde_json::from_value(Value::Object(fields)).map_err(ChaincodeError::InvalidDocument)?;
    if booking.booking_id.is_empty() {
        return Err(ArgumentError::EmptyBookingId.into());
    }

    if asset_exists(ctx, &booking.booking_id).await? {
        return Err(ChaincodeError::AssetExists(booking.booking_id));
    }

    ctx.put_state(&booking.booking_id, document.as_bytes().to_vec())?;
    debug!("Stored booking document {}", booking.booking_id);

    Ok(())
}

async fn read_asset(
    ctx: &mut TransactionContext,
    booking_id: &str,
) -> Result<Booking, ChaincodeError> {
    let record = ctx
        .get_state(booking_id)
        .await?
        .ok_or_else(|| ChaincodeError::AssetNotFound(booking_id.to_string()))?;

    serde_json::from_slice(&record)
        .map_err(|e| ChaincodeError::CorruptRecord(booking_id.to_string(), e))
}

/// Every booking on the channel, ordered by booking ID.
async fn get_all_assets(ctx: &mut TransactionContext) -> Result<Vec<Booking>, ChaincodeError> {
    ctx.get_state_by_range("", "")
        .await?
        .into_iter()
        .map(|(key, record)| {
            serde_json::from_slice(&record).map_err(|e| ChaincodeError::CorruptRecord(key, e))
        })
        .collect()
}

async fn asset_exists(
    ctx: &mut TransactionContext,
    booking_id: &str,
) -> Result<bool, ChaincodeError> {
    Ok(ctx.get_state(booking_id).await?.is_some())
}
