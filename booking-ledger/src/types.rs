pub mod booking;
pub mod transaction;

pub use booking::{ArgumentError, Booking, CREATE_ASSET_ARGUMENTS};
pub use transaction::TransactionName;
