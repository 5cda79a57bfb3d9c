//! Bridge flow: status derivation, the form, and receipt polling

pub mod form;
pub mod receipt;
pub mod status;

pub use form::BridgeForm;
pub use receipt::{ReceiptChecker, ReceiptStatus};
pub use status::{derive_status, BridgeStatus, StatusView, TxSignals};
