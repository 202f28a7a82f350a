//! Request, receipt and outcome types

pub mod receipt;
pub mod tx;

pub use receipt::{ConfirmationOutcome, Receipt, Submission};
pub use tx::{GasPricing, TxParams, TxRequest, WaitMode};
