//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a caixa (cash box).
pub type CaixaId = DatabaseId;
/// The ID of a ledger transaction.
pub type TransactionId = DatabaseId;
/// The ID of a receipt.
pub type ReceiptId = DatabaseId;
