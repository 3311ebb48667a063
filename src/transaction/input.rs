//! The JSON body accepted by the create and edit transaction endpoints, and
//! its validation into a [NewTransaction].

use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    Error,
    database_id::CaixaId,
    date::parse_date,
    reference::{CaixaRef, UserRef},
    transaction::{NewTransaction, TransactionType},
};

/// An amount as sent by the dashboard, either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// e.g. `12.5`
    Number(f64),
    /// e.g. `"12.50"` or `"12,50"`
    Text(String),
}

impl AmountInput {
    /// Parse the amount and check that it is a positive, finite number.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the amount is not a number or is not positive.
    pub fn to_positive_amount(&self) -> Result<f64, Error> {
        let amount = match self {
            AmountInput::Number(amount) => *amount,
            AmountInput::Text(text) => text
                .trim()
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|_| Error::Validation(format!("Valor inválido: {text}")))?,
        };

        if amount.is_finite() && amount > 0.0 {
            Ok(amount)
        } else {
            Err(Error::Validation(
                "O valor deve ser um número positivo.".to_owned(),
            ))
        }
    }
}

/// The optional receipt to create together with a transaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceiptRequest {
    /// The name printed on the receipt. Falls back to the transaction's person.
    pub name: Option<String>,
    /// Free text printed on the receipt. Falls back to the description.
    pub notes: Option<String>,
}

/// The JSON body for creating or editing a transaction.
///
/// Caixas and users may be given by id or by natural key; when both are
/// present the id wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    /// One of entrada, saida or transferencia.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// The id of the caixa.
    pub caixa_id: Option<CaixaId>,
    /// The key of the caixa.
    pub caixa: Option<String>,
    /// The id of the user recording the transaction.
    pub user_id: Option<i64>,
    /// The username of the user recording the transaction.
    pub user: Option<String>,
    /// The id of the destination caixa of a transfer.
    pub transfer_to_id: Option<CaixaId>,
    /// The key of the destination caixa of a transfer.
    pub transfer_to: Option<String>,
    /// Defaults to "".
    pub description: Option<String>,
    /// Defaults to "".
    pub person: Option<String>,
    /// Required and positive.
    pub amount: Option<AmountInput>,
    /// `YYYY-MM-DD` or an RFC 3339 date-time.
    pub date: Option<String>,
    /// Only read by the create endpoint.
    pub receipt: Option<ReceiptRequest>,
}

impl TransactionInput {
    /// Validate the input and resolve its caixa and user references.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingFields] if the type, caixa, user, amount or date is absent,
    /// - [Error::InvalidTransactionType], [Error::InvalidDate] or [Error::Validation]
    ///   if a field is malformed,
    /// - [Error::UnknownCaixa], [Error::UnknownUser] or [Error::UnknownTransferTarget]
    ///   if a reference cannot be resolved,
    /// - or [Error::Validation] if the transfer fields do not match the type.
    pub fn resolve(&self, connection: &Connection) -> Result<NewTransaction, Error> {
        let transaction_type: TransactionType = self
            .transaction_type
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .ok_or(Error::MissingFields)?
            .parse()?;
        let caixa_ref = CaixaRef::from_input(self.caixa_id, self.caixa.as_deref())
            .ok_or(Error::MissingFields)?;
        let user_ref =
            UserRef::from_input(self.user_id, self.user.as_deref()).ok_or(Error::MissingFields)?;
        let amount = self
            .amount
            .as_ref()
            .ok_or(Error::MissingFields)?
            .to_positive_amount()?;
        let date = self
            .date
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .ok_or(Error::MissingFields)
            .and_then(parse_date)?;
        let transfer_ref = CaixaRef::from_input(self.transfer_to_id, self.transfer_to.as_deref());

        let caixa = caixa_ref.resolve(connection)?;
        let user = user_ref.resolve(connection)?;

        let transfer_to_id = match (transaction_type, transfer_ref) {
            (TransactionType::Transferencia, Some(transfer_ref)) => {
                let destination =
                    transfer_ref
                        .resolve(connection)
                        .map_err(|error| match error {
                            Error::UnknownCaixa => Error::UnknownTransferTarget,
                            error => error,
                        })?;

                if destination.id == caixa.id {
                    return Err(Error::Validation(
                        "O caixa de destino deve ser diferente do caixa de origem.".to_owned(),
                    ));
                }

                Some(destination.id)
            }
            (TransactionType::Transferencia, None) => {
                return Err(Error::Validation(
                    "Transferências precisam de um caixa de destino.".to_owned(),
                ));
            }
            (_, Some(_)) => {
                return Err(Error::Validation(
                    "Somente transferências podem ter um caixa de destino.".to_owned(),
                ));
            }
            (_, None) => None,
        };

        Ok(NewTransaction {
            transaction_type,
            caixa_id: caixa.id,
            description: self.description.as_deref().unwrap_or("").trim().to_owned(),
            person: self.person.as_deref().unwrap_or("").trim().to_owned(),
            amount,
            date,
            transfer_to_id,
            user_id: user.id,
        })
    }
}
