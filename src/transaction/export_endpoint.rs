//! Defines the endpoint for downloading the ledger as a CSV report.

use axum::{
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    date::{parse_optional_date, today},
    transaction::{TransactionDetails, TransactionState, list_transaction_details},
};

/// Byte order mark so that spreadsheet programs detect UTF-8 and keep the accents.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const CSV_HEADER: [&str; 7] = [
    "Data",
    "Tipo",
    "Caixa",
    "Descrição",
    "Pessoa",
    "Valor",
    "Transferência Para",
];

/// The inclusive date range to export. Either end may be left open.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// `YYYY-MM-DD`
    pub start: Option<String>,
    /// `YYYY-MM-DD`
    pub end: Option<String>,
}

fn in_range(date: Date, start: Option<Date>, end: Option<Date>) -> bool {
    start.is_none_or(|start| date >= start) && end.is_none_or(|end| date <= end)
}

fn write_csv(transactions: &[TransactionDetails]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(CSV_HEADER)?;

    for details in transactions {
        let transaction = &details.transaction;
        writer.write_record([
            transaction.date.to_string().as_str(),
            transaction.transaction_type.as_str(),
            details.caixa.name.as_str(),
            transaction.description.as_str(),
            transaction.person.as_str(),
            format!("{:.2}", transaction.amount).as_str(),
            details
                .transfer_to
                .as_ref()
                .map_or("", |caixa| caixa.name.as_str()),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|error| csv::Error::from(error.into_error()))
}

/// A route handler that responds with the transactions between `start` and
/// `end` as a CSV attachment, newest first.
pub async fn export_transactions_endpoint(
    State(state): State<TransactionState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, Error> {
    let start = parse_optional_date(query.start.as_deref())?;
    let end = parse_optional_date(query.end.as_deref())?;

    let transactions: Vec<TransactionDetails> = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        list_transaction_details(&connection)?
            .into_iter()
            .filter(|details| in_range(details.transaction.date, start, end))
            .collect()
    };

    let body = write_csv(&transactions).map_err(|error| Error::CsvError(error.to_string()))?;
    tracing::debug!("exported {} transactions", transactions.len());

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"relatorio_igreja_{}.csv\"", today()),
            ),
        ],
        body,
    )
        .into_response())
}
