//! The printable receipt page.

use std::sync::OnceLock;

use axum::extract::State;
use maud::{DOCTYPE, Markup, html};
use numfmt::{Formatter, Precision};

use crate::{
    Error,
    church::{ChurchData, get_church_data},
    database_id::ReceiptId,
    date::{format_brazilian_date, today},
    extract::Path,
    receipt::{Receipt, ReceiptState, get_receipt},
    transaction::TransactionType,
    user::{User, get_user_by_id},
};

const RECEIPT_STYLE: &str = r#"
    body { font-family: sans-serif; color: #1f2937; margin: 2rem; }
    .receipt { max-width: 720px; margin: 0 auto; border: 2px solid var(--accent); border-radius: 12px; padding: 2rem; }
    .header { display: flex; justify-content: space-between; align-items: baseline; border-bottom: 1px solid #e5e7eb; padding-bottom: 1rem; }
    .church-name { font-size: 1.5rem; font-weight: 700; }
    .church-contact { font-size: 0.85rem; color: #6b7280; }
    .title { text-align: center; font-size: 2rem; font-weight: 900; letter-spacing: 0.3rem; color: var(--accent); margin: 1.5rem 0; }
    .amount { text-align: center; font-size: 2.25rem; font-weight: 700; color: var(--accent); margin: 1rem 0; }
    .details dt { font-weight: 600; }
    .details dd { margin: 0 0 0.75rem 0; }
    .footer { border-top: 1px solid #e5e7eb; margin-top: 2rem; padding-top: 1rem; font-size: 0.8rem; color: #6b7280; }
    @media print { .no-print { display: none; } }
"#;

/// Format `amount` as Brazilian reais, e.g. `R$ 1.234,56`.
pub fn format_brl(amount: f64) -> String {
    static FORMATTER: OnceLock<Option<Formatter>> = OnceLock::new();

    let formatter = FORMATTER.get_or_init(|| {
        Formatter::currency("R$ ")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let sign = if amount < 0.0 { "-" } else { "" };
    let amount = amount.abs();

    let formatted = match formatter {
        // Zero is rendered as "0" by numfmt.
        Some(formatter) if amount > 0.0 => formatter.fmt_string(amount),
        _ => format!("R$ {amount:.2}"),
    };

    // numfmt writes "1,234.5", the Brazilian convention is "1.234,50".
    let (integer_part, decimal_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), ""));
    let decimal_part = format!("{decimal_part:0<2}");

    format!(
        "{sign}{},{}",
        integer_part.replace(',', "."),
        &decimal_part[..2]
    )
}

fn accent_color(receipt_type: TransactionType) -> &'static str {
    match receipt_type {
        TransactionType::Entrada => "#15803d",
        TransactionType::Saida => "#b91c1c",
        TransactionType::Transferencia => "#1d4ed8",
    }
}

fn receipt_view(receipt: &Receipt, church: Option<&ChurchData>, issuer: Option<&User>) -> Markup {
    let church_name = church.map_or("Igreja", |church| church.name.as_str());
    let contact: Vec<&str> = church
        .map(|church| {
            [&church.address, &church.phone, &church.email, &church.cnpj]
                .into_iter()
                .filter_map(|field| field.as_deref())
                .collect()
        })
        .unwrap_or_default();

    html! {
        (DOCTYPE)
        html lang="pt-BR"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Recibo - " (receipt.name) }
                style { (RECEIPT_STYLE) }
            }

            body style=(format!("--accent: {}", accent_color(receipt.receipt_type)))
            {
                button class="no-print" onclick="window.print()" { "Imprimir Recibo" }

                div class="receipt"
                {
                    div class="header"
                    {
                        div
                        {
                            @if let Some(logo_url) = church.and_then(|church| church.logo_url.as_deref()) {
                                img src=(logo_url) alt="Logo" height="48";
                            }
                            div class="church-name" { (church_name) }
                            @for line in &contact {
                                div class="church-contact" { (line) }
                            }
                        }
                        div
                        {
                            div class="receipt-number" { "#" (receipt.id) }
                            div class="receipt-date" { (format_brazilian_date(receipt.date)) }
                        }
                    }

                    div class="title" { "RECIBO" }

                    p class="receipt-name"
                    {
                        @match receipt.receipt_type {
                            TransactionType::Saida => "Pago por: ",
                            _ => "Recebemos de: ",
                        }
                        strong { (receipt.name) }
                    }

                    div class="amount" { (format_brl(receipt.amount)) }

                    dl class="details"
                    {
                        dt { "Data:" }
                        dd { (format_brazilian_date(receipt.date)) }
                        dt { "Tipo:" }
                        dd class="receipt-type" { (receipt.receipt_type.label()) }
                        @if !receipt.notes.is_empty() {
                            dt { "Referente a:" }
                            dd class="receipt-notes" { (receipt.notes) }
                        }
                    }

                    div class="footer"
                    {
                        p { "Este recibo foi emitido eletronicamente pelo Sistema de Controle Financeiro da Igreja" }
                        p
                        {
                            "Usuário: " (issuer.map_or("Sistema", |user| user.name.as_str()))
                            " | Data de emissão: " (format_brazilian_date(today()))
                        }
                    }
                }
            }
        }
    }
}

/// A route handler that renders a receipt as a printable HTML page.
pub async fn get_receipt_print_page(
    State(state): State<ReceiptState>,
    Path(receipt_id): Path<ReceiptId>,
) -> Result<Markup, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let receipt = get_receipt(receipt_id, &connection)?;
    let church = get_church_data(&connection)?;
    let issuer = get_user_by_id(receipt.user_id, &connection).ok();

    Ok(receipt_view(&receipt, church.as_ref(), issuer.as_ref()))
}

#[cfg(test)]
mod format_tests {
    use super::format_brl;

    #[test]
    fn formats_with_brazilian_separators() {
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
    }

    #[test]
    fn pads_decimals() {
        assert_eq!(format_brl(12.3), "R$ 12,30");
        assert_eq!(format_brl(50.0), "R$ 50,00");
    }

    #[test]
    fn formats_zero_and_negative() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(-7.5), "-R$ 7,50");
    }
}
