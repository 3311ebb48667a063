//! Per-caixa balances computed from the ledger.

use std::collections::HashMap;

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    caixa::{Caixa, CaixaState, list_caixas},
    database_id::CaixaId,
    extract::Json,
    transaction::{Transaction, TransactionType, list_transactions},
};

/// How much money a caixa holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaixaBalance {
    /// The id of the caixa.
    pub caixa_id: CaixaId,
    /// The key of the caixa.
    pub key: String,
    /// The display name of the caixa.
    pub name: String,
    /// Entries minus exits, plus transfers in, minus transfers out.
    pub balance: f64,
}

/// Compute the balance of every caixa, ordered by name.
///
/// Transactions that refer to a caixa not in `caixas` are ignored.
pub fn compute_balances(caixas: &[Caixa], transactions: &[Transaction]) -> Vec<CaixaBalance> {
    let mut totals: HashMap<CaixaId, f64> = caixas.iter().map(|caixa| (caixa.id, 0.0)).collect();

    let mut add = |caixa_id: CaixaId, amount: f64| {
        if let Some(total) = totals.get_mut(&caixa_id) {
            *total += amount;
        }
    };

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Entrada => add(transaction.caixa_id, transaction.amount),
            TransactionType::Saida => add(transaction.caixa_id, -transaction.amount),
            TransactionType::Transferencia => {
                add(transaction.caixa_id, -transaction.amount);
                if let Some(destination) = transaction.transfer_to_id {
                    add(destination, transaction.amount);
                }
            }
        }
    }

    let mut balances: Vec<CaixaBalance> = caixas
        .iter()
        .map(|caixa| CaixaBalance {
            caixa_id: caixa.id,
            key: caixa.key.clone(),
            name: caixa.name.clone(),
            balance: totals.get(&caixa.id).copied().unwrap_or_default(),
        })
        .collect();
    balances.sort_by(|a, b| a.name.cmp(&b.name).then(a.caixa_id.cmp(&b.caixa_id)));

    balances
}

/// A route handler that responds with the balance of every caixa.
pub async fn get_balances_endpoint(
    State(state): State<CaixaState>,
) -> Result<Json<Vec<CaixaBalance>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let caixas = list_caixas(&connection)?;
    let transactions = list_transactions(&connection)?;

    Ok(Json(compute_balances(&caixas, &transactions)))
}

#[cfg(test)]
mod compute_tests {
    use time::macros::date;

    use crate::{
        caixa::Caixa,
        transaction::{Transaction, TransactionType},
        user::UserId,
    };

    use super::compute_balances;

    fn caixa(id: i64, name: &str) -> Caixa {
        Caixa {
            id,
            key: name.to_lowercase(),
            name: name.to_owned(),
        }
    }

    fn transaction(
        transaction_type: TransactionType,
        caixa_id: i64,
        amount: f64,
        transfer_to_id: Option<i64>,
    ) -> Transaction {
        Transaction {
            id: 0,
            transaction_type,
            caixa_id,
            description: "".to_owned(),
            person: "".to_owned(),
            amount,
            date: date!(2025 - 09 - 22),
            transfer_to_id,
            user_id: UserId::new(1),
        }
    }

    #[test]
    fn empty_ledger_has_zero_balances_sorted_by_name() {
        let balances = compute_balances(&[caixa(1, "Missões"), caixa(2, "Geral")], &[]);

        let names: Vec<_> = balances.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Geral", "Missões"]);
        assert!(balances.iter().all(|b| b.balance == 0.0));
    }

    #[test]
    fn sums_entries_exits_and_transfers() {
        let caixas = [caixa(1, "Geral"), caixa(2, "Missões")];
        let transactions = [
            transaction(TransactionType::Entrada, 1, 100.0, None),
            transaction(TransactionType::Saida, 1, 30.0, None),
            transaction(TransactionType::Transferencia, 1, 20.0, Some(2)),
            transaction(TransactionType::Entrada, 2, 5.0, None),
        ];

        let balances = compute_balances(&caixas, &transactions);

        assert_eq!(balances[0].name, "Geral");
        assert_eq!(balances[0].balance, 50.0);
        assert_eq!(balances[1].name, "Missões");
        assert_eq!(balances[1].balance, 25.0);
    }
}
