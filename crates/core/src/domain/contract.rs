use crate::domain::snapshot::FinancialSnapshot;
use anyhow::ensure;
use serde::{Deserialize, Serialize};

/// Wire contract for the external snapshot provider. The rule engine accepts
/// whatever `FinancialSnapshot` it is handed, so the non-negativity
/// constraints are enforced here, at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPayload {
    pub income: f64,
    pub daily_outflow: f64,
    pub fixed_expenses: f64,
    pub taxes: f64,
    pub income_by_card: f64,
    pub income_by_cash: f64,
    pub pending_balance_due: f64,
    pub overdue_balance_due: f64,
    pub net_balance: f64,
}

impl SnapshotPayload {
    pub fn validate_and_into_snapshot(self) -> anyhow::Result<FinancialSnapshot> {
        ensure_non_negative("income", self.income)?;
        ensure_non_negative("daily_outflow", self.daily_outflow)?;
        ensure_non_negative("fixed_expenses", self.fixed_expenses)?;
        ensure_non_negative("taxes", self.taxes)?;
        ensure_non_negative("income_by_card", self.income_by_card)?;
        ensure_non_negative("income_by_cash", self.income_by_cash)?;
        ensure_non_negative("pending_balance_due", self.pending_balance_due)?;
        ensure_non_negative("overdue_balance_due", self.overdue_balance_due)?;

        // net_balance is signed but must still be a real number.
        ensure!(
            self.net_balance.is_finite(),
            "net_balance must be finite (got {})",
            self.net_balance
        );

        Ok(FinancialSnapshot {
            income: self.income,
            daily_outflow: self.daily_outflow,
            fixed_expenses: self.fixed_expenses,
            taxes: self.taxes,
            income_by_card: self.income_by_card,
            income_by_cash: self.income_by_cash,
            pending_balance_due: self.pending_balance_due,
            overdue_balance_due: self.overdue_balance_due,
            net_balance: self.net_balance,
        })
    }
}

fn ensure_non_negative(field: &'static str, value: f64) -> anyhow::Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "{field} must be a non-negative number (got {value})"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload_json() -> serde_json::Value {
        json!({
            "income": 15000.0,
            "daily_outflow": 3500.0,
            "fixed_expenses": 4000.0,
            "taxes": 2000.0,
            "income_by_card": 9000.0,
            "income_by_cash": 6000.0,
            "pending_balance_due": 2500.0,
            "overdue_balance_due": 800.0,
            "net_balance": 3000.0,
        })
    }

    #[test]
    fn accepts_valid_payload() {
        let payload: SnapshotPayload = serde_json::from_value(valid_payload_json()).unwrap();
        let snapshot = payload.validate_and_into_snapshot().unwrap();
        assert_eq!(snapshot.income, 15000.0);
        assert_eq!(snapshot.overdue_balance_due, 800.0);
    }

    #[test]
    fn accepts_negative_net_balance() {
        let mut v = valid_payload_json();
        v["net_balance"] = json!(-1200.5);
        let payload: SnapshotPayload = serde_json::from_value(v).unwrap();
        let snapshot = payload.validate_and_into_snapshot().unwrap();
        assert_eq!(snapshot.net_balance, -1200.5);
    }

    #[test]
    fn rejects_negative_income() {
        let mut v = valid_payload_json();
        v["income"] = json!(-1.0);
        let payload: SnapshotPayload = serde_json::from_value(v).unwrap();
        let err = payload.validate_and_into_snapshot().unwrap_err();
        assert!(err.to_string().contains("income"));
    }

    #[test]
    fn rejects_negative_overdue_balance() {
        let mut v = valid_payload_json();
        v["overdue_balance_due"] = json!(-0.01);
        let payload: SnapshotPayload = serde_json::from_value(v).unwrap();
        assert!(payload.validate_and_into_snapshot().is_err());
    }

    #[test]
    fn rejects_missing_field_via_deserialize() {
        let mut v = valid_payload_json();
        v.as_object_mut().unwrap().remove("taxes");
        assert!(serde_json::from_value::<SnapshotPayload>(v).is_err());
    }
}
