use chrono::{DateTime, NaiveDate, Utc};

use crate::alerts::model::{Notification, NotificationKind};
use crate::domain::snapshot::FinancialSnapshot;
use crate::time::month::days_remaining_in_month;

/// Share of income above which fixed expenses are flagged.
pub const FIXED_EXPENSE_INCOME_RATIO: f64 = 0.30;

/// Share of income above which the tax burden is flagged.
pub const TAX_INCOME_RATIO: f64 = 0.20;

/// Share of income above which pending balances are flagged.
pub const PENDING_INCOME_RATIO: f64 = 0.25;

/// Days before month end at which the closing reminder fires.
pub const MONTH_END_WINDOW_DAYS: u32 = 5;

/// Evaluate all threshold rules against a snapshot.
///
/// Pure and total: no wall-clock reads, no mutation, never fails. `today`
/// drives the month-end rule, `now` stamps `created_at`. Output order is the
/// fixed rule order and ids are stable per rule, so identical inputs produce
/// identical batches.
///
/// Threshold comparisons are strict. With zero income the income-relative
/// thresholds collapse to zero, so any positive fixed-expense, tax, or
/// pending figure fires its rule.
pub fn evaluate(
    snapshot: &FinancialSnapshot,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let mut out = Vec::new();

    if snapshot.net_balance < 0.0 {
        out.push(Notification::new(
            "1",
            NotificationKind::Error,
            "Balance Negativo",
            format!(
                "Tu balance actual es de ${:.2}. Revisa tus gastos.",
                snapshot.net_balance
            ),
            now,
        ));
    }

    if snapshot.net_balance > 0.0 {
        out.push(Notification::new(
            "2",
            NotificationKind::Success,
            "Balance Positivo",
            format!("¡Excelente! Tu balance es de ${:.2}.", snapshot.net_balance),
            now,
        ));
    }

    if snapshot.fixed_expenses > snapshot.income * FIXED_EXPENSE_INCOME_RATIO {
        out.push(Notification::new(
            "3",
            NotificationKind::Warning,
            "Gastos Fijos Elevados",
            format!(
                "Tus gastos fijos (${}) representan más del 30% de tus entradas.",
                snapshot.fixed_expenses
            ),
            now,
        ));
    }

    if snapshot.taxes > snapshot.income * TAX_INCOME_RATIO {
        out.push(Notification::new(
            "4",
            NotificationKind::Warning,
            "Impuestos Elevados",
            format!(
                "Tus impuestos (${}) representan más del 20% de tus entradas.",
                snapshot.taxes
            ),
            now,
        ));
    }

    if snapshot.overdue_balance_due > 0.0 {
        out.push(Notification::new(
            "5",
            NotificationKind::Error,
            "Cuentas Vencidas",
            format!(
                "Tienes ${:.2} en cuentas vencidas. ¡Paga urgente!",
                snapshot.overdue_balance_due
            ),
            now,
        ));
    }

    if snapshot.pending_balance_due > snapshot.income * PENDING_INCOME_RATIO {
        out.push(Notification::new(
            "6",
            NotificationKind::Warning,
            "Cuentas Pendientes Elevadas",
            format!(
                "Tienes ${:.2} en cuentas pendientes (más del 25% de tus entradas).",
                snapshot.pending_balance_due
            ),
            now,
        ));
    }

    let days_left = days_remaining_in_month(today);
    if days_left <= MONTH_END_WINDOW_DAYS {
        out.push(Notification::new(
            "7",
            NotificationKind::Info,
            "Fin de Mes Próximo",
            format!(
                "Quedan {days_left} días para finalizar el mes. Revisa tus pendientes y cuentas a pagar."
            ),
            now,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::demo_month;
    use chrono::TimeZone;

    // Mid-month date so the month-end reminder stays out of the way unless a
    // test asks for it.
    fn mid_month() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn eval_at(snapshot: &FinancialSnapshot, today: NaiveDate) -> Vec<Notification> {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        evaluate(snapshot, today, now)
    }

    fn kinds(batch: &[Notification]) -> Vec<NotificationKind> {
        batch.iter().map(|n| n.kind).collect()
    }

    fn quiet_snapshot() -> FinancialSnapshot {
        FinancialSnapshot {
            income: 10000.0,
            daily_outflow: 1000.0,
            fixed_expenses: 1000.0,
            taxes: 500.0,
            income_by_card: 5000.0,
            income_by_cash: 5000.0,
            pending_balance_due: 0.0,
            overdue_balance_due: 0.0,
            net_balance: 0.0,
        }
    }

    #[test]
    fn negative_balance_fires_error_only() {
        let mut snapshot = quiet_snapshot();
        snapshot.net_balance = -500.0;
        let batch = eval_at(&snapshot, mid_month());
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, "1");
        assert_eq!(batch[0].kind, NotificationKind::Error);
        assert_eq!(batch[0].title, "Balance Negativo");
        assert!(batch[0].message.contains("$-500.00"));
    }

    #[test]
    fn positive_balance_fires_success_only() {
        let mut snapshot = quiet_snapshot();
        snapshot.net_balance = 3000.0;
        let batch = eval_at(&snapshot, mid_month());
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, "2");
        assert_eq!(batch[0].kind, NotificationKind::Success);
        assert!(batch[0].message.contains("$3000.00"));
    }

    #[test]
    fn zero_balance_fires_neither_balance_rule() {
        let batch = eval_at(&quiet_snapshot(), mid_month());
        assert!(batch.is_empty());
    }

    #[test]
    fn fixed_expense_threshold_is_strict() {
        let mut snapshot = quiet_snapshot();
        // Exactly 30% of income: must not fire.
        snapshot.fixed_expenses = 3000.0;
        assert!(eval_at(&snapshot, mid_month()).is_empty());

        snapshot.fixed_expenses = 3000.01;
        let batch = eval_at(&snapshot, mid_month());
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, "3");
        assert_eq!(batch[0].kind, NotificationKind::Warning);
    }

    #[test]
    fn tax_threshold_is_strict() {
        let mut snapshot = quiet_snapshot();
        snapshot.taxes = 2000.0;
        assert!(eval_at(&snapshot, mid_month()).is_empty());

        snapshot.taxes = 2500.0;
        let batch = eval_at(&snapshot, mid_month());
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, "4");
    }

    #[test]
    fn overdue_fires_for_any_positive_amount() {
        let mut snapshot = quiet_snapshot();
        snapshot.overdue_balance_due = 0.01;
        let batch = eval_at(&snapshot, mid_month());
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, "5");
        assert_eq!(batch[0].kind, NotificationKind::Error);
        assert!(batch[0].message.contains("$0.01"));
    }

    #[test]
    fn pending_threshold_is_strict() {
        let mut snapshot = quiet_snapshot();
        snapshot.pending_balance_due = 2500.0;
        assert!(eval_at(&snapshot, mid_month()).is_empty());

        snapshot.pending_balance_due = 2600.0;
        let batch = eval_at(&snapshot, mid_month());
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, "6");
    }

    #[test]
    fn zero_income_treats_positive_figures_as_over_threshold() {
        let mut snapshot = quiet_snapshot();
        snapshot.income = 0.0;
        snapshot.fixed_expenses = 1.0;
        snapshot.taxes = 1.0;
        snapshot.pending_balance_due = 1.0;
        let batch = eval_at(&snapshot, mid_month());
        assert_eq!(
            batch.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
            vec!["3", "4", "6"]
        );
    }

    #[test]
    fn zero_income_with_zero_figures_stays_quiet() {
        let mut snapshot = quiet_snapshot();
        snapshot.income = 0.0;
        snapshot.fixed_expenses = 0.0;
        snapshot.taxes = 0.0;
        assert!(eval_at(&snapshot, mid_month()).is_empty());
    }

    #[test]
    fn month_end_reminder_fires_inside_window() {
        // 2026-03-28: 3 days left in March.
        let today = NaiveDate::from_ymd_opt(2026, 3, 28).unwrap();
        let batch = eval_at(&quiet_snapshot(), today);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, "7");
        assert_eq!(batch[0].kind, NotificationKind::Info);
        assert!(batch[0].message.contains("Quedan 3 días"));
    }

    #[test]
    fn month_end_reminder_fires_on_last_day() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        let batch = eval_at(&quiet_snapshot(), today);
        assert_eq!(batch.len(), 1);
        assert!(batch[0].message.contains("Quedan 0 días"));
    }

    #[test]
    fn month_end_reminder_silent_outside_window() {
        // 2026-03-25: 6 days left.
        let today = NaiveDate::from_ymd_opt(2026, 3, 25).unwrap();
        assert!(eval_at(&quiet_snapshot(), today).is_empty());
    }

    #[test]
    fn demo_month_three_days_before_month_end() {
        // The demo figures sit below every income-relative threshold, so only
        // the balance, overdue, and month-end rules fire, in rule order.
        let today = NaiveDate::from_ymd_opt(2026, 3, 28).unwrap();
        let batch = eval_at(&demo_month(), today);

        assert_eq!(
            batch.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
            vec!["2", "5", "7"]
        );
        assert_eq!(
            kinds(&batch),
            vec![
                NotificationKind::Success,
                NotificationKind::Error,
                NotificationKind::Info
            ]
        );
        assert!(batch.iter().all(|n| !n.read));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 28).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 28, 8, 30, 0).unwrap();
        let first = evaluate(&demo_month(), today, now);
        let second = evaluate(&demo_month(), today, now);
        assert_eq!(first, second);
    }
}
