use serde::{Deserialize, Serialize};

/// Aggregated figures for one reporting month. All monetary fields except
/// `net_balance` are expected to be non-negative; that constraint is enforced
/// at the provider boundary (see `domain::contract`), not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
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

impl FinancialSnapshot {
    /// Share of income consumed by `amount`, as a percentage. Zero income
    /// yields 0.0 so dashboard cards never render a non-finite ratio.
    pub fn income_share_pct(&self, amount: f64) -> f64 {
        if self.income <= 0.0 {
            return 0.0;
        }
        amount / self.income * 100.0
    }
}

/// One day of the weekly inflow/outflow series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayFlow {
    pub label: String,
    pub inflow: f64,
    pub outflow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSeries {
    pub days: Vec<DayFlow>,
}

impl WeekSeries {
    /// Largest single flow in the series, used to scale bar widths.
    /// Floored at 1.0 so an empty or all-zero week keeps ratios finite.
    pub fn scale_max(&self) -> f64 {
        self.days
            .iter()
            .flat_map(|d| [d.inflow, d.outflow])
            .fold(1.0_f64, f64::max)
    }
}

// Deterministic placeholder figures served until an external snapshot
// provider pushes real data.
pub fn demo_month() -> FinancialSnapshot {
    FinancialSnapshot {
        income: 15000.0,
        daily_outflow: 3500.0,
        fixed_expenses: 4000.0,
        taxes: 2000.0,
        income_by_card: 9000.0,
        income_by_cash: 6000.0,
        pending_balance_due: 2500.0,
        overdue_balance_due: 800.0,
        net_balance: 3000.0,
    }
}

pub fn demo_week() -> WeekSeries {
    let days = [
        ("Lun", 2000.0, 500.0),
        ("Mar", 1800.0, 600.0),
        ("Mié", 2200.0, 450.0),
        ("Jue", 1900.0, 550.0),
        ("Vie", 2500.0, 700.0),
        ("Sáb", 2300.0, 400.0),
        ("Dom", 2300.0, 300.0),
    ];

    WeekSeries {
        days: days
            .into_iter()
            .map(|(label, inflow, outflow)| DayFlow {
                label: label.to_string(),
                inflow,
                outflow,
            })
            .collect(),
    }
}
