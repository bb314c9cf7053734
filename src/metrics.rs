use crate::input::finite_or_zero;
use crate::models::{BalanceStatus, BreakdownItem, BudgetUtilization, HealthTier, Insight, UtilizationBand};
use crate::totals::{Budget, CategoryTotals, IncomeTotals};

pub const TOP_CATEGORIES: usize = 3;

/// Everything derived from the totals. Holds no state of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_balance: f64,
    pub balance_status: BalanceStatus,
    pub spending_share: Option<f64>,
    pub health: HealthTier,
    pub breakdown: Vec<BreakdownItem>,
    pub budget: Option<BudgetUtilization>,
    pub insights: Vec<Insight>,
}

pub fn derive(categories: &CategoryTotals, income: &IncomeTotals, budget: Budget) -> Metrics {
    let total_income = income.total();
    let total_expense = categories.total();
    let net_balance = finite_or_zero(total_income - total_expense);

    Metrics {
        total_income,
        total_expense,
        net_balance,
        balance_status: balance_status(net_balance),
        spending_share: spending_share(total_income, total_expense),
        health: health_tier(total_income, total_expense),
        breakdown: top_breakdown(categories, TOP_CATEGORIES),
        budget: budget_utilization(total_expense, budget),
        insights: insights(total_income, total_expense, budget),
    }
}

/// Ratio policy: expense/income at most 70% is excellent, at most 90% good.
/// Ratios are compared cross-multiplied so round amounts land on the boundary.
pub fn health_tier(total_income: f64, total_expense: f64) -> HealthTier {
    if total_income == 0.0 {
        HealthTier::NoData
    } else if total_expense * 100.0 <= total_income * 70.0 {
        HealthTier::Excellent
    } else if total_expense * 100.0 <= total_income * 90.0 {
        HealthTier::Good
    } else {
        HealthTier::Poor
    }
}

pub fn balance_status(net_balance: f64) -> BalanceStatus {
    if net_balance > 0.0 {
        BalanceStatus::Surplus
    } else if net_balance < 0.0 {
        BalanceStatus::Deficit
    } else {
        BalanceStatus::BreakEven
    }
}

pub fn spending_share(total_income: f64, total_expense: f64) -> Option<f64> {
    (total_income > 0.0)
        .then(|| total_expense * 100.0 / total_income)
        .filter(|share| share.is_finite())
}

/// The `n` largest positive categories, each as a share of those `n` only.
/// Ties keep enumeration order.
pub fn top_breakdown(categories: &CategoryTotals, n: usize) -> Vec<BreakdownItem> {
    let mut ranked: Vec<_> = categories.iter().filter(|(_, amount)| *amount > 0.0).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);

    let subtotal: f64 = ranked.iter().map(|(_, amount)| amount).sum();
    ranked
        .into_iter()
        .map(|(category, amount)| BreakdownItem {
            category,
            label: category.label().to_string(),
            amount,
            percent: share_of(amount, subtotal),
        })
        .collect()
}

/// Percentage of `amount` in `subtotal`, zero once the subtotal overflows.
fn share_of(amount: f64, subtotal: f64) -> f64 {
    let percent = amount * 100.0 / subtotal;
    if percent.is_finite() {
        percent
    } else {
        finite_or_zero(amount / subtotal * 100.0)
    }
}

pub fn budget_utilization(total_expense: f64, budget: Budget) -> Option<BudgetUtilization> {
    if !budget.is_configured() {
        return None;
    }

    let percent = (total_expense * 100.0 / budget.value()).min(100.0);
    let band = if percent < 70.0 {
        UtilizationBand::Comfortable
    } else if percent < 100.0 {
        UtilizationBand::Caution
    } else {
        UtilizationBand::Critical
    };

    Some(BudgetUtilization {
        percent,
        over_budget: total_expense > budget.value(),
        band,
    })
}

/// Findings in fixed order: overspending, budget, ratio.
pub fn insights(total_income: f64, total_expense: f64, budget: Budget) -> Vec<Insight> {
    let mut found = Vec::new();

    if total_expense > total_income {
        found.push(Insight::Overspending);
    }
    if budget.is_configured() && total_expense > budget.value() {
        found.push(Insight::BudgetExceeded);
    }
    if total_income > 0.0 && total_expense * 10.0 > total_income * 7.0 {
        found.push(Insight::HighExpenseRatio);
    }

    if found.is_empty() {
        found.push(Insight::NoRisks);
    }
    found
}
