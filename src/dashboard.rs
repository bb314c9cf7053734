use crate::metrics;
use crate::models::{
    AppState, BalanceView, BudgetInput, Category, DashboardSnapshot, ExpenseInput, HealthView,
    IncomeInput, IncomeSource, InputError, InsightView, TotalPoint, ViewInput, ViewMode, OVERVIEW,
};
use crate::totals::TotalsModel;
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

/// One dashboard instance: the totals model plus where the user was looking.
#[derive(Debug, Clone)]
pub struct Dashboard {
    totals: TotalsModel,
    active_mode: ViewMode,
    sidebar_view: String,
    sidebar_category: Option<String>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::from_state(&AppState::default())
    }
}

impl Dashboard {
    /// Rebuilds every derived value from the persisted raw text.
    pub fn from_state(state: &AppState) -> Self {
        Self {
            totals: TotalsModel::from_raw(&state.expenses, &state.income, state.monthly_budget),
            active_mode: state.active_mode,
            sidebar_view: state.sidebar_view.clone(),
            sidebar_category: state.sidebar_category.clone(),
        }
    }

    pub fn to_state(&self) -> AppState {
        AppState {
            expenses: self.totals.expense_fields(),
            income: self.totals.income_fields().to_vec(),
            monthly_budget: self.totals.budget().value(),
            active_mode: self.active_mode,
            sidebar_view: self.sidebar_view.clone(),
            sidebar_category: self.sidebar_category.clone(),
        }
    }

    pub fn totals(&self) -> &TotalsModel {
        &self.totals
    }

    pub fn apply_expense(&mut self, input: &ExpenseInput) -> Result<(), InputError> {
        let category: Category = input.category.parse()?;
        let totals = self
            .totals
            .set_expense_field(category, input.index, input.value.as_str())?;
        info!(
            "expense {category}[{}] updated, category total {}",
            input.index,
            totals.get(category)
        );
        Ok(())
    }

    pub fn apply_income(&mut self, input: &IncomeInput) -> Result<(), InputError> {
        let source: IncomeSource = input.source.parse()?;
        let totals = self.totals.set_income_field(source, input.value.as_str());
        info!("income {} updated, total income {}", source.id(), totals.total());
        Ok(())
    }

    /// Returns whether the budget was accepted.
    pub fn apply_budget(&mut self, input: &BudgetInput) -> bool {
        let applied = self.totals.set_budget(&input.value);
        if applied {
            info!("monthly budget set to {}", self.totals.budget().value());
        } else {
            warn!("ignoring budget entry {:?}", input.value);
        }
        applied
    }

    /// Switches mode and sidebar filter. Selecting the overview clears the
    /// category; selecting a category requires a known id and is ignored
    /// while the overview is shown.
    pub fn apply_view(&mut self, input: &ViewInput) -> Result<(), InputError> {
        let mode = input.mode.as_deref().map(str::parse::<ViewMode>).transpose()?;
        let category = input
            .sidebar_category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()?;

        if let Some(mode) = mode {
            self.active_mode = mode;
        }
        if let Some(view) = &input.sidebar_view {
            self.sidebar_view = view.clone();
            if view == OVERVIEW {
                self.sidebar_category = None;
            }
        }
        if let Some(category) = category {
            if self.sidebar_view == OVERVIEW {
                warn!("ignoring sidebar category {} while the overview is shown", category.id());
            } else {
                self.sidebar_category = Some(category.id().to_string());
            }
        }
        Ok(())
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot_at(Local::now().date_naive())
    }

    pub fn snapshot_at(&self, today: NaiveDate) -> DashboardSnapshot {
        let derived = metrics::derive(
            self.totals.categories(),
            self.totals.income(),
            self.totals.budget(),
        );

        DashboardSnapshot {
            month_label: today.format("%B %Y").to_string(),
            active_mode: self.active_mode,
            sidebar_view: self.sidebar_view.clone(),
            sidebar_category: self.sidebar_category.clone(),
            expenses: self
                .totals
                .categories()
                .iter()
                .map(|(category, total)| TotalPoint {
                    id: category.id().to_string(),
                    label: category.label().to_string(),
                    total,
                })
                .collect(),
            income: self
                .totals
                .income()
                .iter()
                .map(|(source, total)| TotalPoint {
                    id: source.id().to_string(),
                    label: source.label().to_string(),
                    total,
                })
                .collect(),
            total_income: derived.total_income,
            total_expense: derived.total_expense,
            net_balance: derived.net_balance,
            monthly_budget: self.totals.budget().value(),
            balance: BalanceView {
                status: derived.balance_status,
                label: derived.balance_status.label().to_string(),
                message: derived.balance_status.message().to_string(),
            },
            spending_share: derived.spending_share,
            health: HealthView {
                tier: derived.health,
                label: derived.health.label().to_string(),
                message: derived.health.message().to_string(),
            },
            breakdown: derived.breakdown,
            budget: derived.budget,
            insights: derived
                .insights
                .into_iter()
                .map(|kind| InsightView {
                    kind,
                    message: kind.message().to_string(),
                })
                .collect(),
        }
    }
}
