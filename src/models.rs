use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// The seven fixed expense buckets, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Basic-living-expenses")]
    BasicLiving,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Food")]
    Food,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Lifestyle-Entertainment")]
    Lifestyle,
    #[serde(rename = "Health")]
    Health,
    #[serde(rename = "Savings")]
    Savings,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::BasicLiving,
        Category::Transportation,
        Category::Food,
        Category::Education,
        Category::Lifestyle,
        Category::Health,
        Category::Savings,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn id(self) -> &'static str {
        match self {
            Category::BasicLiving => "Basic-living-expenses",
            Category::Transportation => "Transportation",
            Category::Food => "Food",
            Category::Education => "Education",
            Category::Lifestyle => "Lifestyle-Entertainment",
            Category::Health => "Health",
            Category::Savings => "Savings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::BasicLiving => "Basic Living",
            Category::Lifestyle => "Lifestyle",
            other => other.id(),
        }
    }

    /// Input fields shown on the category's ticket, in form order.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Category::BasicLiving => &["Rent / housing", "Utilities", "Groceries", "Phone & internet"],
            Category::Transportation => &["Fuel", "Public transport", "Vehicle maintenance"],
            Category::Food => &["Dining out", "Takeaway", "Snacks & beverages"],
            Category::Education => &["Tuition", "Books & supplies", "Online courses"],
            Category::Lifestyle => &["Subscriptions", "Shopping", "Outings & events"],
            Category::Health => &["Insurance", "Medicines", "Fitness"],
            Category::Savings => &["Emergency fund", "Investments", "Retirement"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.id() == s)
            .ok_or_else(|| InputError::UnknownCategory(s.to_string()))
    }
}

/// The five fixed income buckets, in display order. One input field each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeSource {
    Business,
    Salary,
    Investments,
    Rental,
    Other,
}

impl IncomeSource {
    pub const ALL: [IncomeSource; 5] = [
        IncomeSource::Business,
        IncomeSource::Salary,
        IncomeSource::Investments,
        IncomeSource::Rental,
        IncomeSource::Other,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn id(self) -> &'static str {
        match self {
            IncomeSource::Business => "business",
            IncomeSource::Salary => "salary",
            IncomeSource::Investments => "investments",
            IncomeSource::Rental => "rental",
            IncomeSource::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IncomeSource::Business => "Business",
            IncomeSource::Salary => "Salary",
            IncomeSource::Investments => "Investments",
            IncomeSource::Rental => "Rental",
            IncomeSource::Other => "Other",
        }
    }
}

impl FromStr for IncomeSource {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IncomeSource::ALL
            .into_iter()
            .find(|source| source.id() == s)
            .ok_or_else(|| InputError::UnknownSource(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Expenses,
    Income,
    Balance,
}

impl FromStr for ViewMode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expenses" => Ok(ViewMode::Expenses),
            "income" => Ok(ViewMode::Income),
            "balance" => Ok(ViewMode::Balance),
            other => Err(InputError::UnknownMode(other.to_string())),
        }
    }
}

pub const OVERVIEW: &str = "overview";

/// Everything the dashboard persists. Inputs are kept as the raw text the user
/// typed; totals are always recomputed from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default, deserialize_with = "known_categories")]
    pub expenses: BTreeMap<Category, Vec<String>>,
    #[serde(default)]
    pub income: Vec<String>,
    #[serde(default)]
    pub monthly_budget: f64,
    #[serde(default, deserialize_with = "lenient_mode")]
    pub active_mode: ViewMode,
    #[serde(default = "overview")]
    pub sidebar_view: String,
    #[serde(default)]
    pub sidebar_category: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            expenses: BTreeMap::new(),
            income: Vec::new(),
            monthly_budget: 0.0,
            active_mode: ViewMode::default(),
            sidebar_view: overview(),
            sidebar_category: None,
        }
    }
}

fn overview() -> String {
    OVERVIEW.to_string()
}

/// Unknown category ids are logged and skipped.
fn known_categories<'de, D>(deserializer: D) -> Result<BTreeMap<Category, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(id, fields)| match id.parse::<Category>() {
            Ok(category) => Some((category, fields)),
            Err(err) => {
                warn!("dropping saved expenses: {err}");
                None
            }
        })
        .collect())
}

fn lenient_mode<'de, D>(deserializer: D) -> Result<ViewMode, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_default())
}

/// Rejected request input. Malformed numbers are not errors; they count as zero.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("unknown expense category '{0}'")]
    UnknownCategory(String),
    #[error("unknown income source '{0}'")]
    UnknownSource(String),
    #[error("unknown view mode '{0}'")]
    UnknownMode(String),
    #[error("{category} has {len} fields, index {index} is out of range")]
    FieldOutOfRange {
        category: Category,
        index: usize,
        len: usize,
    },
}

#[derive(Debug, Deserialize)]
pub struct ExpenseInput {
    pub category: String,
    pub index: usize,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct IncomeInput {
    pub source: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct BudgetInput {
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewInput {
    pub mode: Option<String>,
    pub sidebar_view: Option<String>,
    pub sidebar_category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalPoint {
    pub id: String,
    pub label: String,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthTier {
    Excellent,
    Good,
    Poor,
    NoData,
}

impl HealthTier {
    pub fn label(self) -> &'static str {
        match self {
            HealthTier::Excellent => "Excellent Financial Health",
            HealthTier::Good => "Good Financial Health",
            HealthTier::Poor => "Poor Financial Health",
            HealthTier::NoData => "No Data",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            HealthTier::Excellent => "You are saving well and spending responsibly.",
            HealthTier::Good => "Your spending is controlled, but watch expenses.",
            HealthTier::Poor => "Expenses are too high compared to income.",
            HealthTier::NoData => "Add income to evaluate financial health.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    Surplus,
    BreakEven,
    Deficit,
}

impl BalanceStatus {
    pub fn label(self) -> &'static str {
        match self {
            BalanceStatus::Surplus => "Healthy Savings",
            BalanceStatus::BreakEven => "Break-even",
            BalanceStatus::Deficit => "Overspending",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            BalanceStatus::Surplus => "You are saving more than you spend. Great job!",
            BalanceStatus::BreakEven => "Your income and expenses are equal.",
            BalanceStatus::Deficit => "Your expenses exceed your income.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationBand {
    Comfortable,
    Caution,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Insight {
    Overspending,
    BudgetExceeded,
    HighExpenseRatio,
    NoRisks,
}

impl Insight {
    pub fn message(self) -> &'static str {
        match self {
            Insight::Overspending => "You are spending more than you earn.",
            Insight::BudgetExceeded => "You have exceeded your monthly budget.",
            Insight::HighExpenseRatio => "Expenses are over 70% of your income.",
            Insight::NoRisks => "No major financial risks detected.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownItem {
    pub category: Category,
    pub label: String,
    pub amount: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUtilization {
    pub percent: f64,
    pub over_budget: bool,
    pub band: UtilizationBand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthView {
    pub tier: HealthTier,
    pub label: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceView {
    pub status: BalanceStatus,
    pub label: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightView {
    pub kind: Insight,
    pub message: String,
}

/// What the page needs after every change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub month_label: String,
    pub active_mode: ViewMode,
    pub sidebar_view: String,
    pub sidebar_category: Option<String>,
    pub expenses: Vec<TotalPoint>,
    pub income: Vec<TotalPoint>,
    pub total_income: f64,
    pub total_expense: f64,
    pub net_balance: f64,
    pub monthly_budget: f64,
    pub balance: BalanceView,
    pub spending_share: Option<f64>,
    pub health: HealthView,
    pub breakdown: Vec<BreakdownItem>,
    pub budget: Option<BudgetUtilization>,
    pub insights: Vec<InsightView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetResponse {
    pub budget_applied: bool,
    #[serde(flatten)]
    pub dashboard: DashboardSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_ids_parse_back() {
        for category in Category::ALL {
            assert_eq!(category.id().parse::<Category>(), Ok(category));
        }
        assert_eq!(
            "Groceries".parse::<Category>(),
            Err(InputError::UnknownCategory("Groceries".into()))
        );
    }

    #[test]
    fn enumeration_order_matches_index() {
        for (position, category) in Category::ALL.into_iter().enumerate() {
            assert_eq!(category.index(), position);
        }
        for (position, source) in IncomeSource::ALL.into_iter().enumerate() {
            assert_eq!(source.index(), position);
        }
    }

    #[test]
    fn app_state_uses_camel_case_blob_keys() {
        let mut state = AppState::default();
        state
            .expenses
            .insert(Category::BasicLiving, vec!["1200".into(), "".into()]);
        state.income = vec!["abc".into()];
        state.monthly_budget = 550.0;

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["expenses"]["Basic-living-expenses"][0], "1200");
        assert_eq!(json["income"][0], "abc");
        assert_eq!(json["monthlyBudget"], 550.0);
        assert_eq!(json["activeMode"], "expenses");
        assert_eq!(json["sidebarView"], "overview");
        assert!(json["sidebarCategory"].is_null());
    }

    #[test]
    fn unknown_saved_category_is_skipped() {
        let state: AppState = serde_json::from_str(
            r#"{"expenses":{"Food":["300"],"Pets":["5"]},"income":["","2500"],"monthlyBudget":900}"#,
        )
        .unwrap();
        assert_eq!(state.expenses.len(), 1);
        assert_eq!(state.expenses[&Category::Food], vec!["300".to_string()]);
        assert_eq!(state.income, vec!["".to_string(), "2500".to_string()]);
        assert_eq!(state.monthly_budget, 900.0);
    }

    #[test]
    fn unknown_mode_falls_back_to_expenses() {
        let state: AppState =
            serde_json::from_str(r#"{"activeMode":"charts","income":["5"]}"#).unwrap();
        assert_eq!(state.active_mode, ViewMode::Expenses);
        assert_eq!(state.income, vec!["5".to_string()]);
        assert_eq!(state.sidebar_view, OVERVIEW);
    }
}
