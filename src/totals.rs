use crate::input::{coerce, finite_or_zero, sum_fields};
use crate::models::{Category, IncomeSource, InputError};
use std::collections::BTreeMap;

/// Per-category expense sums, indexed in `Category::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryTotals([f64; 7]);

impl CategoryTotals {
    pub fn get(&self, category: Category) -> f64 {
        self.0[category.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(|category| (category, self.get(category)))
    }

    pub fn total(&self) -> f64 {
        finite_or_zero(self.0.iter().sum())
    }
}

impl FromIterator<(Category, f64)> for CategoryTotals {
    fn from_iter<I: IntoIterator<Item = (Category, f64)>>(iter: I) -> Self {
        let mut totals = Self::default();
        for (category, amount) in iter {
            totals.0[category.index()] = amount;
        }
        totals
    }
}

/// Per-source income sums, indexed in `IncomeSource::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IncomeTotals([f64; 5]);

impl IncomeTotals {
    pub fn get(&self, source: IncomeSource) -> f64 {
        self.0[source.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (IncomeSource, f64)> + '_ {
        IncomeSource::ALL.into_iter().map(|source| (source, self.get(source)))
    }

    pub fn total(&self) -> f64 {
        finite_or_zero(self.0.iter().sum())
    }
}

impl FromIterator<(IncomeSource, f64)> for IncomeTotals {
    fn from_iter<I: IntoIterator<Item = (IncomeSource, f64)>>(iter: I) -> Self {
        let mut totals = Self::default();
        for (source, amount) in iter {
            totals.0[source.index()] = amount;
        }
        totals
    }
}

/// Monthly budget. Zero means not configured.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Budget(f64);

impl Budget {
    /// Accepts finite values above zero; everything else is rejected.
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().and_then(Self::new)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_configured(self) -> bool {
        self.0 > 0.0
    }
}

/// Raw form values plus the totals derived from them.
///
/// Totals are only ever written by a full recompute, so they can never drift
/// from the raw text they were derived from.
#[derive(Debug, Clone)]
pub struct TotalsModel {
    expense_fields: [Vec<String>; 7],
    income_fields: Vec<String>,
    budget: Budget,
    categories: CategoryTotals,
    income: IncomeTotals,
}

impl Default for TotalsModel {
    fn default() -> Self {
        Self::from_raw(&BTreeMap::new(), &[], 0.0)
    }
}

impl TotalsModel {
    /// Builds a model from persisted raw text, aligned to the form layout:
    /// missing fields are blank, surplus entries are dropped.
    pub fn from_raw(
        expenses: &BTreeMap<Category, Vec<String>>,
        income: &[String],
        budget: f64,
    ) -> Self {
        let expense_fields = Category::ALL.map(|category| {
            let saved = expenses.get(&category).map(Vec::as_slice).unwrap_or(&[]);
            align(saved, category.fields().len())
        });

        let mut model = Self {
            expense_fields,
            income_fields: align(income, IncomeSource::ALL.len()),
            budget: Budget::new(budget).unwrap_or_default(),
            categories: CategoryTotals::default(),
            income: IncomeTotals::default(),
        };
        model.recompute_expenses();
        model.recompute_income();
        model
    }

    /// Re-derives every category total from the current raw fields.
    pub fn recompute_expenses(&mut self) -> &CategoryTotals {
        self.categories = Category::ALL
            .into_iter()
            .map(|category| (category, sum_fields(self.fields(category))))
            .collect();
        &self.categories
    }

    /// Re-derives every income total from the current raw fields.
    pub fn recompute_income(&mut self) -> &IncomeTotals {
        self.income = IncomeSource::ALL
            .into_iter()
            .map(|source| (source, coerce(&self.income_fields[source.index()])))
            .collect();
        &self.income
    }

    /// Returns whether the budget changed. Rejected input leaves it untouched.
    pub fn set_budget(&mut self, raw: &str) -> bool {
        match Budget::parse(raw) {
            Some(budget) => {
                self.budget = budget;
                true
            }
            None => false,
        }
    }

    pub fn set_expense_field(
        &mut self,
        category: Category,
        index: usize,
        raw: impl Into<String>,
    ) -> Result<&CategoryTotals, InputError> {
        let fields = &mut self.expense_fields[category.index()];
        let len = fields.len();
        let slot = fields.get_mut(index).ok_or(InputError::FieldOutOfRange {
            category,
            index,
            len,
        })?;
        *slot = raw.into();
        Ok(self.recompute_expenses())
    }

    pub fn set_income_field(&mut self, source: IncomeSource, raw: impl Into<String>) -> &IncomeTotals {
        self.income_fields[source.index()] = raw.into();
        self.recompute_income()
    }

    pub fn fields(&self, category: Category) -> &[String] {
        &self.expense_fields[category.index()]
    }

    /// Raw expense text keyed by category, as persisted.
    pub fn expense_fields(&self) -> BTreeMap<Category, Vec<String>> {
        Category::ALL
            .into_iter()
            .map(|category| (category, self.fields(category).to_vec()))
            .collect()
    }

    pub fn income_fields(&self) -> &[String] {
        &self.income_fields
    }

    pub fn categories(&self) -> &CategoryTotals {
        &self.categories
    }

    pub fn income(&self) -> &IncomeTotals {
        &self.income
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn total_expense(&self) -> f64 {
        self.categories.total()
    }

    pub fn total_income(&self) -> f64 {
        self.income.total()
    }
}

fn align(saved: &[String], len: usize) -> Vec<String> {
    (0..len)
        .map(|i| saved.get(i).cloned().unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn sample_model() -> TotalsModel {
        let mut expenses = BTreeMap::new();
        expenses.insert(Category::BasicLiving, raw(&["1200", "", "abc", "80.5"]));
        expenses.insert(Category::Food, raw(&["-20", "45"]));
        expenses.insert(Category::Savings, raw(&["300", "1e2", "  "]));
        TotalsModel::from_raw(&expenses, &raw(&["", "4000", "x", "250"]), 0.0)
    }

    #[test]
    fn recompute_matches_direct_sum_of_coerced_values() {
        let mut model = sample_model();
        let direct: f64 = model
            .expense_fields()
            .values()
            .flat_map(|fields| fields.iter().map(|field| coerce(field)))
            .sum();
        let totals = *model.recompute_expenses();
        assert_eq!(totals.total(), direct);
        assert_eq!(totals.get(Category::BasicLiving), 1280.5);
        assert_eq!(totals.get(Category::Food), 25.0);
        assert_eq!(totals.get(Category::Savings), 400.0);
        assert_eq!(totals.get(Category::Health), 0.0);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut model = sample_model();
        let first = *model.recompute_expenses();
        let second = *model.recompute_expenses();
        assert_eq!(first, second);

        let first = *model.recompute_income();
        let second = *model.recompute_income();
        assert_eq!(first, second);
        assert_eq!(model.total_income(), 4250.0);
    }

    #[test]
    fn persisted_lists_are_aligned_to_the_form() {
        let model = sample_model();
        assert_eq!(model.fields(Category::Food), raw(&["-20", "45", ""]).as_slice());
        assert_eq!(model.fields(Category::Health), raw(&["", "", ""]).as_slice());
        assert_eq!(model.income_fields(), raw(&["", "4000", "x", "250", ""]).as_slice());

        let mut long = BTreeMap::new();
        long.insert(Category::Food, raw(&["1", "2", "3", "4", "5"]));
        let model = TotalsModel::from_raw(&long, &[], 0.0);
        assert_eq!(model.categories().get(Category::Food), 6.0);
    }

    #[test]
    fn budget_guard_rejects_invalid_values() {
        let mut model = TotalsModel::default();
        assert!(model.set_budget("1000"));
        assert_eq!(model.budget().value(), 1000.0);

        for rejected in ["-5", "0", "abc", "", "NaN", "inf"] {
            assert!(!model.set_budget(rejected), "{rejected:?}");
            assert_eq!(model.budget().value(), 1000.0);
        }
    }

    #[test]
    fn restored_budget_must_be_positive() {
        let model = TotalsModel::from_raw(&BTreeMap::new(), &[], -10.0);
        assert!(!model.budget().is_configured());
        let model = TotalsModel::from_raw(&BTreeMap::new(), &[], 750.0);
        assert_eq!(model.budget().value(), 750.0);
    }

    #[test]
    fn field_updates_trigger_full_recompute() {
        let mut model = TotalsModel::default();
        model.set_expense_field(Category::Health, 1, "60").unwrap();
        model.set_expense_field(Category::Health, 2, "15").unwrap();
        model.set_expense_field(Category::Health, 1, "oops").unwrap();
        assert_eq!(model.categories().get(Category::Health), 15.0);
        assert_eq!(model.total_expense(), 15.0);

        model.set_income_field(IncomeSource::Rental, "900");
        assert_eq!(model.income().get(IncomeSource::Rental), 900.0);
        assert_eq!(model.total_income(), 900.0);
    }

    #[test]
    fn overflowing_totals_stay_finite() {
        let mut model = TotalsModel::default();
        model.set_expense_field(Category::Food, 0, "1e308").unwrap();
        model.set_expense_field(Category::Food, 1, "1e308").unwrap();
        assert_eq!(model.categories().get(Category::Food), 0.0);

        model.set_expense_field(Category::Food, 1, "").unwrap();
        model.set_expense_field(Category::Health, 0, "1e308").unwrap();
        assert_eq!(model.categories().get(Category::Food), 1e308);
        assert_eq!(model.total_expense(), 0.0);

        model.set_income_field(IncomeSource::Salary, "1.7e308");
        model.set_income_field(IncomeSource::Rental, "1.7e308");
        assert_eq!(model.total_income(), 0.0);
    }

    #[test]
    fn field_index_out_of_range_is_rejected() {
        let mut model = TotalsModel::default();
        let err = model.set_expense_field(Category::Food, 3, "10").unwrap_err();
        assert_eq!(
            err,
            InputError::FieldOutOfRange {
                category: Category::Food,
                index: 3,
                len: 3,
            }
        );
        assert_eq!(model.fields(Category::Food), raw(&["", "", ""]).as_slice());
    }
}
