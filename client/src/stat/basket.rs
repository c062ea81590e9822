use super::calc::{percentage_change, share_percent, weighted_rate};
use super::datatype::*;
use super::expenditure::Expenditures;
use super::period::Period;
use std::collections::HashMap;

/// Everything fetched from the API for one period selection.
#[derive(Debug, Clone, Default)]
pub struct Basket {
    pub categories: CategoryTree,
    pub group_index: Vec<IndexPoint>,
    pub subgroup_index: Vec<IndexPoint>,
    pub group_prices: Option<YearRow>,
    pub subgroup_weights: Option<YearRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightComparison {
    pub code: CategoryCode,
    pub official: f64,
    pub personal: f64,
}

impl Basket {
    fn endpoints(points: &[IndexPoint]) -> Option<(&IndexPoint, &IndexPoint)> {
        Some((points.first()?, points.last()?))
    }

    fn change_over(points: &[IndexPoint], column: &str) -> Option<f64> {
        let (start, end) = Self::endpoints(points)?;
        percentage_change(start.value(column)?, end.value(column)?)
    }

    /// Change of one group's index between the first and last fetched months.
    pub fn group_change(&self, code: CategoryCode) -> Option<f64> {
        Self::change_over(&self.group_index, &group_column(code))
    }

    pub fn subgroup_change(&self, parent: CategoryCode, child: CategoryCode) -> Option<f64> {
        let column = subgroup_column(parent, child)?;
        Self::change_over(&self.subgroup_index, &column)
    }

    pub fn group_changes(&self) -> HashMap<CategoryCode, f64> {
        self.categories
            .groups
            .iter()
            .filter_map(|g| Some((g.category.code, self.group_change(g.category.code)?)))
            .collect()
    }

    /// Change of a group or subgroup, whichever the code is.
    pub fn change_for(&self, code: CategoryCode) -> Option<f64> {
        if self.categories.group(code).is_some() {
            return self.group_change(code);
        }
        let parent = self.categories.parent_of(code)?;
        self.subgroup_change(parent.category.code, code)
    }

    /// Published rate: change of `GroupTotal`, `0.0` when unavailable.
    pub fn official_rate(&self) -> f64 {
        Self::change_over(&self.group_index, TOTAL_COLUMN).unwrap_or(0.0)
    }

    pub fn personal_rate(&self, spending: &Expenditures) -> f64 {
        let changes = self.group_changes();
        weighted_rate(
            spending
                .group_monthly(&self.categories)
                .into_iter()
                .map(|(code, monthly)| (monthly, changes.get(&code).copied())),
        )
    }

    /// Reference household's average monthly spend for a group.
    pub fn reference_spend(&self, code: CategoryCode) -> Option<f64> {
        self.group_prices.as_ref()?.value(&group_column(code))
    }

    pub fn weight_comparison(&self, spending: &Expenditures) -> Vec<WeightComparison> {
        let reference_total: f64 = self
            .categories
            .groups
            .iter()
            .filter_map(|g| self.reference_spend(g.category.code))
            .sum();
        let personal_total = spending.total_monthly(&self.categories);
        self.categories
            .groups
            .iter()
            .map(|g| {
                let code = g.category.code;
                WeightComparison {
                    code,
                    official: share_percent(
                        self.reference_spend(code).unwrap_or(0.0),
                        reference_total,
                    ),
                    personal: share_percent(spending.monthly(code), personal_total),
                }
            })
            .collect()
    }

    /// `(months since range start, GroupTotal)` for the line chart.
    pub fn total_index_series(&self) -> Vec<(f64, f64)> {
        self.group_index
            .iter()
            .enumerate()
            .filter_map(|(i, p)| Some((i as f64, p.value(TOTAL_COLUMN)?)))
            .collect()
    }

    pub fn covered_range(&self) -> Option<(Period, Period)> {
        let (start, end) = Self::endpoints(&self.group_index)?;
        Some((start.period(), end.period()))
    }
}
