use crate::stat::datatype::{subgroup_column, CategoryCode, CategoryTree, YearRow};
use std::collections::HashMap;

pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Amount {
    pub monthly: f64,
    pub yearly: f64,
}

impl Amount {
    pub fn from_monthly(monthly: f64) -> Self {
        Self {
            monthly,
            yearly: monthly * MONTHS_PER_YEAR,
        }
    }
}

/// Share of `child` inside `parent` for the weight year; `1.0` when the column is absent.
pub fn child_weight(weights: Option<&YearRow>, parent: CategoryCode, child: CategoryCode) -> f64 {
    subgroup_column(parent, child)
        .and_then(|col| weights.and_then(|w| w.value(&col)))
        .unwrap_or(1.0)
}

/// The user's household spending, keyed by category code. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct Expenditures {
    entries: HashMap<CategoryCode, Amount>,
}

impl Expenditures {
    pub fn get(&self, code: CategoryCode) -> Amount {
        self.entries.get(&code).copied().unwrap_or_default()
    }

    pub fn monthly(&self, code: CategoryCode) -> f64 {
        self.get(code).monthly
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|a| a.monthly == 0.0)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sets a monthly amount and keeps the hierarchy consistent.
    ///
    /// A group edit pushes `monthly × weight` into every subgroup. A subgroup
    /// edit sets its group to the sum of the subgroups' current values; the
    /// weights are not inverted.
    pub fn set_monthly(
        &mut self,
        tree: &CategoryTree,
        weights: Option<&YearRow>,
        code: CategoryCode,
        monthly: f64,
    ) {
        self.entries.insert(code, Amount::from_monthly(monthly));

        if let Some(group) = tree.group(code) {
            for child in &group.children {
                let w = child_weight(weights, code, child.code);
                self.entries
                    .insert(child.code, Amount::from_monthly(monthly * w));
            }
        } else if let Some(group) = tree.parent_of(code) {
            let sum: f64 = group.children.iter().map(|c| self.monthly(c.code)).sum();
            self.entries
                .insert(group.category.code, Amount::from_monthly(sum));
        }
    }

    pub fn set_yearly(
        &mut self,
        tree: &CategoryTree,
        weights: Option<&YearRow>,
        code: CategoryCode,
        yearly: f64,
    ) {
        self.set_monthly(tree, weights, code, yearly / MONTHS_PER_YEAR);
    }

    /// `(group code, monthly spend)` for every top-level group, zero when unset.
    pub fn group_monthly(&self, tree: &CategoryTree) -> Vec<(CategoryCode, f64)> {
        tree.groups
            .iter()
            .map(|g| (g.category.code, self.monthly(g.category.code)))
            .collect()
    }

    pub fn total_monthly(&self, tree: &CategoryTree) -> f64 {
        self.group_monthly(tree).iter().map(|(_, m)| m).sum()
    }

    pub fn total_yearly(&self, tree: &CategoryTree) -> f64 {
        self.total_monthly(tree) * MONTHS_PER_YEAR
    }
}
