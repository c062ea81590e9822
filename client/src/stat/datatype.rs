use crate::lang::Language;
use crate::stat::period::Period;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub type CategoryCode = i64;

pub const TOTAL_COLUMN: &str = "GroupTotal";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub code: CategoryCode,
    pub level: u8,
    pub name_geo: String,
    pub name_en: String,
    #[serde(default)]
    pub title_geo: Option<String>,
    #[serde(default)]
    pub title_en: Option<String>,
}

impl Category {
    pub fn name(&self, lang: Language) -> &str {
        match lang {
            Language::Georgian => &self.name_geo,
            Language::English => &self.name_en,
        }
    }
}

/// One `(Year, Month)` row of `infogroups` or `subgroupindex`.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexPoint {
    #[serde(rename = "Year", deserialize_with = "whole_number")]
    pub year: i32,
    #[serde(rename = "Month", deserialize_with = "whole_number")]
    pub month: u32,
    #[serde(flatten)]
    pub columns: HashMap<String, Value>,
}

impl IndexPoint {
    pub fn period(&self) -> Period {
        Period::new(self.year, self.month)
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        self.columns.get(column).and_then(Value::as_f64)
    }
}

/// `NUMERIC` key columns arrive as `2025.0`; accept those alongside plain integers.
fn whole_number<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let v = f64::deserialize(d)?;
    if !v.is_finite() || v.fract() != 0.0 {
        return Err(DeError::custom(format!("expected a whole number, got {v}")));
    }
    T::try_from(v as i64).map_err(|_| DeError::custom(format!("{v} is out of range")))
}

/// One yearly row of `groupprices` or `subgroupweights`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YearRow {
    #[serde(flatten)]
    pub columns: HashMap<String, Value>,
}

impl YearRow {
    pub fn value(&self, column: &str) -> Option<f64> {
        self.columns.get(column).and_then(Value::as_f64)
    }
}

pub fn group_column(code: CategoryCode) -> String {
    format!("Group{code}")
}

/// `grp<parent>sub<suffix>`, where the suffix is the one character the child adds.
pub fn subgroup_column(parent: CategoryCode, child: CategoryCode) -> Option<String> {
    let p = parent.to_string();
    let c = child.to_string();
    let suffix = c.strip_prefix(p.as_str())?;
    (suffix.len() == 1).then(|| format!("grp{p}sub{suffix}"))
}

fn is_child_of(parent: CategoryCode, child: CategoryCode) -> bool {
    subgroup_column(parent, child).is_some()
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    pub category: Category,
    pub children: Vec<Category>,
}

/// Groups with their subgroups attached by code prefix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTree {
    pub groups: Vec<GroupNode>,
}

impl CategoryTree {
    pub fn from_rows(rows: Vec<Category>) -> Self {
        let (parents, children): (Vec<_>, Vec<_>) =
            rows.into_iter().partition(|c| c.level == 1);
        let mut groups: Vec<GroupNode> = parents
            .into_iter()
            .map(|category| GroupNode {
                category,
                children: Vec::new(),
            })
            .collect();
        for child in children {
            match groups
                .iter_mut()
                .find(|g| is_child_of(g.category.code, child.code))
            {
                Some(group) => group.children.push(child),
                None => tracing::warn!(code = child.code, "subgroup without a parent group"),
            }
        }
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, code: CategoryCode) -> Option<&GroupNode> {
        self.groups.iter().find(|g| g.category.code == code)
    }

    pub fn parent_of(&self, child: CategoryCode) -> Option<&GroupNode> {
        self.groups
            .iter()
            .find(|g| g.children.iter().any(|c| c.code == child))
    }

    pub fn find(&self, code: CategoryCode) -> Option<&Category> {
        self.groups.iter().find_map(|g| {
            if g.category.code == code {
                Some(&g.category)
            } else {
                g.children.iter().find(|c| c.code == code)
            }
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn category(code: CategoryCode, level: u8, name: &str) -> Category {
        Category {
            code,
            level,
            name_geo: format!("{name}-ka"),
            name_en: name.to_string(),
            title_geo: None,
            title_en: None,
        }
    }

    pub fn sample_tree() -> CategoryTree {
        CategoryTree::from_rows(vec![
            category(1, 1, "Food"),
            category(2, 1, "Housing"),
            category(11, 2, "Bread"),
            category(12, 2, "Meat"),
            category(21, 2, "Rent"),
        ])
    }

    pub fn index_point(year: i32, month: u32, values: &[(&str, f64)]) -> IndexPoint {
        IndexPoint {
            year,
            month,
            columns: values
                .iter()
                .map(|(k, v)| (k.to_string(), Value::from(*v)))
                .collect(),
        }
    }

    pub fn year_row(values: &[(&str, f64)]) -> YearRow {
        YearRow {
            columns: values
                .iter()
                .map(|(k, v)| (k.to_string(), Value::from(*v)))
                .collect(),
        }
    }
}
