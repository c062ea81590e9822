use crate::lang::{tr, Language, Text};
use crate::stat::datatype::{CategoryCode, CategoryTree};
use crate::stat::period::validate_range;
use crate::stat::report::Report;
use crate::stat::sync::Api;
use crate::stat::{Basket, Expenditures, Period};
use chrono::Local;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_START: Period = Period { year: 2024, month: 11 };
pub const DEFAULT_END: Period = Period { year: 2025, month: 11 };

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Calculator,
    Help,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingMonthly,
    EditingYearly,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub code: CategoryCode,
    pub is_group: bool,
}

pub struct App {
    pub api: Api,
    pub lang: Language,
    pub current_screen: Screen,
    pub start: Period,
    pub end: Period,
    pub basket: Basket,
    pub spending: Expenditures,
    pub expanded: HashSet<CategoryCode>,
    pub selected_row: usize,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub needs_refresh: bool,
    pub should_quit: bool,
    pub range_error: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl App {
    pub fn new(api: Api, start: Period, end: Period) -> Self {
        let mut app = Self {
            api,
            lang: Language::default(),
            current_screen: Screen::Calculator,
            start,
            end,
            basket: Basket::default(),
            spending: Expenditures::default(),
            expanded: HashSet::new(),
            selected_row: 0,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            needs_refresh: false,
            should_quit: false,
            range_error: false,
            error_message: None,
            success_message: None,
        };
        app.on_range_changed();
        app
    }

    pub fn tree(&self) -> &CategoryTree {
        &self.basket.categories
    }

    /// Groups, each followed by its subgroups when expanded.
    pub fn visible_rows(&self) -> Vec<TableRow> {
        let mut rows = Vec::new();
        for group in &self.tree().groups {
            let code = group.category.code;
            rows.push(TableRow {
                code,
                is_group: true,
            });
            if self.expanded.contains(&code) {
                rows.extend(group.children.iter().map(|c| TableRow {
                    code: c.code,
                    is_group: false,
                }));
            }
        }
        rows
    }

    pub fn selected(&self) -> Option<TableRow> {
        self.visible_rows().get(self.selected_row).copied()
    }

    pub fn move_selection(&mut self, delta: i32) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.selected_row = 0;
            return;
        }
        let next = (self.selected_row as i64 + delta as i64).clamp(0, len as i64 - 1);
        self.selected_row = next as usize;
    }

    pub fn toggle_expand(&mut self) {
        let Some(row) = self.selected() else { return };
        // collapsing from a subgroup row folds its group and moves onto it
        let group = if row.is_group {
            row.code
        } else {
            match self.tree().parent_of(row.code) {
                Some(g) => g.category.code,
                None => return,
            }
        };
        if !self.expanded.remove(&group) {
            self.expanded.insert(group);
        }
        if let Some(idx) = self
            .visible_rows()
            .iter()
            .position(|r| r.is_group && r.code == group)
        {
            if !row.is_group {
                self.selected_row = idx;
            }
        }
    }

    pub fn shift_start(&mut self, delta: i32) {
        self.start = self.start.add_months(delta);
        self.on_range_changed();
    }

    pub fn shift_end(&mut self, delta: i32) {
        self.end = self.end.add_months(delta);
        self.on_range_changed();
    }

    /// A reversed range only raises the message; nothing is fetched or recomputed.
    fn on_range_changed(&mut self) {
        match validate_range(self.start, self.end) {
            Ok(()) => {
                if self.range_error {
                    self.error_message = None;
                }
                self.range_error = false;
                self.needs_refresh = true;
            }
            Err(_) => {
                self.range_error = true;
                self.needs_refresh = false;
                self.error_message = Some(tr(self.lang, Text::RangeOrder).to_string());
            }
        }
    }

    pub fn toggle_language(&mut self) {
        self.lang = self.lang.toggle();
        if self.range_error {
            self.error_message = Some(tr(self.lang, Text::RangeOrder).to_string());
        }
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.success_message = None;
    }

    pub fn begin_edit(&mut self, mode: InputMode) {
        let Some(row) = self.selected() else { return };
        let amount = self.spending.get(row.code);
        let current = match mode {
            InputMode::EditingYearly => amount.yearly,
            _ => amount.monthly,
        };
        self.input_buffer = if current == 0.0 {
            String::new()
        } else {
            format!("{current:.2}")
        };
        self.input_mode = mode;
    }

    pub fn push_input(&mut self, c: char) {
        let accept = c.is_ascii_digit() || (c == '.' && !self.input_buffer.contains('.'));
        if accept {
            self.input_buffer.push(c);
        }
    }

    pub fn cancel_edit(&mut self) {
        self.input_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Applies the typed amount; an empty buffer resets the entry to zero.
    pub fn commit_edit(&mut self) {
        let Some(row) = self.selected() else {
            self.cancel_edit();
            return;
        };
        let raw = self.input_buffer.trim();
        let value = if raw.is_empty() {
            0.0
        } else {
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => v,
                _ => {
                    self.error_message = Some(format!("invalid amount '{raw}'"));
                    return;
                }
            }
        };
        let weights = self.basket.subgroup_weights.as_ref();
        match self.input_mode {
            InputMode::EditingYearly => {
                self.spending
                    .set_yearly(&self.basket.categories, weights, row.code, value)
            }
            _ => self
                .spending
                .set_monthly(&self.basket.categories, weights, row.code, value),
        }
        self.cancel_edit();
    }

    /// Fetches every dataset for the current range. A failed fetch keeps the
    /// previous data for that dataset.
    pub async fn refresh(&mut self) {
        self.needs_refresh = false;
        if validate_range(self.start, self.end).is_err() {
            return;
        }
        let (start, end, year) = (self.start, self.end, self.end.year);
        let mut failures = Vec::new();

        match self.api.categories().await {
            Ok(rows) => self.basket.categories = CategoryTree::from_rows(rows),
            Err(e) => failures.push(format!("categories: {e}")),
        }
        match self.api.group_index(start, end).await {
            Ok(rows) => self.basket.group_index = rows,
            Err(e) => failures.push(format!("group index: {e}")),
        }
        match self.api.subgroup_index(start, end).await {
            Ok(rows) => self.basket.subgroup_index = rows,
            Err(e) => failures.push(format!("subgroup index: {e}")),
        }
        match self.api.group_prices(year).await {
            Ok(row) => self.basket.group_prices = row,
            Err(e) => failures.push(format!("group prices: {e}")),
        }
        match self.api.subgroup_weights(year).await {
            Ok(row) => self.basket.subgroup_weights = row,
            Err(e) => failures.push(format!("subgroup weights: {e}")),
        }

        self.move_selection(0);
        if failures.is_empty() {
            tracing::debug!(%start, %end, "datasets refreshed");
            self.error_message = None;
        } else {
            tracing::warn!(?failures, "refresh incomplete");
            self.error_message = Some(failures.join("; "));
        }
    }

    pub fn export_report(&mut self, dir: &Path) -> anyhow::Result<PathBuf> {
        let report = Report {
            lang: self.lang,
            from: self.start,
            to: self.end,
            today: Local::now().date_naive(),
            basket: &self.basket,
            spending: &self.spending,
        };
        let path = report.save(dir)?;
        self.success_message = Some(format!("{} {}", tr(self.lang, Text::ReportSaved), path.display()));
        Ok(path)
    }
}
