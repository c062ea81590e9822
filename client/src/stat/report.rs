use super::basket::Basket;
use super::expenditure::Expenditures;
use super::period::Period;
use crate::lang::{tr, Language, Text};
use anyhow::Result;
use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};

pub fn format_rate(v: f64) -> String {
    format!("{v:.2}%")
}

pub struct Report<'a> {
    pub lang: Language,
    pub from: Period,
    pub to: Period,
    pub today: NaiveDate,
    pub basket: &'a Basket,
    pub spending: &'a Expenditures,
}

impl Report<'_> {
    pub fn file_name(&self) -> String {
        format!(
            "personal_inflation_{:04}-{:02}_{:04}-{:02}.txt",
            self.from.year, self.from.month, self.to.year, self.to.month
        )
    }

    /// Printable text version of the on-screen results.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_to(&mut out);
        out
    }

    pub fn write_to(&self, out: &mut impl fmt::Write) -> fmt::Result {
        let lang = self.lang;
        let tree = &self.basket.categories;

        let title = tr(lang, Text::Title);
        writeln!(out, "{title}")?;
        writeln!(out, "{}", "=".repeat(title.chars().count()))?;
        writeln!(
            out,
            "{} {}",
            tr(lang, Text::TodaysDate),
            self.today.format("%d/%m/%Y")
        )?;
        writeln!(
            out,
            "{} {} - {}",
            tr(lang, Text::InflationPeriod),
            self.from,
            self.to
        )?;
        writeln!(
            out,
            "{} {}",
            tr(lang, Text::OfficialRate),
            format_rate(self.basket.official_rate())
        )?;
        writeln!(
            out,
            "{} {}",
            tr(lang, Text::PersonalRate),
            format_rate(self.basket.personal_rate(self.spending))
        )?;
        writeln!(out)?;

        writeln!(
            out,
            "{:<40} {:>16} {:>16}",
            tr(lang, Text::GroupName),
            tr(lang, Text::OfficialWeight),
            tr(lang, Text::PersonalWeight)
        )?;
        for w in self.basket.weight_comparison(self.spending) {
            let name = tree.find(w.code).map(|c| c.name(lang)).unwrap_or_default();
            writeln!(
                out,
                "{:<40} {:>15.1}% {:>15.1}%",
                name, w.official, w.personal
            )?;
        }
        writeln!(out)?;

        writeln!(
            out,
            "{:<40} {:>16} {:>16}",
            tr(lang, Text::GroupOrSubgroup),
            tr(lang, Text::Monthly),
            tr(lang, Text::Annual)
        )?;
        for group in &tree.groups {
            let a = self.spending.get(group.category.code);
            writeln!(
                out,
                "{:<40} {:>16.2} {:>16.2}",
                group.category.name(lang),
                a.monthly,
                a.yearly
            )?;
            for child in &group.children {
                let a = self.spending.get(child.code);
                writeln!(
                    out,
                    "  {:<38} {:>16.2} {:>16.2}",
                    child.name(lang),
                    a.monthly,
                    a.yearly
                )?;
            }
        }
        writeln!(
            out,
            "{:<40} {:>16.2} {:>16.2}",
            tr(lang, Text::Total),
            self.spending.total_monthly(tree),
            self.spending.total_yearly(tree)
        )?;
        Ok(())
    }

    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.render())?;
        tracing::info!(path = %path.display(), "report written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat::datatype::fixtures::*;

    fn basket() -> Basket {
        Basket {
            categories: sample_tree(),
            group_index: vec![
                index_point(2024, 11, &[("GroupTotal", 100.0), ("Group1", 100.0), ("Group2", 100.0)]),
                index_point(2025, 11, &[("GroupTotal", 104.8), ("Group1", 110.0), ("Group2", 100.0)]),
            ],
            group_prices: Some(year_row(&[("Group1", 250.0), ("Group2", 750.0)])),
            ..Basket::default()
        }
    }

    #[test]
    fn report_lists_rates_weights_and_spending() {
        let basket = basket();
        let mut spending = Expenditures::default();
        spending.set_monthly(&basket.categories, None, 1, 600.0);
        spending.set_monthly(&basket.categories, None, 2, 400.0);
        let report = Report {
            lang: Language::English,
            from: Period::new(2024, 11),
            to: Period::new(2025, 11),
            today: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            basket: &basket,
            spending: &spending,
        };
        let text = report.render();
        assert!(text.starts_with("Personal Inflation Calculator"));
        assert!(text.contains("Today's Date: 15/01/2026"));
        assert!(text.contains("Inflation Period: 2024/11 - 2025/11"));
        assert!(text.contains("Official Inflation Rate: 4.80%"));
        assert!(text.contains("Personal Inflation Rate: 6.00%"));
        assert!(text.contains("25.0%"));
        assert!(text.contains("  Bread"));
        assert!(text.contains("12000.00"));
        assert_eq!(report.file_name(), "personal_inflation_2024-11_2025-11.txt");
    }

    #[test]
    fn writer_failure_stops_the_report() {
        struct Refuse;
        impl fmt::Write for Refuse {
            fn write_str(&mut self, _: &str) -> fmt::Result {
                Err(fmt::Error)
            }
        }
        let basket = basket();
        let spending = Expenditures::default();
        let report = Report {
            lang: Language::English,
            from: Period::new(2024, 11),
            to: Period::new(2025, 11),
            today: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            basket: &basket,
            spending: &spending,
        };
        assert!(report.write_to(&mut Refuse).is_err());
    }

    #[test]
    fn report_is_written_to_disk() {
        let basket = Basket::default();
        let spending = Expenditures::default();
        let report = Report {
            lang: Language::Georgian,
            from: Period::new(2025, 1),
            to: Period::new(2025, 2),
            today: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            basket: &basket,
            spending: &spending,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = report.save(dir.path()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("0.00%"));
        assert!(written.starts_with("პერსონალური"));
    }
}
