use chrono::{Datelike, NaiveDate};

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Display,
};

use crate::record::Record;
use crate::usd::Usd;

/// How many entries the top-salespeople and top-products rankings keep.
pub const TOP_N: usize = 5;

/// Holds the aggregate metrics derived from a set of sales transactions.
///
/// To compute a report, use [`Report::from_records`].
///
/// To get a printable version of the report, use its [`Display`]
/// implementation.
///
/// Invariant: `total` equals the sum of all record amounts, which equals
/// the sum of the `monthly` values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Grand total over all records.
    pub total: Usd,
    /// Per-calendar-month totals, keyed by the first day of the month.
    pub monthly: BTreeMap<NaiveDate, Usd>,
    /// Up to [`TOP_N`] salespeople, sorted descending by total.
    pub top_salespeople: Vec<(String, Usd)>,
    /// Up to [`TOP_N`] products, sorted descending by total.
    pub top_products: Vec<(String, Usd)>,
}

impl Report {
    /// Computes all aggregate metrics from `records`.
    ///
    /// This is a pure function of its input: identical records always
    /// produce an identical report. Empty input yields a zero total, an
    /// empty monthly map, and empty top lists.
    #[must_use]
    pub fn from_records(records: &[Record]) -> Self {
        let mut total = Usd::default();
        let mut monthly: BTreeMap<NaiveDate, Usd> = BTreeMap::new();
        for record in records {
            total += record.amount;
            *monthly.entry(month_start(record.date)).or_default() += record.amount;
        }
        let top_salespeople = top_totals(
            records.iter().map(|r| (r.salesperson.as_str(), r.amount)),
            TOP_N,
        );
        let top_products = top_totals(
            records.iter().map(|r| (r.product.as_str(), r.amount)),
            TOP_N,
        );
        Self {
            total,
            monthly,
            top_salespeople,
            top_products,
        }
    }
}

/// Returns the first day of the month containing `date`.
fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 is valid in any month")
}

/// Sums `amounts` per key and returns the `n` largest totals, descending.
///
/// Keys accumulate in first-seen order and the sort is stable, so groups
/// with equal totals rank in the order their first record appeared.
fn top_totals<'a>(amounts: impl Iterator<Item = (&'a str, Usd)>, n: usize) -> Vec<(String, Usd)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<(String, Usd)> = Vec::new();
    for (key, amount) in amounts {
        match index.get(key) {
            Some(&i) => totals[i].1 += amount,
            None => {
                index.insert(key.to_string(), totals.len());
                totals.push((key.to_string(), amount));
            }
        }
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(n);
    totals
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self
            .top_salespeople
            .iter()
            .chain(&self.top_products)
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max("Salesperson".len());
        let length = width + 13;
        writeln!(f, "{:width$} {:>12}", "Total sales", self.total.to_string())?;
        writeln!(f)?;
        writeln!(f, "{:width$} {:>12}", "Month", "Sales")?;
        writeln!(f, "{:-<length$}", "")?;
        for (month, total) in &self.monthly {
            writeln!(
                f,
                "{:width$} {:>12}",
                month.format("%Y-%m").to_string(),
                total.to_string()
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:width$} {:>12}", "Salesperson", "Sales")?;
        writeln!(f, "{:-<length$}", "")?;
        for (name, total) in &self.top_salespeople {
            writeln!(f, "{name:width$} {:>12}", total.to_string())?;
        }
        writeln!(f)?;
        writeln!(f, "{:width$} {:>12}", "Product", "Sales")?;
        writeln!(f, "{:-<length$}", "")?;
        for (name, total) in &self.top_products {
            writeln!(f, "{name:width$} {:>12}", total.to_string())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, product: &str, salesperson: &str, cents: i64) -> Record {
        Record {
            date: date.parse().unwrap(),
            product: product.into(),
            salesperson: salesperson.into(),
            amount: Usd::from_cents(cents),
            customer: "Acme Corp".into(),
        }
    }

    fn three_record_scenario() -> Vec<Record> {
        vec![
            record("2025-01-10", "Alpha Widget", "Alice", 10000),
            record("2025-01-15", "Beta Gadget", "Bob", 20000),
            record("2025-02-01", "Alpha Widget", "Alice", 5000),
        ]
    }

    #[test]
    fn from_records_fn_computes_grand_total_and_monthly_totals() {
        let report = Report::from_records(&three_record_scenario());
        assert_eq!(report.total, Usd::from_cents(35000), "wrong total");
        let months: Vec<_> = report
            .monthly
            .iter()
            .map(|(month, total)| (month.to_string(), *total))
            .collect();
        assert_eq!(
            months,
            vec![
                ("2025-01-01".to_string(), Usd::from_cents(30000)),
                ("2025-02-01".to_string(), Usd::from_cents(5000)),
            ]
        );
    }

    #[test]
    fn from_records_fn_total_matches_sum_of_monthly_totals() {
        let report = Report::from_records(&three_record_scenario());
        assert_eq!(report.total, report.monthly.values().copied().sum());
    }

    #[test]
    fn from_records_fn_ranks_top_salespeople_and_products_by_total() {
        let report = Report::from_records(&three_record_scenario());
        assert_eq!(
            report.top_salespeople,
            vec![
                ("Bob".to_string(), Usd::from_cents(20000)),
                ("Alice".to_string(), Usd::from_cents(15000)),
            ]
        );
        assert_eq!(
            report.top_products,
            vec![
                ("Beta Gadget".to_string(), Usd::from_cents(20000)),
                ("Alpha Widget".to_string(), Usd::from_cents(15000)),
            ]
        );
    }

    #[test]
    fn from_records_fn_yields_empty_report_for_no_records() {
        let report = Report::from_records(&[]);
        assert_eq!(report.total, Usd::default());
        assert!(report.monthly.is_empty());
        assert!(report.top_salespeople.is_empty());
        assert!(report.top_products.is_empty());
    }

    #[test]
    fn from_records_fn_truncates_top_lists_to_five() {
        let records: Vec<_> = (0..7)
            .map(|i| {
                record(
                    "2025-03-01",
                    &format!("Product {i}"),
                    &format!("Seller {i}"),
                    1000 + i * 100,
                )
            })
            .collect();
        let report = Report::from_records(&records);
        assert_eq!(report.top_products.len(), 5);
        assert_eq!(report.top_salespeople.len(), 5);
        assert_eq!(report.top_products[0].0, "Product 6", "largest first");
        assert!(
            report.top_products.windows(2).all(|w| w[0].1 >= w[1].1),
            "descending order"
        );
    }

    #[test]
    fn from_records_fn_breaks_ties_by_first_seen_order() {
        let records = vec![
            record("2025-01-05", "Gamma Gizmo", "Charlie", 5000),
            record("2025-01-06", "Delta Device", "Diana", 5000),
            record("2025-01-07", "Epsilon Gear", "Edward", 5000),
        ];
        let report = Report::from_records(&records);
        let products: Vec<_> = report.top_products.iter().map(|(name, _)| name).collect();
        assert_eq!(products, vec!["Gamma Gizmo", "Delta Device", "Epsilon Gear"]);
    }

    #[test]
    fn from_records_fn_is_deterministic() {
        let records = three_record_scenario();
        assert_eq!(Report::from_records(&records), Report::from_records(&records));
    }

    #[test]
    fn display_impl_prints_summary_for_empty_report() {
        let out = Report::from_records(&[]).to_string();
        assert!(out.contains("Total sales"));
        assert!(out.contains("$0.00"));
    }

    #[test]
    fn display_impl_prints_all_summary_sections() {
        let out = Report::from_records(&three_record_scenario()).to_string();
        assert!(out.contains("Total sales"), "{out}");
        assert!(out.contains("$350.00"), "{out}");
        assert!(out.contains("2025-01"), "{out}");
        assert!(out.contains("Bob"), "{out}");
        assert!(out.contains("Beta Gadget"), "{out}");
    }
}
