use chrono::{Datelike, Days, Months, NaiveDate};
use poem_openapi::Enum;

/// Convenience period for listing work items, resolved against today's date
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
    All,
}

/// Inclusive date bounds; a missing bound is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Explicit bounds win over the resolved period
    pub fn with_overrides(self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            from: from.or(self.from),
            to: to.or(self.to),
        }
    }
}

impl Period {
    /// Weeks start on Sunday
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        match self {
            Period::Day => DateRange::between(today, today),
            Period::Week => {
                let offset = u64::from(today.weekday().num_days_from_sunday());
                let start = today - Days::new(offset);
                DateRange::between(start, start + Days::new(6))
            }
            Period::Month => {
                let start = today.with_day(1).unwrap_or(today);
                let end = start
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(today);
                DateRange::between(start, end)
            }
            Period::Year => {
                let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                let end = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
                DateRange::between(start, end)
            }
            Period::All => DateRange::default(),
        }
    }
}
