use chrono::{DateTime, Duration, Utc};

use chartbot_db::testcases::models::TimeWindow;

/// How far back a query looks, anchored to the moment it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePeriod {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    All,
}

impl TimePeriod {
    /// Parse an extracted period token. Anything unrecognized widens to
    /// `All` rather than failing the whole request.
    pub fn from_token(token: &str) -> TimePeriod {
        match token.trim().to_lowercase().as_str() {
            "1_month" | "1_mois" => TimePeriod::OneMonth,
            "3_months" | "3_mois" => TimePeriod::ThreeMonths,
            "6_months" | "6_mois" => TimePeriod::SixMonths,
            "1_year" | "1_an" => TimePeriod::OneYear,
            _ => TimePeriod::All,
        }
    }

    /// The creation-date window this period covers, ending at `now`.
    /// `All` has no window at all.
    pub fn window(self, now: DateTime<Utc>) -> Option<TimeWindow> {
        let days = match self {
            TimePeriod::OneMonth => 30,
            TimePeriod::ThreeMonths => 90,
            TimePeriod::SixMonths => 180,
            TimePeriod::OneYear => 365,
            TimePeriod::All => return None,
        };
        Some(TimeWindow {
            start: Some(now - Duration::days(days)),
            end: now,
        })
    }
}

impl Default for TimePeriod {
    fn default() -> Self {
        TimePeriod::SixMonths
    }
}
