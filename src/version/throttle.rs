//! Check frequency policy and the gate deciding whether a live check is due

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// How often a live version check is permitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckPolicy {
    /// Check on every evaluation
    #[default]
    Immediately,
    /// At most once per calendar day
    Daily,
    /// At most once every seven calendar days
    Weekly,
}

impl CheckPolicy {
    /// Minimum number of calendar days between two live checks
    pub fn interval_days(&self) -> i64 {
        match self {
            CheckPolicy::Immediately => 0,
            CheckPolicy::Daily => 1,
            CheckPolicy::Weekly => 7,
        }
    }
}

impl std::str::FromStr for CheckPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "immediately" => Ok(CheckPolicy::Immediately),
            "daily" => Ok(CheckPolicy::Daily),
            "weekly" => Ok(CheckPolicy::Weekly),
            other => Err(format!("unknown check policy: {other}")),
        }
    }
}

/// Whole calendar days between two instants, counted on dates in `now`'s zone.
///
/// 23:59 and 00:01 the next morning are one day apart; two instants on the
/// same date are zero days apart no matter how many hours separate them.
pub fn days_between<Tz: TimeZone>(earlier: &DateTime<Tz>, now: &DateTime<Tz>) -> i64 {
    let earlier = earlier.with_timezone(&now.timezone()).date_naive();
    (now.date_naive() - earlier).num_days()
}

/// Returns true if a live check should run now.
///
/// `Immediately` and a missing last check always pass. Otherwise the number
/// of calendar days since the last check must reach the policy interval.
pub fn is_due<Tz: TimeZone>(
    policy: CheckPolicy,
    last_checked: Option<&DateTime<Tz>>,
    now: &DateTime<Tz>,
) -> bool {
    if policy == CheckPolicy::Immediately {
        return true;
    }

    let Some(last_checked) = last_checked else {
        return true;
    };

    days_between(last_checked, now) >= policy.interval_days()
}
