//! Progress queries - validate, fetch a snapshot, aggregate, package

use serde::Serialize;
use tracing::{debug, info};

use crate::analytics::{Analytics, PrRecord, WeekBucket};
use crate::db::DaySource;
use crate::error::ProgressError;
use crate::models::{DateRange, is_iso_date};

const RANGE_REQUIRED: &str = "from and to are required (YYYY-MM-DD)";

/// `{ "prs": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrReport {
    pub prs: Vec<PrRecord>,
}

/// `{ "weeks": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeReport {
    pub weeks: Vec<WeekBucket>,
}

#[derive(Debug, Clone, Default)]
pub struct PrQuery {
    pub require_completed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct VolumeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub require_completed: bool,
}

impl VolumeQuery {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            require_completed: false,
        }
    }

    /// Both bounds present and shaped `YYYY-MM-DD`; ordering not checked
    pub fn range(&self) -> Result<DateRange, ProgressError> {
        match (self.from.as_deref(), self.to.as_deref()) {
            (Some(from), Some(to)) if is_iso_date(from) && is_iso_date(to) => Ok(DateRange::new(from, to)),
            _ => Err(ProgressError::BadRequest(RANGE_REQUIRED.to_string())),
        }
    }
}

/// Query-string style flag: only `1` (or `true`) turns it on
pub fn parse_require_completed(flag: Option<&str>) -> bool {
    matches!(flag, Some("1") | Some("true"))
}

/// All-time personal records for a user
pub fn pr_report(source: &dyn DaySource, user_id: &str, query: &PrQuery) -> Result<PrReport, ProgressError> {
    let days = source.list_days(user_id, None)?;
    let analytics = Analytics::new(days);
    let prs = analytics.personal_records(query.require_completed);

    info!(
        "PRs for {}: {} exercises from {} days",
        user_id,
        prs.len(),
        analytics.day_count()
    );
    Ok(PrReport { prs })
}

/// Weekly volume for a user over an inclusive date range
pub fn volume_report(
    source: &dyn DaySource,
    user_id: &str,
    query: &VolumeQuery,
) -> Result<VolumeReport, ProgressError> {
    let range = query.range()?;
    debug!("Volume range {}..{}", range.from, range.to);

    let days = source.list_days(user_id, Some(&range))?;
    let analytics = Analytics::new(days);
    let weeks = analytics.weekly_volume(&range, query.require_completed);

    info!(
        "Volume for {}: {} weeks from {} days",
        user_id,
        weeks.len(),
        analytics.day_count()
    );
    Ok(VolumeReport { weeks })
}
