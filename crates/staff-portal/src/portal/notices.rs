use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{DownloadItem, Notification};

/// Days-remaining value reported for notices without an expiry date.
pub const NO_EXPIRY_DAYS: i64 = 999;

/// Category under which the download centre lists every document.
pub const ALL_DOWNLOADS_CATEGORY: &str = "全员资料";

/// A notice together with the pin/expiry state derived for a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedNotice {
    #[serde(flatten)]
    pub notice: Notification,
    pub effective_pin: bool,
    pub days_remaining: i64,
    pub is_expired: bool,
}

impl RankedNotice {
    pub fn evaluate(notice: Notification, today: NaiveDate) -> Self {
        let days_remaining = days_remaining(notice.expiry_date, today);
        let is_expired = days_remaining < 0;
        let effective_pin = notice.is_pinned && !is_expired;

        Self {
            notice,
            effective_pin,
            days_remaining,
            is_expired,
        }
    }
}

/// Whole days from `today` until `expiry`. Both dates are already midnight-aligned,
/// so the ceiling of the day difference is the difference itself.
pub fn days_remaining(expiry: Option<NaiveDate>, today: NaiveDate) -> i64 {
    match expiry {
        Some(expiry) => (expiry - today).num_days(),
        None => NO_EXPIRY_DAYS,
    }
}

/// Effective pins first, then newest date first. The sort is stable, so notices that
/// tie on both keys keep their input order.
pub fn rank_notices<I>(notices: I, today: NaiveDate) -> Vec<RankedNotice>
where
    I: IntoIterator<Item = Notification>,
{
    let mut ranked: Vec<RankedNotice> = notices
        .into_iter()
        .map(|notice| RankedNotice::evaluate(notice, today))
        .collect();
    ranked.sort_by(compare_ranked);
    ranked
}

fn compare_ranked(a: &RankedNotice, b: &RankedNotice) -> Ordering {
    b.effective_pin
        .cmp(&a.effective_pin)
        .then_with(|| b.notice.date.cmp(&a.notice.date))
}

/// Downloads in list order, narrowed to one category and a case-insensitive title search.
pub fn filter_downloads<'a>(
    items: &'a [DownloadItem],
    category: Option<&str>,
    search: &str,
) -> Vec<&'a DownloadItem> {
    let needle = search.to_lowercase();
    items
        .iter()
        .filter(|item| match category {
            None | Some(ALL_DOWNLOADS_CATEGORY) => true,
            Some(category) => item.category == category,
        })
        .filter(|item| item.title.to_lowercase().contains(&needle))
        .collect()
}
