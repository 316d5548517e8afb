use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::YieldbookError;
use crate::YieldbookResult;

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d/%m/%Y",
];

/// Trade notification as published in the notifications feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "Ticker", default)]
    pub ticker: String,
    #[serde(rename = "TickerImg", default)]
    pub ticker_img: String,
    #[serde(rename = "Date", default)]
    pub date: String,
    #[serde(rename = "Content", default)]
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Buy,
    Sell,
    Other,
}

impl NotificationKind {
    /// "Bought ..." is a buy and "Sold ..." a sell, case-insensitively.
    pub fn from_content(content: &str) -> Self {
        let normalised = content.trim().to_lowercase();
        if normalised.starts_with("bought") {
            NotificationKind::Buy
        } else if normalised.starts_with("sold") {
            NotificationKind::Sell
        } else {
            NotificationKind::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedNotification {
    #[serde(flatten)]
    pub notification: Notification,
    pub kind: NotificationKind,
    pub parsed_date: Option<NaiveDate>,
}

/// Parse a feed date in any of the formats the feed has used.
pub fn parse_notification_date(raw: &str) -> YieldbookResult<NaiveDate> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| YieldbookError::DateError(format!("Unrecognised notification date '{raw}'")))
}

/// Classify each notification and order the feed newest first.
///
/// Notifications with an unparsable date keep their relative order and go
/// after every dated one.
pub fn order_notifications(feed: Vec<Notification>) -> Vec<ClassifiedNotification> {
    let mut classified: Vec<ClassifiedNotification> = feed
        .into_iter()
        .map(|notification| ClassifiedNotification {
            kind: NotificationKind::from_content(&notification.content),
            parsed_date: parse_notification_date(&notification.date).ok(),
            notification,
        })
        .collect();

    classified.sort_by(|a, b| match (a.parsed_date, b.parsed_date) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    classified
}
