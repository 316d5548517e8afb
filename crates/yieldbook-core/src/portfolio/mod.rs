//! Portfolio dashboard: holdings summary, notification feed and feed cache.

pub mod cache;
pub mod holdings;
pub mod notifications;

pub use holdings::{summarise_portfolio, Holding, PortfolioInput, PortfolioSummary};
pub use notifications::{order_notifications, ClassifiedNotification, Notification, NotificationKind};
