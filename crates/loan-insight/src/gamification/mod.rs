//! Badge catalog, award rules, and per-user points.

pub mod badges;
pub mod engine;
pub mod repository;


pub use badges::{BadgeDescriptor, BadgeKind, UserAction, HISTORY_BADGES};
pub use engine::{BadgeSummary, EarnedBadgeView, GamificationEngine, GamificationError};
pub use repository::{BadgeGrant, BadgeRepository, EarnedBadge};
