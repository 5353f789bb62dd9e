// Notification system module: threshold rules evaluated over a monthly
// financial snapshot.
//
// - model.rs: notification record and kind enum
// - engine.rs: rule evaluation (pure, deterministic)
// - feed.rs: caller-owned batch state (read flags, unread count)

pub mod engine;
pub mod feed;
pub mod model;

pub use engine::evaluate;
pub use feed::NotificationFeed;
pub use model::{Notification, NotificationKind};
