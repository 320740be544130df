pub mod category;
pub mod developer;
pub mod game;
pub mod game_category;
pub mod library_entry;
pub mod notification;
pub mod notification_kind;
pub mod review;
pub mod user;

pub use notification_kind::NotificationKind;
