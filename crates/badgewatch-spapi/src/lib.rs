pub mod auth;
pub mod badges;
pub mod catalog;
pub mod checker;
pub mod error;
pub mod types;

pub use auth::LwaClient;
pub use badges::{BadgeRule, DEFAULT_BADGE_RULES};
pub use catalog::CatalogClient;
pub use checker::SpApiChecker;
pub use error::SpapiError;
