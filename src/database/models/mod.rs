pub mod organization;
pub mod partner;
pub mod role;
pub mod user;

pub use organization::{alphabetize, Organization};
pub use partner::Partner;
pub use role::{ResourceType, Role, RoleName};
pub use user::{User, UserAttrs};
