pub mod admin;
pub mod cookies;
pub mod flash;
pub mod response;
pub mod session;

pub use admin::{require_super_admin, AdminGate};
pub use flash::{Flash, FlashRedirect};
pub use response::{ApiResponse, ApiResult};
pub use session::{session_middleware, AccessLevel, CurrentUser};
