pub mod grant;
pub mod migrate;
pub mod serve;
pub mod token;
