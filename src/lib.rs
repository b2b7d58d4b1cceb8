pub mod application;
pub mod config;
pub mod domain;
pub mod http;
pub mod mailer;
pub mod storage;

pub use domain::*;
pub use storage::Repository;
