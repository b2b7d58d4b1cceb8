// Application layer - validation, orchestration and summary queries on top
// of the storage repository. The HTTP handlers are thin wrappers over this.

pub mod error;
pub mod service;
pub mod summary;

pub use error::*;
pub use service::*;
pub use summary::*;
