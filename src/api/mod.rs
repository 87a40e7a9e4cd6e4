//! Browser-facing HTTP surface: upload page, processing endpoint, report
//! download.

pub mod error;
pub mod page;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::app_router;
pub use server::serve;
