//! Request and response data transfer objects.

pub mod request;
pub mod response;

pub use request::{IdQuery, PluginRequest};
pub use response::{ApiResult, ProTableResult, Status};
