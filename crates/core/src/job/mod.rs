//! Job model: the submitted request and the persisted lifecycle record.

mod request;
mod types;

pub use request::{JobRequest, RequestError};
pub use types::{AliasMap, Job, JobStatus, JobUpdate};
