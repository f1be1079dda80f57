//! Boundary to the remote text-to-CAD service.
//!
//! The orchestrator only needs two calls: submit a request and fetch the
//! status of a submitted job. Transport, authentication and wire format
//! belong to the implementor.

use thiserror::Error;

use crate::job::{JobHandle, JobStatus};
use crate::model_types::GenerationRequest;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request never produced a response (connect, DNS, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status code.
    #[error("service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The service answered successfully but flagged the job as an error.
    #[error("service rejected the request: {0}")]
    Rejected(String),

    /// The response could not be understood.
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub trait RemoteCadService {
    fn submit(&self, request: &GenerationRequest) -> Result<JobHandle, ServiceError>;

    fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatus, ServiceError>;
}

impl<S: RemoteCadService + ?Sized> RemoteCadService for &S {
    fn submit(&self, request: &GenerationRequest) -> Result<JobHandle, ServiceError> {
        (**self).submit(request)
    }

    fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatus, ServiceError> {
        (**self).fetch_status(handle)
    }
}

impl<S: RemoteCadService + ?Sized> RemoteCadService for Box<S> {
    fn submit(&self, request: &GenerationRequest) -> Result<JobHandle, ServiceError> {
        (**self).submit(request)
    }

    fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatus, ServiceError> {
        (**self).fetch_status(handle)
    }
}
