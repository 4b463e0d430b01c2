use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;
pub type HrResult<T> = Result<T, HrError>;

/// Failures raised by an [`EmployeeStore`](crate::EmployeeStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("record with key '{key}' already exists")]
    Conflict { key: String },
    #[error("record with key '{key}' does not exist")]
    Missing { key: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn conflict(key: impl Into<String>) -> Self {
        Self::Conflict { key: key.into() }
    }

    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }
}

/// Failures surfaced by the service layer.
///
/// Not-found and compensation name mismatches are not errors: those come back
/// as `Ok(None)`.
#[derive(Debug, Error)]
pub enum HrError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("employee {employee_id} is referenced as a report but does not exist")]
    MissingEmployee { employee_id: String },
    #[error("reporting cycle detected at employee {employee_id}")]
    CyclicReports { employee_id: String },
    #[error("report count below employee {employee_id} exceeds u32")]
    ReportCountOverflow { employee_id: String },
}
