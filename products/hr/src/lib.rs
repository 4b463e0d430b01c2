//! HR vertical slice.
//!
//! [`EmployeeService`] is the entry point. It runs over any [`EmployeeStore`]:
//! [`SeaOrmEmployeeStore`] for a real database and [`MemoryEmployeeStore`]
//! for in-process use.

pub mod error;
pub mod hierarchy;
pub mod model;
pub mod service;
pub mod store;

pub use error::{HrError, HrResult, StoreError, StoreResult};
pub use hierarchy::HierarchyResolver;
pub use model::{Compensation, Employee, EmployeeRef, ReportingStructure, display_name};
pub use service::EmployeeService;
pub use store::{EmployeeStore, MemoryEmployeeStore, SeaOrmEmployeeStore};
