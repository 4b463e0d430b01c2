//! Store contract the service runs against, plus the staging area shared by
//! the implementations.
//!
//! Writes are staged (`add`, `attach`, `remove`, `add_compensation`) and only
//! become visible to reads after [`EmployeeStore::commit`]. A failed commit
//! discards the staged batch.

mod memory;
mod sea_orm_store;

pub use memory::MemoryEmployeeStore;
pub use sea_orm_store::SeaOrmEmployeeStore;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::model::{Compensation, Employee};

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Load a committed employee with its direct reports in order.
    ///
    /// Reports whose id does not currently resolve are left out.
    async fn get(&self, id: &str) -> StoreResult<Option<Employee>>;

    /// Assign a fresh id and stage the insert.
    fn add(&self, employee: Employee) -> Employee;

    /// Stage an insert under the id the record already carries.
    fn attach(&self, employee: Employee) -> Employee;

    /// Stage deletion of the employee and its outgoing report links.
    fn remove(&self, employee: Employee) -> Employee;

    fn add_compensation(&self, compensation: Compensation) -> Compensation;

    /// Compensation whose `employee` equals the display name of employee `id`.
    async fn find_compensation_by_employee_id(
        &self,
        id: &str,
    ) -> StoreResult<Option<Compensation>>;

    /// Apply everything staged since the last commit, all or nothing.
    async fn commit(&self) -> StoreResult<()>;
}

pub(crate) fn new_employee_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Clone, Debug)]
pub(crate) enum Staged {
    Insert(Employee),
    Delete(String),
    InsertCompensation(Compensation),
}

#[derive(Debug, Default)]
pub(crate) struct StagingArea {
    pending: Mutex<Vec<Staged>>,
}

impl StagingArea {
    pub(crate) fn push(&self, change: Staged) {
        self.pending.lock().push(change);
    }

    pub(crate) fn take(&self) -> Vec<Staged> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub(crate) fn stage_add(&self, mut employee: Employee) -> Employee {
        employee.employee_id = new_employee_id();
        self.push(Staged::Insert(employee.clone()));
        employee
    }

    pub(crate) fn stage_attach(&self, employee: Employee) -> Employee {
        self.push(Staged::Insert(employee.clone()));
        employee
    }

    pub(crate) fn stage_remove(&self, employee: Employee) -> Employee {
        self.push(Staged::Delete(employee.employee_id.clone()));
        employee
    }

    pub(crate) fn stage_compensation(&self, compensation: Compensation) -> Compensation {
        self.push(Staged::InsertCompensation(compensation.clone()));
        compensation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_overwrites_caller_supplied_id() {
        let staging = StagingArea::default();
        let mut input = Employee::new("John", "Lennon");
        input.employee_id = "client-chosen".to_string();
        let staged = staging.stage_add(input);
        assert_ne!(staged.employee_id, "client-chosen");
        assert!(!staged.employee_id.is_empty());
        assert_eq!(staging.len(), 1);
    }

    #[test]
    fn take_drains_in_staging_order() {
        let staging = StagingArea::default();
        let a = staging.stage_add(Employee::new("A", "One"));
        staging.stage_remove(a.clone());
        let changes = staging.take();
        assert!(matches!(&changes[0], Staged::Insert(e) if e.employee_id == a.employee_id));
        assert!(matches!(&changes[1], Staged::Delete(id) if *id == a.employee_id));
        assert_eq!(staging.len(), 0);
    }
}
