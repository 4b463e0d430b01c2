use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{EmployeeStore, Staged, StagingArea};
use crate::error::{StoreError, StoreResult};
use crate::model::{Compensation, Employee};

#[derive(Clone, Debug, Default)]
struct Tables {
    employees: HashMap<String, Employee>,
    /// Keyed by display name.
    compensations: HashMap<String, Compensation>,
}

/// In-process store with the same staging rules as the database store.
///
/// Also counts reads and can be told to fail a future commit, which the
/// service tests use to exercise the replace failure window.
#[derive(Debug, Default)]
pub struct MemoryEmployeeStore {
    tables: RwLock<Tables>,
    staged: StagingArea,
    gets: AtomicUsize,
    commits: AtomicUsize,
    fail_at_commit: AtomicUsize,
}

impl MemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get` calls served so far.
    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of commit attempts so far, failed ones included.
    pub fn commit_calls(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn pending_changes(&self) -> usize {
        self.staged.len()
    }

    /// Make the `n`th commit from now (1-based) fail with
    /// [`StoreError::Unavailable`].
    pub fn fail_nth_commit(&self, n: usize) {
        let target = self.commits.load(Ordering::SeqCst) + n;
        self.fail_at_commit.store(target, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.tables.read().employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn apply(tables: &mut Tables, batch: Vec<Staged>) -> StoreResult<()> {
        for change in batch {
            match change {
                Staged::Insert(employee) => {
                    if tables.employees.contains_key(&employee.employee_id) {
                        return Err(StoreError::conflict(employee.employee_id));
                    }
                    tables
                        .employees
                        .insert(employee.employee_id.clone(), employee);
                }
                Staged::Delete(id) => {
                    if tables.employees.remove(&id).is_none() {
                        return Err(StoreError::missing(id));
                    }
                }
                Staged::InsertCompensation(compensation) => {
                    if tables.compensations.contains_key(&compensation.employee) {
                        return Err(StoreError::conflict(compensation.employee));
                    }
                    tables
                        .compensations
                        .insert(compensation.employee.clone(), compensation);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn get(&self, id: &str) -> StoreResult<Option<Employee>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.read();
        Ok(tables.employees.get(id).map(|found| {
            let mut employee = found.clone();
            employee
                .direct_reports
                .retain(|r| tables.employees.contains_key(&r.employee_id));
            employee
        }))
    }

    fn add(&self, employee: Employee) -> Employee {
        self.staged.stage_add(employee)
    }

    fn attach(&self, employee: Employee) -> Employee {
        self.staged.stage_attach(employee)
    }

    fn remove(&self, employee: Employee) -> Employee {
        self.staged.stage_remove(employee)
    }

    fn add_compensation(&self, compensation: Compensation) -> Compensation {
        self.staged.stage_compensation(compensation)
    }

    async fn find_compensation_by_employee_id(
        &self,
        id: &str,
    ) -> StoreResult<Option<Compensation>> {
        let tables = self.tables.read();
        Ok(tables
            .employees
            .get(id)
            .and_then(|employee| tables.compensations.get(&employee.display_name()))
            .cloned())
    }

    async fn commit(&self) -> StoreResult<()> {
        let attempt = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
        let batch = self.staged.take();
        if attempt == self.fail_at_commit.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "injected failure on commit {attempt}"
            )));
        }

        // Apply to a copy so a conflict half way through leaves nothing behind.
        let mut tables = self.tables.write();
        let mut next = tables.clone();
        Self::apply(&mut next, batch)?;
        *tables = next;
        Ok(())
    }
}
