//! SeaORM-backed store.
//!
//! Generic over the connection so it can sit on a pooled
//! `DatabaseConnection` or on a caller's transaction. Each commit runs the
//! staged batch inside its own transaction.

use async_trait::async_trait;
use chrono::Utc;
use entity::{compensation, direct_report, employee};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, SqlErr, TransactionTrait,
};
use tracing::debug;

use super::{EmployeeStore, Staged, StagingArea};
use crate::error::{StoreError, StoreResult};
use crate::model::{Compensation, Employee, EmployeeRef, display_name};

pub struct SeaOrmEmployeeStore<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
    staged: StagingArea,
}

impl<C> SeaOrmEmployeeStore<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            staged: StagingArea::default(),
        }
    }

    pub fn pending_changes(&self) -> usize {
        self.staged.len()
    }

    async fn apply(txn: &DatabaseTransaction, change: Staged) -> StoreResult<()> {
        match change {
            Staged::Insert(employee) => insert_employee(txn, employee).await,
            Staged::Delete(id) => delete_employee(txn, id).await,
            Staged::InsertCompensation(compensation) => {
                insert_compensation(txn, compensation).await
            }
        }
    }
}

#[async_trait]
impl<C> EmployeeStore for SeaOrmEmployeeStore<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn get(&self, id: &str) -> StoreResult<Option<Employee>> {
        let Some(found) = employee::Entity::find_by_id(id.to_owned())
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };

        // Inner join drops links whose report row is gone.
        let links = direct_report::Entity::find()
            .filter(direct_report::Column::ManagerId.eq(id))
            .join(JoinType::InnerJoin, direct_report::Relation::Report.def())
            .order_by_asc(direct_report::Column::Position)
            .all(&self.conn)
            .await?;

        Ok(Some(Employee {
            employee_id: found.employee_id,
            first_name: found.first_name,
            last_name: found.last_name,
            position: found.position,
            department: found.department,
            direct_reports: links
                .into_iter()
                .map(|link| EmployeeRef::new(link.report_id))
                .collect(),
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
        let Some(found) = employee::Entity::find_by_id(id.to_owned())
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };
        let key = display_name(&found.first_name, &found.last_name);
        let record = compensation::Entity::find_by_id(key)
            .one(&self.conn)
            .await?;
        Ok(record.map(|model| Compensation {
            employee: model.employee,
            salary: model.salary,
            effective_date: model.effective_date.with_timezone(&Utc),
        }))
    }

    async fn commit(&self) -> StoreResult<()> {
        let batch = self.staged.take();
        if batch.is_empty() {
            return Ok(());
        }
        debug!(changes = batch.len(), "committing staged changes");
        let txn = self.conn.begin().await?;
        for change in batch {
            if let Err(err) = Self::apply(&txn, change).await {
                txn.rollback().await?;
                return Err(err);
            }
        }
        txn.commit().await?;
        Ok(())
    }
}

/// Unique violations become [`StoreError::Conflict`]; the key constraint is
/// the only duplicate check, so concurrent writers race on it.
fn duplicate_as_conflict(err: DbErr, key: &str) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::conflict(key),
        _ => StoreError::Database(err),
    }
}

async fn insert_employee(txn: &DatabaseTransaction, employee: Employee) -> StoreResult<()> {
    let row = employee::ActiveModel {
        employee_id: Set(employee.employee_id.clone()),
        first_name: Set(employee.first_name),
        last_name: Set(employee.last_name),
        position: Set(employee.position),
        department: Set(employee.department),
    };
    employee::Entity::insert(row)
        .exec_without_returning(txn)
        .await
        .map_err(|err| duplicate_as_conflict(err, &employee.employee_id))?;

    let links = employee
        .direct_reports
        .into_iter()
        .enumerate()
        .map(|(position, report)| direct_report::ActiveModel {
            manager_id: Set(employee.employee_id.clone()),
            position: Set(position as i32),
            report_id: Set(report.employee_id),
        })
        .collect::<Vec<_>>();
    if !links.is_empty() {
        direct_report::Entity::insert_many(links)
            .exec_without_returning(txn)
            .await?;
    }
    Ok(())
}

async fn delete_employee(txn: &DatabaseTransaction, id: String) -> StoreResult<()> {
    // Incoming links stay and resolve again if the id is re-attached.
    direct_report::Entity::delete_many()
        .filter(direct_report::Column::ManagerId.eq(id.as_str()))
        .exec(txn)
        .await?;
    let result = employee::Entity::delete_by_id(id.clone()).exec(txn).await?;
    if result.rows_affected == 0 {
        return Err(StoreError::missing(id));
    }
    Ok(())
}

async fn insert_compensation(
    txn: &DatabaseTransaction,
    compensation: Compensation,
) -> StoreResult<()> {
    let key = compensation.employee.clone();
    let row = compensation::ActiveModel {
        employee: Set(compensation.employee),
        salary: Set(compensation.salary),
        effective_date: Set(compensation.effective_date.into()),
    };
    compensation::Entity::insert(row)
        .exec_without_returning(txn)
        .await
        .map_err(|err| duplicate_as_conflict(err, &key))?;
    Ok(())
}
