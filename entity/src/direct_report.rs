use sea_orm::entity::prelude::*;

/// One slot in a manager's ordered list of direct reports.
///
/// `report_id` is a weak reference: there is no foreign key on it, so a
/// report survives its employee row being removed and re-added under the
/// same id.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "direct_report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub manager_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub position: i32,
    #[sea_orm(indexed)]
    pub report_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::ManagerId",
        to = "super::employee::Column::EmployeeId",
        on_delete = "Cascade"
    )]
    Manager,
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::ReportId",
        to = "super::employee::Column::EmployeeId"
    )]
    Report,
}

impl ActiveModelBehavior for ActiveModel {}
