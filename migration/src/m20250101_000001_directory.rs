use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employee {
    Table,
    EmployeeId,
    FirstName,
    LastName,
    Position,
    Department,
}

#[derive(DeriveIden)]
enum DirectReport {
    Table,
    ManagerId,
    Position,
    ReportId,
}

#[derive(DeriveIden)]
enum Compensation {
    Table,
    Employee,
    Salary,
    EffectiveDate,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employee::EmployeeId)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employee::FirstName).string_len(256).not_null())
                    .col(ColumnDef::new(Employee::LastName).string_len(256).not_null())
                    .col(ColumnDef::new(Employee::Position).string_len(256))
                    .col(ColumnDef::new(Employee::Department).string_len(256))
                    .to_owned(),
            )
            .await?;

        // report_id stays unconstrained so a report outlives a remove-then-add
        // of the employee it points at.
        manager
            .create_table(
                Table::create()
                    .table(DirectReport::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DirectReport::ManagerId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DirectReport::Position).integer().not_null())
                    .col(
                        ColumnDef::new(DirectReport::ReportId)
                            .string_len(64)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(DirectReport::ManagerId)
                            .col(DirectReport::Position),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_direct_report_manager")
                            .from(DirectReport::Table, DirectReport::ManagerId)
                            .to(Employee::Table, Employee::EmployeeId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_direct_report_report_id")
                    .table(DirectReport::Table)
                    .col(DirectReport::ReportId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Compensation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Compensation::Employee)
                            .string_len(513)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Compensation::Salary).integer().not_null())
                    .col(
                        ColumnDef::new(Compensation::EffectiveDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Compensation::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DirectReport::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employee::Table).if_exists().to_owned())
            .await
    }
}
