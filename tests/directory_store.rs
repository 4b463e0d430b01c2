use std::sync::Arc;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use directory_tests::memory_pool;
use platform_db::DbPool;
use products_hr::{
    Compensation, Employee, EmployeeService, EmployeeStore, HrError, SeaOrmEmployeeStore,
    StoreError,
};

fn service(pool: &DbPool) -> EmployeeService {
    EmployeeService::new(Arc::new(SeaOrmEmployeeStore::new(pool.clone())))
}

async fn seed_beatles(service: &EmployeeService) -> Result<Employee> {
    let paul = service.create(Employee::new("Paul", "McCartney")).await?;
    let pete = service.create(Employee::new("Pete", "Best")).await?;
    let george = service.create(Employee::new("George", "Harrison")).await?;
    let ringo = service
        .create(Employee::new("Ringo", "Starr").with_reports([pete.employee_id, george.employee_id]))
        .await?;
    let john = service
        .create(
            Employee::new("John", "Lennon")
                .with_position("Development Manager")
                .with_reports([paul.employee_id, ringo.employee_id]),
        )
        .await?;
    Ok(john)
}

#[tokio::test]
async fn staged_insert_is_invisible_until_commit() -> Result<()> {
    let pool = memory_pool().await?;
    let store = SeaOrmEmployeeStore::new(pool.clone());

    let staged = store.add(Employee::new("John", "Lennon"));
    assert_eq!(store.pending_changes(), 1);
    assert!(store.get(&staged.employee_id).await?.is_none());

    store.commit().await?;
    assert_eq!(store.pending_changes(), 0);
    let loaded = store
        .get(&staged.employee_id)
        .await?
        .expect("committed employee");
    assert_eq!(loaded.display_name(), "John Lennon");
    Ok(())
}

#[tokio::test]
async fn direct_reports_keep_their_order() -> Result<()> {
    let pool = memory_pool().await?;
    let service = service(&pool);
    let john = seed_beatles(&service).await?;

    let loaded = service.get_by_id(&john.employee_id).await?.expect("john");
    assert_eq!(loaded.direct_reports, john.direct_reports);
    assert_eq!(loaded.position.as_deref(), Some("Development Manager"));
    Ok(())
}

#[tokio::test]
async fn reporting_structure_counts_the_whole_tree() -> Result<()> {
    let pool = memory_pool().await?;
    let service = service(&pool);
    let john = seed_beatles(&service).await?;

    let structure = service
        .get_reporting_structure_by_id(&john.employee_id)
        .await?
        .expect("structure");
    assert_eq!(structure.number_of_reports, 4);
    assert_eq!(structure.employee, "John Lennon");

    assert!(
        service
            .get_reporting_structure_by_id("missing")
            .await?
            .is_none()
    );
    Ok(())
}

#[tokio::test]
async fn replace_keeps_the_id_and_the_manager_link() -> Result<()> {
    let pool = memory_pool().await?;
    let service = service(&pool);
    let john = seed_beatles(&service).await?;
    let paul_id = john.direct_reports[0].employee_id.clone();

    let original = service.get_by_id(&paul_id).await?;
    let replaced = service
        .replace(original, Some(Employee::new("Paul", "McCartney").with_position("Bassist")))
        .await?
        .expect("replacement");
    assert_eq!(replaced.employee_id, paul_id);

    let reloaded = service.get_by_id(&paul_id).await?.expect("paul");
    assert_eq!(reloaded.position.as_deref(), Some("Bassist"));

    let manager = service.get_by_id(&john.employee_id).await?.expect("john");
    assert_eq!(manager.direct_reports[0].employee_id, paul_id);
    let structure = service
        .get_reporting_structure_by_id(&john.employee_id)
        .await?
        .expect("structure");
    assert_eq!(structure.number_of_reports, 4);
    Ok(())
}

#[tokio::test]
async fn replace_without_replacement_deletes() -> Result<()> {
    let pool = memory_pool().await?;
    let service = service(&pool);
    let john = seed_beatles(&service).await?;
    let ringo_id = john.direct_reports[1].employee_id.clone();

    let ringo = service.get_by_id(&ringo_id).await?;
    assert!(service.replace(ringo, None).await?.is_none());
    assert!(service.get_by_id(&ringo_id).await?.is_none());

    // Ringo's link under John no longer resolves, and his own links are gone.
    let structure = service
        .get_reporting_structure_by_id(&john.employee_id)
        .await?
        .expect("structure");
    assert_eq!(structure.number_of_reports, 1);
    Ok(())
}

#[tokio::test]
async fn compensation_round_trips_through_the_service() -> Result<()> {
    let pool = memory_pool().await?;
    let service = service(&pool);
    let john = seed_beatles(&service).await?;
    let effective = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let created = service
        .create_compensation(
            &john.employee_id,
            Compensation::new("John Lennon", 150_000, effective),
        )
        .await?;
    assert!(created.is_some());

    let loaded = service
        .get_compensation_by_id(&john.employee_id)
        .await?
        .expect("compensation");
    assert_eq!(loaded.salary, 150_000);
    assert_eq!(loaded.effective_date, effective);

    let mismatch = service
        .create_compensation(
            &john.employee_id,
            Compensation::new("Johnny Lennon", 1, effective),
        )
        .await?;
    assert!(mismatch.is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_compensation_fails_at_commit() -> Result<()> {
    let pool = memory_pool().await?;
    let service = service(&pool);
    let john = seed_beatles(&service).await?;
    let effective = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    service
        .create_compensation(&john.employee_id, Compensation::new("John Lennon", 1, effective))
        .await?;
    let err = service
        .create_compensation(&john.employee_id, Compensation::new("John Lennon", 2, effective))
        .await
        .expect_err("duplicate compensation");
    assert!(matches!(err, HrError::Store(StoreError::Conflict { .. })));

    let kept = service
        .get_compensation_by_id(&john.employee_id)
        .await?
        .expect("compensation");
    assert_eq!(kept.salary, 1);
    Ok(())
}

#[tokio::test]
async fn failed_commit_leaves_nothing_behind() -> Result<()> {
    let pool = memory_pool().await?;
    let store = SeaOrmEmployeeStore::new(pool.clone());
    let john = store.add(Employee::new("John", "Lennon"));
    store.commit().await?;

    // A second insert under John's id conflicts; the new employee in the same
    // batch must not survive either.
    let newcomer = store.add(Employee::new("Yoko", "Ono"));
    let mut duplicate = Employee::new("John", "Lennon").with_position("dup");
    duplicate.employee_id = john.employee_id.clone();
    store.attach(duplicate);
    let err = store.commit().await.expect_err("conflict");
    assert!(matches!(err, StoreError::Conflict { .. }));
    assert!(store.get(&newcomer.employee_id).await?.is_none());
    assert_eq!(store.pending_changes(), 0);
    Ok(())
}

#[tokio::test]
async fn duplicate_ids_within_one_batch_are_a_conflict() -> Result<()> {
    let pool = memory_pool().await?;
    let store = SeaOrmEmployeeStore::new(pool.clone());

    let mut first = Employee::new("John", "Lennon");
    first.employee_id = "e-1".to_string();
    let mut second = Employee::new("Paul", "McCartney");
    second.employee_id = "e-1".to_string();
    store.attach(first);
    store.attach(second);

    let err = store.commit().await.expect_err("duplicate id");
    assert!(matches!(err, StoreError::Conflict { ref key } if key == "e-1"));
    assert!(store.get("e-1").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_compensation_within_one_batch_is_a_conflict() -> Result<()> {
    let pool = memory_pool().await?;
    let store = SeaOrmEmployeeStore::new(pool.clone());
    let john = store.add(Employee::new("John", "Lennon"));
    store.commit().await?;
    let effective = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    store.add_compensation(Compensation::new("John Lennon", 1, effective));
    store.add_compensation(Compensation::new("John Lennon", 2, effective));
    let err = store.commit().await.expect_err("duplicate compensation");
    assert!(matches!(err, StoreError::Conflict { ref key } if key == "John Lennon"));
    assert!(
        store
            .find_compensation_by_employee_id(&john.employee_id)
            .await?
            .is_none()
    );
    Ok(())
}
