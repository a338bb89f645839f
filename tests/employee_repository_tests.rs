//! Integration tests for EmployeeRepository against an in-memory SQLite database.

use anyhow::Result;
use directory::error::RepositoryError;
use directory::repositories::{
    CompanyRepository, EmployeeChanges, EmployeeRepository, NewEmployee, PageRequest,
};

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{insert_company, insert_employee, setup_test_db_arc};

#[tokio::test]
async fn listing_embeds_company_id_and_name() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let companies = CompanyRepository::new(db.clone());
    let employees = EmployeeRepository::new(db.clone());

    let acme = insert_company(&companies, "Acme").await?;
    let globex = insert_company(&companies, "Globex").await?;
    insert_employee(&employees, acme.id, "Jane Doe").await?;
    insert_employee(&employees, globex.id, "Hank Scorpio").await?;
    insert_employee(&employees, acme.id, "John Roe").await?;

    let page = employees.get_all(PageRequest::new(None, None, 5)).await?;

    assert_eq!(page.total, 3);
    let owners: Vec<(i32, String)> = page
        .data
        .iter()
        .map(|row| {
            let company = row.company.as_ref().expect("company is eager-loaded");
            (company.id, company.name.clone())
        })
        .collect();
    assert_eq!(
        owners,
        vec![
            (acme.id, "Acme".to_string()),
            (globex.id, "Globex".to_string()),
            (acme.id, "Acme".to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn listing_paginates_with_default_size() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let companies = CompanyRepository::new(db.clone());
    let employees = EmployeeRepository::new(db.clone());
    let acme = insert_company(&companies, "Acme").await?;

    for n in 1..=7 {
        insert_employee(&employees, acme.id, &format!("Worker {n}")).await?;
    }

    let second = employees
        .get_all(PageRequest::new(Some(2), None, 5))
        .await?;

    assert_eq!(second.data.len(), 2);
    assert_eq!(second.last_page, 2);
    assert_eq!(second.data[0].employee.name, "Worker 6");
    Ok(())
}

#[tokio::test]
async fn create_rejects_unknown_company() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let employees = EmployeeRepository::new(db.clone());

    let result = employees
        .create(NewEmployee {
            company_id: 99,
            name: "Jane".to_string(),
            email: "jane@acme.test".to_string(),
        })
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::ReferentialIntegrity {
            field: "company_id",
            ..
        })
    ));
    Ok(())
}

#[tokio::test]
async fn update_moves_employee_between_companies() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let companies = CompanyRepository::new(db.clone());
    let employees = EmployeeRepository::new(db.clone());
    let acme = insert_company(&companies, "Acme").await?;
    let globex = insert_company(&companies, "Globex").await?;
    let jane = insert_employee(&employees, acme.id, "Jane Doe").await?;

    let moved = employees
        .update(
            jane.id,
            EmployeeChanges {
                company_id: Some(globex.id),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(moved.company_id, globex.id);
    assert_eq!(moved.name, "Jane Doe");

    let rejected = employees
        .update(
            jane.id,
            EmployeeChanges {
                company_id: Some(12345),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        rejected,
        Err(RepositoryError::ReferentialIntegrity { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn update_and_delete_unknown_employee_are_not_found() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let employees = EmployeeRepository::new(db.clone());

    assert!(matches!(
        employees.update(3, EmployeeChanges::default()).await,
        Err(RepositoryError::NotFound { entity: "Employee", id: 3 })
    ));
    assert!(matches!(
        employees.delete(3).await,
        Err(RepositoryError::NotFound { entity: "Employee", id: 3 })
    ));
    Ok(())
}

#[tokio::test]
async fn delete_removes_employee() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let companies = CompanyRepository::new(db.clone());
    let employees = EmployeeRepository::new(db.clone());
    let acme = insert_company(&companies, "Acme").await?;
    let jane = insert_employee(&employees, acme.id, "Jane Doe").await?;

    assert!(employees.delete(jane.id).await?);
    assert!(employees.get_by_id(jane.id).await?.is_none());
    assert!(companies.get_by_id(acme.id).await?.is_some());
    Ok(())
}
