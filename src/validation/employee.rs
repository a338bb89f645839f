//! Employee create/update validation
//!
//! Employees carry no logo; a `logo` field in the payload is dropped with the
//! other unknown fields.

use crate::repositories::{EmployeeChanges, NewEmployee};
use crate::validation::{
    Checked, FieldKind, Presence, RawAttributes, ValidationErrors, check_field,
};

fn company_id(checked: Checked) -> Option<i32> {
    checked.into_option().and_then(|value| value.parse().ok())
}

pub fn validate_create(input: &RawAttributes) -> Result<NewEmployee, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let company = check_field(
        input,
        &mut errors,
        "company_id",
        Presence::Required,
        FieldKind::PositiveInteger,
    );
    let name = check_field(input, &mut errors, "name", Presence::Required, FieldKind::Text);
    let email = check_field(input, &mut errors, "email", Presence::Required, FieldKind::Email);

    match (company_id(company), name.into_option(), email.into_option()) {
        (Some(company_id), Some(name), Some(email)) if errors.is_empty() => Ok(NewEmployee {
            company_id,
            name,
            email,
        }),
        _ => Err(errors),
    }
}

pub fn validate_update(input: &RawAttributes) -> Result<EmployeeChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let company = check_field(
        input,
        &mut errors,
        "company_id",
        Presence::SometimesRequired,
        FieldKind::PositiveInteger,
    );
    let name = check_field(
        input,
        &mut errors,
        "name",
        Presence::SometimesRequired,
        FieldKind::Text,
    );
    let email = check_field(
        input,
        &mut errors,
        "email",
        Presence::SometimesRequired,
        FieldKind::Email,
    );

    let changes = EmployeeChanges {
        company_id: company_id(company),
        name: name.into_option(),
        email: email.into_option(),
    };

    errors.into_result(changes)
}
