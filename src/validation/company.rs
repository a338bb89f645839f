//! Company create/update validation and logo handling

use crate::error::ApiError;
use crate::repositories::{CompanyChanges, NewCompany};
use crate::storage::{AssetNamespace, AssetStore, StoredAsset, UploadedFile};
use crate::validation::{
    CheckedUpload, FieldKind, Presence, RawAttributes, ValidationErrors, check_field, check_image,
};

/// Validated company attributes plus the logo upload still to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCompany<T> {
    pub attributes: T,
    pub logo_upload: Option<UploadedFile>,
}

/// Rules for creating a company. Unknown fields are dropped.
pub fn validate_create(
    input: &RawAttributes,
    max_upload_bytes: usize,
) -> Result<ValidatedCompany<NewCompany>, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = check_field(input, &mut errors, "name", Presence::Required, FieldKind::Text);
    let email = check_field(input, &mut errors, "email", Presence::Required, FieldKind::Email);
    let website = check_field(input, &mut errors, "website", Presence::Nullable, FieldKind::Url);
    let logo = check_image(input, &mut errors, "logo", max_upload_bytes);

    if !errors.is_empty() {
        return Err(errors);
    }

    let (Some(name), Some(email)) = (name.into_option(), email.into_option()) else {
        // check_field records an error for any missing required value
        return Err(errors);
    };

    Ok(ValidatedCompany {
        attributes: NewCompany {
            name,
            email,
            logo: None,
            website: website.into_option(),
        },
        logo_upload: match logo {
            CheckedUpload::File(file) => Some(file),
            CheckedUpload::Absent | CheckedUpload::Cleared => None,
        },
    })
}

/// Rules for updating a company: only supplied fields are checked and changed.
pub fn validate_update(
    input: &RawAttributes,
    max_upload_bytes: usize,
) -> Result<ValidatedCompany<CompanyChanges>, ValidationErrors> {
    let mut errors = ValidationErrors::new();

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
    let website = check_field(
        input,
        &mut errors,
        "website",
        Presence::SometimesNullable,
        FieldKind::Url,
    );
    let logo = check_image(input, &mut errors, "logo", max_upload_bytes);

    let mut changes = CompanyChanges {
        name: name.into_option(),
        email: email.into_option(),
        website: website.into_change(),
        logo: None,
    };

    let logo_upload = match logo {
        CheckedUpload::File(file) => Some(file),
        CheckedUpload::Cleared => {
            changes.logo = Some(None);
            None
        }
        CheckedUpload::Absent => None,
    };

    errors.into_result(ValidatedCompany {
        attributes: changes,
        logo_upload,
    })
}

/// Validate a create payload and store its logo, yielding persistable attributes.
///
/// The stored logo is returned alongside so a failed insert can discard it.
pub async fn prepare_create(
    input: &RawAttributes,
    assets: &dyn AssetStore,
    max_upload_bytes: usize,
) -> Result<(NewCompany, Option<StoredAsset>), ApiError> {
    let validated = validate_create(input, max_upload_bytes)?;
    let mut attributes = validated.attributes;

    let stored = match validated.logo_upload {
        Some(file) => Some(assets.store(AssetNamespace::CompanyLogo, &file).await?),
        None => None,
    };
    if let Some(stored) = &stored {
        attributes.logo = Some(stored.url.clone());
    }

    Ok((attributes, stored))
}

/// Store the logo of an already validated update.
pub async fn store_update_logo(
    validated: ValidatedCompany<CompanyChanges>,
    assets: &dyn AssetStore,
) -> Result<(CompanyChanges, Option<StoredAsset>), ApiError> {
    let mut changes = validated.attributes;

    let stored = match validated.logo_upload {
        Some(file) => Some(assets.store(AssetNamespace::CompanyLogo, &file).await?),
        None => None,
    };
    if let Some(stored) = &stored {
        changes.logo = Some(Some(stored.url.clone()));
    }

    Ok((changes, stored))
}

/// Remove a logo stored for a write that did not go through.
pub async fn discard_logo(stored: Option<StoredAsset>, assets: &dyn AssetStore) {
    let Some(stored) = stored else {
        return;
    };

    if let Err(error) = assets.remove(&stored).await {
        tracing::warn!(path = %stored.path, error = %error, "Failed to remove orphaned logo");
    }
}
