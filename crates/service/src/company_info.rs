//! Singleton company profile.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, warn};

use models::company_info;

use crate::errors::{required, ServiceError};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub company_name: String,
    pub tagline: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub facebook_url: String,
    pub instagram_url: String,
    pub linkedin_url: String,
    pub meta_description: String,
    pub meta_keywords: String,
}

impl CompanyProfile {
    fn check(&self) -> Result<String, ServiceError> {
        let name = required("company_name", &self.company_name)?;
        company_info::validate_meta_description(&self.meta_description)?;
        Ok(name)
    }
}

/// Create the company profile. Fails with `Singleton` if one already exists.
pub async fn create_company_info<C: TransactionTrait>(
    db: &C,
    input: CompanyProfile,
) -> Result<company_info::Model, ServiceError> {
    let name = input.check()?;

    // count + insert in one transaction; the row never gets overwritten
    let txn = db.begin().await?;
    let existing = company_info::Entity::find().count(&txn).await?;
    if existing > 0 {
        txn.rollback().await?;
        warn!(existing, "rejected second company info row");
        return Err(ServiceError::Singleton(
            "company info already exists; update the existing record instead".into(),
        ));
    }

    let now = Utc::now().into();
    let am = company_info::ActiveModel {
        id: NotSet,
        company_name: Set(name),
        tagline: Set(input.tagline),
        description: Set(input.description),
        phone: Set(input.phone),
        email: Set(input.email),
        address: Set(input.address),
        facebook_url: Set(input.facebook_url),
        instagram_url: Set(input.instagram_url),
        linkedin_url: Set(input.linkedin_url),
        meta_description: Set(input.meta_description),
        meta_keywords: Set(input.meta_keywords),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(&txn).await?;
    txn.commit().await?;
    info!(id = created.id, "company info created");
    Ok(created)
}

/// The single profile row, if any.
pub async fn get_company_info<C: ConnectionTrait>(db: &C) -> Result<Option<company_info::Model>, ServiceError> {
    Ok(company_info::Entity::find().order_by_asc(company_info::Column::Id).one(db).await?)
}

/// Replace every editable field of the existing profile.
pub async fn update_company_info<C: ConnectionTrait>(
    db: &C,
    input: CompanyProfile,
) -> Result<company_info::Model, ServiceError> {
    let name = input.check()?;
    let Some(existing) = get_company_info(db).await? else {
        return Err(ServiceError::not_found("company info"));
    };
    let mut am: company_info::ActiveModel = existing.into();
    am.company_name = Set(name);
    am.tagline = Set(input.tagline);
    am.description = Set(input.description);
    am.phone = Set(input.phone);
    am.email = Set(input.email);
    am.address = Set(input.address);
    am.facebook_url = Set(input.facebook_url);
    am.instagram_url = Set(input.instagram_url);
    am.linkedin_url = Set(input.linkedin_url);
    am.meta_description = Set(input.meta_description);
    am.meta_keywords = Set(input.meta_keywords);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Remove the profile (demo reset). Returns rows deleted.
pub async fn delete_company_info<C: ConnectionTrait>(db: &C) -> Result<u64, ServiceError> {
    let res = company_info::Entity::delete_many().exec(db).await?;
    Ok(res.rows_affected)
}
