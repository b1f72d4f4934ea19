//! Services catalog: CRUD over `models::service`.
//!
//! Slugs are derived once, at creation, and never regenerated on title edits.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::info;

use models::{project, service};

use crate::errors::{required_max, ServiceError};
use crate::slugs::{resolve_slug, TITLE_MAX};

#[derive(Debug, Clone, Deserialize)]
pub struct NewService {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "crate::default_true")]
    pub is_active: bool,
}

impl Default for NewService {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: None,
            description: String::new(),
            short_description: String::new(),
            icon: None,
            image: String::new(),
            order: 0,
            is_active: true,
        }
    }
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Create a service, deriving the slug from the title when none is given.
pub async fn create_service<C: ConnectionTrait>(db: &C, input: NewService) -> Result<service::Model, ServiceError> {
    let title = required_max("title", &input.title, TITLE_MAX)?;
    let slug = resolve_slug(&title, input.slug.as_deref())?;
    if find_by_slug(db, &slug).await?.is_some() {
        return Err(ServiceError::Conflict(format!("service slug '{slug}' already exists")));
    }

    let now = Utc::now().into();
    let am = service::ActiveModel {
        id: NotSet,
        title: Set(title),
        slug: Set(slug),
        description: Set(input.description),
        short_description: Set(input.short_description),
        icon: Set(input.icon.filter(|i| !i.trim().is_empty()).unwrap_or_else(|| service::DEFAULT_ICON.to_string())),
        image: Set(input.image),
        order: Set(input.order),
        is_active: Set(input.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await?;
    info!(id = created.id, slug = %created.slug, "service created");
    Ok(created)
}

/// Return the service with `input`'s slug, creating it when missing.
/// The boolean is `true` when a row was created.
pub async fn ensure_service<C: ConnectionTrait>(db: &C, input: NewService) -> Result<(service::Model, bool), ServiceError> {
    let slug = resolve_slug(&input.title, input.slug.as_deref())?;
    if let Some(existing) = find_by_slug(db, &slug).await? {
        return Ok((existing, false));
    }
    let created = create_service(db, NewService { slug: Some(slug), ..input }).await?;
    Ok((created, true))
}

pub async fn get_service<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<service::Model>, ServiceError> {
    Ok(service::Entity::find_by_id(id).one(db).await?)
}

/// Lookup by slug; `active_only` hides soft-disabled services.
pub async fn get_service_by_slug<C: ConnectionTrait>(
    db: &C,
    slug: &str,
    active_only: bool,
) -> Result<Option<service::Model>, ServiceError> {
    let mut finder = service::Entity::find().filter(service::Column::Slug.eq(slug));
    if active_only {
        finder = finder.filter(service::Column::IsActive.eq(true));
    }
    Ok(finder.one(db).await?)
}

/// Services ordered by `order`, then `title`.
pub async fn list_services<C: ConnectionTrait>(db: &C, active_only: bool) -> Result<Vec<service::Model>, ServiceError> {
    let mut finder = service::Entity::find();
    if active_only {
        finder = finder.filter(service::Column::IsActive.eq(true));
    }
    let rows = finder
        .order_by_asc(service::Column::Order)
        .order_by_asc(service::Column::Title)
        .order_by_asc(service::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn update_service<C: ConnectionTrait>(
    db: &C,
    id: i32,
    changes: ServiceChanges,
) -> Result<service::Model, ServiceError> {
    let Some(existing) = service::Entity::find_by_id(id).one(db).await? else {
        return Err(ServiceError::not_found("service"));
    };
    let mut am: service::ActiveModel = existing.into();
    if let Some(t) = changes.title { am.title = Set(required_max("title", &t, TITLE_MAX)?); }
    if let Some(s) = changes.slug {
        let slug = resolve_slug(&s, Some(&s))?;
        if find_by_slug(db, &slug).await?.is_some_and(|other| other.id != id) {
            return Err(ServiceError::Conflict(format!("service slug '{slug}' already exists")));
        }
        am.slug = Set(slug);
    }
    if let Some(d) = changes.description { am.description = Set(d); }
    if let Some(d) = changes.short_description { am.short_description = Set(d); }
    if let Some(i) = changes.icon { am.icon = Set(i); }
    if let Some(i) = changes.image { am.image = Set(i); }
    if let Some(o) = changes.order { am.order = Set(o); }
    if let Some(b) = changes.is_active { am.is_active = Set(b); }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Delete a service; its projects survive with the reference cleared.
/// Returns true if a row was deleted.
pub async fn delete_service<C: TransactionTrait>(db: &C, id: i32) -> Result<bool, ServiceError> {
    let txn = db.begin().await?;
    project::Entity::update_many()
        .col_expr(project::Column::ServiceId, Expr::value(Option::<i32>::None))
        .filter(project::Column::ServiceId.eq(id))
        .exec(&txn)
        .await?;
    let res = service::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    if res.rows_affected > 0 {
        info!(id, "service deleted");
    }
    Ok(res.rows_affected > 0)
}

async fn find_by_slug<C: ConnectionTrait>(db: &C, slug: &str) -> Result<Option<service::Model>, ServiceError> {
    Ok(service::Entity::find().filter(service::Column::Slug.eq(slug)).one(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::{self, NewProject};
    use crate::test_support::get_db;

    fn kitchen() -> NewService {
        NewService { title: "Aménagement Cuisine".into(), description: "Cuisines sur-mesure".into(), ..NewService::default() }
    }

    #[tokio::test]
    async fn slug_derived_from_title_and_stable_across_edits() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let s = create_service(&db, kitchen()).await?;
        assert_eq!(s.slug, "amenagement-cuisine");
        assert_eq!(s.icon, service::DEFAULT_ICON);

        let renamed = update_service(&db, s.id, ServiceChanges { title: Some("Cuisines & Verrières".into()), ..Default::default() }).await?;
        assert_eq!(renamed.title, "Cuisines & Verrières");
        assert_eq!(renamed.slug, "amenagement-cuisine");
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_service(&db, kitchen()).await?;
        let err = create_service(&db, kitchen()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        Ok(())
    }

    #[tokio::test]
    async fn blank_or_overlong_title_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = create_service(&db, NewService { title: "   ".into(), ..NewService::default() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = create_service(&db, NewService { title: "a".repeat(201), ..NewService::default() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let ok = create_service(&db, NewService { title: "a".repeat(200), slug: Some("b".repeat(400)), ..NewService::default() }).await?;
        assert_eq!(ok.slug.len(), crate::slugs::SLUG_MAX);
        Ok(())
    }

    #[tokio::test]
    async fn list_orders_by_order_then_title_and_filters_inactive() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_service(&db, NewService { title: "Zinguerie".into(), order: 1, ..NewService::default() }).await?;
        create_service(&db, NewService { title: "Carrelage".into(), order: 1, ..NewService::default() }).await?;
        create_service(&db, NewService { title: "Plomberie".into(), order: 0, ..NewService::default() }).await?;
        create_service(&db, NewService { title: "Archivé".into(), order: 0, is_active: false, ..NewService::default() }).await?;

        let active: Vec<_> = list_services(&db, true).await?.into_iter().map(|s| s.title).collect();
        assert_eq!(active, vec!["Plomberie", "Carrelage", "Zinguerie"]);
        assert_eq!(list_services(&db, false).await?.len(), 4);
        assert!(get_service_by_slug(&db, "archive", true).await?.is_none());
        assert!(get_service_by_slug(&db, "archive", false).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn deleting_service_keeps_projects() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let s = create_service(&db, kitchen()).await?;
        let p = projects::create_project(
            &db,
            NewProject { title: "Cuisine Moderne".into(), service_id: Some(s.id), ..NewProject::default() },
        )
        .await?;

        assert!(delete_service(&db, s.id).await?);
        let p = projects::get_project(&db, p.id).await?.expect("project survives");
        assert_eq!(p.service_id, None);
        assert!(!delete_service(&db, s.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn ensure_service_is_get_or_create() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let (a, created) = ensure_service(&db, NewService { slug: Some("cuisine".into()), ..kitchen() }).await?;
        assert!(created);
        let (b, created) = ensure_service(&db, NewService { slug: Some("cuisine".into()), title: "Autre titre".into(), ..kitchen() }).await?;
        assert!(!created);
        assert_eq!(a.id, b.id);
        assert_eq!(b.title, "Aménagement Cuisine");
        Ok(())
    }
}
