use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;

use models::{project, testimonial};

use crate::errors::{required, ServiceError};

#[derive(Debug, Clone, Deserialize)]
pub struct NewTestimonial {
    pub client_name: String,
    #[serde(default)]
    pub client_location: String,
    pub content: String,
    #[serde(default = "default_rating")]
    pub rating: i32,
    #[serde(default)]
    pub project_id: Option<i32>,
    #[serde(default = "crate::default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i32,
}

fn default_rating() -> i32 { testimonial::MAX_RATING }

impl Default for NewTestimonial {
    fn default() -> Self {
        Self {
            client_name: String::new(),
            client_location: String::new(),
            content: String::new(),
            rating: default_rating(),
            project_id: None,
            is_active: true,
            order: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TestimonialChanges {
    pub client_name: Option<String>,
    pub client_location: Option<String>,
    pub content: Option<String>,
    pub rating: Option<i32>,
    pub project_id: Option<Option<i32>>,
    pub is_active: Option<bool>,
    pub order: Option<i32>,
}

/// Ratings outside 1..=5 are rejected, never clamped.
pub async fn create_testimonial<C: ConnectionTrait>(
    db: &C,
    input: NewTestimonial,
) -> Result<testimonial::Model, ServiceError> {
    let client_name = required("client_name", &input.client_name)?;
    let content = required("content", &input.content)?;
    let rating = testimonial::validate_rating(input.rating)?;
    if let Some(pid) = input.project_id {
        ensure_project_exists(db, pid).await?;
    }

    let now = Utc::now().into();
    let am = testimonial::ActiveModel {
        id: NotSet,
        client_name: Set(client_name),
        client_location: Set(input.client_location),
        content: Set(content),
        rating: Set(rating),
        project_id: Set(input.project_id),
        is_active: Set(input.is_active),
        order: Set(input.order),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await?;
    info!(id = created.id, "testimonial created");
    Ok(created)
}

/// By `order`, newest first among ties, each with its linked project.
pub async fn list_testimonials<C: ConnectionTrait>(
    db: &C,
    active_only: bool,
) -> Result<Vec<(testimonial::Model, Option<project::Model>)>, ServiceError> {
    let mut q = testimonial::Entity::find();
    if active_only {
        q = q.filter(testimonial::Column::IsActive.eq(true));
    }
    let rows = q
        .order_by_asc(testimonial::Column::Order)
        .order_by_desc(testimonial::Column::CreatedAt)
        .order_by_desc(testimonial::Column::Id)
        .find_also_related(project::Entity)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn update_testimonial<C: ConnectionTrait>(
    db: &C,
    id: i32,
    changes: TestimonialChanges,
) -> Result<testimonial::Model, ServiceError> {
    let Some(existing) = testimonial::Entity::find_by_id(id).one(db).await? else {
        return Err(ServiceError::not_found("testimonial"));
    };
    let mut am: testimonial::ActiveModel = existing.into();
    if let Some(v) = changes.client_name { am.client_name = Set(required("client_name", &v)?); }
    if let Some(v) = changes.client_location { am.client_location = Set(v); }
    if let Some(v) = changes.content { am.content = Set(required("content", &v)?); }
    if let Some(v) = changes.rating { am.rating = Set(testimonial::validate_rating(v)?); }
    if let Some(v) = changes.project_id {
        if let Some(pid) = v {
            ensure_project_exists(db, pid).await?;
        }
        am.project_id = Set(v);
    }
    if let Some(v) = changes.is_active { am.is_active = Set(v); }
    if let Some(v) = changes.order { am.order = Set(v); }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete_testimonial<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ServiceError> {
    let res = testimonial::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub async fn delete_all_testimonials<C: ConnectionTrait>(db: &C) -> Result<u64, ServiceError> {
    Ok(testimonial::Entity::delete_many().exec(db).await?.rows_affected)
}

async fn ensure_project_exists<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), ServiceError> {
    if project::Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(ServiceError::Validation(format!("project {id} does not exist")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::{create_project, NewProject};
    use crate::test_support::get_db;
    use models::errors::ModelError;

    fn review(name: &str, order: i32) -> NewTestimonial {
        NewTestimonial { client_name: name.into(), content: "Travail soigné".into(), order, ..NewTestimonial::default() }
    }

    #[tokio::test]
    async fn out_of_range_rating_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        for bad in [0, 6, -1] {
            let err = create_testimonial(&db, NewTestimonial { rating: bad, ..review("A", 0) }).await.unwrap_err();
            assert!(matches!(err, ServiceError::Model(ModelError::Validation(_))), "rating {bad}");
            assert!(err.is_client_error());
        }
        assert_eq!(create_testimonial(&db, NewTestimonial { rating: 1, ..review("A", 0) }).await?.rating, 1);
        Ok(())
    }

    #[tokio::test]
    async fn ordered_by_order_then_newest_with_project_title() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let p = create_project(&db, NewProject { title: "Cuisine Moderne".into(), ..NewProject::default() }).await?;
        create_testimonial(&db, review("Ancien", 1)).await?;
        create_testimonial(&db, NewTestimonial { project_id: Some(p.id), ..review("Nouveau", 1) }).await?;
        create_testimonial(&db, review("Premier", 0)).await?;
        create_testimonial(&db, NewTestimonial { is_active: false, ..review("Inactif", 0) }).await?;

        let rows = list_testimonials(&db, true).await?;
        let names: Vec<_> = rows.iter().map(|(t, _)| t.client_name.as_str()).collect();
        assert_eq!(names, vec!["Premier", "Nouveau", "Ancien"]);
        assert_eq!(rows[1].1.as_ref().map(|p| p.title.as_str()), Some("Cuisine Moderne"));
        assert!(rows[0].1.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn update_validates_rating() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let t = create_testimonial(&db, review("A", 0)).await?;
        assert!(update_testimonial(&db, t.id, TestimonialChanges { rating: Some(9), ..Default::default() }).await.is_err());
        let t = update_testimonial(&db, t.id, TestimonialChanges { rating: Some(4), ..Default::default() }).await?;
        assert_eq!(t.rating, 4);
        Ok(())
    }
}
