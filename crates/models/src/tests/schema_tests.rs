use anyhow::Result;
use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, Set};

use crate::contact_message::ContactStatus;
use crate::{contact_message, db, project, service};

async fn migrated() -> Result<DatabaseConnection> {
    let db = db::connect_sqlite_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn new_service(slug: &str) -> service::ActiveModel {
    let now = Utc::now().into();
    service::ActiveModel {
        id: NotSet,
        title: Set("Plomberie".into()),
        slug: Set(slug.into()),
        description: Set("desc".into()),
        short_description: Set(String::new()),
        icon: Set(service::DEFAULT_ICON.into()),
        image: Set(String::new()),
        order: Set(1),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[tokio::test]
async fn project_loads_its_service() -> Result<()> {
    let db = migrated().await?;
    let s = new_service("plomberie").insert(&db).await?;

    let now = Utc::now().into();
    let p = project::ActiveModel {
        id: NotSet,
        title: Set("Cuisine".into()),
        slug: Set("cuisine".into()),
        description: Set("desc".into()),
        short_description: Set(String::new()),
        location: Set("Lattes".into()),
        completion_date: Set(chrono::NaiveDate::from_ymd_opt(2024, 9, 15)),
        duration: Set(String::new()),
        surface: Set(String::new()),
        service_id: Set(Some(s.id)),
        featured_image: Set(String::new()),
        before_image: Set(None),
        has_before_after: Set(false),
        is_featured: Set(true),
        is_active: Set(true),
        order: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    let rows = project::Entity::find_by_id(p.id).find_also_related(service::Entity).all(&db).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1.as_ref().map(|s| s.slug.as_str()), Some("plomberie"));
    assert_eq!(rows[0].0.completion_date, chrono::NaiveDate::from_ymd_opt(2024, 9, 15));
    Ok(())
}

#[tokio::test]
async fn duplicate_service_slug_rejected_by_schema() -> Result<()> {
    let db = migrated().await?;
    new_service("cuisine").insert(&db).await?;
    assert!(new_service("cuisine").insert(&db).await.is_err());
    Ok(())
}

#[tokio::test]
async fn contact_status_stored_as_text() -> Result<()> {
    let db = migrated().await?;
    let now = Utc::now().into();
    let m = contact_message::ActiveModel {
        id: NotSet,
        name: Set("Jean".into()),
        email: Set("jean@example.com".into()),
        phone: Set(String::new()),
        subject: Set(String::new()),
        message: Set("Bonjour".into()),
        status: Set(ContactStatus::New),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;
    let found = contact_message::Entity::find_by_id(m.id).one(&db).await?.expect("row");
    assert_eq!(found.status, ContactStatus::New);
    Ok(())
}
