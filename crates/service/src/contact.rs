//! Public contact form and its back-office status workflow.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Deserializer};
use tracing::info;
use validator::Validate;

use models::contact_message::{self, ContactStatus};

use crate::errors::{FieldErrors, ServiceError};
use crate::notify::ContactNotifier;

/// Confirmation returned to the visitor once the message is stored.
pub const CONFIRMATION_MESSAGE: &str =
    "Votre message a été envoyé avec succès. Nous vous recontacterons bientôt.";

const REQUIRED: &str = "Ce champ est obligatoire.";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactSubmission {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(max = 200))]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(email(message = "Saisissez une adresse e-mail valide."), length(max = 254))]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(max = 20))]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(max = 200))]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
}

/// Form clients send `null` for untouched optional inputs.
fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

impl ContactSubmission {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    /// Field-keyed messages, or `Ok` when the submission can be stored.
    pub fn check(&self) -> Result<(), ServiceError> {
        let mut fields = FieldErrors::new();
        if let Err(errs) = self.validate() {
            for (field, list) in errs.field_errors() {
                let msgs = fields.entry(field.to_string()).or_default();
                for e in list.iter() {
                    msgs.push(match &e.message {
                        Some(m) => m.to_string(),
                        None if e.code == "length" => max_length_message(e),
                        None => e.code.to_string(),
                    });
                }
            }
        }
        // blank required fields report "required" only, not "invalid"
        for (field, value) in [("name", &self.name), ("email", &self.email), ("message", &self.message)] {
            if value.is_empty() {
                fields.insert(field.into(), vec![REQUIRED.into()]);
            }
        }
        if fields.is_empty() { Ok(()) } else { Err(ServiceError::FieldValidation(fields)) }
    }
}

fn max_length_message(e: &validator::ValidationError) -> String {
    match e.params.get("max") {
        Some(max) => format!("Assurez-vous que ce champ comporte au plus {max} caractères."),
        None => "Longueur invalide.".to_string(),
    }
}

/// Validate, store as `new`, then fire the owner notification without waiting for it.
pub async fn submit_contact<C: ConnectionTrait>(
    db: &C,
    notifier: &ContactNotifier,
    input: ContactSubmission,
) -> Result<contact_message::Model, ServiceError> {
    let input = input.trimmed();
    input.check()?;

    let now = Utc::now().into();
    let am = contact_message::ActiveModel {
        id: NotSet,
        name: Set(input.name),
        email: Set(input.email),
        phone: Set(input.phone),
        subject: Set(input.subject),
        message: Set(input.message),
        status: Set(ContactStatus::New),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await?;
    info!(event = "contact_received", id = created.id, "contact message stored");

    // detached: the handle is dropped on purpose
    let _ = notifier.dispatch(&created);
    Ok(created)
}

/// Newest first, optionally narrowed to one status.
pub async fn list_messages<C: ConnectionTrait>(
    db: &C,
    status: Option<ContactStatus>,
) -> Result<Vec<contact_message::Model>, ServiceError> {
    let mut q = contact_message::Entity::find();
    if let Some(s) = status {
        q = q.filter(contact_message::Column::Status.eq(s));
    }
    let rows = q
        .order_by_desc(contact_message::Column::CreatedAt)
        .order_by_desc(contact_message::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn get_message<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<contact_message::Model>, ServiceError> {
    Ok(contact_message::Entity::find_by_id(id).one(db).await?)
}

pub async fn set_message_status<C: ConnectionTrait>(
    db: &C,
    id: i32,
    status: ContactStatus,
) -> Result<contact_message::Model, ServiceError> {
    let Some(existing) = get_message(db, id).await? else {
        return Err(ServiceError::not_found("contact message"));
    };
    let mut am: contact_message::ActiveModel = existing.into();
    am.status = Set(status);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    info!(id, status = %status, "contact message status changed");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::tests::Recording;
    use crate::test_support::get_db;
    use sea_orm::PaginatorTrait;
    use std::sync::Arc;

    fn valid() -> ContactSubmission {
        ContactSubmission {
            name: " Jean Dupont ".into(),
            email: "jean@example.fr".into(),
            phone: "0600000000".into(),
            subject: "Devis salle de bain".into(),
            message: "Bonjour, je souhaite un devis.".into(),
        }
    }

    #[tokio::test]
    async fn valid_submission_stored_as_new() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let msg = submit_contact(&db, &ContactNotifier::disabled(), valid()).await?;
        assert_eq!(msg.status, ContactStatus::New);
        assert_eq!(msg.name, "Jean Dupont");
        assert_eq!(contact_message::Entity::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_email_reports_field_and_stores_nothing() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = submit_contact(&db, &ContactNotifier::disabled(), ContactSubmission { email: "pas-un-email".into(), ..valid() })
            .await
            .unwrap_err();
        let ServiceError::FieldValidation(fields) = err else { panic!("expected field errors, got {err:?}") };
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("name"));
        assert_eq!(contact_message::Entity::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn whitespace_only_required_fields_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let input = ContactSubmission { name: "   ".into(), email: " ".into(), message: "\n".into(), ..valid() };
        let Err(ServiceError::FieldValidation(fields)) = submit_contact(&db, &ContactNotifier::disabled(), input).await else {
            panic!("expected field errors");
        };
        assert_eq!(fields.keys().map(String::as_str).collect::<Vec<_>>(), vec!["email", "message", "name"]);
        assert_eq!(fields["email"], vec![REQUIRED.to_string()]);
        Ok(())
    }

    #[test]
    fn overlong_phone_rejected() {
        let input = ContactSubmission { phone: "0".repeat(21), ..valid() };
        assert!(matches!(input.check(), Err(ServiceError::FieldValidation(f)) if f.contains_key("phone")));
    }

    #[tokio::test]
    async fn owner_notified_with_subject() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let rec = Arc::new(Recording::default());
        let notifier = ContactNotifier::new(rec.clone(), Some("owner@example.fr".into()), "site@example.fr");
        let msg = submit_contact(&db, &notifier, valid()).await?;

        // the detached task from submit may or may not have run yet; dispatch again and wait
        notifier.dispatch(&msg).expect("enabled").await?;
        let sent = rec.0.lock().unwrap();
        assert!(!sent.is_empty());
        assert!(sent.iter().all(|m| m.subject == "Nouveau message de contact: Devis salle de bain"));
        Ok(())
    }

    #[tokio::test]
    async fn status_workflow_and_listing() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let first = submit_contact(&db, &ContactNotifier::disabled(), valid()).await?;
        let second = submit_contact(&db, &ContactNotifier::disabled(), ContactSubmission { subject: String::new(), ..valid() }).await?;

        let all: Vec<_> = list_messages(&db, None).await?.into_iter().map(|m| m.id).collect();
        assert_eq!(all, vec![second.id, first.id]);

        set_message_status(&db, first.id, ContactStatus::Replied).await?;
        let replied = list_messages(&db, Some(ContactStatus::Replied)).await?;
        assert_eq!(replied.len(), 1);
        assert_eq!(replied[0].id, first.id);

        assert!(matches!(set_message_status(&db, 999, ContactStatus::Read).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
