//! User Service
//!
//! Account CRUD. Passwords are hashed on write and never returned; the
//! default accounts can't be deleted and keep their credentials on update.

use serde_json::Value;

use super::auth_service::hash_password;
use super::record_service::{check, RecordError, RecordService, Upserted};
use crate::config::UserSettings;
use crate::domain::{Collection, StoreError, User};
use crate::shared::json::{document_id, redact_password};

pub struct UserService {
    records: RecordService,
    protection: UserSettings,
}

impl UserService {
    pub fn new(records: RecordService, protection: UserSettings) -> Self {
        Self { records, protection }
    }

    pub async fn list(&self, filters: &[(String, String)]) -> Result<Vec<Value>, RecordError> {
        let users = self.records.list(Collection::Users, filters).await?;
        Ok(users.into_iter().map(redact_password).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Value, RecordError> {
        Ok(redact_password(self.records.get(Collection::Users, id).await?))
    }

    pub async fn create(&self, mut user: User) -> Result<Value, RecordError> {
        check(&user)?;
        user.password = Some(self.new_password(user.password.take())?);
        self.ensure_email_free(&user, None).await?;

        let created = self.records.create(user).await?;
        tracing::info!(id = ?created.get("id"), "User created");
        Ok(redact_password(created))
    }

    /// Update-or-create. A missing password keeps the stored one; default
    /// accounts keep email, password and role whatever the body says.
    ///
    /// The stored row is handled as raw JSON so a row that no longer decodes
    /// (unknown role, odd field types) can still be overwritten.
    pub async fn upsert(&self, id: &str, mut user: User) -> Result<Upserted, RecordError> {
        let Some(stored) = self.records.lookup(Collection::Users, id).await? else {
            check(&user)?;
            user.password = Some(self.new_password(user.password.take())?);
            self.ensure_email_free(&user, Some(id)).await?;
            return Ok(self.records.upsert(id, user).await?.map(redact_password));
        };

        let stored_email = stored_str(&stored, "email");
        if self.protection.is_protected(Some(id), stored_email) {
            tracing::info!(id = %id, "Default user updated; credentials preserved");
            check(&user)?;
            let mut doc = to_document(&user)?;
            for field in CREDENTIAL_FIELDS {
                keep_stored(&mut doc, &stored, field);
            }
            return Ok(self
                .records
                .upsert_document(Collection::Users, id, doc)
                .await?
                .map(redact_password));
        }

        let email_changed = user.normalized_email() != stored_email.map(|e| e.trim().to_lowercase());
        user.password = match user.password.take() {
            Some(password) if !password.is_empty() => Some(hash_password(&password).map_err(internal)?),
            _ => stored_str(&stored, "password").map(str::to_string),
        };
        if email_changed {
            self.ensure_email_free(&user, Some(id)).await?;
        }

        Ok(self.records.upsert(id, user).await?.map(redact_password))
    }

    pub async fn delete(&self, id: &str) -> Result<(), RecordError> {
        if self.protection.is_protected(Some(id), None) {
            return Err(forbidden(id));
        }

        let stored = self.records.get(Collection::Users, id).await?;
        if self.protection.is_protected(None, stored_str(&stored, "email")) {
            return Err(forbidden(id));
        }

        self.records.delete(Collection::Users, id).await
    }

    fn new_password(&self, password: Option<String>) -> Result<String, RecordError> {
        match password {
            Some(password) if !password.is_empty() => hash_password(&password).map_err(internal),
            _ => Err(RecordError::MissingField("password")),
        }
    }

    /// 409 when another account already uses the email.
    async fn ensure_email_free(&self, user: &User, own_id: Option<&str>) -> Result<(), RecordError> {
        let Some(email) = user.normalized_email() else {
            return Ok(());
        };

        let users = self.records.list(Collection::Users, &[]).await?;
        let taken = users.iter().any(|doc| {
            let same_email = doc
                .get("email")
                .and_then(Value::as_str)
                .is_some_and(|e| e.trim().eq_ignore_ascii_case(&email));
            let other = document_id(doc).as_deref() != own_id;
            same_email && other
        });

        if taken {
            return Err(RecordError::Conflict(format!("Email {} is already registered", email)));
        }
        Ok(())
    }
}

/// Fields a default account never takes from an update body
const CREDENTIAL_FIELDS: [&str; 3] = ["email", "password", "role"];

fn stored_str<'a>(stored: &'a Value, field: &str) -> Option<&'a str> {
    stored.get(field).and_then(Value::as_str)
}

fn to_document(user: &User) -> Result<Value, RecordError> {
    Ok(serde_json::to_value(user).map_err(StoreError::from)?)
}

/// Copy `field` from the stored row, dropping it when the row has none.
fn keep_stored(doc: &mut Value, stored: &Value, field: &str) {
    let Value::Object(fields) = doc else {
        return;
    };
    match stored.get(field) {
        Some(value) => {
            fields.insert(field.to_string(), value.clone());
        }
        None => {
            fields.remove(field);
        }
    }
}

fn forbidden(id: &str) -> RecordError {
    RecordError::Forbidden(format!("User {} is a default account and cannot be deleted", id))
}

fn internal(e: impl std::fmt::Display) -> RecordError {
    RecordError::Internal(e.to_string())
}
