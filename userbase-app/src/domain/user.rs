use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use userbase_errors::AppError;
use uuid::Uuid;

/// A stored user record as returned by create, update and read-all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub is_active: bool,
    /// Relative storage path of the avatar, or empty when none was uploaded.
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-all entry: the full record, plus `imageUrl` when it has an avatar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListItem {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Read-one projection. The raw storage path is never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub is_active: bool,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub is_active: bool,
    pub avatar: String,
}

/// Fields to overwrite on update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub deleted_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCheck {
    pub exists: bool,
}

/// Raw text fields of a create/update request, as sent by the client.
///
/// Unknown field names are dropped; every value stays a string until it is
/// validated into a [`NewUser`] or a [`UserPatch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<String>,
}

const REQUIRED: [&str; 4] = ["firstName", "lastName", "phoneNumber", "email"];

impl UserFields {
    /// Records a field by its wire name. Returns false for unknown names.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "phoneNumber" => &mut self.phone_number,
            "email" => &mut self.email,
            "isActive" => &mut self.is_active,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Whether `name` is one of the wire names [`UserFields::set`] records.
    pub fn is_field(name: &str) -> bool {
        matches!(
            name,
            "firstName" | "lastName" | "phoneNumber" | "email" | "isActive"
        )
    }

    fn get(&self, name: &str) -> Option<&String> {
        match name {
            "firstName" => self.first_name.as_ref(),
            "lastName" => self.last_name.as_ref(),
            "phoneNumber" => self.phone_number.as_ref(),
            "email" => self.email.as_ref(),
            "isActive" => self.is_active.as_ref(),
            _ => None,
        }
    }

    pub fn into_new_user(self, avatar: String) -> Result<NewUser, AppError> {
        let missing: Vec<&str> = REQUIRED
            .iter()
            .copied()
            .filter(|name| self.get(name).map_or(true, |v| v.trim().is_empty()))
            .collect();
        if !missing.is_empty() {
            return Err(validation_failed(&missing, "is required"));
        }

        let is_active = match self.is_active.as_deref() {
            Some(raw) => parse_bool(raw)?,
            None => true,
        };

        Ok(NewUser {
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            phone_number: self.phone_number.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            is_active,
            avatar,
        })
    }

    pub fn into_patch(self) -> Result<UserPatch, AppError> {
        let blank: Vec<&str> = REQUIRED
            .iter()
            .copied()
            .filter(|name| self.get(name).is_some_and(|v| v.trim().is_empty()))
            .collect();
        if !blank.is_empty() {
            return Err(validation_failed(&blank, "cannot be empty"));
        }

        let is_active = self.is_active.as_deref().map(parse_bool).transpose()?;

        Ok(UserPatch {
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            email: self.email,
            is_active,
            avatar: None,
        })
    }
}

fn validation_failed(fields: &[&str], reason: &str) -> AppError {
    let details = fields
        .iter()
        .map(|f| format!("{} {}", f, reason))
        .collect::<Vec<_>>()
        .join(", ");
    AppError::Validation(format!("User validation failed: {}", details))
}

fn parse_bool(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "User validation failed: isActive must be a boolean, got {:?}",
            raw
        ))),
    }
}
