//! Credential store adapter.
//!
//! Lookups return `Ok(None)` when no record matches; absence is an expected
//! outcome for every caller.

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter,
};
use uuid::Uuid;

use crate::entity::user;

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find_by_id(id).one(db).await
}

pub async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
}

pub async fn find_by_google_id<C: ConnectionTrait>(
    db: &C,
    google_id: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::GoogleId.eq(google_id))
        .one(db)
        .await
}

/// Default display name: the local part of the email address.
pub fn default_username(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

/// Fields for a user record that does not exist yet.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: String,
    pub username: Option<String>,
    pub google_id: Option<String>,
    pub profile_pic_url: Option<String>,
    pub password_hash: Option<String>,
}

/// Insert a new user record with a fresh opaque ID.
pub async fn create<C: ConnectionTrait>(db: &C, new_user: NewUser) -> Result<user::Model, DbErr> {
    let username = new_user
        .username
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| default_username(&new_user.email));

    let model = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(new_user.email),
        username: Set(username),
        google_id: Set(new_user.google_id),
        profile_pic_url: Set(new_user.profile_pic_url),
        password_hash: Set(new_user.password_hash),
        created_at: Set(chrono::Utc::now()),
    };

    model.insert(db).await
}

/// Overwrite an existing user record with `user`.
pub async fn save<C: ConnectionTrait>(db: &C, user: user::Model) -> Result<user::Model, DbErr> {
    let model = user::ActiveModel {
        id: Set(user.id),
        email: Set(user.email),
        username: Set(user.username),
        google_id: Set(user.google_id),
        profile_pic_url: Set(user.profile_pic_url),
        password_hash: Set(user.password_hash),
        created_at: Set(user.created_at),
    };

    model.update(db).await
}
