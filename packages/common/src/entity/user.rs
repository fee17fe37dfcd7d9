use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Credential record for one user.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Namespace root in the blob store and owner key in the metadata index.
    #[sea_orm(unique)]
    pub email: String,

    pub username: String,

    #[sea_orm(unique)]
    pub google_id: Option<String>,

    pub profile_pic_url: Option<String>,

    /// Argon2 PHC string. `None` for accounts created through Google sign-in.
    pub password_hash: Option<String>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
