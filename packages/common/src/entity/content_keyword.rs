use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Keyword membership index over `content_metadata.summary_content`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_keyword")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub metadata_id: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub keyword: String,
}

impl ActiveModelBehavior for ActiveModel {}
