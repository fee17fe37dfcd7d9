use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Aggregated keyword frequency for one user. Written only by the aggregator.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "keyword_count")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,

    /// Keyword with `/` replaced by `_`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub keyword_key: String,

    pub keyword: String,

    pub count: i64,
}

impl ActiveModelBehavior for ActiveModel {}
