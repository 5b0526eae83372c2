use chrono::Utc;
use sea_orm::{prelude::*, sea_query::Expr, ActiveValue, PaginatorTrait, QueryOrder, QuerySelect};

use super::Storage;
use crate::{entity::applications, errors::Result, types::ApplicationStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub name: String,
    pub phone: String,
    pub additional_info: String,
}

impl Storage {
    pub async fn create_application(
        &self,
        user_id: i32,
        application: NewApplication,
        status: ApplicationStatus,
    ) -> Result<applications::Model> {
        let model = applications::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(application.name),
            phone: ActiveValue::Set(application.phone),
            additional_info: ActiveValue::Set(application.additional_info),
            status: ActiveValue::Set(status.as_str().to_string()),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        Ok(model.insert(&self.connection).await?)
    }

    pub async fn get_application(&self, id: i32) -> Result<Option<applications::Model>> {
        Ok(applications::Entity::find_by_id(id).one(&self.connection).await?)
    }

    /// Newest first.
    pub async fn list_applications(&self, limit: u64) -> Result<Vec<applications::Model>> {
        Ok(applications::Entity::find()
            .order_by_desc(applications::Column::CreatedAt)
            .order_by_desc(applications::Column::Id)
            .limit(limit)
            .all(&self.connection)
            .await?)
    }

    pub async fn count_applications(&self) -> Result<u64> {
        Ok(applications::Entity::find().count(&self.connection).await?)
    }

    /// Returns whether a row was actually removed.
    pub async fn delete_application(&self, id: i32) -> Result<bool> {
        let result = applications::Entity::delete_by_id(id)
            .exec(&self.connection)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Returns whether a row was actually updated.
    pub async fn update_application_status(&self, id: i32, status: ApplicationStatus) -> Result<bool> {
        let result = applications::Entity::update_many()
            .col_expr(
                applications::Column::Status,
                Expr::value(status.as_str().to_string()),
            )
            .filter(applications::Column::Id.eq(id))
            .exec(&self.connection)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
