use chrono::Utc;
use sea_orm::{prelude::*, sea_query::OnConflict, ActiveValue, PaginatorTrait, QueryOrder};

use super::Storage;
use crate::{
    entity::{applications, users},
    errors::Result,
    types::Sender,
};

impl Storage {
    /// Inserts the user or refreshes their names and activity time. The
    /// internal id survives repeated calls.
    pub async fn upsert_user(&self, sender: &Sender) -> Result<()> {
        let now = Utc::now().naive_utc();
        users::Entity::insert(users::ActiveModel {
            telegram_id: ActiveValue::Set(sender.id),
            username: ActiveValue::Set(sender.username.clone()),
            first_name: ActiveValue::Set(sender.first_name.clone()),
            last_name: ActiveValue::Set(sender.last_name.clone()),
            created_at: ActiveValue::Set(now),
            last_activity: ActiveValue::Set(now),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(users::Column::TelegramId)
                .update_columns([
                    users::Column::Username,
                    users::Column::FirstName,
                    users::Column::LastName,
                    users::Column::LastActivity,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.connection)
        .await?;

        Ok(())
    }

    pub async fn get_user(&self, telegram_id: i64) -> Result<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::TelegramId.eq(telegram_id))
            .one(&self.connection)
            .await?)
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<users::Model>> {
        Ok(users::Entity::find_by_id(id).one(&self.connection).await?)
    }

    pub async fn list_users(&self) -> Result<Vec<users::Model>> {
        Ok(users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.connection)
            .await?)
    }

    pub async fn count_users(&self) -> Result<u64> {
        Ok(users::Entity::find().count(&self.connection).await?)
    }

    /// Most recently active first.
    pub async fn list_users_without_applications(&self) -> Result<Vec<users::Model>> {
        Ok(users::Entity::find()
            .left_join(applications::Entity)
            .filter(applications::Column::Id.is_null())
            .order_by_desc(users::Column::LastActivity)
            .order_by_desc(users::Column::Id)
            .all(&self.connection)
            .await?)
    }
}
