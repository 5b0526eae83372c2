use chrono::{NaiveDateTime, Utc};
use sea_orm::{prelude::*, sea_query::{Expr, OnConflict}, ActiveValue};

use super::Storage;
use crate::{
    entity::user_states,
    errors::Result,
    types::{BotDialogState, FORM_STATE_TAGS},
};

/// A form left unfinished for longer than the staleness threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleForm {
    pub chat_id: i64,
    pub state: BotDialogState,
    pub updated_at: NaiveDateTime,
}

impl Storage {
    pub async fn get_state(&self, chat_id: i64) -> Result<Option<BotDialogState>> {
        let row = user_states::Entity::find_by_id(chat_id)
            .one(&self.connection)
            .await?;
        row.map(|row| BotDialogState::decode(&row.state, row.payload.as_deref()))
            .transpose()
    }

    /// Overwrites the user's state and re-arms the reminder.
    pub async fn set_state(&self, chat_id: i64, state: &BotDialogState) -> Result<()> {
        let (tag, payload) = state.encode()?;
        user_states::Entity::insert(user_states::ActiveModel {
            chat_id: ActiveValue::Set(chat_id),
            state: ActiveValue::Set(tag.to_string()),
            payload: ActiveValue::Set(payload),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            reminded_at: ActiveValue::Set(None),
        })
        .on_conflict(
            OnConflict::column(user_states::Column::ChatId)
                .update_columns([
                    user_states::Column::State,
                    user_states::Column::Payload,
                    user_states::Column::UpdatedAt,
                    user_states::Column::RemindedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.connection)
        .await?;

        Ok(())
    }

    pub async fn clear_state(&self, chat_id: i64) -> Result<()> {
        user_states::Entity::delete_by_id(chat_id)
            .exec(&self.connection)
            .await?;
        Ok(())
    }

    /// Form states untouched since `older_than` that have not been reminded
    /// about yet. Rows that no longer decode are skipped.
    pub async fn list_stale_form_states(&self, older_than: NaiveDateTime) -> Result<Vec<StaleForm>> {
        let rows = user_states::Entity::find()
            .filter(user_states::Column::State.is_in(FORM_STATE_TAGS))
            .filter(user_states::Column::UpdatedAt.lt(older_than))
            .filter(user_states::Column::RemindedAt.is_null())
            .all(&self.connection)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match BotDialogState::decode(&row.state, row.payload.as_deref()) {
                Ok(state) => Some(StaleForm {
                    chat_id: row.chat_id,
                    state,
                    updated_at: row.updated_at,
                }),
                Err(err) => {
                    log::warn!("Skipping undecodable state of {}: {}", row.chat_id, err);
                    None
                }
            })
            .collect())
    }

    /// Marks the reminded step only. If the user has moved on since `form` was
    /// read, the newer step stays eligible. Leaves `updated_at` alone so the
    /// reminder does not count as progress.
    pub async fn mark_reminded(&self, form: &StaleForm) -> Result<bool> {
        let result = user_states::Entity::update_many()
            .col_expr(
                user_states::Column::RemindedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(user_states::Column::ChatId.eq(form.chat_id))
            .filter(user_states::Column::State.eq(form.state.tag()))
            .filter(user_states::Column::UpdatedAt.lte(form.updated_at))
            .exec(&self.connection)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
