use chrono::Utc;
use sea_orm::{prelude::*, ActiveValue};

use super::Storage;
use crate::{entity::broadcasts, errors::Result};

impl Storage {
    /// Audit trail only; nothing reads these back.
    pub async fn record_broadcast(&self, message: &str, sent_count: usize) -> Result<()> {
        broadcasts::ActiveModel {
            message: ActiveValue::Set(message.to_string()),
            sent_count: ActiveValue::Set(sent_count as i32),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.connection)
        .await?;
        Ok(())
    }
}
