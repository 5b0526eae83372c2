use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserStates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserStates::ChatId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserStates::State).string().not_null())
                    .col(ColumnDef::new(UserStates::Payload).text().null())
                    .col(ColumnDef::new(UserStates::UpdatedAt).date_time().not_null())
                    .col(ColumnDef::new(UserStates::RemindedAt).date_time().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_states_state_updated_at")
                    .table(UserStates::Table)
                    .col(UserStates::State)
                    .col(UserStates::UpdatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserStates::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserStates {
    Table,
    ChatId,
    State,
    Payload,
    UpdatedAt,
    RemindedAt,
}
