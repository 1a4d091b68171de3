use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create transactions table
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_auto(Transactions::Id))
                    .col(integer(Transactions::OwnerId))
                    .col(string_len(Transactions::Kind, 7))
                    .col(decimal_len(Transactions::Amount, 10, 2))
                    .col(date(Transactions::Date))
                    .col(string_len_null(Transactions::Memo, 50))
                    .col(timestamp_with_time_zone(Transactions::CreatedAt))
                    .col(timestamp_with_time_zone(Transactions::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_owner")
                            .from(Transactions::Table, Transactions::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for the per-owner date-range queries the summary runs
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_owner_date")
                    .table(Transactions::Table)
                    .col(Transactions::OwnerId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        // Create recurring_rules table
        manager
            .create_table(
                Table::create()
                    .table(RecurringRules::Table)
                    .if_not_exists()
                    .col(pk_auto(RecurringRules::Id))
                    .col(integer(RecurringRules::OwnerId))
                    .col(string_len(RecurringRules::Kind, 7))
                    .col(decimal_len(RecurringRules::Amount, 10, 2))
                    .col(string_len_null(RecurringRules::Memo, 100))
                    .col(string_len(RecurringRules::Cadence, 7))
                    .col(date(RecurringRules::StartDate))
                    .col(date_null(RecurringRules::EndDate))
                    .col(date_null(RecurringRules::LastGeneratedAt))
                    .col(boolean(RecurringRules::IsActive).default(true))
                    .col(timestamp_with_time_zone(RecurringRules::CreatedAt))
                    .col(timestamp_with_time_zone(RecurringRules::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_rule_owner")
                            .from(RecurringRules::Table, RecurringRules::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecurringRules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    OwnerId,
    Kind,
    Amount,
    Date,
    Memo,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RecurringRules {
    Table,
    Id,
    OwnerId,
    Kind,
    Amount,
    Memo,
    Cadence,
    StartDate,
    EndDate,
    LastGeneratedAt,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
