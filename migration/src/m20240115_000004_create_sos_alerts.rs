use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20240115_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(AlertStatus::Enum)
                    .values([AlertStatus::Active, AlertStatus::Resolved])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SosAlert::Table)
                    .if_not_exists()
                    .col(pk_auto(SosAlert::Id))
                    .col(uuid(SosAlert::UserId).not_null())
                    .col(double(SosAlert::Latitude).not_null())
                    .col(double(SosAlert::Longitude).not_null())
                    .col(text_null(SosAlert::Address))
                    .col(
                        ColumnDef::new(SosAlert::Status)
                            .custom(AlertStatus::Enum)
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(SosAlert::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sos_alert_user")
                            .from(SosAlert::Table, SosAlert::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SosAlert::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(AlertStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SosAlert {
    Table,
    Id,
    UserId,
    Latitude,
    Longitude,
    Address,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum AlertStatus {
    #[sea_orm(iden = "alert_status")]
    Enum,
    #[sea_orm(iden = "active")]
    Active,
    #[sea_orm(iden = "resolved")]
    Resolved,
}
