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
                    .as_enum(RideType::Enum)
                    .values([RideType::Car, RideType::Bike, RideType::Logistics])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(RideStatus::Enum)
                    .values([RideStatus::Active, RideStatus::Closed])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ride::Table)
                    .if_not_exists()
                    .col(pk_auto(Ride::Id))
                    .col(uuid(Ride::UserId).not_null())
                    .col(
                        ColumnDef::new(Ride::RideType)
                            .custom(RideType::Enum)
                            .not_null(),
                    )
                    .col(string_len(Ride::SourceCity, 100).not_null())
                    .col(string_len(Ride::DestinationCity, 100).not_null())
                    .col(timestamp_with_time_zone(Ride::DepartureTime).not_null())
                    .col(timestamp_with_time_zone_null(Ride::ArrivalTime))
                    .col(string_len(Ride::VehicleType, 50).not_null())
                    .col(string_len(Ride::VehicleNumber, 20).not_null())
                    .col(integer(Ride::AvailableCapacity).not_null())
                    .col(decimal_len(Ride::PricePerUnit, 10, 2).not_null())
                    .col(text_null(Ride::AdditionalInfo))
                    .col(string_len(Ride::ContactNumber, 20).not_null())
                    .col(string_len(Ride::PreferredLanguage, 30).not_null())
                    .col(
                        ColumnDef::new(Ride::Status)
                            .custom(RideStatus::Enum)
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Ride::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ride_user")
                            .from(Ride::Table, Ride::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ride::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(RideStatus::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(RideType::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Ride {
    Table,
    Id,
    UserId,
    RideType,
    SourceCity,
    DestinationCity,
    DepartureTime,
    ArrivalTime,
    VehicleType,
    VehicleNumber,
    AvailableCapacity,
    PricePerUnit,
    AdditionalInfo,
    ContactNumber,
    PreferredLanguage,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum RideType {
    #[sea_orm(iden = "ride_type")]
    Enum,
    #[sea_orm(iden = "car")]
    Car,
    #[sea_orm(iden = "bike")]
    Bike,
    #[sea_orm(iden = "logistics")]
    Logistics,
}

#[derive(DeriveIden)]
pub enum RideStatus {
    #[sea_orm(iden = "ride_status")]
    Enum,
    #[sea_orm(iden = "active")]
    Active,
    #[sea_orm(iden = "closed")]
    Closed,
}
