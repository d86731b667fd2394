//! Create `product` table.
//!
//! Ids are assigned by the service (six digits), never by the database.
//! `version` backs optimistic concurrency on full-record replace.
//! Price precision stays at 16 digits, the most SQLite's decimal affinity accepts.
use sea_orm_migration::prelude::*;

pub const PRICE_PRECISION: u32 = 16;
pub const PRICE_SCALE: u32 = 2;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Product::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Product::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Product::Description).string_len(500).null())
                    .col(ColumnDef::new(Product::Price).decimal_len(PRICE_PRECISION, PRICE_SCALE).not_null())
                    .col(ColumnDef::new(Product::StockAvailable).integer().not_null())
                    .col(ColumnDef::new(Product::Version).integer().not_null().default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product { Table, Id, Name, Description, Price, StockAvailable, Version }
