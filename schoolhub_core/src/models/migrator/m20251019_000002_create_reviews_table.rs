use sea_orm_migration::{prelude::*, schema::*};

use super::m20251019_000001_create_schools_table::School;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .col(pk_auto(Review::Id))
                    .col(integer(Review::SchoolId))
                    .col(integer(Review::Rating).check(Expr::col(Review::Rating).between(1, 5)))
                    .col(text_null(Review::Review))
                    .col(string(Review::ReviewerName).default("Anonymous"))
                    .col(string_null(Review::ReviewerEmail))
                    .col(string(Review::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-review-school_id")
                            .from(Review::Table, Review::SchoolId)
                            .to(School::Table, School::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Aggregate recompute and per-school listing
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_school_id")
                    .table(Review::Table)
                    .col(Review::SchoolId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Review {
    #[sea_orm(iden = "reviews")]
    Table,
    Id,
    SchoolId,
    Rating,
    Review,
    ReviewerName,
    ReviewerEmail,
    CreatedAt,
}
