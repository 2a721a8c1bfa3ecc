use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(School::Table)
                    .col(pk_auto(School::Id))
                    .col(string(School::Name))
                    .col(string(School::Address))
                    .col(string(School::City))
                    .col(string(School::State))
                    .col(string(School::Contact))
                    .col(string_null(School::Image))
                    .col(string(School::EmailId))
                    .col(string(School::Board).default("CBSE"))
                    .col(string(School::GenderType).default("Co-Education"))
                    .col(integer_null(School::EstablishedYear))
                    .col(string_null(School::Website))
                    .col(text_null(School::Description))
                    .col(string_null(School::FeesRange))
                    .col(double(School::Rating).default(0.0))
                    .col(integer(School::TotalReviews).default(0))
                    .col(string(School::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Exact-match filters
        manager
            .create_index(
                Index::create()
                    .name("idx_schools_city")
                    .table(School::Table)
                    .col(School::City)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schools_board")
                    .table(School::Table)
                    .col(School::Board)
                    .to_owned(),
            )
            .await?;

        // Top-rated listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_schools_rating")
                    .table(School::Table)
                    .col(School::Rating)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(School::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum School {
    #[sea_orm(iden = "schools")]
    Table,
    Id,
    Name,
    Address,
    City,
    State,
    Contact,
    Image,
    EmailId,
    Board,
    GenderType,
    EstablishedYear,
    Website,
    Description,
    FeesRange,
    Rating,
    TotalReviews,
    CreatedAt,
}
