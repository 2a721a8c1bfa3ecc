use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContactSubmission::Table)
                    .col(pk_auto(ContactSubmission::Id))
                    .col(string(ContactSubmission::Name))
                    .col(string(ContactSubmission::Email))
                    .col(string_null(ContactSubmission::Subject))
                    .col(text(ContactSubmission::Message))
                    .col(string_null(ContactSubmission::Phone))
                    .col(string(ContactSubmission::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContactSubmission::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ContactSubmission {
    #[sea_orm(iden = "contact_submissions")]
    Table,
    Id,
    Name,
    Email,
    Subject,
    Message,
    Phone,
    CreatedAt,
}
