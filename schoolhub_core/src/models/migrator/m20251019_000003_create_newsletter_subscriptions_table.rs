use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NewsletterSubscription::Table)
                    .col(pk_auto(NewsletterSubscription::Id))
                    .col(string_uniq(NewsletterSubscription::Email))
                    .col(string(NewsletterSubscription::Status).default("active"))
                    .col(string(NewsletterSubscription::SubscribedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NewsletterSubscription::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum NewsletterSubscription {
    #[sea_orm(iden = "newsletter_subscriptions")]
    Table,
    Id,
    Email,
    Status,
    SubscribedAt,
}
