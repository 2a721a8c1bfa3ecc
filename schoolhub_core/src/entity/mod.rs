// SeaORM entities
// One module per table created by `models::migrator`

pub mod contact_submission;
pub mod newsletter_subscription;
pub mod review;
pub mod school;


pub mod prelude {
    // Re-export all entities for convenience
    pub use super::contact_submission::{
        ActiveModel as ContactSubmissionActiveModel, Column as ContactSubmissionColumn,
        Entity as ContactSubmission, Model as ContactSubmissionModel,
    };
    pub use super::newsletter_subscription::{
        ActiveModel as NewsletterSubscriptionActiveModel,
        Column as NewsletterSubscriptionColumn, Entity as NewsletterSubscription,
        Model as NewsletterSubscriptionModel, SubscriptionStatus,
    };
    pub use super::review::{
        ActiveModel as ReviewActiveModel, Column as ReviewColumn, Entity as Review,
        Model as ReviewModel,
    };
    pub use super::school::{
        ActiveModel as SchoolActiveModel, Board, Column as SchoolColumn, Entity as School,
        GenderType, Model as SchoolModel,
    };

    // Re-export commonly used SeaORM types and traits
    pub use sea_orm::{
        ActiveModelTrait,
        ActiveValue,

        ColumnTrait,
        Condition,
        ConnectionTrait,

        // Database and connection types
        Database,
        DatabaseConnection,
        DatabaseTransaction,
        DbConn,
        // Common result types
        DbErr,

        // Core traits
        EntityTrait,
        ModelTrait,
        NotSet,
        PaginatorTrait,
        QueryFilter,
        QueryOrder,
        QuerySelect,
        // Active model helpers
        Set,
        TransactionTrait,
    };
}
