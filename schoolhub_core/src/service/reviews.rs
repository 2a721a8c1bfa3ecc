use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    entity::prelude::*,
    ids::SchoolId,
    service::{looks_like_email, non_blank, rounded_mean, Pagination},
};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;
pub const ANONYMOUS_REVIEWER: &str = "Anonymous";

/// Reviews per page when the client doesn't ask for a size.
pub const DEFAULT_REVIEW_LIMIT: u64 = 10;

#[derive(Debug, Error)]
pub enum ReviewsServiceError {
    #[error("database error: {0}")]
    DbError(#[from] DbErr),

    #[error("school not found")]
    SchoolNotFound,

    #[error("rating is required")]
    MissingRating,

    #[error("rating must be between 1 and 5")]
    InvalidRating,

    #[error("reviewer_email must be a valid email address")]
    InvalidEmail,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReview {
    pub rating: Option<i64>,
    pub review: Option<String>,
    pub reviewer_name: Option<String>,
    pub reviewer_email: Option<String>,
}

/// The stored review and the school aggregate it produced.
#[derive(Debug, Clone, Serialize)]
pub struct SubmittedReview {
    pub review: ReviewModel,
    pub rating: f64,
    pub total_reviews: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewPage {
    pub reviews: Vec<ReviewModel>,
    pub total: u64,
    pub page: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

fn validate_rating(rating: Option<i64>) -> Result<i32, ReviewsServiceError> {
    let rating = rating.ok_or(ReviewsServiceError::MissingRating)?;

    i32::try_from(rating)
        .ok()
        .filter(|rating| (MIN_RATING..=MAX_RATING).contains(rating))
        .ok_or(ReviewsServiceError::InvalidRating)
}

#[derive(Clone)]
pub struct ReviewsService {
    db: DatabaseConnection,
}

impl ReviewsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append a review and recompute the school's rating and review count
    /// from all of its reviews, atomically.
    pub async fn submit(
        &self,
        school_id: SchoolId,
        new_review: NewReview,
    ) -> Result<SubmittedReview, ReviewsServiceError> {
        let rating = validate_rating(new_review.rating)?;

        let reviewer_email = non_blank(new_review.reviewer_email.as_deref());
        if reviewer_email.is_some_and(|email| !looks_like_email(email)) {
            return Err(ReviewsServiceError::InvalidEmail);
        }

        let txn = self.db.begin().await?;

        let school = School::find_by_id(school_id)
            .one(&txn)
            .await?
            .ok_or(ReviewsServiceError::SchoolNotFound)?;

        let review = ReviewActiveModel {
            school_id: Set(school_id),
            rating: Set(rating),
            review: Set(non_blank(new_review.review.as_deref()).map(str::to_string)),
            reviewer_name: Set(non_blank(new_review.reviewer_name.as_deref())
                .unwrap_or(ANONYMOUS_REVIEWER)
                .to_string()),
            reviewer_email: Set(reviewer_email.map(str::to_string)),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let review = Review::insert(review).exec_with_returning(&txn).await?;

        // Full recompute, never incremental
        let ratings = Review::find()
            .select_only()
            .column(ReviewColumn::Rating)
            .filter(ReviewColumn::SchoolId.eq(school_id))
            .into_tuple::<i32>()
            .all(&txn)
            .await?;

        let mut school: SchoolActiveModel = school.into();
        school.rating = Set(rounded_mean(&ratings));
        school.total_reviews = Set(ratings.len() as i32);
        let school = school.update(&txn).await?;

        txn.commit().await?;

        info!(
            "Review {} added to school {school_id}, rating now {} over {}",
            review.id, school.rating, school.total_reviews
        );

        Ok(SubmittedReview {
            review,
            rating: school.rating,
            total_reviews: school.total_reviews,
        })
    }

    /// Reviews for a school, newest first
    pub async fn list(
        &self,
        school_id: SchoolId,
        pagination: Pagination,
    ) -> Result<ReviewPage, ReviewsServiceError> {
        let txn = self.db.begin().await?;

        let school_exists = School::find_by_id(school_id).one(&txn).await?.is_some();
        if !school_exists {
            return Err(ReviewsServiceError::SchoolNotFound);
        }

        let total = Review::find()
            .filter(ReviewColumn::SchoolId.eq(school_id))
            .count(&txn)
            .await?;

        let reviews = Review::find()
            .filter(ReviewColumn::SchoolId.eq(school_id))
            .order_by_desc(ReviewColumn::CreatedAt)
            .order_by_desc(ReviewColumn::Id)
            .limit(pagination.limit)
            .offset(pagination.offset())
            .all(&txn)
            .await?;

        txn.commit().await?;

        Ok(ReviewPage {
            reviews,
            total,
            page: pagination.page,
            total_pages: pagination.total_pages(total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_school, setup_test_db};

    async fn setup_test_service() -> (ReviewsService, SchoolModel) {
        let db = setup_test_db().await;
        let school = insert_school(&db, "Oak Hall", "Lucknow", Board::Cbse, GenderType::CoEducation).await;
        (ReviewsService::new(db), school)
    }

    fn rated(rating: i64) -> NewReview {
        NewReview {
            rating: Some(rating),
            ..Default::default()
        }
    }

    async fn reload(service: &ReviewsService, id: SchoolId) -> SchoolModel {
        School::find_by_id(id).one(&service.db).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_rating_bounds() {
        let (service, school) = setup_test_service().await;

        for bad in [0, 6, -1, 100, i64::from(i32::MAX) + 5] {
            let result = service.submit(school.id, rated(bad)).await;
            assert!(matches!(result, Err(ReviewsServiceError::InvalidRating)), "{bad}");
        }

        let result = service.submit(school.id, NewReview::default()).await;
        assert!(matches!(result, Err(ReviewsServiceError::MissingRating)));

        service.submit(school.id, rated(1)).await.unwrap();
        service.submit(school.id, rated(5)).await.unwrap();

        let school = reload(&service, school.id).await;
        assert_eq!(school.total_reviews, 2);
        assert_eq!(school.rating, 3.0);
    }

    #[tokio::test]
    async fn test_aggregate_is_recomputed() {
        let (service, school) = setup_test_service().await;

        let ratings = [5, 4, 4, 3, 5, 2, 4];
        let mut last = None;
        for rating in ratings {
            last = Some(service.submit(school.id, rated(rating)).await.unwrap());
        }

        // 27 / 7 = 3.857...
        let last = last.unwrap();
        assert_eq!(last.rating, 3.9);
        assert_eq!(last.total_reviews, 7);

        let school = reload(&service, school.id).await;
        assert_eq!(school.rating, 3.9);
        assert_eq!(school.total_reviews, ratings.len() as i32);
    }

    #[tokio::test]
    async fn test_aggregate_ignores_other_schools() {
        let (service, school) = setup_test_service().await;
        let other = insert_school(&service.db, "Elm Court", "Noida", Board::Icse, GenderType::AllGirls).await;

        service.submit(school.id, rated(5)).await.unwrap();
        service.submit(other.id, rated(1)).await.unwrap();
        service.submit(other.id, rated(2)).await.unwrap();

        assert_eq!(reload(&service, school.id).await.rating, 5.0);
        let other = reload(&service, other.id).await;
        assert_eq!(other.rating, 1.5);
        assert_eq!(other.total_reviews, 2);
    }

    #[tokio::test]
    async fn test_reviewer_defaults_and_validation() {
        let (service, school) = setup_test_service().await;

        let submitted = service
            .submit(
                school.id,
                NewReview {
                    rating: Some(4),
                    review: Some("Great teachers".to_string()),
                    reviewer_name: Some("  ".to_string()),
                    reviewer_email: Some(String::new()),
                },
            )
            .await
            .unwrap();
        assert_eq!(submitted.review.reviewer_name, ANONYMOUS_REVIEWER);
        assert_eq!(submitted.review.reviewer_email, None);
        assert_eq!(submitted.review.review.as_deref(), Some("Great teachers"));

        let result = service
            .submit(
                school.id,
                NewReview {
                    rating: Some(4),
                    reviewer_email: Some("nobody".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ReviewsServiceError::InvalidEmail)));
    }

    #[tokio::test]
    async fn test_review_for_missing_school_is_rolled_back() {
        let (service, _) = setup_test_service().await;

        let result = service.submit(SchoolId::new(999), rated(4)).await;
        assert!(matches!(result, Err(ReviewsServiceError::SchoolNotFound)));
        assert_eq!(Review::find().count(&service.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_reviews_newest_first() {
        let (service, school) = setup_test_service().await;
        for rating in 1..=5 {
            service.submit(school.id, rated(rating)).await.unwrap();
        }

        let page = service
            .list(school.id, Pagination { page: 1, limit: 2 })
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        let ratings: Vec<_> = page.reviews.iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![5, 4]);

        let last = service
            .list(school.id, Pagination { page: 3, limit: 2 })
            .await
            .unwrap();
        assert_eq!(last.reviews.len(), 1);
        assert_eq!(last.reviews[0].rating, 1);

        let far = service
            .list(school.id, Pagination::parse(Some("18446744073709551615"), None, 10))
            .await
            .unwrap();
        assert_eq!(far.total, 5);
        assert!(far.reviews.is_empty());

        let missing = service.list(SchoolId::new(999), Pagination { page: 1, limit: 2 }).await;
        assert!(matches!(missing, Err(ReviewsServiceError::SchoolNotFound)));
    }
}
