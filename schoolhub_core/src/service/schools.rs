use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    entity::{prelude::*, school::UnknownVariant},
    ids::SchoolId,
    service::{looks_like_email, non_blank, Pagination},
    storage::{ImageStore, ImageUpload},
};

#[derive(Debug, Error)]
pub enum SchoolsServiceError {
    #[error("database error: {0}")]
    DbError(#[from] DbErr),

    #[error("image storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("school not found")]
    SchoolNotFound,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    UnknownLabel(#[from] UnknownVariant),

    #[error("image must be an image file")]
    NotAnImage,
}

/// Sort order of a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingOrder {
    /// `rating DESC, id DESC`, the main directory view.
    #[default]
    TopRated,
    /// `id DESC`, most recently registered first.
    Newest,
}

impl ListingOrder {
    pub fn default_limit(self) -> u64 {
        match self {
            ListingOrder::TopRated => 6,
            ListingOrder::Newest => 9,
        }
    }
}

/// Listing parameters exactly as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub city: Option<String>,
    pub board: Option<String>,
    pub gender_type: Option<String>,
    pub sort: Option<String>,
}

/// Normalized listing request; blank filters are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub pagination: Pagination,
    pub search: Option<String>,
    pub city: Option<String>,
    pub board: Option<Board>,
    pub gender_type: Option<GenderType>,
    pub order: ListingOrder,
}

impl ListingQuery {
    pub fn normalize(params: &ListingParams) -> Result<Self, SchoolsServiceError> {
        let order = match non_blank(params.sort.as_deref()) {
            Some("newest") => ListingOrder::Newest,
            _ => ListingOrder::TopRated,
        };

        let pagination = Pagination::parse(
            params.page.as_deref(),
            params.limit.as_deref(),
            order.default_limit(),
        );

        Ok(Self {
            pagination,
            search: non_blank(params.search.as_deref()).map(str::to_string),
            city: non_blank(params.city.as_deref()).map(str::to_string),
            board: non_blank(params.board.as_deref())
                .map(str::parse::<Board>)
                .transpose()?,
            gender_type: non_blank(params.gender_type.as_deref())
                .map(str::parse::<GenderType>)
                .transpose()?,
            order,
        })
    }

    /// Conjunction of every active filter. Shared by the count and the page
    /// fetch so their totals always agree.
    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(search) = &self.search {
            condition = condition.add(
                Condition::any()
                    .add(SchoolColumn::Name.contains(search.as_str()))
                    .add(SchoolColumn::City.contains(search.as_str()))
                    .add(SchoolColumn::Address.contains(search.as_str())),
            );
        }

        if let Some(city) = &self.city {
            condition = condition.add(SchoolColumn::City.eq(city.as_str()));
        }

        if let Some(board) = self.board {
            condition = condition.add(SchoolColumn::Board.eq(board));
        }

        if let Some(gender_type) = self.gender_type {
            condition = condition.add(SchoolColumn::GenderType.eq(gender_type));
        }

        condition
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SchoolPage {
    pub schools: Vec<SchoolModel>,
    pub total: u64,
    pub page: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

/// Registration or partial-update form, values as submitted.
#[derive(Debug, Clone, Default)]
pub struct SchoolForm {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub contact: Option<String>,
    pub email_id: Option<String>,
    pub board: Option<String>,
    pub gender_type: Option<String>,
    pub established_year: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub fees_range: Option<String>,
    pub image: Option<ImageUpload>,
}

/// Minimum lengths for the free-text required fields.
const TEXT_RULES: [(&str, usize); 4] = [("name", 2), ("address", 10), ("city", 2), ("state", 2)];

fn check_text(field: &'static str, value: &str) -> Result<(), SchoolsServiceError> {
    let min = TEXT_RULES
        .iter()
        .find(|(name, _)| *name == field)
        .map_or(1, |(_, min)| *min);

    if value.chars().count() < min {
        return Err(SchoolsServiceError::InvalidField {
            field,
            reason: "is too short",
        });
    }
    Ok(())
}

fn check_contact(value: &str) -> Result<(), SchoolsServiceError> {
    if value.len() != 10 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(SchoolsServiceError::InvalidField {
            field: "contact",
            reason: "must be a 10 digit number",
        });
    }
    Ok(())
}

fn check_email(value: &str) -> Result<(), SchoolsServiceError> {
    if !looks_like_email(value) {
        return Err(SchoolsServiceError::InvalidField {
            field: "email_id",
            reason: "must be a valid email address",
        });
    }
    Ok(())
}

fn parse_year(value: &str) -> Result<i32, SchoolsServiceError> {
    value.parse().map_err(|_| SchoolsServiceError::InvalidField {
        field: "established_year",
        reason: "must be a number",
    })
}

fn check_image(image: &ImageUpload) -> Result<(), SchoolsServiceError> {
    if !image.is_image() {
        return Err(SchoolsServiceError::NotAnImage);
    }
    Ok(())
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, SchoolsServiceError> {
    let value = non_blank(value.as_deref()).ok_or(SchoolsServiceError::MissingField(field))?;
    check_text(field, value)?;
    Ok(value)
}

fn optional(value: &Option<String>) -> Option<String> {
    non_blank(value.as_deref()).map(str::to_string)
}

#[derive(Clone)]
pub struct SchoolsService {
    db: DatabaseConnection,
    images: ImageStore,
}

impl SchoolsService {
    pub fn new(db: DatabaseConnection, images: ImageStore) -> Self {
        Self { db, images }
    }

    /// Register a new school, storing its image first when one is attached
    pub async fn create(&self, form: SchoolForm) -> Result<SchoolModel, SchoolsServiceError> {
        let name = required(&form.name, "name")?;
        let address = required(&form.address, "address")?;
        let city = required(&form.city, "city")?;
        let state = required(&form.state, "state")?;
        let contact = required(&form.contact, "contact")?;
        check_contact(contact)?;
        let email_id = required(&form.email_id, "email_id")?;
        check_email(email_id)?;

        let board = match non_blank(form.board.as_deref()) {
            Some(raw) => raw.parse::<Board>()?,
            None => Board::default(),
        };
        let gender_type = match non_blank(form.gender_type.as_deref()) {
            Some(raw) => raw.parse::<GenderType>()?,
            None => GenderType::default(),
        };
        let established_year = non_blank(form.established_year.as_deref())
            .map(parse_year)
            .transpose()?;

        if let Some(image) = &form.image {
            check_image(image)?;
        }

        let image = match &form.image {
            Some(upload) => Some(self.images.save(upload).await?),
            None => None,
        };

        let school = SchoolActiveModel {
            name: Set(name.to_string()),
            address: Set(address.to_string()),
            city: Set(city.to_string()),
            state: Set(state.to_string()),
            contact: Set(contact.to_string()),
            image: Set(image.clone()),
            email_id: Set(email_id.to_string()),
            board: Set(board),
            gender_type: Set(gender_type),
            established_year: Set(established_year),
            website: Set(optional(&form.website)),
            description: Set(optional(&form.description)),
            fees_range: Set(optional(&form.fees_range)),
            rating: Set(0.0),
            total_reviews: Set(0),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match School::insert(school).exec_with_returning(&self.db).await {
            Ok(created) => {
                info!("Registered school {} ({})", created.id, created.name);
                Ok(created)
            }
            Err(e) => {
                if let Some(path) = image {
                    self.discard_image(&path).await;
                }
                Err(e.into())
            }
        }
    }

    /// Get a specific school by ID
    pub async fn get(&self, id: SchoolId) -> Result<SchoolModel, SchoolsServiceError> {
        School::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(SchoolsServiceError::SchoolNotFound)
    }

    /// Filtered, paginated listing. The count and the page are read in one
    /// transaction from the same condition.
    pub async fn list(&self, query: &ListingQuery) -> Result<SchoolPage, SchoolsServiceError> {
        let pagination = query.pagination;
        let condition = query.condition();

        let txn = self.db.begin().await?;

        let total = School::find()
            .filter(condition.clone())
            .count(&txn)
            .await?;

        let select = School::find().filter(condition);
        let select = match query.order {
            ListingOrder::TopRated => select
                .order_by_desc(SchoolColumn::Rating)
                .order_by_desc(SchoolColumn::Id),
            ListingOrder::Newest => select.order_by_desc(SchoolColumn::Id),
        };

        let schools = select
            .limit(pagination.limit)
            .offset(pagination.offset())
            .all(&txn)
            .await?;

        txn.commit().await?;

        Ok(SchoolPage {
            schools,
            total,
            page: pagination.page,
            total_pages: pagination.total_pages(total),
        })
    }

    /// Distinct cities, alphabetical
    pub async fn cities(&self) -> Result<Vec<String>, SchoolsServiceError> {
        let cities = School::find()
            .select_only()
            .column(SchoolColumn::City)
            .distinct()
            .order_by_asc(SchoolColumn::City)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;

        Ok(cities)
    }

    /// Partial update. Only fields that are present and non-empty are
    /// written, so a field can't be cleared through here.
    pub async fn update(
        &self,
        id: SchoolId,
        form: SchoolForm,
    ) -> Result<SchoolModel, SchoolsServiceError> {
        let school = self.get(id).await?;
        let old_image = school.image.clone();

        let mut active: SchoolActiveModel = school.clone().into();

        for (field, value, slot) in [
            ("name", &form.name, &mut active.name),
            ("address", &form.address, &mut active.address),
            ("city", &form.city, &mut active.city),
            ("state", &form.state, &mut active.state),
        ] {
            if let Some(value) = non_blank(value.as_deref()) {
                check_text(field, value)?;
                *slot = Set(value.to_string());
            }
        }

        if let Some(contact) = non_blank(form.contact.as_deref()) {
            check_contact(contact)?;
            active.contact = Set(contact.to_string());
        }

        if let Some(email_id) = non_blank(form.email_id.as_deref()) {
            check_email(email_id)?;
            active.email_id = Set(email_id.to_string());
        }

        if let Some(board) = non_blank(form.board.as_deref()) {
            active.board = Set(board.parse::<Board>()?);
        }

        if let Some(gender_type) = non_blank(form.gender_type.as_deref()) {
            active.gender_type = Set(gender_type.parse::<GenderType>()?);
        }

        if let Some(year) = non_blank(form.established_year.as_deref()) {
            let year = parse_year(year)?;
            if year != 0 {
                active.established_year = Set(Some(year));
            }
        }

        for (value, slot) in [
            (&form.website, &mut active.website),
            (&form.description, &mut active.description),
            (&form.fees_range, &mut active.fees_range),
        ] {
            if let Some(value) = optional(value) {
                *slot = Set(Some(value));
            }
        }

        if let Some(image) = &form.image {
            check_image(image)?;
        }

        let new_image = match &form.image {
            Some(upload) => Some(self.images.save(upload).await?),
            None => None,
        };
        if let Some(path) = &new_image {
            active.image = Set(Some(path.clone()));
        }

        if !active.is_changed() {
            return Ok(school);
        }

        let updated = match active.update(&self.db).await {
            Ok(updated) => updated,
            Err(e) => {
                if let Some(path) = &new_image {
                    self.discard_image(path).await;
                }
                return Err(e.into());
            }
        };

        if let (Some(_), Some(old)) = (&new_image, &old_image) {
            self.discard_image(old).await;
        }

        info!("Updated school {}", updated.id);
        Ok(updated)
    }

    /// Delete a school together with its reviews, then its stored image
    pub async fn delete(&self, id: SchoolId) -> Result<(), SchoolsServiceError> {
        let school = self.get(id).await?;

        let txn = self.db.begin().await?;

        Review::delete_many()
            .filter(ReviewColumn::SchoolId.eq(id))
            .exec(&txn)
            .await?;

        School::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        if let Some(path) = &school.image {
            self.discard_image(path).await;
        }

        info!("Deleted school {id}");
        Ok(())
    }

    /// Best-effort removal; a failure only leaves an unreferenced file behind.
    async fn discard_image(&self, public_path: &str) {
        if let Err(e) = self.images.remove(public_path).await {
            warn!("Failed to remove image {public_path}: {e}");
        }
    }
}
