use crate::ids::SchoolId;
use sea_orm::{entity::prelude::*, Iterable};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: SchoolId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: String,
    /// Public path under the image prefix, e.g. `/schoolImages/<file>`.
    pub image: Option<String>,
    pub email_id: String,
    pub board: Board,
    pub gender_type: GenderType,
    pub established_year: Option<i32>,
    pub website: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub fees_range: Option<String>,
    /// Average of all review ratings, one decimal place.
    pub rating: f64,
    pub total_reviews: i32,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review::Entity")]
    Review,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Board {
    #[default]
    #[sea_orm(string_value = "CBSE")]
    #[serde(rename = "CBSE")]
    Cbse,
    #[sea_orm(string_value = "ICSE")]
    #[serde(rename = "ICSE")]
    Icse,
    #[sea_orm(string_value = "IB")]
    #[serde(rename = "IB")]
    Ib,
    #[sea_orm(string_value = "IGCSE")]
    #[serde(rename = "IGCSE")]
    Igcse,
    #[sea_orm(string_value = "Cambridge")]
    #[serde(rename = "Cambridge")]
    Cambridge,
    #[sea_orm(string_value = "State Board")]
    #[serde(rename = "State Board")]
    StateBoard,
    #[sea_orm(string_value = "Pre-School")]
    #[serde(rename = "Pre-School")]
    PreSchool,
}

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum GenderType {
    #[sea_orm(string_value = "All Boys")]
    #[serde(rename = "All Boys")]
    AllBoys,
    #[sea_orm(string_value = "All Girls")]
    #[serde(rename = "All Girls")]
    AllGirls,
    #[default]
    #[sea_orm(string_value = "Co-Education")]
    #[serde(rename = "Co-Education")]
    CoEducation,
}

/// Raised when a form or query value is not one of the stored labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! label_conversions {
    ($ty:ident, $kind:literal) => {
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $ty::iter()
                    .find(|variant| variant.to_value() == s)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_value())
            }
        }
    };
}

label_conversions!(Board, "board");
label_conversions!(GenderType, "gender type");
