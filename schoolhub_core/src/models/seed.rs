use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set, TransactionTrait};
use tracing::info;

use crate::{
    entity::prelude::*,
    service::{reviews::ANONYMOUS_REVIEWER, rounded_mean},
};

struct SampleSchool {
    name: &'static str,
    address: &'static str,
    city: &'static str,
    state: &'static str,
    contact: &'static str,
    email_id: &'static str,
    board: Board,
    gender_type: GenderType,
    established_year: i32,
    /// Star ratings of the demo reviews; the school aggregate is derived from them.
    ratings: &'static [i32],
    fees_range: &'static str,
}

const SAMPLE_SCHOOLS: &[SampleSchool] = &[
    SampleSchool {
        name: "La Martiniere College",
        address: "Hazratganj",
        city: "Lucknow",
        state: "Uttar Pradesh",
        contact: "9876543210",
        email_id: "info@lamartiniere.com",
        board: Board::Icse,
        gender_type: GenderType::AllBoys,
        established_year: 1845,
        ratings: &[5, 4],
        fees_range: "₹50,000 - ₹1,00,000",
    },
    SampleSchool {
        name: "Jagran Public School",
        address: "Gomti Nagar",
        city: "Lucknow",
        state: "Uttar Pradesh",
        contact: "9876543211",
        email_id: "contact@jagranschool.com",
        board: Board::Cbse,
        gender_type: GenderType::CoEducation,
        established_year: 1990,
        ratings: &[5, 4, 4],
        fees_range: "₹30,000 - ₹60,000",
    },
    SampleSchool {
        name: "Seth Anandram Jaipuria",
        address: "Gomti Nagar",
        city: "Lucknow",
        state: "Uttar Pradesh",
        contact: "9876543212",
        email_id: "admin@jaipuria.com",
        board: Board::Cbse,
        gender_type: GenderType::CoEducation,
        established_year: 1995,
        ratings: &[5, 5, 4, 4, 4],
        fees_range: "₹40,000 - ₹80,000",
    },
    SampleSchool {
        name: "Fortune World School",
        address: "Sector-105",
        city: "Noida",
        state: "Uttar Pradesh",
        contact: "9876543213",
        email_id: "info@fortuneworld.com",
        board: Board::Cbse,
        gender_type: GenderType::CoEducation,
        established_year: 2005,
        ratings: &[5, 4, 4, 4, 4],
        fees_range: "₹60,000 - ₹1,20,000",
    },
    SampleSchool {
        name: "Pathways World School Aravali",
        address: "Sohna Road",
        city: "Gurgaon",
        state: "Haryana",
        contact: "9876543214",
        email_id: "contact@pathways.com",
        board: Board::Ib,
        gender_type: GenderType::CoEducation,
        established_year: 2008,
        ratings: &[5, 5, 5, 4, 4],
        fees_range: "₹2,00,000 - ₹4,00,000",
    },
    SampleSchool {
        name: "The Paras World School",
        address: "Sector 50",
        city: "Gurgaon",
        state: "Haryana",
        contact: "9876543215",
        email_id: "admin@parasworld.com",
        board: Board::Cbse,
        gender_type: GenderType::CoEducation,
        established_year: 2010,
        ratings: &[5, 5, 4, 4, 4, 4, 4, 4, 4, 3],
        fees_range: "₹80,000 - ₹1,50,000",
    },
];

/// Fills an empty `schools` table with the demo directory and its reviews.
/// Returns how many schools were inserted; a table that already has rows is
/// left alone.
pub async fn insert_sample_schools(db: &DatabaseConnection) -> Result<usize, DbErr> {
    let txn = db.begin().await?;

    if School::find().count(&txn).await? > 0 {
        return Ok(0);
    }

    let created_at = chrono::Utc::now().to_rfc3339();
    for sample in SAMPLE_SCHOOLS {
        let school = SchoolActiveModel {
            name: Set(sample.name.to_string()),
            address: Set(sample.address.to_string()),
            city: Set(sample.city.to_string()),
            state: Set(sample.state.to_string()),
            contact: Set(sample.contact.to_string()),
            image: Set(None),
            email_id: Set(sample.email_id.to_string()),
            board: Set(sample.board),
            gender_type: Set(sample.gender_type),
            established_year: Set(Some(sample.established_year)),
            website: Set(None),
            description: Set(None),
            fees_range: Set(Some(sample.fees_range.to_string())),
            rating: Set(rounded_mean(sample.ratings)),
            total_reviews: Set(sample.ratings.len() as i32),
            created_at: Set(created_at.clone()),
            ..Default::default()
        };
        let school = School::insert(school).exec_with_returning(&txn).await?;

        let reviews = sample.ratings.iter().map(|rating| ReviewActiveModel {
            school_id: Set(school.id),
            rating: Set(*rating),
            review: Set(None),
            reviewer_name: Set(ANONYMOUS_REVIEWER.to_string()),
            reviewer_email: Set(None),
            created_at: Set(created_at.clone()),
            ..Default::default()
        });
        Review::insert_many(reviews).exec(&txn).await?;
    }

    txn.commit().await?;

    info!("Inserted {} sample schools", SAMPLE_SCHOOLS.len());
    Ok(SAMPLE_SCHOOLS.len())
}
