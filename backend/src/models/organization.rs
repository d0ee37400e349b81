use serde::Serialize;
use time::OffsetDateTime;

use super::object_id::ObjectId;

/// An organization on the platform. Created and managed through an external
/// admin path; this service only reads organizations when expanding follow
/// relationships. The `name` column is unique, as is the (name, description)
/// pair — violations surface through the shared error mapping.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub contact: String,
    pub img_url: String,
    pub geo_location: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
