use serde::{Deserialize, Serialize, Serializer};
use time::OffsetDateTime;

use super::object_id::ObjectId;
use super::organization::Organization;

/// A "user follows organization" relationship. `following: false` marks an
/// explicit unfollow; rows are only removed by the delete endpoint.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Following {
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub organization_id: ObjectId,
    pub following: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A follow with its organization joined in, returned by the list-for-user
/// endpoint. `organization` is null when the follow references an
/// organization that does not exist — creates never check referential
/// integrity, so such rows are reachable.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowingWithOrganization {
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub organization: Option<Organization>,
    pub following: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Result of the follow-status check. The wire contract is historical:
/// clients receive either the matching record or the literal `false`, and
/// branch on the payload type.
#[derive(Debug)]
pub enum FollowStatus {
    Found(Following),
    NotFound,
}

impl Serialize for FollowStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FollowStatus::Found(record) => record.serialize(serializer),
            FollowStatus::NotFound => serializer.serialize_bool(false),
        }
    }
}

/// Body ids arrive as plain strings and are parsed in the handlers so an
/// invalid id is a 400 rather than a body-rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFollowRequest {
    pub org_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFollowRequest {
    pub follow_id: String,
    pub following: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFollowRequest {
    pub follow_id: String,
}
