use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::{
    auth::AuthUser,
    error::{AppError, AppJson, Result},
    models::{
        following::{
            CreateFollowRequest, DeleteFollowRequest, FollowStatus, Following,
            FollowingWithOrganization, UpdateFollowRequest,
        },
        object_id::ObjectId,
        organization::Organization,
    },
};

/// Parse an id from a path or body field, mapping failure to a 400 before
/// any query runs.
fn valid_id(value: &str, field: &str) -> Result<ObjectId> {
    ObjectId::parse(value)
        .map_err(|_| AppError::BadRequest(format!("The `{}` is not valid", field)))
}

/// `GET /api/following/all` — the single most recently created follow, or
/// null. A quirk kept from the first version of this API: "all" never
/// returned more than one record.
pub async fn latest(
    State(pool): State<PgPool>,
    _auth: AuthUser,
) -> Result<Json<Option<Following>>> {
    let follow = sqlx::query_as::<_, Following>(
        "SELECT id, user_id, organization_id, following, created_at, updated_at
         FROM followings
         ORDER BY created_at DESC
         LIMIT 1",
    )
    .fetch_optional(&pool)
    .await?;

    Ok(Json(follow))
}

/// Row shape for the list-for-user join; organization columns are aliased
/// with an `org_` prefix and folded into the nested response struct. The
/// join is a LEFT JOIN because nothing stops a follow from pointing at an
/// organization that was never created — such a follow still belongs to the
/// caller's list, with a null organization.
#[derive(sqlx::FromRow)]
struct FollowingWithOrgRow {
    id: ObjectId,
    user_id: ObjectId,
    following: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    org_id: Option<ObjectId>,
    org_name: Option<String>,
    org_description: Option<String>,
    org_location: Option<String>,
    org_contact: Option<String>,
    org_img_url: Option<String>,
    org_geo_location: Option<serde_json::Value>,
    org_created_at: Option<OffsetDateTime>,
    org_updated_at: Option<OffsetDateTime>,
}

impl From<FollowingWithOrgRow> for FollowingWithOrganization {
    fn from(row: FollowingWithOrgRow) -> Self {
        // Every org column is NOT NULL, so they are all Some or all None
        let organization = match (
            row.org_id,
            row.org_name,
            row.org_description,
            row.org_location,
            row.org_contact,
            row.org_img_url,
            row.org_geo_location,
            row.org_created_at,
            row.org_updated_at,
        ) {
            (
                Some(id),
                Some(name),
                Some(description),
                Some(location),
                Some(contact),
                Some(img_url),
                Some(geo_location),
                Some(created_at),
                Some(updated_at),
            ) => Some(Organization {
                id,
                name,
                description,
                location,
                contact,
                img_url,
                geo_location,
                created_at,
                updated_at,
            }),
            _ => None,
        };

        FollowingWithOrganization {
            id: row.id,
            user_id: row.user_id,
            organization,
            following: row.following,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `GET /api/following/user` — every follow belonging to the caller, newest
/// first, with the organization expanded inline (null when the referenced
/// organization does not exist).
pub async fn list_for_user(
    State(pool): State<PgPool>,
    auth: AuthUser,
) -> Result<Json<Vec<FollowingWithOrganization>>> {
    let user_id = valid_id(&auth.id, "userId")?;

    let rows = sqlx::query_as::<_, FollowingWithOrgRow>(
        "SELECT f.id, f.user_id, f.following, f.created_at, f.updated_at,
                o.id AS org_id, o.name AS org_name, o.description AS org_description,
                o.location AS org_location, o.contact AS org_contact,
                o.img_url AS org_img_url, o.geo_location AS org_geo_location,
                o.created_at AS org_created_at, o.updated_at AS org_updated_at
         FROM followings f
         LEFT JOIN organizations o ON o.id = f.organization_id
         WHERE f.user_id = $1
         ORDER BY f.created_at DESC",
    )
    .bind(&user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// `GET /api/following/following/:id` — is the caller following org `:id`?
/// Returns the oldest matching record, or the literal `false`.
pub async fn check_status(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<FollowStatus>> {
    let org_id = valid_id(&id, "orgId")?;
    let user_id = valid_id(&auth.id, "userId")?;

    let follow = sqlx::query_as::<_, Following>(
        "SELECT id, user_id, organization_id, following, created_at, updated_at
         FROM followings
         WHERE organization_id = $1 AND user_id = $2
         ORDER BY created_at ASC
         LIMIT 1",
    )
    .bind(&org_id)
    .bind(&user_id)
    .fetch_optional(&pool)
    .await?;

    Ok(Json(match follow {
        Some(record) => FollowStatus::Found(record),
        None => FollowStatus::NotFound,
    }))
}

/// `GET /api/following/org/:id` — every follow of an organization, newest
/// first.
pub async fn list_for_org(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Following>>> {
    let org_id = valid_id(&id, "id")?;

    let follows = sqlx::query_as::<_, Following>(
        "SELECT id, user_id, organization_id, following, created_at, updated_at
         FROM followings
         WHERE organization_id = $1
         ORDER BY created_at DESC",
    )
    .bind(&org_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(follows))
}

/// `GET /api/following/:id` — a single follow by id, or null.
pub async fn get_one(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Option<Following>>> {
    let follow_id = valid_id(&id, "id")?;

    let follow = sqlx::query_as::<_, Following>(
        "SELECT id, user_id, organization_id, following, created_at, updated_at
         FROM followings
         WHERE id = $1",
    )
    .bind(&follow_id)
    .fetch_optional(&pool)
    .await?;

    Ok(Json(follow))
}

/// `POST /api/following` — create a follow for the caller. No check that the
/// organization exists, and no duplicate guard: concurrent follows of the
/// same org each produce their own record.
pub async fn create(
    State(pool): State<PgPool>,
    auth: AuthUser,
    AppJson(req): AppJson<CreateFollowRequest>,
) -> Result<Json<Following>> {
    let user_id = valid_id(&auth.id, "userId")?;
    let org_id = valid_id(&req.org_id, "orgId")?;

    let follow = sqlx::query_as::<_, Following>(
        "INSERT INTO followings (id, user_id, organization_id, following)
         VALUES ($1, $2, $3, true)
         RETURNING id, user_id, organization_id, following, created_at, updated_at",
    )
    .bind(ObjectId::new())
    .bind(&user_id)
    .bind(&org_id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(follow))
}

/// `PUT /api/following` — set the `following` flag on an existing record.
pub async fn update(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    AppJson(req): AppJson<UpdateFollowRequest>,
) -> Result<Json<Following>> {
    let follow_id = valid_id(&req.follow_id, "followId")?;

    let follow = sqlx::query_as::<_, Following>(
        "UPDATE followings
         SET following = $2, updated_at = now()
         WHERE id = $1
         RETURNING id, user_id, organization_id, following, created_at, updated_at",
    )
    .bind(&follow_id)
    .bind(req.following)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Follow {} not found", follow_id)))?;

    Ok(Json(follow))
}

/// `DELETE /api/following` — hard-delete a follow; the removed record is
/// returned as confirmation.
pub async fn remove(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    AppJson(req): AppJson<DeleteFollowRequest>,
) -> Result<Json<Following>> {
    let follow_id = valid_id(&req.follow_id, "followId")?;

    let follow = sqlx::query_as::<_, Following>(
        "DELETE FROM followings
         WHERE id = $1
         RETURNING id, user_id, organization_id, following, created_at, updated_at",
    )
    .bind(&follow_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Follow {} not found", follow_id)))?;

    Ok(Json(follow))
}
