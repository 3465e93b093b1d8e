use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use mentora::profile::{
    ClassLevel, Profile, ProfileDetails, ProfileUpdate, ProgressUpdate, Relation, Role, UserId,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{ApiError, ApiResult, AppState};

/// API representation of a profile
///
/// Student fields are absent for teachers and parents.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_verified: bool,
    pub class_level: Option<String>,
    pub level: Option<u32>,
    pub points: Option<u32>,
    pub completed_topics: Vec<String>,
    pub badges: Vec<String>,
    pub daily_challenge_completed: Option<bool>,
    pub last_activity: Option<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub student_ids: Vec<String>,
    pub child_ids: Vec<String>,
}

fn ids(ids: Vec<UserId>) -> Vec<String> {
    ids.into_iter().map(|id| id.as_str().to_string()).collect()
}

impl From<Profile> for ProfileDto {
    fn from(profile: Profile) -> Self {
        let student = profile.student;
        Self {
            id: profile.id.as_str().to_string(),
            email: profile.email,
            name: profile.name,
            role: profile.role.to_string(),
            is_verified: profile.is_verified,
            class_level: student.as_ref().map(|s| s.class_level.to_string()),
            level: student.as_ref().map(|s| s.level),
            points: student.as_ref().map(|s| s.points),
            daily_challenge_completed: student.as_ref().map(|s| s.daily_challenge_completed),
            last_activity: student
                .as_ref()
                .and_then(|s| s.last_activity)
                .map(|t| t.to_rfc3339()),
            completed_topics: student
                .as_ref()
                .map(|s| s.completed_topics.iter().cloned().collect())
                .unwrap_or_default(),
            badges: student
                .as_ref()
                .map(|s| s.badges.iter().cloned().collect())
                .unwrap_or_default(),
            strengths: student
                .as_ref()
                .map(|s| s.strengths.clone())
                .unwrap_or_default(),
            weaknesses: student.map(|s| s.weaknesses).unwrap_or_default(),
            student_ids: ids(profile.student_ids),
            child_ids: ids(profile.child_ids),
        }
    }
}

/// Request to create a profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    /// Defaults to an ID derived from the email
    pub id: Option<String>,
    pub email: String,
    pub name: String,
    /// `student` (default), `teacher` or `parent`
    pub role: Option<String>,
    /// `"1"` to `"12"`; students default to `"6"`
    pub class_level: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

/// Request to update profile settings; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub class_level: Option<String>,
    pub is_verified: Option<bool>,
    pub student_ids: Option<Vec<String>>,
    pub child_ids: Option<Vec<String>>,
}

/// Request to record learning progress
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub level: Option<u32>,
    pub points: Option<u32>,
    /// Added to the completed set
    #[serde(default)]
    pub completed_topics: Vec<String>,
    /// Added to the badge set
    #[serde(default)]
    pub badges: Vec<String>,
    pub daily_challenge_completed: Option<bool>,
    pub strengths: Option<Vec<String>>,
    pub weaknesses: Option<Vec<String>>,
}

fn parse_role(role: &str) -> ApiResult<Role> {
    role.parse()
        .map_err(|_| ApiError::BadRequest(format!("Unknown role: {role}")))
}

pub(crate) fn parse_class_level(class_level: Option<&str>) -> ApiResult<ClassLevel> {
    match class_level {
        Some(level) => ClassLevel::parse(level).map_err(|e| ApiError::BadRequest(e.to_string())),
        None => Ok(ClassLevel::default()),
    }
}

fn to_user_ids(ids: Vec<String>) -> Vec<UserId> {
    ids.into_iter().map(UserId::from_string).collect()
}

/// Create a profile
#[utoipa::path(
    post,
    path = "/api/v1/profiles",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ProfileDto),
        (status = 400, description = "Invalid request", body = crate::ErrorResponse),
        (status = 409, description = "Profile already exists", body = crate::ErrorResponse)
    ),
    tag = "profiles"
)]
pub async fn create_profile(
    State(state): State<AppState>,
    Json(request): Json<CreateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    let role = match request.role.as_deref() {
        Some(role) => parse_role(role)?,
        None => Role::Student,
    };
    let class_level = match request.class_level.as_deref() {
        Some(level) => Some(parse_class_level(Some(level))?),
        None => None,
    };
    let id = match request.id {
        Some(id) => UserId::from_string(id),
        None => UserId::from_email(&request.email),
    };

    let profile = state
        .app
        .profiles()
        .create_profile(
            id,
            ProfileDetails {
                email: request.email,
                name: request.name,
                role,
                class_level,
                is_verified: request.is_verified,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ProfileDto::from(profile))))
}

/// Get a profile by ID
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Profile details", body = ProfileDto),
        (status = 404, description = "Profile not found", body = crate::ErrorResponse)
    ),
    tag = "profiles"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProfileDto>> {
    let id = UserId::from_string(id);
    state
        .app
        .profiles()
        .get_profile(&id)
        .await?
        .map(|profile| Json(ProfileDto::from(profile)))
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
}

/// Update profile settings
#[utoipa::path(
    patch,
    path = "/api/v1/profiles/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileDto),
        (status = 400, description = "Invalid request", body = crate::ErrorResponse),
        (status = 404, description = "Profile not found", body = crate::ErrorResponse)
    ),
    tag = "profiles"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileDto>> {
    let update = ProfileUpdate {
        name: request.name,
        email: request.email,
        role: request.role.as_deref().map(parse_role).transpose()?,
        class_level: request
            .class_level
            .as_deref()
            .map(|level| parse_class_level(Some(level)))
            .transpose()?,
        is_verified: request.is_verified,
        student_ids: request.student_ids.map(to_user_ids),
        child_ids: request.child_ids.map(to_user_ids),
    };

    let id = UserId::from_string(id);
    state
        .app
        .profiles()
        .update_profile(&id, update)
        .await?
        .map(|profile| Json(ProfileDto::from(profile)))
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
}

/// Record learning progress for a student
#[utoipa::path(
    put,
    path = "/api/v1/profiles/{id}/progress",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = ProgressRequest,
    responses(
        (status = 200, description = "Progress recorded", body = ProfileDto),
        (status = 404, description = "Profile not found", body = crate::ErrorResponse),
        (status = 422, description = "Profile is not a student", body = crate::ErrorResponse)
    ),
    tag = "profiles"
)]
pub async fn update_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ProgressRequest>,
) -> ApiResult<Json<ProfileDto>> {
    let update = ProgressUpdate {
        level: request.level,
        points: request.points,
        completed_topics: request.completed_topics,
        badges: request.badges,
        daily_challenge_completed: request.daily_challenge_completed,
        strengths: request.strengths,
        weaknesses: request.weaknesses,
    };

    let id = UserId::from_string(id);
    let profile = state.app.profiles().update_progress(&id, update).await?;
    Ok(Json(ProfileDto::from(profile)))
}

async fn list_related(
    state: &AppState,
    id: String,
    relation: Relation,
) -> ApiResult<Json<Vec<ProfileDto>>> {
    let profiles = state
        .app
        .profiles()
        .list_related(&UserId::from_string(id), relation)
        .await?;
    Ok(Json(profiles.into_iter().map(ProfileDto::from).collect()))
}

/// List a teacher's students
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}/students",
    params(
        ("id" = String, Path, description = "Teacher's user ID")
    ),
    responses(
        (status = 200, description = "Student profiles", body = Vec<ProfileDto>)
    ),
    tag = "profiles"
)]
pub async fn list_students(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<ProfileDto>>> {
    list_related(&state, id, Relation::Students).await
}

/// List a parent's children
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}/children",
    params(
        ("id" = String, Path, description = "Parent's user ID")
    ),
    responses(
        (status = 200, description = "Child profiles", body = Vec<ProfileDto>)
    ),
    tag = "profiles"
)]
pub async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<ProfileDto>>> {
    list_related(&state, id, Relation::Children).await
}

pub fn routes() -> axum::Router<AppState> {
    use axum::routing::{get, post, put};

    axum::Router::new()
        .route("/", post(create_profile))
        .route("/{id}", get(get_profile).patch(update_profile))
        .route("/{id}/progress", put(update_progress))
        .route("/{id}/students", get(list_students))
        .route("/{id}/children", get(list_children))
}
