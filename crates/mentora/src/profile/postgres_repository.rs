use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, postgres::PgPool, postgres::PgRow};

use super::{
    ClassLevel, Profile, ProfileError, ProfileRepository, Result, Role, StudentRecord, UserId,
};

const PROFILE_COLUMNS: &str = r#"
    id, email, display_name, role, is_verified, class_level, level, points,
    completed_topics, badges, daily_challenge_completed, last_activity,
    strengths, weaknesses, student_ids, child_ids, created_at, updated_at
"#;

/// PostgreSQL implementation of ProfileRepository
///
/// Columns use snake_case names; the in-memory `Profile` uses camelCase on
/// the wire. Student-only columns are NULL for teachers and parents.
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    /// Create a new PostgresProfileRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flattened student columns, all NULL when the profile has no student record
struct StudentColumns {
    class_level: Option<String>,
    level: Option<i32>,
    points: Option<i32>,
    completed_topics: Option<Vec<String>>,
    badges: Option<Vec<String>>,
    daily_challenge_completed: Option<bool>,
    last_activity: Option<DateTime<Utc>>,
    strengths: Option<Vec<String>>,
    weaknesses: Option<Vec<String>>,
}

impl StudentColumns {
    fn from_record(student: Option<&StudentRecord>) -> Result<Self> {
        Ok(match student {
            Some(s) => Self {
                class_level: Some(s.class_level.to_string()),
                level: Some(to_column("level", s.level)?),
                points: Some(to_column("points", s.points)?),
                completed_topics: Some(s.completed_topics.iter().cloned().collect()),
                badges: Some(s.badges.iter().cloned().collect()),
                daily_challenge_completed: Some(s.daily_challenge_completed),
                last_activity: s.last_activity,
                strengths: Some(s.strengths.clone()),
                weaknesses: Some(s.weaknesses.clone()),
            },
            None => Self {
                class_level: None,
                level: None,
                points: None,
                completed_topics: None,
                badges: None,
                daily_challenge_completed: None,
                last_activity: None,
                strengths: None,
                weaknesses: None,
            },
        })
    }
}

/// INTEGER columns hold at most `i32::MAX`
fn to_column(field: &str, value: u32) -> Result<i32> {
    i32::try_from(value).map_err(|_| {
        ProfileError::InvalidData(format!("{field} {value} exceeds the storable maximum"))
    })
}

fn ids_to_strings(ids: &[UserId]) -> Vec<String> {
    ids.iter().map(|id| id.as_str().to_string()).collect()
}

fn row_to_profile(row: &PgRow) -> Result<Profile> {
    let role_str: String = row.get("role");
    let role = role_str
        .parse::<Role>()
        .map_err(|_| ProfileError::InvalidData(format!("Invalid role: {}", role_str)))?;

    let student = match role {
        Role::Student => {
            let class_level: Option<String> = row.get("class_level");
            let class_level = class_level
                .as_deref()
                .map(ClassLevel::parse)
                .transpose()?
                .unwrap_or_default();

            Some(StudentRecord {
                class_level,
                level: row.get::<Option<i32>, _>("level").unwrap_or(1).max(1) as u32,
                points: row.get::<Option<i32>, _>("points").unwrap_or(0).max(0) as u32,
                completed_topics: row
                    .get::<Option<Vec<String>>, _>("completed_topics")
                    .unwrap_or_default()
                    .into_iter()
                    .collect(),
                badges: row
                    .get::<Option<Vec<String>>, _>("badges")
                    .unwrap_or_default()
                    .into_iter()
                    .collect(),
                daily_challenge_completed: row
                    .get::<Option<bool>, _>("daily_challenge_completed")
                    .unwrap_or(false),
                last_activity: row.get("last_activity"),
                strengths: row
                    .get::<Option<Vec<String>>, _>("strengths")
                    .unwrap_or_default(),
                weaknesses: row
                    .get::<Option<Vec<String>>, _>("weaknesses")
                    .unwrap_or_default(),
            })
        }
        Role::Teacher | Role::Parent => None,
    };

    let student_ids: Option<Vec<String>> = row.get("student_ids");
    let child_ids: Option<Vec<String>> = row.get("child_ids");

    Ok(Profile {
        id: UserId::from_string(row.get::<String, _>("id")),
        email: row.get("email"),
        name: row.get("display_name"),
        role,
        is_verified: row.get("is_verified"),
        student,
        student_ids: student_ids
            .unwrap_or_default()
            .into_iter()
            .map(UserId::from_string)
            .collect(),
        child_ids: child_ids
            .unwrap_or_default()
            .into_iter()
            .map(UserId::from_string)
            .collect(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn create(&self, profile: Profile) -> Result<Profile> {
        let student = StudentColumns::from_record(profile.student.as_ref())?;

        sqlx::query(
            r#"
            INSERT INTO profiles (
                id, email, display_name, role, is_verified, class_level, level, points,
                completed_topics, badges, daily_challenge_completed, last_activity,
                strengths, weaknesses, student_ids, child_ids, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18
            )
            "#,
        )
        .bind(profile.id.as_str())
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(profile.role.to_string())
        .bind(profile.is_verified)
        .bind(student.class_level)
        .bind(student.level)
        .bind(student.points)
        .bind(student.completed_topics)
        .bind(student.badges)
        .bind(student.daily_challenge_completed)
        .bind(student.last_activity)
        .bind(student.strengths)
        .bind(student.weaknesses)
        .bind(ids_to_strings(&profile.student_ids))
        .bind(ids_to_strings(&profile.child_ids))
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ProfileError::AlreadyExists(profile.id.to_string())
            }
            _ => ProfileError::Database(format!("could not create profile: {}", e)),
        })?;

        Ok(profile)
    }

    async fn get(&self, id: &UserId) -> Result<Option<Profile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ProfileError::Database(format!("could not fetch profile: {}", e)))?;

        row.as_ref().map(row_to_profile).transpose()
    }

    async fn update(&self, profile: Profile) -> Result<Profile> {
        let student = StudentColumns::from_record(profile.student.as_ref())?;

        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET email = $2, display_name = $3, role = $4, is_verified = $5,
                class_level = $6, level = $7, points = $8, completed_topics = $9,
                badges = $10, daily_challenge_completed = $11, last_activity = $12,
                strengths = $13, weaknesses = $14, student_ids = $15, child_ids = $16,
                updated_at = $17
            WHERE id = $1
            "#,
        )
        .bind(profile.id.as_str())
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(profile.role.to_string())
        .bind(profile.is_verified)
        .bind(student.class_level)
        .bind(student.level)
        .bind(student.points)
        .bind(student.completed_topics)
        .bind(student.badges)
        .bind(student.daily_challenge_completed)
        .bind(student.last_activity)
        .bind(student.strengths)
        .bind(student.weaknesses)
        .bind(ids_to_strings(&profile.student_ids))
        .bind(ids_to_strings(&profile.child_ids))
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ProfileError::Database(format!("could not update profile: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(ProfileError::NotFound(profile.id.to_string()));
        }

        Ok(profile)
    }

    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!(
            "SELECT {} FROM profiles WHERE id = ANY($1)",
            PROFILE_COLUMNS
        ))
        .bind(ids_to_strings(ids))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProfileError::Database(format!("could not list profiles: {}", e)))?;

        let mut profiles = rows
            .iter()
            .map(row_to_profile)
            .collect::<Result<Vec<_>>>()?;

        // Keep the caller's order
        profiles.sort_by_key(|p| ids.iter().position(|id| id == &p.id));
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_within_integer_range_are_kept() {
        let mut student = StudentRecord::new(ClassLevel::default());
        student.points = i32::MAX as u32;
        student.level = 42;

        let columns = StudentColumns::from_record(Some(&student)).unwrap();
        assert_eq!(columns.points, Some(i32::MAX));
        assert_eq!(columns.level, Some(42));
    }

    #[test]
    fn test_points_beyond_integer_range_are_rejected() {
        let mut student = StudentRecord::new(ClassLevel::default());
        student.points = 3_000_000_000;

        let result = StudentColumns::from_record(Some(&student));
        assert!(matches!(result, Err(ProfileError::InvalidData(_))));
    }

    #[test]
    fn test_non_students_have_null_columns() {
        let columns = StudentColumns::from_record(None).unwrap();
        assert!(columns.points.is_none());
        assert!(columns.class_level.is_none());
    }
}
