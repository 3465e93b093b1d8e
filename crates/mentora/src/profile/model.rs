use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use strum_macros::{Display, EnumString};

use super::ProfileError;

/// NewType pattern for user IDs
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create from existing string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Derive a stable ID from an email address (mock backend only)
    pub fn from_email(email: &str) -> Self {
        let digest = sha256::digest(email.trim().to_lowercase());
        Self(format!("mock-{}", &digest[..16]))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account role
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Teacher,
    Parent,
}

/// School grade, stored as a string `"1"` through `"12"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassLevel(String);

impl ClassLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 12;

    /// Parse and validate a class level
    pub fn parse(s: &str) -> Result<Self, ProfileError> {
        let trimmed = s.trim();
        match trimmed.parse::<u8>() {
            Ok(grade) if (Self::MIN..=Self::MAX).contains(&grade) => Ok(Self(grade.to_string())),
            _ => Err(ProfileError::InvalidData(format!(
                "Invalid class level: {}",
                s
            ))),
        }
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ClassLevel {
    fn default() -> Self {
        Self("6".to_string())
    }
}

impl TryFrom<String> for ClassLevel {
    type Error = ProfileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClassLevel> for String {
    fn from(level: ClassLevel) -> Self {
        level.0
    }
}

impl fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Student-only attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub class_level: ClassLevel,
    pub level: u32,
    pub points: u32,
    pub completed_topics: BTreeSet<String>,
    pub badges: BTreeSet<String>,
    pub daily_challenge_completed: bool,
    pub last_activity: Option<DateTime<Utc>>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl StudentRecord {
    /// Fresh record for a new student
    pub fn new(class_level: ClassLevel) -> Self {
        Self {
            class_level,
            level: 1,
            points: 0,
            completed_topics: BTreeSet::new(),
            badges: BTreeSet::new(),
            daily_challenge_completed: false,
            last_activity: None,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
        }
    }
}

/// User profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_verified: bool,
    /// Present iff `role == Role::Student`
    pub student: Option<StudentRecord>,
    pub student_ids: Vec<UserId>,
    pub child_ids: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Build a new profile, initializing role-conditional defaults
    pub fn new(id: UserId, details: ProfileDetails) -> Self {
        let now = Utc::now();
        let student = match details.role {
            Role::Student => Some(StudentRecord::new(details.class_level.unwrap_or_default())),
            Role::Teacher | Role::Parent => None,
        };

        Self {
            id,
            email: details.email,
            name: details.name,
            role: details.role,
            is_verified: details.is_verified,
            student,
            student_ids: Vec::new(),
            child_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Class level, if the profile belongs to a student
    pub fn class_level(&self) -> Option<&ClassLevel> {
        self.student.as_ref().map(|s| &s.class_level)
    }

    /// IDs referenced by a relation
    pub fn related_ids(&self, relation: Relation) -> &[UserId] {
        match relation {
            Relation::Students => &self.student_ids,
            Relation::Children => &self.child_ids,
        }
    }
}

/// Details captured at sign-up, used to create a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetails {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub class_level: Option<ClassLevel>,
    #[serde(default)]
    pub is_verified: bool,
}

/// Partial profile edit; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub class_level: Option<ClassLevel>,
    pub is_verified: Option<bool>,
    pub student_ids: Option<Vec<UserId>>,
    pub child_ids: Option<Vec<UserId>>,
}

/// Partial progress edit for a student
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub level: Option<u32>,
    pub points: Option<u32>,
    /// Merged into the existing set
    #[serde(default)]
    pub completed_topics: Vec<String>,
    /// Merged into the existing set
    #[serde(default)]
    pub badges: Vec<String>,
    pub daily_challenge_completed: Option<bool>,
    pub strengths: Option<Vec<String>>,
    pub weaknesses: Option<Vec<String>>,
}

/// Relationship lists held on teacher and parent profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Relation {
    Students,
    Children,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_level_validation() {
        assert_eq!(ClassLevel::parse(" 7 ").unwrap().as_str(), "7");
        assert_eq!(ClassLevel::default().as_str(), "6");
        assert!(ClassLevel::parse("0").is_err());
        assert!(ClassLevel::parse("13").is_err());
        assert!(ClassLevel::parse("seventh").is_err());
    }

    #[test]
    fn test_email_derived_id_is_stable() {
        let a = UserId::from_email("Ada@Example.com");
        let b = UserId::from_email(" ada@example.com");
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("mock-"));
    }

    #[test]
    fn test_profile_serializes_camel_case() {
        let profile = Profile::new(
            UserId::from_string("u1"),
            ProfileDetails {
                email: "kid@example.com".to_string(),
                name: "Kid".to_string(),
                role: Role::Student,
                class_level: None,
                is_verified: false,
            },
        );
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["isVerified"], false);
        assert_eq!(json["student"]["classLevel"], "6");
        assert_eq!(json["student"]["dailyChallengeCompleted"], false);
        assert_eq!(json["role"], "student");
    }

    #[test]
    fn test_non_student_has_no_student_record() {
        let profile = Profile::new(
            UserId::from_string("t1"),
            ProfileDetails {
                email: "teacher@example.com".to_string(),
                name: "Teacher".to_string(),
                role: Role::Teacher,
                class_level: Some(ClassLevel::parse("5").unwrap()),
                is_verified: true,
            },
        );
        assert!(profile.student.is_none());
        assert!(profile.class_level().is_none());
    }
}
