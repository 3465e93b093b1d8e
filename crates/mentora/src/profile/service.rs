use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error};

use super::{
    Profile, ProfileDetails, ProfileError, ProfileRepository, ProfileUpdate, ProgressUpdate,
    Relation, Result, Role, StudentRecord, UserId,
};
use crate::generation::DiagnosticAnalysis;

/// Service layer for profile and progress operations
#[derive(Clone)]
pub struct ProfileService {
    repository: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    /// Create a new ProfileService
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    /// Get a profile by ID
    pub async fn get_profile(&self, id: &UserId) -> Result<Option<Profile>> {
        self.repository
            .get(id)
            .await
            .inspect_err(|e| error!(user_id = %id, error = %e, "failed to fetch profile"))
    }

    /// Create a profile, initializing student defaults when applicable
    pub async fn create_profile(&self, id: UserId, details: ProfileDetails) -> Result<Profile> {
        if details.email.trim().is_empty() {
            return Err(ProfileError::InvalidData(
                "Profile email cannot be empty".to_string(),
            ));
        }

        let profile = Profile::new(id, details);
        debug!(user_id = %profile.id, role = %profile.role, "creating profile");
        self.repository
            .create(profile)
            .await
            .inspect_err(|e| error!(error = %e, "failed to create profile"))
    }

    /// Merge profile fields; returns `None` when the profile does not exist
    pub async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>> {
        let Some(mut profile) = self.repository.get(id).await? else {
            return Ok(None);
        };

        apply_profile_update(&mut profile, update);
        profile.updated_at = Utc::now();

        let updated = self
            .repository
            .update(profile)
            .await
            .inspect_err(|e| error!(user_id = %id, error = %e, "failed to update profile"))?;
        Ok(Some(updated))
    }

    /// Merge student progress and stamp the last activity time
    pub async fn update_progress(&self, id: &UserId, update: ProgressUpdate) -> Result<Profile> {
        let mut profile = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| ProfileError::NotFound(id.to_string()))?;

        let student = profile
            .student
            .as_mut()
            .ok_or_else(|| ProfileError::NotAStudent(id.to_string()))?;

        apply_progress_update(student, update);
        let now = Utc::now();
        student.last_activity = Some(now);
        profile.updated_at = now;

        self.repository
            .update(profile)
            .await
            .inspect_err(|e| error!(user_id = %id, error = %e, "failed to update progress"))
    }

    /// Store the outcome of a diagnostic quiz on the student record
    pub async fn record_diagnostic(
        &self,
        id: &UserId,
        analysis: &DiagnosticAnalysis,
    ) -> Result<Profile> {
        self.update_progress(
            id,
            ProgressUpdate {
                strengths: Some(analysis.strengths.clone()),
                weaknesses: Some(analysis.weaknesses.clone()),
                ..Default::default()
            },
        )
        .await
    }

    /// Resolve a teacher's students or a parent's children
    ///
    /// Missing owners and missing relation lists yield an empty list.
    pub async fn list_related(&self, owner_id: &UserId, relation: Relation) -> Result<Vec<Profile>> {
        let Some(owner) = self.repository.get(owner_id).await? else {
            return Ok(Vec::new());
        };

        let ids = owner.related_ids(relation);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.repository.get_many(ids).await
    }
}

fn apply_profile_update(profile: &mut Profile, update: ProfileUpdate) {
    if let Some(name) = update.name {
        profile.name = name;
    }
    if let Some(email) = update.email {
        profile.email = email;
    }
    if let Some(is_verified) = update.is_verified {
        profile.is_verified = is_verified;
    }
    if let Some(student_ids) = update.student_ids {
        profile.student_ids = student_ids;
    }
    if let Some(child_ids) = update.child_ids {
        profile.child_ids = child_ids;
    }

    if let Some(role) = update.role {
        profile.role = role;
    }

    match profile.role {
        Role::Student => {
            let student = profile
                .student
                .get_or_insert_with(|| StudentRecord::new(Default::default()));
            if let Some(class_level) = update.class_level {
                student.class_level = class_level;
            }
        }
        // Student-only fields do not survive a role change
        Role::Teacher | Role::Parent => profile.student = None,
    }
}

fn apply_progress_update(student: &mut StudentRecord, update: ProgressUpdate) {
    if let Some(level) = update.level {
        student.level = level.max(1);
    }
    if let Some(points) = update.points {
        student.points = points;
    }
    student.completed_topics.extend(update.completed_topics);
    student.badges.extend(update.badges);
    if let Some(done) = update.daily_challenge_completed {
        student.daily_challenge_completed = done;
    }
    if let Some(strengths) = update.strengths {
        student.strengths = strengths;
    }
    if let Some(weaknesses) = update.weaknesses {
        student.weaknesses = weaknesses;
    }
}
