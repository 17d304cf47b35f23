//! Patient journey service and session.
//!
//! The journey is one row per user in the remote store plus its milestone
//! rows. [`JourneyService`] holds the pure data operations: lazy creation
//! on first access, stage advancement through the server-side procedure,
//! and milestone completion. [`JourneySession`] is the per-login object
//! the UI works with — created on login, dropped on logout — carrying the
//! cached state and the last user-facing error string.
//!
//! The server-side `advance_patient_journey` procedure remains the
//! authority on transitions. The client additionally enforces the
//! legal-successor rule before issuing the call, so an out-of-order target
//! is rejected locally without a round trip.

use crate::stages::{JourneyStage, UnknownStage, TOTAL_STEPS};
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use voyamed_store::{JourneyMilestone, JourneysRepo, PatientJourney, StoreError};

/// Errors raised by journey operations.
#[derive(Debug, thiserror::Error)]
pub enum JourneyError {
    #[error(transparent)]
    UnknownStage(#[from] UnknownStage),
    #[error("cannot advance from {from} to {to}: the only legal successor is {expected}")]
    IllegalTransition {
        from: JourneyStage,
        to: JourneyStage,
        expected: JourneyStage,
    },
    #[error("journey is already at the terminal stage {0}")]
    TerminalStage(JourneyStage),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type JourneyResult<T> = std::result::Result<T, JourneyError>;

/// A journey row together with its milestones, as last fetched.
#[derive(Debug, Clone)]
pub struct JourneyState {
    pub journey: PatientJourney,
    pub milestones: Vec<JourneyMilestone>,
}

impl JourneyState {
    /// The current stage parsed from the remote value.
    pub fn current_stage(&self) -> Result<JourneyStage, UnknownStage> {
        self.journey.journey_stage.parse()
    }

    /// Percentage of the journey completed, rounded to the nearest whole
    /// number. Step 4 of 16 is 25.
    pub fn progress_percentage(&self) -> u8 {
        if self.journey.total_steps == 0 {
            return 0;
        }
        let ratio = f64::from(self.journey.current_step) / f64::from(self.journey.total_steps);
        (ratio * 100.0).round() as u8
    }
}

fn initial_journey(user_id: &str) -> PatientJourney {
    let now = Utc::now();
    PatientJourney {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_owned(),
        journey_stage: JourneyStage::InitialInquiry.as_str().to_owned(),
        current_step: 1,
        total_steps: TOTAL_STEPS,
        created_at: now,
        updated_at: now,
    }
}

/// The three milestones every new journey starts with. The welcome
/// milestone is seeded pre-completed.
fn seed_milestones(journey_id: &str) -> Vec<JourneyMilestone> {
    let now = Utc::now();
    vec![
        JourneyMilestone {
            id: uuid::Uuid::new_v4().to_string(),
            journey_id: journey_id.to_owned(),
            milestone_type: "welcome".to_owned(),
            title: "Welcome to Voyamed".to_owned(),
            description: Some("Your patient journey has started.".to_owned()),
            completed: true,
            due_date: None,
            completed_at: Some(now),
        },
        JourneyMilestone {
            id: uuid::Uuid::new_v4().to_string(),
            journey_id: journey_id.to_owned(),
            milestone_type: "profile".to_owned(),
            title: "Complete your health profile".to_owned(),
            description: Some("Basic details our clinical team needs before review.".to_owned()),
            completed: false,
            due_date: Some(now + Duration::days(7)),
            completed_at: None,
        },
        JourneyMilestone {
            id: uuid::Uuid::new_v4().to_string(),
            journey_id: journey_id.to_owned(),
            milestone_type: "medical_records".to_owned(),
            title: "Upload your medical records".to_owned(),
            description: Some("Recent imaging, lab results, and referral letters.".to_owned()),
            completed: false,
            due_date: Some(now + Duration::days(14)),
            completed_at: None,
        },
    ]
}

/// Pure journey data operations over the journeys repository.
#[derive(Clone)]
pub struct JourneyService {
    repo: JourneysRepo,
}

impl JourneyService {
    pub fn new(repo: JourneysRepo) -> Self {
        Self { repo }
    }

    /// Fetches a user's journey and milestones, creating both on first
    /// access. Creation upserts on `user_id`, so a concurrent first access
    /// cannot produce a second journey row.
    pub async fn load_or_create(&self, user_id: &str) -> JourneyResult<JourneyState> {
        if let Some(journey) = self.repo.find_by_user(user_id).await? {
            let milestones = self.repo.milestones(&journey.id).await?;
            return Ok(JourneyState { journey, milestones });
        }

        tracing::info!(user_id, "creating initial journey");
        let journey = self.repo.create_initial(&initial_journey(user_id)).await?;
        let milestones = self
            .repo
            .insert_milestones(&seed_milestones(&journey.id))
            .await?;
        Ok(JourneyState { journey, milestones })
    }

    /// Advances the journey to `target` and returns the refetched state.
    ///
    /// The target must be the immediate successor of the current stage;
    /// anything else is rejected locally. After the remote procedure
    /// succeeds, the full journey and milestone set are refetched so the
    /// caller resynchronises with whatever the server decided.
    pub async fn advance(
        &self,
        state: &JourneyState,
        target: JourneyStage,
    ) -> JourneyResult<JourneyState> {
        let current = state.current_stage()?;
        let expected = current
            .next()
            .ok_or(JourneyError::TerminalStage(current))?;
        if target != expected {
            return Err(JourneyError::IllegalTransition {
                from: current,
                to: target,
                expected,
            });
        }

        self.repo
            .advance(&state.journey.user_id, target.as_str())
            .await?;
        self.load_or_create(&state.journey.user_id).await
    }

    /// Marks one milestone completed, returning the updated row.
    pub async fn complete_milestone(&self, id: &str) -> JourneyResult<JourneyMilestone> {
        Ok(self.repo.complete_milestone(id, Utc::now()).await?)
    }
}

/// Per-login journey session.
///
/// Replaces ambient context state: the session is constructed on login,
/// passed explicitly to whoever needs it, and dropped on logout. Mutating
/// operations update the cached state only on success; on failure the
/// cache is left untouched and a user-facing error string is recorded.
pub struct JourneySession {
    service: JourneyService,
    user_id: String,
    state: RwLock<JourneyState>,
    last_error: RwLock<Option<String>>,
}

impl JourneySession {
    /// Loads (or lazily creates) the user's journey and opens a session.
    pub async fn login(service: JourneyService, user_id: &str) -> JourneyResult<Self> {
        let state = service.load_or_create(user_id).await?;
        Ok(Self {
            service,
            user_id: user_id.to_owned(),
            state: RwLock::new(state),
            last_error: RwLock::new(None),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub async fn journey(&self) -> PatientJourney {
        self.state.read().await.journey.clone()
    }

    pub async fn milestones(&self) -> Vec<JourneyMilestone> {
        self.state.read().await.milestones.clone()
    }

    pub async fn progress_percentage(&self) -> u8 {
        self.state.read().await.progress_percentage()
    }

    pub async fn current_stage(&self) -> JourneyResult<JourneyStage> {
        Ok(self.state.read().await.current_stage()?)
    }

    /// The stage after the current one, or `None` at the terminal stage.
    pub async fn next_stage(&self) -> JourneyResult<Option<JourneyStage>> {
        Ok(self.state.read().await.current_stage()?.next())
    }

    /// The error string from the most recent failed mutation, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Refetches journey and milestones from the store.
    pub async fn refresh(&self) -> JourneyResult<()> {
        let fresh = self.service.load_or_create(&self.user_id).await?;
        *self.state.write().await = fresh;
        Ok(())
    }

    /// Advances to `target` via the remote procedure, then resynchronises.
    pub async fn advance(&self, target: JourneyStage) -> JourneyResult<()> {
        let snapshot = self.state.read().await.clone();
        match self.service.advance(&snapshot, target).await {
            Ok(fresh) => {
                *self.state.write().await = fresh;
                *self.last_error.write().await = None;
                Ok(())
            }
            Err(e) => {
                *self.last_error.write().await = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Completes one milestone and patches it into the cached state by id
    /// match. No refetch; a failure leaves the cache untouched.
    pub async fn complete_milestone(&self, id: &str) -> JourneyResult<()> {
        match self.service.complete_milestone(id).await {
            Ok(updated) => {
                let mut state = self.state.write().await;
                if let Some(slot) = state.milestones.iter_mut().find(|m| m.id == updated.id) {
                    *slot = updated;
                }
                *self.last_error.write().await = None;
                Ok(())
            }
            Err(e) => {
                *self.last_error.write().await = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Ends the session. Consumes it so no further operations are possible.
    pub fn logout(self) {
        tracing::debug!(user_id = %self.user_id, "journey session closed");
    }
}
