//! The journey stage machine.
//!
//! Sixteen fixed checkpoints, linearly ordered, from the first inquiry to
//! the post-care outcome assessment. This enum is deliberately *closed*:
//! the remote store is the authority on a user's current stage, but every
//! stage the client reasons about must be one of these identifiers.

use serde::{Deserialize, Serialize};

/// Error returned when a remote stage value is not one of the sixteen
/// known identifiers.
#[derive(Debug, thiserror::Error)]
#[error("unknown journey stage: {0}")]
pub struct UnknownStage(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyStage {
    InitialInquiry,
    RecordsReview,
    TreatmentOptions,
    QuoteProvided,
    ConsultationScheduled,
    ConsultationCompleted,
    TreatmentBooked,
    TravelPlanning,
    PreTravelPreparation,
    ArrivalOrientation,
    PreTreatmentAssessment,
    TreatmentInProgress,
    ImmediateRecovery,
    DischargePlanning,
    ReturnTravel,
    OutcomeAssessment,
}

/// All stages in progression order.
pub const ALL_STAGES: [JourneyStage; 16] = [
    JourneyStage::InitialInquiry,
    JourneyStage::RecordsReview,
    JourneyStage::TreatmentOptions,
    JourneyStage::QuoteProvided,
    JourneyStage::ConsultationScheduled,
    JourneyStage::ConsultationCompleted,
    JourneyStage::TreatmentBooked,
    JourneyStage::TravelPlanning,
    JourneyStage::PreTravelPreparation,
    JourneyStage::ArrivalOrientation,
    JourneyStage::PreTreatmentAssessment,
    JourneyStage::TreatmentInProgress,
    JourneyStage::ImmediateRecovery,
    JourneyStage::DischargePlanning,
    JourneyStage::ReturnTravel,
    JourneyStage::OutcomeAssessment,
];

/// Number of steps in a complete journey.
pub const TOTAL_STEPS: u32 = ALL_STAGES.len() as u32;

impl JourneyStage {
    /// The stage identifier as stored remotely.
    pub fn as_str(&self) -> &'static str {
        match self {
            JourneyStage::InitialInquiry => "initial_inquiry",
            JourneyStage::RecordsReview => "records_review",
            JourneyStage::TreatmentOptions => "treatment_options",
            JourneyStage::QuoteProvided => "quote_provided",
            JourneyStage::ConsultationScheduled => "consultation_scheduled",
            JourneyStage::ConsultationCompleted => "consultation_completed",
            JourneyStage::TreatmentBooked => "treatment_booked",
            JourneyStage::TravelPlanning => "travel_planning",
            JourneyStage::PreTravelPreparation => "pre_travel_preparation",
            JourneyStage::ArrivalOrientation => "arrival_orientation",
            JourneyStage::PreTreatmentAssessment => "pre_treatment_assessment",
            JourneyStage::TreatmentInProgress => "treatment_in_progress",
            JourneyStage::ImmediateRecovery => "immediate_recovery",
            JourneyStage::DischargePlanning => "discharge_planning",
            JourneyStage::ReturnTravel => "return_travel",
            JourneyStage::OutcomeAssessment => "outcome_assessment",
        }
    }

    /// Human-readable title for UI rendering.
    pub fn title(&self) -> &'static str {
        match self {
            JourneyStage::InitialInquiry => "Initial inquiry",
            JourneyStage::RecordsReview => "Medical records review",
            JourneyStage::TreatmentOptions => "Treatment options",
            JourneyStage::QuoteProvided => "Quote provided",
            JourneyStage::ConsultationScheduled => "Consultation scheduled",
            JourneyStage::ConsultationCompleted => "Consultation completed",
            JourneyStage::TreatmentBooked => "Treatment booked",
            JourneyStage::TravelPlanning => "Travel planning",
            JourneyStage::PreTravelPreparation => "Pre-travel preparation",
            JourneyStage::ArrivalOrientation => "Arrival and orientation",
            JourneyStage::PreTreatmentAssessment => "Pre-treatment assessment",
            JourneyStage::TreatmentInProgress => "Treatment in progress",
            JourneyStage::ImmediateRecovery => "Immediate recovery",
            JourneyStage::DischargePlanning => "Discharge planning",
            JourneyStage::ReturnTravel => "Return travel",
            JourneyStage::OutcomeAssessment => "Outcome assessment",
        }
    }

    /// Short description of what happens at this stage.
    pub fn summary(&self) -> &'static str {
        match self {
            JourneyStage::InitialInquiry => "Tell us what care you are looking for.",
            JourneyStage::RecordsReview => "Our clinical team reviews your records.",
            JourneyStage::TreatmentOptions => "Suitable treatments and destinations are shortlisted.",
            JourneyStage::QuoteProvided => "You receive an itemised cost estimate.",
            JourneyStage::ConsultationScheduled => "A remote consultation is booked with the treating doctor.",
            JourneyStage::ConsultationCompleted => "The doctor confirms suitability for treatment.",
            JourneyStage::TreatmentBooked => "Your treatment dates are confirmed.",
            JourneyStage::TravelPlanning => "Flights and accommodation are arranged.",
            JourneyStage::PreTravelPreparation => "Pre-travel checks and paperwork are completed.",
            JourneyStage::ArrivalOrientation => "You arrive and meet your care coordinator.",
            JourneyStage::PreTreatmentAssessment => "Final in-person assessment before treatment.",
            JourneyStage::TreatmentInProgress => "Treatment is underway.",
            JourneyStage::ImmediateRecovery => "Supervised recovery at the facility.",
            JourneyStage::DischargePlanning => "Discharge and aftercare plan are agreed.",
            JourneyStage::ReturnTravel => "You are cleared to travel home.",
            JourneyStage::OutcomeAssessment => "Follow-up review of your treatment outcome.",
        }
    }

    /// One-based position of this stage in the progression.
    pub fn step(&self) -> u32 {
        ALL_STAGES
            .iter()
            .position(|stage| stage == self)
            .map(|index| index as u32 + 1)
            .unwrap_or(0)
    }

    /// The next stage in the progression, or `None` at the terminal stage.
    pub fn next(&self) -> Option<JourneyStage> {
        let index = ALL_STAGES.iter().position(|stage| stage == self)?;
        ALL_STAGES.get(index + 1).copied()
    }

    pub fn is_terminal(&self) -> bool {
        *self == JourneyStage::OutcomeAssessment
    }
}

impl std::fmt::Display for JourneyStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JourneyStage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STAGES
            .iter()
            .find(|stage| stage.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownStage(s.to_owned()))
    }
}
