use chrono::NaiveDateTime;
use derive_more::Deref;
use uuid::Uuid;

use crate::{CreateError, DeleteError, ExerciseID, Name, ReadError, Reps, RestTime, UpdateError, Weight};

pub trait WorkoutTemplateRepository {
    fn read_templates(&self) -> Result<Vec<WorkoutTemplate>, ReadError>;
    fn create_template(
        &self,
        name: Name,
        notes: String,
        exercises: Vec<TemplateExercise>,
    ) -> Result<WorkoutTemplate, CreateError>;
    fn replace_template(&self, template: WorkoutTemplate) -> Result<WorkoutTemplate, UpdateError>;
    fn delete_template(&self, id: WorkoutTemplateID) -> Result<WorkoutTemplateID, DeleteError>;
}

pub trait WorkoutTemplateService {
    fn get_templates(&self) -> Result<Vec<WorkoutTemplate>, ReadError>;
    fn get_template(&self, id: WorkoutTemplateID) -> Result<WorkoutTemplate, ReadError>;
    fn create_template(
        &self,
        name: Name,
        notes: String,
        exercises: Vec<TemplateExercise>,
    ) -> Result<WorkoutTemplate, CreateError>;
    fn replace_template(&self, template: WorkoutTemplate) -> Result<WorkoutTemplate, UpdateError>;
    fn delete_template(&self, id: WorkoutTemplateID) -> Result<WorkoutTemplateID, DeleteError>;
}

/// A reusable blueprint of exercises and set configurations, not tied to a
/// performed date.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutTemplate {
    pub id: WorkoutTemplateID,
    pub name: Name,
    pub notes: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Ordered by `order`.
    pub exercises: Vec<TemplateExercise>,
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutTemplateID(Uuid);

impl WorkoutTemplateID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutTemplateID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutTemplateID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateExercise {
    pub id: TemplateExerciseID,
    pub exercise_id: ExerciseID,
    pub order: u32,
    /// Stored configuration, not live sets.
    pub sets: Vec<SetConfiguration>,
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TemplateExerciseID(Uuid);

impl TemplateExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for TemplateExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for TemplateExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// One stored set of a template exercise. Fields absent or unreadable in the
/// stored representation are `None` and fall back to the documented defaults
/// when a workout is instantiated.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SetConfiguration {
    pub set_number: Option<u32>,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
    pub rest_time: Option<RestTime>,
}

impl SetConfiguration {
    #[must_use]
    pub fn set_number_or_default(&self) -> u32 {
        self.set_number.unwrap_or(1)
    }

    #[must_use]
    pub fn weight_or_default(&self) -> Weight {
        self.weight.unwrap_or(Weight::ZERO)
    }

    #[must_use]
    pub fn reps_or_default(&self) -> Reps {
        self.reps.unwrap_or(Reps::ZERO)
    }

    #[must_use]
    pub fn rest_time_or_default(&self) -> RestTime {
        self.rest_time.unwrap_or(RestTime::DEFAULT)
    }
}
