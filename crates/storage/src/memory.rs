use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

use chrono::{Local, NaiveDateTime};
use ironlog_domain as domain;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// In-memory object store: one table per entity type, keyed by ID. The whole
/// aggregate is stored as one record, so removing a workout or template drops
/// its owned children with it.
#[derive(Default)]
pub struct MemoryStore {
    exercises: RefCell<BTreeMap<Uuid, ExerciseRecord>>,
    workouts: RefCell<BTreeMap<Uuid, WorkoutRecord>>,
    templates: RefCell<BTreeMap<Uuid, TemplateRecord>>,
    unavailable: Cell<bool>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a storage fault. While set, every operation fails with
    /// `StorageError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    fn check_available(&self) -> Result<(), domain::StorageError> {
        if self.unavailable.get() {
            debug!("storage unavailable");
            return Err(domain::StorageError::Unavailable);
        }
        Ok(())
    }
}

impl domain::ExerciseRepository for MemoryStore {
    fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        self.check_available()?;

        let records = self.exercises.borrow().values().cloned().collect::<Vec<_>>();
        let mut exercises = records
            .into_iter()
            .map(|r| domain::Exercise::try_from(r).map_err(RecordError::into_read))
            .collect::<Result<Vec<_>, _>>()?;
        exercises.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(exercises)
    }

    fn create_exercise(
        &self,
        name: domain::Name,
        category: domain::Category,
        muscle_groups: Vec<domain::MuscleGroup>,
        notes: String,
    ) -> Result<domain::Exercise, domain::CreateError> {
        self.check_available()?;

        let now = Local::now().naive_local();
        let exercise = domain::Exercise {
            id: Uuid::new_v4().into(),
            name,
            category,
            muscle_groups,
            notes,
            created_at: now,
            updated_at: now,
        };
        self.exercises
            .borrow_mut()
            .insert(*exercise.id, ExerciseRecord::from(&exercise));

        Ok(exercise)
    }

    fn replace_exercise(
        &self,
        exercise: domain::Exercise,
    ) -> Result<domain::Exercise, domain::UpdateError> {
        self.check_available()?;

        let mut exercises = self.exercises.borrow_mut();
        let Some(existing) = exercises.get(&*exercise.id) else {
            return Err(domain::UpdateError::NotFound);
        };
        let exercise = domain::Exercise {
            created_at: existing.created_at,
            updated_at: Local::now().naive_local(),
            ..exercise
        };
        exercises.insert(*exercise.id, ExerciseRecord::from(&exercise));

        Ok(exercise)
    }

    fn delete_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::ExerciseID, domain::DeleteError> {
        self.check_available()?;

        // Workouts referencing the exercise are left untouched.
        self.exercises
            .borrow_mut()
            .remove(&*id)
            .map(|_| id)
            .ok_or(domain::DeleteError::NotFound)
    }
}

impl domain::WorkoutRepository for MemoryStore {
    fn read_workouts(&self) -> Result<Vec<domain::Workout>, domain::ReadError> {
        self.check_available()?;

        let records = self.workouts.borrow().values().cloned().collect::<Vec<_>>();
        let mut workouts = records
            .into_iter()
            .map(|r| domain::Workout::try_from(r).map_err(RecordError::into_read))
            .collect::<Result<Vec<_>, _>>()?;
        workouts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(workouts)
    }

    fn create_workout(
        &self,
        name: domain::Name,
        date: NaiveDateTime,
        notes: String,
        exercises: Vec<domain::WorkoutExercise>,
    ) -> Result<domain::Workout, domain::CreateError> {
        self.check_available()?;

        let now = Local::now().naive_local();
        let workout = domain::Workout {
            id: Uuid::new_v4().into(),
            name,
            date,
            notes,
            duration: 0,
            created_at: now,
            updated_at: now,
            exercises: normalize_workout_exercises(exercises),
        };
        self.workouts
            .borrow_mut()
            .insert(*workout.id, WorkoutRecord::from(&workout));

        Ok(workout)
    }

    fn replace_workout(
        &self,
        workout: domain::Workout,
    ) -> Result<domain::Workout, domain::UpdateError> {
        self.check_available()?;

        let mut workouts = self.workouts.borrow_mut();
        let Some(existing) = workouts.get(&*workout.id) else {
            return Err(domain::UpdateError::NotFound);
        };
        let mut workout = workout;
        workout.created_at = existing.created_at;
        workout.updated_at = Local::now().naive_local();
        workout.exercises = normalize_workout_exercises(workout.exercises);
        workouts.insert(*workout.id, WorkoutRecord::from(&workout));

        Ok(workout)
    }

    fn delete_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        self.check_available()?;

        self.workouts
            .borrow_mut()
            .remove(&*id)
            .map(|_| id)
            .ok_or(domain::DeleteError::NotFound)
    }
}

impl domain::WorkoutTemplateRepository for MemoryStore {
    fn read_templates(&self) -> Result<Vec<domain::WorkoutTemplate>, domain::ReadError> {
        self.check_available()?;

        let records = self.templates.borrow().values().cloned().collect::<Vec<_>>();
        let mut templates = records
            .into_iter()
            .map(|r| domain::WorkoutTemplate::try_from(r).map_err(RecordError::into_read))
            .collect::<Result<Vec<_>, _>>()?;
        templates.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(templates)
    }

    fn create_template(
        &self,
        name: domain::Name,
        notes: String,
        exercises: Vec<domain::TemplateExercise>,
    ) -> Result<domain::WorkoutTemplate, domain::CreateError> {
        self.check_available()?;

        let now = Local::now().naive_local();
        let template = domain::WorkoutTemplate {
            id: Uuid::new_v4().into(),
            name,
            notes,
            created_at: now,
            updated_at: now,
            exercises: normalize_template_exercises(exercises),
        };
        self.templates
            .borrow_mut()
            .insert(*template.id, TemplateRecord::from(&template));

        Ok(template)
    }

    fn replace_template(
        &self,
        template: domain::WorkoutTemplate,
    ) -> Result<domain::WorkoutTemplate, domain::UpdateError> {
        self.check_available()?;

        let mut templates = self.templates.borrow_mut();
        let Some(existing) = templates.get(&*template.id) else {
            return Err(domain::UpdateError::NotFound);
        };
        let mut template = template;
        template.created_at = existing.created_at;
        template.updated_at = Local::now().naive_local();
        template.exercises = normalize_template_exercises(template.exercises);
        templates.insert(*template.id, TemplateRecord::from(&template));

        Ok(template)
    }

    fn delete_template(
        &self,
        id: domain::WorkoutTemplateID,
    ) -> Result<domain::WorkoutTemplateID, domain::DeleteError> {
        self.check_available()?;

        self.templates
            .borrow_mut()
            .remove(&*id)
            .map(|_| id)
            .ok_or(domain::DeleteError::NotFound)
    }
}

/// Mint IDs for not-yet-persisted elements and restore the ordering
/// invariants of the aggregate.
fn normalize_workout_exercises(
    mut exercises: Vec<domain::WorkoutExercise>,
) -> Vec<domain::WorkoutExercise> {
    for exercise in &mut exercises {
        if exercise.id.is_nil() {
            exercise.id = Uuid::new_v4().into();
        }
        for set in &mut exercise.sets {
            if set.id.is_nil() {
                set.id = Uuid::new_v4().into();
            }
        }
        exercise.sets.sort_by_key(|s| s.set_number);
    }
    exercises.sort_by_key(|e| e.order);
    exercises
}

fn normalize_template_exercises(
    mut exercises: Vec<domain::TemplateExercise>,
) -> Vec<domain::TemplateExercise> {
    for exercise in &mut exercises {
        if exercise.id.is_nil() {
            exercise.id = Uuid::new_v4().into();
        }
    }
    exercises.sort_by_key(|e| e.order);
    exercises
}

#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error(transparent)]
    Name(#[from] domain::NameError),
    #[error(transparent)]
    Category(#[from] domain::CategoryError),
    #[error(transparent)]
    MuscleGroup(#[from] domain::MuscleGroupError),
    #[error(transparent)]
    Weight(#[from] domain::WeightError),
    #[error(transparent)]
    Reps(#[from] domain::RepsError),
    #[error(transparent)]
    RestTime(#[from] domain::RestTimeError),
}

impl RecordError {
    fn into_read(self) -> domain::ReadError {
        domain::ReadError::Storage(domain::StorageError::Other(Box::new(self)))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct ExerciseRecord {
    id: Uuid,
    name: String,
    category: u8,
    muscle_groups: Vec<u8>,
    notes: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<&domain::Exercise> for ExerciseRecord {
    fn from(exercise: &domain::Exercise) -> Self {
        Self {
            id: *exercise.id,
            name: exercise.name.as_ref().to_string(),
            category: exercise.category as u8,
            muscle_groups: exercise.muscle_groups.iter().map(|m| *m as u8).collect(),
            notes: exercise.notes.clone(),
            created_at: exercise.created_at,
            updated_at: exercise.updated_at,
        }
    }
}

impl TryFrom<ExerciseRecord> for domain::Exercise {
    type Error = RecordError;

    fn try_from(record: ExerciseRecord) -> Result<Self, Self::Error> {
        Ok(domain::Exercise {
            id: record.id.into(),
            name: domain::Name::new(&record.name)?,
            category: domain::Category::try_from(record.category)?,
            muscle_groups: record
                .muscle_groups
                .into_iter()
                .map(domain::MuscleGroup::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct WorkoutRecord {
    id: Uuid,
    name: String,
    date: NaiveDateTime,
    notes: String,
    duration: u32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    exercises: Vec<WorkoutExerciseRecord>,
}

impl From<&domain::Workout> for WorkoutRecord {
    fn from(workout: &domain::Workout) -> Self {
        Self {
            id: *workout.id,
            name: workout.name.as_ref().to_string(),
            date: workout.date,
            notes: workout.notes.clone(),
            duration: workout.duration,
            created_at: workout.created_at,
            updated_at: workout.updated_at,
            exercises: workout.exercises.iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<WorkoutRecord> for domain::Workout {
    type Error = RecordError;

    fn try_from(record: WorkoutRecord) -> Result<Self, Self::Error> {
        Ok(domain::Workout {
            id: record.id.into(),
            name: domain::Name::new(&record.name)?,
            date: record.date,
            notes: record.notes,
            duration: record.duration,
            created_at: record.created_at,
            updated_at: record.updated_at,
            exercises: record
                .exercises
                .into_iter()
                .map(domain::WorkoutExercise::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct WorkoutExerciseRecord {
    id: Uuid,
    exercise_id: Uuid,
    order: u32,
    sets: Vec<WorkoutSetRecord>,
}

impl From<&domain::WorkoutExercise> for WorkoutExerciseRecord {
    fn from(exercise: &domain::WorkoutExercise) -> Self {
        Self {
            id: *exercise.id,
            exercise_id: *exercise.exercise_id,
            order: exercise.order,
            sets: exercise.sets.iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<WorkoutExerciseRecord> for domain::WorkoutExercise {
    type Error = RecordError;

    fn try_from(record: WorkoutExerciseRecord) -> Result<Self, Self::Error> {
        Ok(domain::WorkoutExercise {
            id: record.id.into(),
            exercise_id: record.exercise_id.into(),
            order: record.order,
            sets: record
                .sets
                .into_iter()
                .map(domain::WorkoutSet::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct WorkoutSetRecord {
    id: Uuid,
    set_number: u32,
    weight: f64,
    reps: u32,
    rest_time: u32,
    completed: bool,
    created_at: NaiveDateTime,
}

impl From<&domain::WorkoutSet> for WorkoutSetRecord {
    fn from(set: &domain::WorkoutSet) -> Self {
        Self {
            id: *set.id,
            set_number: set.set_number,
            weight: set.weight.into(),
            reps: set.reps.into(),
            rest_time: set.rest_time.into(),
            completed: set.completed,
            created_at: set.created_at,
        }
    }
}

impl TryFrom<WorkoutSetRecord> for domain::WorkoutSet {
    type Error = RecordError;

    fn try_from(record: WorkoutSetRecord) -> Result<Self, Self::Error> {
        Ok(domain::WorkoutSet {
            id: record.id.into(),
            set_number: record.set_number,
            weight: domain::Weight::new(record.weight)?,
            reps: domain::Reps::new(record.reps)?,
            rest_time: domain::RestTime::new(record.rest_time)?,
            completed: record.completed,
            created_at: record.created_at,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct TemplateRecord {
    id: Uuid,
    name: String,
    notes: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    exercises: Vec<TemplateExerciseRecord>,
}

impl From<&domain::WorkoutTemplate> for TemplateRecord {
    fn from(template: &domain::WorkoutTemplate) -> Self {
        Self {
            id: *template.id,
            name: template.name.as_ref().to_string(),
            notes: template.notes.clone(),
            created_at: template.created_at,
            updated_at: template.updated_at,
            exercises: template.exercises.iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<TemplateRecord> for domain::WorkoutTemplate {
    type Error = RecordError;

    fn try_from(record: TemplateRecord) -> Result<Self, Self::Error> {
        Ok(domain::WorkoutTemplate {
            id: record.id.into(),
            name: domain::Name::new(&record.name)?,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
            exercises: record
                .exercises
                .into_iter()
                .map(domain::TemplateExercise::from)
                .collect(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct TemplateExerciseRecord {
    id: Uuid,
    exercise_id: Uuid,
    order: u32,
    /// JSON array of set configurations; parsed leniently on read.
    sets_configuration: String,
}

impl From<&domain::TemplateExercise> for TemplateExerciseRecord {
    fn from(exercise: &domain::TemplateExercise) -> Self {
        let configurations = exercise
            .sets
            .iter()
            .map(SetConfigurationRecord::from)
            .collect::<Vec<_>>();
        Self {
            id: *exercise.id,
            exercise_id: *exercise.exercise_id,
            order: exercise.order,
            sets_configuration: serde_json::to_string(&configurations)
                .unwrap_or_else(|_| String::from("[]")),
        }
    }
}

impl From<TemplateExerciseRecord> for domain::TemplateExercise {
    fn from(record: TemplateExerciseRecord) -> Self {
        domain::TemplateExercise {
            id: record.id.into(),
            exercise_id: record.exercise_id.into(),
            order: record.order,
            sets: parse_sets_configuration(&record.sets_configuration),
        }
    }
}

#[derive(Serialize, Debug, Default, Clone, PartialEq)]
struct SetConfigurationRecord {
    set_number: Option<u32>,
    weight: Option<f64>,
    reps: Option<u32>,
    rest_time: Option<u32>,
}

impl From<&domain::SetConfiguration> for SetConfigurationRecord {
    fn from(configuration: &domain::SetConfiguration) -> Self {
        Self {
            set_number: configuration.set_number,
            weight: configuration.weight.map(f64::from),
            reps: configuration.reps.map(u32::from),
            rest_time: configuration.rest_time.map(u32::from),
        }
    }
}

/// Field-level lenient parsing: a missing, mistyped or out-of-range field
/// becomes `None`, leaving the defaults to apply on instantiation. An
/// unreadable payload yields no configurations at all.
fn parse_sets_configuration(json: &str) -> Vec<domain::SetConfiguration> {
    let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(json) else {
        debug!("unreadable set configuration: {json}");
        return vec![];
    };

    values
        .iter()
        .map(|value| domain::SetConfiguration {
            set_number: value
                .get("set_number")
                .and_then(serde_json::Value::as_u64)
                .and_then(|n| u32::try_from(n).ok()),
            weight: value
                .get("weight")
                .and_then(serde_json::Value::as_f64)
                .and_then(|w| domain::Weight::new(w).ok()),
            reps: value
                .get("reps")
                .and_then(serde_json::Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .and_then(|r| domain::Reps::new(r).ok()),
            rest_time: value
                .get("rest_time")
                .and_then(serde_json::Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .and_then(|r| domain::RestTime::new(r).ok()),
        })
        .collect()
}
