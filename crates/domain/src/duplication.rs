use chrono::NaiveDateTime;

use crate::{
    CreateError, Name, SetConfiguration, TemplateExercise, TemplateExerciseID, Workout,
    WorkoutExercise, WorkoutExerciseID, WorkoutID, WorkoutSet, WorkoutSetID, WorkoutTemplate,
    WorkoutTemplateID,
};

pub trait DuplicationService {
    /// Deep-copy a workout to a new date with completion and duration reset.
    /// All entity creations persist together or not at all.
    fn duplicate_workout(
        &self,
        id: WorkoutID,
        date: NaiveDateTime,
        name: Option<Name>,
    ) -> Result<Workout, CreateError>;
    fn create_template_from_workout(
        &self,
        id: WorkoutID,
        name: Name,
    ) -> Result<WorkoutTemplate, CreateError>;
    fn create_workout_from_template(
        &self,
        id: WorkoutTemplateID,
        date: NaiveDateTime,
        name: Option<Name>,
    ) -> Result<Workout, CreateError>;
}

/// Name of a duplicated workout when none is given.
#[must_use]
pub fn copy_name(source: &Name) -> Name {
    source.suffixed(" (Copy)")
}

/// Copy a workout's exercises and sets. Order indices are reassigned by
/// position, set values are kept, completion is reset and all IDs are nil
/// until the copies are persisted.
#[must_use]
pub fn duplicate_exercises(source: &Workout, date: NaiveDateTime) -> Vec<WorkoutExercise> {
    source
        .exercises
        .iter()
        .enumerate()
        .map(|(index, workout_exercise)| WorkoutExercise {
            id: WorkoutExerciseID::nil(),
            exercise_id: workout_exercise.exercise_id,
            #[allow(clippy::cast_possible_truncation)]
            order: index as u32,
            sets: workout_exercise
                .sets
                .iter()
                .map(|set| WorkoutSet {
                    id: WorkoutSetID::nil(),
                    set_number: set.set_number,
                    weight: set.weight,
                    reps: set.reps,
                    rest_time: set.rest_time,
                    completed: false,
                    created_at: date,
                })
                .collect(),
        })
        .collect()
}

/// Serialize a workout's exercises into template exercises. The stored
/// configurations reference no live sets.
#[must_use]
pub fn template_exercises(source: &Workout) -> Vec<TemplateExercise> {
    source
        .exercises
        .iter()
        .enumerate()
        .map(|(index, workout_exercise)| TemplateExercise {
            id: TemplateExerciseID::nil(),
            exercise_id: workout_exercise.exercise_id,
            #[allow(clippy::cast_possible_truncation)]
            order: index as u32,
            sets: workout_exercise
                .sets
                .iter()
                .map(|set| SetConfiguration {
                    set_number: Some(set.set_number),
                    weight: Some(set.weight),
                    reps: Some(set.reps),
                    rest_time: Some(set.rest_time),
                })
                .collect(),
        })
        .collect()
}

/// Instantiate a template's exercises into fresh workout exercises. Stored
/// order indices are kept; missing configuration fields fall back to their
/// defaults.
#[must_use]
pub fn instantiate_exercises(
    template: &WorkoutTemplate,
    date: NaiveDateTime,
) -> Vec<WorkoutExercise> {
    template
        .exercises
        .iter()
        .map(|template_exercise| WorkoutExercise {
            id: WorkoutExerciseID::nil(),
            exercise_id: template_exercise.exercise_id,
            order: template_exercise.order,
            sets: template_exercise
                .sets
                .iter()
                .map(|config| WorkoutSet {
                    id: WorkoutSetID::nil(),
                    set_number: config.set_number_or_default(),
                    weight: config.weight_or_default(),
                    reps: config.reps_or_default(),
                    rest_time: config.rest_time_or_default(),
                    completed: false,
                    created_at: date,
                })
                .collect(),
        })
        .collect()
}
