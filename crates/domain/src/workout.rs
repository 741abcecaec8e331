use std::collections::BTreeSet;

use chrono::{Local, NaiveDateTime};
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, ExerciseID, Name, ReadError, Reps, RestTime, UpdateError, Weight,
};

pub trait WorkoutRepository {
    /// All workouts, most recent first.
    fn read_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    fn create_workout(
        &self,
        name: Name,
        date: NaiveDateTime,
        notes: String,
        exercises: Vec<WorkoutExercise>,
    ) -> Result<Workout, CreateError>;
    fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError>;
    fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;
}

pub trait WorkoutService {
    fn get_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    fn get_workout(&self, id: WorkoutID) -> Result<Workout, ReadError>;
    fn get_workouts_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Workout>, ReadError>;
    fn create_workout(
        &self,
        name: Name,
        date: NaiveDateTime,
        notes: String,
        exercises: Vec<WorkoutExercise>,
    ) -> Result<Workout, CreateError>;
    fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError>;
    fn end_workout(&self, id: WorkoutID, duration: u32) -> Result<Workout, UpdateError>;
    fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub name: Name,
    pub date: NaiveDateTime,
    pub notes: String,
    /// Seconds; 0 until the workout has been ended.
    pub duration: u32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Owned exclusively, ordered by `order`.
    pub exercises: Vec<WorkoutExercise>,
}

impl Workout {
    #[must_use]
    pub fn exercise_ids(&self) -> BTreeSet<ExerciseID> {
        self.exercises
            .iter()
            .map(|e| e.exercise_id)
            .collect::<BTreeSet<_>>()
    }

    #[must_use]
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    #[must_use]
    pub fn completed_sets(&self) -> usize {
        self.exercises
            .iter()
            .map(WorkoutExercise::completed_sets)
            .sum()
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        let total_sets = self.total_sets();
        if total_sets == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.completed_sets() as f64 / total_sets as f64
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.total_sets() > 0 && self.completed_sets() == self.total_sets()
    }

    #[must_use]
    pub fn total_volume(&self) -> f64 {
        self.exercises.iter().map(WorkoutExercise::total_volume).sum()
    }

    #[must_use]
    pub fn status(&self) -> WorkoutStatus {
        if self.is_completed() {
            WorkoutStatus::Completed
        } else if self.completed_sets() > 0 {
            WorkoutStatus::InProgress
        } else {
            WorkoutStatus::Planned
        }
    }
}

/// Observed lifecycle; transitions are driven by set updates, not by this
/// crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutStatus {
    Planned,
    InProgress,
    Completed,
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(Uuid);

impl WorkoutID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutExercise {
    pub id: WorkoutExerciseID,
    /// Shared reference; the exercise is never deleted along with a workout.
    pub exercise_id: ExerciseID,
    pub order: u32,
    /// Ordered by `set_number`.
    pub sets: Vec<WorkoutSet>,
}

impl WorkoutExercise {
    #[must_use]
    pub fn total_volume(&self) -> f64 {
        self.sets
            .iter()
            .filter(|s| s.completed)
            .map(WorkoutSet::volume)
            .sum()
    }

    #[must_use]
    pub fn completed_sets(&self) -> usize {
        self.sets.iter().filter(|s| s.completed).count()
    }

    #[must_use]
    pub fn last_set(&self) -> Option<&WorkoutSet> {
        self.sets.last()
    }

    /// Blueprint for the next set, copying the values of the last one if
    /// there is any.
    #[must_use]
    pub fn next_set(&self, default_rest_time: RestTime) -> WorkoutSet {
        let set_number = self.last_set().map_or(1, |s| s.set_number + 1);
        let (weight, reps, rest_time) = self
            .last_set()
            .map_or((Weight::ZERO, Reps::ZERO, default_rest_time), |s| {
                (s.weight, s.reps, s.rest_time)
            });

        WorkoutSet {
            id: WorkoutSetID::nil(),
            set_number,
            weight,
            reps,
            rest_time,
            completed: false,
            created_at: Local::now().naive_local(),
        }
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutExerciseID(Uuid);

impl WorkoutExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSet {
    pub id: WorkoutSetID,
    /// 1-based position within the exercise.
    pub set_number: u32,
    pub weight: Weight,
    pub reps: Reps,
    pub rest_time: RestTime,
    /// Only completed sets count toward volume, rep and record aggregates.
    pub completed: bool,
    pub created_at: NaiveDateTime,
}

impl WorkoutSet {
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.weight * self.reps
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutSetID(Uuid);

impl WorkoutSetID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutSetID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutSetID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn set(set_number: u32, weight: f64, reps: u32, completed: bool) -> WorkoutSet {
        WorkoutSet {
            id: WorkoutSetID::from(u128::from(set_number)),
            set_number,
            weight: Weight::new(weight).unwrap(),
            reps: Reps::new(reps).unwrap(),
            rest_time: RestTime::new(90).unwrap(),
            completed,
            created_at: NaiveDateTime::default(),
        }
    }

    fn workout(exercises: Vec<WorkoutExercise>) -> Workout {
        Workout {
            id: 1.into(),
            name: Name::new("Upper Body Day").unwrap(),
            date: NaiveDateTime::default(),
            notes: String::new(),
            duration: 0,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
            exercises,
        }
    }

    static WORKOUT: std::sync::LazyLock<Workout> = std::sync::LazyLock::new(|| {
        workout(vec![
            WorkoutExercise {
                id: 1.into(),
                exercise_id: 1.into(),
                order: 0,
                sets: vec![
                    set(1, 100.0, 5, true),
                    set(2, 110.0, 3, true),
                    set(3, 120.0, 1, false),
                ],
            },
            WorkoutExercise {
                id: 2.into(),
                exercise_id: 2.into(),
                order: 1,
                sets: vec![set(1, 30.0, 12, true)],
            },
        ])
    });

    #[test]
    fn test_workout_exercise_ids() {
        assert_eq!(WORKOUT.exercise_ids(), BTreeSet::from([1.into(), 2.into()]));
    }

    #[test]
    fn test_workout_set_counts() {
        assert_eq!(WORKOUT.total_sets(), 4);
        assert_eq!(WORKOUT.completed_sets(), 3);
    }

    #[test]
    fn test_workout_progress() {
        assert_eq!(WORKOUT.progress(), 0.75);
        assert_eq!(workout(vec![]).progress(), 0.0);
    }

    #[test]
    fn test_workout_total_volume() {
        // Incomplete sets contribute nothing.
        assert_eq!(WORKOUT.total_volume(), 500.0 + 330.0 + 360.0);
    }

    #[rstest]
    #[case::planned(&[], WorkoutStatus::Planned, false)]
    #[case::planned_with_sets(&[(100.0, false), (100.0, false)], WorkoutStatus::Planned, false)]
    #[case::in_progress(&[(100.0, true), (100.0, false)], WorkoutStatus::InProgress, false)]
    #[case::completed(&[(100.0, true), (100.0, true)], WorkoutStatus::Completed, true)]
    fn test_workout_status(
        #[case] sets: &[(f64, bool)],
        #[case] expected: WorkoutStatus,
        #[case] expected_completed: bool,
    ) {
        let w = workout(vec![WorkoutExercise {
            id: 1.into(),
            exercise_id: 1.into(),
            order: 0,
            sets: sets
                .iter()
                .enumerate()
                .map(|(i, (weight, completed))| {
                    #[allow(clippy::cast_possible_truncation)]
                    set(i as u32 + 1, *weight, 5, *completed)
                })
                .collect(),
        }]);
        assert_eq!(w.status(), expected);
        assert_eq!(w.is_completed(), expected_completed);
    }

    #[test]
    fn test_workout_exercise_totals() {
        let exercise = &WORKOUT.exercises[0];
        assert_eq!(exercise.total_volume(), 830.0);
        assert_eq!(exercise.completed_sets(), 2);
        assert_eq!(exercise.last_set().map(|s| s.set_number), Some(3));
    }

    #[test]
    fn test_workout_set_volume() {
        assert_eq!(set(1, 102.5, 4, true).volume(), 410.0);
        assert_eq!(set(1, 102.5, 4, false).volume(), 410.0);
    }

    #[test]
    fn test_next_set_copies_last_values() {
        let next = WORKOUT.exercises[0].next_set(RestTime::DEFAULT);

        assert!(next.id.is_nil());
        assert_eq!(next.set_number, 4);
        assert_eq!(next.weight, Weight::new(120.0).unwrap());
        assert_eq!(next.reps, Reps::new(1).unwrap());
        assert_eq!(next.rest_time, RestTime::new(90).unwrap());
        assert!(!next.completed);
    }

    #[test]
    fn test_next_set_without_previous_sets() {
        let exercise = WorkoutExercise {
            id: 1.into(),
            exercise_id: 1.into(),
            order: 0,
            sets: vec![],
        };
        let next = exercise.next_set(RestTime::DEFAULT);

        assert_eq!(next.set_number, 1);
        assert_eq!(next.weight, Weight::ZERO);
        assert_eq!(next.reps, Reps::ZERO);
        assert_eq!(next.rest_time, RestTime::DEFAULT);
        assert!(!next.completed);
    }

    #[test]
    fn test_workout_id_nil() {
        assert!(WorkoutID::nil().is_nil());
        assert!(WorkoutExerciseID::nil().is_nil());
        assert!(WorkoutSetID::nil().is_nil());
    }
}
