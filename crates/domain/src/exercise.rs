use std::{
    collections::{BTreeSet, HashSet},
    slice::Iter,
};

use chrono::NaiveDateTime;
use derive_more::Deref;
use uuid::Uuid;

use crate::{CreateError, DeleteError, Name, ReadError, UpdateError};

pub trait ExerciseRepository {
    fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    fn create_exercise(
        &self,
        name: Name,
        category: Category,
        muscle_groups: Vec<MuscleGroup>,
        notes: String,
    ) -> Result<Exercise, CreateError>;
    fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError>;
    fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;
}

pub trait ExerciseService {
    fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError>;
    fn search_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>, ReadError>;
    fn create_exercise(
        &self,
        name: Name,
        category: Category,
        muscle_groups: Vec<MuscleGroup>,
        notes: String,
    ) -> Result<Exercise, CreateError>;
    fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError>;
    fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub category: Category,
    pub muscle_groups: Vec<MuscleGroup>,
    pub notes: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Exercise {
    /// Distinct muscle-group tags, duplicates collapsed.
    #[must_use]
    pub fn muscle_group_tags(&self) -> BTreeSet<MuscleGroup> {
        self.muscle_groups.iter().copied().collect()
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Category {
    Chest = 1,
    Back = 2,
    Shoulders = 3,
    Biceps = 4,
    Triceps = 5,
    Legs = 6,
    Core = 7,
    Cardio = 8,
    Other = 9,
}

impl Property for Category {
    fn iter() -> Iter<'static, Category> {
        static CATEGORIES: [Category; 9] = [
            Category::Chest,
            Category::Back,
            Category::Shoulders,
            Category::Biceps,
            Category::Triceps,
            Category::Legs,
            Category::Core,
            Category::Cardio,
            Category::Other,
        ];
        CATEGORIES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Category::Chest => "Chest",
            Category::Back => "Back",
            Category::Shoulders => "Shoulders",
            Category::Biceps => "Biceps",
            Category::Triceps => "Triceps",
            Category::Legs => "Legs",
            Category::Core => "Core",
            Category::Cardio => "Cardio",
            Category::Other => "Other",
        }
    }
}

impl TryFrom<u8> for Category {
    type Error = CategoryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Category::iter()
            .find(|c| **c as u8 == value)
            .copied()
            .ok_or(CategoryError::Invalid)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CategoryError {
    #[error("Invalid category")]
    Invalid,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum MuscleGroup {
    // Chest
    PectoralisMajor = 11,
    PectoralisMinor = 12,
    // Back
    LatissimusDorsi = 21,
    Trapezius = 22,
    Rhomboids = 23,
    ErectorSpinae = 24,
    // Shoulders
    AnteriorDeltoid = 31,
    MedialDeltoid = 32,
    PosteriorDeltoid = 33,
    // Arms
    BicepsBrachii = 41,
    TricepsBrachii = 42,
    Forearms = 43,
    // Legs
    Quadriceps = 51,
    Hamstrings = 52,
    Glutes = 53,
    Calves = 54,
    HipFlexors = 55,
    Adductors = 56,
    Abductors = 57,
    // Core
    RectusAbdominis = 61,
    Obliques = 62,
    TransverseAbdominis = 63,
}

impl Property for MuscleGroup {
    fn iter() -> Iter<'static, MuscleGroup> {
        static MUSCLE_GROUPS: [MuscleGroup; 22] = [
            MuscleGroup::PectoralisMajor,
            MuscleGroup::PectoralisMinor,
            MuscleGroup::LatissimusDorsi,
            MuscleGroup::Trapezius,
            MuscleGroup::Rhomboids,
            MuscleGroup::ErectorSpinae,
            MuscleGroup::AnteriorDeltoid,
            MuscleGroup::MedialDeltoid,
            MuscleGroup::PosteriorDeltoid,
            MuscleGroup::BicepsBrachii,
            MuscleGroup::TricepsBrachii,
            MuscleGroup::Forearms,
            MuscleGroup::Quadriceps,
            MuscleGroup::Hamstrings,
            MuscleGroup::Glutes,
            MuscleGroup::Calves,
            MuscleGroup::HipFlexors,
            MuscleGroup::Adductors,
            MuscleGroup::Abductors,
            MuscleGroup::RectusAbdominis,
            MuscleGroup::Obliques,
            MuscleGroup::TransverseAbdominis,
        ];
        MUSCLE_GROUPS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            MuscleGroup::PectoralisMajor => "Pectoralis Major",
            MuscleGroup::PectoralisMinor => "Pectoralis Minor",
            MuscleGroup::LatissimusDorsi => "Latissimus Dorsi",
            MuscleGroup::Trapezius => "Trapezius",
            MuscleGroup::Rhomboids => "Rhomboids",
            MuscleGroup::ErectorSpinae => "Erector Spinae",
            MuscleGroup::AnteriorDeltoid => "Anterior Deltoid",
            MuscleGroup::MedialDeltoid => "Medial Deltoid",
            MuscleGroup::PosteriorDeltoid => "Posterior Deltoid",
            MuscleGroup::BicepsBrachii => "Biceps Brachii",
            MuscleGroup::TricepsBrachii => "Triceps Brachii",
            MuscleGroup::Forearms => "Forearms",
            MuscleGroup::Quadriceps => "Quadriceps",
            MuscleGroup::Hamstrings => "Hamstrings",
            MuscleGroup::Glutes => "Glutes",
            MuscleGroup::Calves => "Calves",
            MuscleGroup::HipFlexors => "Hip Flexors",
            MuscleGroup::Adductors => "Adductors",
            MuscleGroup::Abductors => "Abductors",
            MuscleGroup::RectusAbdominis => "Rectus Abdominis",
            MuscleGroup::Obliques => "Obliques",
            MuscleGroup::TransverseAbdominis => "Transverse Abdominis",
        }
    }
}

impl MuscleGroup {
    #[must_use]
    pub fn category(self) -> Category {
        match self {
            MuscleGroup::PectoralisMajor | MuscleGroup::PectoralisMinor => Category::Chest,
            MuscleGroup::LatissimusDorsi
            | MuscleGroup::Trapezius
            | MuscleGroup::Rhomboids
            | MuscleGroup::ErectorSpinae => Category::Back,
            MuscleGroup::AnteriorDeltoid
            | MuscleGroup::MedialDeltoid
            | MuscleGroup::PosteriorDeltoid => Category::Shoulders,
            MuscleGroup::BicepsBrachii => Category::Biceps,
            MuscleGroup::TricepsBrachii => Category::Triceps,
            MuscleGroup::Forearms => Category::Other,
            MuscleGroup::Quadriceps
            | MuscleGroup::Hamstrings
            | MuscleGroup::Glutes
            | MuscleGroup::Calves
            | MuscleGroup::HipFlexors
            | MuscleGroup::Adductors
            | MuscleGroup::Abductors => Category::Legs,
            MuscleGroup::RectusAbdominis
            | MuscleGroup::Obliques
            | MuscleGroup::TransverseAbdominis => Category::Core,
        }
    }
}

impl TryFrom<u8> for MuscleGroup {
    type Error = MuscleGroupError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        MuscleGroup::iter()
            .find(|m| **m as u8 == value)
            .copied()
            .ok_or(MuscleGroupError::Invalid)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MuscleGroupError {
    #[error("Invalid muscle group")]
    Invalid,
}

#[derive(Default, PartialEq)]
pub struct ExerciseFilter {
    pub name: String,
    pub categories: HashSet<Category>,
    pub muscle_groups: HashSet<MuscleGroup>,
}

impl ExerciseFilter {
    #[must_use]
    pub fn exercises<'a>(
        &self,
        exercises: impl Iterator<Item = &'a Exercise>,
    ) -> Vec<&'a Exercise> {
        exercises.filter(|e| self.matches(e)).collect()
    }

    #[must_use]
    pub fn matches(&self, exercise: &Exercise) -> bool {
        let query = self.name.to_lowercase();
        let query = query.trim();

        (exercise.name.as_ref().to_lowercase().contains(query)
            || exercise.notes.to_lowercase().contains(query))
            && (self.categories.is_empty() || self.categories.contains(&exercise.category))
            && (self.muscle_groups.is_empty()
                || self
                    .muscle_groups
                    .iter()
                    .all(|m| exercise.muscle_groups.contains(m)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty() && self.categories.is_empty() && self.muscle_groups.is_empty()
    }
}

pub trait Property: Clone + Copy + Sized {
    fn iter() -> Iter<'static, Self>;
    fn name(self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn exercise(name: &str, category: Category, muscle_groups: &[MuscleGroup]) -> Exercise {
        Exercise {
            id: 1.into(),
            name: Name::new(name).unwrap(),
            category,
            muscle_groups: muscle_groups.to_vec(),
            notes: String::new(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_exercise_muscle_group_tags() {
        assert_eq!(
            exercise(
                "Deadlift",
                Category::Back,
                &[
                    MuscleGroup::ErectorSpinae,
                    MuscleGroup::Glutes,
                    MuscleGroup::ErectorSpinae,
                ],
            )
            .muscle_group_tags(),
            BTreeSet::from([MuscleGroup::ErectorSpinae, MuscleGroup::Glutes])
        );
    }

    #[test]
    fn test_exercise_id_nil() {
        assert!(ExerciseID::nil().is_nil());
        assert_eq!(ExerciseID::nil(), ExerciseID::default());
    }

    #[test]
    fn test_category_name() {
        let mut names = HashSet::new();

        for category in Category::iter() {
            let name = category.name();

            assert!(!name.is_empty());
            assert!(!names.contains(name));

            names.insert(name);
        }
    }

    #[test]
    fn test_category_try_from_u8() {
        for category in Category::iter() {
            assert_eq!(Category::try_from(*category as u8), Ok(*category));
        }

        assert_eq!(Category::try_from(0), Err(CategoryError::Invalid));
    }

    #[test]
    fn test_muscle_group_name() {
        let mut names = HashSet::new();

        for muscle_group in MuscleGroup::iter() {
            let name = muscle_group.name();

            assert!(!name.is_empty());
            assert!(!names.contains(name));

            names.insert(name);
        }
    }

    #[test]
    fn test_muscle_group_try_from_u8() {
        for muscle_group in MuscleGroup::iter() {
            assert_eq!(MuscleGroup::try_from(*muscle_group as u8), Ok(*muscle_group));
        }

        assert_eq!(MuscleGroup::try_from(0), Err(MuscleGroupError::Invalid));
    }

    #[test]
    fn test_muscle_group_category() {
        for muscle_group in MuscleGroup::iter() {
            let _ = muscle_group.category();
        }

        assert_eq!(MuscleGroup::Quadriceps.category(), Category::Legs);
        assert_eq!(MuscleGroup::Forearms.category(), Category::Other);
    }

    #[rstest]
    #[case::name_lower_case(
        ExerciseFilter { name: "push".into(), ..ExerciseFilter::default() },
        true
    )]
    #[case::name_upper_case(
        ExerciseFilter { name: "PUSH".into(), ..ExerciseFilter::default() },
        true
    )]
    #[case::name_mismatch(
        ExerciseFilter { name: "squat".into(), ..ExerciseFilter::default() },
        false
    )]
    #[case::category(
        ExerciseFilter { categories: [Category::Chest].into(), ..ExerciseFilter::default() },
        true
    )]
    #[case::category_mismatch(
        ExerciseFilter { categories: [Category::Legs].into(), ..ExerciseFilter::default() },
        false
    )]
    #[case::muscle_groups(
        ExerciseFilter {
            muscle_groups: [MuscleGroup::PectoralisMajor].into(),
            ..ExerciseFilter::default()
        },
        true
    )]
    #[case::muscle_groups_conjunction(
        ExerciseFilter {
            muscle_groups: [MuscleGroup::PectoralisMajor, MuscleGroup::Quadriceps].into(),
            ..ExerciseFilter::default()
        },
        false
    )]
    fn test_exercise_filter_matches(#[case] filter: ExerciseFilter, #[case] expected: bool) {
        let e = exercise(
            "Push Up",
            Category::Chest,
            &[MuscleGroup::PectoralisMajor, MuscleGroup::TricepsBrachii],
        );
        assert_eq!(filter.matches(&e), expected);
        assert_eq!(!filter.exercises([e].iter()).is_empty(), expected);
    }

    #[test]
    fn test_exercise_filter_is_empty() {
        assert!(ExerciseFilter::default().is_empty());
        assert!(
            !ExerciseFilter {
                name: "curl".into(),
                ..ExerciseFilter::default()
            }
            .is_empty()
        );
    }
}
