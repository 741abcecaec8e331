#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod analytics;
pub mod duplication;
mod error;
mod exercise;
mod name;
mod quantity;
mod service;
mod settings;
mod template;
mod workout;

pub use analytics::{
    AnalyticsService, DailyPerformance, ExerciseAnalytics, FAVORITE_EXERCISE_COUNT,
    FREQUENCY_WINDOW_DAYS, MuscleGroupStats, PersonalRecords, ProgressMetric, ProgressPoint,
    WEEKS_PER_MONTH, WorkoutAnalytics, WorkoutStreak,
};
pub use duplication::DuplicationService;
pub use error::{CreateError, DeleteError, ReadError, StorageError, UpdateError};
pub use exercise::{
    Category, CategoryError, Exercise, ExerciseFilter, ExerciseID, ExerciseRepository,
    ExerciseService, MuscleGroup, MuscleGroupError, Property,
};
pub use name::{Name, NameError};
pub use quantity::{Reps, RepsError, RestTime, RestTimeError, Weight, WeightError};
pub use service::Service;
pub use settings::{Settings, WeightUnit, format_duration, format_rest_time, format_weight};
pub use template::{
    SetConfiguration, TemplateExercise, TemplateExerciseID, WorkoutTemplate, WorkoutTemplateID,
    WorkoutTemplateRepository, WorkoutTemplateService,
};
pub use workout::{
    Workout, WorkoutExercise, WorkoutExerciseID, WorkoutID, WorkoutRepository, WorkoutService,
    WorkoutSet, WorkoutSetID, WorkoutStatus,
};
