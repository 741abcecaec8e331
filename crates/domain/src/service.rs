use std::collections::BTreeMap;

use chrono::{Duration, Local, NaiveDateTime};
use log::{debug, error};

use crate::{
    AnalyticsService, Category, CreateError, DeleteError, DuplicationService, Exercise,
    ExerciseAnalytics, ExerciseFilter, ExerciseID, ExerciseRepository, ExerciseService,
    MuscleGroup, MuscleGroupStats, Name, ProgressMetric, ProgressPoint, ReadError,
    TemplateExercise, UpdateError, Workout, WorkoutAnalytics, WorkoutExercise, WorkoutID,
    WorkoutRepository, WorkoutService, WorkoutStreak, WorkoutTemplate, WorkoutTemplateID,
    WorkoutTemplateRepository, WorkoutTemplateService, analytics, duplication,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R>
where
    R: ExerciseRepository + WorkoutRepository + WorkoutTemplateRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::Unavailable) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: ExerciseRepository> Service<R> {
    fn read_exercises_logged(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(self.repository.read_exercises(), ReadError, "read", "exercises")
    }

    fn exercise_table(&self) -> Result<BTreeMap<ExerciseID, Exercise>, ReadError> {
        Ok(self
            .read_exercises_logged()?
            .into_iter()
            .map(|e| (e.id, e))
            .collect())
    }
}

impl<R: WorkoutRepository> Service<R> {
    fn read_workouts_logged(&self) -> Result<Vec<Workout>, ReadError> {
        log_on_error!(self.repository.read_workouts(), ReadError, "read", "workouts")
    }

    fn find_workout(&self, id: WorkoutID) -> Result<Workout, ReadError> {
        self.read_workouts_logged()?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or(ReadError::NotFound)
    }
}

impl<R: WorkoutTemplateRepository> Service<R> {
    fn read_templates_logged(&self) -> Result<Vec<WorkoutTemplate>, ReadError> {
        log_on_error!(self.repository.read_templates(), ReadError, "read", "templates")
    }

    fn find_template(&self, id: WorkoutTemplateID) -> Result<WorkoutTemplate, ReadError> {
        self.read_templates_logged()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(ReadError::NotFound)
    }
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        self.read_exercises_logged()
    }

    fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError> {
        self.read_exercises_logged()?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(ReadError::NotFound)
    }

    fn search_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>, ReadError> {
        let mut exercises = self.read_exercises_logged()?;
        exercises.retain(|e| filter.matches(e));
        Ok(exercises)
    }

    fn create_exercise(
        &self,
        name: Name,
        category: Category,
        muscle_groups: Vec<MuscleGroup>,
        notes: String,
    ) -> Result<Exercise, CreateError> {
        log_on_error!(
            self.repository
                .create_exercise(name, category, muscle_groups, notes),
            CreateError,
            "create",
            "exercise"
        )
    }

    fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError> {
        log_on_error!(
            self.repository.replace_exercise(exercise),
            UpdateError,
            "replace",
            "exercise"
        )
    }

    fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError> {
        log_on_error!(
            self.repository.delete_exercise(id),
            DeleteError,
            "delete",
            "exercise"
        )
    }
}

impl<R: WorkoutRepository> WorkoutService for Service<R> {
    fn get_workouts(&self) -> Result<Vec<Workout>, ReadError> {
        self.read_workouts_logged()
    }

    fn get_workout(&self, id: WorkoutID) -> Result<Workout, ReadError> {
        self.find_workout(id)
    }

    fn get_workouts_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Workout>, ReadError> {
        let mut workouts = self.read_workouts_logged()?;
        workouts.retain(|w| w.date >= start && w.date <= end);
        Ok(workouts)
    }

    fn create_workout(
        &self,
        name: Name,
        date: NaiveDateTime,
        notes: String,
        exercises: Vec<WorkoutExercise>,
    ) -> Result<Workout, CreateError> {
        log_on_error!(
            self.repository.create_workout(name, date, notes, exercises),
            CreateError,
            "create",
            "workout"
        )
    }

    fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError> {
        log_on_error!(
            self.repository.replace_workout(workout),
            UpdateError,
            "replace",
            "workout"
        )
    }

    fn end_workout(&self, id: WorkoutID, duration: u32) -> Result<Workout, UpdateError> {
        let mut workout = self.find_workout(id)?;
        workout.duration = duration;
        log_on_error!(
            self.repository.replace_workout(workout),
            UpdateError,
            "replace",
            "workout"
        )
    }

    fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
        log_on_error!(
            self.repository.delete_workout(id),
            DeleteError,
            "delete",
            "workout"
        )
    }
}

impl<R: WorkoutTemplateRepository> WorkoutTemplateService for Service<R> {
    fn get_templates(&self) -> Result<Vec<WorkoutTemplate>, ReadError> {
        self.read_templates_logged()
    }

    fn get_template(&self, id: WorkoutTemplateID) -> Result<WorkoutTemplate, ReadError> {
        self.find_template(id)
    }

    fn create_template(
        &self,
        name: Name,
        notes: String,
        exercises: Vec<TemplateExercise>,
    ) -> Result<WorkoutTemplate, CreateError> {
        log_on_error!(
            self.repository.create_template(name, notes, exercises),
            CreateError,
            "create",
            "template"
        )
    }

    fn replace_template(&self, template: WorkoutTemplate) -> Result<WorkoutTemplate, UpdateError> {
        log_on_error!(
            self.repository.replace_template(template),
            UpdateError,
            "replace",
            "template"
        )
    }

    fn delete_template(&self, id: WorkoutTemplateID) -> Result<WorkoutTemplateID, DeleteError> {
        log_on_error!(
            self.repository.delete_template(id),
            DeleteError,
            "delete",
            "template"
        )
    }
}

impl<R: WorkoutRepository + ExerciseRepository> AnalyticsService for Service<R> {
    fn get_workout_analytics(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<WorkoutAnalytics, ReadError> {
        let all_workouts = self.read_workouts_logged()?;
        let exercises = self.exercise_table()?;
        let workouts = all_workouts
            .iter()
            .filter(|w| {
                start.is_none_or(|start| w.date >= start) && end.is_none_or(|end| w.date <= end)
            })
            .cloned()
            .collect::<Vec<_>>();

        Ok(analytics::workout_analytics(
            &workouts,
            &all_workouts,
            &exercises,
        ))
    }

    fn get_exercise_analytics(
        &self,
        exercise_id: ExerciseID,
        start: Option<NaiveDateTime>,
    ) -> Result<ExerciseAnalytics, ReadError> {
        let all_workouts = self.read_workouts_logged()?;
        let workouts = all_workouts
            .iter()
            .filter(|w| start.is_none_or(|start| w.date >= start))
            .cloned()
            .collect::<Vec<_>>();

        Ok(analytics::exercise_analytics(
            exercise_id,
            &workouts,
            &all_workouts,
        ))
    }

    fn get_workout_streak(&self) -> Result<WorkoutStreak, ReadError> {
        Ok(analytics::workout_streak(&self.read_workouts_logged()?))
    }

    fn get_muscle_group_stats(&self) -> Result<Vec<MuscleGroupStats>, ReadError> {
        let workouts = self.read_workouts_logged()?;
        let exercises = self.exercise_table()?;

        Ok(analytics::muscle_group_stats(&workouts, &exercises))
    }

    fn get_progress_series(
        &self,
        exercise_id: ExerciseID,
        metric: ProgressMetric,
        days: u32,
    ) -> Result<Vec<ProgressPoint>, ReadError> {
        let start = Local::now().naive_local() - Duration::days(i64::from(days));
        let exercise_analytics = self.get_exercise_analytics(exercise_id, Some(start))?;

        Ok(analytics::progress_series(
            &exercise_analytics.performance_history,
            metric,
        ))
    }
}

impl<R: WorkoutRepository + WorkoutTemplateRepository> DuplicationService for Service<R> {
    fn duplicate_workout(
        &self,
        id: WorkoutID,
        date: NaiveDateTime,
        name: Option<Name>,
    ) -> Result<Workout, CreateError> {
        let source = self.find_workout(id)?;
        let name = name.unwrap_or_else(|| duplication::copy_name(&source.name));
        let exercises = duplication::duplicate_exercises(&source, date);

        log_on_error!(
            self.repository
                .create_workout(name, date, source.notes.clone(), exercises),
            CreateError,
            "create",
            "workout"
        )
    }

    fn create_template_from_workout(
        &self,
        id: WorkoutID,
        name: Name,
    ) -> Result<WorkoutTemplate, CreateError> {
        let source = self.find_workout(id)?;
        let exercises = duplication::template_exercises(&source);

        log_on_error!(
            self.repository
                .create_template(name, source.notes.clone(), exercises),
            CreateError,
            "create",
            "template"
        )
    }

    fn create_workout_from_template(
        &self,
        id: WorkoutTemplateID,
        date: NaiveDateTime,
        name: Option<Name>,
    ) -> Result<Workout, CreateError> {
        let template = self.find_template(id)?;
        let name = name.unwrap_or_else(|| template.name.clone());
        let exercises = duplication::instantiate_exercises(&template, date);

        log_on_error!(
            self.repository
                .create_workout(name, date, template.notes.clone(), exercises),
            CreateError,
            "create",
            "workout"
        )
    }
}
