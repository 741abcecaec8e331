use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, Weekday};

use crate::{Exercise, ExerciseID, MuscleGroup, ReadError, Reps, Weight, Workout, WorkoutID};

/// Number of entries reported in `WorkoutAnalytics::favorite_exercises`.
pub const FAVORITE_EXERCISE_COUNT: usize = 5;

/// Window of the muscle-group training frequency.
pub const FREQUENCY_WINDOW_DAYS: i64 = 30;

/// Average weeks per month, used to express the 30-day frequency in
/// workouts per week.
pub const WEEKS_PER_MONTH: f64 = 4.3;

pub trait AnalyticsService {
    fn get_workout_analytics(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<WorkoutAnalytics, ReadError>;
    fn get_exercise_analytics(
        &self,
        exercise_id: ExerciseID,
        start: Option<NaiveDateTime>,
    ) -> Result<ExerciseAnalytics, ReadError>;
    fn get_workout_streak(&self) -> Result<WorkoutStreak, ReadError>;
    fn get_muscle_group_stats(&self) -> Result<Vec<MuscleGroupStats>, ReadError>;
    fn get_progress_series(
        &self,
        exercise_id: ExerciseID,
        metric: ProgressMetric,
        days: u32,
    ) -> Result<Vec<ProgressPoint>, ReadError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutAnalytics {
    pub total_workouts: usize,
    pub total_volume: f64,
    pub total_sets: usize,
    pub total_reps: u32,
    /// Seconds.
    pub total_duration: u64,
    /// Seconds.
    pub average_workout_duration: f64,
    pub workouts_this_week: usize,
    pub workouts_this_month: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Most frequent exercises, occurrence count descending.
    pub favorite_exercises: Vec<(ExerciseID, usize)>,
    /// Share of recorded sets per muscle group in percent, descending.
    pub muscle_group_distribution: Vec<(MuscleGroup, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseAnalytics {
    pub exercise_id: ExerciseID,
    pub total_sets: usize,
    pub total_reps: u32,
    pub total_volume: f64,
    pub max_weight: Weight,
    pub average_weight: f64,
    pub average_reps: f64,
    pub last_performed: Option<NaiveDateTime>,
    /// One entry per calendar day with at least one completed set, ascending.
    pub performance_history: Vec<DailyPerformance>,
    pub personal_records: PersonalRecords,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyPerformance {
    pub date: NaiveDate,
    pub max_weight: Weight,
    pub total_volume: f64,
    pub total_sets: usize,
    pub average_reps: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PersonalRecords {
    pub max_weight: Weight,
    pub max_weight_date: Option<NaiveDateTime>,
    pub max_volume: f64,
    pub max_volume_date: Option<NaiveDateTime>,
    pub max_reps: Reps,
    pub max_reps_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutStreak {
    /// Consecutive training days ending today or yesterday; 0 otherwise.
    pub current: u32,
    pub longest: u32,
    pub last_workout_date: Option<NaiveDateTime>,
    pub streak_start_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MuscleGroupStats {
    pub muscle_group: MuscleGroup,
    pub total_sets: usize,
    pub total_volume: f64,
    pub last_trained: Option<NaiveDateTime>,
    /// Workouts per week over the last 30 days.
    pub frequency: f64,
    pub exercises: Vec<ExerciseID>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMetric {
    MaxWeight,
    TotalVolume,
    AverageReps,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub metric: ProgressMetric,
}

/// Aggregate statistics over `workouts`. The streak is computed over
/// `all_workouts`, independently of any date range applied to `workouts`.
#[must_use]
pub fn workout_analytics(
    workouts: &[Workout],
    all_workouts: &[Workout],
    exercises: &BTreeMap<ExerciseID, Exercise>,
) -> WorkoutAnalytics {
    let total_workouts = workouts.len();
    let total_duration = workouts.iter().map(|w| u64::from(w.duration)).sum::<u64>();
    #[allow(clippy::cast_precision_loss)]
    let average_workout_duration = if total_workouts > 0 {
        total_duration as f64 / total_workouts as f64
    } else {
        0.0
    };

    let mut total_volume = 0.0;
    let mut total_sets = 0;
    let mut total_reps = 0;
    let mut exercise_counts: BTreeMap<ExerciseID, usize> = BTreeMap::new();
    let mut muscle_group_sets: BTreeMap<MuscleGroup, usize> = BTreeMap::new();

    for workout in workouts {
        for workout_exercise in &workout.exercises {
            if let Some(exercise) = exercises.get(&workout_exercise.exercise_id) {
                *exercise_counts.entry(exercise.id).or_insert(0) += 1;

                // Every tag is credited with all recorded sets, completed
                // or not.
                for muscle_group in exercise.muscle_group_tags() {
                    *muscle_group_sets.entry(muscle_group).or_insert(0) +=
                        workout_exercise.sets.len();
                }
            }

            for set in workout_exercise.sets.iter().filter(|s| s.completed) {
                total_sets += 1;
                total_reps += u32::from(set.reps);
                total_volume += set.volume();
            }
        }
    }

    let today = Local::now().date_naive();
    let week_start = today.week(Weekday::Mon).first_day();
    let month_start = today.with_day(1).unwrap_or(today);
    let workouts_this_week = workouts
        .iter()
        .filter(|w| w.date.date() >= week_start)
        .count();
    let workouts_this_month = workouts
        .iter()
        .filter(|w| w.date.date() >= month_start)
        .count();

    let streak = workout_streak(all_workouts);

    let mut favorite_exercises = exercise_counts.into_iter().collect::<Vec<_>>();
    favorite_exercises.sort_by(|a, b| b.1.cmp(&a.1));
    favorite_exercises.truncate(FAVORITE_EXERCISE_COUNT);

    let total_muscle_group_sets = muscle_group_sets.values().sum::<usize>();
    let muscle_group_distribution = if total_muscle_group_sets == 0 {
        vec![]
    } else {
        #[allow(clippy::cast_precision_loss)]
        let mut distribution = muscle_group_sets
            .into_iter()
            .map(|(muscle_group, count)| {
                (
                    muscle_group,
                    count as f64 / total_muscle_group_sets as f64 * 100.0,
                )
            })
            .collect::<Vec<_>>();
        distribution.sort_by(|a, b| b.1.total_cmp(&a.1));
        distribution
    };

    WorkoutAnalytics {
        total_workouts,
        total_volume,
        total_sets,
        total_reps,
        total_duration,
        average_workout_duration,
        workouts_this_week,
        workouts_this_month,
        current_streak: streak.current,
        longest_streak: streak.longest,
        favorite_exercises,
        muscle_group_distribution,
    }
}

/// Walk all workout dates, most recent first, counting runs of consecutive
/// calendar days. Multiple workouts on the same day are streak-neutral.
#[must_use]
pub fn workout_streak(workouts: &[Workout]) -> WorkoutStreak {
    let mut dates = workouts.iter().map(|w| w.date).collect::<Vec<_>>();
    dates.sort_unstable_by(|a, b| b.cmp(a));

    let Some(&most_recent) = dates.first() else {
        return WorkoutStreak {
            current: 0,
            longest: 0,
            last_workout_date: None,
            streak_start_date: None,
        };
    };

    let mut longest = 0;
    let mut temp_streak = 1;
    let mut last_date = most_recent;
    let mut streak_start = most_recent;

    for &date in &dates[1..] {
        let gap = (last_date.date() - date.date()).num_days();

        if gap == 1 {
            temp_streak += 1;
            streak_start = date;
        } else if gap > 1 {
            longest = longest.max(temp_streak);
            temp_streak = 1;
            streak_start = last_date;
        }

        last_date = date;
    }

    longest = longest.max(temp_streak);

    let days_since_last_workout = (Local::now().date_naive() - most_recent.date()).num_days();
    let current = if days_since_last_workout <= 1 {
        temp_streak
    } else {
        0
    };

    WorkoutStreak {
        current,
        longest,
        last_workout_date: Some(most_recent),
        streak_start_date: (current > 0).then_some(streak_start),
    }
}

struct DayAccumulator {
    max_weight: Weight,
    total_volume: f64,
    total_sets: usize,
    total_reps: u32,
}

/// Statistics for one exercise over `workouts` (pre-filtered to the requested
/// range by the caller). Personal records always cover `all_workouts`.
#[must_use]
pub fn exercise_analytics(
    exercise_id: ExerciseID,
    workouts: &[Workout],
    all_workouts: &[Workout],
) -> ExerciseAnalytics {
    let mut total_sets = 0;
    let mut total_reps = 0;
    let mut total_volume = 0.0;
    let mut max_weight = Weight::ZERO;
    let mut weights = vec![];
    let mut reps_values = vec![];
    let mut last_performed: Option<NaiveDateTime> = None;
    let mut by_day: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();

    for workout in workouts {
        for workout_exercise in workout
            .exercises
            .iter()
            .filter(|e| e.exercise_id == exercise_id)
        {
            last_performed = Some(last_performed.map_or(workout.date, |d| d.max(workout.date)));

            let day = workout.date.date();

            for set in workout_exercise.sets.iter().filter(|s| s.completed) {
                total_sets += 1;
                total_reps += u32::from(set.reps);
                total_volume += set.volume();

                if set.weight > max_weight {
                    max_weight = set.weight;
                }

                weights.push(f64::from(set.weight));
                reps_values.push(f64::from(u32::from(set.reps)));

                // Sets on the same calendar day merge into one record.
                let entry = by_day.entry(day).or_insert(DayAccumulator {
                    max_weight: Weight::ZERO,
                    total_volume: 0.0,
                    total_sets: 0,
                    total_reps: 0,
                });
                entry.total_volume += set.volume();
                entry.total_sets += 1;
                entry.total_reps += u32::from(set.reps);
                if set.weight > entry.max_weight {
                    entry.max_weight = set.weight;
                }
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let average_weight = if weights.is_empty() {
        0.0
    } else {
        weights.iter().sum::<f64>() / weights.len() as f64
    };
    #[allow(clippy::cast_precision_loss)]
    let average_reps = if reps_values.is_empty() {
        0.0
    } else {
        reps_values.iter().sum::<f64>() / reps_values.len() as f64
    };

    #[allow(clippy::cast_precision_loss)]
    let performance_history = by_day
        .into_iter()
        .map(|(date, acc)| DailyPerformance {
            date,
            max_weight: acc.max_weight,
            total_volume: acc.total_volume,
            total_sets: acc.total_sets,
            average_reps: f64::from(acc.total_reps) / acc.total_sets as f64,
        })
        .collect();

    ExerciseAnalytics {
        exercise_id,
        total_sets,
        total_reps,
        total_volume,
        max_weight,
        average_weight,
        average_reps,
        last_performed,
        performance_history,
        personal_records: personal_records(exercise_id, all_workouts),
    }
}

/// Maxima of weight, volume and reps over every completed set ever recorded
/// against the exercise. Strictly-greater comparison: the first occurrence
/// of a value keeps the record.
#[must_use]
pub fn personal_records(exercise_id: ExerciseID, workouts: &[Workout]) -> PersonalRecords {
    let mut sorted = workouts.iter().collect::<Vec<_>>();
    sorted.sort_by_key(|w| w.date);

    let mut records = PersonalRecords::default();

    for workout in sorted {
        for workout_exercise in workout
            .exercises
            .iter()
            .filter(|e| e.exercise_id == exercise_id)
        {
            for set in workout_exercise.sets.iter().filter(|s| s.completed) {
                if set.weight > records.max_weight {
                    records.max_weight = set.weight;
                    records.max_weight_date = Some(workout.date);
                }

                if set.volume() > records.max_volume {
                    records.max_volume = set.volume();
                    records.max_volume_date = Some(workout.date);
                }

                if set.reps > records.max_reps {
                    records.max_reps = set.reps;
                    records.max_reps_date = Some(workout.date);
                }
            }
        }
    }

    records
}

struct MuscleGroupAccumulator {
    total_sets: usize,
    total_volume: f64,
    last_trained: Option<NaiveDateTime>,
    exercises: BTreeSet<ExerciseID>,
    recent_workouts: BTreeSet<WorkoutID>,
}

/// Per-muscle-group totals over all workouts, total sets descending.
#[must_use]
pub fn muscle_group_stats(
    workouts: &[Workout],
    exercises: &BTreeMap<ExerciseID, Exercise>,
) -> Vec<MuscleGroupStats> {
    let mut data: BTreeMap<MuscleGroup, MuscleGroupAccumulator> = BTreeMap::new();
    let window_start = Local::now().naive_local() - Duration::days(FREQUENCY_WINDOW_DAYS);

    for workout in workouts {
        for workout_exercise in &workout.exercises {
            let Some(exercise) = exercises.get(&workout_exercise.exercise_id) else {
                continue;
            };

            let completed_sets = workout_exercise.completed_sets();
            let completed_volume = workout_exercise.total_volume();

            for muscle_group in exercise.muscle_group_tags() {
                let entry = data
                    .entry(muscle_group)
                    .or_insert(MuscleGroupAccumulator {
                        total_sets: 0,
                        total_volume: 0.0,
                        last_trained: None,
                        exercises: BTreeSet::new(),
                        recent_workouts: BTreeSet::new(),
                    });

                entry.total_sets += completed_sets;
                entry.total_volume += completed_volume;
                entry.last_trained =
                    Some(entry.last_trained.map_or(workout.date, |d| d.max(workout.date)));
                entry.exercises.insert(exercise.id);

                if workout.date >= window_start {
                    entry.recent_workouts.insert(workout.id);
                }
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let mut stats = data
        .into_iter()
        .map(|(muscle_group, acc)| MuscleGroupStats {
            muscle_group,
            total_sets: acc.total_sets,
            total_volume: acc.total_volume,
            last_trained: acc.last_trained,
            frequency: acc.recent_workouts.len() as f64 / WEEKS_PER_MONTH,
            exercises: acc.exercises.into_iter().collect(),
        })
        .collect::<Vec<_>>();
    stats.sort_by(|a, b| b.total_sets.cmp(&a.total_sets));
    stats
}

/// Project a performance history onto a single metric.
#[must_use]
pub fn progress_series(
    history: &[DailyPerformance],
    metric: ProgressMetric,
) -> Vec<ProgressPoint> {
    history
        .iter()
        .map(|performance| ProgressPoint {
            date: performance.date,
            metric,
            value: match metric {
                ProgressMetric::MaxWeight => f64::from(performance.max_weight),
                ProgressMetric::TotalVolume => performance.total_volume,
                ProgressMetric::AverageReps => performance.average_reps,
            },
        })
        .collect()
}
