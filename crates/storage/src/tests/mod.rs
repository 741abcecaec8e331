
use assert_approx_eq::assert_approx_eq;
use ironlog_domain as domain;

use domain::{
    AnalyticsService, DuplicationService, ExerciseService, ProgressMetric, Service,
    WorkoutService, WorkoutTemplateService,
};
use pretty_assertions::assert_eq;

use crate::MemoryStore;

fn service() -> Service<MemoryStore> {
    Service::new(MemoryStore::new())
}

#[test]
fn test_workout_crud_through_service() {
    let service = service();

    let exercise = service
        .create_exercise(
            domain::Name::new("Bench Press").unwrap(),
            domain::Category::Chest,
            vec![domain::MuscleGroup::PectoralisMajor],
            String::new(),
        )
        .unwrap();
    let workout = service
        .create_workout(
            domain::Name::new("Push Day").unwrap(),
            data::at(0),
            String::new(),
            vec![data::workout_exercise(exercise.id, 0)],
        )
        .unwrap();

    assert_eq!(service.get_workout(workout.id).unwrap(), workout);
    assert_eq!(
        service.get_workouts_between(data::at(1), data::at(0)).unwrap(),
        vec![workout.clone()]
    );
    assert!(
        service
            .get_workouts_between(data::at(10), data::at(5))
            .unwrap()
            .is_empty()
    );

    let ended = service.end_workout(workout.id, 3600).unwrap();
    assert_eq!(ended.duration, 3600);
    assert_eq!(service.get_workout(workout.id).unwrap().duration, 3600);

    service.delete_workout(workout.id).unwrap();
    assert!(matches!(
        service.get_workout(workout.id),
        Err(domain::ReadError::NotFound)
    ));
}

#[test]
fn test_exercise_search_through_service() {
    let service = service();

    service
        .create_exercise(
            domain::Name::new("Bench Press").unwrap(),
            domain::Category::Chest,
            vec![domain::MuscleGroup::PectoralisMajor],
            String::new(),
        )
        .unwrap();
    service
        .create_exercise(
            domain::Name::new("Squat").unwrap(),
            domain::Category::Legs,
            vec![domain::MuscleGroup::Quadriceps],
            String::new(),
        )
        .unwrap();

    let filter = domain::ExerciseFilter {
        name: "bench".into(),
        ..domain::ExerciseFilter::default()
    };
    let found = service.search_exercises(&filter).unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, domain::Name::new("Bench Press").unwrap());
}

#[test]
fn test_analytics_through_service() {
    let service = service();

    let bench = service
        .create_exercise(
            domain::Name::new("Bench Press").unwrap(),
            domain::Category::Chest,
            vec![
                domain::MuscleGroup::PectoralisMajor,
                domain::MuscleGroup::TricepsBrachii,
            ],
            String::new(),
        )
        .unwrap();
    let squat = service
        .create_exercise(
            domain::Name::new("Squat").unwrap(),
            domain::Category::Legs,
            vec![domain::MuscleGroup::Quadriceps],
            String::new(),
        )
        .unwrap();

    service
        .create_workout(
            domain::Name::new("Push Day").unwrap(),
            data::at(1),
            String::new(),
            vec![domain::WorkoutExercise {
                id: domain::WorkoutExerciseID::nil(),
                exercise_id: bench.id,
                order: 0,
                sets: vec![
                    data::set(1, 100.0, 5, true),
                    data::set(2, 110.0, 3, true),
                ],
            }],
        )
        .unwrap();
    service
        .create_workout(
            domain::Name::new("Leg Day").unwrap(),
            data::at(0),
            String::new(),
            vec![domain::WorkoutExercise {
                id: domain::WorkoutExerciseID::nil(),
                exercise_id: squat.id,
                order: 0,
                sets: vec![data::set(1, 140.0, 5, true)],
            }],
        )
        .unwrap();

    let analytics = service.get_workout_analytics(None, None).unwrap();
    assert_eq!(analytics.total_workouts, 2);
    assert_eq!(analytics.total_sets, 3);
    assert_eq!(analytics.total_reps, 13);
    assert_approx_eq!(analytics.total_volume, 500.0 + 330.0 + 700.0);
    assert_eq!(analytics.current_streak, 2);
    assert_eq!(analytics.longest_streak, 2);
    assert_eq!(analytics.favorite_exercises.len(), 2);
    assert!(analytics.favorite_exercises.iter().all(|(_, n)| *n == 1));
    assert_eq!(
        analytics.muscle_group_distribution[0].0,
        domain::MuscleGroup::PectoralisMajor
    );
    assert_approx_eq!(analytics.muscle_group_distribution[0].1, 40.0);
    assert_approx_eq!(
        analytics
            .muscle_group_distribution
            .iter()
            .map(|(_, p)| p)
            .sum::<f64>(),
        100.0
    );

    let bench_analytics = service.get_exercise_analytics(bench.id, None).unwrap();
    assert_eq!(bench_analytics.total_sets, 2);
    assert_approx_eq!(bench_analytics.total_volume, 830.0);
    assert_eq!(
        bench_analytics.max_weight,
        domain::Weight::new(110.0).unwrap()
    );
    assert_eq!(bench_analytics.last_performed, Some(data::at(1)));
    assert_eq!(bench_analytics.performance_history.len(), 1);
    assert_eq!(
        bench_analytics.personal_records.max_weight,
        domain::Weight::new(110.0).unwrap()
    );

    let series = service
        .get_progress_series(bench.id, ProgressMetric::MaxWeight, 30)
        .unwrap();
    assert_eq!(series.len(), 1);
    assert_approx_eq!(series[0].value, 110.0);

    let stats = service.get_muscle_group_stats().unwrap();
    assert_eq!(stats[0].muscle_group, domain::MuscleGroup::PectoralisMajor);
    assert_eq!(stats[0].total_sets, 2);
    assert_eq!(stats[0].exercises, vec![bench.id]);

    let streak = service.get_workout_streak().unwrap();
    assert_eq!(streak.current, 2);
    assert_eq!(streak.last_workout_date, Some(data::at(0)));
}

#[test]
fn test_duplicate_workout_through_service() {
    let service = service();

    let source = service
        .create_workout(
            domain::Name::new("Push Day").unwrap(),
            data::at(7),
            String::from("Felt strong"),
            vec![
                data::workout_exercise(1.into(), 0),
                data::workout_exercise(2.into(), 1),
            ],
        )
        .unwrap();
    let source = service.end_workout(source.id, 3600).unwrap();

    let copy = service
        .duplicate_workout(source.id, data::at(0), None)
        .unwrap();

    assert_ne!(copy.id, source.id);
    assert_eq!(copy.name, domain::Name::new("Push Day (Copy)").unwrap());
    assert_eq!(copy.date, data::at(0));
    assert_eq!(copy.notes, source.notes);
    assert_eq!(copy.duration, 0);
    assert_eq!(copy.exercises.len(), source.exercises.len());

    for (copied, original) in copy.exercises.iter().zip(&source.exercises) {
        assert_ne!(copied.id, original.id);
        assert_eq!(copied.exercise_id, original.exercise_id);
        assert_eq!(copied.order, original.order);
        assert_eq!(copied.sets.len(), original.sets.len());

        for (copied_set, original_set) in copied.sets.iter().zip(&original.sets) {
            assert_eq!(copied_set.set_number, original_set.set_number);
            assert_eq!(copied_set.weight, original_set.weight);
            assert_eq!(copied_set.reps, original_set.reps);
            assert_eq!(copied_set.rest_time, original_set.rest_time);
            assert!(!copied_set.completed);
        }
    }

    assert_eq!(service.get_workouts().unwrap().len(), 2);
}

#[test]
fn test_template_round_trip_through_service() {
    let service = service();

    let source = service
        .create_workout(
            domain::Name::new("Pull Day").unwrap(),
            data::at(3),
            String::from("Back and biceps"),
            vec![
                data::workout_exercise(1.into(), 0),
                data::workout_exercise(2.into(), 1),
            ],
        )
        .unwrap();

    let template = service
        .create_template_from_workout(source.id, domain::Name::new("Pull Template").unwrap())
        .unwrap();

    assert_eq!(template.notes, source.notes);
    assert_eq!(template.exercises.len(), source.exercises.len());
    assert_eq!(service.get_template(template.id).unwrap(), template);

    let instantiated = service
        .create_workout_from_template(template.id, data::at(0), None)
        .unwrap();

    assert_eq!(instantiated.name, domain::Name::new("Pull Template").unwrap());
    assert_eq!(instantiated.date, data::at(0));
    assert_eq!(instantiated.duration, 0);
    assert_eq!(instantiated.exercises.len(), source.exercises.len());

    for (new_exercise, original) in instantiated.exercises.iter().zip(&source.exercises) {
        assert_eq!(new_exercise.exercise_id, original.exercise_id);
        assert_eq!(new_exercise.sets.len(), original.sets.len());

        for (new_set, original_set) in new_exercise.sets.iter().zip(&original.sets) {
            assert_eq!(new_set.set_number, original_set.set_number);
            assert_eq!(new_set.weight, original_set.weight);
            assert_eq!(new_set.reps, original_set.reps);
            assert_eq!(new_set.rest_time, original_set.rest_time);
            assert!(!new_set.completed);
        }
    }
}

#[test]
fn test_missing_entities_through_service() {
    let service = service();

    assert!(matches!(
        service.get_workout(domain::WorkoutID::nil()),
        Err(domain::ReadError::NotFound)
    ));
    assert!(matches!(
        service.end_workout(domain::WorkoutID::nil(), 60),
        Err(domain::UpdateError::NotFound)
    ));
    assert!(matches!(
        service.duplicate_workout(domain::WorkoutID::nil(), data::at(0), None),
        Err(domain::CreateError::Other(_))
    ));
    assert!(matches!(
        service.create_workout_from_template(domain::WorkoutTemplateID::nil(), data::at(0), None),
        Err(domain::CreateError::Other(_))
    ));
}

#[test]
fn test_unavailable_store_surfaces_through_service() {
    let store = MemoryStore::new();
    store.set_unavailable(true);
    let service = Service::new(store);

    assert!(matches!(
        service.get_workout_analytics(None, None),
        Err(domain::ReadError::Storage(domain::StorageError::Unavailable))
    ));
    assert!(matches!(
        service.get_muscle_group_stats(),
        Err(domain::ReadError::Storage(domain::StorageError::Unavailable))
    ));
}
