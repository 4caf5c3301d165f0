//! Unit tests for the task registry

use std::sync::Arc;

use mockup_generator::task::{PipelineOutcome, Stage, Task, TaskRegistry};

#[test]
fn test_stage_progression_is_visible() {
    let registry = TaskRegistry::new();
    let task = Task::accepted();
    registry.put(task.clone()).unwrap();

    for stage in [Stage::Generating, Stage::Storing, Stage::Emailing] {
        registry.replace(task.advance(stage)).unwrap();
        assert_eq!(registry.get(&task.id()).unwrap().stage, stage);
    }

    registry
        .replace(task.complete(PipelineOutcome {
            image_url: "http://localhost/mockups/a.png".to_string(),
            email_sent: true,
        }))
        .unwrap();

    let done = registry.get(&task.id()).unwrap();
    assert_eq!(done.stage, Stage::Completed);
    assert!(registry.replace(task.fail("late failure")).is_err());
    assert_eq!(registry.get(&task.id()).unwrap(), done);
}

#[test]
fn test_concurrent_writers_on_distinct_keys() {
    let registry = Arc::new(TaskRegistry::new());
    let tasks: Vec<Task> = (0..32).map(|_| Task::accepted()).collect();
    for task in &tasks {
        registry.put(task.clone()).unwrap();
    }

    let writers: Vec<_> = tasks
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, task)| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                registry.replace(task.advance(Stage::Generating)).unwrap();
                registry.replace(task.advance(Stage::Storing)).unwrap();
                let last = if i % 2 == 0 {
                    task.fail(format!("failure {}", i))
                } else {
                    task.complete(PipelineOutcome {
                        image_url: format!("http://localhost/mockups/{}.png", i),
                        email_sent: false,
                    })
                };
                registry.replace(last).unwrap();
            })
        })
        .collect();

    let reader = {
        let registry = registry.clone();
        let ids: Vec<_> = tasks.iter().map(Task::id).collect();
        std::thread::spawn(move || {
            for _ in 0..100 {
                for id in &ids {
                    let snapshot = registry.get(id).unwrap();
                    assert_eq!(snapshot.task_id, *id);
                }
            }
        })
    };

    for writer in writers {
        writer.join().unwrap();
    }
    reader.join().unwrap();

    for (i, task) in tasks.iter().enumerate() {
        let snapshot = registry.get(&task.id()).unwrap();
        if i % 2 == 0 {
            assert_eq!(snapshot.stage, Stage::Failed);
            assert_eq!(snapshot.error, Some(format!("failure {}", i)));
        } else {
            assert_eq!(snapshot.stage, Stage::Completed);
            assert_eq!(
                snapshot.image_url,
                Some(format!("http://localhost/mockups/{}.png", i))
            );
        }
    }
    assert_eq!(registry.count_in_stage(Stage::Failed), 16);
    assert_eq!(registry.count_in_stage(Stage::Completed), 16);
}
