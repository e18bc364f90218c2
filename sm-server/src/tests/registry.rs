use crate::tests::{script, spec};
use crate::{InstanceHandle, InstanceOptions, ProcessRegistry, SupervisorError};

use std::path::Path;
use std::time::Duration;

use googletest::prelude::*;
use serial_test::serial;
use tempfile::TempDir;
use tokio::sync::mpsc;

fn idle(dir: &Path, name: &str, id: u64) -> InstanceHandle {
    let program = script(dir, &format!("{name}-{id}.sh"), "exec sleep 30");
    let (tx, _rx) = mpsc::channel(64);
    InstanceHandle::spawn(spec(dir, name, &program), id, tx, &InstanceOptions::default()).unwrap()
}

async fn stop_all(registry: &mut ProcessRegistry) {
    for (_, handle) in registry.drain() {
        tokio::time::timeout(Duration::from_secs(10), handle.stop())
            .await
            .unwrap();
    }
}

#[tokio::test]
#[serial]
async fn given_registered_name_when_registering_again_then_rejected_and_original_kept() {
    // Given
    let temp = TempDir::new().unwrap();
    let mut registry = ProcessRegistry::new();
    registry.register("a1", idle(temp.path(), "a1", 1)).unwrap();

    // When
    let duplicate = idle(temp.path(), "a1", 2);
    let result = registry.register("a1", duplicate);

    // Then
    assert!(matches!(result, Err(SupervisorError::AlreadyRunning { .. })));
    assert_that!(registry.len(), eq(1));
    assert!(registry.is_current("a1", 1));
    assert!(!registry.is_current("a1", 2));
    stop_all(&mut registry).await;
}

#[tokio::test]
#[serial]
async fn given_unknown_name_when_unregistering_then_not_running() {
    // Given
    let mut registry = ProcessRegistry::new();

    // When
    let result = registry.unregister("nobody");

    // Then
    assert!(matches!(result, Err(SupervisorError::NotRunning { .. })));
    assert!(registry.is_empty());
}

#[tokio::test]
#[serial]
async fn given_several_instances_when_snapshot_then_sorted_with_pids() {
    // Given
    let temp = TempDir::new().unwrap();
    let mut registry = ProcessRegistry::new();
    registry.register("b1", idle(temp.path(), "b1", 1)).unwrap();
    registry.register("a1", idle(temp.path(), "a1", 2)).unwrap();

    // When
    let snapshot = registry.snapshot();

    // Then
    let names: Vec<&str> = snapshot.iter().map(|s| s.name.as_str()).collect();
    assert_that!(names, eq(&vec!["a1", "b1"]));
    assert!(snapshot.iter().all(|s| s.pid.is_some()));
    assert_that!(snapshot[0].spec.name(), eq("a1"));
    stop_all(&mut registry).await;
    assert!(registry.is_empty());
}
