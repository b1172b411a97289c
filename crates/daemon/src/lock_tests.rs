use super::*;

#[test]
fn acquire_writes_pid_and_a_second_acquire_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daemon.pid");

    let lock = InstanceLock::acquire(&path).unwrap();
    assert_eq!(lock.path(), path.as_path());

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.trim(), std::process::id().to_string());

    let second = InstanceLock::acquire(&path);
    assert!(matches!(second, Err(DaemonError::AlreadyRunning(_))));
}

#[test]
fn lock_is_released_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daemon.pid");

    {
        let _lock = InstanceLock::acquire(&path).unwrap();
    }

    let reacquired = InstanceLock::acquire(&path);
    assert!(reacquired.is_ok());
}
