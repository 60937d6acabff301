use std::{thread, time::Duration};

use named_event::{Access, Error, NameCollision, Registry, WaitStatus};

#[test]
fn create_opens_existing_by_default() {
    let registry = Registry::new();
    let (event, existed) = registry.create_or_open(Some("E"), true, true).unwrap();
    assert!(!existed);

    // Reset mode and initial state of the second call are ignored.
    let (again, existed) = registry.create_or_open(Some("E"), false, false).unwrap();
    assert!(existed);
    assert_ne!(event, again);

    let info = registry.handle_info(again).unwrap();
    assert!(info.manual_reset);
    assert!(info.signaled);
    assert_eq!(info.refs, 2);
    assert_eq!(registry.len(), 1);
}

#[test]
fn create_fails_on_collision_when_strict() {
    let registry = Registry::builder()
        .name_collision(NameCollision::Fail)
        .build();
    let event = registry.create(Some("E"), true, false).unwrap();

    assert_eq!(
        registry.create(Some("E"), true, false),
        Err(Error::AlreadyExists("E".into()))
    );
    assert_eq!(registry.handle_count(), 1);

    registry.close(event).unwrap();
    registry.create(Some("E"), true, false).unwrap();
}

#[test]
fn open_unknown_name() {
    let registry = Registry::new();
    assert_eq!(
        registry.open("missing", Access::ALL, false),
        Err(Error::NotFound("missing".into()))
    );
    assert_eq!(
        registry.open("", Access::ALL, false),
        Err(Error::InvalidParameter("event name must not be empty"))
    );
    assert!(registry.is_empty());
    assert_eq!(registry.handle_count(), 0);
}

#[test]
fn names_are_case_sensitive() {
    let registry = Registry::new();
    registry.create(Some("Event"), true, false).unwrap();
    assert!(matches!(
        registry.open("event", Access::ALL, false),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn local_and_global_namespaces() {
    let registry = Registry::new();
    let local = registry.create(Some("Local\\E"), true, false).unwrap();
    let bare = registry.open("E", Access::ALL, false).unwrap();
    registry.set(bare).unwrap();
    assert_eq!(
        registry.wait(local, Some(Duration::ZERO)).unwrap(),
        WaitStatus::Signaled
    );

    assert!(matches!(
        registry.open("Global\\E", Access::ALL, false),
        Err(Error::NotFound(_))
    ));
    let global = registry.create(Some("Global\\E"), true, false).unwrap();
    assert_eq!(
        registry.wait(global, Some(Duration::ZERO)).unwrap(),
        WaitStatus::TimedOut
    );
    assert_eq!(registry.len(), 2);

    assert_eq!(
        registry.create(Some("a\\b"), true, false),
        Err(Error::InvalidName("a\\b".into()))
    );
}

#[test]
fn name_length_limit() {
    let registry = Registry::new();
    let long = "x".repeat(named_event::DEFAULT_MAX_NAME_LEN + 1);
    assert_eq!(
        registry.create(Some(long.as_str()), true, false),
        Err(Error::NameTooLong {
            len: named_event::DEFAULT_MAX_NAME_LEN + 1,
            max: named_event::DEFAULT_MAX_NAME_LEN,
        })
    );

    let registry = Registry::builder().max_name_len(8).capacity(4).build();
    registry.create(Some("12345678"), true, false).unwrap();
    assert!(matches!(
        registry.open("123456789", Access::ALL, false),
        Err(Error::NameTooLong { len: 9, max: 8 })
    ));
}

#[test]
fn access_rights_are_enforced() {
    let registry = Registry::new();
    let event = registry.create(Some("E"), true, false).unwrap();
    let waiter = registry.open("E", Access::SYNCHRONIZE, true).unwrap();
    let setter = registry.open("E", Access::MODIFY_STATE, false).unwrap();

    assert_eq!(registry.set(waiter), Err(Error::AccessDenied));
    assert_eq!(registry.reset(waiter), Err(Error::AccessDenied));
    assert_eq!(
        registry.wait(setter, Some(Duration::ZERO)),
        Err(Error::AccessDenied)
    );
    assert!(matches!(
        registry.wait_async(setter),
        Err(Error::AccessDenied)
    ));

    registry.set(setter).unwrap();
    assert_eq!(
        registry.wait(waiter, Some(Duration::ZERO)).unwrap(),
        WaitStatus::Signaled
    );

    let info = registry.handle_info(waiter).unwrap();
    assert_eq!(info.access, Access::SYNCHRONIZE);
    assert!(info.inherit);
    assert_eq!(info.refs, 3);

    // Duplicates keep the rights of their source.
    let copy = registry.duplicate(waiter).unwrap();
    assert_eq!(registry.set(copy), Err(Error::AccessDenied));
    registry.close(copy).unwrap();
    registry.close(event).unwrap();
}

#[test]
fn closed_handle_is_invalid() {
    let registry = Registry::new();
    let event = registry.create(Some("E"), true, false).unwrap();
    registry.close(event).unwrap();

    assert_eq!(registry.close(event), Err(Error::InvalidHandle));
    assert_eq!(registry.set(event), Err(Error::InvalidHandle));
    assert_eq!(registry.reset(event), Err(Error::InvalidHandle));
    assert_eq!(
        registry.wait(event, Some(Duration::ZERO)),
        Err(Error::InvalidHandle)
    );
    assert_eq!(registry.duplicate(event), Err(Error::InvalidHandle));
    assert!(registry.handle_info(event).is_err());
}

#[test]
fn foreign_handle_is_invalid() {
    let first = Registry::new();
    let second = Registry::new();
    let event = first.create(Some("E"), true, false).unwrap();
    second.create(Some("E"), true, false).unwrap();

    assert_eq!(second.set(event), Err(Error::InvalidHandle));
    assert_eq!(second.close(event), Err(Error::InvalidHandle));
    assert_eq!(first.handle_count(), 1);
}

#[test]
fn global_registry_is_shared() {
    let event = named_event::global()
        .create(Some("registry-test-global"), true, false)
        .unwrap();
    let alias = named_event::global()
        .open("registry-test-global", Access::ALL, false)
        .unwrap();
    named_event::global().set(alias).unwrap();
    assert_eq!(
        named_event::global()
            .wait(event, Some(Duration::ZERO))
            .unwrap(),
        WaitStatus::Signaled
    );
    named_event::global().close(alias).unwrap();
    named_event::global().close(event).unwrap();
}

#[test]
fn error_converts_to_io() {
    let registry = Registry::new();
    let err: std::io::Error = registry
        .open("missing", Access::ALL, false)
        .unwrap_err()
        .into();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn concurrent_create_open_close_on_one_name() {
    let registry = Registry::new();

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..2000 {
                    let creator = registry.create(Some("R"), true, false).unwrap();
                    // The creator handle keeps the name alive, whatever the
                    // other threads close meanwhile.
                    let alias = registry.open("R", Access::ALL, false).unwrap();
                    registry.set(alias).unwrap();
                    let copy = registry.duplicate(creator).unwrap();
                    registry.close(alias).unwrap();
                    registry.close(copy).unwrap();
                    registry.close(creator).unwrap();
                }
            });
        }
    });

    assert!(registry.is_empty());
    assert_eq!(registry.handle_count(), 0);
    assert!(matches!(
        registry.open("R", Access::ALL, false),
        Err(Error::NotFound(_))
    ));
}
