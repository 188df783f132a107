//! Registry Property Tests
//!
//! Behaviour of the registry API independent of the backing store,
//! checked against both the file backend and the in-memory backend.

use invitedb::registry::UserRegistry;
use invitedb::storage::{FileStorage, MemoryStorage, RecordStorage, Status, UserId};
use tempfile::TempDir;

const SAMPLES: [(&str, &str, Option<&str>); 4] = [
    ("felipe", "fmartiniano@tv1.com.br", None),
    ("Jane Doe", "jane@example.com", Some("CONVITE ENVIADO")),
    ("José", "jose@exemplo.com.br", Some("AGUARDANDO")),
    ("", "empty-name@example.com", Some("ENVIAR CONVITE")),
];

fn check_create_then_find<S: RecordStorage>(registry: &UserRegistry<S>) {
    for (name, email, status) in SAMPLES {
        let created = registry.create(name, email, status.map(Status::from));

        let by_email = registry.find(email).expect("created user must be found by email");
        assert_eq!(by_email.name, name);
        assert_eq!(by_email.email, email);
        assert_eq!(
            by_email.status.as_str(),
            status.unwrap_or("ENVIAR CONVITE")
        );
        assert_eq!(by_email.id, UserId::from_email(email));

        let by_id = registry.find(created.id.as_str()).unwrap();
        assert_eq!(by_id, created);
    }
    assert_eq!(registry.list().len(), SAMPLES.len());
}

fn check_invite_preserves_order<S: RecordStorage>(registry: &UserRegistry<S>) {
    for (name, email, status) in SAMPLES {
        registry.create(name, email, status.map(Status::from));
    }
    let before = registry.list();

    registry.send_invite("jose@exemplo.com.br").unwrap();
    let after = registry.list();

    assert_eq!(before.len(), after.len());
    for (old, new) in before.iter().zip(&after) {
        assert_eq!(old.id, new.id);
        if old.email == "jose@exemplo.com.br" {
            assert_eq!(new.status, Status::InviteSent);
            assert_eq!(new.name, old.name);
        } else {
            assert_eq!(old, new);
        }
    }
}

#[test]
fn test_create_then_find_memory() {
    check_create_then_find(&UserRegistry::new(MemoryStorage::new()));
}

#[test]
fn test_create_then_find_file() {
    let temp = TempDir::new().unwrap();
    check_create_then_find(&UserRegistry::new(FileStorage::new(
        temp.path().join("users.txt"),
    )));
}

#[test]
fn test_invite_preserves_order_memory() {
    check_invite_preserves_order(&UserRegistry::new(MemoryStorage::new()));
}

#[test]
fn test_invite_preserves_order_file() {
    let temp = TempDir::new().unwrap();
    check_invite_preserves_order(&UserRegistry::new(FileStorage::new(
        temp.path().join("users.txt"),
    )));
}

#[test]
fn test_example_walkthrough() {
    let registry = UserRegistry::new(MemoryStorage::new());

    let felipe = registry.create("felipe", "fmartiniano@tv1.com.br", None);
    assert_eq!(felipe.id.as_str(), "-65040894");
    assert_eq!(felipe.status, Status::SendInvite);

    assert!(registry.find("jane@example.com").is_none());
    assert_eq!(registry.find(felipe.id.as_str()), Some(felipe));
}
