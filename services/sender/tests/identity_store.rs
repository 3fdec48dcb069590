/// Identity persistence tests against a real filesystem
use sender::identity_store::{Identity, IdentityStore};
use shared::errors::SenderError;
use solana_sdk::signature::{Keypair, Signer};
use std::collections::HashSet;
use std::fs;

fn write_keypair(path: &std::path::Path, keypair: &Keypair) {
    let json = serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap();
    fs::write(path, json).unwrap();
}

#[test]
fn test_existing_identity_is_loaded_every_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("id.json");
    let keypair = Keypair::new();
    write_keypair(&path, &keypair);

    let store = IdentityStore::new(&path);
    let first = store.resolve().unwrap();
    let second = store.resolve().unwrap();

    assert_eq!(first.address(), keypair.pubkey());
    assert_eq!(second.address(), keypair.pubkey());
}

#[test]
fn test_generate_then_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("solana").join("id.json");
    assert!(!path.exists());

    let store = IdentityStore::new(&path);
    let generated = store.resolve().unwrap();
    assert!(path.exists(), "identity should be persisted on generation");

    let loaded = store.resolve().unwrap();
    assert_eq!(generated.address(), loaded.address());

    // The file holds the exact key material that was generated
    let bytes: Vec<u8> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(bytes.len(), 64);
    let from_file = Keypair::from_bytes(&bytes).unwrap();
    assert_eq!(from_file.pubkey(), generated.address());
    assert_eq!(from_file.sign_message(b"hello"), generated.sign_message(b"hello"));
}

#[test]
fn test_generation_leaves_no_temporary_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("id.json");

    IdentityStore::new(&path).resolve().unwrap();

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["id.json".to_string()]);
}

#[cfg(unix)]
#[test]
fn test_generated_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("id.json");

    IdentityStore::new(&path).resolve().unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_corrupt_file_is_rejected_and_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("id.json");
    fs::write(&path, b"definitely not a keypair").unwrap();

    let err = IdentityStore::new(&path).resolve().unwrap_err();

    assert!(matches!(err, SenderError::CorruptIdentity { .. }), "got {:?}", err);
    assert_eq!(fs::read(&path).unwrap(), b"definitely not a keypair");
}

#[test]
fn test_wrong_length_and_empty_files_are_corrupt() {
    let dir = tempfile::tempdir().unwrap();

    for (name, contents) in [("short.json", "[1,2,3,4]"), ("empty.json", "")] {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();

        let err = IdentityStore::new(&path).resolve().unwrap_err();
        assert_eq!(err.code(), "IDENTITY_CORRUPT", "{} should be corrupt", name);
    }
}

#[test]
fn test_non_utf8_file_is_corrupt_not_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("id.json");
    let garbage = [0xff, 0xfe, 0x00, 0x80, 0x9c];
    fs::write(&path, garbage).unwrap();

    let err = IdentityStore::new(&path).resolve().unwrap_err();

    assert_eq!(err.code(), "IDENTITY_CORRUPT", "got {:?}", err);
    assert_eq!(fs::read(&path).unwrap(), garbage);
}

#[test]
fn test_secret_seed_file_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seed.json");
    let keypair = Keypair::new();
    let seed = keypair.to_bytes()[..32].to_vec();
    fs::write(&path, serde_json::to_string(&seed).unwrap()).unwrap();

    let identity = IdentityStore::new(&path).resolve().unwrap();
    assert_eq!(identity.address(), keypair.pubkey());
}

#[test]
fn test_unreadable_path_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the file should be
    let path = dir.path().join("id.json");
    fs::create_dir(&path).unwrap();

    let err = IdentityStore::new(&path).resolve().unwrap_err();
    assert!(matches!(err, SenderError::Storage { .. }), "got {:?}", err);
}

#[test]
fn test_concurrent_first_runs_agree_on_identity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("id.json");

    let identities: Vec<Identity> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| IdentityStore::new(&path).resolve().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let addresses: HashSet<_> = identities.iter().map(Identity::address).collect();
    assert_eq!(addresses.len(), 1);

    let on_disk = IdentityStore::new(&path).resolve().unwrap();
    assert!(addresses.contains(&on_disk.address()));
}

#[cfg(unix)]
#[test]
fn test_unpublishable_identity_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("id.json");
    // Reads as missing, but the name is taken so the new file cannot be linked in
    let target = dir.path().join("gone").join("id.json");
    std::os::unix::fs::symlink(&target, &path).unwrap();

    let err = IdentityStore::new(&path).resolve().unwrap_err();

    assert!(matches!(err, SenderError::Storage { .. }), "got {:?}", err);
    assert!(fs::symlink_metadata(&path).unwrap().file_type().is_symlink());
    assert!(!target.exists());

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["id.json".to_string()], "temporary file left behind");
}
