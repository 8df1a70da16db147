//! CLI end-to-end tests
//!
//! Tests for the gallery command-line interface. Every command runs inside a
//! temp directory with its own database so no local config or `.env` leaks in.

use assert_cmd::prelude::*;
use gallery_db::models::NewPhoto;
use gallery_db::pool::init_pool;
use gallery_db::queries::photos::insert_photo;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            dir: tempdir().unwrap(),
        }
    }

    fn db(&self) -> PathBuf {
        self.dir.path().join("gallery.db")
    }

    /// Get a command for the gallery binary, isolated in the temp dir.
    #[allow(deprecated)]
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("gallery").unwrap();
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env_remove("GALLERY_DATABASE")
            .env_remove("AWS_ENDPOINT_URL")
            .env_remove("S3_BUCKET_NAME")
            .env_remove("STORAGE_TOKEN")
            .env_remove("RUST_LOG")
            .arg("--database")
            .arg(self.db());
        cmd
    }

    /// Register photos directly so collection commands have something to work on.
    fn seed_photos(&self, names: &[&str]) {
        let pool = init_pool(&self.db().to_string_lossy()).unwrap();
        let conn = pool.get().unwrap();
        for name in names {
            let stem = name.split('.').next().unwrap();
            insert_photo(&conn, &NewPhoto::new(*name, format!("{stem}-thumb.avif"))).unwrap();
        }
    }
}

fn write_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(96, 48, Rgb([10, 200, 30])).save(&path).unwrap();
    path
}

#[test]
fn test_cli_no_args_shows_help() {
    let env = Env::new();
    env.cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let env = Env::new();
    env.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("gallery"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_flag() {
    let env = Env::new();
    env.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gallery"));
}

#[test]
fn test_cli_process_help() {
    let env = Env::new();
    env.cmd()
        .args(["process", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--offline-only"))
        .stdout(predicate::str::contains("--collections"));
}

#[test]
fn test_cli_offline_and_upload_only_conflict() {
    let env = Env::new();
    env.cmd()
        .args(["process", ".", "--offline-only", "--upload-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_cli_collection_lifecycle() {
    let env = Env::new();
    env.seed_photos(&["a.jpg", "b.jpg", "c.jpg"]);

    env.cmd()
        .args(["collection", "create", "Travel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created collection Travel"));

    env.cmd()
        .args(["collection", "add", "Travel", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("at position 1"));
    env.cmd()
        .args(["collection", "add", "Travel", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("at position 2"));
    env.cmd()
        .args(["collection", "add", "Travel", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already in Travel at position 1"));

    let output = env
        .cmd()
        .args(["collection", "show", "Travel", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let members: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let filenames: Vec<_> = members
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["filename"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(filenames, vec!["b.jpg", "a.jpg"]);

    env.cmd()
        .args(["collection", "remove", "Travel", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed photo 2"));
    env.cmd()
        .args(["collection", "remove", "Travel", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("was not in Travel"));

    env.cmd()
        .args(["collection", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Travel (1 photos)"));
}

#[test]
fn test_cli_move_reorders() {
    let env = Env::new();
    env.seed_photos(&["a.jpg", "b.jpg"]);

    env.cmd().args(["collection", "create", "Film"]).assert().success();
    env.cmd().args(["collection", "add", "Film", "1"]).assert().success();
    env.cmd().args(["collection", "add", "Film", "2"]).assert().success();
    env.cmd()
        .args(["collection", "move", "Film", "1", "5"])
        .assert()
        .success();

    env.cmd()
        .args(["collection", "show", "Film"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)b\.jpg.*a\.jpg").unwrap());
}

#[test]
fn test_cli_exit_codes() {
    let env = Env::new();
    env.seed_photos(&["a.jpg"]);

    // missing collection
    env.cmd()
        .args(["collection", "show", "Nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
    env.cmd()
        .args(["collection", "add", "Nope", "1"])
        .assert()
        .code(2);

    env.cmd().args(["collection", "create", "Travel"]).assert().success();

    // unknown photo
    env.cmd()
        .args(["collection", "add", "Travel", "99"])
        .assert()
        .code(3);

    // duplicate collection
    env.cmd()
        .args(["collection", "create", "Travel"])
        .assert()
        .code(4);

    // invalid position
    env.cmd().args(["collection", "add", "Travel", "1"]).assert().success();
    env.cmd()
        .args(["collection", "move", "Travel", "1", "0"])
        .assert()
        .code(5);
    env.cmd()
        .args(["collection", "move", "Travel", "1", "9223372036854775807"])
        .assert()
        .code(5);
    env.cmd().args(["collection", "add", "Travel", "1"]).assert().success();
}

#[test]
fn test_cli_empty_collection_lists_nothing() {
    let env = Env::new();
    env.cmd().args(["collection", "create", "Empty"]).assert().success();
    env.cmd()
        .args(["collection", "show", "Empty", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_cli_photo_commands() {
    let env = Env::new();
    env.seed_photos(&["a.jpg", "b.jpg"]);

    env.cmd()
        .args(["photo", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] a.jpg (a-thumb.avif)"))
        .stdout(predicate::str::contains("[2] b.jpg"));

    env.cmd()
        .args(["photo", "show", "b.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Thumbnail: b-thumb.avif"));

    env.cmd()
        .args(["photo", "delete", "1"])
        .assert()
        .success();
    env.cmd()
        .args(["photo", "show", "1"])
        .assert()
        .code(2);
    env.cmd()
        .args(["photo", "delete", "1"])
        .assert()
        .code(2);
}

#[test]
fn test_cli_process_dry_run_writes_nothing() {
    let env = Env::new();
    let photos = env.dir.path().join("photos");
    std::fs::create_dir(&photos).unwrap();
    write_png(&photos, "one.png");
    write_png(&photos, "two.png");

    env.cmd()
        .args(["process", "--dry-run"])
        .arg(&photos)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 photos"))
        .stdout(predicate::str::contains("DRY RUN"));

    assert!(!photos.join("thumbnails").exists());
    assert!(!env.db().exists());
}

#[test]
fn test_cli_process_offline_generates_thumbnails() {
    let env = Env::new();
    let photos = env.dir.path().join("photos");
    std::fs::create_dir(&photos).unwrap();
    write_png(&photos, "one.png");

    env.cmd()
        .args(["process", "--offline-only", "-w", "64", "-e", "0"])
        .arg(&photos)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 generated"));

    assert!(photos.join("thumbnails/one-thumb.avif").is_file());

    // second run skips the existing thumbnail
    env.cmd()
        .args(["process", "--offline-only", "-w", "64", "-e", "0"])
        .arg(&photos)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 skipped"));

    assert!(!env.db().exists());
}

#[test]
fn test_cli_process_collections_short_flag() {
    let env = Env::new();
    let photos = env.dir.path().join("photos");
    std::fs::create_dir(&photos).unwrap();
    write_png(&photos, "one.png");

    env.cmd()
        .args(["process", "-c", "A;B", "--offline-only", "-w", "64", "-e", "0"])
        .arg(&photos)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 generated"));

    assert!(photos.join("thumbnails/one-thumb.avif").is_file());
    assert!(!env.db().exists());
}

#[test]
fn test_cli_config_flag_is_long_only() {
    let env = Env::new();
    let config = env.dir.path().join("custom.toml");
    std::fs::write(&config, "[thumbnail]\nwidth = 320\n").unwrap();

    env.cmd()
        .arg("--config")
        .arg(&config)
        .args(["collection", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No collections"));
}

#[test]
fn test_cli_process_missing_source() {
    let env = Env::new();
    env.cmd()
        .args(["process", "--offline-only", "does-not-exist"])
        .assert()
        .code(2);
}

#[test]
fn test_cli_process_upload_requires_storage() {
    let env = Env::new();
    let photos = env.dir.path().join("photos");
    std::fs::create_dir(&photos).unwrap();
    write_png(&photos, "one.png");

    env.cmd()
        .arg("process")
        .arg(&photos)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("storage endpoint"));
}

#[test]
fn test_cli_validate_config() {
    let env = Env::new();
    let config = env.dir.path().join("custom.toml");
    std::fs::write(&config, "[thumbnail]\nwidth = 640\n").unwrap();

    env.cmd()
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"))
        .stdout(predicate::str::contains("width 640"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let env = Env::new();
    let config = env.dir.path().join("bad.toml");
    std::fs::write(&config, "[thumbnail]\ndir_name = \"\"\n").unwrap();

    env.cmd().arg("validate").arg(&config).assert().failure();
}
