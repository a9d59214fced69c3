//! Integration tests for rpmkit-cli.
//!
//! Packages are built in memory with the core test builders and written to
//! temporary files.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use rpmkit_core::FileFlags;
use rpmkit_core::test_utils::PackageBuilder;
use rpmkit_core::test_utils::TestFile;
use std::path::PathBuf;
use tempfile::TempDir;

fn rpmkit_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("rpmkit");
    cmd.env_remove("RPMKIT_LOG");
    cmd
}

fn hello() -> PackageBuilder {
    PackageBuilder::new("hello", "1.0", "1")
        .file(TestFile::directory("/etc/hello"))
        .file(TestFile::new("/etc/hello/hello.conf", b"greeting = hi\n").flags(FileFlags::CONFIG))
        .file(TestFile::new("/usr/bin/hello", b"#!/bin/sh\necho hi\n").mode(0o100_755))
        .file(TestFile::new("/usr/share/doc/hello/README", b"read me\n").flags(FileFlags::DOC))
        .changelog("Sam Builder <sam@example.com> - 1.0-1", "- first release", 1_700_000_000)
}

fn write(temp: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = temp.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_version_flag() {
    rpmkit_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rpmkit"));
}

#[test]
fn test_help_flag() {
    rpmkit_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("checksig"));
}

#[test]
fn test_info() {
    let temp = TempDir::new().unwrap();
    let pkg = write(&temp, "hello.rpm", &hello().build());

    rpmkit_cmd()
        .arg("info")
        .arg(&pkg)
        .assert()
        .success()
        .stdout(predicate::str::contains("hello"))
        .stdout(predicate::str::contains("1.0"))
        .stdout(predicate::str::contains("MIT"))
        .stdout(predicate::str::contains("2023-11-14 22:13:20 UTC"))
        .stdout(predicate::str::contains("hello-1.0-1.src.rpm"));
}

#[test]
fn test_info_json() {
    let temp = TempDir::new().unwrap();
    let pkg = write(&temp, "hello.rpm", &hello().epoch(3).build());

    let output = rpmkit_cmd()
        .arg("--json")
        .arg("info")
        .arg(&pkg)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["operation"], "info");
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["name"], "hello");
    assert_eq!(json["data"]["epoch"], 3);
    assert_eq!(json["data"]["nevra"], "hello-3:1.0-1.x86_64");
}

#[test]
fn test_list() {
    let temp = TempDir::new().unwrap();
    let pkg = write(&temp, "hello.rpm", &hello().build());

    rpmkit_cmd()
        .arg("list")
        .arg(&pkg)
        .assert()
        .success()
        .stdout("/etc/hello\n/etc/hello/hello.conf\n/usr/bin/hello\n/usr/share/doc/hello/README\n");
}

#[test]
fn test_list_filters() {
    let temp = TempDir::new().unwrap();
    let pkg = write(&temp, "hello.rpm", &hello().build());

    rpmkit_cmd()
        .args(["list", "--config"])
        .arg(&pkg)
        .assert()
        .success()
        .stdout("/etc/hello/hello.conf\n");

    rpmkit_cmd()
        .args(["list", "--doc"])
        .arg(&pkg)
        .assert()
        .success()
        .stdout("/usr/share/doc/hello/README\n");
}

#[test]
fn test_list_long() {
    let temp = TempDir::new().unwrap();
    let pkg = write(&temp, "hello.rpm", &hello().build());

    rpmkit_cmd()
        .args(["list", "-l"])
        .arg(&pkg)
        .assert()
        .success()
        .stdout(predicate::str::contains("drwxr-xr-x"))
        .stdout(predicate::str::contains("-rwxr-xr-x root"))
        .stdout(predicate::str::contains("/usr/bin/hello"));
}

#[test]
fn test_changelog() {
    let temp = TempDir::new().unwrap();
    let pkg = write(&temp, "hello.rpm", &hello().build());

    rpmkit_cmd()
        .arg("changelog")
        .arg(&pkg)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "* Tue Nov 14 2023 Sam Builder <sam@example.com> - 1.0-1",
        ))
        .stdout(predicate::str::contains("- first release"));
}

#[test]
fn test_verify_clean() {
    let temp = TempDir::new().unwrap();
    let pkg = write(&temp, "hello.rpm", &hello().build());

    rpmkit_cmd()
        .arg("verify")
        .arg(&pkg)
        .assert()
        .success()
        .stdout(predicate::str::contains("....  c /etc/hello/hello.conf"))
        .stdout(predicate::str::contains("....  d /usr/share/doc/hello/README"))
        .stdout(predicate::str::contains("PASS (3 files checked"));
}

#[test]
fn test_verify_mismatch_fails() {
    let temp = TempDir::new().unwrap();
    let bytes = PackageBuilder::new("bad", "1", "1")
        .file(TestFile::new("/a", b"alpha"))
        .file(TestFile::new("/b", b"beta").digest_hex("0123456789abcdef0123456789abcdef"))
        .build();
    let pkg = write(&temp, "bad.rpm", &bytes);

    rpmkit_cmd()
        .arg("verify")
        .arg(&pkg)
        .assert()
        .failure()
        .stdout(predicate::str::contains("..5.    /b"))
        .stdout(predicate::str::contains("FAIL"))
        .stderr(predicate::str::contains("Verification failed"));
}

#[test]
fn test_verify_json() {
    let temp = TempDir::new().unwrap();
    let pkg = write(&temp, "hello.rpm", &hello().build());

    let output = rpmkit_cmd()
        .args(["verify", "--json"])
        .arg(&pkg)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["data"]["status"], "pass");
    assert_eq!(json["data"]["files_checked"], 3);
    assert_eq!(json["data"]["results"][0]["digest"], "match");
}

#[test]
fn test_checksig() {
    let temp = TempDir::new().unwrap();
    let bytes = hello().build();
    let good = write(&temp, "good.rpm", &bytes);

    rpmkit_cmd()
        .arg("checksig")
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("size OK md5 OK digests OK"));

    let mut corrupted = bytes;
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0x01;
    let bad = write(&temp, "bad.rpm", &corrupted);

    rpmkit_cmd()
        .arg("checksig")
        .arg(&bad)
        .assert()
        .failure()
        .stdout(predicate::str::contains("md5 BAD"))
        .stderr(predicate::str::contains("Digest check failed"));
}

#[test]
fn test_payload_to_file() {
    let temp = TempDir::new().unwrap();
    let builder = hello().compressor("xz");
    let pkg = write(&temp, "hello.rpm", &builder.build());
    let out = temp.path().join("hello.cpio");

    rpmkit_cmd()
        .arg("payload")
        .arg(&pkg)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(std::fs::read(&out).unwrap(), builder.archive_bytes());
}

#[test]
fn test_payload_to_stdout() {
    let temp = TempDir::new().unwrap();
    let builder = hello().compressor("zstd");
    let pkg = write(&temp, "hello.rpm", &builder.build());

    rpmkit_cmd()
        .arg("payload")
        .arg(&pkg)
        .assert()
        .success()
        .stdout(builder.archive_bytes());
}

#[test]
fn test_multiple_packages_continue_after_failure() {
    let temp = TempDir::new().unwrap();
    let good = write(&temp, "hello.rpm", &hello().build());
    let missing = temp.path().join("missing.rpm");

    rpmkit_cmd()
        .arg("list")
        .arg(&missing)
        .arg(&good)
        .assert()
        .failure()
        .stdout(predicate::str::contains("/usr/bin/hello"))
        .stderr(predicate::str::contains("missing.rpm"))
        .stderr(predicate::str::contains("1 of 2 packages failed"));
}

#[test]
fn test_not_a_package() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "notes.txt", &[b'x'; 256]);

    rpmkit_cmd()
        .arg("info")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an RPM package"))
        .stderr(predicate::str::contains("HINT"));
}

#[test]
fn test_max_payload_size() {
    let temp = TempDir::new().unwrap();
    let pkg = write(&temp, "hello.rpm", &hello().build());

    rpmkit_cmd()
        .args(["--max-payload-size", "16", "info"])
        .arg(&pkg)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-payload-size"));

    rpmkit_cmd()
        .args(["--max-payload-size", "1M", "info"])
        .arg(&pkg)
        .assert()
        .success();
}

#[test]
fn test_unsupported_compressor() {
    let temp = TempDir::new().unwrap();
    let pkg = write(&temp, "lz4.rpm", &hello().compressor_name("lz4").build());

    rpmkit_cmd().arg("info").arg(&pkg).assert().success();

    rpmkit_cmd()
        .arg("verify")
        .arg(&pkg)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported compressor 'lz4'"))
        .stderr(predicate::str::contains("Supported compressors"));
}

#[test]
fn test_quiet_suppresses_output() {
    let temp = TempDir::new().unwrap();
    let pkg = write(&temp, "hello.rpm", &hello().build());

    rpmkit_cmd()
        .args(["--quiet", "list"])
        .arg(&pkg)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_completion() {
    rpmkit_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rpmkit"));
}
