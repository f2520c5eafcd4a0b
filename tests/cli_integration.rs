//! CLI integration tests for Dockyard.
//!
//! These tests run the binary against manifests written to temporary
//! directories and against the bundled android-tools demo.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the dockyard binary command, isolated from the user's global config.
fn dockyard(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dockyard").unwrap();
    cmd.env("HOME", home);
    cmd
}

/// Create a temporary project with the given manifest.
fn project(manifest: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Dockyard.toml"), manifest).unwrap();
    tmp
}

fn demo_manifest() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/android-tools/Dockyard.toml")
}

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

const SIMPLE: &str = r#"
[project]
name = "simple"

[[component]]
name = "A"
sources = ["a.cpp"]
deps = ["B"]

[[component]]
name = "B"
sources = ["b.c"]

[[link]]
artifact = "out"
requires = ["A"]
"#;

const CYCLE: &str = r#"
[project]
name = "cycle"

[[component]]
name = "app"
sources = ["main.c"]
deps = ["a"]

[[component]]
name = "a"
sources = ["a.c"]
deps = ["b"]

[[component]]
name = "b"
sources = ["b.c"]
deps = ["a"]

[[link]]
artifact = "app"
requires = ["app"]
"#;

// ============================================================================
// dockyard plan
// ============================================================================

#[test]
fn test_plan_text() {
    let tmp = project(SIMPLE);

    dockyard(tmp.path())
        .arg("plan")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(
            "g++ -o a.cpp.o -std=gnu++14 $CXXFLAGS $CPPFLAGS -c a.cpp\n\
             gcc -o b.c.o -std=gnu11 $CFLAGS $CPPFLAGS -c b.c\n\
             g++ -o out $LDFLAGS a.cpp.o b.c.o\n",
        );
}

#[test]
fn test_plan_finds_manifest_in_parent() {
    let tmp = project(SIMPLE);
    let nested = tmp.path().join("src");
    fs::create_dir_all(&nested).unwrap();

    dockyard(tmp.path())
        .arg("plan")
        .current_dir(&nested)
        .assert()
        .success()
        .stdout(predicate::str::contains("g++ -o out $LDFLAGS a.cpp.o b.c.o"));
}

#[test]
fn test_plan_without_manifest_fails() {
    let tmp = TempDir::new().unwrap();

    dockyard(tmp.path())
        .arg("plan")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not find Dockyard.toml"));
}

#[test]
fn test_plan_unknown_extension_emits_nothing() {
    let tmp = project(
        r#"
[project]
name = "bad"

[[component]]
name = "ok"
sources = ["ok.c"]

[[component]]
name = "rusty"
sources = ["x.rs"]
"#,
    );

    dockyard(tmp.path())
        .arg("plan")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("x.rs"))
        .stderr(predicate::str::contains("`.rs`"));
}

#[test]
fn test_plan_unknown_component() {
    let tmp = project(
        r#"
[project]
name = "bad"

[[component]]
name = "app"
sources = ["main.c"]

[[link]]
artifact = "app"
requires = ["app", "libfoo"]
"#,
    );

    dockyard(tmp.path())
        .arg("plan")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown component `libfoo`"))
        .stderr(predicate::str::contains("link target `app`"));
}

#[test]
fn test_plan_cycle_refused_by_default() {
    let tmp = project(CYCLE);

    dockyard(tmp.path())
        .arg("plan")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("a -> b -> a"))
        .stderr(predicate::str::contains("repeat-cycles"));
}

#[test]
fn test_plan_cycle_with_repeat_policy() {
    let tmp = project(CYCLE);

    dockyard(tmp.path())
        .args(["plan", "--policy", "repeat-cycles"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "g++ -o app $LDFLAGS main.c.o a.c.o b.c.o a.c.o",
        ));
}

#[test]
fn test_plan_policy_from_link_target() {
    let tmp = project(&CYCLE.replace(
        "requires = [\"app\"]",
        "requires = [\"app\"]\npolicy = \"repeat-cycles\"",
    ));

    dockyard(tmp.path())
        .arg("plan")
        .current_dir(tmp.path())
        .assert()
        .success();
}

#[test]
fn test_plan_policy_from_project_config() {
    let tmp = project(CYCLE);
    fs::create_dir_all(tmp.path().join(".dockyard")).unwrap();
    fs::write(
        tmp.path().join(".dockyard/config.toml"),
        "[plan]\npolicy = \"repeat-cycles\"\nlinker = \"clang++\"\n",
    )
    .unwrap();

    dockyard(tmp.path())
        .arg("plan")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("clang++ -o app $LDFLAGS"));
}

#[test]
fn test_plan_json() {
    let tmp = project(SIMPLE);

    let output = dockyard(tmp.path())
        .args(["plan", "--format", "json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let steps = json["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0]["type"], "compile");
    assert_eq!(steps[0]["compiler"], "g++");
    assert_eq!(steps[2]["type"], "link");
    assert_eq!(steps[2]["objects"][0], "a.cpp.o");
}

#[test]
fn test_plan_digest_is_deterministic() {
    let tmp = project(SIMPLE);

    let run = || {
        let output = dockyard(tmp.path())
            .args(["plan", "--digest"])
            .current_dir(tmp.path())
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap()
    };

    let first = run();
    assert_eq!(first.trim().len(), 64);
    assert_eq!(first, run());
}

#[test]
fn test_plan_target_filter() {
    let tmp = project(
        r#"
[project]
name = "two"

[[component]]
name = "a"
sources = ["a.c"]

[[component]]
name = "b"
sources = ["b.c"]

[[link]]
artifact = "bin/a"
requires = ["a"]

[[link]]
artifact = "bin/b"
requires = ["b"]
"#,
    );

    dockyard(tmp.path())
        .args(["plan", "--target", "bin/b"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(
            "gcc -o b.c.o -std=gnu11 $CFLAGS $CPPFLAGS -c b.c\n\
             g++ -o bin/b $LDFLAGS b.c.o\n",
        );

    dockyard(tmp.path())
        .args(["plan", "--target", "bin/c"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("link target `bin/c` not found"));
}

#[test]
fn test_plan_writes_compile_commands() {
    let tmp = project(SIMPLE);

    dockyard(tmp.path())
        .args(["plan", "--compile-commands", "compile_commands.json"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let content = fs::read_to_string(tmp.path().join("compile_commands.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["file"], "b.c");
    assert_eq!(
        entries[1]["command"],
        "gcc -o b.c.o -std=gnu11 $CFLAGS $CPPFLAGS -c b.c"
    );
}

// ============================================================================
// android-tools demo
// ============================================================================

#[test]
fn test_demo_compile_lines() {
    let tmp = TempDir::new().unwrap();
    let output = dockyard(tmp.path())
        .arg("--manifest")
        .arg(demo_manifest())
        .arg("plan")
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 103);

    assert_eq!(
        lines[0],
        r#"g++ -o adb/client/usb_dispatch.cpp.o -std=gnu++14 $CXXFLAGS $CPPFLAGS -DADB_REVISION=\"$PKGVER\" -DADB_HOST=1 -fpermissive -I../boringssl/include -Iadb -Iinclude -Ibase/include -Ilibcrypto_utils/include -c adb/client/usb_dispatch.cpp"#
    );
    assert!(lines.contains(
        &"gcc -o libcrypto_utils/android_pubkey.c.o -std=gnu11 $CFLAGS $CPPFLAGS -Ilibcrypto_utils/include -I../boringssl/include -Iinclude -c libcrypto_utils/android_pubkey.c".to_string()
    ));
    assert!(lines.contains(
        &"g++ -o libziparchive/zip_archive.cc.o -std=gnu++14 $CXXFLAGS $CPPFLAGS -Ibase/include -Iinclude -c libziparchive/zip_archive.cc".to_string()
    ));
    assert!(lines.contains(
        &"gcc -o ../boringssl/src/crypto/bn/cmp.c.o -std=gnu11 $CFLAGS $CPPFLAGS -I../boringssl/include -Iinclude -c ../boringssl/src/crypto/bn/cmp.c".to_string()
    ));
}

#[test]
fn test_demo_link_placement() {
    let tmp = TempDir::new().unwrap();
    let output = dockyard(tmp.path())
        .arg("--manifest")
        .arg(demo_manifest())
        .arg("plan")
        .output()
        .unwrap();
    let lines = stdout_lines(&output);

    assert!(lines[68].starts_with(
        "g++ -o adb/adb -lrt -ldl -lpthread -lcrypto -lutil -lusb-1.0 $LDFLAGS adb/console.cpp.o "
    ));
    assert!(lines[98].starts_with("g++ -o fastboot/fastboot "));
    assert_eq!(
        lines[100],
        "g++ -o libsparse/simg2img -lz $LDFLAGS libsparse/simg2img.c.o libsparse/backed_block.c.o libsparse/output_file.c.o libsparse/sparse.c.o libsparse/sparse_crc32.c.o libsparse/sparse_err.c.o libsparse/sparse_read.c.o"
    );
    assert!(lines[102].starts_with("g++ -o libsparse/img2simg -lz $LDFLAGS libsparse/img2simg.c.o "));
}

#[test]
fn test_demo_check() {
    let tmp = TempDir::new().unwrap();
    dockyard(tmp.path())
        .arg("--manifest")
        .arg(demo_manifest())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "android-tools: 16 component(s), 99 compile step(s), 4 link target(s)",
        ));
}

// ============================================================================
// dockyard linkplan / tree / check / completions
// ============================================================================

#[test]
fn test_linkplan() {
    let tmp = project(SIMPLE);

    dockyard(tmp.path())
        .args(["linkplan", "out"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Link order for 'out' (single-pass):"))
        .stdout(predicate::str::contains("1. A"))
        .stdout(predicate::str::contains("Required by: link target 'out'"))
        .stdout(predicate::str::contains("2. B"))
        .stdout(predicate::str::contains("Required by: A"));
}

#[test]
fn test_linkplan_unknown_target() {
    let tmp = project(SIMPLE);

    dockyard(tmp.path())
        .args(["linkplan", "missing"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("link target `missing` not found"));
}

#[test]
fn test_tree_marks_repeats_and_cycles() {
    let tmp = project(
        r#"
[project]
name = "tree"

[[component]]
name = "app"
sources = ["main.c"]
deps = ["left", "right", "loop"]

[[component]]
name = "left"
sources = ["left.c"]
deps = ["base"]

[[component]]
name = "right"
sources = ["right.c"]
deps = ["base"]

[[component]]
name = "base"
sources = ["base.c"]

[[component]]
name = "loop"
sources = ["loop.c"]
deps = ["app"]
"#,
    );

    dockyard(tmp.path())
        .args(["tree", "app"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("app\n"))
        .stdout(predicate::str::contains("│   ├── base (*)"))
        .stdout(predicate::str::contains("│   ├── app (cycle)"));
}

#[test]
fn test_check_warns_about_unlinked_cycle() {
    let tmp = project(
        r#"
[project]
name = "cyc"

[[component]]
name = "a"
sources = ["a.c"]
deps = ["b"]

[[component]]
name = "b"
sources = ["b.c"]
deps = ["a"]
"#,
    );

    dockyard(tmp.path())
        .arg("check")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("cyc: 2 component(s), 2 compile step(s), 0 link target(s)"))
        .stderr(predicate::str::contains("dependency cycle: a, b"));
}

#[test]
fn test_invalid_manifest_field() {
    let tmp = project("[project]\nname = \"x\"\n\n[[component]]\nname = \"a\"\nsrcs = [\"a.c\"]\n");

    dockyard(tmp.path())
        .arg("check")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse manifest"));
}

#[test]
fn test_completions() {
    let tmp = TempDir::new().unwrap();

    dockyard(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dockyard"));
}
