use std::path::Path;

use cpb_core::action::{self, add_testcase, create_source_file, init_config, resolve_invocation};
use cpb_core::config::{Config, TestConfig};
use cpb_core::fixture;
use cpb_core::style::Palette;

fn strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

#[test]
fn add_testcase_uses_next_free_id() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("main.cpp");

    let first = add_testcase(&src).unwrap();
    assert_eq!(first.id, 1);
    assert!(first.input.is_file() && first.answer.is_file());
    assert!(!first.output.exists());

    fsutil::write(dir.path().join("main.in5"), "").unwrap();
    let next = add_testcase(&src).unwrap();
    assert_eq!(next.id, 6);
    assert_eq!(next.answer, dir.path().join("main.ans6"));
    assert_eq!(fixture::find_test_ids(&src).unwrap(), [1, 5, 6]);
}

#[test]
fn new_source_file_has_comment_header() {
    let dir = tempfile::tempdir().unwrap();

    let path = create_source_file(dir.path(), "A. Two Sum (easy)", "cpp").unwrap();
    assert_eq!(path, dir.path().join("A.TwoSumeasy.cpp"));
    assert_eq!(fsutil::read_to_string(&path).unwrap(), "// A. Two Sum (easy)\n");

    let path = create_source_file(dir.path(), "B", ".hs").unwrap();
    assert_eq!(fsutil::read_to_string(&path).unwrap(), "");

    assert!(create_source_file(dir.path(), "B", "hs").is_err(), "must not clobber");
    assert!(create_source_file(dir.path(), "()", "py").is_err());
}

#[test]
fn init_writes_parsable_config_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = init_config(dir.path()).unwrap();
    assert_eq!(path, dir.path().join(Config::FILENAME));

    let cfg = Config::from_toml_file(path).unwrap();
    assert_eq!(cfg.test.command.len(), 3);
    assert!(init_config(dir.path()).is_err());
}

#[test]
fn invocation_from_config_or_command_line() {
    let toml = r##"
        [[test.command]]
        pattern = "*.cpp"
        run = ["#{fileDir}/#{fileStem}"]
        debug = ["#{fileDir}/#{fileStem}_debug", "--verbose"]

        [[test.command]]
        pattern = "*.py"
        run = ["python3", "#{filePath}"]
    "##;
    let cfg: TestConfig = Config::from_toml(toml).unwrap().test;

    let inv = resolve_invocation("abc/a.cpp", None, &cfg, false).unwrap();
    assert_eq!(inv.program, Path::new("abc/a"));
    assert!(inv.args.is_empty());

    let inv = resolve_invocation("abc/a.cpp", None, &cfg, true).unwrap();
    assert_eq!(inv.program, Path::new("abc/a_debug"));
    assert_eq!(inv.args, ["--verbose"]);

    // no debug template: falls back to run
    let inv = resolve_invocation("b.py", None, &cfg, true).unwrap();
    assert_eq!(inv.to_string(), "python3 b.py");

    let explicit = strings(&["./a.out", "-x"]);
    let inv = resolve_invocation("abc/a.cpp", Some(explicit.as_slice()), &cfg, false).unwrap();
    assert_eq!(inv.to_string(), "./a.out -x");

    let err = resolve_invocation("c.hs", None, &cfg, false).unwrap_err();
    assert!(err.to_string().contains("Unconfigured test command for filename 'c.hs'"));
    assert!(resolve_invocation("c.hs", Some(Vec::new().as_slice()), &cfg, false).is_err());
}

#[tokio::test]
async fn debug_run_requires_input_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("sol.sh");
    let inv = cpb_core::command::Invocation::new("/bin/sh", ["-c", "cat; exit 7"]);

    assert!(action::do_debug(&src, &inv, Some(1), &Palette::plain()).await.is_err());

    fsutil::write(dir.path().join("sol.in1"), "hello\n").unwrap();
    let status = action::do_debug(&src, &inv, Some(1), &Palette::plain()).await.unwrap();
    assert_eq!(status, Some(7));
}
