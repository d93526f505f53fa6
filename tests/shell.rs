use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn mysh(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mysh"));
    cmd.env("HOME", home)
        .env_remove("MYSH_CONFIG")
        .env_remove("RUST_LOG")
        .current_dir(home);
    cmd
}

fn run_script(home: &TempDir, script: &str) -> Output {
    let path = home.path().join("script.mysh");
    fs::write(&path, script).unwrap();
    mysh(home.path()).arg(&path).output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_cd_without_args_goes_home() {
    let home = tempfile::tempdir().unwrap();
    fs::create_dir(home.path().join("sub")).unwrap();
    let output = run_script(&home, "cd sub\npwd\ncd\npwd\n");
    let root = home.path().canonicalize().unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        format!(
            "mysh> cd sub\nmysh> pwd\n{}/sub\nmysh> cd\nmysh> pwd\n{}\n",
            root.display(),
            root.display()
        )
    );
}

#[test]
fn test_cd_too_many_arguments_aborts_script() {
    let home = tempfile::tempdir().unwrap();
    let output = run_script(&home, "cd a b\npwd\n");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "mysh> cd a b\n");
    assert!(stderr(&output).contains("cd: too many arguments"));
}

#[test]
fn test_script_aborts_with_failing_code() {
    let home = tempfile::tempdir().unwrap();
    let output = run_script(&home, "true\n\nsh -c exit\\ 4\necho never\n");
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(stdout(&output), "mysh> true\n\nmysh> sh -c exit\\ 4\n");
}

#[test]
fn test_exit_code_becomes_process_status() {
    let home = tempfile::tempdir().unwrap();
    let output = run_script(&home, "exit 3\necho after\n");
    assert_eq!(output.status.code(), Some(3));
    assert!(!stdout(&output).contains("after"));
}

#[test]
fn test_exit_zero_stops_remaining_scripts() {
    let home = tempfile::tempdir().unwrap();
    let first = home.path().join("first");
    let second = home.path().join("second");
    fs::write(&first, "echo one\nexit\n").unwrap();
    fs::write(&second, "echo two\n").unwrap();
    let output = mysh(home.path()).arg(&first).arg(&second).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "mysh> echo one\none\nmysh> exit\n");
}

#[test]
fn test_scripts_run_in_order() {
    let home = tempfile::tempdir().unwrap();
    let first = home.path().join("first");
    let second = home.path().join("second");
    fs::write(&first, "echo one\n").unwrap();
    fs::write(&second, "echo two\n").unwrap();
    let output = mysh(home.path()).arg(&first).arg(&second).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "mysh> echo one\none\nmysh> echo two\ntwo\n");
}

#[test]
fn test_syntax_error_exit_code() {
    let home = tempfile::tempdir().unwrap();
    let output = run_script(&home, "ls |\n");
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("syntax error"));
}

#[test]
fn test_command_not_found() {
    let home = tempfile::tempdir().unwrap();
    let output = run_script(&home, "no-such-mysh-command\n");
    assert_eq!(output.status.code(), Some(127));
    assert!(stderr(&output).contains("no-such-mysh-command: No such external command"));
}

#[test]
fn test_relative_glob_in_cwd() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join("b.txt"), "").unwrap();
    fs::write(home.path().join("a.txt"), "").unwrap();
    fs::write(home.path().join(".c.txt"), "").unwrap();
    let output = run_script(&home, "ls *.txt\n");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "mysh> ls *.txt\na.txt\nb.txt\n");
}

#[test]
fn test_reads_piped_stdin() {
    let home = tempfile::tempdir().unwrap();
    let mut child = mysh(home.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"echo hi | tr a-z A-Z\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "mysh> echo hi | tr a-z A-Z\nHI\n");
}

#[test]
fn test_config_file_disables_echo() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("rc");
    fs::write(&config, "echo_script=false\n").unwrap();
    let script = home.path().join("script");
    fs::write(&script, "echo quiet\n").unwrap();
    let output = mysh(home.path())
        .arg("--config")
        .arg(&config)
        .arg(&script)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "quiet\n");
}

#[test]
fn test_home_rc_is_picked_up() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join(".myshrc"), "prompt=$ \n").unwrap();
    let output = run_script(&home, "echo x\n");
    assert_eq!(stdout(&output), "$ echo x\nx\n");
}

#[test]
fn test_bad_config_fails() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join(".myshrc"), "colour=red\n").unwrap();
    let output = run_script(&home, "echo x\n");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unknown key: colour"));
}

#[test]
fn test_missing_script() {
    let home = tempfile::tempdir().unwrap();
    let output = mysh(home.path()).arg("does-not-exist").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
