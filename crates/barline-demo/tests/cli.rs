// File: crates/barline-demo/tests/cli.rs
// Purpose: End-to-end runs of the demo binary on small CSV files.

use std::process::Command;

fn demo() -> Command {
    Command::new(env!("CARGO_BIN_EXE_barline-demo"))
}

#[test]
fn writes_line_svg() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("sales.csv");
    std::fs::write(&input, "date,value,region\n2024-01-01,10,north\n2024-01-02,14,north\n2024-01-01,7,south\n")
        .expect("write csv");
    let out = dir.path().join("sales.svg");

    let status = demo()
        .arg("--input")
        .arg(&input)
        .args(["--kind", "line", "--group-column", "region", "-o"])
        .arg(&out)
        .status()
        .expect("run demo");
    assert!(status.success());
    let svg = std::fs::read_to_string(&out).expect("svg written");
    assert!(svg.contains("<path"));
    assert!(svg.contains(">north<") && svg.contains(">south<"));
}

#[test]
fn writes_stacked_bar_svg_with_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("devices.csv");
    std::fs::write(&input, "month,users,device\nJan,52,Desktop\nJan,34,Mobile\nFeb,48,Desktop\n").expect("write csv");
    let config = dir.path().join("chart.toml");
    std::fs::write(&config, "stacked = true\nheight = 300.0\n").expect("write config");
    let out = dir.path().join("devices.svg");

    let status = demo()
        .arg("--input")
        .arg(&input)
        .args(["--kind", "bar", "--x-column", "month", "--y-column", "users", "--group-column", "device"])
        .arg("--config")
        .arg(&config)
        .args(["--container-width", "200"])
        .arg("--output")
        .arg(&out)
        .status()
        .expect("run demo");
    assert!(status.success());
    let svg = std::fs::read_to_string(&out).expect("svg written");
    assert_eq!(svg.matches("<title>").count(), 3);
}

#[test]
fn invalid_data_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("bad.csv");
    std::fs::write(&input, "x,y\na,ten\n").expect("write csv");
    let out = dir.path().join("bad.svg");
    let status = demo().arg("-i").arg(&input).arg("-o").arg(&out).status().expect("run demo");
    assert!(!status.success());
    assert!(!out.exists());
}
