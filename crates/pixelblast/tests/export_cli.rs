use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn project_root() -> PathBuf {
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    crate_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("crate dir has workspace root")
        .to_path_buf()
}

fn pixelblast(config_dir: &Path, data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pixelblast"))
        .env("PIXELBLAST_CONFIG_DIR", config_dir)
        .env("PIXELBLAST_DATA_DIR", data_dir)
        .env("RUST_LOG", "warn")
        .args(args)
        .output()
        .expect("failed to launch pixelblast")
}

/// Width and height from the IHDR chunk of a PNG file.
fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    assert!(bytes.len() > 24, "png too short");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n", "missing png signature");
    assert_eq!(&bytes[12..16], b"IHDR");
    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    (width, height)
}

#[test]
fn export_writes_a_png_of_the_device_size() {
    let config_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let output = out.path().join("stills").join("frame.png");
    let preset = project_root().join("demos/hero.toml");

    let result = pixelblast(
        config_dir.path(),
        data_dir.path(),
        &[
            "--config",
            preset.to_str().unwrap(),
            "export",
            "--output",
            output.to_str().unwrap(),
            "--size",
            "64x48",
            "--scale-factor",
            "1.5",
            "--click",
            "32,24",
            "--drag",
            "10,10",
            "--drag",
            "20,12",
            "--time",
            "0.25",
        ],
    );
    assert!(
        result.status.success(),
        "export failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let bytes = fs::read(&output).expect("png written");
    assert_eq!(png_dimensions(&bytes), (96, 72));
}

#[test]
fn export_uses_the_default_config_file() {
    let config_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();
    fs::write(
        config_dir.path().join("pixelblast.toml"),
        "version = 1\n[background]\nvariant = \"triangle\"\nnoise_amount = 0.2\n",
    )
    .unwrap();
    let output = config_dir.path().join("frame.png");

    let result = pixelblast(
        config_dir.path(),
        data_dir.path(),
        &["export", "-o", output.to_str().unwrap(), "--size", "40x30"],
    );
    assert!(result.status.success());
    assert_eq!(png_dimensions(&fs::read(&output).unwrap()), (40, 30));
}

#[test]
fn export_rejects_unknown_config_version() {
    let config_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();
    let config = config_dir.path().join("broken.toml");
    fs::write(&config, "version = 3\n").unwrap();
    let output = config_dir.path().join("frame.png");

    let result = pixelblast(
        config_dir.path(),
        data_dir.path(),
        &[
            "--config",
            config.to_str().unwrap(),
            "export",
            "-o",
            output.to_str().unwrap(),
        ],
    );
    assert!(!result.status.success());
    assert!(!output.exists());
}

#[test]
fn table_prints_rows_as_json() {
    let config_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();
    let csv_dir = data_dir.path().join("csv");
    fs::create_dir_all(&csv_dir).unwrap();
    fs::write(csv_dir.join("visits.csv"), "day,count,unique\nmon,12,7\ntue,9,x\n").unwrap();

    let result = pixelblast(config_dir.path(), data_dir.path(), &["table", "visits.csv"]);
    assert!(
        result.status.success(),
        "table failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let rows: serde_json::Value = serde_json::from_slice(&result.stdout).expect("json on stdout");
    assert_eq!(
        rows,
        serde_json::json!([
            { "category": "mon", "values": [12.0, 7.0] },
            { "category": "tue", "values": [9.0] },
        ])
    );

    let escape = pixelblast(config_dir.path(), data_dir.path(), &["table", "../visits.csv"]);
    assert!(!escape.status.success());
}

#[test]
fn speak_rejects_blank_text() {
    let config_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();
    let result = pixelblast(
        config_dir.path(),
        data_dir.path(),
        &["speak", " ", "--endpoint", "http://127.0.0.1:9"],
    );
    assert!(!result.status.success());
    assert!(result.stdout.is_empty());
}

#[test]
fn export_reports_out_of_range_times_without_crashing() {
    let config_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();
    let output = config_dir.path().join("frame.png");

    for time in ["inf", "1e30"] {
        let result = pixelblast(
            config_dir.path(),
            data_dir.path(),
            &["export", "-o", output.to_str().unwrap(), "--size", "16x16", "--time", time],
        );
        assert_eq!(result.status.code(), Some(1), "time {time}");
        assert!(String::from_utf8_lossy(&result.stderr).contains("out of range"));
        assert!(!output.exists());
    }
}
