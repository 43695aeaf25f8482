use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use blinken_core::{DEFAULT_BUDGET, RecordFields, decode_sparse, encode_sparse_to_vec};

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let message = path.join("message.txt");
        if !message.exists() {
            continue;
        }
        regenerate_one(&message, &path)?;
    }

    Ok(())
}

fn regenerate_one(message: &Path, dir: &Path) -> Result<(), String> {
    let bytes =
        fs::read(message).map_err(|err| format!("failed to read {}: {}", message.display(), err))?;
    let record = decode_sparse(&bytes)
        .map_err(|err| format!("decode failed for {}: {}", message.display(), err))?;
    let json = serde_json::to_string(&RecordFields::from(&record))
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    let canonical = encode_sparse_to_vec(&record, DEFAULT_BUDGET)
        .map_err(|err| format!("encode failed for {}: {}", message.display(), err))?;

    let record_path = dir.join("expected_record.json");
    fs::write(&record_path, json)
        .map_err(|err| format!("failed to write {}: {}", record_path.display(), err))?;
    let canonical_path = dir.join("expected_canonical.txt");
    fs::write(&canonical_path, canonical)
        .map_err(|err| format!("failed to write {}: {}", canonical_path.display(), err))?;
    Ok(())
}
