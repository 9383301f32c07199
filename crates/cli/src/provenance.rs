use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: the subcommand and its parameters.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self { command, params }
    }
}

/// Write `<stem>.provenance.json` next to `artifact` with the code revision,
/// library version, callsite, command, parameters and outputs.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = sidecar_path(artifact);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "fracton_version": fracton::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "command": payload.command,
        "params": payload.params,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else `unknown`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|rev| !rev.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_replaces_the_extension() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/runs/entropy.parquet")),
            Path::new("/tmp/runs/entropy.provenance.json")
        );
        assert_eq!(
            sidecar_path(Path::new("corr.csv")),
            Path::new("corr.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_command_and_params() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("lengths.csv");
        fs::write(&artifact, "length,geodesics\n").unwrap();
        let payload = Payload::new("lengths", json!({"lattice": {"p": 4, "q": 5}}));
        let path = write_sidecar(&artifact, payload).unwrap();
        assert_eq!(path, dir.path().join("lengths.provenance.json"));

        let doc: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(doc["command"], "lengths");
        assert_eq!(doc["params"]["lattice"]["q"], 5);
        assert_eq!(doc["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(doc["fracton_version"], fracton::VERSION);
        assert!(doc["callsite"]["line"].as_u64().unwrap() > 0);
        assert!(!doc["code_rev"].as_str().unwrap().is_empty());
    }
}
