use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

/// Resolves command-line inputs to files. Directories are walked recursively,
/// anything that is not an existing path is treated as a glob pattern.
/// Order follows the arguments; repeated files are kept once.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            paths.push(path.to_path_buf());
            continue;
        }

        let before = paths.len();
        if path.is_dir() {
            let pattern = path.join("**/*");
            let pattern = pattern
                .to_str()
                .with_context(|| format!("directory path is not UTF-8: {}", path.display()))?;
            collect_glob(pattern, &mut paths)?;
        } else {
            collect_glob(input, &mut paths)?;
        }
        if paths.len() == before {
            warn!(input = %input, "input matched no files");
        }
    }

    let mut seen = HashSet::new();
    paths.retain(|path| seen.insert(path.clone()));
    Ok(paths)
}

fn collect_glob(pattern: &str, paths: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        glob::glob(pattern).with_context(|| format!("invalid glob pattern '{pattern}'"))?;
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "could not read path from glob pattern"),
        }
    }
    Ok(())
}
