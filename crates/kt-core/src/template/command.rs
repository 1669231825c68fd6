use std::path::Path;

use crate::error::CoreError;

/// Shell used to run an entrypoint script as a single command vector.
const SHELL: &str = "/bin/bash";

/// Turns an entrypoint script into `["/bin/bash", "-c", "<l1> && <l2> && ..."]`.
///
/// Lines are AND-joined, as written, so the first failing line stops the
/// sequence. Blank lines and `#` lines (comments, shebang) are dropped, as a
/// joined comment would swallow every later line. `None` if nothing is left.
pub fn shell_command(script: &str) -> Option<Vec<String>> {
    let lines: Vec<&str> = script
        .lines()
        .filter(|line| {
            let line = line.trim_start();
            !line.is_empty() && !line.starts_with('#')
        })
        .collect();
    if lines.is_empty() {
        return None;
    }
    Some(vec![SHELL.to_string(), "-c".to_string(), lines.join(" && ")])
}

/// Reads an entrypoint file and renders it with [`shell_command`].
pub fn entrypoint_command(path: &Path) -> Result<Vec<String>, CoreError> {
    let script = std::fs::read_to_string(path).map_err(|source| CoreError::Read {
        what: "entrypoint",
        path: path.to_path_buf(),
        source,
    })?;
    shell_command(&script).ok_or_else(|| {
        CoreError::Configuration(format!("entrypoint '{}' has no commands", path.display()))
    })
}
