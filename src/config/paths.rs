// config/paths.rs
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, ToolError};
use crate::prompt::Prompter;

pub const DEFAULT_OUTPUT: &str = "kubeconfig-sa";
const OUTPUT_PROMPT: &str = "Where would you like to output the kubeconfig";

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

/// Flag, then the first `KUBECONFIG` entry, then `~/.kube/config`.
fn kubeconfig_candidate(
    flag: Option<&str>,
    env: Option<OsString>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(flag) = flag {
        return Some(expand(flag));
    }
    if let Some(env) = env {
        if let Some(first) = std::env::split_paths(&env).find(|p| !p.as_os_str().is_empty()) {
            return Some(first);
        }
    }
    home.map(|h| h.join(".kube").join("config"))
}

pub fn resolve_source_kubeconfig(flag: Option<&str>) -> Result<PathBuf> {
    let candidate = kubeconfig_candidate(flag, std::env::var_os("KUBECONFIG"), dirs::home_dir());
    check_readable(candidate.unwrap_or_else(|| PathBuf::from("~/.kube/config")))
}

fn check_readable(path: PathBuf) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ToolError::io(
            path,
            io::Error::new(io::ErrorKind::NotFound, "kubeconfig not readable"),
        ))
    }
}

/// Where the generated kubeconfig goes, relative paths taken from `cwd`.
pub fn resolve_output_path(
    requested: Option<&str>,
    prompter: &mut dyn Prompter,
    cwd: &Path,
) -> Result<PathBuf> {
    let raw = match requested {
        Some(path) => path.to_string(),
        None => prompter.input(OUTPUT_PROMPT, Some(DEFAULT_OUTPUT))?,
    };
    let raw = raw.trim();
    let raw = if raw.is_empty() { DEFAULT_OUTPUT } else { raw };

    let path = expand(raw);
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(cwd.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::testing::{Answer, ScriptedPrompter};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_flag_beats_environment() {
        let found = kubeconfig_candidate(
            Some("/etc/kube/admin.conf"),
            Some(OsString::from("/from/env")),
            Some(PathBuf::from("/home/ops")),
        );
        assert_eq!(found, Some(PathBuf::from("/etc/kube/admin.conf")));
    }

    #[cfg(unix)]
    #[test]
    fn test_first_environment_entry_is_used() {
        let found = kubeconfig_candidate(
            None,
            Some(OsString::from("/first/config:/second/config")),
            Some(PathBuf::from("/home/ops")),
        );
        assert_eq!(found, Some(PathBuf::from("/first/config")));
    }

    #[test]
    fn test_home_fallback() {
        let found = kubeconfig_candidate(None, None, Some(PathBuf::from("/home/ops")));
        assert_eq!(found, Some(PathBuf::from("/home/ops/.kube/config")));
        assert_eq!(kubeconfig_candidate(None, None, None), None);
    }

    #[test]
    fn test_missing_kubeconfig_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("config");

        let err = resolve_source_kubeconfig(Some(missing.to_str().unwrap())).unwrap_err();
        assert!(err.to_string().ends_with("kubeconfig not readable"));

        fs::write(&missing, "apiVersion: v1\n").unwrap();
        assert_eq!(
            resolve_source_kubeconfig(Some(missing.to_str().unwrap())).unwrap(),
            missing
        );
    }

    #[test]
    fn test_output_defaults_to_cwd() {
        let mut prompter = ScriptedPrompter::new(vec![Answer::Default]);

        let path = resolve_output_path(None, &mut prompter, Path::new("/work")).unwrap();

        assert_eq!(path, PathBuf::from("/work/kubeconfig-sa"));
        assert_eq!(prompter.asked, vec![OUTPUT_PROMPT.to_string()]);
    }

    #[test]
    fn test_output_flag_skips_prompt() {
        let mut prompter = ScriptedPrompter::new(vec![]);

        let relative = resolve_output_path(Some("out/sa.yaml"), &mut prompter, Path::new("/work")).unwrap();
        let absolute = resolve_output_path(Some("/tmp/sa.yaml"), &mut prompter, Path::new("/work")).unwrap();

        assert_eq!(relative, PathBuf::from("/work/out/sa.yaml"));
        assert_eq!(absolute, PathBuf::from("/tmp/sa.yaml"));
        assert!(prompter.asked.is_empty());
    }
}
