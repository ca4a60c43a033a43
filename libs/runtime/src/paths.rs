use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

/// Resolve the application home directory.
///
/// `None` (or blank) means `<user home>/<default_subdir>`. A leading `~` is
/// expanded to the user's home. Relative paths are made absolute against the
/// current directory. With `create`, the directory is created when missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let user_home = || dirs::home_dir().ok_or_else(|| anyhow!("cannot determine user home directory"));

    let raw = configured
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let path = match raw.as_deref() {
        None => user_home()?.join(default_subdir),
        Some("~") => user_home()?,
        Some(s) if s.starts_with("~/") || s.starts_with("~\\") => user_home()?.join(&s[2..]),
        Some(s) => PathBuf::from(s),
    };

    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .context("cannot read current directory")?
            .join(path)
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home dir {}", path.display()))?;
    }
    Ok(path)
}

/// Join `file` onto `base` unless it is already absolute.
pub fn resolve_under(base: &Path, file: &str) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}
