use std::path::PathBuf;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref UNIX_VAR: Regex =
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
            .expect("valid unix variable pattern");
    static ref WINDOWS_VAR: Regex =
        Regex::new(r"%([A-Za-z_][A-Za-z0-9_()]*)%").expect("valid windows variable pattern");
}

/// Home directory of the current user, from `HOME` or `USERPROFILE`
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Expand Windows-style `%VAR%` references.
///
/// Unknown variables are left untouched so the resulting path still points
/// the user at the missing variable.
pub fn parse_windows_env_vars(path: &str) -> String {
    WINDOWS_VAR
        .replace_all(path, |caps: &Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Expand Unix-style `$VAR` and `${VAR}` references, leaving unknown ones as-is
pub fn parse_unix_env_vars(path: &str) -> String {
    UNIX_VAR
        .replace_all(path, |caps: &Captures| {
            let name = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
            name.and_then(|n| std::env::var(n).ok())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Expand a leading `~`, then environment variables of both styles.
pub fn expand_path(path: &str) -> PathBuf {
    let mut expanded = path.to_string();

    if expanded == "~" || expanded.starts_with("~/") || expanded.starts_with("~\\") {
        if let Some(home) = home_dir() {
            expanded = format!("{}{}", home.display(), &expanded[1..]);
        }
    }

    if expanded.contains('%') {
        expanded = parse_windows_env_vars(&expanded);
    }
    if expanded.contains('$') {
        expanded = parse_unix_env_vars(&expanded);
    }

    PathBuf::from(expanded)
}
