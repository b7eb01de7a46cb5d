//! Shell-style expansion of `~` and environment variables in config values.
use std::path::PathBuf;

/// Expand a leading `~` or `~user`, then `$VAR` and `${VAR}` references.
///
/// Unknown users and unset variables are left verbatim, matching how a POSIX
/// shell's `expanduser`/`expandvars` pair behaves on configuration strings.
#[must_use]
pub fn expand(text: &str) -> String {
    expand_vars(&expand_user(text))
}

/// Expand a leading `~` (current user's home) or `~user` (that user's home).
#[must_use]
pub fn expand_user(text: &str) -> String {
    let Some(rest) = text.strip_prefix('~') else {
        return text.to_string();
    };
    let (name, tail) = rest.find('/').map_or((rest, ""), |i| rest.split_at(i));
    let home = if name.is_empty() {
        home_dir()
    } else {
        user_home(name)
    };
    home.map_or_else(
        || text.to_string(),
        |home| format!("{}{tail}", home.display()),
    )
}

/// Expand `$VAR` and `${VAR}` using the process environment.
#[must_use]
pub fn expand_vars(text: &str) -> String {
    expand_vars_with(text, |name| std::env::var(name).ok())
}

/// Expand `$VAR` and `${VAR}` using `lookup` to resolve names.
pub fn expand_vars_with(text: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let (name, consumed) = after.strip_prefix('{').map_or_else(
            || {
                let end = after
                    .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                    .unwrap_or(after.len());
                (&after[..end], end)
            },
            |braced| braced.find('}').map_or(("", 0), |end| (&braced[..end], end + 2)),
        );
        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[pos..=pos + consumed]),
        }
        rest = &after[consumed..];
    }
    out.push_str(rest);
    out
}

/// The invoking user's home directory.
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

#[cfg(unix)]
fn user_home(name: &str) -> Option<PathBuf> {
    nix::unistd::User::from_name(name).ok().flatten().map(|u| u.dir)
}

#[cfg(not(unix))]
fn user_home(_name: &str) -> Option<PathBuf> {
    None
}
