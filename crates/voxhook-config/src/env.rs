use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Failure while expanding config placeholders
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error("environment variable not found: `{0}`")]
    MissingVar(String),
    #[error("only variables scoped with 'env.' are supported: `{0}`")]
    UnsupportedScope(String),
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `{{ env.VAR }}` with an optional `| default("fallback")`
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in raw TOML text
///
/// `{{ env.VAR | default("fallback") }}` substitutes the fallback when the
/// variable is unset. Comment lines are passed through untouched so a
/// commented-out secret never has to exist in the environment.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let lines = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                Ok(line.to_string())
            } else {
                expand_line(line)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut output = lines.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn expand_line(line: &str) -> Result<String, ExpandError> {
    let mut result = String::with_capacity(line.len());
    let mut last_end = 0;

    for captures in placeholder().captures_iter(line) {
        let Some(whole) = captures.get(0) else { continue };

        result.push_str(&line[last_end..whole.start()]);
        result.push_str(&resolve(&captures)?);
        last_end = whole.end();
    }

    result.push_str(&line[last_end..]);
    Ok(result)
}

fn resolve(captures: &Captures<'_>) -> Result<String, ExpandError> {
    let key = captures.get(1).map_or("", |m| m.as_str());
    let fallback = captures.get(2).map(|m| m.as_str());

    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(ExpandError::UnsupportedScope(key.to_string()));
    };

    match (std::env::var(var_name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_string()),
        (Err(_), None) => Err(ExpandError::MissingVar(var_name.to_string())),
    }
}
