use anyhow::{bail, Result};
use std::io::{self, Write};

pub fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn prompt_required(label: &str) -> Result<String> {
    let value = prompt(label)?;
    if value.is_empty() {
        bail!("{} is required", label);
    }
    Ok(value)
}

/// Passwords and PINs. Plain stdin, so the terminal still echoes what is
/// typed; the value is never logged.
pub fn prompt_secret(label: &str) -> Result<String> {
    prompt_required(label)
}

/// Use the flag value when given, otherwise ask.
pub fn or_prompt(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => prompt_required(label),
    }
}

pub fn confirm(label: &str) -> Result<bool> {
    let answer = prompt(&format!("{label} [y/N]"))?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}
