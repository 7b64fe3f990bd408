//! Output formatting utilities

use crate::error::VitaeError;

/// Highest exit status a process can report
pub const MAX_EXIT_STATUS: i32 = 255;

/// Sum the exit codes of failed names, capped at 255
pub fn exit_status<'a>(errors: impl IntoIterator<Item = &'a VitaeError>) -> i32 {
    errors
        .into_iter()
        .map(VitaeError::exit_code)
        .fold(0i32, |total, code| total.saturating_add(code))
        .min(MAX_EXIT_STATUS)
}

/// Format config entries as `key = value` lines
pub fn format_config_list(entries: &[(&str, String)]) -> String {
    let mut output = String::new();
    for (key, value) in entries {
        output.push_str(&format!("{} = {}\n", key, value));
    }
    output
}
