/// Verbs offered by tab completion, in match priority order.
pub const COMMANDS: &[&str] = &[
    "ls",
    "cd",
    "cat",
    "nano",
    "help",
    "clear",
    "sudo",
    "ai",
    "mkdir",
    "touch",
    "rm",
    "whoami",
    "date",
    "history",
    "reboot",
    "echo",
    "pwd",
    "decrypt",
    "reveal_secrets",
];

/// Tab completion. A lone word completes against `COMMANDS` (adding a
/// trailing space); otherwise the last word completes against `listing`.
/// The first prefix match wins; no match returns the input unchanged.
pub fn complete(input: &str, listing: &[String]) -> String {
    let mut parts: Vec<&str> = input.split(' ').collect();
    if parts.len() == 1 {
        return match COMMANDS.iter().find(|c| c.starts_with(input)) {
            Some(cmd) => format!("{} ", cmd),
            None => input.to_string(),
        };
    }
    let last = parts.last().copied().unwrap_or_default();
    if last.is_empty() {
        return input.to_string();
    }
    match listing.iter().find(|name| name.starts_with(last)) {
        Some(name) => {
            parts.pop();
            parts.push(name);
            parts.join(" ")
        }
        None => input.to_string(),
    }
}
