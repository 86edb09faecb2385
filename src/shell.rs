use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum User {
    Guest,
    Root,
}

impl User {
    /// Login name, also the home directory name
    pub fn name(self) -> &'static str {
        match self {
            User::Guest => "guest",
            User::Root => "root",
        }
    }
    /// Absolute path of the home directory
    pub fn home(self) -> Vec<String> {
        vec!["home".into(), self.name().into()]
    }
    /// Prompt terminator
    pub fn sigil(self) -> char {
        match self {
            User::Guest => '$',
            User::Root => '#',
        }
    }
}

/// Per-session shell state: identity, location and command history.
pub struct Session {
    pub user: User,
    cwd: Vec<String>,
    pub history: Vec<String>,
    /// Steps back from the newest history entry; `None` means editing a fresh line.
    history_cursor: Option<usize>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            user: User::Guest,
            cwd: User::Guest.home(),
            history: Vec::new(),
            history_cursor: None,
        }
    }

    /// Current directory as absolute segments
    pub fn cwd(&self) -> &[String] {
        &self.cwd
    }

    /// Callers must have checked that `path` names an existing directory.
    pub fn set_cwd(&mut self, path: Vec<String>) {
        self.cwd = path;
    }

    /// Last cwd segment, or `/` at the root
    pub fn location(&self) -> &str {
        self.cwd.last().map(String::as_str).unwrap_or("/")
    }

    pub fn prompt(&self, hostname: &str) -> String {
        format!(
            "{}@{}:{}{}",
            self.user.name(),
            hostname,
            self.location(),
            self.user.sigil()
        )
    }

    /// Append a submitted line to history and stop browsing
    pub fn record(&mut self, line: &str) {
        self.history.push(line.to_string());
        self.history_cursor = None;
    }

    pub fn history_cursor(&self) -> Option<usize> {
        self.history_cursor
    }

    /// Arrow-up: the next older entry, or `None` when already at the oldest.
    pub fn history_prev(&mut self) -> Option<String> {
        let next = self.history_cursor.map_or(0, |i| i + 1);
        if next >= self.history.len() {
            return None;
        }
        self.history_cursor = Some(next);
        Some(self.history[self.history.len() - 1 - next].clone())
    }

    /// Arrow-down: the next newer entry; walking past the newest yields an
    /// empty line and leaves history browsing.
    pub fn history_next(&mut self) -> Option<String> {
        match self.history_cursor? {
            0 => {
                self.history_cursor = None;
                Some(String::new())
            }
            i => {
                self.history_cursor = Some(i - 1);
                Some(self.history[self.history.len() - i].clone())
            }
        }
    }

    /// Numbered history as printed by `history`
    pub fn history_listing(&self) -> String {
        self.history
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}  {}", i + 1, c))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
