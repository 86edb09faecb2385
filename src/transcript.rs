use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Input,
    Output,
    System,
    Error,
    Success,
    Info,
    Secret,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

impl Line {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Line {
            kind,
            text: text.into(),
        }
    }
    pub fn output(text: impl Into<String>) -> Self {
        Line::new(LineKind::Output, text)
    }
    pub fn error(text: impl Into<String>) -> Self {
        Line::new(LineKind::Error, text)
    }
    pub fn success(text: impl Into<String>) -> Self {
        Line::new(LineKind::Success, text)
    }
    pub fn info(text: impl Into<String>) -> Self {
        Line::new(LineKind::Info, text)
    }
}

/// Rendered terminal lines, keeping only the newest `limit` entries.
#[derive(Debug, Clone)]
pub struct Transcript {
    lines: VecDeque<Line>,
    limit: usize,
}

impl Transcript {
    pub fn new(limit: usize) -> Self {
        Transcript {
            lines: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn push(&mut self, line: Line) {
        if self.limit == 0 {
            return;
        }
        while self.lines.len() >= self.limit {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn extend<I: IntoIterator<Item = Line>>(&mut self, lines: I) {
        for line in lines {
            self.push(line);
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last(&self) -> Option<&Line> {
        self.lines.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    pub fn to_vec(&self) -> Vec<Line> {
        self.lines.iter().cloned().collect()
    }
}
