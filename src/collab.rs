//! Seams to the page hosting the terminal. The core only calls out through
//! these traits and never learns that a browser is on the other side.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Achievement {
    TerminalHacker,
    InspectorGadget,
}

impl Achievement {
    pub fn id(self) -> &'static str {
        match self {
            Achievement::TerminalHacker => "TERMINAL_HACKER",
            Achievement::InspectorGadget => "INSPECTOR_GADGET",
        }
    }
}

/// Best guess of the visitor's operating system. Only used to dress up the
/// destructive sequence and pick the failure screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    MacOs,
    Linux,
    Unknown,
}

impl HostOs {
    pub fn from_user_agent(ua: Option<&str>) -> Self {
        let Some(ua) = ua else {
            return HostOs::Linux;
        };
        if ua.contains("Win") {
            HostOs::Windows
        } else if ua.contains("Mac") {
            HostOs::MacOs
        } else if ua.contains("Linux") {
            HostOs::Linux
        } else {
            HostOs::Unknown
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HostOs::Windows => "Windows",
            HostOs::MacOs => "MacOS",
            HostOs::Linux => "Linux",
            HostOs::Unknown => "Unknown OS",
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureDetail {
    pub os: String,
}

/// Fire-and-forget notifications to the host page.
pub trait Notifier {
    fn emit_achievement(&mut self, id: Achievement);
    fn emit_system_failure(&mut self, detail: FailureDetail);
    /// The user asked for a full reload of the session.
    fn request_reboot(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Typing,
    Click,
    Error,
    Achievement,
}

pub trait AudioCue {
    fn play(&mut self, cue: Cue);
}

/// Stand-ins for hosts that don't care about a collaborator.
pub struct Silent;

impl Notifier for Silent {
    fn emit_achievement(&mut self, _id: Achievement) {}
    fn emit_system_failure(&mut self, _detail: FailureDetail) {}
    fn request_reboot(&mut self) {}
}

impl AudioCue for Silent {
    fn play(&mut self, _cue: Cue) {}
}
