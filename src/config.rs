use crate::error::Result;
use crate::transcript::{Line, LineKind};
use serde::Deserialize;

pub const VERSION: &str = "4.0.0-release";

/// Tunables for one terminal session. Every field has a default, so a host
/// can pass a partial JSON object.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub hostname: String,
    pub transcript_limit: usize,
    /// How long the editor's "wrote to disk" notice stays up.
    pub editor_notice_ms: u64,
    pub deletion_interval_ms: u64,
    /// Fabricated deletions shown before the failure event fires.
    pub deletion_ticks: u32,
    pub banner: Vec<Line>,
    pub decrypt_file: String,
    pub decrypt_key: String,
    pub rng_seed: Option<u64>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            hostname: "bahroze".into(),
            transcript_limit: 100,
            editor_notice_ms: 2000,
            deletion_interval_ms: 30,
            deletion_ticks: 51,
            banner: vec![
                Line::new(LineKind::System, format!("BAHROZE_OS [Version {}]", VERSION)),
                Line::new(LineKind::System, "(c) 2024 Cyber Corp. All rights reserved."),
                Line::new(LineKind::Info, "Welcome to the interactive portfolio terminal."),
                Line::new(LineKind::Info, "Type \"help\" for a list of commands."),
            ],
            decrypt_file: "transmission_404.dat".into(),
            decrypt_key: "PROTOCOL_OMEGA".into(),
            rng_seed: None,
        }
    }
}

impl ShellConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
