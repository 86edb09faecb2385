//! The `rm -rf /` easter egg: a scripted crawl of alarming log lines, a burst
//! of fabricated deletions, then a one-way failure. Nothing in the VFS is
//! touched.

use crate::collab::{FailureDetail, HostOs};
use crate::transcript::{Line, LineKind};
use rand::rngs::SmallRng;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Showing script step `n`, waiting out its delay.
    Narrating(usize),
    /// `n` fabricated deletions shown so far.
    Deleting(u32),
    Failed,
}

#[derive(Debug, Clone)]
pub struct Step {
    pub line: Line,
    pub delay_ms: u64,
}

fn step(kind: LineKind, text: impl Into<String>, delay_ms: u64) -> Step {
    Step {
        line: Line::new(kind, text),
        delay_ms,
    }
}

fn target_drive(os: HostOs) -> &'static str {
    match os {
        HostOs::Windows => "C:\\Windows\\System32",
        HostOs::MacOs => "/System/Library/CoreServices",
        HostOs::Linux | HostOs::Unknown => "/dev/sda1",
    }
}

pub fn script(os: HostOs, ip: &str) -> Vec<Step> {
    use LineKind::*;
    vec![
        step(Error, "[SYSTEM] DETECTED UNAUTHORIZED ROOT COMMAND: rm -rf /", 800),
        step(System, "[NETWORK] TRACING ORIGIN IP...", 1000),
        step(Warning, format!("[NETWORK] TARGET IDENTIFIED: {} ({})", ip, os), 800),
        step(System, "[NETWORK] INITIATING REVERSE CONNECTION TO HOST...", 1500),
        step(Success, "[NETWORK] CONNECTION ESTABLISHED.", 800),
        step(System, "[SECURITY] BYPASSING HOST FIREWALL...", 1200),
        step(Warning, "[SECURITY] EXPLOIT CVE-2024-XXXX INJECTED.", 500),
        step(System, "[SECURITY] DUMPING MEMORY ADDR: 0x00400000 - 0x0040FFFF...", 500),
        step(Warning, "[SECURITY] DECRYPTING USER CREDENTIALS...", 800),
        step(Error, "[AUTH] ATTEMPT 1: ********** [FAILED]", 600),
        step(Error, "[AUTH] ATTEMPT 2: ********** [FAILED]", 600),
        step(Success, "[AUTH] ATTEMPT 3: ********** [SUCCESS]", 1000),
        step(Error, "[ROOT] ROOT ACCESS GRANTED.", 800),
        step(System, "[SYSTEM] STOPPING SERVICES: [audio] [display] [network]...", 500),
        step(Warning, format!("[DISK] MOUNTING {} FOR DELETION...", target_drive(os)), 1500),
        step(Error, "[DISK] EXECUTING WIPE SEQUENCE...", 1000),
    ]
}

/// Result of one transition: lines to append, when to call back, and the
/// failure event if this transition reached the end.
#[derive(Debug, Default)]
pub struct Advance {
    pub lines: Vec<Line>,
    pub next_in_ms: Option<u64>,
    pub failure: Option<FailureDetail>,
}

pub struct WipeSequence {
    phase: Phase,
    os: HostOs,
    script: Vec<Step>,
    rng: SmallRng,
    deletion_ticks: u32,
    deletion_interval_ms: u64,
}

impl WipeSequence {
    pub fn new(os: HostOs, rng: SmallRng, deletion_ticks: u32, deletion_interval_ms: u64) -> Self {
        WipeSequence {
            phase: Phase::Idle,
            os,
            script: Vec::new(),
            rng,
            deletion_ticks,
            deletion_interval_ms,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Idle -> Narrating(0). Any later call is a no-op.
    pub fn start(&mut self) -> Advance {
        if self.phase != Phase::Idle {
            return Advance::default();
        }
        let ip = format!(
            "192.168.{}.{}",
            self.rng.gen_range(0..255),
            self.rng.gen_range(0..255)
        );
        self.script = script(self.os, &ip);
        self.narrate(0)
    }

    /// The pending timer fired.
    pub fn tick(&mut self) -> Advance {
        match self.phase {
            Phase::Narrating(i) if i + 1 < self.script.len() => self.narrate(i + 1),
            Phase::Narrating(_) => {
                self.phase = Phase::Deleting(0);
                Advance {
                    next_in_ms: Some(self.deletion_interval_ms),
                    ..Advance::default()
                }
            }
            Phase::Deleting(n) => {
                let count = n + 1;
                let line = Line::new(LineKind::System, format!("DELETING: {}", self.fake_path()));
                if count >= self.deletion_ticks {
                    self.phase = Phase::Failed;
                    Advance {
                        lines: vec![line],
                        next_in_ms: None,
                        failure: Some(FailureDetail {
                            os: self.os.label().to_string(),
                        }),
                    }
                } else {
                    self.phase = Phase::Deleting(count);
                    Advance {
                        lines: vec![line],
                        next_in_ms: Some(self.deletion_interval_ms),
                        failure: None,
                    }
                }
            }
            Phase::Idle | Phase::Failed => Advance::default(),
        }
    }

    fn narrate(&mut self, i: usize) -> Advance {
        self.phase = Phase::Narrating(i);
        let step = &self.script[i];
        Advance {
            lines: vec![step.line.clone()],
            next_in_ms: Some(step.delay_ms),
            failure: None,
        }
    }

    fn fake_path(&mut self) -> String {
        const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        let name: String = (0..5)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        match self.os {
            HostOs::Windows => format!("C:\\Windows\\System32\\{}.dll", name),
            _ => format!("/usr/lib/{}.so", name),
        }
    }
}
