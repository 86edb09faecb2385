use crate::collab::{Achievement, AudioCue, Cue, HostOs, Notifier};
use crate::complete;
use crate::config::ShellConfig;
use crate::error::{Result, ShellError};
use crate::nano::{EditorBuffer, EditorSnapshot, SAVED_NOTICE, SAVE_FAILED_NOTICE};
use crate::path::resolve;
use crate::scheduler::{Scheduler, TimerId};
use crate::seed;
use crate::shell::{Session, User};
use crate::transcript::{Line, LineKind, Transcript};
use crate::vfs::{FsNode, Vfs};
use crate::wipe::{Advance, Phase, WipeSequence};
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

const HELP: &str = "
  Available Commands:
  -------------------
  ls [-la]       List directory contents
  cd <dir>       Change directory
  cat <file>     Output file contents
  nano <file>    Advanced text editor
  mkdir <dir>    Create new directory
  rm <file>      Remove file/directory
  touch <file>   Create empty file
  decrypt <f> <k> Decrypt a secured file

  System:
  -------
  sudo           Execute as superuser
  whoami         Print effective userid
  date           Print system date/time
  echo <text>    Display a line of text
  history        Command history
  reboot         Reload system (refresh page)
  clear          Clear terminal buffer

  AI:
  ---
  ai <prompt>    Query Gemini-3-Pro
";

/// A command's usage line, shown when its arguments are missing.
fn usage(synopsis: &str) -> String {
    ShellError::Usage {
        usage: synopsis.into(),
    }
    .to_string()
}

enum Timer {
    Wipe,
    ClearNotice,
}

/// What the host has to do after handing the terminal a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The line was dropped: empty, or the terminal isn't taking commands.
    Ignored,
    /// Send this prompt to the chat backend, then call `resolve_delegation`.
    Delegate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Shell,
    Editor,
    AwaitingReply,
    Wiping,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub user: User,
    pub cwd: Vec<String>,
    #[serde(rename = "isProcessing")]
    pub is_processing: bool,
}

/// One interactive shell session: filesystem, user state, transcript and the
/// modal sub-programs (editor, destructive sequence) layered over them.
pub struct Terminal {
    config: ShellConfig,
    vfs: Vfs,
    session: Session,
    transcript: Transcript,
    editor: Option<EditorBuffer>,
    wipe: WipeSequence,
    timers: Scheduler<Timer>,
    notice_timer: Option<TimerId>,
    awaiting_reply: bool,
    greeted: bool,
    notifier: Box<dyn Notifier>,
    audio: Box<dyn AudioCue>,
}

impl Terminal {
    pub fn new(
        config: ShellConfig,
        os: HostOs,
        notifier: Box<dyn Notifier>,
        audio: Box<dyn AudioCue>,
    ) -> Self {
        let rng = SmallRng::seed_from_u64(config.rng_seed.unwrap_or_default());
        let wipe = WipeSequence::new(
            os,
            rng,
            config.deletion_ticks,
            config.deletion_interval_ms,
        );
        let mut transcript = Transcript::new(config.transcript_limit);
        transcript.extend(config.banner.iter().cloned());
        Terminal {
            vfs: Vfs::new(seed::initial_tree()),
            session: Session::new(),
            transcript,
            editor: None,
            wipe,
            timers: Scheduler::new(),
            notice_timer: None,
            awaiting_reply: false,
            greeted: false,
            notifier,
            audio,
            config,
        }
    }

    pub fn mode(&self) -> Mode {
        match self.wipe.phase() {
            Phase::Failed => Mode::Failed,
            Phase::Narrating(_) | Phase::Deleting(_) => Mode::Wiping,
            Phase::Idle if self.editor.is_some() => Mode::Editor,
            Phase::Idle if self.awaiting_reply => Mode::AwaitingReply,
            Phase::Idle => Mode::Shell,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.awaiting_reply || self.wipe.is_active()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn vfs(&self) -> &Vfs {
        &self.vfs
    }

    pub fn wipe_phase(&self) -> Phase {
        self.wipe.phase()
    }

    pub fn prompt(&self) -> String {
        self.session.prompt(&self.config.hostname)
    }

    pub fn session_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.session.user,
            cwd: self.session.cwd().to_vec(),
            is_processing: self.is_processing(),
        }
    }

    pub fn editor(&self) -> Option<&EditorBuffer> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorBuffer> {
        self.editor.as_mut()
    }

    pub fn editor_snapshot(&self) -> Option<EditorSnapshot> {
        self.editor.as_ref().map(EditorBuffer::snapshot)
    }

    pub fn complete(&self, input: &str) -> String {
        let listing = self.vfs.list(self.session.cwd()).unwrap_or_default();
        complete::complete(input, &listing)
    }

    pub fn history_prev(&mut self) -> Option<String> {
        self.session.history_prev()
    }

    pub fn history_next(&mut self) -> Option<String> {
        self.session.history_next()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    fn emit(&mut self, line: Line) {
        self.transcript.push(line);
    }

    /// Runs one line of user input.
    pub fn submit(&mut self, line: &str) -> Outcome {
        if self.mode() != Mode::Shell {
            debug!("input dropped in {:?} mode", self.mode());
            return Outcome::Ignored;
        }
        if line.trim().is_empty() {
            return Outcome::Ignored;
        }
        self.audio.play(Cue::Click);
        if !self.greeted {
            self.greeted = true;
            self.notifier.emit_achievement(Achievement::TerminalHacker);
        }

        let echo = format!("{} {}", self.prompt(), line);
        self.emit(Line::new(LineKind::Input, echo));
        self.session.record(line);

        let words: Vec<&str> = line.split_whitespace().collect();
        let user = self.session.user;
        self.dispatch(&words, user)
    }

    fn dispatch(&mut self, words: &[&str], user: User) -> Outcome {
        let Some((&verb, args)) = words.split_first() else {
            return Outcome::Done;
        };
        debug!("exec {} {:?} as {}", verb, args, user.name());
        match verb {
            "sudo" => return self.cmd_sudo(args),
            "ai" => return self.cmd_ai(args),
            "help" => self.emit(Line::info(HELP)),
            "clear" | "cls" => self.transcript.clear(),
            "reboot" => {
                info!("reboot requested");
                self.notifier.request_reboot();
            }
            "date" => {
                let now = chrono::Local::now();
                self.emit(Line::output(now.format("%a %b %d %Y %H:%M:%S GMT%z").to_string()));
            }
            "echo" => self.emit(Line::output(args.join(" "))),
            "history" => {
                let listing = self.session.history_listing();
                self.emit(Line::output(listing));
            }
            "whoami" => self.emit(Line::output(user.name())),
            "pwd" => {
                let pwd = format!("/{}", self.session.cwd().join("/"));
                self.emit(Line::output(pwd));
            }
            "ls" | "dir" | "ll" => self.cmd_ls(args, user),
            "cd" => self.cmd_cd(args, user),
            "cat" => self.cmd_cat(args, user),
            "mkdir" => self.cmd_mkdir(args, user),
            "touch" => self.cmd_touch(args, user),
            "rm" => self.cmd_rm(args, user),
            "nano" | "vi" | "vim" => self.cmd_nano(args, user),
            "decrypt" => self.cmd_decrypt(args),
            "reveal_secrets" => self.cmd_reveal_secrets(),
            _ => self.emit(Line::error(format!("Command not found: {}", verb))),
        }
        Outcome::Done
    }

    fn resolve(&self, expr: &str, user: User) -> Vec<String> {
        resolve(expr, self.session.cwd(), user)
    }

    fn cmd_sudo(&mut self, args: &[&str]) -> Outcome {
        match args.first() {
            None => {
                self.emit(Line::info(usage("sudo <command>")));
                Outcome::Done
            }
            Some(&"su") => {
                self.session.user = User::Root;
                let home = User::Root.home();
                if self.vfs.get(&home).is_ok_and(FsNode::is_dir) {
                    self.session.set_cwd(home);
                } else {
                    self.session.set_cwd(Vec::new());
                }
                info!("switched to root");
                self.emit(Line::success("Switched to user root."));
                Outcome::Done
            }
            Some(_) => self.dispatch(args, User::Root),
        }
    }

    fn cmd_ls(&mut self, args: &[&str], user: User) {
        let show_hidden = args.iter().any(|a| *a == "-la" || *a == "-al");
        let target = args.iter().copied().find(|a| !a.starts_with('-'));
        let path = match target {
            Some(t) => self.resolve(t, user),
            None => self.session.cwd().to_vec(),
        };
        let line = match self.vfs.get(&path) {
            Err(_) => Line::error(format!(
                "ls: cannot access '{}': No such file or directory",
                target.unwrap_or(".")
            )),
            Ok(FsNode::File { .. }) => Line::output(target.unwrap_or_default()),
            Ok(FsNode::Directory { .. }) => {
                let items: Vec<String> = self
                    .vfs
                    .list(&path)
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|name| show_hidden || !name.starts_with('.'))
                    .collect();
                if items.is_empty() {
                    Line::output("(empty)")
                } else {
                    Line::output(items.join("    "))
                }
            }
        };
        self.emit(line);
    }

    fn cmd_cd(&mut self, args: &[&str], user: User) {
        let target = args.first().copied().unwrap_or("~");
        let path = self.resolve(target, user);
        if self.vfs.get(&path).is_ok_and(FsNode::is_dir) {
            self.session.set_cwd(path);
        } else {
            self.emit(Line::error(format!("cd: {}: No such directory", target)));
        }
    }

    fn cmd_cat(&mut self, args: &[&str], user: User) {
        let Some(&target) = args.first() else {
            self.emit(Line::error(usage("cat <filename>")));
            return;
        };
        let path = self.resolve(target, user);
        let line = match self.vfs.read(&path) {
            Ok(content) => Line::output(content),
            Err(_) => Line::error(format!("cat: {}: No such file", target)),
        };
        self.emit(line);
    }

    // The root-only area: `/root/...` and root's home.
    fn check_scope(path: &[String], user: User) -> Result<()> {
        let scoped = path.first().is_some_and(|s| s == "root")
            || (path.len() >= 2 && path[0] == "home" && path[1] == "root");
        if scoped && user != User::Root {
            return Err(ShellError::PermissionDenied);
        }
        Ok(())
    }

    fn cmd_mkdir(&mut self, args: &[&str], user: User) {
        let Some(&target) = args.first() else {
            self.emit(Line::error(usage("mkdir <directory>")));
            return;
        };
        let path = self.resolve(target, user);
        if Self::check_scope(&path, user).is_err() {
            self.emit(Line::error("mkdir: permission denied"));
            return;
        }
        let line = match self.vfs.mkdir(&path) {
            Ok(()) => Line::success(format!("Directory '{}' created.", target)),
            Err(_) => Line::error(format!(
                "mkdir: cannot create directory '{}': File exists or path invalid",
                target
            )),
        };
        self.emit(line);
    }

    fn cmd_touch(&mut self, args: &[&str], user: User) {
        let Some(&target) = args.first() else {
            self.emit(Line::error(usage("touch <filename>")));
            return;
        };
        let path = self.resolve(target, user);
        if Self::check_scope(&path, user).is_err() {
            self.emit(Line::error("touch: permission denied"));
            return;
        }
        if self.vfs.exists(&path) {
            return;
        }
        let line = match self.vfs.write(&path, "") {
            Ok(()) => Line::success(format!("File '{}' created.", target)),
            Err(_) => Line::error(format!("touch: cannot create file '{}'", target)),
        };
        self.emit(line);
    }

    fn cmd_rm(&mut self, args: &[&str], user: User) {
        if args.is_empty() {
            self.emit(Line::error(usage("rm <filename>")));
            return;
        }
        if user == User::Root && args.contains(&"-rf") && args.contains(&"/") {
            self.start_wipe();
            return;
        }
        if args.starts_with(&["-rf", "/"]) {
            self.emit(Line::error(format!(
                "Nice try, but I can't let you do that, {}.",
                user.name()
            )));
            return;
        }
        let Some(target) = args.iter().copied().find(|a| !a.starts_with('-')) else {
            self.emit(Line::error(usage("rm <filename>")));
            return;
        };
        let path = self.resolve(target, user);
        let line = match self.vfs.delete(&path) {
            Ok(()) => Line::success(format!("Removed '{}'", target)),
            Err(_) => Line::error(format!(
                "rm: cannot remove '{}': No such file or directory",
                target
            )),
        };
        self.emit(line);
        self.settle_cwd();
    }

    /// Walks the cwd up to its deepest surviving directory.
    fn settle_cwd(&mut self) {
        let mut cwd = self.session.cwd().to_vec();
        while !cwd.is_empty() && !self.vfs.get(&cwd).is_ok_and(FsNode::is_dir) {
            cwd.pop();
        }
        self.session.set_cwd(cwd);
    }

    fn cmd_nano(&mut self, args: &[&str], user: User) {
        let Some(&target) = args.first() else {
            self.emit(Line::error(usage("nano <filename>")));
            return;
        };
        let path = self.resolve(target, user);
        let content = match self.vfs.get(&path) {
            Ok(FsNode::Directory { .. }) => None,
            Ok(FsNode::File { content }) => Some(content.clone()),
            Err(_) => Some(String::new()),
        };
        let Some(content) = content else {
            self.emit(Line::error(format!("nano: {} is a directory", target)));
            return;
        };
        info!("editor opened for {}", target);
        self.editor = Some(EditorBuffer::new(target, path, &content));
    }

    fn cmd_decrypt(&mut self, args: &[&str]) {
        let [file, key, ..] = args else {
            self.emit(Line::error(usage("decrypt <file> <key>")));
            return;
        };
        if *file == self.config.decrypt_file && *key == self.config.decrypt_key {
            self.audio.play(Cue::Achievement);
            let rule = "--------------------------------";
            self.transcript.extend([
                Line::success("DECRYPTION SUCCESSFUL..."),
                Line::new(LineKind::Secret, rule),
                Line::new(LineKind::Secret, "THE MASTER KEY IS: \"reveal_secrets\""),
                Line::new(LineKind::Secret, "RUN THIS COMMAND TO SEE EVERYTHING."),
                Line::new(LineKind::Secret, rule),
            ]);
        } else {
            self.audio.play(Cue::Error);
            self.emit(Line::error("DECRYPTION FAILED: Invalid Key or File"));
        }
    }

    fn cmd_reveal_secrets(&mut self) {
        self.audio.play(Cue::Achievement);
        self.emit(Line::new(LineKind::Secret, ">>> SECRET CACHE REVEALED <<<"));
        let hints = [
            "1. Click the \"V.3.1\" version number in the header.".to_string(),
            format!(
                "2. Type \"{}\" as a key to decrypt the hidden file in home/guest/.secret_cache",
                self.config.decrypt_key
            ),
            "3. There is a hidden pixel in the Hero section (bottom right corner).".to_string(),
            "4. Check your browser cookies.".to_string(),
            "5. Konami Code (Up, Up, Down, Down...) triggers Overdrive.".to_string(),
            "6. Try \"sudo rm -rf /\" to destroy the portfolio.".to_string(),
        ];
        self.transcript.extend(hints.into_iter().map(Line::info));
        self.notifier.emit_achievement(Achievement::InspectorGadget);
    }

    fn cmd_ai(&mut self, args: &[&str]) -> Outcome {
        let prompt = args.join(" ");
        if prompt.is_empty() {
            self.emit(Line::error(usage("ai <prompt>")));
            return Outcome::Done;
        }
        self.awaiting_reply = true;
        Outcome::Delegate(prompt)
    }

    /// Completes an `ai` command with the chat backend's answer.
    pub fn resolve_delegation(&mut self, reply: Result<String>) {
        if !self.awaiting_reply {
            return;
        }
        self.awaiting_reply = false;
        match reply {
            Ok(text) => self.emit(Line::success(format!("AI: {}", text))),
            Err(e) => {
                warn!("chat backend failed: {}", e);
                self.emit(Line::error("Error connecting to AI subsystem."));
            }
        }
    }

    /// Writes the editor buffer back to its file.
    pub fn save_editor(&mut self) -> Result<()> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(());
        };
        if let Some(id) = self.notice_timer.take() {
            self.timers.cancel(id);
        }
        let text = editor.text();
        match self.vfs.write(editor.target(), &text) {
            Ok(()) => {
                editor.mark_saved(text);
                editor.set_notice(SAVED_NOTICE);
                let id = self
                    .timers
                    .schedule(self.config.editor_notice_ms, Timer::ClearNotice);
                self.notice_timer = Some(id);
                Ok(())
            }
            Err(e) => {
                warn!("save of {} failed: {}", editor.file_name(), e);
                editor.set_notice(SAVE_FAILED_NOTICE);
                Err(e)
            }
        }
    }

    /// Leaves the editor, dropping unsaved changes.
    pub fn exit_editor(&mut self) {
        let Some(editor) = self.editor.take() else {
            return;
        };
        if let Some(id) = self.notice_timer.take() {
            self.timers.cancel(id);
        }
        info!("editor closed for {}", editor.file_name());
        self.emit(Line::new(
            LineKind::System,
            format!("Closed editor for '{}'", editor.file_name()),
        ));
    }

    fn start_wipe(&mut self) {
        info!("destructive sequence started");
        let adv = self.wipe.start();
        self.apply_wipe(adv);
    }

    fn apply_wipe(&mut self, adv: Advance) {
        if matches!(self.wipe.phase(), Phase::Narrating(_)) && !adv.lines.is_empty() {
            self.audio.play(Cue::Typing);
        }
        self.transcript.extend(adv.lines);
        if let Some(ms) = adv.next_in_ms {
            self.timers.schedule(ms, Timer::Wipe);
        }
        if let Some(detail) = adv.failure {
            info!("system failure signalled ({})", detail.os);
            self.notifier.emit_system_failure(detail);
        }
    }

    /// Moves virtual time forward, firing every timer that comes due.
    pub fn advance(&mut self, ms: u64) {
        let until = self.timers.now().saturating_add(ms);
        while let Some(timer) = self.timers.pop_due(until) {
            match timer {
                Timer::Wipe => {
                    let adv = self.wipe.tick();
                    self.apply_wipe(adv);
                }
                Timer::ClearNotice => {
                    self.notice_timer = None;
                    if let Some(editor) = self.editor.as_mut() {
                        editor.clear_notice();
                    }
                }
            }
        }
        self.timers.set_now(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{FailureDetail, Silent};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Achievement(Achievement),
        Failure(FailureDetail),
        Reboot,
        Cue(Cue),
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl Recorder {
        fn events(&self) -> Vec<Event> {
            self.0.borrow().clone()
        }
        fn failures(&self) -> usize {
            self.events()
                .iter()
                .filter(|e| matches!(e, Event::Failure(_)))
                .count()
        }
    }

    impl Notifier for Recorder {
        fn emit_achievement(&mut self, id: Achievement) {
            self.0.borrow_mut().push(Event::Achievement(id));
        }
        fn emit_system_failure(&mut self, detail: FailureDetail) {
            self.0.borrow_mut().push(Event::Failure(detail));
        }
        fn request_reboot(&mut self) {
            self.0.borrow_mut().push(Event::Reboot);
        }
    }

    impl AudioCue for Recorder {
        fn play(&mut self, cue: Cue) {
            self.0.borrow_mut().push(Event::Cue(cue));
        }
    }

    fn term() -> (Terminal, Recorder) {
        let rec = Recorder::default();
        let config = ShellConfig {
            rng_seed: Some(42),
            ..ShellConfig::default()
        };
        let t = Terminal::new(
            config,
            HostOs::Linux,
            Box::new(rec.clone()),
            Box::new(rec.clone()),
        );
        (t, rec)
    }

    /// Lines appended by one command.
    fn run(t: &mut Terminal, line: &str) -> Vec<Line> {
        let before = t.transcript().len();
        t.submit(line);
        t.transcript().iter().skip(before).cloned().collect()
    }

    fn last_text(t: &mut Terminal, line: &str) -> String {
        run(t, line).pop().map(|l| l.text).unwrap_or_default()
    }

    #[test]
    fn test_banner_and_prompt() {
        let (t, _) = term();
        assert_eq!(t.transcript().len(), 4);
        assert_eq!(t.prompt(), "guest@bahroze:guest$");
        assert_eq!(t.mode(), Mode::Shell);
    }

    #[test]
    fn test_input_echo_and_history() {
        let (mut t, _) = term();
        let lines = run(&mut t, "echo  hello   world");
        assert_eq!(
            lines,
            vec![
                Line::new(LineKind::Input, "guest@bahroze:guest$ echo  hello   world"),
                Line::output("hello world"),
            ]
        );
        assert_eq!(last_text(&mut t, "history"), "1  echo  hello   world\n2  history");
        assert_eq!(t.history_prev().as_deref(), Some("history"));
    }

    #[test]
    fn test_blank_line_is_dropped() {
        let (mut t, rec) = term();
        assert_eq!(t.submit("   "), Outcome::Ignored);
        assert_eq!(t.transcript().len(), 4);
        assert!(t.session().history.is_empty());
        assert!(rec.events().is_empty());
    }

    #[test]
    fn test_first_command_achievement_once() {
        let (mut t, rec) = term();
        run(&mut t, "pwd");
        run(&mut t, "whoami");
        let hacker = rec
            .events()
            .into_iter()
            .filter(|e| *e == Event::Achievement(Achievement::TerminalHacker))
            .count();
        assert_eq!(hacker, 1);
    }

    #[test]
    fn test_cd_pwd_and_missing_cat() {
        let (mut t, _) = term();
        run(&mut t, "cd projects");
        assert_eq!(last_text(&mut t, "pwd"), "/home/guest/projects");
        let lines = run(&mut t, "cat missing.txt");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].kind, LineKind::Input);
        assert_eq!(lines[1], Line::error("cat: missing.txt: No such file"));
    }

    #[test]
    fn test_cd_rejects_files_and_missing() {
        let (mut t, _) = term();
        assert_eq!(last_text(&mut t, "cd todo.txt"), "cd: todo.txt: No such directory");
        assert_eq!(last_text(&mut t, "cd /nowhere"), "cd: /nowhere: No such directory");
        assert_eq!(t.session().cwd(), ["home", "guest"]);
        run(&mut t, "cd /");
        assert_eq!(t.prompt(), "guest@bahroze:/$");
        run(&mut t, "cd");
        assert_eq!(t.session().cwd(), ["home", "guest"]);
    }

    #[test]
    fn test_ls_hides_dotfiles() {
        let (mut t, _) = term();
        let plain = last_text(&mut t, "ls");
        assert!(!plain.contains(".secret_cache"));
        assert!(plain.contains("projects/"));
        assert!(plain.contains("about.md"));
        let all = last_text(&mut t, "ls -la");
        assert!(all.contains(".secret_cache/"));
        assert_eq!(
            last_text(&mut t, "ls .secret_cache"),
            "transmission_404.dat"
        );
    }

    #[test]
    fn test_ls_file_missing_and_empty() {
        let (mut t, _) = term();
        assert_eq!(last_text(&mut t, "ls todo.txt"), "todo.txt");
        assert_eq!(
            last_text(&mut t, "ls nope"),
            "ls: cannot access 'nope': No such file or directory"
        );
        assert_eq!(last_text(&mut t, "dir /etc"), "(empty)");
    }

    #[test]
    fn test_mkdir_twice_conflicts() {
        let (mut t, _) = term();
        assert_eq!(last_text(&mut t, "mkdir x"), "Directory 'x' created.");
        let after_first = t.vfs().snapshot();
        let line = run(&mut t, "mkdir x").pop().unwrap();
        assert_eq!(
            line,
            Line::error("mkdir: cannot create directory 'x': File exists or path invalid")
        );
        assert!(Rc::ptr_eq(&after_first, &t.vfs().snapshot()));
    }

    #[test]
    fn test_root_area_needs_root() {
        let (mut t, _) = term();
        assert_eq!(last_text(&mut t, "mkdir /root"), "mkdir: permission denied");
        assert_eq!(last_text(&mut t, "mkdir /root/x"), "mkdir: permission denied");
        assert_eq!(last_text(&mut t, "touch /root/x"), "touch: permission denied");
        assert_eq!(
            last_text(&mut t, "mkdir /home/root/new"),
            "mkdir: permission denied"
        );
        assert_eq!(last_text(&mut t, "touch ../root/x"), "touch: permission denied");
        let x = vec!["home".to_string(), "root".to_string(), "x".to_string()];
        assert!(!t.vfs().exists(&x));
        assert_eq!(
            last_text(&mut t, "sudo touch ../root/x"),
            "File '../root/x' created."
        );
        run(&mut t, "sudo su");
        assert_eq!(last_text(&mut t, "mkdir /root"), "Directory '/root' created.");
    }

    #[test]
    fn test_touch_existing_is_silent() {
        let (mut t, _) = term();
        let lines = run(&mut t, "touch todo.txt");
        assert_eq!(lines.len(), 1);
        assert_eq!(last_text(&mut t, "touch new.txt"), "File 'new.txt' created.");
        assert_eq!(
            last_text(&mut t, "touch /nope/new.txt"),
            "touch: cannot create file '/nope/new.txt'"
        );
    }

    #[test]
    fn test_rm() {
        let (mut t, _) = term();
        assert_eq!(last_text(&mut t, "rm todo.txt"), "Removed 'todo.txt'");
        assert_eq!(
            last_text(&mut t, "rm todo.txt"),
            "rm: cannot remove 'todo.txt': No such file or directory"
        );
        assert_eq!(last_text(&mut t, "rm -rf projects"), "Removed 'projects'");
        assert_eq!(last_text(&mut t, "rm"), "usage: rm <filename>");
    }

    #[test]
    fn test_rm_of_cwd_moves_up() {
        let (mut t, _) = term();
        run(&mut t, "cd projects");
        assert_eq!(last_text(&mut t, "rm ../projects"), "Removed '../projects'");
        assert_eq!(t.session().cwd(), ["home", "guest"]);
        let listing = run(&mut t, "ls").pop().unwrap();
        assert_eq!(listing.kind, LineKind::Output);
        assert_eq!(last_text(&mut t, "touch notes.txt"), "File 'notes.txt' created.");
    }

    #[test]
    fn test_rm_of_ancestor_moves_to_survivor() {
        let (mut t, _) = term();
        run(&mut t, "cd projects");
        run(&mut t, "rm /home");
        assert!(t.session().cwd().is_empty());
        assert_eq!(t.prompt(), "guest@bahroze:/$");
        assert_eq!(last_text(&mut t, "pwd"), "/");
    }

    #[test]
    fn test_rm_elsewhere_keeps_cwd() {
        let (mut t, _) = term();
        run(&mut t, "cd projects");
        run(&mut t, "rm ../todo.txt");
        assert_eq!(t.session().cwd(), ["home", "guest", "projects"]);
    }

    #[test]
    fn test_sudo_su_without_root_home() {
        let (mut t, _) = term();
        assert_eq!(last_text(&mut t, "rm /home/root"), "Removed '/home/root'");
        assert_eq!(last_text(&mut t, "sudo su"), "Switched to user root.");
        assert!(t.session().cwd().is_empty());
        assert_eq!(t.prompt(), "root@bahroze:/#");
        let listing = run(&mut t, "ls").pop().unwrap();
        assert_eq!(listing.kind, LineKind::Output);
    }

    #[test]
    fn test_advance_saturates() {
        let (mut t, _) = term();
        run(&mut t, "nano a.txt");
        t.save_editor().unwrap();
        t.advance(u64::MAX);
        assert_eq!(t.editor().unwrap().notice(), None);
        t.save_editor().unwrap();
        t.advance(u64::MAX);
        assert_eq!(t.next_deadline(), None);
    }

    #[test]
    fn test_silent_collaborators() {
        let mut t = Terminal::new(
            ShellConfig::default(),
            HostOs::Unknown,
            Box::new(Silent),
            Box::new(Silent),
        );
        assert_eq!(t.submit("reveal_secrets"), Outcome::Done);
        assert_eq!(t.submit("reboot"), Outcome::Done);
        assert_eq!(t.transcript().len(), 4 + 8 + 1);
    }

    #[test]
    fn test_guest_rm_rf_root_is_refused() {
        let (mut t, rec) = term();
        let before = t.vfs().snapshot();
        assert_eq!(
            last_text(&mut t, "rm -rf /"),
            "Nice try, but I can't let you do that, guest."
        );
        assert_eq!(t.wipe_phase(), Phase::Idle);
        assert!(Rc::ptr_eq(&before, &t.vfs().snapshot()));
        assert!(!t.is_processing());
        t.advance(60_000);
        assert_eq!(rec.failures(), 0);
    }

    #[test]
    fn test_root_rm_rf_runs_sequence_to_failure() {
        let (mut t, rec) = term();
        run(&mut t, "sudo su");
        let before = t.vfs().snapshot();
        let start = t.transcript().len();
        assert_eq!(t.submit("rm -rf /"), Outcome::Done);
        assert_eq!(t.wipe_phase(), Phase::Narrating(0));
        assert!(t.session_snapshot().is_processing);
        assert_eq!(t.mode(), Mode::Wiping);

        t.advance(13_900);
        assert_eq!(t.wipe_phase(), Phase::Deleting(0));
        assert_eq!(t.transcript().len(), start + 1 + 16);

        assert_eq!(t.submit("ls"), Outcome::Ignored);
        t.advance(50 * 30);
        assert_eq!(t.wipe_phase(), Phase::Deleting(50));
        assert_eq!(rec.failures(), 0);
        t.advance(30);
        assert_eq!(t.wipe_phase(), Phase::Failed);
        assert_eq!(rec.failures(), 1);
        assert!(rec
            .events()
            .contains(&Event::Failure(FailureDetail { os: "Linux".into() })));

        let deleting = t
            .transcript()
            .iter()
            .filter(|l| l.text.starts_with("DELETING: /usr/lib/"))
            .count();
        assert_eq!(deleting, 51);
        assert!(Rc::ptr_eq(&before, &t.vfs().snapshot()));

        let len = t.transcript().len();
        assert_eq!(t.submit("whoami"), Outcome::Ignored);
        t.advance(60_000);
        assert_eq!(t.transcript().len(), len);
        assert_eq!(rec.failures(), 1);
        assert_eq!(t.mode(), Mode::Failed);
        assert_eq!(t.next_deadline(), None);
    }

    #[test]
    fn test_sudo_unlocks_sequence_for_guest() {
        let (mut t, _) = term();
        run(&mut t, "sudo rm -rf /");
        assert_eq!(t.wipe_phase(), Phase::Narrating(0));
        assert_eq!(t.session().user, User::Guest);
    }

    #[test]
    fn test_sudo_forms() {
        let (mut t, _) = term();
        assert_eq!(
            run(&mut t, "sudo").pop(),
            Some(Line::info("usage: sudo <command>"))
        );
        assert_eq!(last_text(&mut t, "sudo whoami"), "root");
        assert_eq!(last_text(&mut t, "whoami"), "guest");
        assert_eq!(last_text(&mut t, "sudo su"), "Switched to user root.");
        assert_eq!(t.prompt(), "root@bahroze:root#");
        assert_eq!(t.session().cwd(), ["home", "root"]);
        run(&mut t, "cd ~");
        assert_eq!(t.session().cwd(), ["home", "root"]);
    }

    #[test]
    fn test_decrypt() {
        let (mut t, rec) = term();
        for _ in 0..3 {
            assert_eq!(
                last_text(&mut t, "decrypt transmission_404.dat WRONG"),
                "DECRYPTION FAILED: Invalid Key or File"
            );
        }
        let lines = run(&mut t, "decrypt transmission_404.dat PROTOCOL_OMEGA");
        assert_eq!(lines[1], Line::success("DECRYPTION SUCCESSFUL..."));
        assert!(lines
            .iter()
            .any(|l| l.kind == LineKind::Secret && l.text.contains("reveal_secrets")));
        assert_eq!(
            last_text(&mut t, "decrypt other.dat PROTOCOL_OMEGA"),
            "DECRYPTION FAILED: Invalid Key or File"
        );
        assert_eq!(last_text(&mut t, "decrypt x"), "usage: decrypt <file> <key>");
        assert!(rec.events().contains(&Event::Cue(Cue::Error)));
        assert!(rec.events().contains(&Event::Cue(Cue::Achievement)));
    }

    #[test]
    fn test_reveal_secrets() {
        let (mut t, rec) = term();
        let lines = run(&mut t, "reveal_secrets");
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[1].kind, LineKind::Secret);
        assert!(rec
            .events()
            .contains(&Event::Achievement(Achievement::InspectorGadget)));
    }

    #[test]
    fn test_unknown_verb() {
        let (mut t, _) = term();
        let lines = run(&mut t, "frobnicate --now");
        assert_eq!(lines[1], Line::error("Command not found: frobnicate"));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_clear_and_reboot() {
        let (mut t, rec) = term();
        run(&mut t, "clear");
        assert!(t.transcript().is_empty());
        run(&mut t, "cls");
        assert!(t.transcript().is_empty());
        run(&mut t, "reboot");
        assert!(rec.events().contains(&Event::Reboot));
    }

    #[test]
    fn test_transcript_is_bounded() {
        let (mut t, _) = term();
        for i in 0..120 {
            run(&mut t, &format!("echo {}", i));
        }
        assert_eq!(t.transcript().len(), 100);
        assert_eq!(t.transcript().last(), Some(&Line::output("119")));
        assert_eq!(t.session().history.len(), 120);
    }

    #[test]
    fn test_cat_is_repeatable() {
        let (mut t, _) = term();
        let a = last_text(&mut t, "cat contact.info");
        let b = last_text(&mut t, "cat contact.info");
        assert_eq!(a, b);
        assert!(a.starts_with("EMAIL: "));
        assert_eq!(last_text(&mut t, "cat projects"), "cat: projects: No such file");
        assert_eq!(last_text(&mut t, "cat"), "usage: cat <filename>");
    }

    #[test]
    fn test_editor_round_trip() {
        let (mut t, _) = term();
        run(&mut t, "touch notes.txt");
        run(&mut t, "nano notes.txt");
        assert_eq!(t.mode(), Mode::Editor);
        let editor = t.editor_mut().unwrap();
        editor.set_text("first line\nsecond line");
        t.save_editor().unwrap();
        t.exit_editor();
        assert_eq!(
            t.transcript().last(),
            Some(&Line::new(LineKind::System, "Closed editor for 'notes.txt'"))
        );
        assert_eq!(last_text(&mut t, "cat notes.txt"), "first line\nsecond line");
    }

    #[test]
    fn test_editor_is_modal() {
        let (mut t, _) = term();
        run(&mut t, "vim draft.md");
        assert_eq!(t.submit("ls"), Outcome::Ignored);
        assert_eq!(t.editor_snapshot().unwrap().text, "");
        t.editor_mut().unwrap().insert_str("unsaved");
        t.exit_editor();
        assert_eq!(t.mode(), Mode::Shell);
        assert_eq!(
            last_text(&mut t, "cat draft.md"),
            "cat: draft.md: No such file"
        );
    }

    #[test]
    fn test_editor_seeds_existing_content() {
        let (mut t, _) = term();
        run(&mut t, "nano todo.txt");
        let text = t.editor().unwrap().text();
        assert!(text.ends_with("- [ ] Hide the treasure map"));
        t.exit_editor();
        assert_eq!(last_text(&mut t, "nano projects"), "nano: projects is a directory");
        assert_eq!(last_text(&mut t, "nano"), "usage: nano <filename>");
        assert_eq!(t.mode(), Mode::Shell);
    }

    #[test]
    fn test_save_notice_clears() {
        let (mut t, _) = term();
        run(&mut t, "nano a.txt");
        t.editor_mut().unwrap().insert_str("x");
        t.save_editor().unwrap();
        assert_eq!(t.editor().unwrap().notice(), Some(SAVED_NOTICE));
        assert!(!t.editor().unwrap().is_dirty());
        t.advance(1_999);
        assert_eq!(t.editor().unwrap().notice(), Some(SAVED_NOTICE));
        t.advance(1);
        assert_eq!(t.editor().unwrap().notice(), None);
        assert_eq!(t.editor().unwrap().status(), "Modified");
    }

    #[test]
    fn test_failed_save_notice_persists() {
        let (mut t, _) = term();
        run(&mut t, "nano /nope/a.txt");
        assert!(t.save_editor().is_err());
        t.advance(10_000);
        assert_eq!(t.editor().unwrap().notice(), Some(SAVE_FAILED_NOTICE));
    }

    #[test]
    fn test_ai_delegation() {
        let (mut t, _) = term();
        assert_eq!(last_text(&mut t, "ai"), "usage: ai <prompt>");
        assert_eq!(
            t.submit("ai who is   bahroze"),
            Outcome::Delegate("who is bahroze".into())
        );
        assert!(t.session_snapshot().is_processing);
        assert_eq!(t.submit("ls"), Outcome::Ignored);
        t.resolve_delegation(Ok("A full stack engineer.".into()));
        assert_eq!(
            t.transcript().last(),
            Some(&Line::success("AI: A full stack engineer."))
        );
        assert!(!t.is_processing());

        t.submit("ai hello");
        t.resolve_delegation(Err(ShellError::Delegation("timeout".into())));
        assert_eq!(
            t.transcript().last(),
            Some(&Line::error("Error connecting to AI subsystem."))
        );
        assert_eq!(t.mode(), Mode::Shell);
    }

    #[test]
    fn test_stray_delegation_is_ignored() {
        let (mut t, _) = term();
        let len = t.transcript().len();
        t.resolve_delegation(Ok("late".into()));
        assert_eq!(t.transcript().len(), len);
    }

    #[test]
    fn test_complete_uses_cwd() {
        let (mut t, _) = term();
        assert_eq!(t.complete("cd pro"), "cd projects/");
        assert_eq!(t.complete("ca"), "cat ");
        run(&mut t, "cd /");
        assert_eq!(t.complete("cd v"), "cd var/");
    }

    #[test]
    fn test_help_and_date() {
        let (mut t, _) = term();
        let help = run(&mut t, "help").pop().unwrap();
        assert_eq!(help.kind, LineKind::Info);
        assert!(help.text.contains("decrypt <f> <k>"));
        assert!(!last_text(&mut t, "date").is_empty());
    }
}
