use crate::{
    collab::{Achievement, AudioCue, Cue, FailureDetail, HostOs, Notifier},
    config::ShellConfig,
    console,
    error::{Result, ShellError},
    nano::EditorBuffer,
    terminal::{Mode, Outcome, Terminal},
};
use js_sys::{Function, Promise, Reflect};
use log::{info, warn, LevelFilter};
use serde::Serialize;
use serde_json::json;
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{CustomEvent, CustomEventInit};

/// Fires `name` on `window` with `detail` as a JSON-shaped payload.
fn dispatch(name: &str, detail: &impl Serialize) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let init = CustomEventInit::new();
    if let Ok(payload) = serde_json::to_string(detail) {
        if let Ok(value) = js_sys::JSON::parse(&payload) {
            init.set_detail(&value);
        }
    }
    match CustomEvent::new_with_event_init_dict(name, &init) {
        Ok(event) => {
            let _ = window.dispatch_event(&event);
        }
        Err(e) => warn!("could not build {} event: {:?}", name, e),
    }
}

/// Page-side collaborator: everything becomes a `shell:*` event on `window`.
struct PageEvents;

impl Notifier for PageEvents {
    fn emit_achievement(&mut self, id: Achievement) {
        dispatch("shell:achievement", &json!({ "id": id.id() }));
    }

    fn emit_system_failure(&mut self, detail: FailureDetail) {
        dispatch("shell:failure", &detail);
    }

    fn request_reboot(&mut self) {
        dispatch("shell:reboot", &json!({}));
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().reload() {
                warn!("reload failed: {:?}", e);
            }
        }
    }
}

impl AudioCue for PageEvents {
    fn play(&mut self, cue: Cue) {
        dispatch("shell:audio", &json!({ "cue": cue }));
    }
}

fn user_agent() -> Option<String> {
    web_sys::window()?.navigator().user_agent().ok()
}

fn js_error(e: JsValue) -> ShellError {
    ShellError::Delegation(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// Hands the prompt to `window.sendPrompt` and waits for its answer.
async fn ask_backend(prompt: String) -> Result<String> {
    let window = web_sys::window().ok_or_else(|| ShellError::Delegation("no window".into()))?;
    let send = Reflect::get(&window, &JsValue::from_str("sendPrompt"))
        .map_err(js_error)?
        .dyn_into::<Function>()
        .map_err(|_| ShellError::Delegation("sendPrompt is not a function".into()))?;
    let pending = send
        .call1(&JsValue::NULL, &JsValue::from_str(&prompt))
        .map_err(js_error)?;
    let reply = JsFuture::from(Promise::resolve(&pending))
        .await
        .map_err(js_error)?;
    reply
        .as_string()
        .ok_or_else(|| ShellError::Delegation("reply is not a string".into()))
}

fn to_json(value: &impl Serialize) -> std::result::Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub struct System {
    terminal: Rc<RefCell<Terminal>>,
    pending_prompt: Option<String>,
}

impl System {
    fn with_editor(&self, edit: impl FnOnce(&mut EditorBuffer)) {
        if let Some(editor) = self.terminal.borrow_mut().editor_mut() {
            edit(editor);
        }
    }
}

#[wasm_bindgen]
impl System {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> std::result::Result<System, JsValue> {
        console::init(LevelFilter::Info);
        let mut config = match config_json {
            Some(json) => {
                ShellConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => ShellConfig::default(),
        };
        if config.rng_seed.is_none() {
            config.rng_seed = Some((js_sys::Math::random() * u32::MAX as f64) as u64);
        }
        let os = HostOs::from_user_agent(user_agent().as_deref());
        info!("terminal up on {}", os);
        let terminal = Terminal::new(config, os, Box::new(PageEvents), Box::new(PageEvents));
        Ok(System {
            terminal: Rc::new(RefCell::new(terminal)),
            pending_prompt: None,
        })
    }

    #[wasm_bindgen]
    pub fn prompt(&self) -> String {
        self.terminal.borrow().prompt()
    }

    /// Runs a line. Returns `true` when an `ai` question is waiting for
    /// `exec_ai`.
    #[wasm_bindgen]
    pub fn exec(&mut self, line: &str) -> bool {
        let outcome = self.terminal.borrow_mut().submit(line);
        match outcome {
            Outcome::Delegate(prompt) => {
                self.pending_prompt = Some(prompt);
                true
            }
            Outcome::Done | Outcome::Ignored => false,
        }
    }

    /// Sends the waiting `ai` question. The promise settles once the answer
    /// (or the failure line) is in the transcript.
    #[wasm_bindgen]
    pub fn exec_ai(&mut self) -> Promise {
        let prompt = self.pending_prompt.take();
        let terminal = Rc::clone(&self.terminal);
        future_to_promise(async move {
            if let Some(prompt) = prompt {
                let reply = ask_backend(prompt).await;
                terminal.borrow_mut().resolve_delegation(reply);
            }
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen]
    pub fn complete(&self, input: &str) -> String {
        self.terminal.borrow().complete(input)
    }

    #[wasm_bindgen]
    pub fn history_prev(&mut self) -> Option<String> {
        self.terminal.borrow_mut().history_prev()
    }

    #[wasm_bindgen]
    pub fn history_next(&mut self) -> Option<String> {
        self.terminal.borrow_mut().history_next()
    }

    #[wasm_bindgen]
    pub fn advance(&mut self, ms: u32) {
        self.terminal.borrow_mut().advance(u64::from(ms));
    }

    /// Milliseconds until the next timer; `undefined` when nothing is queued.
    #[wasm_bindgen]
    pub fn next_deadline(&self) -> Option<u32> {
        self.terminal
            .borrow()
            .next_deadline()
            .map(|ms| u32::try_from(ms).unwrap_or(u32::MAX))
    }

    #[wasm_bindgen]
    pub fn mode(&self) -> String {
        let mode = match self.terminal.borrow().mode() {
            Mode::Shell => "shell",
            Mode::Editor => "editor",
            Mode::AwaitingReply => "awaiting",
            Mode::Wiping => "wiping",
            Mode::Failed => "failed",
        };
        mode.to_string()
    }

    #[wasm_bindgen]
    pub fn transcript_json(&self) -> std::result::Result<String, JsValue> {
        to_json(&self.terminal.borrow().transcript().to_vec())
    }

    #[wasm_bindgen]
    pub fn session_json(&self) -> std::result::Result<String, JsValue> {
        to_json(&self.terminal.borrow().session_snapshot())
    }

    /// `null` while no file is open.
    #[wasm_bindgen]
    pub fn editor_json(&self) -> std::result::Result<String, JsValue> {
        to_json(&self.terminal.borrow().editor_snapshot())
    }

    #[wasm_bindgen]
    pub fn editor_set_text(&mut self, text: &str) {
        self.with_editor(|e| e.set_text(text));
    }

    #[wasm_bindgen]
    pub fn editor_insert(&mut self, text: &str) {
        self.with_editor(|e| e.insert_str(text));
    }

    /// `up`, `down`, `left`, `right`, `home` or `end`.
    #[wasm_bindgen]
    pub fn editor_move(&mut self, direction: &str) {
        self.with_editor(|e| match direction {
            "up" => e.cursor_up(),
            "down" => e.cursor_down(),
            "left" => e.cursor_left(),
            "right" => e.cursor_right(),
            "home" => e.cursor_home(),
            "end" => e.cursor_end(),
            other => warn!("unknown cursor move {}", other),
        });
    }

    #[wasm_bindgen]
    pub fn editor_backspace(&mut self) {
        self.with_editor(EditorBuffer::backspace);
    }

    #[wasm_bindgen]
    pub fn editor_delete(&mut self) {
        self.with_editor(EditorBuffer::delete);
    }

    #[wasm_bindgen]
    pub fn editor_cut_line(&mut self) {
        self.with_editor(EditorBuffer::cut_line);
    }

    #[wasm_bindgen]
    pub fn editor_paste(&mut self) {
        self.with_editor(EditorBuffer::paste);
    }

    /// `false` when the write was refused; the editor shows the error notice.
    #[wasm_bindgen]
    pub fn editor_save(&mut self) -> bool {
        self.terminal.borrow_mut().save_editor().is_ok()
    }

    #[wasm_bindgen]
    pub fn editor_exit(&mut self) {
        self.terminal.borrow_mut().exit_editor();
    }
}
