//! Hidden command console opened with `/`.

use log::debug;

use crate::config::{ConsoleConfig, LinkCommand};

const HELP: &str = "Available commands: help, clear, hello, skills, secret, exit";
const HELLO: &str = "Hey there! Nice to meet a curious explorer 👋";
const SKILLS: &str = "Figma, React, TypeScript, Next.js, Tailwind, AI/ML workflows";
const SECRET: &str = "🎉 You found a secret! Here's a cookie: 🍪";

/// Keys the console reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleKey {
    Char(char),
    Backspace,
    Enter,
    Escape,
}

/// Side effect requested by a command, carried out by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleAction {
    OpenLink(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub command: String,
    pub output: String,
}

/// Custom handler consulted before the built-in commands.
pub type CommandHook = Box<dyn FnMut(&str) -> Option<String>>;

#[derive(Default)]
pub struct Console {
    active: bool,
    input: String,
    history: Vec<HistoryEntry>,
    links: Vec<LinkCommand>,
    hook: Option<CommandHook>,
}

impl Console {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self { links: config.links.clone(), ..Self::default() }
    }

    pub fn with_hook(mut self, hook: CommandHook) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Ghost text for a link command matching the current input.
    pub fn hint(&self) -> Option<&str> {
        let typed = self.input.to_lowercase();
        self.links.iter().find(|link| link.command == typed).map(|link| link.hint.as_str())
    }

    /// Feeds a key press. Returns whether the console consumed it, along with
    /// any action the submitted command requested.
    pub fn handle_key(&mut self, key: ConsoleKey) -> (bool, Option<ConsoleAction>) {
        if !self.active {
            if key == ConsoleKey::Char('/') {
                self.active = true;
                return (true, None);
            }
            return (false, None);
        }

        match key {
            ConsoleKey::Escape => self.close(),
            ConsoleKey::Char(ch) => self.input.push(ch),
            ConsoleKey::Backspace => {
                self.input.pop();
            },
            ConsoleKey::Enter => return (true, self.submit()),
        }
        (true, None)
    }

    /// Runs the current input as a command.
    pub fn submit(&mut self) -> Option<ConsoleAction> {
        if self.input.trim().is_empty() {
            return None;
        }

        let raw = std::mem::take(&mut self.input);
        let command = raw.trim().to_lowercase();
        let (output, action) = self.execute(&command, &raw);
        debug!("console command {command:?} -> {output:?}");

        if !output.is_empty() || command != "clear" {
            self.history.push(HistoryEntry { command: raw, output });
        }
        action
    }

    fn execute(&mut self, command: &str, raw: &str) -> (String, Option<ConsoleAction>) {
        if let Some(hook) = self.hook.as_mut() {
            if let Some(output) = hook(command) {
                return (output, None);
            }
        }

        if let Some(link) = self.links.iter().find(|link| link.command == command) {
            return (String::new(), Some(ConsoleAction::OpenLink(link.url.clone())));
        }

        let output = match command {
            "help" => HELP.to_owned(),
            "clear" => {
                self.history.clear();
                String::new()
            },
            "hello" => HELLO.to_owned(),
            "skills" => SKILLS.to_owned(),
            "secret" => SECRET.to_owned(),
            "exit" | "quit" | "q" => {
                self.close();
                String::new()
            },
            _ => format!("Command not found: {raw}. Type 'help' for available commands."),
        };
        (output, None)
    }

    fn close(&mut self) {
        self.active = false;
        self.input.clear();
    }
}
