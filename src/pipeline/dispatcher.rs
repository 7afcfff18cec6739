use std::{
    io::Write,
    process::{Command, Stdio},
};

use serde::{Deserialize, Serialize};

use crate::{error::DispatchError, types::GestureAction};

/// Keys the injector can tap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Key {
    Right,
    Left,
    Home,
    End,
}

impl Key {
    pub fn name(&self) -> &'static str {
        match self {
            Key::Right => "Right",
            Key::Left => "Left",
            Key::Home => "Home",
            Key::End => "End",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub next: Key,
    pub prev: Key,
    pub home: Key,
    pub end: Key,
}

impl KeyBindings {
    pub fn key_for(&self, action: GestureAction) -> Key {
        match action {
            GestureAction::Next => self.next,
            GestureAction::Prev => self.prev,
            GestureAction::Home => self.home,
            GestureAction::End => self.end,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            next: Key::Right,
            prev: Key::Left,
            home: Key::Home,
            end: Key::End,
        }
    }
}

/// One discrete simulated key click.
pub trait KeyInjector: Send + 'static {
    fn tap(&mut self, key: Key) -> Result<(), DispatchError>;
}

impl<I: KeyInjector + ?Sized> KeyInjector for Box<I> {
    fn tap(&mut self, key: Key) -> Result<(), DispatchError> {
        (**self).tap(key)
    }
}

/// Maps fired actions to keys and taps each exactly once. Errors are
/// returned as-is; nothing is retried.
pub struct ActionDispatcher<I: KeyInjector> {
    bindings: KeyBindings,
    injector: I,
}

impl<I: KeyInjector> ActionDispatcher<I> {
    pub fn new(bindings: KeyBindings, injector: I) -> Self {
        Self { bindings, injector }
    }

    pub fn dispatch(&mut self, action: GestureAction) -> Result<Key, DispatchError> {
        let key = self.bindings.key_for(action);
        self.injector.tap(key)?;
        Ok(key)
    }

    pub fn injector(&self) -> &I {
        &self.injector
    }

    pub fn into_injector(self) -> I {
        self.injector
    }
}

/// Writes one key name per line, for piping into an external injector or
/// for dry runs.
pub struct LineKeyInjector<W: Write + Send + 'static> {
    out: W,
}

impl<W: Write + Send + 'static> LineKeyInjector<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + 'static> KeyInjector for LineKeyInjector<W> {
    fn tap(&mut self, key: Key) -> Result<(), DispatchError> {
        writeln!(self.out, "{}", key.name())?;
        self.out.flush()?;
        Ok(())
    }
}

/// Runs `program args... <key>` per tap and waits for it, e.g.
/// `xdotool key Right`.
#[derive(Clone, Debug)]
pub struct CommandKeyInjector {
    program: String,
    args: Vec<String>,
}

impl CommandKeyInjector {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// First word is the program, the rest are leading args.
    pub fn from_command_line(words: &[String]) -> Option<Self> {
        let (program, args) = words.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl KeyInjector for CommandKeyInjector {
    fn tap(&mut self, key: Key) -> Result<(), DispatchError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(key.name())
            .stdin(Stdio::null())
            .status()
            .map_err(|source| DispatchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DispatchError::Status {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}
