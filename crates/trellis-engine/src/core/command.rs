use crate::input::InputEvent;

/// Loop-level request raised by app callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Convert and stage a channel write.
    Input(InputEvent),
    Start,
    Stop,
    Pause,
    /// Pause and cancel scheduling until resumed.
    Halt,
    Resume,
    TogglePause,
    /// Stop the loop and close the runtime.
    Exit,
}

/// Command buffer passed to the app.
///
/// Commands are buffered and applied after the current callback returns; commands raised
/// during a tick are applied before the loop decides whether to schedule the next one.
#[derive(Debug, Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    pub fn push(&mut self, command: Command) {
        self.queue.push(command);
    }

    pub fn input(&mut self, event: InputEvent) {
        self.push(Command::Input(event));
    }

    pub fn start(&mut self) {
        self.push(Command::Start);
    }

    pub fn stop(&mut self) {
        self.push(Command::Stop);
    }

    pub fn pause(&mut self) {
        self.push(Command::Pause);
    }

    pub fn halt(&mut self) {
        self.push(Command::Halt);
    }

    pub fn resume(&mut self) {
        self.push(Command::Resume);
    }

    pub fn toggle_pause(&mut self) {
        self.push(Command::TogglePause);
    }

    pub fn exit(&mut self) {
        self.push(Command::Exit);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queue)
    }
}
