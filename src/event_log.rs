/// Append-only record of human-readable game events.
///
/// Every line is also sent to the `log` facade so a host with a logger
/// installed sees the same stream.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    messages: Vec<String>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog::default()
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
