use indexmap::IndexMap;
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Best-effort structured log entry; never alters resolution outcomes.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub event_type: String,
    pub level: LogLevel,
    pub message: String,
    pub data: IndexMap<String, String>,
}

#[derive(Debug, Default)]
pub struct Log {
    entries: Vec<LogEntry>,
}

impl Log {
    pub fn info(&mut self, event_type: &str, message: impl Into<String>) {
        self.push(event_type, LogLevel::Info, message.into(), IndexMap::default());
    }

    pub fn info_with(
        &mut self,
        event_type: &str,
        message: impl Into<String>,
        data: IndexMap<String, String>,
    ) {
        self.push(event_type, LogLevel::Info, message.into(), data);
    }

    pub fn warn(&mut self, event_type: &str, message: impl Into<String>) {
        self.push(event_type, LogLevel::Warn, message.into(), IndexMap::default());
    }

    fn push(&mut self, event_type: &str, level: LogLevel, message: String, data: IndexMap<String, String>) {
        match level {
            LogLevel::Info => event!(Level::INFO, event_type, %message),
            LogLevel::Warn => event!(Level::WARN, event_type, %message),
            LogLevel::Error => event!(Level::ERROR, event_type, %message),
        }
        self.entries.push(LogEntry {
            event_type: event_type.to_string(),
            level,
            message,
            data,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn contains(&self, event_type: &str) -> bool {
        self.entries.iter().any(|entry| entry.event_type == event_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_entries_in_order() {
        let mut log = Log::default();
        log.info("StealResolved", "card moved");
        log.warn("DrawPileExhausted", "no card to reveal");

        assert_eq!(log.entries().len(), 2);
        assert!(log.contains("StealResolved"));
        assert!(log.contains("DrawPileExhausted"));
        assert!(!log.contains("Missing"));
        assert_eq!(log.entries()[1].level, LogLevel::Warn);
    }
}
