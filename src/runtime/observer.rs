//! Observers notified while a program runs

use std::io;

use crate::runtime::Value;

/// Receives interpreter events
///
/// `on_print` and `on_assign` only fire for effects that take hold, so nothing
/// is reported from the body of a conditional whose guard was false.
pub trait EventSink {
    /// A `PRINT` statement emitted `message`
    fn on_print(&mut self, message: &Value);

    /// `identifier` was bound to `value`
    fn on_assign(&mut self, _identifier: &str, _value: &Value) {}

    /// A conditional guard evaluated to `met`
    fn on_condition(&mut self, _met: bool) {}
}

impl<K: EventSink + ?Sized> EventSink for &mut K {
    fn on_print(&mut self, message: &Value) {
        (**self).on_print(message)
    }

    fn on_assign(&mut self, identifier: &str, value: &Value) {
        (**self).on_assign(identifier, value)
    }

    fn on_condition(&mut self, met: bool) {
        (**self).on_condition(met)
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn on_print(&mut self, _message: &Value) {}
}

/// Forwards events to `tracing` at info level under `dfascript::trace`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_print(&mut self, message: &Value) {
        tracing::info!(target: "dfascript::trace", %message, "output");
    }

    fn on_assign(&mut self, identifier: &str, value: &Value) {
        tracing::info!(target: "dfascript::trace", identifier, %value, "computation performed");
    }

    fn on_condition(&mut self, met: bool) {
        tracing::info!(target: "dfascript::trace", met, "condition");
    }
}

/// Writes a human-readable trace of events
///
/// ```text
/// condition met, output (hello)
/// computation performed (x = 11.00)
/// condition not met
/// ```
///
/// Numbers are written with two decimals. The first write failure is kept and
/// later events are dropped.
#[derive(Debug)]
pub struct WriterSink<W: io::Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: io::Write> WriterSink<W> {
    pub fn new(out: W) -> Self {
        WriterSink { out, error: None }
    }

    /// First write failure, if any
    pub fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.out.write_all(text.as_bytes()) {
            self.error = Some(err);
        }
    }
}

fn two_decimals(value: &Value) -> String {
    match value {
        Value::Number(n) => format!("{:.2}", n),
        other => other.to_string(),
    }
}

impl<W: io::Write> EventSink for WriterSink<W> {
    fn on_print(&mut self, message: &Value) {
        let line = format!("output ({})\n", two_decimals(message));
        self.write(&line);
    }

    fn on_assign(&mut self, identifier: &str, value: &Value) {
        let line = format!("computation performed ({} = {})\n", identifier, two_decimals(value));
        self.write(&line);
    }

    fn on_condition(&mut self, met: bool) {
        self.write(if met { "condition met, " } else { "condition not met\n" });
    }
}

/// Collects every event, for tests and embedding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSink {
    pub prints: Vec<Value>,
    pub assignments: Vec<(String, Value)>,
    pub conditions: Vec<bool>,
}

impl EventSink for RecordingSink {
    fn on_print(&mut self, message: &Value) {
        self.prints.push(message.clone());
    }

    fn on_assign(&mut self, identifier: &str, value: &Value) {
        self.assignments.push((identifier.to_string(), value.clone()));
    }

    fn on_condition(&mut self, met: bool) {
        self.conditions.push(met);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_sink_format() {
        let mut sink = WriterSink::new(Vec::new());
        sink.on_condition(true);
        sink.on_print(&Value::from("hi"));
        sink.on_assign("x", &Value::Number(11.0));
        sink.on_condition(false);

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "condition met, output (hi)\ncomputation performed (x = 11.00)\ncondition not met\n"
        );
    }

    #[test]
    fn test_recording_sink_through_reference() {
        fn feed<K: EventSink>(mut sink: K) {
            sink.on_print(&Value::Number(1.0));
            sink.on_condition(false);
        }

        let mut recorder = RecordingSink::default();
        feed(&mut recorder);
        assert_eq!(recorder.prints, vec![Value::Number(1.0)]);
        assert_eq!(recorder.conditions, vec![false]);
    }
}
