//! Per-run progress output
//!
//! Each staging run owns its own log sink instead of writing through global
//! state, so output is attributable and tests can capture it. Progress
//! lines precede every externally visible step: a failure's log position
//! tells the operator exactly which buildpack and step failed.

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Write sink for one staging run's operator-facing output
#[derive(Clone)]
pub struct StageLog {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl StageLog {
    /// Log to the given writer
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
        }
    }

    /// Log to standard output
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Emit a major step line ("=====> ...")
    pub fn step(&self, message: &str) {
        self.write_line(&format!("=====> {}", message));
    }

    /// Emit a minor step line ("-----> ...")
    pub fn substep(&self, message: &str) {
        self.write_line(&format!("-----> {}", message));
    }

    /// Forward captured tool output verbatim
    pub fn output(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        let mut sink = self.sink.lock().unwrap();
        let _ = sink.write_all(text.as_bytes());
        if !text.ends_with('\n') {
            let _ = sink.write_all(b"\n");
        }
        let _ = sink.flush();
    }

    /// Emit a warning line
    pub fn warning(&self, message: &str) {
        self.write_line(&format!("WARNING: {}", message));
    }

    fn write_line(&self, line: &str) {
        let mut sink = self.sink.lock().unwrap();
        let _ = writeln!(sink, "{}", line);
        let _ = sink.flush();
    }
}


#[cfg(test)]
mod tests {
    use super::capture::capturing_log;

    #[test]
    fn step_lines_are_prefixed() {
        let (log, captured) = capturing_log();

        log.step("Running compile for buildpack ruby-buildpack...");
        log.substep("Downloading buildpack...");

        let out = captured.contents();
        assert!(out.contains("=====> Running compile for buildpack ruby-buildpack..."));
        assert!(out.contains("-----> Downloading buildpack..."));
    }

    #[test]
    fn output_is_forwarded_verbatim_with_trailing_newline() {
        let (log, captured) = capturing_log();

        log.output("tool output without newline");
        log.output("");

        assert_eq!(captured.contents(), "tool output without newline\n");
    }
}
