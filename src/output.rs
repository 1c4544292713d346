/// Abstraction over user-facing output.
///
/// Command modules use this trait instead of `println!`/`eprintln!` so that
/// tests can capture what a command prints and diagnostics stay on the
/// `tracing` side.
pub trait UserOutput: Send + Sync {
    /// Informational status message (e.g., "Starting: grafana, redis")
    fn status(&self, message: &str);

    /// Success message (e.g., "Services started")
    fn success(&self, message: &str);

    /// Warning message (e.g., "Dashboard update failed")
    fn warning(&self, message: &str);

    /// Section heading (e.g., "INFRA")
    fn heading(&self, title: &str);

    /// Indented list entry
    fn item(&self, line: &str);

    /// A blank line separator.
    fn blank(&self);
}

/// Standard CLI output: stdout/stderr with ANSI colors.
pub struct CliOutput;

impl UserOutput for CliOutput {
    fn status(&self, message: &str) {
        println!("\x1b[34mℹ\x1b[0m {}", message);
    }

    fn success(&self, message: &str) {
        println!("\x1b[32m✓\x1b[0m {}", message);
    }

    fn warning(&self, message: &str) {
        eprintln!("\x1b[33m⚠\x1b[0m {}", message);
    }

    fn heading(&self, title: &str) {
        println!("\x1b[1m{}\x1b[0m", title);
    }

    fn item(&self, line: &str) {
        println!("  {}", line);
    }

    fn blank(&self) {
        println!();
    }
}

/// Collects every line, unstyled.
#[cfg(test)]
#[derive(Default)]
pub struct CapturedOutput {
    lines: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }

    fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

#[cfg(test)]
impl UserOutput for CapturedOutput {
    fn status(&self, message: &str) {
        self.push(message.to_string());
    }

    fn success(&self, message: &str) {
        self.push(message.to_string());
    }

    fn warning(&self, message: &str) {
        self.push(format!("warning: {}", message));
    }

    fn heading(&self, title: &str) {
        self.push(title.to_string());
    }

    fn item(&self, line: &str) {
        self.push(format!("  {}", line));
    }

    fn blank(&self) {
        self.push(String::new());
    }
}
