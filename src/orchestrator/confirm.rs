use std::collections::BTreeSet;
use std::io::{stdin, stdout, Write};

/// Asks the operator whether replacing the running set is intended.
pub trait Confirm: Send + Sync {
    fn confirm(&self, current: &BTreeSet<String>, requested: &BTreeSet<String>) -> bool;
}

/// Prompts on the terminal; declines when there is no terminal to ask.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, current: &BTreeSet<String>, requested: &BTreeSet<String>) -> bool {
        if !is_interactive() {
            tracing::warn!(
                "Not replacing running services without confirmation; use --force or `add`"
            );
            return false;
        }
        prompt_user(current, requested)
    }
}

/// Always answers yes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _current: &BTreeSet<String>, _requested: &BTreeSet<String>) -> bool {
        true
    }
}

/// Always answers no.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, _current: &BTreeSet<String>, _requested: &BTreeSet<String>) -> bool {
        false
    }
}

/// Check if running in interactive TTY
pub fn is_interactive() -> bool {
    use std::io::IsTerminal;
    if std::env::var_os("DEVSTACK_NON_INTERACTIVE").is_some() {
        return false;
    }
    // Cargo test binaries run from target/*/deps/
    if let Ok(exe) = std::env::current_exe() {
        if let Some(path) = exe.to_str() {
            if path.contains("/deps/") || path.contains("\\deps\\") {
                return false;
            }
        }
    }
    stdin().is_terminal() && stdout().is_terminal()
}

fn join(names: &BTreeSet<String>) -> String {
    names.iter().cloned().collect::<Vec<_>>().join(", ")
}

fn prompt_user(current: &BTreeSet<String>, requested: &BTreeSet<String>) -> bool {
    println!();
    println!("⚠️  Services already running: {}", join(current));
    println!("   Requested: {}", join(requested));
    println!();
    println!("Running services that are not requested will be stopped.");
    println!("Use `add` to keep them running instead.");
    println!();
    print!("Replace the running services? [y/N] ");
    stdout().flush().ok();

    loop {
        use crossterm::event::{read, Event, KeyCode, KeyEvent};

        match read() {
            Ok(Event::Key(KeyEvent { code, .. })) => match code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    println!("y");
                    return true;
                }
                KeyCode::Char('n')
                | KeyCode::Char('N')
                | KeyCode::Char('q')
                | KeyCode::Enter
                | KeyCode::Esc => {
                    println!("n");
                    return false;
                }
                _ => {}
            },
            Ok(_) => {}
            Err(_) => return false,
        }
    }
}
