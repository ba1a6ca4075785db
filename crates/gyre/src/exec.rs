//! Shell-level action executor. Processes are spawned detached with their
//! stdio silenced; success means the process started, not that it did
//! anything useful.

use gyre_core::lifecycle::{ActionExecutor, ExecutionError};
use gyre_core::menu::ActionDescriptor;
use std::process::{Command, Stdio};

pub struct ShellExecutor;

impl ActionExecutor for ShellExecutor {
    fn execute(&self, action: &ActionDescriptor) -> Result<(), ExecutionError> {
        match action {
            ActionDescriptor::Launch { path } => spawn("xdg-open", &[path.as_str()]),
            ActionDescriptor::Run { command } => {
                // validate before handing to the shell
                shell_words::split(command)
                    .map_err(|e| ExecutionError::BadCommand(e.to_string()))?;
                spawn("sh", &["-c", command])
            }
            ActionDescriptor::Shortcut { chord } => {
                let args = wtype_args(chord)?;
                let refs: Vec<&str> = args.iter().map(String::as_str).collect();
                spawn("wtype", &refs)
            }
            ActionDescriptor::Activate { .. }
            | ActionDescriptor::TaskSwitcher
            | ActionDescriptor::Internal { .. } => {
                Err(ExecutionError::Unsupported(action.kind()))
            }
        }
    }
}

fn spawn(program: &str, args: &[&str]) -> Result<(), ExecutionError> {
    Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|e| ExecutionError::Spawn {
            command: program.to_string(),
            reason: e.to_string(),
        })
}

/// Turn a `mod+mod+key` chord into wtype arguments: press each modifier,
/// tap the key, release the modifiers in reverse.
fn wtype_args(chord: &str) -> Result<Vec<String>, ExecutionError> {
    let parts: Vec<&str> = chord.split('+').map(str::trim).filter(|p| !p.is_empty()).collect();
    let Some((key, modifiers)) = parts.split_last() else {
        return Err(ExecutionError::BadCommand(format!("empty chord '{chord}'")));
    };

    let mut args = Vec::new();
    for modifier in modifiers {
        args.push("-M".to_string());
        args.push(modifier.to_lowercase());
    }
    args.push("-k".to_string());
    args.push(key.to_string());
    for modifier in modifiers.iter().rev() {
        args.push("-m".to_string());
        args.push(modifier.to_lowercase());
    }
    Ok(args)
}
