use crate::messages::{Action, Mode};
use anyhow::{Result, anyhow};
use std::io::BufRead;
use std::path::PathBuf;
use tokio::sync::mpsc;

pub const HELP: &str = "commands: tab generate|scan, text <..>, generate [<..>], download, copy, \
start, stop, upload <path>, copy-result, clear, quit";

/// Parse a command line into an action
///
/// The first word selects the command; for `text`, `generate` and `upload`
/// the rest of the line is taken verbatim (leading separator removed).
pub fn parse_action(line: &str) -> Result<Action> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest),
        None => (trimmed, ""),
    };

    let action = match command.to_lowercase().as_str() {
        "tab" => match rest.trim().to_lowercase().as_str() {
            "generate" => Action::SelectTab(Mode::Generate),
            "scan" => Action::SelectTab(Mode::Scan),
            other => return Err(anyhow!("Unknown tab: {:?}", other)),
        },
        "text" => Action::SetInput(rest.to_string()),
        "generate" if rest.is_empty() => Action::Generate(None),
        "generate" => Action::Generate(Some(rest.to_string())),
        "download" => Action::Download,
        "copy" => Action::CopyInput,
        "start" => Action::StartCamera,
        "stop" => Action::StopCamera,
        "upload" => {
            let path = rest.trim();
            if path.is_empty() {
                return Err(anyhow!("upload needs a file path"));
            }
            Action::Upload(PathBuf::from(path))
        }
        "copy-result" => Action::CopyResult,
        "clear" => Action::ClearResult,
        "quit" | "exit" => Action::Quit,
        "" => return Err(anyhow!("Empty command")),
        other => return Err(anyhow!("Unknown command: {:?}", other)),
    };

    Ok(action)
}

/// Read commands from stdin on a dedicated thread and forward them as actions
///
/// Interactive stdin blocks indefinitely, so it gets its own OS thread rather
/// than a blocking-pool task that would hold up runtime shutdown.
/// Sends `Quit` on EOF so the app tears down cleanly.
pub fn spawn_stdin_reader(tx: mpsc::Sender<Action>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::error!("Failed to read stdin: {}", e);
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match parse_action(&line) {
                Ok(action) => {
                    tracing::debug!("Parsed action: {:?}", action);
                    if tx.blocking_send(action).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    eprintln!("{}", HELP);
                }
            }
        }

        let _ = tx.blocking_send(Action::Quit);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_action("start").unwrap(), Action::StartCamera);
        assert_eq!(parse_action("  stop\n").unwrap(), Action::StopCamera);
        assert_eq!(parse_action("COPY").unwrap(), Action::CopyInput);
        assert_eq!(parse_action("copy-result").unwrap(), Action::CopyResult);
        assert_eq!(parse_action("clear").unwrap(), Action::ClearResult);
        assert_eq!(parse_action("exit").unwrap(), Action::Quit);
    }

    #[test]
    fn test_parse_tabs() {
        assert_eq!(parse_action("tab scan").unwrap(), Action::SelectTab(Mode::Scan));
        assert_eq!(
            parse_action("tab Generate").unwrap(),
            Action::SelectTab(Mode::Generate)
        );
        assert!(parse_action("tab settings").is_err());
    }

    #[test]
    fn test_text_keeps_spacing() {
        assert_eq!(
            parse_action("text  two  spaces ").unwrap(),
            Action::SetInput(" two  spaces ".to_string())
        );
        assert_eq!(parse_action("generate").unwrap(), Action::Generate(None));
        assert_eq!(
            parse_action("generate https://example.com").unwrap(),
            Action::Generate(Some("https://example.com".to_string()))
        );
    }

    #[test]
    fn test_upload_requires_path() {
        assert_eq!(
            parse_action("upload /tmp/code.png").unwrap(),
            Action::Upload(PathBuf::from("/tmp/code.png"))
        );
        assert!(parse_action("upload   ").is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse_action("frobnicate").is_err());
    }
}
