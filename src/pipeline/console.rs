//! Line commands read from stdin.
//!
//! ```text
//! toggle                 show or hide the overlay
//! theme <name>           apply a built-in theme
//! reset                  restore the default style
//! set <field> <value>    edit one style field; value is JSON or a bare string
//! status                 print host status
//! quit                   stop
//! ```

use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::style::StylePatch;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Toggle,
    Theme(String),
    Reset,
    Set(StylePatch),
    Status,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));

    match word {
        "toggle" => Ok(Command::Toggle),
        "reset" => Ok(Command::Reset),
        "status" => Ok(Command::Status),
        "quit" | "exit" => Ok(Command::Quit),
        "theme" if !rest.is_empty() => Ok(Command::Theme(rest.to_string())),
        "theme" => bail!("usage: theme <name>"),
        "set" => parse_set(rest).map(Command::Set),
        "" => bail!("empty command"),
        other => Err(anyhow!("unknown command {:?}", other)),
    }
}

fn parse_set(rest: &str) -> Result<StylePatch> {
    let Some((field, raw)) = rest.split_once(char::is_whitespace) else {
        bail!("usage: set <field> <value>");
    };
    let raw = raw.trim();
    let value: Value =
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

    let mut object = serde_json::Map::new();
    object.insert(field.to_string(), value);
    serde_json::from_value(Value::Object(object))
        .with_context(|| format!("cannot set {} to {}", field, raw))
}

/// Forwards stdin lines to a channel until stdin closes.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    debug!("stdin closed");
                    break;
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Point;
    use crate::style::{Color, LayoutMode};

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("toggle").unwrap(), Command::Toggle);
        assert_eq!(parse_command("  status ").unwrap(), Command::Status);
        assert_eq!(
            parse_command("theme rs-dark").unwrap(),
            Command::Theme("rs-dark".to_string())
        );
        assert!(parse_command("theme").is_err());
        assert!(parse_command("jump").is_err());
        assert!(parse_command("").is_err());
    }

    #[test]
    fn test_set_parses_json_or_string() {
        let Command::Set(patch) = parse_command("set bar_width 200").unwrap() else {
            panic!("expected set");
        };
        assert_eq!(patch.bar_width, Some(200));

        let Command::Set(patch) = parse_command("set layout compact").unwrap() else {
            panic!("expected set");
        };
        assert_eq!(patch.layout, Some(LayoutMode::Compact));

        let Command::Set(patch) = parse_command(r#"set position {"x": 10, "y": 20}"#).unwrap()
        else {
            panic!("expected set");
        };
        assert_eq!(patch.position, Some(Point::new(10, 20)));

        let Command::Set(patch) = parse_command("set overcap_text_color #ffd700").unwrap() else {
            panic!("expected set");
        };
        assert_eq!(patch.overcap_text_color, Some(Some(Color::rgb(255, 215, 0))));
    }

    #[test]
    fn test_set_rejects_bad_input() {
        assert!(parse_command("set bar_width").is_err());
        assert!(parse_command("set bar_widht 200").is_err());
        assert!(parse_command("set bar_width wide").is_err());
    }
}
