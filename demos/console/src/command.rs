//! Parsing console lines into client commands.

use gridwire::prelude::Command;

/// Parses one console line.
///
/// Recognized:
///
/// ```text
/// connect <address> <port> <name>
/// set <x> <y>
/// ```
///
/// Anything else (including a known command with missing or malformed
/// arguments) yields `None` and is silently ignored by the console.
pub fn parse(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    match words.next()? {
        "connect" => {
            let host = words.next()?;
            let port = words.next()?;
            let name = words.next()?;
            Some(Command::Connect {
                host: host.to_owned(),
                port: port.to_owned(),
                name: name.to_owned(),
            })
        }
        "set" => {
            let x = words.next()?.parse().ok()?;
            let y = words.next()?.parse().ok()?;
            Some(Command::SetField { x, y })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connect() {
        assert_eq!(
            parse("connect 127.0.0.1 9090 alice"),
            Some(Command::Connect {
                host: "127.0.0.1".into(),
                port: "9090".into(),
                name: "alice".into(),
            })
        );
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(parse("set 1 2"), Some(Command::SetField { x: 1, y: 2 }));
        assert_eq!(parse("  set   0\t2  "), Some(Command::SetField { x: 0, y: 2 }));
    }

    #[test]
    fn test_unknown_commands_are_ignored() {
        assert_eq!(parse("quit"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("SET 1 2"), None);
    }

    #[test]
    fn test_malformed_arguments_are_ignored() {
        assert_eq!(parse("set 1"), None);
        assert_eq!(parse("set a b"), None);
        assert_eq!(parse("set -1 2"), None);
        assert_eq!(parse("connect 127.0.0.1 9090"), None);
    }

    #[test]
    fn test_extra_words_are_ignored() {
        assert_eq!(parse("set 1 2 3"), Some(Command::SetField { x: 1, y: 2 }));
    }
}
