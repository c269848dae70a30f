//! Parsing of interactive input lines.

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum InputCommand {
    /// `/admin <secret>`
    Admin(String),
    /// `/play`
    Play,
    /// `/pause`
    Pause,
    /// `/seek <seconds>`
    Seek(f64),
    /// `/say <text>`
    Say(String),
    /// `/status`
    Status,
    /// `/help`
    Help,
    /// Anything that is not a command: a link to watch
    Link(String),
    /// A malformed command, with a hint for the user
    Invalid(String),
}

pub const HELP: &str = "\
Commands:
  /admin <secret>   authenticate as admin
  /play | /pause    control playback (admin)
  /seek <seconds>   jump to a position (admin)
  /say <text>       send a chat message
  /status           show local playback state
  <link>            watch a link (admin)
";

/// Parse one trimmed, non-empty input line.
pub fn parse_input(line: &str) -> InputCommand {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return InputCommand::Link(line.to_string());
    };

    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };

    match name {
        "admin" if argument.is_empty() => InputCommand::Invalid("usage: /admin <secret>".into()),
        "admin" => InputCommand::Admin(argument.to_string()),
        "play" => InputCommand::Play,
        "pause" => InputCommand::Pause,
        "seek" => match argument.parse::<f64>() {
            Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => InputCommand::Seek(seconds),
            _ => InputCommand::Invalid("usage: /seek <seconds>".into()),
        },
        "say" if argument.is_empty() => InputCommand::Invalid("usage: /say <text>".into()),
        "say" => InputCommand::Say(argument.to_string()),
        "status" => InputCommand::Status,
        "help" => InputCommand::Help,
        other => InputCommand::Invalid(format!("unknown command '/{}' (try /help)", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        // テスト項目: スラッシュコマンドが引数付きで解釈される
        // given (前提条件):
        let cases = [
            ("/admin hunter2", InputCommand::Admin("hunter2".to_string())),
            ("/play", InputCommand::Play),
            ("/pause", InputCommand::Pause),
            ("/seek 12.5", InputCommand::Seek(12.5)),
            ("/say hello  world", InputCommand::Say("hello  world".to_string())),
            ("/status", InputCommand::Status),
            ("/help", InputCommand::Help),
        ];

        for (line, expected) in cases {
            // when (操作):
            let parsed = parse_input(line);

            // then (期待する結果):
            assert_eq!(parsed, expected, "line: {}", line);
        }
    }

    #[test]
    fn test_parse_link() {
        // テスト項目: コマンド以外の行はリンクとして扱われる
        // given (前提条件):
        let line = "  https://pixeldrain.net/u/abc  ";

        // when (操作):
        let parsed = parse_input(line);

        // then (期待する結果):
        assert_eq!(
            parsed,
            InputCommand::Link("https://pixeldrain.net/u/abc".to_string())
        );
    }

    #[test]
    fn test_parse_invalid_commands() {
        // テスト項目: 引数の不足や不正な値、未知のコマンドは Invalid になる
        // given (前提条件):
        let lines = ["/admin", "/seek", "/seek -1", "/seek abc", "/seek NaN", "/say", "/dance"];

        for line in lines {
            // when (操作):
            let parsed = parse_input(line);

            // then (期待する結果):
            assert!(matches!(parsed, InputCommand::Invalid(_)), "line: {}", line);
        }
    }
}
