//! Recognised CLI verbs.

use serde::{Deserialize, Serialize};

/// A verb recognised on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Verb {
    /// Development server (`-s`, `--server`).
    Server,
    /// Bundle build (`-b`, `--build`).
    Build,
    /// Lint (`-l`, `--lint`).
    Lint,
    /// Test runner (`-t`, `--test`).
    Test,
    /// Serve a built bundle for reporting (`-c`, `--scout`).
    Scout,
    /// Mock API server (`-m`, `--mockServer`).
    MockServer,
    /// Lint report (`-r`, `--checkStyle`).
    CheckStyle,
    /// Documentation generator (`-d`, `--doc`).
    Doc,
}

/// Flag spellings for every verb: (short, long, verb).
const FLAGS: &[(&str, &str, Verb)] = &[
    ("-s", "--server", Verb::Server),
    ("-b", "--build", Verb::Build),
    ("-l", "--lint", Verb::Lint),
    ("-t", "--test", Verb::Test),
    ("-c", "--scout", Verb::Scout),
    ("-m", "--mockServer", Verb::MockServer),
    ("-r", "--checkStyle", Verb::CheckStyle),
    ("-d", "--doc", Verb::Doc),
];

impl Verb {
    /// All verbs, in flag table order.
    pub const ALL: [Verb; 8] = [
        Verb::Server,
        Verb::Build,
        Verb::Lint,
        Verb::Test,
        Verb::Scout,
        Verb::MockServer,
        Verb::CheckStyle,
        Verb::Doc,
    ];

    /// Look up a verb by its short or long flag spelling.
    pub fn from_flag(flag: &str) -> Option<Self> {
        FLAGS
            .iter()
            .find(|(short, long, _)| *short == flag || *long == flag)
            .map(|(_, _, verb)| *verb)
    }

    /// Whether the verb accepts an optional value after the flag.
    pub fn takes_value(&self) -> bool {
        matches!(
            self,
            Verb::Build | Verb::Lint | Verb::Test | Verb::Scout | Verb::MockServer
        )
    }

    /// Long flag spelling.
    pub fn long_flag(&self) -> &'static str {
        FLAGS
            .iter()
            .find(|(_, _, verb)| verb == self)
            .map(|(_, long, _)| *long)
            .unwrap_or("")
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.long_flag().trim_start_matches('-'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_and_long_spellings() {
        for (short, long, verb) in FLAGS {
            assert_eq!(Verb::from_flag(short), Some(*verb));
            assert_eq!(Verb::from_flag(long), Some(*verb));
        }
    }

    #[test]
    fn test_unknown_flag() {
        assert_eq!(Verb::from_flag("--verbose"), None);
        assert_eq!(Verb::from_flag("-x"), None);
    }

    #[test]
    fn test_display_uses_long_name() {
        assert_eq!(Verb::MockServer.to_string(), "mockServer");
        assert_eq!(Verb::CheckStyle.to_string(), "checkStyle");
    }

    #[test]
    fn test_every_verb_has_a_flag() {
        for verb in Verb::ALL {
            assert!(!verb.long_flag().is_empty());
        }
    }
}
