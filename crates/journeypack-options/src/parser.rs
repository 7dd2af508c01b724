//! Raw argument list parser.

use crate::verb::Verb;

/// One recognised verb flag and the value attached to it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbInvocation {
    /// The recognised verb.
    pub verb: Verb,

    /// The flag as written (e.g. `-l` or `--lint`).
    pub flag: String,

    /// Value from `--flag=value` or the following non-flag argument.
    pub value: Option<String>,
}

/// Every flag-like argument (starting with `-`), in order.
///
/// Positional arguments are dropped. Inline values (`--flag=value`) are kept
/// as part of the returned argument.
pub fn extract_options(args: &[String]) -> Vec<&str> {
    args.iter()
        .map(String::as_str)
        .filter(|arg| is_flag(arg))
        .collect()
}

/// Parse a raw argument list into the recognised verbs, in order of appearance.
///
/// Unknown flags are skipped along with any positional arguments that are
/// not claimed as a verb value.
pub fn parse_invocations(args: &[String]) -> Vec<VerbInvocation> {
    let mut invocations = Vec::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];
        i += 1;

        if !is_flag(arg) {
            continue;
        }

        let (flag, inline_value) = match arg.split_once('=') {
            Some((flag, value)) => (flag, Some(value.to_string())),
            None => (arg.as_str(), None),
        };

        let Some(verb) = Verb::from_flag(flag) else {
            continue;
        };

        let value = if !verb.takes_value() {
            None
        } else if inline_value.is_some() {
            inline_value
        } else {
            match args.get(i) {
                Some(next) if !is_flag(next) => {
                    i += 1;
                    Some(next.clone())
                }
                _ => None,
            }
        };

        invocations.push(VerbInvocation {
            verb,
            flag: flag.to_string(),
            value,
        });
    }

    invocations
}

fn is_flag(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-')
}
