//! Argument descriptions for help rendering and other introspection.

use serde::Serialize;

use crate::option::OptionDef;
use crate::registry::Registry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupDescription {
    pub name: String,
    pub exclusive: bool,
    pub required: bool,
}

/// What a help formatter needs to know about one argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgumentDescription {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub short_name: String,
    /// For positionals this holds the positional's name.
    pub long_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub help: String,
    pub required: bool,
    /// Rendered argument counts, e.g. `FILE [FILE ...]`. Empty for flags.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub arguments: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupDescription>,
}

impl ArgumentDescription {
    pub fn is_positional(&self) -> bool {
        self.short_name.is_empty() && !self.long_name.starts_with('-')
    }
}

/// Render `metavar` `min` times followed by the optional part:
/// `[M ...]` when unbounded, `[M]` for one optional, `[M {0..k}]` for `k`.
pub(crate) fn arguments_summary(metavar: &str, min: usize, max: Option<usize>) -> String {
    let mut parts: Vec<String> = std::iter::repeat_n(metavar.to_string(), min).collect();
    match max {
        None => parts.push(format!("[{metavar} ...]")),
        Some(max) if max == min + 1 => parts.push(format!("[{metavar}]")),
        Some(max) if max > min => parts.push(format!("[{metavar} {{0..{}}}]", max - min)),
        Some(_) => {}
    }
    parts.join(" ")
}

pub(crate) fn describe(registry: &Registry, def: &OptionDef) -> ArgumentDescription {
    let arguments = if def.accepts_any_arguments() {
        let (min, max) = def.argument_counts();
        arguments_summary(&def.metavar(), min, max)
    } else {
        String::new()
    };

    let group = def
        .group()
        .and_then(|g| registry.group(g))
        .map(|g| GroupDescription {
            name: g.name().to_string(),
            exclusive: g.is_exclusive(),
            required: g.is_required(),
        });

    ArgumentDescription {
        short_name: def.short_name().to_string(),
        long_name: def.long_name().to_string(),
        help: def.help().to_string(),
        required: def.is_required(),
        arguments,
        group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_argument_counts() {
        assert_eq!(arguments_summary("A", 2, Some(2)), "A A");
        assert_eq!(arguments_summary("BEES", 1, None), "BEES [BEES ...]");
        assert_eq!(arguments_summary("C", 0, None), "[C ...]");
        assert_eq!(arguments_summary("D", 2, None), "D D [D ...]");
        assert_eq!(arguments_summary("E", 0, Some(3)), "[E {0..3}]");
        assert_eq!(arguments_summary("F", 0, Some(1)), "[F]");
        assert_eq!(arguments_summary("G", 1, Some(2)), "G [G]");
        assert_eq!(arguments_summary("H", 0, Some(0)), "");
    }
}
