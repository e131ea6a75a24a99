//! Plain help text rendering.
//!
//! Works only from [`ArgumentDescription`]s and the [`ParserConfig`], so it
//! never touches parse state.

use crate::config::ParserConfig;
use crate::describe::ArgumentDescription;

struct Section<'a> {
    title: String,
    rows: Vec<&'a ArgumentDescription>,
}

fn format_left(desc: &ArgumentDescription) -> String {
    if desc.is_positional() {
        if desc.arguments.is_empty() {
            return desc.long_name.clone();
        }
        return desc.arguments.clone();
    }

    let names: Vec<&str> = [desc.short_name.as_str(), desc.long_name.as_str()]
        .into_iter()
        .filter(|n| !n.is_empty())
        .collect();
    let mut out = names.join(", ");
    if !desc.arguments.is_empty() {
        out.push(' ');
        out.push_str(&desc.arguments);
    }
    out
}

fn format_help(desc: &ArgumentDescription) -> String {
    let mut out = desc.help.trim().to_string();
    if desc.required && !desc.is_positional() {
        if out.is_empty() {
            out.push_str("required");
        } else {
            out.push_str(" (required)");
        }
    }
    out
}

fn usage_line(config: &ParserConfig, descriptions: &[ArgumentDescription]) -> String {
    if !config.usage_text().trim().is_empty() {
        return config.usage_text().trim().to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    let program = config.program_name().trim();
    parts.push(if program.is_empty() { "program" } else { program }.to_string());

    let options = descriptions.iter().filter(|d| !d.is_positional());
    let mut has_optional = false;
    for desc in options {
        if !desc.required {
            has_optional = true;
            continue;
        }
        let name = if desc.long_name.is_empty() {
            &desc.short_name
        } else {
            &desc.long_name
        };
        if desc.arguments.is_empty() {
            parts.push(name.clone());
        } else {
            parts.push(format!("{name} {}", desc.arguments));
        }
    }
    if has_optional {
        parts.push("[OPTIONS]".to_string());
    }

    for desc in descriptions.iter().filter(|d| d.is_positional()) {
        parts.push(format_left(desc));
    }
    parts.join(" ")
}

fn sections(descriptions: &[ArgumentDescription]) -> Vec<Section<'_>> {
    let mut arguments = Section {
        title: "Arguments".to_string(),
        rows: Vec::new(),
    };
    let mut options = Section {
        title: "Options".to_string(),
        rows: Vec::new(),
    };
    let mut groups: Vec<(String, Section<'_>)> = Vec::new();

    for desc in descriptions {
        if let Some(group) = &desc.group {
            let key = group.name.to_lowercase();
            let pos = match groups.iter().position(|(k, _)| *k == key) {
                Some(pos) => pos,
                None => {
                    let mut title = group.name.clone();
                    if group.exclusive {
                        title.push_str(" (exclusive)");
                    }
                    if group.required {
                        title.push_str(" (required)");
                    }
                    groups.push((key, Section { title, rows: Vec::new() }));
                    groups.len() - 1
                }
            };
            groups[pos].1.rows.push(desc);
        } else if desc.is_positional() {
            arguments.rows.push(desc);
        } else {
            options.rows.push(desc);
        }
    }

    let mut out = vec![arguments, options];
    out.extend(groups.into_iter().map(|(_, s)| s));
    out.retain(|s| !s.rows.is_empty());
    out
}

/// Render the help message for `config` and its argument descriptions.
pub fn render(config: &ParserConfig, descriptions: &[ArgumentDescription]) -> String {
    let mut out = String::new();
    let program = config.program_name().trim();
    let description = config.description_text().trim();
    match (program.is_empty(), description.is_empty()) {
        (false, false) => out.push_str(&format!("{program} - {description}\n")),
        (false, true) => out.push_str(&format!("{program}\n")),
        (true, false) => out.push_str(&format!("{description}\n")),
        (true, true) => {}
    }

    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&format!("Usage: {}\n", usage_line(config, descriptions)));

    for section in sections(descriptions) {
        out.push_str(&format!("\n{}:\n", section.title));
        let rows: Vec<(String, String)> = section
            .rows
            .iter()
            .map(|d| (format_left(d), format_help(d)))
            .collect();
        let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        for (left, help) in rows {
            if help.is_empty() {
                out.push_str(&format!("  {}\n", left));
            } else {
                out.push_str(&format!("  {:width$}  {}\n", left, help, width = width));
            }
        }
    }

    if !config.epilog_text().trim().is_empty() {
        out.push('\n');
        out.push_str(config.epilog_text().trim_end());
        out.push('\n');
    }

    out
}
