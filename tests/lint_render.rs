//! Lint over the terminal front-end's click wiring.
//!
//! Two rules keep the mouse and the keyboard in step:
//! - a string literal in `src/ui/render.rs` that shows a key like `[3]`
//!   belongs to a statement that registers a click target
//!   (`push_clickable` or `push_choice`);
//! - every click id declared in `src/ui/actions.rs` is both drawn in
//!   `render.rs` and dispatched in `ui/mod.rs`.
//!
//! The sources are tokenized just far enough to tell code, comments and
//! string literals apart, then split into `;`-terminated statements.

use std::fs;
use std::path::PathBuf;

const REGISTERING_CALLS: [&str; 2] = ["push_clickable(", "push_choice("];

#[derive(Debug, Default)]
struct Statement {
    line: usize,
    code: String,
    literals: Vec<String>,
}

fn ui_file(name: &str) -> String {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "src", "ui", name].iter().collect();
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {}: {}", path.display(), e))
}

/// A single-character key in brackets, e.g. `[Y]` or `[0]`.
fn shows_key(text: &str) -> bool {
    text.as_bytes()
        .windows(3)
        .any(|w| w[0] == b'[' && w[2] == b']' && w[1].is_ascii_alphanumeric())
}

fn statements(source: &str) -> Vec<Statement> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = Vec::new();
    let mut current = Statement::default();
    let mut line = 1;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if current.code.trim().is_empty() && current.literals.is_empty() && !c.is_whitespace() {
            current.line = line;
        }
        match c {
            '\n' => {
                line += 1;
                current.code.push(c);
                i += 1;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            'r' if chars.get(i + 1) == Some(&'#') || chars.get(i + 1) == Some(&'"') => {
                let mut hashes = 0;
                let mut j = i + 1;
                while chars.get(j) == Some(&'#') {
                    hashes += 1;
                    j += 1;
                }
                if chars.get(j) != Some(&'"') {
                    current.code.push(c);
                    i += 1;
                    continue;
                }
                j += 1;
                let mut text = String::new();
                while j < chars.len() {
                    if chars[j] == '"' && (1..=hashes).all(|k| chars.get(j + k) == Some(&'#')) {
                        j += 1 + hashes;
                        break;
                    }
                    if chars[j] == '\n' {
                        line += 1;
                    }
                    text.push(chars[j]);
                    j += 1;
                }
                current.literals.push(text);
                current.code.push_str("\"\"");
                i = j;
            }
            '"' => {
                let mut text = String::new();
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    if chars[i] == '\\' {
                        i += 1;
                    }
                    if let Some(&ch) = chars.get(i) {
                        if ch == '\n' {
                            line += 1;
                        }
                        text.push(ch);
                    }
                    i += 1;
                }
                i += 1;
                current.literals.push(text);
                current.code.push_str("\"\"");
            }
            '\'' if chars.get(i + 2) == Some(&'\'') => {
                current.code.push_str("' '");
                i += 3;
            }
            ';' => {
                out.push(std::mem::take(&mut current));
                i += 1;
            }
            _ => {
                current.code.push(c);
                i += 1;
            }
        }
    }
    if !current.code.trim().is_empty() || !current.literals.is_empty() {
        out.push(current);
    }
    out
}

/// Statements that draw a key label without registering a click target.
fn unregistered_keys(source: &str) -> Vec<(usize, String)> {
    statements(source)
        .into_iter()
        .filter(|st| st.literals.iter().any(|l| shows_key(l)))
        .filter(|st| !REGISTERING_CALLS.iter().any(|call| st.code.contains(call)))
        .map(|st| {
            let shown = st.literals.iter().find(|l| shows_key(l)).cloned().unwrap_or_default();
            (st.line, shown)
        })
        .collect()
}

fn click_ids(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|l| l.trim().strip_prefix("pub const "))
        .filter_map(|rest| rest.split_once(": u16"))
        .map(|(name, _)| name.trim().to_string())
        .collect()
}

fn mentions(source: &str, ident: &str) -> bool {
    statements(source).iter().any(|st| {
        st.code
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .any(|word| word == ident)
    })
}

#[test]
fn every_drawn_key_is_clickable() {
    let offenders = unregistered_keys(&ui_file("render.rs"));
    assert!(
        offenders.is_empty(),
        "key labels drawn without a click target (use push_clickable or push_choice):\n{}",
        offenders
            .iter()
            .map(|(line, text)| format!("  render.rs:{}: {:?}", line, text))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

#[test]
fn every_click_id_is_drawn_and_handled() {
    let ids = click_ids(&ui_file("actions.rs"));
    assert!(ids.len() >= 7, "click ids not found: {:?}", ids);

    let render = ui_file("render.rs");
    let app = ui_file("mod.rs");
    for id in &ids {
        assert!(mentions(&render, id), "{} is never drawn", id);
        assert!(mentions(&app, id), "{} is never handled", id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_push_of_a_key_is_flagged() {
        let source = "let x = 1;\ncl.push(Line::from(\" [Y] Yes\"));\n";
        assert_eq!(unregistered_keys(source), vec![(2, " [Y] Yes".to_string())]);
    }

    #[test]
    fn key_inside_a_registering_call_spanning_lines_passes() {
        let source = "cl.push_clickable(\n    Line::from(vec![\n        Span::raw(\" [0] \"),\n    ]),\n    END_MONTH,\n);";
        assert!(unregistered_keys(source).is_empty());
    }

    #[test]
    fn comments_and_templates_are_not_keys() {
        let source = "// cl.push(Line::from(\" [Q] Quit\"));\nlet k = format!(\" [{}] \", key);";
        assert!(unregistered_keys(source).is_empty());
    }

    #[test]
    fn escaped_quotes_and_semicolons_stay_inside_literals() {
        let st = statements(r#"let a = "say \"hi\"; [N]"; let b = ';';"#);
        assert_eq!(st.len(), 2);
        assert_eq!(st[0].literals, vec![r#"say "hi"; [N]"#.to_string()]);
    }

    #[test]
    fn raw_strings_are_literals() {
        let st = statements("let s = r#\"a \"[R]\" b\"#;");
        assert_eq!(st[0].literals, vec!["a \"[R]\" b".to_string()]);
    }

    #[test]
    fn ids_are_read_from_declarations() {
        let source = "// ── Main ──\npub const END_MONTH: u16 = 1;\npub const ACTION_BASE: u16 = 10; // +row\n";
        assert_eq!(click_ids(source), vec!["END_MONTH", "ACTION_BASE"]);
    }

    #[test]
    fn mentions_ignore_comments_and_substrings() {
        assert!(!mentions("// QUIT here\nlet x = QUIT_LATER;", "QUIT"));
        assert!(mentions("(None, QUIT) => {}", "QUIT"));
    }
}
