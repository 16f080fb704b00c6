//! Line classifier for flow source
//!
//! The flow language is line oriented: every meaningful line is exactly one
//! construct. This module trims lines, drops blanks and comments, and tags each
//! remaining line with a [`LineKind`]. Lines that match nothing are kept as
//! [`LineKind::Unrecognized`] so the compiler can report them instead of
//! losing them silently.

use crate::types::{FlowName, ENTRY_FLOW};

pub const FLOW_KEYWORD: &str = "fluxo";
pub const MESSAGE_KEYWORD: &str = "mensagem";
pub const BUTTON_KEYWORD: &str = "botao";
pub const TERMINATOR_KEYWORD: &str = "fim";

const COMMENT_MARKERS: [&str; 2] = ["//", "#"];
const ARROW: &str = "->";

/* ===================== Types ===================== */

/// A classified source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number in the original source
    pub number: usize,
    pub kind: LineKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `inicio:`
    EntryHeader,
    /// `fluxo <name>:`
    FlowHeader(FlowName),
    /// `mensagem:`
    MessageOpener,
    /// `botao <n>:` - the index only delimits the block and is kept as written
    ButtonOpener(String),
    /// `"text"`
    Quoted(String),
    /// `"label" -> target`
    Arrow { label: String, target: FlowName },
    /// `fim`
    Terminator,
    Unrecognized(String),
}

/* ===================== Public API ===================== */

/// Classify every meaningful line of `source`, in order
pub fn classify(source: &str) -> Vec<Line> {
    source
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let text = raw.trim();
            if text.is_empty() || is_comment(text) {
                return None;
            }
            Some(Line {
                number: idx + 1,
                kind: classify_line(text),
            })
        })
        .collect()
}

/// Classify a single trimmed line. First match wins.
pub fn classify_line(text: &str) -> LineKind {
    if let Some(kind) = header(text) {
        return kind;
    }
    if keyword_with_colon(text, MESSAGE_KEYWORD).is_some_and(str::is_empty) {
        return LineKind::MessageOpener;
    }
    if let Some(index) = button_opener(text) {
        return LineKind::ButtonOpener(index.to_string());
    }
    if let Some(content) = quoted(text) {
        return LineKind::Quoted(content.to_string());
    }
    if let Some((label, target)) = arrow(text) {
        return LineKind::Arrow {
            label: label.to_string(),
            target: target.to_string(),
        };
    }
    if text == TERMINATOR_KEYWORD {
        return LineKind::Terminator;
    }
    LineKind::Unrecognized(text.to_string())
}

/// Flow names and arrow targets: ASCII letters, digits and underscores
pub fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/* ===================== Matchers ===================== */

fn is_comment(text: &str) -> bool {
    COMMENT_MARKERS.iter().any(|m| text.starts_with(m))
}

/// Strip `<keyword> ... :` and return what sits between keyword and colon, trimmed
fn keyword_with_colon<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?.strip_suffix(':')?;
    // The keyword must end at a word boundary: `fluxos:` is not `fluxo s:`
    if rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some(rest.trim())
}

fn header(text: &str) -> Option<LineKind> {
    // The entry keyword is accepted with or without its colon
    if text == ENTRY_FLOW || keyword_with_colon(text, ENTRY_FLOW).is_some_and(str::is_empty) {
        return Some(LineKind::EntryHeader);
    }

    let rest = text.strip_prefix(FLOW_KEYWORD)?.strip_suffix(':')?;
    // At least one space between keyword and name
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let name = rest.trim();
    is_identifier(name).then(|| LineKind::FlowHeader(name.to_string()))
}

/// Digits of `botao <n>:`, of any length
fn button_opener(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(BUTTON_KEYWORD)?.strip_suffix(':')?.trim();
    (!rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())).then_some(rest)
}

/// `"content"`: only the outer quotes count, inner ones stay in the text
fn quoted(text: &str) -> Option<&str> {
    if text.len() < 2 {
        return None;
    }
    text.strip_prefix('"')?.strip_suffix('"')
}

/// `"label" -> target`
fn arrow(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix('"')?;
    let close = rest.find('"')?;
    let label = &rest[..close];
    if label.is_empty() {
        return None;
    }

    let target = rest[close + 1..].trim_start().strip_prefix(ARROW)?.trim();
    is_identifier(target).then_some((label, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<LineKind> {
        classify(source).into_iter().map(|l| l.kind).collect()
    }

    #[test]
    fn test_headers() {
        assert_eq!(classify_line("inicio:"), LineKind::EntryHeader);
        assert_eq!(classify_line("inicio"), LineKind::EntryHeader);
        assert_eq!(
            classify_line("fluxo suporte:"),
            LineKind::FlowHeader("suporte".to_string())
        );
        assert_eq!(
            classify_line("fluxo   pedido_2 :"),
            LineKind::FlowHeader("pedido_2".to_string())
        );
    }

    #[test]
    fn test_malformed_headers_are_unrecognized() {
        for line in ["fluxosuporte:", "fluxo:", "fluxo dois nomes:", "fluxo suporte", "inicios:"] {
            assert_eq!(
                classify_line(line),
                LineKind::Unrecognized(line.to_string()),
                "line {:?}",
                line
            );
        }
    }

    #[test]
    fn test_block_openers() {
        assert_eq!(classify_line("mensagem:"), LineKind::MessageOpener);
        assert_eq!(classify_line("mensagem :"), LineKind::MessageOpener);
        assert_eq!(classify_line("botao 1:"), LineKind::ButtonOpener("1".to_string()));
        assert_eq!(classify_line("botao7:"), LineKind::ButtonOpener("7".to_string()));
        assert_eq!(
            classify_line("botao:"),
            LineKind::Unrecognized("botao:".to_string())
        );
        assert_eq!(
            classify_line("botao x:"),
            LineKind::Unrecognized("botao x:".to_string())
        );
    }

    #[test]
    fn test_quoted() {
        assert_eq!(
            classify_line("\"Olá, tudo bem?\""),
            LineKind::Quoted("Olá, tudo bem?".to_string())
        );
        assert_eq!(classify_line("\"\""), LineKind::Quoted(String::new()));
    }

    #[test]
    fn test_button_index_has_no_size_limit() {
        assert_eq!(
            classify_line("botao 123456789012345678901234567890:"),
            LineKind::ButtonOpener("123456789012345678901234567890".to_string())
        );
    }

    #[test]
    fn test_inner_quotes_stay_in_text() {
        assert_eq!(
            classify_line(r#""Digite "sair" para encerrar""#),
            LineKind::Quoted(r#"Digite "sair" para encerrar"#.to_string())
        );
        assert_eq!(classify_line("\""), LineKind::Unrecognized("\"".to_string()));
    }

    #[test]
    fn test_quoted_wins_over_arrow() {
        // Lines ending in a quote are text, even when they look like an arrow
        assert_eq!(
            classify_line(r#""Ir" -> "destino""#),
            LineKind::Quoted(r#"Ir" -> "destino"#.to_string())
        );
    }

    #[test]
    fn test_arrow_label_with_quote_is_unrecognized() {
        let line = r#""Diga "oi"" -> destino"#;
        assert_eq!(classify_line(line), LineKind::Unrecognized(line.to_string()));
    }

    #[test]
    fn test_unbalanced_quote_is_unrecognized() {
        let line = "\"sem fechamento";
        assert_eq!(classify_line(line), LineKind::Unrecognized(line.to_string()));
    }

    #[test]
    fn test_arrow() {
        assert_eq!(
            classify_line(r#""Ver planos" -> planos"#),
            LineKind::Arrow {
                label: "Ver planos".to_string(),
                target: "planos".to_string()
            }
        );
        assert_eq!(
            classify_line(r#""Falar"->atendimento_humano"#),
            LineKind::Arrow {
                label: "Falar".to_string(),
                target: "atendimento_humano".to_string()
            }
        );
    }

    #[test]
    fn test_nonconforming_arrows_are_unrecognized() {
        for line in [
            r#""Ir" -> dois destinos"#,
            r#""Ir" ->"#,
            r#""" -> destino"#,
            r#"Ir -> destino"#,
        ] {
            assert_eq!(
                classify_line(line),
                LineKind::Unrecognized(line.to_string()),
                "line {:?}",
                line
            );
        }
    }

    #[test]
    fn test_terminator() {
        assert_eq!(classify_line("fim"), LineKind::Terminator);
        assert_eq!(
            classify_line("fim:"),
            LineKind::Unrecognized("fim:".to_string())
        );
    }

    #[test]
    fn test_classify_drops_blanks_and_comments() {
        let source = "\n  // comentário\n# outro\n   inicio:  \n\n  mensagem:\n";
        let lines = classify(source);

        assert_eq!(
            lines,
            vec![
                Line {
                    number: 4,
                    kind: LineKind::EntryHeader
                },
                Line {
                    number: 6,
                    kind: LineKind::MessageOpener
                },
            ]
        );
    }

    #[test]
    fn test_classify_keeps_unknown_keywords() {
        assert_eq!(
            kinds("inicio:\nimagem: logo.png"),
            vec![
                LineKind::EntryHeader,
                LineKind::Unrecognized("imagem: logo.png".to_string())
            ]
        );
    }
}
