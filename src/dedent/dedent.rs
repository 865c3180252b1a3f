use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;

static LEADING_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*").expect("leading whitespace pattern is valid"));

/// Literal fragments with the values spliced between them, in order.
///
/// Values are stringified as they are added, so a template can hold values
/// of different types.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Template {
    fragments: Vec<String>,
    values: Vec<String>,
}

impl Template {
    pub fn new(first: impl Into<String>) -> Self {
        Template {
            fragments: vec![first.into()],
            values: Vec::new(),
        }
    }

    /// Appends `value` followed by the literal fragment `next`.
    pub fn value(mut self, value: impl Display, next: impl Into<String>) -> Self {
        self.values.push(value.to_string());
        self.fragments.push(next.into());
        self
    }

    /// The raw text, before any normalization.
    pub fn render(&self) -> String {
        interleave(&self.fragments, &self.values)
    }

    pub fn normalize(self) -> String {
        dedent_str(&self.render())
    }
}

/// Splices `values` between `fragments` and normalizes the result.
///
/// `fragments` is expected to hold one more element than `values`. Each value
/// is followed by the next fragment if there is one, so a surplus value is
/// still appended and a missing fragment contributes nothing.
pub fn dedent<T: Display>(fragments: &[&str], values: &[T]) -> String {
    dedent_str(&interleave(fragments, values))
}

/// Normalizes an already interpolated block of text.
///
/// - One leading and one trailing empty line are dropped.
/// - The common indentation of the non-blank lines is removed.
/// - Lines still starting with whitespace are kept verbatim on their own line.
/// - Empty lines become line breaks.
/// - Every other line is trimmed and joined to its neighbours with a space.
pub fn dedent_str(text: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let indent = min_indent(&lines);

    if lines.first() == Some(&"") {
        lines.remove(0);
    }
    if lines.last() == Some(&"") {
        lines.pop();
    }

    let mut out = String::with_capacity(text.len());
    for line in lines {
        let rest = match indent {
            Some(indent) => skip_chars(line, indent),
            None => "",
        };

        if rest.starts_with(char::is_whitespace) {
            out.push('\n');
            out.push_str(rest);
        } else if rest.is_empty() {
            out.push('\n');
        } else {
            out.push_str(rest.trim());
            out.push(' ');
        }
    }

    out.trim().to_string()
}

/// Shortest leading whitespace run, in characters, among lines with any
/// non-whitespace content. `None` when every line is blank.
pub fn min_indent<S: AsRef<str>>(lines: &[S]) -> Option<usize> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            LEADING_WHITESPACE
                .find(line)
                .map_or(0, |m| m.as_str().chars().count())
        })
        .min()
}

fn interleave<F: AsRef<str>, V: Display>(fragments: &[F], values: &[V]) -> String {
    let mut text = fragments
        .first()
        .map(|fragment| fragment.as_ref().to_string())
        .unwrap_or_default();

    for (index, value) in values.iter().enumerate() {
        text.push_str(&value.to_string());
        if let Some(fragment) = fragments.get(index + 1) {
            text.push_str(fragment.as_ref());
        }
    }

    text
}

fn skip_chars(line: &str, count: usize) -> &str {
    match line.char_indices().nth(count) {
        Some((offset, _)) => &line[offset..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(lines: &[&str]) -> String {
        lines.join("\n")
    }

    #[test]
    fn joins_indented_paragraph() {
        let text = lines(&["", "  Hello", "  World", ""]);
        assert_eq!(dedent_str(&text), "Hello World");
    }

    #[test]
    fn keeps_nested_lines_on_their_own_line() {
        let text = lines(&["", "  Title:", "    - item one", "    - item two", ""]);
        assert_eq!(dedent_str(&text), "Title: \n  - item one\n  - item two");
    }

    #[test]
    fn strips_minimum_of_mixed_indents() {
        let text = lines(&["    first", "      second", "        third"]);
        assert_eq!(dedent_str(&text), "first \n  second\n    third");
    }

    #[test]
    fn blank_line_becomes_paragraph_break() {
        let text = lines(&[
            "",
            "        Hostname that the sync service is on.",
            "",
            "        Alternatively, you can set the ELECTRIC_HOST environment variable.",
            "      ",
        ]);
        assert_eq!(
            dedent_str(&text),
            "Hostname that the sync service is on. \nAlternatively, you can set the ELECTRIC_HOST environment variable."
        );
    }

    #[test]
    fn unindented_lines_join_with_single_space() {
        let text = lines(&["alpha", "beta  ", "gamma"]);
        let joined = ["alpha", "beta", "gamma"].join(" ");
        assert_eq!(dedent_str(&text), joined);
    }

    #[test]
    fn unindented_paragraphs_keep_their_breaks() {
        let text = lines(&["alpha", "beta", "", "gamma", "delta", "", "", "epsilon"]);
        assert_eq!(dedent_str(&text), "alpha beta \ngamma delta \n\nepsilon");
    }

    #[test]
    fn only_one_boundary_blank_line_is_dropped() {
        let text = lines(&["", "", "  body", "", ""]);
        // The surviving empty lines become newlines, which the final trim removes.
        assert_eq!(dedent_str(&text), "body");

        let text = lines(&["", "", "  body", "", "  tail", ""]);
        assert_eq!(dedent_str(&text), "body \ntail");
    }

    #[test]
    fn idempotent_on_single_paragraph() {
        let once = dedent_str("   some   spaced  text  ");
        assert_eq!(once, "some   spaced  text");
        assert_eq!(dedent_str(&once), once);
    }

    #[test]
    fn all_blank_input_is_empty() {
        assert_eq!(dedent_str(""), "");
        assert_eq!(dedent_str("\n"), "");
        assert_eq!(dedent_str("   \n \t \n"), "");
        assert_eq!(min_indent(&["", "   ", "\t"]), None);
    }

    #[test]
    fn whitespace_only_line_deeper_than_indent_is_kept() {
        let text = lines(&["  a", "     ", "  b"]);
        assert_eq!(dedent_str(&text), "a \n   b");
    }

    #[test]
    fn tabs_count_as_single_characters() {
        let text = lines(&["\t\tone", "\t\t\ttwo"]);
        assert_eq!(min_indent(&["\t\tone", "\t\t\ttwo"]), Some(2));
        assert_eq!(dedent_str(&text), "one \n\ttwo");
    }

    #[test]
    fn interpolates_values_before_splitting() {
        let text = dedent(&["\n  Defaults to ", ".\n"], &[5133]);
        assert_eq!(text, "Defaults to 5133.");

        let text = dedent(&["  enabled: ", ", port: ", ""], &[&true as &dyn Display, &65432]);
        assert_eq!(text, "enabled: true, port: 65432");
    }

    #[test]
    fn interpolated_newlines_take_part_in_normalization() {
        let text = dedent(&["\n  Options:\n", "\n"], &["    --host\n    --port"]);
        assert_eq!(text, "Options: \n  --host\n  --port");
    }

    #[test]
    fn tolerates_mismatched_arity() {
        assert_eq!(dedent(&["a ", " b"], &[1, 2, 3]), "a 1 b23");
        assert_eq!(dedent::<u8>(&[], &[]), "");
    }

    #[test]
    fn template_builder_matches_fragment_form() {
        let template = Template::new("\n  Port ")
            .value(5133, ", host ")
            .value("localhost", ".\n");
        assert_eq!(template.render(), "\n  Port 5133, host localhost.\n");
        assert_eq!(template.normalize(), "Port 5133, host localhost.");
    }

    #[test]
    fn macro_formats_then_normalizes() {
        let port = 65432;
        let text = crate::dedent!(
            "
            Port that the proxy is listening on.

            Defaults to {port}.
            "
        );
        assert_eq!(text, "Port that the proxy is listening on. \nDefaults to 65432.");
    }
}
