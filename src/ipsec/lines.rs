/// Splits text on `\n`, keeping blank lines and a trailing empty line.
///
/// The result always has one more entry than there are newlines in `text`.
pub fn extract_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

#[cfg(test)]
mod tests {
    use super::extract_lines;

    fn check_line(lines: &[&str], index: usize, expected: &str) {
        assert_eq!(
            lines[index], expected,
            "expected line {index} to be {expected:?} but was {:?}",
            lines[index]
        );
    }

    #[test]
    fn keeps_blank_lines_in_place() {
        let lines = extract_lines("First\nSecond\n\nThird");

        assert_eq!(lines.len(), 4);
        check_line(&lines, 0, "First");
        check_line(&lines, 1, "Second");
        check_line(&lines, 2, "");
        check_line(&lines, 3, "Third");
    }

    #[test]
    fn trailing_newline_yields_empty_last_line() {
        let lines = extract_lines("conn a\n");

        assert_eq!(lines, vec!["conn a", ""]);
    }

    #[test]
    fn empty_input_is_a_single_empty_line() {
        assert_eq!(extract_lines(""), vec![""]);
    }

    #[test]
    fn rejoining_reproduces_input() {
        let inputs = [
            "",
            "\n",
            "\n\n",
            "conn a\n  auto=ignore",
            "conn a\r\n  left=10.0.0.1\r\n",
            "  leading\n\ttabs\n\n\ntrailing   ",
        ];

        for input in inputs {
            let lines = extract_lines(input);
            assert_eq!(lines.join("\n"), input);
            assert_eq!(lines.len(), input.matches('\n').count() + 1);
        }
    }
}
