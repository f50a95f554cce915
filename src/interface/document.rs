//! Whole-document driver.

use crate::errors::Result;
use crate::formatter::{FormatOptions, SourceFormatter};
use crate::model::RunResult;
use crate::readers::{scan_blocks, split_lines};

use super::block_formatter::BlockFormatter;

/// Languages formatted when none are configured.
pub const DEFAULT_LANGUAGES: &[&str] = &["python", "py", "python3", "py3", "ipython", "ipython3"];

/// Options for one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Passed to the formatter for every block.
    pub format: FormatOptions,
    /// Block languages to format; other blocks pass through.
    pub languages: Vec<String>,
    /// Whether block errors still count as a failed run.
    pub skip_errors: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            format: FormatOptions::default(),
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            skip_errors: false,
        }
    }
}

impl RunOptions {
    /// Returns true if the run should be reported as failed.
    pub fn is_failure(&self, result: &RunResult) -> bool {
        result.exit_failure(self.skip_errors)
    }
}

/// Formats every matching block of `text`.
///
/// Block failures are collected in the result; the affected blocks are left
/// exactly as they were. Only invalid options abort the run, and they do so
/// before any block is touched.
pub fn run(text: &str, options: &RunOptions, formatter: &dyn SourceFormatter) -> Result<RunResult> {
    options.format.validate()?;

    let lines = split_lines(text);
    let blocks = scan_blocks(&lines);
    let block_formatter = BlockFormatter::new(formatter, &options.format);

    let mut output = String::with_capacity(text.len());
    let mut errors = Vec::new();
    let mut blocks_formatted = 0;
    let mut cursor = 0;

    for block in &blocks {
        output.extend(lines[cursor..block.start_line].iter().copied());
        cursor = block.end_line;

        let original = &lines[block.start_line..block.end_line];
        if !block.matches_language(&options.languages) {
            tracing::debug!(
                "Skipping {:?} block at line {}",
                block.language,
                block.fence_line + 1
            );
            output.extend(original.iter().copied());
            continue;
        }

        blocks_formatted += 1;
        match block_formatter.format_block(block, &lines) {
            Ok(formatted) => {
                if let Some(tags) = &formatted.tags {
                    tracing::debug!("Cell at line {} has tags {:?}", block.fence_line + 1, tags);
                }
                output.push_str(&formatted.body);
            }
            Err(err) => {
                tracing::debug!("Leaving block at line {} untouched: {}", block.fence_line + 1, err.kind);
                output.extend(original.iter().copied());
                errors.push(err);
            }
        }
    }
    output.extend(lines[cursor..].iter().copied());

    let modified = output != text;
    Ok(RunResult {
        text: output,
        errors,
        modified,
        blocks_seen: blocks.len(),
        blocks_formatted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{BlackenError, BlockErrorKind};
    use crate::formatter::TargetVersion;
    use crate::test_utils::{PanickingFormatter, StubFormatter};
    use pretty_assertions::assert_eq;

    fn format_str(text: &str) -> RunResult {
        run(text, &RunOptions::default(), &StubFormatter).unwrap()
    }

    #[test]
    fn test_trivial() {
        let result = format_str("");
        assert_eq!(result.text, "");
        assert!(!result.modified);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_markdown_simple() {
        let result = format_str("```python\nf(1,2,3)\n```\n");
        assert_eq!(result.text, "```python\nf(1, 2, 3)\n```\n");
        assert!(result.modified);
        assert_eq!(result.blocks_seen, 1);
        assert_eq!(result.blocks_formatted, 1);
    }

    #[test]
    fn test_scenario_trailing_space_after_fence() {
        let result = format_str("```python\nf(1,2,3)\n``` \n");
        assert_eq!(result.text, "```python\nf(1, 2, 3)\n``` \n");
    }

    #[test]
    fn test_leading_whitespace_in_language() {
        let result = format_str("```   python\nf(1,2,3)\n```\n");
        assert_eq!(result.text, "```   python\nf(1, 2, 3)\n```\n");
    }

    #[test]
    fn test_trailing_whitespace() {
        let result = format_str("```python\nf(1,2,3)\n```    \n");
        assert_eq!(result.text, "```python\nf(1, 2, 3)\n```    \n");
    }

    #[test]
    fn test_indented_markdown() {
        let before = "- do this pls:\n  ```python\n  f(1,2,3)\n  ```\n- also this\n";
        let result = format_str(before);
        assert_eq!(
            result.text,
            "- do this pls:\n  ```python\n  f(1, 2, 3)\n  ```\n- also this\n"
        );
    }

    #[test]
    fn test_code_cell_variants() {
        let cases = [
            ("```{code-cell} python\nf(1,2,3)\n```\n", "```{code-cell} python\nf(1, 2, 3)\n```\n"),
            (
                "```{code-cell}   python\nf(1,2,3)\n```\n",
                "```{code-cell}   python\nf(1, 2, 3)\n```\n",
            ),
            (
                "```{code-cell} python\nf(1,2,3)\n```    \n",
                "```{code-cell} python\nf(1, 2, 3)\n```    \n",
            ),
            (
                "- do this pls:\n  ```{code-cell} python\n  f(1,2,3)\n  ```\n- also this\n",
                "- do this pls:\n  ```{code-cell} python\n  f(1, 2, 3)\n  ```\n- also this\n",
            ),
        ];
        for (before, after) in cases {
            assert_eq!(format_str(before).text, after);
        }
    }

    #[test]
    fn test_unclosed_cell_is_untouched() {
        let before = "Hello hello\n```{code-cell} python\n%timeit -n 5 -r 10 some_function()```\nworld\n";
        let result = format_str(before);
        assert_eq!(result.text, before);
        assert!(!result.modified);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_other_languages_pass_through() {
        let before = "```rust\nfn main(){f(1,2)}\n```\n\n```\nf(1,2)\n```\n";
        let result = run(before, &RunOptions::default(), &PanickingFormatter).unwrap();
        assert_eq!(result.text, before);
        assert_eq!(result.blocks_seen, 2);
        assert_eq!(result.blocks_formatted, 0);
    }

    #[test]
    fn test_syntax_error_leaves_block() {
        let before = "```python\nf(\n```\n";
        let result = format_str(before);
        assert_eq!(result.text, before);
        assert!(!result.modified);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].line(), 1);
        assert!(result.errors[0].kind.is_syntax_error());
        assert!(result.exit_failure(false));
    }

    #[test]
    fn test_error_in_one_block_does_not_stop_others() {
        let before = "```python\nf( )\n```\n\n```python\nf(\n```\n";
        let result = format_str(before);
        assert_eq!(result.text, "```python\nf()\n```\n\n```python\nf(\n```\n");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].line(), 5);

        let options = RunOptions {
            skip_errors: true,
            ..Default::default()
        };
        // Still a failure: the first block was rewritten.
        assert!(options.is_failure(&result));
    }

    #[test]
    fn test_errors_in_document_order() {
        let before = "```python\n%%%bad\n```\n```python\nf(\n```\n```{code-cell} python\n:tags: [\n```\n";
        let result = format_str(before);
        assert_eq!(result.text, before);
        let lines: Vec<usize> = result.errors.iter().map(|e| e.line()).collect();
        assert_eq!(lines, vec![1, 4, 7]);
        assert!(matches!(result.errors[0].kind, BlockErrorKind::Command(_)));
        assert!(matches!(result.errors[1].kind, BlockErrorKind::Format(_)));
        assert!(matches!(result.errors[2].kind, BlockErrorKind::Tags(_)));
    }

    #[test]
    fn test_skip_errors_only_affects_exit() {
        let before = "```python\nf(\n```\n";
        let options = RunOptions {
            skip_errors: true,
            ..Default::default()
        };
        let result = run(before, &options, &StubFormatter).unwrap();
        assert_eq!(result.errors.len(), 1);
        assert!(!options.is_failure(&result));
    }

    #[test]
    fn test_idempotence() {
        let before = "# Title\n\n```python\nf(1,2,3) # c\nfoo(very_very_very_very_very_very_very, long_long_long_long_long)\n```\n\n  ```{code-cell} python\n  :tags: ['x']\n  !ls  \n  g( 'a' )\n  ```\n";
        let options = RunOptions {
            format: FormatOptions::default().with_line_length(50),
            ..Default::default()
        };
        let once = run(before, &options, &StubFormatter).unwrap();
        let twice = run(&once.text, &options, &StubFormatter).unwrap();
        assert!(once.modified);
        assert_eq!(twice.text, once.text);
        assert!(!twice.modified);
    }

    #[test]
    fn test_formatted_notebook_cell_is_not_modified() {
        let before = "```{code-cell} ipython3\n%matplotlib inline\n\nimport numpy as np\n\n!ls\n```\n";
        let result = format_str(before);
        assert_eq!(result.text, before);
        assert!(!result.modified);
        assert!(!result.exit_failure(false));
    }

    #[test]
    fn test_non_block_text_is_preserved() {
        let before = "intro  \n\n~~~python\nf(1,2)\n~~~  \ntext\t\n```{code-cell}  python \nx(1,2)\n```\n";
        let result = format_str(before);
        assert_eq!(
            result.text,
            "intro  \n\n~~~python\nf(1, 2)\n~~~  \ntext\t\n```{code-cell}  python \nx(1, 2)\n```\n"
        );
    }

    #[test]
    fn test_skip_string_normalization() {
        let before = "```python\nf('hi')\n```\n";
        assert_eq!(format_str(before).text, "```python\nf(\"hi\")\n```\n");

        let mut options = RunOptions::default();
        options.format.string_normalization = false;
        let result = run(before, &options, &StubFormatter).unwrap();
        assert!(!result.modified);
    }

    #[test]
    fn test_incompatible_targets_abort_before_formatting() {
        let options = RunOptions {
            format: FormatOptions::default()
                .with_target(TargetVersion::Py27)
                .with_target(TargetVersion::Py36),
            ..Default::default()
        };
        let result = run("```python\nf(1,2)\n```\n", &options, &PanickingFormatter);
        assert!(matches!(result, Err(BlackenError::IncompatibleTargets(_))));
    }

    #[test]
    fn test_custom_languages() {
        let options = RunOptions {
            languages: vec!["pycon".to_string()],
            ..Default::default()
        };
        let before = "```python\nf(1,2)\n```\n```pycon\nf(1,2)\n```\n";
        let result = run(before, &options, &StubFormatter).unwrap();
        assert_eq!(result.text, "```python\nf(1,2)\n```\n```pycon\nf(1, 2)\n```\n");
    }

    #[test]
    fn test_no_final_newline() {
        let result = format_str("text\n```python\nf(1,2)\n```");
        assert_eq!(result.text, "text\n```python\nf(1, 2)\n```");
    }
}
