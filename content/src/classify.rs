use crate::markers;

/// Block-level tag assigned to a single source line.
///
/// Classification looks only at the line itself; whether the tag actually
/// applies depends on parser state (inside an open code fence every line is
/// code except the closing fence).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Text,
    Table,
    CodeFence,
    FormulaBlock,
    FormulaLine,
    Thinking,
    Image,
}

/// Classify one line. Checks run in a fixed order and the first match wins,
/// so a `| \[ |` row stays a table row and a fence line wins over everything
/// but a thinking tag.
pub fn classify(line: &str) -> BlockType {
    let trimmed = line.trim();
    if trimmed.starts_with(markers::THINK_OPEN) {
        BlockType::Thinking
    } else if trimmed.starts_with(markers::CODE_FENCE) {
        BlockType::CodeFence
    } else if trimmed.starts_with('|') {
        BlockType::Table
    } else if trimmed.starts_with(markers::FORMULA_OPEN) {
        // A bare `\[` (spaces allowed) opens a block; `\[` with trailing
        // content is a one-line formula.
        if trimmed.replace(' ', "") == markers::FORMULA_OPEN {
            BlockType::FormulaBlock
        } else {
            BlockType::FormulaLine
        }
    } else if trimmed.starts_with(markers::FORMULA_CLOSE) {
        BlockType::FormulaLine
    } else if trimmed.starts_with(markers::IMAGE_OPEN) {
        BlockType::Image
    } else {
        BlockType::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_each_marker_kind() {
        assert_eq!(classify("plain words"), BlockType::Text);
        assert_eq!(classify("| a | b |"), BlockType::Table);
        assert_eq!(classify("```rust"), BlockType::CodeFence);
        assert_eq!(classify(r"\["), BlockType::FormulaBlock);
        assert_eq!(classify(r"\[ x^2"), BlockType::FormulaLine);
        assert_eq!(classify(r"\]"), BlockType::FormulaLine);
        assert_eq!(classify("<think>hm"), BlockType::Thinking);
        assert_eq!(classify("<image-uuid>abc</image-uuid>"), BlockType::Image);
    }

    #[test]
    fn leading_whitespace_does_not_change_the_tag() {
        assert_eq!(classify("   | a |"), BlockType::Table);
        assert_eq!(classify("\t```"), BlockType::CodeFence);
        assert_eq!(classify(r"  \[  "), BlockType::FormulaBlock);
        assert_eq!(classify("  <think>"), BlockType::Thinking);
    }

    #[test]
    fn precedence_is_first_match_wins() {
        // A table row whose first cell is a formula delimiter is a table row.
        assert_eq!(classify(r"| \[ |"), BlockType::Table);
        // A thinking tag beats a fence even if backticks follow.
        assert_eq!(classify("<think>```"), BlockType::Thinking);
        // Mid-line markers never classify the line.
        assert_eq!(classify("see <image-uuid>x</image-uuid>"), BlockType::Text);
        assert_eq!(classify("closing </think> tag"), BlockType::Text);
    }

    #[test]
    fn bare_open_delimiter_with_spaces_still_opens_a_block() {
        assert_eq!(classify(r"\[   "), BlockType::FormulaBlock);
        assert_eq!(classify(r"\[ \]"), BlockType::FormulaLine);
    }
}
