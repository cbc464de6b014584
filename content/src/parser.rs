use crate::classify::BlockType;
use crate::classify::classify;
use crate::element::AttachmentLookup;
use crate::element::ContentElement;
use crate::markers;

/// Converts a full message body into ordered [`ContentElement`]s.
///
/// There is no incremental mode: a streamed message is re-parsed from the
/// top on every update, because text that arrives later can change how
/// earlier lines read (an opening fence turns the rest of the buffer into
/// code). All accumulation state lives inside a single [`parse`] call, so a
/// parser value can be shared freely.
///
/// Unterminated constructs never panic and never disappear: whatever was
/// accumulated when input ends is flushed as-is.
///
/// [`parse`]: MessageParser::parse
pub struct MessageParser<'a> {
    attachments: Option<&'a dyn AttachmentLookup>,
}

impl<'a> MessageParser<'a> {
    pub fn new() -> Self {
        Self { attachments: None }
    }

    /// Image markers whose id `lookup` cannot resolve degrade to plain text
    /// instead of becoming [`ContentElement::Image`].
    pub fn with_attachments(lookup: &'a dyn AttachmentLookup) -> Self {
        Self {
            attachments: Some(lookup),
        }
    }

    pub fn parse(&self, input: &str) -> Vec<ContentElement> {
        let mut run = ParseRun::new(self.attachments);
        for line in input.split('\n') {
            run.step(line);
        }
        run.finish()
    }
}

impl Default for MessageParser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// The multi-line construct currently open, if any. Entering one of these
/// states flushes every pending accumulator first, so interleaving bugs are
/// impossible by construction.
enum State {
    Default,
    InCode(CodeBlock),
    InThinking(ThinkingBlock),
    InFormula(FormulaBlock),
}

struct CodeBlock {
    language: String,
    indent: Option<usize>,
    lines: Vec<String>,
}

impl CodeBlock {
    fn new(language: String) -> Self {
        Self {
            language,
            indent: None,
            lines: Vec::new(),
        }
    }

    fn push(&mut self, line: &str) {
        // Indent is measured once, on the first content line, and at most
        // that many whitespace characters are removed from later lines.
        let indent = *self.indent.get_or_insert_with(|| leading_whitespace(line));
        self.lines.push(strip_indent(line, indent).to_string());
    }
}

#[derive(Default)]
struct ThinkingBlock {
    lines: Vec<String>,
}

#[derive(Default)]
struct FormulaBlock {
    lines: Vec<String>,
}

impl FormulaBlock {
    fn push(&mut self, line: &str) {
        let cleaned = line
            .replace(markers::FORMULA_OPEN, "")
            .replace(markers::FORMULA_CLOSE, "");
        self.lines.push(cleaned);
    }
}

#[derive(Default)]
struct PendingTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    header_captured: bool,
}

impl PendingTable {
    fn push_row(&mut self, line: &str) {
        let cells = split_row(line);
        if is_delimiter_row(&cells) {
            return;
        }
        if self.header_captured {
            self.rows.push(cells);
        } else {
            self.header = cells;
            self.header_captured = true;
        }
    }
}

struct ParseRun<'a> {
    attachments: Option<&'a dyn AttachmentLookup>,
    elements: Vec<ContentElement>,
    text: Vec<String>,
    table: PendingTable,
    state: State,
}

impl<'a> ParseRun<'a> {
    fn new(attachments: Option<&'a dyn AttachmentLookup>) -> Self {
        Self {
            attachments,
            elements: Vec::new(),
            text: Vec::new(),
            table: PendingTable::default(),
            state: State::Default,
        }
    }

    fn step(&mut self, line: &str) {
        match std::mem::replace(&mut self.state, State::Default) {
            State::Default => self.default_line(line),
            State::InCode(block) => self.code_line(block, line),
            State::InThinking(block) => self.thinking_line(block, line),
            State::InFormula(block) => self.formula_block_line(block, line),
        }
    }

    fn default_line(&mut self, line: &str) {
        match classify(line) {
            BlockType::Text => {
                self.flush_table();
                self.text.push(line.to_string());
            }
            BlockType::Table => {
                self.flush_text();
                self.table.push_row(line);
            }
            BlockType::CodeFence => {
                self.flush_text();
                self.flush_table();
                let trimmed = line.trim();
                let language = trimmed
                    .strip_prefix(markers::CODE_FENCE)
                    .unwrap_or(trimmed)
                    .trim()
                    .to_string();
                self.state = State::InCode(CodeBlock::new(language));
            }
            BlockType::Thinking => {
                self.flush_text();
                self.flush_table();
                if line.contains(markers::THINK_CLOSE) {
                    // One-line form: both tags on the same line.
                    let content = strip_think_tags(line).trim().to_string();
                    self.elements.push(ContentElement::Thinking {
                        content,
                        expanded: false,
                    });
                } else {
                    let mut block = ThinkingBlock::default();
                    let first = line.replace(markers::THINK_OPEN, "");
                    if !first.is_empty() {
                        block.lines.push(first);
                    }
                    self.state = State::InThinking(block);
                }
            }
            BlockType::FormulaBlock => {
                self.flush_text();
                self.flush_table();
                self.state = State::InFormula(FormulaBlock::default());
            }
            BlockType::FormulaLine => {
                self.flush_text();
                self.flush_table();
                let mut block = FormulaBlock::default();
                if !line.trim().starts_with(markers::FORMULA_CLOSE) {
                    block.push(line);
                }
                // A stray close with nothing open still emits, faithfully
                // empty.
                self.emit_formula(block);
            }
            BlockType::Image => self.image_line(line),
        }
    }

    /// Inside a fence only the closing fence matters; everything else is
    /// captured verbatim, markers included.
    fn code_line(&mut self, mut block: CodeBlock, line: &str) {
        if classify(line) == BlockType::CodeFence {
            self.emit_code(block);
        } else {
            block.push(line);
            self.state = State::InCode(block);
        }
    }

    fn thinking_line(&mut self, mut block: ThinkingBlock, line: &str) {
        if line.contains(markers::THINK_CLOSE) {
            let tail = strip_think_tags(line);
            if !tail.is_empty() {
                block.lines.push(tail);
            }
            self.emit_thinking(block);
        } else {
            block.lines.push(line.to_string());
            self.state = State::InThinking(block);
        }
    }

    fn formula_block_line(&mut self, mut block: FormulaBlock, line: &str) {
        let trimmed = line.trim();
        if trimmed.starts_with(markers::FORMULA_CLOSE) {
            self.emit_formula(block);
        } else if classify(line) == BlockType::FormulaBlock {
            // A second bare open delimiter is dropped rather than nested.
            self.state = State::InFormula(block);
        } else {
            block.push(line);
            self.state = State::InFormula(block);
        }
    }

    fn image_line(&mut self, line: &str) {
        let resolved = markers::extract_image_id(line)
            .filter(|id| self.attachments.is_some_and(|a| a.contains(*id)));
        match resolved {
            Some(id) => {
                self.flush_text();
                self.flush_table();
                self.elements.push(ContentElement::Image { id });
            }
            None => {
                // Unresolved references stay visible as raw text instead of
                // vanishing.
                self.flush_table();
                self.text.push(line.to_string());
            }
        }
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let content = self.text.join("\n");
        self.text.clear();
        self.elements.push(ContentElement::Text { content });
    }

    fn flush_table(&mut self) {
        if !self.table.header_captured {
            return;
        }
        let table = std::mem::take(&mut self.table);
        self.elements.push(ContentElement::Table {
            header: table.header,
            rows: table.rows,
        });
    }

    fn emit_code(&mut self, block: CodeBlock) {
        if block.lines.is_empty() {
            return;
        }
        self.elements.push(ContentElement::Code {
            code: block.lines.join("\n"),
            language: block.language,
            indent: block.indent.unwrap_or(0),
        });
    }

    fn emit_thinking(&mut self, block: ThinkingBlock) {
        if block.lines.is_empty() {
            return;
        }
        let content = strip_think_tags(&block.lines.join("\n"))
            .trim()
            .to_string();
        self.elements.push(ContentElement::Thinking {
            content,
            expanded: false,
        });
    }

    fn emit_formula(&mut self, block: FormulaBlock) {
        self.elements.push(ContentElement::Formula {
            latex: block.lines.join("\n"),
        });
    }

    fn finish(mut self) -> Vec<ContentElement> {
        self.flush_text();
        match std::mem::replace(&mut self.state, State::Default) {
            State::Default => self.flush_table(),
            State::InCode(block) => {
                self.emit_code(block);
                self.flush_table();
            }
            State::InThinking(block) => {
                self.flush_table();
                self.emit_thinking(block);
            }
            State::InFormula(block) => {
                self.flush_table();
                if !block.lines.is_empty() {
                    self.emit_formula(block);
                }
            }
        }
        self.elements
    }
}

fn strip_think_tags(text: &str) -> String {
    text.replace(markers::THINK_OPEN, "")
        .replace(markers::THINK_CLOSE, "")
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Removes at most `width` leading whitespace characters, never content.
fn strip_indent(line: &str, width: usize) -> &str {
    let mut rest = line;
    for _ in 0..width {
        match rest.strip_prefix(|c: char| c.is_whitespace()) {
            Some(stripped) => rest = stripped,
            None => break,
        }
    }
    rest
}

fn split_row(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Alignment rows like `|---|:---:|` carry no data and are dropped wherever
/// they appear.
fn is_delimiter_row(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|cell| cell.chars().all(|c| c == '-' || c == ':'))
}
