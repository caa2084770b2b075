// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line stream extraction: walks a page's content stream with a reduced text
// state machine and groups the shown strings into positioned lines.
//
// Glyph widths are not read from the font. Each shown string advances the
// text position by an average glyph width, which is enough to tell adjacent
// words from blocks set apart on the same baseline.

use docsplit_core::Line;
use lopdf::Object;
use lopdf::content::Operation;

/// Runs whose baselines differ by less than this (in points) share a line.
const BASELINE_TOLERANCE: f64 = 1.0;

/// A `TJ` adjustment more negative than this (thousandths of a text-space
/// unit) is read as a word gap.
const TJ_SPACE_THRESHOLD: f64 = -200.0;

/// Approximate glyph advance as a fraction of the font size.
const AVERAGE_GLYPH_WIDTH: f64 = 0.5;

/// Runs further apart than this many font sizes are separate lines.
const BLOCK_GAP_FACTOR: f64 = 2.0;

const IDENTITY: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// One shown string and where it sits in user space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Start x in user space.
    pub x: f64,
    /// Estimated end x in user space.
    pub end_x: f64,
    /// Baseline y in PDF user space (origin at the bottom of the page).
    pub baseline: f64,
    /// Rendered font size in user-space units.
    pub font_size: f64,
}

#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_size: f64,
    leading: f64,
    rise: f64,
    text_matrix: [f64; 6],
    line_matrix: [f64; 6],
    ctm: [f64; 6],
    ctm_stack: Vec<[f64; 6]>,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_size: 0.0,
            leading: 0.0,
            rise: 0.0,
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            ctm: IDENTITY,
            ctm_stack: Vec::new(),
        }
    }
}

impl TextState {
    fn translate_line(&mut self, tx: f64, ty: f64) {
        let m = self.line_matrix;
        self.line_matrix[4] = m[0] * tx + m[2] * ty + m[4];
        self.line_matrix[5] = m[1] * tx + m[3] * ty + m[5];
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }

    /// Move the text position along the baseline by `tx` text-space units.
    fn advance(&mut self, tx: f64) {
        self.text_matrix[4] += tx * self.text_matrix[0];
        self.text_matrix[5] += tx * self.text_matrix[1];
    }

    fn advance_text(&mut self, text: &str) {
        self.advance(text.chars().count() as f64 * self.font_size * AVERAGE_GLYPH_WIDTH);
    }

    /// Current text position in user space.
    fn position(&self) -> (f64, f64) {
        let (x, y) = (self.text_matrix[4], self.text_matrix[5] + self.rise);
        (
            self.ctm[0] * x + self.ctm[2] * y + self.ctm[4],
            self.ctm[1] * x + self.ctm[3] * y + self.ctm[5],
        )
    }

    fn rendered_font_size(&self) -> f64 {
        let tm_scale = self.text_matrix[1].hypot(self.text_matrix[3]);
        let ctm_scale = self.ctm[1].hypot(self.ctm[3]);
        (self.font_size * tm_scale * ctm_scale).abs()
    }

    /// Start a run at the current position. `end_x` is filled in by
    /// [`TextState::finish`] once the text has been advanced over.
    fn start(&self) -> TextRun {
        let (x, baseline) = self.position();
        TextRun {
            text: String::new(),
            x,
            end_x: x,
            baseline,
            font_size: self.rendered_font_size(),
        }
    }

    fn finish(&self, mut run: TextRun, text: String) -> TextRun {
        run.text = text;
        run.end_x = self.position().0;
        run
    }

    fn show(&mut self, text: String) -> TextRun {
        let run = self.start();
        self.advance_text(&text);
        self.finish(run, text)
    }
}

/// Numeric operand as `f64`.
pub(crate) fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(f64::from(*value)),
        _ => None,
    }
}

fn numbers<const N: usize>(operands: &[Object]) -> Option<[f64; N]> {
    if operands.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, operand) in out.iter_mut().zip(operands) {
        *slot = number(operand)?;
    }
    Some(out)
}

fn multiply(lhs: [f64; 6], rhs: [f64; 6]) -> [f64; 6] {
    [
        lhs[0] * rhs[0] + lhs[1] * rhs[2],
        lhs[0] * rhs[1] + lhs[1] * rhs[3],
        lhs[2] * rhs[0] + lhs[3] * rhs[2],
        lhs[2] * rhs[1] + lhs[3] * rhs[3],
        lhs[4] * rhs[0] + lhs[5] * rhs[2] + rhs[4],
        lhs[4] * rhs[1] + lhs[5] * rhs[3] + rhs[5],
    ]
}

/// Walk decoded content-stream operations and collect the shown strings.
///
/// `decode` turns the raw bytes of a string operand into text using the font
/// selected by the most recent `Tf` (passed as its resource key).
pub fn collect_runs<F>(operations: &[Operation], mut decode: F) -> Vec<TextRun>
where
    F: FnMut(&[u8], &[u8]) -> String,
{
    let mut state = TextState::default();
    let mut runs = Vec::new();

    for op in operations {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => state.ctm_stack.push(state.ctm),
            "Q" => {
                if let Some(ctm) = state.ctm_stack.pop() {
                    state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = numbers::<6>(operands) {
                    state.ctm = multiply(m, state.ctm);
                }
            }
            "BT" => {
                state.text_matrix = IDENTITY;
                state.line_matrix = IDENTITY;
            }
            "Tf" => {
                if let (Some(Object::Name(key)), Some(size)) =
                    (operands.first(), operands.get(1).and_then(number))
                {
                    state.font_key = key.clone();
                    state.font_size = size;
                }
            }
            "TL" => {
                if let Some([leading]) = numbers::<1>(operands) {
                    state.leading = leading;
                }
            }
            "Ts" => {
                if let Some([rise]) = numbers::<1>(operands) {
                    state.rise = rise;
                }
            }
            "Tm" => {
                if let Some(m) = numbers::<6>(operands) {
                    state.text_matrix = m;
                    state.line_matrix = m;
                }
            }
            "Td" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.next_line(),
            "Tj" => {
                if let Some(text) = show_string(operands.first(), &state, &mut decode) {
                    runs.push(state.show(text));
                }
            }
            "'" => {
                state.next_line();
                if let Some(text) = show_string(operands.first(), &state, &mut decode) {
                    runs.push(state.show(text));
                }
            }
            "\"" => {
                state.next_line();
                if let Some(text) = show_string(operands.get(2), &state, &mut decode) {
                    runs.push(state.show(text));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let run = state.start();
                    let mut text = String::new();
                    for item in items {
                        match item {
                            Object::String(bytes, _) => {
                                let part = decode(&state.font_key, bytes);
                                state.advance_text(&part);
                                text.push_str(&part);
                            }
                            other => {
                                let Some(adjustment) = number(other) else {
                                    continue;
                                };
                                state.advance(-adjustment / 1000.0 * state.font_size);
                                if adjustment < TJ_SPACE_THRESHOLD && !text.ends_with(' ') {
                                    text.push(' ');
                                }
                            }
                        }
                    }
                    if !text.trim().is_empty() {
                        runs.push(state.finish(run, text));
                    }
                }
            }
            _ => {}
        }
    }

    runs
}

fn show_string<F>(operand: Option<&Object>, state: &TextState, decode: &mut F) -> Option<String>
where
    F: FnMut(&[u8], &[u8]) -> String,
{
    match operand {
        Some(Object::String(bytes, _)) => {
            let text = decode(&state.font_key, bytes);
            (!text.is_empty()).then_some(text)
        }
        _ => None,
    }
}

/// A line being assembled, with the extent of its last run.
struct OpenLine {
    parts: Vec<String>,
    baseline: f64,
    font_size: f64,
    last_x: f64,
    last_end_x: f64,
}

impl OpenLine {
    fn new(run: TextRun) -> Self {
        Self {
            parts: vec![run.text],
            baseline: run.baseline,
            font_size: run.font_size,
            last_x: run.x,
            last_end_x: run.end_x,
        }
    }

    /// Whether `run` continues this line: same baseline, not behind the
    /// previous run, and not separated from it by a block-sized gap.
    fn continues_with(&self, run: &TextRun) -> bool {
        let gap_limit = BLOCK_GAP_FACTOR * self.font_size.max(run.font_size);
        (run.baseline - self.baseline).abs() < BASELINE_TOLERANCE
            && run.x >= self.last_x
            && run.x - self.last_end_x <= gap_limit
    }

    fn extend(&mut self, run: TextRun) {
        self.parts.push(run.text);
        self.font_size = self.font_size.max(run.font_size);
        self.last_x = run.x;
        self.last_end_x = run.end_x;
    }

    fn into_line(self, page_top: f64, page_index: usize) -> Option<Line> {
        let text = self
            .parts
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            return None;
        }
        let y_position = (page_top - self.baseline - self.font_size).max(0.0);
        Some(Line::new(text, y_position, page_index))
    }
}

/// Group runs into lines, in stream order.
///
/// A new line starts whenever the baseline moves by more than the tolerance,
/// or when a run starts left of the previous one or more than two font sizes
/// past its end. `page_top` is the top edge of the media box; the resulting
/// `y_position` is the distance from that edge to the top of the line.
pub fn assemble_lines(runs: Vec<TextRun>, page_top: f64, page_index: usize) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current: Option<OpenLine> = None;

    for run in runs {
        match current.as_mut() {
            Some(open) if open.continues_with(&run) => open.extend(run),
            _ => {
                if let Some(done) = current.replace(OpenLine::new(run)) {
                    lines.extend(done.into_line(page_top, page_index));
                }
            }
        }
    }
    if let Some(done) = current {
        lines.extend(done.into_line(page_top, page_index));
    }

    lines
}

/// Fallback decoder: one byte per character.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
