//! Content stream walker: turns text show operators into fragments.
//!
//! | Operator | Action |
//! |----------|--------|
//! | `BT`     | Reset text and line matrices |
//! | `Tm`     | Set text matrix |
//! | `Td`     | Translate line |
//! | `TD`     | Translate line, set leading |
//! | `TL`     | Set leading |
//! | `T*`     | Next line |
//! | `Tj`     | Show string |
//! | `TJ`     | Show strings with kerning, one fragment per array |
//! | `'`      | Next line, show string |
//! | `"`      | Set spacing, next line, show string |
//!
//! A fragment's position is the text matrix origin (`e`, `f`) when the
//! show operator runs. The matrix is not advanced by glyph widths.

use crate::decode::decode_pdf_string;
use crate::text_state::{Matrix, TextState};
use fixrow_core::Fragment;
use lopdf::content::Operation;
use lopdf::Object;

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn two_numbers(operands: &[Object]) -> Option<(f64, f64)> {
    match operands {
        [a, b, ..] => Some((number(a)?, number(b)?)),
        _ => None,
    }
}

fn matrix(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = [0.0; 6];
    for (slot, operand) in m.iter_mut().zip(operands) {
        *slot = number(operand)?;
    }
    Some(m)
}

/// Text of a `Tj`-style string operand
fn shown_string(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Text of a `TJ` array; kerning numbers are skipped
fn shown_array(object: &Object) -> Option<String> {
    let Object::Array(items) = object else {
        return None;
    };
    Some(items.iter().filter_map(shown_string).collect())
}

/// Walk one page's operations in stream order. Returns the number of
/// fragments emitted.
pub fn walk_operations(operations: &[Operation], visitor: &mut dyn FnMut(&Fragment)) -> usize {
    let mut state = TextState::default();
    let mut emitted = 0;
    let mut emit = |state: &TextState, text: Option<String>| {
        if let Some(text) = text {
            visitor(&Fragment::new(text, state.x(), state.y()));
            emitted += 1;
        }
    };

    for op in operations {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "BT" => state.begin_text(),
            "Tm" => {
                if let Some(m) = matrix(operands) {
                    state.set_matrix(m);
                }
            }
            "Td" => {
                if let Some((tx, ty)) = two_numbers(operands) {
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                if let Some((tx, ty)) = two_numbers(operands) {
                    state.translate_line_set_leading(tx, ty);
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    state.leading = leading;
                }
            }
            "T*" => state.next_line(),
            "Tj" => emit(&state, operands.first().and_then(shown_string)),
            "TJ" => emit(&state, operands.first().and_then(shown_array)),
            "'" => {
                state.next_line();
                emit(&state, operands.first().and_then(shown_string));
            }
            "\"" => {
                state.next_line();
                emit(&state, operands.get(2).and_then(shown_string));
            }
            _ => {}
        }
    }

    emitted
}
