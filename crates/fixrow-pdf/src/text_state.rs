//! Text positioning state of a content stream.

/// `[a b c d e f]` affine matrix
pub type Matrix = [f64; 6];

pub const IDENTITY_MATRIX: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Text matrix, line matrix and leading
///
/// Only positioning is tracked; fonts and spacing do not affect where a
/// show operator starts, which is all a fragment records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextState {
    pub text_matrix: Matrix,
    pub line_matrix: Matrix,
    pub leading: f64,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// `BT`: reset both matrices; leading persists across text objects
    #[inline]
    pub fn begin_text(&mut self) {
        self.text_matrix = IDENTITY_MATRIX;
        self.line_matrix = IDENTITY_MATRIX;
    }

    /// `Tm`
    #[inline]
    pub fn set_matrix(&mut self, matrix: Matrix) {
        self.text_matrix = matrix;
        self.line_matrix = matrix;
    }

    /// `Td`: translate the line matrix, text matrix follows
    #[inline]
    pub fn translate_line(&mut self, tx: f64, ty: f64) {
        let m = self.line_matrix;
        self.line_matrix[4] = m[0] * tx + m[2] * ty + m[4];
        self.line_matrix[5] = m[1] * tx + m[3] * ty + m[5];
        self.text_matrix = self.line_matrix;
    }

    /// `TD`: `-ty TL` then `tx ty Td`
    #[inline]
    pub fn translate_line_set_leading(&mut self, tx: f64, ty: f64) {
        self.leading = -ty;
        self.translate_line(tx, ty);
    }

    /// `T*`
    #[inline]
    pub fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }

    /// Horizontal origin of the next show operator (`e`)
    #[inline]
    #[must_use = "returns the x position"]
    pub const fn x(&self) -> f64 {
        self.text_matrix[4]
    }

    /// Vertical origin of the next show operator (`f`)
    #[inline]
    #[must_use = "returns the y position"]
    pub const fn y(&self) -> f64 {
        self.text_matrix[5]
    }
}
