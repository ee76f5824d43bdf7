// ── Fixed-width numeric fields ────────────────────────────────────────────────
//
// Status panels print numbers into boxes of a fixed number of cells.  A value
// that does not fit is shown as a row of `9`s instead of being truncated, so
// the layout never shifts and a clipped reading is never mistaken for a real
// one.

/// Which side of the field the number sits on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Align {
    /// Number first, padding after: `"125  "`.
    Left,
    /// Padding first, number after: `"00025"`.
    Right,
}

/// Render `number` into a field exactly `fixed_length` characters wide.
///
/// The sign of a negative number counts toward the width.  When the decimal
/// form is longer than the field the result is `fixed_length` repetitions of
/// `'9'`.
///
/// ```
/// use asciirend::format::{padded_string, Align};
/// assert_eq!(padded_string(25, 5, '0', Align::Right), "00025");
/// assert_eq!(padded_string(125, 5, ' ', Align::Left), "125  ");
/// assert_eq!(padded_string(55555, 3, ' ', Align::Right), "999");
/// ```
pub fn padded_string(number: i64, fixed_length: usize, pad: char, align: Align) -> String {
    let digits = number.to_string();

    let Some(pad_len) = fixed_length.checked_sub(digits.len()) else {
        return "9".repeat(fixed_length);
    };

    let padding: String = std::iter::repeat_n(pad, pad_len).collect();
    match align {
        Align::Right => padding + &digits,
        Align::Left => digits + &padding,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_padded_right_aligned() {
        assert_eq!(padded_string(25, 5, '0', Align::Right), "00025");
    }

    #[test]
    fn space_padded_left_aligned() {
        assert_eq!(padded_string(125, 5, ' ', Align::Left), "125  ");
    }

    #[test]
    fn overflow_saturates_to_nines() {
        assert_eq!(padded_string(55555, 3, ' ', Align::Right), "999");
        assert_eq!(padded_string(55555, 3, ' ', Align::Left), "999");
    }

    #[test]
    fn exact_fit_has_no_padding() {
        assert_eq!(padded_string(1000, 4, '0', Align::Right), "1000");
    }

    #[test]
    fn sign_counts_toward_width() {
        assert_eq!(padded_string(-7, 3, ' ', Align::Right), " -7");
        assert_eq!(padded_string(-100, 3, ' ', Align::Right), "999");
    }

    #[test]
    fn zero_width_field() {
        assert_eq!(padded_string(0, 0, ' ', Align::Right), "");
        assert_eq!(padded_string(5, 0, ' ', Align::Left), "");
    }

    #[test]
    fn multibyte_pad_char_counts_as_one_cell() {
        let s = padded_string(3, 4, '·', Align::Right);
        assert_eq!(s.chars().count(), 4);
        assert!(s.ends_with('3'));
    }

    #[test]
    fn fitting_values_always_fill_the_field() {
        for n in [-999i64, -10, -1, 0, 1, 9, 42, 999, 12_345] {
            for width in 0..8usize {
                for align in [Align::Left, Align::Right] {
                    let s = padded_string(n, width, '.', align);
                    assert_eq!(s.chars().count(), width, "n={n} width={width}");
                }
            }
        }
    }
}
