#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Convert to Excel-style cell reference (A1, B5, etc.)
    pub fn to_reference(&self) -> String {
        format!("{}{}", column_label(self.col), row_label(self.row))
    }
}

/// Spreadsheet-style column letters: 0 -> A, 25 -> Z, 26 -> AA.
pub fn column_label(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// One-based row number.
pub fn row_label(row: usize) -> String {
    (row as u128 + 1).to_string()
}

/// Where the edit controller currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditState {
    Idle,
    Editing(CellPosition),
    Terminating,
}

impl EditState {
    pub fn selected(&self) -> Option<CellPosition> {
        match self {
            EditState::Editing(pos) => Some(*pos),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode_column(label: &str) -> usize {
        label
            .bytes()
            .fold(0, |acc, b| acc * 26 + (b - b'A') as usize + 1)
            - 1
    }

    #[test]
    fn column_labels_follow_bijective_base26() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
        assert_eq!(column_label(51), "AZ");
        assert_eq!(column_label(52), "BA");
        assert_eq!(column_label(701), "ZZ");
        assert_eq!(column_label(702), "AAA");
    }

    #[test]
    fn row_labels_are_one_based() {
        assert_eq!(row_label(0), "1");
        assert_eq!(row_label(28), "29");
        assert_eq!(row_label(usize::MAX), (usize::MAX as u128 + 1).to_string());
    }

    #[test]
    fn reference_combines_both_labels() {
        assert_eq!(CellPosition::new(2, 3).to_reference(), "D3");
        assert_eq!(CellPosition::new(0, 27).to_reference(), "AB1");
    }

    #[test]
    fn only_editing_has_a_selection() {
        let pos = CellPosition::new(1, 1);
        assert_eq!(EditState::Editing(pos).selected(), Some(pos));
        assert_eq!(EditState::Idle.selected(), None);
        assert_eq!(EditState::Terminating.selected(), None);
    }

    proptest! {
        #[test]
        fn column_label_round_trips(col in 0usize..1_000_000) {
            let label = column_label(col);
            prop_assert!(label.bytes().all(|b| b.is_ascii_uppercase()));
            prop_assert_eq!(decode_column(&label), col);
        }

        #[test]
        fn row_label_is_decimal_successor(row in 0usize..1_000_000) {
            prop_assert_eq!(row_label(row).parse::<usize>().ok(), Some(row + 1));
        }
    }
}
