//! Spreadsheet column addressing
//!
//! Column letters use bijective base-26 numeration: `A` = 1 .. `Z` = 26,
//! `AA` = 27 and so on. Indices into a record row are the column number minus one.

/// 1-based column number for a letter key such as `"AK"`.
///
/// Lowercase letters are accepted. Returns `None` for an empty key or any
/// character outside `A-Z`.
pub fn column_number(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0usize, |acc, ch| {
        let ch = ch.to_ascii_uppercase();
        if !ch.is_ascii_uppercase() {
            return None;
        }
        let digit = (ch as u8 - b'A') as usize + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })
}

/// 0-based row index for a letter key (`"A"` = 0, `"AK"` = 36)
pub fn column_index(letters: &str) -> Option<usize> {
    column_number(letters).map(|n| n - 1)
}

/// Letter key for a 1-based column number. Returns an empty string for 0.
pub fn column_letters(mut number: usize) -> String {
    let mut letters = Vec::new();
    while number > 0 {
        let rem = (number - 1) % 26;
        letters.push(b'A' + rem as u8);
        number = (number - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A1-style reference for a 1-based (row, column) pair
pub fn a1(row: usize, column: usize) -> String {
    format!("{}{}", column_letters(column), row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_letters() {
        assert_eq!(column_index("A"), Some(0));
        assert_eq!(column_index("D"), Some(3));
        assert_eq!(column_index("Z"), Some(25));
    }

    #[test]
    fn multi_letters() {
        assert_eq!(column_index("AA"), Some(26));
        assert_eq!(column_index("AK"), Some(36));
        assert_eq!(column_index("AT"), Some(45));
        assert_eq!(column_index("ZZ"), Some(701));
        assert_eq!(column_index("AAA"), Some(702));
    }

    #[test]
    fn lowercase_is_accepted() {
        assert_eq!(column_index("ak"), column_index("AK"));
    }

    #[test]
    fn invalid_keys() {
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("A1"), None);
        assert_eq!(column_index("Ж"), None);
    }

    #[test]
    fn letters_from_number() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(703), "AAA");
        assert_eq!(column_letters(0), "");
        assert_eq!(a1(6, 3), "C6");
    }
}
