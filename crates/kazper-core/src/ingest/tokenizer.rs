//! Permissive CSV tokenizer.
//!
//! Comma-separated fields, `\n` row breaks, `\r` dropped outside quotes.
//! Quoted fields may contain commas, newlines and doubled `""` quotes.
//! Malformed quoting never fails: an unterminated quote runs to end of input.

/// Split `text` into rows of raw (untrimmed) fields.
///
/// A trailing row that holds a single blank field (the artifact of a final
/// newline) is dropped.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            '\r' => {}
            _ => field.push(ch),
        }
    }

    row.push(field);
    if !is_blank_row(&row) {
        rows.push(row);
    }

    rows
}

/// A row consisting of one whitespace-only field.
pub fn is_blank_row(row: &[String]) -> bool {
    row.len() == 1 && row[0].trim().is_empty()
}
