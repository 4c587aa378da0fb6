use std::collections::HashMap;

/// Splits one CSV line into fields. Double-quoted fields may contain commas,
/// and a doubled quote inside them stands for a literal quote. Embedded
/// newlines are not supported; the seed data never contains them.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields.into_iter().map(|field| field.trim().to_string()).collect()
}

/// Parses header-first CSV text into one map per record, keyed by header.
/// Records shorter than the header row get empty strings for the tail.
pub fn parse_csv(text: &str) -> Vec<HashMap<String, String>> {
    let mut lines = text.trim().lines().filter(|line| !line.trim().is_empty());
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers = split_fields(header_line);

    lines
        .map(|line| {
            let values = split_fields(line);
            headers
                .iter()
                .enumerate()
                .map(|(index, header)| (header.clone(), values.get(index).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}
