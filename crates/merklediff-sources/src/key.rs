//! Row key construction shared by the sources.

/// Key used when no key column applies: `row:<n>`
pub fn row_number_key(row: u64) -> Vec<u8> {
    format!("row:{}", row).into_bytes()
}

/// Join the present key fields with `:`.
///
/// `fields[i]` is `None` when the i-th key column is missing from the record.
/// With no key columns configured, or a single missing one, the row number
/// key is used. In a composite key every present field after the first
/// position is preceded by `:`, so a missing leading field leaves a leading
/// separator (`[None, Some("7")]` gives `":7"`).
pub fn compose_key<'a, I>(fields: I, row: u64) -> Vec<u8>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let fields: Vec<Option<&str>> = fields.into_iter().collect();
    match fields.as_slice() {
        [] | [None] => row_number_key(row),
        [Some(single)] => single.as_bytes().to_vec(),
        many => {
            let mut key = String::new();
            for (i, field) in many.iter().enumerate() {
                if let Some(field) = field {
                    if i > 0 {
                        key.push(':');
                    }
                    key.push_str(field);
                }
            }
            key.into_bytes()
        }
    }
}
