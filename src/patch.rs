/// Text to be spliced into the source at a byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub offset: usize,
    pub text: String,
}

impl Insertion {
    pub fn new(offset: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            text: text.into(),
        }
    }
}

/// Applies insertions against the original offsets. Insertions at the same
/// offset keep their relative order.
pub fn apply(source: &str, mut insertions: Vec<Insertion>) -> String {
    if insertions.is_empty() {
        return source.to_string();
    }
    insertions.sort_by_key(|i| i.offset);

    let extra: usize = insertions.iter().map(|i| i.text.len()).sum();
    let mut out = String::with_capacity(source.len() + extra);
    let mut cursor = 0;
    for insertion in &insertions {
        let offset = insertion.offset.min(source.len());
        out.push_str(&source[cursor..offset]);
        out.push_str(&insertion.text);
        cursor = offset;
    }
    out.push_str(&source[cursor..]);
    out
}
