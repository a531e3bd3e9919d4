/// Insert `text` before the byte at `offset`. Nothing is ever deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub offset: usize,
    pub text: String,
}

/// An unordered set of insertions into one source text.
#[derive(Debug, Clone, Default)]
pub struct EditScript {
    edits: Vec<Edit>,
}

impl EditScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, offset: usize, text: impl Into<String>) {
        self.edits.push(Edit {
            offset,
            text: text.into(),
        });
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Splice the edits into `text`.
    ///
    /// Edits are stably sorted by offset and merged with the untouched runs
    /// of `text` in one pass: copy up to the next offset, emit the insertion,
    /// and finally copy the tail. Offsets must lie on char boundaries within
    /// `text`.
    pub fn apply(&self, text: &str) -> String {
        let mut sorted: Vec<&Edit> = self.edits.iter().collect();
        sorted.sort_by_key(|edit| edit.offset);

        let inserted: usize = sorted.iter().map(|edit| edit.text.len()).sum();
        let mut out = String::with_capacity(text.len() + inserted);
        let mut cursor = 0;
        for edit in sorted {
            out.push_str(&text[cursor..edit.offset]);
            out.push_str(&edit.text);
            cursor = edit.offset;
        }
        out.push_str(&text[cursor..]);
        out
    }
}
