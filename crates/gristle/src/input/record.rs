//! A single record read from the input stream.

/// An ordered sequence of string fields plus its position in the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
    number: u64,
    file_number: u64,
}

impl Record {
    /// Create a record.
    ///
    /// `number` counts records across every input (1-based); `file_number`
    /// restarts at 1 for each input.
    pub fn new(fields: Vec<String>, number: u64, file_number: u64) -> Self {
        Self {
            fields,
            number,
            file_number,
        }
    }

    /// Build a standalone record, numbered as the first of its file.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(fields.into_iter().map(Into::into).collect(), 1, 1)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Field at `index`, if the record is long enough.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position across all inputs, starting at 1.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Position within the current input, starting at 1.
    pub fn file_number(&self) -> u64 {
        self.file_number
    }

    /// Whether this is the first record of its input.
    pub fn is_first_in_file(&self) -> bool {
        self.file_number == 1
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}
