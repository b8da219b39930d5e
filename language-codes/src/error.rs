use language_tag_parser::LanguageTagError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input isn't a well-formed language tag. This is always a problem
    /// with the input.
    #[error(transparent)]
    MalformedTag(#[from] LanguageTagError),

    /// The lookup tables are missing something they must contain, or their
    /// replacements never settle. This is a problem with the data, not the
    /// input, and retrying won't fix it.
    #[error("the language data is inconsistent: {0}")]
    TableInconsistency(String),
}
