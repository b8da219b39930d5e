use thiserror::Error;

use crate::SubtagKind;

/// Ways that a string can fail to be a well-formed language tag.
#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum LanguageTagError {
    /// The tag contained a character outside of [-0-9A-Za-z_]
    #[error("The subtag '{subtag}' contains a character that isn't a letter or digit")]
    InvalidCharacter { subtag: String },

    /// The subtag we're parsing has an unexpected length or shape
    #[error("Expected {expected}, got '{subtag}'")]
    InvalidSubtag { subtag: String, expected: &'static str },

    /// The subtag has a recognizable shape, but came in the wrong order.
    /// `expected` lists the kinds that could have appeared here; the end of
    /// the string is always acceptable as well.
    #[error(
        "This {kind} subtag, '{subtag}', is out of place. Expected {}.",
        disjunction(.expected)
    )]
    OutOfOrder {
        subtag: String,
        kind: SubtagKind,
        expected: Vec<SubtagKind>,
    },

    /// A singleton such as 'x' or 'u' has nothing following it
    #[error("The subtag '{subtag}' must be followed by something")]
    Unterminated { subtag: String },
}

/// List the options in English, ending with "end of string": "a or b",
/// "a, b, or c".
fn disjunction(kinds: &[SubtagKind]) -> String {
    let mut options: Vec<&str> = kinds.iter().map(|kind| kind.name()).collect();
    options.push("end of string");
    match options.as_slice() {
        [only] => only.to_string(),
        [first, second] => format!("{first} or {second}"),
        [init @ .., last] => format!("{}, or {}", init.join(", "), last),
        [] => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disjunction() {
        assert_eq!(disjunction(&[]), "end of string");
        assert_eq!(disjunction(&[SubtagKind::Extension]), "extension or end of string");
        assert_eq!(
            disjunction(&[SubtagKind::Region, SubtagKind::Variant, SubtagKind::Extension]),
            "region, variant, extension, or end of string"
        );
    }

    #[test]
    fn test_messages() {
        let err = LanguageTagError::InvalidSubtag {
            subtag: "u".to_string(),
            expected: "a language code",
        };
        assert_eq!(err.to_string(), "Expected a language code, got 'u'");

        let err = LanguageTagError::Unterminated { subtag: "x".to_string() };
        assert_eq!(err.to_string(), "The subtag 'x' must be followed by something");
    }
}
