use std::fmt;

#[derive(Debug)]
pub enum HuffmanError {
    /// No symbols to build a tree from.
    EmptyInput,
    /// Summing two weights would overflow the weight type.
    WeightOverflow,
    /// The encoder met a symbol its own table has no code for.
    MissingCode { position: usize },
    /// The payload does not decode cleanly against its descriptor.
    Corrupt(String),
    /// The descriptor cannot be parsed or describes an invalid tree.
    DescriptorMismatch(String),
    Io(std::io::Error),
}

impl fmt::Display for HuffmanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HuffmanError::EmptyInput =>
                write!(f, "no symbols to build a huffman tree from"),
            HuffmanError::WeightOverflow =>
                write!(f, "symbol weights overflow their type"),
            HuffmanError::MissingCode { position } =>
                write!(f, "no code for symbol at input position {}", position),
            HuffmanError::Corrupt(reason) =>
                write!(f, "corrupt payload: {}", reason),
            HuffmanError::DescriptorMismatch(reason) =>
                write!(f, "invalid descriptor: {}", reason),
            HuffmanError::Io(e) =>
                write!(f, "i/o failure: {}", e),
        }
    }
}

impl std::error::Error for HuffmanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HuffmanError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HuffmanError {
    fn from(e: std::io::Error) -> Self {
        HuffmanError::Io(e)
    }
}

impl HuffmanError {
    pub fn corrupt(reason: impl Into<String>) -> Self {
        HuffmanError::Corrupt(reason.into())
    }

    pub fn mismatch(reason: impl Into<String>) -> Self {
        HuffmanError::DescriptorMismatch(reason.into())
    }
}

pub type HuffmanResult<T> = Result<T, HuffmanError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            HuffmanError::MissingCode { position: 7 }.to_string(),
            "no code for symbol at input position 7"
        );
        assert_eq!(
            HuffmanError::corrupt("cursor stopped mid-code").to_string(),
            "corrupt payload: cursor stopped mid-code"
        );
    }

    #[test]
    fn test_io_errors_keep_their_source() {
        let err: HuffmanError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, HuffmanError::Io(_)));
        assert!(err.source().is_some());
        assert!(HuffmanError::EmptyInput.source().is_none());
    }
}
