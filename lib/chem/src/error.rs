use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChemError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChemError {
    #[error("Empty structure string")]
    EmptyInput,

    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Unknown element '{0}'")]
    UnknownElement(String),

    #[error("Unclosed bracket atom starting at position {0}")]
    UnclosedBracket(usize),

    #[error("Unbalanced parentheses: {0}")]
    UnbalancedParens(&'static str),

    #[error("Unmatched ring closure digit {0}")]
    UnmatchedRingClosure(u8),

    #[error("Bond symbol with no preceding atom at position {0}")]
    DanglingBond(usize),
}
