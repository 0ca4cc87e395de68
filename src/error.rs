use oxrdf::BlankNodeIdParseError;
use oxttl::TurtleSyntaxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanonicalizationError {
    #[error("Base16 encoding failed.")]
    Base16EncodingFailed(base16ct::Error),
    #[error("Reference blank node identifier does not exist in the canonicalization state.")]
    QuadsNotExist,
    #[error("Canonical identifier does not exist for the given blank node.")]
    CanonicalIdentifierNotExist,
    #[error("Parsing blank node identifier failed.")]
    BlankNodeIdParseError,
    #[error("Hash algorithm `{0}` is not supported.")]
    UnknownHashAlgorithm(String),
    #[error("The number of calls to the Hash N-degree Quads algorithm have exceeded the limit of {0}.")]
    ComplexityExceeded(usize),
    #[error("Input is not a valid N-Quads document: {0}")]
    MalformedInput(#[from] TurtleSyntaxError),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<BlankNodeIdParseError> for CanonicalizationError {
    fn from(_: BlankNodeIdParseError) -> Self {
        Self::BlankNodeIdParseError
    }
}
