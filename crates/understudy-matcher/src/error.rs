use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatcherError {
    #[error("unsupported matcher at argument {position}: `{description}` comes from the {ecosystem} matcher ecosystem")]
    UnsupportedMatcher {
        position:    usize,
        ecosystem:   String,
        description: String,
    },
}

pub type Result<T> = std::result::Result<T, MatcherError>;
