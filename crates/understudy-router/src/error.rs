use thiserror::Error;
use understudy_matcher::MatcherError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error(transparent)]
    UnsupportedMatcher(#[from] MatcherError),

    #[error("cannot {operation} `{path}`: it belongs to a deep mock, rebuild the mock instead")]
    LifecycleRestriction {
        operation: &'static str,
        path:      String,
    },
}

pub type Result<T> = std::result::Result<T, RouterError>;
