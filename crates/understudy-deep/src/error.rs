use thiserror::Error;
use understudy_matcher::MatcherError;
use understudy_router::RouterError;

use crate::node::SlotKind;

#[derive(Debug, Error)]
pub enum DeepMockError {
    #[error("`{path}` is already materialized as {existing}, cannot use it as {requested}")]
    ShapeConflict {
        path:      String,
        existing:  SlotKind,
        requested: SlotKind,
    },

    #[error("`{path}` is a function; nested properties require func_prop_support")]
    FuncPropsDisabled { path: String },

    #[error("`{path}` cannot be an object: the mock is shallow")]
    NotDeep { path: String },

    #[error("cannot {operation} `{path}`: it belongs to a deep mock, rebuild the mock instead")]
    LifecycleRestriction {
        operation: &'static str,
        path:      String,
    },

    #[error(transparent)]
    UnsupportedMatcher(#[from] MatcherError),

    #[error("invalid deep mock config: {0}")]
    Config(#[from] toml::de::Error),
}

impl From<RouterError> for DeepMockError {
    fn from(err: RouterError) -> Self {
        match err {
            RouterError::UnsupportedMatcher(err) => DeepMockError::UnsupportedMatcher(err),
            RouterError::LifecycleRestriction { operation, path } => {
                DeepMockError::LifecycleRestriction { operation, path }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DeepMockError>;
