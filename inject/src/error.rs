use thiserror::Error;

/// The error type for injection, binding and mock lookups.
///
/// The injector never translates errors: whatever the binding step or the
/// wrapped function returns reaches the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("{function}() missing required argument '{param}'")]
  MissingArgument { function: String, param: String },

  #[error("{function}() got multiple values for argument '{param}'")]
  DuplicateArgument { function: String, param: String },

  #[error("{function}() got an unexpected keyword argument '{param}'")]
  UnexpectedKeyword { function: String, param: String },

  #[error("{function}() takes {expected} positional arguments but {given} were given")]
  TooManyPositional {
    function: String,
    expected: usize,
    given: usize,
  },

  #[error("argument '{param}' expected type `{expected}`, got `{found}`")]
  TypeMismatch {
    param: String,
    expected: &'static str,
    found: &'static str,
  },

  #[error("'{param}' is not a bound argument")]
  UnknownParameter { param: String },

  #[error("mock '{mock}' has no member '{member}'")]
  MissingMember { mock: String, member: String },

  #[error("member '{member}' of mock '{mock}' is not a method")]
  NotCallable { mock: String, member: String },

  #[error("{origin} raised: {message}")]
  Raised { origin: String, message: String },
}

impl Error {
  /// Builds a [`Error::Raised`], the error a function body or mock uses to
  /// signal its own failure.
  pub fn raised(origin: impl Into<String>, message: impl Into<String>) -> Self {
    Error::Raised {
      origin: origin.into(),
      message: message.into(),
    }
  }

  pub fn is_missing_argument(&self) -> bool {
    matches!(self, Error::MissingArgument { .. })
  }
}

/// A specialized `Result` type for `fibre_inject` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
