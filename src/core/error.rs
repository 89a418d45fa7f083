//! Error types for nwb-inspector with contextual messages and exit codes
//!
//! Configuration mistakes, registry conflicts and illegal grouping requests are
//! programmer/user errors and surface here. Failures *inside* a check never do:
//! the engine turns those into messages instead.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for nwb-inspector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (I/O)
  System = 2,
  /// Inspection finished and reported critical issues or check errors
  Issues = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for nwb-inspector
#[derive(Debug)]
pub enum InspectorError {
  /// Check configuration errors (selection, threshold, overrides)
  Config(ConfigError),

  /// Check registry conflicts
  Registry(RegistryError),

  /// Invalid organize request
  Organize(OrganizeError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl InspectorError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    InspectorError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    InspectorError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      InspectorError::Message { message, context, help } => InspectorError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      InspectorError::Io(err) => InspectorError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      InspectorError::Config(_) => ExitCode::User,
      InspectorError::Registry(_) => ExitCode::User,
      InspectorError::Organize(_) => ExitCode::User,
      InspectorError::Io(_) => ExitCode::System,
      InspectorError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      InspectorError::Config(e) => e.help_message(),
      InspectorError::Registry(e) => e.help_message(),
      InspectorError::Organize(e) => e.help_message(),
      InspectorError::Message { help, .. } => help.clone(),
      InspectorError::Io(_) => None,
    }
  }
}

impl fmt::Display for InspectorError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      InspectorError::Config(e) => write!(f, "{}", e),
      InspectorError::Registry(e) => write!(f, "{}", e),
      InspectorError::Organize(e) => write!(f, "{}", e),
      InspectorError::Io(e) => write!(f, "I/O error: {}", e),
      InspectorError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for InspectorError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      InspectorError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for InspectorError {
  fn from(err: io::Error) -> Self {
    InspectorError::Io(err)
  }
}

impl From<String> for InspectorError {
  fn from(msg: String) -> Self {
    InspectorError::message(msg)
  }
}

impl From<&str> for InspectorError {
  fn from(msg: &str) -> Self {
    InspectorError::message(msg)
  }
}

impl From<ConfigError> for InspectorError {
  fn from(err: ConfigError) -> Self {
    InspectorError::Config(err)
  }
}

impl From<RegistryError> for InspectorError {
  fn from(err: RegistryError) -> Self {
    InspectorError::Registry(err)
  }
}

impl From<OrganizeError> for InspectorError {
  fn from(err: OrganizeError) -> Self {
    InspectorError::Organize(err)
  }
}

impl From<toml_edit::de::Error> for InspectorError {
  fn from(err: toml_edit::de::Error) -> Self {
    InspectorError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for InspectorError {
  fn from(err: serde_json::Error) -> Self {
    InspectorError::message(format!("JSON error: {}", err))
  }
}

impl From<rayon::ThreadPoolBuildError> for InspectorError {
  fn from(err: rayon::ThreadPoolBuildError) -> Self {
    InspectorError::message(format!("Failed to build worker pool: {}", err))
  }
}

/// Convert anyhow::Error to InspectorError (errors raised by check authors)
impl From<anyhow::Error> for InspectorError {
  fn from(err: anyhow::Error) -> Self {
    InspectorError::message(err.to_string())
  }
}

/// Check configuration errors
///
/// All of these are raised before any object is inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
  /// Both `select` and `ignore` were supplied
  SelectAndIgnore,

  /// Threshold is not one of the three ordinary importance levels
  InvalidThreshold { value: String },

  /// Override table key is not an importance level or SKIP
  UnknownOverrideTarget { key: String },

  /// Importance name could not be parsed
  UnknownImportance { value: String },

  /// Override file not found
  NotFound { path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::SelectAndIgnore => Some("Use either --select or --ignore, not both.".to_string()),
      ConfigError::InvalidThreshold { .. } => {
        Some("Choose from CRITICAL, BEST_PRACTICE_VIOLATION, BEST_PRACTICE_SUGGESTION.".to_string())
      }
      ConfigError::UnknownOverrideTarget { .. } => Some(
        "Override keys must be CRITICAL, BEST_PRACTICE_VIOLATION, BEST_PRACTICE_SUGGESTION or SKIP.".to_string(),
      ),
      ConfigError::NotFound { .. } => Some("Check the --config-path argument.".to_string()),
      ConfigError::UnknownImportance { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::SelectAndIgnore => write!(f, "Options 'ignore' and 'select' cannot both be used"),
      ConfigError::InvalidThreshold { value } => {
        write!(f, "Indicated importance threshold ({}) is not a valid importance level", value)
      }
      ConfigError::UnknownOverrideTarget { key } => {
        write!(f, "Unknown override target '{}' in check configuration", key)
      }
      ConfigError::UnknownImportance { value } => write!(f, "Unknown importance level '{}'", value),
      ConfigError::NotFound { path } => write!(f, "Check configuration not found: {}", path.display()),
    }
  }
}

impl std::error::Error for ConfigError {}

/// Check registry errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
  /// A different check is already registered under this name
  DuplicateName { name: String },
}

impl RegistryError {
  fn help_message(&self) -> Option<String> {
    match self {
      RegistryError::DuplicateName { name } => Some(format!("Rename one of the checks registered as '{}'.", name)),
    }
  }
}

impl fmt::Display for RegistryError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RegistryError::DuplicateName { name } => {
        write!(f, "A different check is already registered under the name '{}'", name)
      }
    }
  }
}

/// Invalid organize request (assertion-style: identifies the offending input)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizeError {
  /// No levels given
  EmptyLevels,

  /// The free-text message cannot be a grouping key
  IllegalLevel { name: String },

  /// Not a message attribute at all
  UnknownLevel { name: String },

  /// `reverse` length does not match `levels`
  ReverseLength { levels: usize, reverse: usize },
}

impl OrganizeError {
  fn help_message(&self) -> Option<String> {
    match self {
      OrganizeError::IllegalLevel { .. } | OrganizeError::UnknownLevel { .. } => Some(
        "Levels must be message attributes other than the text message: importance, severity, check_name, \
         object_type, object_name, location, file."
          .to_string(),
      ),
      _ => None,
    }
  }
}

impl fmt::Display for OrganizeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OrganizeError::EmptyLevels => write!(f, "At least one level is required to organize messages"),
      OrganizeError::IllegalLevel { name } => write!(
        f,
        "Illegal grouping key '{}': levels must be message attributes, not including the text message",
        name
      ),
      OrganizeError::UnknownLevel { name } => write!(f, "Unknown grouping key '{}': not a message attribute", name),
      OrganizeError::ReverseLength { levels, reverse } => write!(
        f,
        "Length of reverse ({}) must match the number of levels ({})",
        reverse, levels
      ),
    }
  }
}

/// Result type alias for nwb-inspector
pub type InspectorResult<T> = Result<T, InspectorError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> InspectorResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> InspectorResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<InspectorError>,
{
  fn context(self, ctx: impl Into<String>) -> InspectorResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> InspectorResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &InspectorError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
