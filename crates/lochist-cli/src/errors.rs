use console::style;
use lochist_core::LochistError;
use std::fmt;
use std::path::Path;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for a missing export file
pub fn file_not_found(path: &Path) -> CliError {
    CliError::new("Export file not found")
        .with_context(format!("The specified file does not exist.\n\nPath: {}", path.display()))
        .with_suggestion("Check the file path and try again")
        .with_suggestion("Use absolute path or path relative to current directory")
}

/// Create error for a file that is not a location-history export
pub fn malformed_input(path: &Path, reason: &str) -> CliError {
    CliError::new("Cannot read export file")
        .with_context(format!("Path: {}\nReason: {}", path.display(), reason))
        .with_suggestion("Make sure the file is a JSON location-history export")
        .with_suggestion("Exports must be a JSON object with a \"semanticSegments\" array")
}

/// Create error for a merge that found nothing to write
pub fn no_segments(file_count: usize) -> CliError {
    CliError::new("No valid segments were found")
        .with_context(format!(
            "None of the {} input file(s) contained any semantic segments.\n\nNo output was written.",
            file_count
        ))
        .with_suggestion("Check that the inputs are location-history exports")
        .with_help("Run: lochist merge --help")
}

/// Create error for a merge where some inputs could not be read
pub fn merge_inputs_failed(failed: &[String], output: &Path) -> CliError {
    CliError::new(format!("{} input file(s) could not be merged", failed.len()))
        .with_context(format!(
            "The readable inputs were merged into {}.\n\nFailed:\n  {}",
            output.display(),
            failed.join("\n  ")
        ))
        .with_suggestion("Fix or remove the failed inputs and run the merge again")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check lochist.toml for syntax errors")
        .with_suggestion("Or check LOCHIST_* environment variables")
        .with_help("Run: lochist config")
}

/// Create error for an invalid search location
pub fn invalid_location(reason: &str) -> CliError {
    CliError::new("Invalid search location")
        .with_context(format!("Reason: {}", reason))
        .with_suggestion("Latitude must be within [-90, 90] and longitude within [-180, 180]")
        .with_suggestion("Distance must be a non-negative number of meters")
        .with_help("Run: lochist visits --help")
}

/// Map a library error to a user-facing error
pub fn from_lochist(error: LochistError) -> CliError {
    match error {
        LochistError::ResourceNotFound { path } => file_not_found(&path),
        LochistError::MalformedInput { path, reason } => malformed_input(&path, &reason),
        LochistError::ConfigInvalid { key, reason } => invalid_config(&key, &reason),
        LochistError::InvalidCoordinate { value, reason } => {
            invalid_location(&format!("{}: {}", value, reason))
        }
        LochistError::GeocodingUnavailable { reason } => CliError::new("Geocoding service unavailable")
            .with_context(format!("Reason: {}", reason))
            .with_suggestion("Check the geocoder_url setting and your network connection")
            .with_suggestion("Or skip address lookup with --no-geocode"),
        other => CliError::new(other.to_string()),
    }
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    let error = match error.downcast::<LochistError>() {
        Ok(lochist) => return from_lochist(lochist),
        Err(other) => other,
    };

    let message = format!("{:#}", error);

    // Try to provide context based on error message
    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else if message.to_lowercase().contains("permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check file permissions")
            .with_suggestion("Or run with appropriate privileges")
    } else {
        CliError::new(message)
    }
}
