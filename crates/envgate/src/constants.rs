//! Centralized constants for the envgate crate.
//!
//! This module contains default values used across the loader and resolver
//! to avoid duplicated literals.

// =============================================================================
// File Layer Defaults
// =============================================================================

/// Conventional base file name loaded when the caller does not name any files.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Process environment variable read for the environment discriminator when
/// the caller does not set one explicitly.
pub const ENVIRONMENT_VAR: &str = "APP_ENV";

// =============================================================================
// Validation
// =============================================================================

/// Stable message carried by every validation failure.
///
/// Per-field details are only emitted through the error log so that callers
/// can match on this message regardless of schema changes.
pub const VALIDATION_FAILED_MESSAGE: &str = "environment validation failed";

/// Header line of the multi-line validation report.
pub const VALIDATION_REPORT_HEADER: &str = "Invalid environment variables:";
