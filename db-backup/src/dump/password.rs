//! Database password resolution.
//!
//! The interactive prompt sits behind [`PasswordSource`] so the dump path
//! can be exercised without a terminal.

use std::borrow::Cow::{self, Borrowed, Owned};

use rustyline::config::Configurer;
use rustyline::highlight::Highlighter;
use rustyline::{ColorMode, Editor};
use rustyline_derive::{Completer, Helper, Hinter, Validator};

use crate::config::DatabaseConfig;
use crate::utils::errors::BackupError;

/// Provider of the database password when configuration carries none.
pub trait PasswordSource {
    fn obtain(&self) -> crate::Result<String>;
}

/// Masked interactive terminal prompt.
pub struct PromptPasswordSource;

#[derive(Completer, Helper, Hinter, Validator)]
struct MaskingHighlighter {
    masking: bool,
}

impl Highlighter for MaskingHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        use unicode_width::UnicodeWidthStr;
        if self.masking {
            Owned("*".repeat(line.width()))
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.masking
    }
}

impl PasswordSource for PromptPasswordSource {
    fn obtain(&self) -> crate::Result<String> {
        let helper = MaskingHighlighter { masking: true };
        let mut rl = Editor::new().map_err(|e| BackupError::Prompt(e.to_string()))?;
        rl.set_helper(Some(helper));
        rl.set_color_mode(ColorMode::Forced);
        rl.set_auto_add_history(false);

        let password = rl
            .readline("Database password: ")
            .map_err(|e| BackupError::Prompt(e.to_string()))?;
        Ok(password.trim_end_matches('\n').to_string())
    }
}

/// Resolve the database password before any connection attempt.
///
/// Configuration (which already absorbed the `DB_PASSWORD` environment
/// variable at load time) wins; the injected fallback source is consulted
/// only when configuration has nothing. An empty password from every source
/// is fatal.
pub fn resolve_password(
    database: &DatabaseConfig,
    fallback: &dyn PasswordSource,
) -> crate::Result<String> {
    if let Some(password) = &database.password {
        if !password.is_empty() {
            return Ok(password.clone());
        }
    }

    tracing::warn!("Database password not configured, falling back to prompt");
    let password = fallback.obtain()?;
    if password.is_empty() {
        return Err(BackupError::MissingCredential(
            "database password".to_string(),
        ));
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FixedSource {
        password: &'static str,
        calls: Cell<usize>,
    }

    impl FixedSource {
        fn new(password: &'static str) -> Self {
            Self {
                password,
                calls: Cell::new(0),
            }
        }
    }

    impl PasswordSource for FixedSource {
        fn obtain(&self) -> crate::Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.password.to_string())
        }
    }

    fn database(password: Option<&str>) -> DatabaseConfig {
        DatabaseConfig {
            host: "db.example.com".to_string(),
            port: 5432,
            name: "postgres".to_string(),
            user: "postgres".to_string(),
            password: password.map(|p| p.to_string()),
        }
    }

    #[test]
    fn test_configured_password_skips_fallback() {
        let source = FixedSource::new("prompted");

        let password = resolve_password(&database(Some("configured")), &source).unwrap();

        assert_eq!(password, "configured");
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn test_fallback_consulted_once_when_unconfigured() {
        let source = FixedSource::new("prompted");

        let password = resolve_password(&database(None), &source).unwrap();

        assert_eq!(password, "prompted");
        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn test_empty_everywhere_is_fatal() {
        let source = FixedSource::new("");

        let err = resolve_password(&database(Some("")), &source).unwrap_err();

        assert!(matches!(err, BackupError::MissingCredential(_)));
    }
}
