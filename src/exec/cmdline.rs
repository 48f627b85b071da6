// src/exec/cmdline.rs

//! Structured command lines with credential masking.
//!
//! Commands are composed as discrete argument tokens, never as a shell
//! string, so values containing spaces or shell metacharacters cannot change
//! the command's meaning. The human-readable form used for logging is
//! rendered separately and has credential values redacted.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Redaction marker substituted for credential values in logged output.
pub const MASK: &str = "*****";

/// Flags whose following token is a credential value.
const SENSITIVE_FLAGS: [&str; 3] = ["-username", "-password", "-serial"];

/// Matches a sensitive flag and the value that follows it within free text,
/// case-insensitive.
static SENSITIVE_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(-username|-password|-serial)(\s+)(\S+)").expect("valid masking regex")
});

/// One external command: a program plus its argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Argument tokens exactly as they will be passed to process creation.
    pub fn argv(&self) -> &[String] {
        &self.args
    }

    /// Unmasked single-line rendering. Not for logging; use [`masked`].
    ///
    /// [`masked`]: CommandLine::masked
    pub fn display(&self) -> String {
        let mut out = self.program.display().to_string();
        for arg in &self.args {
            out.push(' ');
            out.push_str(arg);
        }
        out
    }

    /// Rendering safe for logs: credential values are replaced with
    /// [`MASK`]. The executed tokens are not affected.
    ///
    /// Masking works on the token list, not the joined string, so a
    /// credential containing whitespace is redacted whole. Tokens that are
    /// themselves free text (pass-through args) additionally go through
    /// [`mask_credentials`].
    pub fn masked(&self) -> String {
        let mut out = self.program.display().to_string();
        let mut mask_next = false;
        for arg in &self.args {
            out.push(' ');
            if mask_next {
                out.push_str(MASK);
                mask_next = false;
            } else if is_sensitive_flag(arg) {
                out.push_str(arg);
                mask_next = true;
            } else {
                out.push_str(&mask_credentials(arg));
            }
        }
        out
    }
}

fn is_sensitive_flag(token: &str) -> bool {
    SENSITIVE_FLAGS
        .iter()
        .any(|flag| token.eq_ignore_ascii_case(flag))
}

/// Replace the value following any of `-username`, `-password`, `-serial`
/// (case-insensitive) with [`MASK`] in free text.
pub fn mask_credentials(text: &str) -> String {
    SENSITIVE_VALUE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            format!("{}{}{}", &caps[1], &caps[2], MASK)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_hides_all_credential_values() {
        let cmd = CommandLine::new("unity-editor")
            .arg("-batchmode")
            .args(["-username", "alice"])
            .args(["-password", "secret"])
            .args(["-serial", "XYZ123"])
            .arg("-quit");

        let masked = cmd.masked();
        assert!(!masked.contains("alice"));
        assert!(!masked.contains("secret"));
        assert!(!masked.contains("XYZ123"));
        assert_eq!(
            masked,
            "unity-editor -batchmode -username ***** -password ***** -serial ***** -quit"
        );
    }

    #[test]
    fn masked_redacts_multiword_credentials_whole() {
        let cmd = CommandLine::new("unity-editor")
            .args(["-password", "open sesame"])
            .arg("-quit");

        let masked = cmd.masked();
        assert!(!masked.contains("open"));
        assert!(!masked.contains("sesame"));
        assert_eq!(masked, "unity-editor -password ***** -quit");
    }

    #[test]
    fn executed_tokens_are_not_masked() {
        let cmd = CommandLine::new("unity-editor")
            .args(["-username", "alice"])
            .args(["-password", "secret"])
            .args(["-serial", "XYZ123"]);

        assert_eq!(
            cmd.argv(),
            ["-username", "alice", "-password", "secret", "-serial", "XYZ123"]
        );
        assert!(cmd.display().contains("alice"));
    }

    #[test]
    fn masking_is_case_insensitive() {
        let masked = mask_credentials("-USERNAME Alice -Password hunter2");
        assert_eq!(masked, "-USERNAME ***** -Password *****");
    }

    #[test]
    fn non_sensitive_flags_are_untouched() {
        let text = "docker run --rm -v /a:/b sample -batchmode";
        assert_eq!(mask_credentials(text), text);
    }
}
