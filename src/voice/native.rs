//! Platform speech synthesis fallback
//!
//! Speaks through whatever voice command the OS ships: `espeak-ng` or
//! `espeak` on Linux, `say` on macOS, `System.Speech` via PowerShell on
//! Windows.

use std::path::PathBuf;

use crate::{Error, Result};

/// A resolved platform voice invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

/// Speaks text with the operating system's built-in voice
#[derive(Debug, Clone)]
pub struct NativeVoice {
    locale: String,
}

impl NativeVoice {
    /// Create a native voice for a locale (e.g. "en-US")
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    /// Speak text, waiting for the voice command to finish
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` if no voice command exists, `Tts` if it fails
    pub async fn speak(&self, text: &str) -> Result<()> {
        let command = plan_command(std::env::consts::OS, text, &self.locale, |name| {
            which::which(name).ok()
        })
        .ok_or_else(|| Error::Unsupported("no platform speech synthesis available".to_string()))?;

        tracing::debug!(program = %command.program.display(), "speaking with native voice");

        let status = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await?;

        if !status.success() {
            return Err(Error::Tts(format!(
                "{} exited with {status}",
                command.program.display()
            )));
        }
        Ok(())
    }
}

/// Pick the voice command for an OS, using `find` to locate binaries
pub fn plan_command<F>(os: &str, text: &str, locale: &str, find: F) -> Option<VoiceCommand>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    match os {
        "macos" => find("say").map(|program| VoiceCommand {
            program,
            args: vec![text.to_string()],
        }),
        "windows" => find("powershell").map(|program| VoiceCommand {
            program,
            args: vec![
                "-NoProfile".to_string(),
                "-Command".to_string(),
                format!(
                    "Add-Type -AssemblyName System.Speech; \
                     (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak('{}')",
                    text.replace('\'', "''")
                ),
            ],
        }),
        _ => ["espeak-ng", "espeak"]
            .iter()
            .find_map(|name| find(name))
            .map(|program| VoiceCommand {
                program,
                args: vec![
                    "-v".to_string(),
                    locale.to_lowercase(),
                    "--".to_string(),
                    text.to_string(),
                ],
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(available: &'static [&'static str]) -> impl Fn(&str) -> Option<PathBuf> {
        move |name| {
            available
                .contains(&name)
                .then(|| PathBuf::from(format!("/usr/bin/{name}")))
        }
    }

    #[test]
    fn linux_prefers_espeak_ng() {
        let cmd = plan_command("linux", "Hello", "en-US", only(&["espeak", "espeak-ng"])).unwrap();
        assert_eq!(cmd.program, PathBuf::from("/usr/bin/espeak-ng"));
        assert_eq!(cmd.args, ["-v", "en-us", "--", "Hello"]);
    }

    #[test]
    fn linux_falls_back_to_espeak() {
        let cmd = plan_command("linux", "Hello", "en-US", only(&["espeak"])).unwrap();
        assert_eq!(cmd.program, PathBuf::from("/usr/bin/espeak"));
    }

    #[test]
    fn macos_uses_say() {
        let cmd = plan_command("macos", "Hello", "en-US", only(&["say"])).unwrap();
        assert_eq!(cmd.args, ["Hello"]);
    }

    #[test]
    fn windows_escapes_quotes() {
        let cmd = plan_command("windows", "It's fine", "en-US", only(&["powershell"])).unwrap();
        assert!(cmd.args[2].contains("Speak('It''s fine')"));
    }

    #[test]
    fn nothing_installed_means_no_command() {
        assert!(plan_command("linux", "Hello", "en-US", only(&[])).is_none());
    }
}
