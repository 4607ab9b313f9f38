//! Shell command line for one export.

use std::fmt;
use std::path::Path;

use crate::error::CommandLineError;
use crate::types::ExportMode;

/// A complete command line, ready for `sh -c`.
///
/// Tool, document and output directory are quoted individually. The mode's
/// subcommand is inserted as-is so it can carry several arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(String);

impl CommandLine {
    /// Build `'<tool>' <subcommand> '<document>' --output='<dir>'`.
    pub fn build(
        tool: &Path,
        mode: &ExportMode,
        document: &Path,
        output_dir: &Path,
    ) -> Result<Self, CommandLineError> {
        let tool = quote("tool_path", tool)?;
        let document = quote("document", document)?;
        let output_flag = format!("--output={}", utf8("output_dir", output_dir)?);
        let output = quote_str("output_dir", &output_flag)?;

        Ok(Self(format!(
            "{} {} {} {}",
            tool,
            mode.subcommand.trim(),
            document,
            output
        )))
    }

    /// Wrap an already-formed command line.
    pub fn raw(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn utf8<'a>(field: &'static str, path: &'a Path) -> Result<&'a str, CommandLineError> {
    path.to_str().ok_or_else(|| CommandLineError::Unquotable {
        field,
        value: path.to_string_lossy().into_owned(),
    })
}

fn quote(field: &'static str, path: &Path) -> Result<String, CommandLineError> {
    quote_str(field, utf8(field, path)?)
}

fn quote_str(field: &'static str, value: &str) -> Result<String, CommandLineError> {
    shlex::try_quote(value)
        .map(|quoted| quoted.into_owned())
        .map_err(|_| CommandLineError::Unquotable {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModeLabel;
    use std::path::PathBuf;

    fn list_mode() -> ExportMode {
        ExportMode::new(
            ModeLabel::new("list").unwrap(),
            "export presentation --formats=list",
        )
    }

    #[test]
    fn test_build_splits_back_into_arguments() {
        let cmd = CommandLine::build(
            Path::new("/Applications/Sketch Experimental.app/Contents/MacOS/sketchtool"),
            &list_mode(),
            Path::new("/home/me/docs/My Deck.sketch"),
            Path::new("/tmp/load_test-abc"),
        )
        .unwrap();

        let args = shlex::split(cmd.as_str()).unwrap();
        assert_eq!(
            args,
            vec![
                "/Applications/Sketch Experimental.app/Contents/MacOS/sketchtool",
                "export",
                "presentation",
                "--formats=list",
                "/home/me/docs/My Deck.sketch",
                "--output=/tmp/load_test-abc",
            ]
        );
    }

    #[test]
    fn test_single_quotes_survive() {
        let cmd = CommandLine::build(
            Path::new("/bin/tool"),
            &list_mode(),
            Path::new("/docs/Bob's deck.sketch"),
            Path::new("/tmp/out"),
        )
        .unwrap();

        let args = shlex::split(cmd.as_str()).unwrap();
        assert_eq!(args[4], "/docs/Bob's deck.sketch");
    }

    #[test]
    fn test_nul_byte_rejected() {
        let document = PathBuf::from("bad\0name.sketch");
        let result = CommandLine::build(
            Path::new("/bin/tool"),
            &list_mode(),
            &document,
            Path::new("/tmp/out"),
        );
        assert!(matches!(
            result,
            Err(CommandLineError::Unquotable {
                field: "document",
                ..
            })
        ));
    }

    #[test]
    fn test_display_matches_as_str() {
        let cmd = CommandLine::raw("true");
        assert_eq!(cmd.to_string(), "true");
    }
}
