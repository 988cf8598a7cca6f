//! Metadata extraction through `exiftool`.

use std::path::{Path, PathBuf};
use std::process::Command;

use auphorg_catalog::TAG_NAMES;
use auphorg_core::{MetadataProvider, ProviderError, TagMap};

/// Runs `exiftool -s` for the catalogued tags and parses its
/// `Name : value` output.
#[derive(Debug, Clone)]
pub struct ExifTool {
    program: PathBuf,
}

impl ExifTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command-line arguments for one file: `-s -Model ... -FileName <path>`.
    fn args(path: &Path) -> Vec<std::ffi::OsString> {
        let mut args: Vec<std::ffi::OsString> = vec!["-s".into()];
        args.extend(TAG_NAMES.iter().map(|t| format!("-{}", t).into()));
        args.push("-FileName".into());
        args.push(path.as_os_str().to_owned());
        args
    }
}

impl Default for ExifTool {
    fn default() -> Self {
        Self::new("exiftool")
    }
}

impl MetadataProvider for ExifTool {
    fn metadata(&self, path: &Path) -> Result<TagMap, ProviderError> {
        let tool = self.program.to_string_lossy().into_owned();
        let output = Command::new(&self.program)
            .args(Self::args(path))
            .output()
            .map_err(|e| ProviderError::tool(&tool, e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() && stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::tool(tool, stderr.trim().to_string()));
        }

        Ok(parse_short_output(&stdout))
    }
}

/// Parse `exiftool -s` output into a tag map.
///
/// The tag name ends at the first colon; values may contain colons (dates).
/// Lines without a name are ignored.
pub fn parse_short_output(output: &str) -> TagMap {
    output
        .lines()
        .filter_map(|line| {
            let (name, value) = line.split_once(':')?;
            let name = name.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_tag_lines() {
        let output = "\
FileName                        : trip.jpg
Model                           : Canon X
DateTimeOriginal                : 2009:07:14 10:00:00
ImageWidth                      : 4000
Keywords                        : beach, sunset
";
        let map = parse_short_output(output);
        assert_eq!(map.len(), 5);
        assert_eq!(map["Model"], "Canon X");
        assert_eq!(map["DateTimeOriginal"], "2009:07:14 10:00:00");
        assert_eq!(map["Keywords"], "beach, sunset");
    }

    #[test]
    fn ignores_noise_lines() {
        let output = "    1 image files read\n: orphan\nimage files read ok : 1\n";
        assert!(parse_short_output(output).is_empty());
    }

    #[test]
    fn requests_every_catalogued_tag() {
        let args = ExifTool::args(Path::new("/p/trip.jpg"));
        assert_eq!(args.len(), TAG_NAMES.len() + 3);
        assert_eq!(args[0], "-s");
        assert_eq!(args[1], "-Model");
        assert_eq!(args[args.len() - 1], "/p/trip.jpg");
    }

    #[test]
    fn missing_program_is_a_tool_error() {
        let tool = ExifTool::new("/nonexistent/exiftool");
        let err = tool.metadata(Path::new("/p/trip.jpg")).unwrap_err();
        assert!(matches!(err, ProviderError::Tool { .. }));
    }
}
