//! Per-run knobs shared by every front end.

use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Options for assigning branch ids to snapshot files.
#[derive(Debug, Clone, Default)]
pub struct AssignOptions {
    /// Where to write the result: a file, or a directory for batches.
    pub output: Option<PathBuf>,
    /// Overwrite each input file.
    pub in_place: bool,
    /// Pretty-print JSON written to stdout.
    pub pretty: bool,
    /// Stamp `generated_at` with the current time.
    pub stamp: bool,
}

impl AssignOptions {
    pub fn in_place() -> Self {
        Self {
            in_place: true,
            ..Self::default()
        }
    }

    pub fn to_output(path: impl Into<PathBuf>) -> Self {
        Self {
            output: Some(path.into()),
            ..Self::default()
        }
    }

    /// Reject combinations that cannot be honored for `inputs` files.
    pub fn validate(&self, inputs: usize) -> AppResult<()> {
        if self.in_place && self.output.is_some() {
            return Err(AppError::InvalidInput(
                "--in-place and --output are mutually exclusive".to_string(),
            ));
        }
        if inputs > 1 {
            if let Some(output) = &self.output {
                if !output.is_dir() {
                    return Err(AppError::InvalidInput(format!(
                        "{} must be a directory when assigning {} files",
                        output.display(),
                        inputs
                    )));
                }
            }
        }
        Ok(())
    }

    /// File the result for `input` goes to; `None` means "do not write".
    pub fn target_for(&self, input: &Path) -> Option<PathBuf> {
        if self.in_place {
            return Some(input.to_path_buf());
        }
        let output = self.output.as_ref()?;
        if output.is_dir() {
            input.file_name().map(|name| output.join(name))
        } else {
            Some(output.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusive_flags_rejected() {
        let options = AssignOptions {
            output: Some("out.json".into()),
            in_place: true,
            ..AssignOptions::default()
        };
        assert!(matches!(options.validate(1), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn batch_output_must_be_a_directory() {
        let file = AssignOptions::to_output("pn_app_not_a_dir.json");
        assert!(file.validate(1).is_ok());
        assert!(file.validate(2).is_err());

        let dir = AssignOptions::to_output(std::env::temp_dir());
        assert!(dir.validate(3).is_ok());
        assert_eq!(
            dir.target_for(Path::new("nets/a.json")),
            Some(std::env::temp_dir().join("a.json"))
        );
    }

    #[test]
    fn targets() {
        let input = Path::new("net.yaml");
        assert_eq!(AssignOptions::default().target_for(input), None);
        assert_eq!(AssignOptions::in_place().target_for(input), Some(input.to_path_buf()));
        assert_eq!(
            AssignOptions::to_output("x.json").target_for(input),
            Some(PathBuf::from("x.json"))
        );
    }
}
