//! The seven ordered probe steps.

/// One check in the probe sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Step {
    BucketAccess,
    Write,
    Read,
    Url,
    Exists,
    Metadata,
    Delete,
}

impl Step {
    /// One-based position in the sequence.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Progress line printed before the step runs.
    pub fn heading(self) -> String {
        let (icon, title) = match self {
            Self::BucketAccess => ("📦", "Checking bucket access"),
            Self::Write => ("📝", "Writing test file"),
            Self::Read => ("📖", "Reading test file"),
            Self::Url => ("🔗", "Resolving file URL"),
            Self::Exists => ("🔍", "Checking file existence"),
            Self::Metadata => ("📊", "Fetching file metadata"),
            Self::Delete => ("🗑️ ", "Deleting test file"),
        };
        format!("{icon} Check {}: {title}...", self.number())
    }
}
