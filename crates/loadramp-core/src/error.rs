use thiserror::Error;

#[derive(Debug, Error)]
pub enum RampError {
    #[error("no archive reference in {0}: expected a line with an .spf token")]
    ArchiveRefNotFound(String),

    #[error("malformed archive reference line: {0:?}")]
    ArchiveRefMalformed(String),

    #[error("archive member {0:?} escapes the extraction root")]
    PathTraversal(String),

    #[error("expected exactly one export directory under {dir}, found {found}")]
    AmbiguousLayout { dir: String, found: usize },

    #[error("malformed profile document {file}: {source}")]
    ProfileParse {
        file: String,
        #[source]
        source: roxmltree::Error,
    },

    #[error("height value {value:?} in {file} is not a base-10 integer")]
    InvalidHeight { file: String, value: String },

    #[error("height value {value} in {file} overflows when doubled")]
    HeightOverflow { file: String, value: i64 },

    #[error("scenario file pairs {loads} load names with {heights} heights")]
    HeightMapMismatch { loads: usize, heights: usize },

    #[error("duplicate load name in scenario file: {0}")]
    DuplicateLoadName(String),

    #[error("harness did not succeed within {0} mutate cycles")]
    RetryLimit(u32),

    #[error("harness invocation failed: {0}")]
    Harness(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, RampError>;
