use std::{
    borrow::Cow,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::ext::PathDisplayExt;

pub const MIRROR_FILE_NAME: &str = "mirror.yaml";

const SOURCE_KEY: &str = "source";
const DESTINATION_KEY: &str = "destination";

pub fn default_mirror_file_path(root: &Path) -> PathBuf {
    root.join(MIRROR_FILE_NAME)
}

/// Roots declared in a `mirror.yaml` file.
///
/// ```yaml
/// source: Assets/TPromise
/// destination: ../upm/com.metaversemagna.tpromise
/// ```
///
/// Relative paths are resolved against the directory holding the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorFile {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
}

impl MirrorFile {
    /// Reads the file at `path`, failing if it cannot be read.
    pub async fn read(path: &Path) -> Result<Self, MirrorFileError> {
        debug!("Opening mirror file: {}", path.best_effort_path_display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read mirror file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        let parsed = Self::try_from(contents.as_str())?;

        let base = path.parent().unwrap_or(Path::new(""));
        Ok(parsed.relative_to(base))
    }

    /// Like [`MirrorFile::read`], but a file that does not exist yields an empty config.
    pub async fn read_if_present(path: &Path) -> Result<Self, MirrorFileError> {
        match Self::read(path).await {
            Err(MirrorFileError::ReadError { source, .. }) if source.kind() == ErrorKind::NotFound => {
                debug!(
                    "No mirror file at {}, relying on command line roots",
                    path.best_effort_path_display()
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    fn relative_to(self, base: &Path) -> Self {
        Self {
            source: self.source.map(|path| base.join(path)),
            destination: self.destination.map(|path| base.join(path)),
        }
    }

    fn path_setting(
        top_level: &LinkedHashMap<Yaml, Yaml>,
        key: &'static str,
    ) -> Result<Option<PathBuf>, MirrorFileError> {
        match top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(key)))) {
            None | Some(Yaml::Value(Scalar::Null)) => Ok(None),
            Some(value) => value
                .as_str()
                .map(|path| Some(PathBuf::from(path)))
                .context(NotAStringSnafu { key }),
        }
    }
}

impl TryFrom<&str> for MirrorFile {
    type Error = MirrorFileError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedConfigSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        Ok(MirrorFile {
            source: Self::path_setting(top_level, SOURCE_KEY)?,
            destination: Self::path_setting(top_level, DESTINATION_KEY)?,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum MirrorFileError {
    #[snafu(display("Failed to read the mirror file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Mirror file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the mirror file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted mirror file"))]
    MalformedConfig,
    #[snafu(display("Top level of the mirror file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Setting '{}' should be a path string", key))]
    NotAString { key: String },
}
