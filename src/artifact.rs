// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Writes rendered mosaics to disk for the `render` CLI subcommand.
///
/// Files are named `{owner}-{repo}.{png,svg}` inside the chosen output
/// directory, which is created on demand.
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{self, Error},
    render::{ImageFormat, RenderedImage},
    repo_url::RepositoryRef,
};

/// Location of a written artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct ArtifactLocation
{
    /// Path of the written file.
    pub path:  PathBuf,
    /// Size of the payload in bytes.
    pub bytes: usize,
}

/// Returns the path an artifact of `format` for `repository` is written to.
///
/// # Example
///
/// ```
/// use std::path::Path;
///
/// use contributor_mosaic::{ImageFormat, RepositoryRef, artifact_path};
///
/// let repository = RepositoryRef::new("acme", "widgets",).expect("valid names",);
/// let path = artifact_path(Path::new("out",), &repository, ImageFormat::Svg,);
/// assert_eq!(path, Path::new("out/acme-widgets.svg"));
/// ```
pub fn artifact_path(output_dir: &Path, repository: &RepositoryRef, format: ImageFormat,) -> PathBuf
{
    output_dir.join(format!("{}-{}.{}", repository.owner, repository.repo, format.extension()),)
}

/// Writes `image` for `repository` into `output_dir`.
///
/// # Errors
///
/// Returns [`Error::ArtifactIo`] when the directory cannot be created or the
/// file cannot be written.
pub fn write_artifact(
    output_dir: &Path,
    repository: &RepositoryRef,
    image: RenderedImage,
) -> Result<ArtifactLocation, Error,>
{
    fs::create_dir_all(output_dir,)
        .map_err(|source| error::artifact_io_error(output_dir, source,),)?;

    let format = match image {
        RenderedImage::Png(_,) => ImageFormat::Png,
        RenderedImage::Svg(_,) => ImageFormat::Svg,
    };
    let path = artifact_path(output_dir, repository, format,);
    let contents = image.into_bytes();

    let file = File::create(&path,).map_err(|source| error::artifact_io_error(&path, source,),)?;
    let mut writer = BufWriter::new(file,);
    writer.write_all(&contents,).map_err(|source| error::artifact_io_error(&path, source,),)?;
    writer.flush().map_err(|source| error::artifact_io_error(&path, source,),)?;

    info!("Wrote {} ({} bytes)", path.display(), contents.len());

    Ok(ArtifactLocation {
        path,
        bytes: contents.len(),
    },)
}
