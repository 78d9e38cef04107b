use crate::service::{temp::TempFile, StorageBackend, StorageKey, StoreError};
use anyhow::Context;
use bytes::Bytes;
use futures::Stream;
use std::{
    fmt::Debug,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tempfile::{tempdir, TempDir};
use tokio::{
    fs::{create_dir_all, remove_file, File},
    io::AsyncWriteExt,
};
use tokio_util::io::ReaderStream;

/// A filesystem backed store
///
/// ## Layout
///
/// ```ignore
/// <base>/
///   content/
///     <digest[0..2]>/
///       <digest[2..4]>/
///         <digest> # file
/// ```
///
/// This limits the number of entries per directory.
#[derive(Clone, Debug)]
pub struct FileSystemBackend {
    content: PathBuf,
}

const NUM_LEVELS: usize = 2;

impl FileSystemBackend {
    pub async fn new(base: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let base = base.into();
        let content = base.join("content");

        create_dir_all(&content).await.with_context(|| {
            format!(
                "unable to create 'content' directory in the file system base: {}",
                base.display()
            )
        })?;

        Ok(Self { content })
    }

    /// Create a new storage for testing
    pub async fn for_test() -> anyhow::Result<(Self, TempDir)> {
        let dir = tempdir()?;

        Self::new(dir.path()).await.map(|result| (result, dir))
    }

    fn path_of(&self, key: &StorageKey) -> PathBuf {
        level_dir(&self.content, key.as_str(), NUM_LEVELS).join(key.as_str())
    }
}

impl StorageBackend for FileSystemBackend {
    type Error = std::io::Error;

    async fn store<E, S>(&self, stream: S) -> Result<StorageKey, StoreError<E, Self::Error>>
    where
        E: Debug,
        S: Stream<Item = Result<Bytes, E>>,
    {
        let file = TempFile::new(stream).await?;
        let key = file.key().clone();
        let mut source = file.into_reader().await.map_err(StoreError::Backend)?;

        let target = level_dir(&self.content, key.as_str(), NUM_LEVELS);
        create_dir_all(&target).await.map_err(StoreError::Backend)?;
        let target = target.join(key.as_str());

        let mut target = File::create(target).await.map_err(StoreError::Backend)?;
        tokio::io::copy(&mut source, &mut target)
            .await
            .map_err(StoreError::Backend)?;

        target.flush().await.map_err(StoreError::Backend)?;

        log::debug!("stored content: {key}");

        Ok(key)
    }

    async fn retrieve(
        &self,
        key: &StorageKey,
    ) -> Result<Option<impl Stream<Item = Result<Bytes, Self::Error>>>, Self::Error> {
        let target = self.path_of(key);

        log::debug!("Opening file: {}", target.display());

        let file = match File::open(&target).await {
            Ok(file) => Some(file),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => return Err(err),
        };

        Ok(file.map(ReaderStream::new))
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), Self::Error> {
        let target = self.path_of(key);

        log::debug!("Deleting file: {}", target.display());

        match remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

fn level_dir(base: impl AsRef<Path>, hash: &str, levels: usize) -> PathBuf {
    let prefixes = hash
        .chars()
        .take(levels * 2)
        .collect::<Vec<char>>()
        .chunks(2)
        .map(|chunk| chunk.iter().collect())
        .collect::<Vec<String>>();

    let mut path = base.as_ref().to_path_buf();

    for prefix in prefixes {
        path = path.join(prefix);
    }

    path
}
