use super::StorageKey;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use sha2::{Digest, Sha256};
use std::{fmt::Debug, io::SeekFrom, pin::pin};
use tempfile::tempfile;
use tokio::{
    fs::File,
    io::{AsyncSeekExt, AsyncWriteExt},
};

use super::StoreError;

/// Writes the contents of a stream to a temporary file, digesting it on the way.
///
/// The digest provides the key for writing the contents to their final location.
pub struct TempFile {
    file: File,
    key: StorageKey,
}

impl TempFile {
    pub async fn new<E, S>(stream: S) -> Result<Self, StoreError<E, std::io::Error>>
    where
        E: Debug,
        S: Stream<Item = Result<Bytes, E>>,
    {
        let mut stream = pin!(stream);
        let mut file = File::from(tempfile().map_err(StoreError::Backend)?);
        let mut digest = Sha256::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(StoreError::Stream)?;
            digest.update(&chunk);
            file.write_all(&chunk).await.map_err(StoreError::Backend)?;
        }
        file.flush().await.map_err(StoreError::Backend)?;

        Ok(Self {
            file,
            key: StorageKey(hex::encode(digest.finalize())),
        })
    }

    pub fn key(&self) -> &StorageKey {
        &self.key
    }

    /// Return the temp file, positioned at the start
    pub async fn into_reader(mut self) -> Result<File, std::io::Error> {
        self.file.seek(SeekFrom::Start(0)).await?;
        Ok(self.file)
    }
}
