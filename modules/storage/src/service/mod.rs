pub mod fs;
mod temp;


use bytes::{Bytes, BytesMut};
use futures::{Stream, TryStreamExt};
use std::fmt::{Debug, Display, Formatter};
use std::future::Future;
use std::str::FromStr;

/// The key of stored content, the hex encoded SHA-256 digest of the content.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid storage key, must be a hex encoded SHA-256 digest")]
pub struct InvalidKey;

impl FromStr for StorageKey {
    type Err = InvalidKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(InvalidKey)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError<S: Debug, B: Debug> {
    #[error("stream error: {0:?}")]
    Stream(S),
    #[error("backend error: {0:?}")]
    Backend(B),
}

pub trait StorageBackend {
    type Error: Debug;

    /// Store the content from a stream
    fn store<E, S>(
        &self,
        stream: S,
    ) -> impl Future<Output = Result<StorageKey, StoreError<E, Self::Error>>>
    where
        E: Debug,
        S: Stream<Item = Result<Bytes, E>>;

    /// Store a buffer
    fn store_buf(
        &self,
        data: Bytes,
    ) -> impl Future<Output = Result<StorageKey, StoreError<std::convert::Infallible, Self::Error>>>
    {
        self.store(futures::stream::once(async move { Ok(data) }))
    }

    /// Retrieve the content as a stream
    fn retrieve(
        &self,
        key: &StorageKey,
    ) -> impl Future<Output = Result<Option<impl Stream<Item = Result<Bytes, Self::Error>>>, Self::Error>>;

    /// Retrieve the content as a byte buffer
    fn retrieve_buf(
        &self,
        key: &StorageKey,
    ) -> impl Future<Output = Result<Option<Bytes>, Self::Error>> {
        async move {
            Ok(match self.retrieve(key).await? {
                Some(stream) => Some(stream.try_collect::<BytesMut>().await?.freeze()),
                None => None,
            })
        }
    }

    /// Delete the content. Deleting missing content is not an error.
    fn delete(&self, key: &StorageKey) -> impl Future<Output = Result<(), Self::Error>>;
}

#[cfg(test)]
mod key_test {
    use super::*;

    #[test]
    fn parse_key() {
        const DIGEST: &str = "A591A6D40BF420404A011733CFB7B190D62C65BF0BCDA32B57B277D9AD9F146E";
        let key: StorageKey = DIGEST.parse().expect("valid key");
        assert_eq!(key.to_string(), DIGEST.to_ascii_lowercase());

        assert!("../../etc/passwd".parse::<StorageKey>().is_err());
        assert!("abc".parse::<StorageKey>().is_err());
    }
}
