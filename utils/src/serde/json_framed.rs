use futures::SinkExt;
use futures_util::stream::TryStreamExt;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_serde::formats::Json;
use tokio_util::codec::LengthDelimitedCodec;

#[derive(Debug, Error)]
pub enum JsonFramedError {
    #[error("Serde read error")]
    SerdeReadError(#[source] std::io::Error),

    #[error("Serde write error")]
    SerdeWriteError(#[source] std::io::Error),

    #[error("Stream is closed")]
    StreamIsClosed(),
}

type Frame<Transport, RecvItem, SendItem> = tokio_serde::Framed<
    tokio_util::codec::Framed<Transport, LengthDelimitedCodec>,
    RecvItem,
    SendItem,
    Json<RecvItem, SendItem>,
>;

/// Length delimited JSON messages over an async byte stream.
pub struct JsonFramed<
    Transport: AsyncRead + AsyncWrite + Unpin,
    RecvItem: DeserializeOwned + Unpin,
    SendItem: Serialize + Unpin,
> {
    frame: Frame<Transport, RecvItem, SendItem>,
}

impl<
        Transport: AsyncRead + AsyncWrite + Unpin,
        RecvItem: DeserializeOwned + Unpin,
        SendItem: Serialize + Unpin,
    > JsonFramed<Transport, RecvItem, SendItem>
{
    pub fn new(stream: Transport) -> Self {
        let length_framed = tokio_util::codec::Framed::new(stream, LengthDelimitedCodec::new());

        Self {
            frame: tokio_serde::Framed::new(length_framed, Json::default()),
        }
    }

    pub async fn recv(&mut self) -> Result<RecvItem, JsonFramedError> {
        self.frame
            .try_next()
            .await
            .map_err(JsonFramedError::SerdeReadError)?
            .ok_or(JsonFramedError::StreamIsClosed())
    }

    pub async fn send(&mut self, item: SendItem) -> Result<(), JsonFramedError> {
        self.frame
            .send(item)
            .await
            .map_err(JsonFramedError::SerdeWriteError)
    }

    /// Sends one message and waits for the peer's answer.
    pub async fn request(&mut self, item: SendItem) -> Result<RecvItem, JsonFramedError> {
        self.send(item).await?;
        self.recv().await
    }
}
