// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! JSON codec for the libp2p `request_response` protocol family.
//!
//! Wire format per message: `[4 bytes big-endian length][JSON payload]` —
//! the same length-prefixed framing the teacher's CBOR codec uses
//! (`sven-p2p/src/protocol/codec.rs`), rebuilt on `serde_json` since the
//! spec's External Interfaces table requires JSON framing on every named
//! protocol. Generalized over `Req`/`Resp` (rather than one fixed pair)
//! because this layer runs five distinct protocols instead of the
//! teacher's one.

use std::io;
use std::marker::PhantomData;

use async_trait::async_trait;
use futures::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use libp2p::{request_response, StreamProtocol};
use serde::{de::DeserializeOwned, Serialize};

const MAX_MSG_BYTES: usize = 4 * 1024 * 1024;

async fn write_framed<W, T>(io: &mut W, value: &T) -> io::Result<()>
where
    W: AsyncWrite + Unpin + Send,
    T: Serialize,
{
    let payload = serde_json::to_vec(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    if payload.len() > MAX_MSG_BYTES {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "message too large"));
    }
    let len = payload.len() as u32;
    io.write_all(&len.to_be_bytes()).await?;
    io.write_all(&payload).await?;
    io.close().await
}

async fn read_framed<R, T>(io: &mut R) -> io::Result<T>
where
    R: AsyncRead + Unpin + Send,
    T: DeserializeOwned,
{
    let mut len_buf = [0u8; 4];
    io.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_MSG_BYTES {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "incoming message too large"));
    }
    let mut payload = vec![0u8; len];
    io.read_exact(&mut payload).await?;
    serde_json::from_slice(&payload)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

/// A `request_response::Codec` over JSON-serializable `Req`/`Resp` pairs,
/// parameterized so each of the five named protocols gets its own codec
/// type without repeating the framing logic.
#[derive(Debug)]
pub struct JsonCodec<Req, Resp> {
    _marker: PhantomData<fn() -> (Req, Resp)>,
}

impl<Req, Resp> Clone for JsonCodec<Req, Resp> {
    fn clone(&self) -> Self {
        JsonCodec { _marker: PhantomData }
    }
}

impl<Req, Resp> Default for JsonCodec<Req, Resp> {
    fn default() -> Self {
        JsonCodec { _marker: PhantomData }
    }
}

#[async_trait]
impl<Req, Resp> request_response::Codec for JsonCodec<Req, Resp>
where
    Req: Serialize + DeserializeOwned + Send + 'static,
    Resp: Serialize + DeserializeOwned + Send + 'static,
{
    type Protocol = StreamProtocol;
    type Request = Req;
    type Response = Resp;

    async fn read_request<T>(&mut self, _proto: &StreamProtocol, io: &mut T) -> io::Result<Req>
    where
        T: AsyncRead + Unpin + Send,
    {
        read_framed(io).await
    }

    async fn read_response<T>(&mut self, _proto: &StreamProtocol, io: &mut T) -> io::Result<Resp>
    where
        T: AsyncRead + Unpin + Send,
    {
        read_framed(io).await
    }

    async fn write_request<T>(&mut self, _proto: &StreamProtocol, io: &mut T, req: Req) -> io::Result<()>
    where
        T: AsyncWrite + Unpin + Send,
    {
        write_framed(io, &req).await
    }

    async fn write_response<T>(
        &mut self,
        _proto: &StreamProtocol,
        io: &mut T,
        resp: Resp,
    ) -> io::Result<()>
    where
        T: AsyncWrite + Unpin + Send,
    {
        write_framed(io, &resp).await
    }
}

pub type CardCodec = JsonCodec<praxis_types::PeerCard, praxis_types::PeerCard>;
pub type ToolCodec = JsonCodec<praxis_types::ToolRequest, praxis_types::ToolResponse>;
pub type RpcCodec = JsonCodec<praxis_types::RpcEnvelope, praxis_types::RpcEnvelope>;
pub type A2aCodec = JsonCodec<praxis_types::JsonRpcRequest, praxis_types::JsonRpcResponse>;
pub type A2aCardCodec = JsonCodec<praxis_types::OpaqueA2ACard, praxis_types::OpaqueA2ACard>;

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Ping(u32);

    #[tokio::test]
    async fn a_framed_request_round_trips_through_the_buffer() {
        let mut codec: JsonCodec<Ping, Ping> = JsonCodec::default();
        let proto = StreamProtocol::new("/test/1.0.0");

        let mut buf = Vec::new();
        {
            let mut cursor = Cursor::new(&mut buf);
            request_response::Codec::write_request(&mut codec, &proto, &mut cursor, Ping(42))
                .await
                .unwrap();
        }

        let mut read_cursor = Cursor::new(&buf);
        let decoded: Ping =
            request_response::Codec::read_request(&mut codec, &proto, &mut read_cursor)
                .await
                .unwrap();
        assert_eq!(decoded, Ping(42));
    }

    #[tokio::test]
    async fn an_oversized_length_prefix_is_rejected() {
        let mut codec: JsonCodec<Ping, Ping> = JsonCodec::default();
        let proto = StreamProtocol::new("/test/1.0.0");
        let mut buf = (u32::MAX).to_be_bytes().to_vec();
        buf.extend_from_slice(b"{}");
        let mut cursor = Cursor::new(&buf);
        let err = request_response::Codec::read_request(&mut codec, &proto, &mut cursor)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
