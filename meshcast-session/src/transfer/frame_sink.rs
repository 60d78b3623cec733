use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_state::RTCDataChannelState;

/// Writable end of a data channel, as seen by the transfer protocol.
#[async_trait]
pub trait FrameSink: Send + Sync {
    fn channel_label(&self) -> String;

    fn is_open(&self) -> bool;

    async fn send_text_frame(&self, text: String) -> Result<()>;

    async fn send_binary_frame(&self, data: Bytes) -> Result<()>;

    /// Bytes queued in the transport but not yet on the wire.
    async fn pending_bytes(&self) -> usize;
}

#[async_trait]
impl FrameSink for RTCDataChannel {
    fn channel_label(&self) -> String {
        self.label().to_owned()
    }

    fn is_open(&self) -> bool {
        self.ready_state() == RTCDataChannelState::Open
    }

    async fn send_text_frame(&self, text: String) -> Result<()> {
        self.send_text(text).await?;
        Ok(())
    }

    async fn send_binary_frame(&self, data: Bytes) -> Result<()> {
        self.send(&data).await?;
        Ok(())
    }

    async fn pending_bytes(&self) -> usize {
        self.buffered_amount().await
    }
}
