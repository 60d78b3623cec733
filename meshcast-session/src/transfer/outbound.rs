use crate::transfer::frame_sink::FrameSink;
use bytes::Bytes;
use meshcast_core::{ChannelMessage, TransferError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

const MAX_BACKPRESSURE_WAIT: Duration = Duration::from_secs(10);
const BACKPRESSURE_POLL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSendReport {
    pub channel: String,
    pub bytes: u64,
    pub chunks: usize,
}

/// Splits `data` into `chunk_size` slices without copying. The last one may be shorter.
pub fn chunks(data: &Bytes, chunk_size: usize) -> Vec<Bytes> {
    let chunk_size = chunk_size.max(1);
    (0..data.len())
        .step_by(chunk_size)
        .map(|start| data.slice(start..(start + chunk_size).min(data.len())))
        .collect()
}

/// Waits until `next` more bytes fit under `high_water` in the sink's queue.
/// Gives up waiting after ten seconds and lets the caller send anyway.
pub async fn wait_for_buffer_space(
    sink: &dyn FrameSink,
    next: usize,
    high_water: usize,
) -> Result<(), TransferError> {
    if !sink.is_open() {
        return Err(TransferError::ChannelClosed(sink.channel_label()));
    }
    if sink.pending_bytes().await + next <= high_water {
        return Ok(());
    }

    let buffered = sink.pending_bytes().await;
    debug!(
        channel = %sink.channel_label(),
        buffered,
        next_msg = next,
        high_watermark = high_water,
        "Applying backpressure"
    );

    let deadline = Instant::now() + MAX_BACKPRESSURE_WAIT;
    loop {
        if !sink.is_open() {
            return Err(TransferError::ChannelClosed(sink.channel_label()));
        }
        if sink.pending_bytes().await + next <= high_water {
            return Ok(());
        }
        if Instant::now() >= deadline {
            break;
        }
        tokio::time::sleep(BACKPRESSURE_POLL).await;
    }

    warn!(
        "Buffer on '{}' still above {} bytes after {:?}, sending anyway",
        sink.channel_label(),
        high_water,
        MAX_BACKPRESSURE_WAIT
    );
    Ok(())
}

/// Sends `file-meta` followed by the raw chunks on a single channel.
pub async fn send_file(
    sink: &dyn FrameSink,
    name: &str,
    data: Bytes,
    chunk_size: usize,
    high_water: usize,
) -> Result<FileSendReport, TransferError> {
    if !sink.is_open() {
        return Err(TransferError::ChannelClosed(sink.channel_label()));
    }

    let meta = ChannelMessage::FileMeta {
        name: name.to_owned(),
        size: data.len() as u64,
    }
    .encode()?;
    sink.send_text_frame(meta)
        .await
        .map_err(|e| TransferError::Send(format!("{:?}", e)))?;

    let pieces = chunks(&data, chunk_size);
    let count = pieces.len();
    for piece in pieces {
        wait_for_buffer_space(sink, piece.len(), high_water).await?;
        sink.send_binary_frame(piece)
            .await
            .map_err(|e| TransferError::Send(format!("{:?}", e)))?;
    }

    info!(
        "Sent '{}' ({} bytes, {} chunks) on '{}'",
        name,
        data.len(),
        count,
        sink.channel_label()
    );

    Ok(FileSendReport {
        channel: sink.channel_label(),
        bytes: data.len() as u64,
        chunks: count,
    })
}
