// Pure pipeline wiring: state machines behind bounded channels.
//
// A full output channel blocks the worker, which stops draining its input
// channel, which blocks the producer. Bytes already produced sit in the
// channel until accepted; nothing is dropped or reordered.

use std::io::Write;
use std::thread;

use bytes::Bytes;
use crossbeam::channel::{bounded, Receiver, Sender};
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::multihash::{EnvelopeDecoder, EnvelopeError, PayloadChunk};
use crate::padding::{PaddedBlock, PaddingError, Segmenter};
use crate::stream::io::OrderedBlockWriter;
use crate::stream::types::InputChunk;
use crate::telemetry::StreamCounters;
use crate::types::StreamError;

/// Output of the decoder stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderEvent {
    Payload(PayloadChunk),
    /// The current message failed; the stage keeps running.
    Failed(EnvelopeError),
}

/// Output of the segmenter stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmenterEvent {
    Block(PaddedBlock),
    /// The current message failed; the stage keeps running.
    Failed(PaddingError),
}

/// Handle on a running stage worker.
///
/// The worker exits once every input `Sender` is dropped (or the output
/// receiver goes away); `join` then yields its counters.
#[derive(Debug)]
pub struct StageWorker {
    handle: thread::JoinHandle<StreamCounters>,
}

impl StageWorker {
    pub fn join(self) -> Result<StreamCounters, StreamError> {
        self.handle
            .join()
            .map_err(|_| StreamError::Pipeline("stage worker panicked"))
    }
}

// ============================================================
// Envelope decoder stage
// ============================================================
pub fn spawn_envelope_decoder(
    config: &PipelineConfig,
) -> Result<(Sender<InputChunk>, Receiver<DecoderEvent>, StageWorker), StreamError> {
    config.validate()?;
    let (in_tx, in_rx) = bounded::<InputChunk>(config.channel_capacity);
    let (out_tx, out_rx) = bounded::<DecoderEvent>(config.channel_capacity);
    let mut decoder = EnvelopeDecoder::new(&config.decoder);

    let handle = thread::Builder::new()
        .name("envelope-decoder".into())
        .spawn(move || {
            debug!("decoder stage starting");
            for chunk in in_rx.iter() {
                let event = match decoder.push(&chunk) {
                    Ok(Some(payload)) => DecoderEvent::Payload(payload),
                    Ok(None) => continue,
                    Err(e) => DecoderEvent::Failed(e),
                };
                if out_tx.send(event).is_err() {
                    warn!("decoder output closed, stopping");
                    break;
                }
            }
            debug!("decoder stage finished");
            decoder.counters().clone()
        })?;

    Ok((in_tx, out_rx, StageWorker { handle }))
}

// ============================================================
// Segmenter stage
// ============================================================
pub fn spawn_segmenter(
    config: &PipelineConfig,
) -> Result<(Sender<InputChunk>, Receiver<SegmenterEvent>, StageWorker), StreamError> {
    config.validate()?;
    let (in_tx, in_rx) = bounded::<InputChunk>(config.channel_capacity);
    let (out_tx, out_rx) = bounded::<SegmenterEvent>(config.channel_capacity);
    let mut segmenter = Segmenter::new(config.segmenter.params)?;

    let handle = thread::Builder::new()
        .name("segmenter".into())
        .spawn(move || {
            debug!("segmenter stage starting");
            'chunks: for chunk in in_rx.iter() {
                let events: Vec<SegmenterEvent> = match segmenter.push_chunk(&chunk) {
                    Ok(blocks) => blocks.into_iter().map(SegmenterEvent::Block).collect(),
                    Err(e) => vec![SegmenterEvent::Failed(e)],
                };
                for event in events {
                    if out_tx.send(event).is_err() {
                        warn!("segmenter output closed, stopping");
                        break 'chunks;
                    }
                }
            }
            debug!("segmenter stage finished");
            segmenter.counters().clone()
        })?;

    Ok((in_tx, out_rx, StageWorker { handle }))
}

// ============================================================
// Multi-message padding
// ============================================================

/// Outcome of [`pad_messages_parallel`].
#[derive(Debug, Default)]
pub struct BatchReport {
    pub counters: StreamCounters,
    /// Messages that failed, by index; they wrote nothing.
    pub failures: Vec<(u64, PaddingError)>,
}

/// Pad independent messages on `config.workers` threads, one `Segmenter`
/// per message, and write the blocks to `writer` in message order.
///
/// A failing message is reported in the `BatchReport` and skipped; the
/// others are still written.
pub fn pad_messages_parallel<W: Write>(
    messages: &[Bytes],
    writer: &mut W,
    config: &PipelineConfig,
) -> Result<BatchReport, StreamError> {
    config.validate()?;
    let params = config.segmenter.params;

    // ---- Channels ----
    let (msg_tx, msg_rx) = bounded::<(u64, Bytes)>(config.channel_capacity);
    let (out_tx, out_rx) = bounded::<(u64, Result<Vec<PaddedBlock>, PaddingError>, StreamCounters)>(
        config.channel_capacity,
    );

    let mut report = BatchReport::default();

    thread::scope(|scope| {
        // ---- Reader ----
        scope.spawn(move || {
            for (index, message) in messages.iter().enumerate() {
                if msg_tx.send((index as u64, message.clone())).is_err() {
                    warn!("padding workers gone, stopping dispatch");
                    break;
                }
            }
        });

        // ---- Workers ----
        for i in 0..config.workers {
            let rx = msg_rx.clone();
            let tx = out_tx.clone();
            scope.spawn(move || {
                debug!(worker = i, "padding worker starting");
                for (index, message) in rx.iter() {
                    // fresh instance per message: no state crosses messages
                    let (result, counters) = match Segmenter::new(params) {
                        Ok(mut segmenter) => {
                            let result = segmenter.push(&message).and_then(|mut blocks| {
                                blocks.extend(segmenter.finish()?);
                                Ok(blocks)
                            });
                            (result, segmenter.counters().clone())
                        }
                        Err(e) => (Err(e), StreamCounters::default()),
                    };
                    if tx.send((index, result, counters)).is_err() {
                        break;
                    }
                }
                debug!(worker = i, "padding worker finished");
            });
        }
        drop(msg_rx);
        drop(out_tx);

        // ---- Ordered writer ----
        // Owns the receiver: an early return drops it, so blocked workers
        // see a closed channel and exit instead of stalling the scope.
        let mut ordered = OrderedBlockWriter::new(writer);
        for (index, result, counters) in out_rx {
            report.counters.merge(&counters);
            match result {
                Ok(blocks) => ordered.push(index, Some(blocks))?,
                Err(e) => {
                    warn!(index, error = %e, "message failed");
                    report.failures.push((index, e));
                    ordered.push(index, None)?;
                }
            }
        }
        ordered.finish()?;

        if ordered.next_index() != messages.len() as u64 {
            return Err(StreamError::Pipeline("padding workers exited early"));
        }
        Ok::<(), StreamError>(())
    })?;

    report.failures.sort_by_key(|(index, _)| *index);
    Ok(report)
}
