use super::stats::SessionStats;
use crate::audio::AudioQueue;
use crate::config::RecognizerConfig;
use crate::error::SessionError;
use crate::gateway::{
    AudioEncoding, RecognitionClient, RequestStream, StreamingConfig, StreamingRequest,
    TranscriptionGateway,
};
use crate::transport::{Transcript, TranscriptSink};
use chrono::Utc;
use futures::StreamExt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Per-client streaming-session state machine.
///
/// A session owns the audio queue, the generation counter, and the
/// recognition-service client handle for one connected client. Each
/// "generation" is one attempt at an open recognition stream; a final result
/// retires the generation and opens the next one, while a stop or a service
/// fault retires it and leaves the session idle.
///
/// Concurrency discipline: the request producer, the result consumer, and
/// caller-driven `stop`/`start` all race over the shared state. Stale work
/// detects its own obsolescence by comparing its captured generation against
/// the current one at every suspension point, and must do nothing observable
/// after the numbers diverge.
pub struct RecognitionSession {
    shared: Arc<SessionShared>,
}

impl RecognitionSession {
    pub fn new(
        client_id: String,
        recognizer: RecognizerConfig,
        gateway: Arc<dyn TranscriptionGateway>,
        sink: Arc<dyn TranscriptSink>,
    ) -> Self {
        let (streaming, _) = watch::channel(false);
        let (generation, _) = watch::channel(1);
        let (cleanup_done, _) = watch::channel(true);

        Self {
            shared: Arc::new(SessionShared {
                client_id,
                recognizer,
                gateway,
                sink,
                queue: AudioQueue::new(),
                started_at: Utc::now(),
                streaming,
                generation,
                lifecycle: Mutex::new(StreamLifecycle {
                    spawned_generation: 0,
                    cleaned_generation: 0,
                }),
                cleanup_done,
                client: Mutex::new(None),
            }),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.shared.client_id
    }

    pub fn is_streaming(&self) -> bool {
        self.shared.is_streaming()
    }

    pub fn generation(&self) -> u64 {
        self.shared.generation()
    }

    /// Begins streaming. Launches the lifecycle task for the current
    /// generation unless one is already live, in which case this is a no-op.
    pub async fn start(&self) -> Result<(), SessionError> {
        Arc::clone(&self.shared).start_stream().await
    }

    /// Buffers a chunk for the recognizer. Never blocks; the queue is
    /// unbounded.
    pub async fn push_audio(&self, chunk: Vec<u8>) {
        self.shared.queue.push(chunk).await;
    }

    /// Stops streaming and returns once the session's resources are
    /// released. Safe to call at any time, including when no stream is
    /// active or when another stop already ran.
    pub async fn stop(&self) {
        self.shared.stop_stream().await;
    }

    pub async fn stats(&self) -> SessionStats {
        let shared = &self.shared;
        let duration = Utc::now().signed_duration_since(shared.started_at);

        SessionStats {
            streaming: shared.is_streaming(),
            generation: shared.generation(),
            started_at: shared.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            queued_chunks: shared.queue.len().await,
        }
    }
}

struct SessionShared {
    client_id: String,
    recognizer: RecognizerConfig,
    gateway: Arc<dyn TranscriptionGateway>,
    sink: Arc<dyn TranscriptSink>,
    queue: AudioQueue,
    started_at: chrono::DateTime<chrono::Utc>,

    /// Whether the client wants a stream active. Watched by producer loops
    /// so a stop wakes them even when the queue stays silent.
    streaming: watch::Sender<bool>,

    /// Current stream generation. Only ever increases. Watched by producer
    /// loops so a restart wakes them immediately.
    generation: watch::Sender<u64>,

    /// Bookkeeping that serializes start/restart/cleanup decisions.
    lifecycle: Mutex<StreamLifecycle>,

    /// Barrier that is true once the most recent cleanup cycle finished.
    /// Waiters must re-check `generation`/`streaming` after waking; a new
    /// cycle may already have begun.
    cleanup_done: watch::Sender<bool>,

    /// Lazily initialized service handle, released by cleanup so the next
    /// generation reinitializes its own.
    client: Mutex<Option<Arc<dyn RecognitionClient>>>,
}

struct StreamLifecycle {
    /// Generation that most recently had a streaming task spawned
    /// (0 = none yet).
    spawned_generation: u64,

    /// Generation whose cleanup already ran.
    cleaned_generation: u64,
}

impl SessionShared {
    fn is_streaming(&self) -> bool {
        *self.streaming.borrow()
    }

    fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// A generation that already ran a task never restarts in place: a fresh
    /// number is allocated so any straggler from the old task observes that
    /// it was superseded.
    fn start_stream(
        self: Arc<Self>,
    ) -> Pin<Box<dyn Future<Output = Result<(), SessionError>> + Send>> {
        Box::pin(async move {
        let config = streaming_config(&self.recognizer)?;

        let my_generation = loop {
            // A new generation may not begin until the previous cycle's
            // resources are fully released.
            self.wait_cleanup_done().await;

            let mut lifecycle = self.lifecycle.lock().await;
            if !*self.cleanup_done.borrow() {
                continue; // another cleanup cycle began while we locked
            }
            let current = self.generation();

            if self.is_streaming() && lifecycle.spawned_generation == current {
                debug!(
                    client_id = %self.client_id,
                    generation = current,
                    "recognition stream already active"
                );
                return Ok(());
            }

            let my_generation = if lifecycle.spawned_generation == current {
                self.generation.send_modify(|generation| *generation += 1);
                self.generation()
            } else {
                current
            };

            lifecycle.spawned_generation = my_generation;
            // (Re)opening a generation invalidates any earlier cleanup mark,
            // so a later fault for it still cleans up.
            lifecycle.cleaned_generation = my_generation - 1;
            self.streaming.send_replace(true);
            break my_generation;
        };

        info!(
            client_id = %self.client_id,
            generation = my_generation,
            "starting recognition stream"
        );

        let session = Arc::clone(&self);
        tokio::spawn(async move { session.streaming_task(my_generation, config).await });

        Ok(())
        })
    }

    async fn stop_stream(&self) {
        let generation = self.generation();
        info!(
            client_id = %self.client_id,
            generation,
            "stopping recognition session"
        );

        self.streaming.send_replace(false);
        self.cleanup_done.send_replace(false);

        // Zero-length sentinel: unblocks a producer suspended on the queue
        // and is forwarded as the terminal empty-audio request.
        self.queue.push(Vec::new()).await;

        self.cleanup(generation).await;
        self.wait_cleanup_done().await;
    }

    /// Full lifecycle of one stream generation: open the service call, feed
    /// it the request sequence, consume results until a final result, a
    /// fault, or exhaustion.
    async fn streaming_task(self: Arc<Self>, my_generation: u64, config: StreamingConfig) {
        let client = match self.initialize_client().await {
            Ok(client) => client,
            Err(error) => {
                warn!(
                    client_id = %self.client_id,
                    generation = my_generation,
                    %error,
                    "failed to initialize recognition client"
                );
                self.fail_generation(my_generation).await;
                return;
            }
        };

        let requests = Arc::clone(&self).request_stream(my_generation, config);
        let mut results = match client.streaming_recognize(requests).await {
            Ok(results) => results,
            Err(error) => {
                warn!(
                    client_id = %self.client_id,
                    generation = my_generation,
                    %error,
                    "recognition call failed"
                );
                self.fail_generation(my_generation).await;
                return;
            }
        };

        while let Some(item) = results.next().await {
            // Control may have been away for a while; a restart or a quick
            // stop/start can have superseded this generation meanwhile.
            if self.generation() != my_generation {
                debug!(
                    client_id = %self.client_id,
                    generation = my_generation,
                    "generation superseded, discarding result"
                );
                return;
            }

            match item {
                Ok(result) => {
                    for alternative in &result.alternatives {
                        self.sink
                            .deliver(
                                &self.client_id,
                                Transcript {
                                    text: alternative.transcript.clone(),
                                    is_final: result.is_final,
                                },
                            )
                            .await;
                    }

                    // A final result always ends this generation's task; the
                    // service treats it as an utterance boundary and the
                    // stream is reopened fresh.
                    if result.is_final {
                        self.restart_stream().await;
                        return;
                    }
                }
                Err(error) => {
                    warn!(
                        client_id = %self.client_id,
                        generation = my_generation,
                        %error,
                        "recognition stream failed"
                    );
                    self.fail_generation(my_generation).await;
                    return;
                }
            }
        }

        debug!(
            client_id = %self.client_id,
            generation = my_generation,
            "recognition stream ended"
        );
    }

    /// The lazy outbound request sequence for one generation: the config
    /// request, then one audio request per queued chunk. Liveness is
    /// re-checked before every emission; the sequence ends as soon as the
    /// session stops, the generation is superseded, or the stop sentinel
    /// comes through.
    fn request_stream(self: Arc<Self>, my_generation: u64, config: StreamingConfig) -> RequestStream {
        let generation_rx = self.generation.subscribe();
        let streaming_rx = self.streaming.subscribe();

        let opening = futures::stream::iter([StreamingRequest::Config(config)]);
        let audio = futures::stream::unfold(
            (self, generation_rx, streaming_rx, false),
            move |(session, mut generation_rx, mut streaming_rx, ended)| async move {
                if ended {
                    return None;
                }

                loop {
                    if !session.is_streaming() || session.generation() != my_generation {
                        return None;
                    }

                    tokio::select! {
                        biased;
                        chunk = session.queue.pop() => {
                            // The generation can have moved on while this
                            // producer was suspended. The chunk belongs to
                            // the successor: hand it back untouched.
                            if session.generation() != my_generation {
                                session.queue.push_front(chunk).await;
                                return None;
                            }
                            // Zero-length sentinel from stop(): forward it as
                            // the terminal empty-audio request, then end. A
                            // leftover sentinel found while still streaming
                            // goes out as a harmless empty request instead.
                            let ended = chunk.is_empty() && !session.is_streaming();
                            return Some((
                                StreamingRequest::Audio(chunk),
                                (session, generation_rx, streaming_rx, ended),
                            ));
                        }
                        _ = generation_rx.changed() => continue,
                        _ = streaming_rx.changed() => continue,
                    }
                }
            },
        );

        Box::pin(opening.chain(audio))
    }

    /// Restart choreography after a final result: retire the current
    /// generation, clean up, and reopen the stream unless the client stopped
    /// meanwhile.
    async fn restart_stream(self: Arc<Self>) {
        let next_generation = {
            let _lifecycle = self.lifecycle.lock().await;
            self.generation.send_modify(|generation| *generation += 1);
            self.generation()
        };

        debug!(
            client_id = %self.client_id,
            generation = next_generation,
            "final result, restarting recognition stream"
        );

        self.cleanup_done.send_replace(false);
        self.cleanup(next_generation).await;

        if !self.is_streaming() {
            return;
        }
        self.wait_cleanup_done().await;
        if !self.is_streaming() {
            return;
        }

        if let Err(error) = Arc::clone(&self).start_stream().await {
            warn!(
                client_id = %self.client_id,
                %error,
                "failed to reopen recognition stream"
            );
        }
    }

    /// Fault path: retire this generation without reconnecting. Reopening
    /// the stream takes an explicit `start`.
    async fn fail_generation(&self, my_generation: u64) {
        {
            let _lifecycle = self.lifecycle.lock().await;
            if self.generation() != my_generation {
                return; // already superseded, the newer cycle owns cleanup
            }
            self.streaming.send_replace(false);
        }

        self.cleanup(my_generation).await;
    }

    /// Releases the resources of `generation` and marks the cleanup barrier
    /// ready. Reentrant: concurrent callers converge on one outcome. The
    /// queue is swept and the client handle released at most once per
    /// generation transition; a call for an already-superseded generation
    /// leaves the successor's resources alone.
    async fn cleanup(&self, generation: u64) {
        let first_for_generation = {
            let mut lifecycle = self.lifecycle.lock().await;
            if self.generation() != generation {
                None
            } else if lifecycle.cleaned_generation == generation {
                Some(false)
            } else {
                lifecycle.cleaned_generation = generation;
                Some(true)
            }
        };

        match first_for_generation {
            None => {
                debug!(
                    client_id = %self.client_id,
                    generation,
                    "cleanup superseded by a newer generation"
                );
            }
            Some(first) => {
                let discarded = self.queue.drain().await;
                if first {
                    *self.client.lock().await = None;
                }

                debug!(
                    client_id = %self.client_id,
                    generation,
                    discarded,
                    "session cleanup complete"
                );
            }
        }

        self.cleanup_done.send_replace(true);
    }

    async fn wait_cleanup_done(&self) {
        let mut done = self.cleanup_done.subscribe();
        let _ = done.wait_for(|ready| *ready).await;
    }

    async fn initialize_client(&self) -> Result<Arc<dyn RecognitionClient>, SessionError> {
        let mut client = self.client.lock().await;
        match client.as_ref() {
            Some(handle) => Ok(Arc::clone(handle)),
            None => {
                let handle = self.gateway.open_client().await?;
                *client = Some(Arc::clone(&handle));
                Ok(handle)
            }
        }
    }
}

fn streaming_config(recognizer: &RecognizerConfig) -> Result<StreamingConfig, SessionError> {
    if recognizer.language_code.trim().is_empty() {
        return Err(SessionError::Config("language_code must not be empty".into()));
    }
    if recognizer.sample_rate_hertz == 0 {
        return Err(SessionError::Config("sample_rate_hertz must be positive".into()));
    }

    Ok(StreamingConfig {
        encoding: AudioEncoding::Linear16,
        sample_rate_hertz: recognizer.sample_rate_hertz,
        audio_channel_count: recognizer.audio_channel_count,
        language_code: recognizer.language_code.clone(),
        model: recognizer.model.clone(),
        enable_automatic_punctuation: recognizer.enable_automatic_punctuation,
        interim_results: recognizer.interim_results,
    })
}
