// src/engine/api.rs
//
// SvgDecoder: the public entry point. Owns a backend and its configuration,
// hands out single-use DecodeTasks and runs them synchronously or on the
// shared worker pool.

use crate::engine::backend::{BackendKind, RasterBackend};
use crate::engine::bridge::{CallbackBridge, CancelToken};
use crate::engine::common::run_with_panic_policy;
use crate::engine::decoder::{FontPolicy, ResvgBackend};
use crate::engine::firewall::FirewallConfig;
use crate::engine::pool;
use crate::engine::sniff::is_svg;
use crate::engine::tasks::{DecodeOutcome, DecodeTask};
use crate::engine::tracker::DecodeRecorder;
use crate::error::{Result, SvgDecodeError};
use crate::ops::DecodeRequest;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Decoder-wide settings.
#[derive(Clone, Debug)]
pub struct DecoderConfig {
    pub backend: BackendKind,
    pub font_policy: FontPolicy,
    pub firewall: FirewallConfig,
    /// Upper bound for both output edges, applied on top of each request's own clamp.
    /// `None` leaves requests unchanged.
    pub max_dimension: Option<u32>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            font_policy: FontPolicy::default(),
            firewall: FirewallConfig::default(),
            max_dimension: None,
        }
    }
}

impl DecoderConfig {
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_font_policy(mut self, font_policy: FontPolicy) -> Self {
        self.font_policy = font_policy;
        self
    }

    pub fn with_firewall(mut self, firewall: FirewallConfig) -> Self {
        self.firewall = firewall;
        self
    }

    pub fn with_max_dimension(mut self, max_dimension: Option<u32>) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    fn apply_to(&self, mut request: DecodeRequest) -> DecodeRequest {
        request.constraint.max_dimension = match (request.constraint.max_dimension, self.max_dimension) {
            (Some(requested), Some(cap)) => Some(requested.min(cap)),
            (requested, None) => requested,
            (None, cap) => cap,
        };
        request
    }
}

/// Decodes SVG documents into canonical RGBA bitmaps.
///
/// ```no_run
/// use lazy_svg::engine::SvgDecoder;
/// use lazy_svg::ops::{DecodeRequest, SizeConstraint};
///
/// let decoder = SvgDecoder::default();
/// let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64"/>"#;
/// let outcome = decoder
///     .decode(&svg[..], DecodeRequest::new(SizeConstraint::thumbnail()))
///     .unwrap();
/// assert!(outcome.is_applicable());
/// ```
pub struct SvgDecoder<B: RasterBackend = ResvgBackend> {
    backend: Arc<B>,
    config: DecoderConfig,
    recorder: Option<Arc<dyn DecodeRecorder>>,
}

impl SvgDecoder<ResvgBackend> {
    pub fn new(config: DecoderConfig) -> Self {
        let backend = match config.backend {
            BackendKind::Resvg => ResvgBackend::new(config.font_policy),
        };
        Self::with_backend(backend, config)
    }
}

impl Default for SvgDecoder<ResvgBackend> {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl<B: RasterBackend + 'static> SvgDecoder<B> {
    pub fn with_backend(backend: B, config: DecoderConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config,
            recorder: None,
        }
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn DecodeRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Cheap check a host can run on the first bytes of a stream.
    pub fn handles(&self, mime_type: Option<&str>, head: &[u8]) -> bool {
        is_svg(mime_type, head)
    }

    /// Build a task without sniffing. The task itself still sniffs when run.
    pub fn task(&self, source: impl Into<Arc<[u8]>>, request: DecodeRequest) -> DecodeTask<B> {
        let mut task = DecodeTask::new(Arc::clone(&self.backend), source, self.config.apply_to(request))
            .with_firewall(self.config.firewall.clone());
        if let Some(recorder) = &self.recorder {
            task = task.with_recorder(Arc::clone(recorder));
        }
        task
    }

    /// Decoder factory: a task when the source looks like SVG, `None` otherwise.
    pub fn create(
        &self,
        source: impl Into<Arc<[u8]>>,
        request: DecodeRequest,
    ) -> Option<DecodeTask<B>> {
        let source: Arc<[u8]> = source.into();
        if !self.handles(request.mime_type.as_deref(), &source) {
            return None;
        }
        Some(self.task(source, request))
    }

    /// Decode on the calling thread.
    pub fn decode(
        &self,
        source: impl Into<Arc<[u8]>>,
        request: DecodeRequest,
    ) -> Result<DecodeOutcome> {
        self.task(source, request).run()
    }

    /// Decode on the shared worker pool. Dropping the future cancels the decode.
    pub fn decode_async(
        &self,
        source: impl Into<Arc<[u8]>>,
        request: DecodeRequest,
    ) -> DecodeFuture {
        self.decode_async_with_cancel(source, request, CancelToken::new())
    }

    /// Like [`decode_async`](Self::decode_async), cancellable through `cancel`.
    pub fn decode_async_with_cancel(
        &self,
        source: impl Into<Arc<[u8]>>,
        request: DecodeRequest,
        cancel: CancelToken,
    ) -> DecodeFuture {
        let mut task = self.task(source, request).with_cancel_token(cancel.clone());
        let (bridge, receiver) = CallbackBridge::new();

        pool::get_pool().spawn(move || {
            if bridge.is_abandoned() {
                return;
            }
            let result = run_with_panic_policy("decode", || task.run());
            if !bridge.resolve(result) {
                tracing::debug!("svg decode finished after its future was dropped");
            }
        });

        DecodeFuture { receiver, cancel }
    }
}

/// Completes once with the decode outcome. Cancels the decode when dropped.
pub struct DecodeFuture {
    receiver: oneshot::Receiver<Result<DecodeOutcome>>,
    cancel: CancelToken,
}

impl DecodeFuture {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

impl Future for DecodeFuture {
    type Output = Result<DecodeOutcome>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(SvgDecodeError::internal_panic(
                "decode worker exited without a result",
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for DecodeFuture {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
