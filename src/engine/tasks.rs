// src/engine/tasks.rs
//
// Decode task: one SVG document, one request, one pass through
// sniff -> parse/resolve -> rasterize -> normalize.
// Tasks are single-use; the caller owns retry policy.

use crate::engine::backend::RasterBackend;
use crate::engine::bridge::CancelToken;
use crate::engine::decoder::ResvgBackend;
use crate::engine::firewall::FirewallConfig;
use crate::engine::normalize::{normalize, CanonicalBitmap};
use crate::engine::sizing::{check_dimensions, resolve, RenderSize};
use crate::engine::sniff::{is_svg, SVG_DETECT_BUFFER_SIZE};
use crate::engine::tracker::DecodeRecorder;
use crate::error::SvgDecodeError;
use crate::ops::DecodeRequest;
use crate::{DecodeMetrics, DECODE_METRICS_VERSION};
use std::sync::Arc;
use std::time::Instant;

type TaskResult<T> = std::result::Result<T, SvgDecodeError>;

/// Pipeline position of a [`DecodeTask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecodeState {
    Idle,
    SniffingFormat,
    ResolvingSize,
    Rasterizing,
    Normalizing,
    Done,
    Failed,
}

impl DecodeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DecodeState::Done | DecodeState::Failed)
    }

    fn can_advance_to(self, next: DecodeState) -> bool {
        use DecodeState::*;
        match (self, next) {
            (Idle, SniffingFormat)
            | (SniffingFormat, ResolvingSize)
            | (ResolvingSize, Rasterizing)
            | (Rasterizing, Normalizing)
            | (Normalizing, Done) => true,
            // negative sniff finishes without decoding
            (SniffingFormat, Done) => true,
            (Idle, Failed) | (Done, _) | (Failed, _) => false,
            (_, Failed) => true,
            _ => false,
        }
    }
}

/// A finished decode.
#[derive(Clone, Debug)]
pub struct DecodeResult {
    pub bitmap: CanonicalBitmap,
    /// Source is resolution independent; the host may decode again at another size.
    pub is_vector: bool,
    pub metrics: DecodeMetrics,
}

/// What a decode produced. `NotApplicable` means "not SVG, try the next decoder".
#[derive(Clone, Debug)]
pub enum DecodeOutcome {
    NotApplicable,
    Decoded(DecodeResult),
}

impl DecodeOutcome {
    pub fn is_applicable(&self) -> bool {
        matches!(self, DecodeOutcome::Decoded(_))
    }

    pub fn into_result(self) -> Option<DecodeResult> {
        match self {
            DecodeOutcome::Decoded(result) => Some(result),
            DecodeOutcome::NotApplicable => None,
        }
    }
}

/// Stage timings for one decode, in milliseconds.
struct MetricsRecorder {
    metrics: DecodeMetrics,
    start_total: Instant,
    stage_start: Instant,
}

impl MetricsRecorder {
    fn new(backend: &'static str, input_size: usize) -> Self {
        let now = Instant::now();
        Self {
            metrics: DecodeMetrics {
                backend: backend.to_string(),
                bytes_in: input_size as u64,
                ..DecodeMetrics::default()
            },
            start_total: now,
            stage_start: now,
        }
    }

    fn lap(&mut self) -> f64 {
        let elapsed = self.stage_start.elapsed().as_secs_f64() * 1000.0;
        self.stage_start = Instant::now();
        elapsed
    }

    fn mark_sniff_done(&mut self) {
        self.metrics.sniff_ms = self.lap();
    }

    fn mark_parse_done(&mut self, intrinsic_width: f32, intrinsic_height: f32) {
        self.metrics.parse_ms = self.lap();
        self.metrics.intrinsic_width = intrinsic_width;
        self.metrics.intrinsic_height = intrinsic_height;
    }

    fn mark_render_done(&mut self, size: RenderSize) {
        self.metrics.render_ms = self.lap();
        self.metrics.output_width = size.width;
        self.metrics.output_height = size.height;
    }

    fn finalize(mut self) -> DecodeMetrics {
        self.metrics.normalize_ms = self.lap();
        self.metrics.total_ms = self.start_total.elapsed().as_secs_f64() * 1000.0;
        self.metrics.version = DECODE_METRICS_VERSION.to_string();
        self.metrics
    }
}

/// A single-use decode of one SVG document.
pub struct DecodeTask<B: RasterBackend = ResvgBackend> {
    backend: Arc<B>,
    source: Arc<[u8]>,
    request: DecodeRequest,
    firewall: FirewallConfig,
    recorder: Option<Arc<dyn DecodeRecorder>>,
    cancel: CancelToken,
    state: DecodeState,
    history: Vec<DecodeState>,
}

impl<B: RasterBackend> DecodeTask<B> {
    pub fn new(backend: Arc<B>, source: impl Into<Arc<[u8]>>, request: DecodeRequest) -> Self {
        Self {
            backend,
            source: source.into(),
            request,
            firewall: FirewallConfig::default(),
            recorder: None,
            cancel: CancelToken::new(),
            state: DecodeState::Idle,
            history: vec![DecodeState::Idle],
        }
    }

    pub fn with_firewall(mut self, firewall: FirewallConfig) -> Self {
        self.firewall = firewall;
        self
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn DecodeRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Every state the task has been in, starting with `Idle`.
    pub fn history(&self) -> &[DecodeState] {
        &self.history
    }

    pub fn request(&self) -> &DecodeRequest {
        &self.request
    }

    fn advance(&mut self, next: DecodeState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal decode transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::trace!(from = ?self.state, to = ?next, "decode state");
        self.state = next;
        self.history.push(next);
    }

    /// Run the pipeline to completion. A task runs at most once.
    pub fn run(&mut self) -> TaskResult<DecodeOutcome> {
        if self.state != DecodeState::Idle {
            return Err(SvgDecodeError::invalid_argument(
                "state",
                format!("{:?}", self.state),
                "decode task already ran; create a new task to decode again",
            ));
        }

        match self.run_stages() {
            Ok(outcome) => {
                self.advance(DecodeState::Done);
                Ok(outcome)
            }
            Err(err) => {
                if err.is_cancelled() {
                    tracing::debug!(error = %err, "svg decode cancelled");
                } else {
                    tracing::warn!(
                        backend = self.backend.name(),
                        error = %err,
                        category = err.category().as_str(),
                        "svg decode failed"
                    );
                }
                self.advance(DecodeState::Failed);
                Err(err)
            }
        }
    }

    fn run_stages(&mut self) -> TaskResult<DecodeOutcome> {
        let backend = Arc::clone(&self.backend);
        let source = Arc::clone(&self.source);
        let mut recorder = MetricsRecorder::new(backend.name(), source.len());

        // 1. Sniff
        self.advance(DecodeState::SniffingFormat);
        self.cancel
            .check("sniff")
            .map_err(|e| e.at_stage("sniff", None))?;
        let head = &source[..source.len().min(SVG_DETECT_BUFFER_SIZE)];
        if !is_svg(self.request.mime_type.as_deref(), head) {
            tracing::debug!(bytes = source.len(), "not an svg, declining");
            return Ok(DecodeOutcome::NotApplicable);
        }
        self.firewall
            .enforce_source_len(source.len())
            .map_err(|e| e.at_stage("sniff", None))?;
        recorder.mark_sniff_done();

        // 2. Parse + resolve
        self.advance(DecodeState::ResolvingSize);
        self.cancel
            .check("parse")
            .map_err(|e| e.at_stage("parse", None))?;
        let document = backend
            .parse(&source)
            .map_err(|e| e.at_stage("parse", None))?;
        let intrinsic = backend.intrinsic_size(&document);
        recorder.mark_parse_done(intrinsic.width, intrinsic.height);

        let size = resolve(intrinsic, &self.request.constraint, self.request.density)
            .map_err(|e| e.at_stage("resolve", None))?;
        check_dimensions(size.width, size.height)
            .and_then(|_| self.firewall.enforce_pixels(size.width, size.height))
            .map_err(|e| e.at_stage("resolve", Some(size)))?;

        // 3. Rasterize
        self.advance(DecodeState::Rasterizing);
        self.cancel
            .check("render")
            .map_err(|e| e.at_stage("render", Some(size)))?;
        let raw = backend
            .render(&document, size.width, size.height)
            .map_err(|e| e.at_stage("render", Some(size)))?;
        drop(document);
        if (raw.width, raw.height) != (size.width, size.height) {
            return Err(SvgDecodeError::render_failed(
                size.width,
                size.height,
                format!("backend returned {}x{}", raw.width, raw.height),
            )
            .at_stage("render", Some(size)));
        }
        self.cancel
            .check("normalize")
            .map_err(|e| e.at_stage("normalize", Some(size)))?;
        recorder.mark_render_done(size);

        // 4. Normalize
        self.advance(DecodeState::Normalizing);
        let bitmap = normalize(raw).map_err(|e| e.at_stage("normalize", Some(size)))?;

        let metrics = recorder.finalize();
        if let Some(sink) = self.recorder.as_ref() {
            sink.record(backend.name(), self.request.model_key.as_deref(), &metrics);
        }

        Ok(DecodeOutcome::Decoded(DecodeResult {
            bitmap,
            is_vector: true,
            metrics,
        }))
    }
}
