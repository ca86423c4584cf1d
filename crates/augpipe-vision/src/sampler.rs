//! Parameter Sampler - Keyed Draws and Probabilistic Gating
//!
//! Every augmentation draws a candidate parameter per sample and then an
//! independent uniform gate. Where the gate fails the parameter is replaced
//! by its neutral value (zero). Gating is a `select` over two fully computed
//! tensors, so cost never depends on which samples were gated on.
//!
//! Randomness is reached through the [`RandomSource`] trait. [`KeyedSource`]
//! is the production source; [`ScriptedSource`] replays fixed draws.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::collections::VecDeque;

use augpipe_core::error::{Error, Result};
use augpipe_core::key::{KeyStream, PrngKey};
use augpipe_tensor::{broadcast_scalar, random, Tensor};
use tracing::trace;

// =============================================================================
// RandomSource Trait
// =============================================================================

/// Provider of keyed random tensors.
pub trait RandomSource {
    /// Uniform values in `[0, 1)`.
    fn uniform(&mut self, key: PrngKey, shape: &[usize]) -> Result<Tensor<f32>>;

    /// Standard normal values.
    fn normal(&mut self, key: PrngKey, shape: &[usize]) -> Result<Tensor<f32>>;

    /// Integers in `[low, high)`.
    fn randint(&mut self, key: PrngKey, shape: &[usize], low: i32, high: i32)
        -> Result<Tensor<i32>>;
}

// =============================================================================
// KeyedSource
// =============================================================================

/// Draws from `augpipe_tensor::random`, fully determined by the key.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedSource;

impl RandomSource for KeyedSource {
    fn uniform(&mut self, key: PrngKey, shape: &[usize]) -> Result<Tensor<f32>> {
        Ok(random::uniform(key, shape))
    }

    fn normal(&mut self, key: PrngKey, shape: &[usize]) -> Result<Tensor<f32>> {
        Ok(random::normal(key, shape))
    }

    fn randint(
        &mut self,
        key: PrngKey,
        shape: &[usize],
        low: i32,
        high: i32,
    ) -> Result<Tensor<i32>> {
        random::randint(key, shape, low, high)
    }
}

// =============================================================================
// ScriptedSource
// =============================================================================

/// Replays caller-provided draws, ignoring keys.
///
/// Queued draws are consumed first, in order, whatever the distribution.
/// Once the queue is empty, draws are filled with the constant fallbacks
/// if any were configured; otherwise the source reports exhaustion.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    script: VecDeque<Vec<f32>>,
    uniform_fill: Option<f32>,
    normal_fill: Option<f32>,
    integer_fill: Option<i32>,
}

impl ScriptedSource {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A source that answers every draw with the same constants.
    #[must_use]
    pub fn constant(uniform: f32, normal: f32, integer: i32) -> Self {
        Self {
            script: VecDeque::new(),
            uniform_fill: Some(uniform),
            normal_fill: Some(normal),
            integer_fill: Some(integer),
        }
    }

    /// Queues one draw; its length must match the requested shape.
    pub fn push(&mut self, values: Vec<f32>) {
        self.script.push_back(values);
    }

    /// Builder form of [`ScriptedSource::push`].
    #[must_use]
    pub fn with_draw(mut self, values: Vec<f32>) -> Self {
        self.push(values);
        self
    }

    /// Number of queued draws not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    fn next(&mut self, shape: &[usize], fill: Option<f32>) -> Result<Tensor<f32>> {
        match self.script.pop_front() {
            Some(values) => Tensor::from_vec(values, shape),
            None => fill
                .map(|value| Tensor::full(shape, value))
                .ok_or_else(|| Error::invalid_operation("scripted random source exhausted")),
        }
    }
}

impl RandomSource for ScriptedSource {
    fn uniform(&mut self, _key: PrngKey, shape: &[usize]) -> Result<Tensor<f32>> {
        let fill = self.uniform_fill;
        self.next(shape, fill)
    }

    fn normal(&mut self, _key: PrngKey, shape: &[usize]) -> Result<Tensor<f32>> {
        let fill = self.normal_fill;
        self.next(shape, fill)
    }

    fn randint(
        &mut self,
        _key: PrngKey,
        shape: &[usize],
        low: i32,
        high: i32,
    ) -> Result<Tensor<i32>> {
        let fill = self.integer_fill.map(|v| v as f32);
        let draw = self.next(shape, fill)?.map(|v| v.round() as i32);
        if draw.to_vec().iter().any(|v| !(low..high).contains(v)) {
            return Err(Error::invalid_operation(format!(
                "scripted integer draw outside [{low}, {high})"
            )));
        }
        Ok(draw)
    }
}

// =============================================================================
// Sampler
// =============================================================================

/// Hands out one fresh sub-key per draw and gates candidates per sample.
pub struct Sampler<'a> {
    source: &'a mut dyn RandomSource,
    keys: KeyStream,
    p: f32,
    batch: usize,
}

impl<'a> Sampler<'a> {
    /// Creates a sampler for a batch of `batch` samples.
    pub fn new(source: &'a mut dyn RandomSource, key: PrngKey, p: f32, batch: usize) -> Self {
        Self {
            source,
            keys: KeyStream::new(key),
            p,
            batch,
        }
    }

    /// Batch size N.
    #[must_use]
    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Number of sub-keys handed out so far.
    #[must_use]
    pub fn draws(&self) -> u64 {
        self.keys.consumed()
    }

    /// Uniform draw of `shape`.
    pub fn uniform(&mut self, shape: &[usize]) -> Result<Tensor<f32>> {
        let key = self.keys.next_key();
        self.source.uniform(key, shape)
    }

    /// Normal draw of `shape`.
    pub fn normal(&mut self, shape: &[usize]) -> Result<Tensor<f32>> {
        let key = self.keys.next_key();
        self.source.normal(key, shape)
    }

    /// Integer draw of `shape` in `[low, high)`, as floats.
    pub fn randint(&mut self, shape: &[usize], low: i32, high: i32) -> Result<Tensor<f32>> {
        let key = self.keys.next_key();
        Ok(self.source.randint(key, shape, low, high)?.map(|v| v as f32))
    }

    /// Per-sample gate: `uniform[N] < probability`.
    pub fn gate(&mut self, probability: f32) -> Result<Tensor<bool>> {
        let n = self.batch;
        Ok(self.uniform(&[n])?.map(|u| u < probability))
    }

    /// Gates `candidate` (leading axis N) with probability `weight · p`.
    pub fn gated(
        &mut self,
        effect: &'static str,
        candidate: &Tensor<f32>,
        weight: f32,
    ) -> Result<Tensor<f32>> {
        let probability = weight * self.p;
        self.gated_with_probability(effect, candidate, probability)
    }

    /// Gates `candidate` with an explicit probability (no `p` factor).
    pub fn gated_with_probability(
        &mut self,
        effect: &'static str,
        candidate: &Tensor<f32>,
        probability: f32,
    ) -> Result<Tensor<f32>> {
        let mask = self.gate(probability)?;
        let active = mask.to_vec().iter().filter(|&&on| on).count();
        trace!(effect, probability, active, batch = self.batch, "gated draw");
        Tensor::select(&mask, candidate, &broadcast_scalar(0.0, candidate.shape()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_sampler_is_reproducible() {
        let draw = |seed| {
            let mut source = KeyedSource;
            let mut sampler = Sampler::new(&mut source, PrngKey::new(seed), 1.0, 8);
            let a = sampler.normal(&[8]).unwrap();
            let b = sampler.uniform(&[8]).unwrap();
            (a, b, sampler.draws())
        };
        let (a1, b1, n1) = draw(42);
        let (a2, b2, _) = draw(42);
        assert_eq!(a1, a2);
        assert_eq!(b1, b2);
        assert_eq!(n1, 2);
        assert_ne!(draw(43).0, a1);
    }

    #[test]
    fn test_consecutive_draws_use_fresh_keys() {
        let mut source = KeyedSource;
        let mut sampler = Sampler::new(&mut source, PrngKey::new(1), 1.0, 16);
        let a = sampler.uniform(&[16]).unwrap();
        let b = sampler.uniform(&[16]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_gate_zero_weight_yields_neutral() {
        let mut source = KeyedSource;
        let mut sampler = Sampler::new(&mut source, PrngKey::new(3), 1.0, 32);
        let candidate = Tensor::full(&[32], 5.0f32);
        let gated = sampler.gated("test", &candidate, 0.0).unwrap();
        assert!(gated.to_vec().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_gate_full_weight_keeps_candidate() {
        let mut source = KeyedSource;
        let mut sampler = Sampler::new(&mut source, PrngKey::new(3), 1.0, 32);
        let candidate = Tensor::full(&[32, 2], 5.0f32);
        let gated = sampler.gated("test", &candidate, 1.0).unwrap();
        assert_eq!(gated, candidate);
    }

    #[test]
    fn test_global_multiplier_scales_probability() {
        let mut source = ScriptedSource::new().with_draw(vec![0.3, 0.7]);
        let mut sampler = Sampler::new(&mut source, PrngKey::new(0), 0.5, 2);
        let candidate = Tensor::from_vec(vec![1.0f32, 2.0], &[2]).unwrap();
        let gated = sampler.gated("test", &candidate, 1.0).unwrap();
        assert_eq!(gated.to_vec(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_explicit_probability_ignores_p() {
        let mut source = ScriptedSource::constant(0.4, 0.0, 0);
        let mut sampler = Sampler::new(&mut source, PrngKey::new(0), 0.0, 3);
        let candidate = Tensor::full(&[3], 2.0f32);
        let gated = sampler
            .gated_with_probability("test", &candidate, 0.5)
            .unwrap();
        assert_eq!(gated.to_vec(), vec![2.0; 3]);
    }

    #[test]
    fn test_scripted_source_replays_then_falls_back() {
        let mut source = ScriptedSource::constant(0.25, -1.0, 1).with_draw(vec![0.5, 0.75]);
        assert_eq!(source.remaining(), 1);
        let key = PrngKey::new(0);
        assert_eq!(source.uniform(key, &[2]).unwrap().to_vec(), vec![0.5, 0.75]);
        assert_eq!(source.uniform(key, &[2]).unwrap().to_vec(), vec![0.25, 0.25]);
        assert_eq!(source.normal(key, &[1]).unwrap().to_vec(), vec![-1.0]);
        assert_eq!(source.randint(key, &[2], 0, 2).unwrap().to_vec(), vec![1, 1]);
    }

    #[test]
    fn test_scripted_source_errors() {
        let mut empty = ScriptedSource::new();
        assert!(empty.uniform(PrngKey::new(0), &[1]).is_err());

        let mut wrong_len = ScriptedSource::new().with_draw(vec![0.0; 3]);
        assert!(wrong_len.uniform(PrngKey::new(0), &[2]).is_err());

        let mut out_of_range = ScriptedSource::new().with_draw(vec![4.0]);
        assert!(out_of_range.randint(PrngKey::new(0), &[1], 0, 4).is_err());
    }
}
