//! State encoder: deterministic byte → complex unit vector mapping and the
//! superposition / auxiliary scalar measures derived from it.

#![forbid(unsafe_code)]

use rand::RngCore;

use crate::primitives::hash;

/// A single complex amplitude.
///
/// Deliberately a plain two-`f64` struct rather than a pull-in of a general
/// complex-number crate: the protocol only ever needs magnitude and phase of
/// each coordinate, never full complex arithmetic (add/mul/conjugate, FFTs,
/// …), so a minimal local type is the better fit here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex64 {
    pub re: f64,
    pub im: f64,
}

impl Complex64 {
    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// `|v|^2 = re^2 + im^2`.
    #[inline]
    pub fn norm_sqr(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// `|v|`.
    #[inline]
    pub fn abs(&self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// `arg(v)`, the principal value of the phase angle.
    #[inline]
    pub fn arg(&self) -> f64 {
        self.im.atan2(self.re)
    }
}

/// Tolerance within which `Σ|v_i|^2` must equal 1 for a vector to count as
/// normalized (spec.md §3 / §8 Property 3).
pub const NORMALIZATION_TOLERANCE: f64 = 1e-3;

/// A finite sequence of complex numbers of power-of-two length `D`,
/// normalized so `Σ|v_i|^2 = 1`. Immutable once constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexVector(Vec<Complex64>);

impl ComplexVector {
    #[inline]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Complex64] {
        &self.0
    }

    /// `Σ|v_i|^2`, which should be `1` within [`NORMALIZATION_TOLERANCE`] for
    /// any vector produced by [`encode_bytes`].
    pub fn total_mass(&self) -> f64 {
        self.0.iter().map(Complex64::norm_sqr).sum()
    }

    fn from_raw(raw: Vec<Complex64>) -> Self {
        Self(raw)
    }

    /// Build a vector directly from already-normalized components, bypassing
    /// [`encode_bytes`]. For callers (tests, fixtures) that already hold a
    /// literal state vector rather than a byte payload to derive one from.
    ///
    /// Rejects dimensions that aren't a power of two and components whose
    /// total mass falls outside [`NORMALIZATION_TOLERANCE`] of 1.
    pub fn from_normalized(components: Vec<Complex64>) -> Result<Self, EncodeError> {
        if !is_power_of_two(components.len()) {
            return Err(EncodeError::BadDimension(components.len()));
        }
        let mass: f64 = components.iter().map(Complex64::norm_sqr).sum();
        if (mass - 1.0).abs() > NORMALIZATION_TOLERANCE {
            return Err(EncodeError::NotNormalized(format!("{mass:.6}")));
        }
        Ok(Self(components))
    }
}

/// Errors raised while encoding bytes into a [`ComplexVector`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("input data must not be empty")]
    EmptyData,
    #[error("dimension must be a positive power of two (got {0})")]
    BadDimension(usize),
    #[error("components are not normalized: Σ|v_i|^2 = {0}, expected 1 within tolerance")]
    NotNormalized(String),
}

fn is_power_of_two(d: usize) -> bool {
    d >= 2 && d.is_power_of_two()
}

/// Deterministically map `data` to a normalized [`ComplexVector`] of length
/// `dimension`.
///
/// Algorithm (spec.md §4.2):
/// 1. `seed = Hash(data)`.
/// 2. For each index `i` in `0..dimension`: `round_hash = Hash(seed ||
///    little-endian u32(i))`; split into two 8-byte halves, each read as a
///    big-endian `u64`, mapped into `[-1, 1]` via `2*(u/u64::MAX) - 1`, and
///    placed as `(re, im)`.
/// 3. Normalize by dividing every coordinate by `sqrt(Σ|v_i|^2)`. If the
///    total mass is exactly zero, fall back to `v_0 = 1`, all others `0`.
pub fn encode_bytes(data: &[u8], dimension: usize) -> Result<ComplexVector, EncodeError> {
    if data.is_empty() {
        return Err(EncodeError::EmptyData);
    }
    if !is_power_of_two(dimension) {
        return Err(EncodeError::BadDimension(dimension));
    }

    let seed = hash(data);
    let mut raw = Vec::with_capacity(dimension);
    for i in 0..dimension as u32 {
        let mut input = Vec::with_capacity(seed.len() + 4);
        input.extend_from_slice(&seed);
        input.extend_from_slice(&i.to_le_bytes());
        let round_hash = hash(&input);

        let re_bits = u64::from_be_bytes(round_hash[0..8].try_into().unwrap());
        let im_bits = u64::from_be_bytes(round_hash[8..16].try_into().unwrap());
        let re = to_unit_interval(re_bits);
        let im = to_unit_interval(im_bits);
        raw.push(Complex64::new(re, im));
    }

    let mass: f64 = raw.iter().map(Complex64::norm_sqr).sum();
    if mass == 0.0 {
        for (idx, c) in raw.iter_mut().enumerate() {
            *c = if idx == 0 { Complex64::new(1.0, 0.0) } else { Complex64::new(0.0, 0.0) };
        }
    } else {
        let norm = mass.sqrt();
        for c in raw.iter_mut() {
            c.re /= norm;
            c.im /= norm;
        }
    }

    Ok(ComplexVector::from_raw(raw))
}

#[inline]
fn to_unit_interval(bits: u64) -> f64 {
    2.0 * (bits as f64 / u64::MAX as f64) - 1.0
}

/// A complex unit vector paired with a real probability distribution over
/// its indices.
#[derive(Clone, Debug)]
pub struct Superposition {
    pub vector: ComplexVector,
    pub amplitudes: Vec<f64>,
}

/// Born-rule distribution `A_i = |v_i|^2 / Σ|v_j|^2`, reproducible from `V`
/// alone. Falls back to a uniform distribution if the total mass is zero
/// (which should not occur for a vector returned by [`encode_bytes`], but is
/// handled defensively since `Superposition` can also wrap caller-supplied
/// vectors).
pub fn deterministic_superposition(vector: &ComplexVector) -> Superposition {
    let masses: Vec<f64> = vector.as_slice().iter().map(Complex64::norm_sqr).collect();
    let total: f64 = masses.iter().sum();
    let amplitudes = if total == 0.0 {
        vec![1.0 / vector.dimension() as f64; vector.dimension()]
    } else {
        masses.into_iter().map(|m| m / total).collect()
    };
    Superposition { vector: vector.clone(), amplitudes }
}

/// Auxiliary-entropy construction mode: amplitudes drawn from uniform
/// positive reals and normalized, independent of `V`'s actual coordinates.
///
/// Used only to inject extra randomness into a commitment's auxiliary input
/// when a caller explicitly asks for it (see
/// [`crate::commitment::commit_with_randomized_aux`]); the protocol's own
/// commit/challenge/response path always uses
/// [`deterministic_superposition`], which is what makes `S` reproducible
/// from `V` alone.
pub fn random_superposition(vector: &ComplexVector, rng: &mut impl RngCore) -> Superposition {
    let d = vector.dimension();
    let mut raw: Vec<f64> = (0..d).map(|_| (rng.next_u64() as f64 / u64::MAX as f64) + 1e-12).collect();
    let total: f64 = raw.iter().sum();
    for a in raw.iter_mut() {
        *a /= total;
    }
    Superposition { vector: vector.clone(), amplitudes: raw }
}

/// Normalized Shannon entropy `H(V) = -Σ p_i log2(p_i) / log2(D)`, with
/// `p_i = |v_i|^2` and the convention `0 * log(0) := 0`.
pub fn entropy(vector: &ComplexVector) -> f64 {
    let d = vector.dimension();
    if d <= 1 {
        return 0.0;
    }
    let log2_d = (d as f64).log2();
    let h: f64 = vector
        .as_slice()
        .iter()
        .map(|c| {
            let p = c.norm_sqr();
            if p <= 0.0 {
                0.0
            } else {
                -p * p.log2()
            }
        })
        .sum();
    h / log2_d
}

/// Tolerance below which `|v_i|` is treated as zero when accumulating the
/// phase term of [`coherence`].
const COHERENCE_EPSILON: f64 = 1e-10;

/// `Σ_i |v_i| + Σ_{i>0, |v_i|>ε} |sin(arg v_i)|`.
pub fn coherence(vector: &ComplexVector) -> f64 {
    let magnitude_sum: f64 = vector.as_slice().iter().map(Complex64::abs).sum();
    let phase_sum: f64 = vector
        .as_slice()
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, c)| c.abs() > COHERENCE_EPSILON)
        .map(|(_, c)| c.arg().sin().abs())
        .sum();
    magnitude_sum + phase_sum
}
