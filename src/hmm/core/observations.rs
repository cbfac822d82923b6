//! Observation batches — integer-coded symbols tagged with a storage layout.
//!
//! The Forward engine receives observations as `(sequence, time, channel)`
//! while the mixture Viterbi engine receives `(channel, time, sequence)`.
//! [`Observations`] hides that difference: both engines read one symbol per
//! channel at a given `(sequence, time)` through [`Observations::symbols`].
use crate::hmm::errors::{HMMError, HMMResult};
use ndarray::{ArrayView1, ArrayView3, Axis, s};

/// Axis order of a 3-D observation array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationLayout {
    /// `(K, T, C)`: sequence-major.
    SequenceTimeChannel,
    /// `(C, T, K)`: channel-major.
    ChannelTimeSequence,
}

/// Borrowed batch of symbol codes.
///
/// Invariant: `n_steps() ≥ 1` and `n_channels() ≥ 1`. A batch with zero
/// sequences is allowed and yields empty outputs.
#[derive(Debug, Clone, Copy)]
pub struct Observations<'a> {
    codes: ArrayView3<'a, usize>,
    layout: ObservationLayout,
}

impl<'a> Observations<'a> {
    /// Wrap `codes` with its axis order.
    ///
    /// # Errors
    /// - [`HMMError::EmptySequence`] if the time axis is empty.
    /// - [`HMMError::NoChannels`] if the channel axis is empty.
    pub fn new(codes: ArrayView3<'a, usize>, layout: ObservationLayout) -> HMMResult<Self> {
        let obs = Observations { codes, layout };
        if obs.n_steps() == 0 {
            return Err(HMMError::EmptySequence);
        }
        if obs.n_channels() == 0 {
            return Err(HMMError::NoChannels);
        }
        Ok(obs)
    }

    pub fn layout(&self) -> ObservationLayout {
        self.layout
    }

    pub fn n_sequences(&self) -> usize {
        match self.layout {
            ObservationLayout::SequenceTimeChannel => self.codes.len_of(Axis(0)),
            ObservationLayout::ChannelTimeSequence => self.codes.len_of(Axis(2)),
        }
    }

    pub fn n_steps(&self) -> usize {
        self.codes.len_of(Axis(1))
    }

    pub fn n_channels(&self) -> usize {
        match self.layout {
            ObservationLayout::SequenceTimeChannel => self.codes.len_of(Axis(2)),
            ObservationLayout::ChannelTimeSequence => self.codes.len_of(Axis(0)),
        }
    }

    /// Symbol codes of sequence `k` at time `t`, one per channel in channel
    /// order.
    #[inline]
    pub fn symbols(&self, k: usize, t: usize) -> ArrayView1<'a, usize> {
        match self.layout {
            ObservationLayout::SequenceTimeChannel => self.codes.slice_move(s![k, t, ..]),
            ObservationLayout::ChannelTimeSequence => self.codes.slice_move(s![.., t, k]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    // Purpose
    // -------
    // Both layouts expose the same logical (sequence, time, channel) view.
    //
    // Given
    // -----
    // - A `(K=2, T=3, C=2)` array and its `(C, T, K)` permutation.
    //
    // Expect
    // ------
    // - Identical dimensions and identical `symbols(k, t)` everywhere.
    fn layouts_agree_on_logical_symbols() {
        let ktc = Array3::from_shape_fn((2, 3, 2), |(k, t, c)| k * 100 + t * 10 + c);
        let ctk = ktc.view().permuted_axes([2, 1, 0]).to_owned();

        let a = Observations::new(ktc.view(), ObservationLayout::SequenceTimeChannel)
            .expect("valid observations");
        let b = Observations::new(ctk.view(), ObservationLayout::ChannelTimeSequence)
            .expect("valid observations");

        assert_eq!(a.n_sequences(), 2);
        assert_eq!(b.n_sequences(), 2);
        assert_eq!(a.n_steps(), b.n_steps());
        assert_eq!(a.n_channels(), b.n_channels());
        for k in 0..2 {
            for t in 0..3 {
                assert_eq!(a.symbols(k, t), b.symbols(k, t));
                assert_eq!(a.symbols(k, t).to_vec(), vec![k * 100 + t * 10, k * 100 + t * 10 + 1]);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Empty time or channel axes are rejected; an empty batch is not.
    //
    // Given
    // -----
    // - Arrays with `T = 0`, `C = 0`, and `K = 0`.
    //
    // Expect
    // ------
    // - `EmptySequence`, `NoChannels`, and `Ok` with zero sequences.
    fn new_rejects_empty_time_and_channel_axes() {
        let no_time = Array3::<usize>::zeros((1, 0, 1));
        assert!(matches!(
            Observations::new(no_time.view(), ObservationLayout::SequenceTimeChannel),
            Err(HMMError::EmptySequence)
        ));

        let no_channels = Array3::<usize>::zeros((0, 2, 1));
        assert!(matches!(
            Observations::new(no_channels.view(), ObservationLayout::ChannelTimeSequence),
            Err(HMMError::NoChannels)
        ));

        let no_sequences = Array3::<usize>::zeros((0, 2, 1));
        let obs = Observations::new(no_sequences.view(), ObservationLayout::SequenceTimeChannel)
            .expect("an empty batch is allowed");
        assert_eq!(obs.n_sequences(), 0);
    }
}
