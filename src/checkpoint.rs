//! Time-weighted stake accumulator.
//!
//! Each checkpoint records the cumulative `seconds * 2^64 / total_staked` up to
//! its timestamp. The log is append-only and every entry is persisted as a
//! single packed `U256` word.
//!
//! ## Word layout
//! - bits 0..192: accumulated seconds-per-stake (fixed point, scaled by 2^64)
//! - bits 192..256: timestamp in seconds

use odra::casper_types::U256;
use odra::prelude::*;

/// Fixed-point scale of the accumulator (2^64).
const SCALE: u128 = 1 << 64;

/// Errors raised by the checkpoint codec and log
#[odra::odra_error]
pub enum CheckpointError {
    AccumulatorOverflow = 100,
    ZeroTotalStaked = 101,
    FutureLookup = 102,
}

/// A decoded checkpoint
#[odra::odra_type]
#[derive(Default)]
pub struct Checkpoint {
    pub timestamp: u64,
    pub value: U256,
}

/// A checkpoint packed into one storage word.
///
/// The only way to build one from parts is [`PackedCheckpoint::new`], which
/// rejects values that would spill into the timestamp field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedCheckpoint(U256);

impl PackedCheckpoint {
    /// Largest accumulator value that still fits below bit 192.
    pub fn max_value() -> U256 {
        U256([u64::MAX, u64::MAX, u64::MAX, 0])
    }

    pub fn new(timestamp: u64, value: U256) -> Result<Self, CheckpointError> {
        if value.0[3] != 0 {
            return Err(CheckpointError::AccumulatorOverflow);
        }
        Ok(Self(U256([value.0[0], value.0[1], value.0[2], timestamp])))
    }

    pub fn from_word(word: U256) -> Self {
        Self(word)
    }

    pub fn word(&self) -> U256 {
        self.0
    }

    pub fn timestamp(&self) -> u64 {
        self.0 .0[3]
    }

    pub fn value(&self) -> U256 {
        U256([self.0 .0[0], self.0 .0[1], self.0 .0[2], 0])
    }

    pub fn unpack(&self) -> Checkpoint {
        Checkpoint {
            timestamp: self.timestamp(),
            value: self.value(),
        }
    }
}

/// `floor(elapsed * 2^64 / total_staked)`.
pub fn increment(elapsed: u64, total_staked: U256) -> Result<U256, CheckpointError> {
    if total_staked.is_zero() {
        return Err(CheckpointError::ZeroTotalStaked);
    }
    Ok(U256::from(elapsed) * U256::from(SCALE) / total_staked)
}

/// Stake level implied by the growth between two adjacent checkpoints.
///
/// This inverts the recorded increment, so it only equals the real stake when
/// the stake stayed constant over the whole interval. Returns zero when the
/// accumulator did not move.
pub fn implied_stake(from: &Checkpoint, to: &Checkpoint) -> U256 {
    let grown = to.value.saturating_sub(from.value);
    if grown.is_zero() {
        return U256::zero();
    }
    let elapsed = to.timestamp.saturating_sub(from.timestamp);
    U256::from(elapsed) * U256::from(SCALE) / grown
}

/// Accumulator value at `timestamp`, starting from `base` and extending with
/// either the implied stake towards `next` or `live_total` past the last entry.
pub fn interpolate(
    base: &Checkpoint,
    next: Option<&Checkpoint>,
    live_total: U256,
    timestamp: u64,
) -> U256 {
    if timestamp < base.timestamp {
        return U256::zero();
    }
    let elapsed = timestamp - base.timestamp;
    if elapsed == 0 {
        return base.value;
    }
    let staked = match next {
        Some(next) => implied_stake(base, next),
        None => live_total,
    };
    if staked.is_zero() {
        return base.value;
    }
    base.value + U256::from(elapsed) * U256::from(SCALE) / staked
}

/// Append-only log of packed checkpoints, 1-indexed with a zero sentinel at 0.
#[odra::module]
pub struct CheckpointLog {
    snapshots: Mapping<u32, U256>,
    num_snapshots: Var<u32>,
}

#[odra::module]
impl CheckpointLog {
    /// Highest populated index
    pub fn num_snapshots(&self) -> u32 {
        self.num_snapshots.get_or_default()
    }

    /// Checkpoint at `index`; unpopulated indices read as the zero sentinel.
    pub fn get(&self, index: u32) -> Checkpoint {
        self.snapshots
            .get(&index)
            .map(|word| PackedCheckpoint::from_word(word).unpack())
            .unwrap_or_default()
    }

    /// Snapshot the accumulator before `total_staked` changes.
    ///
    /// With nothing staked the previous value is carried forward to `now`, so
    /// the idle interval adds nothing to the accumulator.
    pub fn record(&mut self, total_staked: U256, now: u64) {
        if total_staked.is_zero() {
            self.carry_forward(now);
        } else {
            self.append_if_advanced(total_staked, now);
        }
    }

    /// Append `(now, last + increment)` unless the last entry is already at `now`.
    pub fn append_if_advanced(&mut self, total_staked: U256, now: u64) {
        let last = self.get(self.num_snapshots());
        if now == last.timestamp {
            return;
        }
        let step = increment(now.saturating_sub(last.timestamp), total_staked)
            .unwrap_or_else(|err| self.env().revert(err));
        self.push(now, last.value + step);
    }

    /// Accumulator value at `timestamp`.
    ///
    /// `live_total` is the stake in force since the last checkpoint and is
    /// used for queries past the end of the log.
    pub fn lookup(&self, timestamp: u64, now: u64, live_total: U256) -> U256 {
        if timestamp > now {
            self.env().revert(CheckpointError::FutureLookup);
        }
        let count = self.num_snapshots();
        if count == 0 {
            return U256::zero();
        }

        let last = self.get(count);
        if timestamp >= last.timestamp {
            return interpolate(&last, None, live_total, timestamp);
        }

        // invariant: get(low).timestamp <= timestamp < get(high).timestamp
        let mut low = 0u32;
        let mut high = count;
        while high - low > 1 {
            let mid = low + (high - low) / 2;
            let probe = self.get(mid);
            if probe.timestamp == timestamp {
                return probe.value;
            }
            if probe.timestamp < timestamp {
                low = mid;
            } else {
                high = mid;
            }
        }

        let base = self.get(low);
        let next = self.get(high);
        interpolate(&base, Some(&next), live_total, timestamp)
    }

    fn carry_forward(&mut self, now: u64) {
        let last = self.get(self.num_snapshots());
        if now == last.timestamp {
            return;
        }
        self.push(now, last.value);
    }

    fn push(&mut self, timestamp: u64, value: U256) {
        let packed =
            PackedCheckpoint::new(timestamp, value).unwrap_or_else(|err| self.env().revert(err));
        let index = self.num_snapshots() + 1;
        self.snapshots.set(&index, packed.word());
        self.num_snapshots.set(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(timestamp: u64, value: U256) -> PackedCheckpoint {
        PackedCheckpoint::new(timestamp, value).ok().expect("value fits 192 bits")
    }

    fn scaled(seconds: u64, stake: u64) -> U256 {
        U256::from(seconds) * U256::from(SCALE) / U256::from(stake)
    }

    #[test]
    fn pack_round_trips_extremes() {
        let packed = pack(u64::MAX, PackedCheckpoint::max_value());
        assert_eq!(packed.word(), U256::MAX);
        assert_eq!(packed.timestamp(), u64::MAX);
        assert_eq!(packed.value(), PackedCheckpoint::max_value());

        let zero = pack(0, U256::zero());
        assert_eq!(zero.word(), U256::zero());
    }

    #[test]
    fn pack_keeps_fields_apart() {
        let value = U256::from(123_456_789u64) * U256::from(SCALE);
        let packed = pack(1_700_000_000, value);
        let decoded = PackedCheckpoint::from_word(packed.word()).unpack();
        assert_eq!(decoded.timestamp, 1_700_000_000);
        assert_eq!(decoded.value, value);
    }

    #[test]
    fn pack_rejects_value_at_bit_192() {
        let too_big = PackedCheckpoint::max_value() + U256::one();
        assert!(matches!(
            PackedCheckpoint::new(1, too_big),
            Err(CheckpointError::AccumulatorOverflow)
        ));
        assert!(matches!(
            PackedCheckpoint::new(1, U256::MAX),
            Err(CheckpointError::AccumulatorOverflow)
        ));
    }

    #[test]
    fn increment_is_floored_fixed_point() {
        assert_eq!(increment(10, U256::from(100u64)).ok(), Some(scaled(10, 100)));
        assert_eq!(increment(1, U256::from(3u64)).ok(), Some(U256::from(SCALE / 3)));
        assert!(matches!(
            increment(5, U256::zero()),
            Err(CheckpointError::ZeroTotalStaked)
        ));
    }

    #[test]
    fn implied_stake_recovers_constant_stake() {
        let from = Checkpoint {
            timestamp: 100,
            value: U256::zero(),
        };
        let to = Checkpoint {
            timestamp: 116,
            value: scaled(16, 64),
        };
        assert_eq!(implied_stake(&from, &to), U256::from(64u64));
    }

    #[test]
    fn implied_stake_of_idle_interval_is_zero() {
        let from = Checkpoint {
            timestamp: 10,
            value: scaled(10, 4),
        };
        let to = Checkpoint {
            timestamp: 50,
            value: scaled(10, 4),
        };
        assert_eq!(implied_stake(&from, &to), U256::zero());
    }

    #[test]
    fn interpolate_between_checkpoints() {
        let base = Checkpoint {
            timestamp: 0,
            value: U256::zero(),
        };
        let next = Checkpoint {
            timestamp: 10,
            value: scaled(10, 100),
        };
        let mid = interpolate(&base, Some(&next), U256::from(7u64), 5);
        assert_eq!(mid, scaled(5, 100));
    }

    #[test]
    fn interpolate_past_last_uses_live_total() {
        let base = Checkpoint {
            timestamp: 10,
            value: scaled(10, 100),
        };
        let value = interpolate(&base, None, U256::from(150u64), 16);
        assert_eq!(value, scaled(10, 100) + scaled(6, 150));
    }

    #[test]
    fn interpolate_without_stake_holds_value() {
        let base = Checkpoint {
            timestamp: 10,
            value: scaled(10, 100),
        };
        assert_eq!(interpolate(&base, None, U256::zero(), 99), base.value);
    }

    #[test]
    fn interpolate_before_base_is_zero() {
        let base = Checkpoint {
            timestamp: 10,
            value: scaled(10, 100),
        };
        assert_eq!(interpolate(&base, None, U256::from(1u64), 9), U256::zero());
    }
}
