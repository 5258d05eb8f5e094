//! Per-channel record of simulated deposits, bucketed by readout tick.
//!
//! A ledger is owned by one channel and filled by a single producer through
//! [DepositLedger::add_deposit] and [DepositLedger::merge_from]; it is never pruned.
//! Ticks only appear once something was deposited in them, so an absent tick means
//! "not recorded" rather than "zero measured".
mod deposit;
mod kind;

pub use deposit::{Deposit, TrackShare};
pub use kind::{DepositKind, Ionization, Scintillation};

use itertools::Itertools;
use lardata_common::{NO_PARTICLE_ID, Point3, Tick, TrackId};
use serde::{Deserialize, Deserializer, Serialize};
use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt::{self, Display, Formatter, Write},
    marker::PhantomData,
    ops::RangeInclusive,
};
use tracing::{debug, warn};

/// Ionization electrons on a TPC readout channel.
pub type SimChannel = DepositLedger<Ionization>;
/// Scintillation photons on an optical detector channel.
pub type SimOpChannel = DepositLedger<Scintillation>;

/// Below this the energy in a window is not used to normalise track shares.
const MIN_WINDOW_ENERGY: f64 = 1e-5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "kebab-case",
    bound(
        serialize = "K::Channel: Serialize",
        deserialize = "K::Channel: serde::de::DeserializeOwned"
    )
)]
pub struct DepositLedger<K: DepositKind> {
    channel: K::Channel,
    #[serde(deserialize_with = "non_empty_buckets")]
    buckets: BTreeMap<Tick, Vec<Deposit>>,
    #[serde(skip)]
    kind: PhantomData<K>,
}

fn non_empty_buckets<'de, D>(deserializer: D) -> Result<BTreeMap<Tick, Vec<Deposit>>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut buckets = BTreeMap::<Tick, Vec<Deposit>>::deserialize(deserializer)?;
    buckets.retain(|_, deposits| !deposits.is_empty());
    Ok(buckets)
}

impl<K: DepositKind> DepositLedger<K> {
    pub fn new(channel: K::Channel) -> Self {
        Self {
            channel,
            buckets: BTreeMap::new(),
            kind: PhantomData,
        }
    }

    pub fn channel(&self) -> K::Channel {
        self.channel
    }

    /// Appends a deposit to the bucket of `tick`, creating the bucket if needed.
    ///
    /// Deposits are never combined on insertion: adding the same deposit twice stores it
    /// twice, and queries sum both.
    pub fn add_deposit(
        &mut self,
        track_id: TrackId,
        tick: Tick,
        quantity: f64,
        position: Point3,
        energy: f64,
    ) {
        if quantity < f64::EPSILON || energy <= f64::EPSILON {
            warn!(
                channel = %self.channel,
                tick,
                track_id,
                quantity,
                energy,
                "Recording deposit with no {} or no energy",
                K::QUANTITY
            );
        }
        self.buckets.entry(tick).or_default().push(Deposit {
            track_id,
            quantity,
            energy,
            position,
        });
    }

    /// Buckets in increasing tick order.
    pub fn buckets(&self) -> impl Iterator<Item = (Tick, &[Deposit])> {
        self.buckets
            .iter()
            .map(|(tick, deposits)| (*tick, deposits.as_slice()))
    }

    /// Deposits recorded at exactly `tick`.
    pub fn deposits_at(&self, tick: Tick) -> &[Deposit] {
        self.buckets
            .get(&tick)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    fn window(&self, start: Tick, end: Tick) -> impl Iterator<Item = &Deposit> {
        // `range` panics on an inverted interval
        let range = (start <= end).then_some(start..=end);
        range
            .into_iter()
            .flat_map(|range| self.buckets.range(range))
            .flat_map(|(_, deposits)| deposits)
    }

    /// One summary per track with deposits in `[start, end]`, sorted by track ID.
    ///
    /// Each summary integrates the quantity and energy of the track's deposits and
    /// averages their positions weighted by quantity.
    pub fn query_range(&self, start: Tick, end: Tick) -> Vec<Deposit> {
        if start > end {
            warn!(start, end, "Requested tick range is bogus, returning no deposits");
            return Vec::new();
        }
        let mut summaries = BTreeMap::<TrackId, Deposit>::new();
        for deposit in self.window(start, end) {
            summaries
                .entry(deposit.track_id)
                .and_modify(|summary| summary.accumulate(deposit))
                .or_insert(*deposit);
        }
        summaries.into_values().collect()
    }

    /// The energy each track contributed to `[start, end]`, as a fraction of the energy of
    /// all tracks there. Deposits not attributed to a particle count towards the total
    /// but are not listed.
    pub fn track_shares(&self, start: Tick, end: Tick) -> Vec<TrackShare> {
        let summaries = self.query_range(start, end);
        let total: f64 = summaries.iter().map(|summary| summary.energy).sum();
        let total = if total < MIN_WINDOW_ENERGY { 1.0 } else { total };
        summaries
            .into_iter()
            .filter(|summary| summary.track_id != NO_PARTICLE_ID)
            .map(|summary| TrackShare {
                track_id: summary.track_id,
                energy_fraction: summary.energy / total,
                energy: summary.energy,
            })
            .collect()
    }

    /// Quantity collected at `tick`; zero if nothing was recorded there.
    pub fn total_quantity(&self, tick: Tick) -> f64 {
        self.deposits_at(tick).iter().map(|d| d.quantity).sum()
    }

    /// Energy deposited at `tick`; zero if nothing was recorded there.
    pub fn total_energy(&self, tick: Tick) -> f64 {
        self.deposits_at(tick).iter().map(|d| d.energy).sum()
    }

    /// Appends every deposit of `other` into the bucket of the same tick, shifting its track
    /// ID by `offset`, and returns the range of shifted IDs, or `None` if `other` is empty.
    ///
    /// Shifted IDs are not checked against the IDs already present: `offset` must be chosen
    /// so they cannot collide.
    pub fn merge_from(&mut self, other: &Self, offset: TrackId) -> Option<RangeInclusive<TrackId>> {
        if self.channel != other.channel {
            debug!(
                into = %self.channel,
                from = %other.channel,
                "Merging deposits recorded on another {}",
                K::CHANNEL
            );
        }
        for (tick, deposits) in &other.buckets {
            self.buckets
                .entry(*tick)
                .or_default()
                .extend(deposits.iter().map(|deposit| deposit.with_offset(offset)));
        }
        other
            .buckets
            .values()
            .flatten()
            .map(|deposit| deposit.with_offset(offset).track_id)
            .minmax()
            .into_option()
            .map(|(first, last)| first..=last)
    }

    /// Orders ledgers by channel only.
    pub fn cmp_by_channel(&self, other: &Self) -> Ordering {
        self.channel.cmp(&other.channel)
    }

    /// Writes the whole ledger, one line per deposit, with per-tick and per-channel totals.
    ///
    /// #Arguments
    /// * `indent` - prefix of every line but the first.
    /// * `first_indent` - prefix of the first line.
    pub fn dump<W: Write>(&self, out: &mut W, indent: &str, first_indent: &str) -> fmt::Result {
        let (channel_label, quantity_label, tick_label) = (K::CHANNEL, K::QUANTITY, K::TICK);
        writeln!(
            out,
            "{first_indent}{channel_label} #{} read {} {tick_label}s:",
            self.channel,
            self.buckets.len()
        )?;
        let mut channel_quantity = 0.0;
        let mut channel_energy = 0.0;
        for (tick, deposits) in &self.buckets {
            writeln!(
                out,
                "{indent}  {tick_label} #{tick} with {} deposits",
                deposits.len()
            )?;
            for deposit in deposits {
                let Point3 { x, y, z } = deposit.position;
                writeln!(
                    out,
                    "{indent}    ({x}, {y}, {z}) {} {quantity_label}, {} MeV (trkID={})",
                    deposit.quantity, deposit.energy, deposit.track_id
                )?;
            }
            let tick_quantity = self.total_quantity(*tick);
            let tick_energy = self.total_energy(*tick);
            writeln!(
                out,
                "{indent}    => {tick_label} #{tick} CH #{} collected {tick_quantity} {quantity_label} and {tick_energy} MeV",
                self.channel
            )?;
            channel_quantity += tick_quantity;
            channel_energy += tick_energy;
        }
        writeln!(
            out,
            "{indent}  => {channel_label} #{} collected {channel_quantity} {quantity_label} and {channel_energy} MeV",
            self.channel
        )
    }
}

impl<K: DepositKind> Display for DepositLedger<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.dump(f, "", "")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn at(x: f64) -> Point3 {
        Point3::new(x, 0.0, 0.0)
    }

    fn two_track_channel() -> SimChannel {
        let mut channel = SimChannel::new(7);
        channel.add_deposit(1, 10, 100.0, at(1.0), 1.0);
        channel.add_deposit(2, 10, 300.0, at(2.0), 3.0);
        channel.add_deposit(1, 12, 300.0, at(5.0), 1.0);
        channel
    }

    #[test]
    fn ticks_are_kept_in_order() {
        let mut channel = SimOpChannel::new(3);
        for tick in [30, 10, 20, 10] {
            channel.add_deposit(1, tick, 1.0, at(0.0), 1.0);
        }
        let ticks: Vec<_> = channel.buckets().map(|(tick, _)| tick).collect();
        assert_eq!(ticks, [10, 20, 30]);
        assert!(channel.buckets().all(|(_, deposits)| !deposits.is_empty()));
    }

    #[test]
    fn add_deposit_is_not_idempotent() {
        let mut channel = SimChannel::new(1);
        channel.add_deposit(4, 5, 250.0, at(3.0), 0.5);
        channel.add_deposit(4, 5, 250.0, at(3.0), 0.5);

        assert_eq!(channel.deposits_at(5).len(), 2);
        assert_approx_eq!(channel.total_quantity(5), 500.0);
        assert_approx_eq!(channel.total_energy(5), 1.0);

        let summaries = channel.query_range(5, 5);
        assert_eq!(summaries.len(), 1);
        assert_approx_eq!(summaries[0].quantity, 500.0);
        assert_approx_eq!(summaries[0].position.x, 3.0);
    }

    #[test]
    fn empty_window() {
        assert!(SimChannel::new(0).query_range(0, 100).is_empty());
        let channel = two_track_channel();
        assert!(channel.query_range(0, 9).is_empty());
        assert!(channel.query_range(11, 11).is_empty());
        assert!(channel.query_range(13, Tick::MAX).is_empty());
    }

    #[test]
    fn inverted_window_is_empty() {
        let channel = two_track_channel();
        assert!(channel.query_range(12, 10).is_empty());
        assert!(channel.track_shares(12, 10).is_empty());
    }

    #[test]
    fn single_deposit_summary() {
        let mut channel = SimOpChannel::new(2);
        let position = Point3::new(1.5, -20.0, 300.25);
        channel.add_deposit(9, 40, 12.0, position, 0.02);

        let summaries = channel.query_range(0, 100);
        assert_eq!(
            summaries,
            [Deposit {
                track_id: 9,
                quantity: 12.0,
                energy: 0.02,
                position
            }]
        );
    }

    #[test]
    fn summaries_per_track() {
        let summaries = two_track_channel().query_range(10, 12);
        let tracks: Vec<_> = summaries.iter().map(|s| s.track_id).collect();
        assert_eq!(tracks, [1, 2]);

        let first = &summaries[0];
        assert_approx_eq!(first.quantity, 400.0);
        assert_approx_eq!(first.energy, 2.0);
        assert_approx_eq!(first.position.x, 4.0);

        let window = two_track_channel().query_range(11, 12);
        assert_eq!(window.len(), 1);
        assert_approx_eq!(window[0].quantity, 300.0);
    }

    #[test]
    fn totals_at_absent_tick() {
        let channel = two_track_channel();
        assert_approx_eq!(channel.total_quantity(10), 400.0);
        assert_approx_eq!(channel.total_energy(10), 4.0);
        assert_eq!(channel.total_quantity(11), 0.0);
        assert_eq!(channel.total_energy(11), 0.0);
    }

    #[test]
    fn track_shares_skip_unattributed() {
        let mut channel = two_track_channel();
        channel.add_deposit(NO_PARTICLE_ID, 12, 100.0, at(0.0), 5.0);

        let shares = channel.track_shares(10, 12);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].track_id, 1);
        assert_approx_eq!(shares[0].energy_fraction, 0.2);
        assert_approx_eq!(shares[1].energy_fraction, 0.3);
        assert_approx_eq!(shares[1].energy, 3.0);
    }

    #[test]
    fn track_shares_without_energy() {
        let mut channel = SimChannel::new(0);
        channel.add_deposit(3, 1, 10.0, at(0.0), 0.0);
        let shares = channel.track_shares(0, 5);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].energy_fraction, 0.0);
    }

    #[test]
    fn non_positive_deposit_is_recorded() {
        let mut channel = SimChannel::new(0);
        channel.add_deposit(3, 1, 0.0, at(0.0), -1.0);
        assert_eq!(channel.deposits_at(1).len(), 1);
    }

    #[test]
    fn merge_with_offset() {
        let mut a = SimOpChannel::new(4);
        a.add_deposit(5, 3, 10.0, at(0.0), 1.0);
        let mut b = SimOpChannel::new(4);
        b.add_deposit(1, 3, 20.0, at(1.0), 2.0);
        b.add_deposit(2, 8, 30.0, at(2.0), 3.0);
        b.add_deposit(1, 9, 40.0, at(3.0), 4.0);

        assert_eq!(a.merge_from(&b, 100), Some(101..=102));

        let at_three: Vec<_> = a.deposits_at(3).iter().map(|d| d.track_id).collect();
        assert_eq!(at_three, [5, 101]);
        assert_eq!(a.deposits_at(3)[0].quantity, 10.0);
        let migrated: Vec<_> = a
            .buckets()
            .flat_map(|(_, deposits)| deposits)
            .filter(|d| d.track_id != 5)
            .map(|d| d.track_id)
            .collect();
        assert_eq!(migrated, [101, 102, 101]);
        let ticks: Vec<_> = a.buckets().map(|(tick, _)| tick).collect();
        assert_eq!(ticks, [3, 8, 9]);
        assert_eq!(b.query_range(0, 10).len(), 2);
    }

    #[test]
    fn merge_nothing() {
        let mut a = two_track_channel();
        let before = a.clone();
        assert_eq!(a.merge_from(&SimChannel::new(7), 10), None);
        assert_eq!(a, before);
    }

    #[test]
    fn merge_from_other_channel() {
        let mut a = SimChannel::new(1);
        let mut b = SimChannel::new(2);
        b.add_deposit(1, 0, 1.0, at(0.0), 1.0);
        assert_eq!(a.merge_from(&b, 0), Some(1..=1));
        assert_eq!(a.channel(), 1);
        assert_eq!(a.deposits_at(0).len(), 1);
    }

    #[test]
    fn sort_by_channel() {
        let mut channels: Vec<_> = [9, 2, 5].into_iter().map(SimChannel::new).collect();
        channels.sort_by(SimChannel::cmp_by_channel);
        let order: Vec<_> = channels.iter().map(SimChannel::channel).collect();
        assert_eq!(order, [2, 5, 9]);
    }

    #[test]
    fn dump_layout() {
        let mut channel = SimChannel::new(7);
        channel.add_deposit(3, 10, 100.0, Point3::new(1.0, 2.0, 3.0), 0.5);
        let mut text = String::new();
        channel.dump(&mut text, "  ", "> ").unwrap();
        assert_eq!(
            text,
            "> channel #7 read 1 TDCs:\n\
             \x20   TDC #10 with 1 deposits\n\
             \x20     (1, 2, 3) 100 electrons, 0.5 MeV (trkID=3)\n\
             \x20     => TDC #10 CH #7 collected 100 electrons and 0.5 MeV\n\
             \x20   => channel #7 collected 100 electrons and 0.5 MeV\n"
        );
        assert!(channel.to_string().starts_with("channel #7 read 1 TDCs:\n  TDC #10"));
    }

    #[test]
    fn json_drops_empty_buckets() {
        let channel = two_track_channel();
        let json = serde_json::to_string(&channel).unwrap();
        assert_eq!(serde_json::from_str::<SimChannel>(&json).unwrap(), channel);

        let loaded: SimOpChannel =
            serde_json::from_str(r#"{"channel": -1, "buckets": {"4": []}}"#).unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.channel(), -1);
    }
}
