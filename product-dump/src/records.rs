//! The input file: a JSON list of record descriptions, each tagged with `record-type`.
//!
//! Records are built through their validating constructors, so a malformed calorimetry
//! series is reported as the [DataProductError] the constructor raised.
use anyhow::Context;
use lardata_common::{ChannelId, OpChannelId, Point3, Tick, TrackId};
use lardata_products::{
    DataProductError,
    analysis::{
        Calorimetry, CalorimetrySeries, FlashMatch, ParticleId, T0, TrueCalorimetry,
        TrueCalorimetrySeries,
    },
    reco::{Edge, GlobalParameters, LocalParameters, OpFlash, Plane, SpacePoint},
    simulation::{
        DepositKind, DepositLedger, EnergyDeposition, SimChannel, SimEDep, SimEnergyDeposit,
        SimOpChannel,
    },
};
use serde::Deserialize;
use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    fs::File,
    io::{self, Read, Write},
    path::Path,
};
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "record-type")]
pub(crate) enum RecordDescription {
    Calorimetry(CalorimetrySeries),
    TrueCalorimetry(TrueCalorimetrySeries),
    T0(T0),
    ParticleId(ParticleId),
    FlashMatch(FlashMatch),
    SpacePoint(SpacePoint),
    Edge(Edge),
    OpFlash(OpFlash),
    TrackState(TrackStateDescription),
    EnergyDeposition(EnergyDeposition),
    SimEnergyDeposit(SimEnergyDeposit),
    SimEdep(SimEDep),
    SimChannel(LedgerDescription<ChannelId>),
    SimOpChannel(LedgerDescription<OpChannelId>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct DepositDescription {
    track_id: TrackId,
    tick: Tick,
    quantity: f64,
    energy: f64,
    position: Point3,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", bound(deserialize = "C: Deserialize<'de>"))]
pub(crate) struct MergeDescription<C> {
    offset: TrackId,
    ledger: LedgerDescription<C>,
}

/// Deposits are added in the order listed, then each ledger in `merge` is merged in.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", bound(deserialize = "C: Deserialize<'de>"))]
pub(crate) struct LedgerDescription<C> {
    channel: C,
    #[serde(default)]
    deposits: Vec<DepositDescription>,
    #[serde(default)]
    merge: Vec<MergeDescription<C>>,
}

impl<C: Display> LedgerDescription<C> {
    fn build<K: DepositKind<Channel = C>>(self) -> DepositLedger<K> {
        let mut ledger = DepositLedger::<K>::new(self.channel);
        for deposit in self.deposits {
            ledger.add_deposit(
                deposit.track_id,
                deposit.tick,
                deposit.quantity,
                deposit.position,
                deposit.energy,
            );
        }
        for MergeDescription { offset, ledger: other } in self.merge {
            let merged = ledger.merge_from(&other.build::<K>(), offset);
            debug!(channel = %ledger.channel(), offset, ?merged, "Merged ledger");
        }
        ledger
    }
}

fn track_along_plane_dir() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct TrackStateDescription {
    plane: Plane,
    local: LocalParameters,
    #[serde(default = "track_along_plane_dir")]
    track_along_plane_dir: bool,
}

/// A track state on a plane together with its global form.
pub(crate) struct TrackState {
    plane: Plane,
    local: LocalParameters,
    global: GlobalParameters,
}

impl From<TrackStateDescription> for TrackState {
    fn from(value: TrackStateDescription) -> Self {
        let global = value
            .plane
            .local5d_to_global6d(&value.local, value.track_along_plane_dir);
        Self {
            plane: value.plane,
            local: value.local,
            global,
        }
    }
}

impl Display for TrackState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Track state on plane at {} with normal {}",
            self.plane.position(),
            self.plane.direction()
        )?;
        writeln!(f, " local (u, v, du/dw, dv/dw, 1/p) = {:?}", self.local)?;
        writeln!(f, " global (x, y, z, px, py, pz) = {:?}", self.global)
    }
}

pub(crate) enum Record {
    Calorimetry(Calorimetry),
    TrueCalorimetry(TrueCalorimetry),
    T0(T0),
    ParticleId(ParticleId),
    FlashMatch(FlashMatch),
    SpacePoint(SpacePoint),
    Edge(Edge),
    OpFlash(OpFlash),
    TrackState(TrackState),
    EnergyDeposition(EnergyDeposition),
    SimEnergyDeposit(SimEnergyDeposit),
    SimEdep(SimEDep),
    SimChannel(SimChannel),
    SimOpChannel(SimOpChannel),
}

impl TryFrom<RecordDescription> for Record {
    type Error = DataProductError;

    fn try_from(value: RecordDescription) -> Result<Self, Self::Error> {
        Ok(match value {
            RecordDescription::Calorimetry(series) => {
                Record::Calorimetry(Calorimetry::from_series(series)?)
            }
            RecordDescription::TrueCalorimetry(series) => {
                Record::TrueCalorimetry(TrueCalorimetry::from_series(series)?)
            }
            RecordDescription::T0(t0) => Record::T0(t0),
            RecordDescription::ParticleId(pid) => Record::ParticleId(pid),
            RecordDescription::FlashMatch(matched) => Record::FlashMatch(matched),
            RecordDescription::SpacePoint(point) => Record::SpacePoint(point),
            RecordDescription::Edge(edge) => Record::Edge(edge),
            RecordDescription::OpFlash(flash) => Record::OpFlash(flash),
            RecordDescription::TrackState(state) => Record::TrackState(state.into()),
            RecordDescription::EnergyDeposition(deposition) => {
                Record::EnergyDeposition(deposition)
            }
            RecordDescription::SimEnergyDeposit(deposit) => Record::SimEnergyDeposit(deposit),
            RecordDescription::SimEdep(edep) => Record::SimEdep(edep),
            RecordDescription::SimChannel(ledger) => Record::SimChannel(ledger.build()),
            RecordDescription::SimOpChannel(ledger) => Record::SimOpChannel(ledger.build()),
        })
    }
}

impl Record {
    /// Position of the record type in sorted output.
    fn rank(&self) -> u8 {
        match self {
            Record::Calorimetry(_) => 0,
            Record::TrueCalorimetry(_) => 1,
            Record::T0(_) => 2,
            Record::ParticleId(_) => 3,
            Record::FlashMatch(_) => 4,
            Record::SpacePoint(_) => 5,
            Record::Edge(_) => 6,
            Record::OpFlash(_) => 7,
            Record::TrackState(_) => 8,
            Record::EnergyDeposition(_) => 9,
            Record::SimEnergyDeposit(_) => 10,
            Record::SimEdep(_) => 11,
            Record::SimChannel(_) => 12,
            Record::SimOpChannel(_) => 13,
        }
    }

    /// Groups records by type, ordering comparable ones by their key.
    fn sort_order(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank()).then_with(|| match (self, other) {
            (Record::SpacePoint(a), Record::SpacePoint(b)) => a.cmp_by_id(b),
            (Record::Edge(a), Record::Edge(b)) => a.cmp_by_length(b),
            (Record::OpFlash(a), Record::OpFlash(b)) => a.cmp_by_time(b),
            (Record::SimChannel(a), Record::SimChannel(b)) => a.cmp_by_channel(b),
            (Record::SimOpChannel(a), Record::SimOpChannel(b)) => a.cmp_by_channel(b),
            _ => Ordering::Equal,
        })
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Record::Calorimetry(calo) => calo.fmt(f),
            Record::TrueCalorimetry(calo) => calo.fmt(f),
            Record::T0(t0) => t0.fmt(f),
            Record::ParticleId(pid) => pid.fmt(f),
            Record::FlashMatch(matched) => matched.fmt(f),
            Record::SpacePoint(point) => point.fmt(f),
            Record::Edge(edge) => edge.fmt(f),
            Record::OpFlash(flash) => flash.fmt(f),
            Record::TrackState(state) => state.fmt(f),
            Record::EnergyDeposition(deposition) => deposition.fmt(f),
            Record::SimEnergyDeposit(deposit) => deposit.fmt(f),
            Record::SimEdep(edep) => edep.fmt(f),
            Record::SimChannel(ledger) => ledger.fmt(f),
            Record::SimOpChannel(ledger) => ledger.fmt(f),
        }
    }
}

pub(crate) fn parse<R: Read>(reader: R) -> anyhow::Result<Vec<Record>> {
    let descriptions: Vec<RecordDescription> = serde_json::from_reader(reader)?;
    let records = descriptions
        .into_iter()
        .map(Record::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

pub(crate) fn load(path: &Path) -> anyhow::Result<Vec<Record>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    parse(file).with_context(|| format!("cannot read records from {}", path.display()))
}

/// Stable: records that compare equal keep their order in the file.
pub(crate) fn sort_records(records: &mut [Record]) {
    records.sort_by(Record::sort_order);
}

fn write_window<W: Write, K: DepositKind>(
    out: &mut W,
    ledger: &DepositLedger<K>,
    (start, end): (Tick, Tick),
) -> io::Result<()> {
    writeln!(out, "  {} in [{start}, {end}]:", K::TICK)?;
    for summary in ledger.query_range(start, end) {
        writeln!(
            out,
            "    trkID={} {} {}, {} MeV at {}",
            summary.track_id,
            summary.quantity,
            K::QUANTITY,
            summary.energy,
            summary.position
        )?;
    }
    for share in ledger.track_shares(start, end) {
        writeln!(
            out,
            "    trkID={} carries {:.3} of the energy",
            share.track_id, share.energy_fraction
        )?;
    }
    Ok(())
}

/// Writes every record's render output; ledgers are followed by their summary over `window`.
pub(crate) fn write_report<W: Write>(
    out: &mut W,
    records: &[Record],
    window: Option<(Tick, Tick)>,
) -> io::Result<()> {
    for record in records {
        let text = record.to_string();
        write!(out, "{text}")?;
        if !text.ends_with('\n') {
            writeln!(out)?;
        }
        if let Some(window) = window {
            match record {
                Record::SimChannel(ledger) => write_window(out, ledger, window)?,
                Record::SimOpChannel(ledger) => write_window(out, ledger, window)?,
                _ => {}
            }
        }
    }
    Ok(())
}
