//! Charged groups and aromatic rings: ionic, pi-stacking and cation-pi.

use super::common::{any_member_within, valid_pair};
use super::{FeatureProvider, InteractionFamily, LinkTester, UnitContext};
use crate::core::chemistry::names::{
    is_histidine, is_nucleotide, is_phosphate_oxygen, is_polymer,
};
use crate::core::models::element::Element;
use crate::core::models::ids::UnitAtomIndex;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::{plane_normal, plane_offset, vector_angle};
use crate::engine::config::{CationPiParams, IonicParams, ParamSpec, PiStackingParams};
use crate::engine::features::builder::FeaturesBuilder;
use crate::engine::features::{FeatureGroup, FeatureInfo, FeatureType};
use crate::engine::links::InteractionType;
use nalgebra::{Point3, Vector3};
use std::f64::consts::{FRAC_PI_2, PI};

pub const IONIC_PARAMS: &[ParamSpec] = &[
    ParamSpec::flag("enabled", "Detect ionic interactions", true),
    ParamSpec::distance("distance-max", "Maximum distance between charged atoms", 5.0, 0.0, 10.0),
];

pub const PI_STACKING_PARAMS: &[ParamSpec] = &[
    ParamSpec::flag("enabled", "Detect pi stacking", true),
    ParamSpec::distance("distance-max", "Maximum ring center distance", 5.5, 1.0, 8.0),
    ParamSpec::distance("offset-max", "Maximum in-plane ring center offset", 2.0, 0.0, 4.0),
    ParamSpec::angle(
        "angle-dev-max",
        "Maximum deviation from parallel or T-shaped ring planes",
        30.0,
        0.0,
        180.0,
    ),
];

pub const CATION_PI_PARAMS: &[ParamSpec] = &[
    ParamSpec::flag("enabled", "Detect cation-pi interactions", true),
    ParamSpec::distance("distance-max", "Maximum cation to ring center distance", 6.0, 1.0, 8.0),
    ParamSpec::distance(
        "offset-max",
        "Maximum offset of the cation from the ring axis",
        2.2,
        0.0,
        4.0,
    ),
];

/// Upper bound on the distance from a charged group's center to any member.
const GROUP_RADIUS_MAX: f64 = 1.5;

struct Neighbor {
    index: UnitAtomIndex,
    element: Element,
    heavy_bonds: u8,
}

fn neighbors(ctx: &UnitContext<'_>, i: UnitAtomIndex) -> Vec<Neighbor> {
    ctx.bonded_in_unit(i)
        .into_iter()
        .filter(|&j| !ctx.unit.element(j).is_hydrogen())
        .map(|j| Neighbor {
            index: j,
            element: ctx.unit.element(j),
            heavy_bonds: ctx.valence.heavy_bonds(j),
        })
        .collect()
}

fn count(neighbors: &[Neighbor], element: Element) -> usize {
    neighbors.iter().filter(|n| n.element == element).count()
}

/// Oxygens bonded to nothing else.
fn terminal_oxygens(neighbors: &[Neighbor]) -> Vec<UnitAtomIndex> {
    neighbors
        .iter()
        .filter(|n| n.element == Element::O && n.heavy_bonds == 1)
        .map(|n| n.index)
        .collect()
}

/// Emits one feature over `members` unless any of them is already consumed.
fn add_group(
    ctx: &UnitContext<'_>,
    builder: &mut FeaturesBuilder,
    consumed: &mut [bool],
    feature_type: FeatureType,
    group: FeatureGroup,
    members: &[UnitAtomIndex],
) -> bool {
    if members.is_empty() || members.iter().any(|&m| consumed[m]) {
        return false;
    }
    for &m in members {
        consumed[m] = true;
        ctx.push_member(builder, m);
    }
    builder.add_state(feature_type, group);
    true
}

/// Named members of the residue of `i`, in the given order, skipping absent ones.
fn residue_members(ctx: &UnitContext<'_>, i: UnitAtomIndex, names: &[&str]) -> Vec<UnitAtomIndex> {
    names
        .iter()
        .filter_map(|name| ctx.residue_atom(i, name))
        .collect()
}

pub struct PositiveChargeProvider;

impl FeatureProvider for PositiveChargeProvider {
    fn name(&self) -> &'static str {
        "positive-charges"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::PositiveCharge]
    }

    fn add(&self, ctx: &UnitContext<'_>, builder: &mut FeaturesBuilder) {
        let t = FeatureType::PositiveCharge;
        let mut consumed = vec![false; ctx.unit.len()];

        for i in 0..ctx.unit.len() {
            if consumed[i] {
                continue;
            }
            let (residue, name) = (ctx.residue_name(i), ctx.atom_name(i));
            if residue == "ARG" && matches!(name, "NE" | "NH1" | "NH2") {
                let members = residue_members(ctx, i, &["NE", "NH1", "NH2"]);
                add_group(ctx, builder, &mut consumed, t, FeatureGroup::Guanidine, &members);
            } else if residue == "LYS" && name == "NZ" {
                add_group(ctx, builder, &mut consumed, t, FeatureGroup::None, &[i]);
            } else if is_histidine(residue) && matches!(name, "ND1" | "NE2") {
                let members = residue_members(ctx, i, &["ND1", "NE2"]);
                add_group(ctx, builder, &mut consumed, t, FeatureGroup::None, &members);
            } else if !is_polymer(residue) {
                let bonded = neighbors(ctx, i);
                let charge = ctx.valence.charge(i);
                match ctx.unit.element(i) {
                    Element::N if bonded.len() == 4 && count(&bonded, Element::C) == 4 => {
                        add_group(ctx, builder, &mut consumed, t, FeatureGroup::QuaternaryAmine, &[i]);
                    }
                    Element::N if bonded.len() == 3 && charge > 0 => {
                        add_group(ctx, builder, &mut consumed, t, FeatureGroup::TertiaryAmine, &[i]);
                    }
                    Element::S if bonded.len() == 3 && count(&bonded, Element::C) == 3 => {
                        add_group(ctx, builder, &mut consumed, t, FeatureGroup::Sulfonium, &[i]);
                    }
                    Element::C if bonded.len() == 3 && count(&bonded, Element::N) == 3 => {
                        let members: Vec<_> = bonded.iter().map(|n| n.index).collect();
                        add_group(ctx, builder, &mut consumed, t, FeatureGroup::Guanidine, &members);
                    }
                    Element::C
                        if bonded.len() == 3
                            && count(&bonded, Element::N) == 2
                            && count(&bonded, Element::C) == 1 =>
                    {
                        let members: Vec<_> = bonded
                            .iter()
                            .filter(|n| n.element == Element::N)
                            .map(|n| n.index)
                            .collect();
                        add_group(ctx, builder, &mut consumed, t, FeatureGroup::Acetamidine, &members);
                    }
                    _ => {}
                }
            }
        }

        for i in 0..ctx.unit.len() {
            if !consumed[i] && ctx.valence.charge(i) > 0 {
                add_group(ctx, builder, &mut consumed, t, FeatureGroup::None, &[i]);
            }
        }
    }
}

pub struct NegativeChargeProvider;

impl FeatureProvider for NegativeChargeProvider {
    fn name(&self) -> &'static str {
        "negative-charges"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::NegativeCharge]
    }

    fn add(&self, ctx: &UnitContext<'_>, builder: &mut FeaturesBuilder) {
        let t = FeatureType::NegativeCharge;
        let mut consumed = vec![false; ctx.unit.len()];

        for i in 0..ctx.unit.len() {
            if consumed[i] {
                continue;
            }
            let (residue, name) = (ctx.residue_name(i), ctx.atom_name(i));
            if residue == "ASP" && matches!(name, "OD1" | "OD2") {
                let members = residue_members(ctx, i, &["OD1", "OD2"]);
                add_group(ctx, builder, &mut consumed, t, FeatureGroup::Carboxylate, &members);
            } else if residue == "GLU" && matches!(name, "OE1" | "OE2") {
                let members = residue_members(ctx, i, &["OE1", "OE2"]);
                add_group(ctx, builder, &mut consumed, t, FeatureGroup::Carboxylate, &members);
            } else if is_nucleotide(residue) && is_phosphate_oxygen(name) {
                let members: Vec<_> = ctx
                    .unit
                    .residue(i)
                    .atoms()
                    .iter()
                    .filter_map(|&atom| ctx.unit.local_index(atom))
                    .filter(|&j| is_phosphate_oxygen(ctx.atom_name(j)))
                    .collect();
                add_group(ctx, builder, &mut consumed, t, FeatureGroup::Phosphate, &members);
            } else if !is_polymer(residue) {
                let bonded = neighbors(ctx, i);
                let oxygens = count(&bonded, Element::O);
                let group = match ctx.unit.element(i) {
                    Element::S if oxygens == 3 && count(&bonded, Element::C) == 1 => {
                        Some(FeatureGroup::SulfonicAcid)
                    }
                    Element::S if oxygens == 4 => Some(FeatureGroup::Sulfate),
                    Element::P if oxygens >= 3 => Some(FeatureGroup::Phosphate),
                    Element::C if terminal_oxygens(&bonded).len() == 2 => {
                        Some(FeatureGroup::Carboxylate)
                    }
                    _ => None,
                };
                if let Some(group) = group {
                    let members = terminal_oxygens(&bonded);
                    add_group(ctx, builder, &mut consumed, t, group, &members);
                }
            }
        }

        for i in 0..ctx.unit.len() {
            if !consumed[i] && ctx.valence.charge(i) < 0 {
                add_group(ctx, builder, &mut consumed, t, FeatureGroup::None, &[i]);
            }
        }
    }
}

/// One feature per aromatic ring, members in ring order.
pub struct AromaticRingProvider;

impl FeatureProvider for AromaticRingProvider {
    fn name(&self) -> &'static str {
        "aromatic-rings"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::AromaticRing]
    }

    fn add(&self, ctx: &UnitContext<'_>, builder: &mut FeaturesBuilder) {
        for ring in &ctx.rings {
            for &member in ring {
                ctx.push_member(builder, member);
            }
            builder.add_state(FeatureType::AromaticRing, FeatureGroup::None);
        }
    }
}

/// Unit normal of a ring from its first three members, in the structure frame.
fn ring_normal(ring: &FeatureInfo<'_>) -> Option<Vector3<f64>> {
    let positions: Vec<Point3<f64>> = ring
        .members()
        .iter()
        .take(3)
        .map(|&m| ring.unit.position(m as usize))
        .collect();
    let [a, b, c] = positions.as_slice() else {
        return None;
    };
    plane_normal(a, b, c)
}

pub struct IonicTester {
    distance_max: f64,
}

impl IonicTester {
    pub fn new(params: &IonicParams) -> Self {
        Self {
            distance_max: params.distance_max,
        }
    }
}

impl LinkTester for IonicTester {
    fn family(&self) -> InteractionFamily {
        InteractionFamily::Ionic
    }

    /// Members may be closer than the group centers, so the reach covers the
    /// widest group on both sides.
    fn max_distance(&self) -> f64 {
        self.distance_max + 2.0 * GROUP_RADIUS_MAX
    }

    fn get_type(
        &self,
        structure: &Structure,
        a: &FeatureInfo<'_>,
        b: &FeatureInfo<'_>,
        _distance_sq: f64,
    ) -> Option<InteractionType> {
        let opposite = matches!(
            (a.feature_type(), b.feature_type()),
            (FeatureType::PositiveCharge, FeatureType::NegativeCharge)
                | (FeatureType::NegativeCharge, FeatureType::PositiveCharge)
        );
        (opposite && valid_pair(structure, a, b) && any_member_within(a, b, self.distance_max))
            .then_some(InteractionType::Ionic)
    }
}

pub struct PiStackingTester {
    distance_max: f64,
    offset_max: f64,
    angle_dev_max: f64,
}

impl PiStackingTester {
    pub fn new(params: &PiStackingParams) -> Self {
        Self {
            distance_max: params.distance_max,
            offset_max: params.offset_max,
            angle_dev_max: params.angle_dev_max.to_radians(),
        }
    }
}

impl LinkTester for PiStackingTester {
    fn family(&self) -> InteractionFamily {
        InteractionFamily::PiStacking
    }

    fn max_distance(&self) -> f64 {
        self.distance_max
    }

    fn get_type(
        &self,
        structure: &Structure,
        a: &FeatureInfo<'_>,
        b: &FeatureInfo<'_>,
        _distance_sq: f64,
    ) -> Option<InteractionType> {
        if a.feature_type() != FeatureType::AromaticRing
            || b.feature_type() != FeatureType::AromaticRing
            || !valid_pair(structure, a, b)
        {
            return None;
        }
        let (normal_a, normal_b) = (ring_normal(a)?, ring_normal(b)?);
        let (center_a, center_b) = (a.center(), b.center());

        let offset = plane_offset(&center_a, &normal_a, &center_b)
            .min(plane_offset(&center_b, &normal_b, &center_a));
        if offset > self.offset_max {
            return None;
        }

        let angle = vector_angle(&normal_a, &normal_b);
        let parallel = angle <= self.angle_dev_max || angle >= PI - self.angle_dev_max;
        let t_shaped = (FRAC_PI_2 - angle).abs() <= self.angle_dev_max;
        (parallel || t_shaped).then_some(InteractionType::PiStacking)
    }
}

pub struct CationPiTester {
    distance_max: f64,
    offset_max: f64,
}

impl CationPiTester {
    pub fn new(params: &CationPiParams) -> Self {
        Self {
            distance_max: params.distance_max,
            offset_max: params.offset_max,
        }
    }
}

impl LinkTester for CationPiTester {
    fn family(&self) -> InteractionFamily {
        InteractionFamily::CationPi
    }

    fn max_distance(&self) -> f64 {
        self.distance_max
    }

    fn get_type(
        &self,
        structure: &Structure,
        a: &FeatureInfo<'_>,
        b: &FeatureInfo<'_>,
        _distance_sq: f64,
    ) -> Option<InteractionType> {
        let (ring, cation) = match (a.feature_type(), b.feature_type()) {
            (FeatureType::AromaticRing, FeatureType::PositiveCharge) => (a, b),
            (FeatureType::PositiveCharge, FeatureType::AromaticRing) => (b, a),
            _ => return None,
        };
        if !valid_pair(structure, ring, cation) {
            return None;
        }
        let normal = ring_normal(ring)?;
        (plane_offset(&ring.center(), &normal, &cation.center()) <= self.offset_max)
            .then_some(InteractionType::CationPi)
    }
}
