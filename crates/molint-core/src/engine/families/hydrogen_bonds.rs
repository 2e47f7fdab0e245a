//! Hydrogen bonds and weak (C-H donor) hydrogen bonds.

use super::common::valid_pair;
use super::{FeatureProvider, InteractionFamily, LinkTester, UnitContext};
use crate::core::chemistry::names::{
    is_amino_acid, is_histidine_ring_nitrogen, is_protein_backbone_atom, is_water,
};
use crate::core::chemistry::valence::{AtomGeometry, AtomValence};
use crate::core::models::element::Element;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::{calc_angles, calc_hydrogen_angles, calc_plane_angle};
use crate::engine::config::{HydrogenBondParams, ParamSpec, WeakHydrogenBondParams};
use crate::engine::features::builder::FeaturesBuilder;
use crate::engine::features::{FeatureGroup, FeatureInfo, FeatureType};
use crate::engine::links::InteractionType;

pub const HYDROGEN_BOND_PARAMS: &[ParamSpec] = &[
    ParamSpec::flag("enabled", "Detect hydrogen bonds", true),
    ParamSpec::distance("distance-max", "Maximum donor-acceptor distance", 3.5, 1.0, 5.0),
    ParamSpec::distance(
        "sulfur-distance-max",
        "Maximum donor-acceptor distance when sulfur is involved",
        4.1,
        1.0,
        5.0,
    ),
    ParamSpec::angle(
        "acc-angle-dev-max",
        "Maximum deviation below the acceptor's ideal angle",
        45.0,
        0.0,
        180.0,
    ),
    ParamSpec::angle(
        "don-angle-dev-max",
        "Maximum deviation from the donor's ideal angle",
        45.0,
        0.0,
        180.0,
    ),
    ParamSpec::angle(
        "acc-out-of-plane-angle-max",
        "Maximum out-of-plane angle at trigonal acceptors",
        90.0,
        0.0,
        180.0,
    ),
    ParamSpec::angle(
        "don-out-of-plane-angle-max",
        "Maximum out-of-plane angle at trigonal donors",
        45.0,
        0.0,
        180.0,
    ),
    ParamSpec::flag("include-backbone", "Include backbone-backbone pairs", true),
    ParamSpec::flag("include-water", "Include water molecules", false),
];

pub const WEAK_HYDROGEN_BOND_PARAMS: &[ParamSpec] = &[
    ParamSpec::flag("enabled", "Detect weak (C-H donor) hydrogen bonds", false),
    ParamSpec::distance("distance-max", "Maximum donor-acceptor distance", 4.0, 1.0, 5.0),
    ParamSpec::distance(
        "sulfur-distance-max",
        "Maximum donor-acceptor distance when sulfur is involved",
        4.1,
        1.0,
        5.0,
    ),
    ParamSpec::angle(
        "acc-angle-dev-max",
        "Maximum deviation below the acceptor's ideal angle",
        45.0,
        0.0,
        180.0,
    ),
    ParamSpec::angle(
        "don-angle-dev-max",
        "Maximum deviation from the donor's ideal angle",
        45.0,
        0.0,
        180.0,
    ),
    ParamSpec::angle(
        "acc-out-of-plane-angle-max",
        "Maximum out-of-plane angle at trigonal acceptors",
        90.0,
        0.0,
        180.0,
    ),
    ParamSpec::angle(
        "don-out-of-plane-angle-max",
        "Maximum out-of-plane angle at trigonal donors",
        45.0,
        0.0,
        180.0,
    ),
    ParamSpec::flag("include-backbone", "Include backbone-backbone pairs", true),
    ParamSpec::flag("include-water", "Include water molecules", false),
];

/// N, O and S carrying hydrogens, plus both histidine ring nitrogens.
pub struct HydrogenDonorProvider;

impl FeatureProvider for HydrogenDonorProvider {
    fn name(&self) -> &'static str {
        "hydrogen-donors"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::HydrogenDonor]
    }

    fn add(&self, ctx: &UnitContext<'_>, builder: &mut FeaturesBuilder) {
        for i in 0..ctx.unit.len() {
            let element = ctx.unit.element(i);
            let is_donor = (matches!(element, Element::N | Element::O | Element::S)
                && ctx.valence.total_hydrogens(i) > 0)
                || is_histidine_ring_nitrogen(ctx.residue_name(i), ctx.atom_name(i));
            if is_donor {
                ctx.add_one(builder, FeatureType::HydrogenDonor, FeatureGroup::None, i);
            }
        }
    }
}

/// Carbons with hydrogens that are polarized by a bonded N or O or sit in an
/// aromatic ring.
pub struct WeakHydrogenDonorProvider;

impl FeatureProvider for WeakHydrogenDonorProvider {
    fn name(&self) -> &'static str {
        "weak-hydrogen-donors"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::WeakHydrogenDonor]
    }

    fn add(&self, ctx: &UnitContext<'_>, builder: &mut FeaturesBuilder) {
        for i in 0..ctx.unit.len() {
            if !ctx.unit.element(i).is_carbon() || ctx.valence.total_hydrogens(i) == 0 {
                continue;
            }
            let mut polarized = ctx.in_aromatic_ring(i);
            if !polarized {
                ctx.structure.each_bonded_atom(ctx.unit, i, |other, j, _| {
                    if matches!(other.element(j), Element::N | Element::O) {
                        polarized = true;
                    }
                });
            }
            if polarized {
                ctx.add_one(builder, FeatureType::WeakHydrogenDonor, FeatureGroup::None, i);
            }
        }
    }
}

/// Oxygens, unprotonated neutral or anionic nitrogens with a free valence,
/// histidine ring nitrogens, and methionine/cysteine or anionic sulfur.
pub struct HydrogenAcceptorProvider;

impl FeatureProvider for HydrogenAcceptorProvider {
    fn name(&self) -> &'static str {
        "hydrogen-acceptors"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::HydrogenAcceptor]
    }

    fn add(&self, ctx: &UnitContext<'_>, builder: &mut FeaturesBuilder) {
        for i in 0..ctx.unit.len() {
            let is_acceptor = match ctx.unit.element(i) {
                Element::O => true,
                Element::N => {
                    is_histidine_ring_nitrogen(ctx.residue_name(i), ctx.atom_name(i))
                        || (ctx.valence.total_hydrogens(i) == 0
                            && ctx.valence.charge(i) <= 0
                            && ctx.valence.total_bonds(i) < 4)
                }
                Element::S => {
                    matches!(ctx.residue_name(i), "MET" | "CYS") || ctx.valence.charge(i) < 0
                }
                _ => false,
            };
            if is_acceptor {
                ctx.add_one(builder, FeatureType::HydrogenAcceptor, FeatureGroup::None, i);
            }
        }
    }
}

/// Geometric hydrogen bond test. The weak variant pairs C-H donors instead.
pub struct HydrogenBondTester {
    weak: bool,
    distance_max: f64,
    sulfur_distance_max: f64,
    acc_angle_dev_max: f64,
    don_angle_dev_max: f64,
    acc_out_of_plane_angle_max: f64,
    don_out_of_plane_angle_max: f64,
    include_backbone: bool,
    include_water: bool,
}

impl HydrogenBondTester {
    pub fn new(params: &HydrogenBondParams) -> Self {
        Self {
            weak: false,
            distance_max: params.distance_max,
            sulfur_distance_max: params.sulfur_distance_max,
            acc_angle_dev_max: params.acc_angle_dev_max.to_radians(),
            don_angle_dev_max: params.don_angle_dev_max.to_radians(),
            acc_out_of_plane_angle_max: params.acc_out_of_plane_angle_max.to_radians(),
            don_out_of_plane_angle_max: params.don_out_of_plane_angle_max.to_radians(),
            include_backbone: params.include_backbone,
            include_water: params.include_water,
        }
    }

    pub fn weak(params: &WeakHydrogenBondParams) -> Self {
        Self {
            weak: true,
            ..Self::new(&HydrogenBondParams::from(params))
        }
    }

    /// Orders the pair as (donor, acceptor) if the feature types match.
    fn orient<'b, 'a>(
        &self,
        a: &'b FeatureInfo<'a>,
        b: &'b FeatureInfo<'a>,
    ) -> Option<(&'b FeatureInfo<'a>, &'b FeatureInfo<'a>)> {
        let is_donor = |t: FeatureType| {
            if self.weak {
                t == FeatureType::WeakHydrogenDonor
            } else {
                t == FeatureType::HydrogenDonor
            }
        };
        let is_acceptor = |t: FeatureType| {
            t == FeatureType::HydrogenAcceptor
                || (self.weak && t == FeatureType::WeakHydrogenAcceptor)
        };
        if is_donor(a.feature_type()) && is_acceptor(b.feature_type()) {
            Some((a, b))
        } else if is_donor(b.feature_type()) && is_acceptor(a.feature_type()) {
            Some((b, a))
        } else {
            None
        }
    }

    fn check_geometry(
        &self,
        structure: &Structure,
        don: &FeatureInfo<'_>,
        acc: &FeatureInfo<'_>,
    ) -> bool {
        let (d, a) = (don.atom(), acc.atom());
        let don_valence = AtomValence::perceive(structure, don.unit, d);

        if let Some(ideal) = don_valence.geometry.ideal_angle() {
            let angles = calc_angles(structure, don.unit, d, acc.unit, a, true);
            if angles
                .iter()
                .any(|angle| (ideal - angle).abs() > self.don_angle_dev_max)
            {
                return false;
            }
        }

        if don_valence.explicit_hydrogens > 0 {
            let h_angles = calc_hydrogen_angles(structure, don.unit, d, acc.unit, a);
            if !h_angles.iter().any(|&angle| angle <= self.don_angle_dev_max) {
                return false;
            }
        }

        if don_valence.geometry == AtomGeometry::Trigonal
            && let Some(out_of_plane) = calc_plane_angle(structure, don.unit, d, acc.unit, a)
            && out_of_plane > self.don_out_of_plane_angle_max
        {
            return false;
        }

        let acc_valence = AtomValence::perceive(structure, acc.unit, a);
        if let Some(ideal) = acc_valence.geometry.ideal_angle() {
            let angles = calc_angles(structure, acc.unit, a, don.unit, d, true);
            if angles
                .iter()
                .any(|angle| ideal - angle > self.acc_angle_dev_max)
            {
                return false;
            }
        }

        if acc_valence.geometry == AtomGeometry::Trigonal
            && let Some(out_of_plane) = calc_plane_angle(structure, acc.unit, a, don.unit, d)
            && out_of_plane > self.acc_out_of_plane_angle_max
        {
            return false;
        }

        true
    }
}

impl LinkTester for HydrogenBondTester {
    fn family(&self) -> InteractionFamily {
        if self.weak {
            InteractionFamily::WeakHydrogenBonds
        } else {
            InteractionFamily::HydrogenBonds
        }
    }

    fn max_distance(&self) -> f64 {
        self.distance_max.max(self.sulfur_distance_max)
    }

    fn get_type(
        &self,
        structure: &Structure,
        a: &FeatureInfo<'_>,
        b: &FeatureInfo<'_>,
        distance_sq: f64,
    ) -> Option<InteractionType> {
        let (don, acc) = self.orient(a, b)?;
        if !valid_pair(structure, don, acc) {
            return None;
        }

        let (d, ac) = (don.atom(), acc.atom());
        let involves_sulfur =
            don.unit.element(d) == Element::S || acc.unit.element(ac) == Element::S;
        let limit = if involves_sulfur {
            self.sulfur_distance_max
        } else {
            self.distance_max
        };
        if distance_sq > limit * limit {
            return None;
        }

        let (don_residue, acc_residue) = (&don.unit.residue(d).name, &acc.unit.residue(ac).name);
        if !self.include_water && (is_water(don_residue) || is_water(acc_residue)) {
            return None;
        }
        if !self.include_backbone
            && is_amino_acid(don_residue)
            && is_amino_acid(acc_residue)
            && is_protein_backbone_atom(&don.unit.atom(d).name)
            && is_protein_backbone_atom(&acc.unit.atom(ac).name)
        {
            return None;
        }

        if !self.check_geometry(structure, don, acc) {
            return None;
        }

        Some(if self.weak {
            InteractionType::WeakHydrogenBond
        } else {
            InteractionType::HydrogenBond
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::common::fixtures::structure;
    use super::*;
    use crate::core::models::topology::BondOrder;
    use crate::engine::features::Features;

    fn features_of(ctx: &UnitContext<'_>, providers: &[&dyn FeatureProvider]) -> Features {
        let mut builder = FeaturesBuilder::new(8, 8);
        for p in providers {
            p.add(ctx, &mut builder);
        }
        builder.get_features(ctx.unit.len())
    }

    fn find(features: &Features, t: FeatureType, atom: usize) -> usize {
        (0..features.len())
            .find(|&i| features.feature_type(i) == t && features.members(i)[0] as usize == atom)
            .unwrap()
    }

    /// Hydroxyl C-O-H in residue 1 pointing at an amine N in residue 2, with
    /// a tetrahedral C-O···N angle.
    fn hydroxyl_amine(distance: f64) -> Structure {
        structure(
            &[
                (
                    "LIG",
                    &[
                        ("C1", Element::C, [-0.477, 1.348, 0.0]),
                        ("O1", Element::O, [0.0, 0.0, 0.0]),
                        ("H1", Element::H, [0.96, 0.0, 0.0]),
                    ],
                ),
                (
                    "LIH",
                    &[
                        ("N1", Element::N, [distance, 0.0, 0.0]),
                        ("C2", Element::C, [distance + 0.5, 1.4, 0.0]),
                        ("C3", Element::C, [distance + 0.5, -0.7, 1.2]),
                        ("C4", Element::C, [distance + 0.5, -0.7, -1.2]),
                    ],
                ),
            ],
            &[
                (0, 1, BondOrder::Single),
                (1, 2, BondOrder::Single),
                (3, 4, BondOrder::Single),
                (3, 5, BondOrder::Single),
                (3, 6, BondOrder::Single),
            ],
        )
    }

    #[test]
    fn providers_find_donors_and_acceptors() {
        let s = hydroxyl_amine(2.8);
        let unit = s.units().next().unwrap();
        let ctx = UnitContext::new(&s, unit);
        let features = features_of(&ctx, &[&HydrogenDonorProvider, &HydrogenAcceptorProvider]);
        let types: Vec<_> = features.types().to_vec();
        assert_eq!(
            types,
            vec![
                FeatureType::HydrogenDonor,
                FeatureType::HydrogenAcceptor,
                FeatureType::HydrogenAcceptor
            ]
        );
        assert_eq!(features.members(0), &[1]);
        assert_eq!(features.members(2), &[3]);
    }

    #[test]
    fn tester_accepts_linear_hydrogen_bond() {
        let s = hydroxyl_amine(2.8);
        let unit = s.units().next().unwrap();
        let ctx = UnitContext::new(&s, unit);
        let features = features_of(&ctx, &[&HydrogenDonorProvider, &HydrogenAcceptorProvider]);
        let don = FeatureInfo::new(unit, &features, find(&features, FeatureType::HydrogenDonor, 1));
        let acc =
            FeatureInfo::new(unit, &features, find(&features, FeatureType::HydrogenAcceptor, 3));

        let tester = HydrogenBondTester::new(&HydrogenBondParams::default());
        assert_eq!(
            tester.get_type(&s, &don, &acc, 2.8 * 2.8),
            Some(InteractionType::HydrogenBond)
        );
        assert_eq!(
            tester.get_type(&s, &acc, &don, 2.8 * 2.8),
            Some(InteractionType::HydrogenBond)
        );
    }

    #[test]
    fn tester_rejects_distant_and_same_type_pairs() {
        let s = hydroxyl_amine(3.8);
        let unit = s.units().next().unwrap();
        let ctx = UnitContext::new(&s, unit);
        let features = features_of(&ctx, &[&HydrogenDonorProvider, &HydrogenAcceptorProvider]);
        let don = FeatureInfo::new(unit, &features, find(&features, FeatureType::HydrogenDonor, 1));
        let acc =
            FeatureInfo::new(unit, &features, find(&features, FeatureType::HydrogenAcceptor, 3));
        let tester = HydrogenBondTester::new(&HydrogenBondParams::default());
        assert_eq!(tester.get_type(&s, &don, &acc, 3.8 * 3.8), None);
        assert_eq!(tester.get_type(&s, &don, &don, 0.0), None);
    }

    #[test]
    fn tester_rejects_hydrogen_pointing_away() {
        let s = structure(
            &[
                (
                    "LIG",
                    &[
                        ("C1", Element::C, [-1.43, 0.0, 0.0]),
                        ("O1", Element::O, [0.0, 0.0, 0.0]),
                        ("H1", Element::H, [-0.3, 0.91, 0.0]),
                    ],
                ),
                ("LIH", &[("N1", Element::N, [0.9, -2.6, 0.0])]),
            ],
            &[(0, 1, BondOrder::Single), (1, 2, BondOrder::Single)],
        );
        let unit = s.units().next().unwrap();
        let ctx = UnitContext::new(&s, unit);
        let features = features_of(&ctx, &[&HydrogenDonorProvider, &HydrogenAcceptorProvider]);
        let don = FeatureInfo::new(unit, &features, find(&features, FeatureType::HydrogenDonor, 1));
        let acc =
            FeatureInfo::new(unit, &features, find(&features, FeatureType::HydrogenAcceptor, 3));
        let d_sq = (unit.position(3) - unit.position(1)).norm_squared();
        let tester = HydrogenBondTester::new(&HydrogenBondParams::default());
        assert_eq!(tester.get_type(&s, &don, &acc, d_sq), None);
    }

    #[test]
    fn water_is_excluded_unless_requested() {
        let s = structure(
            &[
                (
                    "HOH",
                    &[
                        ("O", Element::O, [0.0, 0.0, 0.0]),
                        ("H1", Element::H, [0.96, 0.0, 0.0]),
                    ],
                ),
                ("LIG", &[("O1", Element::O, [2.9, 0.0, 0.0])]),
            ],
            &[(0, 1, BondOrder::Single)],
        );
        let unit = s.units().next().unwrap();
        let ctx = UnitContext::new(&s, unit);
        let features = features_of(&ctx, &[&HydrogenDonorProvider, &HydrogenAcceptorProvider]);
        let don = FeatureInfo::new(unit, &features, find(&features, FeatureType::HydrogenDonor, 0));
        let acc =
            FeatureInfo::new(unit, &features, find(&features, FeatureType::HydrogenAcceptor, 2));

        let excluded = HydrogenBondTester::new(&HydrogenBondParams::default());
        assert_eq!(excluded.get_type(&s, &don, &acc, 2.9 * 2.9), None);

        let included = HydrogenBondTester::new(&HydrogenBondParams {
            include_water: true,
            ..Default::default()
        });
        assert_eq!(
            included.get_type(&s, &don, &acc, 2.9 * 2.9),
            Some(InteractionType::HydrogenBond)
        );
    }

    #[test]
    fn weak_donors_require_polarizing_neighbor() {
        let s = structure(
            &[(
                "LIG",
                &[
                    ("C1", Element::C, [0.0, 0.0, 0.0]),
                    ("H1", Element::H, [1.0, 0.0, 0.0]),
                    ("N1", Element::N, [-1.4, 0.0, 0.0]),
                    ("C2", Element::C, [0.0, 1.5, 0.0]),
                    ("H2", Element::H, [0.0, 2.5, 0.0]),
                ],
            )],
            &[
                (0, 1, BondOrder::Single),
                (0, 2, BondOrder::Single),
                (0, 3, BondOrder::Single),
                (3, 4, BondOrder::Single),
            ],
        );
        let unit = s.units().next().unwrap();
        let ctx = UnitContext::new(&s, unit);
        let features = features_of(&ctx, &[&WeakHydrogenDonorProvider]);
        assert_eq!(features.len(), 1);
        assert_eq!(features.members(0), &[0]);
    }

    #[test]
    fn histidine_ring_nitrogens_are_donors_and_acceptors() {
        let s = structure(
            &[(
                "HIS",
                &[
                    ("ND1", Element::N, [0.0, 0.0, 0.0]),
                    ("NE2", Element::N, [2.1, 0.0, 0.0]),
                ],
            )],
            &[],
        );
        let unit = s.units().next().unwrap();
        let ctx = UnitContext::new(&s, unit);
        let donors = features_of(&ctx, &[&HydrogenDonorProvider]);
        let acceptors = features_of(&ctx, &[&HydrogenAcceptorProvider]);
        assert_eq!(donors.len(), 2);
        assert_eq!(acceptors.len(), 2);
    }

    #[test]
    fn sulfur_pairs_use_the_sulfur_cutoff() {
        let tester = HydrogenBondTester::new(&HydrogenBondParams::default());
        assert_eq!(tester.max_distance(), 4.1);
        let weak = HydrogenBondTester::weak(&WeakHydrogenBondParams::default());
        assert_eq!(weak.family(), InteractionFamily::WeakHydrogenBonds);
        assert_eq!(weak.max_distance(), 4.1);
    }
}
