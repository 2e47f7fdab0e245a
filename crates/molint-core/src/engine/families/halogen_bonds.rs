//! Halogen bonds: a carbon-bound halogen's sigma hole pointing at a lone pair.

use super::common::valid_pair;
use super::{FeatureProvider, InteractionFamily, LinkTester, UnitContext};
use crate::core::models::element::Element;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::calc_angles;
use crate::engine::config::{HalogenBondParams, ParamSpec};
use crate::engine::features::builder::FeaturesBuilder;
use crate::engine::features::{FeatureGroup, FeatureInfo, FeatureType};
use crate::engine::links::InteractionType;
use std::f64::consts::PI;

pub const HALOGEN_BOND_PARAMS: &[ParamSpec] = &[
    ParamSpec::flag("enabled", "Detect halogen bonds", true),
    ParamSpec::distance("distance-max", "Maximum halogen-acceptor distance", 4.0, 1.0, 5.0),
    ParamSpec::angle(
        "angle-max",
        "Maximum deviation from the optimal donor and acceptor angles",
        30.0,
        0.0,
        60.0,
    ),
];

const OPTIMAL_ACCEPTOR_ANGLE: f64 = 120.0;

/// Cl, Br, I and At covalently bound to carbon.
pub struct HalogenDonorProvider;

impl FeatureProvider for HalogenDonorProvider {
    fn name(&self) -> &'static str {
        "halogen-donors"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::HalogenDonor]
    }

    fn add(&self, ctx: &UnitContext<'_>, builder: &mut FeaturesBuilder) {
        for i in 0..ctx.unit.len() {
            if !matches!(
                ctx.unit.element(i),
                Element::Cl | Element::Br | Element::I | Element::At
            ) {
                continue;
            }
            let mut on_carbon = false;
            ctx.structure.each_bonded_atom(ctx.unit, i, |other, j, _| {
                on_carbon |= other.element(j).is_carbon();
            });
            // Halide ions and halogens on other elements carry no sigma hole.
            if on_carbon {
                ctx.add_one(builder, FeatureType::HalogenDonor, FeatureGroup::Halocarbon, i);
            }
        }
    }
}

/// N, O and S bonded to C, N, P or S.
pub struct HalogenAcceptorProvider;

impl FeatureProvider for HalogenAcceptorProvider {
    fn name(&self) -> &'static str {
        "halogen-acceptors"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::HalogenAcceptor]
    }

    fn add(&self, ctx: &UnitContext<'_>, builder: &mut FeaturesBuilder) {
        for i in 0..ctx.unit.len() {
            if !matches!(ctx.unit.element(i), Element::N | Element::O | Element::S) {
                continue;
            }
            let mut anchored = false;
            ctx.structure.each_bonded_atom(ctx.unit, i, |other, j, _| {
                anchored |= matches!(
                    other.element(j),
                    Element::C | Element::N | Element::P | Element::S
                );
            });
            if anchored {
                ctx.add_one(builder, FeatureType::HalogenAcceptor, FeatureGroup::None, i);
            }
        }
    }
}

pub struct HalogenBondTester {
    distance_max: f64,
    angle_max: f64,
}

impl HalogenBondTester {
    pub fn new(params: &HalogenBondParams) -> Self {
        Self {
            distance_max: params.distance_max,
            angle_max: params.angle_max.to_radians(),
        }
    }
}

impl LinkTester for HalogenBondTester {
    fn family(&self) -> InteractionFamily {
        InteractionFamily::HalogenBonds
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
        let (don, acc) = match (a.feature_type(), b.feature_type()) {
            (FeatureType::HalogenDonor, FeatureType::HalogenAcceptor) => (a, b),
            (FeatureType::HalogenAcceptor, FeatureType::HalogenDonor) => (b, a),
            _ => return None,
        };
        if don.group() != FeatureGroup::Halocarbon || !valid_pair(structure, don, acc) {
            return None;
        }

        let don_angles = calc_angles(structure, don.unit, don.atom(), acc.unit, acc.atom(), false);
        let [don_angle] = don_angles.as_slice() else {
            return None;
        };
        if (PI - don_angle).abs() > self.angle_max {
            return None;
        }

        let acc_angles = calc_angles(structure, acc.unit, acc.atom(), don.unit, don.atom(), true);
        let optimal = OPTIMAL_ACCEPTOR_ANGLE.to_radians();
        if acc_angles.is_empty()
            || acc_angles
                .iter()
                .any(|angle| (optimal - angle).abs() > self.angle_max)
        {
            return None;
        }

        Some(InteractionType::HalogenBond)
    }
}

#[cfg(test)]
mod tests {
    use super::super::common::fixtures::structure;
    use super::*;
    use crate::core::models::topology::BondOrder;
    use crate::engine::config::InteractionsParams;
    use crate::engine::progress::{CancellationToken, ProgressReporter};
    use crate::engine::tasks::interactions::run;
    use std::collections::BTreeMap;

    /// C-Cl in residue 1 and C=O in residue 2 with the given angles in degrees.
    fn chloro_carbonyl(donor_angle: f64, acceptor_angle: f64) -> Structure {
        let (d, a) = (donor_angle.to_radians(), acceptor_angle.to_radians());
        structure(
            &[
                (
                    "LIG",
                    &[
                        ("C1", Element::C, [1.75 * d.cos(), 1.75 * d.sin(), 0.0]),
                        ("CL1", Element::Cl, [0.0, 0.0, 0.0]),
                    ],
                ),
                (
                    "LIH",
                    &[
                        ("O1", Element::O, [3.0, 0.0, 0.0]),
                        ("C2", Element::C, [3.0 - 1.23 * a.cos(), 1.23 * a.sin(), 0.0]),
                    ],
                ),
            ],
            &[(0, 1, BondOrder::Single), (2, 3, BondOrder::Double)],
        )
    }

    fn classify(s: &Structure) -> Option<InteractionType> {
        let unit = s.units().next().unwrap();
        let ctx = UnitContext::new(s, unit);
        let mut builder = FeaturesBuilder::new(4, 4);
        HalogenDonorProvider.add(&ctx, &mut builder);
        HalogenAcceptorProvider.add(&ctx, &mut builder);
        let features = builder.get_features(unit.len());
        assert_eq!(features.len(), 2);
        let tester = HalogenBondTester::new(&HalogenBondParams::default());
        tester.get_type(
            s,
            &FeatureInfo::new(unit, &features, 0),
            &FeatureInfo::new(unit, &features, 1),
            9.0,
        )
    }

    #[test]
    fn donor_bound_to_carbon_is_a_halocarbon() {
        let s = chloro_carbonyl(179.0, 118.0);
        let unit = s.units().next().unwrap();
        let ctx = UnitContext::new(&s, unit);
        let mut builder = FeaturesBuilder::new(4, 4);
        HalogenDonorProvider.add(&ctx, &mut builder);
        let features = builder.get_features(unit.len());
        assert_eq!(features.group(0), FeatureGroup::Halocarbon);
        assert_eq!(features.members(0), &[1]);
    }

    #[test]
    fn near_linear_halogen_bond_is_accepted() {
        assert_eq!(
            classify(&chloro_carbonyl(179.0, 118.0)),
            Some(InteractionType::HalogenBond)
        );
    }

    #[test]
    fn bent_donor_angle_is_rejected() {
        assert_eq!(classify(&chloro_carbonyl(60.0, 118.0)), None);
    }

    #[test]
    fn acceptor_far_from_trigonal_angle_is_rejected() {
        assert_eq!(classify(&chloro_carbonyl(179.0, 170.0)), None);
    }

    #[test]
    fn acceptor_angle_of_sixty_degrees_is_rejected() {
        assert_eq!(classify(&chloro_carbonyl(179.0, 60.0)), None);
    }

    #[test]
    fn halide_ions_are_not_donors() {
        let s = structure(
            &[
                ("CL", &[("CL", Element::Cl, [0.0, 0.0, 0.0])]),
                ("LIH", &[("O1", Element::O, [3.0, 0.0, 0.0]), ("C2", Element::C, [3.6, 1.1, 0.0])]),
            ],
            &[(1, 2, BondOrder::Double)],
        );
        let unit = s.units().next().unwrap();
        let ctx = UnitContext::new(&s, unit);
        let mut builder = FeaturesBuilder::new(4, 4);
        HalogenDonorProvider.add(&ctx, &mut builder);
        assert!(builder.get_features(unit.len()).is_empty());
    }

    #[test]
    fn full_detection_finds_one_halogen_bond() {
        let detect = |s: &Structure| {
            run(
                s,
                &InteractionsParams::default(),
                &ProgressReporter::new(),
                &CancellationToken::new(),
            )
            .unwrap()
            .unwrap()
        };

        let accepted = detect(&chloro_carbonyl(179.0, 118.0));
        assert_eq!(
            accepted.summary(),
            BTreeMap::from([(InteractionType::HalogenBond, 1)])
        );

        let displaced = detect(&chloro_carbonyl(179.0, 60.0));
        assert_eq!(displaced.count(), 0);
    }
}
