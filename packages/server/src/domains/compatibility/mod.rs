//! Blood-type compatibility table
//!
//! Fixed lookup per standard transfusion medicine. The table is static data,
//! not computed from ABO/Rh rules, to avoid subtly wrong medical logic.

use crate::common::BloodType;

use BloodType::*;

const A_POS_DONORS: &[BloodType] = &[APos, ANeg, OPos, ONeg];
const A_NEG_DONORS: &[BloodType] = &[ANeg, ONeg];
const B_POS_DONORS: &[BloodType] = &[BPos, BNeg, OPos, ONeg];
const B_NEG_DONORS: &[BloodType] = &[BNeg, ONeg];
const AB_POS_DONORS: &[BloodType] = &[APos, ANeg, BPos, BNeg, AbPos, AbNeg, OPos, ONeg];
const AB_NEG_DONORS: &[BloodType] = &[ANeg, BNeg, AbNeg, ONeg];
const O_POS_DONORS: &[BloodType] = &[OPos, ONeg];
const O_NEG_DONORS: &[BloodType] = &[ONeg];

/// Donor types a recipient of the given type may safely receive.
/// Every type is self-compatible; AB+ is the universal recipient and O- the
/// universal donor.
pub fn compatible_donor_types(recipient: BloodType) -> &'static [BloodType] {
    match recipient {
        APos => A_POS_DONORS,
        ANeg => A_NEG_DONORS,
        BPos => B_POS_DONORS,
        BNeg => B_NEG_DONORS,
        AbPos => AB_POS_DONORS,
        AbNeg => AB_NEG_DONORS,
        OPos => O_POS_DONORS,
        ONeg => O_NEG_DONORS,
    }
}

/// Label-based lookup for unvalidated external input. Returns the empty
/// slice for anything outside the canonical eight; never fails.
pub fn compatible_donor_types_for_label(recipient: &str) -> &'static [BloodType] {
    match recipient.parse::<BloodType>() {
        Ok(t) => compatible_donor_types(t),
        Err(_) => &[],
    }
}

/// Whether a donor of type `donor` may give to a recipient of type `recipient`
pub fn is_compatible(donor: BloodType, recipient: BloodType) -> bool {
    compatible_donor_types(recipient).contains(&donor)
}
