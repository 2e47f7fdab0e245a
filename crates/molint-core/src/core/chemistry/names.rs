use phf::{Set, phf_set};

static AMINO_ACID_NAMES: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    "MSE", "SEC", "PYL", "HID", "HIE", "HIP", "HSD", "HSE", "HSP", "CYX",
    "ASH", "GLH", "LYN", "ARN",
};

static NUCLEOTIDE_NAMES: Set<&'static str> = phf_set! {
    "A", "C", "G", "U", "T", "I", "N",
    "DA", "DC", "DG", "DT", "DU", "DI", "DN",
};

static PURINE_NAMES: Set<&'static str> = phf_set! {
    "A", "G", "I", "DA", "DG", "DI",
};

static WATER_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "H2O", "DOD", "D2O", "SOL", "TIP", "TIP3", "TIP4", "SPC",
};

static PROTEIN_BACKBONE_NAMES: Set<&'static str> = phf_set! {
    "N", "CA", "C", "O", "OXT", "H", "HN", "HA", "H1", "H2", "H3",
    "HA2", "HA3", "OT1", "OT2",
};

static PHOSPHATE_OXYGEN_NAMES: Set<&'static str> = phf_set! {
    "OP1", "OP2", "OP3", "O1P", "O2P", "O3P",
};

static HISTIDINE_NAMES: Set<&'static str> = phf_set! {
    "HIS", "HID", "HIE", "HIP", "HSD", "HSE", "HSP",
};

pub fn is_amino_acid(residue_name: &str) -> bool {
    AMINO_ACID_NAMES.contains(residue_name.trim())
}

pub fn is_nucleotide(residue_name: &str) -> bool {
    NUCLEOTIDE_NAMES.contains(residue_name.trim())
}

pub fn is_purine(residue_name: &str) -> bool {
    PURINE_NAMES.contains(residue_name.trim())
}

/// Residues that are part of a biopolymer chain.
pub fn is_polymer(residue_name: &str) -> bool {
    is_amino_acid(residue_name) || is_nucleotide(residue_name)
}

pub fn is_water(residue_name: &str) -> bool {
    WATER_NAMES.contains(residue_name.trim())
}

pub fn is_histidine(residue_name: &str) -> bool {
    HISTIDINE_NAMES.contains(residue_name.trim())
}

pub fn is_protein_backbone_atom(atom_name: &str) -> bool {
    PROTEIN_BACKBONE_NAMES.contains(atom_name.trim())
}

pub fn is_phosphate_oxygen(atom_name: &str) -> bool {
    PHOSPHATE_OXYGEN_NAMES.contains(atom_name.trim())
}

/// The two imidazole nitrogens of a histidine residue.
pub fn is_histidine_ring_nitrogen(residue_name: &str, atom_name: &str) -> bool {
    is_histidine(residue_name) && matches!(atom_name.trim(), "ND1" | "NE2")
}
