use bitflags::bitflags;

bitflags! {
    /// The set of GSUB/GPOS-equivalent features active for a `shape()`
    /// call, per spec §4.3: a union of default features, script-
    /// contextual features selected by run script, and whatever the
    /// caller explicitly enables.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FeatureSet: u32 {
        /// Classic kerning (`kern`).
        const KERN = 1 << 0;
        /// Standard ligatures (`liga`).
        const LIGA = 1 << 1;
        /// Contextual ligatures (`clig`).
        const CLIG = 1 << 2;
        /// Arabic isolated form (`isol`).
        const ISOL = 1 << 3;
        /// Arabic initial form (`init`).
        const INIT = 1 << 4;
        /// Arabic medial form (`medi`).
        const MEDI = 1 << 5;
        /// Arabic final form (`fina`).
        const FINA = 1 << 6;
        /// Mark positioning (`mark`).
        const MARK = 1 << 7;
        /// Mark-to-mark positioning (`mkmk`).
        const MKMK = 1 << 8;
        /// Indic nukta forms (`nukt`).
        const NUKT = 1 << 9;
        /// Indic Akhand ligatures (`akhn`).
        const AKHN = 1 << 10;
        /// Indic reph form (`rphf`).
        const RPHF = 1 << 11;
        /// Indic below-base form (`blwf`).
        const BLWF = 1 << 12;
        /// Indic half form (`half`).
        const HALF = 1 << 13;
        /// Indic post-base form (`pstf`).
        const PSTF = 1 << 14;
        /// Indic vattu variant (`vatu`).
        const VATU = 1 << 15;
    }
}

impl FeatureSet {
    /// The features enabled for every run regardless of script, per
    /// spec §4.3: `kern, liga, clig`.
    pub const fn default_features() -> Self {
        Self::KERN.union(Self::LIGA).union(Self::CLIG)
    }

    /// Arabic script-contextual features.
    pub const fn arabic_features() -> Self {
        Self::ISOL.union(Self::INIT).union(Self::MEDI).union(Self::FINA).union(Self::MARK).union(Self::MKMK)
    }

    /// Indic script-contextual features.
    pub const fn indic_features() -> Self {
        Self::NUKT
            .union(Self::AKHN)
            .union(Self::RPHF)
            .union(Self::BLWF)
            .union(Self::HALF)
            .union(Self::PSTF)
            .union(Self::VATU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_features_include_kerning_and_ligatures() {
        let f = FeatureSet::default_features();
        assert!(f.contains(FeatureSet::KERN));
        assert!(f.contains(FeatureSet::LIGA));
        assert!(f.contains(FeatureSet::CLIG));
        assert!(!f.contains(FeatureSet::ISOL));
    }

    #[test]
    fn caller_features_union_with_defaults() {
        let f = FeatureSet::default_features() | FeatureSet::ISOL;
        assert!(f.contains(FeatureSet::ISOL));
        assert!(f.contains(FeatureSet::KERN));
    }
}
