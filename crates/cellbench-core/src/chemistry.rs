//! Battery cell chemistry profiles.
//!
//! Every simulated cell belongs to one of four chemistries. A profile carries
//! the nominal voltage the simulator centres on, the safe operating band the
//! classifier checks against, and a display color for renderers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CellbenchError;

/// Cell chemistry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Chemistry {
    /// Lithium iron phosphate.
    #[default]
    Lfp,
    /// Lithium nickel manganese cobalt oxide.
    Nmc,
    /// Lithium titanate.
    Lto,
    /// Lithium cobalt oxide.
    LiCoO2,
}

/// Static voltage bounds and display color for a chemistry.
#[derive(Debug, Clone, PartialEq)]
pub struct ChemistryProfile {
    /// Display name (`"LFP"`, `"NMC"`, `"LTO"`, `"LiCoO2"`).
    pub name: &'static str,
    /// Nominal cell voltage (V).
    pub nominal_voltage: f64,
    /// Lower bound of the safe band (V).
    pub min_voltage: f64,
    /// Upper bound of the safe band (V).
    pub max_voltage: f64,
    /// Display color as `#rrggbb`.
    pub color: &'static str,
}

const LFP: ChemistryProfile = ChemistryProfile {
    name: "LFP",
    nominal_voltage: 3.2,
    min_voltage: 2.8,
    max_voltage: 3.6,
    color: "#2ecc71",
};

const NMC: ChemistryProfile = ChemistryProfile {
    name: "NMC",
    nominal_voltage: 3.6,
    min_voltage: 3.2,
    max_voltage: 4.0,
    color: "#e74c3c",
};

const LTO: ChemistryProfile = ChemistryProfile {
    name: "LTO",
    nominal_voltage: 2.4,
    min_voltage: 1.5,
    max_voltage: 2.8,
    color: "#f39c12",
};

const LICOO2: ChemistryProfile = ChemistryProfile {
    name: "LiCoO2",
    nominal_voltage: 3.7,
    min_voltage: 3.0,
    max_voltage: 4.2,
    color: "#9b59b6",
};

impl Chemistry {
    /// All chemistries in display order.
    pub const ALL: [Chemistry; 4] = [Self::Lfp, Self::Nmc, Self::Lto, Self::LiCoO2];

    /// The static profile for this chemistry.
    pub fn profile(self) -> &'static ChemistryProfile {
        match self {
            Self::Lfp => &LFP,
            Self::Nmc => &NMC,
            Self::Lto => &LTO,
            Self::LiCoO2 => &LICOO2,
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    /// Next chemistry in [`Chemistry::ALL`], wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Lfp => Self::Nmc,
            Self::Nmc => Self::Lto,
            Self::Lto => Self::LiCoO2,
            Self::LiCoO2 => Self::Lfp,
        }
    }
}

impl ChemistryProfile {
    /// Whether `voltage` lies inside `[min_voltage, max_voltage]`.
    pub fn contains(&self, voltage: f64) -> bool {
        voltage >= self.min_voltage && voltage <= self.max_voltage
    }

    /// Parse the `#rrggbb` color into components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = self.color.trim_start_matches('#');
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .unwrap_or(0)
        };
        (channel(0), channel(2), channel(4))
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Chemistry {
    type Err = CellbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CellbenchError::InvalidChemistry(trimmed.to_string()))
    }
}

impl Serialize for Chemistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Chemistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a comma-separated chemistry list such as `"LFP,NMC,lto"`.
pub fn parse_chemistry_list(s: &str) -> crate::Result<Vec<Chemistry>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<Chemistry>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_match_reference_table() {
        let lfp = Chemistry::Lfp.profile();
        assert_eq!(
            (lfp.nominal_voltage, lfp.min_voltage, lfp.max_voltage),
            (3.2, 2.8, 3.6)
        );
        let nmc = Chemistry::Nmc.profile();
        assert_eq!(
            (nmc.nominal_voltage, nmc.min_voltage, nmc.max_voltage),
            (3.6, 3.2, 4.0)
        );
        let lto = Chemistry::Lto.profile();
        assert_eq!(
            (lto.nominal_voltage, lto.min_voltage, lto.max_voltage),
            (2.4, 1.5, 2.8)
        );
        let lco = Chemistry::LiCoO2.profile();
        assert_eq!(
            (lco.nominal_voltage, lco.min_voltage, lco.max_voltage),
            (3.7, 3.0, 4.2)
        );
    }

    #[test]
    fn nominal_lies_inside_band() {
        for chem in Chemistry::ALL {
            let p = chem.profile();
            assert!(p.contains(p.nominal_voltage), "{chem}: nominal outside band");
            // The simulator's +/-0.1 V swing never leaves the band on its own.
            assert!(p.contains(p.nominal_voltage - 0.1));
            assert!(p.contains(p.nominal_voltage + 0.1));
        }
    }

    #[test]
    fn parse_accepts_display_names_any_case() {
        assert_eq!("LFP".parse::<Chemistry>().unwrap(), Chemistry::Lfp);
        assert_eq!("nmc".parse::<Chemistry>().unwrap(), Chemistry::Nmc);
        assert_eq!(" Lto ".parse::<Chemistry>().unwrap(), Chemistry::Lto);
        assert_eq!("licoo2".parse::<Chemistry>().unwrap(), Chemistry::LiCoO2);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "NiMH".parse::<Chemistry>().unwrap_err();
        assert!(matches!(err, CellbenchError::InvalidChemistry(ref s) if s == "NiMH"));
        assert!("".parse::<Chemistry>().is_err());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for chem in Chemistry::ALL {
            assert_eq!(chem.to_string().parse::<Chemistry>().unwrap(), chem);
        }
    }

    #[test]
    fn next_cycles_through_all() {
        let mut chem = Chemistry::Lfp;
        for expected in [Chemistry::Nmc, Chemistry::Lto, Chemistry::LiCoO2, Chemistry::Lfp] {
            chem = chem.next();
            assert_eq!(chem, expected);
        }
    }

    #[test]
    fn rgb_parses_hex_color() {
        assert_eq!(Chemistry::Lfp.profile().rgb(), (0x2e, 0xcc, 0x71));
        assert_eq!(Chemistry::LiCoO2.profile().rgb(), (0x9b, 0x59, 0xb6));
    }

    #[test]
    fn serde_uses_display_name() {
        let json = serde_json::to_string(&Chemistry::LiCoO2).unwrap();
        assert_eq!(json, "\"LiCoO2\"");
        let parsed: Chemistry = serde_json::from_str("\"nmc\"").unwrap();
        assert_eq!(parsed, Chemistry::Nmc);
        assert!(serde_json::from_str::<Chemistry>("\"lead-acid\"").is_err());
    }

    #[test]
    fn parse_list() {
        let list = parse_chemistry_list("LFP, NMC,,lto").unwrap();
        assert_eq!(list, vec![Chemistry::Lfp, Chemistry::Nmc, Chemistry::Lto]);
        assert!(parse_chemistry_list("LFP,bogus").is_err());
    }
}
