//! Category metadata served to KiCad
//!
//! The display names and symbol references end up in users' schematics, so
//! the strings here are part of the wire contract.

/// Display name, description and default symbol per category code
#[derive(Debug, Clone, Copy)]
pub struct CategoryTables {
    names: &'static [(&'static str, &'static str)],
    descriptions: &'static [(&'static str, &'static str)],
    symbols: &'static [(&'static str, &'static str)],
    fallback_symbol: &'static str,
}

const NAMES: &[(&str, &str)] = &[
    ("CAP", "Capacitors"),
    ("RES", "Resistors"),
    ("DIO", "Diodes"),
    ("LED", "LEDs"),
    ("SCR", "Screws"),
    ("MCH", "Mechanical"),
    ("PCA", "PCB Assemblies"),
    ("PCB", "Printed Circuit Boards"),
    ("ASY", "Assemblies"),
    ("DOC", "Documentation"),
    ("DFW", "Firmware"),
    ("DSW", "Software"),
    ("DCL", "Declarations"),
    ("FIX", "Fixtures"),
    ("CNT", "Connectors"),
    ("IC", "Integrated Circuits"),
    ("OSC", "Oscillators"),
    ("XTL", "Crystals"),
    ("IND", "Inductors"),
    ("FER", "Ferrites"),
    ("FUS", "Fuses"),
    ("SW", "Switches"),
    ("REL", "Relays"),
    ("TRF", "Transformers"),
    ("SNS", "Sensors"),
    ("DSP", "Displays"),
    ("SPK", "Speakers"),
    ("MIC", "Microphones"),
    ("ANT", "Antennas"),
    ("CBL", "Cables"),
];

const DESCRIPTIONS: &[(&str, &str)] = &[
    ("CAP", "Capacitor components"),
    ("RES", "Resistor components"),
    ("DIO", "Diode components"),
    ("LED", "Light emitting diode components"),
    ("SCR", "Screw and fastener components"),
    ("MCH", "Mechanical components"),
    ("PCA", "Printed circuit board assemblies"),
    ("PCB", "Printed circuit boards"),
    ("ASY", "Assembly components"),
    ("DOC", "Documentation components"),
    ("DFW", "Firmware components"),
    ("DSW", "Software components"),
    ("DCL", "Declaration components"),
    ("FIX", "Fixture components"),
    ("CNT", "Connector components"),
    ("IC", "Integrated circuit components"),
    ("OSC", "Oscillator components"),
    ("XTL", "Crystal components"),
    ("IND", "Inductor components"),
    ("FER", "Ferrite components"),
    ("FUS", "Fuse components"),
    ("SW", "Switch components"),
    ("REL", "Relay components"),
    ("TRF", "Transformer components"),
    ("SNS", "Sensor components"),
    ("DSP", "Display components"),
    ("SPK", "Speaker components"),
    ("MIC", "Microphone components"),
    ("ANT", "Antenna components"),
    ("CBL", "Cable components"),
];

const SYMBOLS: &[(&str, &str)] = &[
    ("CAP", "Device:C"),
    ("RES", "Device:R"),
    ("DIO", "Device:D"),
    ("LED", "Device:LED"),
    ("IC", "Device:IC"),
    ("OSC", "Device:Oscillator"),
    ("XTL", "Device:Crystal"),
    ("IND", "Device:L"),
    ("FER", "Device:Ferrite_Bead"),
    ("FUS", "Device:Fuse"),
    ("SW", "Switch:SW_Push"),
    ("REL", "Relay:Relay_SPDT"),
    ("TRF", "Device:Transformer"),
    ("SNS", "Sensor:Sensor"),
    ("CNT", "Connector:Conn_01x02"),
    ("ANT", "Device:Antenna"),
    ("ANA", "Device:IC"),
    ("SCR", "Mechanical:MountingHole"),
    ("MCH", "Mechanical:MountingHole"),
];

fn lookup(table: &'static [(&'static str, &'static str)], code: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == code).map(|(_, v)| *v)
}

impl Default for CategoryTables {
    fn default() -> Self {
        Self::standard()
    }
}

impl CategoryTables {
    /// The built-in tables
    pub const fn standard() -> Self {
        Self {
            names: NAMES,
            descriptions: DESCRIPTIONS,
            symbols: SYMBOLS,
            fallback_symbol: "Device:Device",
        }
    }

    /// Human readable name; unknown codes are shown as-is
    pub fn display_name(&self, code: &str) -> String {
        lookup(self.names, code)
            .map(str::to_string)
            .unwrap_or_else(|| code.to_string())
    }

    pub fn description(&self, code: &str) -> String {
        lookup(self.descriptions, code)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} components", code))
    }

    /// KiCad symbol reference (`Library:Symbol`) for parts of a category
    pub fn symbol(&self, code: &str) -> &'static str {
        lookup(self.symbols, code).unwrap_or(self.fallback_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        let t = CategoryTables::standard();
        assert_eq!(t.display_name("CAP"), "Capacitors");
        assert_eq!(t.display_name("PCA"), "PCB Assemblies");
        assert_eq!(t.description("LED"), "Light emitting diode components");
        assert_eq!(t.symbol("FER"), "Device:Ferrite_Bead");
        assert_eq!(t.symbol("ANA"), "Device:IC");
    }

    #[test]
    fn test_fallbacks() {
        let t = CategoryTables::default();
        assert_eq!(t.display_name("ZZZ"), "ZZZ");
        assert_eq!(t.description("ZZZ"), "ZZZ components");
        assert_eq!(t.symbol("ZZZ"), "Device:Device");
        assert_eq!(t.symbol(""), "Device:Device");
    }

    #[test]
    fn test_tables_have_unique_codes() {
        for table in [NAMES, DESCRIPTIONS, SYMBOLS] {
            let mut codes: Vec<&str> = table.iter().map(|(k, _)| *k).collect();
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), table.len());
        }
        assert_eq!(NAMES.len(), DESCRIPTIONS.len());
    }
}
