// src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported miner statistics protocols
///
/// Selects which adapter the scheduler queries on each cycle. The config file
/// accepts both the legacy miner names and the protocol-oriented aliases.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinerMode {
    /// Claymore-style HTTP status page
    ///
    /// The miner serves a text page whose leading lines contain an
    /// already-shaped report object.
    ClaymoreHttp,

    /// Claymore JSON-RPC over raw TCP (`miner_getstat1`)
    ///
    /// The miner answers with the nine-slot summary natively, so the
    /// adapter passes it through.
    #[default]
    Claymore,

    /// EWBF JSON-RPC over raw TCP (`getstat`)
    ///
    /// Per-GPU statistics that get folded into a nine-slot summary.
    Ewbf,
}

impl fmt::Display for MinerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinerMode::ClaymoreHttp => write!(f, "claymore-http"),
            MinerMode::Claymore => write!(f, "claymore"),
            MinerMode::Ewbf => write!(f, "ewbf"),
        }
    }
}

impl FromStr for MinerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "claymore-http" | "line-http" | "http" => Ok(MinerMode::ClaymoreHttp),
            "claymore" | "tcp-rpc-b" => Ok(MinerMode::Claymore),
            "ewbf" | "tcp-rpc-a" => Ok(MinerMode::Ewbf),
            _ => Err(format!("Unknown mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("claymore", MinerMode::Claymore)]
    #[test_case("tcp-rpc-b", MinerMode::Claymore)]
    #[test_case("EWBF", MinerMode::Ewbf)]
    #[test_case("tcp-rpc-a", MinerMode::Ewbf)]
    #[test_case("line-http", MinerMode::ClaymoreHttp)]
    #[test_case("claymore-http", MinerMode::ClaymoreHttp)]
    fn parses_aliases(input: &str, expected: MinerMode) {
        assert_eq!(input.parse::<MinerMode>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!("bminer".parse::<MinerMode>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for mode in [MinerMode::ClaymoreHttp, MinerMode::Claymore, MinerMode::Ewbf] {
            assert_eq!(mode.to_string().parse::<MinerMode>(), Ok(mode));
        }
    }
}
