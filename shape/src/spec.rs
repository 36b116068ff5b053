//! Shape kinds and netem argument construction.

use std::fmt;

/// One kind of network impairment, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeSpec {
    /// Fixed delay with optional jitter, both in milliseconds.
    Delay { ms: u32, jitter_ms: u32 },
    /// Random packet loss.
    Loss { percent: f64 },
    /// Bandwidth cap in kilobits per second.
    RateLimit { kbit: u32 },
    /// Random single-bit corruption.
    Corrupt { percent: f64 },
    /// Random packet duplication.
    Duplicate { percent: f64 },
    /// Packet reordering: `percent` of packets are sent immediately,
    /// the rest are delayed by `delay_ms`.
    Reorder { percent: f64, delay_ms: u32 },
}

impl fmt::Display for ShapeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delay { ms, jitter_ms } => write!(f, "delay {ms}ms jitter {jitter_ms}ms"),
            Self::Loss { percent } => write!(f, "loss {percent}%"),
            Self::RateLimit { kbit } => write!(f, "rate {kbit}kbit"),
            Self::Corrupt { percent } => write!(f, "corrupt {percent}%"),
            Self::Duplicate { percent } => write!(f, "duplicate {percent}%"),
            Self::Reorder { percent, delay_ms } => {
                write!(f, "reorder {percent}% delay {delay_ms}ms")
            }
        }
    }
}

/// Builds the `tc qdisc replace` argument vector installing `spec` on
/// `interface`.
///
/// `replace` rather than `add` so that re-shaping an interface is
/// last-writer-wins instead of an RTNETLINK "file exists" failure.
#[must_use]
pub fn netem_args(interface: &str, spec: &ShapeSpec) -> Vec<String> {
    let mut args: Vec<String> = [
        "qdisc", "replace", "dev", interface, "root", "netem",
    ]
    .iter()
    .map(ToString::to_string)
    .collect();

    match spec {
        ShapeSpec::Delay { ms, jitter_ms } => {
            args.push("delay".to_string());
            args.push(format!("{ms}ms"));
            if *jitter_ms > 0 {
                args.push(format!("{jitter_ms}ms"));
            }
        }
        ShapeSpec::Loss { percent } => {
            args.push("loss".to_string());
            args.push(format!("{percent}%"));
        }
        ShapeSpec::RateLimit { kbit } => {
            args.push("rate".to_string());
            args.push(format!("{kbit}kbit"));
        }
        ShapeSpec::Corrupt { percent } => {
            args.push("corrupt".to_string());
            args.push(format!("{percent}%"));
        }
        ShapeSpec::Duplicate { percent } => {
            args.push("duplicate".to_string());
            args.push(format!("{percent}%"));
        }
        ShapeSpec::Reorder { percent, delay_ms } => {
            args.push("delay".to_string());
            args.push(format!("{delay_ms}ms"));
            args.push("reorder".to_string());
            args.push(format!("{percent}%"));
        }
    }
    args
}

/// Builds the `tc qdisc del` argument vector clearing `interface`.
#[must_use]
pub fn revert_args(interface: &str) -> Vec<String> {
    ["qdisc", "del", "dev", interface, "root"]
        .iter()
        .map(ToString::to_string)
        .collect()
}
