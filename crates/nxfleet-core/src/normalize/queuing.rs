// ── Egress-queuing labels ──
//
// `show queuing interface` labels its statistics with display strings
// ("WRED/AFD & Tail Drop", "Pkts"). The entity stores them under short tags
// so tools can address them from the command line; these maps go both ways.

use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Statistic kinds reported per QoS group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
pub enum QueueStat {
    #[strum(to_string = "WRED/AFD & Tail Drop")]
    TailDrop,
    #[strum(to_string = "ECN")]
    Ecn,
    #[strum(to_string = "Tx")]
    Tx,
    #[strum(to_string = "Q Depth")]
    QDepth,
}

impl QueueStat {
    pub fn tag(self) -> &'static str {
        match self {
            Self::TailDrop => "tail_drop",
            Self::Ecn => "ecn",
            Self::Tx => "tx",
            Self::QDepth => "q_depth",
        }
    }

    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Units a statistic is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
pub enum QueueUnit {
    #[strum(to_string = "Pkts")]
    Packets,
    #[strum(to_string = "Byts")]
    Bytes,
}

impl QueueUnit {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Packets => "packets",
            Self::Bytes => "bytes",
        }
    }

    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Stat label -> tag (`"ECN"` -> `"ecn"`).
pub fn stat_label_to_tag(label: &str) -> Option<&'static str> {
    label.trim().parse::<QueueStat>().ok().map(QueueStat::tag)
}

/// Stat tag -> label (`"ecn"` -> `"ECN"`).
pub fn stat_tag_to_label(tag: &str) -> Option<&'static str> {
    QueueStat::iter().find(|s| s.tag() == tag).map(QueueStat::label)
}

pub fn unit_label_to_tag(label: &str) -> Option<&'static str> {
    label.trim().parse::<QueueUnit>().ok().map(QueueUnit::tag)
}

pub fn unit_tag_to_label(tag: &str) -> Option<&'static str> {
    QueueUnit::iter().find(|u| u.tag() == tag).map(QueueUnit::label)
}

/// QoS group label -> tag. Numbered groups keep their number.
pub fn qos_group_tag(label: &str) -> String {
    match label.trim() {
        "CONTROL QOS GROUP" => "cpu".to_owned(),
        "SPAN QOS GROUP" => "span".to_owned(),
        other => other.to_owned(),
    }
}
