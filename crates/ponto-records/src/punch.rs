//! # Punch Kinds
//!
//! The four clock events a working day can carry. Punch records are
//! cardinality-variable: a day emits one record per punch actually
//! present, in this order, never empty placeholder slots.

/// One of the four clock events of a working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunchKind {
    /// Start of the working day.
    ClockIn,
    /// Start of the lunch break.
    LunchStart,
    /// End of the lunch break.
    LunchEnd,
    /// End of the working day.
    ClockOut,
}

impl PunchKind {
    /// All kinds in emission order.
    pub const ALL: [PunchKind; 4] = [
        PunchKind::ClockIn,
        PunchKind::LunchStart,
        PunchKind::LunchEnd,
        PunchKind::ClockOut,
    ];

    /// The fixed label used in adjustment records.
    pub fn label(&self) -> &'static str {
        match self {
            PunchKind::ClockIn => "ENTRADA",
            PunchKind::LunchStart => "INICIO_INT",
            PunchKind::LunchEnd => "FIM_INT",
            PunchKind::ClockOut => "SAIDA",
        }
    }

    /// Parse the fixed label back into a kind.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "ENTRADA" => Some(PunchKind::ClockIn),
            "INICIO_INT" => Some(PunchKind::LunchStart),
            "FIM_INT" => Some(PunchKind::LunchEnd),
            "SAIDA" => Some(PunchKind::ClockOut),
            _ => None,
        }
    }
}

impl std::fmt::Display for PunchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
