#![deny(missing_docs)]

//! # ponto-records — Fixed-Format Record Encoding
//!
//! Pure encoders that render one domain fact (header, employer, punch,
//! daily totals, trailer, …) into a single fixed-format line of an AFD or
//! AEJ file.
//!
//! ## Wire Form
//!
//! Every record line starts with the 9-digit zero-padded sequence number
//! (NSR) followed by the 1-digit record-type code; fields are joined by a
//! single tab. Numeric fields are zero-padded on the left, text fields are
//! transliterated to single-byte ASCII and space-padded on the right, and
//! width violations truncate — the widths are regulator-fixed and never
//! overflow.
//!
//! ## Sequence Discipline
//!
//! Encoders take `&mut Nsr` and increment it by exactly one before
//! prefixing the line. The counter is owned by a single file-generation
//! run; there is no global state in this crate.
//!
//! The in-memory discriminant is the logical record kind ([`AfdRecord`],
//! [`AejRecord`]) — the wire type code is a rendering detail. AFD reuses
//! code `3` for both registrar identity and punch events; the two stay
//! separate variants here and only converge at encode time.

pub mod aej;
pub mod afd;
pub mod field;
pub mod nsr;
pub mod punch;

pub use aej::AejRecord;
pub use afd::AfdRecord;
pub use field::{date8, datetime12, render_line, space_right, time4, zero_left, zero_left_u32};
pub use nsr::Nsr;
pub use punch::PunchKind;
