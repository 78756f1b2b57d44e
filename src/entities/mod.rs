// Entity Models
//
// Each entity has:
// - Stable numeric identity that NEVER changes
// - Immutable descriptive values
// - Loan state that only the Archive may change
//
// Cross-entity links are numbers (keys into the Archive), not references.

pub mod spellbook;
pub mod student;

pub use spellbook::{SerialNumber, Spellbook};
pub use student::{Student, StudentNumber, FIRST_STUDENT_NUMBER};
