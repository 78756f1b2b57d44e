// 🎓 Student Entity - Borrower account
//
// "The student number is IDENTITY, the holdings are STATE"
//
// Holdings and history are serial numbers (keys into the archive).
// The Spellbook side of each loan is kept in step by the Archive.

use serde::Serialize;
use std::fmt;

use super::spellbook::SerialNumber;

/// Student number (system-assigned, starts at `FIRST_STUDENT_NUMBER`)
pub type StudentNumber = i32;

/// First number handed out by the archive
pub const FIRST_STUDENT_NUMBER: StudentNumber = 100_000;

// ============================================================================
// STUDENT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    student_number: StudentNumber,
    name: String,

    /// Spellbooks currently rented, in rent order
    currently_renting: Vec<SerialNumber>,

    /// Spellbooks returned, in return order
    rental_history: Vec<SerialNumber>,
}

impl Student {
    pub(crate) fn new(student_number: StudentNumber, name: impl Into<String>) -> Self {
        Student {
            student_number,
            name: name.into(),
            currently_renting: Vec::new(),
            rental_history: Vec::new(),
        }
    }

    pub fn student_number(&self) -> StudentNumber {
        self.student_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currently_renting(&self) -> &[SerialNumber] {
        &self.currently_renting
    }

    pub fn rental_history(&self) -> &[SerialNumber] {
        &self.rental_history
    }

    pub fn is_renting(&self, serial: SerialNumber) -> bool {
        self.currently_renting.contains(&serial)
    }

    // ========================================================================
    // TRANSITIONS (crate-private: only the Archive may call these)
    // ========================================================================

    /// Record a new loan. Availability was already checked by the Archive.
    pub(crate) fn rent(&mut self, serial: SerialNumber) {
        self.currently_renting.push(serial);
    }

    /// Move `serial` from holdings to history.
    /// Returns false (and changes nothing) if this student does not hold it.
    pub(crate) fn relinquish(&mut self, serial: SerialNumber) -> bool {
        match self.currently_renting.iter().position(|s| *s == serial) {
            Some(pos) => {
                let returned = self.currently_renting.remove(pos);
                self.rental_history.push(returned);
                true
            }
            None => false,
        }
    }

    /// Move every holding to history (rent order preserved) and
    /// return the serials that were moved.
    pub(crate) fn relinquish_all(&mut self) -> Vec<SerialNumber> {
        let returned = std::mem::take(&mut self.currently_renting);
        self.rental_history.extend_from_slice(&returned);
        returned
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.student_number, self.name)
    }
}

// ============================================================================
// TESTS
// ============================================================================
