// 📖 Spellbook Entity - Serial-numbered catalog entry
//
// "The serial number is IDENTITY (never changes), the renter is STATE"
//
// A spellbook knows who currently holds it and who held it before.
// The renter lives here as a student number (a key into the archive),
// never as a reference to the Student itself.

use serde::Serialize;
use std::fmt;

use super::student::StudentNumber;

/// Serial number of a spellbook (caller-assigned, globally unique)
pub type SerialNumber = i32;

// ============================================================================
// SPELLBOOK ENTITY
// ============================================================================

/// Spellbook Entity
///
/// Identity: serial number (never changes)
/// Values: title, inventor, type (immutable after creation)
/// State: current renter + rental history (mutated only by the Archive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spellbook {
    // ========================================================================
    // IDENTITY
    // ========================================================================
    serial_number: SerialNumber,

    // ========================================================================
    // VALUES
    // ========================================================================
    title: String,
    inventor: String,
    #[serde(rename = "type")]
    spell_type: String,

    // ========================================================================
    // STATE (Archive-mediated)
    // ========================================================================
    /// Student currently renting this spellbook (None = available)
    current_renter: Option<StudentNumber>,

    /// Past renters, appended on return, in return order
    rental_history: Vec<StudentNumber>,
}

impl Spellbook {
    /// Create a new, available spellbook with an empty history
    pub fn new(
        serial_number: SerialNumber,
        title: impl Into<String>,
        inventor: impl Into<String>,
        spell_type: impl Into<String>,
    ) -> Self {
        Spellbook {
            serial_number,
            title: title.into(),
            inventor: inventor.into(),
            spell_type: spell_type.into(),
            current_renter: None,
            rental_history: Vec::new(),
        }
    }

    pub fn serial_number(&self) -> SerialNumber {
        self.serial_number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn inventor(&self) -> &str {
        &self.inventor
    }

    pub fn spell_type(&self) -> &str {
        &self.spell_type
    }

    pub fn current_renter(&self) -> Option<StudentNumber> {
        self.current_renter
    }

    /// Student numbers of every completed loan, oldest first
    pub fn rental_history(&self) -> &[StudentNumber] {
        &self.rental_history
    }

    pub fn is_available(&self) -> bool {
        self.current_renter.is_none()
    }

    /// Two spellbooks are copies when they share title and inventor
    pub fn is_copy_of(&self, other: &Spellbook) -> bool {
        self.title == other.title && self.inventor == other.inventor
    }

    // ========================================================================
    // TRANSITIONS (crate-private: only the Archive may call these)
    // ========================================================================

    /// Mark as rented by `student`. Returns false if already rented.
    pub(crate) fn rent(&mut self, student: StudentNumber) -> bool {
        if self.current_renter.is_some() {
            return false;
        }
        self.current_renter = Some(student);
        true
    }

    /// Return from the current renter, moving them into the history.
    /// Returns false if not rented.
    pub(crate) fn relinquish(&mut self) -> bool {
        match self.current_renter.take() {
            Some(student) => {
                self.rental_history.push(student);
                true
            }
            None => false,
        }
    }

    /// Same catalog entry, available and with no history
    pub(crate) fn without_loans(self) -> Self {
        Spellbook {
            current_renter: None,
            rental_history: Vec::new(),
            ..self
        }
    }

    // ========================================================================
    // DISPLAY
    // ========================================================================

    /// Format: `Title (Inventor)`
    pub fn short_string(&self) -> String {
        format!("{} ({})", self.title, self.inventor)
    }

    /// Format: `Serial: Title (Inventor, Type)` followed by the status line
    pub fn long_string(&self) -> String {
        let status = match self.current_renter {
            Some(student) => format!("Rented by: {}.", student),
            None => "Currently available.".to_string(),
        };

        format!(
            "{}: {} ({}, {})\n{}",
            self.serial_number, self.title, self.inventor, self.spell_type, status
        )
    }
}

impl fmt::Display for Spellbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.inventor)
    }
}

// ============================================================================
// TESTS
// ============================================================================
