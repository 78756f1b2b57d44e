// 🏛️ Archive - Registry of spellbooks and students
//
// The Archive owns every Spellbook and Student and is the ONLY place
// where rental state changes. A loan is recorded twice:
// - Spellbook.current_renter (which student holds it)
// - Student.currently_renting (which serials they hold)
// Both sides are updated together here, so they can never disagree.
//
// Entities reference each other by number, not by pointer.

use serde_json::json;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;
use tracing::{debug, info};

use crate::entities::{
    SerialNumber, Spellbook, Student, StudentNumber, FIRST_STUDENT_NUMBER,
};
use crate::events::{ArchiveEvent, EntityType, EventType, Journal};

// ============================================================================
// OUTCOMES
// ============================================================================

/// Why an archive operation was refused.
///
/// Display strings are the user-facing messages of the command layer.
/// Emptiness is always checked before lookup, so `NoStudents` wins over
/// `NoSuchStudent` and `NoSpellbooks` over `NoSuchSpellbook`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArchiveError {
    #[error("No students in system.")]
    NoStudents,

    #[error("No such student in system.")]
    NoSuchStudent,

    #[error("No spellbooks in system.")]
    NoSpellbooks,

    #[error("No such spellbook in system.")]
    NoSuchSpellbook,

    #[error("Spellbook is currently unavailable.")]
    Unavailable,

    /// Unknown serial, or the student does not hold it
    #[error("Unable to return spellbook.")]
    UnableToReturn,

    #[error("Spellbook already exists in system.")]
    DuplicateSpellbook,

    #[error("Duplicate students provided.")]
    DuplicateStudents,
}

/// One group of copies in `Archive::copy_counts`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCount {
    /// Short string of the lowest-serial copy
    pub label: String,
    pub copies: usize,
}

// ============================================================================
// ARCHIVE
// ============================================================================

#[derive(Debug)]
pub struct Archive {
    spellbooks: BTreeMap<SerialNumber, Spellbook>,
    students: BTreeMap<StudentNumber, Student>,
    next_student_number: StudentNumber,
    journal: Journal,
}

/// Resolve `key` in `map`, reporting `empty` before `missing`
fn lookup<V>(
    map: &mut BTreeMap<i32, V>,
    key: i32,
    empty: ArchiveError,
    missing: ArchiveError,
) -> Result<&mut V, ArchiveError> {
    if map.is_empty() {
        return Err(empty);
    }
    map.get_mut(&key).ok_or(missing)
}

fn has_duplicates(students: &[StudentNumber]) -> bool {
    let mut seen = HashSet::new();
    students.iter().any(|n| !seen.insert(*n))
}

impl Archive {
    pub fn new() -> Self {
        Archive {
            spellbooks: BTreeMap::new(),
            students: BTreeMap::new(),
            next_student_number: FIRST_STUDENT_NUMBER,
            journal: Journal::new(),
        }
    }

    // ========================================================================
    // STUDENTS
    // ========================================================================

    /// Register a student under the next free number (never reused)
    pub fn add_student(&mut self, name: &str) -> &Student {
        let number = self.next_student_number;
        self.next_student_number += 1;

        info!(student = number, student_name = name, "student added");
        self.journal.record(ArchiveEvent::new(
            EventType::StudentAdded,
            EntityType::Student,
            number,
            json!({ "name": name }),
        ));

        self.students
            .entry(number)
            .or_insert_with(|| Student::new(number, name))
    }

    pub fn has_students(&self) -> bool {
        !self.students.is_empty()
    }

    pub fn student(&self, number: StudentNumber) -> Option<&Student> {
        self.students.get(&number)
    }

    /// Like `student`, but with the archive's ordered failure reasons
    pub fn find_student(&self, number: StudentNumber) -> Result<&Student, ArchiveError> {
        if self.students.is_empty() {
            return Err(ArchiveError::NoStudents);
        }
        self.students.get(&number).ok_or(ArchiveError::NoSuchStudent)
    }

    /// Spellbooks the student holds right now, in rent order
    pub fn currently_renting(&self, number: StudentNumber) -> Result<Vec<&Spellbook>, ArchiveError> {
        let student = self.find_student(number)?;
        Ok(self.resolve(student.currently_renting()))
    }

    /// Spellbooks the student has returned, in return order
    pub fn rental_history(&self, number: StudentNumber) -> Result<Vec<&Spellbook>, ArchiveError> {
        let student = self.find_student(number)?;
        Ok(self.resolve(student.rental_history()))
    }

    fn resolve(&self, serials: &[SerialNumber]) -> Vec<&Spellbook> {
        serials
            .iter()
            .filter_map(|serial| self.spellbooks.get(serial))
            .collect()
    }

    // ========================================================================
    // SPELLBOOKS
    // ========================================================================

    /// Add a spellbook unless its serial number is already taken.
    /// It enters available with no history; loan state carried by
    /// `spellbook` from another archive is dropped.
    pub fn add_spellbook(&mut self, spellbook: Spellbook) -> Result<(), ArchiveError> {
        let spellbook = spellbook.without_loans();
        let serial = spellbook.serial_number();
        if self.spellbooks.contains_key(&serial) {
            debug!(serial, "duplicate serial number rejected");
            return Err(ArchiveError::DuplicateSpellbook);
        }

        info!(serial, title = spellbook.title(), "spellbook added");
        self.journal.record(ArchiveEvent::new(
            EventType::SpellbookAdded,
            EntityType::Spellbook,
            serial,
            json!({
                "title": spellbook.title(),
                "inventor": spellbook.inventor(),
                "type": spellbook.spell_type(),
            }),
        ));
        self.spellbooks.insert(serial, spellbook);
        Ok(())
    }

    pub fn has_spellbooks(&self) -> bool {
        !self.spellbooks.is_empty()
    }

    pub fn spellbook(&self, serial: SerialNumber) -> Option<&Spellbook> {
        self.spellbooks.get(&serial)
    }

    pub fn find_spellbook(&self, serial: SerialNumber) -> Result<&Spellbook, ArchiveError> {
        if self.spellbooks.is_empty() {
            return Err(ArchiveError::NoSpellbooks);
        }
        self.spellbooks.get(&serial).ok_or(ArchiveError::NoSuchSpellbook)
    }

    // ========================================================================
    // RENTALS
    // ========================================================================

    /// Lend `serial` to `student_number`
    pub fn rent(
        &mut self,
        student_number: StudentNumber,
        serial: SerialNumber,
    ) -> Result<(), ArchiveError> {
        let student = lookup(
            &mut self.students,
            student_number,
            ArchiveError::NoStudents,
            ArchiveError::NoSuchStudent,
        )?;
        let spellbook = lookup(
            &mut self.spellbooks,
            serial,
            ArchiveError::NoSpellbooks,
            ArchiveError::NoSuchSpellbook,
        )?;

        if !spellbook.rent(student_number) {
            debug!(serial, student = student_number, "spellbook already rented");
            return Err(ArchiveError::Unavailable);
        }
        student.rent(serial);

        info!(serial, student = student_number, "spellbook rented");
        self.journal.record(ArchiveEvent::new(
            EventType::SpellbookRented,
            EntityType::Spellbook,
            serial,
            json!({ "student": student_number }),
        ));
        Ok(())
    }

    /// Take `serial` back from `student_number`
    ///
    /// Fails with `UnableToReturn` both for an unknown serial and for a
    /// spellbook held by someone else (or nobody).
    pub fn relinquish(
        &mut self,
        student_number: StudentNumber,
        serial: SerialNumber,
    ) -> Result<(), ArchiveError> {
        let student = lookup(
            &mut self.students,
            student_number,
            ArchiveError::NoStudents,
            ArchiveError::NoSuchStudent,
        )?;
        if self.spellbooks.is_empty() {
            return Err(ArchiveError::NoSpellbooks);
        }
        let Some(spellbook) = self.spellbooks.get_mut(&serial) else {
            debug!(serial, "relinquish of unknown serial");
            return Err(ArchiveError::UnableToReturn);
        };

        // Student side first; the spellbook only moves if the student held it
        if !student.relinquish(serial) {
            debug!(serial, student = student_number, "spellbook not held by student");
            return Err(ArchiveError::UnableToReturn);
        }
        let returned = spellbook.relinquish();
        debug_assert!(returned, "student held a spellbook with no renter");

        self.record_relinquish(student_number, serial);
        Ok(())
    }

    /// Return everything `student_number` holds.
    ///
    /// Holding nothing is still a success; the returned list is then empty.
    pub fn relinquish_all(
        &mut self,
        student_number: StudentNumber,
    ) -> Result<Vec<SerialNumber>, ArchiveError> {
        let student = lookup(
            &mut self.students,
            student_number,
            ArchiveError::NoStudents,
            ArchiveError::NoSuchStudent,
        )?;

        let returned = student.relinquish_all();
        for serial in &returned {
            if let Some(spellbook) = self.spellbooks.get_mut(serial) {
                spellbook.relinquish();
            }
        }
        for serial in &returned {
            self.record_relinquish(student_number, *serial);
        }

        info!(student = student_number, count = returned.len(), "relinquished all");
        Ok(returned)
    }

    fn record_relinquish(&mut self, student_number: StudentNumber, serial: SerialNumber) {
        info!(serial, student = student_number, "spellbook relinquished");
        self.journal.record(ArchiveEvent::new(
            EventType::SpellbookRelinquished,
            EntityType::Spellbook,
            serial,
            json!({ "student": student_number }),
        ));
    }

    // ========================================================================
    // CATALOG QUERIES
    // ========================================================================

    /// Every spellbook, ascending serial number
    pub fn all_spellbooks(&self) -> Vec<&Spellbook> {
        self.spellbooks.values().collect()
    }

    pub fn available_spellbooks(&self) -> Vec<&Spellbook> {
        self.spellbooks.values().filter(|b| b.is_available()).collect()
    }

    /// Distinct types, case-sensitive lexical order
    pub fn all_types(&self) -> Vec<String> {
        self.distinct(Spellbook::spell_type)
    }

    /// Distinct inventors, case-sensitive lexical order
    pub fn all_inventors(&self) -> Vec<String> {
        self.distinct(Spellbook::inventor)
    }

    fn distinct(&self, field: fn(&Spellbook) -> &str) -> Vec<String> {
        self.spellbooks
            .values()
            .map(field)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Case-insensitive exact match on type, ascending serial
    pub fn spellbooks_by_type(&self, spell_type: &str) -> Vec<&Spellbook> {
        self.matching(Spellbook::spell_type, spell_type)
    }

    /// Case-insensitive exact match on inventor, ascending serial
    pub fn spellbooks_by_inventor(&self, inventor: &str) -> Vec<&Spellbook> {
        self.matching(Spellbook::inventor, inventor)
    }

    fn matching(&self, field: fn(&Spellbook) -> &str, wanted: &str) -> Vec<&Spellbook> {
        let wanted = wanted.to_lowercase();
        self.spellbooks
            .values()
            .filter(|b| field(b).to_lowercase() == wanted)
            .collect()
    }

    /// Number of copies per (title, inventor), ordered by title then inventor
    pub fn copy_counts(&self) -> Vec<CopyCount> {
        let mut groups: BTreeMap<(&str, &str), CopyCount> = BTreeMap::new();

        // Ascending serial, so the first copy seen labels the group
        for book in self.spellbooks.values() {
            groups
                .entry((book.title(), book.inventor()))
                .or_insert_with(|| CopyCount {
                    label: book.short_string(),
                    copies: 0,
                })
                .copies += 1;
        }

        groups.into_values().collect()
    }

    /// Rental history of one spellbook as student numbers
    pub fn spellbook_history(&self, serial: SerialNumber) -> Result<&[StudentNumber], ArchiveError> {
        Ok(self.find_spellbook(serial)?.rental_history())
    }

    // ========================================================================
    // COMMON HISTORY
    // ========================================================================

    /// Check a COMMON query before running it
    pub fn validate_common_query(&self, students: &[StudentNumber]) -> Result<(), ArchiveError> {
        if has_duplicates(students) {
            return Err(ArchiveError::DuplicateStudents);
        }
        if self.students.is_empty() {
            return Err(ArchiveError::NoStudents);
        }
        if students.iter().any(|n| !self.students.contains_key(n)) {
            return Err(ArchiveError::NoSuchStudent);
        }
        if self.spellbooks.is_empty() {
            return Err(ArchiveError::NoSpellbooks);
        }
        Ok(())
    }

    /// Spellbooks present in EVERY listed student's rental history.
    ///
    /// Matches by serial number, so two copies of the same title are
    /// distinct. Ordered by title, then serial. Empty when the list is
    /// empty, repeats a student, or names an unknown student.
    pub fn common_spellbooks(&self, students: &[StudentNumber]) -> Vec<&Spellbook> {
        if has_duplicates(students) {
            return Vec::new();
        }
        let Some((first, rest)) = students.split_first() else {
            return Vec::new();
        };

        let history = |number: &StudentNumber| -> Option<BTreeSet<SerialNumber>> {
            self.students
                .get(number)
                .map(|s| s.rental_history().iter().copied().collect())
        };

        let Some(mut common) = history(first) else {
            return Vec::new();
        };
        for number in rest {
            let Some(other) = history(number) else {
                return Vec::new();
            };
            common.retain(|serial| other.contains(serial));
        }

        let mut books: Vec<&Spellbook> = common
            .iter()
            .filter_map(|serial| self.spellbooks.get(serial))
            .collect();
        books.sort_by(|a, b| {
            a.title()
                .cmp(b.title())
                .then(a.serial_number().cmp(&b.serial_number()))
        });
        books
    }

    // ========================================================================
    // JOURNAL
    // ========================================================================

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn events(&self) -> &[ArchiveEvent] {
        self.journal.events()
    }

    pub fn events_for(&self, entity_type: EntityType, entity_id: i32) -> Vec<&ArchiveEvent> {
        self.journal.events_for(entity_type, entity_id)
    }
}

impl Default for Archive {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
