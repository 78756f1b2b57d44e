// ⌨️ Command Layer - text line → Archive call → text reply
//
// Parsing never fails loudly: malformed input (unknown verb, missing or
// non-numeric argument) yields `None` and the line is silently ignored.
// All user-facing wording lives here; the Archive only returns values
// and `ArchiveError`s.

use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

use crate::archive::{Archive, ArchiveError};
use crate::collection::{self, CollectionError};
use crate::entities::{SerialNumber, Spellbook, StudentNumber};

// ============================================================================
// COMMANDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Commands,
    ListAll { long: bool },
    ListAvailable { long: bool },
    ListTypes,
    ListInventors,
    NumberCopies,
    Type(String),
    Inventor(String),
    Spellbook { serial: SerialNumber, long: bool },
    SpellbookHistory(SerialNumber),
    Student(StudentNumber),
    StudentSpellbooks(StudentNumber),
    StudentHistory(StudentNumber),
    Rent { student: StudentNumber, serial: SerialNumber },
    Relinquish { student: StudentNumber, serial: SerialNumber },
    RelinquishAll(StudentNumber),
    AddStudent(String),
    AddSpellbook { file: PathBuf, serial: SerialNumber },
    AddCollection(PathBuf),
    SaveCollection(PathBuf),
    Common(Vec<StudentNumber>),
    /// Well-formed verb whose arguments are already known to be refused
    Rejected(ArchiveError),
}

/// Whether the loop keeps reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub flow: Flow,
}

impl Reply {
    fn lines(lines: Vec<String>) -> Self {
        Reply { lines, flow: Flow::Continue }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::lines(vec![line.into()])
    }
}

const HELP: &[&str] = &[
    "EXIT ends the archive process",
    "COMMANDS outputs this help string",
    "",
    "LIST ALL [LONG] outputs either the short or long string for all spellbooks",
    "LIST AVAILABLE [LONG] outputs either the short or long string for all available spellbooks",
    "NUMBER COPIES outputs the number of copies of each spellbook",
    "LIST TYPES outputs the name of every type in the system",
    "LIST INVENTORS outputs the name of every inventor in the system",
    "",
    "TYPE <type> outputs the short string of every spellbook with the specified type",
    "INVENTOR <inventor> outputs the short string of every spellbook by the specified inventor",
    "",
    "SPELLBOOK <serialNumber> [LONG] outputs either the short or long string for the specified spellbook",
    "SPELLBOOK HISTORY <serialNumber> outputs the rental history of the specified spellbook",
    "",
    "STUDENT <studentNumber> outputs the information of the specified student",
    "STUDENT SPELLBOOKS <studentNumber> outputs the spellbooks currently rented by the specified student",
    "STUDENT HISTORY <studentNumber> outputs the rental history of the specified student",
    "",
    "RENT <studentNumber> <serialNumber> loans out the specified spellbook to the given student",
    "RELINQUISH <studentNumber> <serialNumber> returns the specified spellbook from the student",
    "RELINQUISH ALL <studentNumber> returns all spellbooks rented by the specified student",
    "",
    "ADD STUDENT <name> adds a student to the system",
    "ADD SPELLBOOK <filename> <serialNumber> adds a spellbook to the system",
    "",
    "ADD COLLECTION <filename> adds a collection of spellbooks to the system",
    "SAVE COLLECTION <filename> saves the system to a csv file",
    "",
    "COMMON <studentNumber1> <studentNumber2> ... outputs the common spellbooks in students' history",
];

// ============================================================================
// PARSING
// ============================================================================

/// Split off the first whitespace-delimited word; the rest keeps its
/// inner spacing.
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}

fn number(token: Option<&&str>) -> Option<i32> {
    token?.parse().ok()
}

fn is_word(token: Option<&&str>, word: &str) -> bool {
    token.map(|t| t.eq_ignore_ascii_case(word)).unwrap_or(false)
}

impl Command {
    /// Parse one input line. `None` means "ignore this line".
    pub fn parse(line: &str) -> Option<Command> {
        let (verb, args) = split_word(line.trim());
        if verb.is_empty() {
            return None;
        }
        let parts: Vec<&str> = args.split_whitespace().collect();

        match verb.to_uppercase().as_str() {
            "EXIT" => Some(Command::Exit),
            "COMMANDS" => Some(Command::Commands),
            "LIST" => Self::parse_list(&parts),
            "NUMBER" if args.eq_ignore_ascii_case("COPIES") => Some(Command::NumberCopies),
            "TYPE" => Some(Command::Type(args.to_string())),
            "INVENTOR" => Some(Command::Inventor(args.to_string())),
            "SPELLBOOK" => Self::parse_spellbook(&parts),
            "STUDENT" => Self::parse_student(&parts),
            "RENT" => Some(Command::Rent {
                student: number(parts.first())?,
                serial: number(parts.get(1))?,
            }),
            "RELINQUISH" => Self::parse_relinquish(&parts),
            "ADD" => Self::parse_add(args),
            "SAVE" => Self::parse_save(args),
            "COMMON" => Self::parse_common(&parts),
            _ => None,
        }
    }

    fn parse_list(parts: &[&str]) -> Option<Command> {
        let long = is_word(parts.get(1), "LONG");
        let kind = parts.first()?.to_uppercase();

        match kind.as_str() {
            "ALL" => Some(Command::ListAll { long }),
            "AVAILABLE" => Some(Command::ListAvailable { long }),
            "TYPES" => Some(Command::ListTypes),
            "INVENTORS" => Some(Command::ListInventors),
            _ => None,
        }
    }

    fn parse_spellbook(parts: &[&str]) -> Option<Command> {
        if is_word(parts.first(), "HISTORY") {
            return Some(Command::SpellbookHistory(number(parts.get(1))?));
        }
        Some(Command::Spellbook {
            serial: number(parts.first())?,
            long: is_word(parts.get(1), "LONG"),
        })
    }

    fn parse_student(parts: &[&str]) -> Option<Command> {
        if parts.len() > 1 {
            if is_word(parts.first(), "SPELLBOOKS") {
                return Some(Command::StudentSpellbooks(number(parts.get(1))?));
            }
            if is_word(parts.first(), "HISTORY") {
                return Some(Command::StudentHistory(number(parts.get(1))?));
            }
        }
        Some(Command::Student(number(parts.first())?))
    }

    fn parse_relinquish(parts: &[&str]) -> Option<Command> {
        if parts.len() > 1 && is_word(parts.first(), "ALL") {
            return Some(Command::RelinquishAll(number(parts.get(1))?));
        }
        Some(Command::Relinquish {
            student: number(parts.first())?,
            serial: number(parts.get(1))?,
        })
    }

    fn parse_add(args: &str) -> Option<Command> {
        let (kind, rest) = split_word(args);

        match kind.to_uppercase().as_str() {
            "STUDENT" if !rest.is_empty() => Some(Command::AddStudent(rest.to_string())),
            "SPELLBOOK" => {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                Some(Command::AddSpellbook {
                    file: PathBuf::from(parts.first()?),
                    serial: number(parts.get(1))?,
                })
            }
            "COLLECTION" if !rest.is_empty() => Some(Command::AddCollection(PathBuf::from(rest))),
            _ => None,
        }
    }

    fn parse_save(args: &str) -> Option<Command> {
        let (kind, rest) = split_word(args);
        if kind.eq_ignore_ascii_case("COLLECTION") && !rest.is_empty() {
            return Some(Command::SaveCollection(PathBuf::from(rest)));
        }
        None
    }

    /// Needs at least two ids. Checked left to right: the first
    /// non-numeric or repeated id decides the rejection.
    fn parse_common(parts: &[&str]) -> Option<Command> {
        if parts.len() < 2 {
            return None;
        }

        let mut seen = HashSet::new();
        let mut students = Vec::with_capacity(parts.len());
        for part in parts {
            let Ok(student) = part.parse::<StudentNumber>() else {
                return Some(Command::Rejected(ArchiveError::NoSuchStudent));
            };
            if !seen.insert(student) {
                return Some(Command::Rejected(ArchiveError::DuplicateStudents));
            }
            students.push(student);
        }
        Some(Command::Common(students))
    }
}

// ============================================================================
// EXECUTION
// ============================================================================

const SUCCESS: &str = "Success.";

fn shorts(books: &[&Spellbook]) -> Vec<String> {
    books.iter().map(|b| b.short_string()).collect()
}

/// Short strings one per line, or long strings separated by a blank line
fn listing(books: &[&Spellbook], long: bool) -> Vec<String> {
    if !long {
        return shorts(books);
    }
    let mut lines = Vec::with_capacity(books.len() * 2);
    for (i, book) in books.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(book.long_string());
    }
    lines
}

fn status(result: Result<(), ArchiveError>) -> Reply {
    match result {
        Ok(()) => Reply::line(SUCCESS),
        Err(e) => Reply::line(e.to_string()),
    }
}

/// Run a parsed command against the archive and render the reply
pub fn execute(archive: &mut Archive, command: Command) -> Reply {
    debug!(?command, "executing command");

    // Catalog queries all start from "is there anything at all?"
    if needs_spellbooks(&command) && !archive.has_spellbooks() {
        return Reply::line(ArchiveError::NoSpellbooks.to_string());
    }

    match command {
        Command::Exit => Reply {
            lines: vec!["Ending Archive process.".to_string()],
            flow: Flow::Exit,
        },
        Command::Commands => Reply::lines(HELP.iter().map(|l| l.to_string()).collect()),
        Command::Rejected(e) => Reply::line(e.to_string()),

        Command::ListAll { long } => Reply::lines(listing(&archive.all_spellbooks(), long)),
        Command::ListAvailable { long } => {
            let available = archive.available_spellbooks();
            if available.is_empty() {
                return Reply::line("No spellbooks available.");
            }
            Reply::lines(listing(&available, long))
        }
        Command::ListTypes => Reply::lines(archive.all_types()),
        Command::ListInventors => Reply::lines(archive.all_inventors()),
        Command::NumberCopies => Reply::lines(
            archive
                .copy_counts()
                .into_iter()
                .map(|c| format!("{}: {}", c.label, c.copies))
                .collect(),
        ),
        Command::Type(spell_type) => {
            let books = archive.spellbooks_by_type(&spell_type);
            if books.is_empty() {
                return Reply::line(format!("No spellbooks with type {}.", spell_type));
            }
            Reply::lines(shorts(&books))
        }
        Command::Inventor(inventor) => {
            let books = archive.spellbooks_by_inventor(&inventor);
            if books.is_empty() {
                return Reply::line(format!("No spellbooks by {}.", inventor));
            }
            Reply::lines(shorts(&books))
        }

        Command::Spellbook { serial, long } => match archive.find_spellbook(serial) {
            Ok(book) if long => Reply::line(book.long_string()),
            Ok(book) => Reply::line(book.short_string()),
            Err(e) => Reply::line(e.to_string()),
        },
        Command::SpellbookHistory(serial) => match archive.spellbook_history(serial) {
            Ok([]) => Reply::line("No rental history."),
            Ok(history) => Reply::lines(history.iter().map(|n| n.to_string()).collect()),
            Err(e) => Reply::line(e.to_string()),
        },

        Command::Student(number) => match archive.find_student(number) {
            Ok(student) => Reply::line(student.to_string()),
            Err(e) => Reply::line(e.to_string()),
        },
        Command::StudentSpellbooks(number) => match archive.currently_renting(number) {
            Ok(books) if books.is_empty() => Reply::line("Student not currently renting."),
            Ok(books) => Reply::lines(shorts(&books)),
            Err(e) => Reply::line(e.to_string()),
        },
        Command::StudentHistory(number) => match archive.rental_history(number) {
            Ok(books) if books.is_empty() => Reply::line("No rental history for student."),
            Ok(books) => Reply::lines(shorts(&books)),
            Err(e) => Reply::line(e.to_string()),
        },

        Command::Rent { student, serial } => status(archive.rent(student, serial)),
        Command::Relinquish { student, serial } => status(archive.relinquish(student, serial)),
        Command::RelinquishAll(student) => status(archive.relinquish_all(student).map(|_| ())),

        Command::AddStudent(name) => {
            archive.add_student(&name);
            Reply::line(SUCCESS)
        }
        Command::AddSpellbook { file, serial } => {
            match collection::import_spellbook(archive, &file, serial) {
                Ok(book) => Reply::line(format!("Successfully added: {}.", book.short_string())),
                Err(CollectionError::AlreadyExists(_)) => {
                    Reply::line(ArchiveError::DuplicateSpellbook.to_string())
                }
                Err(CollectionError::NotInFile(_)) => Reply::line("No such spellbook in file."),
                Err(CollectionError::NotFound(_)) => Reply::line("No such file."),
                Err(e) => {
                    debug!(error = %e, "spellbook import failed");
                    Reply::line("Error reading file.")
                }
            }
        }
        Command::AddCollection(file) => match collection::import_collection(archive, &file) {
            Ok(summary) if summary.added == 0 => {
                Reply::line("No spellbooks have been added to the system.")
            }
            Ok(summary) => Reply::line(format!("{} spellbooks successfully added.", summary.added)),
            Err(CollectionError::NotFound(_)) => Reply::line("No such collection."),
            Err(e) => {
                debug!(error = %e, "collection import failed");
                Reply::line("Error reading file.")
            }
        },
        Command::SaveCollection(file) => match collection::save_collection(archive, &file) {
            Ok(_) => Reply::line(SUCCESS),
            Err(CollectionError::NoSpellbooks) => Reply::line(ArchiveError::NoSpellbooks.to_string()),
            Err(e) => {
                debug!(error = %e, "collection save failed");
                Reply::line("Error writing file.")
            }
        },

        Command::Common(students) => {
            if let Err(e) = archive.validate_common_query(&students) {
                return Reply::line(e.to_string());
            }
            let common = archive.common_spellbooks(&students);
            if common.is_empty() {
                return Reply::line("No common spellbooks.");
            }
            Reply::lines(shorts(&common))
        }
    }
}

/// Commands that answer "No spellbooks in system." on an empty catalog
fn needs_spellbooks(command: &Command) -> bool {
    matches!(
        command,
        Command::ListAll { .. }
            | Command::ListAvailable { .. }
            | Command::ListTypes
            | Command::ListInventors
            | Command::NumberCopies
            | Command::Type(_)
            | Command::Inventor(_)
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn run(archive: &mut Archive, line: &str) -> Vec<String> {
        match Command::parse(line) {
            Some(command) => execute(archive, command).lines,
            None => Vec::new(),
        }
    }

    fn collection_file() -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(
            b"serialNumber,title,inventor,type\n\
              1,Lumos Maxima,Flitwick,Charm\n\
              2,Lumos Maxima,Flitwick,Charm\n\
              3,Expelliarmus,Snape,Jinx\n\
              4,Accio,Dumbledore,Dark Arts\n",
        )
        .unwrap();
        f
    }

    /// Two students and the four-spellbook collection
    fn loaded_archive() -> (Archive, NamedTempFile) {
        let file = collection_file();
        let mut archive = Archive::new();
        run(&mut archive, "ADD STUDENT Harry Potter");
        run(&mut archive, "ADD STUDENT Hermione Granger");
        let line = format!("ADD COLLECTION {}", file.path().display());
        assert_eq!(run(&mut archive, &line), vec!["4 spellbooks successfully added."]);
        (archive, file)
    }

    // ========================================================================
    // PARSING
    // ========================================================================

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Command::parse("exit"), Some(Command::Exit));
        assert_eq!(Command::parse("  list all long "), Some(Command::ListAll { long: true }));
        assert_eq!(Command::parse("Number copies"), Some(Command::NumberCopies));
        assert_eq!(
            Command::parse("relinquish all 100000"),
            Some(Command::RelinquishAll(100000))
        );
    }

    #[test]
    fn test_parse_ignores_bad_input() {
        for line in [
            "",
            "   ",
            "FLY",
            "LIST",
            "LIST EVERYTHING",
            "NUMBER",
            "RENT 100000",
            "RENT abc 1",
            "SPELLBOOK one",
            "SPELLBOOK HISTORY",
            "STUDENT SPELLBOOKS",
            "RELINQUISH ALL",
            "ADD STUDENT",
            "ADD SPELLBOOK books.csv",
            "SAVE COLLECTION",
            "COMMON 100000",
        ] {
            assert_eq!(Command::parse(line), None, "line {:?}", line);
        }
    }

    #[test]
    fn test_parse_keeps_multi_word_arguments() {
        assert_eq!(
            Command::parse("TYPE Dark Arts"),
            Some(Command::Type("Dark Arts".to_string()))
        );
        assert_eq!(
            Command::parse("ADD STUDENT  Luna Lovegood"),
            Some(Command::AddStudent("Luna Lovegood".to_string()))
        );
        assert_eq!(
            Command::parse("ADD SPELLBOOK books.csv 12"),
            Some(Command::AddSpellbook { file: PathBuf::from("books.csv"), serial: 12 })
        );
    }

    #[test]
    fn test_parse_common_rejections() {
        assert_eq!(
            Command::parse("COMMON 100000 100001"),
            Some(Command::Common(vec![100000, 100001]))
        );
        assert_eq!(
            Command::parse("COMMON 100000 100000"),
            Some(Command::Rejected(ArchiveError::DuplicateStudents))
        );
        assert_eq!(
            Command::parse("COMMON 100000 harry"),
            Some(Command::Rejected(ArchiveError::NoSuchStudent))
        );
    }

    // ========================================================================
    // EXECUTION
    // ========================================================================

    #[test]
    fn test_exit_and_commands() {
        let mut archive = Archive::new();

        let reply = execute(&mut archive, Command::Exit);
        assert_eq!(reply.flow, Flow::Exit);
        assert_eq!(reply.lines, vec!["Ending Archive process."]);

        let help = run(&mut archive, "COMMANDS");
        assert_eq!(help.first().map(String::as_str), Some("EXIT ends the archive process"));
        assert_eq!(help.len(), HELP.len());
    }

    #[test]
    fn test_empty_archive_messages() {
        let mut archive = Archive::new();

        assert_eq!(run(&mut archive, "LIST ALL"), vec!["No spellbooks in system."]);
        assert_eq!(run(&mut archive, "TYPE Charm"), vec!["No spellbooks in system."]);
        assert_eq!(run(&mut archive, "SPELLBOOK 1"), vec!["No spellbooks in system."]);
        assert_eq!(run(&mut archive, "STUDENT 100000"), vec!["No students in system."]);
        assert_eq!(run(&mut archive, "RENT 100000 1"), vec!["No students in system."]);
        assert_eq!(run(&mut archive, "COMMON 100000 100001"), vec!["No students in system."]);
        assert_eq!(run(&mut archive, "SAVE COLLECTION out.csv"), vec!["No spellbooks in system."]);
    }

    #[test]
    fn test_negative_ids_are_unknown_not_ignored() {
        assert_eq!(
            Command::parse("SPELLBOOK -1"),
            Some(Command::Spellbook { serial: -1, long: false })
        );
        assert_eq!(Command::parse("STUDENT 99999999999"), None);

        let mut archive = Archive::new();
        assert_eq!(run(&mut archive, "SPELLBOOK -1"), vec!["No spellbooks in system."]);

        let (mut archive, _file) = loaded_archive();
        assert_eq!(run(&mut archive, "SPELLBOOK -1"), vec!["No such spellbook in system."]);
        assert_eq!(run(&mut archive, "STUDENT -100000"), vec!["No such student in system."]);
        assert_eq!(run(&mut archive, "RENT 100000 -3"), vec!["No such spellbook in system."]);
    }

    #[test]
    fn test_listing_and_catalog_queries() {
        let (mut archive, _file) = loaded_archive();

        assert_eq!(
            run(&mut archive, "LIST ALL"),
            vec![
                "Lumos Maxima (Flitwick)",
                "Lumos Maxima (Flitwick)",
                "Expelliarmus (Snape)",
                "Accio (Dumbledore)"
            ]
        );
        assert_eq!(run(&mut archive, "LIST TYPES"), vec!["Charm", "Dark Arts", "Jinx"]);
        assert_eq!(
            run(&mut archive, "NUMBER COPIES"),
            vec!["Accio (Dumbledore): 1", "Expelliarmus (Snape): 1", "Lumos Maxima (Flitwick): 2"]
        );
        assert_eq!(run(&mut archive, "TYPE dark arts"), vec!["Accio (Dumbledore)"]);
        assert_eq!(run(&mut archive, "INVENTOR Quirrell"), vec!["No spellbooks by Quirrell."]);
        assert_eq!(run(&mut archive, "TYPE Hex"), vec!["No spellbooks with type Hex."]);
    }

    #[test]
    fn test_long_listing_separates_entries() {
        let (mut archive, _file) = loaded_archive();
        run(&mut archive, "RENT 100000 1");
        run(&mut archive, "RENT 100001 2");
        run(&mut archive, "RENT 100001 3");

        assert_eq!(
            run(&mut archive, "LIST AVAILABLE LONG"),
            vec!["4: Accio (Dumbledore, Dark Arts)\nCurrently available."]
        );
        let all = run(&mut archive, "LIST ALL LONG");
        assert_eq!(all.len(), 7);
        assert_eq!(all[0], "1: Lumos Maxima (Flitwick, Charm)\nRented by: 100000.");
        assert_eq!(all[1], "");
        assert_eq!(all[2], "2: Lumos Maxima (Flitwick, Charm)\nRented by: 100001.");

        run(&mut archive, "RENT 100000 4");
        assert_eq!(run(&mut archive, "LIST AVAILABLE"), vec!["No spellbooks available."]);
    }

    #[test]
    fn test_rent_and_relinquish_flow() {
        let (mut archive, _file) = loaded_archive();

        assert_eq!(run(&mut archive, "RENT 100000 3"), vec!["Success."]);
        assert_eq!(
            run(&mut archive, "RENT 100001 3"),
            vec!["Spellbook is currently unavailable."]
        );
        assert_eq!(run(&mut archive, "RENT 100000 99"), vec!["No such spellbook in system."]);
        assert_eq!(run(&mut archive, "RENT 999999 3"), vec!["No such student in system."]);
        assert_eq!(run(&mut archive, "STUDENT SPELLBOOKS 100000"), vec!["Expelliarmus (Snape)"]);

        assert_eq!(run(&mut archive, "RELINQUISH 100001 3"), vec!["Unable to return spellbook."]);
        assert_eq!(run(&mut archive, "RELINQUISH 100000 3"), vec!["Success."]);
        assert_eq!(run(&mut archive, "SPELLBOOK HISTORY 3"), vec!["100000"]);
        assert_eq!(run(&mut archive, "SPELLBOOK HISTORY 1"), vec!["No rental history."]);
        assert_eq!(run(&mut archive, "STUDENT HISTORY 100000"), vec!["Expelliarmus (Snape)"]);
        assert_eq!(
            run(&mut archive, "STUDENT SPELLBOOKS 100000"),
            vec!["Student not currently renting."]
        );
        assert_eq!(
            run(&mut archive, "STUDENT HISTORY 100001"),
            vec!["No rental history for student."]
        );
        assert_eq!(run(&mut archive, "SPELLBOOK 3 long"), vec![
            "3: Expelliarmus (Snape, Jinx)\nCurrently available."
        ]);
    }

    #[test]
    fn test_relinquish_all() {
        let (mut archive, _file) = loaded_archive();
        run(&mut archive, "RENT 100001 4");
        run(&mut archive, "RENT 100001 1");

        assert_eq!(run(&mut archive, "RELINQUISH ALL 100001"), vec!["Success."]);
        assert_eq!(
            run(&mut archive, "STUDENT HISTORY 100001"),
            vec!["Accio (Dumbledore)", "Lumos Maxima (Flitwick)"]
        );
        // Nothing left to return is still a success
        assert_eq!(run(&mut archive, "RELINQUISH ALL 100001"), vec!["Success."]);
        assert_eq!(run(&mut archive, "RELINQUISH ALL 123"), vec!["No such student in system."]);
    }

    #[test]
    fn test_common_command() {
        let (mut archive, _file) = loaded_archive();
        for line in ["RENT 100000 3", "RELINQUISH 100000 3", "RENT 100001 3", "RELINQUISH 100001 3"] {
            assert_eq!(run(&mut archive, line), vec!["Success."]);
        }

        assert_eq!(run(&mut archive, "COMMON 100000 100001"), vec!["Expelliarmus (Snape)"]);
        assert_eq!(
            run(&mut archive, "COMMON 100001 100001"),
            vec!["Duplicate students provided."]
        );
        assert_eq!(run(&mut archive, "COMMON 100000 555"), vec!["No such student in system."]);

        run(&mut archive, "ADD STUDENT Ron Weasley");
        assert_eq!(run(&mut archive, "COMMON 100000 100002"), vec!["No common spellbooks."]);
    }

    #[test]
    fn test_add_spellbook_outcomes() {
        let file = collection_file();
        let path = file.path().display().to_string();
        let mut archive = Archive::new();

        assert_eq!(
            run(&mut archive, &format!("ADD SPELLBOOK {} 3", path)),
            vec!["Successfully added: Expelliarmus (Snape)."]
        );
        assert_eq!(
            run(&mut archive, &format!("ADD SPELLBOOK {} 3", path)),
            vec!["Spellbook already exists in system."]
        );
        assert_eq!(
            run(&mut archive, &format!("ADD SPELLBOOK {} 42", path)),
            vec!["No such spellbook in file."]
        );

        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.csv").display().to_string();
        assert_eq!(
            run(&mut archive, &format!("ADD SPELLBOOK {} 3", missing)),
            vec!["No such file."]
        );
        assert_eq!(
            run(&mut archive, &format!("ADD COLLECTION {}", missing)),
            vec!["No such collection."]
        );
    }

    #[test]
    fn test_add_collection_twice_adds_nothing() {
        let (mut archive, file) = loaded_archive();

        let line = format!("ADD COLLECTION {}", file.path().display());
        assert_eq!(
            run(&mut archive, &line),
            vec!["No spellbooks have been added to the system."]
        );
    }

    #[test]
    fn test_save_collection_command() {
        let (mut archive, _file) = loaded_archive();
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("saved.csv");

        assert_eq!(
            run(&mut archive, &format!("SAVE COLLECTION {}", out.display())),
            vec!["Success."]
        );

        let mut reloaded = Archive::new();
        assert_eq!(
            run(&mut reloaded, &format!("ADD COLLECTION {}", out.display())),
            vec!["4 spellbooks successfully added."]
        );
    }
}
