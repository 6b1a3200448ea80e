//! Case file format: two unknown sequences followed by the registered persons.
//!
//! ```text
//! AAGATCAGATCAGA          <- first unknown sequence (raw line)
//! AGATCTAGATCAAA          <- second unknown sequence (raw line)
//! 2                       <- number of persons
//! Jane Doe 2 AGATC 4 AATG 1
//! Bob Adams 1 AGATC 3
//! ```
//!
//! After the third line the content is a whitespace separated token stream:
//! first name, last name, marker count, then `marker count` pairs of marker
//! text and expected occurrences. Line breaks between tokens carry no meaning.

use std::str::FromStr;

use tracing::{debug, instrument};

use crate::domain::entities::{DuplicatePolicy, MarkerRecord, Profile};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::registry::Registry;

/// One person as listed in a case file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub first_name: String,
    pub last_name: String,
    pub markers: Vec<MarkerRecord>,
}

impl PersonRecord {
    /// Registry key: `"Last, First"`
    pub fn full_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// Parsed content of a case file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFile {
    pub sequence_a: String,
    pub sequence_b: String,
    pub persons: Vec<PersonRecord>,
}

impl CaseFile {
    /// Parse case file content.
    ///
    /// Tokens following the announced persons are ignored.
    #[instrument(level = "debug", skip(content))]
    pub fn parse(content: &str) -> DomainResult<Self> {
        let mut lines = content.lines().enumerate();

        let mut header = |line: usize, what: &str| {
            lines
                .next()
                .map(|(_, text)| text.trim_end_matches('\r').to_string())
                .ok_or_else(|| invalid(line, format!("missing {what}")))
        };
        let sequence_a = header(1, "first unknown sequence")?;
        let sequence_b = header(2, "second unknown sequence")?;
        let count_line = header(3, "person count")?;
        let person_count: usize = parse_number(count_line.trim(), 3, "person count")?;

        let mut tokens = Tokens {
            inner: lines.flat_map(|(idx, line)| line.split_whitespace().map(move |t| (idx + 1, t))),
            last_line: 3,
        };

        let mut persons = Vec::with_capacity(person_count);
        for _ in 0..person_count {
            let first_name = tokens.next_token("first name")?.to_string();
            let last_name = tokens.next_token("last name")?.to_string();
            let marker_count: usize = tokens.next_number("marker count")?;
            let mut markers = Vec::with_capacity(marker_count);
            for _ in 0..marker_count {
                let text = tokens.next_token("marker")?;
                let expected: u32 = tokens.next_number("expected marker count")?;
                markers.push(MarkerRecord::new(text, expected));
            }
            persons.push(PersonRecord {
                first_name,
                last_name,
                markers,
            });
        }
        debug!("parsed {} persons", persons.len());

        Ok(Self {
            sequence_a,
            sequence_b,
            persons,
        })
    }

    /// Build a registry by inserting every person in file order.
    pub fn into_registry(self, policy: DuplicatePolicy) -> DomainResult<Registry> {
        let mut registry = Registry::new(self.sequence_a, self.sequence_b).with_duplicate_policy(policy);
        for person in self.persons {
            let name = person.full_name();
            registry.insert(&name, Profile::new(person.markers))?;
        }
        Ok(registry)
    }
}

/// Token stream that remembers the line of the last token handed out.
struct Tokens<I> {
    inner: I,
    last_line: usize,
}

impl<'a, I: Iterator<Item = (usize, &'a str)>> Tokens<I> {
    fn next_token(&mut self, what: &str) -> DomainResult<&'a str> {
        match self.inner.next() {
            Some((line, token)) => {
                self.last_line = line;
                Ok(token)
            }
            None => Err(invalid(self.last_line, format!("unexpected end of input, expected {what}"))),
        }
    }

    fn next_number<T: FromStr>(&mut self, what: &str) -> DomainResult<T> {
        let token = self.next_token(what)?;
        parse_number(token, self.last_line, what)
    }
}

fn parse_number<T: FromStr>(token: &str, line: usize, what: &str) -> DomainResult<T> {
    token
        .parse()
        .map_err(|_| invalid(line, format!("{what} must be a non-negative integer, got '{token}'")))
}

fn invalid(line: usize, message: String) -> DomainError {
    DomainError::InvalidCaseFile { line, message }
}
