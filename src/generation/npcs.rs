//! # NPC Datasets
//!
//! Quiz NPCs come from a line-delimited, semicolon-separated record file:
//!
//! ```text
//! name;question;correct answer;distractor A;distractor B;distractor C;reward keys;reward points
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Short lines and
//! unparsable rewards are reported and skipped; loading always continues
//! with the remaining records.

use crate::game::{Npc, Position};
use crate::generation::{utils, RandomSource};
use crate::{LockroomError, LockroomResult};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fields expected on every record line.
pub const NPC_RECORD_FIELDS: usize = 8;

/// One parsed NPC record, before it is placed on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcRecord {
    pub name: String,
    pub question: String,
    pub correct_answer: String,
    pub distractors: [String; 3],
    pub reward_keys: u32,
    pub reward_points: u32,
}

impl NpcRecord {
    /// Parses a single record line. `line` is 1-based and only used for
    /// error reporting.
    ///
    /// # Examples
    ///
    /// ```
    /// use lockroom::NpcRecord;
    ///
    /// let record = NpcRecord::parse_line("Owl;2+2?;4;3;5;22;1;10", 1).unwrap();
    /// assert_eq!(record.correct_answer, "4");
    /// assert_eq!(record.reward_points, 10);
    /// ```
    pub fn parse_line(text: &str, line: usize) -> LockroomResult<Self> {
        let fields: Vec<&str> = text.split(';').map(str::trim).collect();
        if fields.len() < NPC_RECORD_FIELDS {
            return Err(LockroomError::MalformedRecord {
                line,
                reason: format!(
                    "expected {} fields, found {}",
                    NPC_RECORD_FIELDS,
                    fields.len()
                ),
            });
        }

        if fields[..3].iter().any(|field| field.is_empty()) {
            return Err(LockroomError::MalformedRecord {
                line,
                reason: "name, question and answer must not be empty".to_string(),
            });
        }

        let parse_reward = |index: usize, label: &str| {
            fields[index]
                .parse::<u32>()
                .map_err(|e| LockroomError::MalformedRecord {
                    line,
                    reason: format!("{} '{}': {}", label, fields[index], e),
                })
        };

        Ok(Self {
            name: fields[0].to_string(),
            question: fields[1].to_string(),
            correct_answer: fields[2].to_string(),
            distractors: [
                fields[3].to_string(),
                fields[4].to_string(),
                fields[5].to_string(),
            ],
            reward_keys: parse_reward(6, "reward keys")?,
            reward_points: parse_reward(7, "reward points")?,
        })
    }

    /// Builds a dormant NPC standing at `position`.
    pub fn to_npc(&self, position: Position) -> Npc {
        Npc::new(
            self.name.clone(),
            position,
            self.question.clone(),
            self.correct_answer.clone(),
            self.distractors.to_vec(),
            self.reward_keys,
            self.reward_points,
        )
    }
}

/// Parses a whole record file, skipping (and logging) malformed lines.
pub fn parse_npc_records(text: &str) -> Vec<NpcRecord> {
    let mut records = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match NpcRecord::parse_line(trimmed, index + 1) {
            Ok(record) => records.push(record),
            Err(e) => error!("Skipping NPC record: {}", e),
        }
    }

    debug!("Parsed {} NPC records", records.len());
    records
}

/// Chooses `count` distinct records by a Fisher-Yates partial shuffle of
/// the pool. Returns fewer when the pool is smaller.
pub fn select_npcs(pool: &[NpcRecord], count: usize, rng: &mut dyn RandomSource) -> Vec<NpcRecord> {
    let mut indices: Vec<usize> = (0..pool.len()).collect();
    let taken = utils::partial_shuffle(rng, &mut indices, count);
    indices[..taken]
        .iter()
        .map(|&index| pool[index].clone())
        .collect()
}

/// Anything that can supply the NPC pool.
pub trait NpcDataSource {
    /// Loads every usable record.
    fn load_all(&self) -> LockroomResult<Vec<NpcRecord>>;
}

/// Reads records from a file on disk.
#[derive(Debug, Clone)]
pub struct NpcFile {
    path: PathBuf,
}

impl NpcFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl NpcDataSource for NpcFile {
    fn load_all(&self) -> LockroomResult<Vec<NpcRecord>> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            error!("Cannot read NPC file {}: {}", self.path.display(), e);
            e
        })?;
        Ok(parse_npc_records(&text))
    }
}

/// The dataset compiled into the binary, used when no file is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinNpcs;

const BUILTIN_RECORDS: &str = "\
Archivist;How many sides does a hexagon have?;6;5;8;7;1;10
Gatekeeper;What is the chemical symbol for gold?;Au;Ag;Gd;Go;1;15
Sphinx;What has keys but opens no locks?;A piano;A map;A diary;A clock;2;20
Cartographer;Which ocean is the largest?;Pacific;Atlantic;Indian;Arctic;1;10
Clockmaker;How many minutes are in a day?;1440;1240;1600;720;1;15
Librarian;Who wrote 'Hamlet'?;Shakespeare;Marlowe;Chaucer;Milton;1;10
Astronomer;Which planet is closest to the sun?;Mercury;Venus;Mars;Earth;1;10
Alchemist;What is frozen water called?;Ice;Steam;Brine;Frost;1;5
Mathematician;What is 7 times 8?;56;54;64;48;2;20
Botanist;What gas do plants absorb?;Carbon dioxide;Oxygen;Nitrogen;Helium;1;10
Sailor;How many continents are there?;7;5;6;8;1;10
Jester;What gets wetter the more it dries?;A towel;A sponge;A river;A cloud;2;25
";

impl NpcDataSource for BuiltinNpcs {
    fn load_all(&self) -> LockroomResult<Vec<NpcRecord>> {
        Ok(parse_npc_records(BUILTIN_RECORDS))
    }
}
