//! Member persistence.
//!
//! The registry reads and writes the member set as a whole ordered snapshot.
//! [`RocksStore`] is the durable backend; [`MemoryStore`] keeps the snapshot
//! in process for tests and embedding.

use crate::error::{Error, Result};
use rocksdb::{Options, WriteBatch, DB};
use std::path::Path;
use std::sync::RwLock;
use trellis_tree::Member;

/// Snapshot persistence for members.
///
/// Callers serialize writers themselves; implementations only need each
/// `save_all` to replace the previous snapshot as a unit.
pub trait MemberStore: Send + Sync {
    /// Every member, ordered by code ordinal.
    fn load_all(&self) -> Result<Vec<Member>>;

    /// Replace the stored snapshot with `members`.
    fn save_all(&self, members: &[Member]) -> Result<()>;
}

const MEMBER_PREFIX: &[u8] = b"member:";
/// First key after every `member:` key (`;` follows `:` in ASCII).
const MEMBER_PREFIX_END: &[u8] = b"member;";

fn member_key(member: &Member) -> String {
    format!("member:{}", member.code)
}

fn sort_by_ordinal(members: &mut [Member]) {
    members.sort_by(|a, b| {
        (a.code.ordinal(), a.code.as_str()).cmp(&(b.code.ordinal(), b.code.as_str()))
    });
}

/// RocksDB-backed member store.
pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    /// Open or create storage at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }
}

impl MemberStore for RocksStore {
    fn load_all(&self) -> Result<Vec<Member>> {
        let mut members = Vec::new();

        let iter = self.db.prefix_iterator(MEMBER_PREFIX);
        for item in iter {
            let (key, value) = item?;
            if key.starts_with(MEMBER_PREFIX) {
                let member: Member = serde_json::from_slice(&value)?;
                members.push(member);
            } else {
                break;
            }
        }

        sort_by_ordinal(&mut members);
        Ok(members)
    }

    fn save_all(&self, members: &[Member]) -> Result<()> {
        // One batch: readers see either the old snapshot or the new one.
        let mut batch = WriteBatch::default();
        batch.delete_range(MEMBER_PREFIX, MEMBER_PREFIX_END);
        for member in members {
            let value = serde_json::to_vec(member)?;
            batch.put(member_key(member).as_bytes(), value);
        }
        self.db.write(batch)?;
        Ok(())
    }
}

/// In-process member store.
#[derive(Default)]
pub struct MemoryStore {
    members: RwLock<Vec<Member>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemberStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Member>> {
        let members = self
            .members
            .read()
            .map_err(|_| Error::Storage("member store lock poisoned".into()))?;
        Ok(members.clone())
    }

    fn save_all(&self, members: &[Member]) -> Result<()> {
        let mut snapshot = members.to_vec();
        sort_by_ordinal(&mut snapshot);
        let mut stored = self
            .members
            .write()
            .map_err(|_| Error::Storage("member store lock poisoned".into()))?;
        *stored = snapshot;
        Ok(())
    }
}
