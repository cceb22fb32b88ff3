// Roster store
// Versioned per-student records held in memory behind one lock, indexed by
// id, handle and class, optionally written through to a JSON snapshot file.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{info, warn};

use backend_domain::{ClassId, RosterError, RosterRepository, StudentGameState, StudentId};

#[derive(Debug, Default, Serialize, Deserialize)]
struct RosterSnapshot {
    #[serde(default)]
    students: Vec<Value>,
}

/// A stored record that failed to parse. Kept verbatim so it is written
/// back unchanged and every access to it keeps failing loudly.
#[derive(Debug, Clone)]
struct CorruptRecord {
    raw: Value,
    reason: String,
}

#[derive(Debug, Default)]
struct RosterTable {
    records: HashMap<StudentId, StudentGameState>,
    corrupt: HashMap<StudentId, CorruptRecord>,
    handles: HashMap<String, StudentId>,
    classes: HashMap<ClassId, BTreeSet<StudentId>>,
}

impl RosterTable {
    fn lookup(&self, id: StudentId) -> Result<&StudentGameState, RosterError> {
        if let Some(corrupt) = self.corrupt.get(&id) {
            return Err(RosterError::Corrupt {
                student_id: id,
                reason: corrupt.reason.clone(),
            });
        }
        self.records.get(&id).ok_or_else(|| RosterError::not_found(id))
    }

    fn index(&mut self, state: &StudentGameState) {
        self.handles.insert(state.handle.clone(), state.student_id);
        for class_id in &state.class_ids {
            self.classes
                .entry(class_id.clone())
                .or_default()
                .insert(state.student_id);
        }
    }

    fn unindex(&mut self, state: &StudentGameState) {
        if self.handles.get(&state.handle) == Some(&state.student_id) {
            self.handles.remove(&state.handle);
        }
        for class_id in &state.class_ids {
            if let Some(members) = self.classes.get_mut(class_id) {
                members.remove(&state.student_id);
                if members.is_empty() {
                    self.classes.remove(class_id);
                }
            }
        }
    }

    fn store(&mut self, state: StudentGameState) {
        if let Some(previous) = self.records.remove(&state.student_id) {
            self.unindex(&previous);
        }
        self.index(&state);
        self.records.insert(state.student_id, state);
    }

    /// Checks every change against the current versions and returns the
    /// records as they will be stored.
    fn stage(&self, changes: Vec<StudentGameState>) -> Result<Vec<StudentGameState>, RosterError> {
        let mut seen = HashSet::new();
        let mut staged = Vec::with_capacity(changes.len());
        for mut change in changes {
            let id = change.student_id;
            if !seen.insert(id) {
                return Err(RosterError::Storage(anyhow!(
                    "student {} appears twice in one commit",
                    id
                )));
            }
            let current = self.lookup(id)?;
            if current.version != change.version {
                return Err(RosterError::VersionConflict(id));
            }
            if change.handle != current.handle {
                if let Some(owner) = self.handles.get(&change.handle) {
                    if *owner != id {
                        return Err(RosterError::DuplicateHandle(change.handle));
                    }
                }
            }
            change.version += 1;
            staged.push(change);
        }
        Ok(staged)
    }

    fn render(&self, overrides: &[StudentGameState]) -> anyhow::Result<Vec<u8>> {
        let overrides: HashMap<StudentId, &StudentGameState> =
            overrides.iter().map(|state| (state.student_id, state)).collect();
        let mut ids: Vec<StudentId> = self
            .records
            .keys()
            .chain(self.corrupt.keys())
            .chain(overrides.keys())
            .copied()
            .collect();
        ids.sort();
        ids.dedup();

        let mut students = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(corrupt) = self.corrupt.get(&id) {
                students.push(corrupt.raw.clone());
            } else if let Some(state) = overrides.get(&id) {
                students.push(serde_json::to_value(state)?);
            } else if let Some(state) = self.records.get(&id) {
                students.push(serde_json::to_value(state)?);
            }
        }
        Ok(serde_json::to_vec_pretty(&RosterSnapshot { students })?)
    }
}

pub struct JsonRosterRepository {
    table: RwLock<RosterTable>,
    snapshot_path: Option<PathBuf>,
}

impl JsonRosterRepository {
    pub fn in_memory() -> Self {
        Self {
            table: RwLock::new(RosterTable::default()),
            snapshot_path: None,
        }
    }

    /// Loads the snapshot at `path`, or starts empty when the file does not
    /// exist yet. A file that is not a roster snapshot at all is an error;
    /// individual records that fail to parse are kept as corrupt entries.
    pub async fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut table = RosterTable::default();
        if path.exists() {
            let content = fs::read(&path)
                .await
                .with_context(|| format!("failed to read roster snapshot {}", path.display()))?;
            let snapshot: RosterSnapshot = serde_json::from_slice(&content)
                .with_context(|| format!("roster snapshot {} is not valid", path.display()))?;
            load_records(&mut table, snapshot.students)?;
            info!(
                "roster loaded: path={}, students={}, corrupt={}",
                path.display(),
                table.records.len(),
                table.corrupt.len()
            );
        } else {
            warn!("roster snapshot {} not found, starting empty", path.display());
        }
        Ok(Self {
            table: RwLock::new(table),
            snapshot_path: Some(path),
        })
    }

    async fn persist(&self, table: &RosterTable, overrides: &[StudentGameState]) -> anyhow::Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let content = table.render(overrides)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, path).await?;
        Ok(())
    }
}

fn load_records(table: &mut RosterTable, students: Vec<Value>) -> anyhow::Result<()> {
    for (position, raw) in students.into_iter().enumerate() {
        let Some(id) = raw.get("studentId").and_then(Value::as_i64).map(StudentId) else {
            bail!("roster record #{} has no numeric studentId", position);
        };
        if table.records.contains_key(&id) || table.corrupt.contains_key(&id) {
            bail!("roster snapshot lists student {} twice", id);
        }
        match serde_json::from_value::<StudentGameState>(raw.clone()) {
            Ok(state) => {
                if table.handles.contains_key(&state.handle) {
                    bail!("roster snapshot lists handle '{}' twice", state.handle);
                }
                table.store(state);
            }
            Err(err) => {
                warn!("corrupt roster record: student={}, err={}", id, err);
                if let Some(handle) = raw.get("handle").and_then(Value::as_str) {
                    table.handles.entry(handle.to_string()).or_insert(id);
                }
                table.corrupt.insert(
                    id,
                    CorruptRecord {
                        raw,
                        reason: err.to_string(),
                    },
                );
            }
        }
    }
    Ok(())
}

#[async_trait]
impl RosterRepository for JsonRosterRepository {
    async fn get(&self, id: StudentId) -> Result<StudentGameState, RosterError> {
        let table = self.table.read().await;
        table.lookup(id).cloned()
    }

    async fn find_by_handle(&self, handle: &str) -> Result<StudentGameState, RosterError> {
        let table = self.table.read().await;
        let id = table
            .handles
            .get(handle)
            .copied()
            .ok_or_else(|| RosterError::NotFound(handle.to_string()))?;
        table.lookup(id).cloned()
    }

    async fn list_by_classes(&self, class_ids: &[ClassId]) -> Result<Vec<StudentGameState>, RosterError> {
        let table = self.table.read().await;
        let members: BTreeSet<StudentId> = class_ids
            .iter()
            .filter_map(|class_id| table.classes.get(class_id))
            .flatten()
            .copied()
            .collect();
        Ok(members
            .into_iter()
            .filter_map(|id| table.records.get(&id).cloned())
            .collect())
    }

    async fn insert(&self, mut state: StudentGameState) -> Result<StudentGameState, RosterError> {
        let mut table = self.table.write().await;
        let id = state.student_id;
        if table.records.contains_key(&id) || table.corrupt.contains_key(&id) {
            return Err(RosterError::DuplicateId(id));
        }
        if table.handles.contains_key(&state.handle) {
            return Err(RosterError::DuplicateHandle(state.handle));
        }
        state.version = 1;
        self.persist(&table, std::slice::from_ref(&state)).await?;
        table.store(state.clone());
        Ok(state)
    }

    async fn commit(&self, changes: Vec<StudentGameState>) -> Result<Vec<StudentGameState>, RosterError> {
        let mut table = self.table.write().await;
        let staged = table.stage(changes)?;
        self.persist(&table, &staged).await?;
        for state in &staged {
            table.store(state.clone());
        }
        Ok(staged)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        let _table = self.table.read().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: i64, handle: &str, classes: &[&str]) -> StudentGameState {
        let mut state = StudentGameState::new(StudentId(id), handle, handle.to_uppercase());
        state.gold = 100;
        state.class_ids = classes.iter().map(|c| ClassId(c.to_string())).collect();
        state
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("arena-roster-{}-{}.json", name, uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn insert_then_get_and_find_by_handle() {
        let repo = JsonRosterRepository::in_memory();
        let stored = repo.insert(student(1, "ana", &["7a"])).await.expect("insert");
        assert_eq!(stored.version, 1);
        assert_eq!(repo.get(StudentId(1)).await.expect("get").handle, "ana");
        assert_eq!(repo.find_by_handle("ana").await.expect("find").student_id, StudentId(1));
        assert!(matches!(repo.get(StudentId(2)).await, Err(RosterError::NotFound(_))));
        assert!(matches!(repo.find_by_handle("nobody").await, Err(RosterError::NotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_id_and_handle_are_rejected() {
        let repo = JsonRosterRepository::in_memory();
        repo.insert(student(1, "ana", &[])).await.expect("insert");
        assert!(matches!(
            repo.insert(student(1, "bia", &[])).await,
            Err(RosterError::DuplicateId(StudentId(1)))
        ));
        assert!(matches!(
            repo.insert(student(2, "ana", &[])).await,
            Err(RosterError::DuplicateHandle(_))
        ));
    }

    #[tokio::test]
    async fn commit_bumps_versions_and_rejects_stale_snapshots() {
        let repo = JsonRosterRepository::in_memory();
        repo.insert(student(1, "ana", &[])).await.expect("insert a");
        repo.insert(student(2, "bia", &[])).await.expect("insert b");

        let mut a = repo.get(StudentId(1)).await.expect("a");
        let mut b = repo.get(StudentId(2)).await.expect("b");
        let stale_b = b.clone();
        a.gold -= 10;
        b.gold += 10;
        let committed = repo.commit(vec![a, b]).await.expect("commit");
        assert!(committed.iter().all(|state| state.version == 2));

        let mut a = repo.get(StudentId(1)).await.expect("a again");
        a.gold = 0;
        let mut stale_b = stale_b;
        stale_b.gold = 999;
        let err = repo.commit(vec![a, stale_b]).await.expect_err("stale commit");
        assert!(matches!(err, RosterError::VersionConflict(StudentId(2))));

        // nothing from the failed commit is visible
        assert_eq!(repo.get(StudentId(1)).await.expect("a").gold, 90);
        assert_eq!(repo.get(StudentId(2)).await.expect("b").gold, 110);
    }

    #[tokio::test]
    async fn class_index_follows_commits() {
        let repo = JsonRosterRepository::in_memory();
        repo.insert(student(1, "ana", &["7a"])).await.expect("insert");
        repo.insert(student(2, "bia", &["7a", "8b"])).await.expect("insert");
        repo.insert(student(3, "caio", &["8b"])).await.expect("insert");

        let in_7a = repo.list_by_classes(&[ClassId("7a".into())]).await.expect("list");
        assert_eq!(in_7a.iter().map(|s| s.student_id.0).collect::<Vec<_>>(), vec![1, 2]);

        let mut ana = repo.get(StudentId(1)).await.expect("ana");
        ana.class_ids = vec![ClassId("8b".into())];
        repo.commit(vec![ana]).await.expect("move class");

        let in_7a = repo.list_by_classes(&[ClassId("7a".into())]).await.expect("list");
        assert_eq!(in_7a.len(), 1);
        let both = repo
            .list_by_classes(&[ClassId("7a".into()), ClassId("8b".into())])
            .await
            .expect("list");
        assert_eq!(both.len(), 3);
    }

    #[tokio::test]
    async fn snapshot_survives_reopen() {
        let path = temp_path("reopen");
        {
            let repo = JsonRosterRepository::open(&path).await.expect("open");
            repo.insert(student(1, "ana", &["7a"])).await.expect("insert");
            let mut ana = repo.get(StudentId(1)).await.expect("get");
            ana.gold = 42;
            repo.commit(vec![ana]).await.expect("commit");
        }
        let reopened = JsonRosterRepository::open(&path).await.expect("reopen");
        let ana = reopened.find_by_handle("ana").await.expect("find");
        assert_eq!(ana.gold, 42);
        assert_eq!(ana.version, 2);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn malformed_record_is_reported_not_dropped() {
        let path = temp_path("corrupt");
        let content = serde_json::json!({
            "students": [
                {"studentId": 1, "handle": "ana", "displayName": "Ana", "gold": 10},
                {"studentId": 2, "handle": "bia", "displayName": "Bia", "gold": "lots"}
            ]
        });
        std::fs::write(&path, content.to_string()).expect("write fixture");

        let repo = JsonRosterRepository::open(&path).await.expect("open");
        assert_eq!(repo.get(StudentId(1)).await.expect("ana").gold, 10);
        assert!(matches!(
            repo.get(StudentId(2)).await,
            Err(RosterError::Corrupt { student_id: StudentId(2), .. })
        ));
        assert!(matches!(repo.find_by_handle("bia").await, Err(RosterError::Corrupt { .. })));

        // a write elsewhere keeps the corrupt record on disk verbatim
        let mut ana = repo.get(StudentId(1)).await.expect("ana");
        ana.gold = 11;
        repo.commit(vec![ana]).await.expect("commit");
        let on_disk: Value = serde_json::from_slice(&std::fs::read(&path).expect("read")).expect("json");
        assert_eq!(on_disk["students"][1]["gold"], "lots");
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn unparseable_snapshot_fails_to_open() {
        let path = temp_path("garbage");
        std::fs::write(&path, "not json").expect("write fixture");
        assert!(JsonRosterRepository::open(&path).await.is_err());
        let _ = std::fs::remove_file(&path);
    }
}
