//! Mock content catalog for testing without a database

use super::lock;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use tripdesk_core::{MediaAsset, ReferenceSite, REFERENCE_SITES};
use tripdesk_db::{CatalogError, CatalogResult, CollectionRow, ContentCatalog};

type FieldKey = (String, String);

#[derive(Default)]
struct State {
    media: HashMap<String, MediaAsset>,
    scalars: HashMap<FieldKey, BTreeMap<String, Option<String>>>,
    collections: HashMap<FieldKey, BTreeMap<String, Vec<String>>>,
    written: HashSet<(String, String, String)>,
    failing_sites: HashMap<&'static str, String>,
    media_delete_error: Option<String>,
    calls: Vec<String>,
}

/// In-memory catalog
///
/// Every trait call is recorded (see [`MockContentCatalog::calls`]) so tests
/// can assert that nothing was touched.
pub struct MockContentCatalog {
    state: Mutex<State>,
    /// Whether `media.public_id` really exists
    public_id_column: bool,
    /// What `has_public_id` reports
    reports_public_id: bool,
}

impl Default for MockContentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockContentCatalog {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            public_id_column: true,
            reports_public_id: true,
        }
    }

    /// A catalog created before `media.public_id` existed, not yet probed.
    pub fn legacy_schema() -> Self {
        Self {
            public_id_column: false,
            ..Self::new()
        }
    }

    /// Report the real schema through `has_public_id`, as a probed catalog does.
    pub fn with_probed_capabilities(mut self) -> Self {
        self.reports_public_id = self.public_id_column;
        self
    }

    pub fn add_media(&self, asset: MediaAsset) {
        lock(&self.state).media.insert(asset.id.clone(), asset);
    }

    pub fn has_media(&self, id: &str) -> bool {
        lock(&self.state).media.contains_key(id)
    }

    pub fn set_scalar(&self, table: &str, field: &str, row_id: &str, value: Option<&str>) {
        lock(&self.state)
            .scalars
            .entry((table.to_string(), field.to_string()))
            .or_default()
            .insert(row_id.to_string(), value.map(String::from));
    }

    pub fn scalar(&self, table: &str, field: &str, row_id: &str) -> Option<String> {
        lock(&self.state)
            .scalars
            .get(&(table.to_string(), field.to_string()))
            .and_then(|rows| rows.get(row_id).cloned())
            .flatten()
    }

    pub fn set_collection(&self, table: &str, field: &str, row_id: &str, entries: &[&str]) {
        lock(&self.state)
            .collections
            .entry((table.to_string(), field.to_string()))
            .or_default()
            .insert(
                row_id.to_string(),
                entries.iter().map(|e| e.to_string()).collect(),
            );
    }

    pub fn collection(&self, table: &str, field: &str, row_id: &str) -> Vec<String> {
        lock(&self.state)
            .collections
            .get(&(table.to_string(), field.to_string()))
            .and_then(|rows| rows.get(row_id).cloned())
            .unwrap_or_default()
    }

    /// Whether `write_collection` was called for this row.
    pub fn was_written(&self, table: &str, field: &str, row_id: &str) -> bool {
        lock(&self.state).written.contains(&(
            table.to_string(),
            field.to_string(),
            row_id.to_string(),
        ))
    }

    /// Make every operation on the reference site with this key fail.
    pub fn fail_site(&self, key: &str, message: &str) {
        if let Some(site) = REFERENCE_SITES.iter().find(|s| s.key == key) {
            lock(&self.state)
                .failing_sites
                .insert(site.key, message.to_string());
        }
    }

    pub fn fail_media_delete(&self, message: &str) {
        lock(&self.state).media_delete_error = Some(message.to_string());
    }

    pub fn allow_media_delete(&self) {
        lock(&self.state).media_delete_error = None;
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.state).calls.clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.state).calls.clear();
    }

    fn site_error(state: &State, site: &ReferenceSite) -> CatalogResult<()> {
        match state.failing_sites.get(site.key) {
            Some(message) => Err(CatalogError::Database(sqlx::Error::Protocol(
                message.clone(),
            ))),
            None => Ok(()),
        }
    }

    fn field_key(site: &ReferenceSite) -> FieldKey {
        (site.table.to_string(), site.field.to_string())
    }
}

#[async_trait]
impl ContentCatalog for MockContentCatalog {
    fn has_public_id(&self) -> bool {
        self.reports_public_id
    }

    async fn find_media(
        &self,
        id: &str,
        with_public_id: bool,
    ) -> CatalogResult<Option<MediaAsset>> {
        let mut state = lock(&self.state);
        let shape = if with_public_id { "public_id" } else { "plain" };
        state.calls.push(format!("find_media:{}:{}", id, shape));

        if with_public_id && !self.public_id_column {
            return Err(CatalogError::ColumnMissing(
                "column media.public_id does not exist".to_string(),
            ));
        }

        Ok(state.media.get(id).cloned().map(|mut asset| {
            if !with_public_id {
                asset.public_id = None;
            }
            asset
        }))
    }

    async fn clear_scalar(&self, site: &ReferenceSite, url: &str) -> CatalogResult<u64> {
        let mut state = lock(&self.state);
        state
            .calls
            .push(format!("clear_scalar:{}.{}", site.table, site.field));
        Self::site_error(&state, site)?;

        let mut changed = 0;
        if let Some(rows) = state.scalars.get_mut(&Self::field_key(site)) {
            for value in rows.values_mut() {
                if value.as_deref() == Some(url) {
                    *value = None;
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    async fn rows_containing(
        &self,
        site: &ReferenceSite,
        url: &str,
    ) -> CatalogResult<Vec<CollectionRow>> {
        let mut state = lock(&self.state);
        state
            .calls
            .push(format!("rows_containing:{}.{}", site.table, site.field));
        Self::site_error(&state, site)?;

        Ok(state
            .collections
            .get(&Self::field_key(site))
            .map(|rows| {
                rows.iter()
                    .filter(|(_, entries)| entries.iter().any(|e| e == url))
                    .map(|(id, entries)| CollectionRow {
                        id: id.clone(),
                        entries: entries.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn write_collection(
        &self,
        site: &ReferenceSite,
        row_id: &str,
        entries: &[String],
    ) -> CatalogResult<()> {
        let mut state = lock(&self.state);
        state.calls.push(format!(
            "write_collection:{}.{}:{}",
            site.table, site.field, row_id
        ));
        Self::site_error(&state, site)?;

        state.written.insert((
            site.table.to_string(),
            site.field.to_string(),
            row_id.to_string(),
        ));
        state
            .collections
            .entry(Self::field_key(site))
            .or_default()
            .insert(row_id.to_string(), entries.to_vec());
        Ok(())
    }

    async fn delete_media(&self, id: &str) -> CatalogResult<u64> {
        let mut state = lock(&self.state);
        state.calls.push(format!("delete_media:{}", id));

        if let Some(message) = &state.media_delete_error {
            return Err(CatalogError::Database(sqlx::Error::Protocol(
                message.clone(),
            )));
        }
        Ok(state.media.remove(id).map_or(0, |_| 1))
    }
}
