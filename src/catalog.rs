//! Catalog assembly: both index views plus `metadata.json`.

use crate::classification::NameResolver;
use crate::config::CatalogConfig;
use crate::error::ApiError;
use crate::report::BuildSummary;
use crate::toc::documents::listed_count;
use crate::toc::emitter::ClassificationEmitter;
use crate::toc::grouped::{duplicate_ids, GroupedEmitter};
use crate::toc::sink::DocumentSink;
use crate::tree::builder::{TrieBuild, TrieBuilder};
use crate::types::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Contents of `metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    pub accession: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    pub created: DateTime<Utc>,
    pub stats: CatalogStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub records: usize,
    pub subitems: usize,
    pub documents_written: usize,
    pub name_collisions: usize,
}

/// A trie that passed the collision gate, ready to be written.
#[derive(Debug, Clone)]
pub struct CatalogPlan {
    pub trie: TrieBuild,
    pub name_collisions: usize,
}

/// Builds every index page of a catalog into a sink.
pub struct Catalog<'a> {
    config: &'a CatalogConfig,
    resolver: &'a NameResolver,
}

impl<'a> Catalog<'a> {
    pub fn new(config: &'a CatalogConfig, resolver: &'a NameResolver) -> Self {
        Self { config, resolver }
    }

    /// Build with the current time as the creation stamp.
    pub fn assemble(
        &self,
        records: &[Arc<Record>],
        sink: &mut dyn DocumentSink,
    ) -> Result<BuildSummary, ApiError> {
        self.assemble_at(records, sink, Utc::now())
    }

    pub fn assemble_at(
        &self,
        records: &[Arc<Record>],
        sink: &mut dyn DocumentSink,
        created: DateTime<Utc>,
    ) -> Result<BuildSummary, ApiError> {
        let plan = self.plan(records)?;
        self.emit(plan, records, sink, created)
    }

    /// Everything that can refuse the build, computed without writing.
    pub fn plan(&self, records: &[Arc<Record>]) -> Result<CatalogPlan, ApiError> {
        let trie = TrieBuilder::new(self.resolver).build(records);
        let duplicates = duplicate_ids(records, self.config.index.group_prefix_width);
        let name_collisions = trie.collisions.len() + duplicates.len();
        if name_collisions > 0 {
            if self.config.build.fail_on_collision {
                return Err(ApiError::NameCollision(name_collisions));
            }
            warn!(count = name_collisions, "Naming collisions detected; colliding entries were skipped");
        }
        Ok(CatalogPlan {
            trie,
            name_collisions,
        })
    }

    /// Write both views and `metadata.json` for an accepted plan.
    pub fn emit(
        &self,
        plan: CatalogPlan,
        records: &[Arc<Record>],
        sink: &mut dyn DocumentSink,
        created: DateTime<Utc>,
    ) -> Result<BuildSummary, ApiError> {
        let CatalogPlan {
            trie,
            name_collisions,
        } = plan;

        let before = sink.documents_written();
        let grouped = GroupedEmitter::new(&self.config.group_options()).emit(records, sink)?;
        ClassificationEmitter::new(&self.config.view_options()).emit(&trie.forest, sink)?;
        let documents_written = sink.documents_written() - before;

        let subitems = records.iter().map(|r| listed_count(r)).sum();
        let stats = CatalogStats {
            records: records.len(),
            subitems,
            documents_written,
            name_collisions,
        };
        sink.write_metadata(&self.metadata(stats, created))?;

        info!(
            accession = %self.config.catalog.accession,
            records = records.len(),
            documents = documents_written,
            "Catalog assembled"
        );

        Ok(BuildSummary {
            accession: self.config.catalog.accession.clone(),
            records: records.len(),
            subitems,
            documents_written,
            prefix_groups: grouped.groups,
            top_level_entries: trie.forest.len(),
            name_collisions,
            collisions: trie.collisions,
            duplicate_ids: grouped.duplicates,
            output: None,
            dry_run: false,
        })
    }

    fn metadata(&self, stats: CatalogStats, created: DateTime<Utc>) -> CatalogMetadata {
        let section = &self.config.catalog;
        CatalogMetadata {
            accession: section.accession.clone(),
            title: section.title.clone(),
            description: section.description.clone(),
            source: section.source.clone(),
            license: section.license_name.as_ref().map(|name| License {
                name: name.clone(),
                url: section.license_url.clone(),
            }),
            created,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::ClassificationDictionary;
    use crate::toc::entry::TocEntry;
    use crate::toc::sink::MemorySink;
    use crate::types::SubItem;
    use chrono::TimeZone;

    fn resolver() -> NameResolver {
        NameResolver::new(Arc::new(
            ClassificationDictionary::new()
                .with("L", "Antineoplastic and immunomodulating agents")
                .with("L01", "Antineoplastic agents")
                .with("L01F", "Monoclonal antibodies"),
        ))
    }

    fn record(id: &str, name: &str, code: &str) -> Arc<Record> {
        Arc::new(Record::new(id, name, code).with_subitems(vec![SubItem::new(
            format!("https://x/{}.pdf", name),
            format!("{} : EPAR - Public assessment report", name),
            None,
        )]))
    }

    fn config() -> CatalogConfig {
        let mut config = CatalogConfig::default();
        config.catalog.accession = "RDCP-E26-EMA".to_string();
        config.catalog.title = "EMA PARs".to_string();
        config.catalog.license_name = Some("EMA Public".to_string());
        config
    }

    #[test]
    fn test_assemble_writes_both_views_and_metadata() {
        let config = config();
        let resolver = resolver();
        let records = vec![
            record("EMEA/H/C/000001", "Alpha", "L01FA01"),
            record("EMEA/H/C/000002", "Beta", "L01FB02"),
        ];
        let mut sink = MemorySink::new();
        let created = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let summary = Catalog::new(&config, &resolver)
            .assemble_at(&records, &mut sink, created)
            .unwrap();

        // files + 1 prefix + 2 records, By-Code root only (L01F) at depth 1
        assert_eq!(summary.documents_written, 5);
        assert_eq!(sink.documents.len(), 5);
        assert_eq!(summary.records, 2);
        assert_eq!(summary.subitems, 2);
        assert_eq!(summary.name_collisions, 0);

        let root = sink.get("documents/RDCP-E26-EMA/By-Code/toc.json").unwrap();
        assert_eq!(root.source.as_deref(), Some("tocbuild"));
        assert_eq!(root.children.len(), 1);
        assert!(matches!(root.children[0], TocEntry::Folder(_)));

        let metadata = sink.metadata.unwrap();
        assert_eq!(metadata.accession, "RDCP-E26-EMA");
        assert_eq!(metadata.created, created);
        assert_eq!(metadata.license.unwrap().name, "EMA Public");
        assert_eq!(metadata.stats.documents_written, 5);
    }

    #[test]
    fn test_fail_on_collision_writes_nothing() {
        let mut config = config();
        config.build.fail_on_collision = true;
        let resolver = resolver();
        let records = vec![
            record("EMEA/H/C/000001", "Alpha", "L01FA01"),
            record("EMEA-H-C-000001", "Beta", "L01FB02"),
        ];
        let mut sink = MemorySink::new();
        let err = Catalog::new(&config, &resolver)
            .assemble(&records, &mut sink)
            .unwrap_err();
        assert!(matches!(err, ApiError::NameCollision(1)));
        assert!(sink.documents.is_empty());
        assert!(sink.metadata.is_none());
    }

    #[test]
    fn test_empty_catalog_still_writes_roots() {
        let config = config();
        let resolver = resolver();
        let mut sink = MemorySink::new();
        let summary = Catalog::new(&config, &resolver)
            .assemble(&[], &mut sink)
            .unwrap();
        assert_eq!(summary.documents_written, 2);
        assert!(sink.get("documents/RDCP-E26-EMA/files/toc.json").is_some());
        assert_eq!(sink.metadata.unwrap().stats.records, 0);
    }
}
