use std::sync::Arc;

use reckoner_core::annotation_file::JsonFileAnnotationStore;
use reckoner_core::cache::ReloadableCache;
use reckoner_core::csv_source::CsvFeatureTableSource;
use reckoner_core::error::CoreError;
use reckoner_core::filter::FilterOptions;
use reckoner_core::reference::{JsonReferenceSource, ReferenceSets, ReferenceSource};
use reckoner_core::session::Session;
use reckoner_core::store::{AnnotationStore, FeatureFlagLookup, FeatureTableSource};
use reckoner_core::table::FeatureTable;
use reckoner_db::sources::{
    SqliteAnnotationStore, SqliteFeatureFlagLookup, SqliteFeatureTableSource,
    SqliteReferenceSource,
};
use tokio::sync::Mutex;

use crate::config::{
    AnnotationBackendConfig, FeatureSourceConfig, ReckonerConfig, ReferenceSourceConfig,
    ServerConfig,
};

/// The concrete sources and stores picked by configuration.
#[derive(Clone)]
pub struct Backends {
    pub reference: Arc<dyn ReferenceSource>,
    pub features: Arc<dyn FeatureTableSource>,
    pub annotations: Arc<dyn AnnotationStore>,
    /// `None` when the feature-flag capability is disabled.
    pub feature_flags: Option<Arc<dyn FeatureFlagLookup>>,
}

impl Backends {
    pub fn from_config(config: &ReckonerConfig, pool: &reckoner_db::DbPool) -> Self {
        let reference: Arc<dyn ReferenceSource> = match &config.reference_source {
            ReferenceSourceConfig::Json { dir } => Arc::new(JsonReferenceSource::in_dir(dir)),
            ReferenceSourceConfig::Sqlite => Arc::new(SqliteReferenceSource::new(pool.clone())),
        };
        let features: Arc<dyn FeatureTableSource> = match &config.feature_source {
            FeatureSourceConfig::Csv { path } => Arc::new(CsvFeatureTableSource::new(path)),
            FeatureSourceConfig::Sqlite { table } => {
                Arc::new(SqliteFeatureTableSource::new(pool.clone(), table))
            }
        };
        let annotations: Arc<dyn AnnotationStore> = match &config.annotations {
            AnnotationBackendConfig::Sqlite { name } => {
                Arc::new(SqliteAnnotationStore::new(pool.clone(), name))
            }
            AnnotationBackendConfig::Json { path } => Arc::new(JsonFileAnnotationStore::new(path)),
        };
        let feature_flags = config
            .feature_flags_enabled
            .then(|| Arc::new(SqliteFeatureFlagLookup::new(pool.clone())) as Arc<dyn FeatureFlagLookup>);

        Self {
            reference,
            features,
            annotations,
            feature_flags,
        }
    }
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: reckoner_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    pub backends: Backends,
    pub reference_cache: Arc<ReloadableCache<ReferenceSets>>,
    pub table_cache: Arc<ReloadableCache<FeatureTable>>,
    /// The single user's session. Held for the whole of each action.
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(pool: reckoner_db::DbPool, config: ServerConfig, backends: Backends) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            backends,
            reference_cache: Arc::new(ReloadableCache::new()),
            table_cache: Arc::new(ReloadableCache::new()),
            session: Arc::new(Mutex::new(Session::new())),
        }
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            comments: self.config.reckoner.comments_enabled,
        }
    }

    pub async fn reference_sets(&self) -> Result<Arc<ReferenceSets>, CoreError> {
        let source = Arc::clone(&self.backends.reference);
        self.reference_cache
            .get_or_load(|| async move { source.load_reference_sets().await })
            .await
    }

    pub async fn reload_reference_sets(&self) -> Result<Arc<ReferenceSets>, CoreError> {
        let source = Arc::clone(&self.backends.reference);
        self.reference_cache
            .reload(|| async move { source.load_reference_sets().await })
            .await
    }

    pub async fn feature_table(&self) -> Result<Arc<FeatureTable>, CoreError> {
        let source = Arc::clone(&self.backends.features);
        self.table_cache
            .get_or_load(|| async move { source.load_feature_table().await })
            .await
    }

    pub async fn reload_feature_table(&self) -> Result<Arc<FeatureTable>, CoreError> {
        let source = Arc::clone(&self.backends.features);
        self.table_cache
            .reload(|| async move { source.load_feature_table().await })
            .await
    }

    /// Seed the session from the last saved snapshot, if there is one.
    ///
    /// Returns whether a snapshot was found.
    pub async fn restore_session(&self) -> Result<bool, CoreError> {
        let Some(view) = self.backends.annotations.load().await? else {
            return Ok(false);
        };
        tracing::info!(rows = view.len(), "Restored session from saved annotations");
        *self.session.lock().await = Session::restored(view);
        Ok(true)
    }
}
