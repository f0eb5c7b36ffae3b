//! Programmable collaborators with call counting.

use futures::future::{BoxFuture, FutureExt};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::collaborators::{
    BuildConfigRegistry, DependencyIndex, IndexError, MetadataProvider, ScmError, ServiceError,
    SourceControl, VersionHistory,
};
use crate::models::{Gav, PomInfo, SourceLocation, VersionLookup};

/// Collaborator operations, for counting calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    /// [`DependencyIndex::top_level_dependencies`]
    Index,
    /// [`DependencyIndex::top_level_dependencies_at`]
    IndexAt,
    /// [`MetadataProvider::pom_info`]
    PomInfo,
    /// [`MetadataProvider::pom_info_at`]
    PomInfoAt,
    /// [`SourceControl::is_gav_in_repository`]
    InRepository,
    /// [`BuildConfigRegistry::find_build_configurations`]
    BuildConfigurations,
    /// [`VersionHistory::lookup_built_versions`]
    BuiltVersions,
}

/// In-memory implementation of every collaborator trait.
///
/// Unconfigured lookups answer the way an empty world would: the index
/// reports `NotFound`, checkouts fail with an SCM fault, metadata is absent,
/// no project is in any repository, no build configurations exist and nothing
/// was built.
#[derive(Debug, Default)]
pub struct MockCollaborators {
    index: HashMap<Gav, Result<BTreeSet<Gav>, IndexError>>,
    index_at: HashMap<(SourceLocation, Gav), Result<BTreeSet<Gav>, ScmError>>,
    pom_info: HashMap<Gav, Result<Option<PomInfo>, ServiceError>>,
    pom_info_at: HashMap<(SourceLocation, Gav), Result<PomInfo, ScmError>>,
    in_repository: HashSet<(SourceLocation, Gav)>,
    repository_faults: HashMap<SourceLocation, ScmError>,
    build_configurations: HashMap<SourceLocation, Vec<u32>>,
    registry_fault: Option<ServiceError>,
    built_versions: HashMap<Gav, VersionLookup>,
    version_history_fault: Option<ServiceError>,
    latency: Option<Duration>,
    calls: Mutex<HashMap<Call, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockCollaborators {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index answer for `gav`.
    pub fn with_dependencies(mut self, gav: Gav, deps: impl IntoIterator<Item = Gav>) -> Self {
        self.index.insert(gav, Ok(deps.into_iter().collect()));
        self
    }

    /// Index fault for `gav`.
    pub fn with_index_fault(mut self, gav: Gav, fault: IndexError) -> Self {
        self.index.insert(gav, Err(fault));
        self
    }

    /// Descriptor analysis answer for `gav` at `location`.
    pub fn with_scm_dependencies(
        mut self,
        location: SourceLocation,
        gav: Gav,
        deps: impl IntoIterator<Item = Gav>,
    ) -> Self {
        self.index_at.insert((location, gav), Ok(deps.into_iter().collect()));
        self
    }

    /// Descriptor analysis fault for `gav` at `location`.
    pub fn with_scm_dependencies_fault(
        mut self,
        location: SourceLocation,
        gav: Gav,
        fault: ScmError,
    ) -> Self {
        self.index_at.insert((location, gav), Err(fault));
        self
    }

    /// Artifact-repository metadata for `gav`.
    pub fn with_pom_info(mut self, gav: Gav, info: PomInfo) -> Self {
        self.pom_info.insert(gav, Ok(Some(info)));
        self
    }

    /// Artifact-repository metadata fault for `gav`.
    pub fn with_pom_info_fault(mut self, gav: Gav, fault: ServiceError) -> Self {
        self.pom_info.insert(gav, Err(fault));
        self
    }

    /// Checkout metadata for `gav` at `location`.
    pub fn with_pom_info_at(mut self, location: SourceLocation, gav: Gav, info: PomInfo) -> Self {
        self.pom_info_at.insert((location, gav), Ok(info));
        self
    }

    /// Checkout metadata fault for `gav` at `location`.
    pub fn with_pom_info_at_fault(
        mut self,
        location: SourceLocation,
        gav: Gav,
        fault: ScmError,
    ) -> Self {
        self.pom_info_at.insert((location, gav), Err(fault));
        self
    }

    /// Make `gav` part of the repository at `location`.
    pub fn with_gav_in_repository(mut self, location: SourceLocation, gav: Gav) -> Self {
        self.in_repository.insert((location, gav));
        self
    }

    /// Make every repository probe at `location` fail.
    pub fn with_repository_fault(mut self, location: SourceLocation, fault: ScmError) -> Self {
        self.repository_faults.insert(location, fault);
        self
    }

    /// Build configurations registered for `location`.
    pub fn with_build_configurations(mut self, location: SourceLocation, ids: Vec<u32>) -> Self {
        self.build_configurations.insert(location, ids);
        self
    }

    /// Make every registry lookup fail.
    pub fn with_registry_fault(mut self, fault: ServiceError) -> Self {
        self.registry_fault = Some(fault);
        self
    }

    /// Built versions of `gav`.
    pub fn with_built_versions(mut self, gav: Gav, lookup: VersionLookup) -> Self {
        self.built_versions.insert(gav, lookup);
        self
    }

    /// Make every version-history lookup fail.
    pub fn with_version_history_fault(mut self, fault: ServiceError) -> Self {
        self.version_history_fault = Some(fault);
        self
    }

    /// Delay every artifact-repository metadata lookup.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of calls made to `call`.
    pub fn calls(&self, call: Call) -> usize {
        self.calls.lock().map(|calls| calls.get(&call).copied().unwrap_or(0)).unwrap_or(0)
    }

    /// Highest number of concurrent artifact-repository metadata lookups seen.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(call).or_insert(0) += 1;
        }
    }
}

impl DependencyIndex for MockCollaborators {
    fn top_level_dependencies<'a>(
        &'a self,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<BTreeSet<Gav>, IndexError>> {
        async move {
            self.record(Call::Index);
            self.index.get(gav).cloned().unwrap_or_else(|| {
                Err(IndexError::NotFound { gav: gav.clone() })
            })
        }
        .boxed()
    }

    fn top_level_dependencies_at<'a>(
        &'a self,
        location: &'a SourceLocation,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<BTreeSet<Gav>, ScmError>> {
        async move {
            self.record(Call::IndexAt);
            self.index_at.get(&(location.clone(), gav.clone())).cloned().unwrap_or_else(|| {
                Err(ScmError::Scm {
                    location: location.clone(),
                    message: "repository not available".to_string(),
                })
            })
        }
        .boxed()
    }
}

impl MetadataProvider for MockCollaborators {
    fn pom_info<'a>(
        &'a self,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<Option<PomInfo>, ServiceError>> {
        async move {
            self.record(Call::PomInfo);
            if let Some(latency) = self.latency {
                let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_in_flight.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(latency).await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
            }
            self.pom_info.get(gav).cloned().unwrap_or(Ok(None))
        }
        .boxed()
    }

    fn pom_info_at<'a>(
        &'a self,
        location: &'a SourceLocation,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<Option<PomInfo>, ScmError>> {
        async move {
            self.record(Call::PomInfoAt);
            self.pom_info_at.get(&(location.clone(), gav.clone())).cloned().transpose()
        }
        .boxed()
    }
}

impl SourceControl for MockCollaborators {
    fn is_gav_in_repository<'a>(
        &'a self,
        location: &'a SourceLocation,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<bool, ScmError>> {
        async move {
            self.record(Call::InRepository);
            if let Some(fault) = self.repository_faults.get(location) {
                return Err(fault.clone());
            }
            Ok(self.in_repository.contains(&(location.clone(), gav.clone())))
        }
        .boxed()
    }
}

impl BuildConfigRegistry for MockCollaborators {
    fn find_build_configurations<'a>(
        &'a self,
        location: &'a SourceLocation,
    ) -> BoxFuture<'a, Result<Vec<u32>, ServiceError>> {
        async move {
            self.record(Call::BuildConfigurations);
            if let Some(fault) = &self.registry_fault {
                return Err(fault.clone());
            }
            Ok(self.build_configurations.get(location).cloned().unwrap_or_default())
        }
        .boxed()
    }
}

impl VersionHistory for MockCollaborators {
    fn lookup_built_versions<'a>(
        &'a self,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<VersionLookup, ServiceError>> {
        async move {
            self.record(Call::BuiltVersions);
            if let Some(fault) = &self.version_history_fault {
                return Err(fault.clone());
            }
            Ok(self.built_versions.get(gav).cloned().unwrap_or_default())
        }
        .boxed()
    }
}
