use std::collections::HashSet;
use std::fmt;

use crate::error::ClusterError;
use crate::math::{cosine_sim, l2_normalize, mean};

/// Default minimum cosine similarity for joining a cluster.
pub const DEFAULT_THRESHOLD: f32 = 0.8;

/// Default cluster id prefix ("cluster" -> "cluster-1").
pub const DEFAULT_PREFIX: &str = "cluster";

/// Controls a clustering pass.
#[derive(Debug, Clone)]
pub struct Config {
    /// Minimum cosine similarity between a photo and a cluster centroid
    /// for the photo to join that cluster.
    /// Lower = more merges, higher = stricter. Must be in (0, 1].
    /// Default: 0.8.
    pub threshold: f32,

    /// Prepended to generated IDs (e.g. "cluster" -> "cluster-1").
    pub prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            prefix: DEFAULT_PREFIX.into(),
        }
    }
}

impl Config {
    /// Creates a config with the given threshold and the default prefix.
    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    fn with_defaults(mut self) -> Self {
        if self.prefix.is_empty() {
            self.prefix = DEFAULT_PREFIX.into();
        }
        self
    }

    fn validate(&self) -> Result<(), ClusterError> {
        let t = self.threshold;
        if !t.is_finite() || t <= 0.0 || t > 1.0 {
            return Err(ClusterError::InvalidThreshold(t));
        }
        Ok(())
    }
}

/// One cluster produced by [`cluster_embeddings`].
#[derive(Clone, PartialEq)]
pub struct ClusterResult {
    /// Identifier unique within one run (e.g. "cluster-1").
    pub id: String,

    /// Member photo IDs in assignment order.
    pub photo_ids: Vec<String>,

    /// L2-normalized mean of the members' raw embeddings.
    pub centroid: Vec<f32>,
}

impl fmt::Debug for ClusterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterResult")
            .field("id", &self.id)
            .field("photo_ids", &self.photo_ids)
            .field("centroid_len", &self.centroid.len())
            .finish()
    }
}

/// Working state for one cluster during a pass. Members are indices into
/// the input slice so centroids can be rebuilt from raw embeddings.
struct Building {
    members: Vec<usize>,
    centroid: Vec<f32>,
}

/// Groups embeddings with a single greedy first-fit pass.
///
/// Input order is the iteration order: for each `(photo_id, embedding)` the
/// embedding is L2-normalized and compared against existing centroids in
/// creation order. The photo joins the FIRST cluster whose centroid has
/// cosine similarity `>= cfg.threshold`; the centroid is then rebuilt as the
/// normalized mean of all members' raw embeddings. If no cluster qualifies,
/// a new one is started.
///
/// Entries with an empty embedding are skipped. The first non-empty
/// embedding fixes the dimension for the rest of the pass.
///
/// The result depends only on the input order and the config, so repeated
/// calls with the same arguments produce identical output.
///
/// # Errors
///
/// - [`ClusterError::InvalidThreshold`] if the threshold is not in (0, 1].
/// - [`ClusterError::DimensionMismatch`] if embeddings differ in length.
/// - [`ClusterError::DuplicateId`] if a photo ID appears twice.
pub fn cluster_embeddings(
    input: &[(String, Vec<f32>)],
    cfg: &Config,
) -> Result<Vec<ClusterResult>, ClusterError> {
    let cfg = cfg.clone().with_defaults();
    cfg.validate()?;

    let mut dim: Option<usize> = None;
    let mut seen: HashSet<&str> = HashSet::with_capacity(input.len());
    let mut clusters: Vec<Building> = Vec::new();

    for (idx, (photo_id, emb)) in input.iter().enumerate() {
        if !seen.insert(photo_id.as_str()) {
            return Err(ClusterError::DuplicateId(photo_id.clone()));
        }
        if emb.is_empty() {
            continue;
        }
        let expected = *dim.get_or_insert(emb.len());
        if emb.len() != expected {
            return Err(ClusterError::DimensionMismatch {
                id: photo_id.clone(),
                expected,
                got: emb.len(),
            });
        }

        let normalized = l2_normalize(emb);

        let target = clusters
            .iter()
            .position(|c| cosine_sim(&c.centroid, &normalized) >= cfg.threshold);

        match target {
            Some(ci) => {
                let cluster = &mut clusters[ci];
                cluster.members.push(idx);
                let avg = mean(
                    cluster.members.iter().map(|&m| input[m].1.as_slice()),
                    expected,
                );
                cluster.centroid = l2_normalize(&avg);
            }
            None => clusters.push(Building {
                members: vec![idx],
                centroid: normalized,
            }),
        }
    }

    Ok(clusters
        .into_iter()
        .enumerate()
        .map(|(i, c)| ClusterResult {
            id: format!("{}-{}", cfg.prefix, i + 1),
            photo_ids: c.members.iter().map(|&m| input[m].0.clone()).collect(),
            centroid: c.centroid,
        })
        .collect())
}
